//! Simulated assistant replies

use rand::seq::SliceRandom;
use rand::Rng;

use crate::intent::Intent;

pub const GREETING_RESPONSE: &str = "Hello! How can I help you today?";

pub const HELP_RESPONSE: &str = "I can greet you, open applications (\"open calculator\"), \
search the web (\"search rust tutorials\"), add tasks (\"add task: buy milk\") \
and list them (\"show tasks\").";

pub const LIST_TASKS_RESPONSE: &str =
    "Here are your current tasks. Open the Tasks view to see their status.";

pub const EMPTY_TASK_RESPONSE: &str =
    "What should the task be? Try something like \"add task: buy milk\".";

/// Fallback replies for unrecognised input; `{}` is replaced by the raw text
pub const FALLBACK_TEMPLATES: &[&str] = &[
    "I'm not sure I understand \"{}\". Could you rephrase that?",
    "Interesting! Tell me more about \"{}\".",
    "I heard \"{}\", but I don't have a skill for that yet.",
    "Let me think about \"{}\"... I'm still learning. Type \"help\" to see what I can do.",
    "Hmm, \"{}\" is new to me. Try asking me to open an app or search for something.",
];

/// Produce a reply using the thread-local RNG for fallback phrasing
pub fn synthesize(intent: &Intent) -> String {
    synthesize_with(intent, &mut rand::thread_rng())
}

/// Produce a reply. Only [`Intent::Unknown`] consumes randomness.
pub fn synthesize_with<R: Rng + ?Sized>(intent: &Intent, rng: &mut R) -> String {
    match intent {
        Intent::Greeting => GREETING_RESPONSE.to_string(),
        Intent::OpenApp(target) => {
            if target.is_empty() {
                "Opening the application you asked for...".to_string()
            } else {
                format!("Opening {}...", target)
            }
        }
        Intent::Search(query) => {
            if query.is_empty() {
                "Searching the web...".to_string()
            } else {
                format!("Searching the web for \"{}\"...", query)
            }
        }
        Intent::AddTask(description) => {
            if description.is_empty() {
                EMPTY_TASK_RESPONSE.to_string()
            } else {
                format!("I've added \"{}\" to your tasks.", description)
            }
        }
        Intent::ListTasks => LIST_TASKS_RESPONSE.to_string(),
        Intent::Help => HELP_RESPONSE.to_string(),
        Intent::Unknown(raw) => {
            let template = FALLBACK_TEMPLATES
                .choose(rng)
                .copied()
                .unwrap_or(FALLBACK_TEMPLATES[0]);
            template.replace("{}", raw.trim())
        }
    }
}

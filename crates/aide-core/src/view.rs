//! Main panel view switching
//!
//! Exactly one panel occupies the main area. Activating a view builds its
//! panel from scratch and drops the previous one; nothing is merged or kept.

use crate::config::SettingsDefaults;
use crate::state::{Message, Speaker, Transcript};
use crate::tasks::{Task, TaskStore};

/// Greeting every fresh chat panel starts with
pub const CHAT_GREETING: &str = "Hello! I'm your AI assistant. How can I help you today?";

pub const ADD_TASK_LABEL: &str = "+ Add Task";
pub const DROP_TARGET_PROMPT: &str = "Drop files here or click to browse";
pub const DROP_TARGET_HINT: &str = "Files are not uploaded; the picker is for preview only";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Chat,
    Tasks,
    Settings,
    FileUpload,
}

impl ViewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewState::Chat => "chat",
            ViewState::Tasks => "tasks",
            ViewState::Settings => "settings",
            ViewState::FileUpload => "upload",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chat" => Some(ViewState::Chat),
            "tasks" => Some(ViewState::Tasks),
            "settings" => Some(ViewState::Settings),
            "upload" | "file" | "files" => Some(ViewState::FileUpload),
            _ => None,
        }
    }

    pub fn all() -> Vec<ViewState> {
        vec![
            ViewState::Chat,
            ViewState::Tasks,
            ViewState::Settings,
            ViewState::FileUpload,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ViewState::Chat => "Chat",
            ViewState::Tasks => "Tasks",
            ViewState::Settings => "Settings",
            ViewState::FileUpload => "File Upload",
        }
    }

    /// Following view in navigation order, wrapping around
    pub fn next(&self) -> ViewState {
        let all = Self::all();
        let i = all.iter().position(|v| v == self).unwrap_or(0);
        all[(i + 1) % all.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Toggle(bool),
    Choice {
        options: Vec<String>,
        selected: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingControl {
    pub label: &'static str,
    pub value: SettingValue,
}

impl SettingControl {
    /// Flip a toggle or advance a choice. Changes live only as long as the panel.
    pub fn activate(&mut self) {
        match &mut self.value {
            SettingValue::Toggle(on) => *on = !*on,
            SettingValue::Choice { options, selected } => {
                if !options.is_empty() {
                    *selected = (*selected + 1) % options.len();
                }
            }
        }
    }

    pub fn display_value(&self) -> String {
        match &self.value {
            SettingValue::Toggle(true) => "On".to_string(),
            SettingValue::Toggle(false) => "Off".to_string(),
            SettingValue::Choice { options, selected } => {
                options.get(*selected).cloned().unwrap_or_default()
            }
        }
    }
}

const THEMES: [&str; 3] = ["Dark", "Light", "System"];

fn settings_controls(defaults: &SettingsDefaults) -> Vec<SettingControl> {
    let theme = THEMES
        .iter()
        .position(|t| t.eq_ignore_ascii_case(&defaults.theme))
        .unwrap_or(0);

    vec![
        SettingControl {
            label: "Voice responses",
            value: SettingValue::Toggle(defaults.voice_responses),
        },
        SettingControl {
            label: "Wake word detection",
            value: SettingValue::Toggle(defaults.wake_word),
        },
        SettingControl {
            label: "Status notifications",
            value: SettingValue::Toggle(defaults.notifications),
        },
        SettingControl {
            label: "Theme",
            value: SettingValue::Choice {
                options: THEMES.iter().map(|t| t.to_string()).collect(),
                selected: theme,
            },
        },
    ]
}

#[derive(Debug)]
enum Panel {
    /// Shows transcript messages from `since` onwards
    Chat { since: u64 },
    Tasks,
    Settings { controls: Vec<SettingControl> },
    FileUpload { picker_open: bool },
}

/// Renderer output for the active panel
#[derive(Debug)]
pub enum Rendered<'a> {
    Chat {
        messages: &'a [Message],
    },
    Tasks {
        tasks: Vec<Task>,
        add_label: &'static str,
    },
    Settings {
        controls: &'a [SettingControl],
    },
    FileUpload {
        prompt: &'static str,
        hint: &'static str,
        picker_open: bool,
    },
}

#[derive(Debug)]
pub struct ViewController {
    panel: Panel,
    settings_defaults: SettingsDefaults,
}

impl ViewController {
    /// Starts on a fresh chat panel
    pub fn new(settings_defaults: SettingsDefaults, transcript: &mut Transcript) -> Self {
        let since = transcript.push(Speaker::Assistant, CHAT_GREETING).ordinal;
        Self {
            panel: Panel::Chat { since },
            settings_defaults,
        }
    }

    pub fn current(&self) -> ViewState {
        match self.panel {
            Panel::Chat { .. } => ViewState::Chat,
            Panel::Tasks => ViewState::Tasks,
            Panel::Settings { .. } => ViewState::Settings,
            Panel::FileUpload { .. } => ViewState::FileUpload,
        }
    }

    pub fn activate(&mut self, view: ViewState, transcript: &mut Transcript) {
        tracing::info!(from = self.current().as_str(), to = view.as_str(), "view activated");
        self.panel = match view {
            ViewState::Chat => {
                let since = transcript.push(Speaker::Assistant, CHAT_GREETING).ordinal;
                Panel::Chat { since }
            }
            ViewState::Tasks => Panel::Tasks,
            ViewState::Settings => Panel::Settings {
                controls: settings_controls(&self.settings_defaults),
            },
            ViewState::FileUpload => Panel::FileUpload { picker_open: false },
        };
    }

    pub fn render<'a>(&'a self, transcript: &'a Transcript, tasks: &dyn TaskStore) -> Rendered<'a> {
        match &self.panel {
            Panel::Chat { since } => Rendered::Chat {
                messages: transcript.since(*since),
            },
            Panel::Tasks => Rendered::Tasks {
                tasks: tasks.list(),
                add_label: ADD_TASK_LABEL,
            },
            Panel::Settings { controls } => Rendered::Settings { controls },
            Panel::FileUpload { picker_open } => Rendered::FileUpload {
                prompt: DROP_TARGET_PROMPT,
                hint: DROP_TARGET_HINT,
                picker_open: *picker_open,
            },
        }
    }

    /// Activate the setting at `index`; ignored outside the settings panel
    pub fn toggle_setting(&mut self, index: usize) -> Option<&SettingControl> {
        match &mut self.panel {
            Panel::Settings { controls } => {
                let control = controls.get_mut(index)?;
                control.activate();
                Some(control)
            }
            _ => None,
        }
    }

    /// Returns false when the file upload panel is not active
    pub fn set_picker_open(&mut self, open: bool) -> bool {
        match &mut self.panel {
            Panel::FileUpload { picker_open } => {
                *picker_open = open;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::InMemoryTaskStore;

    fn controller() -> (ViewController, Transcript) {
        let mut transcript = Transcript::new();
        let controller = ViewController::new(SettingsDefaults::default(), &mut transcript);
        (controller, transcript)
    }

    #[test]
    fn test_starts_on_chat_with_greeting() {
        let (controller, transcript) = controller();
        let tasks = InMemoryTaskStore::with_demo_tasks();
        assert_eq!(controller.current(), ViewState::Chat);
        match controller.render(&transcript, &tasks) {
            Rendered::Chat { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text, CHAT_GREETING);
                assert_eq!(messages[0].speaker, Speaker::Assistant);
            }
            other => panic!("expected chat, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_reinitialises_after_round_trip() {
        let (mut controller, mut transcript) = controller();
        let tasks = InMemoryTaskStore::with_demo_tasks();
        transcript.push(Speaker::User, "hello");
        transcript.push(Speaker::Assistant, "hi!");

        controller.activate(ViewState::Tasks, &mut transcript);
        controller.activate(ViewState::Chat, &mut transcript);

        match controller.render(&transcript, &tasks) {
            Rendered::Chat { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text, CHAT_GREETING);
            }
            other => panic!("expected chat, got {:?}", other),
        }
        // history itself is kept
        assert_eq!(transcript.len(), 4);
    }

    #[test]
    fn test_tasks_panel_lists_store() {
        let (mut controller, mut transcript) = controller();
        let tasks = InMemoryTaskStore::with_demo_tasks();
        controller.activate(ViewState::Tasks, &mut transcript);
        match controller.render(&transcript, &tasks) {
            Rendered::Tasks { tasks, add_label } => {
                assert_eq!(tasks.len(), 4);
                assert_eq!(add_label, ADD_TASK_LABEL);
            }
            other => panic!("expected tasks, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_toggles_reset_on_reactivation() {
        let (mut controller, mut transcript) = controller();
        controller.activate(ViewState::Settings, &mut transcript);

        let toggled = controller.toggle_setting(0).cloned().unwrap();
        assert_eq!(toggled.value, SettingValue::Toggle(!SettingsDefaults::default().voice_responses));

        controller.activate(ViewState::Settings, &mut transcript);
        let tasks = InMemoryTaskStore::new();
        match controller.render(&transcript, &tasks) {
            Rendered::Settings { controls } => {
                assert_eq!(controls[0].value, SettingValue::Toggle(SettingsDefaults::default().voice_responses));
            }
            other => panic!("expected settings, got {:?}", other),
        }
    }

    #[test]
    fn test_theme_choice_cycles() {
        let mut control = SettingControl {
            label: "Theme",
            value: SettingValue::Choice {
                options: vec!["Dark".into(), "Light".into()],
                selected: 1,
            },
        };
        control.activate();
        assert_eq!(control.display_value(), "Dark");
    }

    #[test]
    fn test_picker_only_on_upload_panel() {
        let (mut controller, mut transcript) = controller();
        assert!(!controller.set_picker_open(true));
        assert!(controller.toggle_setting(0).is_none());

        controller.activate(ViewState::FileUpload, &mut transcript);
        assert!(controller.set_picker_open(true));
        let tasks = InMemoryTaskStore::new();
        assert!(matches!(
            controller.render(&transcript, &tasks),
            Rendered::FileUpload { picker_open: true, .. }
        ));
    }

    #[test]
    fn test_view_names_round_trip() {
        for view in ViewState::all() {
            assert_eq!(ViewState::from_str(view.as_str()), Some(view));
        }
        assert_eq!(ViewState::Chat.next(), ViewState::Tasks);
        assert_eq!(ViewState::FileUpload.next(), ViewState::Chat);
    }
}

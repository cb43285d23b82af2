//! Line-oriented mode for terminals without a full-screen UI, or for piping
//! commands in from a script.

use anyhow::Result;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};

use aide_core::{sleep_until, Assistant, Rendered, Speaker, StatusIcon, StatusNotification, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Voice,
    View(ViewState),
    UnknownView(String),
    Submit(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();

    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Command::Quit;
    }
    if trimmed == "/voice" {
        return Command::Voice;
    }
    if let Some(rest) = trimmed.strip_prefix("/view") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let name = rest.trim().to_lowercase();
            return match ViewState::from_str(&name) {
                Some(view) => Command::View(view),
                None => Command::UnknownView(name),
            };
        }
    }

    Command::Submit(line.to_string())
}

/// Something the session produced since the last check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Message { speaker: Speaker, text: String },
    Status { icon: StatusIcon, text: String },
}

/// Tracks what has already been echoed so each entry prints once
#[derive(Debug, Default)]
pub struct Printer {
    printed: usize,
    last_status: Option<StatusNotification>,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect(&mut self, assistant: &Assistant) -> Vec<Output> {
        let mut out = Vec::new();

        let messages = assistant.transcript().messages();
        for msg in messages.iter().skip(self.printed) {
            out.push(Output::Message {
                speaker: msg.speaker,
                text: msg.text.clone(),
            });
        }
        self.printed = messages.len();

        let status = assistant.status().cloned();
        if status != self.last_status {
            if let Some(s) = &status {
                out.push(Output::Status {
                    icon: s.icon,
                    text: s.text.clone(),
                });
            }
            self.last_status = status;
        }

        out
    }
}

fn print_output(output: &Output) {
    match output {
        Output::Message { speaker: Speaker::User, text } => {
            println!("{} {}", "You:".cyan().bold(), text);
        }
        Output::Message { speaker: Speaker::Assistant, text } => {
            println!("{} {}", "AI:".yellow().bold(), text);
        }
        Output::Status { icon, text } => {
            println!("{}", format!("  [{}] {}", icon.as_str(), text).dimmed());
        }
    }
}

/// Plain-text rendering of a panel. Chat prints nothing here because its
/// messages already stream through the printer.
pub fn describe(rendered: &Rendered) -> Vec<String> {
    match rendered {
        Rendered::Chat { .. } => Vec::new(),
        Rendered::Tasks { tasks, add_label } => {
            let mut lines: Vec<String> = tasks
                .iter()
                .map(|t| format!("  {:>2}. {} ({})", t.id, t.name, t.status.display_name()))
                .collect();
            lines.push(format!("  {}", add_label));
            lines
        }
        Rendered::Settings { controls } => controls
            .iter()
            .map(|c| format!("  {}: {}", c.label, c.display_value()))
            .collect(),
        Rendered::FileUpload { prompt, hint, .. } => {
            vec![format!("  {}", prompt), format!("  {}", hint)]
        }
    }
}

fn flush(printer: &mut Printer, assistant: &Assistant) {
    for output in printer.collect(assistant) {
        print_output(&output);
    }
}

pub async fn run(mut assistant: Assistant) -> Result<()> {
    println!(
        "{} {}",
        assistant.config().assistant_name.bold().blue(),
        "(type 'exit' to quit, /voice to dictate, /view <chat|tasks|settings|upload>)".dimmed()
    );

    let mut printer = Printer::new();
    flush(&mut printer, &assistant);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        // Piped input: stay around until the last reply lands
        if !stdin_open && assistant.pending_responses() == 0 && !assistant.is_listening() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) => match parse_command(&line) {
                        Command::Quit => break,
                        Command::Voice => assistant.start_listening(),
                        Command::View(view) => {
                            assistant.activate(view);
                            println!("{}", format!("-- {} --", view.display_name()).bold());
                            for row in describe(&assistant.render()) {
                                println!("{}", row);
                            }
                        }
                        Command::UnknownView(name) => {
                            println!("{} {}", "Unknown view:".red(), name);
                        }
                        Command::Submit(text) => assistant.submit(&text),
                    },
                    None => stdin_open = false,
                }
            }
            _ = sleep_until(assistant.next_deadline()) => {
                assistant.run_due();
            }
        }

        flush(&mut printer, &assistant);
    }

    tracing::info!("cli session ended");
    Ok(())
}

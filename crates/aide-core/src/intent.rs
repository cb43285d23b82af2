//! Keyword intent classification
//!
//! Matching is plain case-insensitive substring search evaluated in a fixed
//! priority order; the first rule that matches wins. A message containing
//! several trigger words resolves by that order, not by relevance, so
//! `"search history"` is a greeting because it contains `"hi"`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref LEADING_OPEN: Regex = Regex::new(r"(?i)^\s*open\b").unwrap();
    static ref LEADING_SEARCH: Regex = Regex::new(r"(?i)^\s*search\b").unwrap();
    static ref ADD_TASK_PREFIX: Regex =
        Regex::new(r"(?i)\badd\b(?:\s+(?:a|an|new|the))*\s+tasks?\b\s*(?:to\b)?\s*:?\s*").unwrap();
}

/// The classified purpose of a user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Greeting,
    OpenApp(String),
    Search(String),
    AddTask(String),
    ListTasks,
    Help,
    Unknown(String),
}

impl Intent {
    /// Stable tag for logs, independent of extracted parameters
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::OpenApp(_) => "open_app",
            Intent::Search(_) => "search",
            Intent::AddTask(_) => "add_task",
            Intent::ListTasks => "list_tasks",
            Intent::Help => "help",
            Intent::Unknown(_) => "unknown",
        }
    }
}

/// Classify a message. Pure; callers are expected to reject blank text first.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if lower.contains("hello") || lower.contains("hi") {
        return Intent::Greeting;
    }

    if lower.contains("open") {
        return Intent::OpenApp(strip_leading(&LEADING_OPEN, text));
    }

    if lower.contains("search") {
        return Intent::Search(strip_leading(&LEADING_SEARCH, text));
    }

    if lower.contains("task") {
        if lower.contains("add") {
            return Intent::AddTask(task_description(text));
        }
        if lower.contains("show") || lower.contains("list") {
            return Intent::ListTasks;
        }
        // "task" without a recognised verb is not a help request either
        return Intent::Unknown(text.to_string());
    }

    if lower.contains("help") {
        return Intent::Help;
    }

    Intent::Unknown(text.to_string())
}

/// Drop the keyword when it is the first word; the rest of the text is kept as typed
fn strip_leading(keyword: &Regex, text: &str) -> String {
    match keyword.find(text) {
        Some(m) => text[m.end()..].trim().to_string(),
        None => text.trim().to_string(),
    }
}

/// Everything after an "add task:" style prefix, or the whole message if
/// there is no such prefix
fn task_description(text: &str) -> String {
    match ADD_TASK_PREFIX.find(text) {
        Some(m) => text[m.end()..].trim().to_string(),
        None => text.trim().to_string(),
    }
}

//! Simulated voice input
//!
//! Real audio capture lives outside this crate behind [`VoiceCapture`]. The
//! simulator only tracks whether a capture is in flight and which timer will
//! finish it.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::scheduler::TimerHandle;

/// Commands the simulated microphone "hears"
pub const SAMPLE_COMMANDS: &[&str] = &[
    "Hello there",
    "Open calculator",
    "Search for weather today",
    "Add task: call the dentist",
    "Show my tasks",
    "Help",
    "Open spotify",
    "Search rust tutorials",
    "What's the time?",
    "Add task: water the plants",
];

/// Produces a finalized transcript for one capture, or `None` when nothing
/// usable was heard
pub trait VoiceCapture: Send {
    fn transcribe(&mut self) -> Option<String>;
}

pub struct SimulatedCapture {
    rng: StdRng,
}

impl SimulatedCapture {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCapture for SimulatedCapture {
    fn transcribe(&mut self) -> Option<String> {
        SAMPLE_COMMANDS.choose(&mut self.rng).map(|s| s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    Listening(TimerHandle),
}

#[derive(Debug)]
pub struct VoiceInput {
    state: VoiceState,
}

impl VoiceInput {
    pub fn new() -> Self {
        Self {
            state: VoiceState::Idle,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, VoiceState::Listening(_))
    }

    pub fn begin(&mut self, timer: TimerHandle) {
        self.state = VoiceState::Listening(timer);
    }

    /// Return to idle, handing back the pending capture timer if there was one
    pub fn stop(&mut self) -> Option<TimerHandle> {
        match std::mem::replace(&mut self.state, VoiceState::Idle) {
            VoiceState::Listening(timer) => Some(timer),
            VoiceState::Idle => None,
        }
    }

    /// Whether `timer` is the capture currently in flight
    pub fn owns(&self, timer: TimerHandle) -> bool {
        self.state == VoiceState::Listening(timer)
    }
}

impl Default for VoiceInput {
    fn default() -> Self {
        Self::new()
    }
}

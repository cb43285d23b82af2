//! The message pipeline
//!
//! [`Assistant`] owns every piece of session state. Front ends call its
//! operations from their event handlers, wait for [`Assistant::next_deadline`]
//! on their own loop and then call [`Assistant::run_due`]. All mutation
//! happens on that single caller, so there is no locking; replies to
//! overlapping submissions still land in whichever order their delays expire.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::time::Instant;

use crate::config::Config;
use crate::intent::{classify, Intent};
use crate::notifier::{
    StatusIcon, StatusNotification, StatusNotifier, LISTENING_TEXT, PROCESSING_TEXT,
    RECEIVED_TEXT, STOPPED_TEXT,
};
use crate::response::synthesize_with;
use crate::scheduler::{Continuation, Scheduler, TimerHandle};
use crate::state::{Speaker, Transcript};
use crate::tasks::{InMemoryTaskStore, Task, TaskStore};
use crate::view::{Rendered, SettingControl, ViewController, ViewState};
use crate::voice::{SimulatedCapture, VoiceCapture, VoiceState, VoiceInput};

pub struct Assistant {
    config: Config,
    transcript: Transcript,
    notifier: StatusNotifier,
    voice: VoiceInput,
    capture: Box<dyn VoiceCapture>,
    views: ViewController,
    tasks: Box<dyn TaskStore>,
    scheduler: Scheduler,
    rng: StdRng,
    input: String,
    scroll_requested: bool,
}

impl Assistant {
    pub fn new(config: Config) -> Self {
        let mut transcript = Transcript::new();
        let views = ViewController::new(config.settings.clone(), &mut transcript);
        let notifier = StatusNotifier::new(config.status_ttl());

        Self {
            config,
            transcript,
            notifier,
            voice: VoiceInput::new(),
            capture: Box::new(SimulatedCapture::new()),
            views,
            tasks: Box::new(InMemoryTaskStore::with_demo_tasks()),
            scheduler: Scheduler::new(),
            rng: StdRng::from_entropy(),
            input: String::new(),
            scroll_requested: false,
        }
    }

    /// Make delays, fallback phrasing and simulated voice commands reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.capture = Box::new(SimulatedCapture::with_seed(seed.wrapping_add(1)));
        self
    }

    pub fn with_voice_capture(mut self, capture: Box<dyn VoiceCapture>) -> Self {
        self.capture = capture;
        self
    }

    pub fn with_task_store(mut self, tasks: Box<dyn TaskStore>) -> Self {
        self.tasks = tasks;
        self
    }

    // Message pipeline

    /// Accept a user message. Blank text is ignored entirely.
    pub fn submit(&mut self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            tracing::debug!("blank submission ignored");
            return;
        }

        self.transcript.push(Speaker::User, text);
        self.input.clear();
        self.show_status(PROCESSING_TEXT, StatusIcon::Processing);

        let delay = self.config.thinking_delay_ms.sample(&mut self.rng);
        self.scheduler.schedule(
            delay,
            Continuation::Respond {
                text: text.to_string(),
            },
        );
        tracing::info!(delay_ms = delay.as_millis() as u64, "submission accepted");
    }

    /// Submit whatever is in the input field
    pub fn submit_input(&mut self) {
        let text = self.input.clone();
        self.submit(&text);
    }

    fn respond(&mut self, text: &str) {
        let intent = classify(text);

        if let Intent::AddTask(description) = &intent {
            if !description.is_empty() {
                let task = self.tasks.add(description);
                tracing::info!(id = task.id, name = %task.name, "task added");
            }
        }

        let reply = synthesize_with(&intent, &mut self.rng);
        tracing::info!(intent = intent.kind(), "response delivered");
        self.transcript.push(Speaker::Assistant, reply);
        self.show_status(RECEIVED_TEXT, StatusIcon::Received);
        self.scroll_requested = true;
    }

    // Voice input

    /// Start a simulated capture, or cancel the one in flight
    pub fn start_listening(&mut self) {
        if let Some(timer) = self.voice.stop() {
            self.scheduler.cancel(timer);
            self.show_status(STOPPED_TEXT, StatusIcon::Stopped);
            tracing::info!("listening cancelled");
            return;
        }

        let delay = self.config.listening_delay_ms.sample(&mut self.rng);
        let timer = self.scheduler.schedule(delay, Continuation::FinishListening);
        self.voice.begin(timer);
        self.show_status(LISTENING_TEXT, StatusIcon::Listening);
        tracing::info!(delay_ms = delay.as_millis() as u64, "listening started");
    }

    fn finish_listening(&mut self, timer: TimerHandle) {
        if !self.voice.owns(timer) {
            tracing::warn!("capture timer fired after listening stopped");
            return;
        }
        self.voice.stop();

        match self.capture.transcribe() {
            Some(text) => {
                tracing::info!(%text, "voice transcript received");
                self.input = text.clone();
                self.submit(&text);
            }
            None => tracing::info!("voice capture produced no transcript"),
        }
    }

    // Status notifications

    fn show_status(&mut self, text: &str, icon: StatusIcon) {
        if let Some(superseded) = self.notifier.show(text, icon) {
            self.scheduler.cancel(superseded);
        }
        let timer = self
            .scheduler
            .schedule(self.notifier.ttl(), Continuation::HideStatus);
        self.notifier.set_hide_timer(timer);
    }

    // Views

    pub fn activate(&mut self, view: ViewState) {
        self.views.activate(view, &mut self.transcript);
    }

    pub fn current_view(&self) -> ViewState {
        self.views.current()
    }

    pub fn render(&self) -> Rendered<'_> {
        self.views.render(&self.transcript, self.tasks.as_ref())
    }

    pub fn toggle_setting(&mut self, index: usize) -> Option<&SettingControl> {
        self.views.toggle_setting(index)
    }

    /// Open the picker on the file upload panel; a no-op elsewhere
    pub fn open_file_picker(&mut self) {
        if self.views.set_picker_open(true) {
            tracing::info!("file picker opened");
            self.show_status("Opening file picker...", StatusIcon::Info);
        }
    }

    pub fn close_file_picker(&mut self) {
        self.views.set_picker_open(false);
    }

    // Timers

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Resume every continuation whose delay has elapsed, including ones
    /// scheduled by earlier continuations in the same pass. Returns how many ran.
    pub fn run_due(&mut self) -> usize {
        let now = Instant::now();
        let mut count = 0;
        while let Some((timer, continuation)) = self.scheduler.pop_due(now) {
            match continuation {
                Continuation::Respond { text } => self.respond(&text),
                Continuation::FinishListening => self.finish_listening(timer),
                Continuation::HideStatus => self.notifier.hide(),
            }
            count += 1;
        }
        count
    }

    /// Replies scheduled but not yet delivered
    pub fn pending_responses(&self) -> usize {
        self.scheduler
            .pending()
            .filter(|(_, _, c)| matches!(c, Continuation::Respond { .. }))
            .count()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // Accessors

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn status(&self) -> Option<&StatusNotification> {
        self.notifier.current()
    }

    pub fn voice_state(&self) -> VoiceState {
        self.voice.state()
    }

    pub fn is_listening(&self) -> bool {
        self.voice.is_listening()
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.list()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    /// True once after each delivered reply
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayRange;
    use crate::response::GREETING_RESPONSE;
    use std::time::Duration;

    fn fixed_config() -> Config {
        let mut config = Config::new();
        config.thinking_delay_ms = DelayRange::new(1500, 1500);
        config.listening_delay_ms = DelayRange::new(2500, 2500);
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_noop() {
        let mut assistant = Assistant::new(Config::new()).with_seed(1);
        let before = assistant.transcript().len();
        assistant.input_mut().push_str("   ");

        assistant.submit("");
        assistant.submit("   \t");
        assistant.submit_input();

        assert_eq!(assistant.transcript().len(), before);
        assert!(assistant.status().is_none());
        assert_eq!(assistant.pending_responses(), 0);
        assert_eq!(assistant.input(), "   ");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_appends_user_message_and_clears_input() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        assistant.input_mut().push_str("hello");
        assistant.submit_input();

        let last = assistant.transcript().last().unwrap();
        assert_eq!(last.speaker, Speaker::User);
        assert_eq!(last.text, "hello");
        assert!(assistant.input().is_empty());
        assert_eq!(assistant.status().unwrap().text, PROCESSING_TEXT);
        assert_eq!(assistant.pending_responses(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_delay() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        assistant.submit("hello");

        tokio::time::advance(Duration::from_millis(1499)).await;
        assistant.run_due();
        assert_eq!(assistant.transcript().last().unwrap().speaker, Speaker::User);

        tokio::time::advance(Duration::from_millis(1)).await;
        assistant.run_due();
        let last = assistant.transcript().last().unwrap();
        assert_eq!(last.speaker, Speaker::Assistant);
        assert_eq!(last.text, GREETING_RESPONSE);
        assert!(assistant.take_scroll_request());
        assert!(!assistant.take_scroll_request());
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_hides_after_ttl() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        assistant.submit("help");

        tokio::time::advance(Duration::from_millis(1500)).await;
        assistant.run_due();
        assert_eq!(assistant.status().unwrap().text, RECEIVED_TEXT);

        // the processing hide timer was superseded and must not hide "received" early
        tokio::time::advance(Duration::from_millis(2999)).await;
        assistant.run_due();
        assert!(assistant.status().is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assistant.run_due();
        assert!(assistant.status().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_task_mutates_store() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        let before = assistant.tasks().len();
        assistant.submit("add task: buy milk");

        tokio::time::advance(Duration::from_secs(2)).await;
        assistant.run_due();

        let tasks = assistant.tasks();
        assert_eq!(tasks.len(), before + 1);
        assert_eq!(tasks.last().unwrap().name, "buy milk");
        assert!(assistant.transcript().last().unwrap().text.contains("buy milk"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_task_description_adds_nothing() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        let before = assistant.tasks().len();
        assistant.submit("add task:");

        tokio::time::advance(Duration::from_secs(2)).await;
        assistant.run_due();
        assert_eq!(assistant.tasks().len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_picker_requires_upload_view() {
        let mut assistant = Assistant::new(fixed_config()).with_seed(1);
        assistant.open_file_picker();
        assert!(assistant.status().is_none());

        assistant.activate(ViewState::FileUpload);
        assistant.open_file_picker();
        assert!(matches!(
            assistant.render(),
            Rendered::FileUpload { picker_open: true, .. }
        ));
        assistant.close_file_picker();
        assert!(matches!(
            assistant.render(),
            Rendered::FileUpload { picker_open: false, .. }
        ));
    }
}

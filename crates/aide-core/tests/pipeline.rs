use std::sync::{Arc, Mutex};
use std::time::Duration;

use aide_core::notifier::{PROCESSING_TEXT, RECEIVED_TEXT, STOPPED_TEXT};
use aide_core::response::{GREETING_RESPONSE, HELP_RESPONSE};
use aide_core::view::CHAT_GREETING;
use aide_core::{
    classify, synthesize, Assistant, Config, Continuation, DelayRange, Rendered, Speaker,
    VoiceCapture, VoiceState, ViewState,
};

/// Capture that records how often it was asked for a transcript
struct CountingCapture {
    calls: Arc<Mutex<usize>>,
    reply: Option<String>,
}

impl VoiceCapture for CountingCapture {
    fn transcribe(&mut self) -> Option<String> {
        *self.calls.lock().unwrap() += 1;
        self.reply.clone()
    }
}

fn counting(reply: Option<&str>) -> (Box<CountingCapture>, Arc<Mutex<usize>>) {
    let calls = Arc::new(Mutex::new(0));
    let capture = CountingCapture {
        calls: calls.clone(),
        reply: reply.map(str::to_string),
    };
    (Box::new(capture), calls)
}

#[tokio::test(start_paused = true)]
async fn hello_end_to_end() {
    let mut assistant = Assistant::new(Config::new()).with_seed(11);
    assistant.submit("hello");
    assert_eq!(assistant.status().unwrap().text, PROCESSING_TEXT);

    // upper bound of the thinking delay
    tokio::time::advance(Duration::from_millis(3000)).await;
    assistant.run_due();

    let last = assistant.transcript().last().unwrap();
    assert_eq!(last.speaker, Speaker::Assistant);
    assert_eq!(last.text, GREETING_RESPONSE);
    assert_eq!(assistant.status().unwrap().text, RECEIVED_TEXT);
}

#[tokio::test(start_paused = true)]
async fn thinking_delay_stays_in_range() {
    for seed in 0..20 {
        let mut assistant = Assistant::new(Config::new()).with_seed(seed);
        let start = tokio::time::Instant::now();
        assistant.submit("hello");

        let deadline = assistant
            .scheduler()
            .pending()
            .find(|(_, _, c)| matches!(c, Continuation::Respond { .. }))
            .map(|(_, d, _)| d)
            .unwrap();
        let delay = deadline - start;
        assert!(delay >= Duration::from_millis(1000), "seed {}", seed);
        assert!(delay < Duration::from_millis(3000), "seed {}", seed);
    }
}

fn respond_deadline(assistant: &Assistant, text: &str) -> tokio::time::Instant {
    assistant
        .scheduler()
        .pending()
        .find(|(_, _, c)| matches!(c, Continuation::Respond { text: t } if t == text))
        .map(|(_, deadline, _)| deadline)
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn later_submission_can_be_answered_first() {
    // find a seed whose second thinking delay is the shorter one
    let mut assistant = (0..64)
        .map(|seed| {
            let mut assistant = Assistant::new(Config::new()).with_seed(seed);
            assistant.submit("hello");
            assistant.submit("help");
            assistant
        })
        .find(|a| respond_deadline(a, "help") < respond_deadline(a, "hello"))
        .expect("some seed reorders the replies");

    tokio::time::advance(Duration::from_millis(3000)).await;
    assistant.run_due();

    let texts: Vec<&str> = assistant
        .transcript()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    // submission order is kept for the user turns, deadline order for replies
    assert_eq!(
        texts[1..],
        ["hello", "help", HELP_RESPONSE, GREETING_RESPONSE]
    );
}

#[tokio::test(start_paused = true)]
async fn voice_capture_feeds_pipeline() {
    let (capture, calls) = counting(Some("show tasks"));
    let mut config = Config::new();
    config.listening_delay_ms = DelayRange::new(2500, 2500);
    config.thinking_delay_ms = DelayRange::new(1500, 1500);
    let mut assistant = Assistant::new(config).with_voice_capture(capture);

    assistant.start_listening();
    assert!(assistant.is_listening());

    tokio::time::advance(Duration::from_millis(2500)).await;
    assistant.run_due();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(assistant.voice_state(), VoiceState::Idle);
    let last = assistant.transcript().last().unwrap();
    assert_eq!(last.speaker, Speaker::User);
    assert_eq!(last.text, "show tasks");
    // submit clears the field the transcript was written into
    assert!(assistant.input().is_empty());
    assert_eq!(assistant.pending_responses(), 1);
}

#[tokio::test(start_paused = true)]
async fn second_listen_cancels_capture() {
    let (capture, calls) = counting(Some("open calculator"));
    let mut assistant = Assistant::new(Config::new())
        .with_seed(3)
        .with_voice_capture(capture);
    let before = assistant.transcript().len();

    assistant.start_listening();
    assistant.start_listening();
    assert_eq!(assistant.voice_state(), VoiceState::Idle);
    assert_eq!(assistant.status().unwrap().text, STOPPED_TEXT);

    tokio::time::advance(Duration::from_secs(10)).await;
    assistant.run_due();

    assert_eq!(*calls.lock().unwrap(), 0);
    assert!(assistant.input().is_empty());
    assert_eq!(assistant.transcript().len(), before);
}

#[tokio::test(start_paused = true)]
async fn failed_capture_changes_nothing() {
    let (capture, calls) = counting(None);
    let mut config = Config::new();
    config.listening_delay_ms = DelayRange::new(2000, 2000);
    let mut assistant = Assistant::new(config).with_voice_capture(capture);
    let before = assistant.transcript().len();

    assistant.start_listening();
    tokio::time::advance(Duration::from_millis(2000)).await;
    assistant.run_due();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(assistant.voice_state(), VoiceState::Idle);
    assert_eq!(assistant.transcript().len(), before);
    assert_eq!(assistant.pending_responses(), 0);
}

#[tokio::test(start_paused = true)]
async fn tasks_then_chat_shows_only_greeting() {
    let mut assistant = Assistant::new(Config::new()).with_seed(2);
    assistant.submit("hello");
    assistant.submit("open calculator");
    tokio::time::advance(Duration::from_millis(3000)).await;
    assistant.run_due();

    assistant.activate(ViewState::Tasks);
    assert!(matches!(assistant.render(), Rendered::Tasks { .. }));
    assistant.activate(ViewState::Chat);

    match assistant.render() {
        Rendered::Chat { messages } => {
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].text, CHAT_GREETING);
        }
        other => panic!("expected chat panel, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn reply_arriving_on_another_view_is_kept_in_history() {
    let mut assistant = Assistant::new(Config::new()).with_seed(8);
    assistant.submit("help");
    assistant.activate(ViewState::Settings);

    tokio::time::advance(Duration::from_millis(3000)).await;
    assistant.run_due();

    assert_eq!(assistant.current_view(), ViewState::Settings);
    assert_eq!(assistant.transcript().last().unwrap().speaker, Speaker::Assistant);
}

#[test]
fn every_non_blank_input_gets_a_reply() {
    let inputs = [
        "hello", "hi", "open", "open vim", "search", "search cats", "add task", "add task: x",
        "show tasks", "list tasks", "task", "help", "?", "12345", "ñandú", "   padded   ",
    ];
    for text in inputs {
        assert!(!synthesize(&classify(text)).is_empty(), "{:?}", text);
    }
}

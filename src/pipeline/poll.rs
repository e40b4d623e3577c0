// src/pipeline/poll.rs

//! The poll loop.
//!
//! One cycle runs fetch → validate → interpret → notify; failures are
//! reported to the chat, deduplicated by failure kind, and never escape the
//! cycle boundary. The loop has no terminal state besides process
//! termination.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use crate::config::Settings;
use crate::error::{AppError, FailureKind, Result};
use crate::models::HomeworkRecord;
use crate::pipeline::{interpret, validate};
use crate::services::{HomeworkApi, MessageSink};

/// Message sent when the homework list comes back empty.
const NO_SUBMISSIONS_MESSAGE: &str = "No submissions pending review.";

/// What the watcher last notified the chat about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeenStatus {
    /// The API returned an empty homework list
    NoSubmissions,
    /// A concrete status code of the tracked submission
    Status(String),
}

/// In-memory notification state. Reset only on process restart.
#[derive(Debug, Default)]
pub struct WatchState {
    /// Status the chat last heard about; updated after a delivered send
    last_status: Option<SeenStatus>,
    /// Failure kind the chat last heard about
    last_failure: Option<FailureKind>,
}

/// Polls the homework API and forwards status changes to the chat.
pub struct Watcher<'a> {
    api: &'a dyn HomeworkApi,
    sink: &'a dyn MessageSink,
    interval: Duration,
    state: WatchState,
    cursor: i64,
}

impl<'a> Watcher<'a> {
    /// Create a watcher with its cursor at the current time.
    pub fn new(api: &'a dyn HomeworkApi, sink: &'a dyn MessageSink, settings: &Settings) -> Self {
        Self {
            api,
            sink,
            interval: Duration::from_secs(settings.poll_interval_secs),
            state: WatchState::default(),
            cursor: Utc::now().timestamp(),
        }
    }

    /// Run the poll loop indefinitely.
    pub async fn run(&mut self) {
        log::info!("watcher started");
        loop {
            self.cycle().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Execute one poll cycle. Failures are reported, never propagated.
    pub async fn cycle(&mut self) {
        if let Err(error) = self.poll().await {
            self.report_failure(error).await;
        }
    }

    async fn poll(&mut self) -> Result<()> {
        let payload = self.api.fetch(self.cursor).await?;
        let homeworks = validate(&payload)?;

        // A failed cycle re-polls the same window: the cursor moves only
        // once the response has passed validation.
        self.cursor = Utc::now().timestamp();

        match homeworks.first() {
            None => self.notify_no_submissions().await,
            Some(first) => self.notify_record(first).await,
        }
    }

    async fn notify_no_submissions(&mut self) -> Result<()> {
        if self.state.last_status == Some(SeenStatus::NoSubmissions) {
            return Ok(());
        }
        self.sink.send(NO_SUBMISSIONS_MESSAGE).await?;
        self.state.last_status = Some(SeenStatus::NoSubmissions);
        Ok(())
    }

    /// Only the first record is inspected: the watcher tracks the single
    /// most recent submission.
    async fn notify_record(&mut self, first: &Value) -> Result<()> {
        let record = HomeworkRecord::from_value(first)?;
        let seen = SeenStatus::Status(record.status.clone());
        if self.state.last_status.as_ref() == Some(&seen) {
            return Ok(());
        }

        let message = interpret(&record)?;
        self.sink.send(&message).await?;
        self.state.last_status = Some(seen);
        Ok(())
    }

    /// Report a cycle failure to the chat, deduplicated by failure kind.
    ///
    /// A delivery failure is only logged: notifying about a failure to
    /// notify would recurse.
    async fn report_failure(&mut self, error: AppError) {
        log::error!("poll cycle failed: {error}");

        let kind = error.kind();
        if kind == FailureKind::Delivery {
            return;
        }
        if self.state.last_failure.as_ref() == Some(&kind) {
            return;
        }

        let message = format!("Homework watcher failure: {error}");
        match self.sink.send(&message).await {
            Ok(()) => self.state.last_failure = Some(kind),
            Err(send_error) => {
                log::error!("failed to report cycle failure to chat: {send_error}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    /// Fake API that replays a scripted sequence of responses.
    struct ScriptedApi {
        responses: Mutex<VecDeque<Result<Value>>>,
    }

    impl ScriptedApi {
        fn new(responses: Vec<Result<Value>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
            }
        }
    }

    #[async_trait]
    impl HomeworkApi for ScriptedApi {
        async fn fetch(&self, _from_date: i64) -> Result<Value> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted responses exhausted")
        }
    }

    /// Fake sink that records delivered messages and can be made to fail.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
        failing: AtomicBool,
    }

    impl RecordingSink {
        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, text: &str) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(AppError::delivery("chat unreachable"));
            }
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn payload(status: &str) -> Result<Value> {
        Ok(json!({
            "homeworks": [{"homework_name": "hw1", "status": status}],
            "current_date": 1000,
        }))
    }

    fn empty_payload() -> Result<Value> {
        Ok(json!({"homeworks": [], "current_date": 1000}))
    }

    fn make_watcher<'a>(api: &'a ScriptedApi, sink: &'a RecordingSink) -> Watcher<'a> {
        Watcher::new(api, sink, &Settings::default())
    }

    #[tokio::test]
    async fn test_status_change_notified_once() {
        let api = ScriptedApi::new(vec![
            payload("reviewing"),
            payload("reviewing"),
            payload("reviewing"),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);
        watcher.cursor = 0;

        for _ in 0..3 {
            watcher.cycle().await;
        }

        assert_eq!(
            sink.sent(),
            vec![
                "Status changed for submission \"hw1\". Работа взята на проверку ревьюером."
                    .to_string()
            ]
        );
        assert!(watcher.cursor > 0, "cursor advances on success");
    }

    #[tokio::test]
    async fn test_each_transition_notified() {
        let api = ScriptedApi::new(vec![
            payload("reviewing"),
            payload("approved"),
            payload("approved"),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        for _ in 0..3 {
            watcher.cycle().await;
        }

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("Работа взята на проверку"));
        assert!(sent[1].contains("ревьюеру всё понравилось"));
    }

    #[tokio::test]
    async fn test_empty_list_notified_once() {
        let api = ScriptedApi::new(vec![empty_payload(), empty_payload()]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        watcher.cycle().await;
        watcher.cycle().await;

        assert_eq!(sink.sent(), vec![NO_SUBMISSIONS_MESSAGE.to_string()]);
    }

    #[tokio::test]
    async fn test_empty_then_submission() {
        let api = ScriptedApi::new(vec![empty_payload(), payload("reviewing")]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        watcher.cycle().await;
        watcher.cycle().await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], NO_SUBMISSIONS_MESSAGE);
        assert!(sent[1].contains("hw1"));
    }

    #[tokio::test]
    async fn test_failure_kinds_deduplicated() {
        // Kinds A, A, B, A: cycle 2 is suppressed, cycle 4 reports again
        // because the last notified kind was B.
        let api = ScriptedApi::new(vec![
            Err(AppError::BadStatus(503)),
            Err(AppError::BadStatus(503)),
            Err(AppError::HomeworksFieldMissing),
            Err(AppError::BadStatus(503)),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        for _ in 0..4 {
            watcher.cycle().await;
        }

        let sent = sink.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].contains("HTTP status 503"));
        assert!(sent[1].contains("homeworks"));
        assert!(sent[2].contains("HTTP status 503"));
    }

    #[tokio::test]
    async fn test_unknown_codes_notified_per_code() {
        let api = ScriptedApi::new(vec![
            payload("graded"),
            payload("graded"),
            payload("queued"),
            payload("graded"),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        for _ in 0..4 {
            watcher.cycle().await;
        }

        let sent = sink.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent[0].contains("`graded`"));
        assert!(sent[1].contains("`queued`"));
        assert!(sent[2].contains("`graded`"));
    }

    #[tokio::test]
    async fn test_failed_cycle_keeps_cursor() {
        let api = ScriptedApi::new(vec![Err(AppError::BadStatus(503))]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);
        watcher.cursor = 42;

        watcher.cycle().await;

        assert_eq!(watcher.cursor, 42, "cursor unchanged on failure");
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_record_missing_key_reported() {
        let api = ScriptedApi::new(vec![
            Ok(json!({"homeworks": [{}], "current_date": 1000})),
            Ok(json!({"homeworks": [{}], "current_date": 1000})),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        watcher.cycle().await;
        watcher.cycle().await;

        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("homework_name"));
    }

    #[tokio::test]
    async fn test_delivery_failure_logged_not_renotified() {
        let api = ScriptedApi::new(vec![payload("reviewing"), payload("reviewing")]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        // First cycle: the status send fails; nothing may be delivered and
        // no diagnostic notification may be attempted for it.
        sink.set_failing(true);
        watcher.cycle().await;
        assert!(sink.sent().is_empty());

        // The status was never notified, so the next observation retries.
        sink.set_failing(false);
        watcher.cycle().await;
        assert_eq!(sink.sent().len(), 1);
        assert!(sink.sent()[0].contains("hw1"));
    }

    #[tokio::test]
    async fn test_failed_diagnostic_send_retried_next_cycle() {
        let api = ScriptedApi::new(vec![
            Err(AppError::BadStatus(503)),
            Err(AppError::BadStatus(503)),
        ]);
        let sink = RecordingSink::default();
        let mut watcher = make_watcher(&api, &sink);

        sink.set_failing(true);
        watcher.cycle().await;
        assert!(sink.sent().is_empty());

        // The kind was never delivered, so it is not considered notified.
        sink.set_failing(false);
        watcher.cycle().await;
        assert_eq!(sink.sent().len(), 1);
    }
}

//! View Controller
//!
//! Holds the state a front end renders (summary, input text, conversation
//! history) and dispatches the two backend calls. Every call is fire and
//! forget: it spawns a task and returns its handle immediately. Dropping
//! the handle detaches the task; nothing is ever cancelled.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::{Exchange, InsightsBackend, Summary};

const EVENT_CAPACITY: usize = 256;

/// State change announced to renderers
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// The summary was replaced
    SummaryLoaded(Summary),
    /// An exchange was appended to the history
    ExchangeAppended(Exchange),
}

#[derive(Debug, Default)]
struct ViewState {
    summary: Summary,
    query: String,
    history: Vec<Exchange>,
}

/// Mediates between user input and the insights backend
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ViewController {
    backend: Arc<dyn InsightsBackend>,
    state: Arc<RwLock<ViewState>>,
    events: broadcast::Sender<ViewEvent>,
}

impl ViewController {
    /// Create a controller with empty state and start loading the summary
    ///
    /// Must be called from within a tokio runtime. Returns the controller
    /// and the handle of the summary load.
    pub fn initialize(backend: Arc<dyn InsightsBackend>) -> (Self, JoinHandle<()>) {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let controller = Self {
            backend,
            state: Arc::new(RwLock::new(ViewState::default())),
            events,
        };

        let summary_load = controller.load_summary();
        (controller, summary_load)
    }

    /// Fetch the summary and replace the current one on success
    ///
    /// Failures are logged and leave the summary untouched.
    pub fn load_summary(&self) -> JoinHandle<()> {
        let controller = self.clone();

        tokio::spawn(async move {
            match controller.backend.fetch_summary().await {
                Ok(summary) => {
                    tracing::debug!(keys = summary.len(), "Summary loaded");
                    controller.write().summary = summary.clone();
                    let _ = controller.events.send(ViewEvent::SummaryLoaded(summary));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load summary");
                }
            }
        })
    }

    /// Submit the current query
    ///
    /// An empty query is a no-op and returns `None`. Otherwise the input is
    /// cleared before the request is dispatched, so several queries may be
    /// in flight at once; each appends exactly one exchange when it
    /// completes, in completion order.
    pub fn send_query(&self) -> Option<JoinHandle<()>> {
        let query = {
            let mut state = self.write();
            if state.query.is_empty() {
                return None;
            }
            std::mem::take(&mut state.query)
        };

        let controller = self.clone();
        Some(tokio::spawn(async move {
            let answer = match controller.backend.ask(&query).await {
                Ok(answer) => answer,
                Err(e) => {
                    tracing::error!(error = %e, query = %query, "Chat request failed");
                    e.user_message().to_string()
                }
            };

            let exchange = Exchange::new(query, answer);
            controller.write().history.push(exchange.clone());
            let _ = controller.events.send(ViewEvent::ExchangeAppended(exchange));
        }))
    }

    /// Replace the unsent input text
    pub fn set_query(&self, text: impl Into<String>) {
        self.write().query = text.into();
    }

    /// Current unsent input text
    pub fn query(&self) -> String {
        self.read().query.clone()
    }

    /// Snapshot of the current summary
    pub fn summary(&self) -> Summary {
        self.read().summary.clone()
    }

    /// Snapshot of the conversation history
    pub fn history(&self) -> Vec<Exchange> {
        self.read().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.read().history.len()
    }

    /// Receive state changes made after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    // Critical sections never await and never panic, so a poisoned lock
    // still holds consistent state.
    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientError, FALLBACK_ERROR_MESSAGE};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    /// Backend with canned results and call counters
    struct FakeBackend {
        summary: Mutex<Vec<Result<Summary, ClientError>>>,
        answers: Mutex<HashMap<String, Result<String, ClientError>>>,
        summary_calls: AtomicUsize,
        ask_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                summary: Mutex::new(Vec::new()),
                answers: Mutex::new(HashMap::new()),
                summary_calls: AtomicUsize::new(0),
                ask_calls: AtomicUsize::new(0),
            }
        }

        fn with_summary(self, result: Result<Summary, ClientError>) -> Self {
            self.summary.lock().unwrap().push(result);
            self
        }

        fn with_answer(self, query: &str, result: Result<String, ClientError>) -> Self {
            self.answers
                .lock()
                .unwrap()
                .insert(query.to_string(), result);
            self
        }
    }

    #[async_trait]
    impl InsightsBackend for FakeBackend {
        async fn fetch_summary(&self) -> Result<Summary, ClientError> {
            self.summary_calls.fetch_add(1, Ordering::SeqCst);
            let mut queued = self.summary.lock().unwrap();
            if queued.is_empty() {
                Err(ClientError::Unavailable)
            } else {
                queued.remove(0)
            }
        }

        async fn ask(&self, query: &str) -> Result<String, ClientError> {
            self.ask_calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .unwrap()
                .remove(query)
                .unwrap_or_else(|| Ok(format!("answer to {}", query)))
        }
    }

    /// Backend whose chat replies are released by the test
    struct GatedBackend {
        gates: Mutex<HashMap<String, oneshot::Receiver<String>>>,
    }

    #[async_trait]
    impl InsightsBackend for GatedBackend {
        async fn fetch_summary(&self) -> Result<Summary, ClientError> {
            Ok(Summary::new())
        }

        async fn ask(&self, query: &str) -> Result<String, ClientError> {
            let gate = self.gates.lock().unwrap().remove(query);
            match gate {
                Some(rx) => rx.await.map_err(|_| ClientError::Unavailable),
                None => Err(ClientError::Unavailable),
            }
        }
    }

    fn summary_of(value: serde_json::Value) -> Summary {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_initialize_loads_summary() {
        let backend = Arc::new(
            FakeBackend::new().with_summary(Ok(summary_of(json!({"a": 1, "b": 2})))),
        );
        let (controller, load) = ViewController::initialize(backend.clone());

        assert_eq!(controller.query(), "");
        assert!(controller.history().is_empty());

        load.await.unwrap();
        assert_eq!(controller.summary(), summary_of(json!({"a": 1, "b": 2})));
        assert_eq!(backend.summary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_summary_replaced_not_merged() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_summary(Ok(summary_of(json!({"a": 1, "b": 2}))))
                .with_summary(Ok(summary_of(json!({"c": 3})))),
        );
        let (controller, load) = ViewController::initialize(backend);
        load.await.unwrap();

        controller.load_summary().await.unwrap();
        assert_eq!(controller.summary(), summary_of(json!({"c": 3})));
    }

    #[tokio::test]
    async fn test_summary_failure_leaves_state_unchanged() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_summary(Ok(summary_of(json!({"a": 1}))))
                .with_summary(Err(ClientError::Api {
                    status: 500,
                    message: Some("boom".to_string()),
                })),
        );
        let (controller, load) = ViewController::initialize(backend);
        load.await.unwrap();

        controller.load_summary().await.unwrap();
        assert_eq!(controller.summary(), summary_of(json!({"a": 1})));
        assert!(controller.history().is_empty());
    }

    #[tokio::test]
    async fn test_send_query_clears_input_synchronously() {
        let backend = Arc::new(FakeBackend::new());
        let (controller, _) = ViewController::initialize(backend);

        controller.set_query("how many orders shipped late?");
        let handle = controller.send_query().expect("query should be sent");
        assert_eq!(controller.query(), "");

        handle.await.unwrap();
        assert_eq!(
            controller.history(),
            vec![Exchange::new(
                "how many orders shipped late?",
                "answer to how many orders shipped late?"
            )]
        );
    }

    #[tokio::test]
    async fn test_empty_query_is_noop() {
        let backend = Arc::new(FakeBackend::new());
        let (controller, load) = ViewController::initialize(backend.clone());
        load.await.unwrap();

        assert!(controller.send_query().is_none());
        assert_eq!(controller.query(), "");
        assert!(controller.history().is_empty());
        assert_eq!(backend.ask_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_query_is_sent() {
        let backend = Arc::new(FakeBackend::new());
        let (controller, _) = ViewController::initialize(backend.clone());

        controller.set_query(" ");
        controller.send_query().unwrap().await.unwrap();
        assert_eq!(backend.ask_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.history()[0].query, " ");
    }

    #[tokio::test]
    async fn test_chat_error_message_surfaces() {
        let backend = Arc::new(FakeBackend::new().with_answer(
            "q",
            Err(ClientError::Api {
                status: 429,
                message: Some("rate limited".to_string()),
            }),
        ));
        let (controller, _) = ViewController::initialize(backend);

        controller.set_query("q");
        controller.send_query().unwrap().await.unwrap();
        assert_eq!(controller.history(), vec![Exchange::new("q", "rate limited")]);
    }

    #[tokio::test]
    async fn test_chat_error_without_body_uses_fallback() {
        let backend = Arc::new(FakeBackend::new().with_answer("q", Err(ClientError::Timeout)));
        let (controller, _) = ViewController::initialize(backend);

        controller.set_query("q");
        controller.send_query().unwrap().await.unwrap();
        assert_eq!(
            controller.history(),
            vec![Exchange::new("q", FALLBACK_ERROR_MESSAGE)]
        );
    }

    #[tokio::test]
    async fn test_history_appended_in_completion_order() {
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        let backend = Arc::new(GatedBackend {
            gates: Mutex::new(HashMap::from([
                ("first".to_string(), first_rx),
                ("second".to_string(), second_rx),
            ])),
        });
        let (controller, _) = ViewController::initialize(backend);

        controller.set_query("first");
        let first = controller.send_query().unwrap();
        controller.set_query("second");
        let second = controller.send_query().unwrap();
        assert_eq!(controller.history_len(), 0);

        second_tx.send("two".to_string()).unwrap();
        second.await.unwrap();
        first_tx.send("one".to_string()).unwrap();
        first.await.unwrap();

        assert_eq!(
            controller.history(),
            vec![Exchange::new("second", "two"), Exchange::new("first", "one")]
        );
    }

    #[tokio::test]
    async fn test_history_never_shrinks() {
        let backend = Arc::new(
            FakeBackend::new()
                .with_summary(Ok(summary_of(json!({"a": 1}))))
                .with_answer("bad", Err(ClientError::Unavailable)),
        );
        let (controller, load) = ViewController::initialize(backend);
        load.await.unwrap();

        let mut last_len = 0;
        for query in ["one", "", "bad", "two", ""] {
            controller.set_query(query);
            if let Some(handle) = controller.send_query() {
                handle.await.unwrap();
            }
            controller.load_summary().await.unwrap();

            let len = controller.history_len();
            assert!(len >= last_len);
            last_len = len;
        }
        assert_eq!(last_len, 3);
    }

    #[tokio::test]
    async fn test_events_announce_changes() {
        let backend = Arc::new(FakeBackend::new());
        let (controller, load) = ViewController::initialize(backend);
        load.await.unwrap();

        let mut events = controller.subscribe();
        controller.set_query("q");
        controller.send_query().unwrap().await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            ViewEvent::ExchangeAppended(Exchange::new("q", "answer to q"))
        );
    }

    #[tokio::test]
    async fn test_dropped_handle_still_completes() {
        let backend = Arc::new(FakeBackend::new());
        let (controller, _) = ViewController::initialize(backend);
        let mut events = controller.subscribe();

        controller.set_query("detached");
        drop(controller.send_query());

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            ViewEvent::ExchangeAppended(Exchange::new("detached", "answer to detached"))
        );
        assert_eq!(controller.history_len(), 1);
    }
}

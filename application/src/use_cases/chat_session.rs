//! Chat session use case.
//!
//! A [`ChatSession`] is one chat widget's conversation with the interview
//! coach. It owns the conversation history and offers three ways to ask:
//!
//! - [`send_streaming`](ChatSession::send_streaming): opens the server-push
//!   stream and reports the answer fragment by fragment to a
//!   [`StreamObserver`]
//! - [`send_non_streaming`](ChatSession::send_non_streaming): one request,
//!   one reply, with a canned answer when the backend is unreachable
//! - [`send`](ChatSession::send): the stream first, then the single request
//!   if the stream could not be reached
//!
//! Every path tries the primary backend first and, on a transport failure,
//! the [`EndpointPlan`]'s alternate exactly once.

use crate::config::{ChatClientConfig, EndpointError, EndpointPlan};
use crate::error::ChatError;
use crate::ports::chat_transport::{
    AskReply, AskRequest, ChatTransport, StreamRequest, TransportError,
};
use crate::ports::conversation_logger::{
    ChatMode, ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::stream_observer::StreamObserver;
use crate::ports::token_store::TokenStore;
use crate::use_cases::stream_assembler::{AssemblerStep, StreamAssembler};
use futures::StreamExt;
use hiremate_domain::util::preview;
use hiremate_domain::{ConversationHistory, ConversationTurn, Question, fallback_reply};
use std::sync::Arc;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How a [`ChatSession::send`] answer reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    /// Delivered fragment by fragment through the observer.
    Streamed(String),
    /// The stream was unavailable; this reply came from the ask path and
    /// has not been shown yet.
    Asked(String),
}

impl ChatReply {
    pub fn text(&self) -> &str {
        match self {
            ChatReply::Streamed(text) | ChatReply::Asked(text) => text,
        }
    }
}

/// One chat widget's session with the coach.
///
/// Sessions are independent: two widgets on one screen each construct their
/// own and never see each other's history.
pub struct ChatSession {
    transport: Arc<dyn ChatTransport>,
    token_store: Arc<dyn TokenStore>,
    config: ChatClientConfig,
    endpoints: EndpointPlan,
    history: ConversationHistory,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        token_store: Arc<dyn TokenStore>,
        config: ChatClientConfig,
    ) -> Result<Self, EndpointError> {
        let endpoints = EndpointPlan::from_config(&config)?;
        Ok(Self {
            transport,
            token_store,
            config,
            endpoints,
            history: ConversationHistory::new(),
            conversation_logger: Arc::new(NoConversationLogger),
        })
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &EndpointPlan {
        &self.endpoints
    }

    /// Ask over the server-push stream.
    ///
    /// Fragments are reported through `observer.on_chunk` as they arrive.
    /// Exactly one of `on_complete`/`on_error` is then called, and the same
    /// outcome is returned. The whole exchange must finish within
    /// `stream_timeout`; cancelling `cancel` closes the stream without
    /// notifying the backend.
    pub async fn send_streaming(
        &mut self,
        question: &Question,
        observer: &mut dyn StreamObserver,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        self.stream_exchange(question, observer, cancel).await.0
    }

    /// Ask over the stream, falling back to the single-request endpoint.
    ///
    /// When the stream fails at the transport level (or times out) before
    /// any fragment reached `observer`, the question is re-sent through the
    /// ask path and its reply, canned if need be, is returned as
    /// [`ChatReply::Asked`]. The observer still sees exactly one terminal
    /// call for the stream.
    pub async fn send(
        &mut self,
        question: &Question,
        observer: &mut dyn StreamObserver,
        cancel: &CancellationToken,
    ) -> Result<ChatReply, ChatError> {
        let ask_request = self.ask_request(question);

        match self.stream_exchange(question, observer, cancel).await {
            (Ok(text), _) => Ok(ChatReply::Streamed(text)),
            (Err(e), false) if e.allows_ask_fallback() => {
                info!("Stream unavailable ({}), asking without streaming", e);
                self.conversation_logger.log(ConversationEvent::question_sent(
                    ChatMode::Ask,
                    question.content(),
                    ask_request.history.len(),
                ));
                Ok(ChatReply::Asked(
                    self.complete_ask(question, &ask_request).await,
                ))
            }
            (Err(e), _) => Err(e),
        }
    }

    /// Runs one streaming exchange; the flag reports whether any fragment
    /// was delivered to the observer.
    async fn stream_exchange(
        &mut self,
        question: &Question,
        observer: &mut dyn StreamObserver,
        cancel: &CancellationToken,
    ) -> (Result<String, ChatError>, bool) {
        let request = StreamRequest {
            question: question.content().to_string(),
            history: self
                .history
                .recent(self.config.stream_history_window)
                .to_vec(),
            token: self.token_store.load(),
        };
        self.history.push(ConversationTurn::user(question.content()));

        info!("Streaming question: {}", preview(question.content(), 80));
        self.conversation_logger.log(ConversationEvent::question_sent(
            ChatMode::Stream,
            question.content(),
            request.history.len(),
        ));

        let mut assembler = StreamAssembler::new(self.config.max_consecutive_parse_failures);
        let result = self
            .run_stream(&request, &mut assembler, observer, cancel)
            .await;

        match &result {
            Ok(text) => {
                observer.on_complete(text);
                self.history.push(ConversationTurn::bot(text.clone()));
                self.conversation_logger
                    .log(ConversationEvent::answer_completed(ChatMode::Stream, text.len()));
            }
            Err(e) => {
                warn!("Streaming chat failed: {}", e);
                observer.on_error(e);
                self.conversation_logger
                    .log(ConversationEvent::answer_failed(ChatMode::Stream, &e.reason()));
            }
        }

        (result, assembler.has_delivered())
    }

    async fn run_stream(
        &self,
        request: &StreamRequest,
        assembler: &mut StreamAssembler,
        observer: &mut dyn StreamObserver,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        let deadline = sleep_until(Instant::now() + self.config.stream_timeout);
        tokio::pin!(deadline);

        let candidates = self.endpoints.candidates();

        for (attempt, base_url) in candidates.iter().copied().enumerate() {
            debug!("Opening chat stream at {}", base_url);

            let opened = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                _ = &mut deadline => return Err(ChatError::Timeout),
                opened = self.transport.open_stream(base_url, request) => opened,
            };

            let failure = match opened {
                Ok(mut stream) => loop {
                    let item = tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                        _ = &mut deadline => return Err(ChatError::Timeout),
                        item = stream.next() => item,
                    };

                    match item {
                        Some(Ok(data)) => match assembler.accept(&data) {
                            AssemblerStep::Connected => debug!("Chat stream connected"),
                            AssemblerStep::Chunk(fragment) => {
                                observer.on_chunk(&fragment, assembler.text())
                            }
                            AssemblerStep::Skipped(e) => {
                                warn!("Skipping malformed chat event: {}", e)
                            }
                            AssemblerStep::Done => return Ok(assembler.text().to_string()),
                            AssemblerStep::Failed(e) => return Err(e),
                        },
                        Some(Err(e)) => break e,
                        None => {
                            break TransportError::Dropped(
                                "stream closed before completion".to_string(),
                            );
                        }
                    }
                },
                Err(e) => e,
            };

            // Retrying after fragments were shown would repeat them.
            let has_next = attempt + 1 < candidates.len();
            if !has_next || assembler.has_delivered() || !failure.is_retryable() {
                return Err(ChatError::Transport(failure));
            }
            warn!(
                "Chat stream at {} failed ({}), retrying against alternate",
                base_url, failure
            );
        }

        Err(ChatError::Transport(TransportError::Connect(
            "no endpoint configured".to_string(),
        )))
    }

    /// Ask with a single request and wait for the whole reply.
    ///
    /// Never fails: if no backend answers, a canned reply chosen by keyword
    /// is returned instead.
    pub async fn send_non_streaming(&mut self, question: &Question) -> String {
        let request = self.ask_request(question);
        self.history.push(ConversationTurn::user(question.content()));

        info!("Asking question: {}", preview(question.content(), 80));
        self.conversation_logger.log(ConversationEvent::question_sent(
            ChatMode::Ask,
            question.content(),
            request.history.len(),
        ));

        self.complete_ask(question, &request).await
    }

    /// Build the ask request from the history as it stands before `question`.
    fn ask_request(&self, question: &Question) -> AskRequest {
        AskRequest {
            question: question.content().to_string(),
            history: self
                .history
                .as_ask_messages(self.config.ask_history_window),
            token: self.token_store.load(),
        }
    }

    /// Send `request` and record the reply; the user turn is already recorded.
    async fn complete_ask(&mut self, question: &Question, request: &AskRequest) -> String {
        let reply = match self.ask_with_failover(request).await {
            Ok(reply) => {
                self.conversation_logger
                    .log(ConversationEvent::answer_completed(ChatMode::Ask, reply.text.len()));
                reply.text
            }
            Err(e) => {
                warn!("Chat request failed, using fallback reply: {}", e);
                self.conversation_logger
                    .log(ConversationEvent::fallback_used(&e.to_string()));
                fallback_reply(question.content()).to_string()
            }
        };

        self.history.push(ConversationTurn::bot(reply.clone()));
        reply
    }

    async fn ask_with_failover(&self, request: &AskRequest) -> Result<AskReply, TransportError> {
        let candidates = self.endpoints.candidates();
        let mut last_error = TransportError::Connect("no endpoint configured".to_string());

        for (attempt, base_url) in candidates.iter().copied().enumerate() {
            debug!("Sending chat request to {}", base_url);
            let outcome = tokio::time::timeout(
                self.config.request_timeout,
                self.transport.ask(base_url, request),
            )
            .await
            .unwrap_or(Err(TransportError::TimedOut));

            match outcome {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() && attempt + 1 < candidates.len() => {
                    warn!(
                        "Chat request to {} failed ({}), retrying against alternate",
                        base_url, e
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::token_store::NoTokenStore;
    use async_trait::async_trait;
    use futures::stream;
    use hiremate_domain::{ChatEvent, FallbackTopic, Sender};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use url::Url;

    #[derive(Clone)]
    enum Script {
        Refuse(TransportError),
        Events {
            items: Vec<Result<String, TransportError>>,
            hang: bool,
        },
    }

    #[derive(Default)]
    struct ScriptedTransport {
        streams: Mutex<HashMap<String, Script>>,
        asks: Mutex<HashMap<String, Result<AskReply, TransportError>>>,
        stream_calls: Mutex<Vec<(String, StreamRequest)>>,
        ask_calls: Mutex<Vec<(String, AskRequest)>>,
    }

    fn key(url: &str) -> String {
        Url::parse(url).unwrap().to_string()
    }

    fn chunk(s: &str) -> Result<String, TransportError> {
        Ok(ChatEvent::Chunk(s.to_string()).to_payload())
    }

    fn event(e: ChatEvent) -> Result<String, TransportError> {
        Ok(e.to_payload())
    }

    impl ScriptedTransport {
        fn stream(self, url: &str, script: Script) -> Self {
            self.streams.lock().unwrap().insert(key(url), script);
            self
        }

        fn answer(self, url: &str, reply: Result<&str, TransportError>) -> Self {
            let reply = reply.map(|text| AskReply {
                text: text.to_string(),
            });
            self.asks.lock().unwrap().insert(key(url), reply);
            self
        }

        fn stream_urls(&self) -> Vec<String> {
            self.stream_calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }

        fn ask_urls(&self) -> Vec<String> {
            self.ask_calls
                .lock()
                .unwrap()
                .iter()
                .map(|(url, _)| url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn open_stream(
            &self,
            base_url: &Url,
            request: &StreamRequest,
        ) -> Result<crate::EventStream, TransportError> {
            self.stream_calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), request.clone()));
            let script = self
                .streams
                .lock()
                .unwrap()
                .get(base_url.as_str())
                .cloned()
                .unwrap_or(Script::Refuse(TransportError::Connect(
                    "connection refused".to_string(),
                )));
            match script {
                Script::Refuse(e) => Err(e),
                Script::Events { items, hang: false } => Ok(stream::iter(items).boxed()),
                Script::Events { items, hang: true } => {
                    Ok(stream::iter(items).chain(stream::pending()).boxed())
                }
            }
        }

        async fn ask(
            &self,
            base_url: &Url,
            request: &AskRequest,
        ) -> Result<AskReply, TransportError> {
            self.ask_calls
                .lock()
                .unwrap()
                .push((base_url.to_string(), request.clone()));
            self.asks
                .lock()
                .unwrap()
                .get(base_url.as_str())
                .cloned()
                .unwrap_or(Err(TransportError::Connect(
                    "connection refused".to_string(),
                )))
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        chunks: Vec<(String, String)>,
        completed: Vec<String>,
        errors: Vec<ChatError>,
    }

    impl RecordingObserver {
        fn terminal_calls(&self) -> usize {
            self.completed.len() + self.errors.len()
        }
    }

    impl StreamObserver for RecordingObserver {
        fn on_chunk(&mut self, fragment: &str, running_total: &str) {
            self.chunks
                .push((fragment.to_string(), running_total.to_string()));
        }

        fn on_complete(&mut self, full_text: &str) {
            self.completed.push(full_text.to_string());
        }

        fn on_error(&mut self, error: &ChatError) {
            self.errors.push(error.clone());
        }
    }

    struct FixedToken;

    impl TokenStore for FixedToken {
        fn load(&self) -> Option<String> {
            Some("jwt-123".to_string())
        }
    }

    fn session(transport: Arc<ScriptedTransport>, base_url: &str) -> ChatSession {
        ChatSession::new(
            transport,
            Arc::new(NoTokenStore),
            ChatClientConfig::default().with_base_url(base_url),
        )
        .unwrap()
    }

    fn question(s: &str) -> Question {
        Question::parse(s).unwrap()
    }

    #[tokio::test]
    async fn chunks_assemble_into_completed_answer() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![
                    event(ChatEvent::Connected),
                    chunk("Use "),
                    chunk("the STAR "),
                    chunk("method."),
                    event(ChatEvent::Done),
                ],
                hang: false,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(
                &question("How do I answer?"),
                &mut observer,
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.unwrap(), "Use the STAR method.");
        assert_eq!(observer.completed, vec!["Use the STAR method.".to_string()]);
        assert!(observer.errors.is_empty());
        assert_eq!(
            observer.chunks,
            vec![
                ("Use ".to_string(), "Use ".to_string()),
                ("the STAR ".to_string(), "Use the STAR ".to_string()),
                ("method.".to_string(), "Use the STAR method.".to_string()),
            ]
        );

        let turns = chat.history().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, Sender::User);
        assert_eq!(turns[1].sender, Sender::Bot);
        assert_eq!(turns[1].text, "Use the STAR method.");
    }

    #[tokio::test]
    async fn upstream_error_event_reports_once() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![
                    chunk("partial"),
                    event(ChatEvent::Error("Insufficient credits".to_string())),
                    chunk("ignored"),
                ],
                hang: false,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert_eq!(
            result,
            Err(ChatError::Upstream("Insufficient credits".to_string()))
        );
        assert_eq!(observer.terminal_calls(), 1);
        assert_eq!(observer.chunks.len(), 1);
        // Only the user's turn is recorded
        assert_eq!(chat.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_stream_times_out_after_budget() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![event(ChatEvent::Connected), chunk("Thinking")],
                hang: true,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();
        let start = Instant::now();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert_eq!(result, Err(ChatError::Timeout));
        assert!(start.elapsed() >= Duration::from_secs(30));
        assert_eq!(observer.errors, vec![ChatError::Timeout]);
        assert_eq!(observer.errors[0].reason(), "timeout");
        assert!(observer.completed.is_empty());
        assert_eq!(observer.chunks.len(), 1);
    }

    #[tokio::test]
    async fn local_transport_failure_retries_alternate_port_once() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://localhost:5000",
            Script::Events {
                items: vec![chunk("ok"), event(ChatEvent::Done)],
                hang: false,
            },
        ));
        let mut chat = session(transport.clone(), "http://localhost:5001");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(
            transport.stream_urls(),
            vec![key("http://localhost:5001"), key("http://localhost:5000")]
        );
    }

    #[tokio::test]
    async fn local_failure_on_both_ports_reports_single_error() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut chat = session(transport.clone(), "http://localhost:5001");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ChatError::Transport(_))));
        assert_eq!(transport.stream_urls().len(), 2);
        assert_eq!(observer.terminal_calls(), 1);
        assert_eq!(observer.errors.len(), 1);
    }

    #[tokio::test]
    async fn remote_transport_failure_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut chat = session(transport.clone(), "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(ChatError::Transport(_))));
        assert_eq!(transport.stream_urls(), vec![key("http://api.example.com")]);
    }

    #[tokio::test]
    async fn failure_after_delivered_chunks_is_not_retried() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .stream(
                    "http://localhost:5001",
                    Script::Events {
                        items: vec![
                            chunk("Half an "),
                            Err(TransportError::Dropped("reset by peer".to_string())),
                        ],
                        hang: false,
                    },
                )
                .stream(
                    "http://localhost:5000",
                    Script::Events {
                        items: vec![chunk("Full answer"), event(ChatEvent::Done)],
                        hang: false,
                    },
                ),
        );
        let mut chat = session(transport.clone(), "http://localhost:5001");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert_eq!(
            result,
            Err(ChatError::Transport(TransportError::Dropped(
                "reset by peer".to_string()
            )))
        );
        assert_eq!(transport.stream_urls().len(), 1);
        assert_eq!(observer.chunks.len(), 1);
        assert_eq!(observer.terminal_calls(), 1);
    }

    #[tokio::test]
    async fn stream_closed_without_terminal_event_is_an_error() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![chunk("dangling")],
                hang: false,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(ChatError::Transport(TransportError::Dropped(_)))
        ));
        assert!(observer.completed.is_empty());
        assert_eq!(observer.errors.len(), 1);
    }

    #[tokio::test]
    async fn malformed_events_are_skipped() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![
                    chunk("a"),
                    Ok("{not json".to_string()),
                    Ok(r#"{"type":"ping"}"#.to_string()),
                    chunk("b"),
                    event(ChatEvent::Done),
                ],
                hang: false,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &CancellationToken::new())
            .await;

        assert_eq!(result.unwrap(), "ab");
        assert_eq!(observer.completed, vec!["ab".to_string()]);
    }

    #[tokio::test]
    async fn cancellation_reports_cancelled() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![],
                hang: true,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = chat
            .send_streaming(&question("hi"), &mut observer, &cancel)
            .await;

        assert_eq!(result, Err(ChatError::Cancelled));
        assert_eq!(observer.errors, vec![ChatError::Cancelled]);
        assert!(observer.completed.is_empty());
    }

    #[tokio::test]
    async fn history_windows_are_bounded() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .answer("http://api.example.com", Ok("noted"))
                .stream(
                    "http://api.example.com",
                    Script::Events {
                        items: vec![event(ChatEvent::Done)],
                        hang: false,
                    },
                ),
        );
        let mut chat = session(transport.clone(), "http://api.example.com");

        for i in 0..7 {
            chat.send_non_streaming(&question(&format!("question {i}")))
                .await;
        }
        chat.send_streaming(
            &question("last"),
            &mut RecordingObserver::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let ask_calls = transport.ask_calls.lock().unwrap();
        assert_eq!(ask_calls.last().unwrap().1.history.len(), 10);
        assert_eq!(ask_calls[1].1.history.len(), 2);

        let stream_calls = transport.stream_calls.lock().unwrap();
        let sent = &stream_calls[0].1;
        assert_eq!(sent.history.len(), 5);
        // Most recent turn is the last bot reply, not the question being sent
        assert_eq!(sent.history[4].sender, Sender::Bot);
        assert_eq!(sent.history[3].text, "question 6");
    }

    #[tokio::test]
    async fn non_streaming_returns_backend_reply() {
        let transport = Arc::new(
            ScriptedTransport::default().answer("http://api.example.com", Ok("Be concise.")),
        );
        let mut chat = ChatSession::new(
            transport.clone(),
            Arc::new(FixedToken),
            ChatClientConfig::default().with_base_url("http://api.example.com"),
        )
        .unwrap();

        let reply = chat.send_non_streaming(&question("Any tips?")).await;

        assert_eq!(reply, "Be concise.");
        let calls = transport.ask_calls.lock().unwrap();
        assert_eq!(calls[0].1.token.as_deref(), Some("jwt-123"));
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn non_streaming_retries_local_alternate() {
        let transport = Arc::new(
            ScriptedTransport::default().answer("http://localhost:5000", Ok("from 5000")),
        );
        let mut chat = session(transport.clone(), "http://localhost:5001");

        let reply = chat.send_non_streaming(&question("Any tips?")).await;

        assert_eq!(reply, "from 5000");
        assert_eq!(
            transport.ask_urls(),
            vec![key("http://localhost:5001"), key("http://localhost:5000")]
        );
    }

    #[tokio::test]
    async fn non_streaming_falls_back_to_canned_reply() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut chat = session(transport.clone(), "http://api.example.com");

        let reply = chat.send_non_streaming(&question("hello coach")).await;

        assert_eq!(reply, FallbackTopic::Greeting.reply());
        assert_eq!(transport.ask_urls().len(), 1);
        assert_eq!(chat.history().turns()[1].text, reply);
    }

    #[tokio::test]
    async fn non_streaming_invalid_reply_skips_alternate() {
        let transport = Arc::new(ScriptedTransport::default().answer(
            "http://localhost:5001",
            Err(TransportError::InvalidResponse("no reply field".to_string())),
        ));
        let mut chat = session(transport.clone(), "http://localhost:5001");

        let reply = chat.send_non_streaming(&question("my weakness?")).await;

        assert_eq!(reply, FallbackTopic::Weakness.reply());
        assert_eq!(transport.ask_urls().len(), 1);
    }

    #[tokio::test]
    async fn stream_request_carries_token() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![event(ChatEvent::Done)],
                hang: false,
            },
        ));
        let mut chat = ChatSession::new(
            transport.clone(),
            Arc::new(FixedToken),
            ChatClientConfig::default().with_base_url("http://api.example.com"),
        )
        .unwrap();

        let result = chat
            .send_streaming(
                &question("hi"),
                &mut RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(result.unwrap(), "");
        let calls = transport.stream_calls.lock().unwrap();
        assert_eq!(calls[0].1.token.as_deref(), Some("jwt-123"));
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<ConversationEvent>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn fallback_is_recorded_in_conversation_log() {
        let logger = Arc::new(RecordingLogger::default());
        let mut chat = session(Arc::new(ScriptedTransport::default()), "http://api.example.com")
            .with_conversation_logger(logger.clone());

        chat.send_non_streaming(&question("tell me about my experience"))
            .await;

        let events = logger.events.lock().unwrap();
        let types: Vec<_> = events.iter().map(|e| e.event_type).collect();
        assert_eq!(types, vec!["question_sent", "fallback_used"]);
        assert_eq!(events[0].payload["mode"], "ask");
    }

    #[tokio::test]
    async fn unreachable_stream_falls_back_to_ask() {
        let transport = Arc::new(
            ScriptedTransport::default().answer("http://api.example.com", Ok("Prepare stories.")),
        );
        let mut chat = session(transport.clone(), "http://api.example.com");
        chat.send_non_streaming(&question("hello")).await;
        let mut observer = RecordingObserver::default();

        let reply = chat
            .send(
                &question("Any tips?"),
                &mut observer,
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(reply, Ok(ChatReply::Asked("Prepare stories.".to_string())));
        assert_eq!(observer.terminal_calls(), 1);
        assert!(matches!(observer.errors[0], ChatError::Transport(_)));

        let texts: Vec<_> = chat.history().turns().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "Prepare stories.", "Any tips?", "Prepare stories."]);

        // The ask carries the history before the question, not the question itself
        let calls = transport.ask_calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1.question, "Any tips?");
        assert_eq!(calls[1].1.history.len(), 2);
    }

    #[tokio::test]
    async fn unreachable_backend_ends_in_canned_reply() {
        let transport = Arc::new(ScriptedTransport::default());
        let mut chat = session(transport, "http://api.example.com");
        let mut observer = RecordingObserver::default();

        let reply = chat
            .send(&question("hi there"), &mut observer, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, ChatReply::Asked(FallbackTopic::Greeting.reply().to_string()));
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn upstream_error_does_not_fall_back() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .stream(
                    "http://api.example.com",
                    Script::Events {
                        items: vec![event(ChatEvent::Error("Insufficient credits".to_string()))],
                        hang: false,
                    },
                )
                .answer("http://api.example.com", Ok("unused")),
        );
        let mut chat = session(transport.clone(), "http://api.example.com");

        let result = chat
            .send(
                &question("hi"),
                &mut RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await;

        assert_eq!(
            result,
            Err(ChatError::Upstream("Insufficient credits".to_string()))
        );
        assert!(transport.ask_urls().is_empty());
    }

    #[tokio::test]
    async fn stream_failure_after_chunks_does_not_fall_back() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .stream(
                    "http://api.example.com",
                    Script::Events {
                        items: vec![
                            chunk("Start with"),
                            Err(TransportError::Dropped("reset".to_string())),
                        ],
                        hang: false,
                    },
                )
                .answer("http://api.example.com", Ok("unused")),
        );
        let mut chat = session(transport.clone(), "http://api.example.com");

        let result = chat
            .send(
                &question("hi"),
                &mut RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(result, Err(ChatError::Transport(_))));
        assert!(transport.ask_urls().is_empty());
    }

    #[tokio::test]
    async fn streamed_reply_is_reported_as_streamed() {
        let transport = Arc::new(ScriptedTransport::default().stream(
            "http://api.example.com",
            Script::Events {
                items: vec![chunk("Be concise."), event(ChatEvent::Done)],
                hang: false,
            },
        ));
        let mut chat = session(transport, "http://api.example.com");

        let reply = chat
            .send(
                &question("hi"),
                &mut RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(reply, ChatReply::Streamed("Be concise.".to_string()));
        assert_eq!(reply.text(), "Be concise.");
    }

    #[tokio::test]
    async fn client_error_status_is_not_retried_on_alternate_port() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .stream(
                    "http://localhost:5001",
                    Script::Refuse(TransportError::Status {
                        status: 402,
                        message: "Out of credits".to_string(),
                    }),
                )
                .stream(
                    "http://localhost:5000",
                    Script::Events {
                        items: vec![event(ChatEvent::Done)],
                        hang: false,
                    },
                ),
        );
        let mut chat = session(transport.clone(), "http://localhost:5001");

        let result = chat
            .send_streaming(
                &question("hi"),
                &mut RecordingObserver::default(),
                &CancellationToken::new(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ChatError::Transport(TransportError::Status { status: 402, .. }))
        ));
        assert_eq!(transport.stream_urls(), vec!["http://localhost:5001/".to_string()]);
    }

    #[tokio::test]
    async fn server_error_status_is_retried_on_alternate_port() {
        let transport = Arc::new(
            ScriptedTransport::default()
                .answer(
                    "http://localhost:5001",
                    Err(TransportError::Status {
                        status: 503,
                        message: "maintenance".to_string(),
                    }),
                )
                .answer("http://localhost:5000", Ok("From 5000")),
        );
        let mut chat = session(transport.clone(), "http://localhost:5001");

        assert_eq!(chat.send_non_streaming(&question("hi")).await, "From 5000");
        assert_eq!(transport.ask_urls().len(), 2);
    }
}

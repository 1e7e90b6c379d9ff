//! Conversation state for the assistant drawer.
//!
//! [`Conversation`] is the append-only message log with its pending and
//! seeded flags. [`ConversationController`] owns one, issues gateway calls
//! on a Tokio runtime and applies the replies when the host polls for them.

use providers::Completion;
use shared::agent_api::{Message, Turn};
use shared::error::SERVICE_UNAVAILABLE_REPLY;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Result of asking the controller to send something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// User message appended and request issued
    Sent,
    /// Text was empty after trimming
    Blank,
    /// A request is already in flight
    Busy,
    /// This session has already been seeded
    AlreadySeeded,
}

impl SubmitOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Sent)
    }
}

/// What the gateway needs for a turn that has just been started
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Messages before the new prompt
    pub history: Vec<Turn>,
    pub prompt: String,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    pending: bool,
    seeded: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    pub fn history(&self) -> Vec<Turn> {
        self.messages.iter().map(Turn::from).collect()
    }

    /// Append the user's message and mark the conversation pending.
    ///
    /// Rejected when `text` is blank or a turn is already pending; the log is
    /// untouched in both cases.
    pub fn begin_turn(&mut self, text: &str) -> Result<PendingTurn, SubmitOutcome> {
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(SubmitOutcome::Blank);
        }
        if self.pending {
            return Err(SubmitOutcome::Busy);
        }

        let history = self.history();
        self.messages.push(Message::user(prompt));
        self.pending = true;
        Ok(PendingTurn {
            history,
            prompt: prompt.to_string(),
        })
    }

    /// Append the model's reply and clear the pending flag.
    ///
    /// Returns false, appending nothing, if no turn is pending.
    pub fn finish_turn(&mut self, reply: impl Into<String>) -> bool {
        if !self.pending {
            return false;
        }
        self.messages.push(Message::model(reply));
        self.pending = false;
        true
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.pending = false;
        self.seeded = false;
    }
}

struct Reply {
    epoch: u64,
    text: String,
}

pub struct ConversationController {
    conversation: Conversation,
    gateway: Arc<dyn Completion>,
    runtime: Handle,
    /// Bumped on reset so replies to a cleared conversation are dropped
    epoch: u64,
    replies_tx: UnboundedSender<Reply>,
    replies_rx: UnboundedReceiver<Reply>,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn Completion>, runtime: Handle) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            conversation: Conversation::new(),
            gateway,
            runtime,
            epoch: 0,
            replies_tx,
            replies_rx,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_pending(&self) -> bool {
        self.conversation.is_pending()
    }

    /// Send `text` to the assistant.
    ///
    /// The user message is in the log when this returns; the reply is
    /// appended by a later [`poll`](Self::poll) or [`settle`](Self::settle).
    pub fn submit(&mut self, text: &str, context: Option<&str>) -> SubmitOutcome {
        let turn = match self.conversation.begin_turn(text) {
            Ok(turn) => turn,
            Err(outcome) => {
                tracing::debug!(?outcome, "submission rejected");
                return outcome;
            }
        };

        tracing::debug!(
            epoch = self.epoch,
            history = turn.history.len(),
            context = context.unwrap_or_default(),
            "submitting turn"
        );

        let gateway = Arc::clone(&self.gateway);
        let tx = self.replies_tx.clone();
        let epoch = self.epoch;
        let context = context.map(str::to_string);
        let runtime = self.runtime.clone();
        self.runtime.spawn(async move {
            let call = runtime.spawn(async move {
                gateway
                    .complete(&turn.history, &turn.prompt, context.as_deref())
                    .await
            });
            // Every submission gets a reply, even if the call panicked
            let text = match call.await {
                Ok(text) => text,
                Err(err) => {
                    tracing::error!("completion task failed: {}", err);
                    SERVICE_UNAVAILABLE_REPLY.to_string()
                }
            };
            // Receiver lives as long as the controller
            let _ = tx.send(Reply { epoch, text });
        });

        SubmitOutcome::Sent
    }

    /// Submit once per session; later calls are ignored until [`reset`](Self::reset).
    pub fn seed(&mut self, text: &str, context: Option<&str>) -> SubmitOutcome {
        if self.conversation.seeded {
            tracing::debug!("seed ignored: session already seeded");
            return SubmitOutcome::AlreadySeeded;
        }
        let outcome = self.submit(text, context);
        if outcome.is_sent() {
            self.conversation.seeded = true;
        }
        outcome
    }

    pub fn reset(&mut self) {
        if self.conversation.is_pending() {
            tracing::debug!(epoch = self.epoch, "reset with a reply outstanding");
        }
        self.conversation.reset();
        self.epoch += 1;
    }

    /// Apply replies that have already arrived. Never blocks.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.replies_rx.try_recv() {
            if self.apply(reply) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the outstanding reply and return the message it produced.
    ///
    /// Returns `None` immediately when nothing is pending.
    pub async fn settle(&mut self) -> Option<&Message> {
        if !self.conversation.is_pending() {
            return None;
        }
        loop {
            let reply = self.replies_rx.recv().await?;
            if self.apply(reply) {
                return self.conversation.last();
            }
        }
    }

    fn apply(&mut self, reply: Reply) -> bool {
        if reply.epoch != self.epoch {
            tracing::debug!(
                reply_epoch = reply.epoch,
                epoch = self.epoch,
                "discarding reply from a reset conversation"
            );
            return false;
        }
        self.conversation.finish_turn(reply.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::agent_api::Role;
    use std::sync::Mutex;
    use tokio::sync::Semaphore;

    #[derive(Debug, Clone, PartialEq)]
    struct Call {
        history: Vec<Turn>,
        prompt: String,
        context: Option<String>,
    }

    /// Answers with a fixed reply once a permit is released
    struct StubGateway {
        reply: String,
        gate: Semaphore,
        calls: Mutex<Vec<Call>>,
    }

    impl StubGateway {
        fn open(reply: &str) -> Arc<Self> {
            Self::with_permits(reply, Semaphore::MAX_PERMITS)
        }

        fn gated(reply: &str) -> Arc<Self> {
            Self::with_permits(reply, 0)
        }

        fn with_permits(reply: &str, permits: usize) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                gate: Semaphore::new(permits),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn release(&self) {
            self.gate.add_permits(1);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Completion for StubGateway {
        async fn complete(&self, history: &[Turn], prompt: &str, context: Option<&str>) -> String {
            self.calls.lock().unwrap().push(Call {
                history: history.to_vec(),
                prompt: prompt.to_string(),
                context: context.map(str::to_string),
            });
            let _permit = self.gate.acquire().await;
            self.reply.clone()
        }
    }

    fn controller(gateway: Arc<StubGateway>) -> ConversationController {
        ConversationController::new(gateway, Handle::current())
    }

    fn transcript(c: &ConversationController) -> Vec<(Role, String)> {
        c.messages()
            .iter()
            .map(|m| (m.role, m.text.clone()))
            .collect()
    }

    #[test]
    fn test_begin_turn_rejects_blank_text() {
        let mut conv = Conversation::new();
        assert_eq!(conv.begin_turn("   \n"), Err(SubmitOutcome::Blank));
        assert!(conv.is_empty());
        assert!(!conv.is_pending());
    }

    #[test]
    fn test_begin_turn_excludes_new_prompt_from_history() {
        let mut conv = Conversation::new();
        conv.begin_turn("first").unwrap();
        conv.finish_turn("reply");

        let turn = conv.begin_turn("  second  ").unwrap();
        assert_eq!(turn.prompt, "second");
        assert_eq!(turn.history.len(), 2);
        assert_eq!(turn.history[1].role, Role::Model);
        assert_eq!(conv.len(), 3);
        assert_eq!(conv.last().unwrap().text, "second");
    }

    #[test]
    fn test_begin_turn_rejects_while_pending() {
        let mut conv = Conversation::new();
        conv.begin_turn("one").unwrap();
        assert_eq!(conv.begin_turn("two"), Err(SubmitOutcome::Busy));
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn test_finish_turn_requires_pending() {
        let mut conv = Conversation::new();
        assert!(!conv.finish_turn("stray"));
        assert!(conv.is_empty());
    }

    #[tokio::test]
    async fn test_submit_appends_user_message_synchronously() {
        let gateway = StubGateway::gated("later");
        let mut c = controller(gateway.clone());

        assert_eq!(c.submit("Hello", None), SubmitOutcome::Sent);

        assert_eq!(transcript(&c), vec![(Role::User, "Hello".to_string())]);
        assert!(c.is_pending());
        assert_eq!(c.poll(), 0);
        assert!(c.is_pending());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_noop() {
        let gateway = StubGateway::gated("done");
        let mut c = controller(gateway.clone());

        c.submit("first", None);
        assert_eq!(c.submit("second", None), SubmitOutcome::Busy);
        assert_eq!(c.messages().len(), 1);

        gateway.release();
        c.settle().await;
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_each_submission_adds_exactly_two_messages() {
        let gateway = StubGateway::open("ok");
        let mut c = controller(gateway.clone());

        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            c.submit(text, None);
            let reply = c.settle().await.unwrap();
            assert_eq!(reply.role, Role::Model);
            assert_eq!(c.messages().len(), (i + 1) * 2);
            assert!(!c.is_pending());
        }
        let calls = gateway.calls();
        assert_eq!(calls[2].history.len(), 4);
        assert_eq!(calls[2].prompt, "c");
    }

    #[tokio::test]
    async fn test_summarize_scenario() {
        let gateway = StubGateway::gated("Here is a summary...");
        let mut c = controller(gateway.clone());

        c.submit("Summarize: Q2 plan", Some("DOCS"));
        assert_eq!(
            transcript(&c),
            vec![(Role::User, "Summarize: Q2 plan".to_string())]
        );
        assert!(c.is_pending());

        gateway.release();
        c.settle().await;

        assert_eq!(
            transcript(&c),
            vec![
                (Role::User, "Summarize: Q2 plan".to_string()),
                (Role::Model, "Here is a summary...".to_string()),
            ]
        );
        assert!(!c.is_pending());

        let call = &gateway.calls()[0];
        assert!(call.history.is_empty());
        assert_eq!(call.context.as_deref(), Some("DOCS"));
    }

    #[tokio::test]
    async fn test_poll_applies_arrived_reply() {
        let gateway = StubGateway::open("pong");
        let mut c = controller(gateway);

        c.submit("ping", None);
        // Let the spawned request run
        while c.poll() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(c.messages().len(), 2);
        assert!(!c.is_pending());
    }

    #[tokio::test]
    async fn test_settle_without_pending_returns_none() {
        let mut c = controller(StubGateway::open("x"));
        assert!(c.settle().await.is_none());
    }

    #[tokio::test]
    async fn test_seed_fires_once() {
        let gateway = StubGateway::open("seeded");
        let mut c = controller(gateway.clone());

        assert_eq!(c.seed("Draft an agenda", Some("DOCS")), SubmitOutcome::Sent);
        c.settle().await;
        assert_eq!(c.seed("Draft an agenda", Some("DOCS")), SubmitOutcome::AlreadySeeded);

        assert_eq!(c.messages().len(), 2);
        assert_eq!(gateway.calls().len(), 1);
        assert!(c.conversation().is_seeded());
    }

    #[tokio::test]
    async fn test_blank_seed_does_not_consume_guard() {
        let mut c = controller(StubGateway::open("x"));
        assert_eq!(c.seed("  ", None), SubmitOutcome::Blank);
        assert!(!c.conversation().is_seeded());
        assert_eq!(c.seed("real", None), SubmitOutcome::Sent);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let gateway = StubGateway::open("ok");
        let mut c = controller(gateway);
        c.seed("one", None);
        c.settle().await;
        c.submit("two", None);
        c.settle().await;
        assert_eq!(c.messages().len(), 4);

        c.reset();

        assert!(c.messages().is_empty());
        assert!(!c.is_pending());
        assert!(!c.conversation().is_seeded());
        assert_eq!(c.seed("again", None), SubmitOutcome::Sent);
    }

    struct PanickingGateway;

    #[async_trait]
    impl Completion for PanickingGateway {
        async fn complete(&self, _history: &[Turn], _prompt: &str, _context: Option<&str>) -> String {
            panic!("gateway exploded");
        }
    }

    #[tokio::test]
    async fn test_panicking_gateway_still_clears_pending() {
        let mut c = ConversationController::new(Arc::new(PanickingGateway), Handle::current());

        assert_eq!(c.submit("hi", None), SubmitOutcome::Sent);
        let reply = tokio::time::timeout(std::time::Duration::from_secs(5), c.settle())
            .await
            .expect("settle should not hang")
            .cloned()
            .unwrap();

        assert_eq!(reply.role, Role::Model);
        assert_eq!(reply.text, SERVICE_UNAVAILABLE_REPLY);
        assert!(!c.is_pending());
        assert_eq!(c.messages().len(), 2);
        assert_eq!(c.submit("again", None), SubmitOutcome::Sent);
    }

    #[tokio::test]
    async fn test_reply_after_reset_is_discarded() {
        let gateway = StubGateway::gated("stale");
        let mut c = controller(gateway.clone());

        c.submit("old question", None);
        c.reset();
        assert!(!c.is_pending());

        c.submit("new question", None);
        gateway.release();
        gateway.release();
        let reply = c.settle().await.unwrap();
        assert_eq!(reply.role, Role::Model);

        assert_eq!(c.messages().len(), 2);
        assert_eq!(c.messages()[0].text, "new question");
        assert_eq!(c.poll(), 0);
    }
}

//! Conversation engine.
//!
//! Accepts user text, classifies it against the intent table, and commits a
//! canned assistant turn after a simulated thinking delay and a
//! character-at-a-time typing reveal. At most one turn is in flight; a
//! reset cancels the in-flight turn and discards its partial reveal without
//! committing anything.

pub mod history;
pub mod intents;

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use crate::bus::{AppEvent, EventBus};
use crate::config::ConversationConfig;
use crate::pixel::{PixelIndicator, PixelState};
use crate::storage::{Store, CONVERSATION_KEY};
use history::{ConversationTurn, Sender, TurnLog};

pub struct ConversationEngine {
    log: Mutex<TurnLog>,
    store: Arc<Store>,
    bus: Arc<EventBus>,
    pixel: Arc<PixelIndicator>,
    timing: ConversationConfig,
    /// Re-entrancy guard: at most one in-flight turn.
    processing: AtomicBool,
    /// Cancellation token for the in-flight turn, if any.
    cancel: Mutex<Option<Arc<AtomicBool>>>,
    /// Partial text of the reveal in progress; empty between reveals.
    reveal_tx: watch::Sender<String>,
}

impl ConversationEngine {
    pub fn new(
        store: Arc<Store>,
        bus: Arc<EventBus>,
        pixel: Arc<PixelIndicator>,
        timing: ConversationConfig,
    ) -> Arc<Self> {
        let log = TurnLog::load(&store);
        let (reveal_tx, _) = watch::channel(String::new());
        Arc::new(Self {
            log: Mutex::new(log),
            store,
            bus,
            pixel,
            timing,
            processing: AtomicBool::new(false),
            cancel: Mutex::new(None),
            reveal_tx,
        })
    }

    /// Submit user text. Returns the turn task, or `None` when the input was
    /// rejected (blank, or a prior turn is still in flight) — a rejected
    /// submit leaves the history untouched.
    pub fn submit(self: &Arc<Self>, text: &str) -> Option<JoinHandle<()>> {
        let text = text.trim().to_string();
        if text.is_empty() || !self.begin_turn() {
            return None;
        }

        self.commit_turn(Sender::User, text.clone());
        self.pixel.set_state(PixelState::Thinking);

        let cancel = self.arm_cancel();
        let engine = Arc::clone(self);
        Some(tokio::spawn(async move {
            engine.run_turn(Some(text), cancel).await;
        }))
    }

    /// Companion-initiated turn: no user text, response drawn from the
    /// starter pool. Same single-flight rules as [`submit`](Self::submit).
    pub fn initiate(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.begin_turn() {
            return None;
        }
        self.pixel.set_state(PixelState::Thinking);

        let cancel = self.arm_cancel();
        let engine = Arc::clone(self);
        Some(tokio::spawn(async move {
            engine.run_turn(None, cancel).await;
        }))
    }

    /// Greet a first-ever session. No-op when history already exists.
    pub fn welcome(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.lock_log().is_empty() || !self.begin_turn() {
            return None;
        }

        let cancel = self.arm_cancel();
        let engine = Arc::clone(self);
        Some(tokio::spawn(async move {
            sleep(Duration::from_millis(engine.timing.welcome_delay_ms)).await;
            if cancel.load(Ordering::SeqCst) {
                return;
            }

            engine.commit_turn(Sender::Assistant, intents::WELCOME.to_string());
            engine.pixel.set_state(PixelState::Speaking);

            sleep(Duration::from_millis(engine.timing.welcome_hold_ms)).await;
            if cancel.load(Ordering::SeqCst) {
                return;
            }
            engine.pixel.settle(PixelState::Speaking);
            engine.processing.store(false, Ordering::SeqCst);
        }))
    }

    /// Cancel the in-flight turn, discard its partial reveal, and return the
    /// pixel to idle. Committed history is untouched.
    pub fn reset(&self) {
        if let Some(cancel) = self.lock_cancel().take() {
            cancel.store(true, Ordering::SeqCst);
        }
        self.processing.store(false, Ordering::SeqCst);
        self.reveal_tx.send_replace(String::new());
        self.pixel.set_state(PixelState::Idle);
    }

    /// Drop the history, both in memory and from the store.
    pub fn clear(&self) {
        self.lock_log().clear();
        if let Err(e) = self.store.remove(CONVERSATION_KEY) {
            tracing::warn!(error = %e, "failed to clear conversation history");
        }
    }

    pub fn history(&self) -> Vec<ConversationTurn> {
        self.lock_log().turns().to_vec()
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Watch the typing reveal: partial assistant text, empty when no
    /// reveal is in progress.
    pub fn reveal_feed(&self) -> watch::Receiver<String> {
        self.reveal_tx.subscribe()
    }

    async fn run_turn(self: Arc<Self>, input: Option<String>, cancel: Arc<AtomicBool>) {
        sleep(Duration::from_millis(self.timing.thinking_delay_ms)).await;
        if cancel.load(Ordering::SeqCst) {
            return;
        }

        let response = {
            let mut rng = rand::thread_rng();
            match &input {
                Some(text) => intents::select_response(intents::classify(text), &mut rng),
                None => intents::select_starter(&mut rng),
            }
        };

        if !self.reveal(response, &cancel).await {
            return;
        }

        self.commit_turn(Sender::Assistant, response.to_string());
        self.pixel.set_state(PixelState::Speaking);

        sleep(Duration::from_millis(self.timing.speaking_hold_ms)).await;
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        self.pixel.settle(PixelState::Speaking);
        self.processing.store(false, Ordering::SeqCst);
    }

    /// Type the response out one character at a time. Returns `false` when
    /// cancelled — the partial text is discarded, nothing is committed.
    async fn reveal(&self, text: &str, cancel: &AtomicBool) -> bool {
        let mut partial = String::new();
        for ch in text.chars() {
            if cancel.load(Ordering::SeqCst) {
                self.reveal_tx.send_replace(String::new());
                return false;
            }
            partial.push(ch);
            self.reveal_tx.send_replace(partial.clone());
            sleep(Duration::from_millis(self.timing.reveal_char_delay_ms)).await;
        }

        if cancel.load(Ordering::SeqCst) {
            self.reveal_tx.send_replace(String::new());
            return false;
        }
        self.reveal_tx.send_replace(String::new());
        true
    }

    fn commit_turn(&self, sender: Sender, text: String) {
        {
            let mut log = self.lock_log();
            log.push(ConversationTurn {
                text: text.clone(),
                sender,
                timestamp: Utc::now(),
            });
            log.persist(&self.store);
        }
        self.bus.publish(&AppEvent::ConversationAdded { text });
    }

    /// Try to claim the single in-flight slot.
    fn begin_turn(&self) -> bool {
        self.processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn arm_cancel(&self) -> Arc<AtomicBool> {
        let token = Arc::new(AtomicBool::new(false));
        *self.lock_cancel() = Some(Arc::clone(&token));
        token
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, TurnLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_cancel(&self) -> std::sync::MutexGuard<'_, Option<Arc<AtomicBool>>> {
        self.cancel.lock().unwrap_or_else(|e| e.into_inner())
    }
}

use quickadd_core::Clock;
use quickadd_domain::{parse_at, Directory, ParsedResult, TokenKindSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Everything a deferred parse needs except `now`, which is sampled when
/// the timer fires.
#[derive(Debug, Clone)]
pub struct ParseRequest {
    pub text: String,
    pub caret: Option<usize>,
    pub disabled: TokenKindSet,
    pub directory: Arc<Directory>,
}

/// Contents of the latest-result cell.
///
/// `generation` is bumped on every schedule, cancel and shutdown. A timer
/// task only publishes while the cell still carries the generation it was
/// spawned with, and records it in `published`.
#[derive(Debug, Clone, Default)]
pub struct LatestParse {
    pub generation: u64,
    pub published: u64,
    pub result: Option<Arc<ParsedResult>>,
}

/// Collapses bursts of parse requests into one parse after a quiet period.
///
/// Holds at most one pending timer task. Each new request aborts the
/// previous task, and the generation check makes a superseded task that
/// already woke up harmless. Must be used inside a tokio runtime.
pub struct DebounceScheduler {
    delay: Duration,
    clock: Arc<dyn Clock>,
    tx: Arc<watch::Sender<LatestParse>>,
    task_handle: Option<JoinHandle<()>>,
    closed: bool,
}

impl DebounceScheduler {
    pub fn new(delay: Duration, clock: Arc<dyn Clock>) -> Self {
        let (tx, _) = watch::channel(LatestParse::default());
        Self {
            delay,
            clock,
            tx: Arc::new(tx),
            task_handle: None,
            closed: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Parses `request` once no newer request arrives within the delay.
    /// Ignored after [`shutdown`](Self::shutdown).
    pub fn schedule(&mut self, request: ParseRequest) {
        if self.closed {
            tracing::debug!("parse scheduled after shutdown, ignoring");
            return;
        }
        self.abort_pending();
        let generation = self.bump_generation();

        let delay = self.delay;
        let clock = self.clock.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let result = parse_at(
                &request.text,
                request.caret,
                clock.now(),
                &request.directory,
                request.disabled,
            );
            let result = Arc::new(result);
            let published = tx.send_if_modified(|latest| {
                if latest.generation != generation {
                    return false;
                }
                latest.published = generation;
                latest.result = Some(result);
                true
            });
            tracing::debug!(generation, published, "debounced parse fired");
        });

        tracing::debug!(generation, delay_ms = delay.as_millis() as u64, "parse scheduled");
        self.task_handle = Some(handle);
    }

    /// Drops the pending request, if any.
    pub fn cancel(&mut self) {
        self.abort_pending();
        let generation = self.bump_generation();
        tracing::debug!(generation, "pending parse cancelled");
    }

    /// Cancels the pending request and refuses new ones.
    pub fn shutdown(&mut self) {
        self.cancel();
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_pending(&self) -> bool {
        self.task_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn subscribe(&self) -> watch::Receiver<LatestParse> {
        self.tx.subscribe()
    }

    /// The last published result, whichever generation it came from.
    pub fn latest(&self) -> Option<Arc<ParsedResult>> {
        self.tx.borrow().result.clone()
    }

    fn abort_pending(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }

    /// Advances the generation without waking subscribers.
    fn bump_generation(&self) -> u64 {
        let mut generation = 0;
        self.tx.send_if_modified(|latest| {
            latest.generation += 1;
            generation = latest.generation;
            false
        });
        generation
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.abort_pending();
    }
}

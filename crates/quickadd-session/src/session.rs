use quickadd_core::{Clock, InputState, QuickAddConfig};
use quickadd_domain::{
    complete, parse_at, suggest, Directory, DirectoryEntry, Field, FieldUpdate, ParsedResult,
    ReconciliationEngine, Suggestion, TokenKind, TokenKindSet,
};
use std::sync::Arc;
use tokio::sync::watch;

use crate::scheduler::{DebounceScheduler, LatestParse, ParseRequest};

/// One open quick-add editor.
///
/// Owns the input buffer, the debounce timer and the provenance table, and
/// turns keystrokes into batches of [`FieldUpdate`]s for the host's draft.
/// Nothing here outlives the session: closing it cancels the timer and
/// makes every later result a no-op.
pub struct QuickAddSession {
    clock: Arc<dyn Clock>,
    directory: Arc<Directory>,
    config: QuickAddConfig,
    scheduler: DebounceScheduler,
    latest_rx: watch::Receiver<LatestParse>,
    applied_generation: u64,
    engine: ReconciliationEngine,
    disabled: TokenKindSet,
    input: InputState,
    /// Whether the last scheduled text came with a caret. Text handed over
    /// whole is re-parsed without one, so a trailing name token stays
    /// committed.
    caret_tracked: bool,
    closed: bool,
}

impl QuickAddSession {
    pub fn new(clock: Arc<dyn Clock>, directory: Arc<Directory>, config: QuickAddConfig) -> Self {
        let scheduler = DebounceScheduler::new(config.debounce(), clock.clone());
        let latest_rx = scheduler.subscribe();
        let mut engine = ReconciliationEngine::new();
        if !config.nlp_enabled {
            engine.set_nlp_enabled(false, clock.now());
        }
        Self {
            clock,
            directory,
            config,
            scheduler,
            latest_rx,
            applied_generation: 0,
            engine,
            disabled: TokenKindSet::new(),
            input: InputState::new(),
            caret_tracked: true,
            closed: false,
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn directory(&self) -> &Arc<Directory> {
        &self.directory
    }

    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    pub fn disabled_kinds(&self) -> TokenKindSet {
        self.disabled
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Parses `text` right away with the session's clock, directory and
    /// disabled kinds.
    pub fn parse(&self, text: &str) -> ParsedResult {
        parse_at(text, None, self.clock.now(), &self.directory, self.disabled)
    }

    /// Parses the last scheduled text, with its caret if it had one.
    pub fn parse_input(&self) -> ParsedResult {
        parse_at(
            self.input.as_str(),
            self.caret_tracked.then(|| self.input.cursor_pos()),
            self.clock.now(),
            &self.directory,
            self.disabled,
        )
    }

    pub fn schedule_parse(&mut self, text: &str) {
        self.schedule_parse_at(text, None);
    }

    /// Schedules a debounced parse of `text` and makes it the session's
    /// current input, so toggles re-parse the same text.
    pub fn schedule_parse_at(&mut self, text: &str, caret: Option<usize>) {
        if self.input.as_str() != text {
            self.input.set(text.to_string());
        }
        if let Some(caret) = caret {
            self.input.set_cursor(caret);
        }
        self.caret_tracked = caret.is_some();
        self.scheduler.schedule(ParseRequest {
            text: text.to_string(),
            caret,
            disabled: self.disabled,
            directory: self.directory.clone(),
        });
    }

    /// Replaces the input (a paste or programmatic fill) and schedules a
    /// parse of it as complete text.
    pub fn set_text(&mut self, text: &str) {
        self.schedule_parse_at(text, None);
    }

    /// Types `text` at the caret and schedules a parse.
    pub fn insert_text(&mut self, text: &str) {
        self.input.insert_str(text);
        self.schedule_input();
    }

    pub fn backspace(&mut self) {
        self.input.backspace();
        self.schedule_input();
    }

    pub fn clear_text(&mut self) {
        self.input.clear();
        self.schedule_input();
    }

    pub fn subscribe(&self) -> watch::Receiver<LatestParse> {
        self.scheduler.subscribe()
    }

    pub fn latest(&self) -> Option<Arc<ParsedResult>> {
        self.scheduler.latest()
    }

    /// Reconciles a parse into field updates. A closed session applies nothing.
    pub fn apply_parse(&mut self, result: &ParsedResult) -> Vec<FieldUpdate> {
        if self.closed {
            tracing::debug!("parse applied after close, ignoring");
            return Vec::new();
        }
        self.engine.apply(result)
    }

    /// Waits for the next debounced parse and reconciles it.
    ///
    /// Returns `None` when nothing is pending or the session is closed.
    pub async fn next_updates(&mut self) -> Option<(Arc<ParsedResult>, Vec<FieldUpdate>)> {
        loop {
            if self.closed {
                return None;
            }
            let pending = self.scheduler.is_pending();
            let unseen = {
                let latest = self.latest_rx.borrow_and_update();
                match &latest.result {
                    Some(result) if latest.published > self.applied_generation => {
                        Some((latest.published, result.clone()))
                    }
                    _ => None,
                }
            };
            if let Some((generation, result)) = unseen {
                self.applied_generation = generation;
                let updates = self.apply_parse(&result);
                return Some((result, updates));
            }
            if !pending || self.latest_rx.changed().await.is_err() {
                return None;
            }
        }
    }

    pub fn notify_manual_edit(&mut self, field: Field) {
        self.engine.notify_manual_edit(field);
    }

    /// Starts over for the next task: clears the input, the provenance
    /// table and the disabled kinds, and drops any pending parse.
    pub fn reset_session(&mut self) {
        self.scheduler.cancel();
        self.engine.reset();
        self.disabled.clear();
        self.input.clear();
        self.caret_tracked = true;
        tracing::debug!("session reset");
    }

    /// Turns parsing off (clearing every parser-owned field) or back on
    /// (re-parsing the current input).
    pub fn set_nlp_enabled(&mut self, enabled: bool) -> Vec<FieldUpdate> {
        if self.closed {
            return Vec::new();
        }
        let mut updates = self.engine.set_nlp_enabled(enabled, self.clock.now());
        if enabled {
            self.scheduler.cancel();
            updates = self.reparse_now();
        }
        updates
    }

    pub fn is_nlp_enabled(&self) -> bool {
        self.engine.is_nlp_enabled()
    }

    /// Stops `kind` from driving fields and re-parses the current input.
    pub fn disable_kind(&mut self, kind: TokenKind) -> Vec<FieldUpdate> {
        self.disabled.insert(kind);
        self.scheduler.cancel();
        self.reparse_now()
    }

    pub fn enable_kind(&mut self, kind: TokenKind) -> Vec<FieldUpdate> {
        self.disabled.remove(kind);
        self.scheduler.cancel();
        self.reparse_now()
    }

    /// Swaps in a fresh directory snapshot for later parses.
    pub fn set_directory(&mut self, directory: Arc<Directory>) {
        self.directory = directory;
    }

    /// Directory candidates for the project or label being typed.
    pub fn suggestions(&self) -> Option<Suggestion> {
        let at_caret = parse_at(
            self.input.as_str(),
            Some(self.input.cursor_pos()),
            self.clock.now(),
            &self.directory,
            self.disabled,
        );
        suggest(
            &at_caret,
            &self.directory,
            self.config.effective_suggestion_limit(),
        )
    }

    /// Replaces the token being typed with `entry` and schedules a parse.
    pub fn accept_suggestion(&mut self, suggestion: &Suggestion, entry: &DirectoryEntry) {
        let (text, caret) = complete(self.input.as_str(), suggestion, entry);
        self.input.set(text);
        self.input.set_cursor(caret);
        self.schedule_input();
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.scheduler.shutdown();
        self.closed = true;
        tracing::debug!("session closed");
    }

    fn schedule_input(&mut self) {
        let caret = Some(self.input.cursor_pos());
        let text = self.input.as_str().to_string();
        self.schedule_parse_at(&text, caret);
    }

    fn reparse_now(&mut self) -> Vec<FieldUpdate> {
        let result = self.parse_input();
        self.apply_parse(&result)
    }
}

impl Drop for QuickAddSession {
    fn drop(&mut self) {
        self.close();
    }
}

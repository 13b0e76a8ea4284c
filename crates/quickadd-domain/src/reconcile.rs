//! Field reconciliation engine.
//!
//! Decides, per draft field, whether a fresh parse overwrites it, clears it
//! or leaves it alone. Every decision goes through [`step`], a pure reducer
//! over one field's state; the engine only sequences events and collects
//! the resulting updates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::field::{Field, FieldValue};
use crate::field_update::FieldUpdate;
use crate::parsed::ParsedResult;

/// Why a parser-owned field holds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOrigin {
    /// Typed directly in the text.
    Direct,
    /// Derived from the parsed recurrence (due date only).
    Recurrence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Unset,
    Parsed(ParseOrigin),
    User,
}

impl Provenance {
    pub fn is_parser_owned(&self) -> bool {
        matches!(self, Provenance::Parsed(_))
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Provenance::User)
    }
}

/// Reconciliation state of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub provenance: Provenance,
    /// Last value this engine wrote, while the field is parser-owned.
    pub applied: Option<FieldValue>,
}

/// Input to [`step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The parse proposes this value (or nothing) for the field.
    Parsed(Option<FieldValue>),
    /// A due date derived from the parsed recurrence.
    Derived(Option<FieldValue>),
    ManualEdit,
}

/// Folds one event into one field's state.
///
/// Returns the next state and the update to emit, if any. A field the user
/// owns never produces an update.
pub fn step(field: Field, state: &FieldState, event: Event) -> (FieldState, Option<FieldUpdate>) {
    let (proposed, origin) = match event {
        Event::ManualEdit => {
            let next = FieldState {
                provenance: Provenance::User,
                applied: None,
            };
            return (next, None);
        }
        Event::Parsed(value) => (value, ParseOrigin::Direct),
        Event::Derived(value) => (value, ParseOrigin::Recurrence),
    };

    match (state.provenance, proposed) {
        (Provenance::User, _) => (state.clone(), None),
        (Provenance::Unset, None) => (state.clone(), None),
        (Provenance::Parsed(_), None) => (FieldState::default(), Some(FieldUpdate::Clear(field))),
        (provenance, Some(value)) => {
            let unchanged = provenance.is_parser_owned() && state.applied.as_ref() == Some(&value);
            let update = (!unchanged).then(|| FieldUpdate::Set(value.clone()));
            let next = FieldState {
                provenance: Provenance::Parsed(origin),
                applied: Some(value),
            };
            (next, update)
        }
    }
}

/// Tracks provenance for every draft field across one editing session.
#[derive(Debug, Clone)]
pub struct ReconciliationEngine {
    fields: [FieldState; Field::COUNT],
    nlp_enabled: bool,
}

impl Default for ReconciliationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self {
            fields: Default::default(),
            nlp_enabled: true,
        }
    }

    pub fn state(&self, field: Field) -> &FieldState {
        &self.fields[field.index()]
    }

    pub fn provenance(&self, field: Field) -> Provenance {
        self.state(field).provenance
    }

    pub fn is_nlp_enabled(&self) -> bool {
        self.nlp_enabled
    }

    /// Reconciles one parse against the current provenance table and returns
    /// the writes the host must apply, as one batch.
    ///
    /// While NLP is disabled every parse is treated as empty.
    pub fn apply(&mut self, result: &ParsedResult) -> Vec<FieldUpdate> {
        let empty;
        let result = if self.nlp_enabled {
            result
        } else {
            empty = ParsedResult::empty(result.reference);
            &empty
        };

        let mut updates = Vec::new();
        for field in Field::ALL {
            if field == Field::DueDate {
                continue;
            }
            self.fold(field, Event::Parsed(result.field_value(field)), &mut updates);
        }

        let recurrence_changed = updates.iter().any(|u| u.field() == Field::Recurring);
        if let Some(event) = self.due_date_event(result, recurrence_changed) {
            self.fold(Field::DueDate, event, &mut updates);
        }

        if !updates.is_empty() {
            tracing::debug!(
                updates = updates.len(),
                text = %result.original_text,
                "reconciled parse"
            );
        }
        updates
    }

    /// Marks `field` as owned by the user until the next reset.
    pub fn notify_manual_edit(&mut self, field: Field) {
        tracing::debug!(field = %field, "manual edit");
        let state = &mut self.fields[field.index()];
        *state = step(field, state, Event::ManualEdit).0;
    }

    /// Forgets every provenance record; the NLP toggle is kept.
    pub fn reset(&mut self) {
        tracing::debug!("reconciliation state reset");
        self.fields = Default::default();
    }

    /// Turns parsing on or off.
    ///
    /// Turning it off reconciles an empty parse, which clears every
    /// parser-owned field in one batch. Turning it back on emits nothing;
    /// the caller re-parses the current text.
    pub fn set_nlp_enabled(&mut self, enabled: bool, reference: NaiveDateTime) -> Vec<FieldUpdate> {
        if self.nlp_enabled == enabled {
            return Vec::new();
        }
        tracing::debug!(enabled, "nlp toggled");
        self.nlp_enabled = enabled;
        if enabled {
            Vec::new()
        } else {
            self.apply(&ParsedResult::empty(reference))
        }
    }

    fn fold(&mut self, field: Field, event: Event, updates: &mut Vec<FieldUpdate>) {
        let state = &mut self.fields[field.index()];
        let (next, update) = step(field, state, event);
        debug_assert!(
            update.is_none() || !state.provenance.is_user(),
            "update emitted for user-owned field {field}"
        );
        *state = next;
        updates.extend(update);
    }

    /// The due-date event for this pass, coupling the due date to the
    /// recurrence when the text carries no date of its own.
    fn due_date_event(&self, result: &ParsedResult, recurrence_changed: bool) -> Option<Event> {
        if let Some(date) = result.due_date {
            return Some(Event::Parsed(Some(FieldValue::DueDate(date))));
        }

        let recurrence = self.state(Field::Recurring);
        let derived = || {
            let date = match &recurrence.applied {
                Some(FieldValue::Recurring(rule)) => {
                    rule.first_occurrence(result.reference.date())
                }
                _ => None,
            };
            Event::Derived(date.map(FieldValue::DueDate))
        };

        match (self.provenance(Field::DueDate), recurrence.provenance) {
            (Provenance::User, _) => None,
            (Provenance::Unset, Provenance::Parsed(_)) => Some(derived()),
            (Provenance::Unset, _) => None,
            (Provenance::Parsed(ParseOrigin::Direct), Provenance::Parsed(_)) => Some(derived()),
            (Provenance::Parsed(ParseOrigin::Direct), _) => Some(Event::Parsed(None)),
            (Provenance::Parsed(ParseOrigin::Recurrence), Provenance::Parsed(_)) => {
                recurrence_changed.then(derived)
            }
            (Provenance::Parsed(ParseOrigin::Recurrence), Provenance::Unset) => {
                Some(Event::Derived(None))
            }
            (Provenance::Parsed(ParseOrigin::Recurrence), Provenance::User) => None,
        }
    }
}

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::directory::ResolvedName;
use crate::field::{Field, FieldValue};
use crate::priority::Priority;
use crate::recurrence::RecurrenceRule;
use crate::token::{Match, TokenKind};

/// Structured draft produced from one parse of the quick-add text.
///
/// Built fresh on every parse and never mutated afterwards; only its effect
/// on the reconciliation engine outlives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedResult {
    pub title: String,
    pub original_text: String,
    /// Matches of enabled kinds, including unresolved and live ones.
    pub matches: Vec<Match>,
    /// Every match before the disabled-kind filter.
    pub raw_matches: Vec<Match>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_hhmm")]
    pub time: Option<NaiveTime>,
    pub recurring: Option<RecurrenceRule>,
    pub project: Option<ResolvedName>,
    pub labels: Vec<ResolvedName>,
    /// Seconds.
    pub estimation: Option<u32>,
    /// Seconds.
    pub duration: Option<u32>,
    /// The `now` relative phrases were resolved against.
    pub reference: NaiveDateTime,
}

fn serialize_hhmm<S: serde::Serializer>(
    time: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match time {
        Some(t) => serializer.serialize_some(&t.format("%H:%M").to_string()),
        None => serializer.serialize_none(),
    }
}

impl ParsedResult {
    /// A parse that yields nothing. Feeding it to the reconciliation engine
    /// clears every parser-owned field.
    pub fn empty(reference: NaiveDateTime) -> Self {
        Self {
            title: String::new(),
            original_text: String::new(),
            matches: Vec::new(),
            raw_matches: Vec::new(),
            priority: None,
            due_date: None,
            time: None,
            recurring: None,
            project: None,
            labels: Vec::new(),
            estimation: None,
            duration: None,
            reference,
        }
    }

    /// The value this parse proposes for `field`, if any.
    pub fn field_value(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Project => self.project.clone().map(FieldValue::Project),
            Field::Priority => self.priority.map(FieldValue::Priority),
            Field::DueDate => self.due_date.map(FieldValue::DueDate),
            Field::DueTime => self.time.map(FieldValue::DueTime),
            Field::Recurring => self.recurring.clone().map(FieldValue::Recurring),
            Field::Labels => {
                (!self.labels.is_empty()).then(|| FieldValue::Labels(self.labels.clone()))
            }
            Field::Estimation => self.estimation.map(FieldValue::Estimation),
        }
    }

    /// `HH:MM` form of the parsed time.
    pub fn time_hhmm(&self) -> Option<String> {
        self.time.map(|t| t.format("%H:%M").to_string())
    }

    /// Project and label names with no directory entry. Whether to create
    /// them is the host's decision.
    pub fn create_candidates(&self) -> Vec<(TokenKind, &str)> {
        let project = self
            .project
            .iter()
            .filter(|p| p.is_new())
            .map(|p| (TokenKind::Project, p.name.as_str()));
        let labels = self
            .labels
            .iter()
            .filter(|l| l.is_new())
            .map(|l| (TokenKind::Label, l.name.as_str()));
        project.chain(labels).collect()
    }

    /// The project or label token currently being typed at the caret.
    pub fn live_match(&self) -> Option<&Match> {
        self.matches.iter().find(|m| m.live)
    }
}

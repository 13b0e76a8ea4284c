use chrono::{NaiveDate, NaiveTime};
use quickadd_core::{QuickAddError, QuickAddResult};
use serde::Serialize;

use crate::directory::ResolvedName;
use crate::field::{Field, FieldValue};
use crate::field_update::FieldUpdate;
use crate::priority::Priority;
use crate::recurrence::RecurrenceRule;

/// In-memory task draft that field updates are written into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub project: Option<ResolvedName>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_hhmm")]
    pub due_time: Option<NaiveTime>,
    #[serde(serialize_with = "serialize_rule")]
    pub recurring: Option<RecurrenceRule>,
    pub labels: Vec<ResolvedName>,
    /// Seconds.
    pub estimation: Option<u32>,
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

fn serialize_rule<S: serde::Serializer>(
    rule: &Option<RecurrenceRule>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match rule {
        Some(rule) => serializer.serialize_some(&rule.to_rrule()),
        None => serializer.serialize_none(),
    }
}

impl TaskDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, update: &FieldUpdate) {
        match update.field() {
            Field::Project => update.apply_to(&mut self.project, |v| match v {
                FieldValue::Project(name) => Some(name.clone()),
                _ => None,
            }),
            Field::Priority => update.apply_to(&mut self.priority, |v| match v {
                FieldValue::Priority(p) => Some(*p),
                _ => None,
            }),
            Field::DueDate => update.apply_to(&mut self.due_date, |v| match v {
                FieldValue::DueDate(date) => Some(*date),
                _ => None,
            }),
            Field::DueTime => update.apply_to(&mut self.due_time, |v| match v {
                FieldValue::DueTime(time) => Some(*time),
                _ => None,
            }),
            Field::Recurring => update.apply_to(&mut self.recurring, |v| match v {
                FieldValue::Recurring(rule) => Some(rule.clone()),
                _ => None,
            }),
            Field::Labels => match update.value() {
                Some(FieldValue::Labels(labels)) => self.labels = labels.clone(),
                Some(_) => {}
                None => self.labels.clear(),
            },
            Field::Estimation => update.apply_to(&mut self.estimation, |v| match v {
                FieldValue::Estimation(seconds) => Some(*seconds),
                _ => None,
            }),
        }
    }

    pub fn apply_all<'a>(&mut self, updates: impl IntoIterator<Item = &'a FieldUpdate>) {
        for update in updates {
            self.apply(update);
        }
    }

    /// Writes a value chosen through a field's own control. `None` clears
    /// the field.
    pub fn set_manual(&mut self, field: Field, value: Option<FieldValue>) -> QuickAddResult<()> {
        if let Some(value) = &value {
            if value.field() != field {
                return Err(QuickAddError::Validation(format!(
                    "value for {} given to {}",
                    value.field(),
                    field
                )));
            }
        }
        self.apply(&FieldUpdate::from((field, value)));
        Ok(())
    }

    /// The draft's current value for `field`.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Project => self.project.clone().map(FieldValue::Project),
            Field::Priority => self.priority.map(FieldValue::Priority),
            Field::DueDate => self.due_date.map(FieldValue::DueDate),
            Field::DueTime => self.due_time.map(FieldValue::DueTime),
            Field::Recurring => self.recurring.clone().map(FieldValue::Recurring),
            Field::Labels => {
                (!self.labels.is_empty()).then(|| FieldValue::Labels(self.labels.clone()))
            }
            Field::Estimation => self.estimation.map(FieldValue::Estimation),
        }
    }
}

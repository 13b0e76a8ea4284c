use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quickadd_core::{QuickAddError, QuickAddResult};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::directory::{Directory, ResolvedName};
use crate::priority::Priority;
use crate::recurrence::RecurrenceRule;
use crate::resolver::{resolve_date, resolve_duration, resolve_recurrence, resolve_time};
use crate::token::TokenKind;

/// A draft field the parser can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Project,
    Priority,
    DueDate,
    DueTime,
    Recurring,
    Labels,
    Estimation,
}

impl Field {
    pub const COUNT: usize = 7;

    pub const ALL: [Field; Field::COUNT] = [
        Field::Project,
        Field::Priority,
        Field::DueDate,
        Field::DueTime,
        Field::Recurring,
        Field::Labels,
        Field::Estimation,
    ];

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Project => "project",
            Field::Priority => "priority",
            Field::DueDate => "due_date",
            Field::DueTime => "due_time",
            Field::Recurring => "recurring",
            Field::Labels => "labels",
            Field::Estimation => "estimation",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = QuickAddError;

    fn from_str(s: &str) -> QuickAddResult<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "project" => Ok(Field::Project),
            "priority" => Ok(Field::Priority),
            "due_date" | "date" => Ok(Field::DueDate),
            "due_time" | "time" => Ok(Field::DueTime),
            "recurring" | "recurrence" => Ok(Field::Recurring),
            "labels" | "label" => Ok(Field::Labels),
            "estimation" | "estimate" => Ok(Field::Estimation),
            _ => Err(QuickAddError::Unknown {
                kind: "field",
                value: s.to_string(),
            }),
        }
    }
}

/// A typed value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Project(ResolvedName),
    Priority(Priority),
    DueDate(NaiveDate),
    DueTime(NaiveTime),
    Recurring(RecurrenceRule),
    Labels(Vec<ResolvedName>),
    /// Seconds.
    Estimation(u32),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Project(_) => Field::Project,
            FieldValue::Priority(_) => Field::Priority,
            FieldValue::DueDate(_) => Field::DueDate,
            FieldValue::DueTime(_) => Field::DueTime,
            FieldValue::Recurring(_) => Field::Recurring,
            FieldValue::Labels(_) => Field::Labels,
            FieldValue::Estimation(_) => Field::Estimation,
        }
    }

    /// Builds a value for `field` from what a user picked or typed in a
    /// field's own control, accepting the same phrases as the quick-add text.
    pub fn from_input(
        field: Field,
        input: &str,
        now: NaiveDateTime,
        directory: &Directory,
    ) -> QuickAddResult<Self> {
        let input = input.trim();
        let invalid = || QuickAddError::Validation(format!("invalid {}: '{}'", field, input));
        if input.is_empty() {
            return Err(invalid());
        }

        let value = match field {
            Field::Project => {
                let name = input.trim_start_matches('#').trim_matches('"');
                FieldValue::Project(directory.resolve_name(TokenKind::Project, name))
            }
            Field::Priority => FieldValue::Priority(input.parse()?),
            Field::DueDate => {
                FieldValue::DueDate(resolve_date(input, now.date()).ok_or_else(invalid)?)
            }
            Field::DueTime => FieldValue::DueTime(resolve_time(input).ok_or_else(invalid)?),
            Field::Recurring => FieldValue::Recurring(match resolve_recurrence(input) {
                Some(rule) => rule,
                None => input.parse::<RecurrenceRule>()?,
            }),
            Field::Labels => {
                let mut labels: Vec<ResolvedName> = Vec::new();
                for name in input
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .map(|n| n.trim_start_matches('@'))
                    .filter(|n| !n.is_empty())
                {
                    let resolved = directory.resolve_name(TokenKind::Label, name);
                    if !labels.iter().any(|l| l.name.eq_ignore_ascii_case(&resolved.name)) {
                        labels.push(resolved);
                    }
                }
                FieldValue::Labels(labels)
            }
            Field::Estimation => {
                let (_, seconds) = resolve_duration(input).ok_or_else(invalid)?;
                FieldValue::Estimation(seconds)
            }
        };
        Ok(value)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Project(name) => name.serialize(serializer),
            FieldValue::Priority(p) => serializer.serialize_u8(p.level()),
            FieldValue::DueDate(date) => date.serialize(serializer),
            FieldValue::DueTime(time) => serializer.collect_str(&time.format("%H:%M")),
            FieldValue::Recurring(rule) => serializer.collect_str(rule),
            FieldValue::Labels(labels) => labels.serialize(serializer),
            FieldValue::Estimation(seconds) => serializer.serialize_u32(*seconds),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Project(name) => write!(f, "#{}", name.name),
            FieldValue::Priority(p) => write!(f, "{}", p),
            FieldValue::DueDate(date) => write!(f, "{}", date),
            FieldValue::DueTime(time) => write!(f, "{}", time.format("%H:%M")),
            FieldValue::Recurring(rule) => write!(f, "{}", rule),
            FieldValue::Labels(labels) => {
                let names: Vec<String> = labels.iter().map(|l| format!("@{}", l.name)).collect();
                write!(f, "{}", names.join(" "))
            }
            FieldValue::Estimation(seconds) => write!(f, "{}s", seconds),
        }
    }
}

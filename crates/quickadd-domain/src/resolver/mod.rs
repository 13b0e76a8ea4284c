//! Value resolver: turns a match's raw text into a typed value.
//!
//! Resolution is pure. Relative dates are computed from the `now` the
//! caller passes in, and names are looked up in the caller's directory
//! snapshot. A phrase that cannot be turned into a value resolves to
//! `None`; the match itself is still reported by the parser.

mod dates;
mod duration;
mod recurrence;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::directory::{Directory, ResolvedName};
use crate::priority::Priority;
use crate::recurrence::RecurrenceRule;
use crate::token::{Match, TokenKind};

pub use dates::{resolve_date, resolve_time};
pub use duration::{resolve_duration, DurationRole};
pub use recurrence::resolve_recurrence;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResolvedValue {
    Project(ResolvedName),
    Label(ResolvedName),
    Priority(Priority),
    DueDate(NaiveDate),
    DueTime(NaiveTime),
    Recurrence(RecurrenceRule),
    /// Estimated effort in seconds.
    Estimation(u32),
    /// Length of the scheduled time block in seconds.
    Duration(u32),
}

pub fn resolve(m: &Match, now: NaiveDateTime, directory: &Directory) -> Option<ResolvedValue> {
    let raw = m.raw_text.as_str();
    match m.kind {
        TokenKind::Project => {
            name_of(raw).map(|name| ResolvedValue::Project(directory.resolve_name(m.kind, name)))
        }
        TokenKind::Label => {
            name_of(raw).map(|name| ResolvedValue::Label(directory.resolve_name(m.kind, name)))
        }
        TokenKind::Priority => raw
            .get(1..)
            .and_then(|digits| digits.parse::<u8>().ok())
            .and_then(Priority::from_level)
            .map(ResolvedValue::Priority),
        TokenKind::DueDate => resolve_date(raw, now.date()).map(ResolvedValue::DueDate),
        TokenKind::DueTime => resolve_time(raw).map(ResolvedValue::DueTime),
        TokenKind::Recurrence => resolve_recurrence(raw).map(ResolvedValue::Recurrence),
        TokenKind::Duration => resolve_duration(raw).map(|(role, seconds)| match role {
            DurationRole::Estimate => ResolvedValue::Estimation(seconds),
            DurationRole::Span => ResolvedValue::Duration(seconds),
        }),
    }
}

/// Strips the trigger character and any quotes from a `#name` / `@name` token.
fn name_of(raw: &str) -> Option<&str> {
    let body = raw.get(1..)?;
    let name = body
        .strip_prefix('"')
        .and_then(|quoted| quoted.strip_suffix('"'))
        .unwrap_or(body)
        .trim();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::DirectoryEntry;

    fn now() -> NaiveDateTime {
        // Wednesday
        NaiveDate::from_ymd_opt(2024, 5, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn token(kind: TokenKind, raw: &str) -> Match {
        Match::new(kind, raw, 0, raw.len())
    }

    #[test]
    fn test_project_resolves_against_directory() {
        let work = DirectoryEntry::new("Work");
        let dir = Directory::new(vec![work.clone()], vec![]);

        let value = resolve(&token(TokenKind::Project, "#work"), now(), &dir);
        assert_eq!(value, Some(ResolvedValue::Project(ResolvedName::found(&work))));

        let value = resolve(&token(TokenKind::Project, "#garden"), now(), &dir);
        assert_eq!(
            value,
            Some(ResolvedValue::Project(ResolvedName::not_found("garden")))
        );
    }

    #[test]
    fn test_quoted_label_name() {
        let dir = Directory::default();
        let value = resolve(&token(TokenKind::Label, "@\"waiting on\""), now(), &dir);
        assert_eq!(
            value,
            Some(ResolvedValue::Label(ResolvedName::not_found("waiting on")))
        );
    }

    #[test]
    fn test_priority_levels() {
        let dir = Directory::default();
        assert_eq!(
            resolve(&token(TokenKind::Priority, "P4"), now(), &dir),
            Some(ResolvedValue::Priority(Priority::P4))
        );
    }

    #[test]
    fn test_date_uses_supplied_now() {
        let dir = Directory::default();
        assert_eq!(
            resolve(&token(TokenKind::DueDate, "tomorrow"), now(), &dir),
            Some(ResolvedValue::DueDate(NaiveDate::from_ymd_opt(2024, 5, 9).unwrap()))
        );
    }

    #[test]
    fn test_duration_roles() {
        let dir = Directory::default();
        assert_eq!(
            resolve(&token(TokenKind::Duration, "45m"), now(), &dir),
            Some(ResolvedValue::Estimation(2700))
        );
        assert_eq!(
            resolve(&token(TokenKind::Duration, "for 1h"), now(), &dir),
            Some(ResolvedValue::Duration(3600))
        );
    }

    #[test]
    fn test_unresolvable_values_are_none() {
        let dir = Directory::default();
        assert_eq!(resolve(&token(TokenKind::DueDate, "feb 30"), now(), &dir), None);
        assert_eq!(resolve(&token(TokenKind::DueTime, "13pm"), now(), &dir), None);
        assert_eq!(
            resolve(&token(TokenKind::Recurrence, "every fortnight"), now(), &dir),
            None
        );
        assert_eq!(resolve(&token(TokenKind::Duration, "0m"), now(), &dir), None);
    }
}

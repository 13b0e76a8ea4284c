//! Parse orchestrator: matcher, disabled-kind filter and resolver composed
//! into one pure entry point.

use chrono::NaiveDateTime;

use crate::directory::Directory;
use crate::matcher::match_text_at;
use crate::parsed::ParsedResult;
use crate::resolver::{resolve, ResolvedValue};
use crate::token::{Match, TokenKindSet};

/// Parses complete text (no caret, so nothing is treated as still being typed).
pub fn parse(
    text: &str,
    now: NaiveDateTime,
    directory: &Directory,
    disabled: TokenKindSet,
) -> ParsedResult {
    parse_at(text, None, now, directory, disabled)
}

/// Parses `text` with the caret at byte offset `caret`.
///
/// Every enabled match that is not live is stripped from the title, whether
/// or not its value resolves; only resolved ones drive fields. Single-valued
/// fields take the last resolved occurrence; labels keep every distinct name
/// in the order typed.
pub fn parse_at(
    text: &str,
    caret: Option<usize>,
    now: NaiveDateTime,
    directory: &Directory,
    disabled: TokenKindSet,
) -> ParsedResult {
    let raw_matches = match_text_at(text, caret);
    let matches: Vec<Match> = raw_matches
        .iter()
        .filter(|m| !disabled.contains(m.kind))
        .cloned()
        .collect();

    let mut result = ParsedResult::empty(now);
    let committed: Vec<&Match> = matches.iter().filter(|m| !m.live).collect();
    for m in &committed {
        let Some(value) = resolve(m, now, directory) else {
            continue;
        };
        match value {
            ResolvedValue::Project(name) => result.project = Some(name),
            ResolvedValue::Label(name) => {
                let duplicate = result
                    .labels
                    .iter()
                    .any(|l| l.name.to_lowercase() == name.name.to_lowercase());
                if !duplicate {
                    result.labels.push(name);
                }
            }
            ResolvedValue::Priority(p) => result.priority = Some(p),
            ResolvedValue::DueDate(date) => result.due_date = Some(date),
            ResolvedValue::DueTime(time) => result.time = Some(time),
            ResolvedValue::Recurrence(rule) => result.recurring = Some(rule),
            ResolvedValue::Estimation(seconds) => result.estimation = Some(seconds),
            ResolvedValue::Duration(seconds) => result.duration = Some(seconds),
        }
    }

    result.title = strip_spans(text, &committed);
    result.original_text = text.to_string();
    result.matches = matches;
    result.raw_matches = raw_matches;

    tracing::trace!(
        title = %result.title,
        matches = result.matches.len(),
        disabled = result.raw_matches.len() - result.matches.len(),
        "parsed quick-add text"
    );
    result
}

/// Removes the spans from `text` and collapses whitespace runs.
fn strip_spans(text: &str, spans: &[&Match]) -> String {
    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        kept.push_str(&text[cursor..span.start]);
        kept.push(' ');
        cursor = span.end;
    }
    kept.push_str(&text[cursor..]);
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

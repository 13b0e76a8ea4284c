//! Directory suggestions for the project or label token being typed.

use quickadd_core::InputState;
use serde::Serialize;

use crate::directory::{Directory, DirectoryEntry};
use crate::parsed::ParsedResult;
use crate::token::TokenKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub kind: TokenKind,
    /// Typed name without trigger or opening quote.
    pub query: String,
    pub start: usize,
    pub end: usize,
    pub candidates: Vec<DirectoryEntry>,
}

/// Suggestions for the live token of `result`, at most `limit` candidates.
///
/// Returns `None` when nothing is being typed. An empty candidate list
/// means the typed name would be a new entry.
pub fn suggest(result: &ParsedResult, directory: &Directory, limit: usize) -> Option<Suggestion> {
    let live = result.live_match()?;
    let query = live.raw_text[1..].trim_start_matches('"').to_string();
    let candidates = directory
        .search(live.kind, &query)
        .into_iter()
        .take(limit)
        .cloned()
        .collect();

    Some(Suggestion {
        kind: live.kind,
        query,
        start: live.start,
        end: live.end,
        candidates,
    })
}

/// Replaces the suggestion's span with the chosen entry and returns the new
/// text and caret. Names containing whitespace are quoted.
pub fn complete(text: &str, suggestion: &Suggestion, entry: &DirectoryEntry) -> (String, usize) {
    let trigger = match suggestion.kind {
        TokenKind::Label => '@',
        _ => '#',
    };
    let token = if entry.name.chars().any(char::is_whitespace) {
        format!("{}\"{}\" ", trigger, entry.name)
    } else {
        format!("{}{} ", trigger, entry.name)
    };

    let mut input = InputState::new();
    input.set(text.to_string());
    input.replace_range(suggestion.start..suggestion.end, &token);
    (input.as_str().to_string(), input.cursor_pos())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_at;
    use crate::token::TokenKindSet;
    use chrono::NaiveDate;

    fn directory() -> Directory {
        Directory::new(
            vec![
                DirectoryEntry::new("Homework"),
                DirectoryEntry::new("Work"),
                DirectoryEntry::new("Home Renovation"),
            ],
            vec![DirectoryEntry::new("waiting"), DirectoryEntry::new("awaiting-review")],
        )
    }

    fn parse_live(text: &str, dir: &Directory) -> ParsedResult {
        let now = NaiveDate::from_ymd_opt(2024, 5, 8)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        parse_at(text, Some(text.len()), now, dir, TokenKindSet::new())
    }

    #[test]
    fn test_suggest_ranks_prefix_first() {
        let dir = directory();
        let result = parse_live("Fix bug #wo", &dir);
        let suggestion = suggest(&result, &dir, 8).unwrap();
        assert_eq!(suggestion.kind, TokenKind::Project);
        assert_eq!(suggestion.query, "wo");
        assert_eq!((suggestion.start, suggestion.end), (8, 11));
        let names: Vec<&str> = suggestion.candidates.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Work", "Homework"]);
    }

    #[test]
    fn test_suggest_respects_limit_and_kind() {
        let dir = directory();
        let result = parse_live("Ping @wait", &dir);
        let suggestion = suggest(&result, &dir, 1).unwrap();
        assert_eq!(suggestion.kind, TokenKind::Label);
        assert_eq!(suggestion.candidates.len(), 1);
        assert_eq!(suggestion.candidates[0].name, "waiting");
    }

    #[test]
    fn test_no_suggestion_without_live_token() {
        let dir = directory();
        assert!(suggest(&parse_live("Fix bug #work ", &dir), &dir, 8).is_none());
        assert!(suggest(&parse_live("Fix bug", &dir), &dir, 8).is_none());
    }

    #[test]
    fn test_complete_replaces_span() {
        let dir = directory();
        let text = "Fix bug #wo";
        let suggestion = suggest(&parse_live(text, &dir), &dir, 8).unwrap();
        let (completed, caret) = complete(text, &suggestion, &dir.projects[1]);
        assert_eq!(completed, "Fix bug #Work ");
        assert_eq!(caret, completed.len());
    }

    #[test]
    fn test_complete_quotes_names_with_spaces() {
        let dir = directory();
        let text = "Paint #ho";
        let suggestion = suggest(&parse_live(text, &dir), &dir, 8).unwrap();
        let (completed, _) = complete(text, &suggestion, &dir.projects[2]);
        assert_eq!(completed, "Paint #\"Home Renovation\" ");
        // The completed token is committed on the next parse.
        let result = parse_live(&completed, &dir);
        assert_eq!(result.project.unwrap().name, "Home Renovation");
        assert_eq!(result.title, "Paint");
    }
}

//! Pattern matcher: finds typed token spans in raw quick-add text.
//!
//! Every grammar proposes candidate spans independently. Candidates are
//! then merged left to right: the earlier-starting span wins an overlap,
//! and of two spans starting at the same offset the longer one wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::token::{Match, TokenKind};

const WEEKDAY_FULL: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const WEEKDAY_ALL: &str = "monday|mon|tuesday|tues|tue|wednesday|wed|thursday|thurs|thur|thu|friday|fri|saturday|sat|sunday|sun";
const MONTH: &str = "january|jan|february|feb|march|mar|april|apr|may|june|jun|july|jul|august|aug|september|sept|sep|october|oct|november|nov|december|dec";
const COUNT: &str = r"\d+|a|an|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";

static NAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[#@](?:"[^"\n]+"|[^\s#@",;:!?()\[\]]+)"#).expect("valid name token regex")
});

static PRIORITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bp[1-4]\b").expect("valid priority regex"));

static DUE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b(?:(?:on|by|due)\s+(?:{wd_all})|(?:(?:on|by|due)\s+)?(?:today|tod|tomorrow|tmrw|tmr|(?:next|this)\s+(?:{wd_all})|{wd_full}|next\s+(?:week|month|year)|in\s+(?:{count})\s+(?:days?|weeks?|months?|years?)|\d{{4}}-\d{{1,2}}-\d{{1,2}}|(?:{month})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?|\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{month})(?:,?\s+\d{{4}})?|\d{{1,2}}/\d{{1,2}}(?:/\d{{2}}(?:\d{{2}})?)?))\b",
        wd_all = WEEKDAY_ALL,
        wd_full = WEEKDAY_FULL,
        count = COUNT,
        month = MONTH,
    );
    Regex::new(&pattern).expect("valid due date regex")
});

static DUE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:at\s+)?(?:\d{1,2}(?::\d{2})?\s?(?:am|pm)|\d{1,2}:\d{2}|noon|midnight)\b")
        .expect("valid due time regex")
});

static RECURRENCE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?i)\b(?:daily|weekly|monthly|yearly|annually|every\s+(?:other\s+)?(?:day|week|month|year)|every\s+\d+\s+(?:days?|weeks?|months?|years?)|every\s+(?:weekday|workday|weekend)|every\s+(?:{wd})(?:\s*(?:,|and|&)\s*(?:{wd}))*|every\s+\d{{1,2}}(?:st|nd|rd|th)|every\s+[a-z]+)\b",
        wd = WEEKDAY_ALL,
    );
    Regex::new(&pattern).expect("valid recurrence regex")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\bfor\s+|~)?\b(?:\d+(?:\.\d+)?(?:hours?|hrs?|h)(?:\d+(?:minutes?|mins?|m))?|\d+(?:\.\d+)?(?:minutes?|mins?|m|days?|d))\b",
    )
    .expect("valid duration regex")
});

/// Scans `text` for tokens as if it were complete (no caret).
pub fn match_text(text: &str) -> Vec<Match> {
    match_text_at(text, None)
}

/// Scans `text` for tokens. A project or label token that ends at `caret`
/// with nothing typed after it is flagged live: it is still being typed.
pub fn match_text_at(text: &str, caret: Option<usize>) -> Vec<Match> {
    let mut candidates = Vec::new();
    name_candidates(text, &mut candidates);
    regex_candidates(text, &PRIORITY, TokenKind::Priority, &mut candidates);
    regex_candidates(text, &RECURRENCE, TokenKind::Recurrence, &mut candidates);
    regex_candidates(text, &DUE_DATE, TokenKind::DueDate, &mut candidates);
    regex_candidates(text, &DUE_TIME, TokenKind::DueTime, &mut candidates);
    regex_candidates(text, &DURATION, TokenKind::Duration, &mut candidates);

    let mut matches = select_non_overlapping(candidates);
    for m in &mut matches {
        m.live = is_live(text, m, caret);
        tracing::trace!(kind = %m.kind, raw = %m.raw_text, start = m.start, live = m.live, "token");
    }
    matches
}

fn name_candidates(text: &str, out: &mut Vec<Match>) {
    for found in NAME_TOKEN.find_iter(text) {
        let start = found.start();
        let at_word_start = text[..start]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        if !at_word_start {
            continue;
        }

        let raw = found.as_str();
        let end = if raw[1..].starts_with('"') {
            found.end()
        } else {
            start + raw.trim_end_matches('.').len()
        };
        if end - start < 2 {
            continue;
        }

        let kind = if raw.starts_with('#') {
            TokenKind::Project
        } else {
            TokenKind::Label
        };
        out.push(Match::new(kind, text, start, end));
    }
}

fn regex_candidates(text: &str, pattern: &Regex, kind: TokenKind, out: &mut Vec<Match>) {
    out.extend(
        pattern
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| Match::new(kind, text, m.start(), m.end())),
    );
}

fn select_non_overlapping(mut candidates: Vec<Match>) -> Vec<Match> {
    // Stable: equal spans keep grammar order.
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

    let mut selected: Vec<Match> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match selected.last() {
            Some(last) if last.overlaps(&candidate) => {}
            _ => selected.push(candidate),
        }
    }
    selected
}

fn is_live(text: &str, m: &Match, caret: Option<usize>) -> bool {
    matches!(m.kind, TokenKind::Project | TokenKind::Label)
        && caret == Some(m.end)
        && m.end == text.len()
        && !m.raw_text.ends_with('"')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        match_text(text)
            .into_iter()
            .map(|m| (m.kind, m.raw_text))
            .collect()
    }

    #[test]
    fn test_empty_and_plain_text() {
        assert!(match_text("").is_empty());
        assert!(match_text("Buy groceries").is_empty());
    }

    #[test]
    fn test_priority_token() {
        assert_eq!(
            kinds("Buy groceries p1"),
            vec![(TokenKind::Priority, "p1".to_string())]
        );
        assert!(match_text("app1 p5 p12").is_empty());
        assert_eq!(kinds("P3 call")[0].0, TokenKind::Priority);
    }

    #[test]
    fn test_project_and_label_tokens() {
        assert_eq!(
            kinds("Buy milk #Shopping @errands @quick."),
            vec![
                (TokenKind::Project, "#Shopping".to_string()),
                (TokenKind::Label, "@errands".to_string()),
                (TokenKind::Label, "@quick".to_string()),
            ]
        );
    }

    #[test]
    fn test_trigger_must_start_a_word() {
        assert!(match_text("Learn C# and mail me@example.com").is_empty());
    }

    #[test]
    fn test_quoted_project_name() {
        assert_eq!(
            kinds(r#"Paint walls #"Home Renovation" p2"#),
            vec![
                (TokenKind::Project, r#"#"Home Renovation""#.to_string()),
                (TokenKind::Priority, "p2".to_string()),
            ]
        );
    }

    #[test]
    fn test_lone_trigger_is_not_a_token() {
        assert!(match_text("# @ #. @,").is_empty());
    }

    #[test]
    fn test_date_phrases() {
        for phrase in [
            "today",
            "tomorrow",
            "tmr",
            "friday",
            "next monday",
            "on sat",
            "next week",
            "in 3 days",
            "in a month",
            "2024-12-25",
            "dec 25th",
            "25 December 2025",
            "12/25",
            "due tomorrow",
        ] {
            let text = format!("Task {}", phrase);
            let found = kinds(&text);
            assert_eq!(
                found,
                vec![(TokenKind::DueDate, phrase.to_string())],
                "phrase {:?}",
                phrase
            );
        }
    }

    #[test]
    fn test_bare_weekday_abbreviation_is_plain_text() {
        assert!(match_text("I sat down").is_empty());
    }

    #[test]
    fn test_time_phrases() {
        for phrase in ["at 3pm", "5 pm", "10:30am", "at 14:15", "noon", "at midnight"] {
            let text = format!("Call {}", phrase);
            assert_eq!(
                kinds(&text),
                vec![(TokenKind::DueTime, phrase.to_string())],
                "phrase {:?}",
                phrase
            );
        }
    }

    #[test]
    fn test_recurrence_beats_contained_weekday() {
        assert_eq!(
            kinds("Standup every monday and wednesday"),
            vec![(
                TokenKind::Recurrence,
                "every monday and wednesday".to_string()
            )]
        );
    }

    #[test]
    fn test_recurrence_phrases() {
        for phrase in [
            "daily",
            "weekly",
            "every day",
            "every other week",
            "every 2 weeks",
            "every weekday",
            "every 15th",
            "every fortnight",
        ] {
            let text = format!("Water plants {}", phrase);
            assert_eq!(
                kinds(&text),
                vec![(TokenKind::Recurrence, phrase.to_string())],
                "phrase {:?}",
                phrase
            );
        }
    }

    #[test]
    fn test_duration_phrases() {
        for phrase in ["30m", "2h", "1h30m", "45min", "~20m", "for 1h", "2d", "1.5h"] {
            let text = format!("Write report {}", phrase);
            assert_eq!(
                kinds(&text),
                vec![(TokenKind::Duration, phrase.to_string())],
                "phrase {:?}",
                phrase
            );
        }
    }

    #[test]
    fn test_in_n_days_is_a_date_not_a_duration() {
        assert_eq!(
            kinds("Renew passport in 2 days"),
            vec![(TokenKind::DueDate, "in 2 days".to_string())]
        );
    }

    #[test]
    fn test_matches_are_ordered_and_disjoint() {
        let text = "Ship release #work @urgent p1 tomorrow at 5pm 2h every friday";
        let matches = match_text(text);
        assert_eq!(matches.len(), 7);
        for pair in matches.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for m in &matches {
            assert!(m.start < m.end);
            assert_eq!(&text[m.start..m.end], m.raw_text);
        }
    }

    #[test]
    fn test_earlier_start_wins_overlap() {
        // "#p1" is a project token, so the embedded p1 is not a priority.
        assert_eq!(kinds("Fix #p1"), vec![(TokenKind::Project, "#p1".to_string())]);
    }

    #[test]
    fn test_select_prefers_longer_span_at_same_start() {
        let text = "abcdef";
        let short = Match::new(TokenKind::DueDate, text, 0, 2);
        let long = Match::new(TokenKind::Recurrence, text, 0, 4);
        let later = Match::new(TokenKind::Priority, text, 3, 6);
        let selected = select_non_overlapping(vec![short, later, long.clone()]);
        assert_eq!(selected, vec![long]);
    }

    #[test]
    fn test_live_token_at_caret() {
        let text = "Buy groceries #wo";
        let matches = match_text_at(text, Some(text.len()));
        assert_eq!(matches.len(), 1);
        assert!(matches[0].live);

        let matches = match_text_at(text, Some(3));
        assert!(!matches[0].live);

        let text = "Buy groceries #work ";
        assert!(!match_text_at(text, Some(text.len()))[0].live);
    }

    #[test]
    fn test_matching_is_deterministic() {
        let text = "Plan trip #travel @family next friday p2 3h";
        assert_eq!(match_text(text), match_text(text));
    }
}

use chrono::Weekday;

use super::dates::{parse_count, parse_ordinal, parse_weekday};
use crate::recurrence::{Frequency, RecurrenceRule};

const WORKWEEK: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

/// Resolves a recurrence phrase to a rule. Unknown phrases and zero
/// intervals resolve to `None`.
pub fn resolve_recurrence(raw: &str) -> Option<RecurrenceRule> {
    let lowered = raw.to_lowercase().replace([',', '&'], " ");
    let words: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| *w != "and")
        .collect();

    match words.as_slice() {
        ["daily"] => Some(RecurrenceRule::daily()),
        ["weekly"] => Some(RecurrenceRule::new(Frequency::Weekly)),
        ["monthly"] => Some(RecurrenceRule::new(Frequency::Monthly)),
        ["yearly" | "annually"] => Some(RecurrenceRule::new(Frequency::Yearly)),
        ["every", rest @ ..] => every(rest),
        _ => None,
    }
}

fn every(words: &[&str]) -> Option<RecurrenceRule> {
    match words {
        [unit] => {
            if let Some(freq) = frequency(unit) {
                return Some(RecurrenceRule::new(freq));
            }
            match *unit {
                "weekday" | "workday" => Some(RecurrenceRule::weekly_on(&WORKWEEK)),
                "weekend" => Some(RecurrenceRule::weekly_on(&[Weekday::Sat, Weekday::Sun])),
                other => parse_weekday(other)
                    .map(|day| RecurrenceRule::weekly_on(&[day]))
                    .or_else(|| month_day(other)),
            }
        }
        ["other", unit] => frequency(unit).map(|freq| RecurrenceRule::new(freq).with_interval(2)),
        [count, unit] if count.chars().all(|c| c.is_ascii_digit()) => {
            let interval = parse_count(count).filter(|n| *n > 0)?;
            frequency(unit).map(|freq| RecurrenceRule::new(freq).with_interval(interval))
        }
        days => days
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Option<Vec<_>>>()
            .filter(|days| !days.is_empty())
            .map(|days| RecurrenceRule::weekly_on(&days)),
    }
}

fn frequency(unit: &str) -> Option<Frequency> {
    match unit.trim_end_matches('s') {
        "day" => Some(Frequency::Daily),
        "week" => Some(Frequency::Weekly),
        "month" => Some(Frequency::Monthly),
        "year" => Some(Frequency::Yearly),
        _ => None,
    }
}

/// `15th` style day-of-month; bare numbers are not a monthly rule.
fn month_day(word: &str) -> Option<RecurrenceRule> {
    if word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    parse_ordinal(word)
        .filter(|day| (1..=31).contains(day))
        .map(RecurrenceRule::monthly_on_day)
}

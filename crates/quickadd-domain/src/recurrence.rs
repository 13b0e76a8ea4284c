//! RRULE-style recurrence rules.
//!
//! Only the subset the quick-add grammar can produce is modelled:
//! `FREQ`, `INTERVAL`, `BYDAY` (plain weekdays) and `BYMONTHDAY`.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use quickadd_core::{QuickAddError, QuickAddResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    fn as_rrule(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RecurrenceRule {
    pub freq: Frequency,
    pub interval: u32,
    pub by_day: Vec<Weekday>,
    pub by_month_day: Option<u32>,
}

impl RecurrenceRule {
    pub fn new(freq: Frequency) -> Self {
        Self {
            freq,
            interval: 1,
            by_day: Vec::new(),
            by_month_day: None,
        }
    }

    pub fn daily() -> Self {
        Self::new(Frequency::Daily)
    }

    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = interval;
        self
    }

    /// Weekly on the given days, kept in Monday-first order without duplicates.
    pub fn weekly_on(days: &[Weekday]) -> Self {
        let mut by_day: Vec<Weekday> = Vec::new();
        for day in days {
            if !by_day.contains(day) {
                by_day.push(*day);
            }
        }
        by_day.sort_by_key(|d| d.num_days_from_monday());
        Self {
            by_day,
            ..Self::new(Frequency::Weekly)
        }
    }

    pub fn monthly_on_day(day: u32) -> Self {
        Self {
            by_month_day: Some(day),
            ..Self::new(Frequency::Monthly)
        }
    }

    /// First date on or after `from` that the rule produces. This is the
    /// initial due date a newly typed recurrence implies.
    pub fn first_occurrence(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self.freq {
            Frequency::Weekly if !self.by_day.is_empty() => (0..7)
                .map_while(|offset| from.checked_add_days(Days::new(offset)))
                .find(|date| self.by_day.contains(&date.weekday())),
            Frequency::Monthly => match self.by_month_day {
                Some(day) => first_month_day_on_or_after(from, day),
                None => Some(from),
            },
            _ => Some(from),
        }
    }

    pub fn to_rrule(&self) -> String {
        self.to_string()
    }
}

fn first_month_day_on_or_after(from: NaiveDate, day: u32) -> Option<NaiveDate> {
    let (mut year, mut month) = (from.year(), from.month());
    // Every day 1..=31 occurs within any 12 consecutive months.
    for _ in 0..12 {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            if date >= from {
                return Some(date);
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }
    None
}

fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn weekday_from_code(code: &str) -> Option<Weekday> {
    match code {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RRULE:FREQ={}", self.freq.as_rrule())?;
        if self.interval > 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if !self.by_day.is_empty() {
            let days: Vec<&str> = self.by_day.iter().map(|d| weekday_code(*d)).collect();
            write!(f, ";BYDAY={}", days.join(","))?;
        }
        if let Some(day) = self.by_month_day {
            write!(f, ";BYMONTHDAY={}", day)?;
        }
        Ok(())
    }
}

impl FromStr for RecurrenceRule {
    type Err = QuickAddError;

    fn from_str(s: &str) -> QuickAddResult<Self> {
        let invalid = |why: &str| QuickAddError::Validation(format!("invalid RRULE '{}': {}", s, why));
        let body = s.trim();
        let body = body.strip_prefix("RRULE:").unwrap_or(body);

        let mut freq = None;
        let mut rule = RecurrenceRule::daily();
        for part in body.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| invalid(part))?;
            match key.to_ascii_uppercase().as_str() {
                "FREQ" => {
                    freq = Some(match value.to_ascii_uppercase().as_str() {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        "YEARLY" => Frequency::Yearly,
                        other => return Err(invalid(other)),
                    })
                }
                "INTERVAL" => {
                    rule.interval = value
                        .parse()
                        .ok()
                        .filter(|n: &u32| *n > 0)
                        .ok_or_else(|| invalid(part))?;
                }
                "BYDAY" => {
                    let days = value
                        .split(',')
                        .map(|code| weekday_from_code(&code.to_ascii_uppercase()))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| invalid(part))?;
                    rule.by_day = RecurrenceRule::weekly_on(&days).by_day;
                }
                "BYMONTHDAY" => {
                    rule.by_month_day = Some(
                        value
                            .parse()
                            .ok()
                            .filter(|d: &u32| (1..=31).contains(d))
                            .ok_or_else(|| invalid(part))?,
                    );
                }
                other => return Err(invalid(other)),
            }
        }
        rule.freq = freq.ok_or_else(|| invalid("missing FREQ"))?;
        Ok(rule)
    }
}

impl From<RecurrenceRule> for String {
    fn from(rule: RecurrenceRule) -> Self {
        rule.to_string()
    }
}

impl TryFrom<String> for RecurrenceRule {
    type Error = QuickAddError;

    fn try_from(value: String) -> QuickAddResult<Self> {
        value.parse()
    }
}

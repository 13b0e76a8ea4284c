use chrono::{Datelike, Days, Months, NaiveDate, NaiveTime, Weekday};

/// Resolves a due-date phrase relative to `today`.
///
/// A bare or `this` weekday is the next occurrence on or after today, so
/// typing "monday" on a Monday means today. `next <weekday>` always means a
/// later day.
pub fn resolve_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lowered = raw.to_lowercase();
    let mut words: Vec<&str> = lowered.split_whitespace().collect();
    if matches!(words.first(), Some(&("on" | "by" | "due"))) {
        words.remove(0);
    }

    match words.as_slice() {
        ["today" | "tod"] => Some(today),
        ["tomorrow" | "tmr" | "tmrw"] => today.checked_add_days(Days::new(1)),
        ["next", "week"] => after(today, Weekday::Mon),
        ["next", "month"] => first_of_month(today).checked_add_months(Months::new(1)),
        ["next", "year"] => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1),
        ["next", day] => parse_weekday(day).and_then(|wd| after(today, wd)),
        ["this", day] => parse_weekday(day).and_then(|wd| on_or_after(today, wd)),
        ["in", count, unit] => offset(today, parse_count(count)?, unit),
        [single] => parse_weekday(single)
            .and_then(|wd| on_or_after(today, wd))
            .or_else(|| parse_iso(single))
            .or_else(|| parse_slashed(single, today)),
        _ => parse_month_day(&words, today),
    }
}

/// Resolves a due-time phrase (`3pm`, `10:30 am`, `14:15`, `noon`).
pub fn resolve_time(raw: &str) -> Option<NaiveTime> {
    let lowered = raw.to_lowercase();
    let trimmed = lowered.trim();
    let body: String = trimmed
        .strip_prefix("at")
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    match body.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let (clock, meridiem) = if let Some(rest) = body.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = body.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (body.as_str(), None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (clock.parse::<u32>().ok()?, 0),
    };

    let hour = match meridiem {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

pub(crate) fn parse_weekday(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_month(word: &str) -> Option<u32> {
    let month = match word.trim_end_matches('.') {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

pub(crate) fn parse_count(word: &str) -> Option<u32> {
    let count = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => return digits.parse().ok(),
    };
    Some(count)
}

/// Parses a day-of-month with an optional ordinal suffix (`5`, `21st`).
pub(crate) fn parse_ordinal(word: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix))
        .unwrap_or(word);
    digits.parse().ok()
}

fn on_or_after(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let ahead = (7 + weekday.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    today.checked_add_days(Days::new(u64::from(ahead)))
}

fn after(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let next = on_or_after(today, weekday)?;
    if next == today {
        today.checked_add_days(Days::new(7))
    } else {
        Some(next)
    }
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn offset(today: NaiveDate, count: u32, unit: &str) -> Option<NaiveDate> {
    match unit.trim_end_matches('s') {
        "day" => today.checked_add_days(Days::new(u64::from(count))),
        "week" => today.checked_add_days(Days::new(u64::from(count) * 7)),
        "month" => today.checked_add_months(Months::new(count)),
        "year" => today.checked_add_months(Months::new(count.checked_mul(12)?)),
        _ => None,
    }
}

fn parse_iso(word: &str) -> Option<NaiveDate> {
    let mut parts = word.split('-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `M/D`, `M/D/YY` or `M/D/YYYY`.
fn parse_slashed(word: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = word.split('/').collect();
    let (month, day) = match parts.as_slice() {
        [m, d] | [m, d, _] => (m.parse().ok()?, d.parse().ok()?),
        _ => return None,
    };
    match parts.get(2) {
        Some(year) => NaiveDate::from_ymd_opt(expand_year(year.parse().ok()?), month, day),
        None => upcoming(today, month, day),
    }
}

/// `dec 25`, `december 25th, 2025`, `25 dec`, `25th december 2025`.
fn parse_month_day(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let cleaned: Vec<&str> = words.iter().map(|w| w.trim_end_matches(',')).collect();
    let (month, day, year) = match cleaned.as_slice() {
        [first, second] | [first, second, _] => match parse_month(first) {
            Some(month) => (month, parse_ordinal(second)?, cleaned.get(2)),
            None => (parse_month(second)?, parse_ordinal(first)?, cleaned.get(2)),
        },
        _ => return None,
    };
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year.parse().ok()?, month, day),
        None => upcoming(today, month, day),
    }
}

/// The month/day in the current year unless it has already passed.
fn upcoming(today: NaiveDate, month: u32, day: u32) -> Option<NaiveDate> {
    match NaiveDate::from_ymd_opt(today.year(), month, day) {
        Some(date) if date >= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
    }
}

fn expand_year(year: i32) -> i32 {
    if year < 100 {
        2000 + year
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-05-08 is a Wednesday.
    fn today() -> NaiveDate {
        date(2024, 5, 8)
    }

    #[test]
    fn test_relative_keywords() {
        assert_eq!(resolve_date("today", today()), Some(today()));
        assert_eq!(resolve_date("Tod", today()), Some(today()));
        assert_eq!(resolve_date("tomorrow", today()), Some(date(2024, 5, 9)));
        assert_eq!(resolve_date("due tmr", today()), Some(date(2024, 5, 9)));
    }

    #[test]
    fn test_bare_weekday_counts_today() {
        assert_eq!(resolve_date("wednesday", today()), Some(today()));
        assert_eq!(resolve_date("this wed", today()), Some(today()));
        assert_eq!(resolve_date("friday", today()), Some(date(2024, 5, 10)));
        assert_eq!(resolve_date("on mon", today()), Some(date(2024, 5, 13)));
    }

    #[test]
    fn test_next_weekday_is_always_later() {
        assert_eq!(resolve_date("next wednesday", today()), Some(date(2024, 5, 15)));
        assert_eq!(resolve_date("next friday", today()), Some(date(2024, 5, 10)));
    }

    #[test]
    fn test_dates_past_calendar_end_are_none() {
        let last = NaiveDate::MAX;
        let next_day = last.weekday().succ();
        assert_eq!(resolve_date("tomorrow", last), None);
        assert_eq!(resolve_date("next week", last), None);
        assert_eq!(resolve_date(&next_day.to_string(), last), None);
        assert_eq!(resolve_date(&format!("next {}", last.weekday()), last), None);
        assert_eq!(resolve_date("today", last), Some(last));
    }

    #[test]
    fn test_next_period() {
        assert_eq!(resolve_date("next week", today()), Some(date(2024, 5, 13)));
        assert_eq!(resolve_date("next month", today()), Some(date(2024, 6, 1)));
        assert_eq!(resolve_date("next year", today()), Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_in_n_units() {
        assert_eq!(resolve_date("in 3 days", today()), Some(date(2024, 5, 11)));
        assert_eq!(resolve_date("in two weeks", today()), Some(date(2024, 5, 22)));
        assert_eq!(resolve_date("in a month", today()), Some(date(2024, 6, 8)));
        assert_eq!(resolve_date("in 1 year", today()), Some(date(2025, 5, 8)));
        assert_eq!(
            resolve_date("in 1 month", date(2024, 1, 31)),
            Some(date(2024, 2, 29))
        );
    }

    #[test]
    fn test_absolute_forms() {
        assert_eq!(resolve_date("2024-12-25", today()), Some(date(2024, 12, 25)));
        assert_eq!(resolve_date("dec 25th", today()), Some(date(2024, 12, 25)));
        assert_eq!(resolve_date("25 December 2025", today()), Some(date(2025, 12, 25)));
        assert_eq!(resolve_date("jan 5, 2026", today()), Some(date(2026, 1, 5)));
        assert_eq!(resolve_date("12/25", today()), Some(date(2024, 12, 25)));
        assert_eq!(resolve_date("1/2/25", today()), Some(date(2025, 1, 2)));
    }

    #[test]
    fn test_past_month_day_rolls_to_next_year() {
        assert_eq!(resolve_date("jan 3", today()), Some(date(2025, 1, 3)));
        assert_eq!(resolve_date("may 8", today()), Some(today()));
    }

    #[test]
    fn test_impossible_dates_are_none() {
        assert_eq!(resolve_date("feb 30", today()), None);
        assert_eq!(resolve_date("2024-13-01", today()), None);
        assert_eq!(resolve_date("13/45", today()), None);
        assert_eq!(resolve_date("someday", today()), None);
    }

    #[test]
    fn test_times() {
        let t = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        assert_eq!(resolve_time("at 3pm"), t(15, 0));
        assert_eq!(resolve_time("5 PM"), t(17, 0));
        assert_eq!(resolve_time("10:30am"), t(10, 30));
        assert_eq!(resolve_time("12am"), t(0, 0));
        assert_eq!(resolve_time("12pm"), t(12, 0));
        assert_eq!(resolve_time("at 14:15"), t(14, 15));
        assert_eq!(resolve_time("noon"), t(12, 0));
        assert_eq!(resolve_time("at midnight"), t(0, 0));
    }

    #[test]
    fn test_invalid_times_are_none() {
        assert_eq!(resolve_time("13pm"), None);
        assert_eq!(resolve_time("0am"), None);
        assert_eq!(resolve_time("25:00"), None);
        assert_eq!(resolve_time("9:75"), None);
    }
}

/// What a duration phrase measures. `for 1h` books a time block, a bare
/// `1h` (or `~1h`) estimates effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationRole {
    Estimate,
    Span,
}

/// Resolves `<n><unit>` sequences such as `45m`, `2h`, `1h30m` or `3d` to
/// whole seconds. Fractional amounts and zero totals resolve to `None`.
pub fn resolve_duration(raw: &str) -> Option<(DurationRole, u32)> {
    let lowered = raw.trim().to_lowercase();
    let (role, body) = match lowered.strip_prefix("for") {
        Some(rest) => (DurationRole::Span, rest.trim_start()),
        None => (DurationRole::Estimate, lowered.trim_start_matches('~')),
    };

    let mut total: u32 = 0;
    let mut rest = body;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits_end == 0 {
            return None;
        }
        let amount: u32 = rest[..digits_end].parse().ok()?;
        rest = &rest[digits_end..];

        let unit_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let seconds_per_unit = unit_seconds(&rest[..unit_end])?;
        rest = rest[unit_end..].trim_start();

        total = total.checked_add(amount.checked_mul(seconds_per_unit)?)?;
    }

    (total > 0).then_some((role, total))
}

fn unit_seconds(unit: &str) -> Option<u32> {
    match unit {
        "m" | "min" | "mins" | "minute" | "minutes" => Some(60),
        "h" | "hr" | "hrs" | "hour" | "hours" => Some(3_600),
        "d" | "day" | "days" => Some(86_400),
        _ => None,
    }
}

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Hour used when a card carries no time of day
pub const DEFAULT_HOUR: u32 = 21;

/// Turkish month names in calendar order. Lookup is first-entry-wins.
pub const MONTHS: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{1,2})[:.]([0-9]{2})").expect("valid time regex"));

struct MonthPattern {
    number: u32,
    lowered: String,
    /// "<day> <month>" first, then "<month> <day>"
    day_rules: [Regex; 2],
}

static MONTH_PATTERNS: Lazy<Vec<MonthPattern>> = Lazy::new(|| {
    MONTHS
        .iter()
        .zip(1u32..)
        .map(|(name, number)| {
            let escaped = regex::escape(name);
            MonthPattern {
                number,
                lowered: name.to_lowercase(),
                day_rules: [
                    Regex::new(&format!(r"(?i)([0-9]{{1,2}})\s+{}", escaped))
                        .expect("valid day-month regex"),
                    Regex::new(&format!(r"(?i){}\s+([0-9]{{1,2}})", escaped))
                        .expect("valid month-day regex"),
                ],
            }
        })
        .collect()
});

/// Month found in the text, with the day next to it when there is one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MonthMatch {
    month: u32,
    day: Option<u32>,
}

/// Recovers an event start time from free text.
///
/// Never fails: anything that cannot be turned into a real calendar
/// timestamp falls back to tomorrow at 21:00. A month earlier than the
/// current one is taken to mean next year.
pub fn extract_start_time(text: &str, now: NaiveDateTime) -> NaiveDateTime {
    let fallback = default_start(now);
    let (hour, minute) = find_time(text).unwrap_or((DEFAULT_HOUR, 0));

    let date = match find_month(text) {
        Some(found) => {
            let year = if found.month < now.month() {
                now.year() + 1
            } else {
                now.year()
            };
            let day = found.day.unwrap_or_else(|| fallback.day());
            NaiveDate::from_ymd_opt(year, found.month, day)
        }
        None => Some(fallback.date()),
    };

    date.and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or(fallback)
}

/// Tomorrow at the default hour, seconds zeroed
pub fn default_start(now: NaiveDateTime) -> NaiveDateTime {
    let tomorrow = now.date().succ_opt().unwrap_or_else(|| now.date());
    tomorrow.and_time(NaiveTime::MIN) + Duration::hours(i64::from(DEFAULT_HOUR))
}

fn find_time(text: &str) -> Option<(u32, u32)> {
    let caps = TIME_RE.captures(text)?;
    let hour = caps.get(1)?.as_str().parse().ok()?;
    let minute = caps.get(2)?.as_str().parse().ok()?;
    Some((hour, minute))
}

fn find_month(text: &str) -> Option<MonthMatch> {
    let lowered = text.to_lowercase();
    let pattern = MONTH_PATTERNS
        .iter()
        .find(|p| lowered.contains(&p.lowered))?;

    let day = pattern.day_rules.iter().find_map(|rule| {
        rule.captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    });

    Some(MonthMatch {
        month: pattern.number,
        day,
    })
}

//! Natural-language time-window parsing.
//!
//! Calendar mode accepts window descriptions like "next week evenings" or
//! "weekend mornings". The grammar is deliberately small: a handful of
//! fixed patterns over week references, weekday names, and day parts.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static NEXT_WEEK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)next\s+week\s+(\w+)").unwrap());
static THIS_WEEK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)this\s+week\s+(\w+)").unwrap());
static WEEKEND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)weekends?\s+(\w+)").unwrap());
static THIS_OR_NEXT_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(this|next)\s+(\w+)(?:\s+(\w+))?").unwrap());
static DAY_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:next\s+)?(\w+)\s+to\s+(\w+)").unwrap());
static DAY_PART_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(morning|afternoon|evening|night)s?$").unwrap());

/// Named portion of a day with fixed hour bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPart {
    /// Start/end hours of the part (end exclusive, 24h clock).
    pub fn hours(&self) -> (u32, u32) {
        match self {
            Self::Morning => (9, 12),
            Self::Afternoon => (12, 18),
            Self::Evening => (18, 22),
            Self::Night => (22, 24),
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().trim_end_matches('s') {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            "evening" => Some(Self::Evening),
            "night" => Some(Self::Night),
            _ => None,
        }
    }
}

/// A parsed availability window: a date span, optionally restricted to
/// particular weekdays and a day part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window (inclusive).
    pub end_date: NaiveDate,
    /// Restriction to specific weekdays, if any.
    pub days_of_week: Option<Vec<Weekday>>,
    /// Restriction to a day part, if any.
    pub day_part: Option<DayPart>,
    /// Normalized description echoed back to the user.
    pub description: String,
}

impl TimeWindow {
    /// True if `date` falls inside the window's date span and weekday
    /// restriction.
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        if date < self.start_date || date > self.end_date {
            return false;
        }
        match &self.days_of_week {
            Some(days) => days.contains(&date.weekday()),
            None => true,
        }
    }

    /// Hour bounds to search within on each included day.
    pub fn search_hours(&self) -> (u32, u32) {
        self.day_part.map(|p| p.hours()).unwrap_or((9, 22))
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    match name.to_lowercase().as_str() {
        "sunday" | "sun" => Some(Weekday::Sun),
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Monday of the week containing `date`.
fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Next strictly-future occurrence of `target` after `from`.
fn next_occurrence(target: Weekday, from: NaiveDate) -> NaiveDate {
    let current = from.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut days_ahead = wanted - current;
    if days_ahead <= 0 {
        days_ahead += 7;
    }
    from + Duration::days(days_ahead)
}

/// Occurrence of `target` within the week containing `from`.
fn this_week_occurrence(target: Weekday, from: NaiveDate) -> NaiveDate {
    start_of_week(from) + Duration::days(target.num_days_from_monday() as i64)
}

/// Parses a natural-language window description relative to `reference`.
///
/// Returns `None` when no pattern matches; callers treat that as "no
/// availability found" rather than an error.
pub fn parse_time_window(message: &str, reference: NaiveDate) -> Option<TimeWindow> {
    let text = message.trim();

    // "next week evenings"
    if let Some(caps) = NEXT_WEEK.captures(text) {
        if let Some(part) = DayPart::from_name(&caps[1]) {
            let start = start_of_week(reference) + Duration::days(7);
            return Some(TimeWindow {
                start_date: start,
                end_date: start + Duration::days(6),
                days_of_week: None,
                day_part: Some(part),
                description: format!("next week {}", caps[1].to_lowercase()),
            });
        }
    }

    // "this week mornings"
    if let Some(caps) = THIS_WEEK.captures(text) {
        if let Some(part) = DayPart::from_name(&caps[1]) {
            let start = start_of_week(reference);
            return Some(TimeWindow {
                start_date: start,
                end_date: start + Duration::days(6),
                days_of_week: None,
                day_part: Some(part),
                description: format!("this week {}", caps[1].to_lowercase()),
            });
        }
    }

    // "weekend mornings"
    if let Some(caps) = WEEKEND.captures(text) {
        if let Some(part) = DayPart::from_name(&caps[1]) {
            let saturday = next_occurrence(Weekday::Sat, reference);
            return Some(TimeWindow {
                start_date: saturday,
                end_date: saturday + Duration::days(1),
                days_of_week: Some(vec![Weekday::Sat, Weekday::Sun]),
                day_part: Some(part),
                description: format!("weekend {}", caps[1].to_lowercase()),
            });
        }
    }

    // "next Friday evening" / "this Monday"
    if let Some(caps) = THIS_OR_NEXT_DAY.captures(text) {
        if let Some(day) = weekday_from_name(&caps[2]) {
            let is_next = caps[1].to_lowercase() == "next";
            let date = if is_next {
                next_occurrence(day, reference)
            } else {
                this_week_occurrence(day, reference)
            };
            let part = caps.get(3).and_then(|m| DayPart::from_name(m.as_str()));
            let mut description = format!(
                "{} {}",
                if is_next { "next" } else { "this" },
                caps[2].to_lowercase()
            );
            if let Some(m) = caps.get(3) {
                if part.is_some() {
                    description.push(' ');
                    description.push_str(&m.as_str().to_lowercase());
                }
            }
            return Some(TimeWindow {
                start_date: date,
                end_date: date,
                days_of_week: Some(vec![day]),
                day_part: part,
                description,
            });
        }
    }

    // "Monday to Wednesday" / "next Monday to Wednesday"
    if let Some(caps) = DAY_RANGE.captures(text) {
        if let (Some(start_day), Some(end_day)) =
            (weekday_from_name(&caps[1]), weekday_from_name(&caps[2]))
        {
            let start = next_occurrence(start_day, reference);
            let start_n = start_day.num_days_from_monday() as i64;
            let end_n = end_day.num_days_from_monday() as i64;
            let mut span = end_n - start_n;
            if span < 0 {
                span += 7;
            }
            let mut days = Vec::new();
            let mut d = start;
            for _ in 0..=span {
                days.push(d.weekday());
                d += Duration::days(1);
            }
            return Some(TimeWindow {
                start_date: start,
                end_date: start + Duration::days(span),
                days_of_week: Some(days),
                day_part: None,
                description: format!(
                    "{} to {}",
                    caps[1].to_lowercase(),
                    caps[2].to_lowercase()
                ),
            });
        }
    }

    // bare "evenings"
    if let Some(caps) = DAY_PART_ONLY.captures(text) {
        if let Some(part) = DayPart::from_name(&caps[1]) {
            return Some(TimeWindow {
                start_date: reference,
                end_date: reference + Duration::days(7),
                days_of_week: None,
                day_part: Some(part),
                description: caps[1].to_lowercase(),
            });
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // Wednesday.
    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
    }

    mod week_patterns {
        use super::*;

        #[test]
        fn next_week_evenings_spans_the_following_monday_to_sunday() {
            let window = parse_time_window("next week evenings", reference()).unwrap();
            assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2025, 12, 15).unwrap());
            assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2025, 12, 21).unwrap());
            assert_eq!(window.day_part, Some(DayPart::Evening));
            assert_eq!(window.search_hours(), (18, 22));
        }

        #[test]
        fn this_week_mornings_spans_the_current_week() {
            let window = parse_time_window("this week mornings", reference()).unwrap();
            assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2025, 12, 8).unwrap());
            assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2025, 12, 14).unwrap());
            assert_eq!(window.day_part, Some(DayPart::Morning));
        }

        #[test]
        fn weekend_afternoons_restricts_to_saturday_and_sunday() {
            let window = parse_time_window("weekend afternoons", reference()).unwrap();
            assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2025, 12, 13).unwrap());
            assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2025, 12, 14).unwrap());
            assert_eq!(
                window.days_of_week,
                Some(vec![Weekday::Sat, Weekday::Sun])
            );
        }
    }

    mod day_patterns {
        use super::*;

        #[test]
        fn next_friday_evening_is_a_single_day() {
            let window = parse_time_window("next Friday evening", reference()).unwrap();
            assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2025, 12, 12).unwrap());
            assert_eq!(window.start_date, window.end_date);
            assert_eq!(window.day_part, Some(DayPart::Evening));
        }

        #[test]
        fn monday_to_wednesday_builds_a_three_day_span() {
            let window = parse_time_window("Monday to Wednesday", reference()).unwrap();
            assert_eq!(window.start_date, NaiveDate::from_ymd_opt(2025, 12, 15).unwrap());
            assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2025, 12, 17).unwrap());
            assert_eq!(
                window.days_of_week,
                Some(vec![Weekday::Mon, Weekday::Tue, Weekday::Wed])
            );
        }
    }

    mod day_part_only {
        use super::*;

        #[test]
        fn bare_evenings_defaults_to_the_next_seven_days() {
            let window = parse_time_window("evenings", reference()).unwrap();
            assert_eq!(window.start_date, reference());
            assert_eq!(window.end_date, reference() + Duration::days(7));
            assert_eq!(window.day_part, Some(DayPart::Evening));
        }
    }

    mod rejects {
        use super::*;

        #[test]
        fn unintelligible_input_yields_none() {
            assert!(parse_time_window("whenever is fine", reference()).is_none());
            assert!(parse_time_window("", reference()).is_none());
            assert!(parse_time_window("next week sometime", reference()).is_none());
        }
    }

    #[test]
    fn includes_date_honors_span_and_weekday_restriction() {
        let window = parse_time_window("weekend mornings", reference()).unwrap();
        assert!(window.includes_date(NaiveDate::from_ymd_opt(2025, 12, 13).unwrap()));
        assert!(window.includes_date(NaiveDate::from_ymd_opt(2025, 12, 14).unwrap()));
        assert!(!window.includes_date(NaiveDate::from_ymd_opt(2025, 12, 12).unwrap()));
        assert!(!window.includes_date(NaiveDate::from_ymd_opt(2025, 12, 20).unwrap()));
    }
}

//! Candidate slots and their text representations.
//!
//! Covers both directions of time negotiation: parsing explicit 1-3
//! option lists in no-calendar mode, and rendering a calendar proposal
//! with a week view in calendar mode.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A concrete proposed date/time range surfaced for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandidateSlot {
    /// Creates a slot from explicit bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Convenience constructor: a slot starting at the given local-less
    /// date/time with the given duration in hours.
    pub fn from_ymd_hm(year: i32, month: u32, day: u32, hour: u32, minute: u32, hours: i64) -> Self {
        let start = Utc
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .expect("valid date components");
        Self {
            start,
            end: start + Duration::hours(hours),
        }
    }

    /// True if this slot overlaps the given range at all.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Long human description: "Thursday, Dec 19 at 6:00 PM-8:00 PM".
    pub fn description(&self) -> String {
        format!(
            "{} at {}-{}",
            self.start.format("%A, %b %-d"),
            self.start.format("%-I:%M %p"),
            self.end.format("%-I:%M %p")
        )
    }

    /// Short description for option lists: "Thu 12/19, 6:00-8:00pm".
    pub fn short_description(&self) -> String {
        format!(
            "{} {}/{}, {}-{}",
            self.start.format("%a"),
            self.start.month(),
            self.start.day(),
            self.start.format("%-I:%M"),
            self.end.format("%-I:%M%P")
        )
    }
}

/// Errors parsing an explicit time-options message.
#[derive(Debug, Clone, Error)]
pub enum TimeOptionsError {
    /// Nothing in the message looked like a concrete time option.
    #[error("No concrete time options found")]
    NoneFound,

    /// More than the allowed number of options were supplied.
    #[error("Too many time options: {0} (maximum 3)")]
    TooMany(usize),

    /// A matched entry had impossible date or time components.
    #[error("Invalid date or time in option: {0}")]
    InvalidComponent(String),
}

static TIME_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(mon|tue|tues|wed|thu|thur|thurs|fri|sat|sun)[a-z]*\.?\s+
        (\d{1,2})/(\d{1,2}),?\s*
        (\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*-\s*
        (\d{1,2})(?::(\d{2}))?\s*(am|pm)\b",
    )
    .unwrap()
});

/// Maximum options accepted in no-calendar mode.
pub const MAX_TIME_OPTIONS: usize = 3;

fn to_24h(hour: u32, meridiem: &str) -> u32 {
    match (hour, meridiem) {
        (12, "am") => 0,
        (h, "pm") if h != 12 => h + 12,
        (h, _) => h,
    }
}

/// Parses explicit candidate times like
/// "Thu 12/19, 6-8pm, Sat 12/21, 10am-12pm" into 1-3 slots.
///
/// Dates without a year are resolved to the first occurrence on or after
/// `reference`. A start time without am/pm inherits the end's meridiem.
pub fn parse_time_options(
    message: &str,
    reference: NaiveDate,
) -> Result<Vec<CandidateSlot>, TimeOptionsError> {
    let mut slots = Vec::new();

    for caps in TIME_OPTION.captures_iter(message) {
        let month: u32 = caps[2]
            .parse()
            .map_err(|_| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;
        let day: u32 = caps[3]
            .parse()
            .map_err(|_| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;

        let mut date = NaiveDate::from_ymd_opt(reference.year(), month, day)
            .ok_or_else(|| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;
        if date < reference {
            date = NaiveDate::from_ymd_opt(reference.year() + 1, month, day)
                .ok_or_else(|| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;
        }

        let end_meridiem = caps[9].to_lowercase();
        let start_meridiem = caps
            .get(6)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| end_meridiem.clone());

        let start_hour_raw: u32 = caps[4].parse().unwrap_or(0);
        let end_hour_raw: u32 = caps[7].parse().unwrap_or(0);
        let start_min: u32 = caps.get(5).map_or(0, |m| m.as_str().parse().unwrap_or(0));
        let end_min: u32 = caps.get(8).map_or(0, |m| m.as_str().parse().unwrap_or(0));

        let start_hour = to_24h(start_hour_raw, &start_meridiem);
        let end_hour = to_24h(end_hour_raw, &end_meridiem);

        let start_naive = date
            .and_hms_opt(start_hour, start_min, 0)
            .ok_or_else(|| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;
        let end_naive = date
            .and_hms_opt(end_hour, end_min, 0)
            .ok_or_else(|| TimeOptionsError::InvalidComponent(caps[0].to_string()))?;

        if end_naive <= start_naive {
            return Err(TimeOptionsError::InvalidComponent(caps[0].to_string()));
        }

        slots.push(CandidateSlot::new(
            Utc.from_utc_datetime(&start_naive),
            Utc.from_utc_datetime(&end_naive),
        ));
    }

    if slots.is_empty() {
        return Err(TimeOptionsError::NoneFound);
    }
    if slots.len() > MAX_TIME_OPTIONS {
        return Err(TimeOptionsError::TooMany(slots.len()));
    }
    Ok(slots)
}

/// Four rendering blocks per day in the week view.
const BLOCKS: [(u32, u32); 4] = [(9, 13), (13, 17), (17, 21), (21, 24)];

/// Renders the SMS week view around a proposal.
///
/// One row per day, Monday through Sunday of the proposal's week. Each
/// block is marked `[*]` for the proposed slot, `[free]` when another
/// known-free candidate covers it, or `[--]` when nothing is known
/// about it.
pub fn week_view(proposal: &CandidateSlot, alternates: &[CandidateSlot]) -> String {
    let proposal_date = proposal.start.date_naive();
    let week_start =
        proposal_date - Duration::days(proposal_date.weekday().num_days_from_monday() as i64);

    let mut view = String::from("Week view:\n");
    for offset in 0..7 {
        let day = week_start + Duration::days(offset);
        view.push_str(&format!("{} {}/{} ", day.format("%a"), day.month(), day.day()));

        for (block_start_hour, block_end_hour) in BLOCKS {
            let block_start = Utc.from_utc_datetime(
                &day.and_hms_opt(block_start_hour, 0, 0).expect("valid block hour"),
            );
            let block_end = Utc.from_utc_datetime(
                &day.and_hms_opt(block_end_hour - 1, 59, 59).expect("valid block hour"),
            ) + Duration::seconds(1);

            let mark = if proposal.overlaps(block_start, block_end) {
                "[*]"
            } else if alternates.iter().any(|s| s.overlaps(block_start, block_end)) {
                "[free]"
            } else {
                "[--]"
            };
            view.push(' ');
            view.push_str(mark);
        }
        view.push('\n');
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 10).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn parses_two_options_with_shared_meridiem() {
            let slots =
                parse_time_options("Thu 12/19, 6-8pm, Sat 12/21, 10am-12pm", reference()).unwrap();
            assert_eq!(slots.len(), 2);

            assert_eq!(slots[0].start, Utc.with_ymd_and_hms(2025, 12, 19, 18, 0, 0).unwrap());
            assert_eq!(slots[0].end, Utc.with_ymd_and_hms(2025, 12, 19, 20, 0, 0).unwrap());

            assert_eq!(slots[1].start, Utc.with_ymd_and_hms(2025, 12, 21, 10, 0, 0).unwrap());
            assert_eq!(slots[1].end, Utc.with_ymd_and_hms(2025, 12, 21, 12, 0, 0).unwrap());
        }

        #[test]
        fn parses_minutes_when_present() {
            let slots = parse_time_options("Fri 12/12, 6:30-8:15pm", reference()).unwrap();
            assert_eq!(slots[0].start, Utc.with_ymd_and_hms(2025, 12, 12, 18, 30, 0).unwrap());
            assert_eq!(slots[0].end, Utc.with_ymd_and_hms(2025, 12, 12, 20, 15, 0).unwrap());
        }

        #[test]
        fn past_dates_roll_to_next_year() {
            let slots = parse_time_options("Sat 1/10, 6-8pm", reference()).unwrap();
            assert_eq!(slots[0].start.year(), 2026);
        }

        #[test]
        fn free_text_is_not_an_option_list() {
            let result = parse_time_options("next week evenings", reference());
            assert!(matches!(result, Err(TimeOptionsError::NoneFound)));
        }

        #[test]
        fn more_than_three_options_is_rejected() {
            let message = "Mon 12/15, 6-8pm, Tue 12/16, 6-8pm, Wed 12/17, 6-8pm, Thu 12/18, 6-8pm";
            let result = parse_time_options(message, reference());
            assert!(matches!(result, Err(TimeOptionsError::TooMany(4))));
        }

        #[test]
        fn inverted_range_is_rejected() {
            let result = parse_time_options("Thu 12/19, 8-6pm", reference());
            assert!(matches!(result, Err(TimeOptionsError::InvalidComponent(_))));
        }
    }

    mod descriptions {
        use super::*;

        #[test]
        fn long_description_names_the_weekday() {
            let slot = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
            let text = slot.description();
            assert!(text.contains("Friday"), "got {text:?}");
            assert!(text.contains("Dec 19"));
            assert!(text.contains("6:00 PM"));
            assert!(text.contains("8:00 PM"));
        }

        #[test]
        fn short_description_uses_slash_date() {
            let slot = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
            let text = slot.short_description();
            assert!(text.starts_with("Fri 12/19"), "got {text:?}");
        }
    }

    mod week_view_rendering {
        use super::*;

        #[test]
        fn marks_proposal_alternates_and_unknown_blocks() {
            // Friday evening proposal, Saturday morning alternate.
            let proposal = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
            let alternate = CandidateSlot::from_ymd_hm(2025, 12, 20, 10, 0, 2);

            let view = week_view(&proposal, &[alternate]);

            assert!(view.starts_with("Week view:\n"));
            let fri = view.lines().find(|l| l.starts_with("Fri")).unwrap();
            assert!(fri.contains("[*]"), "got {fri:?}");
            let sat = view.lines().find(|l| l.starts_with("Sat")).unwrap();
            assert!(sat.contains("[free]"), "got {sat:?}");
            // Days with no candidate carry the no-information mark only.
            let mon = view.lines().find(|l| l.starts_with("Mon")).unwrap();
            assert!(mon.contains("[--]"), "got {mon:?}");
            assert!(!mon.contains("[*]") && !mon.contains("[free]"));
        }

        #[test]
        fn renders_monday_through_sunday() {
            let proposal = CandidateSlot::from_ymd_hm(2025, 12, 17, 18, 0, 2);
            let view = week_view(&proposal, &[]);
            for day in ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"] {
                assert!(view.contains(day), "missing {day} in {view:?}");
            }
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let slot = CandidateSlot::from_ymd_hm(2025, 12, 19, 18, 0, 2);
        let end = slot.end;
        // Touching ranges do not overlap.
        assert!(!slot.overlaps(end, end + Duration::hours(1)));
        assert!(slot.overlaps(end - Duration::minutes(1), end + Duration::hours(1)));
    }
}

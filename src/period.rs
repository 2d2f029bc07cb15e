//! Interpretation of free-text announcement periods.
//!
//! Period strings in the store come in many shapes (`20250915~20251010`,
//! `"20250915"`, `2025년 9월`, `2025.9.15`, `예산 소진시까지`, ...). Parsing is
//! a fixed, ordered table of (pattern, resolver) pairs: the first resolver that
//! produces a valid date wins. Nothing here fails; text that no resolver
//! accepts becomes [`PeriodInfo::unknown`].

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

/// Marks an announcement that stays open until its budget runs out
pub const BUDGET_EXHAUSTION_MARKER: &str = "예산 소진시까지";

/// Marks an announcement that accepts applications at any time
pub const ONGOING_MARKER: &str = "상시";

const ALWAYS_ACTIVE_MARKERS: &[&str] = &[BUDGET_EXHAUSTION_MARKER, ONGOING_MARKER];

/// What could be recovered from a period string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodInfo {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// No fixed closing date
    pub always_active: bool,
    /// At least one resolver or marker matched
    pub recognized: bool,
}

impl PeriodInfo {
    /// Nothing could be read from the text
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Open-ended announcement without any dates
    pub fn always_active() -> Self {
        Self {
            always_active: true,
            recognized: true,
            ..Self::default()
        }
    }

    /// Single reference date with no end
    pub fn starting(start: NaiveDate) -> Self {
        Self::range(start, None)
    }

    /// Start date plus an optional end date
    pub fn range(start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: Some(start),
            end_date: end,
            always_active: false,
            recognized: true,
        }
    }
}

type Resolver = fn(&Captures<'_>) -> Option<PeriodInfo>;

/// One entry of the resolution table
struct PeriodPattern {
    name: &'static str,
    pattern: &'static str,
    resolve: Resolver,
}

/// Resolution order matters: quoted dates beat range starts, which beat any
/// bare 8-digit run. ASCII digit classes keep byte slicing in
/// [`ymd_from_compact`] on char boundaries.
const PERIOD_PATTERNS: &[PeriodPattern] = &[
    PeriodPattern {
        name: "quoted_yyyymmdd",
        pattern: r#""([0-9]{8})""#,
        resolve: resolve_single_compact,
    },
    PeriodPattern {
        name: "yyyymmdd_range",
        pattern: r"([0-9]{8})\s*~(?:\s*([0-9]{8}))?",
        resolve: resolve_compact_range,
    },
    PeriodPattern {
        name: "bare_yyyymmdd",
        pattern: r"([0-9]{8})",
        resolve: resolve_single_compact,
    },
    PeriodPattern {
        name: "korean_year_month",
        pattern: r"([0-9]{4})년\s*([0-9]{1,2})월",
        resolve: resolve_year_month,
    },
    PeriodPattern {
        name: "dotted_ymd",
        pattern: r"([0-9]{4})\.([0-9]{1,2})\.([0-9]{1,2})",
        resolve: resolve_dotted,
    },
];

fn compiled_patterns() -> &'static [(Regex, &'static PeriodPattern)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static PeriodPattern)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PERIOD_PATTERNS
            .iter()
            .map(|p| {
                let regex = Regex::new(p.pattern).expect("period patterns are valid regexes");
                (regex, p)
            })
            .collect()
    })
}

/// Parse a free-text period into a [`PeriodInfo`].
///
/// The always-active markers are checked on their own, so
/// `20250101~ 예산 소진시까지` keeps its start date and is also always active.
pub fn parse_period(text: &str) -> PeriodInfo {
    let dated = resolve_dates(text);
    let always_active = ALWAYS_ACTIVE_MARKERS
        .iter()
        .any(|marker| text.contains(marker));

    match (dated, always_active) {
        (Some(info), flag) => PeriodInfo {
            always_active: flag,
            ..info
        },
        (None, true) => PeriodInfo::always_active(),
        (None, false) => PeriodInfo::unknown(),
    }
}

/// Name of the resolver that handles `text`, for diagnostics
pub fn matched_pattern(text: &str) -> Option<&'static str> {
    compiled_patterns().iter().find_map(|(regex, pattern)| {
        let caps = regex.captures(text)?;
        (pattern.resolve)(&caps).map(|_| pattern.name)
    })
}

fn resolve_dates(text: &str) -> Option<PeriodInfo> {
    compiled_patterns().iter().find_map(|(regex, pattern)| {
        let caps = regex.captures(text)?;
        (pattern.resolve)(&caps)
    })
}

fn resolve_single_compact(caps: &Captures<'_>) -> Option<PeriodInfo> {
    let start = ymd_from_compact(caps.get(1)?.as_str())?;
    Some(PeriodInfo::starting(start))
}

fn resolve_compact_range(caps: &Captures<'_>) -> Option<PeriodInfo> {
    let start = ymd_from_compact(caps.get(1)?.as_str())?;
    // A bad end date does not invalidate the start
    let end = caps.get(2).and_then(|m| ymd_from_compact(m.as_str()));
    Some(PeriodInfo::range(start, end))
}

fn resolve_year_month(caps: &Captures<'_>) -> Option<PeriodInfo> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(PeriodInfo::starting)
}

fn resolve_dotted(caps: &Captures<'_>) -> Option<PeriodInfo> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(PeriodInfo::starting)
}

/// `YYYYMMDD` to a date; `digits` must be 8 ASCII digits
fn ymd_from_compact(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.is_ascii() {
        return None;
    }
    let year: i32 = digits[0..4].parse().ok()?;
    let month: u32 = digits[4..6].parse().ok()?;
    let day: u32 = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compact_range() {
        let info = parse_period("20250915~20251010");
        assert_eq!(info.start_date, Some(date(2025, 9, 15)));
        assert_eq!(info.end_date, Some(date(2025, 10, 10)));
        assert!(info.recognized);
        assert!(!info.always_active);
    }

    #[test]
    fn test_compact_range_with_spaces() {
        let info = parse_period("20250915 ~ 20251010");
        assert_eq!(info, PeriodInfo::range(date(2025, 9, 15), Some(date(2025, 10, 10))));
    }

    #[test]
    fn test_open_range() {
        let info = parse_period("20250915~");
        assert_eq!(info, PeriodInfo::range(date(2025, 9, 15), None));
    }

    #[test]
    fn test_invalid_end_keeps_start() {
        let info = parse_period("20250915~20251340");
        assert_eq!(info.start_date, Some(date(2025, 9, 15)));
        assert_eq!(info.end_date, None);
    }

    #[test]
    fn test_quoted_date_wins_over_range() {
        let info = parse_period(r#"접수 "20250301", 20250401~20250430"#);
        assert_eq!(info, PeriodInfo::starting(date(2025, 3, 1)));
        assert_eq!(matched_pattern(r#""20250301""#), Some("quoted_yyyymmdd"));
    }

    #[test]
    fn test_bare_date() {
        let info = parse_period("공고일 20250702 기준");
        assert_eq!(info, PeriodInfo::starting(date(2025, 7, 2)));
        assert_eq!(matched_pattern("공고일 20250702 기준"), Some("bare_yyyymmdd"));
    }

    #[test]
    fn test_korean_year_month() {
        let info = parse_period("2025년 3월 중 공고 예정");
        assert_eq!(info, PeriodInfo::starting(date(2025, 3, 1)));

        let compact = parse_period("2025년11월");
        assert_eq!(compact.start_date, Some(date(2025, 11, 1)));
    }

    #[test]
    fn test_dotted_date() {
        let info = parse_period("2025.1.15 ~ 2025.2.28");
        assert_eq!(info, PeriodInfo::starting(date(2025, 1, 15)));
    }

    #[test]
    fn test_budget_exhaustion_marker() {
        let info = parse_period("예산 소진시까지");
        assert!(info.always_active);
        assert!(info.recognized);
        assert_eq!(info.start_date, None);
        assert_eq!(info.end_date, None);
    }

    #[test]
    fn test_ongoing_marker() {
        assert_eq!(parse_period("상시 모집"), PeriodInfo::always_active());
    }

    #[test]
    fn test_marker_with_date_keeps_both() {
        let info = parse_period("20250101~ 예산 소진시까지");
        assert!(info.always_active);
        assert_eq!(info.start_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_empty_is_unknown() {
        let info = parse_period("");
        assert_eq!(info, PeriodInfo::unknown());
        assert!(!info.recognized);
    }

    #[test]
    fn test_year_only_is_unknown() {
        // A year alone names no month, so it must stay out of monthly buckets
        assert_eq!(parse_period("2025년"), PeriodInfo::unknown());
        assert_eq!(parse_period("2025"), PeriodInfo::unknown());
        assert_eq!(matched_pattern("2025년"), None);
    }

    #[test]
    fn test_invalid_month_falls_through() {
        assert_eq!(parse_period("20251301"), PeriodInfo::unknown());
        assert_eq!(parse_period("2025년 13월"), PeriodInfo::unknown());
        assert_eq!(parse_period("2025.2.30"), PeriodInfo::unknown());
    }

    #[test]
    fn test_invalid_compact_falls_back_to_later_pattern() {
        let info = parse_period("20251399 / 2025.4.1");
        assert_eq!(info, PeriodInfo::starting(date(2025, 4, 1)));
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        assert_eq!(parse_period("٢٠٢٥٠٩١٥"), PeriodInfo::unknown());
    }

    proptest! {
        #[test]
        fn parse_is_idempotent(text in ".{0,40}") {
            prop_assert_eq!(parse_period(&text), parse_period(&text));
        }

        #[test]
        fn parse_never_claims_dates_without_recognition(text in "[0-9~년월. \"]{0,30}") {
            let info = parse_period(&text);
            if !info.recognized {
                prop_assert_eq!(info, PeriodInfo::unknown());
            }
            if info.end_date.is_some() {
                prop_assert!(info.start_date.is_some());
            }
        }

        #[test]
        fn valid_ranges_round_trip(
            start in 0i64..20_000,
            len in 0i64..400,
        ) {
            let base = date(2000, 1, 1);
            let s = base + chrono::Duration::days(start);
            let e = s + chrono::Duration::days(len);
            let text = format!("{}~{}", s.format("%Y%m%d"), e.format("%Y%m%d"));
            prop_assert_eq!(parse_period(&text), PeriodInfo::range(s, Some(e)));
        }
    }
}

use crate::classify::{is_active, is_new, month_of, NEW_ANNOUNCEMENT_WINDOW_DAYS};
use crate::types::Announcement;
use chrono::NaiveDate;

/// Which announcements a query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// No filtering
    All,
    /// Open today, or open until the budget runs out
    Active,
    /// Opened within the new-announcement window
    New,
    /// Starting in the given calendar month (1-12)
    Monthly(u32),
}

impl From<&str> for QueryMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "active" => QueryMode::Active,
            "new" => QueryMode::New,
            "all" | _ => QueryMode::All,
        }
    }
}

/// Filter result indicating whether an entry should be kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Keep,
    FilterOut,
}

impl From<bool> for FilterResult {
    fn from(keep: bool) -> Self {
        if keep {
            FilterResult::Keep
        } else {
            FilterResult::FilterOut
        }
    }
}

/// Filter trait for announcement records
pub trait AnnouncementFilter {
    fn should_keep(&self, entry: &Announcement) -> FilterResult;
}

/// Filters announcements by their period for one [`QueryMode`] and reference day
#[derive(Debug, Clone)]
pub struct PeriodFilter {
    mode: QueryMode,
    today: NaiveDate,
    new_window_days: i64,
}

impl PeriodFilter {
    pub fn new(mode: QueryMode, today: NaiveDate) -> Self {
        Self {
            mode,
            today,
            new_window_days: NEW_ANNOUNCEMENT_WINDOW_DAYS,
        }
    }

    /// Override the new-announcement window
    pub fn new_window_days(mut self, days: i64) -> Self {
        self.new_window_days = days;
        self
    }

    /// Keep only the entries this filter accepts
    pub fn apply(&self, entries: Vec<Announcement>) -> Vec<Announcement> {
        entries
            .into_iter()
            .filter(|entry| self.should_keep(entry) == FilterResult::Keep)
            .collect()
    }
}

impl AnnouncementFilter for PeriodFilter {
    fn should_keep(&self, entry: &Announcement) -> FilterResult {
        let info = entry.period_info();
        let keep = match self.mode {
            QueryMode::All => true,
            QueryMode::Active => is_active(&info, self.today),
            QueryMode::New => is_new(&info, self.today, self.new_window_days),
            QueryMode::Monthly(month) => month_of(&info) == Some(month),
        };
        keep.into()
    }
}

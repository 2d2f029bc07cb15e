//! Recommendation retrieval and temporal filtering for government support
//! announcements.
//!
//! Announcements carry a free-text application period in whatever format the
//! agency used. This library reads those periods, decides which announcements
//! are active, new or closing soon, and groups them by start month, over a
//! pluggable [`DataSource`].

pub mod classify;
pub mod company;
pub mod config;
pub mod error;
pub mod filter;
pub mod period;
pub mod present;
pub mod service;
pub mod source;
pub mod types;

pub use classify::{
    aggregate_by_month, days_until_deadline, is_active, is_new, is_urgent, month_of, starts_in,
    HIGH_SCORE_THRESHOLD, NEW_ANNOUNCEMENT_WINDOW_DAYS, URGENT_DEADLINE_WINDOW_DAYS,
};
pub use company::CompanyProfile;
pub use config::{Config, ConfigBuilder, ConfigFile};
pub use error::{Error, Result};
pub use filter::{AnnouncementFilter, FilterResult, PeriodFilter, QueryMode};
pub use period::{parse_period, PeriodInfo};
pub use service::RecommendationService;
pub use source::{DataSource, JsonStore, MemoryStore};
pub use types::{Announcement, MonthlyCounts, NotificationSummary, Row};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{Config, ConfigBuilder};
    pub use crate::error::{Error, Result};
    pub use crate::filter::QueryMode;
    pub use crate::period::{parse_period, PeriodInfo};
    pub use crate::service::RecommendationService;
    pub use crate::source::{DataSource, JsonStore, MemoryStore};
    pub use crate::types::{Announcement, MonthlyCounts, NotificationSummary};
}

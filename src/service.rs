use crate::classify::{aggregate_by_month, is_new, is_urgent, starts_in};
use crate::company::CompanyProfile;
use crate::config::Config;
use crate::error::Result;
use crate::filter::{PeriodFilter, QueryMode};
use crate::source::DataSource;
use crate::types::{Announcement, MonthlyCounts, NotificationSummary};
use chrono::Datelike;
use std::cmp::Ordering;

/// Answers the dashboard's queries over an injected [`DataSource`]
pub struct RecommendationService<S> {
    source: S,
    config: Config,
}

impl<S: DataSource> RecommendationService<S> {
    /// Create a new service with the given source and configuration
    pub fn new(source: S, config: Config) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalized profiles of every company in the store
    pub fn companies(&self) -> Result<Vec<CompanyProfile>> {
        let rows = self.source.companies()?;
        tracing::info!(count = rows.len(), "fetched companies");
        Ok(rows.iter().map(CompanyProfile::from_row).collect())
    }

    /// Announcements for `company` (or everyone) that match `mode`
    pub fn recommendations(
        &self,
        company: Option<&str>,
        mode: QueryMode,
    ) -> Result<Vec<Announcement>> {
        let records = self.fetch(company)?;
        let fetched = records.len();
        let kept = self.period_filter(mode).apply(records);
        tracing::info!(?mode, fetched, kept = kept.len(), "filtered recommendations");
        Ok(kept)
    }

    /// Recommendations for `company` ordered by score, best first, after the
    /// configured minimum score and limit are applied
    pub fn ranked_recommendations(
        &self,
        company: &str,
        mode: QueryMode,
    ) -> Result<Vec<Announcement>> {
        let records = self.recommendations(Some(company), mode)?;
        let ranked = Self::rank_internal(&self.config, records);
        Ok(Self::apply_limit_internal(&self.config, ranked))
    }

    /// Count of announcements per start month, all 12 months present
    pub fn monthly_counts(&self, company: Option<&str>) -> Result<MonthlyCounts> {
        let records = self.fetch(company)?;
        let counts = aggregate_by_month(&records);
        tracing::debug!(
            records = records.len(),
            attributed = counts.total(),
            "aggregated monthly counts"
        );
        Ok(counts)
    }

    /// Announcements starting in `month`; months outside 1..=12 match nothing
    pub fn monthly_details(&self, company: Option<&str>, month: u32) -> Result<Vec<Announcement>> {
        if !(1..=12).contains(&month) {
            tracing::debug!(month, "month out of range");
            return Ok(Vec::new());
        }
        self.recommendations(company, QueryMode::Monthly(month))
    }

    /// Headline counts for the notification view
    pub fn notification_summary(&self, company: Option<&str>) -> Result<NotificationSummary> {
        let records = self.fetch(company)?;
        let today = self.config.today();
        let mut summary = NotificationSummary::default();

        for record in &records {
            let info = record.period_info();
            if is_new(&info, today, self.config.new_window_days) {
                summary.new_count += 1;
            }
            if is_urgent(&info, today, self.config.urgent_window_days) {
                summary.urgent_count += 1;
            }
            if starts_in(&info, today.year(), today.month()) {
                summary.this_month_count += 1;
            }
            if record
                .score()
                .is_some_and(|score| score >= self.config.high_score_threshold)
            {
                summary.high_score_count += 1;
            }
        }

        Ok(summary)
    }

    fn fetch(&self, company: Option<&str>) -> Result<Vec<Announcement>> {
        match company {
            Some(name) => self.source.recommendations_for(name),
            None => self.source.all_recommendations(),
        }
    }

    fn period_filter(&self, mode: QueryMode) -> PeriodFilter {
        PeriodFilter::new(mode, self.config.today()).new_window_days(self.config.new_window_days)
    }

    /// Sort by score descending; records without a numeric score go last and
    /// are dropped entirely when a minimum score is set
    fn rank_internal(config: &Config, mut records: Vec<Announcement>) -> Vec<Announcement> {
        if config.min_score > 0.0 {
            records.retain(|r| r.score().is_some_and(|score| score >= config.min_score));
        }

        records.sort_by(|a, b| match (a.score(), b.score()) {
            (Some(sa), Some(sb)) => sb.partial_cmp(&sa).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        records
    }

    /// Apply limit to records; a zero limit keeps everything
    fn apply_limit_internal(config: &Config, records: Vec<Announcement>) -> Vec<Announcement> {
        if let Some(limit) = config.limit.filter(|&limit| limit > 0) {
            records.into_iter().take(limit).collect()
        } else {
            records
        }
    }
}

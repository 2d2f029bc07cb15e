use crate::period::{parse_period, PeriodInfo};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A raw row from one of the exported store tables
pub type Row = Map<String, Value>;

/// A recommended announcement as stored in the `recommend_final` table.
///
/// Only the fields the classifier and ranking need are typed; every other
/// column is carried through `extra` so outputs keep the record shape.
/// Reading an object row never fails: the Korean column wins over its English alias,
/// and a value of the wrong type stays in `extra` instead of dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Row")]
pub struct Announcement {
    /// Company the announcement was recommended for
    #[serde(rename = "기업명", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Program title
    #[serde(rename = "사업명", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text application period, string or number depending on the row
    #[serde(rename = "사업 연도", skip_serializing_if = "Option::is_none")]
    pub period: Option<Value>,
    /// Recommendation score, not guaranteed to be numeric
    #[serde(rename = "최종 점수", skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const COMPANY_COLUMN: (&str, &str) = ("기업명", "company");
const TITLE_COLUMN: (&str, &str) = ("사업명", "title");
const PERIOD_COLUMN: (&str, &str) = ("사업 연도", "period");
const SCORE_COLUMN: (&str, &str) = ("최종 점수", "score");

/// Remove a column by its Korean name, falling back to the English alias.
/// When both are present the alias stays behind as an ordinary column.
fn take_column(row: &mut Row, (key, alias): (&str, &str)) -> Option<Value> {
    let value = match row.remove(key) {
        Some(value) => Some(value),
        None => row.remove(alias),
    };
    value.filter(|v| !v.is_null())
}

/// Like [`take_column`] but reads the value as text; anything that is not
/// a string, number or bool is put back under the Korean name
fn take_text_column(row: &mut Row, column: (&str, &str)) -> Option<String> {
    match take_column(row, column)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => {
            row.insert(column.0.to_string(), other);
            None
        }
    }
}

impl From<Row> for Announcement {
    fn from(mut row: Row) -> Self {
        let company = take_text_column(&mut row, COMPANY_COLUMN);
        let title = take_text_column(&mut row, TITLE_COLUMN);
        let period = take_column(&mut row, PERIOD_COLUMN);
        let score = take_column(&mut row, SCORE_COLUMN);
        Self {
            company,
            title,
            period,
            score,
            extra: row,
        }
    }
}

impl Announcement {
    /// Create an announcement with just the typed fields set
    pub fn new(company: &str, title: &str, period: &str, score: f64) -> Self {
        Self {
            company: Some(company.to_string()),
            title: Some(title.to_string()),
            period: Some(Value::String(period.to_string())),
            score: serde_json::Number::from_f64(score).map(Value::Number),
            extra: Map::new(),
        }
    }

    /// Period text, reading numbers as their decimal form
    pub fn period_text(&self) -> Option<String> {
        match self.period.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Numeric score, or `None` when the column is missing or malformed
    pub fn score(&self) -> Option<f64> {
        let score = match self.score.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        score.is_finite().then_some(score)
    }

    /// Classify the period field
    pub fn period_info(&self) -> PeriodInfo {
        match self.period_text() {
            Some(text) => parse_period(&text),
            None => PeriodInfo::unknown(),
        }
    }
}

/// Announcement counts keyed by start month, always holding all 12 months
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthlyCounts(BTreeMap<u32, usize>);

impl MonthlyCounts {
    /// All twelve buckets at zero
    pub fn zeroed() -> Self {
        Self((1..=12).map(|month| (month, 0)).collect())
    }

    /// Count one record for `month`; months outside 1..=12 are ignored
    pub fn increment(&mut self, month: u32) {
        if let Some(count) = self.0.get_mut(&month) {
            *count += 1;
        }
    }

    pub fn get(&self, month: u32) -> usize {
        self.0.get(&month).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.0.iter().map(|(month, count)| (*month, *count))
    }
}

impl Default for MonthlyCounts {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Headline numbers for the notification view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    /// Announcements opened within the new-announcement window
    pub new_count: usize,
    /// Announcements closing within the urgent window
    pub urgent_count: usize,
    /// Announcements scoring at or above the high score threshold
    pub high_score_count: usize,
    /// Announcements starting in the current calendar month
    pub this_month_count: usize,
}

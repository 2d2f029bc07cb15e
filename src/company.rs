//! Normalized company profiles from `alpha_companies_final` rows.

use crate::types::Row;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// A company as the recommendation views present it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub business_type: String,
    pub industry: String,
    pub region: String,
    pub founding_year: Option<i32>,
    pub employee_count: String,
    pub business_stage: String,
    pub technology_fields: Vec<String>,
    pub certifications: Vec<String>,
}

impl CompanyProfile {
    /// Normalize one raw company row, filling defaults for missing columns
    pub fn from_row(row: &Row) -> Self {
        Self {
            name: text_or(row, "기업명", "알 수 없음"),
            business_type: text_or(row, "기업형태", "법인사업자"),
            industry: text_or(row, "업종", "기타"),
            region: text_or(row, "지역", "전국"),
            founding_year: text(row, "설립일").and_then(|s| founding_year(&s)),
            employee_count: employee_band(&text(row, "고용").unwrap_or_else(|| "0명".into()))
                .to_string(),
            business_stage: business_stage(text(row, "업력").as_deref()).to_string(),
            technology_fields: split_list(text(row, "기술특허").as_deref()),
            certifications: split_list(text(row, "기업인증").as_deref()),
        }
    }
}

/// Column as text; numbers are read as their decimal form
fn text(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_or(row: &Row, key: &str, default: &str) -> String {
    text(row, key).unwrap_or_else(|| default.to_string())
}

/// Year from `설립일`: plain digits, `YYYY.MM.DD.` or `YYYY`
pub fn founding_year(value: &str) -> Option<i32> {
    static DOTTED: OnceLock<Regex> = OnceLock::new();
    let dotted = DOTTED.get_or_init(|| {
        Regex::new(r"^([0-9]{4})\.[0-9]{2}\.[0-9]{2}\.$").expect("founding date regex is valid")
    });

    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.chars().all(|c| c.is_ascii_digit()) {
        return value.parse().ok();
    }
    dotted
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Head-count band from `고용` (e.g. `6명` -> `6-10명`)
pub fn employee_band(value: &str) -> &'static str {
    let digits = value.replace('명', "");
    let digits = digits.trim();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return "0명";
    }
    match digits.parse::<u64>() {
        Ok(0..=5) => "1-5명",
        Ok(6..=10) => "6-10명",
        Ok(11..=50) => "11-50명",
        Ok(51..=100) => "51-100명",
        Ok(101..=300) => "101-300명",
        Ok(_) => "300명 이상",
        // More digits than fit in u64
        Err(_) => "300명 이상",
    }
}

/// Business stage from the free-text `업력` column
pub fn business_stage(value: Option<&str>) -> &'static str {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return "예비창업자";
    };
    if value.contains("3년 미만") || value.contains("초기") {
        "초기창업(3년 미만)"
    } else if value.contains("3-7년") || value.contains("성장") {
        "성장기(3-7년)"
    } else if value.contains("7년 이상") || value.contains("성숙") {
        "성숙기(7년 이상)"
    } else {
        "예비창업자"
    }
}

/// Comma-separated list, trimmed, with empty items dropped
fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

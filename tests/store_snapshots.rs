use grantbot::prelude::*;
use grantbot::present::display_rows;
use grantbot::source::{COMPANY_TABLE, RECOMMENDATION_TABLE};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use insta;

/// Write a table export the way the store dump produces it
fn write_table(dir: &Path, table: &str, rows: serde_json::Value) {
    fs::write(
        dir.join(format!("{table}.json")),
        serde_json::to_string_pretty(&rows).expect("Failed to serialize fixture"),
    )
    .expect("Failed to write fixture table");
}

/// A data directory holding both exported tables
fn fixture_dir() -> TempDir {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    write_table(
        tmp.path(),
        COMPANY_TABLE,
        json!([
            {
                "기업명": "알파테크",
                "업종": "소프트웨어",
                "지역": "서울",
                "설립일": "2021.03.02.",
                "고용": "12명",
                "업력": "3년 미만",
                "기술특허": "AI,로보틱스",
                "기업인증": ""
            },
            {"기업명": "베타푸드", "고용": "미상"}
        ]),
    );
    write_table(
        tmp.path(),
        RECOMMENDATION_TABLE,
        json!([
            {"기업명": "알파테크", "사업명": "AI 바우처", "사업 연도": "20250915~20251010", "최종 점수": 91.5, "지역": "전국"},
            {"기업명": "알파테크", "사업명": "초기창업 패키지", "사업 연도": "20250929~20251130", "최종 점수": 78},
            {"기업명": "알파테크", "사업명": "수출 바우처", "사업 연도": "20250801~20251005", "최종 점수": "85"},
            {"기업명": "알파테크", "사업명": "정책자금", "사업 연도": "예산 소진시까지", "최종 점수": 64},
            {"기업명": "알파테크", "사업명": "연간 계획", "사업 연도": "2025년", "최종 점수": 50},
            {"기업명": "알파테크", "사업명": "상반기 공모", "사업 연도": "2025년 3월", "최종 점수": "점수없음"},
            {"기업명": "알파테크", "사업명": "기간 미정", "사업 연도": null, "최종 점수": 40},
            {"기업명": "베타푸드", "사업명": "스마트공장", "사업 연도": "\"20251001\"", "최종 점수": 88},
            {"기업명": "베타푸드", "사업명": "판로 지원", "사업 연도": "2025.10.20", "최종 점수": 70}
        ]),
    );
    tmp
}

fn service(dir: &Path) -> RecommendationService<JsonStore> {
    let config = ConfigBuilder::new(dir)
        .today_str("2025-10-01")
        .unwrap()
        .build()
        .unwrap();
    let store = JsonStore::open(dir).unwrap();
    RecommendationService::new(store, config)
}

fn titles(records: &[Announcement]) -> String {
    records
        .iter()
        .filter_map(|r| r.title.as_deref())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_monthly_counts_snapshot() {
    let tmp = fixture_dir();
    let counts = service(tmp.path()).monthly_counts(None).unwrap();
    let json_output = serde_json::to_string_pretty(&counts).unwrap();

    insta::assert_snapshot!(json_output, @r#"
    {
      "1": 0,
      "2": 0,
      "3": 1,
      "4": 0,
      "5": 0,
      "6": 0,
      "7": 0,
      "8": 1,
      "9": 2,
      "10": 2,
      "11": 0,
      "12": 0
    }
    "#);
}

#[test]
fn test_notification_summary_snapshot() {
    let tmp = fixture_dir();
    let summary = service(tmp.path()).notification_summary(None).unwrap();
    let json_output = serde_json::to_string_pretty(&summary).unwrap();

    insta::assert_snapshot!(json_output, @r#"
    {
      "new_count": 2,
      "urgent_count": 1,
      "high_score_count": 3,
      "this_month_count": 2
    }
    "#);
}

#[test]
fn test_active_recommendations_ranked() {
    let tmp = fixture_dir();
    let ranked = service(tmp.path())
        .ranked_recommendations("알파테크", QueryMode::Active)
        .unwrap();

    insta::assert_snapshot!(titles(&ranked), @r#"
    AI 바우처
    수출 바우처
    초기창업 패키지
    정책자금
    "#);
}

#[test]
fn test_new_recommendations() {
    let tmp = fixture_dir();
    let svc = service(tmp.path());

    let alpha = svc.recommendations(Some("알파테크"), QueryMode::New).unwrap();
    assert_eq!(titles(&alpha), "초기창업 패키지");

    let everyone = svc.recommendations(None, QueryMode::New).unwrap();
    assert_eq!(titles(&everyone), "초기창업 패키지\n스마트공장");
}

#[test]
fn test_monthly_details_display_rows() {
    let tmp = fixture_dir();
    let october = service(tmp.path()).monthly_details(None, 10).unwrap();
    let rows = display_rows(&october);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["공고명"], json!("스마트공장"));
    assert_eq!(rows[0]["순위"], json!(1));
    assert_eq!(rows[1]["공고명"], json!("판로 지원"));
    assert_eq!(rows[1]["신청기간"], json!("2025.10.20"));
    assert_eq!(rows[1]["소관기관"], json!("정부기관"));
}

#[test]
fn test_year_only_period_is_never_bucketed() {
    let tmp = fixture_dir();
    let svc = service(tmp.path());

    for month in 1..=12 {
        let records = svc.monthly_details(Some("알파테크"), month).unwrap();
        assert!(
            records.iter().all(|r| r.title.as_deref() != Some("연간 계획")),
            "year-only period leaked into month {month}"
        );
    }
}

#[test]
fn test_companies() {
    let tmp = fixture_dir();
    let companies = service(tmp.path()).companies().unwrap();

    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0].name, "알파테크");
    assert_eq!(companies[0].founding_year, Some(2021));
    assert_eq!(companies[0].employee_count, "11-50명");
    assert_eq!(companies[0].business_stage, "초기창업(3년 미만)");
    assert_eq!(companies[0].technology_fields, vec!["AI", "로보틱스"]);
    assert!(companies[0].certifications.is_empty());
    assert_eq!(companies[1].region, "전국");
    assert_eq!(companies[1].employee_count, "0명");
}

use crate::source::RECOMMENDATION_TABLE;
use crate::types::Announcement;
use serde_json::{Map, Value};

/// Store column -> display column
const COLUMN_RENAMES: &[(&str, &str)] = &[
    ("사업명", "공고명"),
    ("최종 점수", "총점수"),
    ("지역", "지역명"),
    ("사업 연도", "신청기간"),
    ("상세페이지 URL", "공고URL"),
];

/// Columns the display expects, with the placeholder used when a row lacks one
const DEFAULT_COLUMNS: &[(&str, &str)] = &[
    ("지원분야", "기타"),
    ("지원대상", "중소기업"),
    ("소관기관", "정부기관"),
];

/// Turn ranked announcements into display rows.
///
/// Columns are renamed for display, `순위` is the 1-based position in
/// `records`, `데이터소스` names the source table and missing category columns
/// get placeholders. Classification never reads these rows.
pub fn display_rows(records: &[Announcement]) -> Vec<Value> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| display_row(record, idx + 1))
        .collect()
}

fn display_row(record: &Announcement, rank: usize) -> Value {
    let mut row = match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    for (from, to) in COLUMN_RENAMES {
        if let Some(value) = row.remove(*from) {
            row.insert((*to).to_string(), value);
        }
    }

    row.insert("순위".to_string(), Value::from(rank));
    row.insert(
        "데이터소스".to_string(),
        Value::String(RECOMMENDATION_TABLE.to_string()),
    );
    for (column, default) in DEFAULT_COLUMNS {
        row.entry(*column)
            .or_insert_with(|| Value::String((*default).to_string()));
    }

    Value::Object(row)
}

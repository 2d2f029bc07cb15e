//! Data access for the exported store tables.
//!
//! The service never talks to the store directly; it receives a
//! [`DataSource`]. [`JsonStore`] reads table exports from a directory and
//! [`MemoryStore`] serves fixed rows.

use crate::error::{Error, Result};
use crate::types::{Announcement, Row};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Table holding one row per company
pub const COMPANY_TABLE: &str = "alpha_companies_final";

/// Table holding one row per (company, announcement) recommendation
pub const RECOMMENDATION_TABLE: &str = "recommend_final";

/// Read access to companies and their recommended announcements
pub trait DataSource {
    /// Raw company rows
    fn companies(&self) -> Result<Vec<Row>>;

    /// Recommendations for one company, matched on the exact company name
    fn recommendations_for(&self, company: &str) -> Result<Vec<Announcement>> {
        Ok(self
            .all_recommendations()?
            .into_iter()
            .filter(|a| a.company.as_deref() == Some(company))
            .collect())
    }

    /// Every recommendation in the store
    fn all_recommendations(&self) -> Result<Vec<Announcement>>;
}

/// Reads `<table>.json` exports (a JSON array of row objects) from a directory
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            return Err(Error::Config(format!(
                "Data directory does not exist: {}",
                dir.display()
            )));
        }

        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "Data directory is not a directory: {}",
                dir.display()
            )));
        }

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.json"))
    }

    /// Read a table export as raw JSON values
    fn read_table(&self, table: &str) -> Result<Vec<Value>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(Error::DataSource(format!(
                "Table export not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(&path)?;
        let rows = match serde_json::from_str::<Value>(&contents)? {
            Value::Array(rows) => rows,
            _ => {
                return Err(Error::DataSource(format!(
                    "Table export is not a JSON array: {}",
                    path.display()
                )))
            }
        };

        tracing::debug!(table, rows = rows.len(), "loaded table export");
        Ok(rows)
    }
}

impl DataSource for JsonStore {
    fn companies(&self) -> Result<Vec<Row>> {
        let rows = self.read_table(COMPANY_TABLE)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(map),
                other => {
                    tracing::warn!(table = COMPANY_TABLE, row = %other, "skipping non-object row");
                    None
                }
            })
            .collect())
    }

    fn all_recommendations(&self) -> Result<Vec<Announcement>> {
        let rows = self.read_table(RECOMMENDATION_TABLE)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<Announcement>(row) {
                Ok(announcement) => Some(announcement),
                Err(e) => {
                    tracing::warn!(table = RECOMMENDATION_TABLE, error = %e, "skipping malformed row");
                    None
                }
            })
            .collect())
    }
}

/// In-memory rows, for fixtures and embedding callers
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    companies: Vec<Row>,
    recommendations: Vec<Announcement>,
}

impl MemoryStore {
    pub fn new(companies: Vec<Row>, recommendations: Vec<Announcement>) -> Self {
        Self {
            companies,
            recommendations,
        }
    }

    /// A store holding only recommendations
    pub fn with_recommendations(recommendations: Vec<Announcement>) -> Self {
        Self::new(Vec::new(), recommendations)
    }
}

impl DataSource for MemoryStore {
    fn companies(&self) -> Result<Vec<Row>> {
        Ok(self.companies.clone())
    }

    fn all_recommendations(&self) -> Result<Vec<Announcement>> {
        Ok(self.recommendations.clone())
    }
}

//! Accumulator table for rating passes.

use std::cmp::Ordering;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use serde_json::Value;

use crate::dataset::{ensure_parent, write_records};
use crate::error::{Result, SalienceError};

use super::record::{Rating, RatingRecord};

/// An item to be rated, with a key that survives shuffling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatedItem {
    pub key: String,
    pub question: String,
}

impl RatedItem {
    pub fn new(key: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
        }
    }
}

impl From<&crate::dataset::Question> for RatedItem {
    fn from(q: &crate::dataset::Question) -> Self {
        Self::new(q.cluster_id.clone(), q.question.clone())
    }
}

/// Ratings of one item across passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRow {
    pub key: String,
    pub question: String,
    pub ratings: Vec<Option<Rating>>,
    pub rationales: Vec<Option<String>>,
}

/// Items in input order, with one rating and one rationale column per pass.
///
/// Exports are sorted by key; see [`compare_keys`].
#[derive(Debug, Clone, PartialEq)]
pub struct RatingTable {
    key_name: String,
    passes: usize,
    rows: Vec<RatingRow>,
}

impl RatingTable {
    /// Empty table for `items` with `passes` null columns.
    pub fn new(key_name: impl Into<String>, items: &[RatedItem], passes: usize) -> Self {
        let rows = items
            .iter()
            .map(|item| RatingRow {
                key: item.key.clone(),
                question: item.question.clone(),
                ratings: vec![None; passes],
                rationales: vec![None; passes],
            })
            .collect();
        Self {
            key_name: key_name.into(),
            passes,
            rows,
        }
    }

    /// Store pass `pass`. `order[k]` is the row presented at position `k`,
    /// and `records[k]` is its validated record.
    pub fn record_pass(&mut self, pass: usize, order: &[usize], records: Vec<RatingRecord>) {
        for (&row, record) in order.iter().zip(records) {
            if let Some(row) = self.rows.get_mut(row) {
                row.ratings[pass] = Some(record.rating);
                row.rationales[pass] = record.rationale;
            }
        }
    }

    pub fn rows(&self) -> &[RatingRow] {
        &self.rows
    }

    pub fn passes(&self) -> usize {
        self.passes
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Ratings of every item in pass `pass`.
    pub fn column(&self, pass: usize) -> Vec<Option<Rating>> {
        self.rows
            .iter()
            .map(|row| row.ratings.get(pass).copied().flatten())
            .collect()
    }

    /// Passes whose rating column is entirely null.
    pub fn empty_passes(&self) -> usize {
        (0..self.passes)
            .filter(|&pass| self.column(pass).iter().all(Option::is_none))
            .count()
    }

    /// Mean rating of each row over the passes that produced one.
    pub fn mean_ratings(&self) -> Vec<Option<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let values: Vec<f64> = row
                    .ratings
                    .iter()
                    .flatten()
                    .map(|r| f64::from(r.value()))
                    .collect();
                (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
            })
            .collect()
    }

    /// Rows ordered by key for export.
    fn sorted_rows(&self) -> Vec<&RatingRow> {
        let mut rows: Vec<&RatingRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| compare_keys(&a.key, &b.key));
        rows
    }

    /// Flat records sorted by key: `{<key>, question, rating0, rationale0, ...}`.
    pub fn to_records(&self) -> Vec<IndexMap<String, Value>> {
        self.sorted_rows()
            .into_iter()
            .map(|row| {
                let mut record = IndexMap::new();
                record.insert(self.key_name.clone(), Value::String(row.key.clone()));
                record.insert("question".to_string(), Value::String(row.question.clone()));
                for pass in 0..self.passes {
                    let rating = row.ratings[pass]
                        .map(|r| Value::from(r.value()))
                        .unwrap_or(Value::Null);
                    let rationale = row.rationales[pass]
                        .clone()
                        .map(Value::String)
                        .unwrap_or(Value::Null);
                    record.insert(format!("rating{}", pass), rating);
                    record.insert(format!("rationale{}", pass), rationale);
                }
                record
            })
            .collect()
    }

    /// Write the table as a JSON array of records.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        write_records(path, &self.to_records())
    }

    /// Write the table as CSV with the same columns as the JSON records.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let file = File::create(path).map_err(|e| SalienceError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));

        let mut header = vec![self.key_name.clone(), "question".to_string()];
        for pass in 0..self.passes {
            header.push(format!("rating{}", pass));
            header.push(format!("rationale{}", pass));
        }
        writer.write_record(&header)?;

        for row in self.sorted_rows() {
            let mut fields = vec![row.key.clone(), row.question.clone()];
            for pass in 0..self.passes {
                fields.push(row.ratings[pass].map(|r| r.to_string()).unwrap_or_default());
                fields.push(row.rationales[pass].clone().unwrap_or_default());
            }
            writer.write_record(&fields)?;
        }

        writer
            .flush()
            .map_err(|e| SalienceError::io(path, e))?;
        Ok(())
    }
}

/// Integer keys compare numerically and sort before text keys, which
/// compare lexicographically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: usize, rating: u8) -> RatingRecord {
        RatingRecord {
            id,
            question: String::new(),
            rating: Rating::new(rating).unwrap(),
            rationale: Some(format!("r{}", id)),
        }
    }

    fn table() -> RatingTable {
        let items = vec![RatedItem::new("a", "Q1?"), RatedItem::new("b", "Q2?")];
        RatingTable::new("cluster_id", &items, 2)
    }

    #[test]
    fn test_record_pass_maps_positions_to_rows() {
        let mut table = table();
        // "b" was presented first.
        table.record_pass(0, &[1, 0], vec![record(1, 5), record(2, 2)]);

        assert_eq!(table.column(0), vec![Rating::new(2).ok(), Rating::new(5).ok()]);
        assert_eq!(table.rows()[1].rationales[0].as_deref(), Some("r1"));
        assert_eq!(table.empty_passes(), 1);
        assert_eq!(table.mean_ratings(), vec![Some(2.0), Some(5.0)]);
    }

    #[test]
    fn test_records_have_null_columns_for_missing_passes() {
        let mut table = table();
        table.record_pass(0, &[0, 1], vec![record(1, 3), record(2, 4)]);

        let json = serde_json::to_value(table.to_records()).unwrap();
        assert_eq!(json[0]["cluster_id"], "a");
        assert_eq!(json[0]["rating0"], 3);
        assert_eq!(json[0]["rationale0"], "r1");
        assert!(json[0]["rating1"].is_null());
        assert!(json[1]["rationale1"].is_null());
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ratings.csv");
        let mut table = table();
        table.record_pass(0, &[0, 1], vec![record(1, 3), record(2, 4)]);
        table.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("cluster_id,question,rating0,rationale0,rating1,rationale1")
        );
        assert_eq!(lines.next(), Some("a,Q1?,3,r1,,"));
    }

    #[test]
    fn test_exports_sort_by_key() {
        let items = vec![
            RatedItem::new("10", "Q10?"),
            RatedItem::new("b", "Qb?"),
            RatedItem::new("9", "Q9?"),
            RatedItem::new("a", "Qa?"),
        ];
        let mut table = RatingTable::new("cluster_id", &items, 1);
        let records = (1..=4).map(|i| record(i, i as u8)).collect();
        table.record_pass(0, &[0, 1, 2, 3], records);

        // Storage keeps input order.
        assert_eq!(table.rows()[0].key, "10");

        let json = serde_json::to_value(table.to_records()).unwrap();
        let keys: Vec<&str> = (0..4).map(|i| json[i]["cluster_id"].as_str().unwrap()).collect();
        assert_eq!(keys, vec!["9", "10", "a", "b"]);
        assert_eq!(json[1]["rating0"], 1);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ratings.csv");
        table.write_csv(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let first: Vec<&str> = content
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(first, vec!["9", "10", "a", "b"]);
    }

    #[test]
    fn test_compare_keys() {
        assert_eq!(compare_keys("2", "10"), Ordering::Less);
        assert_eq!(compare_keys("10", "a"), Ordering::Less);
        assert_eq!(compare_keys("c10", "c2"), Ordering::Less);
    }
}

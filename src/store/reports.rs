//! Report history: persistence and retrieval of finished reports.

use rusqlite::{params, OptionalExtension, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Language, StoredReport};

use super::{parse_timestamp, Result, Store, StoreError};

/// The storage collaborator seen by the report orchestrator
pub trait ReportStore {
    fn persist(&self, report: &StoredReport) -> Result<()>;
}

impl ReportStore for Store {
    /// Writes a finished report; reports are immutable once written
    fn persist(&self, report: &StoredReport) -> Result<()> {
        self.conn().execute(
            "INSERT INTO reports (id, owner, idea, transcript, document, language, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                report.id.to_string(),
                report.owner,
                report.idea,
                report.transcript,
                report.document,
                report.language.code(),
                report.created_at.to_rfc3339(),
            ],
        )?;
        info!(report_id = %report.id, owner = report.owner, "report persisted");
        Ok(())
    }
}

impl Store {
    /// Fetches reports, optionally restricted to one owner, newest first
    pub fn fetch_reports(&self, owner: Option<&str>) -> Result<Vec<StoredReport>> {
        let sql = "SELECT id, owner, idea, transcript, document, language, created_at
                   FROM reports WHERE (?1 IS NULL OR owner = ?1)
                   ORDER BY created_at DESC";
        let mut stmt = self.conn().prepare(sql)?;
        let rows = stmt.query_map(params![owner], map_report_row)?;
        rows.map(|r| finish_report_row(r?)).collect()
    }

    pub fn fetch_report(&self, id: Uuid) -> Result<StoredReport> {
        self.conn()
            .query_row(
                "SELECT id, owner, idea, transcript, document, language, created_at
                 FROM reports WHERE id = ?1",
                params![id.to_string()],
                map_report_row,
            )
            .optional()?
            .map(finish_report_row)
            .transpose()?
            .ok_or(StoreError::ReportNotFound(id))
    }
}

type ReportRow = (String, String, String, String, Vec<u8>, String, String);

fn map_report_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn finish_report_row(row: ReportRow) -> Result<StoredReport> {
    let (id, owner, idea, transcript, document, language, created_at) = row;
    Ok(StoredReport {
        id: id
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("invalid report id: {e}")))?,
        owner,
        idea,
        transcript,
        document,
        language: language
            .parse::<Language>()
            .map_err(StoreError::Corrupt)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(dir.path().join("planwright.db")).unwrap();
        (dir, store)
    }

    fn sample_report(owner: &str) -> StoredReport {
        StoredReport::new(
            owner,
            "A bicycle courier service.",
            "=== Business Analysis ===\n\n...".to_string(),
            b"%PDF-1.4 fake".to_vec(),
            Language::English,
            Utc::now(),
        )
    }

    #[test]
    fn test_persist_and_fetch_one() {
        let (_dir, store) = test_store();
        let report = sample_report("alice");
        store.persist(&report).unwrap();

        let loaded = store.fetch_report(report.id).unwrap();
        assert_eq!(loaded.owner, "alice");
        assert_eq!(loaded.idea, report.idea);
        assert_eq!(loaded.document, report.document);
        assert_eq!(loaded.language, Language::English);
    }

    #[test]
    fn test_fetch_missing_report() {
        let (_dir, store) = test_store();
        let err = store.fetch_report(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, StoreError::ReportNotFound(_)));
    }

    #[test]
    fn test_fetch_many_filters_by_owner() {
        let (_dir, store) = test_store();
        store.persist(&sample_report("alice")).unwrap();
        store.persist(&sample_report("alice")).unwrap();
        store.persist(&sample_report("bob")).unwrap();

        assert_eq!(store.fetch_reports(Some("alice")).unwrap().len(), 2);
        assert_eq!(store.fetch_reports(Some("bob")).unwrap().len(), 1);
        assert_eq!(store.fetch_reports(None).unwrap().len(), 3);
        assert!(store.fetch_reports(Some("nobody")).unwrap().is_empty());
    }
}

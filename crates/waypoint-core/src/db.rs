//! SQLite persistence for visit records.

use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;
use waypoint_types::{normalize_domain, VisitRecord};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Statistics from a visit log import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Visits written to the store.
    pub imported: usize,
    /// Lines that were blank, unparsable or had no usable domain.
    pub skipped: usize,
}

/// SQLite-based visit store.
pub struct VisitStore {
    conn: Mutex<Connection>,
}

impl VisitStore {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        self.conn().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS visits (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                domain TEXT NOT NULL,
                visit_time INTEGER NOT NULL,
                time_spent INTEGER
            );

            CREATE INDEX IF NOT EXISTS idx_visits_time ON visits(visit_time);
            CREATE INDEX IF NOT EXISTS idx_visits_domain ON visits(domain, visit_time);
            "#,
        )?;
        Ok(())
    }

    /// Insert a visit, returning its row id.
    pub fn insert(&self, visit: &VisitRecord) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO visits (url, title, domain, visit_time, time_spent)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                visit.url,
                visit.title,
                visit.domain,
                visit.visit_time,
                visit.time_spent,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The newest `limit` visits from the last `lookback_days`, oldest first.
    pub fn recent(&self, lookback_days: u32, limit: usize, now: i64) -> Result<Vec<VisitRecord>> {
        let cutoff = now.saturating_sub(i64::from(lookback_days) * DAY_MS);
        let conn = self.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT url, title, domain, visit_time, time_spent FROM (
                SELECT id, url, title, domain, visit_time, time_spent FROM visits
                WHERE visit_time >= ?1
                ORDER BY visit_time DESC, id DESC
                LIMIT ?2
            )
            ORDER BY visit_time ASC, id ASC
            "#,
        )?;
        let visits = stmt
            .query_map(params![cutoff, limit as i64], |row| Self::row_to_visit(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(visits)
    }

    /// Domains of the last `n` visits, oldest first.
    pub fn recent_domains(&self, n: usize) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT domain FROM (
                SELECT id, domain, visit_time FROM visits
                ORDER BY visit_time DESC, id DESC
                LIMIT ?1
            )
            ORDER BY visit_time ASC, id ASC
            "#,
        )?;
        let domains = stmt
            .query_map(params![n as i64], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(domains)
    }

    /// Most recent visit to a domain.
    pub fn latest_for_domain(&self, domain: &str) -> Result<Option<VisitRecord>> {
        let visit = self
            .conn()
            .query_row(
                r#"
                SELECT url, title, domain, visit_time, time_spent FROM visits
                WHERE domain = ?1
                ORDER BY visit_time DESC, id DESC
                LIMIT 1
                "#,
                params![domain],
                |row| Self::row_to_visit(row),
            )
            .optional()?;
        Ok(visit)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM visits", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Delete every stored visit.
    pub fn clear(&self) -> Result<()> {
        self.conn().execute("DELETE FROM visits", [])?;
        Ok(())
    }

    /// Import a JSON-lines visit log.
    ///
    /// Each line is a visit record. A supplied `domain` is normalized the same
    /// way as ingested URLs; a missing or unusable one is derived from the
    /// URL. Lines that still have no usable domain are skipped.
    pub fn import_jsonl(&self, path: &Path) -> Result<ImportStats> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut stats = ImportStats::default();

        let mut conn = self.conn();
        let tx = conn.transaction()?;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                stats.skipped += 1;
                continue;
            }

            let Ok(mut visit) = serde_json::from_str::<VisitRecord>(&line) else {
                stats.skipped += 1;
                continue;
            };
            match normalize_domain(&visit.domain).or_else(|| normalize_domain(&visit.url)) {
                Some(domain) => visit.domain = domain,
                None => {
                    stats.skipped += 1;
                    continue;
                }
            }

            tx.execute(
                r#"
                INSERT INTO visits (url, title, domain, visit_time, time_spent)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    visit.url,
                    visit.title,
                    visit.domain,
                    visit.visit_time,
                    visit.time_spent,
                ],
            )?;
            stats.imported += 1;
        }
        tx.commit()?;

        info!(
            target: "waypoint::store",
            "Imported {} visits from {} ({} skipped)",
            stats.imported,
            path.display(),
            stats.skipped
        );
        Ok(stats)
    }

    fn row_to_visit(row: &rusqlite::Row) -> rusqlite::Result<VisitRecord> {
        Ok(VisitRecord {
            url: row.get("url")?,
            title: row.get("title")?,
            domain: row.get("domain")?,
            visit_time: row.get("visit_time")?,
            time_spent: row.get("time_spent")?,
        })
    }
}

//! DuckDB store implementation

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use duckdb::{params, Connection, Row};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    CompanySales, FiscalMonth, Lesson, MonthlySeries, SalesYear, ScheduleEvent, Talent,
    TalentStatus,
};
use crate::ports::TalentStore;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const TALENT_COLUMNS: &str = "talent_id, status, name, gender, email, birth_date, contract_date,
    contract_end_date, rating, evaluation_note, sales, monthly_sales, monthly_average,
    height, weight, bust, waist, hip, shoe_size, specialty, hobby,
    bank_name, branch_name, account_type, account_number, account_holder,
    created_at, updated_at";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// DuckDB-backed store for the roster, company sales and schedules
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff when the file is locked by another
    /// process, e.g. a second `tp` invocation finishing a write.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[talentpro] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error
            .map(anyhow::Error::from)
            .unwrap_or_else(|| anyhow!("Failed to open database after {} retries", MAX_RETRIES)))
    }

    /// In-memory database, used by tests
    pub fn in_memory() -> anyhow::Result<Self> {
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_in_memory_with_flags(config)?;
        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    fn try_open_connection(db_path: &Path) -> duckdb::Result<Connection> {
        // Extension autoloading is disabled; cached extensions in ~/.duckdb may
        // be signed differently on macOS
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run pending migrations
    pub fn run_migrations(&self) -> anyhow::Result<MigrationResult> {
        let conn = self.lock()?;
        MigrationService::new(&conn).run_pending()
    }

    /// Ensure the schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> anyhow::Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Number of stored talents
    pub fn talent_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM sys_talents", [], |row| row.get(0))?;
        Ok(count)
    }

    /// True when no talents, lessons or sales are stored yet
    pub fn is_empty(&self) -> Result<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT (SELECT COUNT(*) FROM sys_talents)
                  + (SELECT COUNT(*) FROM sys_lessons)
                  + (SELECT COUNT(*) FROM sys_company_sales)",
            [],
            |row| row.get(0),
        )?;
        Ok(count == 0)
    }

    fn insert_talent(conn: &Connection, talent: &Talent, position: i64) -> Result<()> {
        let monthly_sales = talent
            .monthly_sales
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            &format!(
                "INSERT INTO sys_talents (position, {TALENT_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                position,
                talent.id.to_string(),
                talent.status.as_str(),
                talent.name,
                talent.gender,
                talent.email,
                talent.birth_date,
                talent.contract_date,
                talent.contract_end_date,
                i32::from(talent.rating),
                talent.evaluation_note,
                talent.sales,
                monthly_sales,
                talent.monthly_average,
                talent.height,
                talent.weight,
                talent.bust,
                talent.waist,
                talent.hip,
                talent.shoe_size,
                talent.specialty,
                talent.hobby,
                talent.bank_name,
                talent.branch_name,
                talent.account_type,
                talent.account_number,
                talent.account_holder,
                talent.created_at.to_rfc3339(),
                talent.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn row_to_talent(row: &Row) -> duckdb::Result<Talent> {
        // Columns follow TALENT_COLUMNS
        let id: String = row.get(0)?;
        let status: String = row.get(1)?;
        let rating: i32 = row.get(8)?;
        let monthly_sales: Option<String> = row.get(11)?;
        let created_at: String = row.get(26)?;
        let updated_at: String = row.get(27)?;

        Ok(Talent {
            id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::new_v4()),
            status: status.parse::<TalentStatus>().unwrap_or_default(),
            name: row.get(2)?,
            gender: row.get(3)?,
            email: row.get(4)?,
            birth_date: row.get(5)?,
            contract_date: row.get(6)?,
            contract_end_date: row.get(7)?,
            rating: u8::try_from(rating).unwrap_or(0),
            evaluation_note: row.get(9)?,
            sales: row.get(10)?,
            monthly_sales: monthly_sales
                .and_then(|json| serde_json::from_str::<MonthlySeries>(&json).ok()),
            monthly_average: row.get(12)?,
            height: row.get(13)?,
            weight: row.get(14)?,
            bust: row.get(15)?,
            waist: row.get(16)?,
            hip: row.get(17)?,
            shoe_size: row.get(18)?,
            specialty: row.get(19)?,
            hobby: row.get(20)?,
            bank_name: row.get(21)?,
            branch_name: row.get(22)?,
            account_type: row.get(23)?,
            account_number: row.get(24)?,
            account_holder: row.get(25)?,
            created_at: parse_timestamp(&created_at),
            updated_at: parse_timestamp(&updated_at),
        })
    }
}

impl TalentStore for DuckDbRepository {
    fn load_talents(&self) -> Result<Vec<Talent>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {TALENT_COLUMNS} FROM sys_talents ORDER BY position, name"
        ))?;
        let talents = stmt
            .query_map([], Self::row_to_talent)?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(talents)
    }

    fn save_talents(&self, talents: &[Talent]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sys_talents", [])?;
        for (position, talent) in talents.iter().enumerate() {
            Self::insert_talent(&tx, talent, position as i64)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn upsert_talent(&self, talent: &Talent) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let id = talent.id.to_string();

        let position: i64 = {
            let mut stmt = tx.prepare("SELECT position FROM sys_talents WHERE talent_id = ?")?;
            let existing: Option<i64> = stmt
                .query_map(params![id], |row| row.get(0))?
                .next()
                .transpose()?;
            match existing {
                Some(position) => position,
                None => tx.query_row(
                    "SELECT COALESCE(MAX(position) + 1, 0) FROM sys_talents",
                    [],
                    |row| row.get(0),
                )?,
            }
        };

        tx.execute("DELETE FROM sys_talents WHERE talent_id = ?", params![id])?;
        Self::insert_talent(&tx, talent, position)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_talent(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM sys_talents WHERE talent_id = ?",
            params![id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn load_company_sales(&self) -> Result<CompanySales> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT sales_year, month_index, amount FROM sys_company_sales")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i32>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;

        let mut sales = CompanySales::default();
        for (year, index, amount) in rows {
            let (Ok(year), Some(month)) = (
                year.parse::<SalesYear>(),
                usize::try_from(index).ok().and_then(|i| FiscalMonth::ALL.get(i)),
            ) else {
                continue;
            };
            let mut series = *sales.series(year);
            series.set(*month, amount);
            sales.replace(year, series);
        }
        Ok(sales)
    }

    fn save_company_sales(&self, sales: &CompanySales) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sys_company_sales", [])?;
        for year in [SalesYear::Current, SalesYear::Previous] {
            for month in FiscalMonth::ALL {
                tx.execute(
                    "INSERT INTO sys_company_sales (sales_year, month_index, amount) VALUES (?, ?, ?)",
                    params![year.as_str(), month.index() as i32, sales.series(year).get(month)],
                )?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_lessons(&self) -> Result<Vec<Lesson>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT lesson_id, title, lesson_date, start_time, end_time, lesson_type, location, instructor
             FROM sys_lessons
             ORDER BY lesson_date, start_time",
        )?;
        let lessons = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                Ok(Lesson {
                    id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::new_v4()),
                    title: row.get(1)?,
                    date: row.get(2)?,
                    start_time: row.get(3)?,
                    end_time: row.get(4)?,
                    lesson_type: row.get(5)?,
                    location: row.get(6)?,
                    instructor: row.get(7)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    fn upsert_lesson(&self, lesson: &Lesson) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_lessons (lesson_id, title, lesson_date, start_time, end_time,
                                      lesson_type, location, instructor)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (lesson_id) DO UPDATE SET
                title = EXCLUDED.title,
                lesson_date = EXCLUDED.lesson_date,
                start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                lesson_type = EXCLUDED.lesson_type,
                location = EXCLUDED.location,
                instructor = EXCLUDED.instructor",
            params![
                lesson.id.to_string(),
                lesson.title,
                lesson.date,
                lesson.start_time,
                lesson.end_time,
                lesson.lesson_type,
                lesson.location,
                lesson.instructor,
            ],
        )?;
        Ok(())
    }

    fn delete_lesson(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM sys_lessons WHERE lesson_id = ?",
            params![id.to_string()],
        )?;
        Ok(rows > 0)
    }

    fn load_events(&self) -> Result<Vec<ScheduleEvent>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT event_id, title, event_date, talent FROM sys_events ORDER BY event_date, title",
        )?;
        let events = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                Ok(ScheduleEvent {
                    id: Uuid::parse_str(&id).unwrap_or_else(|_| Uuid::new_v4()),
                    title: row.get(1)?,
                    date: row.get(2)?,
                    talent: row.get(3)?,
                })
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(events)
    }

    fn upsert_event(&self, event: &ScheduleEvent) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO sys_events (event_id, title, event_date, talent)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (event_id) DO UPDATE SET
                title = EXCLUDED.title,
                event_date = EXCLUDED.event_date,
                talent = EXCLUDED.talent",
            params![event.id.to_string(), event.title, event.date, event.talent],
        )?;
        Ok(())
    }

    fn delete_event(&self, id: Uuid) -> Result<bool> {
        let conn = self.lock()?;
        let rows = conn.execute(
            "DELETE FROM sys_events WHERE event_id = ?",
            params![id.to_string()],
        )?;
        Ok(rows > 0)
    }
}

// Helper functions

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

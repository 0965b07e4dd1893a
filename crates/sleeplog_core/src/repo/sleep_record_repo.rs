//! Sleep record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `sleep_data`.
//! - Execute range-filtered searches composed by `SleepRecordQuery`.
//! - Expose the commit/rollback boundary used by multi-step service updates.
//!
//! # Invariants
//! - Write paths call `SleepMeasurements::validate()` before SQL mutations.
//! - Every list/search result is ordered by `id ASC`.
//! - Respondent existence is not checked here; the foreign key is the last
//!   line only.

use crate::model::sleep_record::{NewSleepRecord, SleepMeasurements, SleepRecord, SleepRecordId};
use crate::repo::respondent_repo::{classify_write_error, RepoError, RepoResult};
use crate::search::sleep_query::SleepRecordQuery;
use chrono::NaiveDate;
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rusqlite::{Transaction, TransactionBehavior};

const SLEEP_RECORD_SELECT_SQL: &str = "SELECT
    id,
    date,
    person_id,
    sleep_start_time,
    sleep_end_time,
    total_sleep_hours,
    sleep_quality,
    exercise_minutes,
    caffeine_intake_mg,
    screen_time_before_bed,
    work_hours,
    productivity_score,
    mood_score,
    stress_level
FROM sleep_data";

/// Repository interface for sleep record persistence.
pub trait SleepRecordRepository {
    /// Inserts a record and returns it with the assigned id.
    fn create_record(&self, record: &NewSleepRecord) -> RepoResult<SleepRecord>;
    /// Gets one record by id.
    fn get_record(&self, id: SleepRecordId) -> RepoResult<Option<SleepRecord>>;
    /// Overwrites person reference and measurements of `record.id`.
    fn update_record(&self, record: &SleepRecord) -> RepoResult<()>;
    /// Hard-deletes one record.
    fn delete_record(&self, id: SleepRecordId) -> RepoResult<()>;
    /// Returns records matching every active bound of `query`, by id.
    fn search_records(&self, query: &SleepRecordQuery) -> RepoResult<Vec<SleepRecord>>;

    /// Runs `work` inside one transaction.
    ///
    /// Commits when `work` returns `Ok`; rolls back and returns the error
    /// unchanged otherwise.
    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>;
}

/// SQLite-backed sleep record repository.
pub struct SqliteSleepRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSleepRecordRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SleepRecordRepository for SqliteSleepRecordRepository<'_> {
    fn create_record(&self, record: &NewSleepRecord) -> RepoResult<SleepRecord> {
        record.measurements.validate()?;

        let values = &record.measurements;
        self.conn
            .execute(
                "INSERT INTO sleep_data (
                    date,
                    person_id,
                    sleep_start_time,
                    sleep_end_time,
                    total_sleep_hours,
                    sleep_quality,
                    exercise_minutes,
                    caffeine_intake_mg,
                    screen_time_before_bed,
                    work_hours,
                    productivity_score,
                    mood_score,
                    stress_level
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
                params![
                    record.date,
                    record.person_id,
                    values.sleep_start_time,
                    values.sleep_end_time,
                    values.total_sleep_hours,
                    values.sleep_quality,
                    values.exercise_minutes,
                    values.caffeine_intake_mg,
                    values.screen_time,
                    values.work_hours,
                    values.productivity_score,
                    values.mood_score,
                    values.stress_level,
                ],
            )
            .map_err(|err| classify_write_error(err, "sleep_data"))?;

        Ok(record.into_record(self.conn.last_insert_rowid()))
    }

    fn get_record(&self, id: SleepRecordId) -> RepoResult<Option<SleepRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SLEEP_RECORD_SELECT_SQL} WHERE id = ?1;"))?;
        let record = stmt
            .query_row([id], |row| Ok(parse_sleep_record_row(row)))
            .optional()?
            .transpose()?;
        Ok(record)
    }

    fn update_record(&self, record: &SleepRecord) -> RepoResult<()> {
        record.measurements.validate()?;

        let values = &record.measurements;
        let changed = self
            .conn
            .execute(
                "UPDATE sleep_data
                 SET
                    person_id = ?1,
                    sleep_start_time = ?2,
                    sleep_end_time = ?3,
                    total_sleep_hours = ?4,
                    sleep_quality = ?5,
                    exercise_minutes = ?6,
                    caffeine_intake_mg = ?7,
                    screen_time_before_bed = ?8,
                    work_hours = ?9,
                    productivity_score = ?10,
                    mood_score = ?11,
                    stress_level = ?12
                 WHERE id = ?13;",
                params![
                    record.person_id,
                    values.sleep_start_time,
                    values.sleep_end_time,
                    values.total_sleep_hours,
                    values.sleep_quality,
                    values.exercise_minutes,
                    values.caffeine_intake_mg,
                    values.screen_time,
                    values.work_hours,
                    values.productivity_score,
                    values.mood_score,
                    values.stress_level,
                    record.id,
                ],
            )
            .map_err(|err| classify_write_error(err, "sleep_data"))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "sleep_data",
                id: record.id,
            });
        }

        Ok(())
    }

    fn delete_record(&self, id: SleepRecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sleep_data WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "sleep_data",
                id,
            });
        }

        Ok(())
    }

    fn search_records(&self, query: &SleepRecordQuery) -> RepoResult<Vec<SleepRecord>> {
        let mut sql = String::from(SLEEP_RECORD_SELECT_SQL);
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(clause) = query.where_clause() {
            sql.push_str(&clause.sql);
            bind_values = clause.bind_values;
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_sleep_record_row(row)?);
        }

        Ok(records)
    }

    fn with_transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        match work() {
            Ok(value) => {
                tx.commit().map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=tx_rollback module=repo status=error error={}",
                        rollback_err
                    );
                }
                Err(err)
            }
        }
    }
}

fn parse_sleep_record_row(row: &Row<'_>) -> RepoResult<SleepRecord> {
    let measurements = SleepMeasurements {
        sleep_start_time: row.get("sleep_start_time")?,
        sleep_end_time: row.get("sleep_end_time")?,
        total_sleep_hours: row.get("total_sleep_hours")?,
        sleep_quality: row.get("sleep_quality")?,
        exercise_minutes: row.get("exercise_minutes")?,
        caffeine_intake_mg: row.get("caffeine_intake_mg")?,
        screen_time: row.get("screen_time_before_bed")?,
        work_hours: row.get("work_hours")?,
        productivity_score: row.get("productivity_score")?,
        mood_score: row.get("mood_score")?,
        stress_level: row.get("stress_level")?,
    };

    Ok(SleepRecord {
        id: row.get("id")?,
        date: row.get::<_, NaiveDate>("date")?,
        person_id: row.get("person_id")?,
        measurements,
    })
}

//! Application context owning the database connection.
//!
//! Services borrow the connection held here; nothing in the crate keeps a
//! process-wide connection.

use crate::config::AppConfig;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::repo::respondent_repo::SqliteRespondentRepository;
use crate::repo::sleep_record_repo::SqliteSleepRecordRepository;
use crate::service::respondent_service::RespondentService;
use crate::service::sleep_record_service::SleepRecordService;
use rusqlite::Connection;

pub type SqliteRespondentService<'conn> = RespondentService<SqliteRespondentRepository<'conn>>;
pub type SqliteSleepRecordService<'conn> =
    SleepRecordService<SqliteSleepRecordRepository<'conn>, SqliteRespondentRepository<'conn>>;

/// Owns one migrated SQLite connection and hands out services bound to it.
pub struct AppContext {
    conn: Connection,
}

impl AppContext {
    /// Opens the database at `config.db_path`, applying migrations.
    pub fn open(config: &AppConfig) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(&config.db_path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already bootstrapped connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn respondent_service(&self) -> SqliteRespondentService<'_> {
        RespondentService::new(SqliteRespondentRepository::new(&self.conn))
    }

    pub fn sleep_record_service(&self) -> SqliteSleepRecordService<'_> {
        SleepRecordService::new(
            SqliteSleepRecordRepository::new(&self.conn),
            self.respondent_service(),
        )
    }
}

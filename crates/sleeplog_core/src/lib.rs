//! Core domain logic for the sleep survey store.
//! This crate owns persistence, validation and search for respondents and
//! their sleep records.

pub mod app;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use app::{AppContext, SqliteRespondentService, SqliteSleepRecordService};
pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use export::spreadsheet::{export_respondents, export_sleep_records};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::respondent::{NewRespondent, Respondent, RespondentId, RespondentPatch};
pub use model::sleep_record::{
    NewSleepRecord, SleepMeasurements, SleepRecord, SleepRecordId, SleepRecordPatch,
};
pub use model::validation::ValidationError;
pub use repo::respondent_repo::{
    RepoError, RepoResult, RespondentRepository, SqliteRespondentRepository,
};
pub use repo::sleep_record_repo::{SleepRecordRepository, SqliteSleepRecordRepository};
pub use search::range_filter::RangeFilter;
pub use search::sleep_query::{SleepRecordQuery, ZeroSentinelBounds};
pub use service::respondent_service::{
    RespondentService, RespondentServiceError, RespondentServiceResult,
};
pub use service::sleep_record_service::{
    SleepRecordService, SleepRecordServiceError, SleepRecordServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Sleep record use-case service.
//!
//! # Responsibility
//! - Validate that referenced respondents exist before any write.
//! - Stamp new records with the current local date.
//! - Apply partial updates inside a single commit/rollback boundary.
//! - Expose range-filtered search to presentation callers.
//!
//! # Invariants
//! - `add` never writes when the respondent is missing.
//! - `update` either persists every provided field or none of them.
//! - Errors raised inside the update transaction reach the caller unchanged.

use crate::model::respondent::RespondentId;
use crate::model::sleep_record::{
    NewSleepRecord, SleepMeasurements, SleepRecord, SleepRecordId, SleepRecordPatch,
};
use crate::model::validation::ValidationError;
use crate::repo::respondent_repo::{RepoError, RespondentRepository};
use crate::repo::sleep_record_repo::SleepRecordRepository;
use crate::search::sleep_query::SleepRecordQuery;
use crate::service::respondent_service::{RespondentService, RespondentServiceError};
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SleepRecordServiceResult<T> = Result<T, SleepRecordServiceError>;

/// Service error for sleep record use-cases.
#[derive(Debug)]
pub enum SleepRecordServiceError {
    /// No sleep record with this id.
    RecordNotFound(SleepRecordId),
    /// Referenced respondent does not exist.
    RespondentNotFound(RespondentId),
    /// Measurements failed field validation.
    Validation(ValidationError),
    /// Respondent lookup failed for a reason other than absence.
    Respondent(RespondentServiceError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for SleepRecordServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RecordNotFound(id) => write!(f, "sleep record with id {id} not found"),
            Self::RespondentNotFound(id) => write!(f, "respondent with id {id} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Respondent(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SleepRecordServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Respondent(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::RecordNotFound(_) | Self::RespondentNotFound(_) => None,
        }
    }
}

impl From<RepoError> for SleepRecordServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound {
                table: "sleep_data",
                id,
            } => Self::RecordNotFound(id),
            RepoError::NotFound {
                table: "respondents",
                id,
            } => Self::RespondentNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<RespondentServiceError> for SleepRecordServiceError {
    fn from(value: RespondentServiceError) -> Self {
        match value {
            RespondentServiceError::RespondentNotFound(id) => Self::RespondentNotFound(id),
            RespondentServiceError::Repo(err) => Self::Repo(err),
            other => Self::Respondent(other),
        }
    }
}

/// Sleep record service facade over repository implementations.
pub struct SleepRecordService<S, R>
where
    S: SleepRecordRepository,
    R: RespondentRepository,
{
    records: S,
    respondents: RespondentService<R>,
}

impl<S, R> SleepRecordService<S, R>
where
    S: SleepRecordRepository,
    R: RespondentRepository,
{
    /// Creates a service over a record repository and the respondent service
    /// used for existence checks.
    pub fn new(records: S, respondents: RespondentService<R>) -> Self {
        Self {
            records,
            respondents,
        }
    }

    /// Records today's measurements for `person_id`.
    ///
    /// # Errors
    /// - `RespondentNotFound` before any write when `person_id` is unknown.
    /// - `Validation` when a measurement is negative or not finite.
    pub fn add(
        &self,
        person_id: RespondentId,
        measurements: SleepMeasurements,
    ) -> SleepRecordServiceResult<SleepRecord> {
        self.add_on(person_id, Local::now().date_naive(), measurements)
    }

    /// Records measurements for `person_id` on an explicit date.
    pub fn add_on(
        &self,
        person_id: RespondentId,
        date: NaiveDate,
        measurements: SleepMeasurements,
    ) -> SleepRecordServiceResult<SleepRecord> {
        self.respondents.ensure_exists(person_id)?;

        let created = self.records.create_record(&NewSleepRecord {
            date,
            person_id,
            measurements,
        })?;
        info!(
            "event=sleep_record_create module=service status=ok record_id={} respondent_id={}",
            created.id, person_id
        );
        Ok(created)
    }

    /// Applies `patch` to record `id` inside one transaction.
    ///
    /// Fields left `None` keep their stored values. When `patch.person_id` is
    /// set, the new respondent must exist. On any failure nothing is written
    /// and the original error is returned.
    pub fn update(
        &self,
        id: SleepRecordId,
        patch: &SleepRecordPatch,
    ) -> SleepRecordServiceResult<SleepRecord> {
        let outcome = self
            .records
            .with_transaction(|| -> SleepRecordServiceResult<SleepRecord> {
                let mut record = self.get_by_id(id)?;

                if let Some(person_id) = patch.person_id {
                    self.respondents.ensure_exists(person_id)?;
                }

                patch.apply_to(&mut record);
                self.records.update_record(&record)?;
                Ok(record)
            });

        match &outcome {
            Ok(_) => info!("event=sleep_record_update module=service status=ok record_id={id}"),
            Err(err) => warn!(
                "event=sleep_record_update module=service status=rolled_back record_id={id} error={err}"
            ),
        }
        outcome
    }

    /// Deletes record `id`.
    pub fn remove_by_id(&self, id: SleepRecordId) -> SleepRecordServiceResult<()> {
        self.get_by_id(id)?;
        self.records.delete_record(id)?;
        info!("event=sleep_record_delete module=service status=ok record_id={id}");
        Ok(())
    }

    /// Gets one record by id.
    pub fn get_by_id(&self, id: SleepRecordId) -> SleepRecordServiceResult<SleepRecord> {
        self.records
            .get_record(id)?
            .ok_or(SleepRecordServiceError::RecordNotFound(id))
    }

    /// Returns records matching every active bound, ordered by id.
    ///
    /// An empty result is a success.
    pub fn search(&self, query: &SleepRecordQuery) -> SleepRecordServiceResult<Vec<SleepRecord>> {
        let records = self.records.search_records(query)?;
        debug!(
            "event=sleep_record_search module=service status=ok filtered={} count={}",
            !query.is_unfiltered(),
            records.len()
        );
        Ok(records)
    }

    /// Returns every record ordered by id.
    pub fn list(&self) -> SleepRecordServiceResult<Vec<SleepRecord>> {
        self.search(&SleepRecordQuery::default())
    }

    /// Respondent service used for existence checks.
    pub fn respondents(&self) -> &RespondentService<R> {
        &self.respondents
    }
}

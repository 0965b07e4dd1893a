//! Respondent use-case service.
//!
//! # Responsibility
//! - Provide the respondent CRUD and search surface for presentation callers.
//! - Turn repository results into respondent-specific errors.
//!
//! # Invariants
//! - Lookups by id never return an empty success; absence is
//!   `RespondentNotFound`.
//! - Text input is trimmed before validation and persistence.
//! - Log events carry ids and counts only, never personal fields.

use crate::model::respondent::{NewRespondent, Respondent, RespondentId, RespondentPatch};
use crate::model::validation::ValidationError;
use crate::repo::respondent_repo::{RepoError, RespondentRepository};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RespondentServiceResult<T> = Result<T, RespondentServiceError>;

/// Service error for respondent use-cases.
#[derive(Debug)]
pub enum RespondentServiceError {
    /// No respondent with this id.
    RespondentNotFound(RespondentId),
    /// Another respondent already uses this email.
    DuplicateEmail(String),
    /// Sleep records still reference this respondent.
    RespondentInUse(RespondentId),
    /// Input failed field validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for RespondentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RespondentNotFound(id) => write!(f, "respondent with id {id} not found"),
            Self::DuplicateEmail(email) => {
                write!(f, "respondent with email `{email}` already exists")
            }
            Self::RespondentInUse(id) => {
                write!(f, "respondent {id} still has sleep records")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RespondentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RespondentServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::RespondentNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Respondent service facade over repository implementations.
pub struct RespondentService<R: RespondentRepository> {
    repo: R,
}

impl<R: RespondentRepository> RespondentService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every respondent ordered by id.
    pub fn list(&self) -> RespondentServiceResult<Vec<Respondent>> {
        let respondents = self.repo.list_respondents()?;
        debug!(
            "event=respondent_list module=service status=ok count={}",
            respondents.len()
        );
        Ok(respondents)
    }

    /// Creates one respondent.
    ///
    /// # Errors
    /// - `DuplicateEmail` when the email is already taken.
    /// - `Validation` when a mandatory field is blank or malformed.
    pub fn add(&self, fields: &NewRespondent) -> RespondentServiceResult<Respondent> {
        let fields = fields.trimmed();
        let created = self
            .repo
            .create_respondent(&fields)
            .map_err(|err| map_unique_violation(err, &fields.email))?;
        info!(
            "event=respondent_create module=service status=ok respondent_id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces the fields named by `patch` and returns the stored result.
    pub fn update(
        &self,
        id: RespondentId,
        patch: &RespondentPatch,
    ) -> RespondentServiceResult<Respondent> {
        let mut respondent = self.get_by_id(id)?;
        respondent.apply_patch(patch);
        self.repo
            .update_respondent(&respondent)
            .map_err(|err| map_unique_violation(err, &respondent.email))?;
        info!("event=respondent_update module=service status=ok respondent_id={id}");
        Ok(respondent)
    }

    /// Deletes one respondent.
    ///
    /// A second delete of the same id fails with `RespondentNotFound`.
    pub fn delete_by_id(&self, id: RespondentId) -> RespondentServiceResult<()> {
        self.repo.delete_respondent(id).map_err(|err| match err {
            RepoError::ForeignKeyViolation { .. } => RespondentServiceError::RespondentInUse(id),
            other => other.into(),
        })?;
        info!("event=respondent_delete module=service status=ok respondent_id={id}");
        Ok(())
    }

    /// Case-insensitive last-name prefix search.
    pub fn search_by_last_name(&self, prefix: &str) -> RespondentServiceResult<Vec<Respondent>> {
        let respondents = self.repo.search_by_last_name_prefix(prefix)?;
        debug!(
            "event=respondent_search module=service status=ok count={}",
            respondents.len()
        );
        Ok(respondents)
    }

    /// Gets one respondent by id.
    pub fn get_by_id(&self, id: RespondentId) -> RespondentServiceResult<Respondent> {
        self.repo
            .get_respondent(id)?
            .ok_or(RespondentServiceError::RespondentNotFound(id))
    }

    /// Fails with `RespondentNotFound` unless `id` exists.
    pub fn ensure_exists(&self, id: RespondentId) -> RespondentServiceResult<()> {
        self.get_by_id(id).map(|_| ())
    }
}

fn map_unique_violation(err: RepoError, email: &str) -> RespondentServiceError {
    match err {
        RepoError::UniqueViolation { constraint } if constraint.contains("email") => {
            RespondentServiceError::DuplicateEmail(email.to_string())
        }
        other => other.into(),
    }
}

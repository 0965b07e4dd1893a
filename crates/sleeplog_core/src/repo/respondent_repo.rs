//! Respondent repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and last-name prefix search over `respondents`.
//! - Translate SQLite constraint failures into semantic repository errors.
//!
//! # Invariants
//! - Write paths call `validate()` before SQL mutations.
//! - Read paths return stored rows as-is; they never re-validate.
//! - List and search results are ordered by `id ASC`.
//! - Update and delete report `NotFound` when no row matched.

use crate::db::DbError;
use crate::model::respondent::{NewRespondent, Respondent, RespondentId};
use crate::model::validation::ValidationError;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RESPONDENT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    gender,
    country,
    age
FROM respondents";

const FOREIGN_KEY_FAILED_MESSAGE: &str = "FOREIGN KEY constraint failed";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by respondent and sleep-record persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// No row with this id in `table`.
    NotFound { table: &'static str, id: i64 },
    /// A `UNIQUE` constraint rejected the write, e.g. `respondents.email`.
    UniqueViolation { constraint: String },
    /// A foreign key rejected the write or delete.
    ForeignKeyViolation { table: &'static str },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { table, id } => write!(f, "{table} row not found: {id}"),
            Self::UniqueViolation { constraint } => {
                write!(f, "unique constraint violated: {constraint}")
            }
            Self::ForeignKeyViolation { table } => {
                write!(f, "foreign key constraint violated on {table}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::UniqueViolation { .. }
            | Self::ForeignKeyViolation { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps constraint failures of a write on `table` to semantic errors.
pub(crate) fn classify_write_error(err: rusqlite::Error, table: &'static str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
        match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                let constraint = message
                    .as_deref()
                    .and_then(|text| text.split_once("failed: "))
                    .map(|(_, columns)| columns.to_string())
                    .unwrap_or_else(|| table.to_string());
                return RepoError::UniqueViolation { constraint };
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                return RepoError::ForeignKeyViolation { table };
            }
            // `ON DELETE RESTRICT` actions surface through the trigger code.
            ffi::SQLITE_CONSTRAINT_TRIGGER
                if message.as_deref() == Some(FOREIGN_KEY_FAILED_MESSAGE) =>
            {
                return RepoError::ForeignKeyViolation { table };
            }
            _ => {}
        }
    }
    RepoError::from(err)
}

/// Repository interface for respondent persistence.
pub trait RespondentRepository {
    /// Returns all respondents ordered by id.
    fn list_respondents(&self) -> RepoResult<Vec<Respondent>>;
    /// Inserts a respondent and returns it with the assigned id.
    fn create_respondent(&self, respondent: &NewRespondent) -> RepoResult<Respondent>;
    /// Gets one respondent by id.
    fn get_respondent(&self, id: RespondentId) -> RepoResult<Option<Respondent>>;
    /// Overwrites every stored field of `respondent.id`.
    fn update_respondent(&self, respondent: &Respondent) -> RepoResult<()>;
    /// Hard-deletes one respondent.
    fn delete_respondent(&self, id: RespondentId) -> RepoResult<()>;
    /// Case-insensitive last-name prefix match, ordered by id.
    fn search_by_last_name_prefix(&self, prefix: &str) -> RepoResult<Vec<Respondent>>;
}

/// SQLite-backed respondent repository.
pub struct SqliteRespondentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRespondentRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_respondents(&self, sql: &str) -> RepoResult<Vec<Respondent>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut respondents = Vec::new();
        while let Some(row) = rows.next()? {
            respondents.push(parse_respondent_row(row)?);
        }
        Ok(respondents)
    }
}

impl RespondentRepository for SqliteRespondentRepository<'_> {
    fn list_respondents(&self) -> RepoResult<Vec<Respondent>> {
        self.query_respondents(&format!("{RESPONDENT_SELECT_SQL} ORDER BY id ASC;"))
    }

    fn create_respondent(&self, respondent: &NewRespondent) -> RepoResult<Respondent> {
        respondent.validate()?;

        self.conn
            .execute(
                "INSERT INTO respondents (
                    first_name,
                    last_name,
                    email,
                    gender,
                    country,
                    age
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    respondent.first_name.as_str(),
                    respondent.last_name.as_str(),
                    respondent.email.as_str(),
                    respondent.gender.as_str(),
                    respondent.country.as_str(),
                    respondent.age,
                ],
            )
            .map_err(|err| classify_write_error(err, "respondents"))?;

        Ok(respondent.clone().into_respondent(self.conn.last_insert_rowid()))
    }

    fn get_respondent(&self, id: RespondentId) -> RepoResult<Option<Respondent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RESPONDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let respondent = stmt
            .query_row([id], |row| Ok(parse_respondent_row(row)))
            .optional()?
            .transpose()?;
        Ok(respondent)
    }

    fn update_respondent(&self, respondent: &Respondent) -> RepoResult<()> {
        respondent.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE respondents
                 SET
                    first_name = ?1,
                    last_name = ?2,
                    email = ?3,
                    gender = ?4,
                    country = ?5,
                    age = ?6
                 WHERE id = ?7;",
                params![
                    respondent.first_name.as_str(),
                    respondent.last_name.as_str(),
                    respondent.email.as_str(),
                    respondent.gender.as_str(),
                    respondent.country.as_str(),
                    respondent.age,
                    respondent.id,
                ],
            )
            .map_err(|err| classify_write_error(err, "respondents"))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "respondents",
                id: respondent.id,
            });
        }

        Ok(())
    }

    fn delete_respondent(&self, id: RespondentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM respondents WHERE id = ?1;", [id])
            .map_err(|err| classify_write_error(err, "respondents"))?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "respondents",
                id,
            });
        }

        Ok(())
    }

    fn search_by_last_name_prefix(&self, prefix: &str) -> RepoResult<Vec<Respondent>> {
        // SQLite's lower() only folds ASCII, so matching happens on Rust strings.
        let needle = prefix.to_lowercase();
        let mut respondents = self.list_respondents()?;
        respondents.retain(|respondent| respondent.last_name.to_lowercase().starts_with(&needle));
        Ok(respondents)
    }
}

fn parse_respondent_row(row: &Row<'_>) -> RepoResult<Respondent> {
    Ok(Respondent {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        gender: row.get("gender")?,
        country: row.get("country")?,
        age: row.get("age")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_write_error, RepoError, FOREIGN_KEY_FAILED_MESSAGE};
    use rusqlite::ffi;

    fn sqlite_failure(extended_code: i32, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(extended_code), Some(message.to_string()))
    }

    #[test]
    fn foreign_key_failures_are_classified_for_both_codes() {
        for code in [
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            ffi::SQLITE_CONSTRAINT_TRIGGER,
        ] {
            let err = classify_write_error(
                sqlite_failure(code, FOREIGN_KEY_FAILED_MESSAGE),
                "respondents",
            );
            assert!(matches!(
                err,
                RepoError::ForeignKeyViolation {
                    table: "respondents"
                }
            ));
        }
    }

    #[test]
    fn other_trigger_failures_stay_database_errors() {
        let err = classify_write_error(
            sqlite_failure(ffi::SQLITE_CONSTRAINT_TRIGGER, "custom trigger abort"),
            "respondents",
        );
        assert!(matches!(err, RepoError::Db(_)));
    }

    #[test]
    fn unique_failures_carry_the_constraint_columns() {
        let err = classify_write_error(
            sqlite_failure(
                ffi::SQLITE_CONSTRAINT_UNIQUE,
                "UNIQUE constraint failed: respondents.email",
            ),
            "respondents",
        );
        assert!(matches!(
            err,
            RepoError::UniqueViolation { constraint } if constraint == "respondents.email"
        ));
    }
}

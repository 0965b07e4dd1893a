//! Sleep record domain model.
//!
//! # Responsibility
//! - Define one day's sleep/lifestyle measurements tied to a respondent.
//! - Model partial updates with an explicit optional value per field.
//!
//! # Invariants
//! - `person_id` must reference an existing respondent at create and update
//!   time. The service checks this; the model does not.
//! - Float measurements are finite and every measurement is `>= 0`.

use crate::model::respondent::RespondentId;
use crate::model::validation::{
    require_non_negative_float, require_non_negative_int, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned sleep record identity.
pub type SleepRecordId = i64;

/// The eleven numeric measurements captured per sleep record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepMeasurements {
    /// Hour of day the respondent fell asleep, e.g. `23.5`.
    pub sleep_start_time: f64,
    /// Hour of day the respondent woke up.
    pub sleep_end_time: f64,
    pub total_sleep_hours: f64,
    pub sleep_quality: i32,
    pub exercise_minutes: i32,
    pub caffeine_intake_mg: i32,
    /// Minutes of screen time before bed.
    pub screen_time: i32,
    pub work_hours: f64,
    pub productivity_score: i32,
    pub mood_score: i32,
    pub stress_level: i32,
}

impl SleepMeasurements {
    /// Checks that floats are finite and no value is negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative_float("sleep_start_time", self.sleep_start_time)?;
        require_non_negative_float("sleep_end_time", self.sleep_end_time)?;
        require_non_negative_float("total_sleep_hours", self.total_sleep_hours)?;
        require_non_negative_int("sleep_quality", self.sleep_quality)?;
        require_non_negative_int("exercise_minutes", self.exercise_minutes)?;
        require_non_negative_int("caffeine_intake_mg", self.caffeine_intake_mg)?;
        require_non_negative_int("screen_time", self.screen_time)?;
        require_non_negative_float("work_hours", self.work_hours)?;
        require_non_negative_int("productivity_score", self.productivity_score)?;
        require_non_negative_int("mood_score", self.mood_score)?;
        require_non_negative_int("stress_level", self.stress_level)?;
        Ok(())
    }
}

/// Persisted sleep record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepRecord {
    pub id: SleepRecordId,
    pub date: NaiveDate,
    pub person_id: RespondentId,
    #[serde(flatten)]
    pub measurements: SleepMeasurements,
}

/// Create input for a sleep record. The store assigns the id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewSleepRecord {
    pub date: NaiveDate,
    pub person_id: RespondentId,
    pub measurements: SleepMeasurements,
}

impl NewSleepRecord {
    /// Attaches a store-assigned id.
    pub fn into_record(self, id: SleepRecordId) -> SleepRecord {
        SleepRecord {
            id,
            date: self.date,
            person_id: self.person_id,
            measurements: self.measurements,
        }
    }
}

/// Partial update for a sleep record.
///
/// Each of the twelve fields is independent: `Some(v)` overwrites the stored
/// value, `None` leaves it untouched. The record date is never patched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepRecordPatch {
    pub person_id: Option<RespondentId>,
    pub sleep_start_time: Option<f64>,
    pub sleep_end_time: Option<f64>,
    pub total_sleep_hours: Option<f64>,
    pub sleep_quality: Option<i32>,
    pub exercise_minutes: Option<i32>,
    pub caffeine_intake_mg: Option<i32>,
    pub screen_time: Option<i32>,
    pub work_hours: Option<f64>,
    pub productivity_score: Option<i32>,
    pub mood_score: Option<i32>,
    pub stress_level: Option<i32>,
}

impl SleepRecordPatch {
    /// Builds a patch that sets every field, matching a full-form edit.
    pub fn replace_all(person_id: RespondentId, values: &SleepMeasurements) -> Self {
        Self {
            person_id: Some(person_id),
            sleep_start_time: Some(values.sleep_start_time),
            sleep_end_time: Some(values.sleep_end_time),
            total_sleep_hours: Some(values.total_sleep_hours),
            sleep_quality: Some(values.sleep_quality),
            exercise_minutes: Some(values.exercise_minutes),
            caffeine_intake_mg: Some(values.caffeine_intake_mg),
            screen_time: Some(values.screen_time),
            work_hours: Some(values.work_hours),
            productivity_score: Some(values.productivity_score),
            mood_score: Some(values.mood_score),
            stress_level: Some(values.stress_level),
        }
    }

    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrites the fields of `record` that this patch provides.
    pub fn apply_to(&self, record: &mut SleepRecord) {
        fn set<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }

        let values = &mut record.measurements;
        set(&mut record.person_id, self.person_id);
        set(&mut values.sleep_start_time, self.sleep_start_time);
        set(&mut values.sleep_end_time, self.sleep_end_time);
        set(&mut values.total_sleep_hours, self.total_sleep_hours);
        set(&mut values.sleep_quality, self.sleep_quality);
        set(&mut values.exercise_minutes, self.exercise_minutes);
        set(&mut values.caffeine_intake_mg, self.caffeine_intake_mg);
        set(&mut values.screen_time, self.screen_time);
        set(&mut values.work_hours, self.work_hours);
        set(&mut values.productivity_score, self.productivity_score);
        set(&mut values.mood_score, self.mood_score);
        set(&mut values.stress_level, self.stress_level);
    }
}

//! Multi-field range query over sleep records.
//!
//! # Responsibility
//! - Hold the respondent restriction plus one `RangeFilter` per measurement.
//! - Translate active bounds into a parameterized `WHERE` clause.
//! - Adapt legacy zero-sentinel bounds into explicit optional bounds.
//!
//! # Invariants
//! - Every active dimension contributes exactly one predicate; predicates are
//!   joined with `AND`.
//! - A query with no active dimension yields no clause, so callers return the
//!   full table.
//! - Bound values are always bound parameters, never interpolated SQL.

use crate::model::respondent::RespondentId;
use crate::search::range_filter::RangeFilter;
use rusqlite::types::Value;

/// Range-filtered search over sleep records.
///
/// `Default` is the unrestricted query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SleepRecordQuery {
    /// Restricts results to one respondent when set.
    pub respondent_id: Option<RespondentId>,
    pub sleep_start_time: RangeFilter<f64>,
    pub sleep_end_time: RangeFilter<f64>,
    pub total_sleep_hours: RangeFilter<f64>,
    pub sleep_quality: RangeFilter<i32>,
    pub exercise_minutes: RangeFilter<i32>,
    pub caffeine_intake_mg: RangeFilter<i32>,
    pub screen_time: RangeFilter<i32>,
    pub work_hours: RangeFilter<f64>,
    pub productivity_score: RangeFilter<i32>,
    pub mood_score: RangeFilter<i32>,
    pub stress_level: RangeFilter<i32>,
}

/// Parameterized SQL fragment produced from a query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WhereClause {
    /// Starts with ` WHERE `.
    pub sql: String,
    pub bind_values: Vec<Value>,
}

impl SleepRecordQuery {
    /// Query for all records of one respondent.
    pub fn for_respondent(respondent_id: RespondentId) -> Self {
        Self {
            respondent_id: Some(respondent_id),
            ..Self::default()
        }
    }

    /// Returns `true` when no restriction is set on any dimension.
    pub fn is_unfiltered(&self) -> bool {
        self.respondent_id.is_none()
            && !self.sleep_start_time.is_active()
            && !self.sleep_end_time.is_active()
            && !self.total_sleep_hours.is_active()
            && !self.sleep_quality.is_active()
            && !self.exercise_minutes.is_active()
            && !self.caffeine_intake_mg.is_active()
            && !self.screen_time.is_active()
            && !self.work_hours.is_active()
            && !self.productivity_score.is_active()
            && !self.mood_score.is_active()
            && !self.stress_level.is_active()
    }

    /// Builds the `WHERE` clause, or `None` for an unfiltered query.
    pub(crate) fn where_clause(&self) -> Option<WhereClause> {
        if self.is_unfiltered() {
            return None;
        }

        let mut predicates = Vec::new();
        let mut bind_values = Vec::new();

        if let Some(respondent_id) = self.respondent_id {
            predicates.push("person_id = ?".to_string());
            bind_values.push(Value::Integer(respondent_id));
        }

        let p = &mut predicates;
        let b = &mut bind_values;
        self.sleep_start_time.push_predicate("sleep_start_time", p, b);
        self.sleep_end_time.push_predicate("sleep_end_time", p, b);
        self.total_sleep_hours.push_predicate("total_sleep_hours", p, b);
        self.sleep_quality.push_predicate("sleep_quality", p, b);
        self.exercise_minutes.push_predicate("exercise_minutes", p, b);
        self.caffeine_intake_mg.push_predicate("caffeine_intake_mg", p, b);
        self.screen_time.push_predicate("screen_time_before_bed", p, b);
        self.work_hours.push_predicate("work_hours", p, b);
        self.productivity_score.push_predicate("productivity_score", p, b);
        self.mood_score.push_predicate("mood_score", p, b);
        self.stress_level.push_predicate("stress_level", p, b);

        Some(WhereClause {
            sql: format!(" WHERE {}", predicates.join(" AND ")),
            bind_values,
        })
    }
}

/// Legacy flat search bounds where `0` means "not specified".
///
/// Kept for callers that still pass 23 plain numbers. Prefer building a
/// [`SleepRecordQuery`] directly, which can express a zero boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZeroSentinelBounds {
    pub respondent_id: RespondentId,
    pub sleep_start_time_min: f64,
    pub sleep_start_time_max: f64,
    pub sleep_end_time_min: f64,
    pub sleep_end_time_max: f64,
    pub total_sleep_hours_min: f64,
    pub total_sleep_hours_max: f64,
    pub sleep_quality_min: i32,
    pub sleep_quality_max: i32,
    pub exercise_minutes_min: i32,
    pub exercise_minutes_max: i32,
    pub caffeine_intake_mg_min: i32,
    pub caffeine_intake_mg_max: i32,
    pub screen_time_min: i32,
    pub screen_time_max: i32,
    pub work_hours_min: f64,
    pub work_hours_max: f64,
    pub productivity_score_min: i32,
    pub productivity_score_max: i32,
    pub mood_score_min: i32,
    pub mood_score_max: i32,
    pub stress_level_min: i32,
    pub stress_level_max: i32,
}

impl From<&ZeroSentinelBounds> for SleepRecordQuery {
    fn from(bounds: &ZeroSentinelBounds) -> Self {
        Self {
            respondent_id: (bounds.respondent_id > 0).then_some(bounds.respondent_id),
            sleep_start_time: RangeFilter::from_zero_sentinel(
                bounds.sleep_start_time_min,
                bounds.sleep_start_time_max,
            ),
            sleep_end_time: RangeFilter::from_zero_sentinel(
                bounds.sleep_end_time_min,
                bounds.sleep_end_time_max,
            ),
            total_sleep_hours: RangeFilter::from_zero_sentinel(
                bounds.total_sleep_hours_min,
                bounds.total_sleep_hours_max,
            ),
            sleep_quality: RangeFilter::from_zero_sentinel(
                bounds.sleep_quality_min,
                bounds.sleep_quality_max,
            ),
            exercise_minutes: RangeFilter::from_zero_sentinel(
                bounds.exercise_minutes_min,
                bounds.exercise_minutes_max,
            ),
            caffeine_intake_mg: RangeFilter::from_zero_sentinel(
                bounds.caffeine_intake_mg_min,
                bounds.caffeine_intake_mg_max,
            ),
            screen_time: RangeFilter::from_zero_sentinel(
                bounds.screen_time_min,
                bounds.screen_time_max,
            ),
            work_hours: RangeFilter::from_zero_sentinel(
                bounds.work_hours_min,
                bounds.work_hours_max,
            ),
            productivity_score: RangeFilter::from_zero_sentinel(
                bounds.productivity_score_min,
                bounds.productivity_score_max,
            ),
            mood_score: RangeFilter::from_zero_sentinel(
                bounds.mood_score_min,
                bounds.mood_score_max,
            ),
            stress_level: RangeFilter::from_zero_sentinel(
                bounds.stress_level_min,
                bounds.stress_level_max,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SleepRecordQuery, ZeroSentinelBounds};
    use crate::search::range_filter::RangeFilter;
    use rusqlite::types::Value;

    #[test]
    fn default_query_has_no_where_clause() {
        let query = SleepRecordQuery::default();
        assert!(query.is_unfiltered());
        assert_eq!(query.where_clause(), None);
    }

    #[test]
    fn active_dimensions_are_joined_with_and_in_column_order() {
        let query = SleepRecordQuery {
            respondent_id: Some(4),
            total_sleep_hours: RangeFilter::at_least(6.0),
            screen_time: RangeFilter::between(10, 60),
            stress_level: RangeFilter::at_most(3),
            ..SleepRecordQuery::default()
        };

        let clause = query.where_clause().unwrap();
        assert_eq!(
            clause.sql,
            " WHERE person_id = ? AND total_sleep_hours >= ? \
             AND screen_time_before_bed BETWEEN ? AND ? AND stress_level <= ?"
        );
        assert_eq!(
            clause.bind_values,
            vec![
                Value::Integer(4),
                Value::Real(6.0),
                Value::Integer(10),
                Value::Integer(60),
                Value::Integer(3),
            ]
        );
    }

    #[test]
    fn respondent_only_query_is_filtered() {
        let query = SleepRecordQuery::for_respondent(9);
        assert!(!query.is_unfiltered());
        assert_eq!(query.where_clause().unwrap().sql, " WHERE person_id = ?");
    }

    #[test]
    fn all_zero_sentinel_bounds_map_to_unfiltered_query() {
        let query = SleepRecordQuery::from(&ZeroSentinelBounds::default());
        assert_eq!(query, SleepRecordQuery::default());
    }

    #[test]
    fn sentinel_bounds_keep_positive_values_only() {
        let bounds = ZeroSentinelBounds {
            respondent_id: 2,
            sleep_quality_min: 3,
            sleep_quality_max: 9,
            work_hours_max: 8.0,
            mood_score_min: -1,
            ..ZeroSentinelBounds::default()
        };
        let query = SleepRecordQuery::from(&bounds);

        assert_eq!(query.respondent_id, Some(2));
        assert_eq!(query.sleep_quality, RangeFilter::between(3, 9));
        assert_eq!(query.work_hours, RangeFilter::at_most(8.0));
        assert_eq!(query.mood_score, RangeFilter::any());
    }
}

//! Optional `(min, max)` bound applied to one numeric column.

use rusqlite::types::Value;

/// Inclusive range bound on one numeric measurement.
///
/// Either side may be absent. A present bound of zero is a real bound.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeFilter<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> RangeFilter<T> {
    /// No restriction on this dimension.
    pub fn any() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// `min <= value <= max`.
    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// `value >= min`.
    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// `value <= max`.
    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Returns `true` when at least one side is bounded.
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

impl<T: Copy + PartialOrd + Default> RangeFilter<T> {
    /// Converts legacy bounds where a non-positive value means "not set".
    ///
    /// A legitimate zero boundary cannot be expressed this way.
    pub fn from_zero_sentinel(min: T, max: T) -> Self {
        let zero = T::default();
        Self {
            min: (min > zero).then_some(min),
            max: (max > zero).then_some(max),
        }
    }
}

impl<T: Copy + Into<Value>> RangeFilter<T> {
    /// Appends this bound's predicate on `column`, if any.
    pub(crate) fn push_predicate(
        &self,
        column: &'static str,
        predicates: &mut Vec<String>,
        bind_values: &mut Vec<Value>,
    ) {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                predicates.push(format!("{column} BETWEEN ? AND ?"));
                bind_values.push(min.into());
                bind_values.push(max.into());
            }
            (Some(min), None) => {
                predicates.push(format!("{column} >= ?"));
                bind_values.push(min.into());
            }
            (None, Some(max)) => {
                predicates.push(format!("{column} <= ?"));
                bind_values.push(max.into());
            }
            (None, None) => {}
        }
    }
}

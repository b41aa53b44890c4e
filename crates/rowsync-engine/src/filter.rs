//! Per-column filter sets.

use std::collections::BTreeMap;

use rowsync_model::Record;

use crate::predicate::Predicate;

/// A set of per-column predicates, combined with implicit AND across columns.
///
/// A filter set is an owned, per-query value: build it, evaluate it, drop
/// it. Nothing is shared or global, so concurrent queries cannot leak state
/// into each other.
///
/// Evaluation iterates the **record's** columns, not the filter set's. Two
/// consequences, both deliberate: a column with no registered predicate never
/// blocks a match, and a predicate registered for a column the record does
/// not have never blocks a match either. This is not the same as requiring
/// every filtered column to be present.
#[derive(Debug, Default)]
pub struct ColumnFilters {
    predicates: BTreeMap<String, Predicate>,
}

impl ColumnFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes the next [`condition`](ColumnFilterBuilder::condition) call to
    /// `column`.
    pub fn on_column(self, column: impl Into<String>) -> ColumnFilterBuilder {
        ColumnFilterBuilder {
            filters: self,
            column: column.into(),
        }
    }

    /// True iff every column present in `record` passes its registered
    /// predicate. An empty filter set matches every record.
    pub fn matches(&self, record: &Record) -> bool {
        record.iter().all(|(column, value)| {
            self.predicates
                .get(column)
                .is_none_or(|predicate| predicate.test(value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }
}

/// A filter set with one column scoped, waiting for its predicate.
#[derive(Debug)]
pub struct ColumnFilterBuilder {
    filters: ColumnFilters,
    column: String,
}

impl ColumnFilterBuilder {
    /// Registers `predicate` for the scoped column and hands the filter set
    /// back for further chaining.
    ///
    /// Registering the same column twice overwrites: the last registration
    /// wins, matching the fluent usage where each `on_column` names a fresh
    /// column.
    pub fn condition(mut self, predicate: Predicate) -> ColumnFilters {
        self.filters.predicates.insert(self.column, predicate);
        self.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(column, value)| ((*column).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn empty_filter_set_matches_everything() {
        let filters = ColumnFilters::new();
        assert!(filters.matches(&record(&[("A", "x")])));
        assert!(filters.matches(&Record::new()));
    }

    #[test]
    fn columns_combine_with_and() {
        let filters = ColumnFilters::new()
            .on_column("Category")
            .condition(conditions::equals("Food"))
            .on_column("Amount")
            .condition(conditions::is_not_empty());
        assert!(filters.matches(&record(&[("Category", "Food"), ("Amount", "12")])));
        assert!(!filters.matches(&record(&[("Category", "Food"), ("Amount", "")])));
        assert!(!filters.matches(&record(&[("Category", "Rent"), ("Amount", "12")])));
    }

    #[test]
    fn unregistered_record_columns_never_block() {
        let filters = ColumnFilters::new()
            .on_column("Category")
            .condition(conditions::equals("Food"));
        assert!(filters.matches(&record(&[("Category", "Food"), ("Note", "anything")])));
    }

    #[test]
    fn filtered_columns_absent_from_the_record_never_block() {
        let filters = ColumnFilters::new()
            .on_column("Missing")
            .condition(conditions::equals("never"));
        assert!(filters.matches(&record(&[("Category", "Food")])));
    }

    #[test]
    fn duplicate_registration_keeps_the_last_predicate() {
        let filters = ColumnFilters::new()
            .on_column("Category")
            .condition(conditions::equals("Food"))
            .on_column("Category")
            .condition(conditions::equals("Travel"));
        assert_eq!(filters.len(), 1);
        assert!(filters.matches(&record(&[("Category", "Travel")])));
        assert!(!filters.matches(&record(&[("Category", "Food")])));
    }
}

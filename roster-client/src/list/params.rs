//! Sort, filter and pagination intent for the employee list

use serde::Serialize;
use shared::{ListVariables, SortDirection, SortField};

/// Query parameter state
///
/// Pure data. Every setter reports whether the parameter tuple changed so the
/// caller knows when a refetch is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    sort_field: SortField,
    sort_direction: SortDirection,
    filter_text: String,
    page_index: u32,
    page_size: u32,
}

impl QueryParams {
    /// Default state: sorted by name ascending, unfiltered, first page
    pub fn new(page_size: u32) -> Self {
        Self {
            sort_field: SortField::Name,
            sort_direction: SortDirection::Ascending,
            filter_text: String::new(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Skip offset sent with the query
    pub fn skip(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// Column header click
    ///
    /// A column always lands on DESC; only clicking the active column while it
    /// is DESC brings it back to ASC. Always changes the tuple.
    pub fn set_sort(&mut self, field: SortField) -> bool {
        let same_descending =
            self.sort_field == field && self.sort_direction == SortDirection::Descending;
        let direction = if same_descending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };

        tracing::debug!(field = %field, direction = %direction, "Sort changed");
        self.sort_field = field;
        self.sort_direction = direction;
        true
    }

    /// Replace the filter text verbatim
    pub fn set_filter_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.filter_text {
            return false;
        }
        tracing::debug!(filter = %text, "Filter changed");
        self.filter_text = text;
        true
    }

    /// Jump to a page; the list UI has no control for this
    pub fn set_page_index(&mut self, page_index: u32) -> bool {
        if page_index == self.page_index {
            return false;
        }
        tracing::debug!(page_index, "Page changed");
        self.page_index = page_index;
        true
    }

    /// Variables for the list query
    pub fn variables(&self) -> ListVariables {
        ListVariables::new(
            self.page_size,
            self.page_index,
            self.sort_field,
            self.sort_direction,
            &self.filter_text,
        )
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let params = QueryParams::default();
        assert_eq!(params.sort_field(), SortField::Name);
        assert_eq!(params.sort_direction(), SortDirection::Ascending);
        assert_eq!(params.filter_text(), "");
        assert_eq!(params.skip(), 0);
    }

    #[test]
    fn test_same_column_twice_from_default() {
        let mut params = QueryParams::default();

        params.set_sort(SortField::Name);
        assert_eq!(params.sort_direction(), SortDirection::Descending);

        params.set_sort(SortField::Name);
        assert_eq!(params.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_fresh_column_starts_descending() {
        let mut params = QueryParams::default();
        params.set_sort(SortField::Email);
        assert_eq!(params.sort_field(), SortField::Email);
        assert_eq!(params.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_filter_change_detection() {
        let mut params = QueryParams::default();
        assert!(params.set_filter_text("An"));
        assert!(!params.set_filter_text("An"));
        assert!(params.set_filter_text(""));
        assert!(params.variables().filter.is_empty());
    }

    #[test]
    fn test_page_index_drives_skip() {
        let mut params = QueryParams::new(20);
        assert!(params.set_page_index(2));
        assert_eq!(params.skip(), 40);
        let vars = params.variables();
        assert_eq!(vars.first, 20);
        assert_eq!(vars.offset, 40);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        assert_eq!(QueryParams::new(0).page_size(), 1);
    }

    fn any_field() -> impl Strategy<Value = SortField> {
        prop::sample::select(SortField::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_sort_toggle_policy(clicks in prop::collection::vec(any_field(), 1..40)) {
            let mut params = QueryParams::default();
            for field in clicks {
                let before_field = params.sort_field();
                let before_direction = params.sort_direction();
                params.set_sort(field);

                let expected = if field != before_field {
                    SortDirection::Descending
                } else {
                    before_direction.toggled()
                };
                prop_assert_eq!(params.sort_field(), field);
                prop_assert_eq!(params.sort_direction(), expected);
            }
        }

        #[test]
        fn prop_filter_maps_to_contains(text in ".{0,12}") {
            let mut params = QueryParams::default();
            params.set_filter_text(text.clone());
            let filter = params.variables().filter;
            if text.is_empty() {
                prop_assert!(filter.is_empty());
            } else {
                prop_assert_eq!(filter.name_contains, Some(text));
            }
        }
    }
}

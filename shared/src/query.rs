//! List query variables
//!
//! Wire shape of the paginated, sorted, filtered employee list query.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Sort direction as the endpoint spells it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sortable employee attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    #[default]
    Name,
    UserName,
    Email,
    Phone,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Id,
        SortField::Name,
        SortField::UserName,
        SortField::Email,
        SortField::Phone,
    ];

    /// Field name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::UserName => "user_name",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ParseError::SortField(s.to_string()))
    }
}

/// `where` argument of the list query
///
/// An empty filter serializes to `{}` and does not constrain the query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeFilter {
    #[serde(
        rename = "name_CONTAINS",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub name_contains: Option<String>,
}

impl EmployeeFilter {
    /// Build the filter from free text typed by the user
    pub fn from_text(text: &str) -> Self {
        Self {
            name_contains: (!text.is_empty()).then(|| text.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name_contains.is_none()
    }
}

/// Variables of `employeesPaginateQuery`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListVariables {
    /// Page size (`limit`)
    pub first: u32,
    /// Skip offset (`skip`)
    pub offset: u64,
    /// One `{field: direction}` entry
    #[serde(rename = "orderBy", default)]
    pub order_by: Vec<BTreeMap<SortField, SortDirection>>,
    #[serde(default)]
    pub filter: EmployeeFilter,
}

impl ListVariables {
    pub fn new(
        page_size: u32,
        page_index: u32,
        sort_field: SortField,
        sort_direction: SortDirection,
        filter_text: &str,
    ) -> Self {
        Self {
            first: page_size,
            offset: u64::from(page_index) * u64::from(page_size),
            order_by: vec![BTreeMap::from([(sort_field, sort_direction)])],
            filter: EmployeeFilter::from_text(filter_text),
        }
    }

    /// First sort key, if any
    pub fn sort(&self) -> Option<(SortField, SortDirection)> {
        self.order_by
            .first()
            .and_then(|m| m.iter().next())
            .map(|(f, d)| (*f, *d))
    }
}

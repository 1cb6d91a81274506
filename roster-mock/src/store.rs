//! In-memory employee store
//!
//! Mimics the graph backend closely enough for the list controller:
//! `name_CONTAINS` filtering (case-sensitive), single-key sorting,
//! skip/limit paging, merge-by-key and delete-by-key.

use shared::{
    EmployeeKey, EmployeeRecord, EmployeeUpsert, KeyScheme, ListVariables, SortDirection,
    SortField,
};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct EmployeeStore {
    scheme: KeyScheme,
    records: Vec<EmployeeRecord>,
}

impl EmployeeStore {
    pub fn new(scheme: KeyScheme) -> Self {
        Self {
            scheme,
            records: Vec::new(),
        }
    }

    /// Store pre-filled with a handful of employees
    pub fn seeded(scheme: KeyScheme) -> Self {
        let mut store = Self::new(scheme);
        let seed = [
            ("1", "Ann Lee", "ann1", Some("ann@example.com"), Some("555-0101")),
            ("2", "Bob Stone", "bob", Some("bob@example.com"), None),
            ("3", "Carla Diaz", "carla", None, Some("555-0103")),
            ("4", "Dmitri Antonov", "dmitri", Some("dmitri@example.com"), None),
        ];
        for (id, name, user_name, email, phone) in seed {
            store.merge(EmployeeUpsert {
                id: (scheme == KeyScheme::Id).then(|| id.to_string()),
                name: name.to_string(),
                user_name: user_name.to_string(),
                email: email.map(str::to_string),
                phone: phone.map(str::to_string),
            });
        }
        store
    }

    pub fn scheme(&self) -> KeyScheme {
        self.scheme
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &EmployeeKey) -> Option<&EmployeeRecord> {
        self.position(key).map(|i| &self.records[i])
    }

    fn position(&self, key: &EmployeeKey) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.key(self.scheme).as_ref() == Some(key))
    }

    /// One page of records for the list query
    pub fn list(&self, variables: &ListVariables) -> Vec<EmployeeRecord> {
        let mut rows: Vec<&EmployeeRecord> = self
            .records
            .iter()
            .filter(|r| match &variables.filter.name_contains {
                Some(needle) => r.name.contains(needle.as_str()),
                None => true,
            })
            .collect();

        if let Some((field, direction)) = variables.sort() {
            rows.sort_by(|a, b| {
                let ord = compare(a, b, field);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let skip = usize::try_from(variables.offset).unwrap_or(usize::MAX);
        rows.into_iter()
            .skip(skip)
            .take(variables.first as usize)
            .cloned()
            .collect()
    }

    /// Insert or update by key; returns the stored record
    ///
    /// Callers validate first. A payload without a key under the store's
    /// scheme is inserted as a new record.
    pub fn merge(&mut self, fields: EmployeeUpsert) -> EmployeeRecord {
        let mut record = fields.into_record();
        if self.scheme == KeyScheme::UserName {
            record.id = None;
        }

        match record.key(self.scheme).and_then(|k| self.position(&k)) {
            Some(i) => self.records[i] = record.clone(),
            None => self.records.push(record.clone()),
        }
        record
    }

    /// Remove by key; `false` when nothing matched
    pub fn delete(&mut self, key: &EmployeeKey) -> bool {
        match self.position(key) {
            Some(i) => {
                self.records.remove(i);
                true
            }
            None => false,
        }
    }
}

fn compare(a: &EmployeeRecord, b: &EmployeeRecord, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::UserName => a.user_name.cmp(&b.user_name),
        SortField::Email => a.email.cmp(&b.email),
        SortField::Phone => a.phone.cmp(&b.phone),
    }
}

//! Per-resource query metadata tables.

use crate::value::FieldKind;
use std::collections::BTreeMap;

///
/// FilterDef
///
/// One declared filter key: the canonical request key, its coercion kind,
/// and the domain query method it maps to.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterDef {
    pub key: &'static str,
    pub kind: FieldKind,
    pub method: &'static str,
}

///
/// ResourceQueryMetadata
///
/// Static description of one resource type: the ordered filter table
/// (declaration order is invocation order), the sort-key map, and the
/// resource's capability flags.
///
/// Built once at process start, read-only afterwards; safe to share
/// across arbitrarily many concurrent resolutions without locking.
///
#[derive(Clone, Debug)]
pub struct ResourceQueryMetadata {
    resource: &'static str,
    filters: Vec<FilterDef>,
    sort_keys: BTreeMap<&'static str, &'static str>,
    supports_or_queries: bool,
    supports_variables: bool,
}

impl ResourceQueryMetadata {
    #[must_use]
    pub const fn new(resource: &'static str) -> Self {
        Self {
            resource,
            filters: Vec::new(),
            sort_keys: BTreeMap::new(),
            supports_or_queries: false,
            supports_variables: false,
        }
    }

    /// Declare a filter key. Declaration order is the invocation order the
    /// dispatcher guarantees, independent of request key order.
    #[must_use]
    pub fn filter(mut self, key: &'static str, kind: FieldKind, method: &'static str) -> Self {
        self.filters.push(FilterDef { key, kind, method });
        self
    }

    /// Declare a sort key and the order method it starts.
    #[must_use]
    pub fn sort_key(mut self, key: &'static str, method: &'static str) -> Self {
        self.sort_keys.insert(key, method);
        self
    }

    #[must_use]
    pub const fn with_or_queries(mut self) -> Self {
        self.supports_or_queries = true;
        self
    }

    #[must_use]
    pub const fn with_variables(mut self) -> Self {
        self.supports_variables = true;
        self
    }

    #[must_use]
    pub const fn resource(&self) -> &'static str {
        self.resource
    }

    #[must_use]
    pub fn filters(&self) -> &[FilterDef] {
        &self.filters
    }

    #[must_use]
    pub fn sort_method(&self, key: &str) -> Option<&'static str> {
        self.sort_keys.get(key).copied()
    }

    #[must_use]
    pub const fn supports_or_queries(&self) -> bool {
        self.supports_or_queries
    }

    #[must_use]
    pub const fn supports_variables(&self) -> bool {
        self.supports_variables
    }
}

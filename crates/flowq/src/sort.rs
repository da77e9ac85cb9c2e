//! Sort specification resolution.

use crate::metadata::ResourceQueryMetadata;
use thiserror::Error as ThisError;

///
/// SortDirection
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        match token {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

///
/// SortCriterion
///
/// Raw `{sortBy, sortOrder}` pair exactly as received; meaningful only
/// relative to a resource metadata table.
///
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortCriterion {
    pub sort_by: String,
    pub sort_order: String,
}

impl SortCriterion {
    #[must_use]
    pub fn new(sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        Self {
            sort_by: sort_by.into(),
            sort_order: sort_order.into(),
        }
    }
}

///
/// SortCall
///
/// Resolved ordering step: the order method to start, then its direction.
/// The orchestrator must emit both calls for step *i* before touching
/// step *i+1*; the domain object binds each direction to the immediately
/// preceding order call.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortCall {
    pub method: &'static str,
    pub direction: SortDirection,
}

///
/// SortRequest
///
/// Sort portion of a request: at most one single pair (the query-parameter
/// form) plus an ordered multi-criterion list (the JSON `sorting` form).
///
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SortRequest {
    pub(crate) sort_by: Option<String>,
    pub(crate) sort_order: Option<String>,
    pub(crate) criteria: Vec<SortCriterion>,
}

impl SortRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort_by.is_none() && self.sort_order.is_none() && self.criteria.is_empty()
    }

    /// Resolve into ordered sort calls against `metadata`.
    ///
    /// All-or-nothing: any invalid criterion aborts the whole resolution,
    /// so a partial sort is never applied.
    pub fn resolve(&self, metadata: &ResourceQueryMetadata) -> Result<Vec<SortCall>, SortError> {
        let mut calls = Vec::new();

        match (&self.sort_by, &self.sort_order) {
            (None, None) => {}
            (Some(sort_by), Some(sort_order)) => {
                calls.push(resolve_criterion(sort_by, sort_order, metadata)?);
            }
            _ => return Err(SortError::Incomplete),
        }

        for criterion in &self.criteria {
            calls.push(resolve_criterion(
                &criterion.sort_by,
                &criterion.sort_order,
                metadata,
            )?);
        }

        Ok(calls)
    }
}

fn resolve_criterion(
    sort_by: &str,
    sort_order: &str,
    metadata: &ResourceQueryMetadata,
) -> Result<SortCall, SortError> {
    let method = metadata
        .sort_method(sort_by)
        .ok_or_else(|| SortError::UnknownSortKey {
            key: sort_by.to_string(),
        })?;
    let direction =
        SortDirection::from_token(sort_order).ok_or_else(|| SortError::UnknownSortDirection {
            token: sort_order.to_string(),
        })?;

    Ok(SortCall { method, direction })
}

///
/// SortError
///
#[derive(Debug, ThisError)]
pub enum SortError {
    #[error("Only a single sorting parameter specified. sortBy and sortOrder required")]
    Incomplete,

    #[error("Cannot set query parameter 'sortBy' to value '{key}'")]
    UnknownSortKey { key: String },

    #[error("Cannot set query parameter 'sortOrder' to value '{token}'")]
    UnknownSortDirection { token: String },
}

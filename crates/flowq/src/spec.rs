//! Canonical query specification and its request-shaped constructors.

use crate::expr::{ExprError, VariableFilter};
use crate::sort::{SortCriterion, SortError, SortRequest};
use crate::value::{RawValue, VarValue};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

const PARAM_SORT_BY: &str = "sortBy";
const PARAM_SORT_ORDER: &str = "sortOrder";
const PARAM_SORTING: &str = "sorting";
const PARAM_FIRST_RESULT: &str = "firstResult";
const PARAM_MAX_RESULTS: &str = "maxResults";
const PARAM_VARIABLES: &str = "variables";
const PARAM_OR_QUERIES: &str = "orQueries";
const PARAM_VARIABLE_NAMES_IGNORE_CASE: &str = "variableNamesIgnoreCase";
const PARAM_VARIABLE_VALUES_IGNORE_CASE: &str = "variableValuesIgnoreCase";

///
/// Pagination
///
/// Offset/limit window. Both halves default independently at execution
/// time: `firstResult` to 0, `maxResults` to unbounded (`i32::MAX`).
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pagination {
    pub first_result: Option<i32>,
    pub max_results: Option<i32>,
}

impl Pagination {
    #[must_use]
    pub const fn first(&self) -> i32 {
        match self.first_result {
            Some(first) => first,
            None => 0,
        }
    }

    #[must_use]
    pub const fn max(&self) -> i32 {
        match self.max_results {
            Some(max) => max,
            None => i32::MAX,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_result.is_none() && self.max_results.is_none()
    }
}

///
/// QuerySpec
///
/// Canonical, resource-agnostic query container. Built once per request,
/// immutable afterwards, never shared across requests. Which filter keys
/// mean anything is decided later, against a resource metadata table.
///
#[derive(Clone, Debug, Default)]
pub struct QuerySpec {
    pub(crate) filters: BTreeMap<String, RawValue>,
    pub(crate) variables: Vec<VariableFilter>,
    pub(crate) variable_names_ignore_case: bool,
    pub(crate) variable_values_ignore_case: bool,
    pub(crate) sort: SortRequest,
    pub(crate) pagination: Pagination,
    pub(crate) or_specs: Vec<QuerySpec>,
}

impl QuerySpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from URL query parameters.
    ///
    /// Reserved keys (`sortBy`, `sortOrder`, `firstResult`, `maxResults`,
    /// `variables`, the ignore-case toggles) are pulled out; every other
    /// key lands in the filter map untouched.
    pub fn from_query_params<'a, I>(params: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut spec = Self::default();

        for (key, value) in params {
            match key {
                PARAM_SORT_BY => spec.sort.sort_by = Some(value.to_string()),
                PARAM_SORT_ORDER => spec.sort.sort_order = Some(value.to_string()),
                PARAM_FIRST_RESULT => {
                    spec.pagination.first_result = Some(parse_bound(key, value)?);
                }
                PARAM_MAX_RESULTS => {
                    spec.pagination.max_results = Some(parse_bound(key, value)?);
                }
                PARAM_VARIABLES => {
                    spec.variables.extend(VariableFilter::parse_list(value)?);
                }
                PARAM_VARIABLE_NAMES_IGNORE_CASE => {
                    spec.variable_names_ignore_case = value == "true";
                }
                PARAM_VARIABLE_VALUES_IGNORE_CASE => {
                    spec.variable_values_ignore_case = value == "true";
                }
                _ => {
                    spec.filters
                        .insert(key.to_string(), RawValue::Text(value.to_string()));
                }
            }
        }

        Ok(spec)
    }

    /// Build from a JSON request body.
    ///
    /// Mirrors the query-parameter vocabulary, additionally accepting the
    /// multi-criterion `sorting` list, structured `variables` triples, and
    /// one level of `orQueries` sub-specifications.
    pub fn from_json(body: &Json) -> Result<Self, SpecError> {
        let object = body.as_object().ok_or(SpecError::NotAnObject)?;
        Self::from_object(object)
    }

    fn from_object(object: &Map<String, Json>) -> Result<Self, SpecError> {
        let mut spec = Self::default();

        for (key, value) in object {
            // A null value means the key was not supplied.
            if value.is_null() {
                continue;
            }
            match key.as_str() {
                PARAM_SORT_BY => spec.sort.sort_by = Some(json_string(key, value)?),
                PARAM_SORT_ORDER => spec.sort.sort_order = Some(json_string(key, value)?),
                PARAM_SORTING => {
                    for entry in json_array(key, value)? {
                        spec.sort.criteria.push(sort_criterion(entry)?);
                    }
                }
                PARAM_FIRST_RESULT => {
                    spec.pagination.first_result = Some(json_bound(key, value)?);
                }
                PARAM_MAX_RESULTS => {
                    spec.pagination.max_results = Some(json_bound(key, value)?);
                }
                PARAM_VARIABLES => {
                    for entry in json_array(key, value)? {
                        spec.variables.push(variable_triple(entry)?);
                    }
                }
                PARAM_OR_QUERIES => {
                    for entry in json_array(key, value)? {
                        let sub = entry
                            .as_object()
                            .ok_or_else(|| SpecError::invalid(key, entry))?;
                        spec.or_specs.push(Self::from_object(sub)?);
                    }
                }
                PARAM_VARIABLE_NAMES_IGNORE_CASE => {
                    spec.variable_names_ignore_case = value.as_bool() == Some(true);
                }
                PARAM_VARIABLE_VALUES_IGNORE_CASE => {
                    spec.variable_values_ignore_case = value.as_bool() == Some(true);
                }
                _ => {
                    let raw = serde_json::from_value::<RawValue>(value.clone())
                        .map_err(|_| SpecError::invalid(key, value))?;
                    spec.filters.insert(key.clone(), raw);
                }
            }
        }

        Ok(spec)
    }

    // --- fluent construction (callers and tests) ---

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn variable(mut self, variable: VariableFilter) -> Self {
        self.variables.push(variable);
        self
    }

    #[must_use]
    pub fn sorted_by(mut self, sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        self.sort.sort_by = Some(sort_by.into());
        self.sort.sort_order = Some(sort_order.into());
        self
    }

    #[must_use]
    pub fn sorting(mut self, criteria: Vec<SortCriterion>) -> Self {
        self.sort.criteria = criteria;
        self
    }

    #[must_use]
    pub const fn first_result(mut self, first_result: i32) -> Self {
        self.pagination.first_result = Some(first_result);
        self
    }

    #[must_use]
    pub const fn max_results(mut self, max_results: i32) -> Self {
        self.pagination.max_results = Some(max_results);
        self
    }

    #[must_use]
    pub fn or_query(mut self, sub: Self) -> Self {
        self.or_specs.push(sub);
        self
    }

    #[must_use]
    pub const fn names_ignore_case(mut self) -> Self {
        self.variable_names_ignore_case = true;
        self
    }

    #[must_use]
    pub const fn values_ignore_case(mut self) -> Self {
        self.variable_values_ignore_case = true;
        self
    }

    // --- accessors ---

    #[must_use]
    pub fn variables(&self) -> &[VariableFilter] {
        &self.variables
    }

    #[must_use]
    pub const fn sort(&self) -> &SortRequest {
        &self.sort
    }

    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    #[must_use]
    pub fn or_specs(&self) -> &[Self] {
        &self.or_specs
    }
}

fn parse_bound(key: &str, value: &str) -> Result<i32, SpecError> {
    value
        .parse::<i32>()
        .ok()
        .filter(|bound| *bound >= 0)
        .ok_or_else(|| SpecError::InvalidParameter {
            key: key.to_string(),
            value: value.to_string(),
        })
}

fn json_bound(key: &str, value: &Json) -> Result<i32, SpecError> {
    value
        .as_i64()
        .and_then(|bound| i32::try_from(bound).ok())
        .filter(|bound| *bound >= 0)
        .ok_or_else(|| SpecError::invalid(key, value))
}

fn json_string(key: &str, value: &Json) -> Result<String, SpecError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SpecError::invalid(key, value))
}

fn json_array<'a>(key: &str, value: &'a Json) -> Result<&'a [Json], SpecError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| SpecError::invalid(key, value))
}

fn sort_criterion(entry: &Json) -> Result<SortCriterion, SpecError> {
    let sort_by = entry.get(PARAM_SORT_BY).and_then(Json::as_str);
    let sort_order = entry.get(PARAM_SORT_ORDER).and_then(Json::as_str);
    match (sort_by, sort_order) {
        (Some(sort_by), Some(sort_order)) => Ok(SortCriterion::new(sort_by, sort_order)),
        _ => Err(SortError::Incomplete.into()),
    }
}

fn variable_triple(entry: &Json) -> Result<VariableFilter, SpecError> {
    let name = entry
        .get("name")
        .and_then(Json::as_str)
        .unwrap_or_default();
    let operator = entry
        .get("operator")
        .and_then(Json::as_str)
        .ok_or(ExprError::Malformed)?;
    let value = entry
        .get("value")
        .map_or(Ok(VarValue::Null), |value| {
            serde_json::from_value::<VarValue>(value.clone())
        })
        .map_err(|_| ExprError::Malformed)?;

    Ok(VariableFilter::from_triple(name, operator, value)?)
}

///
/// SpecError
///
/// Construction-time failures. Everything maps to a caller-side bad
/// request; nothing here is fatal.
///
#[derive(Debug, ThisError)]
pub enum SpecError {
    #[error("query specification must be a JSON object")]
    NotAnObject,

    #[error("Cannot set query parameter '{key}' to value '{value}'")]
    InvalidParameter { key: String, value: String },

    #[error("{0}")]
    Expr(#[from] ExprError),

    #[error("{0}")]
    Sort(#[from] SortError),
}

impl SpecError {
    fn invalid(key: &str, value: &Json) -> Self {
        let value = match value {
            Json::String(s) => s.clone(),
            other => other.to_string(),
        };
        Self::InvalidParameter {
            key: key.to_string(),
            value,
        }
    }
}

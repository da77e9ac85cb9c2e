//! Filter dispatch against a domain query object.

use crate::domain::DomainQuery;
use crate::metadata::ResourceQueryMetadata;
use crate::spec::QuerySpec;
use crate::value::{self, CoercionError};
use thiserror::Error as ThisError;

/// Apply `spec`'s filters to `query`, in metadata-declared order.
///
/// CONTRACT: the call sequence depends only on the metadata table, never
/// on the order keys appeared in the request. Request keys absent from
/// the table are skipped silently; unknown sort keys and operators, by
/// contrast, fail hard elsewhere. Fail-fast: the first coercion error
/// aborts with no further calls.
pub fn dispatch_filters<Q: DomainQuery>(
    spec: &QuerySpec,
    metadata: &ResourceQueryMetadata,
    query: &mut Q,
) -> Result<(), DispatchError> {
    for def in metadata.filters() {
        let Some(raw) = spec.filters.get(def.key) else {
            continue;
        };
        if let Some(coerced) = value::coerce(def.key, raw, def.kind)? {
            query.filter(def.method, coerced);
        }
    }

    if !spec.variables().is_empty() {
        if !metadata.supports_variables() {
            return Err(DispatchError::UnsupportedOperation {
                resource: metadata.resource(),
                operation: "variable filters",
            });
        }

        // A bare value (no variable name) is allowed at most once.
        let bare = spec
            .variables()
            .iter()
            .filter(|variable| variable.name().is_empty())
            .count();
        if bare > 1 {
            return Err(DispatchError::AmbiguousVariableValue);
        }

        for variable in spec.variables() {
            query.variable(variable.op(), variable.name(), variable.value().clone());
        }
    }

    // Toggles are global to the query, issued once after all expressions.
    if spec.variable_names_ignore_case {
        query.variable_names_ignore_case();
    }
    if spec.variable_values_ignore_case {
        query.variable_values_ignore_case();
    }

    Ok(())
}

///
/// DispatchError
///
#[derive(Debug, ThisError)]
pub enum DispatchError {
    #[error("{0}")]
    Coercion(#[from] CoercionError),

    #[error("the {resource} resource does not support {operation}")]
    UnsupportedOperation {
        resource: &'static str,
        operation: &'static str,
    },

    #[error("only a single variable value parameter may be specified without a variable name")]
    AmbiguousVariableValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{CompareOp, VariableFilter};
    use crate::test_support::{Call, RecordingQuery};
    use crate::value::{FieldKind, FilterValue, VarValue};

    fn metadata() -> ResourceQueryMetadata {
        ResourceQueryMetadata::new("task")
            .with_variables()
            .filter("processInstanceId", FieldKind::Text, "processInstanceId")
            .filter("taskName", FieldKind::Text, "taskName")
            .filter("activityIdIn", FieldKind::TextList, "activityIdIn")
            .filter("unassigned", FieldKind::Flag, "withoutAssignee")
    }

    fn filter_call(method: &str, value: &str) -> Call {
        Call::Filter {
            method: method.to_string(),
            value: FilterValue::Text(value.to_string()),
        }
    }

    #[test]
    fn call_order_follows_metadata_not_request() {
        // Request order deliberately reversed relative to the table.
        let spec = QuerySpec::new()
            .filter("taskName", "review")
            .filter("processInstanceId", "pi-1");
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");

        assert_eq!(
            query.calls,
            [
                filter_call("processInstanceId", "pi-1"),
                filter_call("taskName", "review"),
            ]
        );
    }

    #[test]
    fn unknown_request_keys_are_skipped() {
        let spec = QuerySpec::new()
            .filter("notAKey", "whatever")
            .filter("taskName", "review");
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");

        assert_eq!(query.calls, [filter_call("taskName", "review")]);
    }

    #[test]
    fn list_filters_are_invoked_once_with_the_whole_sequence() {
        let spec = QuerySpec::new().filter("activityIdIn", vec!["a", "b"]);
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");

        assert_eq!(
            query.calls,
            [Call::Filter {
                method: "activityIdIn".to_string(),
                value: FilterValue::TextList(vec!["a".to_string(), "b".to_string()]),
            }]
        );
    }

    #[test]
    fn false_flags_produce_no_call() {
        let spec = QuerySpec::new().filter("unassigned", false);
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");
        assert!(query.calls.is_empty());

        let spec = QuerySpec::new().filter("unassigned", true);
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");
        assert_eq!(
            query.calls,
            [Call::Filter {
                method: "withoutAssignee".to_string(),
                value: FilterValue::Flag,
            }]
        );
    }

    #[test]
    fn variables_come_last_with_toggles_after() {
        let spec = QuerySpec::new()
            .variable(VariableFilter::new(
                "age",
                CompareOp::Gt,
                VarValue::Text("30".to_string()),
            ))
            .filter("taskName", "review")
            .names_ignore_case();
        let mut query = RecordingQuery::new();
        dispatch_filters(&spec, &metadata(), &mut query).expect("dispatch should succeed");

        assert_eq!(
            query.calls,
            [
                filter_call("taskName", "review"),
                Call::Variable {
                    op: CompareOp::Gt,
                    name: "age".to_string(),
                    value: VarValue::Text("30".to_string()),
                },
                Call::VariableNamesIgnoreCase,
            ]
        );
    }

    #[test]
    fn variables_need_the_capability() {
        let plain = ResourceQueryMetadata::new("deployment");
        let spec = QuerySpec::new().variable(VariableFilter::new(
            "age",
            CompareOp::Eq,
            VarValue::Int(30),
        ));
        let mut query = RecordingQuery::new();
        let err = dispatch_filters(&spec, &plain, &mut query).expect_err("dispatch should fail");

        assert!(matches!(err, DispatchError::UnsupportedOperation { .. }));
        assert!(query.calls.is_empty());
    }

    #[test]
    fn two_bare_values_are_ambiguous() {
        let spec = QuerySpec::new()
            .variable(VariableFilter::new("", CompareOp::Eq, VarValue::Int(1)))
            .variable(VariableFilter::new("", CompareOp::Eq, VarValue::Int(2)));
        let mut query = RecordingQuery::new();
        let err = dispatch_filters(&spec, &metadata(), &mut query).expect_err("dispatch should fail");

        assert!(matches!(err, DispatchError::AmbiguousVariableValue));
        assert!(query.calls.is_empty());
    }

    #[test]
    fn coercion_failure_stops_mid_sequence() {
        let table = ResourceQueryMetadata::new("job")
            .filter("jobId", FieldKind::Text, "jobId")
            .filter("dueDate", FieldKind::Date, "duedateLowerThan")
            .filter("retries", FieldKind::Int, "withRetriesLeft");
        let spec = QuerySpec::new()
            .filter("jobId", "j-1")
            .filter("dueDate", "notDate")
            .filter("retries", "3");
        let mut query = RecordingQuery::new();
        let err = dispatch_filters(&spec, &table, &mut query).expect_err("dispatch should fail");

        assert_eq!(
            err.to_string(),
            "Cannot set query parameter 'dueDate' to value 'notDate'"
        );
        // The earlier filter already ran; the later one must not.
        assert_eq!(query.calls, [filter_call("jobId", "j-1")]);
    }
}

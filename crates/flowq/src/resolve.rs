//! The resolution engine: one entry point composing sort resolution,
//! filter dispatch, or-composition, and execution.

use crate::compose::{ComposeError, compose_or};
use crate::dispatch::{DispatchError, dispatch_filters};
use crate::domain::{DomainQuery, ExecutionMode, QueryOutcome};
use crate::metadata::ResourceQueryMetadata;
use crate::sort::{SortDirection, SortError};
use crate::spec::{QuerySpec, SpecError};
use crate::trace::{ResolveTraceEvent, ResolveTraceSink, emit};
use thiserror::Error as ThisError;

/// Resolve `spec` against `metadata` and execute in `mode`.
///
/// Fail-fast: the first error in phase order (sort resolution, filter
/// dispatch, or-composition) aborts the resolution; a failed sort
/// resolution means the factory is never invoked and the query object
/// receives no call at all.
pub fn resolve<Q, F>(
    spec: &QuerySpec,
    metadata: &ResourceQueryMetadata,
    factory: F,
    mode: ExecutionMode,
) -> Result<QueryOutcome<Q::Rows>, ResolveError>
where
    Q: DomainQuery,
    F: FnMut() -> Q,
{
    resolve_with_trace(spec, metadata, factory, mode, None)
}

/// [`resolve`], reporting phase events to an optional trace sink.
pub fn resolve_with_trace<Q, F>(
    spec: &QuerySpec,
    metadata: &ResourceQueryMetadata,
    mut factory: F,
    mode: ExecutionMode,
    sink: Option<&dyn ResolveTraceSink>,
) -> Result<QueryOutcome<Q::Rows>, ResolveError>
where
    Q: DomainQuery,
    F: FnMut() -> Q,
{
    // Sorts are resolved before the first domain-object call so an
    // invalid sort never leaves a partially filtered query behind.
    let sort_calls = spec.sort().resolve(metadata)?;
    emit(
        sink,
        ResolveTraceEvent::SortResolved {
            calls: sort_calls.len(),
        },
    );

    let mut query = factory();
    dispatch_filters(spec, metadata, &mut query)?;
    emit(sink, ResolveTraceEvent::FiltersDispatched);

    compose_or(spec, metadata, &mut factory, &mut query)?;
    emit(
        sink,
        ResolveTraceEvent::OrComposed {
            branches: spec.or_specs().len(),
        },
    );

    // Interleaved per criterion: order method, then its direction. The
    // domain object binds each direction to the preceding order call, so
    // batching would change meaning.
    for call in &sort_calls {
        query.order_by(call.method);
        match call.direction {
            SortDirection::Asc => query.asc(),
            SortDirection::Desc => query.desc(),
        }
    }

    let outcome = match mode {
        ExecutionMode::List => QueryOutcome::Rows(query.list()),
        ExecutionMode::Count => QueryOutcome::Count(query.count()),
        ExecutionMode::Page => {
            let pagination = spec.pagination();
            QueryOutcome::Rows(query.list_page(pagination.first(), pagination.max()))
        }
    };
    emit(sink, ResolveTraceEvent::Executed { mode });

    Ok(outcome)
}

///
/// ResolveError
///
/// Union of every phase failure. All of these map to a caller-side bad
/// request; none are fatal.
///
#[derive(Debug, ThisError)]
pub enum ResolveError {
    #[error("{0}")]
    Spec(#[from] SpecError),

    #[error("{0}")]
    Sort(#[from] SortError),

    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    #[error("{0}")]
    Compose(#[from] ComposeError),
}

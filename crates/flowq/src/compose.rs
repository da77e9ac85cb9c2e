//! OR sub-query composition.

use crate::dispatch::{DispatchError, dispatch_filters};
use crate::domain::DomainQuery;
use crate::metadata::ResourceQueryMetadata;
use crate::spec::QuerySpec;
use thiserror::Error as ThisError;

/// Resolve `spec`'s OR sub-specifications and merge each into `parent`.
///
/// Every sub-specification gets a fresh query object from `factory`,
/// receives its filters (only — sub-specs carry no sort or pagination of
/// their own), and is merged in declaration order. Nesting stops at one
/// level.
pub fn compose_or<Q, F>(
    spec: &QuerySpec,
    metadata: &ResourceQueryMetadata,
    factory: &mut F,
    parent: &mut Q,
) -> Result<(), ComposeError>
where
    Q: DomainQuery,
    F: FnMut() -> Q,
{
    if spec.or_specs().is_empty() {
        return Ok(());
    }
    if !metadata.supports_or_queries() {
        return Err(ComposeError::Unsupported {
            resource: metadata.resource(),
        });
    }

    for sub in spec.or_specs() {
        if !sub.or_specs().is_empty() {
            return Err(ComposeError::Nested);
        }
        if !sub.sort().is_empty() || !sub.pagination().is_empty() {
            return Err(ComposeError::SubSpecScope);
        }

        let mut branch = factory();
        dispatch_filters(sub, metadata, &mut branch)?;
        parent.add_or_query(branch);
    }

    Ok(())
}

///
/// ComposeError
///
#[derive(Debug, ThisError)]
pub enum ComposeError {
    #[error("the {resource} resource does not support or-queries")]
    Unsupported { resource: &'static str },

    #[error("or-query sub-specifications cannot nest further or-queries")]
    Nested,

    #[error("or-query sub-specifications cannot carry sorting or pagination")]
    SubSpecScope,

    #[error("{0}")]
    Dispatch(#[from] DispatchError),
}

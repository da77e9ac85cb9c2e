//! Generic query-specification resolution for REST query layers in front of
//! a workflow/process-history engine.
//!
//! Raw request input (URL query parameters or a JSON body) becomes a
//! canonical [`spec::QuerySpec`]; a per-resource
//! [`metadata::ResourceQueryMetadata`] table then drives a deterministic,
//! ordered sequence of calls against a caller-supplied
//! [`domain::DomainQuery`] capability object.
#![warn(unreachable_pub)]

pub mod compose;
pub mod dispatch;
pub mod domain;
pub mod expr;
pub mod metadata;
pub mod resolve;
pub mod sort;
pub mod spec;
pub mod trace;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// Errors, the dispatcher internals, and trace types are not re-exported.
///

pub mod prelude {
    pub use crate::{
        domain::{DomainQuery, ExecutionMode, QueryOutcome},
        expr::{CompareOp, VariableFilter},
        metadata::{FilterDef, ResourceQueryMetadata},
        resolve::resolve,
        sort::SortDirection,
        spec::QuerySpec,
        value::{FieldKind, FilterValue, RawValue, VarValue},
    };
}

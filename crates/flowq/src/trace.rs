//! Resolution tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect
//! resolution semantics.

use crate::domain::ExecutionMode;

///
/// ResolveTraceSink
///

pub trait ResolveTraceSink: Send + Sync {
    fn on_event(&self, event: ResolveTraceEvent);
}

///
/// ResolveTraceEvent
///
/// One phase of a resolution, in the order phases run.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolveTraceEvent {
    SortResolved { calls: usize },
    FiltersDispatched,
    OrComposed { branches: usize },
    Executed { mode: ExecutionMode },
}

pub(crate) fn emit(sink: Option<&dyn ResolveTraceSink>, event: ResolveTraceEvent) {
    if let Some(sink) = sink {
        sink.on_event(event);
    }
}

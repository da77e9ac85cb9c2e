//! Domain query object capability interface and execution modes.

use crate::expr::CompareOp;
use crate::value::{FilterValue, VarValue};

///
/// DomainQuery
///
/// Capability interface of the external process/history engine's query
/// object. The engine invokes it for side effects only: it never retains
/// return values, never chains, and never inspects internal state.
///
/// Callers supply one implementation per resource plus a factory able to
/// produce fresh instances (or-query branches each get their own).
///
pub trait DomainQuery {
    /// Row set produced by `list`/`list_page`.
    type Rows;

    /// Invoke the filter method named by the metadata table.
    fn filter(&mut self, method: &str, value: FilterValue);

    /// Invoke the variable comparison matching `op` for a named variable.
    fn variable(&mut self, op: CompareOp, name: &str, value: VarValue);

    /// Toggle case-insensitive variable-name matching for the whole query.
    fn variable_names_ignore_case(&mut self);

    /// Toggle case-insensitive variable-value matching for the whole query.
    fn variable_values_ignore_case(&mut self);

    /// Start an ordering step; the next direction call binds to it.
    fn order_by(&mut self, method: &str);

    fn asc(&mut self);

    fn desc(&mut self);

    /// Merge an alternative filter set with logical OR.
    fn add_or_query(&mut self, sub: Self)
    where
        Self: Sized;

    fn list(&mut self) -> Self::Rows;

    fn count(&mut self) -> u64;

    fn list_page(&mut self, first_result: i32, max_results: i32) -> Self::Rows;
}

///
/// ExecutionMode
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExecutionMode {
    List,
    Count,
    Page,
}

///
/// QueryOutcome
///
/// Whatever execution produced, passed through unmodified.
///
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome<R> {
    Rows(R),
    Count(u64),
}

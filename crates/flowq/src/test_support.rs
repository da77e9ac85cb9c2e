//! Recording domain query object for call-sequence assertions.

use crate::domain::DomainQuery;
use crate::expr::CompareOp;
use crate::value::{FilterValue, VarValue};
use std::cell::Cell;
use std::rc::Rc;

///
/// Call
///
/// One recorded invocation. Or-query branches nest their own sequence.
///
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Filter { method: String, value: FilterValue },
    Variable { op: CompareOp, name: String, value: VarValue },
    VariableNamesIgnoreCase,
    VariableValuesIgnoreCase,
    OrderBy { method: String },
    Asc,
    Desc,
    AddOrQuery { calls: Vec<Call> },
    List,
    Count,
    ListPage { first: i32, max: i32 },
}

///
/// RecordingQuery
///
/// `list`/`list_page` return the full recorded sequence (terminal call
/// included), so tests can assert on the outcome alone even though the
/// engine consumes the query object.
///
#[derive(Debug, Default)]
pub(crate) struct RecordingQuery {
    pub(crate) calls: Vec<Call>,
}

impl RecordingQuery {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Factory closure handing out fresh recorders, counting allocations.
    pub(crate) fn counted_factory() -> (Rc<Cell<usize>>, impl FnMut() -> Self) {
        let made = Rc::new(Cell::new(0));
        let handle = Rc::clone(&made);
        let factory = move || {
            handle.set(handle.get() + 1);
            Self::new()
        };
        (made, factory)
    }

    /// Factory closure handing out fresh recorders.
    pub(crate) fn new_factory() -> impl FnMut() -> Self {
        Self::new
    }
}

impl DomainQuery for RecordingQuery {
    type Rows = Vec<Call>;

    fn filter(&mut self, method: &str, value: FilterValue) {
        self.calls.push(Call::Filter {
            method: method.to_string(),
            value,
        });
    }

    fn variable(&mut self, op: CompareOp, name: &str, value: VarValue) {
        self.calls.push(Call::Variable {
            op,
            name: name.to_string(),
            value,
        });
    }

    fn variable_names_ignore_case(&mut self) {
        self.calls.push(Call::VariableNamesIgnoreCase);
    }

    fn variable_values_ignore_case(&mut self) {
        self.calls.push(Call::VariableValuesIgnoreCase);
    }

    fn order_by(&mut self, method: &str) {
        self.calls.push(Call::OrderBy {
            method: method.to_string(),
        });
    }

    fn asc(&mut self) {
        self.calls.push(Call::Asc);
    }

    fn desc(&mut self) {
        self.calls.push(Call::Desc);
    }

    fn add_or_query(&mut self, sub: Self) {
        self.calls.push(Call::AddOrQuery { calls: sub.calls });
    }

    fn list(&mut self) -> Self::Rows {
        self.calls.push(Call::List);
        self.calls.clone()
    }

    fn count(&mut self) -> u64 {
        self.calls.push(Call::Count);
        self.calls.len() as u64
    }

    fn list_page(&mut self, first_result: i32, max_results: i32) -> Self::Rows {
        self.calls.push(Call::ListPage {
            first: first_result,
            max: max_results,
        });
        self.calls.clone()
    }
}

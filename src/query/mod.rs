//! Client-side list transformations: filtering, sorting, lookup, pagination.
//!
//! Everything in this module is a pure function over an already-fetched
//! snapshot. The pipeline for a table view is always the same:
//! filter -> sort -> paginate.

pub mod filter;
pub mod lookup;
pub mod page;
pub mod sort;

pub use filter::{ExecutionFilter, WorkflowFilter};
pub use lookup::WorkflowNameIndex;
pub use page::{paginate, Page};
pub use sort::{sort_executions, sort_workflows, ExecutionSortField, SortOrder, WorkflowSortField};

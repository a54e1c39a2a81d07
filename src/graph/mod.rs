//! Graphs over tables.
//!
//! Both graphs key their vertices by [`TableKey`](crate::catalog::TableKey) and keep the
//! petgraph index private, so callers never hold references into the graph.
//!
//! * [`AccessGraph`] records which tables the workload touches together, with how much weight
//!   and through which columns.
//! * [`DependencyGraph`] is the foreign key graph, walked parent to child when building the
//!   table visit order.

mod access;
pub use access::*;
mod dependency;
pub use dependency::*;
mod walker;
pub use walker::*;

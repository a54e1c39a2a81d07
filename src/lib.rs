//! ## Background
//!
//! A partitioned OLTP database splits every table across partitions by the value of one column,
//! or replicates it on every partition, and routes every stored procedure invocation to a
//! partition by the value of one of its parameters. A good design makes most transactions
//! touch a single partition. Picking one is a search over every table's candidate columns and
//! every procedure's candidate parameters, and that space is combinatorial. A branch and bound
//! search [1] only stays tractable when it tries promising assignments first, because an early
//! good solution gives it a tight bound to prune with.
//!
//! ## Design
//!
//! This crate is the ordering engine in front of such a search. It does not decide a design;
//! it reads a snapshot of the schema, a recorded workload and its statistics, and produces
//! weighted visit orders and candidate sets:
//!
//! * procedures by invocation frequency,
//! * procedure parameters by the geometric mean of their correlation to partitioning columns,
//! * tables by a replication pre-pass followed by a breadth first walk of the foreign key
//!   graph, heaviest access graph edges first,
//! * columns by access weight scaled by foreign key fan-out, plus a replication placeholder,
//! * composite (two attribute) keys and vertical partitioning candidates.
//!
//! Schema objects are addressed by string keys and every graph is an adjacency structure over
//! keys, so nothing here holds references into the schema beyond one call. The only shared
//! mutable state is the [`catalog::CompositeRegistry`], which memoizes composite keys so that
//! the same pair always maps to the same composite.
//!
//! Invariant violations (a missing weight, an unknown key, a table without statistics) abort
//! the call with a [`error::DesignerError`]. Missing workload evidence never does: the
//! affected order falls back to a documented default and a warning is logged through [`log`].
//!
//! ## Reference
//!
//! 1. Pavlo, A., Curino, C. and Zdonik, S., 2012. Skew-aware automatic database partitioning in
//! shared-nothing, parallel OLTP systems. SIGMOD '12, pp.61-72.

#[macro_use]
extern crate prettytable;

pub mod catalog;
pub mod context;
pub mod correlation;
pub mod error;
pub mod graph;
pub mod hints;
pub mod partitioner;
pub mod stat;
pub mod workload;

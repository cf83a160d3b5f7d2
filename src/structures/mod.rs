//! The expression kernel: sorts, symbols, expressions, and the CNF translation.
//!
//! Symbols label expression nodes and carry the algebra: applying a symbol sort-checks the arguments and reduces the application at construction, so equal formulas intern to equal nodes.
//! Expressions are immutable DAG nodes with a pre-materialized negation and bottom-up traversals.

pub mod cnf;
pub mod expr;
pub mod sort;
pub mod symbol;

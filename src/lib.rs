/*!
An experimental SMT solver for a small subset of the SMT-LIB language.

stoat_smt supports the theories of booleans and linear integer arithmetic, where integer equality is recognised only as an uninterpreted relation.
A script of declarations, assertions, and queries is executed against an interpreter which accumulates the conjunction of asserted formulas, decides boolean satisfiability, produces a model for boolean variables, or emits a simplified conjunctive normal form of the current assertion.

# Orientation

The library is layered, leaves first:

- [Interning](crate::generic::interning), which secures global uniqueness of value-like objects (symbols, expressions, literals, clauses) keyed by structural identity.
  Equality of interned objects is identity, hashing is precomputed, and every interned object takes a place in a single total order.
- [Transactional memory](crate::transactional), a nestable, versioned overlay which lets scoped declarations mutate shared tables and be rolled back exactly.
- The [expression kernel](crate::structures), a hash-consed representation of many-sorted first-order terms.
  Algebraic simplification --- absorption, unit and zero elimination, double negation, associative-commutative flattening and cancellation --- is performed when a symbol is applied, so equal formulas intern to equal nodes.
- The [CNF translator](crate::structures::cnf), a Tseitin transformation which introduces fresh boolean variables for non-top-level connectives and emits clauses defining them.
- The [CDCL engine](crate::procedures::solve), a conflict-driven clause-learning decision procedure using two-watched-literal propagation, first-UIP conflict analysis, non-chronological backjumping, and learned clauses.
  The working parts live in the [database modules](crate::db): interned [literals](crate::db::literal) with trail metadata, [clauses](crate::db::clause) with watch pairs, and the [assignment trail](crate::db::trail).
- The [SMT-LIB front end](crate::smtlib): a scanner and recursive-descent parser with panic-mode recovery, a transactional symbol table, the interpreter, and a pretty printer for simplified formulas.

# Example

```rust
use stoat_smt::procedures::solve::Model;
use stoat_smt::reports::Report;
use stoat_smt::structures::symbol::{boolean_and, boolean_or, Symbol};
use stoat_smt::structures::sort::Sort;

let a = Symbol::variable(Sort::Bool).apply(&[]);
let b = Symbol::variable(Sort::Bool).apply(&[]);

// (a ∨ b) ∧ (¬a ∨ b) simplifies to b at construction, and b is satisfiable.
let formula = boolean_and(&[boolean_or(&[a.clone(), b.clone()]), boolean_or(&[a.negated(), b.clone()])]);
assert_eq!(formula, b);

let mut model = Model::new(&formula);
model.solve();
assert_eq!(model.report(), Some(Report::Satisfiable));
```

# Logs

Calls to [log!](log) are made at the points a solve or an interpretation changes direction, under the targets listed in [misc::log].
No log implementation is installed by the library; the CLI installs env_logger.
*/

#![allow(clippy::collapsible_else_if)]
#![allow(clippy::single_match)]
#![allow(mixed_script_confusables)]

pub mod generic;

pub mod transactional;

pub mod structures;

pub mod db;
pub mod procedures;
pub mod reports;

pub mod smtlib;

pub mod misc;

/*!
The Tseitin transformation.

[to_cnf] rewrites a boolean expression into a conjunction in which every connective argument is a literal: a variable or its negation.
For each subexpression headed by a connective --- other than the top node --- a fresh [Tseitin variable](crate::structures::symbol::SymbolKind::Tseitin) replaces the subexpression, and clauses defining the variable are conjoined:

- For `and`: the conjunction implies the variable, and the variable implies each argument.
- For `or`: the variable implies the disjunction, and each argument implies the variable.

Other symbol kinds are left in place; the input is expected to be propositional over them as atoms, so equalities become literal atoms.
The result is semantically equivalent to the input, as every introduced variable is definitionally equivalent to the subexpression it stands for.

Tseitin variables are not reused across solves: assertion sets are translated freshly on each query.
*/

use crate::misc::log::targets;
use crate::structures::expr::Expr;
use crate::structures::sort::Sort;
use crate::structures::symbol::{boolean_and, boolean_implies, boolean_or, Symbol, SymbolKind};

/// The conjunctive normal form of `expr`, with fresh variables for nested connectives.
pub fn to_cnf(expr: &Expr) -> Expr {
    debug_assert_eq!(expr.sort(), Sort::Bool);

    let top = expr.clone();
    let mut definitions: Vec<Expr> = Vec::new();

    let transformed = expr.bottom_up_transform(|e, children| {
        let rebuilt = e.symbol().apply(children);
        if let SymbolKind::Connective(neutral) = rebuilt.symbol().kind() {
            let neutral = *neutral;
            if *e != top {
                let fresh = Symbol::tseitin(&rebuilt).apply(&[]);
                log::trace!(target: targets::CNF, "Fresh variable for {rebuilt:?}.");
                if neutral {
                    definitions.push(boolean_implies(&boolean_and(children), &fresh));
                    for child in children {
                        definitions.push(boolean_implies(&fresh, child));
                    }
                } else {
                    definitions.push(boolean_implies(&fresh, &boolean_or(children)));
                    for child in children {
                        definitions.push(boolean_implies(child, &fresh));
                    }
                }
                return fresh;
            }
        }
        rebuilt
    });

    let mut clauses = vec![transformed];
    clauses.extend(definitions);
    boolean_and(&clauses)
}

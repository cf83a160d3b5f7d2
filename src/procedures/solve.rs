/*!
The CDCL solve.

A [Model] owns everything a solve needs: a solve-local [arena](Memory), the clauses of the translated formula, the [assignment trail](Assignment), and the learned clauses.

Construction translates the formula to [CNF](crate::structures::cnf), pulls the top-level conjunction apart into clauses --- wrapping a singleton when the top is not a conjunction --- and orders the trail by descending literal occurrence count, ties broken by first appearance.

The loop:

- Exhausts the [suspicious-clause iterator](Assignment::suspicious_clause).
  A unit clause queues its implication; a conflicting clause is [analyzed](Assignment::analyze_conflict), the learned clause recorded, and the trail rewound by a non-chronological backjump to the level the learned clause asserts at.
- A conflict at level zero is unsatisfiability.
- Once propagation is quiet, the next unassigned literal is decided; when none remains, every clause is satisfied.
*/

use std::collections::{HashMap, HashSet};

use crate::db::clause::Clause;
use crate::db::literal::Literal;
use crate::db::trail::Assignment;
use crate::misc::log::targets;
use crate::reports::Report;
use crate::structures::cnf::to_cnf;
use crate::structures::expr::Expr;
use crate::structures::sort::Sort;
use crate::structures::symbol::{boolean, Symbol, SymbolKind};
use crate::transactional::{Memory, TxSet};

/// A solve over a single formula.
pub struct Model {
    memory: Memory,
    clauses: HashSet<Clause>,
    occurrences: HashMap<Literal, usize>,
    assignment: Assignment,
    learnt: TxSet<Clause>,
    report: Option<Report>,
}

impl Model {
    /// A model search for `expr`, set up but not yet run.
    pub fn new(expr: &Expr) -> Model {
        let memory = Memory::new();
        let mut clauses: HashSet<Clause> = HashSet::new();
        let mut occurrences: HashMap<Literal, usize> = HashMap::new();
        let mut order: Vec<Literal> = Vec::new();

        let conjunction = Symbol::connective(true);
        let disjunction = Symbol::connective(false);

        let cnf = to_cnf(expr);
        let conjuncts: Vec<Expr> = match cnf.symbol() == &conjunction {
            true => cnf.args().to_vec(),
            false => vec![cnf.clone()],
        };

        for conjunct in &conjuncts {
            debug_assert!(conjunct.symbol() != &conjunction);
            let parts: Vec<Expr> = match conjunct.symbol() == &disjunction {
                true => conjunct.args().to_vec(),
                false => vec![conjunct.clone()],
            };
            let mut literals: Vec<Literal> = Vec::new();
            for part in &parts {
                debug_assert!(!matches!(part.symbol().kind(), SymbolKind::Connective(_)));
                let literal = Literal::new(&memory, part);
                let canonical = match literal < literal.negated() {
                    true => literal.clone(),
                    false => literal.negated(),
                };
                match occurrences.get_mut(&canonical) {
                    Some(count) => *count += 1,
                    None => {
                        occurrences.insert(canonical.clone(), 1);
                        order.push(canonical);
                    }
                }
                literals.push(literal);
            }
            clauses.insert(Clause::new(&memory, &literals));
        }

        // Descending occurrence count, stable over first appearance.
        order.sort_by(|a, b| occurrences[b].cmp(&occurrences[a]));
        let assignment = Assignment::new(&memory, &order);

        // Constant atoms are opaque to the engine, so the false constant is pinned
        // at the root of the trail, under a tautological unit antecedent.
        // A constant survives translation only as the whole formula.
        let false_literal = Literal::new(&memory, &boolean(false));
        if occurrences.contains_key(&false_literal) {
            let tautology = Clause::new(&memory, &[false_literal.negated()]);
            assignment.make_implication(&memory, &false_literal, &tautology);
        }
        log::info!(target: targets::SOLVE, "{} clauses over {} literal pairs.", clauses.len(), order.len());

        Model {
            learnt: TxSet::new(&memory),
            memory,
            clauses,
            occurrences,
            assignment,
            report: None,
        }
    }

    /// Runs the CDCL loop to completion.
    pub fn solve(&mut self) {
        let memory = &self.memory;
        loop {
            while let Some(clause) = self.assignment.suspicious_clause(memory) {
                if clause.is_conflict(&self.assignment, memory) {
                    let learned = self.assignment.analyze_conflict(memory, &clause);
                    let head = learned[0].clone();
                    if learned.len() == 1 {
                        if head.link(memory) == *self.assignment.sentinel() {
                            log::info!(target: targets::SOLVE, "Conflict at level zero.");
                            self.report = Some(Report::Unsatisfiable);
                            return;
                        }
                        let back = self.assignment.sentinel().link(memory);
                        if back != *self.assignment.sentinel() {
                            self.assignment.backtrack(memory, &back);
                        }
                    } else {
                        let second = &learned[1];
                        let back = match second.antecedent(memory) {
                            None => second.link(memory),
                            Some(_) => second.link(memory).link(memory),
                        };
                        debug_assert!(back != *self.assignment.sentinel());
                        self.assignment.backtrack(memory, &back);
                    }
                    let asserting = Clause::new(memory, &learned);
                    self.learnt.insert(memory, asserting.clone());
                    self.assignment.make_implication(memory, &head.negated(), &asserting);
                } else if let Some(derived) = clause.derive(&self.assignment, memory) {
                    self.assignment.make_implication(memory, &derived.negated(), &clause);
                }
            }

            let border = self.assignment.border(memory);
            if border == self.assignment.len(memory) {
                self.report = Some(Report::Satisfiable);
                return;
            }
            let decision = self.assignment.literal_at(memory, border);
            self.assignment.make_decision(memory, &decision);
        }
    }

    /// The outcome of the solve, if it has run.
    pub fn report(&self) -> Option<Report> {
        self.report
    }

    /// The value of a boolean variable under the found assignment.
    ///
    /// None if the variable never appeared in the formula.
    pub fn eval(&self, expr: &Expr) -> Option<Expr> {
        debug_assert_eq!(expr.sort(), Sort::Bool);
        debug_assert!(matches!(expr.symbol().kind(), SymbolKind::Variable(_)));
        let literal = Literal::new(&self.memory, expr);
        if !self.occurrences.contains_key(&literal)
            && !self.occurrences.contains_key(&literal.negated())
        {
            return None;
        }
        self.assignment.value(&self.memory, &literal).map(boolean)
    }

    /// The clauses of the translated formula.
    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// The solve-local arena.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The assignment trail.
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }
}

/*!
The interpreter façade.

An [Interpreter] maintains an arena, a [SymbolTable], the transactional set of asserted expressions, and the most recent [Model].
Commands are run in script order:

- `assert` evaluates its term, requires a boolean sort, and adds the expression to the assertion set unless it is tainted.
- `check-sat` solves the conjunction of assertions and prints `SAT` or `UNSAT`.
- `declare-const` and `declare-fun` declare fresh uninterpreted symbols; colliding with a builtin or an existing declaration is an error.
- `define-fun` declares its formals inside a scoped transaction, evaluates the body, rolls back, and declares a [macro](crate::structures::symbol::SymbolKind::Macro).
- `get-model` prints each declared boolean variable the solver assigned.
- `simplify` prints the pretty-printed CNF of its term.
- `let` evaluates its bindings outside a scoped transaction, declares fresh variables inside it, and substitutes the bindings into the body.

Scoped declarations always release their transaction, on success and on error alike, through the arena's drop guard.
Semantic errors --- sort mismatch, arity mismatch, undeclared or redeclared symbols --- are recorded in the shared [MessageSet], and the offending expression is produced as a wrapper so the rest of the script keeps its meaning.
*/

use std::cell::RefCell;
use std::collections::HashMap;

use crate::misc::log::targets;
use crate::procedures::solve::Model;
use crate::reports::Report;
use crate::smtlib::parser::{Command, Ident, Parser, Term, TermKind};
use crate::smtlib::pretty;
use crate::smtlib::scanner::Scanner;
use crate::smtlib::source::{Message, MessageSet, Position};
use crate::structures::cnf::to_cnf;
use crate::structures::expr::Expr;
use crate::structures::sort::Sort;
use crate::structures::symbol::{boolean, boolean_and, integer, Symbol, SymbolKind};
use crate::transactional::{Memory, TxMap, TxSet};

/// The table from names to symbols, and back.
///
/// The name-to-symbol map is transactional, so scoped declarations roll back exactly; the symbol-to-name map is plain, as a rolled-back symbol is never applied again and its entry is inert.
pub struct SymbolTable {
    names: TxMap<String, Symbol>,
    reverse: RefCell<HashMap<Symbol, String>>,
}

impl SymbolTable {
    /// A table over `memory` with the builtin names in place.
    pub fn new(memory: &Memory) -> SymbolTable {
        let reverse = HashMap::from([
            (Symbol::bool_const(true), "true".to_string()),
            (Symbol::bool_const(false), "false".to_string()),
            (Symbol::negator(Sort::Bool), "not".to_string()),
            (Symbol::connective(true), "and".to_string()),
            (Symbol::connective(false), "or".to_string()),
            (Symbol::implication(), "=>".to_string()),
            (Symbol::sum(), "+".to_string()),
            (Symbol::bool_eq(), "=".to_string()),
            (Symbol::int_eq(), "=".to_string()),
            (Symbol::negator(Sort::Int), "-".to_string()),
            (Symbol::difference(), "-".to_string()),
        ]);
        SymbolTable {
            names: TxMap::new(memory),
            reverse: RefCell::new(reverse),
        }
    }

    /// The builtin symbol of `name`, for the monomorphic builtins.
    fn standard(name: &str) -> Option<Symbol> {
        match name {
            "true" => Some(Symbol::bool_const(true)),
            "false" => Some(Symbol::bool_const(false)),
            "not" => Some(Symbol::negator(Sort::Bool)),
            "and" => Some(Symbol::connective(true)),
            "or" => Some(Symbol::connective(false)),
            "=>" => Some(Symbol::implication()),
            "+" => Some(Symbol::sum()),
            _ => None,
        }
    }

    /// True if `name` is reserved for a builtin, including the polymorphic `=` and `-`.
    pub fn is_standard(name: &str) -> bool {
        SymbolTable::standard(name).is_some() || name == "=" || name == "-"
    }

    /// The symbol of `name` given the argument sorts at the use site.
    ///
    /// `=` dispatches to integer equality iff the first argument is an integer; `-` to negation iff applied to a single argument.
    pub fn get_symbol(&self, memory: &Memory, name: &str, arg_sorts: &[Sort]) -> Option<Symbol> {
        if let Some(symbol) = SymbolTable::standard(name) {
            return Some(symbol);
        }
        match name {
            "=" => Some(match arg_sorts.first() {
                Some(Sort::Int) => Symbol::int_eq(),
                _ => Symbol::bool_eq(),
            }),
            "-" => Some(match arg_sorts.len() {
                1 => Symbol::negator(Sort::Int),
                _ => Symbol::difference(),
            }),
            _ => self.names.get(memory, &name.to_string()),
        }
    }

    /// The declared or builtin name of `symbol`, if any.
    pub fn get_name(&self, symbol: &Symbol) -> Option<String> {
        self.reverse.borrow().get(symbol).cloned()
    }

    /// Declares `name` for `symbol`.
    ///
    /// Fails on a builtin name, or a name already declared in the top transaction --- outer declarations may be shadowed inside a scope.
    pub fn declare(&self, memory: &Memory, name: &str, symbol: &Symbol) -> bool {
        if SymbolTable::is_standard(name) || self.names.top_contains(memory, &name.to_string()) {
            return false;
        }
        self.names.insert(memory, name.to_string(), symbol.clone());
        self.reverse
            .borrow_mut()
            .insert(symbol.clone(), name.to_string());
        true
    }

    /// The declared names with their symbols, sorted by name.
    pub fn declarations(&self, memory: &Memory) -> Vec<(String, Symbol)> {
        let mut names = self.names.keys(memory);
        names.sort();
        names
            .into_iter()
            .filter_map(|name| {
                let symbol = self.names.get(memory, &name)?;
                Some((name, symbol))
            })
            .collect()
    }

    /// Pretty-prints `expr` with the names of this table.
    pub fn serialize_expr(&self, expr: &Expr) -> String {
        pretty::serialize(expr, |symbol| self.get_name(symbol))
    }
}

/// The interpreter for SMT-LIB scripts.
pub struct Interpreter {
    memory: Memory,
    symbols: SymbolTable,
    assertions: TxSet<Expr>,
    model: Option<Model>,
}

impl Default for Interpreter {
    fn default() -> Self {
        let memory = Memory::new();
        Interpreter {
            symbols: SymbolTable::new(&memory),
            assertions: TxSet::new(&memory),
            memory,
            model: None,
        }
    }
}

impl Interpreter {
    /// A fresh interpreter with only the builtins in scope.
    pub fn new() -> Interpreter {
        Interpreter::default()
    }

    /// The interpreter's arena.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The symbol table.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The most recent model, if a `check-sat` has run.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// The conjunction of the asserted expressions; true when nothing is asserted.
    pub fn assertion(&self) -> Expr {
        let asserted = self.assertions.elements(&self.memory);
        match asserted.is_empty() {
            true => boolean(true),
            false => boolean_and(&asserted),
        }
    }

    /// Parses and runs the script at `pos`, accumulating errors into `messages`.
    pub fn execute(&mut self, pos: Position, messages: &MessageSet) {
        let script = {
            let scanner = Scanner::new(pos, messages);
            Parser::new(scanner).script()
        };
        for command in &script.commands {
            self.run(command, messages);
        }
    }

    fn run(&mut self, command: &Command, messages: &MessageSet) {
        match command {
            Command::Assert { term } => {
                let expr = self.eval_term(term, messages);
                let sort = expr.sort();
                if sort != Sort::Unknown && sort != Sort::Bool {
                    messages.add(Message::new(
                        term.start.clone(),
                        "invalid assert command, term is not Bool",
                    ));
                }
                if !expr.has_wrappers() {
                    self.assertions.insert(&self.memory, expr);
                }
            }

            Command::CheckSat => {
                log::info!(target: targets::INTERP, "check-sat over {} assertions.", self.assertions.len(&self.memory));
                let mut model = Model::new(&self.assertion());
                model.solve();
                let report = model.report().expect("! A finished solve without a report");
                println!("{report}");
                self.model = Some(model);
            }

            Command::DeclareConst { ident, sort } => {
                let sort = sort.value.unwrap_or(Sort::Unknown);
                self.declare_symbol(ident.as_ref(), &Symbol::variable(sort), messages);
            }

            Command::DeclareFun { ident, args, sort } => {
                let sort = sort.value.unwrap_or(Sort::Unknown);
                let symbol = Symbol::function(sort, args.clone());
                self.declare_symbol(ident.as_ref(), &symbol, messages);
            }

            Command::DefineFun {
                ident,
                formals,
                sort,
                term,
            } => {
                let (formal_vars, body) = {
                    let _scope = self.memory.begin_scoped();
                    let mut formal_vars: Vec<Symbol> = Vec::new();
                    for formal in formals {
                        let var_sort = formal.sort.value.unwrap_or(Sort::Unknown);
                        let var = Symbol::variable(var_sort);
                        formal_vars.push(var.clone());
                        self.declare_symbol(formal.ident.as_ref(), &var, messages);
                    }
                    let body = self.eval_term(term, messages);
                    (formal_vars, body)
                };

                let mut result_sort = body.symbol().sort();
                if let Some(declared) = sort.value {
                    result_sort = declared;
                }
                if body.symbol().is_interpreted() && result_sort != body.symbol().sort() {
                    messages.add(Message::new(
                        sort.start.clone(),
                        "invalid function definition, sort mismatch",
                    ));
                }
                let symbol = Symbol::macro_symbol(result_sort, formal_vars, body);
                self.declare_symbol(ident.as_ref(), &symbol, messages);
            }

            Command::GetModel { start } => {
                let unavailable = match &self.model {
                    None => true,
                    Some(model) => model.report() == Some(Report::Unsatisfiable),
                };
                if unavailable {
                    messages.add(Message::new(start.clone(), "model not available"));
                    return;
                }
                let model = self.model.as_ref().expect("! Availability just checked");
                for (name, symbol) in self.symbols.declarations(&self.memory) {
                    if matches!(symbol.kind(), SymbolKind::Variable(Sort::Bool)) {
                        if let Some(value) = model.eval(&symbol.apply(&[])) {
                            println!("{name}: {}", self.symbols.serialize_expr(&value));
                        }
                    }
                }
            }

            Command::Simplify { term } => {
                let expr = self.eval_term(term, messages);
                println!("{}", self.symbols.serialize_expr(&to_cnf(&expr)));
            }
        }
    }

    /// Evaluates a term to an expression; a broken term evaluates to a wrapper.
    fn eval_term(&self, term: &Term, messages: &MessageSet) -> Expr {
        match &term.kind {
            TermKind::Ident(name) => {
                self.apply_symbol(name, &term.start, &term.follow, &[], messages)
            }

            TermKind::Number(value) => integer(*value),

            TermKind::Call { ident, args } => {
                let evaluated: Vec<(Position, Position, Expr)> = args
                    .iter()
                    .map(|arg| {
                        (
                            arg.start.clone(),
                            arg.follow.clone(),
                            self.eval_term(arg, messages),
                        )
                    })
                    .collect();
                match ident {
                    Some(ident) => self.apply_symbol(
                        &ident.name,
                        &ident.start,
                        &ident.follow,
                        &evaluated,
                        messages,
                    ),
                    None => Symbol::wrapper(None).apply(&[]),
                }
            }

            TermKind::Let { bindings, body } => {
                // Binding terms live in the enclosing scope.
                let bound: Vec<(&Ident, Expr)> = bindings
                    .iter()
                    .map(|binding| (&binding.ident, self.eval_term(&binding.term, messages)))
                    .collect();

                let scope = self.memory.begin_scoped();
                let mut table: HashMap<Expr, Expr> = HashMap::new();
                for (ident, expr) in &bound {
                    let var = Symbol::variable(expr.sort());
                    table.insert(var.apply(&[]), expr.clone());
                    self.declare_symbol(Some(*ident), &var, messages);
                }
                let inner = self.eval_term(body, messages);
                let result = inner.substitute(&table);
                drop(scope);
                result
            }

            TermKind::Broken => Symbol::wrapper(None).apply(&[]),
        }
    }

    /// Declares `symbol` under the identifier, reporting collisions.
    fn declare_symbol(&self, ident: Option<&Ident>, symbol: &Symbol, messages: &MessageSet) {
        let Some(ident) = ident else { return };
        if !self.symbols.declare(&self.memory, &ident.name, symbol) {
            let description = match SymbolTable::is_standard(&ident.name) {
                true => format!("invalid declaration, builtin symbol '{}'", ident.name),
                false => format!("invalid declaration, symbol '{}' already declared", ident.name),
            };
            messages.add(Message::new(ident.start.clone(), description));
        }
    }

    /// Resolves `name` against the argument sorts and applies it, reporting argument problems.
    fn apply_symbol(
        &self,
        name: &str,
        start: &Position,
        follow: &Position,
        args: &[(Position, Position, Expr)],
        messages: &MessageSet,
    ) -> Expr {
        let arg_sorts: Vec<Sort> = args.iter().map(|(_, _, expr)| expr.sort()).collect();
        let symbol = match self.symbols.get_symbol(&self.memory, name, &arg_sorts) {
            Some(symbol) => symbol,
            None => {
                messages.add(Message::new(
                    start.clone(),
                    format!("symbol '{name}' not declared"),
                ));
                // Remember the name as a wrapper so later uses do not re-report.
                let wrapper = Symbol::wrapper(None);
                self.symbols.declare(&self.memory, name, &wrapper);
                wrapper
            }
        };

        let exprs: Vec<Expr> = args.iter().map(|(_, _, expr)| expr.clone()).collect();
        let expr = symbol.apply(&exprs);

        if symbol.is_interpreted() && matches!(expr.symbol().kind(), SymbolKind::Wrapper(_)) {
            for (index, (arg_start, _, _)) in args.iter().enumerate() {
                match symbol.arg_sort(index, true) {
                    None => {
                        messages.add(Message::new(
                            arg_start.clone(),
                            format!("extra argument passed to function '{name}'"),
                        ));
                        break;
                    }
                    Some(formal) => {
                        if arg_sorts[index] != Sort::Unknown && arg_sorts[index] != formal {
                            messages.add(Message::new(
                                arg_start.clone(),
                                format!(
                                    "sort mismatch at argument #{} for function '{name}'",
                                    index + 1
                                ),
                            ));
                        }
                    }
                }
            }
            if symbol.arg_sort(args.len(), false).is_some() {
                let pos = match args.last() {
                    Some((_, arg_follow, _)) => arg_follow.clone(),
                    None => follow.clone(),
                };
                messages.add(Message::new(
                    pos,
                    format!("not enough arguments ({}) passed to function '{name}'", args.len()),
                ));
            }
        }

        expr
    }
}

/*!
Symbols: the operators which label expression nodes.

Each symbol has a result [sort](Sort) and, where applicable, a *valency*: for an argument index and a flag noting whether an actual argument sits at the index, the valency returns the required sort, or none meaning no argument is allowed there.

Applying a symbol to arguments:

1. Sort-checks the arguments; on failure the application is rebuilt under a fresh [Wrapper](SymbolKind::Wrapper) symbol, an opaque error carrier which tolerates any arguments and taints the result.
2. Reduces the application algebraically --- absorption, unit and zero elimination, double negation, associative-commutative flattening and cancellation, constant folding --- so that equal formulas intern to equal nodes.
3. Falls back to allocating an interned node.

Symbols are interned: constants, negators, connectives, equalities, sums, macros and Tseitin variables are unique per canonical key, while variables, uninterpreted functions and wrappers are distinguished by identity alone.

The total order on symbols is `(priority, variant rank, content, serial)`; negations order first, then constants, variables, functions and macros, with every other operator last.
The order is what makes associative-commutative argument lists canonical.
*/

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use crate::generic::interning::{next_serial, WeakTable};
use crate::structures::expr::Expr;
use crate::structures::sort::Sort;

/// An interned symbol.
#[derive(Clone)]
pub struct Symbol(pub(crate) Rc<SymbolData>);

/// The backing data of a symbol.
pub struct SymbolData {
    serial: u64,
    kind: SymbolKind,
}

/// The variants of a symbol.
pub enum SymbolKind {
    /// A boolean constant.
    BoolConst(bool),

    /// An integer constant.
    IntConst(i64),

    /// An uninterpreted nullary symbol, distinguished by identity.
    Variable(Sort),

    /// An uninterpreted symbol of fixed arity, each argument sort declared.
    Function {
        /// The result sort.
        sort: Sort,
        /// The declared argument sorts.
        args: Vec<Sort>,
    },

    /// A function whose body is an expression over formal argument variables; substitutes eagerly when applied.
    Macro {
        /// The result sort.
        sort: Sort,
        /// The formal argument variables.
        formals: Vec<Symbol>,
        /// The body, over the formals.
        body: Expr,
    },

    /// Negation: logical over `Bool`, arithmetic over `Int`.
    Negator(Sort),

    /// A boolean connective: `and` when the neutral element is true, `or` when it is false.
    Connective(bool),

    /// Boolean implication; reduces to `or(¬a, b)`.
    Implication,

    /// Variadic boolean equality; reduces to pairwise form.
    BoolEq,

    /// Variadic integer equality, uninterpreted beyond syntactic normalization.
    IntEq,

    /// Variadic integer sum.
    Sum,

    /// Binary integer difference; reduces to `sum(a, ¬b)`.
    Difference,

    /// A variable introduced by the CNF translator, carrying the expression it stands for.
    Tseitin(Expr),

    /// An error carrier, formed when sort checking fails or a subterm is structurally invalid.
    /// May carry the symbol whose application failed, for diagnostics.
    Wrapper(Option<Symbol>),
}

/// Keys of the symbols which are unique per payload and small enough to retain.
#[derive(PartialEq, Eq, Hash)]
enum SingletonKey {
    BoolConst(bool),
    Negator(Sort),
    Connective(bool),
    Implication,
    BoolEq,
    IntEq,
    Sum,
    Difference,
}

#[derive(Default)]
struct SymbolTables {
    singletons: HashMap<SingletonKey, Symbol>,
    int_consts: WeakTable<i64, SymbolData>,
    tseitins: WeakTable<u64, SymbolData>,
    macros: WeakTable<(Sort, Vec<u64>, u64), SymbolData>,
}

thread_local! {
    static TABLES: RefCell<SymbolTables> = RefCell::new(SymbolTables::default());
}

impl Symbol {
    fn fresh(kind: SymbolKind) -> Symbol {
        Symbol(Rc::new(SymbolData {
            serial: next_serial(),
            kind,
        }))
    }

    fn singleton(key: SingletonKey, kind: impl FnOnce() -> SymbolKind) -> Symbol {
        TABLES.with(|tables| {
            let mut tables = tables.borrow_mut();
            tables
                .singletons
                .entry(key)
                .or_insert_with(|| Symbol::fresh(kind()))
                .clone()
        })
    }

    /// The boolean constant symbol for `value`.
    pub fn bool_const(value: bool) -> Symbol {
        Symbol::singleton(SingletonKey::BoolConst(value), || {
            SymbolKind::BoolConst(value)
        })
    }

    /// The integer constant symbol for `value`.
    pub fn int_const(value: i64) -> Symbol {
        TABLES.with(|tables| {
            let mut tables = tables.borrow_mut();
            if let Some(data) = tables.int_consts.get(&value) {
                return Symbol(data);
            }
            let symbol = Symbol::fresh(SymbolKind::IntConst(value));
            tables.int_consts.insert(value, &symbol.0);
            symbol
        })
    }

    /// A fresh variable of `sort`.
    pub fn variable(sort: Sort) -> Symbol {
        Symbol::fresh(SymbolKind::Variable(sort))
    }

    /// A fresh uninterpreted function.
    pub fn function(sort: Sort, args: Vec<Sort>) -> Symbol {
        Symbol::fresh(SymbolKind::Function { sort, args })
    }

    /// The macro over `formals` with `body`, interned by its definition.
    pub fn macro_symbol(sort: Sort, formals: Vec<Symbol>, body: Expr) -> Symbol {
        let key = (
            sort,
            formals.iter().map(Symbol::serial).collect::<Vec<_>>(),
            body.serial(),
        );
        TABLES.with(|tables| {
            let mut tables = tables.borrow_mut();
            if let Some(data) = tables.macros.get(&key) {
                return Symbol(data);
            }
            let symbol = Symbol::fresh(SymbolKind::Macro {
                sort,
                formals,
                body,
            });
            tables.macros.insert(key, &symbol.0);
            symbol
        })
    }

    /// The negator of `sort`.
    pub fn negator(sort: Sort) -> Symbol {
        Symbol::singleton(SingletonKey::Negator(sort), || SymbolKind::Negator(sort))
    }

    /// The boolean connective with `neutral` as neutral element: `and` for true, `or` for false.
    pub fn connective(neutral: bool) -> Symbol {
        Symbol::singleton(SingletonKey::Connective(neutral), || {
            SymbolKind::Connective(neutral)
        })
    }

    /// Boolean implication.
    pub fn implication() -> Symbol {
        Symbol::singleton(SingletonKey::Implication, || SymbolKind::Implication)
    }

    /// Boolean equality.
    pub fn bool_eq() -> Symbol {
        Symbol::singleton(SingletonKey::BoolEq, || SymbolKind::BoolEq)
    }

    /// Integer equality.
    pub fn int_eq() -> Symbol {
        Symbol::singleton(SingletonKey::IntEq, || SymbolKind::IntEq)
    }

    /// Integer sum.
    pub fn sum() -> Symbol {
        Symbol::singleton(SingletonKey::Sum, || SymbolKind::Sum)
    }

    /// Integer difference.
    pub fn difference() -> Symbol {
        Symbol::singleton(SingletonKey::Difference, || SymbolKind::Difference)
    }

    /// The Tseitin variable standing for `expr`, interned by the expression.
    pub fn tseitin(expr: &Expr) -> Symbol {
        debug_assert_eq!(expr.sort(), Sort::Bool);
        TABLES.with(|tables| {
            let mut tables = tables.borrow_mut();
            if let Some(data) = tables.tseitins.get(&expr.serial()) {
                return Symbol(data);
            }
            let symbol = Symbol::fresh(SymbolKind::Tseitin(expr.clone()));
            tables.tseitins.insert(expr.serial(), &symbol.0);
            symbol
        })
    }

    /// A fresh wrapper, optionally carrying the symbol whose application failed.
    pub fn wrapper(inner: Option<Symbol>) -> Symbol {
        Symbol::fresh(SymbolKind::Wrapper(inner))
    }
}

impl Symbol {
    /// The construction-order serial, unique per symbol.
    pub fn serial(&self) -> u64 {
        self.0.serial
    }

    /// The variant of the symbol.
    pub fn kind(&self) -> &SymbolKind {
        &self.0.kind
    }

    /// The result sort.
    pub fn sort(&self) -> Sort {
        match self.kind() {
            SymbolKind::BoolConst(_)
            | SymbolKind::Connective(_)
            | SymbolKind::Implication
            | SymbolKind::BoolEq
            | SymbolKind::IntEq
            | SymbolKind::Tseitin(_) => Sort::Bool,

            SymbolKind::IntConst(_) | SymbolKind::Sum | SymbolKind::Difference => Sort::Int,

            SymbolKind::Negator(sort) | SymbolKind::Variable(sort) => *sort,

            SymbolKind::Function { sort, .. } | SymbolKind::Macro { sort, .. } => *sort,

            SymbolKind::Wrapper(inner) => match inner {
                Some(symbol) => symbol.sort(),
                None => Sort::Unknown,
            },
        }
    }

    /// True for every symbol except wrappers.
    pub fn is_interpreted(&self) -> bool {
        !matches!(self.kind(), SymbolKind::Wrapper(_))
    }

    /// The valency of the symbol at `index`.
    ///
    /// `present` is true when an actual argument sits at `index`, and false when asking whether further arguments are permitted.
    /// `None` means no argument is allowed there.
    pub fn arg_sort(&self, index: usize, present: bool) -> Option<Sort> {
        match self.kind() {
            SymbolKind::BoolConst(_)
            | SymbolKind::IntConst(_)
            | SymbolKind::Variable(_)
            | SymbolKind::Tseitin(_)
            | SymbolKind::Wrapper(_) => None,

            SymbolKind::Negator(sort) => match index {
                0 => Some(*sort),
                _ => None,
            },

            SymbolKind::Connective(_) | SymbolKind::BoolEq => match index == 0 || present {
                true => Some(Sort::Bool),
                false => None,
            },

            SymbolKind::IntEq | SymbolKind::Sum => match index == 0 || present {
                true => Some(Sort::Int),
                false => None,
            },

            SymbolKind::Implication => match index {
                0 | 1 => Some(Sort::Bool),
                _ => None,
            },

            SymbolKind::Difference => match index {
                0 | 1 => Some(Sort::Int),
                _ => None,
            },

            SymbolKind::Function { args, .. } => args.get(index).copied(),

            SymbolKind::Macro { formals, .. } => formals.get(index).map(Symbol::sort),
        }
    }

    /// True if arguments of `sorts` satisfy the valency of the symbol.
    ///
    /// An argument of unknown sort satisfies any requirement.
    pub fn check_args(&self, sorts: &[Sort]) -> bool {
        for (index, sort) in sorts.iter().enumerate() {
            if *sort != Sort::Unknown && self.arg_sort(index, true) != Some(*sort) {
                return false;
            }
        }
        self.arg_sort(sorts.len(), false).is_none()
    }

    /// Applies the symbol to `args`.
    ///
    /// Ill-sorted applications are rebuilt under a fresh wrapper; otherwise the application is reduced, or interned as a node.
    pub fn apply(&self, args: &[Expr]) -> Expr {
        if let SymbolKind::Wrapper(_) = self.kind() {
            return Expr::node(self, args);
        }
        let sorts: Vec<Sort> = args.iter().map(Expr::sort).collect();
        if !self.check_args(&sorts) {
            return Symbol::wrapper(Some(self.clone())).apply(args);
        }
        match self.reduce(args) {
            Some(reduced) => reduced,
            None => Expr::node(self, args),
        }
    }

    /// The symbol-specific reduction of an application, if one applies.
    fn reduce(&self, args: &[Expr]) -> Option<Expr> {
        match self.kind() {
            SymbolKind::Negator(_) => {
                let arg = &args[0];
                match arg.symbol().negate_applied(arg.args()) {
                    Some(negated) => Some(negated),
                    None => Some(Expr::node(self, args)),
                }
            }

            SymbolKind::Connective(_) | SymbolKind::Sum => Some(self.reduce_ac(args)),

            SymbolKind::Implication => Some(boolean_or(&[args[0].negated(), args[1].clone()])),

            SymbolKind::Difference => Some(integer_sum(&[args[0].clone(), args[1].negated()])),

            SymbolKind::BoolEq => Some(Self::reduce_bool_eq(args)),

            SymbolKind::IntEq => Self::reduce_int_eq(args),

            SymbolKind::Macro {
                sort,
                formals,
                body,
            } => {
                if body.symbol().is_interpreted() && body.symbol().sort() == *sort {
                    let table: HashMap<Expr, Expr> = formals
                        .iter()
                        .zip(args)
                        .map(|(formal, actual)| (formal.apply(&[]), actual.clone()))
                        .collect();
                    Some(body.substitute(&table))
                } else {
                    None
                }
            }

            _ => None,
        }
    }

    /// The negation of an application of the symbol, if the symbol knows one.
    ///
    /// Double negation cancels, constants flip, connectives and sums distribute.
    pub(crate) fn negate_applied(&self, args: &[Expr]) -> Option<Expr> {
        match self.kind() {
            SymbolKind::Negator(_) => Some(args[0].clone()),

            SymbolKind::BoolConst(value) => Some(boolean(!value)),

            SymbolKind::IntConst(value) => Some(integer(value.wrapping_neg())),

            SymbolKind::Connective(neutral) => {
                let negated: Vec<Expr> = args.iter().map(Expr::negated).collect();
                Some(Symbol::connective(!neutral).apply(&negated))
            }

            SymbolKind::Sum => {
                let negated: Vec<Expr> = args.iter().map(Expr::negated).collect();
                Some(Symbol::sum().apply(&negated))
            }

            _ => None,
        }
    }

    /// The associative-commutative reduction.
    ///
    /// Arguments are flattened through nested applications of the symbol, then every pair is offered to [binary_reduce](Symbol::binary_reduce); a pair which reduces is replaced by the (flattened) result, which is itself paired against survivors and fresh results until no pair reduces.
    /// The result is sorted and, if a single interpreted argument remains, collapses to it.
    fn reduce_ac(&self, args: &[Expr]) -> Expr {
        let mut pool: Vec<Expr> = Vec::new();

        let flatten = |exprs: &[Expr], pool: &mut Vec<Expr>| -> BTreeSet<usize> {
            let mut flat = BTreeSet::new();
            let mut stack: Vec<Expr> = exprs.to_vec();
            while let Some(expr) = stack.pop() {
                if expr.symbol() == self {
                    stack.extend(expr.args().iter().cloned());
                } else {
                    flat.insert(pool.len());
                    pool.push(expr);
                }
            }
            flat
        };

        let mut live = flatten(args, &mut pool);
        let mut tasks: Vec<(BTreeSet<usize>, BTreeSet<usize>)> = vec![(live.clone(), live.clone())];

        while let Some((first, second)) = tasks.pop() {
            let mut second_list: Vec<usize> =
                second.iter().copied().filter(|i| live.contains(i)).collect();
            let mut created: BTreeSet<usize> = BTreeSet::new();

            for a in first {
                if !live.contains(&a) {
                    continue;
                }
                for i in 0..second_list.len() {
                    let b = second_list[i];
                    if a != b && live.contains(&b) {
                        let (lhs, rhs) = (pool[a].clone(), pool[b].clone());
                        if let Some(reduced) = self.binary_reduce(&lhs, &rhs) {
                            live.remove(&a);
                            live.remove(&b);
                            created.extend(flatten(&[reduced], &mut pool));
                            second_list.swap_remove(i);
                            break;
                        }
                    }
                }
            }

            if !created.is_empty() {
                let survivors = live.clone();
                tasks.push((survivors.clone(), created.clone()));
                tasks.push((created.clone(), survivors));
                tasks.push((created.clone(), created.clone()));
                live.extend(created);
            }
        }

        let mut reduced: Vec<Expr> = live.iter().map(|i| pool[*i].clone()).collect();
        reduced.sort();
        if reduced.len() == 1 && reduced[0].symbol().is_interpreted() {
            reduced.pop().expect("! An element was just checked")
        } else {
            Expr::node(self, &reduced)
        }
    }

    /// Reduces a pair of associative-commutative arguments, if possible.
    fn binary_reduce(&self, a: &Expr, b: &Expr) -> Option<Expr> {
        match self.kind() {
            SymbolKind::Connective(neutral) => self.connective_binary_reduce(*neutral, a, b),

            SymbolKind::Sum => {
                if *a == b.negated() {
                    return Some(integer(0));
                }
                if *a == integer(0) {
                    return Some(b.clone());
                }
                if let (SymbolKind::IntConst(x), SymbolKind::IntConst(y)) =
                    (a.symbol().kind(), b.symbol().kind())
                {
                    return x.checked_add(*y).map(integer);
                }
                None
            }

            _ => None,
        }
    }

    /// Idempotence, complements, the neutral and dominating constants, and consensus-style cancellation against the opposite connective.
    fn connective_binary_reduce(&self, neutral: bool, a: &Expr, b: &Expr) -> Option<Expr> {
        let zero = boolean(neutral);
        let one = boolean(!neutral);

        if a == b {
            return Some(a.clone());
        }
        if *a == b.negated() {
            return Some(one);
        }
        if *a == zero {
            return Some(b.clone());
        }
        if *a == one {
            return Some(a.clone());
        }

        let opposite = Symbol::connective(!neutral);
        if b.symbol() == &opposite {
            let b_args: BTreeSet<Expr> = b.args().iter().cloned().collect();

            if b_args.contains(&a.negated()) {
                let mut rest = vec![a.clone()];
                rest.extend(b_args.into_iter().filter(|e| *e != a.negated()));
                return Some(self.apply(&rest));
            }

            let a_args: BTreeSet<Expr> = match a.symbol() == &opposite {
                true => a.args().iter().cloned().collect(),
                false => BTreeSet::from([a.clone()]),
            };
            if a_args.is_subset(&b_args) {
                return Some(a.clone());
            }

            let common: BTreeSet<Expr> = a_args.intersection(&b_args).cloned().collect();
            if !common.is_empty() {
                let a_rest: Vec<Expr> = a_args.difference(&common).cloned().collect();
                let b_rest: Vec<Expr> = b_args.difference(&common).cloned().collect();
                if opposite.apply(&a_rest) == opposite.apply(&b_rest).negated() {
                    let common: Vec<Expr> = common.into_iter().collect();
                    return Some(opposite.apply(&common));
                }
            }
        }

        None
    }

    /// Boolean equality reduces to pairwise implications.
    fn reduce_bool_eq(args: &[Expr]) -> Expr {
        let unique: BTreeSet<Expr> = args.iter().cloned().collect();
        if unique.len() == 1 {
            return boolean(true);
        }
        let sorted: Vec<Expr> = unique.into_iter().collect();
        if sorted.len() == 2 {
            let (a, b) = (&sorted[0], &sorted[1]);
            return boolean_and(&[
                boolean_or(&[a.negated(), b.clone()]),
                boolean_or(&[a.clone(), b.negated()]),
            ]);
        }
        let chain: Vec<Expr> = sorted
            .windows(2)
            .map(|pair| Symbol::bool_eq().apply(pair))
            .collect();
        boolean_and(&chain)
    }

    /// Integer equality deduplicates, subtracts common summands across argument sums, and sorts.
    fn reduce_int_eq(args: &[Expr]) -> Option<Expr> {
        let unique: BTreeSet<Expr> = args.iter().cloned().collect();
        if unique.len() == 1 {
            return Some(boolean(true));
        }

        let is_sum = |e: &Expr| matches!(e.symbol().kind(), SymbolKind::Sum);
        if unique.iter().any(is_sum) {
            let sums: Vec<BTreeSet<Expr>> = unique
                .iter()
                .map(|e| match is_sum(e) {
                    true => e.args().iter().cloned().collect(),
                    false => BTreeSet::from([e.clone()]),
                })
                .collect();
            let mut common = sums[0].clone();
            for summands in &sums[1..] {
                common = common.intersection(summands).cloned().collect();
            }
            if !common.is_empty() {
                let reduced: Vec<Expr> = sums
                    .iter()
                    .map(|summands| {
                        let rest: Vec<Expr> = summands.difference(&common).cloned().collect();
                        match rest.len() {
                            0 => integer(0),
                            1 => rest[0].clone(),
                            _ => integer_sum(&rest),
                        }
                    })
                    .collect();
                return Some(integer_eq(&reduced));
            }
        }

        let unsorted = args.windows(2).any(|pair| pair[0] > pair[1]);
        if unique.len() < args.len() || unsorted {
            let sorted: Vec<Expr> = unique.into_iter().collect();
            return Some(integer_eq(&sorted));
        }
        None
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.serial() == other.serial()
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.serial().hash(state);
    }
}

impl SymbolKind {
    /// The priority of the variant in the total order.
    fn priority(&self) -> u8 {
        match self {
            SymbolKind::Negator(_) => 0,
            SymbolKind::BoolConst(_) | SymbolKind::IntConst(_) => 1,
            SymbolKind::Tseitin(_) | SymbolKind::Variable(_) => 2,
            SymbolKind::Function { .. } => 3,
            SymbolKind::Macro { .. } => 4,
            _ => 5,
        }
    }

    /// The rank of the variant among variants of equal priority.
    fn rank(&self) -> u8 {
        match self {
            SymbolKind::BoolConst(_) => 0,
            SymbolKind::IntConst(_) => 1,

            SymbolKind::Tseitin(_) => 0,
            SymbolKind::Variable(_) => 1,

            SymbolKind::Connective(_) => 0,
            SymbolKind::BoolEq => 1,
            SymbolKind::Implication => 2,
            SymbolKind::Difference => 3,
            SymbolKind::IntEq => 4,
            SymbolKind::Sum => 5,
            SymbolKind::Wrapper(_) => 6,

            SymbolKind::Negator(_) | SymbolKind::Function { .. } | SymbolKind::Macro { .. } => 0,
        }
    }

    /// Compares the payloads of two symbols of the same variant.
    fn content_cmp(&self, other: &SymbolKind) -> Ordering {
        match (self, other) {
            (SymbolKind::BoolConst(a), SymbolKind::BoolConst(b)) => a.cmp(b),
            (SymbolKind::IntConst(a), SymbolKind::IntConst(b)) => a.cmp(b),
            (SymbolKind::Variable(a), SymbolKind::Variable(b)) => a.cmp(b),
            (SymbolKind::Negator(a), SymbolKind::Negator(b)) => a.cmp(b),
            (SymbolKind::Connective(a), SymbolKind::Connective(b)) => a.cmp(b),
            (SymbolKind::Tseitin(a), SymbolKind::Tseitin(b)) => a.cmp(b),
            (SymbolKind::Wrapper(a), SymbolKind::Wrapper(b)) => a.cmp(b),

            (
                SymbolKind::Function { sort: a, args: x },
                SymbolKind::Function { sort: b, args: y },
            ) => a.cmp(b).then_with(|| x.cmp(y)),

            (
                SymbolKind::Macro {
                    sort: a,
                    formals: x,
                    body: p,
                },
                SymbolKind::Macro {
                    sort: b,
                    formals: y,
                    body: q,
                },
            ) => a.cmp(b).then_with(|| x.cmp(y)).then_with(|| p.cmp(q)),

            _ => Ordering::Equal,
        }
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.serial() == other.serial() {
            return Ordering::Equal;
        }
        let a = self.kind();
        let b = other.kind();
        (a.priority(), a.rank())
            .cmp(&(b.priority(), b.rank()))
            .then_with(|| a.content_cmp(b))
            .then_with(|| self.serial().cmp(&other.serial()))
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            SymbolKind::BoolConst(value) => write!(f, "{value}"),
            SymbolKind::IntConst(value) => write!(f, "{value}"),
            SymbolKind::Variable(sort) => write!(f, "var<{sort}>#{}", self.serial()),
            SymbolKind::Function { .. } => write!(f, "fn#{}", self.serial()),
            SymbolKind::Macro { .. } => write!(f, "macro#{}", self.serial()),
            SymbolKind::Negator(Sort::Bool) => write!(f, "not"),
            SymbolKind::Negator(_) => write!(f, "-"),
            SymbolKind::Connective(true) => write!(f, "and"),
            SymbolKind::Connective(false) => write!(f, "or"),
            SymbolKind::Implication => write!(f, "=>"),
            SymbolKind::BoolEq | SymbolKind::IntEq => write!(f, "="),
            SymbolKind::Sum => write!(f, "+"),
            SymbolKind::Difference => write!(f, "-"),
            SymbolKind::Tseitin(_) => write!(f, "τ#{}", self.serial()),
            SymbolKind::Wrapper(_) => write!(f, "wrapper#{}", self.serial()),
        }
    }
}

/// The boolean constant `value` as an expression.
pub fn boolean(value: bool) -> Expr {
    Symbol::bool_const(value).apply(&[])
}

/// The conjunction of `args`.
pub fn boolean_and(args: &[Expr]) -> Expr {
    Symbol::connective(true).apply(args)
}

/// The disjunction of `args`.
pub fn boolean_or(args: &[Expr]) -> Expr {
    Symbol::connective(false).apply(args)
}

/// The implication from `a` to `b`.
pub fn boolean_implies(a: &Expr, b: &Expr) -> Expr {
    Symbol::implication().apply(&[a.clone(), b.clone()])
}

/// The boolean equality of `args`.
pub fn boolean_eq(args: &[Expr]) -> Expr {
    Symbol::bool_eq().apply(args)
}

/// The integer constant `value` as an expression.
pub fn integer(value: i64) -> Expr {
    Symbol::int_const(value).apply(&[])
}

/// The integer equality of `args`.
pub fn integer_eq(args: &[Expr]) -> Expr {
    Symbol::int_eq().apply(args)
}

/// The integer sum of `args`.
pub fn integer_sum(args: &[Expr]) -> Expr {
    Symbol::sum().apply(args)
}

/// The integer difference of `a` and `b`.
pub fn integer_diff(a: &Expr, b: &Expr) -> Expr {
    Symbol::difference().apply(&[a.clone(), b.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullary_valency() {
        let a = Symbol::variable(Sort::Int);
        assert!(!a.check_args(&[Sort::Int]));
        assert!(!a.check_args(&[Sort::Bool]));
        assert!(!a.check_args(&[Sort::Int, Sort::Int]));
        assert!(!a.check_args(&[Sort::Bool, Sort::Bool]));
        assert!(!a.check_args(&[Sort::Bool, Sort::Int]));
        assert!(a.check_args(&[]));
    }

    #[test]
    fn unary_valency() {
        let b = Symbol::negator(Sort::Bool);
        assert!(!b.check_args(&[Sort::Int]));
        assert!(b.check_args(&[Sort::Bool]));
        assert!(b.check_args(&[Sort::Unknown]));
        assert!(!b.check_args(&[Sort::Int, Sort::Int]));
        assert!(!b.check_args(&[Sort::Bool, Sort::Bool]));
        assert!(!b.check_args(&[]));
    }

    #[test]
    fn binary_valency() {
        let c = Symbol::difference();
        assert!(!c.check_args(&[Sort::Int]));
        assert!(!c.check_args(&[Sort::Bool]));
        assert!(c.check_args(&[Sort::Int, Sort::Int]));
        assert!(c.check_args(&[Sort::Unknown, Sort::Int]));
        assert!(c.check_args(&[Sort::Int, Sort::Unknown]));
        assert!(!c.check_args(&[Sort::Bool, Sort::Bool]));
        assert!(!c.check_args(&[Sort::Int, Sort::Int, Sort::Int]));
        assert!(!c.check_args(&[]));
    }

    #[test]
    fn multiary_valency() {
        let d = Symbol::connective(true);
        assert!(!d.check_args(&[Sort::Int]));
        assert!(d.check_args(&[Sort::Bool]));
        assert!(d.check_args(&[Sort::Unknown]));
        assert!(d.check_args(&[Sort::Bool, Sort::Bool]));
        assert!(d.check_args(&[Sort::Unknown, Sort::Bool]));
        assert!(d.check_args(&[Sort::Bool, Sort::Unknown]));
        assert!(!d.check_args(&[Sort::Bool, Sort::Int]));
        assert!(d.check_args(&[Sort::Bool, Sort::Bool, Sort::Bool]));
        assert!(d.check_args(&[Sort::Unknown, Sort::Bool, Sort::Unknown]));
        assert!(!d.check_args(&[]));
    }

    #[test]
    fn sum_is_commutative() {
        let x = Symbol::variable(Sort::Int).apply(&[]);
        assert_eq!(integer_sum(&[integer(0), x.clone()]), x);
        assert_eq!(integer_sum(&[x.clone(), integer(0)]), x);
    }

    #[test]
    fn sum_flattens_nested_applications() {
        let vars: Vec<Expr> = (0..5)
            .map(|_| Symbol::variable(Sort::Int).apply(&[]))
            .collect();
        let e = integer_sum(&[
            integer_sum(&[
                integer_sum(&[vars[3].clone(), vars[4].clone()]),
                vars[2].clone(),
            ]),
            integer_sum(&[vars[0].clone(), vars[1].clone()]),
        ]);
        assert!(matches!(e.symbol().kind(), SymbolKind::Sum));
        assert_eq!(e.args().len(), 5);
        for var in &vars {
            assert!(e.args().contains(var));
        }
    }

    #[test]
    fn sum_folds_constants() {
        assert_eq!(
            integer_sum(&[integer(-1), integer(2), integer(1)]),
            integer(2)
        );
    }

    #[test]
    fn sum_keeps_repeated_arguments() {
        let x = Symbol::variable(Sort::Int).apply(&[]);
        let e = integer_sum(&[x.clone(), x.clone()]);
        assert!(matches!(e.symbol().kind(), SymbolKind::Sum));
        assert_eq!(e.args(), &[x.clone(), x]);
    }

    #[test]
    fn variables_order_by_construction() {
        let a = Symbol::variable(Sort::Bool);
        let b = Symbol::variable(Sort::Bool);
        assert!(a < b);
        assert!(a.apply(&[]) < b.apply(&[]));
    }

    #[test]
    fn negations_order_first() {
        let a = Symbol::variable(Sort::Bool).apply(&[]);
        let b = Symbol::variable(Sort::Bool).apply(&[]);
        let e = boolean_or(&[a.clone(), b.negated()]);
        assert_eq!(e.args(), &[b.negated(), a]);
    }
}

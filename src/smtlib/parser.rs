/*!
The recursive-descent parser.

Grammar of the accepted subset:

```text
script        = { command } .
command       = '(' command-body ')' .
command-body  = assert | check-sat | declare-const | declare-fun
              | define-fun | get-model | simplify .
assert        = 'assert' term .
check-sat     = 'check-sat' .
declare-const = 'declare-const' IDENT sort .
declare-fun   = 'declare-fun' IDENT '(' { sort } ')' sort .
define-fun    = 'define-fun' IDENT '(' { '(' IDENT sort ')' } ')' sort term .
get-model     = 'get-model' .
simplify      = 'simplify' term .
sort          = 'Bool' | 'Int' .
term          = IDENT | NUMBER | '(' expr ')' .
expr          = IDENT term { term } | 'let' '(' { '(' IDENT term ')' } ')' term .
```

Recovery is panic-mode: an unexpected token is reported and the parser synchronizes on a per-production following set, so one error never aborts the script.
A missing child leaves its slot `None` --- or a [Broken](TermKind::Broken) term --- and the interpreter treats the node as a noop which produces a wrapper expression.
*/

use crate::smtlib::scanner::{Scanner, Tag};
use crate::smtlib::source::Position;
use crate::structures::sort::Sort;

/// A parsed script: the commands in order.
#[derive(Debug)]
pub struct Script {
    pub commands: Vec<Command>,
}

/// An identifier occurrence.
#[derive(Clone, Debug)]
pub struct Ident {
    pub name: String,
    pub start: Position,
    pub follow: Position,
}

/// A sort annotation; `value` is none when the sort failed to parse.
#[derive(Clone, Debug)]
pub struct SortNode {
    pub value: Option<Sort>,
    pub start: Position,
}

/// A term with its source extent.
#[derive(Debug)]
pub struct Term {
    pub start: Position,
    pub follow: Position,
    pub kind: TermKind,
}

/// The variants of a term.
#[derive(Debug)]
pub enum TermKind {
    /// A bare identifier.
    Ident(String),

    /// A decimal integer.
    Number(i64),

    /// A function application; the callee is none when it failed to parse.
    Call {
        ident: Option<Ident>,
        args: Vec<Term>,
    },

    /// A let expression over the completely-parsed bindings.
    Let {
        bindings: Vec<Binding>,
        body: Box<Term>,
    },

    /// A term which failed to parse; evaluates to a wrapper.
    Broken,
}

/// A complete let binding.
#[derive(Debug)]
pub struct Binding {
    pub ident: Ident,
    pub term: Term,
}

/// A formal argument of a function definition.
#[derive(Debug)]
pub struct SortedVar {
    pub ident: Option<Ident>,
    pub sort: SortNode,
}

/// The commands of a script.
#[derive(Debug)]
pub enum Command {
    Assert {
        term: Term,
    },
    CheckSat,
    DeclareConst {
        ident: Option<Ident>,
        sort: SortNode,
    },
    DeclareFun {
        ident: Option<Ident>,
        args: Vec<Sort>,
        sort: SortNode,
    },
    DefineFun {
        ident: Option<Ident>,
        formals: Vec<SortedVar>,
        sort: SortNode,
        term: Term,
    },
    GetModel {
        start: Position,
    },
    Simplify {
        term: Term,
    },
}

const COMMAND_BODIES: [Tag; 7] = [
    Tag::Assert,
    Tag::CheckSat,
    Tag::DeclareConst,
    Tag::DeclareFun,
    Tag::DefineFun,
    Tag::GetModel,
    Tag::Simplify,
];

const TERM_STARTS: [Tag; 3] = [Tag::Ident, Tag::Number, Tag::LeftParen];

/// The parser over one scanner.
pub struct Parser<'a> {
    scanner: Scanner<'a>,
    last_follow: Position,
}

impl<'a> Parser<'a> {
    /// A parser over `scanner`, which has its first token read.
    pub fn new(scanner: Scanner<'a>) -> Parser<'a> {
        let last_follow = scanner.start();
        Parser {
            scanner,
            last_follow,
        }
    }

    /// Parses the whole script.
    ///
    /// Commands begin at an opening parenthesis; anything else ends the script.
    pub fn script(mut self) -> Script {
        let mut commands = Vec::new();
        while self.at(&[Tag::LeftParen]).is_some() {
            if let Some(command) = self.command() {
                commands.push(command);
            }
        }
        Script { commands }
    }

    /// The current tag, if it is one of `tags`.
    fn at(&self, tags: &[Tag]) -> Option<Tag> {
        self.scanner.tag().filter(|tag| tags.contains(tag))
    }

    /// Consumes the current token.
    fn advance(&mut self) {
        self.last_follow = self.scanner.follow();
        self.scanner.read_token();
    }

    /// Reports unless the current tag is one of `tags`.
    fn expect(&mut self, tags: &[Tag]) -> Result<Tag, ()> {
        if let Some(tag) = self.at(tags) {
            return Ok(tag);
        }
        let mut labels: Vec<String> = tags.iter().map(Tag::to_string).collect();
        labels.sort();
        let description = match labels.len() {
            1 => format!("{} expected", labels[0]),
            _ => format!("any of {} expected", labels.join(", ")),
        };
        self.scanner.report(description, true);
        Err(())
    }

    /// Skips tokens until one of `tags`, or the end of the text.
    fn sync(&mut self, tags: &[Tag]) {
        while let Some(tag) = self.scanner.tag() {
            if tags.contains(&tag) {
                break;
            }
            self.scanner.read_token();
        }
    }

    fn command(&mut self) -> Option<Command> {
        // The caller checked for the parenthesis.
        self.expect(&[Tag::LeftParen]).ok()?;
        self.advance();

        let tag = match self.expect(&COMMAND_BODIES) {
            Ok(tag) => tag,
            Err(()) => {
                self.sync(&[Tag::LeftParen]);
                return None;
            }
        };

        let command = match tag {
            Tag::Assert => {
                self.advance();
                Command::Assert { term: self.term() }
            }

            Tag::CheckSat => {
                self.advance();
                Command::CheckSat
            }

            Tag::GetModel => {
                let start = self.scanner.start();
                self.advance();
                Command::GetModel { start }
            }

            Tag::Simplify => {
                self.advance();
                Command::Simplify { term: self.term() }
            }

            Tag::DeclareConst => {
                self.advance();
                let ident = self.ident();
                let sort = self.sort();
                Command::DeclareConst { ident, sort }
            }

            Tag::DeclareFun => {
                self.advance();
                let ident = self.ident();
                let args = self.sort_list();
                let sort = self.sort();
                Command::DeclareFun { ident, args, sort }
            }

            Tag::DefineFun => {
                self.advance();
                let ident = self.ident();
                let formals = self.sorted_var_list();
                let sort = self.sort();
                let term = self.term();
                Command::DefineFun {
                    ident,
                    formals,
                    sort,
                    term,
                }
            }

            _ => unreachable!("! Command dispatch over the command tags"),
        };

        match self.expect(&[Tag::RightParen]) {
            Ok(_) => self.advance(),
            Err(()) => self.sync(&[Tag::LeftParen]),
        }
        Some(command)
    }

    fn ident(&mut self) -> Option<Ident> {
        match self.expect(&[Tag::Ident]) {
            Ok(_) => {
                let ident = Ident {
                    name: self.scanner.image(),
                    start: self.scanner.start(),
                    follow: self.scanner.follow(),
                };
                self.advance();
                Some(ident)
            }
            Err(()) => {
                self.sync(&[
                    Tag::Bool,
                    Tag::Int,
                    Tag::LeftParen,
                    Tag::Ident,
                    Tag::Number,
                    Tag::RightParen,
                ]);
                None
            }
        }
    }

    fn sort(&mut self) -> SortNode {
        let start = self.scanner.start();
        match self.expect(&[Tag::Bool, Tag::Int]) {
            Ok(tag) => {
                self.advance();
                let value = match tag {
                    Tag::Bool => Sort::Bool,
                    _ => Sort::Int,
                };
                SortNode {
                    value: Some(value),
                    start,
                }
            }
            Err(()) => {
                self.sync(&[
                    Tag::RightParen,
                    Tag::LeftParen,
                    Tag::Ident,
                    Tag::Number,
                    Tag::Bool,
                    Tag::Int,
                ]);
                SortNode { value: None, start }
            }
        }
    }

    fn sort_list(&mut self) -> Vec<Sort> {
        if self.at(&[Tag::Bool, Tag::Int]).is_some() {
            self.scanner.report("sort list in '(' and ')' expected", true);
            return Vec::new();
        }
        if self.expect(&[Tag::LeftParen]).is_err() {
            self.sync(&[Tag::Bool, Tag::Int]);
            return Vec::new();
        }
        self.advance();

        let mut sorts = Vec::new();
        while let Some(tag) = self.at(&[Tag::Bool, Tag::Int]) {
            sorts.push(match tag {
                Tag::Bool => Sort::Bool,
                _ => Sort::Int,
            });
            self.advance();
        }
        match self.expect(&[Tag::RightParen]) {
            Ok(_) => self.advance(),
            Err(()) => self.sync(&[Tag::Bool, Tag::Int]),
        }
        sorts
    }

    fn sorted_var_list(&mut self) -> Vec<SortedVar> {
        if self.at(&[Tag::Bool, Tag::Int]).is_some() {
            self.scanner
                .report("list of sorted variables in '(' and ')' expected", true);
            return Vec::new();
        }
        if self.expect(&[Tag::LeftParen]).is_err() {
            self.sync(&[Tag::Bool, Tag::Int]);
            return Vec::new();
        }
        self.advance();

        let mut formals = Vec::new();

        // Tolerate a list written without the per-variable parentheses.
        let missing_parentheses = self.at(&[Tag::Ident]).is_some();
        if missing_parentheses {
            self.scanner
                .report("list of sorted variables must begin with '('", true);
            formals.push(self.sorted_var());
            match self.expect(&[Tag::RightParen]) {
                Ok(_) => self.advance(),
                Err(()) => self.sync(&[Tag::Bool, Tag::Int]),
            }
        }

        while self.at(&[Tag::LeftParen]).is_some() {
            self.advance();
            formals.push(self.sorted_var());
            match self.expect(&[Tag::RightParen]) {
                Ok(_) => self.advance(),
                Err(()) => self.sync(&[Tag::Bool, Tag::Int]),
            }
        }

        if missing_parentheses {
            self.scanner
                .report("list of sorted variables must end with ')'", true);
        } else {
            match self.expect(&[Tag::RightParen]) {
                Ok(_) => self.advance(),
                Err(()) => self.sync(&[Tag::Bool, Tag::Int]),
            }
        }
        formals
    }

    fn sorted_var(&mut self) -> SortedVar {
        SortedVar {
            ident: self.ident(),
            sort: self.sort(),
        }
    }

    fn term(&mut self) -> Term {
        let start = self.scanner.start();
        match self.expect(&TERM_STARTS) {
            Err(()) => {
                self.sync(&[Tag::LeftParen, Tag::Ident, Tag::Number, Tag::RightParen]);
                Term {
                    follow: start.clone(),
                    start,
                    kind: TermKind::Broken,
                }
            }

            Ok(Tag::Ident) => {
                let name = self.scanner.image();
                self.advance();
                Term {
                    start,
                    follow: self.last_follow.clone(),
                    kind: TermKind::Ident(name),
                }
            }

            Ok(Tag::Number) => {
                let kind = match self.scanner.image().parse::<i64>() {
                    Ok(value) => TermKind::Number(value),
                    Err(_) => {
                        self.scanner.report("number out of range", true);
                        TermKind::Broken
                    }
                };
                self.advance();
                Term {
                    start,
                    follow: self.last_follow.clone(),
                    kind,
                }
            }

            Ok(_) => {
                self.advance();
                let kind = match self.at(&[Tag::Let]).is_some() {
                    true => self.let_expr(),
                    false => self.call_expr(),
                };
                match self.expect(&[Tag::RightParen]) {
                    Ok(_) => self.advance(),
                    Err(()) => {
                        self.sync(&[Tag::LeftParen, Tag::Ident, Tag::Number, Tag::RightParen])
                    }
                }
                Term {
                    start,
                    follow: self.last_follow.clone(),
                    kind,
                }
            }
        }
    }

    fn call_expr(&mut self) -> TermKind {
        let ident = self.ident();
        if self.at(&TERM_STARTS).is_some() {
            let mut args = vec![self.term()];
            while self.at(&TERM_STARTS).is_some() {
                args.push(self.term());
            }
            TermKind::Call { ident, args }
        } else {
            self.scanner
                .report("invalid function application, arguments missing", true);
            self.sync(&[Tag::RightParen]);
            TermKind::Broken
        }
    }

    fn let_expr(&mut self) -> TermKind {
        // The caller matched 'let'.
        self.advance();
        let bindings = self.binding_list();
        let body = Box::new(self.term());
        TermKind::Let { bindings, body }
    }

    fn binding_list(&mut self) -> Vec<Binding> {
        if self.expect(&[Tag::LeftParen]).is_err() {
            self.sync(&[Tag::LeftParen, Tag::Ident, Tag::Number]);
            return Vec::new();
        }
        self.advance();

        let mut bindings = Vec::new();
        if let Some(binding) = self.binding() {
            bindings.push(binding);
        }
        while self.at(&[Tag::LeftParen]).is_some() {
            if let Some(binding) = self.binding() {
                bindings.push(binding);
            }
        }
        match self.expect(&[Tag::RightParen]) {
            Ok(_) => self.advance(),
            Err(()) => self.sync(&[Tag::LeftParen, Tag::Ident, Tag::Number]),
        }
        bindings
    }

    fn binding(&mut self) -> Option<Binding> {
        if self.expect(&[Tag::LeftParen]).is_err() {
            self.sync(&[Tag::LeftParen, Tag::RightParen]);
            return None;
        }
        self.advance();
        let ident = self.ident();
        let term = self.term();
        match self.expect(&[Tag::RightParen]) {
            Ok(_) => self.advance(),
            Err(()) => self.sync(&[Tag::LeftParen, Tag::RightParen]),
        }
        ident.map(|ident| Binding { ident, term })
    }
}

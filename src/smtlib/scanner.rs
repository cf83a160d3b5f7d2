//! The lexical scanner.
//!
//! A hand-written scanner over a [Position] cursor.
//! The scanner is a mutable object whose state holds the current position, the current token --- its [Tag] and `start`/`follow` coordinates --- and a shared [message set](MessageSet).
//!
//! Lexical rules: identifiers start with a non-digit symbol character (letters and `+-/*=%?!.$_~&^<>@`) and continue with those plus digits; numbers are decimal integers; comments begin with `;` and end at newline; whitespace is ignored; parentheses are distinct tokens.
//! An invalid character is reported and skipped.

use crate::smtlib::source::{Message, MessageSet, Position};

/// The token tags of the SMT-LIB subset.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Tag {
    LeftParen,
    RightParen,
    Ident,
    Number,
    Bool,
    Int,
    Assert,
    CheckSat,
    DeclareConst,
    DeclareFun,
    DefineFun,
    GetModel,
    Simplify,
    Let,
}

impl Tag {
    /// The surface form, for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Tag::LeftParen => "(",
            Tag::RightParen => ")",
            Tag::Ident => "identifier",
            Tag::Number => "number",
            Tag::Bool => "Bool",
            Tag::Int => "Int",
            Tag::Assert => "assert",
            Tag::CheckSat => "check-sat",
            Tag::DeclareConst => "declare-const",
            Tag::DeclareFun => "declare-fun",
            Tag::DefineFun => "define-fun",
            Tag::GetModel => "get-model",
            Tag::Simplify => "simplify",
            Tag::Let => "let",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}'", self.label())
    }
}

fn keyword(image: &str) -> Tag {
    match image {
        "Bool" => Tag::Bool,
        "Int" => Tag::Int,
        "assert" => Tag::Assert,
        "check-sat" => Tag::CheckSat,
        "declare-const" => Tag::DeclareConst,
        "declare-fun" => Tag::DeclareFun,
        "define-fun" => Tag::DefineFun,
        "get-model" => Tag::GetModel,
        "simplify" => Tag::Simplify,
        "let" => Tag::Let,
        _ => Tag::Ident,
    }
}

const SYMBOL_PUNCTUATION: &str = "+-/*=%?!.$_~&^<>@";

fn is_symbol_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || SYMBOL_PUNCTUATION.contains(ch)
}

fn is_symbol_follow(ch: char) -> bool {
    is_symbol_start(ch) || ch.is_ascii_digit()
}

/// The scanner over one source text.
pub struct Scanner<'a> {
    messages: &'a MessageSet,
    start: Option<Position>,
    follow: Position,
    tag: Option<Tag>,
}

impl<'a> Scanner<'a> {
    /// A scanner at `pos`, with the first token read.
    pub fn new(pos: Position, messages: &'a MessageSet) -> Scanner<'a> {
        let mut scanner = Scanner {
            messages,
            start: None,
            follow: pos,
            tag: None,
        };
        scanner.tag = scanner.scan();
        scanner
    }

    /// The tag of the current token, or none at the end of the text.
    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    /// The start position of the current token.
    pub fn start(&self) -> Position {
        self.start.clone().expect("! No token has been scanned")
    }

    /// The position just past the current token.
    pub fn follow(&self) -> Position {
        self.follow.clone()
    }

    /// The text of the current token.
    pub fn image(&self) -> String {
        self.start().image(&self.follow)
    }

    /// Advances to the next token.
    pub fn read_token(&mut self) {
        self.start = None;
        self.tag = self.scan();
    }

    /// Records a message at the current token's start, or at the follow position.
    pub fn report(&self, description: impl Into<String>, at_start: bool) {
        let pos = match at_start {
            true => self.start(),
            false => self.follow(),
        };
        self.messages.add(Message::new(pos, description));
    }

    fn scan(&mut self) -> Option<Tag> {
        loop {
            self.consume_while(char::is_whitespace);
            self.mark_start();
            if self.consume(|ch| ch == ';') {
                self.consume_while(|ch| ch != '\n');
            } else if self.consume(|ch| ch == '(') {
                return Some(Tag::LeftParen);
            } else if self.consume(|ch| ch == ')') {
                return Some(Tag::RightParen);
            } else if self.consume(is_symbol_start) {
                self.consume_while(is_symbol_follow);
                return Some(keyword(&self.image()));
            } else if self.consume(|ch| ch.is_ascii_digit()) {
                self.consume_while(|ch| ch.is_ascii_digit());
                return Some(Tag::Number);
            } else if self.follow.ch() == Position::EOF {
                return None;
            } else {
                self.report(format!("invalid character {:?}", self.follow.ch()), false);
                self.follow = self.follow.next();
            }
        }
    }

    fn mark_start(&mut self) {
        self.start = Some(self.follow.clone());
    }

    fn consume(&mut self, criterion: impl Fn(char) -> bool) -> bool {
        let ch = self.follow.ch();
        if ch != Position::EOF && criterion(ch) {
            self.follow = self.follow.next();
            return true;
        }
        false
    }

    fn consume_while(&mut self, criterion: impl Fn(char) -> bool) {
        while self.consume(&criterion) {}
    }
}

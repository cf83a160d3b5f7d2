/*!
Positions within source text, and the messages tied to them.

A [Position] encapsulates both the input text and coordinates within it --- offset, line, column.
It is immutable: moving along the text produces fresh positions.

A [Message] is an error description tied to a position.
Messages collect in a [MessageSet], sorted by position and deduplicated, and are printed at command boundaries in `(line, col): description` form.
*/

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::rc::Rc;

/// A named source text, shared by every position into it.
struct SourceText {
    name: String,
    chars: Vec<char>,
}

/// A location within a source text.
#[derive(Clone)]
pub struct Position {
    source: Rc<SourceText>,
    offs: usize,
    line: u32,
    col: u32,
}

impl Position {
    /// The character reported past the end of the text.
    pub const EOF: char = '\u{10FFFF}';

    /// The position at the beginning of `text` from the file `name`.
    pub fn beginning_of(name: &str, text: &str) -> Position {
        Position {
            source: Rc::new(SourceText {
                name: name.to_string(),
                chars: text.chars().collect(),
            }),
            offs: 0,
            line: 1,
            col: 1,
        }
    }

    /// The name of the file the text was loaded from.
    pub fn filename(&self) -> &str {
        &self.source.name
    }

    /// Offset in characters from the beginning of the text, starting at 0.
    pub fn offs(&self) -> usize {
        self.offs
    }

    /// Line number, starting at 1.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Column number, starting at 1.
    pub fn col(&self) -> u32 {
        self.col
    }

    /// The character at the position, or [EOF](Position::EOF) past the end.
    pub fn ch(&self) -> char {
        match self.source.chars.get(self.offs) {
            Some(ch) => *ch,
            None => Position::EOF,
        }
    }

    /// The position immediately following.
    pub fn next(&self) -> Position {
        match self.ch() {
            Position::EOF => self.clone(),
            '\n' => Position {
                source: self.source.clone(),
                offs: self.offs + 1,
                line: self.line + 1,
                col: 1,
            },
            _ => Position {
                source: self.source.clone(),
                offs: self.offs + 1,
                line: self.line,
                col: self.col + 1,
            },
        }
    }

    /// The position `n` characters along, clamped to the end of the text.
    pub fn skip(&self, n: usize) -> Position {
        let mut position = self.clone();
        for _ in 0..n {
            if position.ch() == Position::EOF {
                break;
            }
            position = position.next();
        }
        position
    }

    /// The substring from this position up to, not including, `follow`.
    pub fn image(&self, follow: &Position) -> String {
        debug_assert!(Rc::ptr_eq(&self.source, &follow.source) && self.offs <= follow.offs);
        self.source.chars[self.offs..follow.offs].iter().collect()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.filename() == other.filename() && self.offs == other.offs
    }
}

impl Eq for Position {}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.filename()
            .cmp(other.filename())
            .then_with(|| self.offs.cmp(&other.offs))
    }
}

impl std::hash::Hash for Position {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.filename().hash(state);
        self.offs.hash(state);
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.line, self.col)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.filename(), self)
    }
}

/// An error message tied to a position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    pos: Position,
    description: String,
}

impl Message {
    /// A message at `pos` with the given description.
    pub fn new(pos: Position, description: impl Into<String>) -> Message {
        Message {
            pos,
            description: description.into(),
        }
    }

    /// The position the message is tied to.
    pub fn pos(&self) -> &Position {
        &self.pos
    }

    /// The description of the message.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos
            .cmp(&other.pos)
            .then_with(|| self.description.cmp(&other.description))
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.pos, self.description)
    }
}

/// A sorted, deduplicated collection of messages.
///
/// Interior-mutable, so the scanner, parser, and interpreter share one set.
#[derive(Default)]
pub struct MessageSet {
    messages: RefCell<BTreeSet<Message>>,
}

impl MessageSet {
    /// Adds `message` to the collection.
    pub fn add(&self, message: Message) {
        self.messages.borrow_mut().insert(message);
    }

    /// Empties the collection.
    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }

    /// The count of messages.
    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    /// True if no message has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The messages, sorted, suitable for an error log.
    pub fn iter(&self) -> Vec<Message> {
        self.messages.borrow().iter().cloned().collect()
    }
}

impl std::fmt::Debug for MessageSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

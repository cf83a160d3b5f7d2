//! Generic structures, supporting the more specific parts of the library.

pub mod interning;

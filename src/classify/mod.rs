//! Heuristic field classifiers shared by every record assembler.

pub mod date;
pub mod event;
pub mod fields;
pub mod location;
pub mod text;
pub mod url_hint;

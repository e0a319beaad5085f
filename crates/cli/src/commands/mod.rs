//! One module per tool.
//!
//! Each `run` takes the parsed arguments and the writer standing in for
//! stdout, and returns what the tool produced.

pub mod fetch;
pub mod get;
pub mod merge;

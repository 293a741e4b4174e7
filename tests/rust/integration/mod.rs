//! Integration tests - aggregate schemas, SQL generation and reading wired together
//!
//! Generated SQL is checked structurally by parsing it back with sqlparser.

mod composer_tests;
mod reader_tests;

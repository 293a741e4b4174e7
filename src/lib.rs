//! Aggregate SQL - single-statement loading of aggregate object graphs
//!
//! This crate builds one SQL SELECT per aggregate query through:
//! - Property paths and YAML-backed aggregate mappings
//! - A memoizing alias registry naming every projected column and table
//! - A composer nesting the root selection inside an alias-only projection
//! - Dialect-specific rendering (PostgreSQL, ClickHouse)
//! - A reader binding identifiers and handing rows to result extractors

pub mod config;
pub mod mapping;
pub mod reader;
pub mod sql_generation;

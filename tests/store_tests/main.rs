//! Tests for the record store and its journal

mod journal_tests;
mod memory_tests;

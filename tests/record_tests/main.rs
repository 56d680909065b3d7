//! Tests for records, values, ids and client validation

mod client_tests;
mod id_tests;

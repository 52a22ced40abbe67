//! Integration tests for the sitetree content store

mod cli_contracts;
mod index_recovery;
mod index_scenarios;

//! Student Records Library
//!
//! This library provides the core functionality for the student records CLI
//! tool: the CSV codec for student and certificate records, the record store
//! abstraction, CSV import/export against a store, and CSV validation.

pub mod cli;
pub mod csv_handler;
pub mod error;
pub mod model;
pub mod store;
pub mod transfer;
pub mod validator;

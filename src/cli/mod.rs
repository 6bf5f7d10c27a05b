//! Command-line interface.
//!
//! `serve` runs the HTTP server, `migrate` manages the schema, and
//! `jobs` manages the activation email queue.

pub mod args;

pub use args::{Cli, Commands};

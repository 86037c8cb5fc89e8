//! ucumcheck: CLI orchestrator around a UCUM unit-of-measure semantics engine.
//!
//! The binary decides which operation to run (validate a unit code, convert a
//! value between units, or search the unit catalog), resolves parameters from
//! positional arguments and a property file, invokes the engine, and reports
//! the result via a categorized process exit code.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod exitcode;
pub mod resolver;
pub mod search;
pub mod util;

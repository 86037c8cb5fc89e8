//! Process exit codes reported to the caller

/// Successful termination, engine accepted all inputs
pub const OK: i32 = 0;

/// Configuration or argument error (missing, malformed, wrong count, no mode enabled)
pub const CONFIG: i32 = 1;

/// UCUM definition file missing or path invalid
pub const NODEFINITION: i32 = 2;

/// Unit code or conversion rejected as semantically invalid by the engine
pub const SEMANTIC: i32 = 3;

/// Unexpected or unclassified error
pub const UNEXPECTED: i32 = 99;

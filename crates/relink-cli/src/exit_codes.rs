pub const SUCCESS: i32 = 0;
pub const EXECUTION_ERROR: i32 = 1;
/// The pass ran but some references are still missing or corrupted.
pub const UNRESOLVED: i32 = 2;

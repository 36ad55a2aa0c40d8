// Unbounded recursion would overflow the host stack; calls past this depth
// fail with a runtime error instead.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

pub struct RuntimeConfig {
    pub max_call_depth: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            // set default values here, unless overridden via command-line
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

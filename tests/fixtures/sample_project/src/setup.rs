//! Startup helpers

// [[anchor:init]]
pub fn init() {
    // Back to [[link:entry|the entry point]].
}

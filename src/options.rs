//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Switches read on every processing call.
///
/// Missing fields take their defaults when deserialized, so a host can load
/// a partial record from its own configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingOptions {
    /// Apply the true-local-time correction. When off, the civil time passes
    /// through untouched.
    pub use_local_time: bool,
    /// Subtract an hour for dates inside a region's historical summer time.
    pub use_dst: bool,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            use_local_time: true,
            use_dst: false,
        }
    }
}

impl ProcessingOptions {
    /// Fields set in `update` replace the current ones.
    pub fn merged(self, update: OptionsUpdate) -> Self {
        Self {
            use_local_time: update.use_local_time.unwrap_or(self.use_local_time),
            use_dst: update.use_dst.unwrap_or(self.use_dst),
        }
    }
}

/// Partial [`ProcessingOptions`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsUpdate {
    pub use_local_time: Option<bool>,
    pub use_dst: Option<bool>,
}

//! Configuration types

use crate::BuildMode;
use serde::{Deserialize, Serialize};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Failure policy for constraint-batch builds.
    pub build_mode: BuildMode,
}

impl EngineConfig {
    /// Lenient configuration: drop malformed constraints and continue.
    pub fn lenient() -> Self {
        Self {
            build_mode: BuildMode::Lenient,
        }
    }

    /// Strict configuration: fail the batch on the first malformed
    /// constraint.
    pub fn strict() -> Self {
        Self {
            build_mode: BuildMode::Strict,
        }
    }
}

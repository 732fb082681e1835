//! Core configuration.

use serde::{Deserialize, Serialize};

/// Tunables for mobject construction.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Width of one action window, in frames.
    pub action_width: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self { action_width: 30.0 }
    }
}

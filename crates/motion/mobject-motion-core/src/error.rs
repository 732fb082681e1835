//! Error types for the motion core.

use thiserror::Error;

use crate::stager::StagerMode;
use mobject_api_core::PathError;

/// Failures across staging, segmentation, and retargeting. Deterministic
/// programming/configuration errors; nothing here is transient or retried.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MotionError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("object '{0}' already exists")]
    ObjectExists(String),

    #[error("property at '{0}' is not animatable")]
    UnanimatableProperty(String),

    #[error("unknown custom property '{0}'")]
    UnknownProperty(String),

    #[error("no keyframe at {time} on channel '{channel}'")]
    KeyframeNotFound { channel: String, time: f32 },

    #[error("degenerate time window [{start}, {end}]")]
    DegenerateWindow { start: f32, end: f32 },

    #[error("keyframe times are not sorted on channel '{channel}'")]
    UnsortedKeyframes { channel: String },

    #[error("operation requires stager mode {expected:?}")]
    StagerMode { expected: StagerMode },

    #[error("rig parse error: {0}")]
    Rig(String),
}

//! Channel and keyframe data model.
//!
//! A channel is one animated scalar track: the owner data-block, a rendered
//! data path, and an optional component sub-index for vector properties.
//! Points carry the full curve-shape metadata (interpolation, easing,
//! tangent handles) so a retargeted copy can reproduce the base curve.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Interpolation mode of the segment leaving a keyframe point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interpolation {
    Constant,
    Linear,
    #[default]
    Bezier,
}

/// Easing side for non-bezier interpolation modes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    #[default]
    Auto,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// Tangent-handle behavior tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HandleKind {
    Free,
    Aligned,
    Vector,
    #[default]
    Auto,
    AutoClamped,
}

/// One tangent handle, stored as an offset from its owning point.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handle {
    pub kind: HandleKind,
    /// Time offset from the owning point (negative for left handles).
    pub dt: f32,
    /// Value offset from the owning point.
    pub dv: f32,
}

impl Handle {
    pub fn new(kind: HandleKind, dt: f32, dv: f32) -> Self {
        Self { kind, dt, dv }
    }

    fn left_default() -> Self {
        Self::new(HandleKind::Auto, -1.0, 0.0)
    }

    fn right_default() -> Self {
        Self::new(HandleKind::Auto, 1.0, 0.0)
    }
}

/// One keyframe point, owned by its channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframePoint {
    /// Time in frames (arbitrary unit; must be non-decreasing per channel).
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default = "Handle::left_default")]
    pub handle_left: Handle,
    #[serde(default = "Handle::right_default")]
    pub handle_right: Handle,
}

impl KeyframePoint {
    /// New point with default bezier/auto metadata.
    pub fn new(time: f32, value: f32) -> Self {
        Self {
            time,
            value,
            interpolation: Interpolation::default(),
            easing: Easing::default(),
            handle_left: Handle::left_default(),
            handle_right: Handle::right_default(),
        }
    }

    /// The conformable metadata of this point (everything but time/value).
    pub fn meta(&self) -> KeyframeMeta {
        KeyframeMeta {
            interpolation: self.interpolation,
            easing: self.easing,
            handle_left: self.handle_left,
            handle_right: self.handle_right,
        }
    }

    /// Metadata with handle time offsets rescaled for a retargeted copy.
    /// Kinds and value offsets are copied verbatim; only `dt` stretches
    /// with the window, which preserves the tangent shape under uniform
    /// time scaling because offsets are relative to the owning point.
    pub fn scaled_meta(&self, scale: f32) -> KeyframeMeta {
        let mut meta = self.meta();
        meta.handle_left.dt *= scale;
        meta.handle_right.dt *= scale;
        meta
    }
}

/// Curve-shape metadata stamped onto an inserted keyframe.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeMeta {
    pub interpolation: Interpolation,
    pub easing: Easing,
    pub handle_left: Handle,
    pub handle_right: Handle,
}

/// Channel identity: owner data-block, rendered data path, optional
/// component sub-index for vector properties.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId {
    pub target: String,
    pub path: String,
    #[serde(default)]
    pub index: Option<u32>,
}

impl ChannelId {
    pub fn new(target: impl Into<String>, path: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            target: target.into(),
            path: path.into(),
            index,
        }
    }

    /// The channel address as the host renders it, with the component
    /// index appended when present (`location[0]`).
    pub fn address(&self) -> String {
        match self.index {
            Some(i) => format!("{}[{i}]", self.path),
            None => self.path.clone(),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.target, self.address())
    }
}

/// One animated scalar track with ordered keyframe points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub path: String,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub points: Vec<KeyframePoint>,
}

impl Channel {
    pub fn new(path: impl Into<String>, index: Option<u32>) -> Self {
        Self {
            path: path.into(),
            index,
            points: Vec::new(),
        }
    }

    pub fn id(&self, target: &str) -> ChannelId {
        ChannelId::new(target, self.path.clone(), self.index)
    }

    /// Validate the non-decreasing time invariant the segmentation scan
    /// relies on for early exit.
    pub fn validate(&self, target: &str) -> Result<(), MotionError> {
        let mut last = f32::NEG_INFINITY;
        for p in &self.points {
            if p.time < last {
                return Err(MotionError::UnsortedKeyframes {
                    channel: self.id(target).to_string(),
                });
            }
            last = p.time;
        }
        Ok(())
    }

    /// Insert a point keeping time order. A point at an existing time is
    /// replaced rather than duplicated.
    pub fn insert_point(&mut self, point: KeyframePoint) {
        match self
            .points
            .binary_search_by(|p| p.time.total_cmp(&point.time))
        {
            Ok(i) => self.points[i] = point,
            Err(i) => self.points.insert(i, point),
        }
    }

    /// Mutable point lookup by (approximate) time, for metadata stamping.
    pub fn point_at_mut(&mut self, time: f32) -> Option<&mut KeyframePoint> {
        const EPS: f32 = 1e-4;
        self.points.iter_mut().find(|p| (p.time - time).abs() <= EPS)
    }
}

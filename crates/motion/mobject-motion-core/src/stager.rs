//! Two-phase keyframe stager.
//!
//! In `Direct` mode a property change is committed immediately as a hard
//! cut: a snapshot keyframe one frame before the current time holding the
//! pre-change value, then the new value keyed at the current time. In
//! `Staging` mode changes are queued as planned start/end keyframe pairs
//! and committed later in one flush.
//!
//! Ordering contract for the consumer of `flush()`: every `Start` entry
//! must be written before any `End` entry. An `End` write mutates the live
//! property, and a `Start` capture (`value: None`) must snapshot the value
//! from before the whole batch.

use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::host::TimelineHost;
use mobject_api_core::{PropPath, Value};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagerMode {
    #[default]
    Direct,
    Staging,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlannedKind {
    Start,
    End,
}

/// One queued keyframe intent. `value: None` means "capture whatever the
/// property holds when this entry is committed".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlannedKeyframe {
    pub kind: PlannedKind,
    pub target: String,
    pub path: PropPath,
    pub value: Option<Value>,
}

/// Per-mobject staging state. Always constructed fresh; never shared
/// between instances.
#[derive(Clone, Debug, Default)]
pub struct KeyframeStager {
    mode: StagerMode,
    planned: Vec<PlannedKeyframe>,
}

impl KeyframeStager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> StagerMode {
        self.mode
    }

    pub fn is_staging(&self) -> bool {
        self.mode == StagerMode::Staging
    }

    /// `Direct -> Staging`. Idempotent.
    pub fn enter_staging(&mut self) {
        self.mode = StagerMode::Staging;
    }

    /// Queue a start/end pair for one target property. Staging mode only.
    pub fn record(
        &mut self,
        target: impl Into<String>,
        path: PropPath,
        value: Value,
    ) -> Result<(), MotionError> {
        if !self.is_staging() {
            return Err(MotionError::StagerMode {
                expected: StagerMode::Staging,
            });
        }
        let target = target.into();
        self.planned.push(PlannedKeyframe {
            kind: PlannedKind::Start,
            target: target.clone(),
            path: path.clone(),
            value: None,
        });
        self.planned.push(PlannedKeyframe {
            kind: PlannedKind::End,
            target,
            path,
            value: Some(value),
        });
        Ok(())
    }

    /// Append pre-built planned keyframes (custom properties build their
    /// own pairs). Staging mode only.
    pub fn extend(&mut self, entries: Vec<PlannedKeyframe>) -> Result<(), MotionError> {
        if !self.is_staging() {
            return Err(MotionError::StagerMode {
                expected: StagerMode::Staging,
            });
        }
        self.planned.extend(entries);
        Ok(())
    }

    /// Commit a property change right now as a hard cut. Direct mode only.
    ///
    /// The snapshot keyframe at `now - 1` pins the pre-change value so the
    /// new value does not interpolate from whatever keyframe preceded it
    /// arbitrarily far back in time.
    pub fn write_immediate(
        &self,
        host: &mut dyn TimelineHost,
        target: &str,
        path: &PropPath,
        value: &Value,
    ) -> Result<(), MotionError> {
        if self.is_staging() {
            return Err(MotionError::StagerMode {
                expected: StagerMode::Direct,
            });
        }
        let now = host.current_time();
        host.key_property(target, path, now - 1.0)?;
        host.set_value(target, path, value)?;
        host.key_property(target, path, now)
    }

    /// Drain the queue and leave staging mode unconditionally, even when
    /// the queue is empty. One-shot: a second call returns an empty list.
    pub fn flush(&mut self) -> Vec<PlannedKeyframe> {
        self.mode = StagerMode::Direct;
        std::mem::take(&mut self.planned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(addr: &str) -> PropPath {
        PropPath::parse_channel_address(addr).unwrap()
    }

    #[test]
    fn record_appends_start_then_end() {
        let mut stager = KeyframeStager::new();
        stager.enter_staging();
        stager
            .record("Hero.Body", path("location"), Value::vec3(1.0, 0.0, 0.0))
            .unwrap();
        let planned = stager.flush();
        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].kind, PlannedKind::Start);
        assert_eq!(planned[0].value, None);
        assert_eq!(planned[1].kind, PlannedKind::End);
        assert_eq!(planned[1].value, Some(Value::vec3(1.0, 0.0, 0.0)));
    }

    #[test]
    fn record_outside_staging_is_an_error() {
        let mut stager = KeyframeStager::new();
        let err = stager
            .record("Hero.Body", path("location"), Value::Float(0.0))
            .unwrap_err();
        assert_eq!(
            err,
            MotionError::StagerMode {
                expected: StagerMode::Staging
            }
        );
    }

    #[test]
    fn enter_staging_is_idempotent() {
        let mut stager = KeyframeStager::new();
        stager.enter_staging();
        stager.enter_staging();
        assert_eq!(stager.mode(), StagerMode::Staging);
    }

    #[test]
    fn flush_is_one_shot_and_resets_mode() {
        let mut stager = KeyframeStager::new();
        stager.enter_staging();
        stager
            .record("Hero.Body", path("scale"), Value::vec3(2.0, 2.0, 2.0))
            .unwrap();
        assert_eq!(stager.flush().len(), 2);
        assert_eq!(stager.mode(), StagerMode::Direct);
        assert!(stager.flush().is_empty());
        assert_eq!(stager.mode(), StagerMode::Direct);
    }

    #[test]
    fn flush_on_empty_queue_still_exits_staging() {
        let mut stager = KeyframeStager::new();
        stager.enter_staging();
        assert!(stager.flush().is_empty());
        assert_eq!(stager.mode(), StagerMode::Direct);
    }
}

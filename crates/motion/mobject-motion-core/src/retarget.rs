//! Action retargeting.
//!
//! Replays a segmented window's keyframes onto a target time window and
//! the mobject's cloned channel set. Time is remapped linearly (the map
//! sending base_start -> start and base_end -> end); curve shape survives
//! because interpolation, easing, and handle kinds are copied verbatim and
//! handle time offsets are stretched by the same scale.

use log::debug;

use crate::action::Action;
use crate::channel::{ChannelId, KeyframePoint};
use crate::error::MotionError;
use crate::host::TimelineHost;
use crate::interp::remap;
use mobject_api_core::{PropPath, Value};

impl Action {
    /// Replay this action onto `[start, end]`, writing keyframes on the
    /// prefixed clones of the base objects.
    ///
    /// Base points are taken from `[base_start, base_end]` inclusive on
    /// both ends, in ascending time order, so the emitted times are
    /// monotonic for any positive scale. Zero or negative width on either
    /// window is a configuration error.
    pub fn apply(
        &self,
        host: &mut dyn TimelineHost,
        start: f32,
        end: f32,
    ) -> Result<(), MotionError> {
        if self.base_end <= self.base_start {
            return Err(MotionError::DegenerateWindow {
                start: self.base_start,
                end: self.base_end,
            });
        }
        if end <= start {
            return Err(MotionError::DegenerateWindow { start, end });
        }
        let scale = (end - start) / (self.base_end - self.base_start);
        debug!(
            "retarget: [{}, {}] -> [{start}, {end}] (scale {scale})",
            self.base_start, self.base_end
        );

        for actor in &self.actors {
            let path = PropPath::parse_channel_address(&actor.address)?;
            let target_name = format!("{}.{}", self.prefix, actor.base.target);
            let target_id = ChannelId::new(
                target_name.clone(),
                actor.base.path.clone(),
                actor.base.index,
            );

            // Snapshot the in-window points up front; writing through the
            // host below must not alias the base channel borrow.
            let points: Vec<KeyframePoint> = host
                .channel(&actor.base)
                .ok_or_else(|| MotionError::ChannelNotFound(actor.base.to_string()))?
                .points
                .iter()
                .filter(|p| p.time >= self.base_start && p.time <= self.base_end)
                .cloned()
                .collect();

            for point in &points {
                // Establish the property's current value, then let the
                // host snapshot it into the (possibly new) target channel.
                host.set_value(&target_name, &path, &Value::Float(point.value))?;
                let new_time = remap(point.time, self.base_start, self.base_end, start, end);
                host.insert_keyframe(&target_id, new_time)?;
                host.conform_keyframe(&target_id, new_time, &point.scaled_meta(scale))?;
            }
            debug!(
                "retarget: {} key(s) onto {}",
                points.len(),
                target_id
            );
        }
        Ok(())
    }
}

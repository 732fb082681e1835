//! Stage: the playback driver.
//!
//! A stage reserves a name prefix for everything constructed inside it,
//! drives the host's time cursor, and plays animatables: each play call
//! hands every item the same `[now, now + duration]` window, then advances
//! the playhead.

use hashbrown::HashMap;

use crate::action::Action;
use crate::error::MotionError;
use crate::host::TimelineHost;
use crate::naming::PrefixRegistry;
use mobject_api_core::{PropPath, Value};

/// Anything that can commit keyframes for one playback window: a mobject
/// flushing its staged keyframes, or an action retargeting its clip.
pub trait Animation {
    fn apply_animation(
        &mut self,
        host: &mut dyn TimelineHost,
        start: f32,
        end: f32,
    ) -> Result<(), MotionError>;
}

impl Animation for Action {
    fn apply_animation(
        &mut self,
        host: &mut dyn TimelineHost,
        start: f32,
        end: f32,
    ) -> Result<(), MotionError> {
        self.apply(host, start, end)
    }
}

/// A user-placed reference point, captured from a marker object's
/// transform at collection time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    /// Location relative to the stage origin.
    pub location: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

#[derive(Debug)]
pub struct Stage {
    pub prefix: String,
    /// Global offset applied to every mobject location inside this stage.
    pub origin: [f32; 3],
    pub markers: HashMap<String, Marker>,
}

impl Stage {
    pub fn new(registry: &mut PrefixRegistry) -> Self {
        Self {
            prefix: registry.reserve("STG"),
            origin: [0.0, 0.0, 0.0],
            markers: HashMap::new(),
        }
    }

    pub fn with_origin(mut self, origin: [f32; 3]) -> Self {
        self.origin = origin;
        self
    }

    /// Play animatables over one shared window, then advance the playhead.
    pub fn play(
        &self,
        host: &mut dyn TimelineHost,
        animations: &mut [&mut dyn Animation],
        duration: f32,
    ) -> Result<(), MotionError> {
        let start = host.current_time();
        let end = start + duration;
        for anim in animations.iter_mut() {
            anim.apply_animation(host, start, end)?;
        }
        host.advance_time(duration);
        Ok(())
    }

    /// Let time pass without keying anything.
    pub fn wait(&self, host: &mut dyn TimelineHost, duration: f32) {
        host.advance_time(duration);
    }

    /// Capture markers from the named objects. A `[bracketed]` part of the
    /// object name becomes the marker key; otherwise the full name is
    /// used. Marker locations are stored relative to the stage origin.
    pub fn collect_markers(
        &mut self,
        host: &dyn TimelineHost,
        names: &[String],
    ) -> Result<(), MotionError> {
        for name in names {
            let key = marker_key(name);
            let location = read_vec3(host, name, "location")?;
            let marker = Marker {
                location: [
                    location[0] - self.origin[0],
                    location[1] - self.origin[1],
                    location[2] - self.origin[2],
                ],
                rotation: read_vec3(host, name, "rotation_euler")?,
                scale: read_vec3(host, name, "scale")?,
            };
            self.markers.insert(key, marker);
        }
        Ok(())
    }
}

fn marker_key(name: &str) -> String {
    if let (Some(open), Some(close)) = (name.find('['), name.rfind(']')) {
        if close > open + 1 {
            return name[open + 1..close].to_string();
        }
    }
    name.to_string()
}

fn read_vec3(host: &dyn TimelineHost, object: &str, attr: &str) -> Result<[f32; 3], MotionError> {
    match host.get_value(object, &PropPath::attr(attr))? {
        Value::Vec3(v) => Ok(v),
        _ => Err(MotionError::Path(mobject_api_core::PathError::TypeMismatch {
            segment: format!("{object}.{attr}"),
            expected: "vec3",
            got: "non-vec3 value",
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_key_strips_brackets() {
        assert_eq!(marker_key("Empty [spawn]"), "spawn");
        assert_eq!(marker_key("plain"), "plain");
        assert_eq!(marker_key("odd[]"), "odd[]");
    }
}

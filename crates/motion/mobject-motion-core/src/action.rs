//! Action segmentation.
//!
//! A base animation (every channel of every base object) is partitioned
//! into fixed-width windows. A channel that lands at least two keyframes
//! inside a window is an "actor" of that window: two points are the
//! minimum that carries any curve shape to replay. Windows with no actors
//! are still emitted so playback indices stay aligned with window order.
//!
//! Windows are inclusive on both ends; a point sitting exactly on the
//! boundary between windows i and i+1 counts for both.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelId};
use crate::error::MotionError;
use crate::host::TimelineHost;

/// A read-only view of one base channel inside an action window. The
/// address string carries the component index when the channel has one
/// (`location[0]`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub base: ChannelId,
    pub address: String,
}

/// One replayable clip: a base time window plus the channels active in it.
/// Immutable once constructed; cloned freely for playback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Namespace prefix of the mobject whose clones this action drives.
    pub prefix: String,
    pub base_start: f32,
    pub base_end: f32,
    pub actors: Vec<Actor>,
}

impl Action {
    pub fn has_actors(&self) -> bool {
        !self.actors.is_empty()
    }
}

/// Partition the base animation of `base_objects` into `width`-sized
/// actions. Returns an empty list when no channel has keyframes; errors on
/// a non-positive width or an unsorted channel.
pub fn generate_actions(
    host: &dyn TimelineHost,
    base_objects: &[String],
    prefix: &str,
    width: f32,
) -> Result<Vec<Action>, MotionError> {
    if width <= 0.0 {
        return Err(MotionError::DegenerateWindow {
            start: 0.0,
            end: width,
        });
    }

    // Gather every keyframed channel of the base, validating the sort
    // order the windowed scan depends on.
    let mut channels: Vec<(ChannelId, &Channel)> = Vec::new();
    for name in base_objects {
        for id in host.channels_of(name) {
            let Some(ch) = host.channel(&id) else {
                continue;
            };
            if ch.points.is_empty() {
                continue;
            }
            ch.validate(&id.target)?;
            channels.push((id, ch));
        }
    }

    if channels.is_empty() {
        debug!("segmentation: no keyframed channels under base, 0 actions");
        return Ok(Vec::new());
    }

    let mut first = f32::INFINITY;
    let mut last = f32::NEG_INFINITY;
    for (_, ch) in &channels {
        first = first.min(ch.points[0].time);
        last = last.max(ch.points[ch.points.len() - 1].time);
    }

    let window_count = ((last - first) / width).floor() as i64;
    if window_count <= 0 {
        debug!(
            "segmentation: span [{first}, {last}] shorter than window width {width}, 0 actions"
        );
        return Ok(Vec::new());
    }

    // Persistent per-channel cursors: windows are processed in increasing
    // time order and points are sorted, so each cursor only moves forward.
    let mut cursors = vec![0usize; channels.len()];
    let mut actions: Vec<Action> = Vec::with_capacity(window_count as usize);

    for i in 0..window_count {
        let start = first + width * i as f32;
        let end = start + width;
        let mut actors: Vec<Actor> = Vec::new();

        for (slot, (id, ch)) in channels.iter().enumerate() {
            let points = &ch.points;
            let cursor = &mut cursors[slot];
            while *cursor < points.len() && points[*cursor].time < start {
                *cursor += 1;
            }

            // Early exit at two in-window points; a lone point carries no
            // shape to replay.
            let mut in_window = 0u32;
            let mut probe = *cursor;
            while probe < points.len() && points[probe].time <= end {
                in_window += 1;
                if in_window >= 2 {
                    break;
                }
                probe += 1;
            }

            if in_window >= 2 {
                actors.push(Actor {
                    base: id.clone(),
                    address: id.address(),
                });
            }
        }

        debug!(
            "segmentation: window {i} [{start}, {end}] has {} actor(s)",
            actors.len()
        );
        actions.push(Action {
            prefix: prefix.to_string(),
            base_start: start,
            base_end: end,
            actors,
        });
    }

    debug!(
        "segmentation: {} action(s) over [{first}, {last}], width {width}",
        actions.len()
    );
    Ok(actions)
}

//! Timeline host interface and an in-memory reference implementation.
//!
//! The host owns the actual channel storage and the current-time cursor;
//! everything in this crate mutates the scene through this trait. Scene
//! duplication and object creation are host concerns too, so the trait
//! carries them even though this crate never walks a real scene graph.
//! All calls are serialized by the single-threaded caller.

use hashbrown::HashMap;

use crate::channel::{Channel, ChannelId, KeyframeMeta, KeyframePoint};
use crate::error::MotionError;
use mobject_api_core::graph::{resolve_get, resolve_set};
use mobject_api_core::{PropNode, PropPath, Value};

pub trait TimelineHost {
    /// Current playhead, in frames.
    fn current_time(&self) -> f32;

    fn advance_time(&mut self, duration: f32);

    fn has_object(&self, name: &str) -> bool;

    /// Create an empty object with the standard transform leaves
    /// (location, rotation_euler, scale).
    fn create_object(&mut self, name: &str) -> Result<(), MotionError>;

    /// Copy an object's property graph under a new name. Animation is not
    /// copied; clones start with clean channels.
    fn duplicate_object(&mut self, src: &str, dst: &str) -> Result<(), MotionError>;

    fn get_value(&self, object: &str, path: &PropPath) -> Result<Value, MotionError>;

    fn set_value(&mut self, object: &str, path: &PropPath, value: &Value)
        -> Result<(), MotionError>;

    /// Snapshot-keyframe every channel the path covers at `time`, one per
    /// vector component, creating channels as needed.
    fn key_property(&mut self, object: &str, path: &PropPath, time: f32)
        -> Result<(), MotionError>;

    /// Snapshot the channel's current property value into a keyframe at
    /// `time`, creating the channel if absent.
    fn insert_keyframe(&mut self, id: &ChannelId, time: f32) -> Result<(), MotionError>;

    /// Stamp curve-shape metadata onto an existing keyframe.
    fn conform_keyframe(
        &mut self,
        id: &ChannelId,
        time: f32,
        meta: &KeyframeMeta,
    ) -> Result<(), MotionError>;

    /// Identities of every channel owned by `object`.
    fn channels_of(&self, object: &str) -> Vec<ChannelId>;

    fn channel(&self, id: &ChannelId) -> Option<&Channel>;
}

/// One named data-block: a property graph plus its animation channels.
#[derive(Clone, Debug)]
pub struct SceneObject {
    pub root: PropNode,
    pub channels: Vec<Channel>,
}

/// In-memory timeline host used by tests and as the reference
/// implementation of the interface contract.
#[derive(Clone, Debug, Default)]
pub struct MemoryTimeline {
    objects: HashMap<String, SceneObject>,
    time: f32,
}

fn transform_graph() -> PropNode {
    PropNode::object()
        .with_field("location", PropNode::leaf(Value::Vec3([0.0, 0.0, 0.0])))
        .with_field(
            "rotation_euler",
            PropNode::leaf(Value::Vec3([0.0, 0.0, 0.0])),
        )
        .with_field("scale", PropNode::leaf(Value::Vec3([1.0, 1.0, 1.0])))
}

impl MemoryTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an object with an explicit property graph (loader/tests).
    pub fn add_object(&mut self, name: impl Into<String>, root: PropNode) {
        self.objects.insert(
            name.into(),
            SceneObject {
                root,
                channels: Vec::new(),
            },
        );
    }

    /// Install an authored channel on an existing object (loader/tests).
    pub fn add_channel(&mut self, object: &str, channel: Channel) -> Result<(), MotionError> {
        let obj = self
            .objects
            .get_mut(object)
            .ok_or_else(|| MotionError::ObjectNotFound(object.to_string()))?;
        obj.channels.push(channel);
        Ok(())
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.get(name)
    }

    fn object_ref(&self, name: &str) -> Result<&SceneObject, MotionError> {
        self.objects
            .get(name)
            .ok_or_else(|| MotionError::ObjectNotFound(name.to_string()))
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut SceneObject, MotionError> {
        self.objects
            .get_mut(name)
            .ok_or_else(|| MotionError::ObjectNotFound(name.to_string()))
    }

    /// Channel identities the path expands to: one per vector component,
    /// or a single id for scalars and trailing-component paths.
    fn channel_ids_for_path(
        &self,
        object: &str,
        path: &PropPath,
    ) -> Result<Vec<ChannelId>, MotionError> {
        let obj = self.object_ref(object)?;

        // `location[1]` keys a single component of a vector leaf.
        let (base, component) = path.component_split();
        if let Some(i) = component {
            if let Ok(v) = resolve_get(&obj.root, &base) {
                if v.component_count().is_some_and(|n| n > 1) {
                    return Ok(vec![ChannelId::new(
                        object,
                        base.to_channel_address(),
                        Some(i),
                    )]);
                }
            }
        }

        let value = resolve_get(&obj.root, path)?;
        match value.component_count() {
            None => Err(MotionError::UnanimatableProperty(format!(
                "{object}:{}",
                path.to_channel_address()
            ))),
            Some(1) => Ok(vec![ChannelId::new(object, path.to_channel_address(), None)]),
            Some(n) => Ok((0..n)
                .map(|i| ChannelId::new(object, path.to_channel_address(), Some(i)))
                .collect()),
        }
    }

    fn full_path(id: &ChannelId) -> Result<PropPath, MotionError> {
        let path = PropPath::parse_channel_address(&id.path)?;
        Ok(match id.index {
            Some(i) => path.with_element(i as usize),
            None => path,
        })
    }
}

impl TimelineHost for MemoryTimeline {
    fn current_time(&self) -> f32 {
        self.time
    }

    fn advance_time(&mut self, duration: f32) {
        self.time += duration;
    }

    fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    fn create_object(&mut self, name: &str) -> Result<(), MotionError> {
        if self.objects.contains_key(name) {
            return Err(MotionError::ObjectExists(name.to_string()));
        }
        self.add_object(name, transform_graph());
        Ok(())
    }

    fn duplicate_object(&mut self, src: &str, dst: &str) -> Result<(), MotionError> {
        if self.objects.contains_key(dst) {
            return Err(MotionError::ObjectExists(dst.to_string()));
        }
        let root = self.object_ref(src)?.root.clone();
        self.add_object(dst, root);
        Ok(())
    }

    fn get_value(&self, object: &str, path: &PropPath) -> Result<Value, MotionError> {
        let obj = self.object_ref(object)?;
        Ok(resolve_get(&obj.root, path)?)
    }

    fn set_value(
        &mut self,
        object: &str,
        path: &PropPath,
        value: &Value,
    ) -> Result<(), MotionError> {
        let obj = self.object_mut(object)?;
        Ok(resolve_set(&mut obj.root, path, value)?)
    }

    fn key_property(
        &mut self,
        object: &str,
        path: &PropPath,
        time: f32,
    ) -> Result<(), MotionError> {
        for id in self.channel_ids_for_path(object, path)? {
            self.insert_keyframe(&id, time)?;
        }
        Ok(())
    }

    fn insert_keyframe(&mut self, id: &ChannelId, time: f32) -> Result<(), MotionError> {
        let path = Self::full_path(id)?;
        let snapshot = {
            let obj = self.object_ref(&id.target)?;
            let value = resolve_get(&obj.root, &path)?;
            value
                .component(None)
                .ok_or_else(|| MotionError::UnanimatableProperty(id.to_string()))?
        };

        let obj = self.object_mut(&id.target)?;
        let pos = obj
            .channels
            .iter()
            .position(|c| c.path == id.path && c.index == id.index);
        let pos = match pos {
            Some(p) => p,
            None => {
                obj.channels.push(Channel::new(id.path.clone(), id.index));
                obj.channels.len() - 1
            }
        };
        obj.channels[pos].insert_point(KeyframePoint::new(time, snapshot));
        Ok(())
    }

    fn conform_keyframe(
        &mut self,
        id: &ChannelId,
        time: f32,
        meta: &KeyframeMeta,
    ) -> Result<(), MotionError> {
        let channel_name = id.to_string();
        let obj = self.object_mut(&id.target)?;
        let ch = obj
            .channels
            .iter_mut()
            .find(|c| c.path == id.path && c.index == id.index)
            .ok_or(MotionError::ChannelNotFound(channel_name.clone()))?;
        let point = ch
            .point_at_mut(time)
            .ok_or(MotionError::KeyframeNotFound {
                channel: channel_name,
                time,
            })?;
        point.interpolation = meta.interpolation;
        point.easing = meta.easing;
        point.handle_left = meta.handle_left;
        point.handle_right = meta.handle_right;
        Ok(())
    }

    fn channels_of(&self, object: &str) -> Vec<ChannelId> {
        match self.objects.get(object) {
            Some(obj) => obj.channels.iter().map(|c| c.id(object)).collect(),
            None => Vec::new(),
        }
    }

    fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.objects
            .get(&id.target)?
            .channels
            .iter()
            .find(|c| c.path == id.path && c.index == id.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(addr: &str) -> PropPath {
        PropPath::parse_channel_address(addr).unwrap()
    }

    fn host_with_cube() -> MemoryTimeline {
        let mut host = MemoryTimeline::new();
        host.create_object("Cube").unwrap();
        host
    }

    #[test]
    fn key_property_fans_out_per_component() {
        let mut host = host_with_cube();
        host.key_property("Cube", &path("location"), 0.0).unwrap();
        let ids = host.channels_of("Cube");
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.path == "location"));
        assert_eq!(
            ids.iter().map(|id| id.index).collect::<Vec<_>>(),
            vec![Some(0), Some(1), Some(2)]
        );
    }

    #[test]
    fn key_property_single_component_path() {
        let mut host = host_with_cube();
        host.set_value("Cube", &path("location"), &Value::vec3(4.0, 5.0, 6.0))
            .unwrap();
        host.key_property("Cube", &path("location[1]"), 10.0).unwrap();
        let ids = host.channels_of("Cube");
        assert_eq!(ids.len(), 1);
        assert_eq!(ids[0].index, Some(1));
        let ch = host.channel(&ids[0]).unwrap();
        assert_eq!(ch.points.len(), 1);
        assert_eq!(ch.points[0].value, 5.0);
    }

    #[test]
    fn insert_keyframe_snapshots_current_value() {
        let mut host = host_with_cube();
        let id = ChannelId::new("Cube", "location", Some(0));
        host.set_value("Cube", &path("location[0]"), &Value::Float(2.0))
            .unwrap();
        host.insert_keyframe(&id, 1.0).unwrap();
        host.set_value("Cube", &path("location[0]"), &Value::Float(7.0))
            .unwrap();
        host.insert_keyframe(&id, 5.0).unwrap();

        let ch = host.channel(&id).unwrap();
        let snap: Vec<(f32, f32)> = ch.points.iter().map(|p| (p.time, p.value)).collect();
        assert_eq!(snap, vec![(1.0, 2.0), (5.0, 7.0)]);
    }

    #[test]
    fn conform_stamps_metadata() {
        use crate::channel::{Handle, HandleKind, Interpolation};
        let mut host = host_with_cube();
        let id = ChannelId::new("Cube", "location", Some(2));
        host.insert_keyframe(&id, 3.0).unwrap();
        let meta = KeyframeMeta {
            interpolation: Interpolation::Linear,
            easing: crate::channel::Easing::EaseOut,
            handle_left: Handle::new(HandleKind::Vector, -2.0, 0.1),
            handle_right: Handle::new(HandleKind::Vector, 2.0, -0.1),
        };
        host.conform_keyframe(&id, 3.0, &meta).unwrap();
        let p = &host.channel(&id).unwrap().points[0];
        assert_eq!(p.interpolation, Interpolation::Linear);
        assert_eq!(p.handle_right.dt, 2.0);

        let missing = host.conform_keyframe(&id, 99.0, &meta).unwrap_err();
        assert!(matches!(missing, MotionError::KeyframeNotFound { .. }));
    }

    #[test]
    fn duplicate_copies_graph_but_not_channels() {
        let mut host = host_with_cube();
        host.set_value("Cube", &path("scale"), &Value::vec3(2.0, 2.0, 2.0))
            .unwrap();
        host.key_property("Cube", &path("scale"), 0.0).unwrap();
        host.duplicate_object("Cube", "M00.Cube").unwrap();

        assert_eq!(
            host.get_value("M00.Cube", &path("scale")).unwrap(),
            Value::vec3(2.0, 2.0, 2.0)
        );
        assert!(host.channels_of("M00.Cube").is_empty());
        assert!(!host.channels_of("Cube").is_empty());
    }

    #[test]
    fn text_properties_are_unanimatable() {
        let mut host = MemoryTimeline::new();
        host.add_object(
            "Note",
            PropNode::object().with_field("label", PropNode::leaf(Value::Text("hi".into()))),
        );
        let err = host.key_property("Note", &path("label"), 0.0).unwrap_err();
        assert!(matches!(err, MotionError::UnanimatableProperty(_)));
    }
}

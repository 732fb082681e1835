//! Mobject: the scripted scene object.
//!
//! Construction reserves a unique name prefix, clones the base objects
//! under it, and segments the base animation into replayable actions.
//! Motion methods either write immediately (hard cut at the playhead) or
//! stage start/end keyframe pairs when animate mode is on; `Stage::play`
//! commits staged pairs through `apply_animation`.

use hashbrown::HashMap;
use log::debug;

use crate::action::{generate_actions, Action};
use crate::config::Config;
use crate::error::MotionError;
use crate::host::TimelineHost;
use crate::interp::DomainRangeMap;
use crate::naming::PrefixRegistry;
use crate::stage::{Animation, Stage};
use crate::stager::{KeyframeStager, PlannedKeyframe, PlannedKind};
use mobject_api_core::{PropPath, Value};

/// User-defined mobject property. Implementations translate one scalar
/// into concrete property writes under the mobject's prefix, either as
/// planned keyframe pairs (animate mode) or immediate host writes.
pub trait CustomProperty: std::fmt::Debug {
    /// Whether the property may be staged in animate mode.
    fn is_animatable(&self) -> bool {
        true
    }

    /// Build the start/end keyframe pairs for one value change.
    fn plan(&self, prefix: &str, value: f32) -> Result<Vec<PlannedKeyframe>, MotionError>;

    /// Commit one value change immediately (hard cut at the playhead).
    fn apply(
        &self,
        host: &mut dyn TimelineHost,
        prefix: &str,
        value: f32,
    ) -> Result<(), MotionError>;
}

/// One target of a mapped custom property.
#[derive(Clone, Debug)]
pub struct PropertyBinding {
    /// Base object name, prefixed at write time.
    pub object: String,
    pub path: PropPath,
    /// Optional domain/range remap applied to the incoming value.
    pub map: Option<DomainRangeMap>,
}

/// Custom property fanning one scalar out to a list of bound paths,
/// each through its own optional domain/range map.
#[derive(Clone, Debug)]
pub struct MappedProperty {
    bindings: Vec<PropertyBinding>,
    animatable: bool,
}

impl MappedProperty {
    pub fn new(bindings: Vec<PropertyBinding>) -> Self {
        Self {
            bindings,
            animatable: true,
        }
    }

    /// Mark the property as non-stageable; animating it is an error.
    pub fn unanimatable(mut self) -> Self {
        self.animatable = false;
        self
    }
}

impl CustomProperty for MappedProperty {
    fn is_animatable(&self) -> bool {
        self.animatable
    }

    fn plan(&self, prefix: &str, value: f32) -> Result<Vec<PlannedKeyframe>, MotionError> {
        let mut planned = Vec::with_capacity(self.bindings.len() * 2);
        for binding in &self.bindings {
            let x = binding.map.map_or(value, |m| m.apply(value));
            let target = format!("{prefix}.{}", binding.object);
            planned.push(PlannedKeyframe {
                kind: PlannedKind::Start,
                target: target.clone(),
                path: binding.path.clone(),
                value: None,
            });
            planned.push(PlannedKeyframe {
                kind: PlannedKind::End,
                target,
                path: binding.path.clone(),
                value: Some(Value::Float(x)),
            });
        }
        Ok(planned)
    }

    fn apply(
        &self,
        host: &mut dyn TimelineHost,
        prefix: &str,
        value: f32,
    ) -> Result<(), MotionError> {
        let now = host.current_time();
        for binding in &self.bindings {
            let x = binding.map.map_or(value, |m| m.apply(value));
            let target = format!("{prefix}.{}", binding.object);
            host.key_property(&target, &binding.path, now - 1.0)?;
            host.set_value(&target, &binding.path, &Value::Float(x))?;
            host.key_property(&target, &binding.path, now)?;
        }
        Ok(())
    }
}

/// Standard mobject: prefixed clones of a base, pre-segmented actions, and
/// a per-instance keyframe stager (always constructed fresh here; staging
/// state is never shared between instances).
#[derive(Debug)]
pub struct Mobject {
    prefix: String,
    origin_object: String,
    stage_origin: [f32; 3],
    base_objects: Vec<String>,
    actions: Vec<Action>,
    stager: KeyframeStager,
    custom_properties: HashMap<String, Box<dyn CustomProperty>>,
}

impl Mobject {
    /// Create a mobject inside `stage` from the given base objects. The
    /// base keeps its authored animation; clones start clean and are
    /// driven by retargeted actions and motion calls.
    pub fn new(
        host: &mut dyn TimelineHost,
        registry: &mut PrefixRegistry,
        stage: &Stage,
        base_objects: &[String],
        location: [f32; 3],
        config: &Config,
    ) -> Result<Self, MotionError> {
        let prefix = registry.reserve(&format!("{}.MOB", stage.prefix));
        let origin_object = format!("{prefix}.");
        host.create_object(&origin_object)?;
        for name in base_objects {
            host.duplicate_object(name, &format!("{prefix}.{name}"))?;
        }

        let actions = generate_actions(host, base_objects, &prefix, config.action_width)?;
        debug!(
            "mobject {prefix}: {} base object(s), {} action(s)",
            base_objects.len(),
            actions.len()
        );

        let mobject = Self {
            prefix,
            origin_object: origin_object.clone(),
            stage_origin: stage.origin,
            base_objects: base_objects.to_vec(),
            actions,
            stager: KeyframeStager::new(),
            custom_properties: HashMap::new(),
        };
        host.set_value(
            &origin_object,
            &PropPath::attr("location"),
            &Value::Vec3(add3(location, stage.origin)),
        )?;
        Ok(mobject)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the origin object the transform methods drive.
    pub fn origin_object(&self) -> &str {
        &self.origin_object
    }

    pub fn base_objects(&self) -> &[String] {
        &self.base_objects
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Clone of one pre-segmented action, ready to hand to `Stage::play`.
    pub fn action(&self, index: usize) -> Option<Action> {
        self.actions.get(index).cloned()
    }

    /// Enter animate mode: subsequent motion calls stage keyframe pairs
    /// instead of writing through to the host.
    pub fn animate(&mut self) -> &mut Self {
        self.stager.enter_staging();
        self
    }

    pub fn is_animating(&self) -> bool {
        self.stager.is_staging()
    }

    /// Drain staged keyframes and leave animate mode. `Stage::play` calls
    /// this through `apply_animation`; scripts rarely need it directly.
    pub fn flush_planned_keyframes(&mut self) -> Vec<PlannedKeyframe> {
        self.stager.flush()
    }

    /// Move the origin to `location` (stage-relative).
    pub fn move_to(
        &mut self,
        host: &mut dyn TimelineHost,
        location: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        let v = Value::Vec3(add3(location, self.stage_origin));
        self.set_prop(host, "", &PropPath::attr("location"), v)
    }

    /// Translate the origin by `offset`.
    pub fn shift(
        &mut self,
        host: &mut dyn TimelineHost,
        offset: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        let current = self.read_origin_vec3(host, "location")?;
        let v = Value::Vec3(add3(current, offset));
        self.set_prop(host, "", &PropPath::attr("location"), v)
    }

    /// Replace the origin rotation (euler).
    pub fn set_rotation(
        &mut self,
        host: &mut dyn TimelineHost,
        rotation_euler: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        self.set_prop(
            host,
            "",
            &PropPath::attr("rotation_euler"),
            Value::Vec3(rotation_euler),
        )
    }

    /// Add `rotation_euler` to the current rotation.
    pub fn rotate(
        &mut self,
        host: &mut dyn TimelineHost,
        rotation_euler: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        let current = self.read_origin_vec3(host, "rotation_euler")?;
        self.set_rotation(host, add3(current, rotation_euler))
    }

    /// Replace the origin scale.
    pub fn set_scale(
        &mut self,
        host: &mut dyn TimelineHost,
        scale: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        self.set_prop(host, "", &PropPath::attr("scale"), Value::Vec3(scale))
    }

    /// Multiply the current scale componentwise.
    pub fn scale(
        &mut self,
        host: &mut dyn TimelineHost,
        factor: [f32; 3],
    ) -> Result<&mut Self, MotionError> {
        let current = self.read_origin_vec3(host, "scale")?;
        self.set_scale(host, mul3(current, factor))
    }

    /// Set a property on one of the prefixed clones (`obj_name` is the
    /// base object's name; empty addresses the origin). Stages a keyframe
    /// pair in animate mode, otherwise commits a hard cut immediately.
    pub fn set_prop(
        &mut self,
        host: &mut dyn TimelineHost,
        obj_name: &str,
        path: &PropPath,
        value: Value,
    ) -> Result<&mut Self, MotionError> {
        let target = format!("{}.{}", self.prefix, obj_name);
        if self.stager.is_staging() {
            self.stager.record(target, path.clone(), value)?;
        } else {
            self.stager.write_immediate(host, &target, path, &value)?;
        }
        Ok(self)
    }

    /// Register a user-defined property under `name`.
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        property: Box<dyn CustomProperty>,
    ) -> &mut Self {
        self.custom_properties.insert(name.into(), property);
        self
    }

    /// Change a user-defined property. In animate mode the property must
    /// be animatable and its keyframe pairs join the staged queue.
    pub fn customize(
        &mut self,
        host: &mut dyn TimelineHost,
        name: &str,
        value: f32,
    ) -> Result<&mut Self, MotionError> {
        let property = self
            .custom_properties
            .get(name)
            .ok_or_else(|| MotionError::UnknownProperty(name.to_string()))?;
        if self.stager.is_staging() {
            if !property.is_animatable() {
                return Err(MotionError::UnanimatableProperty(name.to_string()));
            }
            let planned = property.plan(&self.prefix, value)?;
            self.stager.extend(planned)?;
        } else {
            property.apply(host, &self.prefix, value)?;
        }
        Ok(self)
    }

    fn read_origin_vec3(
        &self,
        host: &dyn TimelineHost,
        attr: &str,
    ) -> Result<[f32; 3], MotionError> {
        match host.get_value(&self.origin_object, &PropPath::attr(attr))? {
            Value::Vec3(v) => Ok(v),
            _ => Err(MotionError::Path(
                mobject_api_core::PathError::TypeMismatch {
                    segment: format!("{}.{attr}", self.origin_object),
                    expected: "vec3",
                    got: "non-vec3 value",
                },
            )),
        }
    }
}

impl Animation for Mobject {
    /// Commit staged keyframes for one playback window. All `Start`
    /// entries are written before any `End` entry: an `End` write mutates
    /// the live property, and every `Start` capture must snapshot the
    /// value from before the batch.
    fn apply_animation(
        &mut self,
        host: &mut dyn TimelineHost,
        start: f32,
        end: f32,
    ) -> Result<(), MotionError> {
        let planned = self.stager.flush();
        for kind in [PlannedKind::Start, PlannedKind::End] {
            let frame = match kind {
                PlannedKind::Start => start,
                PlannedKind::End => end,
            };
            for keyframe in planned.iter().filter(|k| k.kind == kind) {
                if let Some(value) = &keyframe.value {
                    host.set_value(&keyframe.target, &keyframe.path, value)?;
                }
                host.key_property(&keyframe.target, &keyframe.path, frame)?;
            }
        }
        Ok(())
    }
}

fn add3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn mul3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

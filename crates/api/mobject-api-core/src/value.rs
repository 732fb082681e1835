//! Value: runtime property values addressed by PropPath.
//! All numeric components are f32; channels animate one component at a time.

use serde::{Deserialize, Serialize};

/// Lightweight kind enum for pattern-matching and quick dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Bool,
    Text,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector (locations, euler rotations, scales)
    Vec3([f32; 3]),

    /// 4D vector
    Vec4([f32; 4]),

    /// Boolean; animates as 0.0/1.0
    Bool(bool),

    /// Text / string; never animatable
    Text(String),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Number of animatable scalar components, or None for Text.
    pub fn component_count(&self) -> Option<u32> {
        match self {
            Value::Float(_) | Value::Bool(_) => Some(1),
            Value::Vec2(_) => Some(2),
            Value::Vec3(_) => Some(3),
            Value::Vec4(_) => Some(4),
            Value::Text(_) => None,
        }
    }

    /// The scalar view a channel animates. Float/Bool take `index == None`;
    /// vector kinds take `Some(i)` with `i` in range.
    pub fn component(&self, index: Option<u32>) -> Option<f32> {
        match (self, index) {
            (Value::Float(v), None) => Some(*v),
            (Value::Bool(b), None) => Some(if *b { 1.0 } else { 0.0 }),
            (Value::Vec2(a), Some(i)) => a.get(i as usize).copied(),
            (Value::Vec3(a), Some(i)) => a.get(i as usize).copied(),
            (Value::Vec4(a), Some(i)) => a.get(i as usize).copied(),
            _ => None,
        }
    }

    /// Write one scalar component back. Mirrors `component`.
    pub fn set_component(&mut self, index: Option<u32>, v: f32) -> bool {
        match (self, index) {
            (Value::Float(f), None) => {
                *f = v;
                true
            }
            (Value::Bool(b), None) => {
                *b = v != 0.0;
                true
            }
            (Value::Vec2(a), Some(i)) => write_at(a, i, v),
            (Value::Vec3(a), Some(i)) => write_at(a, i, v),
            (Value::Vec4(a), Some(i)) => write_at(a, i, v),
            _ => false,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }
}

fn write_at(arr: &mut [f32], index: u32, v: f32) -> bool {
    match arr.get_mut(index as usize) {
        Some(slot) => {
            *slot = v;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_access() {
        assert_eq!(Value::Float(2.5).component(None), Some(2.5));
        assert_eq!(Value::vec3(1.0, 2.0, 3.0).component(Some(1)), Some(2.0));
        assert_eq!(Value::vec3(1.0, 2.0, 3.0).component(Some(3)), None);
        assert_eq!(Value::Bool(true).component(None), Some(1.0));
        assert_eq!(Value::Text("x".into()).component(None), None);
    }

    #[test]
    fn component_write() {
        let mut v = Value::vec3(0.0, 0.0, 0.0);
        assert!(v.set_component(Some(2), 9.0));
        assert_eq!(v, Value::vec3(0.0, 0.0, 9.0));
        assert!(!v.set_component(None, 1.0));
    }
}

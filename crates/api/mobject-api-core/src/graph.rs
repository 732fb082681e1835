//! Nested property graph walked by PropPath.
//!
//! The graph is the engine-agnostic stand-in for a host datablock: objects
//! hold named fields, arrays hold ordered children, leaves hold values.
//! Attribute segments and string-keyed brackets both resolve inside
//! `Object`; a positional bracket resolves inside `Array`, or - as the
//! final segment only - addresses one component of a vector leaf.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::PathError;
use crate::prop_path::{IndexKey, PathSeg, PropPath};
use crate::value::Value;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PropNode {
    Leaf(Value),
    Array(Vec<PropNode>),
    Object(HashMap<String, PropNode>),
}

impl PropNode {
    /// Empty object node.
    pub fn object() -> Self {
        PropNode::Object(HashMap::new())
    }

    pub fn leaf(value: Value) -> Self {
        PropNode::Leaf(value)
    }

    /// Insert a named field, for building graphs in hosts and tests.
    pub fn with_field(mut self, name: impl Into<String>, node: PropNode) -> Self {
        if let PropNode::Object(map) = &mut self {
            map.insert(name.into(), node);
        }
        self
    }

    fn kind_name(&self) -> &'static str {
        match self {
            PropNode::Leaf(v) => match v.kind() {
                crate::value::ValueKind::Float => "float leaf",
                crate::value::ValueKind::Vec2 => "vec2 leaf",
                crate::value::ValueKind::Vec3 => "vec3 leaf",
                crate::value::ValueKind::Vec4 => "vec4 leaf",
                crate::value::ValueKind::Bool => "bool leaf",
                crate::value::ValueKind::Text => "text leaf",
            },
            PropNode::Array(_) => "array",
            PropNode::Object(_) => "object",
        }
    }

    fn child(&self, seg: &PathSeg) -> Result<&PropNode, PathError> {
        match (self, seg) {
            (PropNode::Object(map), PathSeg::Attr(name)) => {
                map.get(name).ok_or_else(|| PathError::UnknownAttribute {
                    name: name.clone(),
                })
            }
            (PropNode::Object(map), PathSeg::Index(IndexKey::Name(key))) => {
                map.get(key).ok_or_else(|| PathError::UnknownKey { key: key.clone() })
            }
            (PropNode::Array(items), PathSeg::Index(IndexKey::Element(i))) => {
                items.get(*i).ok_or(PathError::IndexOutOfRange {
                    index: *i,
                    len: items.len(),
                })
            }
            (node, seg) => Err(PathError::NotAContainer {
                segment: format!("{} ({})", seg_name(seg), node.kind_name()),
            }),
        }
    }

    fn child_mut(&mut self, seg: &PathSeg) -> Result<&mut PropNode, PathError> {
        match (self, seg) {
            (PropNode::Object(map), PathSeg::Attr(name)) => {
                map.get_mut(name).ok_or_else(|| PathError::UnknownAttribute {
                    name: name.clone(),
                })
            }
            (PropNode::Object(map), PathSeg::Index(IndexKey::Name(key))) => map
                .get_mut(key)
                .ok_or_else(|| PathError::UnknownKey { key: key.clone() }),
            (PropNode::Array(items), PathSeg::Index(IndexKey::Element(i))) => {
                let len = items.len();
                items
                    .get_mut(*i)
                    .ok_or(PathError::IndexOutOfRange { index: *i, len })
            }
            (node, seg) => Err(PathError::NotAContainer {
                segment: format!("{} ({})", seg_name(seg), node.kind_name()),
            }),
        }
    }
}

fn seg_name(seg: &PathSeg) -> String {
    match seg {
        PathSeg::Attr(name) => name.clone(),
        PathSeg::Index(IndexKey::Name(key)) => format!("[\"{key}\"]"),
        PathSeg::Index(IndexKey::Element(i)) => format!("[{i}]"),
    }
}

/// Component index of a trailing `Element` over a vector leaf, if that is
/// what `leaf`+`seg` describe.
fn leaf_component(leaf: &Value, seg: &PathSeg) -> Option<usize> {
    match (leaf.component_count(), seg) {
        (Some(n), PathSeg::Index(IndexKey::Element(i))) if n > 1 && (*i as u32) < n => Some(*i),
        _ => None,
    }
}

/// Walk `path` from `root` and read the addressed value. A trailing
/// positional index over a vector leaf yields the single component as a
/// `Float`.
pub fn resolve_get(root: &PropNode, path: &PropPath) -> Result<Value, PathError> {
    let segs = path.segments();
    let mut node = root;
    for (i, seg) in segs.iter().enumerate() {
        let last = i + 1 == segs.len();
        if last {
            if let PropNode::Leaf(v) = node {
                if let Some(c) = leaf_component(v, seg) {
                    return Ok(Value::Float(
                        v.component(Some(c as u32)).unwrap_or_default(),
                    ));
                }
            }
        }
        node = node.child(seg)?;
    }
    match node {
        PropNode::Leaf(v) => Ok(v.clone()),
        other => Err(PathError::NotAContainer {
            segment: format!("<terminal> ({})", other.kind_name()),
        }),
    }
}

/// Identical traversal to `resolve_get`, but the final segment assigns.
/// Assigning a `Float` through a trailing positional index writes one
/// component of a vector leaf; otherwise the leaf value is replaced and
/// must keep its kind.
pub fn resolve_set(root: &mut PropNode, path: &PropPath, value: &Value) -> Result<(), PathError> {
    let segs = path.segments();
    let (last, prefix) = segs.split_last().ok_or(PathError::Empty)?;

    let mut node = root;
    for seg in prefix {
        node = node.child_mut(seg)?;
    }

    // Trailing component write into a vector leaf.
    if let PropNode::Leaf(v) = node {
        if let Some(c) = leaf_component(v, last) {
            return match value {
                Value::Float(f) => {
                    v.set_component(Some(c as u32), *f);
                    Ok(())
                }
                other => Err(PathError::TypeMismatch {
                    segment: seg_name(last),
                    expected: "float component",
                    got: kind_str(other),
                }),
            };
        }
    }

    let slot = node.child_mut(last)?;
    match slot {
        PropNode::Leaf(current) => {
            if current.kind() != value.kind() {
                return Err(PathError::TypeMismatch {
                    segment: seg_name(last),
                    expected: kind_str(current),
                    got: kind_str(value),
                });
            }
            *current = value.clone();
            Ok(())
        }
        other => Err(PathError::NotAContainer {
            segment: format!("{} ({})", seg_name(last), other.kind_name()),
        }),
    }
}

fn kind_str(v: &Value) -> &'static str {
    match v.kind() {
        crate::value::ValueKind::Float => "float",
        crate::value::ValueKind::Vec2 => "vec2",
        crate::value::ValueKind::Vec3 => "vec3",
        crate::value::ValueKind::Vec4 => "vec4",
        crate::value::ValueKind::Bool => "bool",
        crate::value::ValueKind::Text => "text",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> PropNode {
        let array_mod = PropNode::object()
            .with_field("count", PropNode::leaf(Value::Float(3.0)))
            .with_field("use_merge", PropNode::leaf(Value::Bool(false)));
        PropNode::object()
            .with_field("location", PropNode::leaf(Value::vec3(1.0, 2.0, 3.0)))
            .with_field(
                "modifiers",
                PropNode::object().with_field("Array", array_mod),
            )
            .with_field(
                "points",
                PropNode::Array(vec![
                    PropNode::leaf(Value::Float(0.5)),
                    PropNode::leaf(Value::Float(0.7)),
                ]),
            )
    }

    fn path(addr: &str) -> PropPath {
        PropPath::parse_channel_address(addr).unwrap()
    }

    #[test]
    fn get_through_attrs_and_keys() {
        let g = sample_graph();
        assert_eq!(
            resolve_get(&g, &path("location")).unwrap(),
            Value::vec3(1.0, 2.0, 3.0)
        );
        assert_eq!(
            resolve_get(&g, &path("modifiers[\"Array\"].count")).unwrap(),
            Value::Float(3.0)
        );
        assert_eq!(resolve_get(&g, &path("points[1]")).unwrap(), Value::Float(0.7));
    }

    #[test]
    fn get_vector_component() {
        let g = sample_graph();
        assert_eq!(resolve_get(&g, &path("location[2]")).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn set_replaces_leaf_and_component() {
        let mut g = sample_graph();
        resolve_set(&mut g, &path("location"), &Value::vec3(9.0, 9.0, 9.0)).unwrap();
        assert_eq!(
            resolve_get(&g, &path("location")).unwrap(),
            Value::vec3(9.0, 9.0, 9.0)
        );

        resolve_set(&mut g, &path("location[1]"), &Value::Float(-4.0)).unwrap();
        assert_eq!(
            resolve_get(&g, &path("location")).unwrap(),
            Value::vec3(9.0, -4.0, 9.0)
        );
    }

    #[test]
    fn set_rejects_kind_change() {
        let mut g = sample_graph();
        let err = resolve_set(&mut g, &path("location"), &Value::Float(1.0)).unwrap_err();
        assert!(matches!(err, PathError::TypeMismatch { .. }));
    }

    #[test]
    fn missing_segments_error() {
        let g = sample_graph();
        assert!(matches!(
            resolve_get(&g, &path("nope")).unwrap_err(),
            PathError::UnknownAttribute { .. }
        ));
        assert!(matches!(
            resolve_get(&g, &path("modifiers[\"Missing\"].count")).unwrap_err(),
            PathError::UnknownKey { .. }
        ));
        assert!(matches!(
            resolve_get(&g, &path("points[5]")).unwrap_err(),
            PathError::IndexOutOfRange { .. }
        ));
    }

    #[test]
    fn intermediate_leaf_is_not_a_container() {
        let g = sample_graph();
        assert!(matches!(
            resolve_get(&g, &path("location.x")).unwrap_err(),
            PathError::NotAContainer { .. }
        ));
    }
}

//! Rig JSON loader.
//!
//! Parses a rig document (objects with property graphs and authored
//! channels) and installs it into a `MemoryTimeline`. The raw serde
//! shapes stay local to this module; core types are populated only after
//! the per-channel sort invariant has been checked.

use serde::Deserialize;

use crate::channel::Channel;
use crate::error::MotionError;
use crate::host::MemoryTimeline;
use mobject_api_core::PropNode;

/// Install every object of the rig document into `host`, returning the
/// installed object names in document order (ready to use as a mobject
/// base).
pub fn load_rig_json(host: &mut MemoryTimeline, json: &str) -> Result<Vec<String>, MotionError> {
    let doc: RigDoc = serde_json::from_str(json).map_err(|e| MotionError::Rig(e.to_string()))?;

    let mut names = Vec::with_capacity(doc.objects.len());
    for object in doc.objects {
        for channel in &object.channels {
            channel.validate(&object.name)?;
        }
        host.add_object(object.name.clone(), object.props);
        for channel in object.channels {
            host.add_channel(&object.name, channel)?;
        }
        names.push(object.name);
    }
    Ok(names)
}

#[derive(Debug, Deserialize)]
struct RigDoc {
    #[allow(dead_code)]
    pub name: String,
    pub objects: Vec<RigObject>,
}

#[derive(Debug, Deserialize)]
struct RigObject {
    pub name: String,
    pub props: PropNode,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::host::TimelineHost;
    use mobject_api_core::{PropPath, Value};

    #[test]
    fn loads_objects_channels_and_graph() {
        let json = r#"{
            "name": "mini",
            "objects": [
                {
                    "name": "Cube",
                    "props": {
                        "location": { "type": "Vec3", "data": [1.0, 2.0, 3.0] }
                    },
                    "channels": [
                        {
                            "path": "location",
                            "index": 0,
                            "points": [
                                { "time": 0.0, "value": 1.0 },
                                { "time": 10.0, "value": 4.0 }
                            ]
                        }
                    ]
                }
            ]
        }"#;
        let mut host = MemoryTimeline::new();
        let names = load_rig_json(&mut host, json).unwrap();
        assert_eq!(names, vec!["Cube".to_string()]);
        assert_eq!(
            host.get_value("Cube", &PropPath::attr("location")).unwrap(),
            Value::vec3(1.0, 2.0, 3.0)
        );
        let ch = host
            .channel(&ChannelId::new("Cube", "location", Some(0)))
            .unwrap();
        assert_eq!(ch.points.len(), 2);
    }

    #[test]
    fn rejects_unsorted_channel() {
        let json = r#"{
            "name": "bad",
            "objects": [
                {
                    "name": "Cube",
                    "props": { "value": { "type": "Float", "data": 0.0 } },
                    "channels": [
                        {
                            "path": "value",
                            "points": [
                                { "time": 10.0, "value": 0.0 },
                                { "time": 0.0, "value": 1.0 }
                            ]
                        }
                    ]
                }
            ]
        }"#;
        let mut host = MemoryTimeline::new();
        assert!(matches!(
            load_rig_json(&mut host, json).unwrap_err(),
            MotionError::UnsortedKeyframes { .. }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        let mut host = MemoryTimeline::new();
        assert!(matches!(
            load_rig_json(&mut host, "{").unwrap_err(),
            MotionError::Rig(_)
        ));
    }
}

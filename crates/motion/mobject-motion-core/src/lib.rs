//! Mobject motion core (host-agnostic)
//!
//! Scripted scene objects ("mobjects") record high-level motion calls as
//! keyframed curves on a timeline host. The heavy lifting lives in two
//! engines: action segmentation (partition a densely keyframed base
//! animation into fixed-width replayable clips) and action retargeting
//! (replay a clip onto a new time window and channel set while preserving
//! curve shape under uniform time scaling).

pub mod action;
pub mod channel;
pub mod config;
pub mod error;
pub mod host;
pub mod interp;
pub mod loader;
pub mod mobject;
pub mod naming;
pub mod retarget;
pub mod stage;
pub mod stager;

// Re-exports for consumers
pub use action::{generate_actions, Action, Actor};
pub use channel::{
    Channel, ChannelId, Easing, Handle, HandleKind, Interpolation, KeyframeMeta, KeyframePoint,
};
pub use config::Config;
pub use error::MotionError;
pub use host::{MemoryTimeline, TimelineHost};
pub use interp::{remap, DomainRangeMap};
pub use loader::load_rig_json;
pub use mobject::{CustomProperty, MappedProperty, Mobject, PropertyBinding};
pub use naming::PrefixRegistry;
pub use stage::{Animation, Marker, Stage};
pub use stager::{KeyframeStager, PlannedKeyframe, PlannedKind, StagerMode};
pub use mobject_api_core::{PathError, PropNode, PropPath, Value, ValueKind};

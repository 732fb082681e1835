//! Shared rig fixtures for mobject integration tests.
//!
//! Fixtures are rig-JSON documents consumed through
//! `mobject_motion_core::load_rig_json`.

/// Two-object hero rig with a hand-authored base animation spanning
/// frames [0, 95]: with the default window width of 30 this segments into
/// three actions, with the shape-key channel active only in the second.
/// Includes a bracket-named marker object with no animation.
pub fn walk_rig_json() -> &'static str {
    include_str!("../fixtures/walk_rig.json")
}

/// Minimal single-object rig with one two-point channel, handy for tests
/// that only need something keyframed.
pub fn hop_rig_json() -> &'static str {
    include_str!("../fixtures/hop_rig.json")
}

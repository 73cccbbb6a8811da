//! Layout, camera, and interaction engine for the lock wall.
//!
//! The wall is a large field of 3D "lock" tiles arranged on a vertical plane.
//! This crate owns everything between the host's raw input events and its
//! renderer: placing tiles on a jittered brick lattice, tweening the camera
//! between poses, smoothing zoom, panning, and resolving pointer and touch
//! gestures into story selections. Asset decoding, texture rasterisation, tile
//! data and rendering stay behind the traits in [`collab`] and
//! [`engine::Renderer`], so the whole engine runs headless in tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] and the per-frame render loop |
//! | [`layout`] | Grid layout generator with collision avoidance |
//! | [`registry`] | Typed registry of placed tiles and story affordances |
//! | [`tile`] | Tile records, labels, entities, and affordances |
//! | [`animation`] | Camera tween state machine and easing functions |
//! | [`zoom`] | Wheel zoom, clamped and optionally smoothed |
//! | [`pan`] | Drag panning parallel to the wall |
//! | [`pulse`] | Affordance pulse and hover scaling |
//! | [`dispatch`] | Pointer/touch gesture disambiguation and hit dispatch |
//! | [`hit`] | Ray casting against tile and affordance quads |
//! | [`input`] | Input event types and gesture tracking state |
//! | [`camera`] | Camera pose, projection, and screen rays |
//! | [`collab`] | External collaborator traits and handles |
//! | [`consts`] | Shared numeric constants |

pub mod animation;
pub mod camera;
pub mod collab;
pub mod consts;
pub mod dispatch;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod pan;
pub mod pulse;
pub mod registry;
pub mod tile;
pub mod zoom;

#[cfg(test)]
mod test_support;

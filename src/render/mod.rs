//! Rendering handoff
//!
//! The core never draws. It hands the host a snapshot of what is on screen
//! and, for GPU sinks, a flat list of textured quads.

pub mod instance;
pub mod snapshot;

pub use instance::{SpriteInstance, as_bytes, sprite_instances};
pub use snapshot::{EnemyView, Hud, PlayerView, RenderSnapshot, SceneView, SpriteView};

//! Parallax scenes and crossfades
//!
//! One scene is current. A phase-band change makes another scene the crossfade
//! target; both scroll until the fade completes and the target takes over.
//! Layers whose images are still loading don't move, and a fade into a scene
//! that isn't ready yet waits for it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::resource::ResourceHandle;
use super::timer::Countdown;
use crate::settings::{GameConfig, LayerDef, SceneDef};

/// How a scene is revealed when it becomes the crossfade target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionStyle {
    /// Next scene fades in over the current one
    #[default]
    CrossDissolve,
    /// Current scene darkens to black, then the next scene fades in from black
    Reveal,
}

/// Layer-specific motion state
#[derive(Debug, Clone, PartialEq)]
pub enum LayerMotion {
    Scrolling {
        /// Units per second
        speed: f32,
        /// Scroll distance, wraps after one drawn height
        offset: f32,
    },
    Prop {
        scale: f32,
        anchor: Vec2,
        rotation_speed: f32,
        angle: f32,
    },
}

/// Where the renderer should draw a layer this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LayerPlacement {
    /// Two stacked copies of a cover-scaled background
    Tiled { upper: Rect, lower: Rect },
    /// A single prop, rotated about its center
    Prop { rect: Rect, angle: f32 },
}

/// One parallax layer
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayer {
    pub asset: String,
    pub resource: ResourceHandle,
    pub motion: LayerMotion,
}

impl SceneLayer {
    fn from_def(def: &LayerDef) -> Self {
        let motion = match *def {
            LayerDef::Scrolling { speed, .. } => LayerMotion::Scrolling { speed, offset: 0.0 },
            LayerDef::Sprite {
                scale,
                anchor_x,
                anchor_y,
                rotation_speed,
                ..
            } => LayerMotion::Prop {
                scale,
                anchor: Vec2::new(anchor_x, anchor_y),
                rotation_speed,
                angle: 0.0,
            },
        };
        Self {
            asset: def.asset().to_string(),
            resource: ResourceHandle::Pending,
            motion,
        }
    }

    /// Image scaled to cover the arena: (drawn size, horizontal centering offset)
    fn cover(image: Vec2, arena: Vec2) -> (Vec2, f32) {
        let scale = (arena.x / image.x).max(arena.y / image.y);
        let drawn = image * scale;
        (drawn, (arena.x - drawn.x) / 2.0)
    }

    fn advance(&mut self, dt_secs: f32, arena: Vec2) {
        let Some(image) = self.resource.dimensions() else {
            return;
        };
        match &mut self.motion {
            LayerMotion::Scrolling { speed, offset } => {
                let (drawn, _) = Self::cover(image, arena);
                *offset += *speed * dt_secs;
                if *offset > drawn.y {
                    *offset = 0.0;
                }
            }
            LayerMotion::Prop {
                rotation_speed,
                angle,
                ..
            } => {
                *angle += *rotation_speed * dt_secs;
            }
        }
    }

    /// Placement for drawing, `None` while the image is loading
    pub fn placement(&self, arena: Vec2) -> Option<LayerPlacement> {
        let image = self.resource.dimensions()?;
        Some(match self.motion {
            LayerMotion::Scrolling { offset, .. } => {
                let (drawn, offset_x) = Self::cover(image, arena);
                LayerPlacement::Tiled {
                    upper: Rect::new(offset_x, offset - drawn.y, drawn.x, drawn.y),
                    lower: Rect::new(offset_x, offset, drawn.x, drawn.y),
                }
            }
            LayerMotion::Prop {
                scale,
                anchor,
                angle,
                ..
            } => {
                let size = image * scale;
                let pos = (arena - size) * anchor;
                LayerPlacement::Prop {
                    rect: Rect { pos, size },
                    angle,
                }
            }
        })
    }
}

/// A named set of layers
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub name: String,
    pub entry: TransitionStyle,
    pub layers: Vec<SceneLayer>,
}

impl Scene {
    fn from_def(def: &SceneDef) -> Self {
        Self {
            name: def.name.clone(),
            entry: def.entry,
            layers: def.layers.iter().map(SceneLayer::from_def).collect(),
        }
    }

    /// Ready once every layer image has loaded
    pub fn is_ready(&self) -> bool {
        self.layers.iter().all(|l| l.resource.is_ready())
    }

    fn advance(&mut self, dt_secs: f32, arena: Vec2) {
        if !self.is_ready() {
            return;
        }
        for layer in &mut self.layers {
            layer.advance(dt_secs, arena);
        }
    }
}

/// An in-progress fade toward another scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossfade {
    pub target: usize,
    pub style: TransitionStyle,
    timer: Countdown,
}

impl Crossfade {
    fn new(target: usize, style: TransitionStyle, duration_ms: f32) -> Self {
        Self {
            target,
            style,
            timer: Countdown::new(duration_ms),
        }
    }

    /// Fade progress in [0, 1]
    pub fn progress(&self) -> f32 {
        self.timer.progress()
    }

    fn advance(&mut self, dt_ms: f32) -> f32 {
        self.timer.tick(dt_ms);
        self.progress()
    }
}

/// Blend values the renderer applies this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneBlend {
    pub current: usize,
    /// Black overlay drawn over the current scene
    pub darken: f32,
    pub next: Option<usize>,
    /// Black overlay drawn before the next scene
    pub black: f32,
    pub next_alpha: f32,
    pub progress: f32,
    pub style: TransitionStyle,
}

impl SceneBlend {
    /// Blend for a fade at progress `t` in the given style
    pub fn for_progress(current: usize, next: usize, style: TransitionStyle, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let (darken, black, next_alpha) = match style {
            TransitionStyle::CrossDissolve => (0.0, 0.0, t),
            TransitionStyle::Reveal => {
                let appear = (t - 0.5).max(0.0) * 2.0;
                ((t * 1.2).min(1.0) * 0.9, 1.0 - appear, appear)
            }
        };
        Self {
            current,
            darken,
            next: Some(next),
            black,
            next_alpha,
            progress: t,
            style,
        }
    }

    /// Only the current scene, fully visible
    pub fn steady(current: usize) -> Self {
        Self {
            current,
            darken: 0.0,
            next: None,
            black: 0.0,
            next_alpha: 0.0,
            progress: 0.0,
            style: TransitionStyle::CrossDissolve,
        }
    }
}

/// Owns the scenes and sequences crossfades between them
#[derive(Debug, Clone)]
pub struct SceneDirector {
    scenes: Vec<Scene>,
    current: usize,
    fade: Option<Crossfade>,
    crossfade_ms: f32,
    arena: Vec2,
}

impl SceneDirector {
    /// Build from a validated configuration
    pub fn new(config: &GameConfig) -> Self {
        Self {
            scenes: config.scenes.iter().map(Scene::from_def).collect(),
            current: 0,
            fade: None,
            crossfade_ms: config.crossfade_ms,
            arena: Vec2::new(config.arena_width, config.arena_height),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Crossfade target, if a fade is running
    pub fn next(&self) -> Option<usize> {
        self.fade.map(|f| f.target)
    }

    pub fn crossfade(&self) -> Option<&Crossfade> {
        self.fade.as_ref()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn arena(&self) -> Vec2 {
        self.arena
    }

    /// Called by the asset provider once a layer image has loaded
    pub fn mark_layer_ready(&mut self, scene: usize, layer: usize, width: u32, height: u32) {
        if let Some(layer) = self
            .scenes
            .get_mut(scene)
            .and_then(|s| s.layers.get_mut(layer))
        {
            layer.resource.mark_ready(width, height);
        }
    }

    /// Mark every layer of every scene ready with the same dimensions
    pub fn mark_all_ready(&mut self, width: u32, height: u32) {
        for layer in self.scenes.iter_mut().flat_map(|s| s.layers.iter_mut()) {
            layer.resource.mark_ready(width, height);
        }
    }

    /// Begin fading toward `target`; returns the style if a fade started
    pub fn start_transition(&mut self, target: usize) -> Option<TransitionStyle> {
        let target = target % self.scenes.len();
        if target == self.current {
            return None;
        }
        let style = self.scenes[target].entry;
        self.fade = Some(Crossfade::new(target, style, self.crossfade_ms));
        log::info!(
            "Scene transition {} -> {} ({:?})",
            self.scenes[self.current].name,
            self.scenes[target].name,
            style
        );
        Some(style)
    }

    /// Scroll the visible scenes and advance any fade.
    /// Returns the new current scene when a fade completes.
    pub fn advance(&mut self, dt_ms: f32) -> Option<usize> {
        let dt_secs = dt_ms / 1000.0;
        let arena = self.arena;
        self.scenes[self.current].advance(dt_secs, arena);

        let fade = self.fade.as_mut()?;
        let target = &mut self.scenes[fade.target];
        if !target.is_ready() {
            return None;
        }
        target.advance(dt_secs, arena);

        if fade.advance(dt_ms) >= 1.0 {
            self.current = fade.target;
            self.fade = None;
            log::debug!("Scene '{}' is now current", self.scenes[self.current].name);
            return Some(self.current);
        }
        None
    }

    /// Blend values for this frame
    pub fn blend(&self) -> SceneBlend {
        match self.fade {
            Some(fade) => {
                SceneBlend::for_progress(self.current, fade.target, fade.style, fade.progress())
            }
            None => SceneBlend::steady(self.current),
        }
    }

    /// Back to the first scene with no fade; layer positions restart
    pub fn reset(&mut self) {
        self.current = 0;
        self.fade = None;
        for layer in self.scenes.iter_mut().flat_map(|s| s.layers.iter_mut()) {
            match &mut layer.motion {
                LayerMotion::Scrolling { offset, .. } => *offset = 0.0,
                LayerMotion::Prop { angle, .. } => *angle = 0.0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_director() -> SceneDirector {
        let mut director = SceneDirector::new(&GameConfig::default());
        director.mark_all_ready(400, 300);
        director
    }

    #[test]
    fn test_transition_to_current_is_ignored() {
        let mut director = ready_director();
        assert_eq!(director.start_transition(0), None);
        assert_eq!(director.next(), None);
    }

    #[test]
    fn test_transition_style_comes_from_target() {
        let mut director = ready_director();
        assert_eq!(
            director.start_transition(1),
            Some(TransitionStyle::CrossDissolve)
        );
        assert_eq!(director.start_transition(2), Some(TransitionStyle::Reveal));
        assert_eq!(director.next(), Some(2));
    }

    #[test]
    fn test_progress_increases_then_swaps() {
        let mut director = ready_director();
        director.start_transition(1);

        let mut last = 0.0;
        for _ in 0..9 {
            assert_eq!(director.advance(100.0), None);
            let p = director.crossfade().unwrap().progress();
            assert!(p > last && p < 1.0);
            last = p;
        }
        assert_eq!(director.advance(100.0), Some(1));
        assert_eq!(director.current(), 1);
        assert_eq!(director.next(), None);
    }

    #[test]
    fn test_crossfade_progress_clamps_to_one() {
        let mut fade = Crossfade::new(1, TransitionStyle::CrossDissolve, 1000.0);
        assert!((fade.advance(400.0) - 0.4).abs() < 1e-6);
        assert_eq!(fade.advance(5000.0), 1.0);
    }

    #[test]
    fn test_fade_waits_for_unready_target() {
        let mut director = SceneDirector::new(&GameConfig::default());
        director.start_transition(1);
        assert_eq!(director.advance(2000.0), None);
        assert_eq!(director.crossfade().unwrap().progress(), 0.0);

        director.mark_all_ready(400, 300);
        assert_eq!(director.advance(2000.0), Some(1));
    }

    #[test]
    fn test_scrolling_layer_wraps() {
        let mut director = ready_director();
        // 400x300 image covering 800x600 arena draws 800x600; first layer scrolls at 10/s
        director.advance(30_000.0);
        match director.scene(0).unwrap().layers[0].motion {
            LayerMotion::Scrolling { offset, .. } => assert_eq!(offset, 300.0),
            _ => panic!("expected scrolling layer"),
        }
        director.advance(40_000.0);
        match director.scene(0).unwrap().layers[0].motion {
            LayerMotion::Scrolling { offset, .. } => assert_eq!(offset, 0.0),
            _ => panic!("expected scrolling layer"),
        }
    }

    #[test]
    fn test_unready_scene_does_not_scroll() {
        let mut director = SceneDirector::new(&GameConfig::default());
        director.mark_layer_ready(0, 0, 400, 300);
        director.advance(1000.0);
        match director.scene(0).unwrap().layers[0].motion {
            LayerMotion::Scrolling { offset, .. } => assert_eq!(offset, 0.0),
            _ => panic!("expected scrolling layer"),
        }
    }

    #[test]
    fn test_tiled_placement() {
        let mut director = ready_director();
        director.advance(10_000.0);
        let placement = director.scene(0).unwrap().layers[0]
            .placement(director.arena())
            .unwrap();
        assert_eq!(
            placement,
            LayerPlacement::Tiled {
                upper: Rect::new(0.0, 100.0 - 600.0, 800.0, 600.0),
                lower: Rect::new(0.0, 100.0, 800.0, 600.0),
            }
        );
    }

    #[test]
    fn test_prop_placement_uses_anchor() {
        let director = ready_director();
        // blue-nebula layer 3: scale 1.0 at (0.62, 0.18)
        let placement = director.scene(1).unwrap().layers[3]
            .placement(director.arena())
            .unwrap();
        match placement {
            LayerPlacement::Prop { rect, angle } => {
                assert_eq!(rect.size, Vec2::new(400.0, 300.0));
                assert!((rect.pos.x - 400.0 * 0.62).abs() < 1e-3);
                assert!((rect.pos.y - 300.0 * 0.18).abs() < 1e-3);
                assert_eq!(angle, 0.0);
            }
            _ => panic!("expected prop"),
        }
    }

    #[test]
    fn test_reveal_blend_darkens_then_reveals() {
        let early = SceneBlend::for_progress(1, 2, TransitionStyle::Reveal, 0.25);
        assert!((early.darken - 0.27).abs() < 1e-5);
        assert_eq!(early.next_alpha, 0.0);
        assert_eq!(early.black, 1.0);

        let late = SceneBlend::for_progress(1, 2, TransitionStyle::Reveal, 0.75);
        assert!((late.darken - 0.81).abs() < 1e-5);
        assert!((late.next_alpha - 0.5).abs() < 1e-5);
        assert!((late.black - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_dissolve_blend() {
        let blend = SceneBlend::for_progress(0, 1, TransitionStyle::CrossDissolve, 0.4);
        assert_eq!(blend.darken, 0.0);
        assert_eq!(blend.black, 0.0);
        assert_eq!(blend.next_alpha, 0.4);
    }

    #[test]
    fn test_reset_returns_to_first_scene() {
        let mut director = ready_director();
        director.start_transition(2);
        director.advance(2000.0);
        assert_eq!(director.current(), 2);
        director.reset();
        assert_eq!(director.current(), 0);
        assert_eq!(director.blend(), SceneBlend::steady(0));
    }
}

//! Sprite resource handles
//!
//! The asset loader lives outside the core. It reports image dimensions
//! through `Assets::mark_ready`; until then every sprite is pending and
//! entities fall back to their default box. Nothing here is an error: a
//! pending sprite is simply not drawable yet.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;
use crate::consts::*;

/// Number of normal enemy sprites
pub const ENEMY_SPRITE_COUNT: u8 = 7;

/// Load state of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceHandle {
    #[default]
    Pending,
    Ready { width: u32, height: u32 },
}

impl ResourceHandle {
    /// Record dimensions; zero-sized images stay pending
    pub fn mark_ready(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            *self = ResourceHandle::Ready { width, height };
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ResourceHandle::Ready { .. })
    }

    pub fn dimensions(&self) -> Option<Vec2> {
        match *self {
            ResourceHandle::Ready { width, height } => Some(Vec2::new(width as f32, height as f32)),
            ResourceHandle::Pending => None,
        }
    }
}

/// Every sprite the core sizes entities from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKey {
    Player,
    PlayerBullet,
    Missile,
    EnemyBullet,
    /// Normal enemy sprite, 0..ENEMY_SPRITE_COUNT
    Enemy(u8),
    Boss,
    PowerUp(PowerUpKind),
    Explosion,
    ShieldImpact,
    ShieldAura,
}

impl SpriteKey {
    /// Box used before the sprite is ready
    pub fn default_size(self) -> Vec2 {
        match self {
            SpriteKey::Player => Vec2::splat(PLAYER_SIZE),
            SpriteKey::PlayerBullet | SpriteKey::EnemyBullet => Vec2::new(14.0, 34.0),
            SpriteKey::Missile => Vec2::new(20.0, 48.0),
            SpriteKey::Enemy(_) => Vec2::new(ENEMY_BOX_W, ENEMY_BOX_H),
            SpriteKey::PowerUp(_) => Vec2::splat(POWERUP_SIZE),
            SpriteKey::Boss
            | SpriteKey::Explosion
            | SpriteKey::ShieldImpact
            | SpriteKey::ShieldAura => Vec2::ZERO,
        }
    }

    /// Entity box for an image of the given dimensions
    pub fn size_for(self, image: Vec2) -> Vec2 {
        match self {
            SpriteKey::PlayerBullet => scale_to_height(image, (image.y * 1.9).min(60.0)),
            SpriteKey::EnemyBullet => scale_to_height(image, image.y.min(48.0)),
            SpriteKey::Missile => scale_to_height(image, 54.0),
            SpriteKey::Enemy(_) => {
                let scale = (ENEMY_BOX_W / image.x).min(ENEMY_BOX_H / image.y);
                (image * scale).round()
            }
            SpriteKey::Boss => image,
            // Player and pickup boxes are fixed; their images are frames/icons
            SpriteKey::Player | SpriteKey::PowerUp(_) => self.default_size(),
            SpriteKey::Explosion | SpriteKey::ShieldImpact | SpriteKey::ShieldAura => {
                Vec2::splat(image.y)
            }
        }
    }
}

fn scale_to_height(image: Vec2, height: f32) -> Vec2 {
    (image * (height / image.y)).round()
}

/// Handles for every sprite, keyed by `SpriteKey`
#[derive(Debug, Clone, Default)]
pub struct Assets {
    handles: HashMap<SpriteKey, ResourceHandle>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the asset provider once an image has loaded
    pub fn mark_ready(&mut self, key: SpriteKey, width: u32, height: u32) {
        let handle = self.handles.entry(key).or_default();
        handle.mark_ready(width, height);
        if handle.is_ready() {
            log::debug!("Sprite {key:?} ready at {width}x{height}");
        }
    }

    pub fn handle(&self, key: SpriteKey) -> ResourceHandle {
        self.handles.get(&key).copied().unwrap_or_default()
    }

    pub fn is_ready(&self, key: SpriteKey) -> bool {
        self.handle(key).is_ready()
    }

    /// Resolved entity box, `None` while pending
    pub fn size_of(&self, key: SpriteKey) -> Option<Vec2> {
        self.handle(key).dimensions().map(|dims| key.size_for(dims))
    }

    /// Frames in a horizontal strip of square frames (1 while pending)
    pub fn strip_frames(&self, key: SpriteKey) -> u32 {
        match self.handle(key) {
            ResourceHandle::Ready { width, height } => (width / height).max(1),
            ResourceHandle::Pending => 1,
        }
    }

    /// Shield impact strip: square frames only when the width divides evenly
    pub fn shield_frames(&self) -> u32 {
        match self.handle(SpriteKey::ShieldImpact) {
            ResourceHandle::Ready { width, height } if width % height == 0 => width / height,
            _ => 1,
        }
    }

    /// Player sheet layout as (columns, rows) of PLAYER_SIZE frames
    pub fn player_sheet(&self) -> (u32, u32) {
        match self.handle(SpriteKey::Player) {
            ResourceHandle::Ready { width, height } => {
                let frame = PLAYER_SIZE as u32;
                ((width / frame).max(1), (height / frame).max(1))
            }
            ResourceHandle::Pending => (1, 1),
        }
    }
}

/// An entity's sprite and its current box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub key: SpriteKey,
    pub size: Vec2,
    /// True once `size` came from the loaded image
    pub resolved: bool,
}

impl Sprite {
    /// Sprite sized from the asset if ready, default box otherwise
    pub fn new(key: SpriteKey, assets: &Assets) -> Self {
        let mut sprite = Self {
            key,
            size: key.default_size(),
            resolved: false,
        };
        sprite.resolve(assets);
        sprite
    }

    /// Pick up the real size once the image is ready
    pub fn resolve(&mut self, assets: &Assets) {
        if self.resolved {
            return;
        }
        if let Some(size) = assets.size_of(self.key) {
            self.size = size;
            self.resolved = true;
        }
    }

    /// Drawable once the image is ready and the box is non-empty
    pub fn drawable(&self) -> bool {
        self.resolved && self.size.x > 0.0 && self.size.y > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_stay_pending() {
        let mut handle = ResourceHandle::default();
        handle.mark_ready(0, 32);
        assert!(!handle.is_ready());
        handle.mark_ready(16, 32);
        assert_eq!(handle, ResourceHandle::Ready { width: 16, height: 32 });
    }

    #[test]
    fn test_bullet_sizing_caps_height() {
        // 10x40 * 1.9 = 76 high, capped to 60
        let size = SpriteKey::PlayerBullet.size_for(Vec2::new(10.0, 40.0));
        assert_eq!(size, Vec2::new(15.0, 60.0));
        // 8x20 * 1.9 = 38 high, under the cap
        let size = SpriteKey::PlayerBullet.size_for(Vec2::new(8.0, 20.0));
        assert_eq!(size, Vec2::new(15.0, 38.0));
    }

    #[test]
    fn test_enemy_fits_box() {
        let size = SpriteKey::Enemy(0).size_for(Vec2::new(128.0, 128.0));
        assert_eq!(size, Vec2::new(64.0, 64.0));
        let size = SpriteKey::Enemy(3).size_for(Vec2::new(32.0, 72.0));
        assert_eq!(size, Vec2::new(32.0, 72.0));
    }

    #[test]
    fn test_missile_target_height() {
        let size = SpriteKey::Missile.size_for(Vec2::new(10.0, 27.0));
        assert_eq!(size, Vec2::new(20.0, 54.0));
    }

    #[test]
    fn test_sprite_resolves_when_ready() {
        let mut assets = Assets::new();
        let mut sprite = Sprite::new(SpriteKey::Boss, &assets);
        assert_eq!(sprite.size, Vec2::ZERO);
        assert!(!sprite.drawable());

        assets.mark_ready(SpriteKey::Boss, 200, 120);
        sprite.resolve(&assets);
        assert_eq!(sprite.size, Vec2::new(200.0, 120.0));
        assert!(sprite.drawable());
    }

    #[test]
    fn test_strip_frames() {
        let mut assets = Assets::new();
        assert_eq!(assets.strip_frames(SpriteKey::Explosion), 1);
        assets.mark_ready(SpriteKey::Explosion, 320, 64);
        assert_eq!(assets.strip_frames(SpriteKey::Explosion), 5);

        assets.mark_ready(SpriteKey::ShieldImpact, 100, 64);
        assert_eq!(assets.shield_frames(), 1);
        assets.mark_ready(SpriteKey::ShieldImpact, 256, 64);
        assert_eq!(assets.shield_frames(), 4);
    }

    #[test]
    fn test_player_sheet() {
        let mut assets = Assets::new();
        assert_eq!(assets.player_sheet(), (1, 1));
        assets.mark_ready(SpriteKey::Player, 160, 120);
        assert_eq!(assets.player_sheet(), (4, 3));
    }
}

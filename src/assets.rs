//! Sprite catalog
//!
//! Resolves the sprite files the host draws with. A missing file never stops
//! the game: it is replaced by the generic fallback sprite, or by a
//! placeholder the host draws as a plain shape.

use std::path::{Path, PathBuf};

use crate::consts::{ENEMY_VARIANTS, EXPLOSION_FRAMES};

const FALLBACK_SPRITE: &str = "fallback.png";
const PROJECTILE_SPRITE: &str = "static_rocket.png";

static PLACEHOLDER: Sprite = Sprite::Placeholder;

/// What the host should draw for an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sprite {
    Image(PathBuf),
    Placeholder,
}

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    enemies: Vec<Sprite>,
    explosion: Vec<Sprite>,
    projectile: Sprite,
    missing: Vec<PathBuf>,
}

impl AssetCatalog {
    /// Catalog with no files at all
    pub fn placeholders() -> Self {
        Self {
            enemies: vec![Sprite::Placeholder; ENEMY_VARIANTS as usize],
            explosion: vec![Sprite::Placeholder; EXPLOSION_FRAMES as usize],
            projectile: Sprite::Placeholder,
            missing: Vec::new(),
        }
    }

    /// Resolve every sprite under `dir`
    pub fn load(dir: &Path) -> Self {
        let fallback_path = dir.join(FALLBACK_SPRITE);
        let fallback = if fallback_path.is_file() {
            Sprite::Image(fallback_path)
        } else {
            Sprite::Placeholder
        };

        let mut missing = Vec::new();
        let mut resolve = |name: String| {
            let path = dir.join(name);
            if path.is_file() {
                Sprite::Image(path)
            } else {
                missing.push(path);
                fallback.clone()
            }
        };

        let enemies = (0..ENEMY_VARIANTS)
            .map(|i| resolve(format!("monster{i}.png")))
            .collect();
        let explosion = (0..EXPLOSION_FRAMES)
            .map(|i| resolve(format!("boom{i}.png")))
            .collect();
        let projectile = resolve(PROJECTILE_SPRITE.to_string());

        if missing.is_empty() {
            log::info!("Loaded sprites from {}", dir.display());
        } else {
            log::warn!(
                "{} sprite(s) missing under {}, using fallbacks",
                missing.len(),
                dir.display()
            );
        }

        Self {
            enemies,
            explosion,
            projectile,
            missing,
        }
    }

    pub fn enemy(&self, variant: u8) -> &Sprite {
        self.enemies
            .get(variant as usize)
            .unwrap_or(&PLACEHOLDER)
    }

    pub fn explosion_frame(&self, frame: u32) -> &Sprite {
        self.explosion
            .get(frame as usize)
            .unwrap_or(&PLACEHOLDER)
    }

    pub fn projectile(&self) -> &Sprite {
        &self.projectile
    }

    /// Files that could not be found
    pub fn missing(&self) -> &[PathBuf] {
        &self.missing
    }
}

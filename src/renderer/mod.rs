//! Rendering collaborator interface
//!
//! The simulation never rasterizes anything itself. It hands visuals and
//! pixel positions to a `Surface`, which is expected to skip anything outside
//! the viewport so levels far wider than the screen stay cheap to draw.

use glam::Vec2;

use crate::consts::{CUBE_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};
use crate::sim::collision::Rect;

/// Every drawable image the game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visual {
    Cube,
    Ground,
    Platform,
    Checkpoint,
    End,
    Spikes,
    GravityInverter,
    SpeedBoost,
    /// Per-level backdrop
    Background(u32),
    MenuBackground,
    OptionsBackground,
    LevelSelectBackground,
    HelpBackground,
}

impl Visual {
    /// Image size in pixels, used for culling
    pub fn size(&self) -> Vec2 {
        match self {
            Visual::Cube => Vec2::splat(CUBE_SIZE),
            Visual::Ground => Vec2::new(TILE_SIZE, 2.0 * TILE_SIZE),
            Visual::Platform => Vec2::new(TILE_SIZE, TILE_SIZE / 2.0),
            Visual::Checkpoint | Visual::End => Vec2::new(TILE_SIZE / 2.0, TILE_SIZE),
            Visual::Spikes | Visual::GravityInverter | Visual::SpeedBoost => {
                Vec2::splat(TILE_SIZE)
            }
            Visual::Background(_) => Vec2::new(2.0 * SCREEN_WIDTH, 2.0 * SCREEN_HEIGHT),
            Visual::MenuBackground
            | Visual::OptionsBackground
            | Visual::LevelSelectBackground
            | Visual::HelpBackground => Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

/// Visible screen area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        }
    }
}

impl Viewport {
    /// False only when the box lies entirely off screen
    pub fn is_visible(&self, rect: &Rect) -> bool {
        !(rect.right() < 0.0
            || rect.bottom() < 0.0
            || rect.left() > self.size.x
            || rect.top() > self.size.y)
    }

    pub fn is_visual_visible(&self, visual: Visual, pos: Vec2) -> bool {
        self.is_visible(&Rect::new(pos, visual.size()))
    }
}

/// A menu frame as handed to the surface
#[derive(Debug, Clone, PartialEq)]
pub struct MenuView<'a> {
    pub title: &'a str,
    pub options: &'a [&'a str],
    pub selected: usize,
}

/// Drawing target supplied by the platform layer
pub trait Surface {
    /// Draw a visual with its top-left corner at `pos`; must no-op when off screen
    fn draw_entity(&mut self, visual: Visual, pos: Vec2);

    /// Draw a menu screen
    fn draw_menu(&mut self, menu: &MenuView<'_>);
}

/// Surface for headless runs: counts what would have been drawn
#[derive(Debug, Default)]
pub struct NullSurface {
    pub viewport: Viewport,
    /// Visuals that passed culling since the last `reset`
    pub drawn: usize,
    /// Visuals rejected by culling since the last `reset`
    pub culled: usize,
    pub menus: usize,
}

impl NullSurface {
    pub fn reset(&mut self) {
        self.drawn = 0;
        self.culled = 0;
        self.menus = 0;
    }
}

impl Surface for NullSurface {
    fn draw_entity(&mut self, visual: Visual, pos: Vec2) {
        if self.viewport.is_visual_visible(visual, pos) {
            self.drawn += 1;
        } else {
            self.culled += 1;
        }
    }

    fn draw_menu(&mut self, _menu: &MenuView<'_>) {
        self.menus += 1;
    }
}

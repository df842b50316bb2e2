//! Render adapter
//!
//! Rendering only reads game state. The scene is built as a flat list of
//! colored rectangles so it can be checked without a canvas.

use crate::sim::{GameState, Rect};

pub const PLAYER_COLOR: &str = "#3498db";
pub const OBSTACLE_COLOR: &str = "#e74c3c";

/// Element ids for the HUD text
pub const SCORE_ELEMENT_ID: &str = "score";
pub const DIFFICULTY_ELEMENT_ID: &str = "difficulty";

/// One filled rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub rect: Rect,
    pub color: &'static str,
}

/// Draws the game once per tick
pub trait Renderer {
    fn render(&mut self, state: &GameState);
}

/// Renderer that draws nothing (headless runs and tests)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _state: &GameState) {}
}

/// Player first, then obstacles in spawn order
pub fn scene(state: &GameState) -> Vec<Sprite> {
    let mut sprites = Vec::with_capacity(state.obstacles.len() + 1);
    sprites.push(Sprite {
        rect: state.player.rect(),
        color: PLAYER_COLOR,
    });
    sprites.extend(state.obstacles.iter().map(|o| Sprite {
        rect: o.rect(),
        color: OBSTACLE_COLOR,
    }));
    sprites
}

/// Tracks the last value written to a HUD field
#[derive(Debug, Default)]
pub struct HudField {
    shown: Option<u32>,
}

impl HudField {
    /// Returns the new value if it differs from what is on screen
    pub fn update(&mut self, value: u32) -> Option<u32> {
        if self.shown == Some(value) {
            return None;
        }
        self.shown = Some(value);
        Some(value)
    }
}

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

#[cfg(target_arch = "wasm32")]
mod canvas {
    use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement};

    use super::{DIFFICULTY_ELEMENT_ID, HudField, Renderer, SCORE_ELEMENT_ID, scene};
    use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use crate::sim::GameState;

    /// 2D canvas renderer with DOM HUD
    pub struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
        score_el: Option<Element>,
        difficulty_el: Option<Element>,
        score: HudField,
        difficulty: HudField,
    }

    impl CanvasRenderer {
        pub fn new(
            document: &Document,
            canvas: &HtmlCanvasElement,
            ctx: CanvasRenderingContext2d,
        ) -> Self {
            canvas.set_width(FIELD_WIDTH as u32);
            canvas.set_height(FIELD_HEIGHT as u32);
            let score_el = document.get_element_by_id(SCORE_ELEMENT_ID);
            if score_el.is_none() {
                log::warn!("No #{} element, score will not be shown", SCORE_ELEMENT_ID);
            }
            Self {
                ctx,
                score_el,
                difficulty_el: document.get_element_by_id(DIFFICULTY_ELEMENT_ID),
                score: HudField::default(),
                difficulty: HudField::default(),
            }
        }
    }

    impl Renderer for CanvasRenderer {
        fn render(&mut self, state: &GameState) {
            self.ctx
                .clear_rect(0.0, 0.0, f64::from(FIELD_WIDTH), f64::from(FIELD_HEIGHT));
            for sprite in scene(state) {
                self.ctx.set_fill_style_str(sprite.color);
                self.ctx.fill_rect(
                    f64::from(sprite.rect.min.x),
                    f64::from(sprite.rect.min.y),
                    f64::from(sprite.rect.size.x),
                    f64::from(sprite.rect.size.y),
                );
            }

            if let Some(score) = self.score.update(state.score.score()) {
                if let Some(el) = &self.score_el {
                    el.set_text_content(Some(&format!("Score: {}", score)));
                }
            }
            if let Some(difficulty) = self.difficulty.update(state.difficulty) {
                if let Some(el) = &self.difficulty_el {
                    el.set_text_content(Some(&format!("Difficulty: {}", difficulty)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::Obstacle;

    #[test]
    fn test_scene_order() {
        let mut state = GameState::new(1);
        state.obstacles.push(Obstacle::at(300.0));
        state.obstacles.push(Obstacle::at(450.0));

        let sprites = scene(&state);
        assert_eq!(sprites.len(), 3);
        assert_eq!(sprites[0].color, PLAYER_COLOR);
        assert_eq!(sprites[0].rect.min.x, PLAYER_X);
        assert_eq!(sprites[0].rect.min.y, GROUND_Y);
        assert_eq!(sprites[1].rect.min.x, 300.0);
        assert_eq!(sprites[2].rect.min.x, 450.0);
        assert!(sprites[1..].iter().all(|s| s.color == OBSTACLE_COLOR));
    }

    #[test]
    fn test_hud_writes_only_changes() {
        let mut field = HudField::default();
        assert_eq!(field.update(0), Some(0));
        assert_eq!(field.update(0), None);
        assert_eq!(field.update(1), Some(1));
        assert_eq!(field.update(1), None);
    }
}

use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use blockfall_core::{Action, Game, GameConfig};

use crate::{draw::DrawingContext, input::action_for_key};

/// One canvas-bound game session. The host constructs it with the 2d
/// context of its board canvas, forwards keyboard and button events,
/// and calls `frame` from its `requestAnimationFrame` loop.
#[wasm_bindgen]
pub struct Instance {
    context: CanvasRenderingContext2d,
    drawing_context: DrawingContext,
    game: Game,
}

#[wasm_bindgen]
impl Instance {
    #[wasm_bindgen(constructor)]
    pub fn new(context: CanvasRenderingContext2d) -> Self {
        Self {
            context,
            drawing_context: DrawingContext::new(),
            game: Game::new(GameConfig::default()),
        }
    }

    /// Should be called once per animation frame with the frame
    /// timestamp in milliseconds.
    #[wasm_bindgen]
    pub fn frame(&mut self, now: f64) {
        self.game.tick(now);
        self.drawing_context
            .draw_frame(&self.context, &self.game.board, &self.game.piece);
    }

    /// Keyboard entry point; keys without a binding are ignored.
    #[wasm_bindgen]
    pub fn key(&mut self, key: &str) {
        if let Some(action) = action_for_key(key) {
            self.game.apply(action);
        }
    }

    /// On-screen button entry point: one engine command per activation.
    #[wasm_bindgen]
    pub fn command(&mut self, action: Action) {
        self.game.apply(action);
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.game.score
    }

    #[wasm_bindgen(getter)]
    pub fn level(&self) -> u32 {
        self.game.level
    }

    #[wasm_bindgen(getter)]
    pub fn lines(&self) -> u32 {
        self.game.lines
    }

    /// The held piece's letter for the hold label, if any.
    #[wasm_bindgen(getter)]
    pub fn hold(&self) -> Option<String> {
        self.game.hold.map(|kind| kind.name().to_owned())
    }
}

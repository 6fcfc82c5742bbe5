#[cfg(feature = "wasm-bindgen")]
use wasm_bindgen::prelude::wasm_bindgen;

use rand::{SeedableRng, prelude::Rng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece, PieceKind};

const LINE_SCORE: u32 = 100;
const LINES_PER_LEVEL: u32 = 10;
const BASE_INTERVAL: f64 = 1000.;
const INTERVAL_STEP: f64 = 80.;
const MIN_INTERVAL: f64 = 120.;

pub type RandomSeed = [u8; 32];

/// Construction-time configuration. A fixed seed makes the piece
/// sequence reproducible; without one the RNG is seeded from the OS.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameConfig {
    pub seed: Option<RandomSeed>,
}

impl GameConfig {
    pub const fn with_seed(seed: RandomSeed) -> Self {
        Self { seed: Some(seed) }
    }
}

pub fn seeded_rng(seed: Option<RandomSeed>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::from_seed(seed),
        None => SmallRng::from_os_rng(),
    }
}

/// 7-bag randomizer: every kind exactly once per cycle, freshly
/// shuffled on each refill.
#[derive(Debug)]
pub struct SevenBag {
    kinds: [PieceKind; 7],
    drawn: usize,
    rng: SmallRng,
}

impl SevenBag {
    pub fn new(seed: Option<RandomSeed>) -> Self {
        Self {
            kinds: PieceKind::ALL,
            drawn: 7,
            rng: seeded_rng(seed),
        }
    }

    fn refill(&mut self) {
        for i in 0..7 {
            let swap = self.rng.random_range(i..7);
            self.kinds.swap(i, swap);
        }
        self.drawn = 0;
    }

    pub fn next_kind(&mut self) -> PieceKind {
        if self.drawn == 7 {
            self.refill();
        }
        let kind = self.kinds[self.drawn];
        self.drawn += 1;
        kind
    }

    /// Draws the next kind and spawns it as a fresh piece.
    pub fn next_piece(&mut self) -> Piece {
        Piece::new(self.next_kind())
    }
}

/// The commands an input adapter may issue, one per discrete user
/// action.
#[cfg_attr(feature = "wasm-bindgen", wasm_bindgen)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Left,
    Right,
    SoftDrop,
    RotateCw,
    HardDrop,
    Hold,
}

/// One game session. Owns the board, the bag and the falling piece;
/// all mutation happens through `tick` and the command methods.
#[derive(Debug)]
pub struct Game {
    pub board: Board,
    pub piece: Piece,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub hold: Option<PieceKind>,
    can_hold: bool,
    bag: SevenBag,
    last_drop: f64,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        let mut bag = SevenBag::new(config.seed);
        let piece = bag.next_piece();
        Self {
            board: Board::default(),
            piece,
            score: 0,
            level: 1,
            lines: 0,
            hold: None,
            can_hold: true,
            bag,
            last_drop: 0.,
        }
    }

    /// Milliseconds between automatic drops, derived from the current
    /// level on every tick.
    pub fn drop_interval(&self) -> f64 {
        (BASE_INTERVAL - f64::from(self.level - 1) * INTERVAL_STEP).max(MIN_INTERVAL)
    }

    /// Advances the drop clock. `now` is the host's monotonic timestamp
    /// in milliseconds (a `requestAnimationFrame` timestamp in the
    /// browser). Once the interval has elapsed the piece falls one row,
    /// locking if it cannot; the clock restarts either way.
    pub fn tick(&mut self, now: f64) {
        if now - self.last_drop > self.drop_interval() {
            if !self.board.try_move(&mut self.piece, 0, 1) {
                self.lock();
            }
            self.last_drop = now;
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Left => {
                self.move_left();
            }
            Action::Right => {
                self.move_right();
            }
            Action::SoftDrop => {
                self.soft_drop();
            }
            Action::RotateCw => {
                self.rotate_cw();
            }
            Action::HardDrop => self.hard_drop(),
            Action::Hold => self.hold(),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.board.try_move(&mut self.piece, -1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.board.try_move(&mut self.piece, 1, 0)
    }

    pub fn soft_drop(&mut self) -> bool {
        self.board.try_move(&mut self.piece, 0, 1)
    }

    pub fn rotate_cw(&mut self) -> bool {
        self.board.rotate(&mut self.piece)
    }

    /// Drops the piece to its resting position and locks it without
    /// waiting for the timer.
    pub fn hard_drop(&mut self) {
        while self.board.try_move(&mut self.piece, 0, 1) {}
        self.lock();
    }

    /// Stashes the falling piece's kind, swapping with a previously
    /// held kind if there is one. Usable once per piece lifetime.
    pub fn hold(&mut self) {
        if !self.can_hold {
            return;
        }
        self.can_hold = false;
        match self.hold.take() {
            None => {
                self.hold = Some(self.piece.kind);
                self.piece = self.bag.next_piece();
            }
            Some(held) => {
                self.hold = Some(self.piece.kind);
                self.piece = Piece::new(held);
            }
        }
    }

    fn lock(&mut self) {
        self.board.merge(&self.piece);
        let cleared = self.board.clear_full_rows();
        self.score += cleared * LINE_SCORE;
        self.lines += cleared;
        self.level = 1 + self.lines / LINES_PER_LEVEL;
        self.can_hold = true;
        self.piece = self.bag.next_piece();
    }
}

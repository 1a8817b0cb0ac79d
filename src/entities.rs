//! All game entity types. Pure data, no logic.

/// Strength of a harmful obstacle.  Also decides which cue a collision plays.
pub const DAMAGE: i32 = -20;

pub const MAX_HEALTH: i32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Default,
    /// Game ends when the countdown reaches zero.
    Timed,
    /// Any negative-strength collision ends the game.
    Hardcore,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Idle,
    Running,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn image(self) -> &'static str {
        match self {
            Facing::Left => "girl-left.png",
            Facing::Right => "girl-right.png",
        }
    }
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// A positioned rectangle.  Coordinates are play-field units, `y` grows down.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub width: f64,
    pub height: f64,
    pub image: &'static str,
    pub x: f64,
    pub y: f64,
    /// Signed effect on the player: negative hurts, positive heals or scores.
    pub strength: i32,
}

impl Entity {
    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub body: Entity,
    pub health: i32,
    pub level: u32,
    pub score: u32,
    pub mode: Mode,
    pub facing: Facing,
    /// Period of one smoothed-movement sub-step.
    pub step_ms: u64,
}

/// Size of the visible play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

impl Default for Field {
    fn default() -> Self {
        Field { width: 600.0, height: 300.0 }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub obstacles: Vec<Entity>,
    /// Horizontal scroll of the background image, wraps at field width.
    pub background_x: f64,
    pub field: Field,
    pub status: GameStatus,
    /// Seconds left on the clock; only `Some` in timed mode.
    pub countdown: Option<u32>,
}

impl GameState {
    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }
}

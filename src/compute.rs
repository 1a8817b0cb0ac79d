//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (and, where needed, an RNG handle) and returns a brand-new
//! `GameState`.  Side effects are limited to the injected RNG.  Timers,
//! game-over cleanup and event publishing live in `session`.

use log::debug;
use rand::Rng;

use crate::catalog::spawn_random;
use crate::collision::first_overlap;
use crate::difficulty::is_level_up;
use crate::entities::{
    Entity, Facing, Field, GameState, GameStatus, Mode, Player, DAMAGE, MAX_HEALTH,
};

/// Horizontal distance an obstacle travels per tick.
const OBSTACLE_STEP: f64 = 1.0;

const BACKGROUND_STEP: f64 = 0.2;

/// Total distance of one arrow-key glide, and the number of sub-steps it is
/// split into.
pub const GLIDE_DISTANCE: f64 = 10.0;
pub const GLIDE_STEPS: u8 = 10;

/// Keep this far from the field edges when starting a glide.
const EDGE_MARGIN: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Positive,
    Negative,
    /// Looping music, started with each game.
    Background,
}

/// What a collision did to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Health { health: i32 },
    Scored { score: u32, level_up: bool },
    /// Health hit zero, or hardcore damage.  The caller ends the game.
    Fatal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collision {
    pub strength: i32,
    pub outcome: Outcome,
}

impl Collision {
    pub fn cue(&self) -> Cue {
        if self.strength == DAMAGE {
            Cue::Negative
        } else {
            Cue::Positive
        }
    }
}

/// An in-flight smoothed move: `remaining` sub-steps of (`dx`, `dy`) each.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glide {
    pub dx: f64,
    pub dy: f64,
    pub remaining: u8,
}

// ── Constructors ─────────────────────────────────────────────────────────────

fn new_player(mode: Mode, step_ms: u64) -> Player {
    let facing = Facing::Right;
    Player {
        body: Entity {
            width: 125.0,
            height: 46.0,
            image: facing.image(),
            x: 0.0,
            y: 50.0,
            strength: 0,
        },
        health: MAX_HEALTH,
        level: 1,
        score: 0,
        mode,
        facing,
        step_ms,
    }
}

/// State shown before the first game starts.
pub fn idle_state(field: Field, step_ms: u64) -> GameState {
    GameState {
        player: new_player(Mode::Default, step_ms),
        obstacles: Vec::new(),
        background_x: 0.0,
        field,
        status: GameStatus::Idle,
        countdown: None,
    }
}

/// Fresh running state for `mode`, with no obstacles yet.
pub fn init_state(mode: Mode, field: Field, step_ms: u64, countdown_secs: u32) -> GameState {
    GameState {
        player: new_player(mode, step_ms),
        obstacles: Vec::new(),
        background_x: 0.0,
        field,
        status: GameStatus::Running,
        countdown: (mode == Mode::Timed).then_some(countdown_secs),
    }
}

pub fn spawn_obstacle(state: &GameState, rng: &mut impl Rng) -> GameState {
    let mut obstacles = state.obstacles.clone();
    obstacles.push(spawn_random(rng, &state.field));
    GameState {
        obstacles,
        ..state.clone()
    }
}

// ── Per-tick steps ───────────────────────────────────────────────────────────

/// Move every obstacle left and replace the ones that left the field.
/// Replacements are appended and not moved this tick.
pub fn advance_obstacles(state: &GameState, rng: &mut impl Rng) -> GameState {
    let moved: Vec<Entity> = state
        .obstacles
        .iter()
        .map(|o| Entity {
            x: o.x - OBSTACLE_STEP,
            ..o.clone()
        })
        .collect();

    let (mut kept, gone): (Vec<Entity>, Vec<Entity>) =
        moved.into_iter().partition(|o| o.right() > 0.0);

    for _ in &gone {
        kept.push(spawn_random(rng, &state.field));
    }

    GameState {
        obstacles: kept,
        ..state.clone()
    }
}

pub fn scroll_background(state: &GameState) -> GameState {
    let mut background_x = state.background_x + BACKGROUND_STEP;
    if background_x >= state.field.width {
        background_x = 0.0;
    }
    GameState {
        background_x,
        ..state.clone()
    }
}

/// Apply a collision of strength `s` to the player.  Does not touch the
/// obstacle list.
pub fn apply_strength(state: &GameState, s: i32) -> (GameState, Outcome) {
    let p = &state.player;

    if p.mode == Mode::Hardcore && s < 0 {
        return (state.clone(), Outcome::Fatal);
    }

    if (p.health == MAX_HEALTH && s < 0) || p.health < MAX_HEALTH {
        let health = (p.health + s).clamp(0, MAX_HEALTH);
        let next = GameState {
            player: Player {
                health,
                ..p.clone()
            },
            ..state.clone()
        };
        let outcome = if health == 0 {
            Outcome::Fatal
        } else {
            Outcome::Health { health }
        };
        return (next, outcome);
    }

    let score = p.score + 1;
    let level_up = is_level_up(score);
    let level = if level_up { p.level + 1 } else { p.level };
    let next = GameState {
        player: Player {
            score,
            level,
            ..p.clone()
        },
        ..state.clone()
    };
    (next, Outcome::Scored { score, level_up })
}

/// Resolve at most one collision: the first overlapping obstacle in list
/// order is removed, applied and replaced.  Later overlaps wait for the next
/// check.
pub fn resolve_collision(state: &GameState, rng: &mut impl Rng) -> (GameState, Option<Collision>) {
    let Some(idx) = first_overlap(&state.player.body, &state.obstacles) else {
        return (state.clone(), None);
    };

    let hit = &state.obstacles[idx];
    debug!("player hit {} (strength {})", hit.image, hit.strength);
    let strength = hit.strength;

    let mut obstacles = state.obstacles.clone();
    obstacles.remove(idx);
    obstacles.push(spawn_random(rng, &state.field));

    let without_hit = GameState {
        obstacles,
        ..state.clone()
    };
    let (next, outcome) = apply_strength(&without_hit, strength);
    (next, Some(Collision { strength, outcome }))
}

/// One main-loop tick: move, respawn, scroll, then resolve a collision.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> (GameState, Option<Collision>) {
    let state = advance_obstacles(state, rng);
    let state = scroll_background(&state);
    resolve_collision(&state, rng)
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Turn the player for horizontal input and, if the move stays inside the
/// margins, return the glide to run.
pub fn begin_glide(state: &GameState, dir: Direction) -> (GameState, Option<Glide>) {
    let p = &state.player;
    let body = &p.body;
    let field = &state.field;

    let (allowed, dx, dy) = match dir {
        Direction::Up => (body.y >= EDGE_MARGIN, 0.0, -GLIDE_DISTANCE),
        Direction::Down => (
            body.y <= field.height - body.height - EDGE_MARGIN,
            0.0,
            GLIDE_DISTANCE,
        ),
        Direction::Right => (
            body.x <= field.width - body.width - EDGE_MARGIN,
            GLIDE_DISTANCE,
            0.0,
        ),
        Direction::Left => (body.x >= EDGE_MARGIN, -GLIDE_DISTANCE, 0.0),
    };

    let facing = match dir {
        Direction::Left => Facing::Left,
        Direction::Right => Facing::Right,
        Direction::Up | Direction::Down => p.facing,
    };

    let next = GameState {
        player: Player {
            facing,
            body: Entity {
                image: facing.image(),
                ..body.clone()
            },
            ..p.clone()
        },
        ..state.clone()
    };

    let glide = allowed.then(|| Glide {
        dx: dx / GLIDE_STEPS as f64,
        dy: dy / GLIDE_STEPS as f64,
        remaining: GLIDE_STEPS,
    });
    (next, glide)
}

/// Apply one glide sub-step.  Returns the glide with one fewer step left,
/// or `None` once it has finished.
pub fn glide_step(state: &GameState, glide: Glide) -> (GameState, Option<Glide>) {
    if glide.remaining == 0 {
        return (state.clone(), None);
    }
    let body = &state.player.body;
    let next = GameState {
        player: Player {
            body: Entity {
                x: body.x + glide.dx,
                y: body.y + glide.dy,
                ..body.clone()
            },
            ..state.player.clone()
        },
        ..state.clone()
    };
    let remaining = glide.remaining - 1;
    let rest = (remaining > 0).then_some(Glide { remaining, ..glide });
    (next, rest)
}

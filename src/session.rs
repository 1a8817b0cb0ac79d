//! One game, start to finish.
//!
//! `GameSession` owns the state, the RNG and every timer.  The front-end
//! calls [`GameSession::advance`] with elapsed wall time and
//! [`GameSession::handle_input`] for arrow keys, then drains
//! [`SessionEvent`]s to draw and play sounds.  All mutation happens inside
//! those calls, one timer firing at a time.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::compute::{self, Collision, Cue, Direction, Glide, Outcome};
use crate::config::SessionConfig;
use crate::difficulty::{loop_interval_ms, HARDCORE_SPAWN_MS};
use crate::entities::{GameState, GameStatus, Mode};
use crate::scheduler::{Fired, Scheduler, TimerId, TimerKind};

const COUNTDOWN_TICK_MS: u64 = 1_000;

/// Plain values pushed to the renderer, audio and HUD collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Render,
    Cue(Cue),
    ScoreChanged(u32),
    HealthChanged(i32),
    LevelChanged(u32),
    CountdownChanged(u32),
    CountdownHidden,
    GameOver { score: u32 },
}

/// Ids of the timers this session currently owns.  A firing whose id is not
/// listed here is stale.
#[derive(Clone, Copy, Debug, Default)]
struct Timers {
    game_loop: Option<TimerId>,
    hardcore: Option<TimerId>,
    countdown: Option<TimerId>,
    movement: Option<TimerId>,
}

impl Timers {
    fn slot(&self, kind: TimerKind) -> Option<TimerId> {
        match kind {
            TimerKind::GameLoop => self.game_loop,
            TimerKind::HardcoreSpawn => self.hardcore,
            TimerKind::Countdown => self.countdown,
            TimerKind::Movement => self.movement,
        }
    }
}

pub struct GameSession<R: Rng = StdRng> {
    config: SessionConfig,
    rng: R,
    scheduler: Scheduler,
    timers: Timers,
    state: GameState,
    glide: Option<Glide>,
    input_subscribed: bool,
    events: Vec<SessionEvent>,
}

impl GameSession<StdRng> {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(config: SessionConfig, rng: R) -> Self {
        let state = compute::idle_state(config.field, config.step_ms);
        GameSession {
            config,
            rng,
            scheduler: Scheduler::new(),
            timers: Timers::default(),
            state,
            glide: None,
            input_subscribed: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn is_input_subscribed(&self) -> bool {
        self.input_subscribed
    }

    /// Current main loop period for the player's level.
    pub fn loop_interval_ms(&self) -> u64 {
        loop_interval_ms(self.config.base_interval_ms, self.state.player.level)
    }

    pub fn timer(&self, kind: TimerKind) -> Option<TimerId> {
        self.timers.slot(kind)
    }

    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn glide(&self) -> Option<Glide> {
        self.glide
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Controls ─────────────────────────────────────────────────────────────

    /// Begin a new game, abandoning any game in progress.
    pub fn start(&mut self, mode: Mode) {
        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.glide = None;

        let fresh = compute::init_state(
            mode,
            self.config.field,
            self.config.step_ms,
            self.config.countdown_secs,
        );
        self.state = compute::spawn_obstacle(&fresh, &mut self.rng);
        self.input_subscribed = true;

        let player = &self.state.player;
        self.events.extend([
            SessionEvent::Cue(Cue::Background),
            SessionEvent::ScoreChanged(player.score),
            SessionEvent::HealthChanged(player.health),
            SessionEvent::LevelChanged(player.level),
        ]);

        if mode == Mode::Hardcore {
            self.timers.hardcore = Some(
                self.scheduler
                    .set_interval(TimerKind::HardcoreSpawn, HARDCORE_SPAWN_MS),
            );
        }
        let interval = self.loop_interval_ms();
        self.timers.game_loop = Some(self.scheduler.set_interval(TimerKind::GameLoop, interval));
        if let Some(secs) = self.state.countdown {
            self.timers.countdown = Some(
                self.scheduler
                    .set_interval(TimerKind::Countdown, COUNTDOWN_TICK_MS),
            );
            self.events.push(SessionEvent::CountdownChanged(secs));
        }

        info!("game started: mode={:?} interval={}ms", mode, interval);
        self.events.push(SessionEvent::Render);
    }

    pub fn stop(&mut self) {
        self.game_over();
    }

    /// Arrow-key input.  Starts a smoothed glide, replacing any glide still
    /// in flight.  Ignored while input is unsubscribed.
    pub fn handle_input(&mut self, dir: Direction) {
        if !self.input_subscribed || !self.state.is_running() {
            return;
        }

        let (next, glide) = compute::begin_glide(&self.state, dir);
        self.state = next;
        if let Some(glide) = glide {
            if let Some(old) = self.timers.movement.take() {
                self.scheduler.cancel(old);
                debug!("glide interrupted by {:?}", dir);
            }
            self.glide = Some(glide);
            self.timers.movement = Some(
                self.scheduler
                    .set_interval(TimerKind::Movement, self.state.player.step_ms),
            );
        }
        self.refresh();
    }

    // ── Time ─────────────────────────────────────────────────────────────────

    /// Run every timer due within the next `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: u64) {
        let until = self.scheduler.now_ms() + dt_ms;
        while let Some(fired) = self.scheduler.pop_due(until) {
            self.fire(fired);
        }
        self.scheduler.settle(until);
    }

    /// Handle one timer firing.  Firings from cancelled timers, or arriving
    /// while no game is running, change nothing.
    pub fn fire(&mut self, fired: Fired) {
        if self.timers.slot(fired.kind) != Some(fired.id) || !self.state.is_running() {
            debug!("ignoring stale {:?} timer at {}ms", fired.kind, fired.at_ms);
            return;
        }

        match fired.kind {
            TimerKind::GameLoop => self.on_tick(),
            TimerKind::HardcoreSpawn => self.on_hardcore_spawn(),
            TimerKind::Countdown => self.on_countdown(),
            TimerKind::Movement => self.on_glide_step(),
        }
    }

    fn on_tick(&mut self) {
        let (next, collision) = compute::tick(&self.state, &mut self.rng);
        self.state = next;
        if let Some(collision) = collision {
            self.apply_collision(collision);
        }
        self.render();
    }

    fn on_hardcore_spawn(&mut self) {
        self.state = compute::spawn_obstacle(&self.state, &mut self.rng);
        debug!("hardcore spawn, {} obstacles", self.state.obstacles.len());
        self.refresh();
    }

    fn on_countdown(&mut self) {
        let remaining = self.state.countdown.unwrap_or(0).saturating_sub(1);
        self.state.countdown = Some(remaining);
        self.events.push(SessionEvent::CountdownChanged(remaining));
        if remaining == 0 {
            info!("time is up");
            self.game_over();
        }
    }

    fn on_glide_step(&mut self) {
        let Some(glide) = self.glide else {
            return;
        };
        let (next, rest) = compute::glide_step(&self.state, glide);
        self.state = next;
        self.glide = rest;
        if rest.is_none() {
            if let Some(id) = self.timers.movement.take() {
                self.scheduler.cancel(id);
            }
        }
        self.refresh();
    }

    /// Collision check plus render, used after anything that moves the
    /// player or adds an obstacle outside the main tick.
    fn refresh(&mut self) {
        let (next, collision) = compute::resolve_collision(&self.state, &mut self.rng);
        self.state = next;
        if let Some(collision) = collision {
            self.apply_collision(collision);
        }
        self.render();
    }

    /// Game over draws its own final frame.
    fn render(&mut self) {
        if self.state.is_running() {
            self.events.push(SessionEvent::Render);
        }
    }

    fn apply_collision(&mut self, collision: Collision) {
        self.events.push(SessionEvent::Cue(collision.cue()));
        match collision.outcome {
            Outcome::Health { health } => {
                self.events.push(SessionEvent::HealthChanged(health));
            }
            Outcome::Scored { score, level_up } => {
                self.events.push(SessionEvent::ScoreChanged(score));
                if level_up {
                    let level = self.state.player.level;
                    info!("level up: {}", level);
                    self.events.push(SessionEvent::LevelChanged(level));
                    self.rearm_difficulty();
                }
            }
            Outcome::Fatal => {
                self.events
                    .push(SessionEvent::HealthChanged(self.state.player.health));
                self.game_over();
            }
        }
    }

    /// Restart the loop timer at the current level's speed.  The hardcore
    /// spawner is restarted with it, so its phase resets on level up.
    fn rearm_difficulty(&mut self) {
        for id in [self.timers.game_loop.take(), self.timers.hardcore.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(id);
        }

        let interval = self.loop_interval_ms();
        self.timers.game_loop = Some(self.scheduler.set_interval(TimerKind::GameLoop, interval));
        if self.state.player.mode == Mode::Hardcore {
            self.timers.hardcore = Some(
                self.scheduler
                    .set_interval(TimerKind::HardcoreSpawn, HARDCORE_SPAWN_MS),
            );
        }
        debug!("loop re-armed at {}ms", interval);
    }

    /// The single way a game ends.  Safe to call repeatedly.
    fn game_over(&mut self) {
        if self.state.status != GameStatus::Running {
            return;
        }

        self.scheduler.cancel_all();
        self.timers = Timers::default();
        self.glide = None;
        self.input_subscribed = false;

        self.state.status = GameStatus::GameOver;
        self.state.obstacles.clear();
        if self.state.countdown.take().is_some() {
            self.events.push(SessionEvent::CountdownHidden);
        }

        let score = self.state.player.score;
        info!("game over: score={} level={}", score, self.state.player.level);
        self.events.push(SessionEvent::GameOver { score });
        self.events.push(SessionEvent::Render);
    }
}

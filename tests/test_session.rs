use meadow_run::compute::{Cue, Direction};
use meadow_run::config::SessionConfig;
use meadow_run::difficulty::{loop_interval_ms, HARDCORE_SPAWN_MS};
use meadow_run::entities::*;
use meadow_run::scheduler::{Fired, TimerKind};
use meadow_run::session::*;

fn config() -> SessionConfig {
    SessionConfig {
        seed: Some(42),
        ..SessionConfig::default()
    }
}

/// A field so wide that nothing spawned reaches the player within a minute.
fn quiet_config() -> SessionConfig {
    SessionConfig {
        field: Field {
            width: 1_000_000.0,
            height: 300.0,
        },
        ..config()
    }
}

// ── start ─────────────────────────────────────────────────────────────────────

#[test]
fn new_session_is_idle() {
    let session = GameSession::new(config());
    assert_eq!(session.state().status, GameStatus::Idle);
    assert!(!session.is_input_subscribed());
    assert_eq!(session.active_timers(), 0);
}

#[test]
fn start_resets_and_arms_loop() {
    let mut session = GameSession::new(config());
    session.start(Mode::Default);

    let s = session.state();
    assert_eq!(s.status, GameStatus::Running);
    assert_eq!(s.obstacles.len(), 1);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.player.level, 1);
    assert_eq!(s.player.score, 0);
    assert!(session.is_input_subscribed());
    assert!(session.timer(TimerKind::GameLoop).is_some());
    assert!(session.timer(TimerKind::HardcoreSpawn).is_none());
    assert!(session.timer(TimerKind::Countdown).is_none());
    assert_eq!(session.loop_interval_ms(), 19);

    let events = session.drain_events();
    assert_eq!(events[0], SessionEvent::Cue(Cue::Background));
    assert!(events.contains(&SessionEvent::HealthChanged(100)));
    assert!(events.contains(&SessionEvent::LevelChanged(1)));
    assert_eq!(events.last(), Some(&SessionEvent::Render));
}

#[test]
fn start_hardcore_arms_spawner() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Hardcore);
    assert!(session.timer(TimerKind::HardcoreSpawn).is_some());

    session.advance(HARDCORE_SPAWN_MS);
    assert_eq!(session.state().obstacles.len(), 2);
    session.advance(HARDCORE_SPAWN_MS);
    assert_eq!(session.state().obstacles.len(), 3);
}

#[test]
fn start_timed_shows_countdown() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Timed);
    assert_eq!(session.state().countdown, Some(60));
    assert!(session
        .drain_events()
        .contains(&SessionEvent::CountdownChanged(60)));

    session.advance(1_000);
    assert_eq!(session.state().countdown, Some(59));
}

#[test]
fn restart_abandons_previous_game() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Timed);
    session.advance(30_000);
    session.start(Mode::Default);
    assert_eq!(session.state().countdown, None);
    assert!(session.timer(TimerKind::Countdown).is_none());
    // The first game's countdown would have expired here
    session.advance(40_000);
    assert_eq!(session.state().status, GameStatus::Running);
}

// ── Timed mode ────────────────────────────────────────────────────────────────

#[test]
fn timed_game_ends_after_sixty_seconds() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Timed);
    session.drain_events();

    session.advance(59_999);
    assert_eq!(session.state().status, GameStatus::Running);
    assert_eq!(session.state().countdown, Some(1));

    session.advance(1);
    let s = session.state();
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.player.score, 0);
    assert_eq!(s.countdown, None);
    assert!(s.obstacles.is_empty());

    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::CountdownHidden));
    assert!(events.contains(&SessionEvent::GameOver { score: 0 }));
}

// ── stop / game over ──────────────────────────────────────────────────────────

#[test]
fn stop_cancels_everything() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Hardcore);
    session.handle_input(Direction::Down);
    assert!(session.active_timers() >= 3);

    session.stop();
    assert_eq!(session.active_timers(), 0);
    assert!(session.glide().is_none());
    assert!(!session.is_input_subscribed());
    assert!(session.state().obstacles.is_empty());
    assert_eq!(session.state().status, GameStatus::GameOver);
}

#[test]
fn nothing_changes_after_stop() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Timed);
    session.advance(500);
    session.stop();
    session.drain_events();

    let frozen = session.state().clone();
    session.advance(120_000);
    session.handle_input(Direction::Right);
    assert_eq!(session.state(), &frozen);
    assert!(session.drain_events().is_empty());
}

#[test]
fn stale_timer_firing_is_ignored() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    let old_loop = session.timer(TimerKind::GameLoop).unwrap();
    session.stop();
    session.drain_events();

    let frozen = session.state().clone();
    session.fire(Fired {
        id: old_loop,
        kind: TimerKind::GameLoop,
        at_ms: 19,
    });
    assert_eq!(session.state(), &frozen);
    assert!(session.drain_events().is_empty());
}

#[test]
fn previous_game_timer_is_ignored_in_new_game() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    let old_loop = session.timer(TimerKind::GameLoop).unwrap();
    session.stop();
    session.start(Mode::Default);
    session.drain_events();

    let before = session.state().clone();
    session.fire(Fired {
        id: old_loop,
        kind: TimerKind::GameLoop,
        at_ms: 19,
    });
    assert_eq!(session.state(), &before);
}

#[test]
fn game_over_is_idempotent() {
    let mut session = GameSession::new(config());
    session.start(Mode::Default);
    session.stop();
    let first = session.drain_events();
    assert_eq!(
        first
            .iter()
            .filter(|e| matches!(e, SessionEvent::GameOver { .. }))
            .count(),
        1
    );

    session.stop();
    assert!(session.drain_events().is_empty());
}

#[test]
fn stop_before_any_game_is_noop() {
    let mut session = GameSession::new(config());
    session.stop();
    assert_eq!(session.state().status, GameStatus::Idle);
    assert!(session.drain_events().is_empty());
}

// ── Loop ──────────────────────────────────────────────────────────────────────

#[test]
fn loop_moves_obstacles_each_interval() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    let x0 = session.state().obstacles[0].x;
    session.advance(19 * 10);
    assert_eq!(session.state().obstacles[0].x, x0 - 10.0);
    let renders = session
        .drain_events()
        .iter()
        .filter(|e| **e == SessionEvent::Render)
        .count();
    assert_eq!(renders, 11); // one from start, one per tick
}

#[test]
fn invariants_hold_over_long_play() {
    // A narrow field keeps obstacles crossing the player often.
    let cfg = SessionConfig {
        field: Field {
            width: 200.0,
            height: 120.0,
        },
        ..config()
    };
    let mut session = GameSession::new(cfg.clone());
    session.start(Mode::Default);

    let mut last_score = 0;
    let mut last_level = 1;
    let mut last_loop = session.timer(TimerKind::GameLoop);
    for _ in 0..3_000 {
        session.advance(7);
        let s = session.state();
        let p = &s.player;
        assert!((0..=100).contains(&p.health));
        assert_eq!(p.level, 1 + p.score / 5);
        assert!(p.score >= last_score);
        last_score = p.score;
        match s.status {
            GameStatus::Running => {
                assert_eq!(s.obstacles.len(), 1);
                assert!(p.health > 0);
                assert_eq!(
                    session.loop_interval_ms(),
                    loop_interval_ms(cfg.base_interval_ms, p.level)
                );
                // The loop timer only changes when the level does
                let current_loop = session.timer(TimerKind::GameLoop);
                if p.level == last_level {
                    assert_eq!(current_loop, last_loop);
                }
                last_level = p.level;
                last_loop = current_loop;
            }
            GameStatus::GameOver => {
                assert!(s.obstacles.is_empty());
                assert_eq!(session.active_timers(), 0);
                break;
            }
            GameStatus::Idle => unreachable!(),
        }
    }
}

#[test]
fn game_over_event_carries_final_score() {
    let cfg = SessionConfig {
        field: Field {
            width: 200.0,
            height: 120.0,
        },
        ..config()
    };
    let mut session = GameSession::new(cfg);
    session.start(Mode::Hardcore);
    session.drain_events();
    for _ in 0..600 {
        session.advance(100);
        if session.state().status == GameStatus::GameOver {
            break;
        }
    }
    assert_eq!(session.state().status, GameStatus::GameOver);
    let score = session.state().player.score;
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::GameOver { score }));
    assert_eq!(events.last(), Some(&SessionEvent::Render));
}

// ── Movement ──────────────────────────────────────────────────────────────────

#[test]
fn arrow_glides_over_ten_substeps() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    session.handle_input(Direction::Right);
    assert!(session.glide().is_some());

    session.advance(20 * 5);
    assert!((session.state().player.body.x - 5.0).abs() < 1e-9);

    session.advance(20 * 5);
    assert!((session.state().player.body.x - 10.0).abs() < 1e-9);
    assert!(session.glide().is_none());
    assert!(session.timer(TimerKind::Movement).is_none());
}

#[test]
fn new_arrow_replaces_glide_in_flight() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    session.handle_input(Direction::Right);
    session.advance(20 * 5);
    session.handle_input(Direction::Up);
    session.advance(20 * 20);

    let body = &session.state().player.body;
    assert!((body.x - 5.0).abs() < 1e-9);
    assert!((body.y - 40.0).abs() < 1e-9);
}

#[test]
fn left_at_edge_only_turns() {
    let mut session = GameSession::new(quiet_config());
    session.start(Mode::Default);
    session.handle_input(Direction::Left);
    assert!(session.glide().is_none());
    assert_eq!(session.state().player.facing, Facing::Left);
    assert_eq!(session.state().player.body.x, 0.0);
}

#[test]
fn input_before_start_is_ignored() {
    let mut session = GameSession::new(config());
    session.handle_input(Direction::Down);
    assert!(session.glide().is_none());
    assert_eq!(session.state().player.body.y, 50.0);
}

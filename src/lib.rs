//! Meadow Run: a side-scrolling catch-and-dodge game.
//!
//! The library is headless. `session::GameSession` owns one game and is
//! driven by a front-end that feeds it elapsed time and input, then drains
//! `SessionEvent`s to draw frames and play cues.

pub mod catalog;
pub mod collision;
pub mod compute;
pub mod config;
pub mod difficulty;
pub mod entities;
pub mod scheduler;
pub mod session;

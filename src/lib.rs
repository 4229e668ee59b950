//! Duel Tetris (workspace facade crate).
//!
//! Re-exports the game state core and wire types under
//! `duel_tetris::{core,types}`, plus the action-log replay runner used by the
//! `duel-tetris` binary.

pub use duel_tetris_core as core;
pub use duel_tetris_types as types;

pub mod config;
pub mod replay;

//! # Base types for chessrule
//!
//! This is an auxiliary crate for `chessrule`, which contains coordinates, colors, pieces
//! and the small amount of board geometry shared by all the movement rules.
//!
//! Normally you don't want to use this crate directly. Use `chessrule` instead, which
//! re-exports everything from here.

pub mod bitboard;
pub mod geometry;
pub mod types;

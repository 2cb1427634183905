//! `tuner-card` library crate.
//!
//! The adaptive threshold card component and the terminal loop that hosts
//! it. The binary entrypoint lives in `main.rs`.

pub mod component;
pub mod config;
pub mod source;
pub mod terminal;

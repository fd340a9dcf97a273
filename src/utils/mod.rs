//!
//! utils/mod.rs
//!
//! Support code shared by the keymap.
//!

pub mod logger;

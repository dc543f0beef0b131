//! # Rendering Module
//!
//! Plain-text views of a generated grid for the CLI and for debugging
//! failed generations. Real tile drawing belongs to the game client.

pub mod ascii;

pub use ascii::*;

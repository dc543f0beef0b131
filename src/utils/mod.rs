//! # Utilities Module
//!
//! Randomness helpers, attempt-budget bookkeeping, and connectivity checks
//! shared by the generation stages.

pub mod attempts;
pub mod connectivity;
pub mod random;

pub use attempts::*;
pub use connectivity::*;
pub use random::*;

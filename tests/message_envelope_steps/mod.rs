//! Step definitions for message envelope scenarios.

mod given;
mod then;
mod when;
pub mod world;

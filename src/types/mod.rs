//! Core records exchanged between the engine, its caller and its hooks.

pub mod generation;
pub mod message;
pub mod usage;

pub use generation::*;
pub use message::*;
pub use usage::*;

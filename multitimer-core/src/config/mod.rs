//! Configuration types
//!
//! Engine tunables. Firmware builds embed defaults generated from a TOML
//! file and may override them with a postcard blob stored in flash.

pub mod engine;

pub use engine::*;

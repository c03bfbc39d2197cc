//! Platform abstraction layer
//!
//! The render/input collaborator delivers discrete input events; this module
//! defines them and maps key names onto them.

pub mod input;

pub use input::InputEvent;

//! Rendering observers
//!
//! The environment never draws. Anything that wants to show the game
//! implements [`Renderer`] and is attached to the environment, which hands it a
//! read-only view of the state after every transition.

pub mod renderer;

pub use renderer::{Renderer, TerminalRenderer, draw};

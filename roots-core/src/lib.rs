//! Core simulation for the growing-roots animation.
//!
//! Main components:
//! - [`root`] — root nodes, the per-tree arena and the growth step.
//! - [`spawn`] — grow/retract waves and the pointer root.
//! - [`schedule`] — owns planted trees and steps them once per frame.
//! - [`animation`] — the frame loop and all simulation state.
//! - [`pointer`] / [`scroll`] — input trackers.
//! - [`surface`] — the RGBA canvas the roots are drawn onto.
//! - [`config`] — tunable constants, loadable from RON.
//! - [`types`] — shared ids.

pub mod animation;
pub mod config;
pub mod pointer;
pub mod root;
pub mod schedule;
pub mod scroll;
pub mod spawn;
pub mod surface;
pub mod types;

pub use animation::Simulation;
pub use config::Config;

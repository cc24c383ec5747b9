//! Controller layer: UI events, root state transitions, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod state;

//! Controller layer: UI events, dashboard state transitions, and command orchestration.

pub mod dashboard;
pub mod events;
pub mod orchestration;

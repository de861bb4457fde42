pub mod commands;
mod controller;
mod events;
mod state;

pub use controller::{AppController, InsightsView};
pub use events::AppEvent;
pub use state::{AppSnapshot, AppState, Effects, Intent};

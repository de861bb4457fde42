pub mod state;

pub use state::{View, ViewNavigator};

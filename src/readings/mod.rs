pub mod demo;
mod store;
pub mod views;

pub use store::ReadingStore;
pub use views::{ChartSeries, DashboardCard, DashboardView};

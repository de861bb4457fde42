mod monitor;
pub mod probe;

pub use monitor::{
    ConnectivityMonitor, ConnectivityNotifier, ConnectivitySignal, ConnectivitySink,
};
pub use probe::reachability_probe;

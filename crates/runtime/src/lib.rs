pub mod event_bus;
pub mod frame;
pub mod metrics;
pub mod refresh;

pub use event_bus::*;
pub use frame::*;
pub use metrics::*;
pub use refresh::*;

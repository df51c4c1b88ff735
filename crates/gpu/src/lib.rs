//! GPU-side collaborators: the resource backend seam, residency accounting,
//! and per-frame draw command collection.

pub mod headless;
pub mod ledger;
pub mod renderer;
pub mod resources;

pub use headless::*;
pub use ledger::*;
pub use renderer::*;
pub use resources::*;

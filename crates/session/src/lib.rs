//! The viewer's render session: one live point grid, a static graticule and a
//! swappable globe texture, with every GPU allocation released on replacement.

pub mod config;
pub mod controls;
pub mod error;
pub mod session;
pub mod slot;
pub mod status;
pub mod texture;

pub use config::*;
pub use controls::*;
pub use error::*;
pub use session::*;
pub use slot::*;
pub use status::*;
pub use texture::*;

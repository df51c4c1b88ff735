pub mod drawable3d;
pub mod material;
pub mod visibility;

pub use drawable3d::*;
pub use material::*;
pub use visibility::*;

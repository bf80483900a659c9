pub mod duration;
pub mod html;

pub use duration::*;
pub use html::*;

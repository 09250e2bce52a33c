pub mod alignment_tool;
pub mod overlay;
pub mod picking;
pub mod selection;
pub mod store;
pub mod view;
pub mod visibility;

pub use alignment_tool::*;
pub use overlay::*;
pub use picking::*;
pub use selection::*;
pub use store::*;
pub use view::*;
pub use visibility::*;

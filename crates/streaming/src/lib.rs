pub mod config;
pub mod dispatch;
pub mod error;
pub mod moon;
pub mod protocol;
pub mod request;
pub mod source;
pub mod weather;

pub use config::*;
pub use dispatch::*;
pub use error::*;
pub use moon::*;
pub use protocol::*;
pub use request::*;
pub use source::*;
pub use weather::*;

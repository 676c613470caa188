pub mod tag;
pub mod selection;
pub mod payload;
pub mod session;
pub mod config;

pub use tag::*;
pub use selection::*;
pub use payload::*;
pub use session::*;
pub use config::*;

pub mod common;
pub mod messages;
pub mod page;
pub mod settings;
pub mod status;

pub use common::*;
pub use messages::*;
pub use page::*;
pub use settings::*;
pub use status::*;

pub mod message_service;
pub mod notify_service;

pub use message_service::{MessageService, ResolvedMessage};
pub use notify_service::NotifyService;

//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod messages;
pub mod title;

pub use entities::*;
pub use error::DomainError;
pub use messages::{notification_text, MessageKind, DEFAULT_LANGUAGE, FALLBACK_LANGUAGE};
pub use title::{resolve_title, UNTITLED};

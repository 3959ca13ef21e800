// src/session/mod.rs
// Conversation sessions kept for the lifetime of the process

mod store;
mod taste;
mod types;

pub use store::{SessionHandle, SessionStore, Turn};
pub use taste::extract_themes;
pub use types::{Message, Role, Session, TasteProfile};

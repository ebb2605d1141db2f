pub mod client;
pub mod config;
pub mod error;
pub mod state;
pub mod view;
pub mod widget;

// Re-export main types for convenience
pub use client::{ChatBackend, HttpChatClient, DEFAULT_ENDPOINT};
pub use config::Config;
pub use error::ChatError;
pub use state::{ConversationLog, Message, Sender};
pub use view::{ChatView, InputField};
pub use widget::{Answer, ChatWidget, PendingRequest, FALLBACK_MESSAGE, WELCOME_MESSAGE};

//! Capabilities a front end hands to the chat widget.
//!
//! The widget never looks anything up on its own: the log it renders into and
//! the input it reads from are passed in at construction.

use crate::state::{ConversationLog, Message};

/// Somewhere messages get rendered.
pub trait ChatView {
    /// Append `message` as the last entry.
    fn append(&mut self, message: Message);

    /// Move the viewport so the newest entry is visible.
    fn scroll_to_end(&mut self);
}

/// A single-line text input.
pub trait InputField {
    fn value(&self) -> &str;

    fn clear(&mut self);
}

/// A bare log has no viewport, so scrolling is a no-op.
impl ChatView for ConversationLog {
    fn append(&mut self, message: Message) {
        self.push(message);
    }

    fn scroll_to_end(&mut self) {}
}

impl InputField for String {
    fn value(&self) -> &str {
        self.as_str()
    }

    fn clear(&mut self) {
        String::clear(self);
    }
}

use std::sync::Arc;

use kubechat_core::{ChatBackend, ChatView, ChatWidget, ConversationLog, InputField, Message};
use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Scrolling pane that displays the conversation log.
#[derive(Debug, Default)]
pub struct ChatPane {
    pub log: ConversationLog,
    pub scroll: u16,
    /// Keep the newest line in view until the user scrolls away.
    pub follow: bool,
    pub thinking: bool,
    /// Inner size of the pane, updated on every draw
    pub height: u16,
    pub width: u16,
}

impl ChatPane {
    pub fn new() -> Self {
        Self {
            follow: true,
            ..Self::default()
        }
    }

    /// Number of rendered lines, counting wrapping at the current width.
    pub fn total_lines(&self) -> u16 {
        // Default to 50 columns before the first draw
        let wrap_width = if self.width > 0 { self.width as usize } else { 50 };

        let mut total_lines: u16 = 0;
        for msg in &self.log {
            total_lines = total_lines.saturating_add(1); // Sender label line
            let wrapped = wrap_text_to_width(&msg.text, wrap_width).len();
            total_lines = total_lines.saturating_add(wrapped as u16);
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.thinking {
            total_lines = total_lines.saturating_add(2); // label + "Thinking..."
        }
        total_lines
    }

    pub fn max_scroll(&self) -> u16 {
        let visible_height = if self.height > 0 { self.height } else { 20 };
        self.total_lines().saturating_sub(visible_height)
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.follow = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.max_scroll();
        self.scroll = self.scroll.saturating_add(lines).min(max);
        self.follow = self.scroll >= max;
    }

    /// Re-pin to the bottom after a resize or a change in content.
    pub fn sync_scroll(&mut self) {
        if self.follow {
            self.scroll = self.max_scroll();
        }
    }
}

/// Word-wrap `text` to `width` display columns, the same way the chat pane
/// draws it. Words wider than a line are split. Always yields at least one
/// line, so an empty message still takes a row.
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0;

        for word in raw_line.split_whitespace() {
            let word_width = word.width();

            if current_width > 0 && current_width + 1 + word_width <= width {
                current.push(' ');
                current.push_str(word);
                current_width += 1 + word_width;
                continue;
            }

            // Word doesn't fit, start new line
            if current_width > 0 {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                for c in word.chars() {
                    let char_width = c.width().unwrap_or(0);
                    if current_width > 0 && current_width + char_width > width {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(c);
                    current_width += char_width;
                }
            }
        }

        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

impl ChatView for ChatPane {
    fn append(&mut self, message: Message) {
        self.log.push(message);
    }

    fn scroll_to_end(&mut self) {
        self.follow = true;
        self.scroll = self.max_scroll();
    }
}

/// Single-line text input with a character cursor.
#[derive(Debug, Default)]
pub struct InputLine {
    pub text: String,
    /// Cursor position in characters, not bytes
    pub cursor: usize,
}

impl InputLine {
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

impl InputField for InputLine {
    fn value(&self) -> &str {
        &self.text
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    pub should_quit: bool,
    pub widget: ChatWidget<ChatPane, InputLine>,
    pub endpoint: String,

    // Requests dispatched but not yet answered
    pub pending: usize,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Areas for mouse hit-testing, set on draw
    pub chat_area: Option<Rect>,
    pub send_area: Option<Rect>,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, endpoint: &str) -> Self {
        Self {
            should_quit: false,
            widget: ChatWidget::new(ChatPane::new(), InputLine::default(), backend),
            endpoint: endpoint.to_string(),
            pending: 0,
            animation_frame: 0,
            chat_area: None,
            send_area: None,
        }
    }

    pub fn pane(&self) -> &ChatPane {
        self.widget.view()
    }

    pub fn pane_mut(&mut self) -> &mut ChatPane {
        self.widget.view_mut()
    }

    pub fn input(&self) -> &InputLine {
        self.widget.input()
    }

    pub fn input_mut(&mut self) -> &mut InputLine {
        self.widget.input_mut()
    }

    pub fn request_started(&mut self) {
        self.pending += 1;
        self.set_thinking();
    }

    pub fn request_finished(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        self.set_thinking();
    }

    fn set_thinking(&mut self) {
        let thinking = self.pending > 0;
        let pane = self.pane_mut();
        pane.thinking = thinking;
        pane.sync_scroll();
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.pending > 0 {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_editing_is_utf8_safe() {
        let mut input = InputLine::default();
        for c in "pöd".chars() {
            input.insert(c);
        }
        input.move_left();
        input.backspace();
        assert_eq!(input.text, "pd");
        assert_eq!(input.cursor, 1);

        input.move_home();
        input.insert('ü');
        input.move_end();
        input.insert('s');
        assert_eq!(input.text, "üpds");

        input.move_home();
        input.delete();
        assert_eq!(input.text, "pds");
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut input = InputLine::default();
        input.insert('a');
        input.insert('b');
        InputField::clear(&mut input);
        assert_eq!(input.value(), "");
        assert_eq!(input.cursor, 0);
    }

    #[test]
    fn test_scroll_to_end_pins_newest_message() {
        let mut pane = ChatPane::new();
        pane.height = 4;
        pane.width = 10;
        for i in 0..5 {
            pane.append(Message::user(format!("message {i}")));
        }
        pane.scroll_to_end();

        // 5 messages * (label + 1 wrapped line + blank) = 15 lines
        assert_eq!(pane.total_lines(), 15);
        assert_eq!(pane.scroll, 11);
        assert!(pane.follow);
    }

    #[test]
    fn test_manual_scroll_releases_follow() {
        let mut pane = ChatPane::new();
        pane.height = 2;
        pane.width = 80;
        pane.append(Message::assistant("one"));
        pane.append(Message::assistant("two"));
        pane.scroll_to_end();

        pane.scroll_up(3);
        assert!(!pane.follow);
        assert_eq!(pane.scroll, 1);

        pane.scroll_down(100);
        assert!(pane.follow);
        assert_eq!(pane.scroll, pane.max_scroll());
    }

    #[test]
    fn test_wrap_breaks_at_word_boundaries() {
        let lines = wrap_text_to_width("aaaaaa bbbbbb cccccc dddddd eeeeee ffffff ENDMARK", 12);
        assert_eq!(
            lines,
            vec!["aaaaaa", "bbbbbb", "cccccc", "dddddd", "eeeeee", "ffffff", "ENDMARK"]
        );

        assert_eq!(wrap_text_to_width("get pods -n kube", 10), vec!["get pods", "-n kube"]);
    }

    #[test]
    fn test_wrap_splits_long_words_and_keeps_blank_lines() {
        assert_eq!(wrap_text_to_width("", 10), vec![""]);
        assert_eq!(wrap_text_to_width("0123456789", 10), vec!["0123456789"]);
        assert_eq!(wrap_text_to_width("0123456789a", 10), vec!["0123456789", "a"]);
        assert_eq!(wrap_text_to_width("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_counts_wide_characters() {
        // Each CJK character takes two columns
        assert_eq!(wrap_text_to_width("日本語テキスト", 6), vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn test_total_lines_match_word_wrap() {
        let mut pane = ChatPane::new();
        pane.width = 12;
        pane.height = 6;
        pane.append(Message::assistant("aaaaaa bbbbbb cccccc dddddd eeeeee ffffff ENDMARK"));
        pane.scroll_to_end();

        // label + 7 wrapped lines + blank
        assert_eq!(pane.total_lines(), 9);
        assert_eq!(pane.scroll, 3);
    }
}

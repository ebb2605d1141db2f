use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
};
use kubechat_core::Sender;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, wrap_text_to_width};

const SEND_LABEL: &str = "Send";

/// Terminal style for a message style class.
fn class_style(class: &str) -> Style {
    match class {
        "user-message" => Style::default().fg(Color::Cyan),
        "assistant-message" => Style::default().fg(Color::Yellow),
        c if c == Sender::BASE_CLASS => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    }
}

/// Label style: the base class, then the sender's class on top.
fn sender_style(sender: Sender) -> Style {
    class_style(Sender::BASE_CLASS).patch(class_style(sender.style_class()))
}

/// Visible slice of the input and the cursor column inside it, measured in
/// display columns so wide characters keep the cursor aligned.
fn input_viewport(text: &str, cursor: usize, inner_width: usize) -> (String, u16) {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let char_width = |c: &char| c.width().unwrap_or(0);

    // Leave a free cell for the cursor itself
    let mut start = 0;
    let mut before_cursor: usize = chars[..cursor].iter().map(char_width).sum();
    while inner_width > 0 && before_cursor >= inner_width && start < cursor {
        before_cursor -= char_width(&chars[start]);
        start += 1;
    }

    let mut visible = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = char_width(c);
        if used + w > inner_width {
            break;
        }
        visible.push(*c);
        used += w;
    }

    (visible, before_cursor as u16)
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let [chat_area, input_row, help_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [input_area, send_area] =
        Layout::horizontal([Constraint::Min(10), Constraint::Length(10)]).areas(input_row);

    app.chat_area = Some(chat_area);
    app.send_area = Some(send_area);

    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_send_button(app, frame, send_area);

    let help = Paragraph::new(" Enter: send  PgUp/PgDn: scroll  Esc: quit ")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, help_area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    {
        let pane = app.pane_mut();
        pane.height = area.height.saturating_sub(2);
        pane.width = area.width.saturating_sub(2);
        pane.sync_scroll();
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" Kubernetes Assistant ({}) ", app.endpoint));

    let pane = app.pane();
    let wrap_width = pane.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    for msg in &pane.log {
        lines.push(Line::from(Span::styled(msg.sender.label(), sender_style(msg.sender))));
        // Pre-wrapped so the drawn height matches ChatPane::total_lines.
        // Shown verbatim, no markup
        for line in wrap_text_to_width(&msg.text, wrap_width) {
            lines.push(Line::from(line));
        }
        lines.push(Line::default());
    }

    if pane.thinking {
        lines.push(Line::from(Span::styled(
            Sender::Assistant.label(),
            sender_style(Sender::Assistant),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((pane.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Ask a question ");

    // Horizontal scrolling keeps the cursor visible
    let inner_width = area.width.saturating_sub(2) as usize;
    let input = app.input();
    let (visible_text, cursor_x) = input_viewport(&input.text, input.cursor, inner_width);

    let paragraph = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(paragraph, area);

    frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
}

fn render_send_button(app: &App, frame: &mut Frame, area: Rect) {
    let style = if app.input().text.trim().is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    };

    let button = Paragraph::new(SEND_LABEL)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(button, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kubechat_core::{ChatBackend, ChatError};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct Silent;

    #[async_trait]
    impl ChatBackend for Silent {
        async fn ask(&self, _question: &str) -> Result<String, ChatError> {
            Ok(String::new())
        }
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let mut text = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            text.push_str(cell.symbol());
            if (i + 1) % width == 0 {
                text.push('\n');
            }
        }
        text
    }

    #[test]
    fn test_render_shows_welcome_and_records_areas() {
        let mut app = App::new(Arc::new(Silent), "http://localhost:8000/chat");
        app.widget.start();

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Hello! I am your Kubernetes AI Assistant."));
        assert!(text.contains("Assistant:"));
        assert!(text.contains(SEND_LABEL));

        assert_eq!(app.send_area.map(|r| r.width), Some(10));
        assert_eq!(app.pane().width, 98);
    }

    #[test]
    fn test_render_shows_thinking_while_pending() {
        let mut app = App::new(Arc::new(Silent), "http://localhost:8000/chat");
        app.request_started();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(screen_text(&terminal).contains("Thinking."));
    }

    #[test]
    fn test_long_answer_tail_is_visible() {
        let mut app = App::new(Arc::new(Silent), "http://localhost:8000/chat");
        app.widget.append_message(
            "aaaaaa bbbbbb cccccc dddddd eeeeee ffffff ENDMARK",
            Sender::Assistant,
        );

        let mut terminal = Terminal::new(TestBackend::new(14, 12)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("ENDMARK"), "screen was:\n{text}");
        assert_eq!(app.pane().scroll, app.pane().max_scroll());
    }

    #[test]
    fn test_newest_message_visible_after_many_appends() {
        let mut app = App::new(Arc::new(Silent), "http://localhost:8000/chat");
        app.widget.start();
        for i in 0..6 {
            app.widget.append_message(format!("question number {i} about pods"), Sender::User);
        }
        app.widget.append_message("deployments scale replicas", Sender::Assistant);
        app.widget.append_message("done", Sender::Assistant);

        let mut terminal = Terminal::new(TestBackend::new(20, 14)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        assert!(screen_text(&terminal).contains("done"));
    }

    #[test]
    fn test_sender_styles_follow_style_classes() {
        let user = sender_style(Sender::User);
        let assistant = sender_style(Sender::Assistant);

        assert_eq!(user.fg, Some(Color::Cyan));
        assert_eq!(assistant.fg, Some(Color::Yellow));
        assert!(user.add_modifier.contains(Modifier::BOLD));
        assert!(assistant.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_input_viewport_scrolls_ascii() {
        let (visible, cursor_x) = input_viewport("abcdefghij", 10, 5);
        assert_eq!(visible, "ghij");
        assert_eq!(cursor_x, 4);

        let (visible, cursor_x) = input_viewport("abc", 1, 5);
        assert_eq!(visible, "abc");
        assert_eq!(cursor_x, 1);
    }

    #[test]
    fn test_input_viewport_measures_wide_characters() {
        // Three CJK characters take six columns
        let (visible, cursor_x) = input_viewport("日本語", 3, 10);
        assert_eq!(visible, "日本語");
        assert_eq!(cursor_x, 6);

        let (visible, cursor_x) = input_viewport("日本語ab", 5, 6);
        assert_eq!(visible, "語ab");
        assert_eq!(cursor_x, 4);
    }
}

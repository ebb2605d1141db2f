use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::App;
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent, tx: &UnboundedSender<AppEvent>) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse, tx),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Answer(answer) => {
            app.widget.finish_submission(answer);
            app.request_finished();
        }
    }
}

/// Send whatever is in the input box. Both Enter and the send button end up
/// here.
pub fn submit(app: &mut App, tx: &UnboundedSender<AppEvent>) {
    let Some(pending) = app.widget.begin_submission() else {
        return;
    };
    app.request_started();

    // Runs detached so the UI keeps handling events while waiting
    let backend = app.widget.backend();
    let tx = tx.clone();
    tokio::spawn(async move {
        let answer = pending.dispatch(backend).await;
        if tx.send(AppEvent::Answer(answer)).is_err() {
            tracing::debug!("event loop closed before answer arrived");
        }
    });
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &UnboundedSender<AppEvent>) {
    // Global keys
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => submit(app, tx),

        // Log scrolling
        KeyCode::PageUp => {
            let page = app.pane().height.max(1);
            app.pane_mut().scroll_up(page);
        }
        KeyCode::PageDown => {
            let page = app.pane().height.max(1);
            app.pane_mut().scroll_down(page);
        }
        KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => app.pane_mut().scroll_up(1),
        KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => app.pane_mut().scroll_down(1),

        // Input editing
        KeyCode::Backspace => app.input_mut().backspace(),
        KeyCode::Delete => app.input_mut().delete(),
        KeyCode::Left => app.input_mut().move_left(),
        KeyCode::Right => app.input_mut().move_right(),
        KeyCode::Home => app.input_mut().move_home(),
        KeyCode::End => app.input_mut().move_end(),
        // Ctrl chords are not text
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.input_mut().insert(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent, tx: &UnboundedSender<AppEvent>) {
    let x = mouse.column;
    let y = mouse.row;

    let in_chat = app.chat_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let on_send = app.send_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::ScrollDown if in_chat => app.pane_mut().scroll_down(3),
        MouseEventKind::ScrollUp if in_chat => app.pane_mut().scroll_up(3),
        MouseEventKind::Down(MouseButton::Left) if on_send => submit(app, tx),
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

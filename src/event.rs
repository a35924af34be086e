use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers, MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::state::FocusPanel;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

/// Merges terminal input and a fixed tick into one channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventReader {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let event_tx = tx.clone();
        tokio::spawn(async move {
            let mut reader = EventStream::new();
            loop {
                let event = match reader.next().await {
                    Some(Ok(CrosstermEvent::Key(key))) => Event::Key(key),
                    Some(Ok(CrosstermEvent::Mouse(mouse))) => Event::Mouse(mouse),
                    Some(Ok(CrosstermEvent::Resize(_, _))) => Event::Resize,
                    Some(Err(_)) | None => break,
                    _ => continue,
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
        });

        let tick_tx = tx;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_rate);
            loop {
                interval.tick().await;
                if tick_tx.send(Event::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Non-blocking: returns a pending event if one is available, or None.
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}

/// Everything key mapping depends on.
pub struct KeyContext {
    pub focus: FocusPanel,
}

/// Map a key event to an action based on current app context.
pub fn map_key_to_action(key: KeyEvent, ctx: &KeyContext) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global: work even while typing a command
    if ctrl {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => return Some(Action::Quit),
            KeyCode::Char('r') => return Some(Action::RunCommand),
            _ => {}
        }
    }
    match key.code {
        KeyCode::Tab => return Some(Action::FocusNext),
        KeyCode::BackTab => return Some(Action::FocusPrev),
        _ => {}
    }

    match ctx.focus {
        FocusPanel::Command => match key.code {
            KeyCode::Enter => Some(Action::RunCommand),
            KeyCode::Esc => Some(Action::FocusNext),
            KeyCode::Char('w') | KeyCode::Char('h') if ctrl => Some(Action::CommandDeleteWord),
            KeyCode::Char('a') if ctrl => Some(Action::CommandHome),
            KeyCode::Char('e') if ctrl => Some(Action::CommandEnd),
            KeyCode::Char(c) if !ctrl => Some(Action::CommandChar(c)),
            KeyCode::Backspace => Some(Action::CommandBackspace),
            KeyCode::Left => Some(Action::CommandLeft),
            KeyCode::Right => Some(Action::CommandRight),
            KeyCode::Home => Some(Action::CommandHome),
            KeyCode::End => Some(Action::CommandEnd),
            KeyCode::Up => Some(Action::HistoryPrev),
            KeyCode::Down => Some(Action::HistoryNext),
            _ => None,
        },
        FocusPanel::References => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectDown),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::SelectFirst),
            KeyCode::Char('G') | KeyCode::End => Some(Action::SelectLast),
            KeyCode::PageUp => Some(Action::ScrollPageUp),
            KeyCode::PageDown => Some(Action::ScrollPageDown),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => Some(Action::FocusNext),
            KeyCode::Char(':') | KeyCode::Char('/') => Some(Action::FocusCommand),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Char('y') => Some(Action::YankReference),
            KeyCode::Char('T') => Some(Action::CycleTheme),
            _ => None,
        },
        FocusPanel::Patch => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
            KeyCode::PageUp => Some(Action::ScrollPageUp),
            KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::ScrollPageDown),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::ScrollToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Action::ScrollToBottom),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::FocusPrev),
            KeyCode::Char('n') => Some(Action::SelectDown),
            KeyCode::Char('p') => Some(Action::SelectUp),
            KeyCode::Char(':') | KeyCode::Char('/') => Some(Action::FocusCommand),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Char('y') => Some(Action::YankReference),
            KeyCode::Char('T') => Some(Action::CycleTheme),
            _ => None,
        },
    }
}

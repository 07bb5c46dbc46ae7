use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

use crate::domain::{Message, SheetConfig, SheetError};
use crate::export::ExportFormat;
use crate::model::Model;

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &SheetConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, SheetError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        return Ok(Some(Message::RawKey(key)));
                    }
                    return Ok(handle_key(key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

fn handle_key(key: KeyEvent) -> Option<Message> {
    let message = match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
        (KeyCode::Char('q'), _) => Some(Message::Quit),
        (KeyCode::Up | KeyCode::Char('k'), _) => Some(Message::MoveUp),
        (KeyCode::Down | KeyCode::Char('j'), _) => Some(Message::MoveDown),
        (KeyCode::Left | KeyCode::Char('h'), _) => Some(Message::MoveLeft),
        (KeyCode::Right | KeyCode::Char('l'), _) => Some(Message::MoveRight),
        (KeyCode::PageUp, _) => Some(Message::MovePageUp),
        (KeyCode::PageDown, _) => Some(Message::MovePageDown),
        (KeyCode::Home | KeyCode::Char('g'), _) => Some(Message::MoveBeginning),
        (KeyCode::End | KeyCode::Char('G'), _) => Some(Message::MoveEnd),
        (KeyCode::Char('s'), _) => Some(Message::Sort),
        (KeyCode::Char('/'), _) => Some(Message::Search),
        (KeyCode::Char('f'), _) => Some(Message::Filter),
        (KeyCode::Char('F'), _) => Some(Message::ClearFilters),
        (KeyCode::Char('x'), _) => Some(Message::HideColumn),
        (KeyCode::Char('X'), _) => Some(Message::ShowAllColumns),
        (KeyCode::Char(' '), _) => Some(Message::SelectRow),
        (KeyCode::Char('a'), _) => Some(Message::AddRow),
        (KeyCode::Char('+'), _) => Some(Message::AddColumn),
        (KeyCode::Char('e'), _) => Some(Message::Export(ExportFormat::Csv)),
        (KeyCode::Char('E'), _) => Some(Message::Export(ExportFormat::Json)),
        (KeyCode::Char('c'), _) => Some(Message::CopyCell),
        (KeyCode::Char('C'), _) => Some(Message::CopyRow),
        (KeyCode::Char(':'), _) => Some(Message::EnterCommand),
        (KeyCode::Char('?'), _) => Some(Message::Help),
        (KeyCode::Esc, _) => Some(Message::Exit),
        _ => None,
    };
    trace!("Mapped: {key:?} => {message:?}");
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_table_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('q'))), Some(Message::Quit));
        assert_eq!(handle_key(key(KeyCode::Char('j'))), Some(Message::MoveDown));
        assert_eq!(handle_key(key(KeyCode::Left)), Some(Message::MoveLeft));
        assert_eq!(handle_key(key(KeyCode::Char('G'))), Some(Message::MoveEnd));
        assert_eq!(handle_key(key(KeyCode::Char('s'))), Some(Message::Sort));
        assert_eq!(handle_key(key(KeyCode::Char(' '))), Some(Message::SelectRow));
        assert_eq!(
            handle_key(key(KeyCode::Char('E'))),
            Some(Message::Export(ExportFormat::Json))
        );
        assert_eq!(handle_key(key(KeyCode::Esc)), Some(Message::Exit));
    }

    #[test]
    fn ctrl_c_quits_and_unknown_keys_are_ignored() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ctrl_c), Some(Message::Quit));
        assert_eq!(handle_key(key(KeyCode::Char('c'))), Some(Message::CopyCell));
        assert_eq!(handle_key(key(KeyCode::Char('z'))), None);
        assert_eq!(handle_key(key(KeyCode::F(5))), None);
    }
}

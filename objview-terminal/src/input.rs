//! Keyboard and mouse gestures mapped to model operations
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::ViewerConfig;

/// What a gesture asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Euler angles in degrees.
    Rotate(f64, f64, f64),
    Translate(f64, f64, f64),
    Scale(f64),
    Center,
    Normalize,
    NextSelection,
    Quit,
}

/// Turns terminal events into actions, tracking mouse drags between events.
#[derive(Debug)]
pub struct InputMapper {
    config: ViewerConfig,
    drag_from: Option<(u16, u16)>,
}

impl InputMapper {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            drag_from: None,
        }
    }

    pub fn map(&mut self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.map_key(key),
            Event::Mouse(mouse) => self.map_mouse(mouse),
            _ => None,
        }
    }

    fn map_key(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let rotate = self.config.rotate_step;
        let step = self.config.move_step;
        let zoom = self.config.zoom_step;

        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('w') | KeyCode::Up => Action::Rotate(-rotate, 0.0, 0.0),
            KeyCode::Char('s') | KeyCode::Down => Action::Rotate(rotate, 0.0, 0.0),
            KeyCode::Char('a') | KeyCode::Left => Action::Rotate(0.0, -rotate, 0.0),
            KeyCode::Char('d') | KeyCode::Right => Action::Rotate(0.0, rotate, 0.0),
            KeyCode::Char('e') => Action::Rotate(0.0, 0.0, rotate),
            KeyCode::Char('r') => Action::Rotate(0.0, 0.0, -rotate),
            KeyCode::Char('h') => Action::Translate(-step, 0.0, 0.0),
            KeyCode::Char('l') => Action::Translate(step, 0.0, 0.0),
            KeyCode::Char('j') => Action::Translate(0.0, -step, 0.0),
            KeyCode::Char('k') => Action::Translate(0.0, step, 0.0),
            KeyCode::Char('u') => Action::Translate(0.0, 0.0, -step),
            KeyCode::Char('o') => Action::Translate(0.0, 0.0, step),
            KeyCode::Char('+') | KeyCode::Char('=') => Action::Scale(zoom),
            KeyCode::Char('-') => Action::Scale(1.0 / zoom),
            KeyCode::Char('c') => Action::Center,
            KeyCode::Char('n') => Action::Normalize,
            KeyCode::Tab => Action::NextSelection,
            _ => return None,
        };
        Some(action)
    }

    fn map_mouse(&mut self, mouse: &MouseEvent) -> Option<Action> {
        let here = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_from = Some(here);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (column, row) = self.drag_from?;
                self.drag_from = Some(here);
                let dx = f64::from(here.0) - f64::from(column);
                let dy = f64::from(here.1) - f64::from(row);
                if dx == 0.0 && dy == 0.0 {
                    return None;
                }
                // Vertical drag tips about X, horizontal drag spins about Y
                let step = self.config.rotate_step;
                Some(Action::Rotate(dy * step, dx * step, 0.0))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_from = None;
                None
            }
            MouseEventKind::ScrollUp => Some(Action::Scale(self.config.zoom_step)),
            MouseEventKind::ScrollDown => Some(Action::Scale(1.0 / self.config.zoom_step)),
            _ => None,
        }
    }
}

//! The set of loaded models and which of them gestures act on
use std::fmt;

use objview_core::Model;

use crate::input::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    One(usize),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::One(index) => write!(f, "#{}", index + 1),
        }
    }
}

pub struct Scene {
    models: Vec<Model>,
    selection: Selection,
}

impl Scene {
    pub fn new(models: Vec<Model>) -> Self {
        Self {
            models,
            selection: Selection::All,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Cycle all -> first -> ... -> last -> all.
    pub fn select_next(&mut self) {
        self.selection = match self.selection {
            Selection::All if !self.models.is_empty() => Selection::One(0),
            Selection::One(index) if index + 1 < self.models.len() => Selection::One(index + 1),
            _ => Selection::All,
        };
    }

    fn selected_mut(&mut self) -> &mut [Model] {
        match self.selection {
            Selection::All => &mut self.models,
            Selection::One(index) => &mut self.models[index..=index],
        }
    }

    /// Apply a model operation to the selection. `Quit` is the caller's business.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::NextSelection => self.select_next(),
            Action::Quit => {}
            action => {
                for model in self.selected_mut() {
                    match action {
                        Action::Rotate(ax, ay, az) => model.rotate(ax, ay, az),
                        Action::Translate(dx, dy, dz) => model.translate(dx, dy, dz),
                        Action::Scale(factor) => {
                            model.scale(factor);
                        }
                        Action::Center => model.center(),
                        Action::Normalize => {
                            model.normalize();
                        }
                        Action::NextSelection | Action::Quit => {}
                    }
                }
            }
        }
    }
}

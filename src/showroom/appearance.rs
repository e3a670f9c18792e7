//! The session's appearance state.

use crate::showroom::style::{Rgb, Selection};

/// Current paint selection and the name of the visible variant.
///
/// Holding the selection as a single [`Selection`] keeps colour and texture
/// mutually exclusive: choosing one replaces the other.
#[derive(Debug, Default, Clone)]
pub struct AppearanceState {
    selection: Option<Selection>,
    active_model: String,
    sequence: u64,
}

impl AppearanceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current selection and return its sequence number.
    ///
    /// Sequence numbers grow monotonically; asynchronous work started for an
    /// older selection can compare against them to detect that it is stale.
    pub fn select(&mut self, selection: Selection) -> u64 {
        self.sequence += 1;
        self.selection = Some(selection);
        self.sequence
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_color(&self) -> Option<Rgb> {
        match self.selection {
            Some(Selection::Color(color)) => Some(color),
            _ => None,
        }
    }

    pub fn selected_texture(&self) -> Option<&str> {
        match &self.selection {
            Some(Selection::Texture(url)) => Some(url),
            _ => None,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn active_model_name(&self) -> &str {
        &self.active_model
    }

    pub fn set_active_model(&mut self, name: impl Into<String>) {
        self.active_model = name.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let state = AppearanceState::new();
        assert!(state.selection().is_none());
        assert!(state.selected_color().is_none());
        assert!(state.selected_texture().is_none());
        assert_eq!(state.active_model_name(), "");
        assert_eq!(state.sequence(), 0);
    }

    #[test]
    fn colour_and_texture_are_exclusive() {
        let mut state = AppearanceState::new();
        state.select(Selection::Texture("carbon.jpg".into()));
        assert_eq!(state.selected_texture(), Some("carbon.jpg"));
        assert!(state.selected_color().is_none());

        state.select(Selection::Color(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(state.selected_color(), Some(Rgb::new(1.0, 0.0, 0.0)));
        assert!(state.selected_texture().is_none());

        state.select(Selection::Texture("wood.png".into()));
        assert!(state.selected_color().is_none());
    }

    #[test]
    fn sequence_grows_with_every_selection() {
        let mut state = AppearanceState::new();
        let first = state.select(Selection::Color(Rgb::WHITE));
        let second = state.select(Selection::Color(Rgb::WHITE));
        assert!(second > first);
        assert_eq!(state.sequence(), second);
    }
}

//! Global window keyboard shortcuts.
//!
//! | Chord              | Action                               |
//! |--------------------|--------------------------------------|
//! | Meta+Left / Right  | snap left / right                    |
//! | Meta+Up            | maximize, or restore when maximized  |
//! | Shift+Meta+Up      | snap top                             |
//! | Meta+Down          | minimize                             |
//! | Shift+Meta+Down    | snap bottom                          |
//! | Meta+W             | close                                |
//!
//! Shortcuts act on the active window and are ignored while a text field has focus.

use wasm_bindgen::JsCast;

use crate::{
    model::{SnapEdge, Viewport, WindowStoreState},
    reducer::WindowAction,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Key plus modifier state of one keydown.
pub struct KeyChord {
    /// `KeyboardEvent.key` value, e.g. `"ArrowLeft"` or `"w"`.
    pub key: String,
    pub meta: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyChord {
    /// Chord for a Meta-modified key.
    pub fn meta(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            meta: true,
            ..Self::default()
        }
    }

    /// Adds the Shift modifier.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn from_keyboard_event(ev: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: ev.key(),
            meta: ev.meta_key(),
            shift: ev.shift_key(),
            ctrl: ev.ctrl_key(),
            alt: ev.alt_key(),
        }
    }
}

/// Returns whether the keydown originated in an input, textarea, or content-editable element.
pub fn event_targets_text_input(ev: &web_sys::KeyboardEvent) -> bool {
    let Some(target) = ev.target() else {
        return false;
    };
    let Ok(element) = target.dyn_into::<web_sys::HtmlElement>() else {
        return false;
    };
    let tag = element.tag_name();
    tag.eq_ignore_ascii_case("input")
        || tag.eq_ignore_ascii_case("textarea")
        || element.is_content_editable()
}

/// Maps a chord to the window action it triggers for the active window.
pub fn resolve_shortcut(
    chord: &KeyChord,
    in_text_input: bool,
    state: &WindowStoreState,
    viewport: Viewport,
) -> Option<WindowAction> {
    if in_text_input || !chord.meta {
        return None;
    }
    let app_id = state.active_app_id.clone()?;
    let snap = |app_id, edge| WindowAction::SnapWindow {
        app_id,
        edge,
        viewport,
    };

    let action = match chord.key.as_str() {
        "ArrowLeft" => snap(app_id, SnapEdge::Left),
        "ArrowRight" => snap(app_id, SnapEdge::Right),
        "ArrowUp" if chord.shift => snap(app_id, SnapEdge::Top),
        "ArrowUp" => {
            let maximized = state.window(&app_id).is_some_and(|w| w.is_maximized);
            if maximized {
                WindowAction::RestoreApp { app_id }
            } else {
                WindowAction::MaximizeApp { app_id }
            }
        }
        "ArrowDown" if chord.shift => snap(app_id, SnapEdge::Bottom),
        "ArrowDown" => WindowAction::MinimizeApp { app_id },
        "w" => WindowAction::CloseApp { app_id },
        _ => return None,
    };
    Some(action)
}

use crate::controller::UiEvent;
use crate::models::QuickReply;
use crate::ui::ViewState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the render loop should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Send(UiEvent),
    Quit,
}

/// Applies local edits to `view` and maps the key to a controller event.
/// Editing and sending keys are ignored while the input is disabled.
pub fn handle_key(key: KeyEvent, view: &mut ViewState, quick_replies: &[QuickReply]) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => KeyAction::Quit,
            KeyCode::Char('u') if view.input_enabled => {
                view.input.clear();
                KeyAction::Send(UiEvent::Input)
            }
            _ => KeyAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => return KeyAction::Quit,
        KeyCode::PageUp => {
            view.scroll = view.scroll.saturating_add(3);
            return KeyAction::None;
        }
        KeyCode::PageDown => {
            view.scroll = view.scroll.saturating_sub(3);
            return KeyAction::None;
        }
        _ => {}
    }

    if !view.input_enabled {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Enter if view.submit_enabled => KeyAction::Send(UiEvent::Submit),
        KeyCode::Backspace => {
            view.input.pop();
            KeyAction::Send(UiEvent::Input)
        }
        KeyCode::Char(c) => {
            view.input.push(c);
            KeyAction::Send(UiEvent::Input)
        }
        KeyCode::F(n) => match quick_replies.get((n as usize).wrapping_sub(1)) {
            Some(reply) => KeyAction::Send(UiEvent::QuickReply(reply.message.clone())),
            None => KeyAction::None,
        },
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn quick() -> Vec<QuickReply> {
        vec![QuickReply {
            label: "Shipping".to_string(),
            message: "How long does shipping take?".to_string(),
        }]
    }

    #[test]
    fn typing_edits_input_and_notifies() {
        let mut view = ViewState::new();
        assert_eq!(
            handle_key(press(KeyCode::Char('h')), &mut view, &[]),
            KeyAction::Send(UiEvent::Input)
        );
        handle_key(press(KeyCode::Char('i')), &mut view, &[]);
        handle_key(press(KeyCode::Backspace), &mut view, &[]);
        assert_eq!(view.input, "h");
    }

    #[test]
    fn enter_requires_enabled_submit() {
        let mut view = ViewState::new();
        assert_eq!(handle_key(press(KeyCode::Enter), &mut view, &[]), KeyAction::None);

        view.submit_enabled = true;
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut view, &[]),
            KeyAction::Send(UiEvent::Submit)
        );
    }

    #[test]
    fn disabled_input_swallows_edits() {
        let mut view = ViewState::new();
        view.input_enabled = false;
        view.submit_enabled = true;

        assert_eq!(handle_key(press(KeyCode::Char('x')), &mut view, &[]), KeyAction::None);
        assert_eq!(handle_key(press(KeyCode::Enter), &mut view, &[]), KeyAction::None);
        assert_eq!(handle_key(press(KeyCode::F(1)), &mut view, &quick()), KeyAction::None);
        assert!(view.input.is_empty());
        assert_eq!(handle_key(press(KeyCode::Esc), &mut view, &[]), KeyAction::Quit);
    }

    #[test]
    fn function_keys_fire_quick_replies() {
        let mut view = ViewState::new();
        assert_eq!(
            handle_key(press(KeyCode::F(1)), &mut view, &quick()),
            KeyAction::Send(UiEvent::QuickReply("How long does shipping take?".to_string()))
        );
        assert_eq!(handle_key(press(KeyCode::F(2)), &mut view, &quick()), KeyAction::None);
        assert_eq!(handle_key(press(KeyCode::F(0)), &mut view, &quick()), KeyAction::None);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut view = ViewState::new();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(key, &mut view, &[]), KeyAction::Quit);
    }
}

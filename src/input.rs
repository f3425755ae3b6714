use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Phase;

/// Session-level commands that are not typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    Pause,
    Resume,
    Retry,
    ReturnToMenu,
}

/// What currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Menu,
    Session(Phase),
}

/// Where a key press ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Quit,
    Menu(KeyCode),
    Session(SessionAction),
    Keystroke(KeyCode),
    Ignored,
}

/// Control keys per session phase. Any key not bound here is typing input
/// while playing and ignored otherwise.
#[derive(Debug, Clone)]
pub struct Bindings {
    session: HashMap<(KeyCode, Phase), SessionAction>,
}

impl Bindings {
    pub fn empty() -> Self {
        Self {
            session: HashMap::new(),
        }
    }

    pub fn bind(&mut self, key: KeyCode, phase: Phase, action: SessionAction) {
        self.session.insert((key, phase), action);
    }

    pub fn action(&self, key: KeyCode, phase: Phase) -> Option<SessionAction> {
        self.session.get(&(key, phase)).copied()
    }
}

impl Default for Bindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind(KeyCode::Esc, Phase::Playing, SessionAction::Pause);
        bindings.bind(KeyCode::Esc, Phase::Paused, SessionAction::Resume);
        bindings.bind(KeyCode::Enter, Phase::Paused, SessionAction::ReturnToMenu);
        bindings.bind(KeyCode::Char('r'), Phase::GameOver, SessionAction::Retry);
        bindings.bind(KeyCode::Char('R'), Phase::GameOver, SessionAction::Retry);
        bindings.bind(KeyCode::Esc, Phase::GameOver, SessionAction::ReturnToMenu);
        bindings
    }
}

/// Decides who handles `key` given the current focus.
pub fn route(focus: Focus, key: &KeyEvent, bindings: &Bindings) -> Route {
    if key.kind == KeyEventKind::Release {
        return Route::Ignored;
    }
    // ctrl+c quits from anywhere
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Route::Quit;
    }

    match focus {
        Focus::Menu => Route::Menu(key.code),
        Focus::Session(phase) => {
            if let Some(action) = bindings.action(key.code, phase) {
                Route::Session(action)
            } else if phase == Phase::Playing
                && !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
            {
                Route::Keystroke(key.code)
            } else {
                Route::Ignored
            }
        }
    }
}

/// Uppercase letter for a typing key, or `None` if it is not a letter.
pub fn normalize_key(code: KeyCode) -> Option<char> {
    match code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn esc_toggles_pause() {
        let b = Bindings::default();
        assert_eq!(
            route(Focus::Session(Phase::Playing), &press(KeyCode::Esc), &b),
            Route::Session(SessionAction::Pause)
        );
        assert_eq!(
            route(Focus::Session(Phase::Paused), &press(KeyCode::Esc), &b),
            Route::Session(SessionAction::Resume)
        );
    }

    #[test]
    fn enter_only_leaves_from_pause() {
        let b = Bindings::default();
        assert_eq!(
            route(Focus::Session(Phase::Paused), &press(KeyCode::Enter), &b),
            Route::Session(SessionAction::ReturnToMenu)
        );
        assert_eq!(
            route(Focus::Session(Phase::Playing), &press(KeyCode::Enter), &b),
            Route::Keystroke(KeyCode::Enter)
        );
    }

    #[test]
    fn game_over_accepts_retry_and_menu_only() {
        let b = Bindings::default();
        let focus = Focus::Session(Phase::GameOver);
        assert_eq!(
            route(focus, &press(KeyCode::Char('r')), &b),
            Route::Session(SessionAction::Retry)
        );
        assert_eq!(
            route(focus, &press(KeyCode::Char('R')), &b),
            Route::Session(SessionAction::Retry)
        );
        assert_eq!(
            route(focus, &press(KeyCode::Esc), &b),
            Route::Session(SessionAction::ReturnToMenu)
        );
        assert_eq!(route(focus, &press(KeyCode::Char('a')), &b), Route::Ignored);
    }

    #[test]
    fn letters_reach_the_session_only_while_playing() {
        let b = Bindings::default();
        assert_eq!(
            route(Focus::Session(Phase::Playing), &press(KeyCode::Char('r')), &b),
            Route::Keystroke(KeyCode::Char('r'))
        );
        assert_eq!(
            route(Focus::Session(Phase::Paused), &press(KeyCode::Char('r')), &b),
            Route::Ignored
        );
    }

    #[test]
    fn menu_focus_forwards_everything_but_ctrl_c() {
        let b = Bindings::default();
        assert_eq!(
            route(Focus::Menu, &press(KeyCode::Esc), &b),
            Route::Menu(KeyCode::Esc)
        );
        assert_eq!(
            route(Focus::Menu, &press(KeyCode::Down), &b),
            Route::Menu(KeyCode::Down)
        );

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(route(Focus::Menu, &ctrl_c, &b), Route::Quit);
        assert_eq!(
            route(Focus::Session(Phase::Playing), &ctrl_c, &b),
            Route::Quit
        );
    }

    #[test]
    fn chorded_letters_are_not_typing() {
        let b = Bindings::default();
        let alt_a = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT);
        assert_eq!(
            route(Focus::Session(Phase::Playing), &alt_a, &b),
            Route::Ignored
        );
        let shift_a = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(
            route(Focus::Session(Phase::Playing), &shift_a, &b),
            Route::Keystroke(KeyCode::Char('A'))
        );
    }

    #[test]
    fn rebinding_changes_the_route() {
        let mut b = Bindings::empty();
        b.bind(KeyCode::Char(' '), Phase::Playing, SessionAction::Pause);
        assert_eq!(
            route(Focus::Session(Phase::Playing), &press(KeyCode::Char(' ')), &b),
            Route::Session(SessionAction::Pause)
        );
        assert_eq!(
            route(Focus::Session(Phase::Playing), &press(KeyCode::Esc), &b),
            Route::Keystroke(KeyCode::Esc)
        );
    }

    #[test]
    fn normalize_uppercases_letters_only() {
        assert_eq!(normalize_key(KeyCode::Char('a')), Some('A'));
        assert_eq!(normalize_key(KeyCode::Char('Z')), Some('Z'));
        assert_eq!(normalize_key(KeyCode::Char('7')), None);
        assert_eq!(normalize_key(KeyCode::Char('é')), None);
        assert_eq!(normalize_key(KeyCode::Tab), None);
    }
}

// Copyright (c) 2025 rezk_nightky

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Terminated,
}

impl RunState {
    pub fn start(self) -> Self {
        match self {
            RunState::Idle => RunState::Running,
            other => other,
        }
    }

    pub fn quit(self) -> Self {
        RunState::Terminated
    }

    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Pause,
    Reseed,
    NextCaption,
}

pub fn action_for_key(k: &KeyEvent) -> Option<Action> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    match (k.code, k.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        (KeyCode::Esc, _) | (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) => {
            Some(Action::Quit)
        }
        (KeyCode::Char('p'), _) => Some(Action::Pause),
        (KeyCode::Char(' '), _) => Some(Action::Reseed),
        (KeyCode::Char('n'), _) => Some(Action::NextCaption),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn idle_starts_running_and_quits_to_terminated() {
        let s = RunState::Idle.start();
        assert_eq!(s, RunState::Running);
        assert!(s.is_running());
        let s = s.quit();
        assert_eq!(s, RunState::Terminated);
        assert_eq!(s.start(), RunState::Terminated);
    }

    #[test]
    fn quit_keys_map_to_quit() {
        assert_eq!(
            action_for_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert_eq!(
            action_for_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn plain_c_and_releases_are_ignored() {
        assert_eq!(
            action_for_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            None
        );
        let mut k = press(KeyCode::Char('q'), KeyModifiers::NONE);
        k.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(&k), None);
    }
}

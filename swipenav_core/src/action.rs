//! Navigation actions and the surfaces that carry them out
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A navigation command triggered by a gesture
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Deserialize, Serialize)]
pub enum Action {
    NextPage,
    PreviousPage,
    ScrollToTop,
    ScrollToBottom,
    CycleTabLeft,
    CycleTabRight,
    CloseTab,
    NewTab,
    MinimizeWindow,
    MaximizeWindow,
    NextSiblingFile,
    PreviousSiblingFile,
    Refresh,
    Undo,
    OpenSearch,
    NewWindow,
    ReopenClosedTab,
    ToggleFullScreen,
}

impl Action {
    pub const ALL: [Action; 18] = [
        Action::NextPage,
        Action::PreviousPage,
        Action::ScrollToTop,
        Action::ScrollToBottom,
        Action::CycleTabLeft,
        Action::CycleTabRight,
        Action::CloseTab,
        Action::NewTab,
        Action::MinimizeWindow,
        Action::MaximizeWindow,
        Action::NextSiblingFile,
        Action::PreviousSiblingFile,
        Action::Refresh,
        Action::Undo,
        Action::OpenSearch,
        Action::NewWindow,
        Action::ReopenClosedTab,
        Action::ToggleFullScreen,
    ];

    /// Short label shown below the gesture arrows
    pub fn description(self) -> &'static str {
        match self {
            Action::NextPage => "Next Page",
            Action::PreviousPage => "Previous Page",
            Action::ScrollToTop => "Scroll to Top",
            Action::ScrollToBottom => "Scroll to Bottom",
            Action::CycleTabLeft => "Previous Tab",
            Action::CycleTabRight => "Next Tab",
            Action::CloseTab => "Close Tab",
            Action::NewTab => "New Tab",
            Action::MinimizeWindow => "Minimize Window",
            Action::MaximizeWindow => "Maximize Window",
            Action::NextSiblingFile => "Next File",
            Action::PreviousSiblingFile => "Previous File",
            Action::Refresh => "Refresh",
            Action::Undo => "Undo",
            Action::OpenSearch => "Search",
            Action::NewWindow => "New Window",
            Action::ReopenClosedTab => "Reopen Closed Tab",
            Action::ToggleFullScreen => "Toggle Full Screen",
        }
    }

    /// Invoke the matching method on the surface
    pub fn apply<S: ActionSurface + ?Sized>(self, surface: &mut S) {
        match self {
            Action::NextPage => surface.next_page(),
            Action::PreviousPage => surface.previous_page(),
            Action::ScrollToTop => surface.scroll_to_top(),
            Action::ScrollToBottom => surface.scroll_to_bottom(),
            Action::CycleTabLeft => surface.cycle_tab_left(),
            Action::CycleTabRight => surface.cycle_tab_right(),
            Action::CloseTab => surface.close_tab(),
            Action::NewTab => surface.new_tab(),
            Action::MinimizeWindow => surface.minimize_window(),
            Action::MaximizeWindow => surface.maximize_window(),
            Action::NextSiblingFile => surface.next_sibling_file(),
            Action::PreviousSiblingFile => surface.previous_sibling_file(),
            Action::Refresh => surface.refresh(),
            Action::Undo => surface.undo(),
            Action::OpenSearch => surface.open_search(),
            Action::NewWindow => surface.new_window(),
            Action::ReopenClosedTab => surface.reopen_closed_tab(),
            Action::ToggleFullScreen => surface.toggle_full_screen(),
        }
    }
}

/// Something that can carry out navigation commands. Every call is fire-and-forget.
pub trait ActionSurface {
    fn next_page(&mut self);
    fn previous_page(&mut self);
    fn scroll_to_top(&mut self);
    fn scroll_to_bottom(&mut self);
    fn cycle_tab_left(&mut self);
    fn cycle_tab_right(&mut self);
    fn close_tab(&mut self);
    fn new_tab(&mut self);
    fn minimize_window(&mut self);
    fn maximize_window(&mut self);
    fn next_sibling_file(&mut self);
    fn previous_sibling_file(&mut self);
    fn refresh(&mut self);
    fn undo(&mut self);
    fn open_search(&mut self);
    fn new_window(&mut self);
    fn reopen_closed_tab(&mut self);
    fn toggle_full_screen(&mut self);
}

/// Controller that can perform an action
///
/// Any controller is an action surface; each surface method dispatches the matching action.
pub trait Controller {
    fn dispatch(&mut self, action: Action);
}

impl Controller for Box<dyn Controller> {
    fn dispatch(&mut self, action: Action) {
        (**self).dispatch(action)
    }
}

impl<C: Controller> ActionSurface for C {
    fn next_page(&mut self) {
        self.dispatch(Action::NextPage)
    }
    fn previous_page(&mut self) {
        self.dispatch(Action::PreviousPage)
    }
    fn scroll_to_top(&mut self) {
        self.dispatch(Action::ScrollToTop)
    }
    fn scroll_to_bottom(&mut self) {
        self.dispatch(Action::ScrollToBottom)
    }
    fn cycle_tab_left(&mut self) {
        self.dispatch(Action::CycleTabLeft)
    }
    fn cycle_tab_right(&mut self) {
        self.dispatch(Action::CycleTabRight)
    }
    fn close_tab(&mut self) {
        self.dispatch(Action::CloseTab)
    }
    fn new_tab(&mut self) {
        self.dispatch(Action::NewTab)
    }
    fn minimize_window(&mut self) {
        self.dispatch(Action::MinimizeWindow)
    }
    fn maximize_window(&mut self) {
        self.dispatch(Action::MaximizeWindow)
    }
    fn next_sibling_file(&mut self) {
        self.dispatch(Action::NextSiblingFile)
    }
    fn previous_sibling_file(&mut self) {
        self.dispatch(Action::PreviousSiblingFile)
    }
    fn refresh(&mut self) {
        self.dispatch(Action::Refresh)
    }
    fn undo(&mut self) {
        self.dispatch(Action::Undo)
    }
    fn open_search(&mut self) {
        self.dispatch(Action::OpenSearch)
    }
    fn new_window(&mut self) {
        self.dispatch(Action::NewWindow)
    }
    fn reopen_closed_tab(&mut self) {
        self.dispatch(Action::ReopenClosedTab)
    }
    fn toggle_full_screen(&mut self) {
        self.dispatch(Action::ToggleFullScreen)
    }
}

#[derive(Debug, Clone, PartialEq, Hash, Eq, Deserialize, Serialize)]
pub enum Key {
    Special(SpecialKey),
    Layout(char), // literal key (ex: "a", "b", etc.)
}

#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Deserialize, Serialize)]
pub enum SpecialKey {
    Backspace,
    Delete,
    DownArrow,
    End,
    Escape,
    F1,
    F10,
    F11,
    F12,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    Home,
    LeftArrow,
    PageDown,
    PageUp,
    Return,
    RightArrow,
    Space,
    Tab,
    UpArrow,
}

#[derive(Debug, Clone, PartialEq, Hash, Eq, Deserialize, Serialize, Copy)]
pub enum Modifier {
    Alt,
    Control,
    Meta,
    Shift,
}

/// A key pressed while holding some modifier keys
#[derive(Debug, Clone, PartialEq, Hash, Eq, Deserialize, Serialize)]
pub struct Shortcut {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl Shortcut {
    pub fn new(key: Key, modifiers: &[Modifier]) -> Self {
        Self {
            key,
            modifiers: modifiers.to_vec(),
        }
    }

    pub fn special(key: SpecialKey, modifiers: &[Modifier]) -> Self {
        Self::new(Key::Special(key), modifiers)
    }

    pub fn layout(c: char, modifiers: &[Modifier]) -> Self {
        Self::new(Key::Layout(c), modifiers)
    }
}

/// Keyboard shortcut for each action
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap(HashMap<Action, Shortcut>);

impl Default for Keymap {
    fn default() -> Self {
        use Modifier::*;
        use SpecialKey::*;

        let mut map = HashMap::new();
        map.insert(Action::NextPage, Shortcut::special(RightArrow, &[Alt]));
        map.insert(Action::PreviousPage, Shortcut::special(LeftArrow, &[Alt]));
        map.insert(Action::ScrollToTop, Shortcut::special(Home, &[Control]));
        map.insert(Action::ScrollToBottom, Shortcut::special(End, &[Control]));
        map.insert(Action::CycleTabLeft, Shortcut::special(PageUp, &[Control]));
        map.insert(Action::CycleTabRight, Shortcut::special(PageDown, &[Control]));
        map.insert(Action::CloseTab, Shortcut::layout('w', &[Control]));
        map.insert(Action::NewTab, Shortcut::layout('t', &[Control]));
        map.insert(Action::MinimizeWindow, Shortcut::special(DownArrow, &[Meta]));
        map.insert(Action::MaximizeWindow, Shortcut::special(UpArrow, &[Meta]));
        map.insert(Action::NextSiblingFile, Shortcut::special(DownArrow, &[Alt]));
        map.insert(Action::PreviousSiblingFile, Shortcut::special(UpArrow, &[Alt]));
        map.insert(Action::Refresh, Shortcut::special(F5, &[]));
        map.insert(Action::Undo, Shortcut::layout('z', &[Control]));
        map.insert(Action::OpenSearch, Shortcut::layout('f', &[Control, Shift]));
        map.insert(Action::NewWindow, Shortcut::layout('n', &[Control]));
        map.insert(Action::ReopenClosedTab, Shortcut::layout('t', &[Control, Shift]));
        map.insert(Action::ToggleFullScreen, Shortcut::special(F11, &[]));
        Self(map)
    }
}

impl Keymap {
    /// Replace the shortcuts for some actions, keeping the rest
    pub fn with_overrides(mut self, overrides: HashMap<Action, Shortcut>) -> Self {
        self.0.extend(overrides);
        self
    }

    pub fn get(&self, action: Action) -> Option<&Shortcut> {
        self.0.get(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        dispatched: Vec<Action>,
    }

    impl Controller for Recorder {
        fn dispatch(&mut self, action: Action) {
            self.dispatched.push(action);
        }
    }

    #[test]
    fn apply_reaches_matching_surface_method() {
        for action in Action::ALL.iter() {
            let mut recorder = Recorder::default();
            action.apply(&mut recorder);
            assert_eq!(recorder.dispatched, vec![*action]);
        }
    }

    #[test]
    fn boxed_controller_is_a_surface() {
        struct Counter(std::rc::Rc<std::cell::Cell<usize>>);
        impl Controller for Counter {
            fn dispatch(&mut self, _action: Action) {
                self.0.set(self.0.get() + 1);
            }
        }

        let count = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut boxed: Box<dyn Controller> = Box::new(Counter(count.clone()));
        Action::Undo.apply(&mut boxed);
        boxed.refresh();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn default_keymap_covers_every_action() {
        let keymap = Keymap::default();
        for action in Action::ALL.iter() {
            assert!(keymap.get(*action).is_some(), "{:?} has no shortcut", action);
        }
    }

    #[test]
    fn keymap_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert(Action::Refresh, Shortcut::layout('r', &[Modifier::Control]));
        let keymap = Keymap::default().with_overrides(overrides);
        assert_eq!(
            keymap.get(Action::Refresh),
            Some(&Shortcut::layout('r', &[Modifier::Control]))
        );
        assert_eq!(
            keymap.get(Action::Undo),
            Some(&Shortcut::layout('z', &[Modifier::Control]))
        );
    }

    #[test]
    fn shortcut_from_toml() {
        let shortcut: Shortcut =
            toml::from_str("key = { Special = \"Home\" }\nmodifiers = [\"Control\"]").unwrap();
        assert_eq!(
            shortcut,
            Shortcut::special(SpecialKey::Home, &[Modifier::Control])
        );
        let shortcut: Shortcut = toml::from_str("key = { Layout = \"k\" }").unwrap();
        assert_eq!(shortcut, Shortcut::layout('k', &[]));
    }
}

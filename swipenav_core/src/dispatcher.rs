use crate::{Action, ActionSurface, Direction, Gesture};
use std::collections::HashMap;
use tracing::debug;

/// Lookup table from gestures to the action each one triggers
///
/// Gestures missing from the table do nothing when executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionMap {
    table: HashMap<Gesture, Action>,
}

impl Default for ActionMap {
    fn default() -> Self {
        use Direction::*;

        let mut table = HashMap::new();
        table.insert(Gesture::Simple(Left), Action::NextPage);
        table.insert(Gesture::Simple(Right), Action::PreviousPage);
        table.insert(Gesture::Simple(Up), Action::ScrollToTop);
        table.insert(Gesture::Simple(Down), Action::ScrollToBottom);
        table.insert(Gesture::Compound(Down, Left), Action::CycleTabLeft);
        table.insert(Gesture::Compound(Down, Right), Action::CycleTabRight);
        table.insert(Gesture::Compound(Up, Left), Action::CloseTab);
        table.insert(Gesture::Compound(Up, Right), Action::NewTab);
        table.insert(Gesture::Compound(Right, Down), Action::MinimizeWindow);
        table.insert(Gesture::Compound(Right, Up), Action::MaximizeWindow);
        table.insert(Gesture::Compound(Left, Down), Action::NextSiblingFile);
        table.insert(Gesture::Compound(Left, Up), Action::PreviousSiblingFile);
        // short back-and-forth strokes; four or more segments become a repeat instead
        table.insert(Gesture::Compound(Up, Down), Action::OpenSearch);
        table.insert(Gesture::Compound(Down, Up), Action::ReopenClosedTab);
        table.insert(Gesture::Compound(Left, Right), Action::NewWindow);
        table.insert(Gesture::Compound(Right, Left), Action::ToggleFullScreen);
        table.insert(Gesture::UpDownRepeat, Action::Refresh);
        table.insert(Gesture::LeftRightRepeat, Action::Undo);
        Self { table }
    }
}

impl ActionMap {
    /// A map with no bindings at all
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Rebind some gestures, keeping the rest of the table
    pub fn with_overrides(mut self, overrides: HashMap<Gesture, Action>) -> Self {
        self.table.extend(overrides);
        self
    }

    pub fn bind(&mut self, gesture: Gesture, action: Action) {
        self.table.insert(gesture, action);
    }

    pub fn unbind(&mut self, gesture: Gesture) -> Option<Action> {
        self.table.remove(&gesture)
    }

    pub fn get(&self, gesture: Gesture) -> Option<Action> {
        self.table.get(&gesture).copied()
    }

    /// All bindings in the order of `Gesture::all`
    pub fn bindings(&self) -> Vec<(Gesture, Action)> {
        Gesture::all()
            .into_iter()
            .filter_map(|g| self.get(g).map(|a| (g, a)))
            .collect()
    }

    /// Perform the action bound to the gesture, if any. Returns the action that was performed.
    pub fn execute<S: ActionSurface + ?Sized>(
        &self,
        gesture: Option<Gesture>,
        surface: &mut S,
    ) -> Option<Action> {
        let gesture = gesture?;
        match self.get(gesture) {
            Some(action) => {
                debug!("{} => {:?}", gesture, action);
                action.apply(surface);
                Some(action)
            }
            None => {
                debug!("no action bound to {}", gesture);
                None
            }
        }
    }
}

//! Hover / selection state machine.
//!
//! Two independent slots, each holding at most one entity:
//!
//! - `hovered`: transient, follows the pointer
//! - `selected`: persistent, toggled by clicks
//!
//! Pointer handlers only swap these references; the next frame tick is the
//! sole reader. Selection changes come back as [`SelectionChange`] so the
//! owner can notify the page-level collaborator exactly once per change.

use crate::catalog::EntityKey;

/// Combined view of both slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPhase {
    Idle,
    Hovered(EntityKey),
    Selected(EntityKey),
    /// Pointer may rest on the selected entity or on another one.
    HoveredSelected { hovered: EntityKey, selected: EntityKey },
}

/// A selection transition: `from` → `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub from: Option<EntityKey>,
    pub to: Option<EntityKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    hovered: Option<EntityKey>,
    selected: Option<EntityKey>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<EntityKey> {
        self.hovered
    }

    pub fn selected(&self) -> Option<EntityKey> {
        self.selected
    }

    pub fn is_hovered(&self, key: EntityKey) -> bool {
        self.hovered == Some(key)
    }

    pub fn is_selected(&self, key: EntityKey) -> bool {
        self.selected == Some(key)
    }

    pub fn phase(&self) -> InteractionPhase {
        match (self.hovered, self.selected) {
            (None, None) => InteractionPhase::Idle,
            (Some(h), None) => InteractionPhase::Hovered(h),
            (None, Some(s)) => InteractionPhase::Selected(s),
            (Some(hovered), Some(selected)) => InteractionPhase::HoveredSelected { hovered, selected },
        }
    }

    /// Pointer entered `key`. Selection is untouched.
    pub fn pointer_enter(&mut self, key: EntityKey) {
        self.hovered = Some(key);
    }

    /// Pointer left `key`. Ignored when something else is hovered.
    pub fn pointer_leave(&mut self, key: EntityKey) {
        if self.hovered == Some(key) {
            self.hovered = None;
        }
    }

    /// Feed the per-frame pick result; expands into leave/enter as needed.
    pub fn pointer_over(&mut self, hit: Option<EntityKey>) {
        if self.hovered == hit {
            return;
        }
        if let Some(prev) = self.hovered {
            self.pointer_leave(prev);
        }
        if let Some(key) = hit {
            self.pointer_enter(key);
        }
    }

    /// Toggle selection of `key`.
    pub fn click(&mut self, key: EntityKey) -> SelectionChange {
        let from = self.selected;
        self.selected = if from == Some(key) { None } else { Some(key) };
        SelectionChange { from, to: self.selected }
    }

    /// Overwrite selection with an externally-owned value.
    /// Returns the change when it actually moved.
    pub fn sync_selection(&mut self, key: Option<EntityKey>) -> Option<SelectionChange> {
        if self.selected == key {
            return None;
        }
        let from = self.selected;
        self.selected = key;
        Some(SelectionChange { from, to: key })
    }

    /// Back to idle; used on teardown.
    pub fn reset(&mut self) {
        self.hovered = None;
        self.selected = None;
    }
}

//! Linear undo history with merging and a clean marker.

use super::{Command, CommandContext};
use crate::items::ItemId;
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct Entry {
    command: Command,
    label: String,
}

/// Undo/redo log for one document.
///
/// Commands below `index` are applied, commands at or above it are undone.
#[derive(Debug, Clone)]
pub struct CommandStack {
    entries: Vec<Entry>,
    index: usize,
    clean: Option<usize>,
    /// 0 keeps every command.
    undo_limit: usize,
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CommandStack {
    pub fn new(undo_limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            clean: Some(0),
            undo_limit,
        }
    }

    /// Apply `command` and record it.
    ///
    /// Undone commands above the current index are discarded. The command
    /// is folded into the one below when both target the same thing, unless
    /// that one marks the clean state.
    pub fn push(&mut self, command: impl Into<Command>, cx: &mut CommandContext<'_>) {
        let mut command = command.into();
        command.redo(cx);
        let label = command.label(cx.scene);

        let mut discarded = self.entries.len() > self.index;
        self.entries.truncate(self.index);
        if self.clean.is_some_and(|clean| clean > self.index) {
            self.clean = None;
        }

        let merged = self.index > 0
            && self.clean != Some(self.index)
            && self.entries[self.index - 1].command.merge(&command);
        if merged {
            log::debug!("merged \"{label}\"");
            discarded = true;
        } else {
            log::debug!("push \"{label}\"");
            self.entries.push(Entry { command, label });
            self.index += 1;
        }

        if self.undo_limit > 0 && self.entries.len() > self.undo_limit {
            let excess = self.entries.len() - self.undo_limit;
            self.entries.drain(..excess);
            self.index -= excess;
            self.clean = self.clean.and_then(|clean| clean.checked_sub(excess));
            discarded = true;
        }

        if discarded {
            cx.scene.sweep(&self.referenced_items());
        }
    }

    pub fn undo(&mut self, cx: &mut CommandContext<'_>) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        let entry = &mut self.entries[self.index];
        log::debug!("undo \"{}\"", entry.label);
        entry.command.undo(cx);
        true
    }

    pub fn redo(&mut self, cx: &mut CommandContext<'_>) -> bool {
        let Some(entry) = self.entries.get_mut(self.index) else {
            return false;
        };
        log::debug!("redo \"{}\"", entry.label);
        entry.command.redo(cx);
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.entries.len()
    }

    pub fn undo_text(&self) -> Option<&str> {
        self.index
            .checked_sub(1)
            .map(|i| self.entries[i].label.as_str())
    }

    pub fn redo_text(&self) -> Option<&str> {
        self.entries.get(self.index).map(|e| e.label.as_str())
    }

    /// Labels of every recorded command, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark the current state as saved.
    pub fn set_clean(&mut self) {
        self.clean = Some(self.index);
    }

    pub fn is_clean(&self) -> bool {
        self.clean == Some(self.index)
    }

    /// Drop the whole history and mark the result clean.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
        self.clean = Some(0);
    }

    /// Every arena id held by a recorded command.
    pub fn referenced_items(&self) -> HashSet<ItemId> {
        let mut out = HashSet::new();
        for entry in &self.entries {
            entry.command.referenced_items(&mut out);
        }
        out
    }
}

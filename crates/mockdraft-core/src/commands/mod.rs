//! Reversible editing operations and the undo history.
//!
//! Every edit that should be undoable is expressed as a [`Command`] and
//! pushed onto a [`CommandStack`], which applies it immediately. Commands
//! never free items: removal only unlinks them from the scene, and the
//! stack sweeps the arena when commands are discarded.

mod data;
mod order;
mod stack;
mod structure;

pub use data::{DataCommand, DataEdit};
pub use order::{RestackCommand, StepCommand};
pub use stack::CommandStack;
pub use structure::{
    AddCommand, GroupCommand, LockCommand, MoveCommand, PasteCommand, RemoveCommand,
    ResizeCommand, UngroupCommand, UnlockCommand,
};

use crate::items::{Item, ItemId};
use crate::scene::Scene;
use crate::theme::Theme;
use std::collections::HashSet;

/// What a command operates on.
pub struct CommandContext<'a> {
    pub scene: &'a mut Scene,
    pub theme: &'a dyn Theme,
}

impl<'a> CommandContext<'a> {
    pub fn new(scene: &'a mut Scene, theme: &'a dyn Theme) -> Self {
        Self { scene, theme }
    }
}

/// A reversible edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Add(AddCommand),
    Remove(RemoveCommand),
    Move(MoveCommand),
    Resize(ResizeCommand),
    Paste(PasteCommand),
    Group(GroupCommand),
    Ungroup(UngroupCommand),
    Lock(LockCommand),
    Unlock(UnlockCommand),
    Restack(RestackCommand),
    Step(StepCommand),
    Data(DataCommand),
}

macro_rules! dispatch {
    ($self:expr, $cmd:ident => $body:expr) => {
        match $self {
            Command::Add($cmd) => $body,
            Command::Remove($cmd) => $body,
            Command::Move($cmd) => $body,
            Command::Resize($cmd) => $body,
            Command::Paste($cmd) => $body,
            Command::Group($cmd) => $body,
            Command::Ungroup($cmd) => $body,
            Command::Lock($cmd) => $body,
            Command::Unlock($cmd) => $body,
            Command::Restack($cmd) => $body,
            Command::Step($cmd) => $body,
            Command::Data($cmd) => $body,
        }
    };
}

impl Command {
    pub fn redo(&mut self, cx: &mut CommandContext<'_>) {
        dispatch!(self, c => c.redo(cx))
    }

    pub fn undo(&mut self, cx: &mut CommandContext<'_>) {
        dispatch!(self, c => c.undo(cx))
    }

    /// Undo-view text. Needs the scene to name the affected archetype.
    pub fn label(&self, scene: &Scene) -> String {
        dispatch!(self, c => c.label(scene))
    }

    /// Fold a newer command of the same kind and target into this one.
    pub fn merge(&mut self, newer: &Command) -> bool {
        match (self, newer) {
            (Command::Move(a), Command::Move(b)) => a.merge(b),
            (Command::Resize(a), Command::Resize(b)) => a.merge(b),
            (Command::Data(a), Command::Data(b)) => a.merge(b),
            _ => false,
        }
    }

    /// Every arena id this command may touch on undo or redo.
    pub fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        dispatch!(self, c => c.referenced_items(out))
    }
}

macro_rules! impl_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Command {
            fn from(command: $ty) -> Self {
                Command::$variant(command)
            }
        })*
    };
}

impl_from!(
    Add(AddCommand),
    Remove(RemoveCommand),
    Move(MoveCommand),
    Resize(ResizeCommand),
    Paste(PasteCommand),
    Group(GroupCommand),
    Ungroup(UngroupCommand),
    Lock(LockCommand),
    Unlock(UnlockCommand),
    Restack(RestackCommand),
    Step(StepCommand),
    Data(DataCommand),
);

/// Archetype name of a widget, or of a group's first member.
fn type_name(scene: &Scene, id: ItemId) -> (&'static str, bool) {
    match scene.get(id) {
        Some(Item::Widget(widget)) => (widget.kind().name(), false),
        Some(Item::Group(group)) => {
            let name = group
                .members()
                .first()
                .and_then(|m| scene.widget(*m))
                .map_or("", |w| w.kind().name());
            (name, true)
        }
        None => ("", false),
    }
}

fn count_items(n: usize) -> String {
    if n == 1 {
        "1 item".to_string()
    } else {
        format!("{n} items")
    }
}

//! Commands that change which items are placed, where, and how they group.

use super::{CommandContext, count_items, type_name};
use crate::items::{ItemId, Placeable};
use crate::scene::Scene;
use kurbo::{Point, Rect};
use std::collections::HashSet;

/// Place a widget already stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct AddCommand {
    item: ItemId,
}

impl AddCommand {
    pub fn new(item: ItemId) -> Self {
        Self { item }
    }

    pub fn item(&self) -> ItemId {
        self.item
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.add_on_top(self.item);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.remove(self.item);
    }

    pub(super) fn label(&self, scene: &Scene) -> String {
        format!("Add {}", type_name(scene, self.item).0)
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.item);
    }
}

/// Unlink items from the scene: a delete, or the removing half of a cut.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveCommand {
    items: Vec<ItemId>,
    cut: bool,
}

impl RemoveCommand {
    pub fn new(items: Vec<ItemId>) -> Self {
        assert!(!items.is_empty(), "nothing to remove");
        Self { items, cut: false }
    }

    pub fn cut(items: Vec<ItemId>) -> Self {
        Self {
            cut: true,
            ..Self::new(items)
        }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        for &id in &self.items {
            cx.scene.remove(id);
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        for &id in &self.items {
            cx.scene.link(id);
        }
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        let verb = if self.cut { "Cut" } else { "Remove" };
        format!("{verb} {}", count_items(self.items.len()))
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    item: ItemId,
    from: Point,
    to: Point,
}

impl MoveCommand {
    pub fn new(item: ItemId, from: Point, to: Point) -> Self {
        Self { item, from, to }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.set_pos(self.item, self.to);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.set_pos(self.item, self.from);
    }

    pub(super) fn merge(&mut self, newer: &MoveCommand) -> bool {
        if newer.item != self.item {
            return false;
        }
        self.to = newer.to;
        true
    }

    pub(super) fn label(&self, scene: &Scene) -> String {
        match type_name(scene, self.item) {
            (name, true) => format!("Move group {name}"),
            (name, false) => format!("Move {name}"),
        }
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.item);
    }
}

/// Set an item's rect; a group rescales its members.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeCommand {
    item: ItemId,
    from: Rect,
    to: Rect,
}

impl ResizeCommand {
    pub fn new(item: ItemId, from: Rect, to: Rect) -> Self {
        Self { item, from, to }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.set_rect(self.item, self.to);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.set_rect(self.item, self.from);
    }

    pub(super) fn merge(&mut self, newer: &ResizeCommand) -> bool {
        if newer.item != self.item {
            return false;
        }
        self.to = newer.to;
        true
    }

    pub(super) fn label(&self, scene: &Scene) -> String {
        match type_name(scene, self.item) {
            (name, true) => format!("Resize group {name}"),
            (name, false) => format!("Resize {name}"),
        }
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.item);
    }
}

/// Place decoded clipboard widgets and rebuild their groups.
#[derive(Debug, Clone, PartialEq)]
pub struct PasteCommand {
    items: Vec<ItemId>,
    groups: Vec<Vec<ItemId>>,
    /// Keys of the groups formed on first redo, reused afterwards.
    group_keys: Vec<ItemId>,
}

impl PasteCommand {
    /// `items` are arena widgets not yet placed; `groups` lists member sets.
    pub fn new(items: Vec<ItemId>, groups: Vec<Vec<ItemId>>) -> Self {
        Self {
            items,
            groups,
            group_keys: Vec::new(),
        }
    }

    /// Top-level items the paste produced.
    pub fn placed(&self, scene: &Scene) -> Vec<ItemId> {
        self.items
            .iter()
            .chain(&self.group_keys)
            .copied()
            .filter(|id| scene.is_top_level(*id))
            .collect()
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        for &id in &self.items {
            cx.scene.add_on_top(id);
        }
        if self.group_keys.is_empty() {
            self.group_keys = self
                .groups
                .iter()
                .filter(|members| members.len() > 1)
                .map(|members| cx.scene.create_group(members))
                .collect();
        } else {
            for &key in &self.group_keys {
                cx.scene.restore_group(key);
            }
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        for &key in &self.group_keys {
            cx.scene.destroy_group(key);
        }
        for &id in &self.items {
            cx.scene.remove(id);
        }
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        format!("Paste {}", count_items(self.items.len()))
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
        out.extend(self.group_keys.iter().copied());
    }
}

/// Group the selected top-level items.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCommand {
    items: Vec<ItemId>,
    /// Groups dissolved into the new one, with their members.
    prior_groups: Vec<ItemId>,
    selected_before: Vec<ItemId>,
    group: Option<ItemId>,
}

impl GroupCommand {
    /// `items` are top-level items in ascending z.
    pub fn new(scene: &Scene, items: Vec<ItemId>) -> Self {
        assert!(items.len() >= 2, "grouping needs at least two items");
        let prior_groups = items
            .iter()
            .copied()
            .filter(|id| scene.group(*id).is_some())
            .collect();
        let selected_before = items
            .iter()
            .copied()
            .filter(|id| scene.is_selected(*id))
            .collect();
        Self {
            items,
            prior_groups,
            selected_before,
            group: None,
        }
    }

    /// The group formed by the last redo.
    pub fn group(&self) -> Option<ItemId> {
        self.group
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        let key = match self.group {
            Some(key) => {
                cx.scene.form_group(key, &self.items);
                key
            }
            None => cx.scene.create_group(&self.items),
        };
        self.group = Some(key);
        cx.scene.set_selected(key, true);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        let Some(key) = self.group else {
            return;
        };
        cx.scene.destroy_group(key);
        for &prior in &self.prior_groups {
            cx.scene.restore_group(prior);
        }
        for &id in &self.items {
            let selected = self.selected_before.contains(&id);
            if let Some(item) = cx.scene.get_mut(id) {
                item.set_selected(selected);
            }
        }
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        "Group items".to_string()
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
        out.extend(self.group);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UngroupCommand {
    group: ItemId,
    was_selected: bool,
}

impl UngroupCommand {
    pub fn new(scene: &Scene, group: ItemId) -> Self {
        assert!(scene.group(group).is_some(), "{group} is not a group");
        Self {
            group,
            was_selected: scene.is_selected(group),
        }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.destroy_group(self.group);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        cx.scene.restore_group(self.group);
        cx.scene.set_selected(self.group, self.was_selected);
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        "Ungroup".to_string()
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.group);
    }
}

/// Lock items; they are deselected while locked.
#[derive(Debug, Clone, PartialEq)]
pub struct LockCommand {
    items: Vec<ItemId>,
    selected_before: Vec<bool>,
}

impl LockCommand {
    pub fn new(scene: &Scene, items: Vec<ItemId>) -> Self {
        assert!(!items.is_empty(), "nothing to lock");
        let selected_before = items.iter().map(|id| scene.is_selected(*id)).collect();
        Self {
            items,
            selected_before,
        }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        lock_items(cx.scene, &self.items);
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        for (&id, &selected) in self.items.iter().zip(&self.selected_before) {
            cx.scene.set_locked(id, false);
            cx.scene.set_selected(id, selected);
        }
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        format!("Lock {}", count_items(self.items.len()))
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
    }
}

/// Unlock every locked top-level item.
#[derive(Debug, Clone, PartialEq)]
pub struct UnlockCommand {
    items: Vec<ItemId>,
}

impl UnlockCommand {
    /// Collects the currently locked top-level items.
    pub fn new(scene: &Scene) -> Self {
        let items = scene
            .top_level_sorted()
            .into_iter()
            .filter(|id| scene.get(*id).is_some_and(Placeable::is_locked))
            .collect();
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        for &id in &self.items {
            cx.scene.set_locked(id, false);
            cx.scene.set_selected(id, false);
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        lock_items(cx.scene, &self.items);
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        "Unlock all".to_string()
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
    }
}

fn lock_items(scene: &mut Scene, items: &[ItemId]) {
    for &id in items {
        scene.set_selected(id, false);
        scene.set_locked(id, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::items::Widget;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetType;

    fn place(scene: &mut Scene, theme: &ApproxTheme, x: f64, y: f64) -> ItemId {
        let id = scene.insert(Widget::new(WidgetType::Button, Point::new(x, y), theme));
        scene.add_on_top(id);
        id
    }

    fn run(scene: &mut Scene, theme: &ApproxTheme, command: impl Into<Command>) -> Command {
        let mut command = command.into();
        command.redo(&mut CommandContext::new(scene, theme));
        command
    }

    fn undo(scene: &mut Scene, theme: &ApproxTheme, command: &mut Command) {
        command.undo(&mut CommandContext::new(scene, theme));
    }

    #[test]
    fn test_add_and_undo() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let id = scene.insert(Widget::new(WidgetType::Button, Point::ZERO, &theme));
        let mut add = run(&mut scene, &theme, AddCommand::new(id));
        assert_eq!(scene.top_level_sorted(), vec![id]);
        assert_eq!(add.label(&scene), "Add Button");
        undo(&mut scene, &theme, &mut add);
        assert!(scene.is_empty());
        assert!(scene.contains(id));
    }

    #[test]
    fn test_remove_and_cut_labels() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        let b = place(&mut scene, &theme, 50.0, 0.0);
        let z_before = scene.get(b).unwrap().z();

        let mut remove = run(&mut scene, &theme, RemoveCommand::new(vec![a, b]));
        assert!(scene.is_empty());
        assert_eq!(remove.label(&scene), "Remove 2 items");
        undo(&mut scene, &theme, &mut remove);
        assert_eq!(scene.top_level_sorted(), vec![a, b]);
        assert!((scene.get(b).unwrap().z() - z_before).abs() < f64::EPSILON);

        let cut = run(&mut scene, &theme, RemoveCommand::cut(vec![a]));
        assert_eq!(cut.label(&scene), "Cut 1 item");
    }

    #[test]
    fn test_move_merge_keeps_origin() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        let mut first = run(&mut scene, &theme, MoveCommand::new(a, Point::ZERO, Point::new(5.0, 5.0)));
        let second = run(
            &mut scene,
            &theme,
            MoveCommand::new(a, Point::new(5.0, 5.0), Point::new(9.0, 9.0)),
        );
        assert!(first.merge(&second));
        undo(&mut scene, &theme, &mut first);
        assert_eq!(scene.get(a).unwrap().pos(), Point::ZERO);
        first.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.get(a).unwrap().pos(), Point::new(9.0, 9.0));

        let other = MoveCommand::new(ItemId(99), Point::ZERO, Point::ZERO).into();
        assert!(!first.merge(&other));
    }

    #[test]
    fn test_group_undo_restores_prior_groups_and_selection() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        let b = place(&mut scene, &theme, 50.0, 0.0);
        let c = place(&mut scene, &theme, 100.0, 100.0);
        let inner = scene.create_group(&[a, b]);
        scene.set_selected(inner, true);
        scene.set_selected(c, true);
        let before: Vec<_> = scene.top_level_sorted();

        let items = scene.selected_sorted();
        let command = GroupCommand::new(&scene, items);
        let mut group = run(&mut scene, &theme, command);
        let Command::Group(g) = &group else { unreachable!() };
        let outer = g.group().unwrap();
        assert_eq!(scene.top_level_sorted(), vec![outer]);
        assert!(scene.is_selected(outer));
        assert_eq!(group.label(&scene), "Group items");

        undo(&mut scene, &theme, &mut group);
        assert_eq!(scene.top_level_sorted(), before);
        assert_eq!(scene.group(inner).unwrap().members(), &[a, b]);
        assert!(scene.is_selected(inner));
        assert!(scene.is_selected(c));
        assert!(scene.get(a).unwrap().is_locked());

        group.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), vec![outer]);
        assert_eq!(scene.group(outer).unwrap().members(), &[a, b, c]);
    }

    #[test]
    fn test_ungroup_round_trip() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        let b = place(&mut scene, &theme, 50.0, 30.0);
        let group = scene.create_group(&[a, b]);
        scene.set_selected(group, true);
        let rect = scene.get(group).unwrap().pos_rect();

        let command = UngroupCommand::new(&scene, group);
        let mut ungroup = run(&mut scene, &theme, command);
        assert_eq!(scene.top_level_sorted(), vec![a, b]);
        assert!(scene.is_selected(a));
        undo(&mut scene, &theme, &mut ungroup);
        assert_eq!(scene.top_level_sorted(), vec![group]);
        assert_eq!(scene.get(group).unwrap().pos_rect(), rect);
        assert!(scene.is_selected(group));
    }

    #[test]
    #[should_panic(expected = "at least two")]
    fn test_group_requires_two_items() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        GroupCommand::new(&scene, vec![a]);
    }

    #[test]
    fn test_lock_unlock() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, 0.0, 0.0);
        scene.set_selected(a, true);

        let command = LockCommand::new(&scene, vec![a]);
        let mut lock = run(&mut scene, &theme, command);
        assert!(scene.get(a).unwrap().is_locked());
        assert!(!scene.is_selected(a));
        assert_eq!(lock.label(&scene), "Lock 1 item");
        undo(&mut scene, &theme, &mut lock);
        assert!(!scene.get(a).unwrap().is_locked());
        assert!(scene.is_selected(a));

        lock.redo(&mut CommandContext::new(&mut scene, &theme));
        let unlock = UnlockCommand::new(&scene);
        assert!(!unlock.is_empty());
        let mut unlock = run(&mut scene, &theme, unlock);
        assert!(!scene.get(a).unwrap().is_locked());
        assert_eq!(unlock.label(&scene), "Unlock all");
        undo(&mut scene, &theme, &mut unlock);
        assert!(scene.get(a).unwrap().is_locked());
    }

    #[test]
    fn test_paste_groups_reuse_keys() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = scene.insert(Widget::new(WidgetType::Button, Point::ZERO, &theme));
        let b = scene.insert(Widget::new(WidgetType::Button, Point::new(40.0, 0.0), &theme));
        let c = scene.insert(Widget::new(WidgetType::Button, Point::new(90.0, 0.0), &theme));
        let mut paste = run(
            &mut scene,
            &theme,
            PasteCommand::new(vec![a, b, c], vec![vec![a, b]]),
        );
        let Command::Paste(p) = &paste else { unreachable!() };
        let placed = p.placed(&scene);
        assert_eq!(placed.len(), 2);
        assert_eq!(paste.label(&scene), "Paste 3 items");

        undo(&mut scene, &theme, &mut paste);
        assert!(scene.is_empty());
        paste.redo(&mut CommandContext::new(&mut scene, &theme));
        let Command::Paste(p) = &paste else { unreachable!() };
        assert_eq!(p.placed(&scene), placed);
    }
}

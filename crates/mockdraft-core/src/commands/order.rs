//! Z-order commands.

use super::{CommandContext, count_items, type_name};
use crate::items::{ItemId, Placeable};
use crate::scene::Scene;
use std::collections::HashSet;

/// Move items above (front) or below (back) every other top-level item,
/// keeping their relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct RestackCommand {
    items: Vec<ItemId>,
    front: bool,
    old_z: Vec<f64>,
}

impl RestackCommand {
    /// `items` must be in ascending z.
    pub fn front(scene: &Scene, items: Vec<ItemId>) -> Self {
        Self::new(scene, items, true)
    }

    pub fn back(scene: &Scene, items: Vec<ItemId>) -> Self {
        Self::new(scene, items, false)
    }

    fn new(scene: &Scene, items: Vec<ItemId>, front: bool) -> Self {
        assert!(!items.is_empty(), "nothing to restack");
        let old_z = items
            .iter()
            .map(|id| scene.get(*id).map_or(0.0, Placeable::z))
            .collect();
        Self { items, front, old_z }
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        let scene = &mut *cx.scene;
        let step = scene.z_step();
        let order = scene.top_level_sorted();
        let z_at = |id: Option<&ItemId>| id.and_then(|id| scene.get(*id)).map_or(0.0, Placeable::z);

        let (first, last) = (self.old_z[0], self.old_z[self.old_z.len() - 1]);
        let new_z: Vec<f64> = if self.front {
            let base = z_at(order.last()) + step;
            self.old_z.iter().map(|z| base + (z - first)).collect()
        } else {
            let base = z_at(order.first()) - step;
            self.old_z.iter().map(|z| base - (last - z)).collect()
        };
        for (&id, z) in self.items.iter().zip(new_z) {
            scene.set_z(id, z);
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        for (&id, &z) in self.items.iter().zip(&self.old_z) {
            cx.scene.set_z(id, z);
        }
    }

    pub(super) fn label(&self, _: &Scene) -> String {
        let place = if self.front { "front" } else { "back" };
        format!("Move {} to {place}", count_items(self.items.len()))
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.extend(self.items.iter().copied());
    }
}

/// Swap an item's z with its neighbour above (up) or below (down).
///
/// At the end of the order the command is recorded but changes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct StepCommand {
    item: ItemId,
    up: bool,
    swapped: Option<ItemId>,
}

impl StepCommand {
    pub fn up(item: ItemId) -> Self {
        Self {
            item,
            up: true,
            swapped: None,
        }
    }

    pub fn down(item: ItemId) -> Self {
        Self {
            item,
            up: false,
            swapped: None,
        }
    }

    fn swap(scene: &mut Scene, a: ItemId, b: ItemId) {
        let (Some(za), Some(zb)) = (scene.get(a).map(Placeable::z), scene.get(b).map(Placeable::z))
        else {
            return;
        };
        scene.set_z(a, zb);
        scene.set_z(b, za);
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        let order = cx.scene.top_level_sorted();
        self.swapped = order.iter().position(|id| *id == self.item).and_then(|index| {
            if self.up {
                order.get(index + 1).copied()
            } else {
                index.checked_sub(1).map(|below| order[below])
            }
        });
        if let Some(other) = self.swapped {
            Self::swap(cx.scene, self.item, other);
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        if let Some(other) = self.swapped {
            Self::swap(cx.scene, self.item, other);
        }
    }

    pub(super) fn label(&self, scene: &Scene) -> String {
        let dir = if self.up { "up" } else { "down" };
        match type_name(scene, self.item) {
            (name, true) => format!("Move group {name} {dir}"),
            (name, false) => format!("Move {name} {dir}"),
        }
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.item);
        out.extend(self.swapped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Command;
    use crate::items::Widget;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetType;
    use kurbo::Point;

    fn scene_of(n: usize, theme: &ApproxTheme) -> (Scene, Vec<ItemId>) {
        let mut scene = Scene::default();
        let ids = (0..n)
            .map(|i| {
                let id = scene.insert(Widget::new(WidgetType::Button, Point::new(i as f64 * 10.0, 0.0), theme));
                scene.add_on_top(id);
                id
            })
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_move_front_and_back() {
        let theme = ApproxTheme::new();
        let (mut scene, ids) = scene_of(4, &theme);
        let moved = vec![ids[0], ids[1]];

        let mut front: Command = RestackCommand::front(&scene, moved.clone()).into();
        front.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), vec![ids[2], ids[3], ids[0], ids[1]]);
        let z = |scene: &Scene, id: ItemId| scene.get(id).unwrap().z();
        for &m in &moved {
            assert!(z(&scene, m) > z(&scene, ids[2]));
            assert!(z(&scene, m) > z(&scene, ids[3]));
        }
        assert_eq!(front.label(&scene), "Move 2 items to front");

        front.undo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), ids);

        let moved = vec![ids[2], ids[3]];
        let mut back: Command = RestackCommand::back(&scene, moved.clone()).into();
        back.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), vec![ids[2], ids[3], ids[0], ids[1]]);
        for &m in &moved {
            assert!(z(&scene, m) < z(&scene, ids[0]));
        }
    }

    #[test]
    fn test_step_up_and_down() {
        let theme = ApproxTheme::new();
        let (mut scene, ids) = scene_of(3, &theme);

        let mut up: Command = StepCommand::up(ids[0]).into();
        up.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), vec![ids[1], ids[0], ids[2]]);
        assert_eq!(up.label(&scene), "Move Button up");
        up.undo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), ids);

        let mut down: Command = StepCommand::down(ids[2]).into();
        down.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), vec![ids[0], ids[2], ids[1]]);
    }

    #[test]
    fn test_step_at_end_is_noop() {
        let theme = ApproxTheme::new();
        let (mut scene, ids) = scene_of(2, &theme);
        let mut up: Command = StepCommand::up(ids[1]).into();
        up.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), ids);
        up.undo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), ids);

        let mut down: Command = StepCommand::down(ids[0]).into();
        down.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(scene.top_level_sorted(), ids);
    }

    #[test]
    fn test_group_label_uses_first_member() {
        let theme = ApproxTheme::new();
        let (mut scene, ids) = scene_of(3, &theme);
        let group = scene.create_group(&[ids[0], ids[1]]);
        let mut down: Command = StepCommand::down(group).into();
        down.redo(&mut CommandContext::new(&mut scene, &theme));
        assert_eq!(down.label(&scene), "Move group Button down");
    }
}

//! The spatial registry of placed items.
//!
//! Items are stored in an arena keyed by [`ItemId`]. Only ids present in the
//! top-level index are painted, hit-tested and selectable; everything else is
//! either a group member or dormant (removed, but possibly still referenced
//! by a command on the undo stack). Dormant entries are reclaimed by
//! [`Scene::sweep`].

use crate::config::Z_STEP;
use crate::draw::DrawOp;
use crate::items::{Group, Item, ItemId, Placeable, Widget};
use crate::theme::Theme;
use crate::widgets::{WidgetData, WidgetFields};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::{HashMap, HashSet, VecDeque};

/// Consumer of drawing instructions.
pub trait Painter {
    /// Draw one op. `origin` is the scene position of the widget the op's
    /// rect is relative to.
    fn paint(&mut self, origin: Point, op: &DrawOp);

    /// Called after a selected top-level item has been painted.
    fn paint_selection(&mut self, _rect: Rect) {}
}

/// Notifications raised by gestures, drained by the document.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Moved { item: ItemId, from: Point, to: Point },
    Resized { item: ItemId, from: Rect, to: Rect },
    EditRequested { item: ItemId },
}

/// Arena of widgets and groups plus the top-level z-ordered index.
#[derive(Debug, Clone)]
pub struct Scene {
    items: HashMap<ItemId, Item>,
    /// Top-level ids in insertion order; z ties keep this order.
    top_level: Vec<ItemId>,
    next_key: u64,
    next_widget_id: u32,
    z_step: f64,
    events: VecDeque<SceneEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Z_STEP)
    }
}

impl Scene {
    pub fn new(z_step: f64) -> Self {
        Self {
            items: HashMap::new(),
            top_level: Vec::new(),
            next_key: 0,
            next_widget_id: 0,
            z_step,
            events: VecDeque::new(),
        }
    }

    fn new_key(&mut self) -> ItemId {
        let id = ItemId(self.next_key);
        self.next_key += 1;
        id
    }

    /// Store an item in the arena without placing it.
    pub fn insert(&mut self, item: impl Into<Item>) -> ItemId {
        let id = self.new_key();
        self.items.insert(id, item.into());
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn widget(&self, id: ItemId) -> Option<&Widget> {
        self.get(id).and_then(Item::as_widget)
    }

    pub(crate) fn widget_mut(&mut self, id: ItemId) -> Option<&mut Widget> {
        match self.items.get_mut(&id) {
            Some(Item::Widget(w)) => Some(w),
            _ => None,
        }
    }

    pub fn group(&self, id: ItemId) -> Option<&Group> {
        self.get(id).and_then(Item::as_group)
    }

    /// Number of arena entries, placed or not.
    pub fn arena_len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn is_top_level(&self, id: ItemId) -> bool {
        self.top_level.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Gap between successive z values on top.
    pub fn z_step(&self) -> f64 {
        self.z_step
    }

    /// Id the next widget placed on top will receive.
    pub fn next_widget_id(&self) -> u32 {
        self.next_widget_id
    }

    // --- Placement ---

    /// Place an arena item above every top-level item.
    ///
    /// Widgets receive the next document-wide id.
    pub fn add_on_top(&mut self, id: ItemId) {
        let z = self.max_z().unwrap_or(0.0) + self.z_step;
        let next_widget_id = self.next_widget_id;
        let Some(item) = self.items.get_mut(&id) else {
            log::warn!("add_on_top: unknown item {id}");
            return;
        };
        item.set_z(z);
        if let Item::Widget(widget) = item {
            widget.set_id(next_widget_id);
            self.next_widget_id += 1;
        }
        self.link(id);
    }

    /// Put an arena item back at top level, keeping its z and id.
    pub fn link(&mut self, id: ItemId) {
        if self.items.contains_key(&id) && !self.top_level.contains(&id) {
            self.top_level.push(id);
        }
    }

    /// Unlink an item from the top level. The arena entry is kept.
    pub fn remove(&mut self, id: ItemId) {
        self.top_level.retain(|&t| t != id);
    }

    fn max_z(&self) -> Option<f64> {
        self.top_level
            .iter()
            .filter_map(|id| self.items.get(id))
            .map(Placeable::z)
            .max_by(f64::total_cmp)
    }

    fn sorted_by_z(&self, mut ids: Vec<ItemId>) -> Vec<ItemId> {
        ids.sort_by(|a, b| self.z_of(*a).total_cmp(&self.z_of(*b)));
        ids
    }

    fn z_of(&self, id: ItemId) -> f64 {
        self.items.get(&id).map_or(0.0, Placeable::z)
    }

    /// Top-level items, ascending z.
    pub fn top_level_sorted(&self) -> Vec<ItemId> {
        self.sorted_by_z(self.top_level.clone())
    }

    /// Selected top-level items, ascending z.
    pub fn selected_sorted(&self) -> Vec<ItemId> {
        let selected = self
            .top_level
            .iter()
            .copied()
            .filter(|id| self.items.get(id).is_some_and(Placeable::is_selected))
            .collect();
        self.sorted_by_z(selected)
    }

    /// Every placed widget, top-level or grouped, ascending z.
    pub fn all_widgets_sorted(&self) -> Vec<ItemId> {
        let mut widgets = Vec::new();
        for id in &self.top_level {
            match self.items.get(id) {
                Some(Item::Widget(_)) => widgets.push(*id),
                Some(Item::Group(group)) => widgets.extend_from_slice(group.members()),
                None => {}
            }
        }
        self.sorted_by_z(widgets)
    }

    /// Top-level widgets (not groups), ascending z.
    pub fn top_level_widgets(&self) -> Vec<ItemId> {
        self.top_level_sorted()
            .into_iter()
            .filter(|id| self.widget(*id).is_some())
            .collect()
    }

    /// Scene-space rect of an item, resolving group membership.
    pub fn scene_rect(&self, id: ItemId) -> Option<Rect> {
        let item = self.items.get(&id)?;
        let rect = item.pos_rect();
        let parent = item.as_widget().and_then(Widget::parent);
        Some(match parent.and_then(|p| self.items.get(&p)) {
            Some(group) => rect + group.pos().to_vec2(),
            None => rect,
        })
    }

    // --- Geometry ---

    pub fn set_pos(&mut self, id: ItemId, pos: Point) {
        if let Some(item) = self.items.get_mut(&id) {
            item.set_pos(pos);
        }
    }

    /// Set an item's rect. A group rescales its members about its origin.
    pub fn set_rect(&mut self, id: ItemId, rect: Rect) {
        let members = match self.items.get_mut(&id) {
            Some(Item::Widget(widget)) => {
                widget.set_pos_rect(rect);
                return;
            }
            Some(Item::Group(group)) => {
                let old = group.size();
                group.set_pos_rect(rect);
                let ratio = |new: f64, old: f64| if old == 0.0 { 1.0 } else { new / old };
                let scale = (ratio(rect.width(), old.width), ratio(rect.height(), old.height));
                (group.members().to_vec(), scale)
            }
            None => return,
        };
        let (members, (wr, hr)) = members;
        for member in members {
            if let Some(widget) = self.widget_mut(member) {
                let r = widget.pos_rect();
                widget.set_pos_rect(Rect::new(r.x0 * wr, r.y0 * hr, r.x1 * wr, r.y1 * hr));
            }
        }
    }

    /// Set an item's z. A group's first member follows.
    pub fn set_z(&mut self, id: ItemId, z: f64) {
        let first = match self.items.get_mut(&id) {
            Some(item) => {
                item.set_z(z);
                item.as_group().and_then(|g| g.members().first().copied())
            }
            None => None,
        };
        if let Some(first) = first.and_then(|m| self.items.get_mut(&m)) {
            first.set_z(z);
        }
    }

    pub fn set_locked(&mut self, id: ItemId, locked: bool) {
        if let Some(item) = self.items.get_mut(&id) {
            item.set_locked(locked);
        }
    }

    // --- Selection ---

    /// Change selection. Selecting a locked item is ignored.
    pub fn set_selected(&mut self, id: ItemId, selected: bool) {
        if let Some(item) = self.items.get_mut(&id) {
            if selected && item.is_locked() {
                return;
            }
            item.set_selected(selected);
        }
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.items.get(&id).is_some_and(Placeable::is_selected)
    }

    /// Select every unlocked top-level item.
    pub fn select_all(&mut self) {
        for id in self.top_level.clone() {
            self.set_selected(id, true);
        }
    }

    pub fn clear_selection(&mut self) {
        for id in self.top_level.clone() {
            self.set_selected(id, false);
        }
    }

    /// Topmost top-level item containing `point`.
    pub fn item_at(&self, point: Point) -> Option<ItemId> {
        self.top_level_sorted()
            .into_iter()
            .rev()
            .find(|id| self.items.get(id).is_some_and(|item| item.pos_rect().contains(point)))
    }

    // --- Widget data ---

    /// Edit a widget's data; re-measure if the edit reports a layout change.
    pub fn edit_widget(
        &mut self,
        id: ItemId,
        theme: &dyn Theme,
        edit: impl FnOnce(&mut WidgetData) -> bool,
    ) {
        if let Some(widget) = self.widget_mut(id) {
            widget.edit(theme, edit);
        }
    }

    pub fn restore_widget(&mut self, id: ItemId, fields: WidgetFields, size: Size, theme: &dyn Theme) {
        if let Some(widget) = self.widget_mut(id) {
            widget.restore(fields, size, theme);
        }
    }

    pub fn auto_resize(&mut self, id: ItemId, theme: &dyn Theme) {
        if let Some(widget) = self.widget_mut(id) {
            widget.auto_resize(theme);
        }
    }

    // --- Grouping ---

    /// Group the given top-level items into a new group.
    pub fn create_group(&mut self, items: &[ItemId]) -> ItemId {
        let key = self.new_key();
        self.form_group(key, items);
        key
    }

    /// Form (or re-form) the group stored under `key` from `items`.
    ///
    /// Nested groups are dissolved first. The group takes the z of
    /// `items[0]` and the union of the items' rects.
    pub(crate) fn form_group(&mut self, key: ItemId, items: &[ItemId]) {
        debug_assert!(items.len() >= 2, "a group needs at least two items");
        let z = items.first().map_or(0.0, |id| self.z_of(*id));
        let rect = items
            .iter()
            .filter_map(|id| self.items.get(id).map(Placeable::pos_rect))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO);

        let mut widgets = Vec::new();
        for &id in items {
            match self.items.get(&id) {
                Some(Item::Group(_)) => widgets.extend(self.destroy_group(id)),
                Some(Item::Widget(_)) => widgets.push(id),
                None => {}
            }
        }
        let widgets = self.sorted_by_z(widgets);

        let origin = rect.origin().to_vec2();
        for &id in &widgets {
            self.remove(id);
            if let Some(widget) = self.widget_mut(id) {
                widget.set_selected(false);
                widget.set_parent(Some(key));
                widget.translate(-origin);
                widget.set_locked(true);
            }
        }

        log::debug!("group {key} formed from {} widgets", widgets.len());
        self.items.insert(key, Item::Group(Group::new(widgets, rect, z)));
        self.link(key);
    }

    /// Dissolve a group, returning its members to the top level.
    ///
    /// Members get absolute positions back, are unlocked and inherit the
    /// group's selection. The group entry stays dormant in the arena so it
    /// can be re-formed with [`restore_group`](Self::restore_group).
    pub fn destroy_group(&mut self, id: ItemId) -> Vec<ItemId> {
        let Some(Item::Group(group)) = self.items.get_mut(&id) else {
            return Vec::new();
        };
        let selected = group.is_selected();
        group.set_selected(false);
        let origin = group.pos().to_vec2();
        let members = group.members().to_vec();

        self.remove(id);
        for &member in &members {
            if let Some(widget) = self.widget_mut(member) {
                widget.set_parent(None);
                widget.translate(origin);
                widget.set_locked(false);
                widget.set_selected(selected);
            }
            self.link(member);
        }
        members
    }

    /// Re-form a dormant group from its recorded members.
    pub fn restore_group(&mut self, key: ItemId) {
        let members = match self.group(key) {
            Some(group) => group.members().to_vec(),
            None => return,
        };
        self.form_group(key, &members);
    }

    // --- Lifecycle ---

    /// Reclaim arena entries unreachable from the top level and from `referenced`.
    ///
    /// Returns the number of entries dropped.
    pub fn sweep(&mut self, referenced: &HashSet<ItemId>) -> usize {
        let mut marked: HashSet<ItemId> = self.top_level.iter().copied().collect();
        marked.extend(referenced.iter().copied());
        let groups: Vec<ItemId> = marked.iter().copied().collect();
        for id in groups {
            if let Some(group) = self.group(id) {
                marked.extend(group.members().iter().copied());
            }
        }

        let before = self.items.len();
        self.items.retain(|id, _| marked.contains(id));
        let dropped = before - self.items.len();
        if dropped > 0 {
            log::debug!("swept {dropped} unreferenced items");
        }
        dropped
    }

    // --- Paint ---

    /// Recompute stale drawings and hand every op to `painter`, in z order.
    pub fn paint(&mut self, theme: &dyn Theme, painter: &mut dyn Painter) {
        for item in self.items.values_mut() {
            if let Item::Widget(widget) = item {
                widget.refresh(theme);
            }
        }

        for id in self.top_level_sorted() {
            let Some(item) = self.items.get(&id) else {
                continue;
            };
            match item {
                Item::Widget(widget) => {
                    paint_widget(painter, widget, Vec2::ZERO, widget.is_selected());
                }
                Item::Group(group) => {
                    let origin = group.pos().to_vec2();
                    for member in group.members() {
                        if let Some(widget) = self.widget(*member) {
                            paint_widget(painter, widget, origin, group.is_selected());
                        }
                    }
                }
            }
            if item.is_selected() {
                painter.paint_selection(item.pos_rect());
            }
        }
    }

    // --- Events ---

    pub(crate) fn push_event(&mut self, event: SceneEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        self.events.drain(..).collect()
    }
}

fn paint_widget(painter: &mut dyn Painter, widget: &Widget, offset: Vec2, selected: bool) {
    let origin = widget.pos() + offset;
    for op in widget.data().drawing() {
        painter.paint(origin, &op.for_selection(selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::ColorRole;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetType;

    fn add(scene: &mut Scene, theme: &ApproxTheme, kind: WidgetType, x: f64, y: f64) -> ItemId {
        let id = scene.insert(Widget::new(kind, Point::new(x, y), theme));
        scene.add_on_top(id);
        id
    }

    #[derive(Default)]
    struct Recorder {
        ops: Vec<(Point, DrawOp)>,
        selections: Vec<Rect>,
    }

    impl Painter for Recorder {
        fn paint(&mut self, origin: Point, op: &DrawOp) {
            self.ops.push((origin, op.clone()));
        }

        fn paint_selection(&mut self, rect: Rect) {
            self.selections.push(rect);
        }
    }

    #[test]
    fn test_add_on_top_assigns_ids_and_z() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 10.0, 10.0);

        assert_eq!(scene.widget(a).unwrap().id(), Some(0));
        assert_eq!(scene.widget(b).unwrap().id(), Some(1));
        assert!((scene.get(a).unwrap().z() - 0.1).abs() < 1e-9);
        assert!((scene.get(b).unwrap().z() - 0.2).abs() < 1e-9);
        assert_eq!(scene.top_level_sorted(), vec![a, b]);
        assert!(!scene.get(a).unwrap().is_locked());
    }

    #[test]
    fn test_remove_keeps_arena_entry() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        scene.remove(a);
        assert!(scene.is_empty());
        assert!(scene.contains(a));
        scene.link(a);
        assert_eq!(scene.top_level_sorted(), vec![a]);
        assert_eq!(scene.widget(a).unwrap().id(), Some(0));
    }

    #[test]
    fn test_z_ties_keep_insertion_order() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let c = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        scene.set_z(a, 1.0);
        scene.set_z(b, 1.0);
        scene.set_z(c, 1.0);
        assert_eq!(scene.top_level_sorted(), vec![a, b, c]);
    }

    #[test]
    fn test_group_round_trip() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 10.0, 20.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 100.0, 50.0);
        let rect_a = scene.get(a).unwrap().pos_rect();
        let rect_b = scene.get(b).unwrap().pos_rect();
        let (za, zb) = (scene.get(a).unwrap().z(), scene.get(b).unwrap().z());

        let group = scene.create_group(&[a, b]);
        assert_eq!(scene.top_level_sorted(), vec![group]);
        let g = scene.group(group).unwrap();
        assert_eq!(g.members(), &[a, b]);
        assert_eq!(g.pos_rect(), rect_a.union(rect_b));
        assert!(!g.is_locked());
        assert!((g.z() - za).abs() < f64::EPSILON);
        assert!(scene.get(a).unwrap().is_locked());
        assert_eq!(scene.get(a).unwrap().pos(), Point::ZERO);
        assert_eq!(scene.scene_rect(b), Some(rect_b));
        assert_eq!(scene.widget(b).unwrap().parent(), Some(group));

        let members = scene.destroy_group(group);
        assert_eq!(members, vec![a, b]);
        assert_eq!(scene.top_level_sorted(), vec![a, b]);
        assert_eq!(scene.get(a).unwrap().pos_rect(), rect_a);
        assert_eq!(scene.get(b).unwrap().pos_rect(), rect_b);
        assert!(!scene.get(b).unwrap().is_locked());
        assert!((scene.get(b).unwrap().z() - zb).abs() < f64::EPSILON);
        assert_eq!(scene.widget(a).unwrap().parent(), None);
    }

    #[test]
    fn test_grouping_flattens_nested_groups() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        let c = add(&mut scene, &theme, WidgetType::Button, 100.0, 100.0);
        let inner = scene.create_group(&[a, b]);
        let outer = scene.create_group(&[inner, c]);

        assert_eq!(scene.top_level_sorted(), vec![outer]);
        assert_eq!(scene.group(outer).unwrap().members(), &[a, b, c]);
        assert!(!scene.is_top_level(inner));
    }

    #[test]
    fn test_destroy_group_passes_selection() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        scene.set_selected(a, true);
        let group = scene.create_group(&[a, b]);
        assert!(!scene.is_selected(a));
        assert!(!scene.is_selected(group));

        scene.set_selected(group, true);
        scene.destroy_group(group);
        assert!(scene.is_selected(a));
        assert!(scene.is_selected(b));

        scene.restore_group(group);
        assert_eq!(scene.top_level_sorted(), vec![group]);
        assert_eq!(scene.group(group).unwrap().members(), &[a, b]);
    }

    #[test]
    fn test_group_resize_rescales_members() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Label, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Label, 0.0, 0.0);
        scene.set_rect(a, Rect::new(0.0, 0.0, 50.0, 20.0));
        scene.set_rect(b, Rect::new(50.0, 20.0, 100.0, 40.0));
        let group = scene.create_group(&[a, b]);

        scene.set_rect(group, Rect::new(10.0, 10.0, 210.0, 90.0));
        assert_eq!(scene.get(a).unwrap().pos_rect(), Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(scene.get(b).unwrap().pos_rect(), Rect::new(100.0, 40.0, 200.0, 80.0));
        assert_eq!(scene.scene_rect(b), Some(Rect::new(110.0, 50.0, 210.0, 90.0)));

        scene.set_rect(group, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(scene.get(b).unwrap().pos_rect(), Rect::new(50.0, 20.0, 100.0, 40.0));
    }

    #[test]
    fn test_group_z_moves_first_member() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        let group = scene.create_group(&[a, b]);
        scene.set_z(group, 7.0);
        assert!((scene.get(a).unwrap().z() - 7.0).abs() < f64::EPSILON);
        assert!((scene.get(b).unwrap().z() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_locked_items_are_not_selectable() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        scene.set_locked(a, true);
        scene.select_all();
        assert_eq!(scene.selected_sorted(), vec![b]);
        scene.set_selected(a, true);
        assert!(!scene.is_selected(a));
        scene.clear_selection();
        assert!(scene.selected_sorted().is_empty());
    }

    #[test]
    fn test_item_at_prefers_topmost() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 10.0, 10.0);
        assert_eq!(scene.item_at(Point::new(15.0, 15.0)), Some(b));
        assert_eq!(scene.item_at(Point::new(2.0, 2.0)), Some(a));
        assert_eq!(scene.item_at(Point::new(500.0, 500.0)), None);
    }

    #[test]
    fn test_all_widgets_includes_members() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        let c = add(&mut scene, &theme, WidgetType::Button, 90.0, 0.0);
        scene.create_group(&[a, b]);
        assert_eq!(scene.all_widgets_sorted(), vec![a, b, c]);
        assert_eq!(scene.top_level_widgets(), vec![c]);
    }

    #[test]
    fn test_sweep_keeps_referenced() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::Button, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 50.0, 0.0);
        let c = add(&mut scene, &theme, WidgetType::Button, 90.0, 0.0);
        let group = scene.create_group(&[a, b]);
        scene.remove(group);
        scene.remove(c);

        let referenced: HashSet<ItemId> = [group].into_iter().collect();
        assert_eq!(scene.sweep(&referenced), 1);
        assert!(scene.contains(a));
        assert!(scene.contains(b));
        assert!(!scene.contains(c));

        assert_eq!(scene.sweep(&HashSet::new()), 3);
        assert_eq!(scene.arena_len(), 0);
    }

    #[test]
    fn test_paint_walks_z_order_with_selection_swap() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = add(&mut scene, &theme, WidgetType::AlertBox, 0.0, 0.0);
        let b = add(&mut scene, &theme, WidgetType::Button, 300.0, 0.0);
        scene.set_z(a, 5.0);
        scene.set_selected(a, true);
        scene.set_rect(b, Rect::new(300.0, 0.0, 400.0, 50.0));

        let mut recorder = Recorder::default();
        scene.paint(&theme, &mut recorder);

        assert_eq!(recorder.ops.first().unwrap().0, Point::new(300.0, 0.0));
        assert_eq!(recorder.ops.first().unwrap().1.rect().width(), 100.0);
        assert_eq!(recorder.ops.last().unwrap().0, Point::ZERO);
        assert_eq!(recorder.selections, vec![scene.get(a).unwrap().pos_rect()]);
        assert!(recorder.ops.iter().any(|(origin, op)| {
            *origin == Point::ZERO
                && matches!(op, DrawOp::Background { color: ColorRole::SelectedWidgetBackground, .. })
        }));
        // The cached sequence is untouched.
        assert!(scene.widget(a).unwrap().data().drawing().iter().any(|op| {
            matches!(op, DrawOp::Background { color: ColorRole::WidgetBackground, .. })
        }));
    }

    #[test]
    fn test_events_drain_in_order() {
        let mut scene = Scene::default();
        let id = ItemId(3);
        scene.push_event(SceneEvent::EditRequested { item: id });
        scene.push_event(SceneEvent::Moved {
            item: id,
            from: Point::ZERO,
            to: Point::new(1.0, 1.0),
        });
        let events = scene.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SceneEvent::EditRequested { item: id });
        assert!(scene.drain_events().is_empty());
    }
}

//! Move and resize gestures.
//!
//! A press either grabs one of the eight grips around a selected item
//! (resize) or an unlocked item body (move). Moves are applied live; resizes
//! drive a preview rect that only reaches the scene through a
//! [`SceneEvent::Resized`] raised on release.

use crate::config::EditorConfig;
use crate::items::{ItemId, Placeable};
use crate::scene::{Scene, SceneEvent};
use crate::snap::{SnapGuide, SnapPolicy, compute_snap};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Resize grip position on an item's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl HandleKind {
    pub const ALL: [HandleKind; 8] = [
        HandleKind::N,
        HandleKind::NE,
        HandleKind::E,
        HandleKind::SE,
        HandleKind::S,
        HandleKind::SW,
        HandleKind::W,
        HandleKind::NW,
    ];

    /// Border point the grip is centred on.
    pub fn anchor(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            HandleKind::N => Point::new(center.x, rect.y0),
            HandleKind::NE => Point::new(rect.x1, rect.y0),
            HandleKind::E => Point::new(rect.x1, center.y),
            HandleKind::SE => Point::new(rect.x1, rect.y1),
            HandleKind::S => Point::new(center.x, rect.y1),
            HandleKind::SW => Point::new(rect.x0, rect.y1),
            HandleKind::W => Point::new(rect.x0, center.y),
            HandleKind::NW => Point::new(rect.x0, rect.y0),
        }
    }

    /// Move the edges this grip controls by `delta`.
    pub fn apply(self, rect: Rect, delta: Vec2) -> Rect {
        let Rect { mut x0, mut y0, mut x1, mut y1 } = rect;
        match self {
            HandleKind::N | HandleKind::NE | HandleKind::NW => y0 += delta.y,
            HandleKind::S | HandleKind::SE | HandleKind::SW => y1 += delta.y,
            HandleKind::E | HandleKind::W => {}
        }
        match self {
            HandleKind::W | HandleKind::NW | HandleKind::SW => x0 += delta.x,
            HandleKind::E | HandleKind::NE | HandleKind::SE => x1 += delta.x,
            HandleKind::N | HandleKind::S => {}
        }
        Rect { x0, y0, x1, y1 }
    }
}

/// A resize grip with its square in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub kind: HandleKind,
    pub rect: Rect,
}

impl Handle {
    pub fn new(kind: HandleKind, item_rect: Rect, grip_size: f64) -> Self {
        Self {
            kind,
            rect: Rect::from_center_size(kind.anchor(item_rect), Size::new(grip_size, grip_size)),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}

/// The eight grips of an item rect.
pub fn handles(item_rect: Rect, grip_size: f64) -> Vec<Handle> {
    HandleKind::ALL
        .iter()
        .map(|&kind| Handle::new(kind, item_rect, grip_size))
        .collect()
}

/// Grip of `item_rect` under `point`, if any.
pub fn hit_test_handles(item_rect: Rect, point: Point, grip_size: f64) -> Option<HandleKind> {
    handles(item_rect, grip_size)
        .into_iter()
        .find(|h| h.hit_test(point))
        .map(|h| h.kind)
}

/// Live state of a move gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveState {
    pub press: Point,
    /// Moved items with their position at press time.
    pub items: Vec<(ItemId, Point)>,
    /// Alignment offset to apply on release (single widget drags only).
    pub snap: Option<SnapGuide>,
}

/// Live state of a resize gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub item: ItemId,
    pub handle: HandleKind,
    pub press: Point,
    pub start: Rect,
    /// Rect shown while dragging; frozen when it would undercut the minimum size.
    pub preview: Rect,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Move(MoveState),
    Resize(ResizeState),
}

/// Pointer gesture state machine over a scene.
#[derive(Debug, Clone)]
pub struct Interaction {
    gesture: Gesture,
    grip_size: f64,
    min_size: f64,
    snap_threshold: f64,
    snap_policy: SnapPolicy,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl Interaction {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            grip_size: config.grip_size,
            min_size: config.min_item_size,
            snap_threshold: config.snap_threshold,
            snap_policy: config.snap_policy,
        }
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Resize preview, while resizing.
    pub fn preview(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Resize(state) => Some(state.preview),
            _ => None,
        }
    }

    /// Snap guide to draw, while moving.
    pub fn snap_guide(&self) -> Option<SnapGuide> {
        match &self.gesture {
            Gesture::Move(state) => state.snap,
            _ => None,
        }
    }

    /// Start a gesture at `point`.
    pub fn press(&mut self, scene: &mut Scene, point: Point) {
        for id in scene.selected_sorted().into_iter().rev() {
            let Some(rect) = scene.get(id).map(Placeable::pos_rect) else {
                continue;
            };
            if let Some(handle) = hit_test_handles(rect, point, self.grip_size) {
                log::debug!("resize {id} from {handle:?}");
                self.gesture = Gesture::Resize(ResizeState {
                    item: id,
                    handle,
                    press: point,
                    start: rect,
                    preview: rect,
                });
                return;
            }
        }

        let hit = scene
            .item_at(point)
            .filter(|id| scene.get(*id).is_some_and(|item| !item.is_locked()));
        let Some(hit) = hit else {
            scene.clear_selection();
            self.gesture = Gesture::Idle;
            return;
        };
        if !scene.is_selected(hit) {
            scene.clear_selection();
            scene.set_selected(hit, true);
        }
        let items = scene
            .selected_sorted()
            .into_iter()
            .filter_map(|id| scene.get(id).map(|item| (id, item.pos())))
            .collect();
        self.gesture = Gesture::Move(MoveState {
            press: point,
            items,
            snap: None,
        });
    }

    /// Continue the current gesture.
    pub fn drag(&mut self, scene: &mut Scene, point: Point) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Move(state) => {
                let delta = point - state.press;
                for &(id, start) in &state.items {
                    scene.set_pos(id, start + delta);
                }
                state.snap = match state.items.as_slice() {
                    [(id, _)] if scene.widget(*id).is_some() => {
                        let moving = scene.get(*id).map(Placeable::pos_rect);
                        let targets: Vec<Rect> = scene
                            .top_level_widgets()
                            .into_iter()
                            .filter(|t| t != id)
                            .filter_map(|t| scene.get(t).map(Placeable::pos_rect))
                            .collect();
                        moving.and_then(|moving| {
                            compute_snap(moving, targets, self.snap_threshold, self.snap_policy)
                        })
                    }
                    _ => None,
                };
            }
            Gesture::Resize(state) => {
                let candidate = state.handle.apply(state.start, point - state.press);
                if candidate.width() >= self.min_size && candidate.height() >= self.min_size {
                    state.preview = candidate;
                }
            }
        }
    }

    /// Finish the gesture, raising the matching scene events.
    pub fn release(&mut self, scene: &mut Scene) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Move(state) => {
                if let (Some(guide), [(id, _)]) = (state.snap, state.items.as_slice()) {
                    if let Some(pos) = scene.get(*id).map(Placeable::pos) {
                        scene.set_pos(*id, guide.apply(pos));
                    }
                }
                for (id, from) in state.items {
                    let Some(to) = scene.get(id).map(Placeable::pos) else {
                        continue;
                    };
                    if to != from {
                        scene.push_event(SceneEvent::Moved { item: id, from, to });
                    }
                }
            }
            Gesture::Resize(state) => {
                if state.preview != state.start {
                    scene.push_event(SceneEvent::Resized {
                        item: state.item,
                        from: state.start,
                        to: state.preview,
                    });
                }
            }
        }
    }

    /// Abort the gesture, putting moved items back.
    pub fn cancel(&mut self, scene: &mut Scene) {
        if let Gesture::Move(state) = std::mem::take(&mut self.gesture) {
            for (id, start) in state.items {
                scene.set_pos(id, start);
            }
        }
    }

    /// Request a text edit for the unlocked widget under `point`.
    pub fn double_click(&mut self, scene: &mut Scene, point: Point) {
        let Some(id) = scene.item_at(point) else {
            return;
        };
        if scene.widget(id).is_some_and(|w| !w.is_locked()) {
            scene.push_event(SceneEvent::EditRequested { item: id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Widget;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetType;

    fn scene_with(rects: &[Rect]) -> (Scene, Vec<ItemId>) {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let ids = rects
            .iter()
            .map(|rect| {
                let id = scene.insert(Widget::new(WidgetType::Label, rect.origin(), &theme));
                scene.add_on_top(id);
                scene.set_rect(id, *rect);
                id
            })
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_handle_geometry() {
        let rect = Rect::new(10.0, 10.0, 110.0, 60.0);
        assert_eq!(HandleKind::SE.anchor(rect), Point::new(110.0, 60.0));
        assert_eq!(HandleKind::N.anchor(rect), Point::new(60.0, 10.0));
        assert_eq!(hit_test_handles(rect, Point::new(112.0, 58.0), 6.0), Some(HandleKind::SE));
        assert_eq!(hit_test_handles(rect, Point::new(60.0, 35.0), 6.0), None);
    }

    #[test]
    fn test_handle_apply() {
        let rect = Rect::new(10.0, 10.0, 110.0, 60.0);
        let delta = Vec2::new(5.0, 7.0);
        assert_eq!(HandleKind::SE.apply(rect, delta), Rect::new(10.0, 10.0, 115.0, 67.0));
        assert_eq!(HandleKind::NW.apply(rect, delta), Rect::new(15.0, 17.0, 110.0, 60.0));
        assert_eq!(HandleKind::E.apply(rect, delta), Rect::new(10.0, 10.0, 115.0, 60.0));
        assert_eq!(HandleKind::S.apply(rect, delta), Rect::new(10.0, 10.0, 110.0, 67.0));
        assert_eq!(HandleKind::NE.apply(rect, delta), Rect::new(10.0, 17.0, 115.0, 60.0));
    }

    #[test]
    fn test_move_raises_event_on_change() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        let mut interaction = Interaction::default();

        interaction.press(&mut scene, Point::new(10.0, 10.0));
        assert!(scene.is_selected(ids[0]));
        interaction.drag(&mut scene, Point::new(60.0, 110.0));
        assert_eq!(scene.get(ids[0]).unwrap().pos(), Point::new(50.0, 100.0));
        interaction.release(&mut scene);

        assert_eq!(
            scene.drain_events(),
            vec![SceneEvent::Moved {
                item: ids[0],
                from: Point::ZERO,
                to: Point::new(50.0, 100.0),
            }]
        );
        assert_eq!(interaction.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_click_without_drag_is_silent() {
        let (mut scene, _) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        let mut interaction = Interaction::default();
        interaction.press(&mut scene, Point::new(10.0, 10.0));
        interaction.release(&mut scene);
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn test_snap_applied_on_release() {
        let (mut scene, ids) = scene_with(&[
            Rect::new(100.0, 0.0, 180.0, 30.0),
            Rect::new(300.0, 200.0, 350.0, 220.0),
        ]);
        let mut interaction = Interaction::default();
        interaction.press(&mut scene, Point::new(310.0, 210.0));
        interaction.drag(&mut scene, Point::new(113.0, 210.0));
        let guide = interaction.snap_guide().unwrap();
        assert!((guide.line - 100.0).abs() < f64::EPSILON);
        assert_eq!(scene.get(ids[1]).unwrap().pos(), Point::new(103.0, 200.0));

        interaction.release(&mut scene);
        assert_eq!(scene.get(ids[1]).unwrap().pos(), Point::new(100.0, 200.0));
        assert_eq!(
            scene.drain_events(),
            vec![SceneEvent::Moved {
                item: ids[1],
                from: Point::new(300.0, 200.0),
                to: Point::new(100.0, 200.0),
            }]
        );
    }

    #[test]
    fn test_resize_preview_respects_minimum() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 100.0, 50.0)]);
        scene.set_selected(ids[0], true);
        let mut interaction = Interaction::default();

        interaction.press(&mut scene, Point::new(100.0, 50.0));
        assert!(matches!(interaction.gesture(), Gesture::Resize(s) if s.handle == HandleKind::SE));
        interaction.drag(&mut scene, Point::new(150.0, 80.0));
        assert_eq!(interaction.preview(), Some(Rect::new(0.0, 0.0, 150.0, 80.0)));
        // Model untouched while previewing.
        assert_eq!(scene.get(ids[0]).unwrap().pos_rect(), Rect::new(0.0, 0.0, 100.0, 50.0));

        interaction.drag(&mut scene, Point::new(10.0, -40.0));
        assert_eq!(interaction.preview(), Some(Rect::new(0.0, 0.0, 150.0, 80.0)));

        interaction.release(&mut scene);
        assert_eq!(
            scene.drain_events(),
            vec![SceneEvent::Resized {
                item: ids[0],
                from: Rect::new(0.0, 0.0, 100.0, 50.0),
                to: Rect::new(0.0, 0.0, 150.0, 80.0),
            }]
        );
    }

    #[test]
    fn test_press_on_empty_clears_selection() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        scene.set_selected(ids[0], true);
        let mut interaction = Interaction::default();
        interaction.press(&mut scene, Point::new(400.0, 400.0));
        assert!(scene.selected_sorted().is_empty());
        assert_eq!(interaction.gesture(), &Gesture::Idle);
    }

    #[test]
    fn test_locked_item_is_not_grabbed() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        scene.set_locked(ids[0], true);
        let mut interaction = Interaction::default();
        interaction.press(&mut scene, Point::new(10.0, 10.0));
        interaction.drag(&mut scene, Point::new(30.0, 30.0));
        interaction.release(&mut scene);
        assert_eq!(scene.get(ids[0]).unwrap().pos(), Point::ZERO);
        assert!(scene.drain_events().is_empty());
    }

    #[test]
    fn test_cancel_restores_positions() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        let mut interaction = Interaction::default();
        interaction.press(&mut scene, Point::new(10.0, 10.0));
        interaction.drag(&mut scene, Point::new(90.0, 90.0));
        interaction.cancel(&mut scene);
        assert_eq!(scene.get(ids[0]).unwrap().pos(), Point::ZERO);
    }

    #[test]
    fn test_double_click_requests_edit() {
        let (mut scene, ids) = scene_with(&[Rect::new(0.0, 0.0, 50.0, 20.0)]);
        let mut interaction = Interaction::default();
        interaction.double_click(&mut scene, Point::new(10.0, 10.0));
        interaction.double_click(&mut scene, Point::new(300.0, 300.0));
        assert_eq!(scene.drain_events(), vec![SceneEvent::EditRequested { item: ids[0] }]);
    }
}

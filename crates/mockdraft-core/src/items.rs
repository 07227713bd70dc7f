//! Placeable items: widgets and groups.
//!
//! Items live in the [`Scene`](crate::scene::Scene) arena and refer to each
//! other by [`ItemId`]. A grouped widget's position is relative to its
//! group's origin.

use crate::theme::Theme;
use crate::widgets::{WidgetData, WidgetFields, WidgetType};
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arena key of an item. Stable for the lifetime of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry, stacking and interaction flags shared by widgets and groups.
pub trait Placeable {
    /// Position and size in the parent's coordinate space.
    fn pos_rect(&self) -> Rect;
    fn pos(&self) -> Point;
    fn set_pos(&mut self, pos: Point);
    fn z(&self) -> f64;
    fn set_z(&mut self, z: f64);
    fn is_locked(&self) -> bool;
    fn set_locked(&mut self, locked: bool);
    fn is_selected(&self) -> bool;
    fn set_selected(&mut self, selected: bool);

    fn translate(&mut self, delta: Vec2) {
        let pos = self.pos();
        self.set_pos(pos + delta);
    }
}

/// Flags common to both item kinds.
#[derive(Debug, Clone, PartialEq)]
struct Placement {
    pos: Point,
    size: Size,
    z: f64,
    locked: bool,
    selected: bool,
}

impl Placement {
    fn new(pos: Point, size: Size) -> Self {
        Self {
            pos,
            size,
            z: 0.0,
            locked: false,
            selected: false,
        }
    }
}

macro_rules! impl_placeable {
    ($ty:ty) => {
        impl Placeable for $ty {
            fn pos_rect(&self) -> Rect {
                Rect::from_origin_size(self.placement.pos, self.placement.size)
            }
            fn pos(&self) -> Point {
                self.placement.pos
            }
            fn set_pos(&mut self, pos: Point) {
                self.placement.pos = pos;
            }
            fn z(&self) -> f64 {
                self.placement.z
            }
            fn set_z(&mut self, z: f64) {
                self.placement.z = z;
            }
            fn is_locked(&self) -> bool {
                self.placement.locked
            }
            fn set_locked(&mut self, locked: bool) {
                self.placement.locked = locked;
            }
            fn is_selected(&self) -> bool {
                self.placement.selected
            }
            fn set_selected(&mut self, selected: bool) {
                self.placement.selected = selected;
            }
        }
    };
}

/// A single placed control.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    id: Option<u32>,
    data: WidgetData,
    placement: Placement,
    parent: Option<ItemId>,
}

impl_placeable!(Widget);

impl Widget {
    /// Create a widget with default data, sized to its measured size.
    pub fn new(kind: WidgetType, pos: Point, theme: &dyn Theme) -> Self {
        let mut data = WidgetData::new(kind);
        let size = data.update(Size::ZERO, true, theme);
        Self {
            id: None,
            data,
            placement: Placement::new(pos, size),
            parent: None,
        }
    }

    /// Document-wide id, assigned when the widget is placed on top.
    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    pub fn kind(&self) -> WidgetType {
        self.data.kind()
    }

    pub fn data(&self) -> &WidgetData {
        &self.data
    }

    pub fn size(&self) -> Size {
        self.placement.size
    }

    /// Owning group, if grouped.
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<ItemId>) {
        self.parent = parent;
    }

    /// Set position and size; the drawing is recomputed before the next paint.
    pub fn set_pos_rect(&mut self, rect: Rect) {
        self.placement.pos = rect.origin();
        self.set_size(rect.size());
    }

    pub fn set_size(&mut self, size: Size) {
        if size != self.placement.size {
            self.placement.size = size;
            self.data.invalidate();
        }
    }

    /// Apply a data edit; re-measure if the edit reports a layout change.
    pub fn edit(&mut self, theme: &dyn Theme, edit: impl FnOnce(&mut WidgetData) -> bool) {
        if edit(&mut self.data) {
            self.update(false, theme);
        }
    }

    /// Re-derive and re-measure; see [`WidgetData::update`].
    pub fn update(&mut self, to_measured: bool, theme: &dyn Theme) {
        self.placement.size = self.data.update(self.placement.size, to_measured, theme);
    }

    /// Resize to the measured size.
    pub fn auto_resize(&mut self, theme: &dyn Theme) {
        self.placement.size = self.data.measured_size();
        self.data.render(self.placement.size, theme);
    }

    /// Put back saved fields and size exactly.
    pub fn restore(&mut self, fields: WidgetFields, size: Size, theme: &dyn Theme) {
        self.data.restore_fields(fields);
        self.data.update(size, false, theme);
        self.placement.size = size;
        self.data.render(size, theme);
    }

    /// Recompute the drawing sequence if a geometry change made it stale.
    pub fn refresh(&mut self, theme: &dyn Theme) {
        if self.data.is_dirty() {
            self.data.render(self.placement.size, theme);
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut WidgetData {
        &mut self.data
    }
}

/// A composite of widgets sharing one frame.
///
/// Members are ordered by z at creation; the first member is the group's
/// z representative.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    members: Vec<ItemId>,
    placement: Placement,
}

impl_placeable!(Group);

impl Group {
    pub(crate) fn new(members: Vec<ItemId>, rect: Rect, z: f64) -> Self {
        let mut placement = Placement::new(rect.origin(), rect.size());
        placement.z = z;
        Self { members, placement }
    }

    pub fn members(&self) -> &[ItemId] {
        &self.members
    }

    pub fn size(&self) -> Size {
        self.placement.size
    }

    pub(crate) fn set_pos_rect(&mut self, rect: Rect) {
        self.placement.pos = rect.origin();
        self.placement.size = rect.size();
    }
}

/// An arena entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Widget(Widget),
    Group(Group),
}

impl Item {
    fn placeable(&self) -> &dyn Placeable {
        match self {
            Item::Widget(w) => w,
            Item::Group(g) => g,
        }
    }

    fn placeable_mut(&mut self) -> &mut dyn Placeable {
        match self {
            Item::Widget(w) => w,
            Item::Group(g) => g,
        }
    }

    pub fn as_widget(&self) -> Option<&Widget> {
        match self {
            Item::Widget(w) => Some(w),
            Item::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Item::Group(g) => Some(g),
            Item::Widget(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Item::Group(_))
    }
}

impl Placeable for Item {
    fn pos_rect(&self) -> Rect {
        self.placeable().pos_rect()
    }
    fn pos(&self) -> Point {
        self.placeable().pos()
    }
    fn set_pos(&mut self, pos: Point) {
        self.placeable_mut().set_pos(pos)
    }
    fn z(&self) -> f64 {
        self.placeable().z()
    }
    fn set_z(&mut self, z: f64) {
        self.placeable_mut().set_z(z)
    }
    fn is_locked(&self) -> bool {
        self.placeable().is_locked()
    }
    fn set_locked(&mut self, locked: bool) {
        self.placeable_mut().set_locked(locked)
    }
    fn is_selected(&self) -> bool {
        self.placeable().is_selected()
    }
    fn set_selected(&mut self, selected: bool) {
        self.placeable_mut().set_selected(selected)
    }
}

impl From<Widget> for Item {
    fn from(widget: Widget) -> Self {
        Item::Widget(widget)
    }
}

//! Widget property edits.

use super::{CommandContext, type_name};
use crate::draw::WidgetColor;
use crate::items::ItemId;
use crate::scene::Scene;
use crate::widgets::{BoolProperty, IntProperty, WidgetFields};
use kurbo::Size;
use std::collections::HashSet;
use std::mem::discriminant;

/// One field change on a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum DataEdit {
    Text(Vec<String>),
    Int(IntProperty, i32),
    Bool(BoolProperty, bool),
    Color(WidgetColor),
    /// Resize to the measured size.
    Autosize,
}

impl DataEdit {
    fn same_field(&self, other: &DataEdit) -> bool {
        match (self, other) {
            (DataEdit::Int(a, _), DataEdit::Int(b, _)) => a == b,
            (DataEdit::Bool(a, _), DataEdit::Bool(b, _)) => a == b,
            _ => discriminant(self) == discriminant(other),
        }
    }
}

/// Apply a [`DataEdit`]; undo restores the prior fields and size exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct DataCommand {
    item: ItemId,
    edit: DataEdit,
    before: Option<(WidgetFields, Size)>,
}

impl DataCommand {
    pub fn new(item: ItemId, edit: DataEdit) -> Self {
        Self {
            item,
            edit,
            before: None,
        }
    }

    pub fn edit(&self) -> &DataEdit {
        &self.edit
    }

    pub(super) fn redo(&mut self, cx: &mut CommandContext<'_>) {
        let Some(widget) = cx.scene.widget(self.item) else {
            return;
        };
        self.before = Some((widget.data().fields().clone(), widget.size()));

        let theme = cx.theme;
        match &self.edit {
            DataEdit::Text(texts) => {
                cx.scene.edit_widget(self.item, theme, |data| data.set_texts(texts.clone()))
            }
            DataEdit::Int(prop, value) => {
                cx.scene.edit_widget(self.item, theme, |data| data.set_int_property(*prop, *value))
            }
            DataEdit::Bool(prop, value) => {
                cx.scene.edit_widget(self.item, theme, |data| data.set_bool_property(*prop, *value))
            }
            DataEdit::Color(color) => {
                cx.scene.edit_widget(self.item, theme, |data| data.set_color(*color))
            }
            DataEdit::Autosize => cx.scene.auto_resize(self.item, theme),
        }
    }

    pub(super) fn undo(&mut self, cx: &mut CommandContext<'_>) {
        if let Some((fields, size)) = self.before.clone() {
            cx.scene.restore_widget(self.item, fields, size, cx.theme);
        }
    }

    /// Same widget and same field: keep the oldest prior state, take the newest value.
    pub(super) fn merge(&mut self, newer: &DataCommand) -> bool {
        if newer.item != self.item || !self.edit.same_field(&newer.edit) {
            return false;
        }
        self.edit = newer.edit.clone();
        true
    }

    pub(super) fn label(&self, scene: &Scene) -> String {
        let name = type_name(scene, self.item).0;
        match &self.edit {
            DataEdit::Text(_) => format!("Change {name} text"),
            DataEdit::Autosize => format!("Auto-Resize {name}"),
            DataEdit::Int(prop, _) => format!("Set {name} {}", prop.label()),
            DataEdit::Bool(prop, _) => format!("Set {name} {}", prop.label()),
            DataEdit::Color(_) => format!("Set {name} color"),
        }
    }

    pub(super) fn referenced_items(&self, out: &mut HashSet<ItemId>) {
        out.insert(self.item);
    }
}

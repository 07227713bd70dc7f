//! One open mockup: scene, undo history, gesture state and persistence.
//!
//! Every user-visible edit goes through [`Document`] so it lands on the
//! command stack. Gesture handlers drain the scene's event queue right after
//! the gesture and turn the events into commands.

use crate::commands::{
    AddCommand, Command, CommandContext, CommandStack, DataCommand, DataEdit, GroupCommand,
    LockCommand, MoveCommand, PasteCommand, RemoveCommand, ResizeCommand, RestackCommand,
    StepCommand, UngroupCommand, UnlockCommand,
};
use crate::config::EditorConfig;
use crate::draw::WidgetColor;
use crate::error::{DocumentError, DocumentResult};
use crate::interaction::Interaction;
use crate::items::{ItemId, Placeable, Widget};
use crate::persist::{self, LoadedControl};
use crate::scene::{Painter, Scene, SceneEvent};
use crate::storage::Storage;
use crate::theme::{ApproxTheme, Theme};
use crate::widgets::{BoolProperty, IntProperty, WidgetData, WidgetType};
use kurbo::Point;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// An editable mockup.
pub struct Document {
    scene: Scene,
    stack: CommandStack,
    theme: Box<dyn Theme>,
    config: EditorConfig,
    interaction: Interaction,
    /// Widget with an open text edit session.
    editing: Option<ItemId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(EditorConfig::default(), ApproxTheme::new())
    }
}

impl Document {
    pub fn new(config: EditorConfig, theme: impl Theme + 'static) -> Self {
        Self {
            scene: Scene::new(config.z_step),
            stack: CommandStack::new(config.undo_limit),
            theme: Box::new(theme),
            interaction: Interaction::new(&config),
            config,
            editing: None,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stack(&self) -> &CommandStack {
        &self.stack
    }

    pub fn theme(&self) -> &dyn Theme {
        self.theme.as_ref()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// True if there are edits since the last save or load.
    pub fn is_modified(&self) -> bool {
        !self.stack.is_clean()
    }

    fn push(&mut self, command: impl Into<Command>) {
        let mut cx = CommandContext::new(&mut self.scene, self.theme.as_ref());
        self.stack.push(command, &mut cx);
    }

    pub fn undo(&mut self) -> bool {
        let mut cx = CommandContext::new(&mut self.scene, self.theme.as_ref());
        self.stack.undo(&mut cx)
    }

    pub fn redo(&mut self) -> bool {
        let mut cx = CommandContext::new(&mut self.scene, self.theme.as_ref());
        self.stack.redo(&mut cx)
    }

    // --- Placement ---

    /// Add a new widget of `kind` with its top-left corner at `pos`.
    pub fn add_widget(&mut self, kind: WidgetType, pos: Point) -> ItemId {
        let id = self
            .scene
            .insert(Widget::new(kind, pos, self.theme.as_ref()));
        self.push(AddCommand::new(id));
        id
    }

    /// Palette drop: add the archetype with the given ordinal at `point`.
    pub fn drop_widget(&mut self, ordinal: i64, point: Point) -> DocumentResult<ItemId> {
        let Some(kind) = WidgetType::from_ordinal(ordinal) else {
            log::warn!("rejected drop of unknown widget type {ordinal}");
            return Err(DocumentError::UnknownWidgetType(ordinal));
        };
        Ok(self.add_widget(kind, point))
    }

    /// Remove the selected items. Returns false if nothing is selected.
    pub fn delete_selection(&mut self) -> bool {
        let selected = self.scene.selected_sorted();
        if selected.is_empty() {
            return false;
        }
        self.push(RemoveCommand::new(selected));
        true
    }

    // --- Clipboard ---

    /// Serialize the selection as a clipboard fragment.
    pub fn copy_selection(&self) -> DocumentResult<Option<String>> {
        let selected = self.scene.selected_sorted();
        if selected.is_empty() {
            return Ok(None);
        }
        persist::write_controls(&self.scene, &selected, false).map(Some)
    }

    /// Copy the selection, then remove it.
    pub fn cut_selection(&mut self) -> DocumentResult<Option<String>> {
        let Some(text) = self.copy_selection()? else {
            return Ok(None);
        };
        self.push(RemoveCommand::cut(self.scene.selected_sorted()));
        Ok(Some(text))
    }

    /// Paste clipboard text, returning the placed top-level items.
    ///
    /// Pasted widgets go on top of the scene; groups in the fragment are
    /// rebuilt.
    pub fn paste(&mut self, text: &str) -> DocumentResult<Vec<ItemId>> {
        let controls = persist::read_fragment(text, self.theme.as_ref())?;
        if controls.is_empty() {
            return Ok(Vec::new());
        }
        let (widgets, groups) = stage_controls(&mut self.scene, controls);
        let items: Vec<ItemId> = widgets.into_iter().map(|(id, _)| id).collect();

        let before: HashSet<ItemId> = self.scene.top_level_sorted().into_iter().collect();
        self.push(PasteCommand::new(items, groups));
        Ok(self
            .scene
            .top_level_sorted()
            .into_iter()
            .filter(|id| !before.contains(id))
            .collect())
    }

    // --- Structure ---

    /// Group the selection. Returns the new group, or None with fewer than
    /// two selected items.
    pub fn group_selection(&mut self) -> Option<ItemId> {
        let selected = self.scene.selected_sorted();
        if selected.len() < 2 {
            return None;
        }
        let command = GroupCommand::new(&self.scene, selected);
        self.push(command);
        self.scene.selected_sorted().into_iter().find(|id| self.scene.group(*id).is_some())
    }

    /// Dissolve every selected group; returns the released members.
    pub fn ungroup_selection(&mut self) -> Vec<ItemId> {
        let groups: Vec<ItemId> = self
            .scene
            .selected_sorted()
            .into_iter()
            .filter(|id| self.scene.group(*id).is_some())
            .collect();
        let mut members = Vec::new();
        for group in groups {
            if let Some(g) = self.scene.group(group) {
                members.extend_from_slice(g.members());
            }
            let command = UngroupCommand::new(&self.scene, group);
            self.push(command);
        }
        members
    }

    pub fn lock_selection(&mut self) -> bool {
        let selected = self.scene.selected_sorted();
        if selected.is_empty() {
            return false;
        }
        let command = LockCommand::new(&self.scene, selected);
        self.push(command);
        true
    }

    /// Unlock every locked top-level item.
    pub fn unlock_all(&mut self) -> bool {
        let command = UnlockCommand::new(&self.scene);
        if command.is_empty() {
            return false;
        }
        self.push(command);
        true
    }

    // --- Z order ---

    pub fn bring_to_front(&mut self) -> bool {
        let selected = self.scene.selected_sorted();
        if selected.is_empty() {
            return false;
        }
        let command = RestackCommand::front(&self.scene, selected);
        self.push(command);
        true
    }

    pub fn send_to_back(&mut self) -> bool {
        let selected = self.scene.selected_sorted();
        if selected.is_empty() {
            return false;
        }
        let command = RestackCommand::back(&self.scene, selected);
        self.push(command);
        true
    }

    /// Swap the single selected item with the one above it.
    pub fn move_up(&mut self) -> bool {
        match self.scene.selected_sorted().as_slice() {
            [item] => {
                self.push(StepCommand::up(*item));
                true
            }
            _ => false,
        }
    }

    /// Swap the single selected item with the one below it.
    pub fn move_down(&mut self) -> bool {
        match self.scene.selected_sorted().as_slice() {
            [item] => {
                self.push(StepCommand::down(*item));
                true
            }
            _ => false,
        }
    }

    // --- Selection ---

    pub fn select_all(&mut self) {
        self.scene.select_all();
    }

    pub fn select_none(&mut self) {
        self.scene.clear_selection();
    }

    pub fn set_selected(&mut self, item: ItemId, selected: bool) {
        self.scene.set_selected(item, selected);
    }

    // --- Widget properties ---

    /// True if applying `edit` to a copy of the widget's data changes its fields.
    fn changes(&self, item: ItemId, edit: impl FnOnce(&mut WidgetData) -> bool) -> bool {
        let Some(widget) = self.scene.widget(item) else {
            return false;
        };
        let mut probe = widget.data().clone();
        edit(&mut probe);
        probe.fields() != widget.data().fields()
    }

    fn push_data(&mut self, item: ItemId, edit: DataEdit) -> bool {
        let changed = match &edit {
            DataEdit::Text(texts) => self.changes(item, |d| d.set_texts(texts.clone())),
            DataEdit::Int(prop, value) => self.changes(item, |d| d.set_int_property(*prop, *value)),
            DataEdit::Bool(prop, value) => {
                self.changes(item, |d| d.set_bool_property(*prop, *value))
            }
            DataEdit::Color(color) => self.changes(item, |d| d.set_color(*color)),
            DataEdit::Autosize => self
                .scene
                .widget(item)
                .is_some_and(|w| w.size() != w.data().measured_size()),
        };
        if changed {
            self.push(DataCommand::new(item, edit));
        }
        changed
    }

    pub fn set_texts(&mut self, item: ItemId, texts: Vec<String>) -> bool {
        self.push_data(item, DataEdit::Text(texts))
    }

    pub fn set_int_property(&mut self, item: ItemId, prop: IntProperty, value: i32) -> bool {
        self.push_data(item, DataEdit::Int(prop, value))
    }

    pub fn set_bool_property(&mut self, item: ItemId, prop: BoolProperty, value: bool) -> bool {
        self.push_data(item, DataEdit::Bool(prop, value))
    }

    pub fn set_color(&mut self, item: ItemId, color: WidgetColor) -> bool {
        self.push_data(item, DataEdit::Color(color))
    }

    /// Resize the widget to its measured size.
    pub fn auto_resize(&mut self, item: ItemId) -> bool {
        self.push_data(item, DataEdit::Autosize)
    }

    // --- Text editing ---

    /// Open a text edit session, returning the text to edit.
    ///
    /// Widgets without text properties, and locked widgets, can't be edited.
    pub fn begin_edit(&mut self, item: ItemId) -> Option<String> {
        let widget = self.scene.widget(item)?;
        if widget.is_locked() || !widget.data().properties().has_text() {
            return None;
        }
        self.editing = Some(item);
        Some(widget.data().editable_text())
    }

    pub fn editing(&self) -> Option<ItemId> {
        self.editing
    }

    /// Close the session, recording the new text if it changed.
    pub fn commit_edit(&mut self, text: &str) -> bool {
        let Some(item) = self.editing.take() else {
            return false;
        };
        let Some(texts) = self.scene.widget(item).map(|w| w.data().texts_from_edit(text)) else {
            return false;
        };
        self.set_texts(item, texts)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    // --- Gestures ---

    pub fn press(&mut self, point: Point) {
        self.interaction.press(&mut self.scene, point);
    }

    pub fn drag(&mut self, point: Point) {
        self.interaction.drag(&mut self.scene, point);
    }

    /// Finish the gesture and record its moves and resizes.
    pub fn release(&mut self) {
        self.interaction.release(&mut self.scene);
        self.process_events();
    }

    pub fn cancel_gesture(&mut self) {
        self.interaction.cancel(&mut self.scene);
    }

    /// Open a text edit on the widget under `point`, if any.
    pub fn double_click(&mut self, point: Point) -> Option<(ItemId, String)> {
        self.interaction.double_click(&mut self.scene, point);
        self.process_events()
    }

    /// Turn pending scene events into commands. Returns the edit session
    /// opened by an edit request, if any.
    fn process_events(&mut self) -> Option<(ItemId, String)> {
        let mut opened = None;
        for event in self.scene.drain_events() {
            match event {
                SceneEvent::Moved { item, from, to } => {
                    self.push(MoveCommand::new(item, from, to))
                }
                SceneEvent::Resized { item, from, to } => {
                    self.push(ResizeCommand::new(item, from, to))
                }
                SceneEvent::EditRequested { item } => {
                    opened = self.begin_edit(item).map(|text| (item, text));
                }
            }
        }
        opened
    }

    // --- Persistence ---

    /// Replace the contents with a `<controls>` document.
    ///
    /// On failure the document is left untouched. On success the history is
    /// cleared and the document is clean.
    pub fn load_str(&mut self, text: &str) -> DocumentResult<()> {
        let controls = persist::read_controls(text, self.theme.as_ref())?;
        let count = controls.len();
        let mut scene = Scene::new(self.config.z_step);
        let (widgets, groups) = stage_controls(&mut scene, controls);
        for (id, z) in widgets {
            scene.add_on_top(id);
            if let Some(z) = z {
                scene.set_z(id, z);
            }
        }
        for members in groups {
            let members = sorted_by_z(&scene, members);
            scene.create_group(&members);
        }
        self.scene = scene;
        self.stack.clear();
        self.interaction = Interaction::new(&self.config);
        self.editing = None;
        log::info!("loaded {count} controls");
        Ok(())
    }

    /// The whole document as XML.
    pub fn to_xml(&self) -> DocumentResult<String> {
        persist::write_controls(&self.scene, &self.scene.top_level_sorted(), true)
    }

    /// Serialize and mark the current state as saved.
    pub fn save_string(&mut self) -> DocumentResult<String> {
        let xml = self.to_xml()?;
        self.stack.set_clean();
        log::info!("saved {} top-level items", self.scene.top_level_sorted().len());
        Ok(xml)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        self.load_str(&text)?;
        log::info!("opened {}", path.display());
        Ok(())
    }

    pub fn save_file(&mut self, path: impl AsRef<Path>) -> DocumentResult<()> {
        let path = path.as_ref();
        let xml = self.to_xml()?;
        std::fs::write(path, xml)?;
        self.stack.set_clean();
        log::info!("saved {}", path.display());
        Ok(())
    }

    /// Save under `id` in a storage backend.
    pub fn save_to(&mut self, storage: &dyn Storage, id: &str) -> DocumentResult<()> {
        storage.save(id, &self.to_xml()?)?;
        self.stack.set_clean();
        log::info!("stored mockup {id}");
        Ok(())
    }

    /// Replace the contents with the mockup stored under `id`.
    pub fn load_from(&mut self, storage: &dyn Storage, id: &str) -> DocumentResult<()> {
        let xml = storage.load(id)?;
        self.load_str(&xml)
    }

    // --- Paint ---

    pub fn paint(&mut self, painter: &mut dyn Painter) {
        self.scene.paint(self.theme.as_ref(), painter);
    }
}

/// Insert decoded controls into the arena without placing them.
///
/// Returns every widget with its persisted z, in file order, and the member
/// lists of each group. Single-member groups are released as plain widgets.
fn stage_controls(
    scene: &mut Scene,
    controls: Vec<LoadedControl>,
) -> (Vec<(ItemId, Option<f64>)>, Vec<Vec<ItemId>>) {
    let mut widgets = Vec::with_capacity(controls.len());
    let mut grouped: BTreeMap<i64, Vec<ItemId>> = BTreeMap::new();
    for LoadedControl { widget, z, group } in controls {
        let id = scene.insert(widget);
        widgets.push((id, z));
        if let Some(marker) = group {
            grouped.entry(marker).or_default().push(id);
        }
    }

    let mut groups = Vec::new();
    for (marker, members) in grouped {
        if let [single] = members.as_slice() {
            log::warn!("group {marker} has a single member, loading it ungrouped");
            scene.set_locked(*single, false);
            continue;
        }
        groups.push(members);
    }
    (widgets, groups)
}

fn sorted_by_z(scene: &Scene, mut ids: Vec<ItemId>) -> Vec<ItemId> {
    let z = |id: &ItemId| scene.get(*id).map_or(0.0, Placeable::z);
    ids.sort_by(|a, b| z(a).total_cmp(&z(b)));
    ids
}

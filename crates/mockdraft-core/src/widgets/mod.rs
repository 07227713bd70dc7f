//! Widget data: per-archetype defaults, measurement and drawing.
//!
//! Each archetype is a [`Behavior`] table of plain functions selected by
//! [`WidgetType`]. [`WidgetData`] owns the persisted fields plus the derived
//! layout, measured size and cached drawing sequence.

mod accordion;
mod alert_box;
mod breadcrumbs;
mod browser_window;
mod button;
mod image;
mod kind;
mod placeholder;

pub use accordion::{AccordionLayout, SUB_ITEM_MARKER};
pub use alert_box::AlertParts;
pub use kind::{PropertySet, WidgetType};

use crate::draw::{DEFAULT_FONT_SIZE, DrawOp, FontSpec, WidgetColor};
use crate::theme::Theme;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Persisted, user-editable fields shared by every archetype.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetFields {
    pub texts: Vec<String>,
    pub selected_index: i32,
    pub v_scrollbar: bool,
    pub value: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub font_size: i32,
    pub state: i32,
    pub color: WidgetColor,
}

impl Default for WidgetFields {
    fn default() -> Self {
        Self {
            texts: Vec::new(),
            selected_index: 0,
            v_scrollbar: false,
            value: 0,
            bold: false,
            italic: false,
            underline: false,
            font_size: DEFAULT_FONT_SIZE,
            state: 0,
            color: WidgetColor::white(),
        }
    }
}

impl WidgetFields {
    /// First text entry, or empty.
    pub fn text(&self) -> &str {
        self.texts.first().map(String::as_str).unwrap_or("")
    }

    /// Font built from the bold/italic/size flags.
    pub fn font(&self, with_underline: bool) -> FontSpec {
        FontSpec::new(
            self.font_size,
            self.bold,
            self.italic,
            with_underline && self.underline,
        )
    }
}

/// Helper state derived from the fields before measuring.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Layout {
    #[default]
    None,
    Accordion(AccordionLayout),
    Alert(AlertParts),
    Font(FontSpec),
}

/// Inputs for measuring and rendering one widget.
pub struct RenderContext<'a> {
    pub kind: WidgetType,
    pub fields: &'a WidgetFields,
    pub layout: &'a Layout,
    pub theme: &'a dyn Theme,
}

impl RenderContext<'_> {
    /// Font derived during parsing, if the archetype builds one.
    pub fn font(&self) -> Option<&FontSpec> {
        match self.layout {
            Layout::Font(font) => Some(font),
            _ => None,
        }
    }
}

/// Function table for one archetype.
pub(crate) struct Behavior {
    pub properties: PropertySet,
    /// Named states; when present the selected index aliases `state`.
    pub states: &'static [&'static str],
    pub defaults: fn(WidgetType, &mut WidgetFields),
    pub initial_measure: Size,
    pub parse: fn(&WidgetFields) -> Layout,
    /// Receives the previous measured size; returns it unchanged to keep it.
    pub measure: fn(&RenderContext<'_>, Size) -> Size,
    pub render: fn(&RenderContext<'_>, Size) -> Vec<DrawOp>,
}

pub(crate) fn no_layout(_: &WidgetFields) -> Layout {
    Layout::None
}

fn behavior(kind: WidgetType) -> &'static Behavior {
    use WidgetType::*;
    match kind {
        Accordion => &accordion::BEHAVIOR,
        AlertBox => &alert_box::BEHAVIOR,
        Breadcrumbs => &breadcrumbs::BEHAVIOR,
        BrowserWindow => &browser_window::BEHAVIOR,
        Button => &button::BEHAVIOR,
        Calendar | ChartBar | ChartColumn | ChartLine | ChartPie | FormattingToolbar
        | HorzSplitter | PlaybackControls | RedX | StreetMap | VertSplitter | VolumeSlider
        | Webcam => &image::BEHAVIOR,
        _ => &placeholder::BEHAVIOR,
    }
}

/// Integer-valued widget properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntProperty {
    SelectedIndex,
    Value,
    FontSize,
}

impl IntProperty {
    fn flag(self) -> PropertySet {
        match self {
            IntProperty::SelectedIndex => PropertySet::SELECTED_INDEX,
            IntProperty::Value => PropertySet::VALUE,
            IntProperty::FontSize => PropertySet::FONT_SIZE,
        }
    }

    /// Label fragment used in undo text.
    pub fn label(self) -> &'static str {
        match self {
            IntProperty::SelectedIndex => "selected index",
            IntProperty::Value => "value",
            IntProperty::FontSize => "font size",
        }
    }
}

/// Boolean widget properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolProperty {
    VScrollbar,
    Bold,
    Italic,
    Underline,
}

impl BoolProperty {
    fn flag(self) -> PropertySet {
        match self {
            BoolProperty::VScrollbar => PropertySet::VSCROLLBAR,
            BoolProperty::Bold => PropertySet::FONT_BOLD,
            BoolProperty::Italic => PropertySet::FONT_ITALIC,
            BoolProperty::Underline => PropertySet::FONT_UNDERLINE,
        }
    }

    /// Label fragment used in undo text.
    pub fn label(self) -> &'static str {
        match self {
            BoolProperty::VScrollbar => "scrollbar",
            BoolProperty::Bold => "bold",
            BoolProperty::Italic => "italic",
            BoolProperty::Underline => "underline",
        }
    }
}

/// Trim every entry and drop the empty ones.
pub fn trim_texts<I, S>(texts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Archetype state of one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetData {
    kind: WidgetType,
    fields: WidgetFields,
    layout: Layout,
    measured: Size,
    drawing: Vec<DrawOp>,
    dirty: bool,
}

impl WidgetData {
    /// Data with the archetype's default fields, not yet measured.
    pub fn new(kind: WidgetType) -> Self {
        let behavior = behavior(kind);
        let mut fields = WidgetFields::default();
        (behavior.defaults)(kind, &mut fields);
        Self {
            kind,
            fields,
            layout: Layout::None,
            measured: behavior.initial_measure,
            drawing: Vec::new(),
            dirty: true,
        }
    }

    pub fn kind(&self) -> WidgetType {
        self.kind
    }

    pub fn fields(&self) -> &WidgetFields {
        &self.fields
    }

    /// Editable properties of this archetype.
    pub fn properties(&self) -> PropertySet {
        behavior(self.kind).properties
    }

    /// Choices offered for the selected index, if any.
    pub fn states(&self) -> &'static [&'static str] {
        behavior(self.kind).states
    }

    pub fn measured_size(&self) -> Size {
        self.measured
    }

    /// Seed the measured size, as read from a persisted record.
    pub(crate) fn set_measured_size(&mut self, size: Size) {
        self.measured = size;
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Cached drawing sequence; may be stale if [`is_dirty`](Self::is_dirty).
    pub fn drawing(&self) -> &[DrawOp] {
        &self.drawing
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the drawing sequence stale after a geometry change.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    fn context<'a>(&'a self, theme: &'a dyn Theme) -> RenderContext<'a> {
        RenderContext {
            kind: self.kind,
            fields: &self.fields,
            layout: &self.layout,
            theme,
        }
    }

    /// Re-derive, re-measure and re-render.
    ///
    /// Returns the widget's new size: the measured size when `to_measured`
    /// is set, otherwise `size` grown on each axis where the measured size
    /// increased.
    pub fn update(&mut self, size: Size, to_measured: bool, theme: &dyn Theme) -> Size {
        let behavior = behavior(self.kind);
        let previous = self.measured;
        self.layout = (behavior.parse)(&self.fields);
        self.measured = (behavior.measure)(&self.context(theme), previous);

        let size = if to_measured {
            self.measured
        } else if self.measured.width > previous.width || self.measured.height > previous.height {
            Size::new(
                size.width.max(self.measured.width),
                size.height.max(self.measured.height),
            )
        } else {
            size
        };
        self.render(size, theme);
        size
    }

    /// Recompute the drawing sequence for the given size.
    pub fn render(&mut self, size: Size, theme: &dyn Theme) {
        let behavior = behavior(self.kind);
        self.drawing = (behavior.render)(&self.context(theme), size);
        self.dirty = false;
    }

    /// Replace all fields at once; callers re-run `update`.
    pub(crate) fn restore_fields(&mut self, fields: WidgetFields) {
        self.fields = fields;
    }

    /// Set the text list, trimmed with empty entries dropped.
    ///
    /// Returns true if the change affects layout.
    pub fn set_texts(&mut self, texts: Vec<String>) -> bool {
        let props = self.properties();
        self.fields.texts = trim_texts(texts);
        props.has_text()
    }

    /// Editable text: the single line, or the entries joined by newlines.
    pub fn editable_text(&self) -> String {
        if self.properties().contains(PropertySet::MULTILINE_TEXTS) {
            self.fields.texts.join("\n")
        } else {
            self.fields.text().to_string()
        }
    }

    /// Parse an edited text block back into the text list.
    pub fn texts_from_edit(&self, text: &str) -> Vec<String> {
        if self.properties().contains(PropertySet::MULTILINE_TEXTS) {
            trim_texts(text.split('\n'))
        } else {
            trim_texts([text])
        }
    }

    pub fn selected_index(&self) -> i32 {
        if self.states().is_empty() {
            self.fields.selected_index
        } else {
            self.fields.state
        }
    }

    pub fn int_property(&self, prop: IntProperty) -> i32 {
        match prop {
            IntProperty::SelectedIndex => self.selected_index(),
            IntProperty::Value => self.fields.value,
            IntProperty::FontSize => self.fields.font_size,
        }
    }

    /// Returns true if the change affects layout.
    pub fn set_int_property(&mut self, prop: IntProperty, value: i32) -> bool {
        let props = self.properties();
        match prop {
            IntProperty::SelectedIndex if !self.states().is_empty() => {
                self.fields.state = value;
                return props.contains(PropertySet::STATE);
            }
            IntProperty::SelectedIndex => self.fields.selected_index = value,
            IntProperty::Value => self.fields.value = value,
            IntProperty::FontSize => self.fields.font_size = value,
        }
        props.contains(prop.flag())
    }

    pub fn bool_property(&self, prop: BoolProperty) -> bool {
        match prop {
            BoolProperty::VScrollbar => self.fields.v_scrollbar,
            BoolProperty::Bold => self.fields.bold,
            BoolProperty::Italic => self.fields.italic,
            BoolProperty::Underline => self.fields.underline,
        }
    }

    /// Returns true if the change affects layout.
    pub fn set_bool_property(&mut self, prop: BoolProperty, value: bool) -> bool {
        match prop {
            BoolProperty::VScrollbar => self.fields.v_scrollbar = value,
            BoolProperty::Bold => self.fields.bold = value,
            BoolProperty::Italic => self.fields.italic = value,
            BoolProperty::Underline => self.fields.underline = value,
        }
        self.properties().contains(prop.flag())
    }

    /// Returns true if the change affects layout.
    pub fn set_color(&mut self, color: WidgetColor) -> bool {
        self.fields.color = color;
        self.properties().contains(PropertySet::COLOR)
    }

    /// Mutable access for persisted-record loading.
    pub(crate) fn fields_mut(&mut self) -> &mut WidgetFields {
        &mut self.fields
    }
}

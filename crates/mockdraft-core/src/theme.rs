//! Measurement and color context handed to widget data.
//!
//! Widgets never look fonts or images up globally; every measure/render call
//! receives a `&dyn Theme`.

use crate::draw::{ColorRole, FontSpec, ImageRef};
use kurbo::Size;
use peniko::Color;
use std::collections::HashMap;

/// Body color of an unselected widget.
pub const WIDGET_BACKGROUND: Color = Color::from_rgba8(255, 255, 255, 255);
/// Body color of a widget selected in the editor.
pub const SELECTED_WIDGET_BACKGROUND: Color = Color::from_rgba8(214, 206, 204, 255);
/// Highlight behind a selected row.
pub const SELECTED_ITEM_BACKGROUND: Color = Color::from_rgba8(129, 152, 193, 255);
/// Link text color.
pub const LINK_TEXT: Color = Color::from_rgba8(48, 119, 178, 255);

/// Font metrics, bitmap sizes and palette used while measuring and painting.
pub trait Theme {
    /// Advance width of a single line of text.
    fn text_width(&self, text: &str, font: &FontSpec) -> f64;

    /// Height of one line of text.
    fn line_height(&self, font: &FontSpec) -> f64;

    /// Height of `text` word-wrapped into `width`.
    fn text_height(&self, text: &str, width: f64, font: &FontSpec) -> f64 {
        let line_height = self.line_height(font);
        let rows: usize = text
            .split('\n')
            .map(|line| {
                let w = self.text_width(line, font);
                if width <= 0.0 || w <= width {
                    1
                } else {
                    (w / width).ceil() as usize
                }
            })
            .sum();
        rows as f64 * line_height
    }

    /// Natural size of a bitmap resource, if the theme knows it.
    fn image_size(&self, image: &ImageRef) -> Option<Size>;

    /// Resolve a color role to a concrete color.
    fn resolve(&self, role: ColorRole) -> Color {
        match role {
            ColorRole::WidgetBackground => WIDGET_BACKGROUND,
            ColorRole::SelectedWidgetBackground => SELECTED_WIDGET_BACKGROUND,
            ColorRole::SelectedItemBackground => SELECTED_ITEM_BACKGROUND,
            ColorRole::User(color) => color.into(),
        }
    }

    /// Color used for link text.
    fn link_color(&self) -> Color {
        LINK_TEXT
    }
}

/// Deterministic character-count metrics.
///
/// Widths are rounded up to whole units so measured sizes persist exactly.
#[derive(Debug, Clone, Default)]
pub struct ApproxTheme {
    images: HashMap<String, Size>,
}

impl ApproxTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the natural size of a bitmap resource.
    pub fn with_image(mut self, resource: impl Into<String>, size: Size) -> Self {
        self.images.insert(resource.into(), size);
        self
    }

    fn char_width_factor(font: &FontSpec) -> f64 {
        if font.bold { 0.60 } else { 0.55 }
    }
}

impl Theme for ApproxTheme {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        let chars = text.chars().count() as f64;
        (chars * font.point_size as f64 * Self::char_width_factor(font)).ceil()
    }

    fn line_height(&self, font: &FontSpec) -> f64 {
        (font.point_size as f64 * 1.2).ceil()
    }

    fn image_size(&self, image: &ImageRef) -> Option<Size> {
        self.images.get(image.as_str()).copied()
    }
}

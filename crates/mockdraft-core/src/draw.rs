//! Theme-agnostic drawing instructions produced by widget data.
//!
//! A widget caches an ordered list of [`DrawOp`]s in its local coordinate
//! space. A renderer walks the list in order; later ops paint over earlier ones.

use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Default face used for widget text.
pub const DEFAULT_FONT_FAMILY: &str = "Comic Sans MS";

/// Default point size for widget text.
pub const DEFAULT_FONT_SIZE: i32 = 11;

/// Serializable RGB color chosen by the user for a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl WidgetColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse `#rrggbb`, `#rgb` or a basic color name.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return match hex.len() {
                6 => {
                    let value = u32::from_str_radix(hex, 16).ok()?;
                    Some(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
                }
                3 => {
                    let value = u16::from_str_radix(hex, 16).ok()?;
                    let expand = |nibble: u16| (nibble as u8 & 0xf) * 17;
                    Some(Self::new(expand(value >> 8), expand(value >> 4), expand(value)))
                }
                _ => None,
            };
        }
        let named = match text.to_ascii_lowercase().as_str() {
            "white" => Self::white(),
            "black" => Self::black(),
            "red" => Self::new(255, 0, 0),
            "green" => Self::new(0, 128, 0),
            "blue" => Self::new(0, 0, 255),
            "yellow" => Self::new(255, 255, 0),
            "gray" | "grey" => Self::new(128, 128, 128),
            "lightgray" | "lightgrey" => Self::new(211, 211, 211),
            "orange" => Self::new(255, 165, 0),
            _ => return None,
        };
        Some(named)
    }

    /// Lowercase `#rrggbb` form, as persisted.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for WidgetColor {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Color> for WidgetColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b)
    }
}

impl From<WidgetColor> for Color {
    fn from(color: WidgetColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, 255)
    }
}

/// A background color, either a theme role or an explicit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorRole {
    /// Highlight behind a selected row or entry.
    SelectedItemBackground,
    /// Normal widget body.
    WidgetBackground,
    /// Widget body while the widget is selected in the editor.
    SelectedWidgetBackground,
    /// Explicit user color.
    User(WidgetColor),
}

impl ColorRole {
    /// Swap the widget body role to match the item's selection state.
    pub fn for_selection(self, selected: bool) -> Self {
        match (self, selected) {
            (ColorRole::WidgetBackground, true) => ColorRole::SelectedWidgetBackground,
            (ColorRole::SelectedWidgetBackground, false) => ColorRole::WidgetBackground,
            (role, _) => role,
        }
    }
}

/// Frame decoration hint for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameStyle {
    #[default]
    Plain,
    Button,
    BrowserWindow,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Line wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wrap {
    #[default]
    None,
    /// Break at word boundaries.
    Word,
    /// Break anywhere, including inside words.
    Anywhere,
}

/// Layout flags for a text op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextFlags {
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub wrap: Wrap,
    /// Whether text outside the rect is clipped.
    pub clip: bool,
}

impl TextFlags {
    pub const fn new(h_align: HAlign, v_align: VAlign) -> Self {
        Self {
            h_align,
            v_align,
            wrap: Wrap::None,
            clip: true,
        }
    }

    /// Centered on both axes.
    pub const fn center() -> Self {
        Self::new(HAlign::Center, VAlign::Center)
    }

    pub const fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub const fn unclipped(mut self) -> Self {
        self.clip = false;
        self
    }
}

impl Default for TextFlags {
    fn default() -> Self {
        Self::new(HAlign::Left, VAlign::Top)
    }
}

/// Font description built from widget properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub point_size: i32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl FontSpec {
    pub fn new(point_size: i32, bold: bool, italic: bool, underline: bool) -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            point_size,
            bold,
            italic,
            underline,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE, false, false, false)
    }
}

/// Reference to a bitmap resource shipped with the theme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(resource: impl Into<String>) -> Self {
        Self(resource.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One primitive drawing instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Frame {
        rect: Rect,
        style: FrameStyle,
    },
    Background {
        rect: Rect,
        color: ColorRole,
    },
    /// A straight line from the rect's origin to its far corner.
    Line {
        rect: Rect,
    },
    Text {
        rect: Rect,
        flags: TextFlags,
        text: String,
        font: Option<FontSpec>,
    },
    LinkText {
        rect: Rect,
        flags: TextFlags,
        text: String,
        font: FontSpec,
    },
    Image {
        rect: Rect,
        image: ImageRef,
    },
    VScrollbar {
        rect: Rect,
        value: i32,
    },
}

impl DrawOp {
    /// The op's target rect in widget-local coordinates.
    pub fn rect(&self) -> Rect {
        match self {
            DrawOp::Frame { rect, .. }
            | DrawOp::Background { rect, .. }
            | DrawOp::Line { rect }
            | DrawOp::Text { rect, .. }
            | DrawOp::LinkText { rect, .. }
            | DrawOp::Image { rect, .. }
            | DrawOp::VScrollbar { rect, .. } => *rect,
        }
    }

    /// Copy of the op with the widget body color matched to `selected`.
    pub fn for_selection(&self, selected: bool) -> DrawOp {
        match self {
            DrawOp::Background { rect, color } => DrawOp::Background {
                rect: *rect,
                color: color.for_selection(selected),
            },
            other => other.clone(),
        }
    }
}

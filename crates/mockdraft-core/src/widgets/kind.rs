//! Widget archetype catalogue and property flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

macro_rules! widget_types {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Archetype of a placed widget.
        ///
        /// The discriminant is the persisted `controlTypeID` and the palette ordinal.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum WidgetType {
            $($variant),+
        }

        impl WidgetType {
            /// Every archetype, in ordinal order.
            pub const ALL: &'static [WidgetType] = &[$(WidgetType::$variant),+];

            /// Human-readable name, used in command labels and placeholders.
            pub fn name(self) -> &'static str {
                match self {
                    $(WidgetType::$variant => $name),+
                }
            }
        }
    };
}

widget_types! {
    Accordion => "Accordion",
    AlertBox => "Alert Box",
    ArrowLine => "Arrow Line",
    Breadcrumbs => "Breadcrumbs",
    BrowserWindow => "Browser Window",
    Button => "Button",
    ButtonBarTabBar => "ButtonBar TabBar",
    Calendar => "Calendar",
    Callout => "Callout",
    ChartBar => "Bar Chart",
    ChartColumn => "Column Chart",
    ChartLine => "Line Chart",
    ChartPie => "Pie Chart",
    Checkbox => "Checkbox",
    CheckboxGroup => "Checkbox Group",
    ColorPicker => "Color Picker",
    ComboBox => "ComboBox",
    CommentStickyNote => "Comment",
    CoverFlow => "Cover Flow",
    DataGrid => "Data Grid",
    DateChooser => "Date Chooser",
    FieldSet => "Field Set",
    FormattingToolbar => "Formatting Toolbar",
    GeometricShape => "Geometric Shape",
    HelpButton => "Help Button",
    HorzCurlyBrace => "Horizontal Curly Brace",
    HorzRule => "Horizontal Rule",
    HorzScrollBar => "Horizontal Scrollbar",
    HorzSlider => "Horizontal Slider",
    HorzSplitter => "Horizontal Splitter",
    Icon => "Icon",
    IconAndTextLabel => "Icon And Text Label",
    Image => "Image",
    IPhone => "iPhone",
    IPhoneKeyboard => "iPhone Keyboard",
    IPhoneMenu => "iPhone Menu",
    IPhonePicker => "iPhone Picker",
    Label => "Label",
    Link => "Link",
    LinkBar => "Link Bar",
    List => "List",
    Menu => "Menu",
    MenuBar => "Menu Bar",
    ModalScreen => "Modal Screen",
    MultilineButton => "Multiline Button",
    NumericStepper => "Numeric Stepper",
    OnOffSwitch => "On Off Switch",
    ParagraphOfText => "Paragraph Of Text",
    PlaybackControls => "Playback Controls",
    PointyButton => "Pointy Button",
    ProgressBar => "Progress Bar",
    RadioButton => "Radio Button",
    RadioButtonGroup => "Radio Button Group",
    Rectangle => "Rectangle",
    RedX => "Red X",
    ScratchOut => "Scratch Out",
    SearchBox => "Search Box",
    StreetMap => "Street Map",
    Subtitle => "Subtitle",
    TabsBar => "Tabs Bar",
    TagCloud => "Tag Cloud",
    TextArea => "Text Area",
    TextInput => "Text Input",
    Title => "Title",
    Tooltip => "Tooltip",
    TreePane => "Tree Pane",
    VertCurlyBrace => "Vertical Curly Brace",
    VertRule => "Vertical Rule",
    VertScrollBar => "Vertical Scroll Bar",
    VertSlider => "Vertical Slider",
    VertSplitter => "Vertical Splitter",
    VertTabs => "Vertical Tabs",
    VideoPlayer => "Video Player",
    VolumeSlider => "Volume Slider",
    Webcam => "Webcam",
    Window => "Window",
}

impl WidgetType {
    /// Number of archetypes; valid ordinals are `0..COUNT`.
    pub const COUNT: usize = Self::ALL.len();

    /// Look up an archetype by its persisted ordinal.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// The persisted ordinal.
    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of editable properties an archetype exposes.
///
/// Setters store a field regardless, but only re-measure when the
/// field's flag is part of the archetype's set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertySet(u16);

impl PropertySet {
    pub const NONE: Self = Self(0);
    pub const SINGLE_LINE_TEXT: Self = Self(0x1);
    pub const MULTILINE_TEXTS: Self = Self(0x2);
    pub const SELECTED_INDEX: Self = Self(0x4);
    pub const VSCROLLBAR: Self = Self(0x8);
    pub const VALUE: Self = Self(0x10);
    pub const AUTO_SIZE: Self = Self(0x20);
    pub const FONT_BOLD: Self = Self(0x40);
    pub const FONT_ITALIC: Self = Self(0x80);
    pub const FONT_UNDERLINE: Self = Self(0x100);
    pub const FONT_SIZE: Self = Self(0x200);
    pub const COLOR: Self = Self(0x400);
    pub const ICON: Self = Self(0x800);
    pub const STATE: Self = Self(0x1000);

    /// Bold, italic, underline and size together.
    pub const FONT: Self = Self::FONT_BOLD
        .union(Self::FONT_ITALIC)
        .union(Self::FONT_UNDERLINE)
        .union(Self::FONT_SIZE);

    /// Flags set in either operand.
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Raw bit value.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// True if every flag of `other` is set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any flag of `other` is set.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True if the widget carries any text property.
    pub fn has_text(self) -> bool {
        self.intersects(Self::SINGLE_LINE_TEXT | Self::MULTILINE_TEXTS)
    }
}

impl BitOr for PropertySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

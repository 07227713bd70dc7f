//! Collapsible list with one expanded node.
//!
//! Entries starting with [`SUB_ITEM_MARKER`] belong to the closest preceding
//! top-level entry. Only the sub-entries of the selected entry's parent are
//! visible, and that parent's row grows to fill the remaining height.

use super::{Behavior, Layout, PropertySet, RenderContext, WidgetFields, WidgetType};
use crate::draw::{ColorRole, DrawOp, FrameStyle, HAlign, TextFlags, VAlign};
use kurbo::{Rect, Size};

/// Prefix marking a sub-entry.
pub const SUB_ITEM_MARKER: &str = "- ";

const BORDER: f64 = 3.0;
const ROW_HEIGHT: f64 = 30.0;
const TEXT_OFFSET_X: f64 = 10.0;
const TEXT_OFFSET_Y: f64 = 3.0;
const SCROLLBAR_WIDTH: f64 = 16.0;
const EXPANDED_MIN_HEIGHT: f64 = 150.0;
const DEFAULT_WIDTH: f64 = 200.0;

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::MULTILINE_TEXTS
        .union(PropertySet::SELECTED_INDEX)
        .union(PropertySet::VSCROLLBAR)
        .union(PropertySet::VALUE)
        .union(PropertySet::AUTO_SIZE),
    states: &[],
    defaults,
    initial_measure: Size::new(DEFAULT_WIDTH, 0.0),
    parse,
    measure,
    render,
};

fn is_sub_item(text: &str) -> bool {
    text.starts_with(SUB_ITEM_MARKER)
}

/// Visible projection of the entry list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccordionLayout {
    /// Top-level entries plus the sub-entries of the expanded parent.
    pub visible: Vec<String>,
    /// Visible index of the expanded parent.
    pub selected_parent: Option<usize>,
    /// Visible index of the selected entry.
    pub selected_visible: Option<usize>,
    /// Visible index of the first top-level entry after the expanded block,
    /// or `visible.len()` if there is none.
    pub next_parent: usize,
}

impl AccordionLayout {
    /// Project `texts` for the entry at `selected`.
    pub fn new(texts: &[String], selected: i32) -> Self {
        let selected = usize::try_from(selected).ok();

        let mut parent_entry = None;
        let mut last_parent = 0;
        for (i, text) in texts.iter().enumerate() {
            let at_or_before = selected.is_some_and(|s| i <= s);
            if at_or_before && !is_sub_item(text) {
                last_parent = i;
            }
            if Some(i) == selected {
                parent_entry = Some(last_parent);
            }
        }

        let mut layout = AccordionLayout::default();
        let mut next_parent = None;
        let mut expanding = false;
        for (i, text) in texts.iter().enumerate() {
            let sub = is_sub_item(text);
            if !sub {
                layout.visible.push(text.clone());
                if expanding {
                    next_parent = Some(layout.visible.len() - 1);
                    expanding = false;
                }
            }
            if Some(i) == parent_entry {
                expanding = true;
                layout.selected_parent = layout.visible.len().checked_sub(1);
            }
            if expanding && sub {
                layout.visible.push(text.clone());
            }
            if Some(i) == selected {
                layout.selected_visible = layout.visible.len().checked_sub(1);
            }
        }
        layout.next_parent = next_parent.unwrap_or(layout.visible.len());
        layout
    }
}

fn defaults(_: WidgetType, fields: &mut WidgetFields) {
    fields.texts = [
        "Item One",
        "Item Two",
        "- SubItem 2.1",
        "- SubItem 2.2",
        "Item Three",
        "Item Four",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    fields.selected_index = 1;
    fields.v_scrollbar = true;
    fields.value = 20;
}

fn parse(fields: &WidgetFields) -> Layout {
    Layout::Accordion(AccordionLayout::new(&fields.texts, fields.selected_index))
}

fn layout<'a>(cx: &'a RenderContext<'_>) -> Option<&'a AccordionLayout> {
    match cx.layout {
        Layout::Accordion(layout) => Some(layout),
        _ => None,
    }
}

fn measure(cx: &RenderContext<'_>, previous: Size) -> Size {
    let Some(layout) = layout(cx) else {
        return previous;
    };
    let rows = layout.visible.len() as f64;
    Size::new(previous.width, ROW_HEIGHT * (rows - 1.0) + EXPANDED_MIN_HEIGHT)
}

fn row_rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::from_origin_size((x, y), (w, h))
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let (width, height) = (size.width, size.height);
    let mut ops = vec![
        DrawOp::Frame {
            rect: size.to_rect(),
            style: FrameStyle::Plain,
        },
        DrawOp::Background {
            rect: row_rect(BORDER, BORDER, width - BORDER * 2.0, height - BORDER * 2.0),
            color: ColorRole::WidgetBackground,
        },
    ];

    let Some(layout) = layout(cx) else {
        return ops;
    };
    let n = layout.visible.len();
    if n == 0 {
        return ops;
    }

    let parent = layout.selected_parent.map_or(-1.0, |p| p as f64);
    let expanded_height = height - ROW_HEIGHT * (n as f64 - 1.0)
        + ((layout.next_parent as f64 - 1.0) - parent) * ROW_HEIGHT;
    let line = |y: f64| DrawOp::Line {
        rect: row_rect(BORDER, y, width - BORDER * 2.0, 0.0),
    };

    let mut y = 0.0;
    let mut next_parent_y = None;
    for (i, entry) in layout.visible.iter().enumerate() {
        let sub = is_sub_item(entry);
        if y >= height {
            break;
        }
        if i == layout.next_parent {
            if let Some(next_y) = next_parent_y {
                y = next_y;
            }
        }
        let is_parent = layout.selected_parent == Some(i);

        if (i != n - 1 && !sub) || (i == n - 1 && is_parent) {
            ops.push(line(y + ROW_HEIGHT));
        }
        if is_parent {
            if layout.next_parent < n {
                let next_y = y + expanded_height;
                next_parent_y = Some(next_y);
                ops.push(line(next_y));
            }
            ops.push(DrawOp::Background {
                rect: row_rect(BORDER, y + BORDER, width - BORDER * 2.0, ROW_HEIGHT - BORDER),
                color: ColorRole::SelectedItemBackground,
            });
            if cx.fields.v_scrollbar {
                ops.push(DrawOp::VScrollbar {
                    rect: row_rect(
                        width - BORDER - SCROLLBAR_WIDTH,
                        y + BORDER + ROW_HEIGHT,
                        SCROLLBAR_WIDTH,
                        expanded_height - ROW_HEIGHT - BORDER,
                    ),
                    value: cx.fields.value,
                });
            }
        }
        if layout.selected_visible == Some(i) && !is_parent {
            ops.push(DrawOp::Background {
                rect: row_rect(
                    BORDER,
                    y + BORDER,
                    width - BORDER * 2.0 - SCROLLBAR_WIDTH,
                    ROW_HEIGHT - BORDER,
                ),
                color: ColorRole::SelectedItemBackground,
            });
        }

        let text = match entry.strip_prefix(SUB_ITEM_MARKER) {
            Some(rest) => format!("    {rest}"),
            None => entry.clone(),
        };
        ops.push(DrawOp::Text {
            rect: row_rect(
                TEXT_OFFSET_X,
                y + TEXT_OFFSET_Y,
                width - TEXT_OFFSET_X * 2.0,
                ROW_HEIGHT - TEXT_OFFSET_Y * 2.0,
            ),
            flags: TextFlags::new(HAlign::Left, VAlign::Top),
            text,
            font: None,
        });
        y += ROW_HEIGHT;
    }
    ops
}

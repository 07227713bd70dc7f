//! Modal alert with a title, a message and two buttons.

use super::{Behavior, Layout, PropertySet, RenderContext, WidgetFields, WidgetType};
use crate::draw::{ColorRole, DrawOp, FontSpec, FrameStyle, HAlign, TextFlags, VAlign, Wrap};
use kurbo::{Rect, Size};

const SPACING: f64 = 10.0;
const TITLE_HEIGHT: f64 = 20.0;
const BUTTON_PADDING: f64 = 10.0;
const BUTTON_HEIGHT: f64 = 40.0;
const BUTTON_MIN_WIDTH: f64 = 100.0;
const BORDER: f64 = 3.0;

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::MULTILINE_TEXTS.union(PropertySet::AUTO_SIZE),
    states: &[],
    defaults,
    initial_measure: Size::ZERO,
    parse,
    measure,
    render,
};

/// Title, message and button captions split out of the text list.
///
/// The first entry is the title, the last is a comma-separated pair of
/// button captions, and everything in between is the message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlertParts {
    pub title: String,
    pub message: String,
    pub buttons: [String; 2],
}

impl AlertParts {
    pub fn new(texts: &[String]) -> Self {
        let mut parts = AlertParts::default();
        if let Some(title) = texts.first() {
            parts.title = title.clone();
        }
        if texts.len() > 1 {
            if let Some(last) = texts.last() {
                for (slot, caption) in parts.buttons.iter_mut().zip(last.split(',')) {
                    *slot = caption.trim().to_string();
                }
            }
        }
        if texts.len() > 2 {
            parts.message = texts[1..texts.len() - 1].join("\n");
        }
        parts
    }
}

fn defaults(_: WidgetType, fields: &mut WidgetFields) {
    fields.texts = vec![
        "Alert".to_string(),
        "Alert text goes here".to_string(),
        "No, Yes".to_string(),
    ];
}

fn parse(fields: &WidgetFields) -> Layout {
    Layout::Alert(AlertParts::new(&fields.texts))
}

fn parts<'a>(cx: &'a RenderContext<'_>) -> Option<&'a AlertParts> {
    match cx.layout {
        Layout::Alert(parts) => Some(parts),
        _ => None,
    }
}

fn measure(cx: &RenderContext<'_>, previous: Size) -> Size {
    let Some(parts) = parts(cx) else {
        return previous;
    };
    let font = FontSpec::default();
    let theme = cx.theme;

    let min_width = BUTTON_MIN_WIDTH * 2.0 + SPACING * 3.0;
    let title_width = (theme.text_width(&parts.title, &font) + SPACING * 2.0).max(min_width);
    let buttons_width = theme.text_width(&parts.buttons[0], &font)
        + theme.text_width(&parts.buttons[1], &font)
        + BUTTON_PADDING * 4.0
        + SPACING * 3.0;
    let width = title_width.max(buttons_width);
    let height = theme.text_height(&parts.message, width, &font)
        + SPACING * 6.0
        + BUTTON_HEIGHT
        + TITLE_HEIGHT;
    Size::new(width + SPACING * 2.0, height)
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let (w, h) = (size.width, size.height);
    let mut ops = vec![
        DrawOp::Frame {
            rect: size.to_rect(),
            style: FrameStyle::Plain,
        },
        DrawOp::Background {
            rect: Rect::from_origin_size((BORDER, BORDER), (w - BORDER * 2.0, h - BORDER * 2.0)),
            color: ColorRole::WidgetBackground,
        },
    ];
    let Some(parts) = parts(cx) else {
        return ops;
    };

    ops.push(DrawOp::Text {
        rect: Rect::from_origin_size((SPACING, SPACING), (w - SPACING * 2.0, TITLE_HEIGHT)),
        flags: TextFlags::new(HAlign::Center, VAlign::Top),
        text: parts.title.clone(),
        font: None,
    });
    ops.push(DrawOp::Text {
        rect: Rect::from_origin_size(
            (SPACING, SPACING * 3.0 + TITLE_HEIGHT),
            (w - SPACING * 2.0, h),
        ),
        flags: TextFlags::new(HAlign::Center, VAlign::Top).with_wrap(Wrap::Word),
        text: parts.message.clone(),
        font: None,
    });

    let button_width = ((w - SPACING * 3.0) / 2.0).floor();
    let button_y = h - BUTTON_HEIGHT - SPACING;
    let buttons = [
        Rect::from_origin_size((SPACING, button_y), (button_width, BUTTON_HEIGHT)),
        Rect::from_origin_size(
            (SPACING * 2.0 + button_width, button_y),
            (button_width, BUTTON_HEIGHT),
        ),
    ];
    for rect in buttons {
        ops.push(DrawOp::Frame {
            rect,
            style: FrameStyle::Plain,
        });
    }
    for (rect, caption) in buttons.into_iter().zip(&parts.buttons) {
        ops.push(DrawOp::Text {
            rect,
            flags: TextFlags::center(),
            text: caption.clone(),
            font: None,
        });
    }
    ops
}

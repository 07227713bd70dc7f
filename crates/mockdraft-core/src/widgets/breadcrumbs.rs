//! Navigation trail: comma-separated crumbs joined by `>`.

use super::{Behavior, Layout, PropertySet, RenderContext, WidgetFields, WidgetType, trim_texts};
use crate::draw::{DrawOp, FontSpec, HAlign, TextFlags, VAlign};
use kurbo::{Point, Rect, Size};

const SEPARATOR: &str = " > ";

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::SINGLE_LINE_TEXT.union(PropertySet::FONT),
    states: &[],
    defaults,
    initial_measure: Size::ZERO,
    parse,
    measure,
    render,
};

fn defaults(_: WidgetType, fields: &mut WidgetFields) {
    fields.texts = vec!["One, Two, Three".to_string()];
}

fn parse(fields: &WidgetFields) -> Layout {
    // Underline is implied for links, not taken from the flag.
    Layout::Font(fields.font(false))
}

fn crumbs(fields: &WidgetFields) -> Option<Vec<String>> {
    let first = fields.texts.first()?;
    Some(trim_texts(first.split(',')))
}

fn measure(cx: &RenderContext<'_>, previous: Size) -> Size {
    let Some(crumbs) = crumbs(cx.fields) else {
        return previous;
    };
    let font = cx.font().cloned().unwrap_or_default();
    let text = crumbs.join(SEPARATOR);
    Size::new(cx.theme.text_width(&text, &font), cx.theme.line_height(&font))
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let Some(crumbs) = crumbs(cx.fields) else {
        return Vec::new();
    };
    let font: FontSpec = cx.font().cloned().unwrap_or_default();
    let flags = TextFlags::new(HAlign::Left, VAlign::Center).unclipped();
    let height = size.height;

    let mut ops = Vec::with_capacity(crumbs.len() * 2);
    let mut pt = Point::ZERO;
    let mut place = |text: &str| {
        let width = cx.theme.text_width(text, &font);
        let rect = Rect::from_origin_size(pt, (width, height));
        pt.x += width;
        rect
    };
    let last = crumbs.len().saturating_sub(1);
    for (i, crumb) in crumbs.iter().enumerate() {
        if i < last {
            ops.push(DrawOp::LinkText {
                rect: place(crumb),
                flags,
                text: crumb.clone(),
                font: font.clone(),
            });
            ops.push(DrawOp::Text {
                rect: place(SEPARATOR),
                flags,
                text: SEPARATOR.to_string(),
                font: Some(font.clone()),
            });
        } else {
            ops.push(DrawOp::Text {
                rect: place(crumb),
                flags,
                text: crumb.clone(),
                font: Some(font.clone()),
            });
        }
    }
    ops
}

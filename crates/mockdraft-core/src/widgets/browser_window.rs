//! Browser chrome with a title row, an address row and an optional scrollbar.

use super::{Behavior, PropertySet, RenderContext, WidgetFields, WidgetType, no_layout};
use crate::draw::{DrawOp, FrameStyle, HAlign, TextFlags, VAlign};
use kurbo::{Rect, Size};

const TITLE_ORIGIN: (f64, f64) = (160.0, 6.0);
const ADDRESS_ORIGIN: (f64, f64) = (160.0, 32.0);
const BORDER_RIGHT: f64 = 95.0;
const TITLE_HEIGHT: f64 = 19.0;
const ADDRESS_HEIGHT: f64 = 15.0;
const SCROLLBAR_WIDTH: f64 = 16.0;
const BORDER: f64 = 3.0;
const TOP_HEIGHT: f64 = 76.0;
const BOTTOM_HEIGHT: f64 = 28.0;

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::VSCROLLBAR
        .union(PropertySet::VALUE)
        .union(PropertySet::MULTILINE_TEXTS),
    states: &[],
    defaults,
    initial_measure: Size::ZERO,
    parse: no_layout,
    measure,
    render,
};

fn defaults(_: WidgetType, fields: &mut WidgetFields) {
    fields.texts = vec!["A web page".to_string(), "http://www.google.com".to_string()];
    fields.v_scrollbar = false;
    fields.value = 50;
}

fn measure(_: &RenderContext<'_>, _: Size) -> Size {
    Size::new(625.0, 375.0)
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let mut ops = vec![DrawOp::Frame {
        rect: size.to_rect(),
        style: FrameStyle::BrowserWindow,
    }];

    let row_width = size.width - BORDER_RIGHT - TITLE_ORIGIN.0;
    let texts = &cx.fields.texts;
    if let Some(title) = texts.first() {
        ops.push(DrawOp::Text {
            rect: Rect::from_origin_size(TITLE_ORIGIN, (row_width, TITLE_HEIGHT)),
            flags: TextFlags::center(),
            text: title.clone(),
            font: None,
        });
    }
    if let Some(address) = texts.get(1) {
        ops.push(DrawOp::Text {
            rect: Rect::from_origin_size(ADDRESS_ORIGIN, (row_width, ADDRESS_HEIGHT)),
            flags: TextFlags::new(HAlign::Left, VAlign::Center),
            text: address.clone(),
            font: None,
        });
    }
    if cx.fields.v_scrollbar {
        ops.push(DrawOp::VScrollbar {
            rect: Rect::from_origin_size(
                (size.width - BORDER - SCROLLBAR_WIDTH, TOP_HEIGHT),
                (SCROLLBAR_WIDTH, size.height - BOTTOM_HEIGHT - TOP_HEIGHT),
            ),
            value: cx.fields.value,
        });
    }
    ops
}

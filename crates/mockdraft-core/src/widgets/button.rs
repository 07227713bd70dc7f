//! Push button with a user color and a visual state.

use super::{Behavior, Layout, PropertySet, RenderContext, WidgetFields, WidgetType};
use crate::draw::{ColorRole, DrawOp, FrameStyle, TextFlags, WidgetColor};
use kurbo::{Rect, Size};

const PADDING: f64 = 10.0;
const INSET_LEFT: f64 = 2.0;
const INSET_TOP: f64 = 2.0;
const INSET_RIGHT: f64 = 5.0;
const INSET_BOTTOM: f64 = 4.0;

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::AUTO_SIZE
        .union(PropertySet::COLOR)
        .union(PropertySet::SINGLE_LINE_TEXT)
        .union(PropertySet::FONT)
        .union(PropertySet::ICON)
        .union(PropertySet::STATE),
    states: &["Normal", "In focus", "Selected", "Disabled"],
    defaults,
    initial_measure: Size::ZERO,
    parse,
    measure,
    render,
};

fn defaults(_: WidgetType, fields: &mut WidgetFields) {
    fields.texts = vec!["button".to_string()];
    fields.state = 0;
    fields.color = WidgetColor::white();
}

fn parse(fields: &WidgetFields) -> Layout {
    Layout::Font(fields.font(true))
}

fn measure(cx: &RenderContext<'_>, previous: Size) -> Size {
    if cx.fields.texts.is_empty() {
        return previous;
    }
    let font = cx.font().cloned().unwrap_or_default();
    Size::new(
        cx.theme.text_width(cx.fields.text(), &font) + PADDING * 2.0,
        cx.theme.line_height(&font) + PADDING * 2.0,
    )
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let rect = size.to_rect();
    let face = Rect::new(
        INSET_LEFT,
        INSET_TOP,
        size.width - INSET_RIGHT,
        size.height - INSET_BOTTOM,
    );
    vec![
        DrawOp::Frame {
            rect,
            style: FrameStyle::Button,
        },
        DrawOp::Background {
            rect: face,
            color: ColorRole::User(cx.fields.color),
        },
        DrawOp::Text {
            rect,
            flags: TextFlags::center(),
            text: cx.fields.text().to_string(),
            font: cx.font().cloned(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ApproxTheme;
    use crate::widgets::{BoolProperty, WidgetData};

    #[test]
    fn test_measure_adds_padding() {
        let theme = ApproxTheme::new();
        let mut data = WidgetData::new(WidgetType::Button);
        let size = data.update(Size::ZERO, true, &theme);
        assert_eq!(size, Size::new(57.0, 34.0));
    }

    #[test]
    fn test_drawing_uses_user_color() {
        let theme = ApproxTheme::new();
        let mut data = WidgetData::new(WidgetType::Button);
        let size = data.update(Size::ZERO, true, &theme);
        let red = WidgetColor::new(255, 0, 0);
        assert!(data.set_color(red));
        data.update(size, false, &theme);

        let ops = data.drawing();
        assert_eq!(ops.len(), 3);
        match &ops[1] {
            DrawOp::Background { rect, color } => {
                assert_eq!(*color, ColorRole::User(red));
                assert_eq!(*rect, Rect::new(2.0, 2.0, 52.0, 30.0));
            }
            other => panic!("Expected background, got {other:?}"),
        }
    }

    #[test]
    fn test_font_carries_underline() {
        let mut data = WidgetData::new(WidgetType::Button);
        data.set_bool_property(BoolProperty::Underline, true);
        match parse(data.fields()) {
            Layout::Font(font) => assert!(font.underline),
            _ => panic!("Expected font layout"),
        }
    }
}

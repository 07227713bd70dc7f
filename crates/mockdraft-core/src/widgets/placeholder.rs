//! Stand-in for archetypes without a dedicated layout.

use super::{Behavior, PropertySet, RenderContext, WidgetFields, WidgetType, no_layout};
use crate::draw::{DrawOp, FrameStyle, TextFlags, Wrap};
use kurbo::Size;

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::SINGLE_LINE_TEXT,
    states: &[],
    defaults,
    initial_measure: Size::ZERO,
    parse: no_layout,
    measure,
    render,
};

fn defaults(kind: WidgetType, fields: &mut WidgetFields) {
    fields.texts = vec![format!("{}: Not implemented yet", kind.name())];
}

fn measure(_: &RenderContext<'_>, _: Size) -> Size {
    Size::new(300.0, 100.0)
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    let rect = size.to_rect();
    vec![
        DrawOp::Frame {
            rect,
            style: FrameStyle::Plain,
        },
        DrawOp::Text {
            rect,
            flags: TextFlags::center().with_wrap(Wrap::Anywhere),
            text: cx.fields.text().to_string(),
            font: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetData;

    #[test]
    fn test_placeholder_text() {
        let theme = ApproxTheme::new();
        let mut data = WidgetData::new(WidgetType::TreePane);
        assert_eq!(data.fields().text(), "Tree Pane: Not implemented yet");
        assert_eq!(data.update(Size::ZERO, true, &theme), Size::new(300.0, 100.0));
        assert_eq!(data.drawing().len(), 2);
    }

    #[test]
    fn test_edited_text_is_drawn() {
        let theme = ApproxTheme::new();
        let mut data = WidgetData::new(WidgetType::Label);
        let size = data.update(Size::ZERO, true, &theme);
        assert!(data.set_texts(vec!["  Hello  ".to_string()]));
        data.update(size, false, &theme);
        assert!(matches!(&data.drawing()[1], DrawOp::Text { text, .. } if text == "Hello"));
    }
}

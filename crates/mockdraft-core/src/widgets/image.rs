//! Archetypes drawn from a fixed bitmap.

use super::{Behavior, PropertySet, RenderContext, WidgetFields, WidgetType, no_layout};
use crate::draw::{DrawOp, ImageRef};
use kurbo::Size;

/// Used when the theme does not know a bitmap's size.
const FALLBACK_SIZE: Size = Size::new(200.0, 150.0);

pub(super) const BEHAVIOR: Behavior = Behavior {
    properties: PropertySet::NONE,
    states: &[],
    defaults,
    initial_measure: Size::ZERO,
    parse: no_layout,
    measure,
    render,
};

/// Bitmap resource for an image-backed archetype.
pub fn resource(kind: WidgetType) -> ImageRef {
    let name = match kind {
        WidgetType::Calendar => "calendar.png",
        WidgetType::ChartBar => "chartbar.png",
        WidgetType::ChartColumn => "chartcolumn.png",
        WidgetType::ChartLine => "chartline.png",
        WidgetType::ChartPie => "chartpie.png",
        WidgetType::FormattingToolbar => "formattingtoolbar.png",
        WidgetType::HorzSplitter => "horzsplitter.png",
        WidgetType::PlaybackControls => "playbackcontrols.png",
        WidgetType::RedX => "redx.png",
        WidgetType::StreetMap => "streetmap.png",
        WidgetType::VertSplitter => "vertsplitter.png",
        WidgetType::VolumeSlider => "volumeslider.png",
        WidgetType::Webcam => "webcam.png",
        _ => "diagramdemo.png",
    };
    ImageRef::new(name)
}

fn defaults(_: WidgetType, _: &mut WidgetFields) {}

fn measure(cx: &RenderContext<'_>, _: Size) -> Size {
    cx.theme
        .image_size(&resource(cx.kind))
        .unwrap_or(FALLBACK_SIZE)
}

fn render(cx: &RenderContext<'_>, size: Size) -> Vec<DrawOp> {
    vec![DrawOp::Image {
        rect: size.to_rect(),
        image: resource(cx.kind),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ApproxTheme;
    use crate::widgets::WidgetData;

    #[test]
    fn test_measure_from_theme() {
        let theme = ApproxTheme::new().with_image("redx.png", Size::new(64.0, 48.0));
        let mut data = WidgetData::new(WidgetType::RedX);
        assert_eq!(data.update(Size::ZERO, true, &theme), Size::new(64.0, 48.0));
        assert_eq!(
            data.drawing(),
            &[DrawOp::Image {
                rect: Size::new(64.0, 48.0).to_rect(),
                image: ImageRef::new("redx.png"),
            }]
        );
    }

    #[test]
    fn test_fallback_size() {
        let theme = ApproxTheme::new();
        let mut data = WidgetData::new(WidgetType::StreetMap);
        assert_eq!(data.update(Size::ZERO, true, &theme), FALLBACK_SIZE);
        assert_eq!(data.properties(), PropertySet::NONE);
    }
}

//! Mockup XML: one `<control>` element per widget under a `<controls>` root.
//!
//! ```xml
//! <controls>
//!     <control controlID="0" controlTypeID="3" x="10" y="20" w="-1" h="-1"
//!              measuredW="57" measuredH="34" zOrder="0.1" locked="0" isInGroup="-1">
//!         <controlProperties>
//!             <text>button</text>
//!         </controlProperties>
//!     </control>
//! </controls>
//! ```
//!
//! Positions are absolute. `w`/`h` are `-1` when the widget has its measured
//! size. Grouped widgets share an `isInGroup` value, the id of the group's
//! first member. Only properties the archetype declares are written.

use crate::draw::WidgetColor;
use crate::error::{DocumentError, DocumentResult, xml_error};
use crate::items::{Item, ItemId, Placeable, Widget};
use crate::scene::Scene;
use crate::theme::Theme;
use crate::widgets::{PropertySet, WidgetFields, WidgetType, trim_texts};
use kurbo::{Point, Size, Vec2};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Cursor;

pub const ROOT: &str = "controls";
const CONTROL: &str = "control";
const PROPERTIES: &str = "controlProperties";

/// Stands in for newlines inside a multi-line `text` property.
pub const TEXT_SEPARATOR: &str = "%0A";

/// A widget decoded from a `<control>` element, not yet placed.
#[derive(Debug, Clone)]
pub struct LoadedControl {
    pub widget: Widget,
    /// Persisted z, if present and valid.
    pub z: Option<f64>,
    /// Shared group marker, if grouped.
    pub group: Option<i64>,
}

/// True if `text` looks like clipboard content this module can read.
pub fn is_fragment(text: &str) -> bool {
    text.trim_start().starts_with("<control")
}

// --- Reading ---

#[derive(Debug, Default)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> DocumentResult<Self> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(xml_error)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            ..Self::default()
        })
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }
}

fn parse_tree(text: &str) -> DocumentResult<Element> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    let mut attach = |stack: &mut Vec<Element>, el: Element| -> DocumentResult<()> {
        match stack.last_mut() {
            Some(parent) => parent.children.push(el),
            None if root.is_none() => root = Some(el),
            None => return Err(DocumentError::Xml("multiple root elements".into())),
        }
        Ok(())
    };

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => attach(&mut stack, Element::from_start(&start)?)?,
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| DocumentError::Xml("unbalanced end tag".into()))?;
                attach(&mut stack, el)?;
            }
            Event::Text(t) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&t.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !stack.is_empty() {
        return Err(DocumentError::Xml("unexpected end of document".into()));
    }
    root.ok_or_else(|| DocumentError::Xml("document has no root element".into()))
}

fn parse_num(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Parse a non-negative number, or `None` to keep the default.
fn non_negative(el: &Element, name: &str) -> Option<f64> {
    parse_num(el.attr(name)).filter(|v| *v >= 0.0)
}

fn apply_property(fields: &mut WidgetFields, props: PropertySet, name: &str, value: &str) {
    let set_int = |target: &mut i32| {
        if let Some(v) = parse_int(value) {
            *target = v;
        }
    };
    let set_bool = |target: &mut bool| {
        if let Some(v) = parse_int(value) {
            *target = v != 0;
        }
    };
    match name {
        "text" if props.contains(PropertySet::SINGLE_LINE_TEXT) => {
            fields.texts = vec![value.trim().to_string()];
        }
        "text" if props.contains(PropertySet::MULTILINE_TEXTS) => {
            fields.texts = trim_texts(value.trim().split(TEXT_SEPARATOR));
        }
        "selectedIndex" if props.contains(PropertySet::SELECTED_INDEX) => {
            set_int(&mut fields.selected_index)
        }
        "verticalScrollBar" if props.contains(PropertySet::VSCROLLBAR) => {
            set_bool(&mut fields.v_scrollbar)
        }
        "value" if props.contains(PropertySet::VALUE) => set_int(&mut fields.value),
        "bold" if props.contains(PropertySet::FONT_BOLD) => set_bool(&mut fields.bold),
        "italic" if props.contains(PropertySet::FONT_ITALIC) => set_bool(&mut fields.italic),
        "underline" if props.contains(PropertySet::FONT_UNDERLINE) => {
            set_bool(&mut fields.underline)
        }
        "fontsize" if props.contains(PropertySet::FONT_SIZE) => set_int(&mut fields.font_size),
        "state" if props.contains(PropertySet::STATE) => set_int(&mut fields.state),
        "color" if props.contains(PropertySet::COLOR) => {
            if let Some(color) = WidgetColor::parse(value.trim()) {
                fields.color = color;
            }
        }
        _ => {}
    }
}

fn read_control(el: &Element, theme: &dyn Theme) -> DocumentResult<LoadedControl> {
    let ordinal = el
        .attr("controlTypeID")
        .and_then(|v| v.trim().parse::<i64>().ok())
        .unwrap_or(-1);
    let kind = WidgetType::from_ordinal(ordinal).ok_or(DocumentError::UnknownWidgetType(ordinal))?;

    let mut widget = Widget::new(kind, Point::ZERO, theme);
    let pos = Point::new(
        non_negative(el, "x").unwrap_or(0.0),
        non_negative(el, "y").unwrap_or(0.0),
    );
    let (w, h) = (non_negative(el, "w"), non_negative(el, "h"));

    let data = widget.data_mut();
    if let (Some(mw), Some(mh)) = (non_negative(el, "measuredW"), non_negative(el, "measuredH")) {
        data.set_measured_size(Size::new(mw, mh));
    }
    let props = data.properties();
    if let Some(properties) = el.child(PROPERTIES) {
        for prop in &properties.children {
            if !prop.text.is_empty() {
                apply_property(data.fields_mut(), props, &prop.name, &prop.text);
            }
        }
    }
    if props.contains(PropertySet::SELECTED_INDEX) {
        let fields = data.fields_mut();
        let count = fields.texts.len();
        if usize::try_from(fields.selected_index).map_or(true, |i| i >= count) {
            fields.selected_index = 0;
        }
    }

    widget.update(true, theme);
    if w.is_some() || h.is_some() {
        let size = widget.size();
        widget.set_size(Size::new(w.unwrap_or(size.width), h.unwrap_or(size.height)));
        widget.refresh(theme);
    }
    widget.set_pos(pos);
    if let Some(locked) = el.attr("locked").and_then(parse_int) {
        widget.set_locked(locked != 0);
    }

    Ok(LoadedControl {
        widget,
        z: parse_num(el.attr("zOrder")),
        group: el
            .attr("isInGroup")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|g| *g >= 0),
    })
}

/// Decode every control under a `<controls>` root.
///
/// Fails wholesale on malformed XML or a different root. Controls of an
/// unknown type are skipped.
pub fn read_controls(text: &str, theme: &dyn Theme) -> DocumentResult<Vec<LoadedControl>> {
    let root = parse_tree(text)?;
    if root.name != ROOT {
        return Err(DocumentError::WrongRoot(root.name));
    }
    let mut controls = Vec::new();
    for el in &root.children {
        match read_control(el, theme) {
            Ok(control) => controls.push(control),
            Err(e) => log::warn!("skipping <{}>: {e}", el.name),
        }
    }
    Ok(controls)
}

/// Decode clipboard text: a `<controls>` document or bare `<control>` elements.
pub fn read_fragment(text: &str, theme: &dyn Theme) -> DocumentResult<Vec<LoadedControl>> {
    if !is_fragment(text) {
        return Err(DocumentError::NotAFragment);
    }
    if text.trim_start().starts_with("<controls") {
        read_controls(text, theme)
    } else {
        read_controls(&format!("<{ROOT}>{text}</{ROOT}>"), theme)
    }
}

// --- Writing ---

fn num(v: f64) -> String {
    format!("{v}")
}

fn flag(v: bool) -> &'static str {
    if v { "1" } else { "0" }
}

fn property_values(fields: &WidgetFields, props: PropertySet) -> Vec<(&'static str, String)> {
    let mut out = Vec::new();
    if props.contains(PropertySet::SINGLE_LINE_TEXT) {
        out.push(("text", fields.text().to_string()));
    }
    if props.contains(PropertySet::MULTILINE_TEXTS) {
        out.push(("text", fields.texts.join(TEXT_SEPARATOR)));
    }
    if props.contains(PropertySet::SELECTED_INDEX) {
        out.push(("selectedIndex", fields.selected_index.to_string()));
    }
    if props.contains(PropertySet::VSCROLLBAR) {
        out.push(("verticalScrollBar", flag(fields.v_scrollbar).to_string()));
    }
    if props.contains(PropertySet::VALUE) {
        out.push(("value", fields.value.to_string()));
    }
    if props.contains(PropertySet::FONT_BOLD) {
        out.push(("bold", flag(fields.bold).to_string()));
    }
    if props.contains(PropertySet::FONT_ITALIC) {
        out.push(("italic", flag(fields.italic).to_string()));
    }
    if props.contains(PropertySet::FONT_UNDERLINE) {
        out.push(("underline", flag(fields.underline).to_string()));
    }
    if props.contains(PropertySet::FONT_SIZE) {
        out.push(("fontsize", fields.font_size.to_string()));
    }
    if props.contains(PropertySet::STATE) {
        out.push(("state", fields.state.to_string()));
    }
    if props.contains(PropertySet::COLOR) {
        out.push(("color", fields.color.to_hex()));
    }
    out
}

fn write_control<W: std::io::Write>(
    writer: &mut Writer<W>,
    widget: &Widget,
    offset: Vec2,
    group: i64,
) -> DocumentResult<()> {
    let data = widget.data();
    let pos = widget.pos() + offset;
    let at_measured = widget.size() == data.measured_size();
    let (w, h) = if at_measured {
        ("-1".to_string(), "-1".to_string())
    } else {
        (num(widget.size().width), num(widget.size().height))
    };

    let mut start = BytesStart::new(CONTROL);
    let attrs = [
        ("controlID", widget.id().map_or("-1".to_string(), |id| id.to_string())),
        ("controlTypeID", data.kind().ordinal().to_string()),
        ("x", num(pos.x)),
        ("y", num(pos.y)),
        ("w", w),
        ("h", h),
        ("measuredW", num(data.measured_size().width)),
        ("measuredH", num(data.measured_size().height)),
        ("zOrder", num(widget.z())),
        ("locked", flag(widget.is_locked()).to_string()),
        ("isInGroup", group.to_string()),
    ];
    for (key, value) in &attrs {
        start.push_attribute((*key, value.as_str()));
    }
    writer.write_event(Event::Start(start)).map_err(xml_error)?;

    writer
        .write_event(Event::Start(BytesStart::new(PROPERTIES)))
        .map_err(xml_error)?;
    for (name, value) in property_values(data.fields(), data.properties()) {
        writer
            .create_element(name)
            .write_text_content(BytesText::new(&value))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(PROPERTIES)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(CONTROL)))
        .map_err(xml_error)?;
    Ok(())
}

/// Encode `items` (top-level ids, in order) as a `<controls>` document.
///
/// Groups are expanded into their members. `declaration` adds the XML
/// declaration for standalone files.
pub fn write_controls(scene: &Scene, items: &[ItemId], declaration: bool) -> DocumentResult<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 4);
    if declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;
    }
    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(xml_error)?;

    for &id in items {
        match scene.get(id) {
            Some(Item::Widget(widget)) => write_control(&mut writer, widget, Vec2::ZERO, -1)?,
            Some(Item::Group(group)) => {
                let members: Vec<&Widget> =
                    group.members().iter().filter_map(|m| scene.widget(*m)).collect();
                let marker = members
                    .first()
                    .and_then(|w| w.id())
                    .map_or(-1, i64::from);
                for widget in members {
                    write_control(&mut writer, widget, group.pos().to_vec2(), marker)?;
                }
            }
            None => {}
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(xml_error)?;
    String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ApproxTheme;

    fn place(scene: &mut Scene, theme: &ApproxTheme, kind: WidgetType, x: f64, y: f64) -> ItemId {
        let id = scene.insert(Widget::new(kind, Point::new(x, y), theme));
        scene.add_on_top(id);
        id
    }

    #[test]
    fn test_write_button() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let id = place(&mut scene, &theme, WidgetType::Button, 10.0, 20.0);
        let xml = write_controls(&scene, &[id], true).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<controls>"));
        assert!(xml.contains(r#"controlID="0""#));
        assert!(xml.contains(&format!(r#"controlTypeID="{}""#, WidgetType::Button.ordinal())));
        assert!(xml.contains(r#"x="10" y="20" w="-1" h="-1""#));
        assert!(xml.contains(r#"isInGroup="-1""#));
        assert!(xml.contains("<text>button</text>"));
        assert!(xml.contains("<color>#ffffff</color>"));
        assert!(!xml.contains("selectedIndex"));
        assert!(xml.contains("\n    <control "));
    }

    #[test]
    fn test_read_back_fields_and_geometry() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let id = place(&mut scene, &theme, WidgetType::Accordion, 5.0, 6.0);
        scene.edit_widget(id, &theme, |d| {
            d.set_texts(vec!["A".into(), "B".into(), "- B1".into(), "C".into()])
        });
        scene.set_rect(id, kurbo::Rect::new(5.0, 6.0, 405.0, 506.0));
        let xml = write_controls(&scene, &[id], false).unwrap();
        assert!(xml.contains("<text>A%0AB%0A- B1%0AC</text>"));

        let controls = read_controls(&xml, &theme).unwrap();
        assert_eq!(controls.len(), 1);
        let loaded = &controls[0].widget;
        let original = scene.widget(id).unwrap();
        assert_eq!(loaded.kind(), WidgetType::Accordion);
        assert_eq!(loaded.data().fields(), original.data().fields());
        assert_eq!(loaded.pos_rect(), original.pos_rect());
        assert_eq!(controls[0].group, None);
        assert!((controls[0].z.unwrap() - original.z()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_groups_share_marker_and_absolute_positions() {
        let theme = ApproxTheme::new();
        let mut scene = Scene::default();
        let a = place(&mut scene, &theme, WidgetType::Button, 30.0, 40.0);
        let b = place(&mut scene, &theme, WidgetType::Button, 100.0, 90.0);
        let group = scene.create_group(&[a, b]);
        let xml = write_controls(&scene, &[group], false).unwrap();

        let controls = read_controls(&xml, &theme).unwrap();
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[0].group, Some(0));
        assert_eq!(controls[1].group, Some(0));
        assert_eq!(controls[0].widget.pos(), Point::new(30.0, 40.0));
        assert_eq!(controls[1].widget.pos(), Point::new(100.0, 90.0));
        assert!(controls[0].widget.is_locked());
    }

    #[test]
    fn test_wrong_root_fails() {
        let theme = ApproxTheme::new();
        let err = read_controls("<widgets><control/></widgets>", &theme).unwrap_err();
        assert!(matches!(err, DocumentError::WrongRoot(name) if name == "widgets"));
    }

    #[test]
    fn test_malformed_xml_fails() {
        let theme = ApproxTheme::new();
        assert!(matches!(read_controls("<controls><control>", &theme), Err(DocumentError::Xml(_))));
        assert!(matches!(
            read_controls("<controls></control>", &theme),
            Err(DocumentError::Xml(_))
        ));
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let theme = ApproxTheme::new();
        let xml = format!(
            r#"<controls><control controlTypeID="999"/><control controlTypeID="{}" x="7" y="8"/></controls>"#,
            WidgetType::Button.ordinal()
        );
        let controls = read_controls(&xml, &theme).unwrap();
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].widget.pos(), Point::new(7.0, 8.0));
    }

    #[test]
    fn test_bad_values_keep_defaults() {
        let theme = ApproxTheme::new();
        let xml = format!(
            r#"<controls>
                <control controlTypeID="{}" x="-5" y="abc" w="oops" locked="yes">
                    <controlProperties>
                        <selectedIndex>42</selectedIndex>
                        <value>nope</value>
                        <mystery>1</mystery>
                    </controlProperties>
                </control>
            </controls>"#,
            WidgetType::Accordion.ordinal()
        );
        let controls = read_controls(&xml, &theme).unwrap();
        let widget = &controls[0].widget;
        assert_eq!(widget.pos(), Point::ZERO);
        assert_eq!(widget.size(), widget.data().measured_size());
        assert_eq!(widget.data().fields().selected_index, 0);
        assert!(!widget.is_locked());
        assert_eq!(controls[0].z, None);
    }

    #[test]
    fn test_properties_outside_set_ignored() {
        let theme = ApproxTheme::new();
        let xml = format!(
            r#"<controls><control controlTypeID="{}"><controlProperties><bold>1</bold><text>hi &amp; bye</text></controlProperties></control></controls>"#,
            WidgetType::TreePane.ordinal()
        );
        let controls = read_controls(&xml, &theme).unwrap();
        let fields = controls[0].widget.data().fields();
        assert!(!fields.bold);
        assert_eq!(fields.text(), "hi & bye");
    }

    #[test]
    fn test_fragments() {
        let theme = ApproxTheme::new();
        let control = format!(r#"<control controlTypeID="{}"/>"#, WidgetType::Button.ordinal());
        assert!(is_fragment(&control));
        assert_eq!(read_fragment(&control, &theme).unwrap().len(), 1);
        assert_eq!(read_fragment(&format!("<controls>{control}{control}</controls>"), &theme).unwrap().len(), 2);
        assert!(!is_fragment("hello"));
        assert!(matches!(read_fragment("hello", &theme), Err(DocumentError::NotAFragment)));
    }
}

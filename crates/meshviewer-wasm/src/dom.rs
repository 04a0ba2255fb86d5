//! DOM scaffold: the SVG canvas, mesh/zone groups, tooltip and error banner.

use shared::{Point, Size, ViewBox, ZoneElement, ZoomTransform};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

pub(crate) fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))
}

fn container(document: &Document, name: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(name)
        .ok_or_else(|| JsValue::from_str(&format!("Container '#{name}' not found")))
}

fn svg_element(document: &Document, tag: &str) -> Result<Element, JsValue> {
    document.create_element_ns(Some(SVG_NS), tag)
}

/// Elements created for one viewer:
/// `div#name > svg#name_svg > g#name_mesh > g#name_zones > path.zone*`.
pub(crate) struct MeshDom {
    pub container: Element,
    pub svg: Element,
    pub mesh: Element,
    pub zones: Element,
}

impl MeshDom {
    pub fn create(document: &Document, name: &str) -> Result<Self, JsValue> {
        let container = container(document, name)?;

        let svg = svg_element(document, "svg")?;
        svg.set_id(&format!("{name}_svg"));
        svg.set_attribute("class", "svgClass")?;
        svg.set_attribute("width", "100%")?;
        svg.set_attribute("height", "100%")?;
        container.append_child(&svg)?;

        let mesh = svg_element(document, "g")?;
        mesh.set_id(&format!("{name}_mesh"));
        svg.append_child(&mesh)?;

        let zones = svg_element(document, "g")?;
        zones.set_id(&format!("{name}_zones"));
        mesh.append_child(&zones)?;

        Ok(Self {
            container,
            svg,
            mesh,
            zones,
        })
    }

    pub fn append_zone(&self, document: &Document, element: &ZoneElement) -> Result<(), JsValue> {
        let path = svg_element(document, "path")?;
        path.set_id(&element.dom_id);
        path.set_attribute("class", "zone")?;
        path.set_attribute("d", &element.path)?;
        path.set_attribute("style", &format!("fill: {}", element.fill))?;
        self.zones.append_child(&path)?;
        Ok(())
    }

    /// Pixel size of the drawing area.
    pub fn viewport_size(&self) -> Size {
        let rect = self.container.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    /// Pointer position relative to the SVG's top-left corner.
    pub fn pointer_offset(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.svg.get_bounding_client_rect();
        Point::new(client_x as f64 - rect.left(), client_y as f64 - rect.top())
    }

    pub fn set_view_box(&self, view_box: &ViewBox) {
        if let Err(e) = self.svg.set_attribute("viewBox", &view_box.to_attr()) {
            tracing::warn!("failed to set viewBox: {e:?}");
        }
    }

    pub fn set_transform(&self, transform: &ZoomTransform) {
        if let Err(e) = self.mesh.set_attribute("transform", &transform.to_svg()) {
            tracing::warn!("failed to set transform: {e:?}");
        }
    }
}

/// Visible error indication inside the container.
pub(crate) fn show_error(document: &Document, name: &str, message: &str) -> Result<(), JsValue> {
    let container = container(document, name)?;
    let banner = document.create_element("div")?;
    banner.set_id(&format!("{name}_error"));
    banner.set_attribute("class", "meshviewer-error")?;
    banner.set_text_content(Some(&banner_text(message)));
    container.append_child(&banner)?;
    Ok(())
}

fn banner_text(message: &str) -> String {
    format!("Failed to load mesh: {message}")
}

/// Single tooltip shared by all zones, appended to `<body>`.
pub(crate) struct Tooltip {
    el: HtmlElement,
    offset: f64,
}

impl Tooltip {
    pub fn create(document: &Document, fade_ms: u32, offset: f64) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("No body"))?;
        let el: HtmlElement = document.create_element("div")?.dyn_into()?;
        el.set_attribute("class", "tooltip")?;
        let style = el.style();
        style.set_property("position", "absolute")?;
        style.set_property("pointer-events", "none")?;
        style.set_property("opacity", "0")?;
        style.set_property("transition", &format!("opacity {fade_ms}ms"))?;
        body.append_child(&el)?;
        Ok(Self { el, offset })
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(e) = self.el.style().set_property(property, value) {
            tracing::warn!("tooltip style {property}: {e:?}");
        }
    }

    pub fn show(&self) {
        self.set_style("opacity", "1");
    }

    pub fn hide(&self) {
        self.set_style("opacity", "0");
    }

    /// Set the text, then centre the tooltip above the page position.
    pub fn update(&self, text: &str, page: Point) {
        self.el.set_text_content(Some(text));
        let rect = self.el.get_bounding_client_rect();
        let pos = shared::tooltip::tooltip_position(
            page,
            Size::new(rect.width(), rect.height()),
            self.offset,
        );
        self.set_style("left", &format!("{}px", pos.x));
        self.set_style("top", &format!("{}px", pos.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_text() {
        assert_eq!(
            banner_text("failed to fetch 'a.json': 404 Not Found"),
            "Failed to load mesh: failed to fetch 'a.json': 404 Not Found"
        );
    }
}

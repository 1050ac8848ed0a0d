//! SVG markup for a [`Scene`].
//!
//! Shape groups carry `data-entity` so a host can hit-test the markup
//! without binding per-element closures.

use crate::diagram::{
    emphasis_opacity, CircleShape, ClipShape, Crosshair, FormatShape, ReferenceLayer, Scene,
    CIRCLE_FILL_OPACITY, SUBLABEL_OPACITY,
};
use crate::models::EntityRef;

const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, sans-serif";
const CROSSHAIR_COLOR: &str = "#bbb";
const REFERENCE_CLIP_ID: &str = "reference-clip";

/// Escape text for use in element content or a double-quoted attribute.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize a full scene as a standalone `<svg>` element.
pub fn render_scene(scene: &Scene) -> String {
    let mut svg = String::with_capacity(4096);
    let vb = scene.frame.view_box;
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{vb}" preserveAspectRatio="xMidYMid meet" class="format-svg">"#
    ));
    if let Some(layer) = &scene.reference {
        build_reference_clip(&mut svg, layer);
    }
    build_crosshair(&mut svg, &scene.crosshair);
    if let Some(layer) = &scene.reference {
        build_reference_image(&mut svg, layer);
    }
    for circle in &scene.circles {
        build_circle(&mut svg, circle);
    }
    for format in &scene.formats {
        build_format(&mut svg, format);
    }
    svg.push_str("</svg>");
    svg
}

fn build_crosshair(svg: &mut String, ch: &Crosshair) {
    let arm = ch.arm;
    let sw = ch.stroke_width;
    svg.push_str(&format!(
        r#"<g class="crosshair" pointer-events="none"><line x1="{}" y1="0" x2="{arm}" y2="0" stroke="{CROSSHAIR_COLOR}" stroke-width="{sw}"/><line x1="0" y1="{}" x2="0" y2="{arm}" stroke="{CROSSHAIR_COLOR}" stroke-width="{sw}"/></g>"#,
        -arm, -arm
    ));
}

fn build_reference_clip(svg: &mut String, layer: &ReferenceLayer) {
    let shape = match layer.clip {
        ClipShape::Circle { radius } => format!(r#"<circle cx="0" cy="0" r="{radius}"/>"#),
        ClipShape::Rect { width, height } => format!(
            r#"<rect x="{}" y="{}" width="{width}" height="{height}"/>"#,
            -width / 2.0,
            -height / 2.0
        ),
    };
    svg.push_str(&format!(
        r#"<defs><clipPath id="{REFERENCE_CLIP_ID}">{shape}</clipPath></defs>"#
    ));
}

fn build_reference_image(svg: &mut String, layer: &ReferenceLayer) {
    let (w, h) = layer.clip.bounds();
    let href = escape_xml(&layer.href);
    let opacity = layer.opacity;
    // "slice" scales the photo to cover the clip bounds, like object-fit: cover.
    svg.push_str(&format!(
        r#"<image class="reference-image" href="{href}" x="{}" y="{}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid slice" clip-path="url(#{REFERENCE_CLIP_ID})" opacity="{opacity}" pointer-events="none"/>"#,
        -w / 2.0,
        -h / 2.0
    ));
}

fn group_class(base: &str, class: &str) -> String {
    if class.is_empty() {
        base.to_string()
    } else {
        format!("{base} {class}")
    }
}

fn build_circle(svg: &mut String, c: &CircleShape) {
    let entity = escape_xml(&EntityRef::Circle(c.id.clone()).to_attr());
    let class = group_class("circle-group", c.emphasis.css_class());
    let opacity = emphasis_opacity(c.emphasis);
    let name = escape_xml(&c.name);
    let color = escape_xml(&c.color);
    let r = c.radius;
    let sw = c.stroke_width;
    let dash = &c.dasharray;
    let label_y = c.label_y;
    let fs = c.font_size;
    svg.push_str(&format!(
        r#"<g class="{class}" data-entity="{entity}" opacity="{opacity}">"#
    ));
    svg.push_str(&format!(
        r#"<circle cx="0" cy="0" r="{r}" fill="{color}" fill-opacity="{CIRCLE_FILL_OPACITY}" stroke="{color}" stroke-width="{sw}" stroke-dasharray="{dash}"/>"#
    ));
    svg.push_str(&format!(
        r#"<text x="0" y="{label_y}" fill="{color}" font-size="{fs}" font-family="{FONT_FAMILY}" text-anchor="middle">{name}</text>"#
    ));
    svg.push_str("</g>");
}

fn build_format(svg: &mut String, f: &FormatShape) {
    let entity = escape_xml(&EntityRef::Format(f.id.clone()).to_attr());
    let class = group_class("format-group", f.emphasis.css_class());
    let opacity = emphasis_opacity(f.emphasis);
    let name = escape_xml(&f.name);
    let color = escape_xml(&f.color);
    let (w, h) = (f.width, f.height);
    let sw = f.stroke_width;
    let dash = match &f.dasharray {
        Some(d) => format!(r#" stroke-dasharray="{}""#, escape_xml(d)),
        None => String::new(),
    };
    let (lx, ly, sub_y) = (f.label.x, f.label.y, f.label.sub_y);
    let (fs, sfs) = (f.font_size, f.small_font_size);
    let weight = f.font_weight();
    let dims = escape_xml(&f.dimensions);

    svg.push_str(&format!(
        r#"<g class="{class}" data-entity="{entity}" opacity="{opacity}">"#
    ));
    svg.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{w}" height="{h}" fill="none" stroke="{color}" stroke-width="{sw}"{dash}/>"#,
        -w / 2.0,
        -h / 2.0
    ));
    svg.push_str(&format!(
        r#"<text x="{lx}" y="{ly}" fill="{color}" font-size="{fs}" font-family="{FONT_FAMILY}" font-weight="{weight}">{name}</text>"#
    ));
    svg.push_str(&format!(
        r#"<text x="{lx}" y="{sub_y}" fill="{color}" font-size="{sfs}" font-family="{FONT_FAMILY}" font-weight="400" opacity="{SUBLABEL_OPACITY}">{dims}</text>"#
    ));
    svg.push_str("</g>");
}

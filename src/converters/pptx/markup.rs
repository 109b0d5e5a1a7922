//! Renders shapes as PresentationML / DrawingML markup (`<p:sp>` inside `<p:spTree>`).

use std::fmt::Write;

use super::{
    constants::*,
    error::Result,
    structure::ShapeTree,
    utils::{escape_xml_attr, escape_xml_text},
};
use crate::models::{
    geometry::{CustomGeometry, DrawingOp, Point},
    shape::{Frame, Paint, ShapeKind, ShapeNode, Stroke, TextRun},
};

impl ShapeTree {
    /// Renders the tree as a `<p:spTree>` element with the `p` and `a` namespaces declared
    /// on the root, ready to be placed inside a slide's `<p:cSld>`.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::new();
        write!(
            xml,
            r#"<p:spTree xmlns:p="{}" xmlns:a="{}">"#,
            NS_PRESENTATIONML, NS_DRAWINGML
        )?;
        write!(
            xml,
            r#"<p:nvGrpSpPr><p:cNvPr id="{}" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
            SHAPE_TREE_GROUP_ID
        )?;
        xml.push_str(
            r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
        );
        for shape in self.shapes() {
            write_shape(shape, &mut xml)?;
        }
        xml.push_str("</p:spTree>");
        Ok(xml)
    }
}

/// Appends one `<p:sp>` element for `shape` to `xml`.
pub fn write_shape(shape: &ShapeNode, xml: &mut String) -> Result<()> {
    xml.push_str("<p:sp>");

    // --- Non-visual properties ---
    write!(
        xml,
        r#"<p:nvSpPr><p:cNvPr id="{}" name="{}"/>"#,
        shape.id,
        escape_xml_attr(&shape.name)
    )?;
    if shape.kind == ShapeKind::TextBox {
        xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
    } else {
        xml.push_str("<p:cNvSpPr/>");
    }
    xml.push_str("<p:nvPr/></p:nvSpPr>");

    // --- Shape properties ---
    xml.push_str("<p:spPr>");
    write_frame(&shape.frame, xml)?;
    match &shape.kind {
        ShapeKind::Freeform(geometry) => write_custom_geometry(geometry, xml)?,
        kind => {
            let preset = kind.preset_name().unwrap_or("rect");
            write!(xml, r#"<a:prstGeom prst="{}"><a:avLst/></a:prstGeom>"#, preset)?;
        }
    }
    if let Some(fill) = &shape.fill {
        write_paint(fill, xml)?;
    }
    if let Some(stroke) = &shape.stroke {
        write_stroke(stroke, xml)?;
    }
    xml.push_str("</p:spPr>");

    if let Some(run) = &shape.text {
        write_text_body(run, xml)?;
    }

    xml.push_str("</p:sp>");
    Ok(())
}

fn write_frame(frame: &Frame, xml: &mut String) -> Result<()> {
    xml.push_str("<a:xfrm");
    if let Some(rotation) = frame.rotation {
        write!(xml, r#" rot="{}""#, rotation)?;
    }
    if frame.flip_h {
        xml.push_str(r#" flipH="1""#);
    }
    if frame.flip_v {
        xml.push_str(r#" flipV="1""#);
    }
    write!(
        xml,
        r#"><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        frame.x, frame.y, frame.cx, frame.cy
    )?;
    Ok(())
}

fn write_point(point: &Point, xml: &mut String) -> Result<()> {
    write!(xml, r#"<a:pt x="{}" y="{}"/>"#, point.x, point.y)?;
    Ok(())
}

fn write_custom_geometry(geometry: &CustomGeometry, xml: &mut String) -> Result<()> {
    xml.push_str(
        r#"<a:custGeom><a:avLst/><a:gdLst/><a:ahLst/><a:cxnLst/><a:rect l="0" t="0" r="0" b="0"/><a:pathLst>"#,
    );
    write!(
        xml,
        r#"<a:path w="{}" h="{}">"#,
        geometry.width, geometry.height
    )?;
    for op in &geometry.ops {
        match op {
            DrawingOp::MoveTo(point) => {
                xml.push_str("<a:moveTo>");
                write_point(point, xml)?;
                xml.push_str("</a:moveTo>");
            }
            DrawingOp::LineTo(point) => {
                xml.push_str("<a:lnTo>");
                write_point(point, xml)?;
                xml.push_str("</a:lnTo>");
            }
            DrawingOp::CubicBezierTo {
                control1,
                control2,
                end,
            } => {
                xml.push_str("<a:cubicBezTo>");
                for point in [control1, control2, end] {
                    write_point(point, xml)?;
                }
                xml.push_str("</a:cubicBezTo>");
            }
            DrawingOp::ArcTo {
                width_radius,
                height_radius,
                start_angle,
                swing_angle,
            } => {
                write!(
                    xml,
                    r#"<a:arcTo wR="{}" hR="{}" stAng="{}" swAng="{}"/>"#,
                    width_radius, height_radius, start_angle, swing_angle
                )?;
            }
            DrawingOp::Close => xml.push_str("<a:close/>"),
        }
    }
    xml.push_str("</a:path></a:pathLst></a:custGeom>");
    Ok(())
}

/// Writes `<a:noFill/>` or a `<a:solidFill>` with an `<a:alpha>` child when translucent.
fn write_paint(paint: &Paint, xml: &mut String) -> Result<()> {
    match paint {
        Paint::None => xml.push_str("<a:noFill/>"),
        Paint::Solid(color) => {
            write!(xml, r#"<a:solidFill><a:srgbClr val="{}""#, color.rgb)?;
            if color.is_opaque() {
                xml.push_str("/>");
            } else {
                write!(xml, r#"><a:alpha val="{}"/></a:srgbClr>"#, color.alpha)?;
            }
            xml.push_str("</a:solidFill>");
        }
    }
    Ok(())
}

fn write_stroke(stroke: &Stroke, xml: &mut String) -> Result<()> {
    match stroke.width {
        Some(width) => write!(xml, r#"<a:ln w="{}">"#, width)?,
        None => xml.push_str("<a:ln>"),
    }
    write_paint(&stroke.paint, xml)?;
    xml.push_str("</a:ln>");
    Ok(())
}

fn write_text_body(run: &TextRun, xml: &mut String) -> Result<()> {
    write!(
        xml,
        r#"<p:txBody><a:bodyPr wrap="none" rtlCol="0" anchor="{}"><a:normAutofit fontScale="{}" lnSpcReduction="{}"/></a:bodyPr><a:lstStyle/>"#,
        run.anchor.as_attr(),
        TEXT_AUTOFIT_FONT_SCALE,
        TEXT_AUTOFIT_LINE_SPACING_REDUCTION
    )?;
    write!(
        xml,
        r#"<a:p><a:pPr algn="{}"/><a:r><a:rPr lang="{}" sz="{}""#,
        run.alignment.as_attr(),
        TEXT_LANGUAGE,
        run.size
    )?;
    if run.bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push_str(r#" dirty="0">"#);
    write_paint(&run.color, xml)?;
    write!(
        xml,
        "</a:rPr><a:t>{}</a:t></a:r></a:p></p:txBody>",
        escape_xml_text(&run.text)
    )?;
    Ok(())
}

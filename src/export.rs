use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dataset::DatasetSwitcher;
use crate::geometry::{DiagramGeometry, LabelAnchor, TextAnchor, VerticalAnchor};
use crate::palette::{
    BACKGROUND, BRIDGE_FILL, CONNECTOR, LABEL_TEXT, funnel_color, sector_color, svg_color,
};

const FONT_FAMILY: &str = "Inter, Helvetica, Arial, sans-serif";
const FONT_SIZE: f32 = 12.5;

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn text_attrs(anchor: &LabelAnchor) -> String {
    let text_anchor = match anchor.horizontal {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let baseline = match anchor.vertical {
        VerticalAnchor::Top => "hanging",
        VerticalAnchor::Center => "middle",
        VerticalAnchor::Bottom => "alphabetic",
    };
    format!(
        "x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{text_anchor}\" dominant-baseline=\"{baseline}\"",
        anchor.anchor.x, anchor.anchor.y
    )
}

fn push_label(svg: &mut String, anchor: &LabelAnchor, text: &str) {
    let [edge, end] = anchor.connector();
    svg.push_str(&format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        edge.x,
        edge.y,
        end.x,
        end.y,
        svg_color(CONNECTOR)
    ));
    svg.push_str(&format!(
        "<text {} font-family=\"{FONT_FAMILY}\" font-size=\"{FONT_SIZE}\" fill=\"{}\">{}</text>",
        text_attrs(anchor),
        svg_color(LABEL_TEXT),
        escape_xml(text)
    ));
}

pub fn render_svg(geometry: &DiagramGeometry, dataset: &DatasetSwitcher) -> String {
    let mut svg = String::new();
    let width = geometry.design_size.x;
    let height = geometry.design_size.y;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        svg_color(BACKGROUND)
    ));

    let funnel = dataset.funnel();
    for (segment, label) in geometry.funnel.iter().zip(&geometry.funnel_labels) {
        let Some(stage) = funnel.get(segment.index) else {
            continue;
        };
        svg.push_str(&format!(
            "<path data-stage=\"{}\" d=\"{}\" fill=\"{}\"><title>{}</title></path>",
            escape_xml(stage.id.as_str()),
            segment.path().to_svg_d(),
            svg_color(funnel_color(segment.index, funnel.len())),
            escape_xml(&stage.label)
        ));
        push_label(&mut svg, label, stage.display_label());
    }

    if let Some(bridge) = &geometry.bridge {
        for [start, end] in bridge.segments() {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
                start.x,
                start.y,
                end.x,
                end.y,
                svg_color(CONNECTOR)
            ));
        }
        let [tip, left, right] = bridge.arrow;
        svg.push_str(&format!(
            "<polygon points=\"{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}\" fill=\"{}\"/>",
            tip.x,
            tip.y,
            left.x,
            left.y,
            right.x,
            right.y,
            svg_color(CONNECTOR)
        ));
        let bridge_stage = dataset.bridge();
        svg.push_str(&format!(
            "<circle data-stage=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"><title>{}</title></circle>",
            escape_xml(bridge_stage.id.as_str()),
            bridge.node_center.x,
            bridge.node_center.y,
            bridge.node_radius,
            svg_color(BRIDGE_FILL),
            escape_xml(&bridge_stage.label)
        ));
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"hanging\" font-family=\"{FONT_FAMILY}\" font-size=\"{FONT_SIZE}\" fill=\"{}\">{}</text>",
            bridge.node_center.x,
            bridge.node_center.y + bridge.node_radius + 6.0,
            svg_color(LABEL_TEXT),
            escape_xml(bridge_stage.display_label())
        ));
    }

    let flywheel = dataset.flywheel();
    for (sector, label) in geometry.sectors.iter().zip(&geometry.sector_labels) {
        let Some(stage) = flywheel.get(sector.index) else {
            continue;
        };
        svg.push_str(&format!(
            "<path data-stage=\"{}\" d=\"{}\" fill=\"{}\"><title>{}</title></path>",
            escape_xml(stage.id.as_str()),
            sector.path().to_svg_d(),
            svg_color(sector_color(sector.index)),
            escape_xml(&stage.label)
        ));
        push_label(&mut svg, label, stage.display_label());
    }

    if let Some(model) = dataset.model_info()
        && geometry.flywheel_center.x.is_finite()
        && geometry.flywheel_center.y.is_finite()
    {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{FONT_FAMILY}\" font-size=\"15\" fill=\"{}\">{}</text>",
            geometry.flywheel_center.x,
            geometry.flywheel_center.y,
            svg_color(LABEL_TEXT),
            escape_xml(&model.label)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg(path: &Path, geometry: &DiagramGeometry, dataset: &DatasetSwitcher) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export directory {}", parent.display()))?;
    }
    let svg = render_svg(geometry, dataset);
    fs::write(path, svg).with_context(|| format!("failed to write svg {}", path.display()))?;
    tracing::info!(path = %path.display(), model = %dataset.model(), "exported diagram");
    Ok(())
}

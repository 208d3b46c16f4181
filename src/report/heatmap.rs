//! Heatmap rendering.
//!
//! The heatmap is a single HTML page with no external resources: an SVG
//! chart drawn with plotters, followed by a hoverable grid that shows the
//! exact count for every pair.

use crate::config::HeatmapConfig;
use crate::models::InteractionMatrix;
use anyhow::{Context, Result};
use plotters::prelude::*;

/// Colour of a zero count.
const LOW: (u8, u8, u8) = (247, 251, 255);
/// Colour of the largest count.
const HIGH: (u8, u8, u8) = (8, 48, 107);

/// Render the complete heatmap page.
pub fn render_heatmap_html(matrix: &InteractionMatrix, config: &HeatmapConfig) -> Result<String> {
    let title = escape_html(&config.title);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n", title));

    if matrix.is_empty() {
        html.push_str("<p>No wasps were observed in this census.</p>\n");
    } else {
        html.push_str("<figure>\n");
        html.push_str(&render_heatmap_svg(matrix, config)?);
        html.push_str("\n</figure>\n");
        html.push_str(&render_grid(matrix));
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

/// Draw the matrix as an SVG heatmap, first wasp at the top left.
pub fn render_heatmap_svg(matrix: &InteractionMatrix, config: &HeatmapConfig) -> Result<String> {
    let ids = matrix.ids();
    let n = ids.len() as i32;
    let max = matrix.max_count();
    let label_area = label_area_size(ids);

    // Row i is drawn at y = n - 1 - i so the first wasp sits at the top
    let label_for = |v: i32| -> String {
        usize::try_from(v)
            .ok()
            .and_then(|i| ids.get(i))
            .cloned()
            .unwrap_or_default()
    };
    let x_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => label_for(*i),
        SegmentValue::Last => String::new(),
    };
    let y_label = |v: &SegmentValue<i32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => label_for(n - 1 - *i),
        SegmentValue::Last => String::new(),
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height))
            .into_drawing_area();
        root.fill(&WHITE).context("Failed to draw heatmap background")?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, ("sans-serif", 22))
            .margin(12)
            .x_label_area_size(label_area)
            .y_label_area_size(label_area)
            .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())
            .context("Failed to lay out heatmap axes")?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(ids.len())
            .y_labels(ids.len())
            .x_label_formatter(&x_label)
            .y_label_formatter(&y_label)
            .x_desc("Wasp")
            .y_desc("Wasp")
            .label_style(("sans-serif", 12))
            .draw()
            .context("Failed to draw heatmap axes")?;

        chart
            .draw_series((0..ids.len()).flat_map(|i| {
                matrix.row(i).iter().enumerate().map(move |(j, &count)| {
                    let x = j as i32;
                    let y = n - 1 - i as i32;
                    Rectangle::new(
                        [
                            (SegmentValue::Exact(x), SegmentValue::Exact(y)),
                            (SegmentValue::Exact(x + 1), SegmentValue::Exact(y + 1)),
                        ],
                        shade(count, max).filled(),
                    )
                })
            }))
            .context("Failed to draw heatmap cells")?;

        root.present().context("Failed to finish heatmap")?;
    }

    Ok(svg)
}

/// Hoverable table of exact counts.
fn render_grid(matrix: &InteractionMatrix) -> String {
    let max = matrix.max_count();
    let mut grid = String::new();

    grid.push_str("<table class=\"grid\">\n<tr><th></th>");
    for id in matrix.ids() {
        grid.push_str(&format!("<th>{}</th>", escape_html(id)));
    }
    grid.push_str("</tr>\n");

    for (i, row_id) in matrix.ids().iter().enumerate() {
        let row_label = escape_html(row_id);
        grid.push_str(&format!("<tr><th>{}</th>", row_label));

        for (j, &count) in matrix.row(i).iter().enumerate() {
            let col_label = escape_html(&matrix.ids()[j]);
            let colour = shade(count, max);
            let text = if is_dark(count, max) { "#fff" } else { "#000" };
            grid.push_str(&format!(
                "<td title=\"{} &times; {}: {}\" style=\"background:rgb({},{},{});color:{}\">{}</td>",
                row_label, col_label, count, colour.0, colour.1, colour.2, text, count
            ));
        }
        grid.push_str("</tr>\n");
    }

    grid.push_str("</table>\n");
    grid
}

/// Linear blend from [`LOW`] to [`HIGH`].
fn shade(count: u32, max: u32) -> RGBColor {
    let t = if max == 0 {
        0.0
    } else {
        f64::from(count) / f64::from(max)
    };
    let mix = |lo: u8, hi: u8| (f64::from(lo) + (f64::from(hi) - f64::from(lo)) * t).round() as u8;
    RGBColor(mix(LOW.0, HIGH.0), mix(LOW.1, HIGH.1), mix(LOW.2, HIGH.2))
}

fn is_dark(count: u32, max: u32) -> bool {
    max > 0 && f64::from(count) / f64::from(max) > 0.5
}

/// Room for the longest wasp id along each axis.
fn label_area_size(ids: &[String]) -> u32 {
    let longest = ids.iter().map(|id| id.chars().count()).max().unwrap_or(0) as u32;
    (longest * 8 + 30).clamp(40, 160)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 2em; color: #222; }
figure { margin: 0 0 2em 0; }
table.grid { border-collapse: collapse; font-size: 12px; }
table.grid th { padding: 2px 6px; font-weight: normal; text-align: right; }
table.grid td { min-width: 2em; padding: 2px 4px; text-align: center; cursor: default; }
table.grid td:hover { outline: 2px solid #e6550d; position: relative; }
</style>
";

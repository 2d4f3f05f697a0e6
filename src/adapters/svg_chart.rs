//! SVG chart of Close, Bollinger Bands and buy/sell markers.
//!
//! Layout: black Close line, green upper band, red lower band, the space
//! between the bands filled pale yellow, green up-triangles at buys and red
//! down-triangles at sells, with a title and legend.

use std::fs;
use std::path::PathBuf;

use crate::domain::error::BandsigError;
use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::SignalRow;
use crate::ports::chart_port::ChartPort;

const CHART_WIDTH: f64 = 1200.0;
const CHART_HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 40.0;
const MARKER_SIZE: f64 = 7.0;

pub struct SvgChartAdapter {
    output: PathBuf,
}

impl SvgChartAdapter {
    pub fn new(output: PathBuf) -> Self {
        Self { output }
    }
}

impl ChartPort for SvgChartAdapter {
    fn render(
        &self,
        frame: &IndicatorFrame,
        signals: &[SignalRow],
        title: &str,
    ) -> Result<(), BandsigError> {
        let svg = generate_signal_svg(frame, signals, title);
        fs::write(&self.output, svg).map_err(|e| BandsigError::Chart {
            reason: format!("failed to write {}: {}", self.output.display(), e),
        })?;
        tracing::info!(path = %self.output.display(), "chart written");
        Ok(())
    }
}

struct Scale {
    min: f64,
    range: f64,
    count: usize,
}

impl Scale {
    fn x(&self, i: usize) -> f64 {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        MARGIN_LEFT + (i as f64 / (self.count - 1).max(1) as f64) * plot_width
    }

    fn y(&self, v: f64) -> f64 {
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        MARGIN_TOP + plot_height - ((v - self.min) / self.range) * plot_height
    }
}

/// Path through the defined points; a `None` breaks the line.
fn line_path(values: &[Option<f64>], scale: &Scale) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(v) => {
                let cmd = if pen_down { " L" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, scale.x(i), scale.y(*v)));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path.trim_start().to_string()
}

fn band_fill_points(frame: &IndicatorFrame, scale: &Scale) -> String {
    let upper: Vec<(usize, f64)> = frame
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.upper_band.map(|v| (i, v)))
        .collect();
    let lower: Vec<(usize, f64)> = frame
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.lower_band.map(|v| (i, v)))
        .collect();

    upper
        .iter()
        .chain(lower.iter().rev())
        .map(|&(i, v)| format!("{:.1},{:.1}", scale.x(i), scale.y(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn triangle(x: f64, y: f64, pointing_up: bool) -> String {
    let (tip, base) = if pointing_up {
        (y - MARKER_SIZE, y + MARKER_SIZE)
    } else {
        (y + MARKER_SIZE, y - MARKER_SIZE)
    };
    format!(
        "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
        x,
        tip,
        x - MARKER_SIZE,
        base,
        x + MARKER_SIZE,
        base
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn generate_signal_svg(frame: &IndicatorFrame, signals: &[SignalRow], title: &str) -> String {
    if frame.is_empty() {
        return String::new();
    }

    let all_values = frame.rows.iter().flat_map(|r| {
        [Some(r.close), r.upper_band, r.lower_band]
            .into_iter()
            .flatten()
    });
    let (min, max) = all_values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let scale = Scale {
        min,
        range: (max - min).max(f64::EPSILON),
        count: frame.len(),
    };

    let closes: Vec<Option<f64>> = frame.rows.iter().map(|r| Some(r.close)).collect();
    let uppers: Vec<Option<f64>> = frame.rows.iter().map(|r| r.upper_band).collect();
    let lowers: Vec<Option<f64>> = frame.rows.iter().map(|r| r.lower_band).collect();

    let start_date = frame.rows[0].date;
    let end_date = frame.rows[frame.len() - 1].date;
    let mid_date = frame.rows[frame.len() / 2].date;
    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"25\" text-anchor=\"middle\" font-size=\"18\">{}</text>\n",
        CHART_WIDTH / 2.0,
        escape_xml(title)
    ));
    svg.push_str(&format!(
        "  <text x=\"15\" y=\"{}\" font-size=\"12\" fill=\"#666\" transform=\"rotate(-90 15 {})\">Price</text>\n",
        CHART_HEIGHT / 2.0,
        CHART_HEIGHT / 2.0
    ));

    // axes and labels
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    for v in [max, (max + min) / 2.0, min] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            scale.y(v) + 3.0,
            v
        ));
    }
    for (x, date) in [
        (MARGIN_LEFT, start_date),
        (MARGIN_LEFT + plot_width / 2.0, mid_date),
        (CHART_WIDTH - MARGIN_RIGHT, end_date),
    ] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
            x,
            CHART_HEIGHT - 15.0,
            date
        ));
    }

    let fill = band_fill_points(frame, &scale);
    if !fill.is_empty() {
        svg.push_str(&format!(
            "  <polygon points=\"{}\" fill=\"yellow\" fill-opacity=\"0.1\" stroke=\"none\"/>\n",
            fill
        ));
    }
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"green\" stroke-opacity=\"0.25\" stroke-width=\"1\"/>\n",
        line_path(&uppers, &scale)
    ));
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"red\" stroke-opacity=\"0.25\" stroke-width=\"1\"/>\n",
        line_path(&lowers, &scale)
    ));
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"black\" stroke-width=\"1.5\"/>\n",
        line_path(&closes, &scale)
    ));

    for (i, s) in signals.iter().enumerate().take(frame.len()) {
        if let Some(price) = s.buy {
            svg.push_str(&format!(
                "  <polygon class=\"buy\" points=\"{}\" fill=\"green\"/>\n",
                triangle(scale.x(i), scale.y(price), true)
            ));
        }
        if let Some(price) = s.sell {
            svg.push_str(&format!(
                "  <polygon class=\"sell\" points=\"{}\" fill=\"red\"/>\n",
                triangle(scale.x(i), scale.y(price), false)
            ));
        }
    }

    // legend
    let legend = [
        ("Close Price", "black"),
        ("Upper Band", "green"),
        ("Lower Band", "red"),
        ("Buy", "green"),
        ("Sell", "red"),
    ];
    for (n, (label, color)) in legend.iter().enumerate() {
        let y = MARGIN_TOP + 10.0 + n as f64 * 16.0;
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"10\" height=\"10\" fill=\"{}\"/>\n",
            MARGIN_LEFT + 10.0,
            y - 9.0,
            color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"11\">{}</text>\n",
            MARGIN_LEFT + 25.0,
            y,
            label
        ));
    }

    svg.push_str("</svg>");
    svg
}

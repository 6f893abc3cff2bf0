//! Chart persistence as a standalone SVG image.

use std::path::{Path, PathBuf};

use tasklog_core::error::{Result, TaskLogError};
use tasklog_core::formatting::{date_label, format_hours};
use tasklog_core::models::SleepSeries;
use tasklog_core::render::ChartRenderer;
use tracing::info;

use crate::chart;

const DAILY_COLOR: &str = "#1f77b4";
const SHORT_COLOR: &str = "#ff7f0e";
const LONG_COLOR: &str = "#2ca02c";
const GRID_COLOR: &str = "#b0b0b0";
const TEXT_COLOR: &str = "#222222";

/// Canvas size and margins, in SVG user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgOptions {
    pub width: f64,
    pub height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    pub margin_top: f64,
    /// Room for the rotated date labels and the axis title.
    pub margin_bottom: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            margin_left: 70.0,
            margin_right: 30.0,
            margin_top: 50.0,
            margin_bottom: 150.0,
        }
    }
}

/// Maps chart coordinates (days, hours) onto the canvas.
struct Plot {
    opts: SvgOptions,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl Plot {
    fn inner_width(&self) -> f64 {
        self.opts.width - self.opts.margin_left - self.opts.margin_right
    }

    fn inner_height(&self) -> f64 {
        self.opts.height - self.opts.margin_top - self.opts.margin_bottom
    }

    fn x(&self, days: f64) -> f64 {
        let [lo, hi] = self.x_bounds;
        // Keep points off the axes.
        let pad = self.inner_width() * 0.04;
        self.opts.margin_left + pad + (days - lo) / (hi - lo) * (self.inner_width() - 2.0 * pad)
    }

    fn y(&self, hours: f64) -> f64 {
        let [lo, hi] = self.y_bounds;
        self.opts.margin_top + (hi - hours) / (hi - lo) * self.inner_height()
    }

    fn bottom(&self) -> f64 {
        self.opts.margin_top + self.inner_height()
    }

    fn right(&self) -> f64 {
        self.opts.margin_left + self.inner_width()
    }
}

/// Render `series` as an SVG document.
pub fn render_svg(series: &SleepSeries, opts: SvgOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
        w = opts.width,
        h = opts.height
    ));
    out.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        opts.width, opts.height
    ));
    out.push_str(&text(
        opts.width / 2.0,
        opts.margin_top / 2.0 + 6.0,
        chart::CHART_TITLE,
        "middle",
        16,
    ));

    if series.is_empty() {
        out.push_str(&text(
            opts.width / 2.0,
            opts.height / 2.0,
            "No data",
            "middle",
            14,
        ));
        out.push_str("</svg>\n");
        return out;
    }

    let plot = Plot {
        opts,
        x_bounds: chart::x_bounds(series),
        y_bounds: chart::y_bounds(series),
    };

    render_axes(&mut out, &plot, series);

    let daily = chart::daily_points(series);
    let short = chart::average_points(series, |p| p.short_average);
    let long = chart::average_points(series, |p| p.long_average);

    out.push_str(&polyline(&plot, &daily, DAILY_COLOR, None));
    out.push_str(&polyline(&plot, &short, SHORT_COLOR, Some("6,4")));
    out.push_str(&polyline(&plot, &long, LONG_COLOR, Some("6,4")));

    // Markers and value labels just above each daily point.
    for (x, hours) in &daily {
        out.push_str(&format!(
            "<circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"4\" fill=\"{}\"/>\n",
            plot.x(*x),
            plot.y(*hours),
            DAILY_COLOR
        ));
        out.push_str(&text(
            plot.x(*x),
            plot.y(hours + 0.1) - 6.0,
            &format_hours(*hours),
            "middle",
            10,
        ));
    }

    render_legend(&mut out, &plot);
    out.push_str("</svg>\n");
    out
}

fn render_axes(out: &mut String, plot: &Plot, series: &SleepSeries) {
    let left = plot.opts.margin_left;
    let right = plot.right();
    let top = plot.opts.margin_top;
    let bottom = plot.bottom();

    // Hourly horizontal grid with tick labels.
    for tick in chart::y_ticks(plot.y_bounds) {
        let y = plot.y(tick as f64);
        out.push_str(&format!(
            "<line x1=\"{left:.1}\" y1=\"{y:.1}\" x2=\"{right:.1}\" y2=\"{y:.1}\" stroke=\"{GRID_COLOR}\" stroke-width=\"0.5\" stroke-dasharray=\"4,3\"/>\n"
        ));
        out.push_str(&text(left - 8.0, y + 4.0, &tick.to_string(), "end", 11));
    }

    out.push_str(&format!(
        "<rect x=\"{left:.1}\" y=\"{top:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"{TEXT_COLOR}\"/>\n",
        plot.inner_width(),
        plot.inner_height()
    ));

    // One rotated label per day present in the series.
    if let Some(first) = series.points.first() {
        for point in &series.points {
            let x = plot.x(chart::day_offset(first.date, point.date));
            out.push_str(&format!(
                "<line x1=\"{x:.1}\" y1=\"{bottom:.1}\" x2=\"{x:.1}\" y2=\"{:.1}\" stroke=\"{TEXT_COLOR}\"/>\n",
                bottom + 5.0
            ));
            out.push_str(&format!(
                "<text x=\"{x:.1}\" y=\"{:.1}\" font-size=\"11\" fill=\"{TEXT_COLOR}\" text-anchor=\"end\" transform=\"rotate(-45 {x:.1} {:.1})\">{}</text>\n",
                bottom + 16.0,
                bottom + 16.0,
                escape(&date_label(point.date))
            ));
        }
    }

    out.push_str(&text(
        left + plot.inner_width() / 2.0,
        plot.opts.height - 12.0,
        chart::X_AXIS_TITLE,
        "middle",
        13,
    ));
    let y_mid = top + plot.inner_height() / 2.0;
    out.push_str(&format!(
        "<text x=\"20\" y=\"{y_mid:.1}\" font-size=\"13\" fill=\"{TEXT_COLOR}\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y_mid:.1})\">{}</text>\n",
        escape(chart::Y_AXIS_TITLE)
    ));
}

fn render_legend(out: &mut String, plot: &Plot) {
    let entries = [
        (chart::DAILY_LABEL.to_string(), DAILY_COLOR, None),
        (chart::short_average_label(), SHORT_COLOR, Some("6,4")),
        (chart::long_average_label(), LONG_COLOR, Some("6,4")),
    ];
    let x = plot.right() - 200.0;
    let mut y = plot.opts.margin_top + 12.0;

    out.push_str(&format!(
        "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"190\" height=\"{}\" fill=\"white\" fill-opacity=\"0.8\" stroke=\"{GRID_COLOR}\"/>\n",
        x - 6.0,
        y - 8.0,
        entries.len() * 18 + 4
    ));
    for (label, color, dash) in entries {
        let dash_attr = dash
            .map(|d| format!(" stroke-dasharray=\"{}\"", d))
            .unwrap_or_default();
        out.push_str(&format!(
            "<line x1=\"{x:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{color}\" stroke-width=\"2\"{dash_attr}/>\n",
            x + 24.0
        ));
        out.push_str(&text(x + 30.0, y + 4.0, &label, "start", 11));
        y += 18.0;
    }
}

fn polyline(plot: &Plot, points: &[(f64, f64)], color: &str, dash: Option<&str>) -> String {
    if points.is_empty() {
        return String::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", plot.x(*x), plot.y(*y)))
        .collect();
    let dash_attr = dash
        .map(|d| format!(" stroke-dasharray=\"{}\"", d))
        .unwrap_or_default();
    format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"{}/>\n",
        coords.join(" "),
        color,
        dash_attr
    )
}

fn text(x: f64, y: f64, content: &str, anchor: &str, size: u32) -> String {
    format!(
        "<text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"{size}\" fill=\"{TEXT_COLOR}\" text-anchor=\"{anchor}\">{}</text>\n",
        escape(content)
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ── SvgChartRenderer ──────────────────────────────────────────────────────────

/// Writes the chart to an SVG file.
pub struct SvgChartRenderer {
    path: PathBuf,
    options: SvgOptions,
}

impl SvgChartRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: SvgOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SvgOptions) -> Self {
        self.options = options;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&mut self, series: &SleepSeries) -> Result<()> {
        let write_err = |source| TaskLogError::FileWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, render_svg(series, self.options)).map_err(write_err)?;

        info!("Chart saved to {}", self.path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

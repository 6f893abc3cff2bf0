//! Interactive chart display in the terminal.
//!
//! Draws the series with a ratatui [`Chart`] on the alternate screen and
//! waits for `q`, `Esc` or `Ctrl+C`.

use std::io;
use std::time::Duration;

use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame, Terminal,
};
use tasklog_core::error::{Result, TaskLogError};
use tasklog_core::formatting::{date_label, format_hours, format_optional_hours, short_date_label};
use tasklog_core::models::SleepSeries;
use tasklog_core::render::ChartRenderer;
use tracing::debug;

use crate::chart;
use crate::themes::Theme;

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render the sleep chart plus a one-line summary of the latest day into
/// `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, series: &SleepSeries, theme: &Theme) {
    let [chart_area, footer_area] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);

    let daily = chart::daily_points(series);
    let short = chart::average_points(series, |p| p.short_average);
    let long = chart::average_points(series, |p| p.long_average);

    let datasets = vec![
        Dataset::default()
            .name(chart::DAILY_LABEL)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.daily)
            .data(&daily),
        Dataset::default()
            .name(chart::short_average_label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.short_average)
            .data(&short),
        Dataset::default()
            .name(chart::long_average_label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.long_average)
            .data(&long),
    ];

    let x_bounds = chart::x_bounds(series);
    let y_bounds = chart::y_bounds(series);

    let chart_widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Span::styled(format!(" {} ", chart::CHART_TITLE), theme.title)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(chart::X_AXIS_TITLE, theme.axis))
                .style(theme.axis)
                .bounds(x_bounds)
                .labels(x_labels(series)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(chart::Y_AXIS_TITLE, theme.axis))
                .style(theme.axis)
                .bounds(y_bounds)
                .labels(y_labels(y_bounds)),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Percentage(60), Constraint::Percentage(60)));

    frame.render_widget(chart_widget, chart_area);
    frame.render_widget(
        Paragraph::new(footer_line(series, theme)).alignment(Alignment::Left),
        footer_area,
    );
}

/// Placeholder shown when no monitored task falls in the selected range.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("No sleep data to chart", theme.label)),
        Line::from(Span::styled(
            "Check the date range and task names, then run again.",
            theme.dim,
        )),
        Line::from(""),
        Line::from(Span::styled("Press q to quit", theme.dim)),
    ];
    let widget = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border)
            .title(Span::styled(format!(" {} ", chart::CHART_TITLE), theme.title)),
    );
    frame.render_widget(widget, area);
}

/// First, middle and last dates; the middle one is dropped for short series.
fn x_labels(series: &SleepSeries) -> Vec<String> {
    let points = &series.points;
    match points.len() {
        0 => Vec::new(),
        1 => vec![String::new(), date_label(points[0].date), String::new()],
        2 => vec![
            short_date_label(points[0].date),
            short_date_label(points[1].date),
        ],
        n => vec![
            short_date_label(points[0].date),
            short_date_label(points[n / 2].date),
            short_date_label(points[n - 1].date),
        ],
    }
}

fn y_labels(bounds: [f64; 2]) -> Vec<String> {
    let mid = ((bounds[0] + bounds[1]) / 2.0).round();
    vec![
        format!("{}", bounds[0] as i64),
        format!("{}", mid as i64),
        format!("{}", bounds[1] as i64),
    ]
}

fn footer_line<'a>(series: &SleepSeries, theme: &Theme) -> Line<'a> {
    let Some(last) = series.points.last() else {
        return Line::from(Span::styled(" q: quit", theme.dim));
    };
    Line::from(vec![
        Span::styled(format!(" {} ", date_label(last.date)), theme.label),
        Span::styled(format!("{}h", format_hours(last.hours)), theme.daily),
        Span::styled("  3-day ", theme.dim),
        Span::styled(format_optional_hours(last.short_average), theme.short_average),
        Span::styled("  7-day ", theme.dim),
        Span::styled(format_optional_hours(last.long_average), theme.long_average),
        Span::styled(format!("  ({} days)  q: quit", series.len()), theme.dim),
    ])
}

// ── TerminalChartRenderer ─────────────────────────────────────────────────────

/// Shows the chart on the alternate screen until the user quits.
pub struct TerminalChartRenderer {
    theme: Theme,
}

impl TerminalChartRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn run(&self, series: &SleepSeries) -> io::Result<()> {
        enable_raw_mode()?;
        let result = self.event_loop(series);

        // Every restore step runs even when the loop or an earlier step failed.
        let leave_screen = || {
            let mut stdout = io::stdout();
            execute!(stdout, LeaveAlternateScreen, Show)
        };
        let steps: [&dyn Fn() -> io::Result<()>; 2] = [&disable_raw_mode, &leave_screen];
        let restored = run_all_steps(&steps);

        result.and(restored)
    }

    fn event_loop(&self, series: &SleepSeries) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let tick_rate = Duration::from_millis(250);

        loop {
            terminal.draw(|frame| {
                let area = frame.area();
                if series.is_empty() {
                    render_no_data(frame, area, &self.theme);
                } else {
                    render_chart(frame, area, series, &self.theme);
                }
            })?;

            if !event::poll(tick_rate)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                    _ => {}
                }
            }
        }
    }
}

/// Run every step in order and return the first error, if any.
fn run_all_steps(steps: &[&dyn Fn() -> io::Result<()>]) -> io::Result<()> {
    steps.iter().fold(Ok(()), |acc, step| {
        let outcome = step();
        acc.and(outcome)
    })
}

impl ChartRenderer for TerminalChartRenderer {
    fn render(&mut self, series: &SleepSeries) -> Result<()> {
        debug!("Showing {} days in the terminal", series.len());
        self.run(series)
            .map_err(|e| TaskLogError::Terminal(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

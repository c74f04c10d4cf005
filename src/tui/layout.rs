//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, Paragraph};

use super::runtime::App;
use super::style;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(3), // SoC gauge
            Constraint::Length(6), // routing panel
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);
    render_soc_gauge(frame, app, chunks[2]);
    render_routing(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, label) = if app.error.is_some() {
        ("✖", "HALTED")
    } else if app.is_finished() {
        ("■", "DONE")
    } else if app.paused {
        ("‖", "PAUSED")
    } else {
        ("▶", "RUNNING")
    };

    let header = Line::from(vec![
        Span::styled(
            " EPS-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            &app.preset_name,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={}/{} │ {}ms │ {icon} {label} ",
            app.timestep,
            app.total_steps,
            app.tick_interval_ms(),
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Simulated and closed-form SoC points (minutes, percent) for the chart.
///
/// Includes the initial condition at t = 0 until the rolling window drops
/// step 0.
fn soc_series(app: &App) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let starts_at_zero = app.history.front().is_none_or(|s| s.timestep == 0);
    let origin = starts_at_zero.then_some(0.0);

    let soc_data: Vec<(f64, f64)> = origin
        .map(|t| (t, app.scenario().battery.initial_soc * 100.0))
        .into_iter()
        .chain(
            app.history
                .iter()
                .map(|s| (s.time_h * 60.0, s.battery.state_of_charge * 100.0)),
        )
        .collect();
    let analytical_data: Vec<(f64, f64)> = origin
        .into_iter()
        .chain(app.history.iter().map(|s| s.time_h))
        .map(|t_h| (t_h * 60.0, app.analytical_soc(t_h) * 100.0))
        .collect();

    (soc_data, analytical_data)
}

/// State of charge against time, with the closed-form curve and SoC ceiling.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let (soc_data, analytical_data) = soc_series(app);

    let x_lo = soc_data.first().map_or(0.0, |p| p.0);
    let x_hi = soc_data.last().map_or(1.0, |p| p.0).max(x_lo + 1.0);
    let ceiling = app.scenario().battery.soc_upper_limit * 100.0;
    let ceiling_data = [(x_lo, ceiling), (x_hi, ceiling)];

    let y_bounds = style::auto_bounds_y(&[
        soc_data.as_slice(),
        analytical_data.as_slice(),
        ceiling_data.as_slice(),
    ]);

    let datasets = vec![
        Dataset::default()
            .name("Simulated")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(style::SOC_COLOR))
            .data(&soc_data),
        Dataset::default()
            .name("Analytical")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::ANALYTICAL_COLOR))
            .data(&analytical_data),
        Dataset::default()
            .name("Ceiling")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(style::CEILING_COLOR))
            .data(&ceiling_data),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Battery State of Charge ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("min")
                .bounds([x_lo, x_hi])
                .labels(vec![format!("{x_lo:.1}"), format!("{x_hi:.1}")]),
        )
        .y_axis(
            Axis::default()
                .title("SoC %")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.1}", y_bounds[0]),
                    format!("{:.1}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

fn render_soc_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let soc = app.battery_soc();
    let shunting = app.last_sample().is_some_and(|s| s.allocation.shunt_w > 0.0);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(16)])
        .split(area);

    let gauge = Gauge::default()
        .block(Block::default().title(" SoC ").borders(Borders::ALL))
        .gauge_style(Style::default().fg(style::soc_color(soc)))
        .ratio(soc.clamp(0.0, 1.0))
        .label(format!("{:.2}%", soc * 100.0));
    frame.render_widget(gauge, chunks[0]);

    let (text, color) = if shunting {
        ("SHUNT: ACTIVE", style::SHUNT_ACTIVE)
    } else {
        ("", style::FOOTER_FG)
    };
    let indicator = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(indicator, chunks[1]);
}

/// Budget figures and the latest routing decision.
fn render_routing(frame: &mut Frame, app: &App, area: Rect) {
    let b = app.budget();
    let mut lines = vec![Line::from(format!(
        "  load(EOL)={:>7.2} W  margin={:>7.2} W  solar={:>7.2} W  surplus={:>7.2} W",
        b.eol_total_w, b.margin_eol_w, b.solar_generation_w, b.excess_power_w,
    ))];
    if let Some(s) = app.last_sample() {
        let a = &s.allocation;
        lines.push(Line::from(format!(
            "  battery={:>7.2} W  payload={:>5.2} W  supercap={:>5.2} W  shunt={:>7.2} W",
            a.battery_w, a.payload_w, a.supercapacitor_w, a.shunt_w,
        )));
        lines.push(Line::from(format!(
            "  stored={:>7.2} W  E={:>7.3}/{:.1} Wh  t={:.2} min",
            s.charge_w,
            s.battery.energy_wh,
            s.battery.capacity_wh,
            s.time_h * 60.0,
        )));
    } else {
        lines.push(Line::from("  Waiting for first step..."));
    }
    if let Some(err) = &app.error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(style::ERROR_FG),
        )));
    }

    let block = Block::default().title(" Routing ").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Pause  +/-:Speed  1-4:Preset  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

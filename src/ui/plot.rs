use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{ColorMap, viridis_in_range};
use crate::data::aggregate::StateCount;
use crate::data::model::RtoRecord;

const MISSING_STATE: &str = "(missing)";

// ---------------------------------------------------------------------------
// Location scatter (longitude × latitude)
// ---------------------------------------------------------------------------

/// Scatter of RTO head offices, one series per state.
///
/// Hovering shows the legal name, state and status of the nearest RTO in the
/// hovered series.
pub fn location_map(ui: &mut Ui, rows: &[&RtoRecord], colors: &ColorMap) {
    // Series in first-encountered state order.
    let mut series: Vec<(Option<&str>, Vec<&RtoRecord>)> = Vec::new();
    for &rec in rows {
        let state = rec.head_office_state.as_deref();
        match series.iter_mut().find(|(s, _)| *s == state) {
            Some((_, members)) => members.push(rec),
            None => series.push((state, vec![rec])),
        }
    }

    let hover_rows = rows;
    Plot::new("rto_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.0)
        .height(500.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .label_formatter(move |name, value| hover_text(hover_rows, name, value))
        .show(ui, |plot_ui| {
            for (state, members) in &series {
                let points: PlotPoints = members
                    .iter()
                    .filter_map(|r| r.coordinates())
                    .map(|(lat, lon)| [lon, lat])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(state.unwrap_or(MISSING_STATE))
                        .color(colors.color_for(*state))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(3.5),
                );
            }
        });
}

/// Hover label for the RTO of series `name` closest to `value`.
fn hover_text(rows: &[&RtoRecord], name: &str, value: &PlotPoint) -> String {
    if name.is_empty() {
        return format!("lon {:.3}, lat {:.3}", value.x, value.y);
    }
    let nearest = rows
        .iter()
        .filter(|r| r.head_office_state.as_deref().unwrap_or(MISSING_STATE) == name)
        .filter_map(|r| {
            let (lat, lon) = r.coordinates()?;
            let d = (lon - value.x).powi(2) + (lat - value.y).powi(2);
            Some((d, *r))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    match nearest {
        Some((_, rec)) => format!(
            "{}\nState: {}\nStatus: {}",
            rec.legal_name,
            rec.head_office_state.as_deref().unwrap_or(MISSING_STATE),
            rec.status.as_deref().unwrap_or(""),
        ),
        None => name.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Counts by state
// ---------------------------------------------------------------------------

/// Bar per state, coloured on the Viridis scale by count.
pub fn state_bar_chart(ui: &mut Ui, counts: &[StateCount]) {
    let min = counts.iter().map(|c| c.count).min().unwrap_or(0) as f64;
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0) as f64;

    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let n = c.count as f64;
            Bar::new(i as f64, n)
                .name(c.state.to_string())
                .fill(viridis_in_range(n, min, max))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = counts.iter().map(|c| c.state.to_string()).collect();

    Plot::new("state_counts")
        .x_axis_label("State")
        .y_axis_label("Number of RTOs")
        .height(320.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() > f64::EPSILON || i < 0.0 {
                return String::new();
            }
            labels.get(i as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .element_formatter(Box::new(|bar: &Bar, _chart: &BarChart| {
                        format!("{}: {}", bar.name, bar.value)
                    })),
            );
        });
}

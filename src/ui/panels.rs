use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Region;
use crate::data::view::DashboardView;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    // Hold our own handle so the option lists survive mutation of `state`.
    let dataset = Arc::clone(&state.dataset);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let any_selected = !state.selection.is_empty();
            if ui
                .add_enabled(any_selected, egui::Button::new("Clear all filters"))
                .clicked()
            {
                state.clear_filters();
            }
            ui.separator();

            let n_selected = state.selection.states.len();
            facet_header(ui, "Select States", n_selected, dataset.states().len(), |ui| {
                if ui.small_button("Clear").clicked() {
                    state.selection.states.clear();
                }
                for value in dataset.states() {
                    let mut checked = state.selection.states.contains(value);
                    let text = RichText::new(value).color(state.state_colors.color_for(Some(value)));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_state(value);
                    }
                }
            });

            let n_selected = state.selection.statuses.len();
            facet_header(ui, "Select Status", n_selected, dataset.statuses().len(), |ui| {
                if ui.small_button("Clear").clicked() {
                    state.selection.statuses.clear();
                }
                for value in dataset.statuses() {
                    let mut checked = state.selection.statuses.contains(value);
                    if ui.checkbox(&mut checked, value.as_str()).changed() {
                        state.toggle_status(value);
                    }
                }
            });

            let n_selected = state.selection.approval_regions.len();
            facet_header(ui, "Delivery Approval", n_selected, Region::ALL.len(), |ui| {
                if ui.small_button("Clear").clicked() {
                    state.selection.approval_regions.clear();
                }
                for region in Region::ALL {
                    let mut checked = state.selection.approval_regions.contains(&region);
                    if ui.checkbox(&mut checked, region.column_name()).changed() {
                        state.toggle_region(region);
                    }
                }
            });
        });
}

/// Collapsible facet with a "selected/total" count; nothing selected means
/// no restriction.
fn facet_header(
    ui: &mut Ui,
    title: &str,
    n_selected: usize,
    n_total: usize,
    add_contents: impl FnOnce(&mut Ui),
) {
    let header_text = if n_selected == 0 {
        format!("{title}  (all)")
    } else {
        format!("{title}  ({n_selected}/{n_total})")
    };
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, add_contents);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let source = state
            .dataset
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        ui.label(format!("{} RTOs loaded from {source}", state.dataset.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel – the dashboard page
// ---------------------------------------------------------------------------

/// Render every view for the current selection, top to bottom.
pub fn dashboard(ui: &mut Ui, state: &AppState, view: &DashboardView<'_>) {
    ui.heading(RichText::new("RTO Dashboard").size(28.0));
    ui.label("Explore information about Registered Training Organisations (RTOs) in Australia.");
    ui.add_space(8.0);

    if state.dataset.is_empty() {
        ui.label("The loaded file has no RTO rows.");
        return;
    }

    ui.heading("Filtered Data");
    ui.label(format!(
        "Displaying {} RTOs based on filters",
        view.filtered.len()
    ));
    tables::data_table(ui, &state.dataset, &view.filtered);
    ui.add_space(12.0);

    ui.heading("Visualizations");

    if let Some(geo) = &view.geo {
        ui.strong("RTOs by Location");
        plot::location_map(ui, geo, &state.state_colors);
        ui.add_space(12.0);
    }

    if let Some(counts) = &view.state_counts {
        ui.strong("Count of RTOs by State");
        plot::state_bar_chart(ui, counts);
        ui.add_space(12.0);
    }

    if let Some(contacts) = &view.contacts {
        ui.heading("CEO Contact Information");
        ui.label("Use this table to find key contact information for RTOs.");
        tables::contact_table(ui, contacts);
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open RTO data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

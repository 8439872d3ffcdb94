use std::sync::Arc;

use eframe::egui::{self, ScrollArea};

use crate::data::model::RtoDataset;
use crate::data::view::DashboardView;
use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RtoDashboardApp {
    pub state: AppState,
}

impl RtoDashboardApp {
    pub fn new(dataset: Arc<RtoDataset>) -> Self {
        Self {
            state: AppState::new(dataset),
        }
    }
}

impl eframe::App for RtoDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: views rebuilt from the current selection ----
        let dataset = Arc::clone(&self.state.dataset);
        let view = DashboardView::build(&dataset, &self.state.selection);
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| panels::dashboard(ui, &self.state, &view));
        });
    }
}

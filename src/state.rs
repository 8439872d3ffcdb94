use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::cache::load_cached;
use crate::data::filter::FilterSelection;
use crate::data::model::{Region, RtoDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Shared, immutable dataset from the cache.
    pub dataset: Arc<RtoDataset>,

    /// Current sidebar selections.
    pub selection: FilterSelection,

    /// Colour per head-office state, used by the map.
    pub state_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<RtoDataset>) -> Self {
        let state_colors = ColorMap::new(dataset.states());
        Self {
            dataset,
            selection: FilterSelection::default(),
            state_colors,
            status_message: None,
        }
    }

    /// Switch to a newly loaded dataset and start from an empty selection.
    pub fn set_dataset(&mut self, dataset: Arc<RtoDataset>) {
        self.state_colors = ColorMap::new(dataset.states());
        self.dataset = dataset;
        self.selection = FilterSelection::default();
        self.status_message = None;
    }

    /// Load `path` through the cache; on failure keep the current dataset and
    /// report the error.
    pub fn open(&mut self, path: &Path) {
        match load_cached(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn toggle_state(&mut self, value: &str) {
        FilterSelection::toggle(&mut self.selection.states, value);
    }

    pub fn toggle_status(&mut self, value: &str) {
        FilterSelection::toggle(&mut self.selection.statuses, value);
    }

    pub fn toggle_region(&mut self, region: Region) {
        if !self.selection.approval_regions.remove(&region) {
            self.selection.approval_regions.insert(region);
        }
    }

    /// Drop every selection.
    pub fn clear_filters(&mut self) {
        self.selection = FilterSelection::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv;

    fn state() -> AppState {
        let csv = "Legal Name,Head Office Location State,Status\nA,NSW,Registered\nB,VIC,Suspended\n";
        AppState::new(Arc::new(load_csv(csv.as_bytes()).unwrap()))
    }

    #[test]
    fn toggles_build_the_selection() {
        let mut st = state();
        st.toggle_state("NSW");
        st.toggle_status("Registered");
        st.toggle_region(Region::Act);
        assert!(st.selection.states.contains("NSW"));
        assert!(st.selection.statuses.contains("Registered"));
        assert!(st.selection.approval_regions.contains(&Region::Act));

        st.toggle_region(Region::Act);
        assert!(st.selection.approval_regions.is_empty());

        st.clear_filters();
        assert!(st.selection.is_empty());
    }

    #[test]
    fn failed_open_keeps_the_dataset() {
        let mut st = state();
        let before = Arc::clone(&st.dataset);
        st.toggle_state("VIC");
        st.open(Path::new("/definitely/not/here.csv"));
        assert!(Arc::ptr_eq(&before, &st.dataset));
        assert!(st.status_message.is_some());
        assert!(st.selection.states.contains("VIC"));
    }
}

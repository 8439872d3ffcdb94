use super::aggregate::{ContactRow, StateCount, contact_projection, count_by_state, geo_subset};
use super::filter::{FilterSelection, apply_filters};
use super::model::{Column, RtoDataset, RtoRecord};

// ---------------------------------------------------------------------------
// DashboardView – everything the UI renders for one selection
// ---------------------------------------------------------------------------

/// Views derived from a dataset and a selection.
///
/// A view is `None` when the dataset lacks the columns it needs; the other
/// views are still built.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub filtered: Vec<&'a RtoRecord>,
    pub geo: Option<Vec<&'a RtoRecord>>,
    pub state_counts: Option<Vec<StateCount>>,
    pub contacts: Option<Vec<ContactRow<'a>>>,
}

impl<'a> DashboardView<'a> {
    /// Run the filter → aggregate pipeline.
    pub fn build(dataset: &'a RtoDataset, selection: &FilterSelection) -> Self {
        let filtered = apply_filters(&dataset.records, selection);
        let schema = &dataset.schema;

        let geo = schema.has_coordinates().then(|| geo_subset(&filtered));
        let state_counts = schema
            .has(Column::HeadOfficeState)
            .then(|| count_by_state(&filtered));
        let contacts = schema
            .has_any_contact()
            .then(|| contact_projection(&filtered));

        log::debug!(
            "view: {} of {} rows, {:?} plottable, {:?} state groups",
            filtered.len(),
            dataset.len(),
            geo.as_ref().map(Vec::len),
            state_counts.as_ref().map(Vec::len),
        );

        DashboardView {
            filtered,
            geo,
            state_counts,
            contacts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Region, Schema};

    fn dataset(headers: &[&str]) -> RtoDataset {
        let mut a = RtoRecord {
            legal_name: "Alpha".into(),
            head_office_state: Some("NSW".into()),
            status: Some("Registered".into()),
            latitude: Some(-33.87),
            longitude: Some(151.21),
            ceo_email: Some("ceo@alpha.example".into()),
            ..Default::default()
        };
        a.set_approval(Region::Nsw, Some("TRUE".into()));
        let b = RtoRecord {
            legal_name: "Bravo".into(),
            head_office_state: Some("VIC".into()),
            status: Some("Registered".into()),
            ..Default::default()
        };
        RtoDataset::new(vec![a, b], Schema::from_headers(headers))
    }

    #[test]
    fn builds_every_view_when_columns_exist() {
        let ds = dataset(&[
            "Legal Name",
            "Head Office Location State",
            "Status",
            "Latitude",
            "Longitude",
            "CEO Email",
        ]);
        let view = DashboardView::build(&ds, &FilterSelection::default());
        assert_eq!(view.filtered.len(), 2);
        assert_eq!(view.geo.as_ref().map(Vec::len), Some(1));
        assert_eq!(view.state_counts.as_ref().map(Vec::len), Some(2));
        assert_eq!(view.contacts.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn missing_coordinate_columns_skip_only_the_map() {
        let ds = dataset(&["Legal Name", "Head Office Location State", "Latitude"]);
        let view = DashboardView::build(&ds, &FilterSelection::default());
        assert!(view.geo.is_none());
        assert!(view.contacts.is_none());
        assert_eq!(view.filtered.len(), 2);
        assert!(view.state_counts.is_some());
    }

    #[test]
    fn views_follow_the_selection() {
        let ds = dataset(&[
            "Legal Name",
            "Head Office Location State",
            "Latitude",
            "Longitude",
        ]);
        let selection = FilterSelection {
            approval_regions: [Region::Nsw].into_iter().collect(),
            ..Default::default()
        };
        let view = DashboardView::build(&ds, &selection);
        assert_eq!(view.filtered.len(), 1);
        let counts = view.state_counts.unwrap_or_default();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].count, 1);
    }
}

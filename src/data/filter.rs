use std::collections::BTreeSet;

use super::model::{Region, RtoRecord};

// ---------------------------------------------------------------------------
// Filter selection: the chosen values per facet
// ---------------------------------------------------------------------------

/// Sidebar selections. An empty facet means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub states: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub approval_regions: BTreeSet<Region>,
}

impl FilterSelection {
    /// Whether no facet restricts anything.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.statuses.is_empty() && self.approval_regions.is_empty()
    }

    /// Whether a record passes every active facet.
    ///
    /// * states / statuses: the record's value must be in the set; a missing
    ///   value never matches a non-empty facet.
    /// * approval regions: at least one selected region must read exactly
    ///   `"TRUE"` for the record.
    pub fn matches(&self, record: &RtoRecord) -> bool {
        if !self.states.is_empty() && !contains(&self.states, &record.head_office_state) {
            return false;
        }
        if !self.statuses.is_empty() && !contains(&self.statuses, &record.status) {
            return false;
        }
        if !self.approval_regions.is_empty()
            && !self
                .approval_regions
                .iter()
                .any(|&region| record.is_approved_in(region))
        {
            return false;
        }
        true
    }

    /// Toggle a value in one of the string facets.
    pub fn toggle(set: &mut BTreeSet<String>, value: &str) {
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }
}

fn contains(set: &BTreeSet<String>, value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| set.contains(v))
}

/// Keep the rows that pass `selection`, preserving their relative order.
pub fn apply_filters<'a, I>(rows: I, selection: &FilterSelection) -> Vec<&'a RtoRecord>
where
    I: IntoIterator<Item = &'a RtoRecord>,
{
    rows.into_iter().filter(|r| selection.matches(r)).collect()
}

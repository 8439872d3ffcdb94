use std::collections::HashMap;
use std::fmt;

use super::model::RtoRecord;

// ---------------------------------------------------------------------------
// Geo subset
// ---------------------------------------------------------------------------

/// Rows with both coordinates present. Duplicated locations are kept.
pub fn geo_subset<'a>(rows: &[&'a RtoRecord]) -> Vec<&'a RtoRecord> {
    rows.iter()
        .copied()
        .filter(|r| r.coordinates().is_some())
        .collect()
}

// ---------------------------------------------------------------------------
// Counts by state
// ---------------------------------------------------------------------------

/// Grouping key for head-office state; missing values form their own group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKey {
    State(String),
    Missing,
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKey::State(s) => f.write_str(s),
            StateKey::Missing => f.write_str("(missing)"),
        }
    }
}

impl From<Option<&str>> for StateKey {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => StateKey::State(s.to_string()),
            None => StateKey::Missing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCount {
    pub state: StateKey,
    pub count: usize,
}

/// Number of rows per head-office state, most common first.
///
/// Groups are collected in first-encountered order and then stable-sorted by
/// descending count, so ties keep encounter order.
pub fn count_by_state(rows: &[&RtoRecord]) -> Vec<StateCount> {
    let mut position: HashMap<StateKey, usize> = HashMap::new();
    let mut counts: Vec<StateCount> = Vec::new();

    for rec in rows {
        let key = StateKey::from(rec.head_office_state.as_deref());
        match position.get(&key) {
            Some(&i) => counts[i].count += 1,
            None => {
                position.insert(key.clone(), counts.len());
                counts.push(StateCount { state: key, count: 1 });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

// ---------------------------------------------------------------------------
// Contact projection
// ---------------------------------------------------------------------------

/// The CEO contact columns of one RTO.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactRow<'a> {
    pub legal_name: &'a str,
    pub ceo_contact_name: Option<&'a str>,
    pub ceo_email: Option<&'a str>,
    pub ceo_mobile: Option<&'a str>,
    pub ceo_phone: Option<&'a str>,
}

impl<'a> From<&'a RtoRecord> for ContactRow<'a> {
    fn from(r: &'a RtoRecord) -> Self {
        ContactRow {
            legal_name: &r.legal_name,
            ceo_contact_name: r.ceo_contact_name.as_deref(),
            ceo_email: r.ceo_email.as_deref(),
            ceo_mobile: r.ceo_mobile.as_deref(),
            ceo_phone: r.ceo_phone.as_deref(),
        }
    }
}

impl ContactRow<'_> {
    pub const HEADERS: [&'static str; 5] = [
        "Legal Name",
        "CEO Contact Name",
        "CEO Email",
        "CEO Mobile",
        "CEO Phone",
    ];

    /// Cells in [`Self::HEADERS`] order; missing values are empty.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.legal_name,
            self.ceo_contact_name.unwrap_or(""),
            self.ceo_email.unwrap_or(""),
            self.ceo_mobile.unwrap_or(""),
            self.ceo_phone.unwrap_or(""),
        ]
    }
}

/// Project rows onto the contact columns without dropping any.
pub fn contact_projection<'a>(rows: &[&'a RtoRecord]) -> Vec<ContactRow<'a>> {
    rows.iter().map(|&r| ContactRow::from(r)).collect()
}

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Column headers
// ---------------------------------------------------------------------------

pub const LEGAL_NAME: &str = "Legal Name";
pub const HEAD_OFFICE_STATE: &str = "Head Office Location State";
pub const STATUS: &str = "Status";
pub const LATITUDE: &str = "Latitude";
pub const LONGITUDE: &str = "Longitude";
pub const CEO_CONTACT_NAME: &str = "CEO Contact Name";
pub const CEO_EMAIL: &str = "CEO Email";
pub const CEO_MOBILE: &str = "CEO Mobile";
pub const CEO_PHONE: &str = "CEO Phone";

/// Approval cells must equal this literal exactly to count as approved.
pub const APPROVED: &str = "TRUE";

// ---------------------------------------------------------------------------
// Region – a delivery approval jurisdiction
// ---------------------------------------------------------------------------

/// A jurisdiction an RTO may be approved to deliver training in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
    International,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Nsw,
        Region::Vic,
        Region::Qld,
        Region::Sa,
        Region::Wa,
        Region::Tas,
        Region::Nt,
        Region::Act,
        Region::International,
    ];

    /// Short label shown in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Region::Nsw => "NSW",
            Region::Vic => "VIC",
            Region::Qld => "QLD",
            Region::Sa => "SA",
            Region::Wa => "WA",
            Region::Tas => "TAS",
            Region::Nt => "NT",
            Region::Act => "ACT",
            Region::International => "International",
        }
    }

    /// Exact header of this region's approval column in the source file.
    pub fn column_name(self) -> &'static str {
        match self {
            Region::Nsw => "NSW Delivery Approved",
            Region::Vic => "VIC Delivery Approved",
            Region::Qld => "QLD Delivery Approved",
            Region::Sa => "SA Delivery Approved",
            Region::Wa => "WA Delivery Approved",
            Region::Tas => "TAS Delivery Approved",
            Region::Nt => "NT Delivery Approved",
            Region::Act => "ACT Delivery Approved",
            Region::International => "International Delivery Approved",
        }
    }

    pub fn from_column_name(name: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.column_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RtoRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One Registered Training Organisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RtoRecord {
    pub legal_name: String,
    pub head_office_state: Option<String>,
    pub status: Option<String>,
    /// Raw approval cell per region, indexed by `Region as usize`.
    pub delivery_approval: [Option<String>; 9],
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ceo_contact_name: Option<String>,
    pub ceo_email: Option<String>,
    pub ceo_mobile: Option<String>,
    pub ceo_phone: Option<String>,
    /// Cells of columns outside the known schema, aligned with
    /// [`Schema::extra_columns`].
    pub extra: Vec<Option<String>>,
}

impl RtoRecord {
    pub fn approval(&self, region: Region) -> Option<&str> {
        self.delivery_approval[region.index()].as_deref()
    }

    pub fn set_approval(&mut self, region: Region, value: Option<String>) {
        self.delivery_approval[region.index()] = value;
    }

    /// Case-sensitive: only the literal `"TRUE"` counts.
    pub fn is_approved_in(&self, region: Region) -> bool {
        self.approval(region) == Some(APPROVED)
    }

    /// Both coordinates, if present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

// ---------------------------------------------------------------------------
// Schema – which columns the source actually had
// ---------------------------------------------------------------------------

/// Known optional column (everything except the legal name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    HeadOfficeState,
    Status,
    Approval(Region),
    Latitude,
    Longitude,
    CeoContactName,
    CeoEmail,
    CeoMobile,
    CeoPhone,
}

impl Column {
    pub fn from_header(header: &str) -> Option<Column> {
        let col = match header {
            HEAD_OFFICE_STATE => Column::HeadOfficeState,
            STATUS => Column::Status,
            LATITUDE => Column::Latitude,
            LONGITUDE => Column::Longitude,
            CEO_CONTACT_NAME => Column::CeoContactName,
            CEO_EMAIL => Column::CeoEmail,
            CEO_MOBILE => Column::CeoMobile,
            CEO_PHONE => Column::CeoPhone,
            other => return Region::from_column_name(other).map(Column::Approval),
        };
        Some(col)
    }
}

/// Columns present in the loaded source, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Every header of the source file, in order.
    pub headers: Vec<String>,
    present: HashSet<Column>,
    /// Headers that don't map onto a known field.
    pub extra_columns: Vec<String>,
}

impl Schema {
    /// Classify the headers of a source file.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut schema = Schema::default();
        for h in headers {
            let h = h.as_ref();
            schema.headers.push(h.to_string());
            if h == LEGAL_NAME {
                continue;
            }
            match Column::from_header(h) {
                Some(col) => {
                    schema.present.insert(col);
                }
                None => schema.extra_columns.push(h.to_string()),
            }
        }
        schema
    }

    pub fn has(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    pub fn has_coordinates(&self) -> bool {
        self.has(Column::Latitude) && self.has(Column::Longitude)
    }

    pub fn has_any_contact(&self) -> bool {
        [
            Column::CeoContactName,
            Column::CeoEmail,
            Column::CeoMobile,
            Column::CeoPhone,
        ]
        .into_iter()
        .any(|c| self.has(c))
    }
}

// ---------------------------------------------------------------------------
// RtoDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RtoDataset {
    /// All records in source order.
    pub records: Vec<RtoRecord>,
    pub schema: Schema,
    /// File the dataset was read from, if any.
    pub source: Option<PathBuf>,
    states: Vec<String>,
    statuses: Vec<String>,
}

impl RtoDataset {
    /// Build the dataset and its filter option lists.
    pub fn new(records: Vec<RtoRecord>, schema: Schema) -> Self {
        let states = unique_in_order(records.iter().map(|r| r.head_office_state.as_deref()));
        let statuses = unique_in_order(records.iter().map(|r| r.status.as_deref()));
        RtoDataset {
            records,
            schema,
            source: None,
            states,
            statuses,
        }
    }

    pub fn with_source(mut self, path: PathBuf) -> Self {
        self.source = Some(path);
        self
    }

    /// Distinct non-missing head-office states, first-encountered order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Distinct non-missing statuses, first-encountered order.
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Cell text for any header, as shown in the full data table.
    pub fn cell(&self, record: &RtoRecord, header: &str) -> Option<String> {
        if header == LEGAL_NAME {
            return Some(record.legal_name.clone());
        }
        match Column::from_header(header) {
            Some(Column::HeadOfficeState) => record.head_office_state.clone(),
            Some(Column::Status) => record.status.clone(),
            Some(Column::Approval(region)) => record.approval(region).map(str::to_string),
            Some(Column::Latitude) => record.latitude.map(|v| v.to_string()),
            Some(Column::Longitude) => record.longitude.map(|v| v.to_string()),
            Some(Column::CeoContactName) => record.ceo_contact_name.clone(),
            Some(Column::CeoEmail) => record.ceo_email.clone(),
            Some(Column::CeoMobile) => record.ceo_mobile.clone(),
            Some(Column::CeoPhone) => record.ceo_phone.clone(),
            None => {
                let idx = self.schema.extra_columns.iter().position(|c| c == header)?;
                record.extra.get(idx).cloned().flatten()
            }
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn unique_in_order<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_headers_round_trip() {
        for region in Region::ALL {
            assert_eq!(Region::from_column_name(region.column_name()), Some(region));
        }
        assert_eq!(Region::from_column_name("nsw delivery approved"), None);
    }

    #[test]
    fn approval_is_case_sensitive() {
        let mut rec = RtoRecord::default();
        rec.set_approval(Region::Nsw, Some("true".into()));
        rec.set_approval(Region::Vic, Some("TRUE".into()));
        assert!(!rec.is_approved_in(Region::Nsw));
        assert!(rec.is_approved_in(Region::Vic));
        assert!(!rec.is_approved_in(Region::Qld));
    }

    #[test]
    fn schema_classifies_headers() {
        let schema = Schema::from_headers(&[
            "Legal Name",
            "RTO Code",
            "Latitude",
            "Longitude",
            "ACT Delivery Approved",
            "CEO Email",
        ]);
        assert!(schema.has_coordinates());
        assert!(schema.has(Column::Approval(Region::Act)));
        assert!(!schema.has(Column::Approval(Region::Nsw)));
        assert!(schema.has_any_contact());
        assert_eq!(schema.extra_columns, vec!["RTO Code".to_string()]);
        assert_eq!(schema.headers.len(), 6);
    }

    #[test]
    fn options_keep_first_encountered_order() {
        let rec = |state: Option<&str>, status: &str| RtoRecord {
            head_office_state: state.map(str::to_string),
            status: Some(status.to_string()),
            ..Default::default()
        };
        let ds = RtoDataset::new(
            vec![
                rec(Some("VIC"), "Registered"),
                rec(None, "Suspended"),
                rec(Some("NSW"), "Registered"),
                rec(Some("VIC"), "Registered"),
            ],
            Schema::default(),
        );
        assert_eq!(ds.states(), ["VIC", "NSW"]);
        assert_eq!(ds.statuses(), ["Registered", "Suspended"]);
    }
}

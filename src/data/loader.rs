use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, LEGAL_NAME, RtoDataset, RtoRecord, Schema};

/// Typed loader failures; everything else is reported with `anyhow` context.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an RTO dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the RTO columns (the usual export)
/// * `.json`    – `[{ "Legal Name": "...", "Status": "...", ... }, ...]`
/// * `.parquet` – one column per header, string or numeric
pub fn load_file(path: &Path) -> Result<RtoDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            load_csv(file)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)?
        }
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    log::info!(
        "Loaded {} RTOs from {} ({} columns, coordinates: {}, extra columns: {:?})",
        dataset.len(),
        path.display(),
        dataset.schema.headers.len(),
        dataset.schema.has_coordinates(),
        dataset.schema.extra_columns,
    );

    Ok(dataset.with_source(path.to_path_buf()))
}

// ---------------------------------------------------------------------------
// Header → field mapping shared by every format
// ---------------------------------------------------------------------------

/// Where a source column lands in an [`RtoRecord`].
#[derive(Debug, Clone, Copy)]
enum Slot {
    LegalName,
    Known(Column),
    Extra(usize),
}

/// Turns header-indexed cells into records.
struct RecordBuilder {
    schema: Schema,
    slots: Vec<Slot>,
    bad_coordinates: usize,
}

impl RecordBuilder {
    fn new<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        if !headers.iter().any(|h| h.as_ref() == LEGAL_NAME) {
            return Err(LoadError::MissingColumn(LEGAL_NAME).into());
        }
        let schema = Schema::from_headers(headers);
        let mut extra = 0;
        let slots = headers
            .iter()
            .map(|h| {
                let h = h.as_ref();
                if h == LEGAL_NAME {
                    Slot::LegalName
                } else if let Some(col) = Column::from_header(h) {
                    Slot::Known(col)
                } else {
                    extra += 1;
                    Slot::Extra(extra - 1)
                }
            })
            .collect();
        Ok(RecordBuilder {
            schema,
            slots,
            bad_coordinates: 0,
        })
    }

    /// Build one record from `(column index, cell)` pairs. Empty cells are
    /// treated as missing.
    fn record(&mut self, cells: impl IntoIterator<Item = (usize, Option<String>)>) -> RtoRecord {
        let mut rec = RtoRecord {
            extra: vec![None; self.schema.extra_columns.len()],
            ..Default::default()
        };
        for (idx, value) in cells {
            let Some(&slot) = self.slots.get(idx) else {
                continue;
            };
            let value = value.filter(|v| !v.is_empty());
            match slot {
                Slot::LegalName => rec.legal_name = value.unwrap_or_default(),
                Slot::Extra(i) => rec.extra[i] = value,
                Slot::Known(col) => self.assign(&mut rec, col, value),
            }
        }
        rec
    }

    fn assign(&mut self, rec: &mut RtoRecord, col: Column, value: Option<String>) {
        match col {
            Column::HeadOfficeState => rec.head_office_state = value,
            Column::Status => rec.status = value,
            Column::Approval(region) => rec.set_approval(region, value),
            Column::Latitude => rec.latitude = self.coordinate(value),
            Column::Longitude => rec.longitude = self.coordinate(value),
            Column::CeoContactName => rec.ceo_contact_name = value,
            Column::CeoEmail => rec.ceo_email = value,
            Column::CeoMobile => rec.ceo_mobile = value,
            Column::CeoPhone => rec.ceo_phone = value,
        }
    }

    fn coordinate(&mut self, value: Option<String>) -> Option<f64> {
        let text = value?;
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                self.bad_coordinates += 1;
                None
            }
        }
    }

    fn finish(self, records: Vec<RtoRecord>) -> RtoDataset {
        if self.bad_coordinates > 0 {
            log::warn!(
                "{} coordinate cells were not numbers and are treated as missing",
                self.bad_coordinates
            );
        }
        RtoDataset::new(records, self.schema)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one RTO per row.
/// Only `Legal Name` is required; other known columns are optional and
/// unknown columns are carried along for display. Short rows load with their
/// trailing cells missing.
pub fn load_csv<R: Read>(input: R) -> Result<RtoDataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut builder = RecordBuilder::new(&headers)?;
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV data row {}", row_no + 1))?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(i, v)| (i, Some(v.to_string())));
        records.push(builder.record(cells));
    }

    Ok(builder.finish(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Legal Name": "Acme Training Pty Ltd",
///     "Head Office Location State": "NSW",
///     "Latitude": -33.87,
///     "NSW Delivery Approved": "TRUE"
///   },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<RtoDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let index: BTreeMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();
    let mut builder = RecordBuilder::new(&headers)?;

    let rows = objects
        .into_iter()
        .map(|obj| {
            let cells = obj
                .iter()
                .filter_map(|(k, v)| Some((*index.get(k.as_str())?, json_to_cell(v))));
            builder.record(cells)
        })
        .collect();

    Ok(builder.finish(rows))
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(bool_cell(*b)),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

fn bool_cell(b: bool) -> String {
    let text = if b { "TRUE" } else { "FALSE" };
    text.to_string()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per header.
///
/// Text columns may be Utf8 or LargeUtf8; coordinates may be Float64,
/// Float32 or text. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RtoDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records_builder = RecordBuilder::new(&headers)?;
    let mut records = Vec::new();
    let mut unsupported = HashSet::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns = batch.columns();
        for (i, col) in columns.iter().enumerate() {
            if !is_supported(col.data_type()) && unsupported.insert(i) {
                log::warn!(
                    "Unsupported parquet column type {:?} for '{}'; cells left empty",
                    col.data_type(),
                    headers[i]
                );
            }
        }
        for row in 0..batch.num_rows() {
            let cells = columns
                .iter()
                .enumerate()
                .map(|(i, col)| (i, extract_cell(col, row)));
            records.push(records_builder.record(cells));
        }
    }

    Ok(records_builder.finish(records))
}

fn is_supported(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8
            | DataType::LargeUtf8
            | DataType::Int32
            | DataType::Int64
            | DataType::Float32
            | DataType::Float64
            | DataType::Boolean
    )
}

/// Extract a single cell from an Arrow column as text. Unsupported types
/// read as missing.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Boolean => bool_cell(col.as_boolean().value(row)),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Region;

    const SAMPLE: &str = "\
Legal Name,RTO Code,Head Office Location State,Status,NSW Delivery Approved,VIC Delivery Approved,Latitude,Longitude,CEO Contact Name,CEO Email,CEO Mobile,CEO Phone
Acme Training Pty Ltd,90001,NSW,Registered,TRUE,FALSE,-33.87,151.21,Sam Lee,sam@acme.example,,02 9000 0000
Southern Skills,90002,VIC,Registered,FALSE,TRUE,,,,,,
Outback College,90003,,Suspended,true,FALSE,n/a,131.04,,,,
";

    #[test]
    fn csv_maps_headers_onto_fields() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);

        let acme = &ds.records[0];
        assert_eq!(acme.legal_name, "Acme Training Pty Ltd");
        assert_eq!(acme.head_office_state.as_deref(), Some("NSW"));
        assert_eq!(acme.coordinates(), Some((-33.87, 151.21)));
        assert!(acme.is_approved_in(Region::Nsw));
        assert_eq!(acme.ceo_mobile, None);
        assert_eq!(acme.ceo_phone.as_deref(), Some("02 9000 0000"));
        assert_eq!(acme.extra, vec![Some("90001".to_string())]);

        assert_eq!(ds.schema.extra_columns, vec!["RTO Code".to_string()]);
        assert!(ds.schema.has_coordinates());
        assert_eq!(ds.states(), ["NSW", "VIC"]);
    }

    #[test]
    fn csv_keeps_raw_approval_and_drops_bad_coordinates() {
        let ds = load_csv(SAMPLE.as_bytes()).unwrap();
        let outback = &ds.records[2];
        assert_eq!(outback.head_office_state, None);
        assert_eq!(outback.approval(Region::Nsw), Some("true"));
        assert!(!outback.is_approved_in(Region::Nsw));
        assert_eq!(outback.latitude, None);
        assert_eq!(outback.longitude, Some(131.04));
    }

    #[test]
    fn csv_without_legal_name_is_rejected() {
        let err = load_csv("Status,Latitude\nRegistered,1.0\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn(LEGAL_NAME))
        ));
    }

    #[test]
    fn csv_short_row_loads_with_trailing_fields_missing() {
        let text = "\
Legal Name,Head Office Location State,Status,CEO Phone
Acme,NSW,Registered,02 9000
Bravo,VIC,Registered
";
        let ds = load_csv(text.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        let bravo = &ds.records[1];
        assert_eq!(bravo.legal_name, "Bravo");
        assert_eq!(bravo.status.as_deref(), Some("Registered"));
        assert_eq!(bravo.ceo_phone, None);
        assert_eq!(ds.records[0].ceo_phone.as_deref(), Some("02 9000"));
    }

    #[test]
    fn csv_long_row_ignores_surplus_cells() {
        let ds = load_csv("Legal Name,Status\nA,Registered,stray\n".as_bytes()).unwrap();
        assert_eq!(ds.records[0].status.as_deref(), Some("Registered"));
        assert!(ds.records[0].extra.is_empty());
    }

    #[test]
    fn csv_errors_name_the_data_row() {
        let mut bytes = b"Legal Name\nAcme\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe\n");
        let err = load_csv(bytes.as_slice()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV data row 2"));
    }

    #[test]
    fn json_records_load_with_numbers_and_bools() {
        let text = r#"[
            {"Legal Name": "Acme", "Latitude": -33.5, "Longitude": 151, "QLD Delivery Approved": true},
            {"Legal Name": "Bravo", "Status": "Registered", "Latitude": null}
        ]"#;
        let ds = load_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].coordinates(), Some((-33.5, 151.0)));
        assert!(ds.records[0].is_approved_in(Region::Qld));
        assert_eq!(ds.records[1].status.as_deref(), Some("Registered"));
        assert_eq!(ds.records[1].latitude, None);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(load_json(r#"{"Legal Name": "x"}"#).is_err());
        assert!(load_json(r#"[1, 2]"#).is_err());
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rto.csv");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(SAMPLE.as_bytes())
            .unwrap();
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.source.as_deref(), Some(path.as_path()));

        let err = load_file(&dir.path().join("rto.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn parquet_reads_text_float_int_and_bool_columns() {
        use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema as ArrowSchema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("Legal Name", DataType::Utf8, false),
            Field::new("Head Office Location State", DataType::Utf8, true),
            Field::new("RTO Code", DataType::Int64, true),
            Field::new("NSW Delivery Approved", DataType::Boolean, true),
            Field::new("Latitude", DataType::Float64, true),
            Field::new("Longitude", DataType::Float64, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Acme", "Bravo"])),
            Arc::new(StringArray::from(vec![Some("NSW"), None])),
            Arc::new(Int64Array::from(vec![Some(90001), None])),
            Arc::new(BooleanArray::from(vec![Some(true), Some(false)])),
            Arc::new(Float64Array::from(vec![Some(-33.87), None])),
            Arc::new(Float64Array::from(vec![Some(151.21), Some(144.96)])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rto.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source.as_deref(), Some(path.as_path()));

        let acme = &ds.records[0];
        assert_eq!(acme.legal_name, "Acme");
        assert_eq!(acme.head_office_state.as_deref(), Some("NSW"));
        assert_eq!(acme.coordinates(), Some((-33.87, 151.21)));
        assert_eq!(acme.approval(Region::Nsw), Some("TRUE"));
        assert!(acme.is_approved_in(Region::Nsw));
        assert_eq!(acme.extra, vec![Some("90001".to_string())]);

        let bravo = &ds.records[1];
        assert_eq!(bravo.head_office_state, None);
        assert_eq!(bravo.latitude, None);
        assert_eq!(bravo.longitude, Some(144.96));
        assert_eq!(bravo.approval(Region::Nsw), Some("FALSE"));
        assert!(!bravo.is_approved_in(Region::Nsw));
        assert_eq!(bravo.extra, vec![None]);

        assert!(ds.schema.has_coordinates());
        assert_eq!(ds.states(), ["NSW"]);
    }

    #[test]
    fn unsupported_arrow_types_read_as_missing() {
        use arrow::array::{ArrayRef, Date32Array};

        let col: ArrayRef = Arc::new(Date32Array::from(vec![Some(19000)]));
        assert!(!is_supported(col.data_type()));
        assert_eq!(extract_cell(&col, 0), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }
}

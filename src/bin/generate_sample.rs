use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_RTOS: usize = 400;

/// (state, capital latitude, capital longitude, relative weight)
const STATES: [(&str, f64, f64, u32); 8] = [
    ("NSW", -33.87, 151.21, 32),
    ("VIC", -37.81, 144.96, 26),
    ("QLD", -27.47, 153.03, 20),
    ("WA", -31.95, 115.86, 10),
    ("SA", -34.93, 138.60, 7),
    ("TAS", -42.88, 147.33, 2),
    ("ACT", -35.28, 149.13, 2),
    ("NT", -12.46, 130.84, 1),
];

const REGIONS: [&str; 9] = ["NSW", "VIC", "QLD", "SA", "WA", "TAS", "NT", "ACT", "International"];

const STATUSES: [(&str, u32); 3] = [("Registered", 90), ("Suspended", 6), ("Cancelled", 4)];

const NAME_PARTS: [&str; 12] = [
    "Acme", "Southern Cross", "Harbour", "Outback", "Coastal", "Summit", "Eureka", "Bluegum",
    "Redgum", "Wattle", "Kookaburra", "Goldfields",
];
const NAME_KINDS: [&str; 6] = [
    "Training", "College", "Institute", "Skills Academy", "Education", "Learning Centre",
];
const FIRST_NAMES: [&str; 8] = ["Sam", "Alex", "Jordan", "Priya", "Wei", "Maria", "Tom", "Aroha"];
const LAST_NAMES: [&str; 8] = ["Nguyen", "Smith", "Patel", "Jones", "Chen", "Brown", "Kelly", "Singh"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Index into `weights`, proportional to each weight.
    fn weighted(&mut self, weights: impl Iterator<Item = u32> + Clone) -> usize {
        let total: u32 = weights.clone().sum();
        let mut ticket = (self.next_u64() % total as u64) as u32;
        for (i, w) in weights.enumerate() {
            if ticket < w {
                return i;
            }
            ticket -= w;
        }
        0
    }
}

/// Column name and cells, in output order. Coordinates are kept separately
/// so the Parquet output can store them as floats.
struct SampleTable {
    text: Vec<(String, Vec<Option<String>>)>,
    latitude: Vec<Option<f64>>,
    longitude: Vec<Option<f64>>,
}

fn generate(rng: &mut SimpleRng) -> SampleTable {
    let mut text_columns: Vec<String> = vec![
        "Legal Name".into(),
        "RTO Code".into(),
        "Head Office Location State".into(),
        "Status".into(),
    ];
    text_columns.extend(REGIONS.iter().map(|r| format!("{r} Delivery Approved")));
    text_columns.extend(
        ["CEO Contact Name", "CEO Email", "CEO Mobile", "CEO Phone"].map(String::from),
    );

    let mut rows: Vec<Vec<Option<String>>> = Vec::with_capacity(N_RTOS);
    let mut latitude = Vec::with_capacity(N_RTOS);
    let mut longitude = Vec::with_capacity(N_RTOS);

    for i in 0..N_RTOS {
        let (state, lat, lon, _) = STATES[rng.weighted(STATES.iter().map(|s| s.3))];
        let status = STATUSES[rng.weighted(STATUSES.iter().map(|s| s.1))].0;
        let name = format!("{} {} Pty Ltd", rng.pick(&NAME_PARTS), rng.pick(&NAME_KINDS));
        let ceo_first = rng.pick(&FIRST_NAMES);
        let ceo_last = rng.pick(&LAST_NAMES);

        let mut row = vec![
            Some(name),
            Some(format!("{}", 90000 + i)),
            // A few records have no head-office state.
            (!rng.chance(0.02)).then(|| state.to_string()),
            Some(status.to_string()),
        ];
        for region in REGIONS {
            let approved = region == state || rng.chance(0.2);
            row.push(Some(if approved { "TRUE" } else { "FALSE" }.to_string()));
        }
        row.push(Some(format!("{ceo_first} {ceo_last}")));
        row.push(Some(format!(
            "{}.{}@rto{}.example.com.au",
            ceo_first.to_lowercase(),
            ceo_last.to_lowercase(),
            i
        )));
        row.push((!rng.chance(0.3)).then(|| format!("04{:08}", rng.next_u64() % 100_000_000)));
        row.push(Some(format!("0{} {:04} {:04}", 2 + i % 7, i, (i * 37) % 10_000)));
        rows.push(row);

        if rng.chance(0.1) {
            latitude.push(None);
            longitude.push(None);
        } else {
            latitude.push(Some(lat + (rng.next_f64() - 0.5) * 1.5));
            longitude.push(Some(lon + (rng.next_f64() - 0.5) * 1.5));
        }
    }

    let text = text_columns
        .into_iter()
        .enumerate()
        .map(|(c, name)| (name, rows.iter().map(|r| r[c].clone()).collect()))
        .collect();

    SampleTable {
        text,
        latitude,
        longitude,
    }
}

fn write_csv(table: &SampleTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;

    let mut header: Vec<&str> = table.text.iter().map(|(n, _)| n.as_str()).collect();
    header.extend(["Latitude", "Longitude"]);
    writer.write_record(&header)?;

    for row in 0..table.latitude.len() {
        let mut record: Vec<String> = table
            .text
            .iter()
            .map(|(_, cells)| cells[row].clone().unwrap_or_default())
            .collect();
        record.push(table.latitude[row].map(|v| format!("{v:.5}")).unwrap_or_default());
        record.push(table.longitude[row].map(|v| format!("{v:.5}")).unwrap_or_default());
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(table: &SampleTable, path: &Path) -> Result<()> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for (name, cells) in &table.text {
        fields.push(Field::new(name, DataType::Utf8, true));
        arrays.push(Arc::new(StringArray::from(
            cells.iter().map(|c| c.as_deref()).collect::<Vec<_>>(),
        )));
    }
    fields.push(Field::new("Latitude", DataType::Float64, true));
    arrays.push(Arc::new(Float64Array::from(table.latitude.clone())));
    fields.push(Field::new("Longitude", DataType::Float64, true));
    arrays.push(Arc::new(Float64Array::from(table.longitude.clone())));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let table = generate(&mut rng);

    let csv_path = out_dir.join("rto.csv");
    write_csv(&table, &csv_path)?;
    let parquet_path = out_dir.join("rto.parquet");
    write_parquet(&table, &parquet_path)?;

    println!(
        "Wrote {N_RTOS} RTOs to {} and {}",
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

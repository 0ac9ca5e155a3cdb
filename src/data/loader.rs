use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::{Map, Value as JsonValue};

use super::error::DataLoadError;
use super::model::{
    self, Column, DisplayColumn, Listing, ListingTable, ACCOMMODATES, AVAILABLE, AVAILABLE_PCT,
    FIVE_DAY_DOLLAR_PRICE, HOST_IS_SUPERHOST, LATITUDE, LONGITUDE, PRICE_IN_DOLLAR, PRICE_STRING,
    REVIEW_SCORES_RATING, ROOM_TYPE,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row; the first column is the row index
/// * `.json` – `[{ "room_type": ..., "price_in_dollar": ..., ... }, ...]`
pub fn load_file(path: &Path) -> Result<ListingTable, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => read_csv(open(path)?)?,
        "json" => read_json(open(path)?)?,
        other => return Err(DataLoadError::UnsupportedExtension(other.to_string())),
    };
    build_table(raw)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Untyped intermediate form shared by both readers
// ---------------------------------------------------------------------------

struct RawTable {
    index_header: String,
    columns: Vec<String>,
    rows: Vec<RawRow>,
}

struct RawRow {
    index: String,
    cells: Vec<Option<String>>,
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// The first column is the row label, every other column is data.
fn read_csv<R: std::io::Read>(source: R) -> Result<RawTable, DataLoadError> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();

    let mut header_iter = headers.iter();
    let index_header = header_iter.next().unwrap_or("").to_string();
    let columns: Vec<String> = header_iter.map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut fields = record.iter();
        let index = fields.next().unwrap_or("").to_string();
        let cells = fields
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect();
        rows.push(RawRow { index, cells });
    }

    Ok(RawTable {
        index_header,
        columns,
        rows,
    })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).  There is no
/// index column, so rows are labelled by position.  Columns follow key order
/// (`serde_json` is built with `preserve_order`).
fn read_json<R: std::io::Read>(source: R) -> Result<RawTable, DataLoadError> {
    let records: Vec<Map<String, JsonValue>> = serde_json::from_reader(BufReader::new(source))?;

    let mut columns: Vec<String> = Vec::new();
    for rec in &records {
        for key in rec.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| RawRow {
            index: i.to_string(),
            cells: columns
                .iter()
                .map(|col| rec.get(col).and_then(json_to_text))
                .collect(),
        })
        .collect();

    Ok(RawTable {
        index_header: String::new(),
        columns,
        rows,
    })
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Schema validation and typed conversion
// ---------------------------------------------------------------------------

/// Position of every required column within [`RawTable::columns`].
struct Schema {
    room_type: usize,
    superhost: usize,
    accommodates: usize,
    price: usize,
    rating: usize,
    available: usize,
    five_day_price: usize,
    latitude: usize,
    longitude: usize,
    /// Raw positions of the non-schema columns, in file order.
    extra: Vec<usize>,
}

impl Schema {
    fn locate(columns: &[String]) -> Result<Self, DataLoadError> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
        };

        let mut schema = Schema {
            room_type: find(ROOM_TYPE)?,
            superhost: find(HOST_IS_SUPERHOST)?,
            accommodates: find(ACCOMMODATES)?,
            price: find(PRICE_IN_DOLLAR)?,
            rating: find(REVIEW_SCORES_RATING)?,
            available: find(AVAILABLE)?,
            five_day_price: find(FIVE_DAY_DOLLAR_PRICE)?,
            latitude: find(LATITUDE)?,
            longitude: find(LONGITUDE)?,
            extra: Vec::new(),
        };
        let extra = (0..columns.len())
            .filter(|&i| schema.column_for(i).is_none() && columns[i] != PRICE_STRING)
            .collect();
        schema.extra = extra;
        Ok(schema)
    }

    fn column_for(&self, raw: usize) -> Option<Column> {
        let known = [
            (self.room_type, Column::RoomType),
            (self.superhost, Column::Superhost),
            (self.accommodates, Column::Accommodates),
            (self.price, Column::Price),
            (self.rating, Column::Rating),
            (self.available, Column::AvailablePct),
            (self.five_day_price, Column::FiveDayPrice),
            (self.latitude, Column::Latitude),
            (self.longitude, Column::Longitude),
        ];
        known
            .iter()
            .find(|(pos, _)| *pos == raw)
            .map(|(_, col)| *col)
            .or_else(|| {
                self.extra
                    .iter()
                    .position(|&pos| pos == raw)
                    .map(Column::Extra)
            })
    }

    /// Table layout in file order, with `available` renamed and the
    /// `price_string` helper left out.
    fn display_columns(&self, raw: &RawTable) -> Vec<DisplayColumn> {
        let mut columns = vec![DisplayColumn::new(raw.index_header.clone(), Column::Index)];
        for (i, name) in raw.columns.iter().enumerate() {
            let Some(column) = self.column_for(i) else {
                continue;
            };
            let header = if column == Column::AvailablePct {
                AVAILABLE_PCT.to_string()
            } else {
                name.clone()
            };
            columns.push(DisplayColumn::new(header, column));
        }
        columns
    }
}

fn build_table(raw: RawTable) -> Result<ListingTable, DataLoadError> {
    let schema = Schema::locate(&raw.columns)?;
    let columns = schema.display_columns(&raw);

    let listings = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_listing(&schema, &raw.columns, row, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    ListingTable::new(listings, columns)
}

fn parse_listing(
    schema: &Schema,
    names: &[String],
    row: &RawRow,
    row_no: usize,
) -> Result<Listing, DataLoadError> {
    let cell = |pos: usize| row.cells.get(pos).and_then(|c| c.as_deref());
    let number = |pos: usize| parse_number(cell(pos), row_no, &names[pos]);

    let price_in_dollar = match number(schema.price)? {
        Some(p) if p >= 0.0 => p,
        _ => return Err(invalid(row_no, PRICE_IN_DOLLAR, cell(schema.price))),
    };

    Ok(Listing {
        index: row.index.clone(),
        room_type: cell(schema.room_type).map(str::to_string),
        host_is_superhost: cell(schema.superhost).map(str::to_string),
        accommodates: parse_count(cell(schema.accommodates), row_no)?,
        price_in_dollar,
        review_scores_rating: number(schema.rating)?,
        available_pct: number(schema.available)?.map(model::round2),
        five_day_dollar_price: number(schema.five_day_price)?.map(model::round2),
        latitude: number(schema.latitude)?,
        longitude: number(schema.longitude)?,
        price_string: model::price_label(price_in_dollar),
        extra: schema
            .extra
            .iter()
            .map(|&pos| cell(pos).map(str::to_string))
            .collect(),
    })
}

/// Empty cells and `NaN` are missing; anything else must parse.
fn parse_number(
    text: Option<&str>,
    row_no: usize,
    column: &str,
) -> Result<Option<f64>, DataLoadError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| invalid(row_no, column, Some(text)))?;
    Ok((!value.is_nan()).then_some(value))
}

/// Guest counts may be written as `4` or `4.0`.
fn parse_count(text: Option<&str>, row_no: usize) -> Result<Option<u32>, DataLoadError> {
    match parse_number(text, row_no, ACCOMMODATES)? {
        None => Ok(None),
        Some(v) if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 => Ok(Some(v as u32)),
        Some(_) => Err(invalid(row_no, ACCOMMODATES, text)),
    }
}

fn invalid(row: usize, column: &str, value: Option<&str>) -> DataLoadError {
    DataLoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: value.unwrap_or("").to_string(),
    }
}

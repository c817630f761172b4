//! CSV reader glue: turns a sparse triplet CSV (`coord_0, .., coord_{N-1},
//! value`) into a COO triple or directly into an SVT (§6 external
//! boundary). Row-skipping follows the rule worked out from the reference
//! CSV reader this module is modelled on: a row that is empty once
//! whitespace is stripped, or whose value column parses to the kind's zero,
//! is silently skipped (it would contribute nothing to the sparse
//! representation anyway); a row whose coordinate or value column fails to
//! parse at all is a genuine `ReadError`.

use std::io::Read;

use derive_builder::Builder;
use log::{debug, warn};
use logging_timer::time;

use crate::coo::{coo_to_svt, Coo};
use crate::dim::{Coord, Shape};
use crate::error::{SvtError, SvtResult};
use crate::svt::SparseVectorTree;
use crate::value::{ElementKind, Value};

/// Reader configuration (§6, ambient component C7/C8).
#[derive(Builder, Clone, Debug)]
#[builder(setter(into))]
pub struct CsvReaderConfig {
    /// Field delimiter, `,` by default.
    #[builder(default = "b','")]
    pub delimiter: u8,
    /// Whether the first row is a header and should be skipped.
    #[builder(default = "false")]
    pub has_header: bool,
    /// When set, the last two coordinate columns are swapped before use —
    /// useful for CSVs written in row-major convention.
    #[builder(default = "false")]
    pub transpose: bool,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        CsvReaderConfig {
            delimiter: b',',
            has_header: false,
            transpose: false,
        }
    }
}

fn parse_coord(field: &str, row: usize, col: usize) -> SvtResult<Coord> {
    field.trim().parse::<Coord>().map_err(|_| {
        SvtError::ReadError(format!(
            "row {row}: coordinate column {col} ({field:?}) is not an integer"
        ))
    })
}

fn parse_value(field: &str, row: usize, kind: ElementKind) -> SvtResult<Value> {
    let field = field.trim();
    Ok(match kind {
        ElementKind::Logical => Value::Logical(match field {
            "TRUE" | "true" | "1" => true,
            "FALSE" | "false" | "0" => false,
            _ => {
                return Err(SvtError::ReadError(format!(
                    "row {row}: {field:?} is not a logical value"
                )))
            }
        }),
        ElementKind::Integer => Value::Integer(field.parse().map_err(|_| {
            SvtError::ReadError(format!("row {row}: {field:?} is not an integer"))
        })?),
        ElementKind::Double => Value::Double(field.parse().map_err(|_| {
            SvtError::ReadError(format!("row {row}: {field:?} is not a double"))
        })?),
        ElementKind::Complex => {
            let (re, im) = field.split_once('+').ok_or_else(|| {
                SvtError::ReadError(format!("row {row}: {field:?} is not `re+imi`"))
            })?;
            let im = im.strip_suffix('i').unwrap_or(im);
            Value::Complex(
                re.parse().map_err(|_| {
                    SvtError::ReadError(format!("row {row}: {field:?} has a bad real part"))
                })?,
                im.parse().map_err(|_| {
                    SvtError::ReadError(format!("row {row}: {field:?} has a bad imaginary part"))
                })?,
            )
        }
        ElementKind::Raw => Value::Raw(field.parse().map_err(|_| {
            SvtError::ReadError(format!("row {row}: {field:?} is not a byte"))
        })?),
        ElementKind::Character => Value::Character(std::rc::Rc::from(field)),
        ElementKind::List => {
            return Err(SvtError::ReadError(
                "list-kind SVTs cannot be read from CSV".to_string(),
            ))
        }
    })
}

/// Reads a sparse triplet CSV into a `Coo`. `ndim` is the number of leading
/// coordinate columns; the remaining (last) column is the value.
#[time("debug")]
pub fn read_sparse_csv_as_coo<R: Read>(
    reader: R,
    ndim: usize,
    kind: ElementKind,
    config: &CsvReaderConfig,
) -> SvtResult<Coo> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(config.has_header)
        .flexible(false)
        .from_reader(reader);

    let mut rows: Vec<(Vec<Coord>, Value)> = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        if record.len() != ndim + 1 {
            return Err(SvtError::ReadError(format!(
                "row {i}: expected {} columns ({ndim} coordinates + value), found {}",
                ndim + 1,
                record.len()
            )));
        }

        let mut coord = Vec::with_capacity(ndim);
        for c in 0..ndim {
            coord.push(parse_coord(&record[c], i, c)?);
        }
        if config.transpose && ndim >= 2 {
            coord.swap(ndim - 2, ndim - 1);
        }
        let value = parse_value(&record[ndim], i, kind)?;
        if value.is_zero() {
            debug!("row {i}: value parses to zero, skipping");
            continue;
        }
        rows.push((coord, value));
    }

    let k = rows.len();
    warn_if_large(k);
    let mut nzindex = vec![0 as Coord; k * ndim];
    let mut nzdata = Vec::with_capacity(k);
    for (i, (coord, value)) in rows.into_iter().enumerate() {
        for (c, v) in coord.into_iter().enumerate() {
            nzindex[c * k + i] = v;
        }
        nzdata.push(value);
    }

    Ok(Coo {
        nzindex,
        nzdata,
        nrow: k,
        ncol: ndim,
    })
}

fn warn_if_large(k: usize) {
    if k as u64 > crate::dim::MAX_I32_LEN / 2 {
        warn!("read_sparse_csv: {k} rows is approaching the IDS size limit");
    }
}

/// Reads a sparse triplet CSV directly into an SVT of the given shape.
#[time("debug")]
pub fn read_sparse_csv_as_svt<R: Read>(
    reader: R,
    shape: Shape,
    kind: ElementKind,
    config: &CsvReaderConfig,
) -> SvtResult<SparseVectorTree> {
    let ndim = shape.ndim();
    let coo = read_sparse_csv_as_coo(reader, ndim, kind, config)?;
    coo_to_svt(shape, kind, &coo.nzindex, &coo.nzdata)
}

//! Command-line surface over the core conversion/subassignment operations
//! (§6). Kept thin: argument parsing and reader/writer glue only, no
//! business logic beyond what's already in `coo`/`csc`/`dense`/`reader`.

use std::io::{self, Write};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use patharg::{InputArg, OutputArg};

use crate::coo::svt_to_coo;
use crate::dim::Shape;
use crate::reader::{read_sparse_csv_as_svt, CsvReaderConfig};
use crate::value::ElementKind;

#[derive(Parser, Debug)]
#[command(name = "svtarray", about = "Sparse Vector Tree conversion tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a sparse triplet CSV and print its non-zero count.
    Count {
        input: InputArg,
        /// Comma-separated axis sizes, e.g. "3,4".
        #[arg(long, value_delimiter = ',')]
        dim: Vec<i64>,
        #[arg(long, default_value = "integer")]
        kind: String,
        #[arg(long, default_value_t = false)]
        has_header: bool,
    },
    /// Read a sparse triplet CSV and re-emit it as COO triplets.
    ToCoo {
        input: InputArg,
        #[arg(long, value_delimiter = ',')]
        dim: Vec<i64>,
        #[arg(long, default_value = "integer")]
        kind: String,
        #[arg(long, default_value_t = false)]
        has_header: bool,
        output: OutputArg,
    },
}

pub fn run(cli: Cli) -> crate::error::SvtResult<()> {
    match cli.command {
        Command::Count {
            input,
            dim,
            kind,
            has_header,
        } => {
            let shape = Shape::new(dim)?;
            let kind = parse_kind(&kind)?;
            let config = CsvReaderConfig {
                has_header,
                ..CsvReaderConfig::default()
            };
            let reader = input.open()?;
            let svt = read_sparse_csv_as_svt(reader, shape, kind, &config)?;
            println!("{}", svt.nz_count());
            Ok(())
        }
        Command::ToCoo {
            input,
            dim,
            kind,
            has_header,
            output,
        } => {
            let shape = Shape::new(dim)?;
            let kind = parse_kind(&kind)?;
            let config = CsvReaderConfig {
                has_header,
                ..CsvReaderConfig::default()
            };
            let reader = input.open()?;
            let svt = read_sparse_csv_as_svt(reader, shape, kind, &config)?;
            let coo = svt_to_coo(&svt)?;
            let mut out = output.create()?;
            for i in 0..coo.nrow {
                let row = coo.row(i);
                let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                writeln!(out, "{},{:?}", cells.join(","), coo.nzdata[i])?;
            }
            Ok(())
        }
    }
}

fn parse_kind(tag: &str) -> crate::error::SvtResult<ElementKind> {
    ElementKind::from_tag(tag).ok_or_else(|| {
        crate::error::SvtError::UnsupportedElementType(tag.to_string())
    })
}

impl From<io::Error> for crate::error::SvtError {
    fn from(err: io::Error) -> Self {
        crate::error::SvtError::ReadError(err.to_string())
    }
}

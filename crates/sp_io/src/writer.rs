//! District result table writer.
//!
//! Columns: district id, one adjusted-percentage column per party (roster
//! order), winner, margin percent. Written with the layout separator and a
//! UTF-8 BOM so spreadsheet consumers pick the right encoding.

use polars::frame::DataFrame;
use polars::io::SerWriter;
use polars::prelude::{Column, CsvWriter, NamedFrom};
use polars::series::Series;

use crate::config::TableLayout;
use crate::{IoError, IoResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Row-major district results ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictTable {
    pub parties: Vec<String>,
    pub districts: Vec<String>,
    /// `adjusted[d][p]`, percent, already rounded to 2 decimals.
    pub adjusted: Vec<Vec<f64>>,
    pub winners: Vec<String>,
    pub margin_pct: Vec<f64>,
}

impl DistrictTable {
    /// Column-major frame in output column order.
    pub fn to_frame(&self, layout: &TableLayout) -> IoResult<DataFrame> {
        let n = self.districts.len();
        if self.adjusted.len() != n || self.winners.len() != n || self.margin_pct.len() != n {
            return Err(IoError::Invalid("district table columns differ in length".into()));
        }

        let mut columns: Vec<Column> = Vec::with_capacity(self.parties.len() + 3);
        columns.push(Series::new(layout.district_column.as_str().into(), self.districts.clone()).into());
        for (p, party) in self.parties.iter().enumerate() {
            let values = self
                .adjusted
                .iter()
                .map(|row| {
                    row.get(p).copied().ok_or_else(|| {
                        IoError::Invalid(format!("district row is missing party {party:?}"))
                    })
                })
                .collect::<IoResult<Vec<f64>>>()?;
            columns.push(Series::new(party.as_str().into(), values).into());
        }
        columns.push(Series::new(layout.winner_column.as_str().into(), self.winners.clone()).into());
        columns.push(Series::new(layout.margin_column.as_str().into(), self.margin_pct.clone()).into());

        Ok(DataFrame::new(columns)?)
    }

    /// CSV bytes, BOM first.
    pub fn to_csv_bytes(&self, layout: &TableLayout) -> IoResult<Vec<u8>> {
        let mut df = self.to_frame(layout)?;
        let mut out = UTF8_BOM.to_vec();
        CsvWriter::new(&mut out)
            .with_separator(layout.separator_byte()?)
            .finish(&mut df)?;
        Ok(out)
    }
}

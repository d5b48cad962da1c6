//! CSV persistence for count results
//!
//! One row per pairing with the columns `A,B,ship,fics,explicit,p`. `p` is left empty
//! for pairings with no works.

use crate::output::traits::{OutputError, OutputResult};
use crate::state::CountResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Column names, in output order
pub const HEADER: [&str; 6] = ["A", "B", "ship", "fics", "explicit", "p"];

/// One output row
#[derive(Debug, Clone, PartialEq)]
pub struct ShipRecord {
    pub a: String,
    pub b: String,
    /// Canonical relationship tag
    pub ship: String,
    pub fics: u64,
    pub explicit: u64,
    /// Explicit share of works, missing when `fics` is zero
    pub p: Option<f64>,
}

impl From<&CountResult> for ShipRecord {
    fn from(result: &CountResult) -> Self {
        Self {
            a: result.pairing.a.clone(),
            b: result.pairing.b.clone(),
            ship: result.tag.clone(),
            fics: result.total,
            explicit: result.explicit,
            p: result.proportion(),
        }
    }
}

impl ShipRecord {
    fn to_row(&self) -> [String; 6] {
        [
            self.a.clone(),
            self.b.clone(),
            self.ship.clone(),
            self.fics.to_string(),
            self.explicit.to_string(),
            self.p.map(|p| p.to_string()).unwrap_or_default(),
        ]
    }

    fn from_row(row: &[String], line: usize) -> OutputResult<Self> {
        if row.len() != HEADER.len() {
            return Err(OutputError::Format(format!(
                "line {}: expected {} columns, got {}",
                line,
                HEADER.len(),
                row.len()
            )));
        }

        let number = |value: &str, column: &str| {
            value.parse::<u64>().map_err(|_| {
                OutputError::Format(format!("line {}: invalid {} {:?}", line, column, value))
            })
        };

        let p = if row[5].is_empty() {
            None
        } else {
            Some(row[5].parse::<f64>().map_err(|_| {
                OutputError::Format(format!("line {}: invalid p {:?}", line, row[5]))
            })?)
        };

        Ok(Self {
            a: row[0].clone(),
            b: row[1].clone(),
            ship: row[2].clone(),
            fics: number(&row[3], "fics")?,
            explicit: number(&row[4], "explicit")?,
            p,
        })
    }
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write, S: AsRef<str>>(w: &mut W, row: &[S]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            write!(w, ",")?;
        }
        let cell = cell.as_ref();
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Writes the header and one row per record
pub fn write_records<W: Write>(w: &mut W, records: &[ShipRecord]) -> io::Result<()> {
    write_row(w, &HEADER)?;
    for record in records {
        write_row(w, &record.to_row())?;
    }
    Ok(())
}

/// Writes count results to a CSV file, creating parent directories as needed
pub fn write_results_file(path: &Path, results: &[CountResult]) -> OutputResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let records: Vec<ShipRecord> = results.iter().map(ShipRecord::from).collect();
    let mut writer = BufWriter::new(File::create(path)?);
    write_records(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

/* ---------------- Reading ---------------- */

/// Splits one line written by [`write_row`] into its fields
///
/// Fields never span lines: names come from a line-oriented roster.
fn split_fields(line: &str, number: usize) -> OutputResult<Vec<String>> {
    let mut fields = Vec::with_capacity(HEADER.len());
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, quoted) {
            ('"', true) if chars.peek() == Some(&'"') => {
                chars.next();
                field.push('"');
            }
            ('"', true) => quoted = false,
            ('"', false) if field.is_empty() => quoted = true,
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(ch),
        }
    }

    if quoted {
        return Err(OutputError::Format(format!(
            "line {}: unterminated quoted field",
            number
        )));
    }
    fields.push(field);
    Ok(fields)
}

/// Parses CSV text written by [`write_records`]
pub fn parse_records(text: &str) -> OutputResult<Vec<ShipRecord>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    match lines.next() {
        Some((_, header)) if header.split(',').eq(HEADER) => {}
        Some((_, header)) => {
            return Err(OutputError::Format(format!(
                "unexpected header {:?}",
                header
            )))
        }
        None => return Ok(Vec::new()),
    }

    lines
        .map(|(number, line)| ShipRecord::from_row(&split_fields(line, number)?, number))
        .collect()
}

/// Reads a results CSV from disk
pub fn read_records(path: &Path) -> OutputResult<Vec<ShipRecord>> {
    let text = std::fs::read_to_string(path)?;
    parse_records(&text)
}

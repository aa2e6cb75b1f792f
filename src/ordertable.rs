//! This module reads Macrogen order tables from Excel workbooks into a list
//! of order records that drive the reorganization of the delivered files.

use std::error::Error;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

/// A catch-all error type
type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Folder name used for rows that do not name a responsible person
pub const DEFAULT_PERSON: &str = "other";

/// An order table mapping samples and primers to persons and primer pairs
#[derive(Debug)]
pub struct OrderTable {
    /// The rows of the order table, in sheet order
    pub records: Vec<OrderRecord>,
}

/// One row of an order table
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// Sample name as entered on the order
    pub sample_name: String,

    /// Primer used for this sequencing reaction
    pub primer_name: String,

    /// Person responsible for the sample, `"other"` if the cell was empty
    pub person_in_charge: String,

    /// Primer pair used to generate the sequence, e.g. "NS1_NS4"
    pub primer_combination: String,
}

impl OrderRecord {
    /// File name prefix shared by all result files belonging to this row.
    ///
    /// Macrogen names result files `<sampleName>_<primerName>` plus a
    /// result-type suffix (usually .ab1, .pdf, .phd.1 or .txt). The suffix
    /// set is not enforced anywhere; members are picked up by prefix alone.
    pub fn prefix_key(&self) -> String {
        format!("{}_{}", self.sample_name, self.primer_name)
    }
}

fn find_column(header_row: &[String], name: &str) -> Result<usize> {
    header_row
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| Box::<dyn Error>::from(format!("Could not find required column '{}'", name)))
}

impl OrderTable {
    /// Reads an order table from the first sheet of an Excel workbook.
    ///
    /// Empty `personInCharge` cells are filled with [`DEFAULT_PERSON`]; no
    /// other cell is validated or rewritten.
    pub fn from_xlsx(xlsx: &Path) -> Result<Self> {
        // open Excel workbook
        let mut wb: Xlsx<_> = open_workbook(xlsx)?;
        let sheetname = wb.sheet_names()[0].clone();
        let sheet = wb.worksheet_range(&sheetname).unwrap()?;

        let header_row: Vec<String> = sheet
            .rows()
            .next()
            .ok_or("Order table has no header row")?
            .iter()
            .map(|d| d.to_string())
            .collect();
        let col_sample = find_column(&header_row, "sampleName")?;
        let col_primer = find_column(&header_row, "primerName")?;
        let col_person = find_column(&header_row, "personInCharge")?;
        let col_combination = find_column(&header_row, "primerCombination")?;

        let mut records = Vec::new();
        for row in sheet.rows().skip(1) {
            let person = row[col_person].to_string();

            records.push(OrderRecord {
                sample_name: row[col_sample].to_string(),
                primer_name: row[col_primer].to_string(),
                person_in_charge: if person.is_empty() {
                    DEFAULT_PERSON.to_string()
                } else {
                    person
                },
                primer_combination: row[col_combination].to_string(),
            });
        }

        Ok(OrderTable { records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes a minimal order table workbook. `None` cells are left unwritten.
    fn write_order_table(path: &Path, header: &[&str], rows: &[Vec<Option<&str>>]) -> Result<()> {
        let workbook = xlsxwriter::Workbook::new(path.to_str().unwrap());
        {
            let mut sheet = workbook.add_worksheet(None)?;
            for (col, title) in header.iter().enumerate() {
                sheet.write_string(0, col as u16, title, None)?;
            }
            for (row_idx, row) in rows.iter().enumerate() {
                for (col, cell) in row.iter().enumerate() {
                    if let Some(value) = cell {
                        sheet.write_string(row_idx as u32 + 1, col as u16, value, None)?;
                    }
                }
            }
        }
        workbook.close()?;
        Ok(())
    }

    const HEADER: [&str; 4] = [
        "sampleName",
        "primerName",
        "personInCharge",
        "primerCombination",
    ];

    #[test]
    fn reads_rows_in_sheet_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let table = dir.path().join("order.xlsx");
        write_order_table(
            &table,
            &HEADER,
            &[
                vec![Some("S1"), Some("NS1"), Some("alice"), Some("NS1_NS4")],
                vec![Some("S2"), Some("NS4"), Some("bob"), Some("NS1_NS4")],
            ],
        )?;

        let parsed = OrderTable::from_xlsx(&table)?;
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(
            parsed.records[0],
            OrderRecord {
                sample_name: "S1".to_string(),
                primer_name: "NS1".to_string(),
                person_in_charge: "alice".to_string(),
                primer_combination: "NS1_NS4".to_string(),
            }
        );
        assert_eq!(parsed.records[1].sample_name, "S2");
        Ok(())
    }

    #[test]
    fn empty_person_in_charge_defaults_to_other() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let table = dir.path().join("order.xlsx");
        write_order_table(
            &table,
            &HEADER,
            &[
                vec![Some("S1"), Some("16S"), None, Some("F_R")],
                vec![Some("S2"), Some("16S"), Some("carol"), Some("F_R")],
            ],
        )?;

        let parsed = OrderTable::from_xlsx(&table)?;
        assert_eq!(parsed.records[0].person_in_charge, DEFAULT_PERSON);
        assert_eq!(parsed.records[1].person_in_charge, "carol");
        Ok(())
    }

    #[test]
    fn columns_may_appear_in_any_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let table = dir.path().join("order.xlsx");
        write_order_table(
            &table,
            &["primerCombination", "personInCharge", "primerName", "sampleName"],
            &[vec![Some("NS1_NS4"), Some("dave"), Some("NS1"), Some("S9")]],
        )?;

        let parsed = OrderTable::from_xlsx(&table)?;
        assert_eq!(parsed.records[0].sample_name, "S9");
        assert_eq!(parsed.records[0].primer_name, "NS1");
        assert_eq!(parsed.records[0].person_in_charge, "dave");
        assert_eq!(parsed.records[0].primer_combination, "NS1_NS4");
        Ok(())
    }

    #[test]
    fn missing_required_column_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let table = dir.path().join("order.xlsx");
        write_order_table(
            &table,
            &["sampleName", "primerName", "personInCharge"],
            &[vec![Some("S1"), Some("NS1"), Some("alice")]],
        )?;

        let err = OrderTable::from_xlsx(&table).unwrap_err();
        assert!(err.to_string().contains("primerCombination"));
        Ok(())
    }

    #[test]
    fn prefix_key_joins_sample_and_primer() {
        let record = OrderRecord {
            sample_name: "S1".to_string(),
            primer_name: "16S".to_string(),
            person_in_charge: "other".to_string(),
            primer_combination: "F_R".to_string(),
        };
        assert_eq!(record.prefix_key(), "S1_16S");
    }
}

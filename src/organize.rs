//! Planning and execution of the actual file reorganization.
//!
//! The row-to-directory mapping and the prefix matching are pure functions of
//! the order table and the archive listing. They are computed up front into a
//! list of extraction actions which is then carried out against the archive,
//! so the matching logic stays testable without touching a real zip file.

use std::error::Error;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::ordertable::{OrderRecord, OrderTable};

/// A catch-all error type
type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// A single extraction step: one archive member, placed below one directory
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractAction {
    /// Directory the member is extracted into
    pub directory: PathBuf,

    /// Stored name of the archive member
    pub member: String,
}

/// Destination directory for one order row below the order root
pub fn destination(order_root: &Path, record: &OrderRecord) -> PathBuf {
    order_root
        .join(&record.person_in_charge)
        .join(&record.primer_combination)
}

/// Computes the extraction actions for a whole order.
///
/// Rows are walked in table order; for each row the member listing is scanned
/// in its stored order, and every member whose name starts with the row's
/// `<sampleName>_<primerName>` prefix is extracted into
/// `<order root>/<personInCharge>/<primerCombination>`. A member that merely
/// continues into a longer sample name (`S1_16S` also matching
/// `S1_16S10.ab1`) is picked up as well; the prefix rule does not try to tell
/// such neighbours apart.
pub fn plan(order_root: &Path, table: &OrderTable, members: &[String]) -> Vec<ExtractAction> {
    let mut actions = Vec::new();

    for record in &table.records {
        let directory = destination(order_root, record);
        let prefix = record.prefix_key();

        for member in members {
            if member.starts_with(&prefix) {
                actions.push(ExtractAction {
                    directory: directory.clone(),
                    member: member.clone(),
                });
            }
        }
    }

    actions
}

/// Lists the archive members in their stored order
pub fn member_names(zip: &mut ZipArchive<File>) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(zip.len());
    for index in 0..zip.len() {
        names.push(zip.by_index(index)?.name().to_string());
    }
    Ok(names)
}

/// Extracts one archive member below the target directory, keeping the
/// member's own relative path.
fn extract_member(zip: &mut ZipArchive<File>, member: &str, directory: &Path) -> Result<()> {
    let mut entry = zip.by_name(member)?;

    let mut local_path = PathBuf::from(directory);
    local_path.push(PathBuf::from(entry.name()));

    if entry.name().ends_with('/') {
        std::fs::create_dir_all(&local_path)?;
        return Ok(());
    }

    if let Some(parent) = local_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut targetfile = File::create(&local_path)?;
    io::copy(&mut entry, &mut targetfile)?;
    Ok(())
}

/// Runs a planned order against an archive: every row gets its destination
/// directory, matching members are extracted into it. Re-running overwrites
/// previously extracted files in place.
pub fn organize(table: &OrderTable, archive: &Path, order_root: &Path) -> Result<()> {
    let zipfile = File::open(archive)?;
    let mut zip = ZipArchive::new(zipfile)?;

    let members = member_names(&mut zip)?;
    let actions = plan(order_root, table, &members);

    info!(
        "Extracting {} files for {} order rows into {}...",
        actions.len(),
        table.records.len(),
        order_root.display()
    );

    for record in &table.records {
        std::fs::create_dir_all(destination(order_root, record))?;
    }

    for action in &actions {
        debug!("{} -> {}", action.member, action.directory.display());
        extract_member(&mut zip, &action.member, &action.directory)?;
    }

    info!("Done.");
    Ok(())
}

/// Entry point for the CLI: reads the order table and reorganizes the
/// archive named `<order_name>.zip` into a tree rooted at `<order_name>/`.
pub fn organize_order(table: &Path, order_name: &str) -> Result<()> {
    let table = OrderTable::from_xlsx(table)?;
    let archive = PathBuf::from(format!("{}.zip", order_name));
    let order_root = PathBuf::from(order_name);

    organize(&table, &archive, &order_root)
}

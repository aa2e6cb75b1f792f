
use std::path::PathBuf;
use structopt::StructOpt;

/// Organize AB1 result files according to a Macrogen order table.
///
/// The order table must include four obligate columns: `sampleName`,
/// `primerName`, `personInCharge` and `primerCombination`. The former two are
/// default fields of the Macrogen order table; the latter two drive the
/// output hierarchy. Results end up under
/// `<order>/<personInCharge>/<primerCombination>/`.
#[derive(StructOpt, Debug)]
pub struct Opt {
    /// Name of the zipped order file, without the ZIP extension (e.g. "190731FN-022")
    #[structopt(long)]
    pub file: String,

    /// Name of the order table, including the file extension (e.g. "order.xlsx")
    #[structopt(long, parse(from_os_str))]
    pub table: PathBuf,
}

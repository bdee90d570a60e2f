pub mod codegen;
pub mod csv;
pub mod error;
pub mod layout;
pub mod partition;
pub mod table;
pub mod usage;
pub mod utils;

pub use error::{Error, Result};
pub use layout::{AlignmentResolver, AlwaysRoundUp, Conflict, Layout, NeverRoundUp, compute_offsets};
pub use partition::{COMMON_SUBTYPES, Field, Partition};
pub use table::{DEFAULT_ALIGNMENT, DEFAULT_FLASH_SIZE, PartitionTable};
pub use usage::{Share, Usage};

/// How misaligned partition sizes are handled during layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RoundUpPolicy {
    /// Ask for every misaligned partition.
    #[default]
    #[cfg_attr(feature = "cli", clap(name = "ask"))]
    Ask,
    #[cfg_attr(feature = "cli", clap(name = "always"))]
    Always,
    #[cfg_attr(feature = "cli", clap(name = "never"))]
    Never,
}

impl std::str::FromStr for RoundUpPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ask" => Ok(RoundUpPolicy::Ask),
            "always" => Ok(RoundUpPolicy::Always),
            "never" => Ok(RoundUpPolicy::Never),
            _ => Err(Error::config(format!("Invalid round_up policy: {}", s))),
        }
    }
}

/// Load a table from a CSV file using the given flash geometry.
pub fn load_table<P: AsRef<std::path::Path>>(
    path: P,
    flash_size: u32,
    alignment: u32,
) -> Result<PartitionTable> {
    let partitions = csv::read_csv_file(path)?;
    Ok(PartitionTable::new(flash_size, alignment)?.with_partitions(partitions))
}

/// Save a table to a CSV file.
pub fn save_table<P: AsRef<std::path::Path>>(path: P, table: &PartitionTable) -> Result<()> {
    csv::write_csv_file(path, table.partitions())
}

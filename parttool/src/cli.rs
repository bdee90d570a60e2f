use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use parttool_lib::{Field, RoundUpPolicy};

use crate::config::PartToolConfig;

/// Settings after combining the config file with command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub flash_size: u32,
    pub alignment: u32,
    pub round_up: RoundUpPolicy,
    pub quiet: bool,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Flash partition table designer", long_about = None)]
pub struct Cli {
    /// JSON configuration file path
    #[arg(long = "config", short = 'f', global = true)]
    pub config: Option<String>,

    /// Total flash size, e.g. 0x400000 or 4M (default: 0x400000)
    #[arg(long = "flash-size", value_parser = parse_number_arg, global = true)]
    pub flash_size: Option<u32>,

    /// Offset and size alignment (default: 0x1000)
    #[arg(long = "alignment", value_parser = parse_number_arg, global = true)]
    pub alignment: Option<u32>,

    /// Only print errors and requested output
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an empty partition table
    #[command(name = "new")]
    New(NewTable),

    /// Print the laid-out table, conflicts and space usage
    #[command(name = "show")]
    Show(Show),

    /// Append or insert a partition
    #[command(name = "add")]
    Add(Add),

    /// Remove a partition by index or name
    #[command(name = "remove")]
    Remove(Remove),

    /// Edit one field of a partition
    #[command(name = "set")]
    Set(Set),

    /// Compute offsets and write the result back
    #[command(name = "layout")]
    Layout(LayoutCmd),

    /// Show used and free space
    #[command(name = "usage")]
    Usage(UsageCmd),

    /// Generate a C constant table
    #[command(name = "codegen")]
    Codegen(Codegen),

    /// List common partition subtypes
    #[command(name = "subtypes")]
    Subtypes,
}

#[derive(Parser, Debug, Clone)]
pub struct NewTable {
    /// Partition table CSV file
    pub file: String,

    /// Overwrite an existing file
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct Show {
    /// Partition table CSV file
    pub file: String,

    /// Print the table as JSON
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct Add {
    /// Partition table CSV file
    pub file: String,

    /// Partition name (default: new_part)
    #[arg(long = "name")]
    pub name: Option<String>,

    /// Partition type (default: data)
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Partition subtype (default: nvs)
    #[arg(long = "subtype")]
    pub subtype: Option<String>,

    /// Fixed offset; omit to place automatically
    #[arg(long = "offset")]
    pub offset: Option<String>,

    /// Partition size (default: 0x1000)
    #[arg(long = "size")]
    pub size: Option<String>,

    /// Partition flags, e.g. encrypted
    #[arg(long = "flags")]
    pub flags: Option<String>,

    /// Insert at this zero-based position instead of appending
    #[arg(long = "at")]
    pub at: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct Remove {
    /// Partition table CSV file
    pub file: String,

    /// Zero-based index or partition name
    pub partition: String,
}

#[derive(Parser, Debug, Clone)]
pub struct Set {
    /// Partition table CSV file
    pub file: String,

    /// Zero-based index or partition name
    pub partition: String,

    /// Field to edit
    #[arg(value_enum)]
    pub field: Field,

    /// New value; an empty offset means automatic placement
    pub value: String,
}

#[derive(Parser, Debug, Clone)]
pub struct LayoutCmd {
    /// Partition table CSV file
    pub file: String,

    /// How to handle sizes that are not aligned (default: ask)
    #[arg(long = "round-up", value_enum)]
    pub round_up: Option<RoundUpPolicy>,

    /// Write the result here instead of overwriting the input
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct UsageCmd {
    /// Partition table CSV file
    pub file: String,
}

#[derive(Parser, Debug, Clone)]
pub struct Codegen {
    /// Partition table CSV file
    pub file: String,

    /// Output file; prints to stdout when omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
}

fn parse_number_arg(s: &str) -> Result<u32, String> {
    parttool_lib::utils::Utils::parse_number(s).map_err(|e| e.to_string())
}

/// Merge CLI arguments with configuration file, CLI args take precedence
pub fn merge_config(args: &Cli, config: Option<PartToolConfig>) -> Result<MergedConfig> {
    let base_config = config.unwrap_or_else(PartToolConfig::with_defaults);
    base_config
        .validate()
        .map_err(|e| anyhow!("Invalid config: {}", e))?;

    let flash_size = match args.flash_size {
        Some(size) => size,
        None => base_config
            .flash_size
            .to_u32()
            .map_err(|e| anyhow!("Invalid flash_size in config: {}", e))?,
    };

    let alignment = match args.alignment {
        Some(alignment) => alignment,
        None => base_config
            .alignment
            .to_u32()
            .map_err(|e| anyhow!("Invalid alignment in config: {}", e))?,
    };
    parttool_lib::utils::Utils::check_alignment(alignment)?;

    let round_up = match &args.command {
        Commands::Layout(LayoutCmd {
            round_up: Some(policy),
            ..
        }) => *policy,
        _ => base_config
            .parse_round_up()
            .map_err(|e| anyhow!("Invalid round_up in config: {}", e))?,
    };

    Ok(MergedConfig {
        flash_size,
        alignment,
        round_up,
        quiet: args.quiet || base_config.quiet,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HexString;

    #[test]
    fn cli_flags_override_config_file() {
        let args = Cli::parse_from([
            "parttool",
            "--flash-size",
            "8M",
            "layout",
            "table.csv",
            "--round-up",
            "never",
        ]);
        let mut config = PartToolConfig::with_defaults();
        config.flash_size = HexString("0x200000".to_string());
        config.alignment = HexString("0x10000".to_string());
        config.round_up = "always".to_string();

        let merged = merge_config(&args, Some(config)).unwrap();
        assert_eq!(merged.flash_size, 8 * 1024 * 1024);
        assert_eq!(merged.alignment, 0x10000);
        assert_eq!(merged.round_up, RoundUpPolicy::Never);
        assert!(!merged.quiet);
    }

    #[test]
    fn defaults_without_config_file() {
        let args = Cli::parse_from(["parttool", "show", "table.csv"]);
        let merged = merge_config(&args, None).unwrap();
        assert_eq!(
            merged,
            MergedConfig {
                flash_size: 0x400000,
                alignment: 0x1000,
                round_up: RoundUpPolicy::Ask,
                quiet: false,
            }
        );
    }

    #[test]
    fn command_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn set_accepts_field_names() {
        let args = Cli::parse_from(["parttool", "set", "t.csv", "nvs", "subtype", "ota_0"]);
        match args.command {
            Commands::Set(set) => {
                assert_eq!(set.field, Field::SubType);
                assert_eq!(set.value, "ota_0");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn config_flag_is_accepted_after_subcommand() {
        let args = Cli::parse_from(["parttool", "show", "t.csv", "-f", "cfg.json"]);
        assert_eq!(args.config.as_deref(), Some("cfg.json"));
    }

    #[test]
    fn bad_alignment_flag_is_rejected() {
        let args = Cli::parse_from(["parttool", "--alignment", "0x1800", "show", "t.csv"]);
        assert!(merge_config(&args, None).is_err());
    }
}

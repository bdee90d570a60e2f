use anyhow::{Context, Result, bail};
use parttool_lib::codegen::generate_c_table;
use parttool_lib::{
    AlignmentResolver, AlwaysRoundUp, COMMON_SUBTYPES, Field, NeverRoundUp, Partition,
    PartitionTable, RoundUpPolicy,
};
use std::io::IsTerminal;
use std::path::Path;

use crate::cli::{Add, Codegen, LayoutCmd, MergedConfig, NewTable, Remove, Set, Show, UsageCmd};
use crate::prompt::PromptResolver;
use crate::render;

/// Whether a command finished with unresolved layout conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Clean,
    Conflicts,
}

impl Outcome {
    /// Process exit status: 0 when clean, 2 when conflicts remain.
    pub fn exit_status(self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Conflicts => 2,
        }
    }
}

fn load(path: &str, config: &MergedConfig) -> Result<PartitionTable> {
    parttool_lib::load_table(path, config.flash_size, config.alignment)
        .with_context(|| format!("Failed to load partition table '{}'", path))
}

fn save(path: &str, table: &PartitionTable) -> Result<()> {
    parttool_lib::save_table(path, table)
        .with_context(|| format!("Failed to write partition table '{}'", path))
}

fn status(config: &MergedConfig, message: impl AsRef<str>) {
    if !config.quiet {
        println!("{}", message.as_ref());
    }
}

pub fn execute_new(params: &NewTable, config: &MergedConfig) -> Result<Outcome> {
    if Path::new(&params.file).exists() && !params.force {
        bail!("'{}' already exists, use --force to overwrite", params.file);
    }
    let table = PartitionTable::new(config.flash_size, config.alignment)?;
    save(&params.file, &table)?;
    status(config, format!("Created empty partition table {}", params.file));
    Ok(Outcome::Clean)
}

pub fn execute_show(params: &Show, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;
    let conflicts = table.layout(&mut NeverRoundUp)?;

    if params.json {
        #[derive(serde::Serialize)]
        struct ShowOutput<'a> {
            flash_size: u32,
            alignment: u32,
            partitions: &'a [Partition],
            conflicts: Vec<String>,
            usage: parttool_lib::Usage,
        }

        let output = ShowOutput {
            flash_size: table.flash_size(),
            alignment: table.alignment(),
            partitions: table.partitions(),
            conflicts: conflicts.iter().map(|c| c.to_string()).collect(),
            usage: table.usage(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render::render_table(table.partitions()));
        eprint!("{}", render::render_conflicts(&conflicts));
        status(config, table.usage().status_line());
    }

    Ok(outcome(conflicts.is_empty()))
}

pub fn execute_add(params: &Add, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;

    let mut partition = Partition::new_default();
    let edits = [
        (Field::Name, &params.name),
        (Field::Type, &params.kind),
        (Field::SubType, &params.subtype),
        (Field::Offset, &params.offset),
        (Field::Size, &params.size),
        (Field::Flags, &params.flags),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            partition
                .set_field(field, value, table.alignment())
                .with_context(|| format!("Invalid {} '{}'", field, value))?;
        }
    }

    if table.find(&partition.name).is_some() {
        tracing::warn!("a partition named {} already exists", partition.name);
    }

    let name = partition.name.clone();
    match params.at {
        Some(index) => table.insert(index, partition)?,
        None => table.add(partition),
    }
    save(&params.file, &table)?;
    status(config, format!("Added partition {}", name));
    Ok(Outcome::Clean)
}

pub fn execute_remove(params: &Remove, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;
    let index = table.resolve(&params.partition)?;
    let removed = table.remove(index)?;
    save(&params.file, &table)?;
    status(config, format!("Removed partition {}", removed.name));
    Ok(Outcome::Clean)
}

pub fn execute_set(params: &Set, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;
    let index = table.resolve(&params.partition)?;
    table
        .set_field(index, params.field, &params.value)
        .with_context(|| format!("Failed to set {} of '{}'", params.field, params.partition))?;
    save(&params.file, &table)?;
    status(
        config,
        format!("Updated {} of partition {}", params.field, table.partitions()[index].name),
    );
    Ok(Outcome::Clean)
}

pub fn execute_layout(params: &LayoutCmd, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;
    let mut resolver = make_resolver(config.round_up);
    let conflicts = table.layout(resolver.as_mut())?;

    let output = params.output.as_deref().unwrap_or(&params.file);
    save(output, &table)?;

    if !config.quiet {
        print!("{}", render::render_table(table.partitions()));
    }
    eprint!("{}", render::render_conflicts(&conflicts));
    status(config, table.usage().status_line());
    Ok(outcome(conflicts.is_empty()))
}

pub fn execute_usage(params: &UsageCmd, config: &MergedConfig) -> Result<Outcome> {
    let table = load(&params.file, config)?;
    print!(
        "{}",
        render::render_usage_chart(&table.usage(), &table.breakdown())
    );
    Ok(outcome(!table.usage().is_over()))
}

pub fn execute_codegen(params: &Codegen, config: &MergedConfig) -> Result<Outcome> {
    let mut table = load(&params.file, config)?;
    let conflicts = table.layout(&mut NeverRoundUp)?;
    eprint!("{}", render::render_conflicts(&conflicts));

    let code = generate_c_table(table.partitions())?;
    match &params.output {
        Some(path) => {
            std::fs::write(path, &code)
                .with_context(|| format!("Failed to write generated code to '{}'", path))?;
            status(config, format!("Wrote C table to {}", path));
        }
        None => print!("{}", code),
    }
    Ok(outcome(conflicts.is_empty()))
}

pub fn execute_subtypes() -> Result<Outcome> {
    for subtype in COMMON_SUBTYPES {
        println!("{}", subtype);
    }
    Ok(Outcome::Clean)
}

fn make_resolver(policy: RoundUpPolicy) -> Box<dyn AlignmentResolver> {
    match policy {
        RoundUpPolicy::Always => Box::new(AlwaysRoundUp),
        RoundUpPolicy::Never => Box::new(NeverRoundUp),
        RoundUpPolicy::Ask if std::io::stdin().is_terminal() => Box::new(PromptResolver::stdin()),
        RoundUpPolicy::Ask => {
            tracing::info!("stdin is not a terminal, keeping misaligned sizes");
            Box::new(NeverRoundUp)
        }
    }
}

fn outcome(clean: bool) -> Outcome {
    if clean {
        Outcome::Clean
    } else {
        Outcome::Conflicts
    }
}

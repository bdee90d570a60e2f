use crate::layout::{AlignmentResolver, Conflict, compute_offsets};
use crate::partition::{Field, Partition};
use crate::usage::{Share, Usage, breakdown};
use crate::utils::Utils;
use crate::{Error, Result};

pub const DEFAULT_FLASH_SIZE: u32 = 0x400000;
pub const DEFAULT_ALIGNMENT: u32 = 0x1000;

/// An ordered partition list together with the flash it lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTable {
    partitions: Vec<Partition>,
    flash_size: u32,
    alignment: u32,
}

impl Default for PartitionTable {
    fn default() -> Self {
        Self {
            partitions: Vec::new(),
            flash_size: DEFAULT_FLASH_SIZE,
            alignment: DEFAULT_ALIGNMENT,
        }
    }
}

impl PartitionTable {
    pub fn new(flash_size: u32, alignment: u32) -> Result<Self> {
        Utils::check_alignment(alignment)?;
        let mut table = Self {
            alignment,
            ..Self::default()
        };
        table.set_flash_size(flash_size)?;
        Ok(table)
    }

    pub fn with_partitions(mut self, partitions: Vec<Partition>) -> Self {
        self.partitions = partitions;
        self
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn flash_size(&self) -> u32 {
        self.flash_size
    }

    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    pub fn set_flash_size(&mut self, flash_size: u32) -> Result<()> {
        if flash_size == 0 {
            return Err(Error::invalid_input("flash size must not be zero"));
        }
        self.flash_size = flash_size;
        Ok(())
    }

    pub fn add(&mut self, partition: Partition) {
        tracing::debug!("adding partition {}", partition.name);
        self.partitions.push(partition);
    }

    pub fn add_default(&mut self) -> &Partition {
        self.add(Partition::new_default());
        &self.partitions[self.partitions.len() - 1]
    }

    pub fn insert(&mut self, index: usize, partition: Partition) -> Result<()> {
        if index > self.partitions.len() {
            return Err(Error::invalid_input(format!(
                "insert position {} is past the end of the table ({} partitions)",
                index,
                self.partitions.len()
            )));
        }
        self.partitions.insert(index, partition);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Partition> {
        self.check_index(index)?;
        let removed = self.partitions.remove(index);
        tracing::debug!("removed partition {}", removed.name);
        Ok(removed)
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.partitions.iter().position(|p| p.name == name)
    }

    /// Resolve a row reference given either as a zero-based index or as a
    /// partition name. Names win when a partition is literally named like a
    /// number.
    pub fn resolve(&self, reference: &str) -> Result<usize> {
        if let Some(index) = self.find(reference) {
            return Ok(index);
        }
        let index: usize = reference.trim().parse().map_err(|_| {
            Error::invalid_input(format!("no partition named '{}'", reference))
        })?;
        self.check_index(index)?;
        Ok(index)
    }

    pub fn set_field(&mut self, index: usize, field: Field, value: &str) -> Result<()> {
        self.check_index(index)?;
        self.partitions[index].set_field(field, value, self.alignment)
    }

    /// Run the layout pass and keep its result.
    ///
    /// The table is updated even when conflicts are reported, so the caller
    /// sees where every partition ended up.
    pub fn layout(&mut self, resolver: &mut dyn AlignmentResolver) -> Result<Vec<Conflict>> {
        let layout = compute_offsets(&self.partitions, self.flash_size, self.alignment, resolver)?;
        self.partitions = layout.partitions;
        Ok(layout.conflicts)
    }

    pub fn usage(&self) -> Usage {
        Usage::from_partitions(&self.partitions, self.flash_size)
    }

    pub fn breakdown(&self) -> Vec<Share> {
        breakdown(&self.partitions, self.flash_size)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.partitions.len() {
            return Err(Error::invalid_input(format!(
                "partition index {} out of range ({} partitions)",
                index,
                self.partitions.len()
            )));
        }
        Ok(())
    }
}

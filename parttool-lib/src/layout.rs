//! Offset assignment for a partition list.
//!
//! Partitions are placed in list order. A partition with an explicit offset
//! keeps it; the others are packed right after the previous partition,
//! rounded up to the alignment. Problems found along the way are returned as
//! [`Conflict`]s instead of aborting, so a caller can show all of them at
//! once.

use crate::partition::Partition;
use crate::utils::Utils;
use crate::{Error, Result};
use std::fmt;

/// Decides whether a misaligned partition size should be rounded up.
pub trait AlignmentResolver {
    /// Called once for each partition whose size is not a multiple of the
    /// alignment. Returning `true` replaces the size with `suggested`.
    fn round_up(&mut self, partition: &Partition, suggested: u32) -> bool;
}

/// Accept every suggested size.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysRoundUp;

impl AlignmentResolver for AlwaysRoundUp {
    fn round_up(&mut self, _partition: &Partition, _suggested: u32) -> bool {
        true
    }
}

/// Keep sizes as they are and report them as conflicts.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverRoundUp;

impl AlignmentResolver for NeverRoundUp {
    fn round_up(&mut self, _partition: &Partition, _suggested: u32) -> bool {
        false
    }
}

impl<F> AlignmentResolver for F
where
    F: FnMut(&Partition, u32) -> bool,
{
    fn round_up(&mut self, partition: &Partition, suggested: u32) -> bool {
        self(partition, suggested)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// An explicit offset starts before the end of the previous partition.
    Overlap {
        name: String,
        offset: u32,
        previous_end: u32,
    },
    /// An explicit offset is not a multiple of the alignment.
    MisalignedOffset { name: String, offset: u32 },
    /// A size that is not a multiple of the alignment was kept.
    MisalignedSize {
        name: String,
        size: u32,
        suggested: u32,
    },
    /// The last partition ends past the end of flash.
    Overflow {
        end: u32,
        flash_size: u32,
        excess: u32,
    },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::Overlap {
                name,
                offset,
                previous_end,
            } => write!(
                f,
                "{} offset {:#x} overlaps previous partition ending at {:#x}",
                name, offset, previous_end
            ),
            Conflict::MisalignedOffset { name, offset } => {
                write!(f, "{} offset {:#x} is not aligned", name, offset)
            }
            Conflict::MisalignedSize {
                name,
                size,
                suggested,
            } => write!(
                f,
                "{} size is not aligned ({:#x}), suggested {:#x}",
                name, size, suggested
            ),
            Conflict::Overflow {
                end,
                flash_size,
                excess,
            } => write!(
                f,
                "partitions end at {:#x} and exceed flash size {:#x} by {} ({:#x})",
                end,
                flash_size,
                Utils::format_kb(*excess as i64),
                excess
            ),
        }
    }
}

/// Result of [`compute_offsets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub partitions: Vec<Partition>,
    pub conflicts: Vec<Conflict>,
}

impl Layout {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Highest end address over all placed partitions.
    pub fn end(&self) -> u32 {
        self.partitions
            .iter()
            .filter_map(Partition::end)
            .max()
            .unwrap_or(0)
    }
}

/// Assign offsets to every partition and collect layout conflicts.
///
/// The input is not modified. `alignment` must be a non-zero power of two.
pub fn compute_offsets(
    partitions: &[Partition],
    flash_size: u32,
    alignment: u32,
    resolver: &mut dyn AlignmentResolver,
) -> Result<Layout> {
    Utils::check_alignment(alignment)?;

    let mut placed = Vec::with_capacity(partitions.len());
    let mut conflicts = Vec::new();
    let mut current_end: u32 = 0;

    for original in partitions {
        let mut part = original.clone();

        let offset = match part.offset {
            Some(offset) => {
                if offset % alignment != 0 {
                    conflicts.push(Conflict::MisalignedOffset {
                        name: part.name.clone(),
                        offset,
                    });
                }
                if offset < current_end {
                    tracing::debug!(
                        "{} at {:#x} overlaps running end {:#x}",
                        part.name,
                        offset,
                        current_end
                    );
                    conflicts.push(Conflict::Overlap {
                        name: part.name.clone(),
                        offset,
                        previous_end: current_end,
                    });
                }
                offset
            }
            None => {
                let offset = Utils::align_up(current_end, alignment)
                    .ok_or_else(|| overflow_error(&part.name))?;
                tracing::debug!("placing {} at {:#x}", part.name, offset);
                part.offset = Some(offset);
                offset
            }
        };

        if part.size % alignment != 0 {
            let suggested =
                Utils::align_up(part.size, alignment).ok_or_else(|| overflow_error(&part.name))?;
            if resolver.round_up(&part, suggested) {
                tracing::debug!(
                    "rounding {} size {:#x} up to {:#x}",
                    part.name,
                    part.size,
                    suggested
                );
                part.size = suggested;
            } else {
                conflicts.push(Conflict::MisalignedSize {
                    name: part.name.clone(),
                    size: part.size,
                    suggested,
                });
            }
        }

        let end = offset
            .checked_add(part.size)
            .ok_or_else(|| overflow_error(&part.name))?;
        current_end = current_end.max(end);
        placed.push(part);
    }

    if current_end > flash_size {
        conflicts.push(Conflict::Overflow {
            end: current_end,
            flash_size,
            excess: current_end - flash_size,
        });
    }

    Ok(Layout {
        partitions: placed,
        conflicts,
    })
}

fn overflow_error(name: &str) -> Error {
    Error::invalid_input(format!("partition '{}' extends past the 32-bit address space", name))
}

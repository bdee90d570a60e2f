use crate::partition::Partition;
use crate::utils::Utils;
use serde::Serialize;

/// Flash space accounting for a partition list.
///
/// `used` is the sum of partition sizes; gaps between partitions count as
/// free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub total: i64,
    pub used: i64,
    pub free: i64,
}

/// One slice of the usage breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub bytes: u32,
    pub percent: f64,
}

impl Usage {
    pub fn from_partitions(partitions: &[Partition], flash_size: u32) -> Self {
        let total = flash_size as i64;
        let used = partitions.iter().map(|p| p.size as i64).sum::<i64>();
        Self {
            total,
            used,
            free: total - used,
        }
    }

    pub fn is_over(&self) -> bool {
        self.used > self.total
    }

    pub fn status_line(&self) -> String {
        format!(
            "Total: {} ({}) | Used: {} ({}) | Free: {} ({})",
            Utils::format_kb(self.total),
            Utils::format_hex(self.total),
            Utils::format_kb(self.used),
            Utils::format_hex(self.used),
            Utils::format_kb(self.free),
            Utils::format_hex(self.free),
        )
    }

    /// Used and free percentages of the total, as drawn by the usage chart.
    ///
    /// Free space is clamped at zero when the table is over-committed.
    pub fn shares(&self) -> (f64, f64) {
        let free = self.free.max(0);
        let whole = (self.used + free) as f64;
        if whole == 0.0 {
            return (0.0, 0.0);
        }
        (
            self.used as f64 * 100.0 / whole,
            free as f64 * 100.0 / whole,
        )
    }
}

/// Per-partition share of the whole flash.
pub fn breakdown(partitions: &[Partition], flash_size: u32) -> Vec<Share> {
    partitions
        .iter()
        .map(|p| Share {
            label: p.name.clone(),
            bytes: p.size,
            percent: percent_of(p.size, flash_size),
        })
        .collect()
}

fn percent_of(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

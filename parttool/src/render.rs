//! 终端输出
//!
//! 以纯文本形式输出分区表、布局冲突以及空间占用图。

use parttool_lib::utils::Utils;
use parttool_lib::{Conflict, Partition, Share, Usage};
use std::fmt::Write;

const BAR_WIDTH: usize = 40;

pub fn render_table(partitions: &[Partition]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4} {:<16} {:<8} {:<10} {:<12} {:<12} {:>10}  {}",
        "#", "Name", "Type", "SubType", "Offset", "Size", "KB", "Flags"
    );
    for (index, p) in partitions.iter().enumerate() {
        let offset = p
            .offset
            .map(|o| format!("{:#x}", o))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<4} {:<16} {:<8} {:<10} {:<12} {:<12} {:>10}  {}",
            index,
            p.name,
            p.kind,
            p.subtype,
            offset,
            format!("{:#x}", p.size),
            Utils::format_kb(p.size as i64),
            p.flags
        );
    }
    out
}

pub fn render_conflicts(conflicts: &[Conflict]) -> String {
    let mut out = String::new();
    for conflict in conflicts {
        let _ = writeln!(out, "warning: {}", conflict);
    }
    out
}

pub fn render_usage_chart(usage: &Usage, shares: &[Share]) -> String {
    let (used_pct, free_pct) = usage.shares();
    let mut out = String::new();
    let _ = writeln!(out, "{}", usage.status_line());
    if usage.is_over() {
        let _ = writeln!(
            out,
            "over-committed by {} ({})",
            Utils::format_kb(-usage.free),
            Utils::format_hex(-usage.free)
        );
    }
    let _ = writeln!(out);

    let used_cells = cells(used_pct);
    let _ = writeln!(
        out,
        "[{}{}]",
        "#".repeat(used_cells),
        ".".repeat(BAR_WIDTH - used_cells)
    );
    let _ = writeln!(out, "Used {:>5.1}%   Free {:>5.1}%", used_pct, free_pct);

    if !shares.is_empty() {
        let _ = writeln!(out);
    }
    for share in shares {
        let _ = writeln!(
            out,
            "{:<16} {:<40} {:>5.1}% {:>10}",
            share.label,
            "#".repeat(cells(share.percent)),
            share.percent,
            Utils::format_kb(share.bytes as i64)
        );
    }
    out
}

fn cells(percent: f64) -> usize {
    let n = (percent / 100.0 * BAR_WIDTH as f64).round();
    (n.max(0.0) as usize).min(BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_cells_are_clamped() {
        assert_eq!(cells(0.0), 0);
        assert_eq!(cells(50.0), BAR_WIDTH / 2);
        assert_eq!(cells(250.0), BAR_WIDTH);
    }

    #[test]
    fn unplaced_partitions_show_dash() {
        let parts = vec![Partition::new_default()];
        let text = render_table(&parts);
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("new_part"));
        assert!(row.contains(" - "));
        assert!(row.contains("4.0KB"));
    }
}

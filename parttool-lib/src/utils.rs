use crate::{Error, Result};

pub const KB: u32 = 1024;

pub struct Utils;
impl Utils {
    /// Parse a size or offset as written in partition tables.
    ///
    /// A `0x` prefix is optional: bare digit strings are hexadecimal too, so
    /// a cell like `0b0000` means 0xB0000. A `K`/`M` suffix multiplies a
    /// decimal value by 1024 / 1024 * 1024.
    pub fn parse_number(s: &str) -> Result<u32> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::invalid_input("empty number"));
        }

        let (num_str, multiplier) = match s.chars().last() {
            Some('k') | Some('K') => (&s[..s.len() - 1], Some(KB)),
            Some('m') | Some('M') => (&s[..s.len() - 1], Some(KB * KB)),
            _ => (s, None),
        };

        if let Some(multiplier) = multiplier {
            let value: u32 = num_str.trim().parse()?;
            return value
                .checked_mul(multiplier)
                .ok_or_else(|| Error::invalid_input(format!("number '{}' overflows u32", s)));
        }

        let value = if let Some(hex) = num_str
            .strip_prefix("0x")
            .or_else(|| num_str.strip_prefix("0X"))
        {
            u32::from_str_radix(hex, 16)?
        } else {
            u32::from_str_radix(num_str, 16)?
        };

        Ok(value)
    }

    /// Round `value` up to the next multiple of `alignment`.
    pub fn align_up(value: u32, alignment: u32) -> Option<u32> {
        if alignment == 0 {
            return None;
        }
        match value % alignment {
            0 => Some(value),
            rem => value.checked_add(alignment - rem),
        }
    }

    pub fn check_alignment(alignment: u32) -> Result<()> {
        if alignment == 0 || !alignment.is_power_of_two() {
            return Err(Error::config(format!(
                "alignment must be a non-zero power of two, got {:#x}",
                alignment
            )));
        }
        Ok(())
    }

    pub fn format_kb(bytes: i64) -> String {
        format!("{:.1}KB", bytes as f64 / KB as f64)
    }

    /// Hex with the sign kept for over-committed space, e.g. `-0x3000`.
    pub fn format_hex(bytes: i64) -> String {
        if bytes < 0 {
            format!("-{:#x}", bytes.unsigned_abs())
        } else {
            format!("{:#x}", bytes)
        }
    }
}

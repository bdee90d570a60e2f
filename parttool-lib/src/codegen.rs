use crate::partition::Partition;
use crate::{Error, Result};
use std::fmt::Write;

const STRUCT_DEF: &str = "typedef struct {
    const char* name;
    uint32_t offset;
    uint32_t size;
} partition_entry_t;
";

/// Emit a C constant table describing the partitions.
///
/// Every partition must already have an offset; run the layout pass first.
pub fn generate_c_table(partitions: &[Partition]) -> Result<String> {
    let mut code = String::new();
    code.push_str(STRUCT_DEF);
    code.push('\n');
    code.push_str("static const partition_entry_t partitions[] = {\n");

    for p in partitions {
        let offset = p.offset.ok_or_else(|| {
            Error::invalid_input(format!("partition '{}' has no offset, run layout first", p.name))
        })?;
        // Writing into a String cannot fail.
        let _ = writeln!(
            code,
            "    {{\"{}\", 0x{:X}, 0x{:X}}},",
            escape_c(&p.name),
            offset,
            p.size
        );
    }

    code.push_str("    {NULL, 0, 0} // end marker\n};\n");
    Ok(code)
}

fn escape_c(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_in_names_are_escaped() {
        assert_eq!(escape_c(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}

//! A single row of the partition table. String columns are kept verbatim so
//! that tables using platform-specific types or subtypes survive an
//! import/export cycle untouched.

use crate::utils::Utils;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Subtypes offered as completion hints when editing the subtype column.
pub const COMMON_SUBTYPES: [&str; 7] = [
    "nvs", "ota", "ota_0", "ota_1", "littlefs", "phy", "factory",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub subtype: String,
    /// `None` until placed by the layout pass.
    pub offset: Option<u32>,
    pub size: u32,
    #[serde(default)]
    pub flags: String,
}

/// Editable columns of a partition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Field {
    Name,
    Type,
    #[strum(serialize = "subtype")]
    #[cfg_attr(feature = "cli", value(name = "subtype"))]
    SubType,
    Offset,
    Size,
    Flags,
}

impl Partition {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        subtype: impl Into<String>,
        offset: Option<u32>,
        size: u32,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            subtype: subtype.into(),
            offset,
            size,
            flags: String::new(),
        }
    }

    /// The row inserted by the "add partition" action.
    pub fn new_default() -> Self {
        Self::new("new_part", "data", "nvs", None, 0x1000)
    }

    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    /// End address (exclusive), if the partition has been placed.
    ///
    /// Returns `None` when the offset is unknown or the end does not fit
    /// in 32 bits.
    pub fn end(&self) -> Option<u32> {
        self.offset.and_then(|offset| offset.checked_add(self.size))
    }

    /// Edit one column from user-entered text.
    ///
    /// Offsets must be a multiple of `alignment`; an empty offset puts the
    /// partition back into automatic placement. On error the partition is
    /// left unchanged.
    pub fn set_field(&mut self, field: Field, value: &str, alignment: u32) -> Result<()> {
        let value = value.trim();
        match field {
            Field::Name => {
                if value.is_empty() {
                    return Err(Error::invalid_input("partition name must not be empty"));
                }
                self.name = value.to_string();
            }
            Field::Type => self.kind = value.to_string(),
            Field::SubType => self.subtype = value.to_string(),
            Field::Flags => self.flags = value.to_string(),
            Field::Offset => {
                if value.is_empty() {
                    self.offset = None;
                    return Ok(());
                }
                let offset = Utils::parse_number(value)?;
                if alignment != 0 && offset % alignment != 0 {
                    return Err(Error::invalid_input(format!(
                        "offset {:#x} of '{}' must be aligned to {:#x}",
                        offset, self.name, alignment
                    )));
                }
                self.offset = Some(offset);
            }
            Field::Size => {
                self.size = Utils::parse_number(value)?;
            }
        }
        Ok(())
    }
}

use parttool_lib::RoundUpPolicy;
use parttool_lib::utils::Utils;
use serde::{Deserialize, Serialize};

/// 应用程序的默认配置值
pub struct Defaults;

impl Defaults {
    pub const FLASH_SIZE: &'static str = "0x400000";
    pub const ALIGNMENT: &'static str = "0x1000";
    pub const ROUND_UP: &'static str = "ask";
}

/// 十六进制字符串，例如 "0x400000"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HexString(pub String);

impl HexString {
    pub fn to_u32(&self) -> Result<u32, String> {
        if !self.0.starts_with("0x") {
            return Err(format!("Invalid hex string format: {}", self.0));
        }

        let hex_part = &self.0[2..];
        u32::from_str_radix(hex_part, 16)
            .map_err(|e| format!("Failed to parse hex string '{}': {}", self.0, e))
    }
}

/// JSON 配置文件的根结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartToolConfig {
    #[serde(default = "default_flash_size")]
    pub flash_size: HexString,
    #[serde(default = "default_alignment")]
    pub alignment: HexString,
    #[serde(default = "default_round_up")]
    pub round_up: String,
    #[serde(default)]
    pub quiet: bool,
}

fn default_flash_size() -> HexString {
    HexString(Defaults::FLASH_SIZE.to_string())
}
fn default_alignment() -> HexString {
    HexString(Defaults::ALIGNMENT.to_string())
}
fn default_round_up() -> String {
    Defaults::ROUND_UP.to_string()
}

impl PartToolConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = std::fs::read_to_string(path)?;
        let config: PartToolConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 创建一个具有所有默认值的配置
    pub fn with_defaults() -> Self {
        Self {
            flash_size: default_flash_size(),
            alignment: default_alignment(),
            round_up: default_round_up(),
            quiet: false,
        }
    }

    pub fn parse_round_up(&self) -> Result<RoundUpPolicy, String> {
        self.round_up.parse().map_err(|e| format!("{}", e))
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), String> {
        let flash_size = self
            .flash_size
            .to_u32()
            .map_err(|e| format!("Invalid flash_size: {}", e))?;
        if flash_size == 0 {
            return Err("flash_size must not be zero".to_string());
        }

        let alignment = self
            .alignment
            .to_u32()
            .map_err(|e| format!("Invalid alignment: {}", e))?;
        Utils::check_alignment(alignment).map_err(|e| e.to_string())?;

        self.parse_round_up()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: PartToolConfig = serde_json::from_str(r#"{"flash_size": "0x800000"}"#).unwrap();
        assert_eq!(config.flash_size.to_u32().unwrap(), 0x800000);
        assert_eq!(config.alignment.to_u32().unwrap(), 0x1000);
        assert_eq!(config.parse_round_up().unwrap(), RoundUpPolicy::Ask);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = PartToolConfig::with_defaults();
        config.alignment = HexString("0x1800".to_string());
        assert!(config.validate().is_err());

        let mut config = PartToolConfig::with_defaults();
        config.flash_size = HexString("4096".to_string());
        assert!(config.validate().is_err());

        let mut config = PartToolConfig::with_defaults();
        config.round_up = "sometimes".to_string();
        assert!(config.validate().is_err());
    }
}

use parttool_lib::utils::Utils;

#[test]
fn test_parse_number_prefixes() {
    assert_eq!(Utils::parse_number("0x1000").unwrap(), 0x1000);
    assert_eq!(Utils::parse_number("0X1000").unwrap(), 0x1000);
    assert_eq!(Utils::parse_number("  0x9000 ").unwrap(), 0x9000);
}

#[test]
fn test_parse_number_bare_is_hex() {
    assert_eq!(Utils::parse_number("1000").unwrap(), 0x1000);
    assert_eq!(Utils::parse_number("ff").unwrap(), 0xFF);
    // no binary prefix: `0b` is just two hex digits
    assert_eq!(Utils::parse_number("0b1000").unwrap(), 0xB1000);
    assert_eq!(Utils::parse_number("0b9000").unwrap(), 0xB9000);
}

#[test]
fn test_parse_number_suffixes_are_binary_units() {
    assert_eq!(Utils::parse_number("4K").unwrap(), 4096);
    assert_eq!(Utils::parse_number("24k").unwrap(), 24 * 1024);
    assert_eq!(Utils::parse_number("1M").unwrap(), 0x100000);
    assert_eq!(Utils::parse_number("4m").unwrap(), 0x400000);
}

#[test]
fn test_parse_number_errors() {
    assert!(Utils::parse_number("").is_err());
    assert!(Utils::parse_number("0x").is_err());
    assert!(Utils::parse_number("zz").is_err());
    assert!(Utils::parse_number("0x100000000").is_err());
    assert!(Utils::parse_number("8192M").is_err());
}

#[test]
fn test_align_up() {
    assert_eq!(Utils::align_up(0, 0x1000), Some(0));
    assert_eq!(Utils::align_up(1, 0x1000), Some(0x1000));
    assert_eq!(Utils::align_up(0x1000, 0x1000), Some(0x1000));
    assert_eq!(Utils::align_up(0x1001, 0x1000), Some(0x2000));
    assert_eq!(Utils::align_up(u32::MAX, 0x1000), None);
    assert_eq!(Utils::align_up(5, 0), None);
}

#[test]
fn test_format_helpers() {
    assert_eq!(Utils::format_kb(0x1800), "6.0KB");
    assert_eq!(Utils::format_kb(512), "0.5KB");
    assert_eq!(Utils::format_hex(0x2f9000), "0x2f9000");
    assert_eq!(Utils::format_hex(-0x3000), "-0x3000");
}

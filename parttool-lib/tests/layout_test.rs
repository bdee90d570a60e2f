use parttool_lib::*;

fn part(name: &str, offset: Option<u32>, size: u32) -> Partition {
    Partition::new(name, "data", "nvs", offset, size)
}

#[test]
fn sequential_placement_is_aligned() {
    let parts = vec![
        part("nvs", Some(0x9000), 0x6000),
        part("phy_init", None, 0x1000),
        part("factory", Some(0x10000), 0x100000),
        part("storage", None, 0x800),
    ];

    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut NeverRoundUp).unwrap();

    let offsets: Vec<_> = layout.partitions.iter().map(|p| p.offset).collect();
    assert_eq!(
        offsets,
        vec![Some(0x9000), Some(0xF000), Some(0x10000), Some(0x110000)]
    );
    assert_eq!(
        layout.conflicts,
        vec![Conflict::MisalignedSize {
            name: "storage".to_string(),
            size: 0x800,
            suggested: 0x1000,
        }]
    );
    // input untouched
    assert_eq!(parts[1].offset, None);
}

#[test]
fn auto_offset_rounds_up_after_odd_end() {
    let parts = vec![part("a", None, 0x1801), part("b", None, 0x1000)];

    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut NeverRoundUp).unwrap();
    assert_eq!(layout.partitions[0].offset, Some(0));
    assert_eq!(layout.partitions[1].offset, Some(0x2000));
    assert_eq!(layout.conflicts.len(), 1);
}

#[test]
fn accepted_round_up_moves_following_partitions() {
    let parts = vec![part("a", None, 0x1801), part("b", None, 0x1000)];

    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut AlwaysRoundUp).unwrap();
    assert_eq!(layout.partitions[0].size, 0x2000);
    assert_eq!(layout.partitions[1].offset, Some(0x2000));
    assert!(layout.is_clean());
    assert_eq!(layout.end(), 0x3000);
}

#[test]
fn overlap_is_reported_and_pass_continues() {
    let parts = vec![
        part("first", Some(0x0), 0x4000),
        part("second", Some(0x2000), 0x1000),
        part("third", None, 0x1000),
    ];

    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut NeverRoundUp).unwrap();
    assert_eq!(
        layout.conflicts,
        vec![Conflict::Overlap {
            name: "second".to_string(),
            offset: 0x2000,
            previous_end: 0x4000,
        }]
    );
    // the running end never moves backwards
    assert_eq!(layout.partitions[2].offset, Some(0x4000));
}

#[test]
fn misaligned_explicit_offset_is_flagged() {
    let parts = vec![part("odd", Some(0x1800), 0x1000)];

    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut NeverRoundUp).unwrap();
    assert_eq!(
        layout.conflicts,
        vec![Conflict::MisalignedOffset {
            name: "odd".to_string(),
            offset: 0x1800,
        }]
    );
}

#[test]
fn overflow_reports_excess() {
    let parts = vec![part("app", None, 0x3000), part("data", None, 0x2000)];

    let layout = compute_offsets(&parts, 0x4000, 0x1000, &mut NeverRoundUp).unwrap();
    assert_eq!(
        layout.conflicts,
        vec![Conflict::Overflow {
            end: 0x5000,
            flash_size: 0x4000,
            excess: 0x1000,
        }]
    );
    assert_eq!(
        layout.conflicts[0].to_string(),
        "partitions end at 0x5000 and exceed flash size 0x4000 by 4.0KB (0x1000)"
    );
}

#[test]
fn exactly_full_flash_is_not_an_overflow() {
    let parts = vec![part("all", None, 0x4000)];
    let layout = compute_offsets(&parts, 0x4000, 0x1000, &mut NeverRoundUp).unwrap();
    assert!(layout.is_clean());
}

#[test]
fn zero_size_partitions_share_an_offset() {
    let parts = vec![part("empty", None, 0), part("next", None, 0x1000)];
    let layout = compute_offsets(&parts, 0x400000, 0x1000, &mut NeverRoundUp).unwrap();
    assert_eq!(layout.partitions[0].offset, Some(0));
    assert_eq!(layout.partitions[1].offset, Some(0));
    assert!(layout.is_clean());
}

#[test]
fn invalid_alignment_is_rejected() {
    let parts = vec![part("a", None, 0x1000)];
    assert!(compute_offsets(&parts, 0x400000, 0, &mut NeverRoundUp).is_err());
    assert!(compute_offsets(&parts, 0x400000, 0x1800, &mut NeverRoundUp).is_err());
}

#[test]
fn custom_alignment_is_honoured() {
    let parts = vec![part("a", None, 0x1000), part("b", None, 0x1000)];
    let layout = compute_offsets(&parts, 0x400000, 0x10000, &mut AlwaysRoundUp).unwrap();
    assert_eq!(layout.partitions[0].size, 0x10000);
    assert_eq!(layout.partitions[1].offset, Some(0x10000));
}

#[test]
fn empty_table_lays_out_cleanly() {
    let layout = compute_offsets(&[], 0x400000, 0x1000, &mut NeverRoundUp).unwrap();
    assert!(layout.partitions.is_empty());
    assert!(layout.is_clean());
    assert_eq!(layout.end(), 0);
}

// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use isp_pipeline::constants::{align_up, alignment, components, format};

#[test]
fn test_alignment_values() {
    assert_eq!(alignment::WIDTH, 32);
    assert_eq!(alignment::HEIGHT, 16);
}

#[test]
fn test_align_up_is_smallest_multiple() {
    for value in [1u32, 15, 16, 17, 31, 32, 33, 3265, 4096] {
        let w = align_up(value, alignment::WIDTH).unwrap();
        assert_eq!(w % alignment::WIDTH, 0);
        assert!(w >= value && w - value < alignment::WIDTH);

        let h = align_up(value, alignment::HEIGHT).unwrap();
        assert_eq!(h % alignment::HEIGHT, 0);
        assert!(h >= value && h - value < alignment::HEIGHT);
    }
}

#[test]
fn test_default_frame_size_needs_width_padding() {
    assert_eq!(align_up(format::WIDTH, alignment::WIDTH), Some(3296));
    assert_eq!(align_up(format::HEIGHT, alignment::HEIGHT), Some(format::HEIGHT));
}

#[test]
fn test_component_names_are_distinct() {
    assert_ne!(components::SOURCE, components::ISP);
    assert_ne!(components::ISP, components::RENDER);
    assert_ne!(components::SOURCE, components::RENDER);
}

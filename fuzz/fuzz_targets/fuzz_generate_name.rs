// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use caption_rename::naming::{generate_name, UNNAMED_STEM};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    caption: &'a str,
    max_length: u8,
}

fuzz_target!(|input: Input<'_>| {
    let max_length = usize::from(input.max_length.max(1));
    let stem = generate_name(input.caption, max_length);

    assert!(!stem.contains(['\\', '/', '*', '?', ':', '"', '<', '>', '|']));
    assert!(stem == UNNAMED_STEM || stem.chars().count() <= max_length);
    assert_eq!(stem, generate_name(input.caption, max_length));
});

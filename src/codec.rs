// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Order-preserving base-64 integer codec.
//!
//! Digits are taken from an alphabet whose ASCII order matches digit value, so two
//! encodings of the same width compare the same way as the integers they carry.

/// The digit alphabet, lowest digit first.
pub const ALPHABET: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

/// The lowest digit, used for left padding.
pub const PAD: u8 = ALPHABET[0];

const BASE: i64 = ALPHABET.len() as i64;

/// Reverse lookup table, `0xFF` marks bytes outside the alphabet.
const DIGIT_VALUES: [u8; 256] = {
    let mut table = [0xFF; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// Encode `value`, left-padded with [`PAD`] to at least `min_len` characters.
///
/// Zero renders as a single pad digit when `min_len` is 0. Negative values render as zero.
pub fn encode(value: i64, min_len: usize) -> String {
    // 11 digits hold any i64
    let mut digits = [PAD; 11];
    let mut pos = digits.len();
    let mut rest = value.max(0);
    loop {
        pos -= 1;
        digits[pos] = ALPHABET[(rest % BASE) as usize];
        rest /= BASE;
        if rest == 0 {
            break;
        }
    }

    let width = digits.len() - pos;
    let mut out = String::with_capacity(width.max(min_len));
    for _ in width..min_len {
        out.push(PAD as char);
    }
    out.extend(digits[pos..].iter().map(|&b| b as char));
    out
}

/// Decode a string produced by [`encode`].
///
/// Returns `None` if `s` holds a character outside the alphabet or the value does not fit in
/// an `i64`. The empty string decodes to 0.
pub fn decode(s: &str) -> Option<i64> {
    s.bytes().try_fold(0i64, |acc, b| {
        let digit = DIGIT_VALUES[b as usize];
        if digit == 0xFF {
            return None;
        }
        acc.checked_mul(BASE)?.checked_add(i64::from(digit))
    })
}

/// Width of `encode(value, 0)`.
pub fn encoded_len(value: i64) -> usize {
    let mut rest = value.max(0) / BASE;
    let mut len = 1;
    while rest > 0 {
        rest /= BASE;
        len += 1;
    }
    len
}

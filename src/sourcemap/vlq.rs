//! Base64 VLQ codec used by the `mappings` field of source maps.
//!
//! Each value is split into 5-bit groups, least significant first, with
//! the sign stored in the lowest bit of the first group and bit 6 marking
//! a continuation.

use thiserror::Error;

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_SHIFT: u32 = 5;
const VLQ_CONTINUATION: u8 = 0b10_0000;
const VLQ_MASK: u8 = 0b01_1111;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VlqError {
    #[error("invalid base64 character `{0}`")]
    InvalidChar(char),
    #[error("segment ends inside a value")]
    Truncated,
    #[error("value does not fit in 32 bits")]
    Overflow,
}

#[inline]
fn base64_value(byte: u8) -> Option<u8> {
    match byte {
        b'A'..=b'Z' => Some(byte - b'A'),
        b'a'..=b'z' => Some(byte - b'a' + 26),
        b'0'..=b'9' => Some(byte - b'0' + 52),
        b'+' => Some(62),
        b'/' => Some(63),
        _ => None,
    }
}

/// Decode every value of one comma-free segment.
pub fn decode_segment(segment: &str) -> Result<Vec<i64>, VlqError> {
    let mut values = Vec::with_capacity(5);
    let mut accum: u64 = 0;
    let mut shift: u32 = 0;

    for byte in segment.bytes() {
        let digit = base64_value(byte).ok_or(VlqError::InvalidChar(byte as char))?;
        if shift > 32 {
            return Err(VlqError::Overflow);
        }
        accum |= u64::from(digit & VLQ_MASK) << shift;

        if digit & VLQ_CONTINUATION != 0 {
            shift += VLQ_SHIFT;
            continue;
        }

        let magnitude = (accum >> 1) as i64;
        if magnitude > i64::from(i32::MAX) {
            return Err(VlqError::Overflow);
        }
        values.push(if accum & 1 == 1 { -magnitude } else { magnitude });
        accum = 0;
        shift = 0;
    }

    if shift != 0 {
        return Err(VlqError::Truncated);
    }
    Ok(values)
}

/// Append the VLQ encoding of `value` to `out`.
pub fn encode_value(value: i64, out: &mut String) {
    let mut vlq: u64 = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq & u64::from(VLQ_MASK)) as u8;
        vlq >>= VLQ_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION;
        }
        out.push(BASE64[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

//! Binary codec for instruction payloads.
//!
//! Two layouts are supported:
//! * padded head/tail encoding, where every value occupies 32-byte words and
//!   dynamic values are referenced from the head by byte offsets into the tail;
//! * packed encoding, a plain concatenation of minimal-width values used for swap paths.
//!
//! All methods err using `PlanError::SchemaMismatch` when a value does not fit its type tag.

use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigUint;

use crate::errors::PlanError;
use crate::types::{Address, ParamType, Token, ADDRESS_LEN};

/// Size of a single slot in the padded layout.
pub const WORD_SIZE: usize = 32;

/// Encodes a list of values with the padded head/tail layout,
/// treating the list as one top-level tuple.
pub fn encode(params: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, PlanError> {
    let mut buf = Vec::new();
    encode_tuple(params.iter().zip(tokens.iter()), params.len(), tokens.len(), &mut buf)?;
    Ok(buf)
}

/// Encodes a list of values with the packed layout: no padding, no offsets, no length prefixes.
/// Only fixed-width types can be packed.
pub fn encode_packed(params: &[ParamType], tokens: &[Token]) -> Result<Vec<u8>, PlanError> {
    if params.len() != tokens.len() {
        return Err(arity_mismatch(params.len(), tokens.len()));
    }
    let mut buf = Vec::new();
    for (param, token) in params.iter().zip(tokens.iter()) {
        match (param, token) {
            (ParamType::Address, Token::Address(a)) => write_bytes(a.as_bytes(), &mut buf),
            (ParamType::Uint(bits), Token::Uint(n)) => write_uint_packed(n, *bits, &mut buf)?,
            (ParamType::Bool, Token::Bool(b)) => write_u8(*b as u8, &mut buf),
            (param, token) => return Err(PlanError::mismatch(param, token.kind())),
        }
    }
    Ok(buf)
}

fn arity_mismatch(expected: usize, found: usize) -> PlanError {
    PlanError::SchemaMismatch {
        expected: format!("{} values", expected),
        found: format!("{} values", found),
    }
}

// Lays out a sequence of (type, value) pairs as head followed by tail.
// Offsets are relative to the first byte written by this call.
fn encode_tuple<'a, I>(
    pairs: I,
    param_count: usize,
    token_count: usize,
    target: &mut Vec<u8>,
) -> Result<(), PlanError>
where
    I: Iterator<Item = (&'a ParamType, &'a Token)> + Clone,
{
    if param_count != token_count {
        return Err(arity_mismatch(param_count, token_count));
    }
    let head_len: usize = pairs.clone().map(|(p, _)| p.head_size()).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (param, token) in pairs {
        if param.is_dynamic() {
            write_usize(head_len + tail.len(), &mut head);
            encode_value(param, token, &mut tail)?;
        } else {
            encode_value(param, token, &mut head)?;
        }
    }
    target.extend_from_slice(&head);
    target.extend_from_slice(&tail);
    Ok(())
}

fn encode_value(param: &ParamType, token: &Token, target: &mut Vec<u8>) -> Result<(), PlanError> {
    match (param, token) {
        (ParamType::Address, Token::Address(a)) => {
            write_address(a, target);
            Ok(())
        }
        (ParamType::Uint(bits), Token::Uint(n)) => write_uint(n, *bits, target),
        (ParamType::Bool, Token::Bool(b)) => {
            write_usize(*b as usize, target);
            Ok(())
        }
        (ParamType::Bytes, Token::Bytes(bytes)) => {
            write_usize(bytes.len(), target);
            write_padded_bytes(bytes, target);
            Ok(())
        }
        (ParamType::Array(inner), Token::Array(items)) => {
            write_usize(items.len(), target);
            let pairs = core::iter::repeat(inner.as_ref()).zip(items.iter());
            encode_tuple(pairs, items.len(), items.len(), target)
        }
        (ParamType::Tuple(members), Token::Tuple(values)) => {
            encode_tuple(members.iter().zip(values.iter()), members.len(), values.len(), target)
        }
        (param, token) => Err(PlanError::mismatch(param, token.kind())),
    }
}

fn check_width(n: &BigUint, bits: usize) -> Result<(), PlanError> {
    if bits == 0 || bits > 256 || bits % 8 != 0 || n.bits() as usize > bits {
        return Err(PlanError::EncodingOverflow { bits });
    }
    Ok(())
}

// Writing API
// Everything is appended to a Vec; words are big-endian and right-aligned.

/// Writes a single byte
pub(crate) fn write_u8(x: u8, target: &mut Vec<u8>) {
    target.push(x);
}

/// Writes raw bytes as-is
pub(crate) fn write_bytes(x: &[u8], target: &mut Vec<u8>) {
    target.extend_from_slice(x);
}

/// Writes a word holding a big-endian integer
pub(crate) fn write_usize(x: usize, target: &mut Vec<u8>) {
    let mut buf = [0u8; WORD_SIZE];
    BigEndian::write_u64(&mut buf[WORD_SIZE - 8..], x as u64);
    target.extend_from_slice(&buf);
}

/// Writes an address right-aligned in a word
pub(crate) fn write_address(a: &Address, target: &mut Vec<u8>) {
    target.extend_from_slice(&[0u8; WORD_SIZE - ADDRESS_LEN]);
    target.extend_from_slice(a.as_bytes());
}

/// Writes an unsigned integer right-aligned in a word, checking the declared width
pub(crate) fn write_uint(n: &BigUint, bits: usize, target: &mut Vec<u8>) -> Result<(), PlanError> {
    check_width(n, bits)?;
    let bytes = n.to_bytes_be();
    let significant = if n.bits() == 0 { &[][..] } else { &bytes[..] };
    target.extend(core::iter::repeat(0u8).take(WORD_SIZE - significant.len()));
    target.extend_from_slice(significant);
    Ok(())
}

/// Writes an unsigned integer using exactly `bits / 8` big-endian bytes
pub(crate) fn write_uint_packed(
    n: &BigUint,
    bits: usize,
    target: &mut Vec<u8>,
) -> Result<(), PlanError> {
    check_width(n, bits)?;
    let bytes = n.to_bytes_be();
    let significant = if n.bits() == 0 { &[][..] } else { &bytes[..] };
    target.extend(core::iter::repeat(0u8).take(bits / 8 - significant.len()));
    target.extend_from_slice(significant);
    Ok(())
}

/// Writes bytes followed by zeroes up to the next word boundary
pub(crate) fn write_padded_bytes(x: &[u8], target: &mut Vec<u8>) {
    target.extend_from_slice(x);
    let rem = x.len() % WORD_SIZE;
    if rem != 0 {
        target.extend(core::iter::repeat(0u8).take(WORD_SIZE - rem));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(hex_str: &str) -> String {
        format!("{:0>64}", hex_str)
    }

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn static_values_fill_one_word_each() {
        let enc = encode(
            &[ParamType::Address, ParamType::Uint(256), ParamType::Bool],
            &[
                addr("0x0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e").into(),
                1234u64.into(),
                true.into(),
            ],
        )
        .unwrap();
        let expected = [
            word("0bc529c00c6401aef6d220be8c6ea1667f6ad93e"),
            word("4d2"),
            word("1"),
        ]
        .concat();
        assert_eq!(hex::encode(enc), expected);
    }

    #[test]
    fn bytes_go_to_tail_with_padding() {
        let enc = encode(
            &[ParamType::Uint(256), ParamType::Bytes],
            &[7u64.into(), vec![0xabu8, 0xcd, 0xef].into()],
        )
        .unwrap();
        let expected = [
            word("7"),
            word("40"),
            word("3"),
            format!("{:0<64}", "abcdef"),
        ]
        .concat();
        assert_eq!(hex::encode(enc), expected);
    }

    #[test]
    fn empty_bytes_has_no_content_words() {
        let enc = encode(&[ParamType::Bytes], &[Vec::<u8>::new().into()]).unwrap();
        assert_eq!(hex::encode(enc), [word("20"), word("0")].concat());
    }

    #[test]
    fn address_array_has_no_nested_tail() {
        let a = addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
        let b = addr("0x0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e");
        let enc = encode(
            &[ParamType::Array(Box::new(ParamType::Address))],
            &[Token::Array(vec![a.into(), b.into()])],
        )
        .unwrap();
        let expected = [
            word("20"),
            word("2"),
            word("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
            word("0bc529c00c6401aef6d220be8c6ea1667f6ad93e"),
        ]
        .concat();
        assert_eq!(hex::encode(enc), expected);
    }

    #[test]
    fn bytes_array_offsets_are_relative_to_elements() {
        let enc = encode(
            &[ParamType::Array(Box::new(ParamType::Bytes))],
            &[Token::Array(vec![vec![0x11u8].into(), Vec::<u8>::new().into()])],
        )
        .unwrap();
        let expected = [
            word("20"),
            word("2"),
            // offsets counted from the first element slot
            word("40"),
            word("80"),
            word("1"),
            format!("{:0<64}", "11"),
            word("0"),
        ]
        .concat();
        assert_eq!(hex::encode(enc), expected);
    }

    #[test]
    fn static_tuple_is_inlined() {
        let tuple = ParamType::Tuple(vec![ParamType::Uint(8), ParamType::Bool]);
        let enc = encode(
            &[tuple, ParamType::Bytes],
            &[Token::Tuple(vec![5u64.into(), false.into()]), vec![0x01u8].into()],
        )
        .unwrap();
        let expected = [
            word("5"),
            word("0"),
            word("60"),
            word("1"),
            format!("{:0<64}", "01"),
        ]
        .concat();
        assert_eq!(hex::encode(enc), expected);
    }

    #[test]
    fn overflow_and_mismatch() {
        assert_eq!(
            encode(&[ParamType::Uint(8)], &[256u64.into()]),
            Err(PlanError::EncodingOverflow { bits: 8 })
        );
        assert!(encode(&[ParamType::Uint(8)], &[255u64.into()]).is_ok());
        assert_eq!(
            encode(&[ParamType::Address], &[true.into()]),
            Err(PlanError::SchemaMismatch {
                expected: "address".to_string(),
                found: "bool".to_string()
            })
        );
        assert!(encode(&[ParamType::Address, ParamType::Bool], &[true.into()]).is_err());
    }

    #[test]
    fn packed_path() {
        let enc = encode_packed(
            &[ParamType::Address, ParamType::Uint(24), ParamType::Address],
            &[
                addr("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").into(),
                10000u64.into(),
                addr("0x0bc529c00C6401aEF6D220BE8C6Ea1667F6Ad93e").into(),
            ],
        )
        .unwrap();
        assert_eq!(enc.len(), 43);
        assert_eq!(
            hex::encode(enc),
            "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc20027100bc529c00c6401aef6d220be8c6ea1667f6ad93e"
        );
        assert_eq!(
            encode_packed(&[ParamType::Uint(24)], &[0x0100_0000u64.into()]),
            Err(PlanError::EncodingOverflow { bits: 24 })
        );
    }
}

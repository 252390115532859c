//! Core value types: addresses, type tags and codec tokens.

use core::fmt;
use core::str::FromStr;
use num_bigint::BigUint;

use crate::errors::PlanError;

/// Length of an account address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; ADDRESS_LEN]);

/// Type tag describing how a value is laid out by the codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte address, right-aligned in a word.
    Address,
    /// Unsigned integer of the given bit width (a multiple of 8, at most 256).
    Uint(usize),
    /// Boolean encoded as a word holding 0 or 1.
    Bool,
    /// Dynamic byte string.
    Bytes,
    /// Dynamic-length sequence of elements of one type.
    Array(Box<ParamType>),
    /// Anonymous record of heterogeneous members.
    Tuple(Vec<ParamType>),
}

/// A value ready to be laid out by the codec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Address value.
    Address(Address),
    /// Unsigned integer value; the width comes from the type tag.
    Uint(BigUint),
    /// Boolean value.
    Bool(bool),
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Sequence of values.
    Array(Vec<Token>),
    /// Record of values.
    Tuple(Vec<Token>),
}

impl Address {
    /// Creates an address from a 20-byte slice.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PlanError> {
        if bytes.len() != ADDRESS_LEN {
            return Err(PlanError::InvalidAddress(format!("0x{}", hex::encode(bytes))));
        }
        let mut buf = [0u8; ADDRESS_LEN];
        buf.copy_from_slice(bytes);
        Ok(Address(buf))
    }

    /// Parses a case-insensitive hex string, with or without the `0x` prefix.
    pub fn parse(s: &str) -> Result<Self, PlanError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| PlanError::InvalidAddress(s.to_string()))?;
        if bytes.len() != ADDRESS_LEN {
            return Err(PlanError::InvalidAddress(s.to_string()));
        }
        Address::from_slice(&bytes)
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl ParamType {
    /// Returns true if values of this type live in the tail region.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Address | ParamType::Uint(_) | ParamType::Bool => false,
            ParamType::Bytes | ParamType::Array(_) => true,
            ParamType::Tuple(members) => members.iter().any(|m| m.is_dynamic()),
        }
    }

    /// Number of bytes the type occupies in the head region of its enclosing tuple.
    /// Dynamic types occupy a single offset word; static tuples are laid out inline.
    pub fn head_size(&self) -> usize {
        match self {
            ParamType::Tuple(members) if !self.is_dynamic() => {
                members.iter().map(|m| m.head_size()).sum()
            }
            _ => 32,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::Tuple(members) => {
                write!(f, "(")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", m)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Token {
    /// Short description of the value kind, used in error messages.
    pub(crate) fn kind(&self) -> String {
        match self {
            Token::Address(_) => "address".to_string(),
            Token::Uint(_) => "uint".to_string(),
            Token::Bool(_) => "bool".to_string(),
            Token::Bytes(b) => format!("bytes of length {}", b.len()),
            Token::Array(items) => format!("array of {} items", items.len()),
            Token::Tuple(items) => format!("tuple of {} members", items.len()),
        }
    }
}

impl From<Address> for Token {
    fn from(a: Address) -> Self {
        Token::Address(a)
    }
}

impl From<BigUint> for Token {
    fn from(n: BigUint) -> Self {
        Token::Uint(n)
    }
}

impl From<u64> for Token {
    fn from(n: u64) -> Self {
        Token::Uint(BigUint::from(n))
    }
}

impl From<bool> for Token {
    fn from(b: bool) -> Self {
        Token::Bool(b)
    }
}

impl From<Vec<u8>> for Token {
    fn from(bytes: Vec<u8>) -> Self {
        Token::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_address_any_case() {
        let a = Address::parse("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let b = Address::parse("F39FD6E51AAD88F6F4CE6AB8827279CFFFB92266").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266");
    }

    #[test]
    fn reject_short_address() {
        assert_eq!(
            Address::parse("0x1234"),
            Err(PlanError::InvalidAddress("0x1234".to_string()))
        );
        assert!(Address::parse("0xzz9Fd6e51aad88F6F4ce6aB8827279cffFb92266").is_err());
    }

    #[test]
    fn static_and_dynamic_types() {
        let details = ParamType::Tuple(vec![
            ParamType::Address,
            ParamType::Uint(160),
            ParamType::Uint(48),
            ParamType::Uint(48),
        ]);
        let single = ParamType::Tuple(vec![details.clone(), ParamType::Address, ParamType::Uint(256)]);
        assert!(!single.is_dynamic());
        assert_eq!(single.head_size(), 6 * 32);

        let batch = ParamType::Tuple(vec![
            ParamType::Array(Box::new(details)),
            ParamType::Address,
            ParamType::Uint(256),
        ]);
        assert!(batch.is_dynamic());
        assert_eq!(batch.head_size(), 32);
        assert_eq!(
            batch.to_string(),
            "((address,uint160,uint48,uint48)[],address,uint256)"
        );
    }
}

//! Loosely typed instruction arguments and the reader that checks them
//! against an opcode's parameter row.

use num_bigint::{BigInt, BigUint, Sign};

use crate::errors::PlanError;
use crate::ops::Opcode;
use crate::path::{PathElement, SwapPath, FEE_BITS};
use crate::types::Address;

/// One positional argument of an instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    /// Hex-encoded address, case-insensitive, with or without `0x`.
    Str(String),
    /// Already decoded address.
    Address(Address),
    /// Arbitrary-precision integer.
    Int(BigInt),
    /// Boolean flag.
    Bool(bool),
    /// Raw byte string.
    Bytes(Vec<u8>),
    /// Ordered sequence of arguments.
    List(Vec<Arg>),
    /// Nested record, members in declaration order.
    Tuple(Vec<Arg>),
}

/// Reads a positional argument list, one parameter at a time.
/// Any argument of the wrong kind, a missing argument or a left-over argument
/// fails with `PlanError::UnknownInstruction` for the opcode being read.
#[derive(Debug)]
pub(crate) struct ArgReader {
    opcode: Opcode,
    args: std::vec::IntoIter<Arg>,
}

impl ArgReader {
    /// Runs `parse_fn` over the arguments and checks that all of them were consumed.
    pub fn parse<F, T>(opcode: Opcode, args: Vec<Arg>, parse_fn: F) -> Result<T, PlanError>
    where
        F: FnOnce(&mut Self) -> Result<T, PlanError>,
    {
        let mut reader = ArgReader {
            opcode,
            args: args.into_iter(),
        };
        let result = parse_fn(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(reader.unknown());
        }
        Ok(result)
    }

    pub fn remaining(&self) -> usize {
        self.args.len()
    }

    fn unknown(&self) -> PlanError {
        PlanError::UnknownInstruction {
            opcode: self.opcode,
        }
    }

    fn next(&mut self) -> Result<Arg, PlanError> {
        let opcode = self.opcode;
        self.args
            .next()
            .ok_or(PlanError::UnknownInstruction { opcode })
    }

    pub fn read_address(&mut self) -> Result<Address, PlanError> {
        match self.next()? {
            Arg::Str(s) => Address::parse(&s),
            Arg::Address(a) => Ok(a),
            _ => Err(self.unknown()),
        }
    }

    /// Reads a non-negative integer that fits into `bits` bits.
    pub fn read_uint(&mut self, bits: usize) -> Result<BigUint, PlanError> {
        match self.next()? {
            Arg::Int(n) => to_unsigned(n, bits),
            _ => Err(self.unknown()),
        }
    }

    /// Reads an integer of at most 64 bits.
    pub fn read_u64(&mut self, bits: usize) -> Result<u64, PlanError> {
        let n = self.read_uint(bits.min(64))?;
        Ok(n.to_u64_digits().first().copied().unwrap_or(0))
    }

    pub fn read_u8(&mut self) -> Result<u8, PlanError> {
        Ok(self.read_u64(8)? as u8)
    }

    pub fn read_bool(&mut self) -> Result<bool, PlanError> {
        match self.next()? {
            Arg::Bool(b) => Ok(b),
            _ => Err(self.unknown()),
        }
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, PlanError> {
        match self.next()? {
            Arg::Bytes(b) => Ok(b),
            _ => Err(self.unknown()),
        }
    }

    /// Reads a list argument, parsing each element with `item_fn`.
    pub fn read_list<F, T>(&mut self, mut item_fn: F) -> Result<Vec<T>, PlanError>
    where
        F: FnMut(&mut Self) -> Result<T, PlanError>,
    {
        match self.next()? {
            Arg::List(items) => ArgReader::parse(self.opcode, items, |r| {
                let mut result = Vec::with_capacity(r.remaining());
                while r.remaining() > 0 {
                    result.push(item_fn(r)?);
                }
                Ok(result)
            }),
            _ => Err(self.unknown()),
        }
    }

    /// Reads a nested record, parsing its members with `parse_fn`.
    pub fn read_tuple<F, T>(&mut self, parse_fn: F) -> Result<T, PlanError>
    where
        F: FnOnce(&mut Self) -> Result<T, PlanError>,
    {
        match self.next()? {
            Arg::Tuple(members) => ArgReader::parse(self.opcode, members, parse_fn),
            _ => Err(self.unknown()),
        }
    }

    /// Reads a swap path given either as packed bytes or as an alternating
    /// list of token addresses and fee tiers.
    pub fn read_path(&mut self) -> Result<SwapPath, PlanError> {
        match self.next()? {
            Arg::Bytes(bytes) => Ok(SwapPath::Packed(bytes)),
            Arg::List(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    let element = match item {
                        Arg::Str(s) => PathElement::Token(Address::parse(&s)?),
                        Arg::Address(a) => PathElement::Token(a),
                        Arg::Int(n) => {
                            let fee = to_unsigned(n, FEE_BITS)?;
                            PathElement::Fee(fee.to_u32_digits().first().copied().unwrap_or(0))
                        }
                        _ => return Err(self.unknown()),
                    };
                    elements.push(element);
                }
                SwapPath::from_elements(&elements)
            }
            _ => Err(self.unknown()),
        }
    }
}

fn to_unsigned(n: BigInt, bits: usize) -> Result<BigUint, PlanError> {
    if n.sign() == Sign::Minus || n.magnitude().bits() as usize > bits {
        return Err(PlanError::EncodingOverflow { bits });
    }
    Ok(n.magnitude().clone())
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<Address> for Arg {
    fn from(a: Address) -> Self {
        Arg::Address(a)
    }
}

impl From<BigInt> for Arg {
    fn from(n: BigInt) -> Self {
        Arg::Int(n)
    }
}

impl From<BigUint> for Arg {
    fn from(n: BigUint) -> Self {
        Arg::Int(BigInt::from(n))
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Arg {
                fn from(n: $t) -> Self {
                    Arg::Int(BigInt::from(n))
                }
            }
        )*
    };
}

from_int!(i32, i64, u32, u64, u128);

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<Vec<u8>> for Arg {
    fn from(bytes: Vec<u8>) -> Self {
        Arg::Bytes(bytes)
    }
}

impl From<&[u8]> for Arg {
    fn from(bytes: &[u8]) -> Self {
        Arg::Bytes(bytes.to_vec())
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Arg::List(items)
    }
}

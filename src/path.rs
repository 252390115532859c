//! Swap paths for concentrated-liquidity pools.
//!
//! A path is either structured (`token, fee, token, fee, ..., token`)
//! or already packed into `20 + 23 * hops` bytes.

use crate::encoding;
use crate::errors::PlanError;
use crate::types::{Address, ParamType, Token, ADDRESS_LEN};

/// Width of a pool fee tier in bits.
pub const FEE_BITS: usize = 24;

/// Largest fee tier that fits the packed layout.
pub const MAX_FEE: u32 = (1 << FEE_BITS) - 1;

/// One element of a structured path as supplied by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathElement {
    /// Token address.
    Token(Address),
    /// Pool fee tier between the surrounding tokens.
    Fee(u32),
}

/// A swap path, structured or pre-packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapPath {
    /// Starting token and a list of `(fee, next token)` hops.
    Structured {
        /// First token of the path.
        first: Address,
        /// Pools to route through, in order.
        hops: Vec<(u32, Address)>,
    },
    /// Path bytes packed by the caller; passed through unchanged.
    Packed(Vec<u8>),
}

impl SwapPath {
    /// Creates a structured path from a starting token.
    pub fn new(first: Address) -> Self {
        SwapPath::Structured {
            first,
            hops: Vec::new(),
        }
    }

    /// Appends a hop to a structured path. Packed paths are left unchanged.
    pub fn hop(mut self, fee: u32, token: Address) -> Self {
        if let SwapPath::Structured { hops, .. } = &mut self {
            hops.push((fee, token));
        }
        self
    }

    /// Builds a structured path from an alternating list of tokens and fees.
    pub fn from_elements(elements: &[PathElement]) -> Result<Self, PlanError> {
        let mut iter = elements.iter();
        let first = match iter.next() {
            Some(PathElement::Token(a)) => *a,
            Some(PathElement::Fee(_)) => {
                return Err(PlanError::InvalidPath("path must start with a token".into()))
            }
            None => return Err(PlanError::InvalidPath("path is empty".into())),
        };
        let mut hops = Vec::with_capacity(elements.len() / 2);
        while let Some(element) = iter.next() {
            let fee = match element {
                PathElement::Fee(fee) => *fee,
                PathElement::Token(_) => {
                    return Err(PlanError::InvalidPath("expected a fee between tokens".into()))
                }
            };
            match iter.next() {
                Some(PathElement::Token(a)) => hops.push((fee, *a)),
                Some(PathElement::Fee(_)) => {
                    return Err(PlanError::InvalidPath("expected a token after a fee".into()))
                }
                None => return Err(PlanError::InvalidPath("path must end with a token".into())),
            }
        }
        Ok(SwapPath::Structured { first, hops })
    }

    /// Returns the packed representation of the path.
    pub fn to_packed(&self) -> Result<Vec<u8>, PlanError> {
        match self {
            SwapPath::Packed(bytes) => Ok(bytes.clone()),
            SwapPath::Structured { first, hops } => {
                let mut params = Vec::with_capacity(1 + 2 * hops.len());
                let mut tokens = Vec::with_capacity(1 + 2 * hops.len());
                params.push(ParamType::Address);
                tokens.push(Token::Address(*first));
                for (fee, token) in hops {
                    params.push(ParamType::Uint(FEE_BITS));
                    tokens.push(Token::from(u64::from(*fee)));
                    params.push(ParamType::Address);
                    tokens.push(Token::Address(*token));
                }
                encoding::encode_packed(&params, &tokens)
            }
        }
    }

    /// Returns the length of the packed representation.
    pub fn packed_length(&self) -> usize {
        match self {
            SwapPath::Packed(bytes) => bytes.len(),
            SwapPath::Structured { hops, .. } => ADDRESS_LEN + hops.len() * (3 + ADDRESS_LEN),
        }
    }
}

impl From<Vec<u8>> for SwapPath {
    fn from(bytes: Vec<u8>) -> Self {
        SwapPath::Packed(bytes)
    }
}

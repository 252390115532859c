//! Allowance records for the Permit2 signature-transfer contract.
//! Signatures are produced elsewhere; these types only carry the signed data.

use num_bigint::BigUint;

use crate::args::ArgReader;
use crate::errors::PlanError;
use crate::types::{Address, ParamType, Token};

/// Allowance granted for a single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermitDetails {
    /// Token the allowance applies to.
    pub token: Address,
    /// Maximum amount (uint160).
    pub amount: BigUint,
    /// Timestamp at which the allowance expires (uint48).
    pub expiration: u64,
    /// Per-token nonce (uint48).
    pub nonce: u64,
}

/// Signed permit for a single token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermitSingle {
    /// Allowance details.
    pub details: PermitDetails,
    /// Address allowed to spend.
    pub spender: Address,
    /// Deadline for the signature.
    pub sig_deadline: BigUint,
}

/// Signed permit for several tokens at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PermitBatch {
    /// Allowance details per token.
    pub details: Vec<PermitDetails>,
    /// Address allowed to spend.
    pub spender: Address,
    /// Deadline for the signature.
    pub sig_deadline: BigUint,
}

/// One transfer out of a batch of allowance transfers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowanceTransferDetails {
    /// Owner of the tokens.
    pub from: Address,
    /// Recipient of the tokens.
    pub to: Address,
    /// Amount to transfer (uint160).
    pub amount: BigUint,
    /// Token to transfer.
    pub token: Address,
}

impl PermitDetails {
    pub(crate) fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Address,
            ParamType::Uint(160),
            ParamType::Uint(48),
            ParamType::Uint(48),
        ])
    }

    pub(crate) fn to_token(&self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.token),
            Token::Uint(self.amount.clone()),
            Token::from(self.expiration),
            Token::from(self.nonce),
        ])
    }

    // (token, amount, expiration, nonce)
    pub(crate) fn read(r: &mut ArgReader) -> Result<Self, PlanError> {
        r.read_tuple(|r| {
            Ok(PermitDetails {
                token: r.read_address()?,
                amount: r.read_uint(160)?,
                expiration: r.read_u64(48)?,
                nonce: r.read_u64(48)?,
            })
        })
    }
}

impl PermitSingle {
    pub(crate) fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            PermitDetails::param_type(),
            ParamType::Address,
            ParamType::Uint(256),
        ])
    }

    pub(crate) fn to_token(&self) -> Token {
        Token::Tuple(vec![
            self.details.to_token(),
            Token::Address(self.spender),
            Token::Uint(self.sig_deadline.clone()),
        ])
    }

    // ((token, amount, expiration, nonce), spender, sigDeadline)
    pub(crate) fn read(r: &mut ArgReader) -> Result<Self, PlanError> {
        r.read_tuple(|r| {
            Ok(PermitSingle {
                details: PermitDetails::read(r)?,
                spender: r.read_address()?,
                sig_deadline: r.read_uint(256)?,
            })
        })
    }
}

impl PermitBatch {
    pub(crate) fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Array(Box::new(PermitDetails::param_type())),
            ParamType::Address,
            ParamType::Uint(256),
        ])
    }

    pub(crate) fn to_token(&self) -> Token {
        Token::Tuple(vec![
            Token::Array(self.details.iter().map(|d| d.to_token()).collect()),
            Token::Address(self.spender),
            Token::Uint(self.sig_deadline.clone()),
        ])
    }

    // ([(token, amount, expiration, nonce), ...], spender, sigDeadline)
    pub(crate) fn read(r: &mut ArgReader) -> Result<Self, PlanError> {
        r.read_tuple(|r| {
            Ok(PermitBatch {
                details: r.read_list(PermitDetails::read)?,
                spender: r.read_address()?,
                sig_deadline: r.read_uint(256)?,
            })
        })
    }
}

impl AllowanceTransferDetails {
    pub(crate) fn param_type() -> ParamType {
        ParamType::Tuple(vec![
            ParamType::Address,
            ParamType::Address,
            ParamType::Uint(160),
            ParamType::Address,
        ])
    }

    pub(crate) fn to_token(&self) -> Token {
        Token::Tuple(vec![
            Token::Address(self.from),
            Token::Address(self.to),
            Token::Uint(self.amount.clone()),
            Token::Address(self.token),
        ])
    }

    // (from, to, amount, token)
    pub(crate) fn read(r: &mut ArgReader) -> Result<Self, PlanError> {
        r.read_tuple(|r| {
            Ok(AllowanceTransferDetails {
                from: r.read_address()?,
                to: r.read_address()?,
                amount: r.read_uint(160)?,
                token: r.read_address()?,
            })
        })
    }
}

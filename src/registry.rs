//! Opcode schema registry: the typed parameter record of every opcode family,
//! its type tags, and the dispatch from loosely typed arguments to a typed `Instruction`.

use core::fmt;
use num_bigint::BigUint;

use crate::args::{Arg, ArgReader};
use crate::debug::FmtArg;
use crate::encoding;
use crate::errors::PlanError;
use crate::ops::Opcode;
use crate::path::SwapPath;
use crate::permit::{AllowanceTransferDetails, PermitBatch, PermitSingle};
use crate::types::{Address, ParamType, Token};

/// Parameter record of an opcode family.
pub(crate) trait Params: Sized {
    /// Type tags handed to the codec, in declaration order.
    fn param_types() -> Vec<ParamType>;

    /// Values handed to the codec, in declaration order.
    fn tokens(&self) -> Result<Vec<Token>, PlanError>;

    /// Reads the record from positional arguments.
    fn read(r: &mut ArgReader) -> Result<Self, PlanError>;

    fn encode(&self) -> Result<Vec<u8>, PlanError> {
        encoding::encode(&Self::param_types(), &self.tokens()?)
    }
}

macro_rules! field_type {
    (address) => { Address };
    (uint8) => { u8 };
    (uint160) => { BigUint };
    (uint256) => { BigUint };
    (bool) => { bool };
    (bytes) => { Vec<u8> };
    (path) => { SwapPath };
    (addresses) => { Vec<Address> };
    (bytes_list) => { Vec<Vec<u8>> };
    (permit_single) => { PermitSingle };
    (permit_batch) => { PermitBatch };
    (transfer_details) => { Vec<AllowanceTransferDetails> };
}

macro_rules! param_type {
    (address) => { ParamType::Address };
    (uint8) => { ParamType::Uint(8) };
    (uint160) => { ParamType::Uint(160) };
    (uint256) => { ParamType::Uint(256) };
    (bool) => { ParamType::Bool };
    (bytes) => { ParamType::Bytes };
    (path) => { ParamType::Bytes };
    (addresses) => { ParamType::Array(Box::new(ParamType::Address)) };
    (bytes_list) => { ParamType::Array(Box::new(ParamType::Bytes)) };
    (permit_single) => { PermitSingle::param_type() };
    (permit_batch) => { PermitBatch::param_type() };
    (transfer_details) => { ParamType::Array(Box::new(AllowanceTransferDetails::param_type())) };
}

macro_rules! to_token {
    (address, $v:expr) => { Token::Address(*$v) };
    (uint8, $v:expr) => { Token::from(u64::from(*$v)) };
    (uint160, $v:expr) => { Token::Uint($v.clone()) };
    (uint256, $v:expr) => { Token::Uint($v.clone()) };
    (bool, $v:expr) => { Token::Bool(*$v) };
    (bytes, $v:expr) => { Token::Bytes($v.clone()) };
    (path, $v:expr) => { Token::Bytes($v.to_packed()?) };
    (addresses, $v:expr) => { Token::Array($v.iter().map(|a| Token::Address(*a)).collect()) };
    (bytes_list, $v:expr) => { Token::Array($v.iter().map(|b| Token::Bytes(b.clone())).collect()) };
    (permit_single, $v:expr) => { $v.to_token() };
    (permit_batch, $v:expr) => { $v.to_token() };
    (transfer_details, $v:expr) => { Token::Array($v.iter().map(|d| d.to_token()).collect()) };
}

macro_rules! read_arg {
    ($r:ident, address) => { $r.read_address()? };
    ($r:ident, uint8) => { $r.read_u8()? };
    ($r:ident, uint160) => { $r.read_uint(160)? };
    ($r:ident, uint256) => { $r.read_uint(256)? };
    ($r:ident, bool) => { $r.read_bool()? };
    ($r:ident, bytes) => { $r.read_bytes()? };
    ($r:ident, path) => { $r.read_path()? };
    ($r:ident, addresses) => { $r.read_list(|r| r.read_address())? };
    ($r:ident, bytes_list) => { $r.read_list(|r| r.read_bytes())? };
    ($r:ident, permit_single) => { PermitSingle::read($r)? };
    ($r:ident, permit_batch) => { PermitBatch::read($r)? };
    ($r:ident, transfer_details) => { $r.read_list(AllowanceTransferDetails::read)? };
}

macro_rules! def_params {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$fmeta:meta])* $field:ident : $kind:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: field_type!($kind), )*
        }

        impl Params for $name {
            fn param_types() -> Vec<ParamType> {
                vec![$( param_type!($kind) ),*]
            }

            fn tokens(&self) -> Result<Vec<Token>, PlanError> {
                Ok(vec![$( to_token!($kind, &self.$field) ),*])
            }

            fn read(r: &mut ArgReader) -> Result<Self, PlanError> {
                Ok($name {
                    $( $field: read_arg!(r, $kind), )*
                })
            }
        }

        impl $name {
            /// Names of the fields in declaration order.
            pub const FIELDS: &'static [&'static str] = &[$( stringify!($field) ),*];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let fields = [$( (stringify!($field), &self.$field as &dyn FmtArg) ),*];
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}=", name)?;
                    value.fmt_arg(f)?;
                }
                Ok(())
            }
        }
    };
}

def_params! {
    /// Swap through concentrated-liquidity pools.
    V3Swap {
        /// Receiver of the output tokens.
        recipient: address,
        /// Exact input (or output) amount.
        amount: uint256,
        /// Minimum output (or maximum input) amount.
        amount_limit: uint256,
        /// Pools to route through.
        path: path,
        /// Whether the tokens come from the caller or from the router.
        payer_is_user: bool,
    }
}

def_params! {
    /// Swap through constant-product pools.
    V2Swap {
        /// Receiver of the output tokens.
        recipient: address,
        /// Exact input (or output) amount.
        amount: uint256,
        /// Minimum output (or maximum input) amount.
        amount_limit: uint256,
        /// Tokens to route through.
        path: addresses,
        /// Whether the tokens come from the caller or from the router.
        payer_is_user: bool,
    }
}

def_params! {
    /// Transfer through an existing Permit2 allowance.
    Permit2TransferFrom {
        /// Token to transfer.
        token: address,
        /// Receiver.
        recipient: address,
        /// Amount (uint160).
        amount: uint160,
    }
}

def_params! {
    /// Permit2 allowance for one token with its signature.
    Permit2Permit {
        /// Signed permit.
        permit: permit_single,
        /// Signature over the permit.
        signature: bytes,
    }
}

def_params! {
    /// Permit2 allowance for several tokens with its signature.
    Permit2PermitBatch {
        /// Signed permit.
        permit: permit_batch,
        /// Signature over the permit.
        signature: bytes,
    }
}

def_params! {
    /// Batch of transfers through existing Permit2 allowances.
    Permit2TransferFromBatch {
        /// Transfers to perform.
        transfers: transfer_details,
    }
}

def_params! {
    /// Moves router-held tokens: sweep (minimum amount), transfer (amount) or pay a portion (bips).
    TokenTransfer {
        /// Token to move.
        token: address,
        /// Receiver.
        recipient: address,
        /// Amount, minimum amount or basis points depending on the opcode.
        value: uint256,
    }
}

def_params! {
    /// Wraps ether or unwraps wrapped ether.
    WrapEth {
        /// Receiver.
        recipient: address,
        /// Amount to wrap, or minimum amount to unwrap.
        amount: uint256,
    }
}

def_params! {
    /// Checks that an owner holds at least some token balance.
    BalanceCheck {
        /// Account to check.
        owner: address,
        /// Token to check.
        token: address,
        /// Required balance.
        min_balance: uint256,
    }
}

def_params! {
    /// Call into an NFT marketplace with an opaque, pre-encoded order.
    MarketCall {
        /// Ether value forwarded with the call.
        value: uint256,
        /// Marketplace call data.
        data: bytes,
    }
}

def_params! {
    /// Purchase of a CryptoPunk.
    PunkPurchase {
        /// Punk index.
        punk_id: uint256,
        /// Receiver.
        recipient: address,
        /// Ether value forwarded with the call.
        value: uint256,
    }
}

def_params! {
    /// Checks ownership of an ERC-721 token.
    OwnerCheck721 {
        /// Expected owner.
        owner: address,
        /// Token contract.
        token: address,
        /// Token id.
        id: uint256,
    }
}

def_params! {
    /// Checks an ERC-1155 balance.
    OwnerCheck1155 {
        /// Expected owner.
        owner: address,
        /// Token contract.
        token: address,
        /// Token id.
        id: uint256,
        /// Required balance.
        min_balance: uint256,
    }
}

def_params! {
    /// Sweeps an ERC-721 token held by the router.
    NftSweep {
        /// Token contract.
        token: address,
        /// Receiver.
        recipient: address,
        /// Token id.
        id: uint256,
    }
}

def_params! {
    /// Marketplace purchase of an ERC-721 token delivered to a recipient.
    NftPurchase {
        /// Ether value forwarded with the call.
        value: uint256,
        /// Marketplace call data.
        data: bytes,
        /// Receiver.
        recipient: address,
        /// Token contract.
        token: address,
        /// Token id.
        id: uint256,
    }
}

def_params! {
    /// Marketplace purchase of ERC-1155 tokens delivered to a recipient.
    Nft1155Purchase {
        /// Ether value forwarded with the call.
        value: uint256,
        /// Marketplace call data.
        data: bytes,
        /// Receiver.
        recipient: address,
        /// Token contract.
        token: address,
        /// Token id.
        id: uint256,
        /// Number of tokens.
        amount: uint256,
    }
}

def_params! {
    /// Sweeps ERC-1155 tokens held by the router.
    Erc1155Sweep {
        /// Token contract.
        token: address,
        /// Receiver.
        recipient: address,
        /// Token id.
        id: uint256,
        /// Number of tokens.
        amount: uint256,
    }
}

def_params! {
    /// A nested plan: its command bytes and encoded inputs.
    SubPlan {
        /// One command byte per nested instruction.
        commands: bytes,
        /// Encoded arguments per nested instruction.
        inputs: bytes_list,
    }
}

def_params! {
    /// Approves a well-known spender for a token held by the router.
    Approval {
        /// Token to approve.
        token: address,
        /// Index of the spender in the dispatcher's spender table.
        spender: uint8,
    }
}

macro_rules! def_instructions {
    ($( $variant:ident($family:ident) ),* $(,)?) => {
        /// A decoded instruction: the opcode and its typed parameters.
        #[derive(Clone, Debug, PartialEq, Eq)]
        #[allow(missing_docs)]
        pub enum Instruction {
            $( $variant($family), )*
        }

        impl Instruction {
            /// Returns the opcode of the instruction.
            pub fn opcode(&self) -> Opcode {
                match self {
                    $( Instruction::$variant(_) => Opcode::$variant, )*
                }
            }

            /// Encodes the instruction arguments with the padded head/tail layout.
            pub fn encode(&self) -> Result<Vec<u8>, PlanError> {
                match self {
                    $( Instruction::$variant(params) => params.encode(), )*
                }
            }

            /// Checks positional arguments against the opcode's row and builds the instruction.
            pub fn from_args(opcode: Opcode, args: Vec<Arg>) -> Result<Self, PlanError> {
                match opcode {
                    $( Opcode::$variant => {
                        ArgReader::parse(opcode, args, $family::read).map(Instruction::$variant)
                    } )*
                }
            }

            pub(crate) fn params(&self) -> &dyn fmt::Display {
                match self {
                    $( Instruction::$variant(params) => params, )*
                }
            }

            /// Field names of the instruction's parameter record.
            pub fn field_names(&self) -> &'static [&'static str] {
                match self {
                    $( Instruction::$variant(_) => $family::FIELDS, )*
                }
            }
        }

        /// Returns the type tags the codec uses for the opcode's arguments.
        pub fn schema(opcode: Opcode) -> Vec<ParamType> {
            match opcode {
                $( Opcode::$variant => $family::param_types(), )*
            }
        }
    };
}

def_instructions! {
    V3SwapExactIn(V3Swap),
    V3SwapExactOut(V3Swap),
    Permit2TransferFrom(Permit2TransferFrom),
    Permit2PermitBatch(Permit2PermitBatch),
    Sweep(TokenTransfer),
    Transfer(TokenTransfer),
    PayPortion(TokenTransfer),
    V2SwapExactIn(V2Swap),
    V2SwapExactOut(V2Swap),
    Permit2Permit(Permit2Permit),
    WrapEth(WrapEth),
    UnwrapWeth(WrapEth),
    Permit2TransferFromBatch(Permit2TransferFromBatch),
    BalanceCheckErc20(BalanceCheck),
    SeaportV1_5(MarketCall),
    LooksRareV2(MarketCall),
    Nftx(MarketCall),
    Cryptopunks(PunkPurchase),
    OwnerCheck721(OwnerCheck721),
    OwnerCheck1155(OwnerCheck1155),
    SweepErc721(NftSweep),
    X2y2_721(NftPurchase),
    Sudoswap(MarketCall),
    Nft20(MarketCall),
    X2y2_1155(Nft1155Purchase),
    Foundation(NftPurchase),
    SweepErc1155(Erc1155Sweep),
    ElementMarket(MarketCall),
    SeaportV1_4(MarketCall),
    ExecuteSubPlan(SubPlan),
    ApproveErc20(Approval),
}

#![deny(missing_docs)]
//! Planner for universal-router command streams.
//!
//! A `Plan` collects typed instructions, validates each one as it is added,
//! and builds the pair the on-chain dispatcher consumes: one command byte per
//! instruction and the list of ABI-encoded argument tuples.

mod args;
mod debug;
mod encoding;
mod errors;
mod ops;
mod path;
mod permit;
mod plan;
mod registry;
mod serialization;
mod types;


pub use self::args::Arg;
pub use self::encoding::{encode, encode_packed, WORD_SIZE};
pub use self::errors::PlanError;
pub use self::ops::{Opcode, ALLOW_REVERT_FLAG, ALL_OPCODES, COMMAND_TYPE_MASK};
pub use self::path::{PathElement, SwapPath, FEE_BITS, MAX_FEE};
pub use self::permit::{AllowanceTransferDetails, PermitBatch, PermitDetails, PermitSingle};
pub use self::plan::{Command, EncodedPlan, Plan};
pub use self::registry::{
    schema, Approval, BalanceCheck, Erc1155Sweep, Instruction, MarketCall, Nft1155Purchase,
    NftPurchase, NftSweep, OwnerCheck1155, OwnerCheck721, Permit2Permit, Permit2PermitBatch,
    Permit2TransferFrom, Permit2TransferFromBatch, PunkPurchase, SubPlan, TokenTransfer, V2Swap,
    V3Swap, WrapEth,
};
pub use self::types::{Address, ParamType, Token, ADDRESS_LEN};

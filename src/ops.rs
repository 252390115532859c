//! Definition of all router opcodes,
//! their codes and command-byte utility functions.

use core::fmt;
use core::str::FromStr;

use crate::errors::PlanError;

/// Bit set in a command byte when the dispatcher may continue after the command fails.
pub const ALLOW_REVERT_FLAG: u8 = 0x80;

/// Bits of a command byte that carry the instruction type.
pub const COMMAND_TYPE_MASK: u8 = 0x3f;

/// A bytecode representation of the instruction kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    V3SwapExactIn = 0x00,
    V3SwapExactOut = 0x01,
    Permit2TransferFrom = 0x02,
    Permit2PermitBatch = 0x03,
    Sweep = 0x04,
    Transfer = 0x05,
    PayPortion = 0x06,
    // 0x07 is a placeholder
    V2SwapExactIn = 0x08,
    V2SwapExactOut = 0x09,
    Permit2Permit = 0x0a,
    WrapEth = 0x0b,
    UnwrapWeth = 0x0c,
    Permit2TransferFromBatch = 0x0d,
    BalanceCheckErc20 = 0x0e,
    // 0x0f is a placeholder
    SeaportV1_5 = 0x10,
    LooksRareV2 = 0x11,
    Nftx = 0x12,
    Cryptopunks = 0x13,
    // 0x14 is unused
    OwnerCheck721 = 0x15,
    OwnerCheck1155 = 0x16,
    SweepErc721 = 0x17,
    X2y2_721 = 0x18,
    Sudoswap = 0x19,
    Nft20 = 0x1a,
    X2y2_1155 = 0x1b,
    Foundation = 0x1c,
    SweepErc1155 = 0x1d,
    ElementMarket = 0x1e,
    // 0x1f is a placeholder
    SeaportV1_4 = 0x20,
    ExecuteSubPlan = 0x21,
    ApproveErc20 = MAX_OPCODE,
}

const MAX_OPCODE: u8 = 0x22;

/// Every assigned opcode in ascending order.
pub const ALL_OPCODES: [Opcode; 31] = [
    Opcode::V3SwapExactIn,
    Opcode::V3SwapExactOut,
    Opcode::Permit2TransferFrom,
    Opcode::Permit2PermitBatch,
    Opcode::Sweep,
    Opcode::Transfer,
    Opcode::PayPortion,
    Opcode::V2SwapExactIn,
    Opcode::V2SwapExactOut,
    Opcode::Permit2Permit,
    Opcode::WrapEth,
    Opcode::UnwrapWeth,
    Opcode::Permit2TransferFromBatch,
    Opcode::BalanceCheckErc20,
    Opcode::SeaportV1_5,
    Opcode::LooksRareV2,
    Opcode::Nftx,
    Opcode::Cryptopunks,
    Opcode::OwnerCheck721,
    Opcode::OwnerCheck1155,
    Opcode::SweepErc721,
    Opcode::X2y2_721,
    Opcode::Sudoswap,
    Opcode::Nft20,
    Opcode::X2y2_1155,
    Opcode::Foundation,
    Opcode::SweepErc1155,
    Opcode::ElementMarket,
    Opcode::SeaportV1_4,
    Opcode::ExecuteSubPlan,
    Opcode::ApproveErc20,
];

impl Opcode {
    /// Converts the opcode to `u8`.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Instantiates the opcode from `u8`.
    /// Unassigned code is mapped to `None`.
    pub fn from_u8(code: u8) -> Option<Opcode> {
        if code > MAX_OPCODE {
            return None;
        }
        ALL_OPCODES.iter().copied().find(|op| op.to_u8() == code)
    }

    /// Splits a command byte into its opcode and the allow-revert flag.
    /// Bit 6 is reserved and must be clear.
    pub fn from_command_byte(byte: u8) -> Result<(Opcode, bool), PlanError> {
        if byte & !(COMMAND_TYPE_MASK | ALLOW_REVERT_FLAG) != 0 {
            return Err(PlanError::InvalidOpcode(byte));
        }
        let opcode = Opcode::from_u8(byte & COMMAND_TYPE_MASK).ok_or(PlanError::InvalidOpcode(byte))?;
        Ok((opcode, byte & ALLOW_REVERT_FLAG != 0))
    }

    /// Returns the command byte for this opcode, with the flag bit set if `allow_revert`.
    pub fn command_byte(self, allow_revert: bool) -> u8 {
        if allow_revert {
            self.to_u8() | ALLOW_REVERT_FLAG
        } else {
            self.to_u8()
        }
    }

    /// Returns true if the dispatcher lets this command fail without aborting the plan.
    pub fn is_revertible(self) -> bool {
        match self {
            Opcode::SeaportV1_5
            | Opcode::SeaportV1_4
            | Opcode::LooksRareV2
            | Opcode::Nftx
            | Opcode::Cryptopunks
            | Opcode::X2y2_721
            | Opcode::X2y2_1155
            | Opcode::Foundation
            | Opcode::Sudoswap
            | Opcode::Nft20
            | Opcode::ElementMarket
            | Opcode::ExecuteSubPlan => true,
            _ => false,
        }
    }

    /// Canonical upper-case name of the opcode.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::V3SwapExactIn => "V3_SWAP_EXACT_IN",
            Opcode::V3SwapExactOut => "V3_SWAP_EXACT_OUT",
            Opcode::Permit2TransferFrom => "PERMIT2_TRANSFER_FROM",
            Opcode::Permit2PermitBatch => "PERMIT2_PERMIT_BATCH",
            Opcode::Sweep => "SWEEP",
            Opcode::Transfer => "TRANSFER",
            Opcode::PayPortion => "PAY_PORTION",
            Opcode::V2SwapExactIn => "V2_SWAP_EXACT_IN",
            Opcode::V2SwapExactOut => "V2_SWAP_EXACT_OUT",
            Opcode::Permit2Permit => "PERMIT2_PERMIT",
            Opcode::WrapEth => "WRAP_ETH",
            Opcode::UnwrapWeth => "UNWRAP_WETH",
            Opcode::Permit2TransferFromBatch => "PERMIT2_TRANSFER_FROM_BATCH",
            Opcode::BalanceCheckErc20 => "BALANCE_CHECK_ERC20",
            Opcode::SeaportV1_5 => "SEAPORT_V1_5",
            Opcode::LooksRareV2 => "LOOKS_RARE_V2",
            Opcode::Nftx => "NFTX",
            Opcode::Cryptopunks => "CRYPTOPUNKS",
            Opcode::OwnerCheck721 => "OWNER_CHECK_721",
            Opcode::OwnerCheck1155 => "OWNER_CHECK_1155",
            Opcode::SweepErc721 => "SWEEP_ERC721",
            Opcode::X2y2_721 => "X2Y2_721",
            Opcode::Sudoswap => "SUDOSWAP",
            Opcode::Nft20 => "NFT20",
            Opcode::X2y2_1155 => "X2Y2_1155",
            Opcode::Foundation => "FOUNDATION",
            Opcode::SweepErc1155 => "SWEEP_ERC1155",
            Opcode::ElementMarket => "ELEMENT_MARKET",
            Opcode::SeaportV1_4 => "SEAPORT_V1_4",
            Opcode::ExecuteSubPlan => "EXECUTE_SUB_PLAN",
            Opcode::ApproveErc20 => "APPROVE_ERC20",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Opcode {
    type Err = PlanError;

    /// Parses the canonical name, e.g. `"WRAP_ETH"`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPCODES
            .iter()
            .copied()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PlanError::UnknownOpcodeName(s.to_string()))
    }
}

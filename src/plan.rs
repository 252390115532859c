use log::{debug, trace};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::args::Arg;
use crate::errors::PlanError;
use crate::ops::Opcode;
use crate::path::SwapPath;
use crate::permit::{AllowanceTransferDetails, PermitBatch, PermitSingle};
use crate::registry::*;
use crate::serialization::{hex_bytes, hex_bytes_list};
use crate::types::Address;

/// A builder type for assembling an ordered sequence of router commands with chained method calls.
/// E.g. `plan.wrap_eth(router, amount)?.v3_swap_exact_in(...)?.build()?`.
#[derive(Clone, Default)]
pub struct Plan(Vec<Command>);

/// An instruction accepted into a plan, together with its allow-revert flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    instruction: Instruction,
    allow_revert: bool,
}

/// The serialized plan: one command byte per instruction and the parallel list of encoded inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedPlan {
    /// Command bytes, flag bit included.
    #[serde(with = "hex_bytes")]
    pub commands: Vec<u8>,
    /// Encoded arguments, in the same order as `commands`.
    #[serde(with = "hex_bytes_list")]
    pub inputs: Vec<Vec<u8>>,
}

macro_rules! def_op {
    (revertible $func_name:ident, $op:ident, $family:ident { $($field:ident : $type:ty),* }) => (
        #[doc = concat!("Adds a `", stringify!($func_name), "` instruction, optionally allowed to revert.")]
        pub fn $func_name(
            &mut self,
            $($field: impl Into<$type>,)*
            allow_revert: bool,
        ) -> Result<&mut Plan, PlanError> {
            self.push(Instruction::$op($family { $($field: $field.into()),* }), allow_revert)
        }
    );
    ($func_name:ident, $op:ident, $family:ident { $($field:ident : $type:ty),* }) => (
        #[doc = concat!("Adds a `", stringify!($func_name), "` instruction.")]
        pub fn $func_name(&mut self, $($field: impl Into<$type>),*) -> Result<&mut Plan, PlanError> {
            self.push(Instruction::$op($family { $($field: $field.into()),* }), false)
        }
    );
}

impl Command {
    /// Checks the allow-revert policy and the encodability of the instruction.
    pub fn new(instruction: Instruction, allow_revert: bool) -> Result<Self, PlanError> {
        let opcode = instruction.opcode();
        if allow_revert && !opcode.is_revertible() {
            return Err(PlanError::RevertNotAllowed { opcode });
        }
        instruction.encode()?;
        Ok(Command {
            instruction,
            allow_revert,
        })
    }

    /// Returns the typed instruction.
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Returns true if the dispatcher may continue when this command fails.
    pub fn allow_revert(&self) -> bool {
        self.allow_revert
    }

    /// Returns the opcode with the flag bit applied.
    pub fn command_byte(&self) -> u8 {
        self.instruction.opcode().command_byte(self.allow_revert)
    }

    /// Encodes the instruction arguments.
    pub fn encode(&self) -> Result<Vec<u8>, PlanError> {
        self.instruction.encode()
    }
}

impl Plan {
    def_op!(v3_swap_exact_in, V3SwapExactIn, V3Swap {
        recipient: Address, amount: BigUint, amount_limit: BigUint, path: SwapPath, payer_is_user: bool
    });
    def_op!(v3_swap_exact_out, V3SwapExactOut, V3Swap {
        recipient: Address, amount: BigUint, amount_limit: BigUint, path: SwapPath, payer_is_user: bool
    });
    def_op!(permit2_transfer_from, Permit2TransferFrom, Permit2TransferFrom {
        token: Address, recipient: Address, amount: BigUint
    });
    def_op!(permit2_permit_batch, Permit2PermitBatch, Permit2PermitBatch {
        permit: PermitBatch, signature: Vec<u8>
    });
    def_op!(sweep, Sweep, TokenTransfer { token: Address, recipient: Address, value: BigUint });
    def_op!(transfer, Transfer, TokenTransfer { token: Address, recipient: Address, value: BigUint });
    def_op!(pay_portion, PayPortion, TokenTransfer { token: Address, recipient: Address, value: BigUint });
    def_op!(v2_swap_exact_in, V2SwapExactIn, V2Swap {
        recipient: Address, amount: BigUint, amount_limit: BigUint, path: Vec<Address>, payer_is_user: bool
    });
    def_op!(v2_swap_exact_out, V2SwapExactOut, V2Swap {
        recipient: Address, amount: BigUint, amount_limit: BigUint, path: Vec<Address>, payer_is_user: bool
    });
    def_op!(permit2_permit, Permit2Permit, Permit2Permit { permit: PermitSingle, signature: Vec<u8> });
    def_op!(wrap_eth, WrapEth, WrapEth { recipient: Address, amount: BigUint });
    def_op!(unwrap_weth, UnwrapWeth, WrapEth { recipient: Address, amount: BigUint });
    def_op!(permit2_transfer_from_batch, Permit2TransferFromBatch, Permit2TransferFromBatch {
        transfers: Vec<AllowanceTransferDetails>
    });
    def_op!(balance_check_erc20, BalanceCheckErc20, BalanceCheck {
        owner: Address, token: Address, min_balance: BigUint
    });
    def_op!(revertible seaport_v1_5, SeaportV1_5, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible looks_rare_v2, LooksRareV2, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible nftx, Nftx, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible cryptopunks, Cryptopunks, PunkPurchase {
        punk_id: BigUint, recipient: Address, value: BigUint
    });
    def_op!(owner_check_721, OwnerCheck721, OwnerCheck721 { owner: Address, token: Address, id: BigUint });
    def_op!(owner_check_1155, OwnerCheck1155, OwnerCheck1155 {
        owner: Address, token: Address, id: BigUint, min_balance: BigUint
    });
    def_op!(sweep_erc721, SweepErc721, NftSweep { token: Address, recipient: Address, id: BigUint });
    def_op!(revertible x2y2_721, X2y2_721, NftPurchase {
        value: BigUint, data: Vec<u8>, recipient: Address, token: Address, id: BigUint
    });
    def_op!(revertible sudoswap, Sudoswap, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible nft20, Nft20, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible x2y2_1155, X2y2_1155, Nft1155Purchase {
        value: BigUint, data: Vec<u8>, recipient: Address, token: Address, id: BigUint, amount: BigUint
    });
    def_op!(revertible foundation, Foundation, NftPurchase {
        value: BigUint, data: Vec<u8>, recipient: Address, token: Address, id: BigUint
    });
    def_op!(sweep_erc1155, SweepErc1155, Erc1155Sweep {
        token: Address, recipient: Address, id: BigUint, amount: BigUint
    });
    def_op!(revertible element_market, ElementMarket, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(revertible seaport_v1_4, SeaportV1_4, MarketCall { value: BigUint, data: Vec<u8> });
    def_op!(approve_erc20, ApproveErc20, Approval { token: Address, spender: u8 });

    /// Creates an empty `Plan`.
    pub fn new() -> Self {
        Plan(vec![])
    }

    /// Creates an empty `Plan` and passes its &mut to the closure to let it add the instructions.
    /// Returns the resulting plan.
    pub fn with<F>(builder: F) -> Result<Self, PlanError>
    where
        F: FnOnce(&mut Self) -> Result<&mut Self, PlanError>,
    {
        let mut plan = Self::new();
        builder(&mut plan)?;
        Ok(plan)
    }

    /// Validates positional arguments against the opcode's schema row and appends the instruction.
    /// On failure the plan is left unchanged.
    pub fn append(
        &mut self,
        opcode: Opcode,
        args: Vec<Arg>,
        allow_revert: bool,
    ) -> Result<&mut Plan, PlanError> {
        if allow_revert && !opcode.is_revertible() {
            return Err(PlanError::RevertNotAllowed { opcode });
        }
        let instruction = Instruction::from_args(opcode, args)?;
        self.push(instruction, allow_revert)
    }

    /// Appends a typed instruction. On failure the plan is left unchanged.
    pub fn push(
        &mut self,
        instruction: Instruction,
        allow_revert: bool,
    ) -> Result<&mut Plan, PlanError> {
        let command = Command::new(instruction, allow_revert)?;
        trace!(
            "plan[{}]: appended 0x{:02x} {}",
            self.0.len(),
            command.command_byte(),
            command.instruction().opcode()
        );
        self.0.push(command);
        Ok(self)
    }

    /// Builds `sub_plan` and adds it as an `execute_sub_plan` instruction.
    pub fn execute_sub_plan(
        &mut self,
        sub_plan: &Plan,
        allow_revert: bool,
    ) -> Result<&mut Plan, PlanError> {
        let encoded = sub_plan.build()?;
        self.push(Instruction::ExecuteSubPlan(encoded.into()), allow_revert)
    }

    /// Serializes every instruction in order.
    /// Either the whole plan is encoded, or the first error is returned.
    pub fn build(&self) -> Result<EncodedPlan, PlanError> {
        let mut commands = Vec::with_capacity(self.0.len());
        let mut inputs = Vec::with_capacity(self.0.len());
        for command in self.0.iter() {
            commands.push(command.command_byte());
            inputs.push(command.encode()?);
        }
        debug!(
            "built plan of {} commands, {} input bytes",
            commands.len(),
            inputs.iter().map(|i| i.len()).sum::<usize>()
        );
        Ok(EncodedPlan { commands, inputs })
    }

    /// Returns the number of instructions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the plan has no instructions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the commands in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.0.iter()
    }

    /// Converts the plan to a plain vector of commands.
    pub fn to_vec(self) -> Vec<Command> {
        self.0
    }
}

impl EncodedPlan {
    /// Returns the number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns true if there are no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Splits every command byte into its opcode and allow-revert flag.
    pub fn decode_commands(&self) -> Result<Vec<(Opcode, bool)>, PlanError> {
        self.commands
            .iter()
            .map(|b| Opcode::from_command_byte(*b))
            .collect()
    }

    /// Returns the command bytes and the encoded inputs.
    pub fn into_parts(self) -> (Vec<u8>, Vec<Vec<u8>>) {
        (self.commands, self.inputs)
    }
}

impl From<EncodedPlan> for SubPlan {
    fn from(encoded: EncodedPlan) -> Self {
        SubPlan {
            commands: encoded.commands,
            inputs: encoded.inputs,
        }
    }
}

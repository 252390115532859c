//! Human-readable listing of plans.
//! Syntax, one command per line:
//! * `OPCODE(field=value, ...)`, with ` [allow revert]` appended for revertible commands;
//! * `0x...` is a byte string, `[...]` is a list, `(...)` is a record.

use core::fmt;
use num_bigint::BigUint;

use crate::path::SwapPath;
use crate::permit::{AllowanceTransferDetails, PermitBatch, PermitDetails, PermitSingle};
use crate::plan::{Command, Plan};
use crate::registry::Instruction;
use crate::types::Address;

/// Formats a single parameter value in listings.
pub(crate) trait FmtArg {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl FmtArg for Address {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FmtArg for BigUint {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FmtArg for u8 {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FmtArg for bool {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FmtArg for Vec<u8> {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self))
    }
}

impl FmtArg for SwapPath {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapPath::Packed(bytes) => bytes.fmt_arg(f),
            SwapPath::Structured { first, hops } => {
                write!(f, "[{}", first)?;
                for (fee, token) in hops {
                    write!(f, " -{}- {}", fee, token)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl<T: FmtArg> FmtArg for [T] {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            item.fmt_arg(f)?;
        }
        write!(f, "]")
    }
}

impl FmtArg for Vec<Address> {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self[..].fmt_arg(f)
    }
}

impl FmtArg for Vec<Vec<u8>> {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self[..].fmt_arg(f)
    }
}

impl FmtArg for Vec<AllowanceTransferDetails> {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self[..].fmt_arg(f)
    }
}

impl FmtArg for PermitDetails {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.token, self.amount, self.expiration, self.nonce
        )
    }
}

impl FmtArg for PermitSingle {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        self.details.fmt_arg(f)?;
        write!(f, ", {}, {})", self.spender, self.sig_deadline)
    }
}

impl FmtArg for PermitBatch {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        self.details[..].fmt_arg(f)?;
        write!(f, ", {}, {})", self.spender, self.sig_deadline)
    }
}

impl FmtArg for AllowanceTransferDetails {
    fn fmt_arg(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.from, self.to, self.amount, self.token)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.opcode(), self.params())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instruction())?;
        if self.allow_revert() {
            write!(f, " [allow revert]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.iter().enumerate() {
            writeln!(f, "{:>3}: 0x{:02x} {}", i, command.command_byte(), command)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::ops::Opcode;
    use crate::permit::AllowanceTransferDetails;
    use crate::plan::Plan;
    use crate::types::Address;

    #[test]
    fn plan_listing() {
        let dev = Address::parse("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let mut plan = Plan::new();
        plan.wrap_eth(dev, 1234u64).unwrap();
        plan.append(
            Opcode::SeaportV1_5,
            vec![1u64.into(), vec![0xabu8].into()],
            true,
        )
        .unwrap();
        assert_eq!(
            format!("{:?}", plan),
            "  0: 0x0b WRAP_ETH(recipient=0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266, amount=1234)\n  \
             1: 0x90 SEAPORT_V1_5(value=1, data=0xab) [allow revert]\n"
        );
    }

    #[test]
    fn fields_are_comma_separated() {
        let dev = Address::parse("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        let plan = Plan::with(|p| {
            p.permit2_transfer_from_batch(Vec::<AllowanceTransferDetails>::new())?
                .owner_check_1155(dev, dev, 7u64, 2u64)
        })
        .unwrap();
        let lines: Vec<String> = plan.iter().map(|c| c.to_string()).collect();
        assert_eq!(lines[0], "PERMIT2_TRANSFER_FROM_BATCH(transfers=[])");
        assert_eq!(
            lines[1],
            "OWNER_CHECK_1155(owner=0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266, \
             token=0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266, id=7, min_balance=2)"
        );
    }
}

use std::fmt;
use std::io;

use crate::memory::MemoryError;
use crate::opcodes::{AddressingMode, Mnemonic};

/// Why an instruction could not be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Opcode byte has no entry in the opcode table.
    Opcode { opcode: u8, pc: u16 },
    /// Documented instruction that the executor does not implement.
    Mnemonic { mnemonic: Mnemonic, mode: AddressingMode, pc: u16 },
    /// JSR to anything other than the print routine.
    CallTarget { address: u32 },
}

#[derive(Debug)]
pub enum SimError {
    OutOfRange { address: i64 },
    InvalidValue { address: u32, value: u32 },
    UnsupportedInstruction(Unsupported),
    RegisterRange { register: &'static str, value: i64 },
    StepLimitExceeded { limit: u64 },
    Console(io::Error),
}

impl SimError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::OutOfRange { .. } => "out_of_range",
            SimError::InvalidValue { .. } => "invalid_value",
            SimError::UnsupportedInstruction(_) => "unsupported_instruction",
            SimError::RegisterRange { .. } => "register_range",
            SimError::StepLimitExceeded { .. } => "step_limit",
            SimError::Console(_) => "console",
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SimError::OutOfRange { address } => {
                write!(f, "{}", MemoryError::OutOfRange { address: *address })
            }
            SimError::InvalidValue { address, value } => write!(
                f,
                "{}",
                MemoryError::InvalidValue { address: *address, value: *value }
            ),
            SimError::UnsupportedInstruction(Unsupported::Opcode { opcode, pc }) => {
                write!(f, "Unknown opcode ${:02X} at PC ${:04X}", opcode, pc)
            }
            SimError::UnsupportedInstruction(Unsupported::Mnemonic { mnemonic, mode, pc }) => {
                write!(
                    f,
                    "Instruction not implemented: {} ({:?}) at PC ${:04X}",
                    mnemonic, mode, pc
                )
            }
            SimError::UnsupportedInstruction(Unsupported::CallTarget { address }) => write!(
                f,
                "Instruction JSR not implemented for anything beside print (target ${:04X})",
                address
            ),
            SimError::RegisterRange { register, value } => {
                write!(f, "Wrong value for register {}: {}", register, value)
            }
            SimError::StepLimitExceeded { limit } => {
                write!(f, "Program did not reach BRK within {} instructions", limit)
            }
            SimError::Console(err) => write!(f, "Console output failed: {}", err),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Console(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoryError> for SimError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::OutOfRange { address } => SimError::OutOfRange { address },
            MemoryError::InvalidValue { address, value } => SimError::InvalidValue { address, value },
        }
    }
}

impl From<io::Error> for SimError {
    fn from(err: io::Error) -> Self {
        SimError::Console(err)
    }
}

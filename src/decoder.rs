//! Fetch and addressing-mode resolution.
//!
//! `fetch` reads the opcode at PC, consumes its operand bytes and resolves the
//! operand into one of four shapes. PC is left one past the last consumed
//! byte, so the executor only touches PC for jumps and taken branches.

use crate::error::{SimError, Unsupported};
use crate::memory::{AddressSpace, MemoryError};
use crate::opcodes::{lookup, AddressingMode, Mnemonic};
use crate::registers::ProcessorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Implied,
    /// Accumulator contents at fetch time.
    Accumulator(u8),
    Immediate(u8),
    /// Effective address plus the value read there during decode. The address
    /// is 32-bit because indexed modes may point past the last cell.
    Memory { address: u32, value: u8 },
}

impl Operand {
    pub fn value(&self) -> Option<u8> {
        match *self {
            Operand::Implied => None,
            Operand::Accumulator(value) | Operand::Immediate(value) => Some(value),
            Operand::Memory { value, .. } => Some(value),
        }
    }

    pub fn address(&self) -> Option<u32> {
        match *self {
            Operand::Memory { address, .. } => Some(address),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Address of the opcode byte.
    pub pc: u16,
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: AddressingMode,
    /// Bytes consumed, opcode included.
    pub size: u8,
    pub operand: Operand,
}

pub fn fetch(state: &mut ProcessorState, memory: &AddressSpace) -> Result<Instruction, SimError> {
    let pc = state.pc();
    let opcode = memory.read(pc as u32)?;
    let info = lookup(opcode)
        .ok_or(SimError::UnsupportedInstruction(Unsupported::Opcode { opcode, pc }))?;

    let data = match info.mode.operand_bytes() {
        0 => 0,
        1 => {
            state.pc.inc();
            memory.read(state.pc.get())? as u32
        }
        _ => {
            state.pc.inc();
            let low = memory.read(state.pc.get())? as u32;
            state.pc.inc();
            let high = memory.read(state.pc.get())? as u32;
            (high << 8) | low
        }
    };

    // PC still points at the last consumed byte here; relative branches count from it
    let operand = resolve(info.mode, data, state, memory)?;
    state.pc.inc();

    Ok(Instruction {
        pc,
        opcode,
        mnemonic: info.mnemonic,
        mode: info.mode,
        size: info.size(),
        operand,
    })
}

fn resolve(
    mode: AddressingMode,
    data: u32,
    state: &ProcessorState,
    memory: &AddressSpace,
) -> Result<Operand, SimError> {
    let x = state.x() as u32;
    let y = state.y() as u32;

    let address = match mode {
        AddressingMode::Implied => return Ok(Operand::Implied),
        AddressingMode::Accumulator => return Ok(Operand::Accumulator(state.a())),
        AddressingMode::Immediate => return Ok(Operand::Immediate(data as u8)),
        AddressingMode::Absolute => data,
        AddressingMode::AbsoluteX => data + x,
        AddressingMode::AbsoluteY => data + y,
        AddressingMode::ZeroPage => data & 0xFF,
        AddressingMode::ZeroPageX => data + x,
        AddressingMode::ZeroPageY => data + y,
        AddressingMode::Relative => relative_target(state.pc.get(), data)?,
        AddressingMode::Indirect => memory.read_u16(data)? as u32,
        AddressingMode::IndexedIndirect => memory.read_u16(data + x)? as u32,
        AddressingMode::IndirectIndexed => memory.read_u16(data)? as u32 + y,
    };

    let value = memory.read(address)?;
    Ok(Operand::Memory { address, value })
}

/// `base` plus the operand byte taken as two's complement.
pub fn relative_target(base: u32, data: u32) -> Result<u32, MemoryError> {
    let offset = if data >= 0x80 { data as i64 - 0x100 } else { data as i64 };
    let target = base as i64 + offset;
    u32::try_from(target).map_err(|_| MemoryError::OutOfRange { address: target })
}

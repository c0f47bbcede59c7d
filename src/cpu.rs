use log::{debug, trace, warn};

use crate::console::Console;
use crate::decoder::{fetch, Instruction};
use crate::error::{SimError, Unsupported};
use crate::memory::AddressSpace;
use crate::metrics::{record_console_byte, record_instruction, record_run, Timer};
use crate::opcodes::{get_instruction_name, Mnemonic};
use crate::registers::{ProcessorState, Register8, StatusFlags};

/// Address of the character output routine reached through `JSR`.
pub const PRINT_ADDRESS: u16 = 0xFFD2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    Halted,
}

#[derive(Debug)]
pub struct CPU {
    pub state: ProcessorState,
    pub print_address: u16,

    // Internal state
    pub instructions: u64,
    pub halted: bool,
}

impl CPU {
    pub fn new() -> Self {
        Self::with_print_address(PRINT_ADDRESS)
    }

    pub fn with_print_address(print_address: u16) -> Self {
        CPU {
            state: ProcessorState::new(),
            print_address,
            instructions: 0,
            halted: false,
        }
    }

    pub fn reset(&mut self) {
        self.state = ProcessorState::new();
        self.instructions = 0;
        self.halted = false;
    }

    /// Runs from `entry` until BRK. Loops forever if BRK is never reached.
    pub fn run<C: Console>(
        &mut self,
        memory: &mut AddressSpace,
        console: &mut C,
        entry: u16,
    ) -> Result<u64, SimError> {
        self.run_with_limit(memory, console, entry, None)
    }

    /// Like `run`, but aborts with `StepLimitExceeded` once `max_steps`
    /// instructions have executed without reaching BRK.
    pub fn run_with_limit<C: Console>(
        &mut self,
        memory: &mut AddressSpace,
        console: &mut C,
        entry: u16,
        max_steps: Option<u64>,
    ) -> Result<u64, SimError> {
        self.state.pc.set(entry as i64)?;
        self.halted = false;
        debug!("run started at ${:04X}", entry);

        let mut executed = 0u64;
        let result = loop {
            let instr = match fetch(&mut self.state, memory) {
                Ok(instr) => instr,
                Err(err) => break Err(err),
            };
            trace!(
                "${:04X}: {} {:?} ({} bytes)",
                instr.pc, instr.mnemonic, instr.operand, instr.size
            );

            if instr.mnemonic == Mnemonic::BRK {
                self.halted = true;
                break Ok(executed);
            }
            if let Some(limit) = max_steps {
                if executed >= limit {
                    break Err(SimError::StepLimitExceeded { limit });
                }
            }
            if let Err(err) = self.execute(&instr, memory, console) {
                break Err(err);
            }
            executed += 1;
        };

        match &result {
            Ok(count) => {
                debug!("BRK at ${:04X} after {} instructions", self.get_pc().wrapping_sub(1), count);
                record_run("halted");
            }
            Err(err) => {
                warn!("run aborted at PC ${:04X}: {}", self.get_pc(), err);
                record_run(err.kind());
            }
        }
        result
    }

    /// Fetches and executes a single instruction at PC.
    pub fn step<C: Console>(
        &mut self,
        memory: &mut AddressSpace,
        console: &mut C,
    ) -> Result<StepOutcome, SimError> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        let instr = fetch(&mut self.state, memory)?;
        if instr.mnemonic == Mnemonic::BRK {
            self.halted = true;
            return Ok(StepOutcome::Halted);
        }
        self.execute(&instr, memory, console)?;
        Ok(StepOutcome::Executed)
    }

    pub fn execute<C: Console>(
        &mut self,
        instr: &Instruction,
        memory: &mut AddressSpace,
        console: &mut C,
    ) -> Result<(), SimError> {
        let timer = Timer::new();

        match instr.mnemonic {
            // Loads
            Mnemonic::LDA => {
                let value = self.operand_value(instr)?;
                self.state.a.set(value as i64)?;
            }
            Mnemonic::LDX => {
                let value = self.operand_value(instr)?;
                self.state.x.set(value as i64)?;
            }
            Mnemonic::LDY => {
                let value = self.operand_value(instr)?;
                self.state.y.set(value as i64)?;
            }

            // Transfers
            Mnemonic::TAX => self.state.x.set(self.state.a.get() as i64)?,
            Mnemonic::TXA => self.state.a.set(self.state.x.get() as i64)?,
            Mnemonic::TAY => self.state.y.set(self.state.a.get() as i64)?,
            Mnemonic::TYA => self.state.a.set(self.state.y.get() as i64)?,

            Mnemonic::STA => {
                let address = self.operand_address(instr)?;
                memory.write(address, self.state.a.get())?;
            }

            Mnemonic::CLC => self.state.flags.carry = false,

            // Carry is neither consumed nor produced
            Mnemonic::ADC => {
                let value = self.operand_value(instr)?;
                let sum = (self.state.a() as u16 + value as u16) & 0xFF;
                self.state.a.set(sum as i64)?;
            }

            Mnemonic::CMP => {
                let value = self.operand_value(instr)?;
                compare(&mut self.state.flags, &self.state.a, value);
            }
            Mnemonic::CPX => {
                let value = self.operand_value(instr)?;
                compare(&mut self.state.flags, &self.state.x, value);
            }
            Mnemonic::CPY => {
                let value = self.operand_value(instr)?;
                compare(&mut self.state.flags, &self.state.y, value);
            }

            // Lands one past the resolved target
            Mnemonic::BEQ => {
                if self.state.flags.zero {
                    let target = self.operand_address(instr)?;
                    self.jump_to(target as i64 + 1)?;
                }
            }

            Mnemonic::INX => self.state.x.inc(),
            Mnemonic::DEX => self.state.x.dec(),
            Mnemonic::INY => self.state.y.inc(),
            Mnemonic::DEY => self.state.y.dec(),

            Mnemonic::JMP => {
                let target = self.operand_address(instr)?;
                self.jump_to(target as i64)?;
            }

            Mnemonic::JSR => {
                let target = self.operand_address(instr)?;
                if target != self.print_address as u32 {
                    return Err(SimError::UnsupportedInstruction(Unsupported::CallTarget {
                        address: target,
                    }));
                }
                console.putc(self.state.a())?;
                record_console_byte();
            }

            Mnemonic::BRK => self.halted = true,

            _ => return Err(unsupported(instr)),
        }

        self.instructions += 1;
        record_instruction(instr.opcode, get_instruction_name(instr.opcode), timer.elapsed());
        Ok(())
    }

    // A destination past the last cell is a memory fault, not a bad register write
    fn jump_to(&mut self, target: i64) -> Result<(), SimError> {
        if !(0..=0xFFFF).contains(&target) {
            return Err(SimError::OutOfRange { address: target });
        }
        self.state.pc.set(target)
    }

    fn operand_value(&self, instr: &Instruction) -> Result<u8, SimError> {
        instr.operand.value().ok_or_else(|| unsupported(instr))
    }

    fn operand_address(&self, instr: &Instruction) -> Result<u32, SimError> {
        instr.operand.address().ok_or_else(|| unsupported(instr))
    }

    // Getters
    pub fn get_register_a(&self) -> u8 { self.state.a() }
    pub fn get_register_x(&self) -> u8 { self.state.x() }
    pub fn get_register_y(&self) -> u8 { self.state.y() }
    pub fn get_pc(&self) -> u16 { self.state.pc() }
    pub fn get_sp(&self) -> u8 { self.state.sp() }
    pub fn get_status(&self) -> u8 { self.state.flags.to_byte() }
    pub fn is_halted(&self) -> bool { self.halted }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}

// N and Z from the signed difference; Carry is left alone
fn compare(flags: &mut StatusFlags, register: &Register8, value: u8) {
    let result = register.get() as i32 - value as i32;
    flags.negative = result < 0;
    flags.zero = result == 0;
}

fn unsupported(instr: &Instruction) -> SimError {
    SimError::UnsupportedInstruction(Unsupported::Mnemonic {
        mnemonic: instr.mnemonic,
        mode: instr.mode,
        pc: instr.pc,
    })
}

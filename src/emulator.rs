use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::console::Console;
use crate::cpu::CPU;
use crate::error::SimError;
use crate::loader::{self, LoadError};
use crate::memory::{AddressSpace, MemoryError};
use crate::registers::StatusFlags;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuState {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub pc: u16,
    pub sp: u8,
    pub status: u8,
    pub flags: StatusFlags,
    pub instructions: u64,
    pub halted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionReport {
    pub instructions_executed: u64,
    pub final_state: CpuState,
}

/// One CPU, its memory and its console, for the lifetime of a program.
pub struct Emulator<C: Console> {
    pub cpu: CPU,
    pub memory: AddressSpace,
    pub console: C,
    pub config: SimConfig,
    /// Origin of the last loaded program.
    pub origin: Option<u16>,
}

impl<C: Console> Emulator<C> {
    pub fn new(config: SimConfig, console: C) -> Self {
        Self {
            cpu: CPU::with_print_address(config.print_address),
            memory: AddressSpace::new(),
            console,
            config,
            origin: None,
        }
    }

    pub fn get_state(&self) -> CpuState {
        CpuState {
            a: self.cpu.get_register_a(),
            x: self.cpu.get_register_x(),
            y: self.cpu.get_register_y(),
            pc: self.cpu.get_pc(),
            sp: self.cpu.get_sp(),
            status: self.cpu.get_status(),
            flags: self.cpu.state.flags,
            instructions: self.cpu.instructions,
            halted: self.cpu.is_halted(),
        }
    }

    pub fn instructions_executed(&self) -> u64 {
        self.cpu.instructions
    }

    /// Clears the CPU; memory is kept.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    pub fn load_program(&mut self, image: &[u8]) -> Result<u16, LoadError> {
        let origin = loader::load_program(&mut self.memory, image)?;
        self.origin = Some(origin);
        Ok(origin)
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<u16, LoadError> {
        let origin = loader::load_file(&mut self.memory, path)?;
        self.origin = Some(origin);
        Ok(origin)
    }

    /// Configured entry, else the program origin, else address zero.
    pub fn entry_point(&self) -> u16 {
        self.config.entry.or(self.origin).unwrap_or(0)
    }

    pub fn run(&mut self) -> Result<ExecutionReport, SimError> {
        let entry = self.entry_point();
        self.run_from(entry)
    }

    pub fn run_from(&mut self, entry: u16) -> Result<ExecutionReport, SimError> {
        let executed = self.cpu.run_with_limit(
            &mut self.memory,
            &mut self.console,
            entry,
            self.config.max_steps,
        )?;

        Ok(ExecutionReport {
            instructions_executed: executed,
            final_state: self.get_state(),
        })
    }

    pub fn read_memory(&self, address: u32, length: u32) -> Result<Vec<u8>, MemoryError> {
        let end = address.checked_add(length).ok_or(MemoryError::OutOfRange {
            address: address as i64 + length as i64,
        })?;
        (address..end).map(|a| self.memory.read(a)).collect()
    }

    pub fn write_memory(&mut self, address: u32, value: u32) -> Result<(), MemoryError> {
        self.memory.write(address, value)
    }
}

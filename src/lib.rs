//! # MOS 6502 Instruction Simulator
//!
//! An instruction-level simulator for the 8-bit MOS 6502. It loads a
//! pre-assembled binary program into a flat 64KB address space and runs it
//! from an entry address until `BRK`.
//!
//! This is an execution engine for small programs, not a machine emulator:
//! there are no peripherals, no cycle timing and no interrupts. The only way
//! out to the host is a `JSR` to the print routine (`$FFD2` by default), which
//! hands the accumulator to a [`Console`].
//!
//! ## Features
//!
//! - Static table of all documented opcodes; a subset executes (loads,
//!   transfers, `STA`, `ADC`, compares, `BEQ`, increments, `JMP`, `JSR`, `BRK`)
//! - Every addressing mode resolved up front into a typed [`Operand`]
//! - Bounds-checked memory and registers with explicit errors
//! - Optional instruction budget, snapshots and Prometheus metrics
//!
//! ## Example
//!
//! ```rust
//! use mos6502_sim::{BufferConsole, Emulator, SimConfig};
//!
//! let mut emulator = Emulator::new(SimConfig::default(), BufferConsole::new());
//!
//! // origin $0600: LDA #$41, JSR $FFD2, BRK
//! emulator
//!     .load_program(&[0x00, 0x06, 0xA9, 0x41, 0x20, 0xD2, 0xFF, 0x00])
//!     .unwrap();
//! emulator.run().unwrap();
//!
//! assert_eq!(emulator.console.as_string(), "A");
//! ```

pub mod config;
pub mod console;
pub mod cpu;
pub mod decoder;
pub mod emulator;
pub mod error;
pub mod loader;
pub mod memory;
pub mod metrics;
pub mod opcodes;
pub mod registers;
pub mod snapshots;

pub use config::{Profile, SimConfig};
pub use console::{BufferConsole, Console, StdoutConsole};
pub use cpu::{StepOutcome, CPU, PRINT_ADDRESS};
pub use decoder::{Instruction, Operand};
pub use emulator::{CpuState, Emulator, ExecutionReport};
pub use error::{SimError, Unsupported};
pub use memory::{AddressSpace, MemoryError};
pub use opcodes::{AddressingMode, Mnemonic, OPCODE_TABLE};
pub use registers::{ProcessorState, Register, StatusFlags};
pub use snapshots::Snapshot;

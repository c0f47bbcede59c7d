use serde::{Deserialize, Serialize};

use crate::error::SimError;

// Status register bit positions, used when packing flags into a byte
pub const CARRY_FLAG: u8 = 0x01;
pub const ZERO_FLAG: u8 = 0x02;
pub const INTERRUPT_DISABLE: u8 = 0x04;
pub const DECIMAL_MODE: u8 = 0x08;
pub const BREAK_COMMAND: u8 = 0x10;
pub const UNUSED_FLAG: u8 = 0x20;
pub const NEGATIVE_FLAG: u8 = 0x80;

/// A named unsigned register `BITS` wide.
///
/// `set` rejects values that do not fit; `inc` and `dec` wrap modulo `2^BITS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register<const BITS: u32> {
    name: &'static str,
    value: u32,
}

impl<const BITS: u32> Register<BITS> {
    const MODULUS: u32 = 1 << BITS;

    pub fn new(name: &'static str) -> Self {
        Register { name, value: 0 }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, value: i64) -> Result<(), SimError> {
        if value < 0 || value >= Self::MODULUS as i64 {
            return Err(SimError::RegisterRange { register: self.name(), value });
        }
        self.value = value as u32;
        Ok(())
    }

    pub fn inc(&mut self) {
        self.value = (self.value + 1) % Self::MODULUS;
    }

    pub fn dec(&mut self) {
        self.value = (self.value + Self::MODULUS - 1) % Self::MODULUS;
    }
}

pub type Register8 = Register<8>;
pub type Register16 = Register<16>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub negative: bool,
    pub zero: bool,
    pub carry: bool,
    pub decimal: bool,
    pub interrupt_disable: bool,
    pub brk: bool,
}

impl StatusFlags {
    pub fn to_byte(&self) -> u8 {
        let mut status = UNUSED_FLAG;
        for (set, bit) in [
            (self.negative, NEGATIVE_FLAG),
            (self.brk, BREAK_COMMAND),
            (self.decimal, DECIMAL_MODE),
            (self.interrupt_disable, INTERRUPT_DISABLE),
            (self.zero, ZERO_FLAG),
            (self.carry, CARRY_FLAG),
        ] {
            if set {
                status |= bit;
            }
        }
        status
    }

    pub fn from_byte(status: u8) -> Self {
        StatusFlags {
            negative: status & NEGATIVE_FLAG != 0,
            zero: status & ZERO_FLAG != 0,
            carry: status & CARRY_FLAG != 0,
            decimal: status & DECIMAL_MODE != 0,
            interrupt_disable: status & INTERRUPT_DISABLE != 0,
            brk: status & BREAK_COMMAND != 0,
        }
    }
}

/// Everything the executor mutates besides memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorState {
    pub pc: Register16,
    pub a: Register8,
    pub x: Register8,
    pub y: Register8,
    pub sp: Register8,
    pub flags: StatusFlags,
}

impl ProcessorState {
    pub fn new() -> Self {
        ProcessorState {
            pc: Register::new("PC"),
            a: Register::new("A"),
            x: Register::new("X"),
            y: Register::new("Y"),
            sp: Register::new("SP"),
            flags: StatusFlags::default(),
        }
    }

    // 8-bit registers always fit in a byte
    pub fn a(&self) -> u8 {
        self.a.get() as u8
    }

    pub fn x(&self) -> u8 {
        self.x.get() as u8
    }

    pub fn y(&self) -> u8 {
        self.y.get() as u8
    }

    pub fn sp(&self) -> u8 {
        self.sp.get() as u8
    }

    pub fn pc(&self) -> u16 {
        self.pc.get() as u16
    }
}

impl Default for ProcessorState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_bit_wraparound() {
        let mut x = Register8::new("X");
        x.set(255).unwrap();
        x.inc();
        assert_eq!(x.get(), 0);
        x.dec();
        assert_eq!(x.get(), 255);
    }

    #[test]
    fn test_sixteen_bit_wraparound() {
        let mut pc = Register16::new("PC");
        pc.dec();
        assert_eq!(pc.get(), 0xFFFF);
        pc.inc();
        assert_eq!(pc.get(), 0);
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        let mut a = Register8::new("A");
        a.set(0x42).unwrap();

        match a.set(256) {
            Err(SimError::RegisterRange { register, value }) => {
                assert_eq!(register, "A");
                assert_eq!(value, 256);
            }
            other => panic!("expected RegisterRange, got {:?}", other),
        }
        assert!(a.set(-1).is_err());
        assert_eq!(a.get(), 0x42);
    }

    #[test]
    fn test_status_byte_packing() {
        let flags = StatusFlags {
            negative: true,
            zero: true,
            carry: true,
            ..StatusFlags::default()
        };
        let byte = flags.to_byte();
        assert_eq!(byte, NEGATIVE_FLAG | UNUSED_FLAG | ZERO_FLAG | CARRY_FLAG);
        assert_eq!(StatusFlags::from_byte(byte), flags);
    }

    #[test]
    fn test_initial_state_is_zeroed() {
        let state = ProcessorState::new();
        assert_eq!(state.pc(), 0);
        assert_eq!(state.a(), 0);
        assert_eq!(state.sp(), 0);
        assert_eq!(state.flags, StatusFlags::default());
    }
}

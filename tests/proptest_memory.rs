//! Property-based tests for the memory and register invariants.

use mos6502_sim::decoder::relative_target;
use mos6502_sim::memory::{AddressSpace, MemoryError, MEMORY_SIZE};
use mos6502_sim::registers::{Register16, Register8};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_unwritten_reads_zero(address in 0u32..MEMORY_SIZE as u32) {
        let memory = AddressSpace::new();
        prop_assert_eq!(memory.read(address), Ok(0));
    }

    #[test]
    fn prop_write_then_read(address in 0u32..MEMORY_SIZE as u32, value in 0u32..=255) {
        let mut memory = AddressSpace::new();
        memory.write(address, value).unwrap();
        prop_assert_eq!(memory.read(address), Ok(value as u8));
    }

    #[test]
    fn prop_invalid_value_rejected(address in 0u32..MEMORY_SIZE as u32, value in 256u32..) {
        let mut memory = AddressSpace::new();
        prop_assert_eq!(
            memory.write(address, value),
            Err(MemoryError::InvalidValue { address, value })
        );
        prop_assert_eq!(memory.read(address), Ok(0));
    }

    #[test]
    fn prop_out_of_range_rejected(address in MEMORY_SIZE as u32.., value in 0u32..=255) {
        let mut memory = AddressSpace::new();
        let expected = Err(MemoryError::OutOfRange { address: address as i64 });
        prop_assert_eq!(memory.write(address, value), expected);
        prop_assert_eq!(memory.read(address).map(|_| ()), expected);
    }

    #[test]
    fn prop_register8_inc_dec_wrap(start in 0i64..=255) {
        let mut register = Register8::new("X");
        register.set(start).unwrap();

        register.inc();
        prop_assert_eq!(register.get() as i64, (start + 1) % 256);
        register.dec();
        register.dec();
        prop_assert_eq!(register.get() as i64, (start + 255) % 256);
    }

    #[test]
    fn prop_register16_inc_dec_wrap(start in 0i64..=0xFFFF) {
        let mut register = Register16::new("PC");
        register.set(start).unwrap();

        register.inc();
        prop_assert_eq!(register.get() as i64, (start + 1) % 0x10000);
        register.dec();
        prop_assert_eq!(register.get() as i64, start);
    }

    #[test]
    fn prop_relative_target_is_signed_offset(base in 0x100u32..0xFF00, data in 0u32..=255) {
        let offset = data as u8 as i8 as i64;
        prop_assert_eq!(relative_target(base, data), Ok((base as i64 + offset) as u32));
    }
}

use mos6502_sim::cpu::CPU;
use mos6502_sim::error::{SimError, Unsupported};
use mos6502_sim::loader::load_program;
use mos6502_sim::memory::AddressSpace;
use mos6502_sim::{BufferConsole, Emulator, SimConfig, StepOutcome};

fn load(image: &[u8]) -> (CPU, AddressSpace, BufferConsole, u16) {
    let mut memory = AddressSpace::new();
    let origin = load_program(&mut memory, image).unwrap();
    (CPU::new(), memory, BufferConsole::new(), origin)
}

#[test]
fn test_print_character() {
    let (mut cpu, mut memory, mut console, origin) = load(&[
        0x00, 0x06,       // origin $0600
        0xA9, 0x41,       // LDA #$41
        0x20, 0xD2, 0xFF, // JSR $FFD2
        0x00,             // BRK
    ]);

    cpu.run(&mut memory, &mut console, origin).unwrap();

    assert_eq!(console.output, vec![b'A']);
    assert!(cpu.is_halted());
}

#[test]
fn test_count_down_x() {
    let (mut cpu, mut memory, mut console, origin) = load(&[
        0x00, 0x06,             // origin $0600
        0xA2, 0x05,             // LDX #$05
        0xCA, 0xCA, 0xCA, 0xCA, // DEX x4
        0x00,                   // BRK
    ]);

    cpu.run(&mut memory, &mut console, origin).unwrap();

    assert_eq!(cpu.get_register_x(), 1);
}

#[test]
fn test_compare_and_branch() {
    let (mut cpu, mut memory, mut console, origin) = load(&[
        0x00, 0x06, // origin $0600
        0xA9, 0x03, // $0600 LDA #$03
        0xC9, 0x03, // $0602 CMP #$03
        0xF0, 0x02, // $0604 BEQ -> target $0607
        0xE8, 0xE8, // $0606 INX, INX (skipped)
        0x00,       // $0608 BRK
    ]);
    cpu.state.pc.set(origin as i64).unwrap();

    cpu.step(&mut memory, &mut console).unwrap(); // LDA
    cpu.step(&mut memory, &mut console).unwrap(); // CMP
    assert!(cpu.state.flags.zero);
    assert!(!cpu.state.flags.negative);

    cpu.step(&mut memory, &mut console).unwrap(); // BEQ
    assert_eq!(cpu.get_pc(), 0x0607 + 1);

    assert_eq!(cpu.step(&mut memory, &mut console).unwrap(), StepOutcome::Halted);
    assert_eq!(cpu.get_register_x(), 0);
}

#[test]
fn test_unsupported_opcode_aborts_run() {
    let (mut cpu, mut memory, mut console, origin) = load(&[
        0x00, 0x06, // origin $0600
        0xA9, 0x07, // LDA #$07
        0xA2, 0x02, // LDX #$02
        0x02,       // not an instruction
        0xE8,       // INX (never reached)
        0x00,       // BRK
    ]);

    let err = cpu.run(&mut memory, &mut console, origin).unwrap_err();

    assert!(matches!(
        err,
        SimError::UnsupportedInstruction(Unsupported::Opcode { opcode: 0x02, pc: 0x0604 })
    ));
    assert_eq!(cpu.get_register_a(), 0x07);
    assert_eq!(cpu.get_register_x(), 0x02);
    assert_eq!(cpu.get_pc(), 0x0604);
    assert!(!cpu.is_halted());
}

#[test]
fn test_indexed_memory_access() {
    let (mut cpu, mut memory, mut console, origin) = load(&[
        0x00, 0x80, // origin $8000
        0xA2, 0x02, // LDX #$02
        0xB5, 0x50, // LDA $50,X
        0x95, 0x60, // STA $60,X
        0x00,       // BRK
    ]);
    memory.write(0x50, 0x10).unwrap();
    memory.write(0x51, 0x20).unwrap();
    memory.write(0x52, 0x30).unwrap();

    cpu.run(&mut memory, &mut console, origin).unwrap();

    assert_eq!(cpu.get_register_a(), 0x30);
    assert_eq!(memory.read(0x62), Ok(0x30));
}

#[test]
fn test_print_loop_through_emulator() {
    // Print "ABC" by counting A up with ADC until it matches 'D'
    let mut emulator = Emulator::new(SimConfig::default(), BufferConsole::new());
    emulator
        .load_program(&[
            0x00, 0x06,       // origin $0600
            0xA9, 0x41,       // $0600 LDA #$41
            0x20, 0xD2, 0xFF, // $0602 JSR $FFD2
            0x18,             // $0605 CLC
            0x69, 0x01,       // $0606 ADC #$01
            0xC9, 0x44,       // $0608 CMP #$44
            0xF0, 0x03,       // $060A BEQ -> $060E, lands on $060F
            0x4C, 0x02, 0x06, // $060C JMP $0602
            0x00,             // $060F BRK
        ])
        .unwrap();

    let report = emulator.run().unwrap();

    assert_eq!(emulator.console.as_string(), "ABC");
    assert_eq!(report.final_state.a, 0x44);
    assert!(report.final_state.flags.zero);
    assert!(report.final_state.halted);
}

#[test]
fn test_infinite_loop_hits_step_budget() {
    let config = SimConfig {
        max_steps: Some(1000),
        ..SimConfig::default()
    };
    let mut emulator = Emulator::new(config, BufferConsole::new());
    // $0600 JMP $0600
    emulator.load_program(&[0x00, 0x06, 0x4C, 0x00, 0x06]).unwrap();

    let err = emulator.run().unwrap_err();
    assert!(matches!(err, SimError::StepLimitExceeded { limit: 1000 }));
}

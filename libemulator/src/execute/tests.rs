use libdigiisa::{
    instruction::{kind::InstructionKind, Instruction},
    Register, Word, ROM_SIZE, STACK_SIZE,
};

use crate::{alu::flags::ALUFlags, Emulator, ExecuteErr, ExecuteOk, LoadErr};

fn gpr(index: usize) -> Register {
    Register::general(index).unwrap()
}

fn emulator(source: &str) -> Emulator {
    let mut emulator = Emulator::new();
    emulator
        .load_string(source)
        .expect("Failed to assemble program");

    emulator
}

fn exec(source: &str) -> Emulator {
    let mut emulator = emulator(source);
    emulator
        .execute_to_halt(10_000)
        .expect("Error executing instruction");

    assert!(emulator.is_halted(), "program didn't halt");
    emulator
}

#[test]
fn immediate_copy_halt() -> anyhow::Result<()> {
    let mut emulator = emulator("IMM 5 0\nCPY 0 1\nHLT");

    assert_eq!(emulator.step()?, ExecuteOk::Normal);
    assert_eq!(emulator.step()?, ExecuteOk::Normal);
    assert_eq!(emulator.step()?, ExecuteOk::Halted);

    assert_eq!(emulator.register(gpr(1)), 5);
    assert!(emulator.is_halted());

    // Stepping while halted does nothing.
    let pc = emulator.pc();
    assert_eq!(emulator.step()?, ExecuteOk::Halted);
    assert_eq!(emulator.pc(), pc);

    Ok(())
}

#[test]
fn counting_loop_wraps() -> anyhow::Result<()> {
    let mut emulator = emulator("LABEL LOOP:\nINC 0\nJMP LOOP");

    for step in 0..600 {
        emulator.step()?;

        // Every other step is an increment.
        let increments = step / 2 + 1;
        assert_eq!(emulator.register(gpr(0)) as usize, increments % 256);
    }

    assert!(!emulator.is_halted());
    assert_eq!(emulator.pc(), 0);

    Ok(())
}

#[test]
fn ram_save_and_load_round_trip() {
    let emulator = exec("IMM 42 3\nRSV 3 200\nRLD 200 4\nHLT");

    assert_eq!(emulator.register(gpr(4)), 42);
    assert_eq!(emulator.memory().load(200), 42);
}

#[test]
fn indirect_ram_access_roles() {
    // RSR takes the address from its second register, the value from its first.
    let emulator = exec(
        "
        IMM 99 1
        IMM 7 2
        RSR 1 2
        RLR 2 3
        HLT
        ",
    );

    assert_eq!(emulator.memory().load(7), 99);
    assert_eq!(emulator.memory().load(99), 0);
    assert_eq!(emulator.register(gpr(3)), 99);
}

#[test]
fn unknown_opcode() -> anyhow::Result<()> {
    let mut emulator = Emulator::with_program(&[0x00, 0x00, 0xFF])?;

    emulator.step()?;
    emulator.step()?;

    assert_eq!(
        emulator.step(),
        Err(ExecuteErr::UnknownOpcode { opcode: 255, pc: 2 })
    );
    assert_eq!(emulator.pc(), 2);

    Ok(())
}

#[test]
fn register_overflow_is_reported() -> anyhow::Result<()> {
    let program = Instruction::new(InstructionKind::Clr)
        .with_operands(&[15])
        .assemble();
    let mut emulator = Emulator::with_program(&program)?;

    assert_eq!(emulator.step(), Err(ExecuteErr::RegisterOverflow(15)));

    Ok(())
}

#[test]
fn running_off_rom() -> anyhow::Result<()> {
    let mut emulator = Emulator::with_program(&[])?;

    assert_eq!(emulator.execute_to_halt(1_000)?, ROM_SIZE);
    assert_eq!(emulator.pc(), ROM_SIZE);
    assert_eq!(emulator.step(), Err(ExecuteErr::RomOutOfBounds(ROM_SIZE)));

    Ok(())
}

#[test]
fn operands_read_zero_past_rom_end() -> anyhow::Result<()> {
    let mut program = vec![InstructionKind::Nop.opcode(); ROM_SIZE - 2];
    program.extend([InstructionKind::Imm.opcode(), 9]);

    let mut emulator = Emulator::with_program(&program)?;
    emulator.execute_to_halt(ROM_SIZE)?;

    assert_eq!(emulator.register(gpr(0)), 9);
    assert_eq!(emulator.pc(), ROM_SIZE + 1);

    Ok(())
}

#[test]
fn stack_pops_in_reverse() -> anyhow::Result<()> {
    let values: Vec<Word> = (0..STACK_SIZE as Word).map(|n| n * 3 + 1).collect();

    let mut source = String::new();
    for value in &values {
        source += &format!("IMM {} 0\nPSH 0\n", value);
    }
    source += "IMM 16 2\n";
    for _ in &values {
        source += "POP 1\nRSR 1 2\nINC 2\n";
    }
    source += "HLT";

    let mut emulator = emulator(&source);
    emulator.execute_to_halt(1_000)?;

    // Pops were written out in order to RAM[16..32].
    let popped = emulator.memory().read(STACK_SIZE, STACK_SIZE)?;
    let expected: Vec<_> = values.iter().rev().copied().collect();

    assert_eq!(popped, expected.as_slice());
    assert_eq!(emulator.register(Register::STACK), 0);
    assert!(!emulator.is_busy());

    Ok(())
}

#[test]
fn stack_pointer_wraps() {
    let emulator = exec("POP 0\nHLT");

    assert_eq!(emulator.register(Register::STACK), (STACK_SIZE - 1) as Word);
}

#[test]
fn conditional_jumps() {
    let emulator = exec(
        "
        IMM 3 0
        IMM 5 1
        LT 1 0 FAIL
        GTE 0 1 FAIL
        NEQ 0 1 PASS
        LABEL FAIL
        IMM 0xEE 7
        HLT
        LABEL PASS
        IMM 0xAA 7
        HLT
        ",
    );

    assert_eq!(emulator.register(gpr(7)), 0xAA);
}

#[test]
fn flag_jumps() {
    let emulator = exec(
        "
        IMM 1 0
        DEC 0
        JNZ FAIL
        JZF ZERO
        LABEL FAIL
        HLT
        LABEL ZERO
        DEC 0
        JNN FAIL
        JNF NEGATIVE
        HLT
        LABEL NEGATIVE
        IMM 1 7
        HLT
        ",
    );

    assert_eq!(emulator.register(gpr(7)), 1);
    assert!(emulator.negative_flag());
    assert!(!emulator.zero_flag());
}

#[test]
fn overflow_jumps() {
    let emulator = exec(
        "
        IMM 255 0
        INC 0
        JNO FAIL
        JOF OVERFLOWED
        LABEL FAIL
        HLT
        LABEL OVERFLOWED
        COF
        JOF FAIL
        JNO DONE
        HLT
        LABEL DONE
        IMM 1 7
        HLT
        ",
    );

    assert_eq!(emulator.register(gpr(7)), 1);
    assert!(!emulator.overflow_flag());
}

#[test]
fn equality_and_ordering_jumps() {
    let emulator = exec(
        "
        IMM 4 0
        IMM 4 1
        IMM 9 2
        GT 0 1 FAIL
        EQ 0 2 FAIL
        LTE 0 1 EQUAL
        LABEL FAIL
        IMM 0xEE 7
        HLT
        LABEL EQUAL
        LTE 2 0 FAIL
        EQ 0 1 GREATER
        HLT
        LABEL GREATER
        GT 2 0 PASS
        HLT
        LABEL PASS
        IMM 0xAA 7
        HLT
        ",
    );

    assert_eq!(emulator.register(gpr(7)), 0xAA);
}

#[test]
fn clear_register_and_single_flags() {
    let setup = "IMM 9 3\nCLR 3\nIMM 0 0\nDEC 0\nIMM 255 1\nINC 1\n";

    let emulator = exec(&format!("{}HLT", setup));
    assert_eq!(emulator.register(gpr(3)), 0);
    assert_eq!(
        emulator.flags(),
        ALUFlags::NEGATIVE | ALUFlags::OVERFLOW | ALUFlags::ZERO
    );

    let emulator = exec(&format!("{}CNF\nHLT", setup));
    assert_eq!(emulator.flags(), ALUFlags::OVERFLOW | ALUFlags::ZERO);

    let emulator = exec(&format!("{}CZF\nHLT", setup));
    assert_eq!(emulator.flags(), ALUFlags::NEGATIVE | ALUFlags::OVERFLOW);

    let emulator = exec(&format!("{}CNF\nCZF\nHLT", setup));
    assert_eq!(emulator.flags(), ALUFlags::OVERFLOW);
}

#[test]
fn jump_register() {
    let emulator = exec(
        "
        IMM TARGET 3
        JMR 3
        HLT
        LABEL TARGET
        IMM 1 0
        HLT
        ",
    );

    assert_eq!(emulator.register(gpr(0)), 1);
}

#[test]
fn add_with_overflow_writes_overflow_register() {
    let emulator = exec("IMM 200 0\nIMM 100 1\nADO 0 1 2\nHLT");

    assert_eq!(emulator.register(gpr(2)), 44);
    assert_eq!(emulator.register(Register::OVERFLOW), 1);
}

#[test]
fn multiply_with_overflow() {
    let emulator = exec("IMM 20 0\nIMM 30 1\nMLO 0 1 2\nMUL 0 1 3\nHLT");

    assert_eq!(emulator.register(gpr(2)), (600 % 256) as Word);
    assert_eq!(emulator.register(gpr(3)), (600 % 256) as Word);
    assert_eq!(emulator.register(Register::OVERFLOW), 2);
    assert!(emulator.overflow_flag());
}

#[test]
fn flags_persist_until_cleared() {
    let emulator = exec("IMM 255 0\nINC 0\nCPY 0 1\nNOP\nHLT");
    assert_eq!(emulator.flags(), ALUFlags::OVERFLOW | ALUFlags::ZERO);

    let emulator = exec("IMM 255 0\nINC 0\nCOF\nHLT");
    assert_eq!(emulator.flags(), ALUFlags::ZERO);

    let emulator = exec("IMM 255 0\nINC 0\nCLF\nHLT");
    assert_eq!(emulator.flags(), ALUFlags::empty());
}

#[test]
fn modulo_by_zero_faults() {
    let mut emulator = emulator("IMM 7 0\nMOD 0 1 2\nHLT");

    assert_eq!(emulator.execute_to_halt(10), Err(ExecuteErr::DivisionByZero));
    assert_eq!(emulator.pc(), 3);
}

#[test]
fn seven_segment_lookup() {
    let emulator = exec("IMM 8 0\nSEG 0 1\nIMM 200 2\nIMM 0x77 3\nSEG 2 3\nHLT");

    assert_eq!(emulator.register(gpr(1)), 0b1111111);
    // Unknown codes leave the destination alone.
    assert_eq!(emulator.register(gpr(3)), 0x77);
}

#[test]
fn reset_state_instruction_keeps_pc() {
    let emulator = exec("IMM 9 0\nIMM 9 ADDR\nRST\nHLT");

    assert_eq!(emulator.registers(), [0; 15]);
    assert_eq!(emulator.pc(), 8);
}

#[test]
fn reset_is_idempotent() -> anyhow::Result<()> {
    let mut emulator = exec("IMM 9 0\nINC 0\nPSH 0\nHLT");
    emulator.input(300);

    emulator.reset();
    let once = (emulator.registers(), emulator.flags(), emulator.pc(), emulator.is_halted());

    emulator.reset();
    let twice = (emulator.registers(), emulator.flags(), emulator.pc(), emulator.is_halted());

    assert_eq!(once, twice);
    assert_eq!(once, ([0; 15], ALUFlags::empty(), 0, false));

    // The program is still there.
    assert_eq!(emulator.execute_to_halt(100)?, 4);

    Ok(())
}

#[test]
fn load_rejects_oversized_program() -> anyhow::Result<()> {
    let mut emulator = emulator("IMM 5 0\nHLT");
    let before = emulator.rom().to_vec();

    let oversized = [InstructionKind::Hlt.opcode(); ROM_SIZE + 1];
    assert_eq!(
        emulator.load(&oversized),
        Err(LoadErr::RomTooLarge(ROM_SIZE + 1))
    );
    assert_eq!(emulator.rom(), before.as_slice());

    emulator.load(&oversized[..ROM_SIZE])?;
    assert!(emulator.rom().iter().all(|&byte| byte == InstructionKind::Hlt.opcode()));

    Ok(())
}

#[test]
fn input_wraps() {
    let mut emulator = Emulator::new();

    emulator.input(300);

    assert_eq!(emulator.register(Register::INPUT), 44);
}

#[test]
fn current_instruction_is_recorded() -> anyhow::Result<()> {
    let mut emulator = emulator("IMM 0xAB 2\nHLT");

    assert!(emulator.current_instruction().is_none());

    emulator.step()?;
    let current = emulator.current_instruction().map(ToString::to_string);

    assert_eq!(current.as_deref(), Some("IMM AB 02"));

    Ok(())
}

#[test]
fn arithmetic_loop_keeps_running() -> anyhow::Result<()> {
    let mut emulator = emulator(
        "
        IMM 255 0
        IMM 255 1
        LABEL LOOP
        ADD 0 1 2
        MUL 2 1 3
        SUB 3 0 4
        SHL 4 1 5
        INC 0
        DEC 1
        JMP LOOP
        ",
    );

    for _ in 0..2_000 {
        emulator.step()?;
        assert!(emulator.pc() < ROM_SIZE);
    }

    assert!(!emulator.is_halted());

    Ok(())
}

#[test]
fn display_summary() {
    let emulator = exec("IMM 0x1F 0\nHLT");

    assert_eq!(
        emulator.to_string(),
        "PROGRAM COUNTER: 0x4\n\
         REGISTERS: [0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]\n\
         INPUT: 0x0 (0)"
    );
}

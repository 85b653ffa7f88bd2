mod common;

use common::{TestBus, flag, step};
use dragon_core::cpu::m6809::{CcFlag, M6809};

#[test]
fn test_nega_of_0x80_wraps() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x80;
    cpu.cc = 0;
    bus.load(0x0000, &[0x40]); // NEGA

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x80, "-(-128) wraps to itself");
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::Z));
    assert!(flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::C));
    assert_eq!(cycles, 2);
}

#[test]
fn test_negb_zero_clears_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.b = 0x00;
    cpu.cc = CcFlag::C as u8;
    bus.load(0x0000, &[0x50]); // NEGB

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0x00);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::V));
}

#[test]
fn test_neg_direct() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.memory[0x0010] = 0x01;
    bus.load(0x0000, &[0x00, 0x10]); // NEG <$10

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x0010], 0xFF);
    assert!(flag(&cpu, CcFlag::N));
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::V));
    assert_eq!(cycles, 6);
}

#[test]
fn test_comb_sets_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.b = 0x0F;
    cpu.cc = CcFlag::V as u8;
    bus.load(0x0000, &[0x53]); // COMB

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0xF0);
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_inc_dec_never_touch_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0x0000, &[0x4C, 0x4A]); // INCA; DECA

    for value in 0..=255u8 {
        for carry in [false, true] {
            cpu.pc = 0;
            cpu.a = value;
            cpu.cc = if carry { CcFlag::C as u8 } else { 0 };

            step(&mut cpu, &mut bus);
            assert_eq!(cpu.a, value.wrapping_add(1));
            assert_eq!(flag(&cpu, CcFlag::C), carry, "INCA altered C for {value:02X}");
            assert_eq!(flag(&cpu, CcFlag::V), value == 0x7F);

            step(&mut cpu, &mut bus);
            assert_eq!(cpu.a, value);
            assert_eq!(flag(&cpu, CcFlag::C), carry, "DECA altered C for {value:02X}");
            assert_eq!(flag(&cpu, CcFlag::V), value == 0x80);
        }
    }
}

#[test]
fn test_inc_indexed_memory_overflow() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2000;
    bus.memory[0x2000] = 0x7F;
    bus.load(0x0000, &[0x6C, 0x84]); // INC ,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x2000], 0x80);
    assert!(flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::N));
    assert_eq!(cycles, 6);
}

#[test]
fn test_clr_extended() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.cc = CcFlag::N as u8 | CcFlag::V as u8 | CcFlag::C as u8;
    bus.memory[0x3000] = 0x55;
    bus.load(0x0000, &[0x7F, 0x30, 0x00]); // CLR $3000

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x3000], 0x00);
    assert!(!flag(&cpu, CcFlag::N));
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::V));
    assert!(!flag(&cpu, CcFlag::C));
    assert_eq!(cycles, 7);
}

#[test]
fn test_clr_accumulators_always_0100() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0x0000, &[0x4F, 0x5F]); // CLRA; CLRB

    for cc in [0x00u8, 0x0F, 0xFF] {
        cpu.pc = 0;
        cpu.a = 0x12;
        cpu.b = 0x34;
        cpu.cc = cc;
        step(&mut cpu, &mut bus);
        step(&mut cpu, &mut bus);
        assert_eq!(cpu.get_d(), 0);
        assert_eq!(cpu.cc & 0x0F, CcFlag::Z as u8);
        assert_eq!(cpu.cc & 0xF0, cc & 0xF0, "upper CC bits untouched");
    }
}

#[test]
fn test_tsta_keeps_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x80;
    cpu.cc = CcFlag::V as u8 | CcFlag::C as u8;
    bus.load(0x0000, &[0x4D]); // TSTA

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::V));
    assert!(flag(&cpu, CcFlag::C));
}

#[test]
fn test_daa_after_bcd_add() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x67;
    cpu.cc = 0;
    bus.load(
        0x0000,
        &[
            0x8B, 0x75, // ADDA #$75
            0x19, // DAA
        ],
    );

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.a, 0xDC);
    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x42);
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::N));
}

#[test]
fn test_daa_low_nibble_from_half_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x09;
    bus.load(
        0x0000,
        &[
            0x8B, 0x09, // ADDA #$09 -> $12, H=1
            0x19, // DAA -> $18
        ],
    );

    step(&mut cpu, &mut bus);
    assert!(flag(&cpu, CcFlag::H));
    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x18);
    assert!(!flag(&cpu, CcFlag::C));
}

#[test]
fn test_sex_sign_extends_b() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x12;
    cpu.b = 0x80;
    bus.load(0x0000, &[0x1D, 0x1D]); // SEX; SEX

    step(&mut cpu, &mut bus);
    assert_eq!(cpu.get_d(), 0xFF80);
    assert!(flag(&cpu, CcFlag::N));

    cpu.b = 0x00;
    step(&mut cpu, &mut bus);
    assert_eq!(cpu.get_d(), 0x0000);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(!flag(&cpu, CcFlag::N));
}

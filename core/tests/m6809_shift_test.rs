mod common;

use common::{TestBus, flag, step};
use dragon_core::cpu::m6809::{CcFlag, M6809};

#[test]
fn test_asla_overflow_from_bit6() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x40;
    bus.load(0x0000, &[0x48]); // ASLA

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x80);
    assert!(flag(&cpu, CcFlag::V), "V = b7 ^ b6 of the operand");
    assert!(flag(&cpu, CcFlag::N));
    assert!(!flag(&cpu, CcFlag::C));
}

#[test]
fn test_asla_carry_out() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x81;
    bus.load(0x0000, &[0x48]); // ASLA

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x02);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::V));
    assert!(!flag(&cpu, CcFlag::N));
}

#[test]
fn test_asra_preserves_sign() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x81;
    bus.load(0x0000, &[0x47]); // ASRA

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0xC0);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_lsrb_to_zero() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.b = 0x01;
    cpu.cc = CcFlag::N as u8;
    bus.load(0x0000, &[0x54]); // LSRB

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0x00);
    assert!(flag(&cpu, CcFlag::Z));
    assert!(flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::N), "LSR forces N clear");
}

#[test]
fn test_rola_through_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.a = 0x80;
    cpu.cc = CcFlag::C as u8;
    bus.load(0x0000, &[0x49]); // ROLA

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x01);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::V));
}

#[test]
fn test_rorb_through_carry() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.b = 0x01;
    cpu.cc = CcFlag::C as u8;
    bus.load(0x0000, &[0x56]); // RORB

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0x80);
    assert!(flag(&cpu, CcFlag::C));
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_lsr_extended_leaves_overflow() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.cc = CcFlag::V as u8;
    bus.memory[0x4000] = 0x02;
    bus.load(0x0000, &[0x74, 0x40, 0x00]); // LSR $4000

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x4000], 0x01);
    assert!(flag(&cpu, CcFlag::V), "right shifts do not touch V");
    assert!(!flag(&cpu, CcFlag::C));
    assert_eq!(cycles, 7);
}

#[test]
fn test_asl_direct_memory() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.dp = 0x10;
    bus.memory[0x1020] = 0x21;
    bus.load(0x0000, &[0x08, 0x20]); // ASL <$20

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x1020], 0x42);
    assert!(!flag(&cpu, CcFlag::C));
    assert!(!flag(&cpu, CcFlag::V));
    assert_eq!(cycles, 6);
}

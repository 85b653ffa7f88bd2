mod common;

use std::sync::{Arc, Mutex};

use common::{TestBus, flag, step};
use dragon_core::cpu::m6809::{CcFlag, IllegalInstruction, IllegalKind, M6809};

fn collect_illegal(cpu: &mut M6809) -> Arc<Mutex<Vec<IllegalInstruction>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    cpu.set_illegal_observer(Some(Box::new(move |event: &IllegalInstruction| {
        sink.lock().unwrap().push(*event);
    })));
    events
}

// ============================================================
// Auto increment / decrement
// ============================================================

#[test]
fn test_stb_post_increment() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x0050;
    cpu.b = 0xAB;
    bus.load(0x0000, &[0xE7, 0x80]); // STB ,X+

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(bus.memory[0x0050], 0xAB);
    assert_eq!(cpu.x, 0x0051);
    assert_eq!(cycles, 4 + 2);
}

#[test]
fn test_ldd_post_increment_by_two() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.y = 0x3000;
    bus.set_word(0x3000, 0x1234);
    bus.load(0x0000, &[0xEC, 0xA1]); // LDD ,Y++

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.get_d(), 0x1234);
    assert_eq!(cpu.y, 0x3002);
    assert_eq!(cycles, 5 + 3);
}

#[test]
fn test_sta_pre_decrement() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.u = 0x4000;
    cpu.a = 0x5A;
    bus.load(0x0000, &[0xA7, 0xC2]); // STA ,-U

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.u, 0x3FFF);
    assert_eq!(bus.memory[0x3FFF], 0x5A);
    assert_eq!(cycles, 4 + 2);
}

#[test]
fn test_ldx_pre_decrement_by_two() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.s = 0x5002;
    bus.set_word(0x5000, 0xBEEF);
    bus.load(0x0000, &[0xAE, 0xE3]); // LDX ,--S

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.s, 0x5000);
    assert_eq!(cpu.x, 0xBEEF);
    assert_eq!(cycles, 5 + 3);
}

// ============================================================
// Constant and accumulator offsets
// ============================================================

#[test]
fn test_lda_5bit_negative_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2001;
    bus.memory[0x2000] = 0x42;
    bus.load(0x0000, &[0xA6, 0x1F]); // LDA -1,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.x, 0x2001);
    assert_eq!(cycles, 4 + 1);
    assert_eq!(cpu.pc, 0x0002);
}

#[test]
fn test_lda_5bit_positive_offset_on_y() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.y = 0x1000;
    bus.memory[0x100F] = 0x99;
    bus.load(0x0000, &[0xA6, 0x2F]); // LDA 15,Y

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x99);
    assert!(flag(&cpu, CcFlag::N));
}

#[test]
fn test_lda_no_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2000;
    bus.memory[0x2000] = 0x01;
    bus.load(0x0000, &[0xA6, 0x84]); // LDA ,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x01);
    assert_eq!(cycles, 4);
}

#[test]
fn test_lda_b_offset_is_signed() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2002;
    cpu.b = 0xFE;
    bus.memory[0x2000] = 0x33;
    bus.load(0x0000, &[0xA6, 0x85]); // LDA B,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x33);
    assert_eq!(cpu.b, 0xFE);
    assert_eq!(cycles, 4 + 1);
}

#[test]
fn test_ldb_a_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.y = 0x2000;
    cpu.a = 0x10;
    bus.memory[0x2010] = 0x44;
    bus.load(0x0000, &[0xE6, 0xA6]); // LDB A,Y

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0x44);
}

#[test]
fn test_lda_8bit_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2080;
    bus.memory[0x2000] = 0x21;
    bus.load(0x0000, &[0xA6, 0x88, 0x80]); // LDA -128,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x21);
    assert_eq!(cycles, 4 + 1);
    assert_eq!(cpu.pc, 0x0003);
}

#[test]
fn test_lda_16bit_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.u = 0x1000;
    bus.memory[0x2000] = 0x22;
    bus.load(0x0000, &[0xA6, 0xC9, 0x10, 0x00]); // LDA $1000,U

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x22);
    assert_eq!(cycles, 4 + 4);
    assert_eq!(cpu.pc, 0x0004);
}

#[test]
fn test_lda_d_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2001;
    cpu.set_d(0xFFFF);
    bus.memory[0x2000] = 0x23;
    bus.load(0x0000, &[0xE6, 0x8B]); // LDB D,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.b, 0x23);
    assert_eq!(cycles, 4 + 4);
}

// ============================================================
// PC relative
// ============================================================

#[test]
fn test_lda_pcr_8bit() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.memory[0x0013] = 0x5C;
    bus.load(0x0000, &[0xA6, 0x8C, 0x10]); // LDA $10,PCR

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x5C, "offset is relative to the next instruction");
    assert_eq!(cycles, 4 + 1);
}

#[test]
fn test_lda_pcr_16bit() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.memory[0x1004] = 0x5D;
    bus.load(0x0000, &[0xA6, 0x8D, 0x10, 0x00]); // LDA $1000,PCR

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x5D);
    assert_eq!(cycles, 4 + 5);
}

// ============================================================
// Indirect
// ============================================================

#[test]
fn test_lda_indirect_no_offset() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2000;
    bus.set_word(0x2000, 0x3000);
    bus.memory[0x3000] = 0x77;
    bus.load(0x0000, &[0xA6, 0x94]); // LDA [,X]

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x77);
    assert_eq!(cycles, 4 + 3);
}

#[test]
fn test_lda_indirect_post_increment_by_two() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x2000;
    bus.set_word(0x2000, 0x3000);
    bus.memory[0x3000] = 0x78;
    bus.load(0x0000, &[0xA6, 0x91]); // LDA [,X++]

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x78);
    assert_eq!(cpu.x, 0x2002);
    assert_eq!(cycles, 4 + 3 + 3);
}

#[test]
fn test_lda_extended_indirect() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.set_word(0x2000, 0x3000);
    bus.memory[0x3000] = 0x79;
    bus.load(0x0000, &[0xA6, 0x9F, 0x20, 0x00]); // LDA [$2000]

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.a, 0x79);
    assert_eq!(cycles, 4 + 5);
    assert_eq!(cpu.pc, 0x0004);
}

// ============================================================
// Malformed post-bytes
// ============================================================

#[test]
fn test_indirect_single_increment_is_illegal() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    let events = collect_illegal(&mut cpu);
    cpu.x = 0x2000;
    bus.load(0x0000, &[0xA6, 0x90, 0x12]); // LDA [,X+] (undefined)

    step(&mut cpu, &mut bus);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0],
        IllegalInstruction {
            addr: 0x0000,
            opcode: 0xA6,
            kind: IllegalKind::IndexedPostbyte(0x90),
        }
    );
    assert_eq!(cpu.x, 0x2000, "X is not incremented");
    assert_eq!(cpu.pc, 0x0002);
}

#[test]
fn test_reserved_submodes_are_illegal() {
    for post in [0x87u8, 0x8A, 0x8E, 0x8F, 0x92, 0x97] {
        let mut cpu = M6809::new();
        let mut bus = TestBus::new();
        let events = collect_illegal(&mut cpu);
        bus.load(0x0000, &[0xA6, post]);

        step(&mut cpu, &mut bus);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1, "post-byte {post:02X}");
        assert_eq!(events[0].kind, IllegalKind::IndexedPostbyte(post));
    }
}

// ============================================================
// LEA
// ============================================================

#[test]
fn test_leax_sets_zero() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x0001;
    bus.load(0x0000, &[0x30, 0x1F]); // LEAX -1,X

    let cycles = step(&mut cpu, &mut bus);

    assert_eq!(cpu.x, 0x0000);
    assert!(flag(&cpu, CcFlag::Z));
    assert_eq!(cycles, 4 + 1);
}

#[test]
fn test_leay_clears_zero() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.cc = CcFlag::Z as u8;
    cpu.x = 0x1000;
    bus.load(0x0000, &[0x31, 0x01]); // LEAY 1,X

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.y, 0x1001);
    assert!(!flag(&cpu, CcFlag::Z));
}

#[test]
fn test_leas_and_leau_leave_flags() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.s = 0x0001;
    cpu.u = 0x0001;
    cpu.cc = 0;
    bus.load(
        0x0000,
        &[
            0x32, 0x7F, // LEAS -1,S
            0x33, 0x5F, // LEAU -1,U
        ],
    );

    step(&mut cpu, &mut bus);
    step(&mut cpu, &mut bus);

    assert_eq!(cpu.s, 0x0000);
    assert_eq!(cpu.u, 0x0000);
    assert_eq!(cpu.cc, 0);
}

#[test]
fn test_leax_post_increment_on_itself() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    cpu.x = 0x1000;
    bus.load(0x0000, &[0x30, 0x80]); // LEAX ,X+

    step(&mut cpu, &mut bus);

    assert_eq!(cpu.x, 0x1000, "EA overwrites the incremented X");
}

use std::time::Duration;

use dragon_core::core::machine::Machine;
use dragon_core::core::{HaltSignal, KeyPress};
use dragon_core::cpu::m6809::RunLimits;
use dragon_machines::dragon::{DragonConfig, DragonModel, DragonSystem};
use dragon_machines::registry::{self, MachineOptions};
use dragon_machines::rom_loader::{RomLoadError, RomSet};

const IRQ_HANDLER: u16 = 0x8100;

/// A 16 KiB BASIC image with `program` at $8000 and the reset vector
/// pointing at it. The IRQ vector points at `handler`, if any.
fn basic_image(program: &[u8], handler: &[u8]) -> Vec<u8> {
    let mut image = vec![0u8; 0x4000];
    image[..program.len()].copy_from_slice(program);
    image[0x100..0x100 + handler.len()].copy_from_slice(handler);
    image[0x3FF8..0x3FFA].copy_from_slice(&IRQ_HANDLER.to_be_bytes());
    image[0x3FFE..].copy_from_slice(&[0x80, 0x00]);
    image
}

fn dragon_with(program: &[u8], handler: &[u8]) -> DragonSystem {
    let mut sys = DragonSystem::new(&DragonConfig::default());
    sys.load_basic(&basic_image(program, handler)).unwrap();
    sys.reset();
    sys
}

fn run_ops(sys: &mut DragonSystem, ops: u32) {
    let limits = RunLimits {
        burst_op_count: ops,
        max_run_time: Duration::from_secs(30),
        target_cycles_per_sec: None,
    };
    let report = sys.run_burst(&limits, &HaltSignal::new());
    assert_eq!(report.ops, ops);
}

// =================================================================
// Memory map
// =================================================================

#[test]
fn test_reset_vector_comes_from_basic_mirror() {
    let mut sys = dragon_with(&[0x20, 0xFE], &[]);
    assert_eq!(sys.cpu_state().pc, 0x8000);
    assert_eq!(sys.memory().peek(0xFFFE), 0x80);
    assert_eq!(sys.memory().peek(0xFFFF), 0x00);
    assert_eq!(sys.memory().peek(0xBFFE), 0x80);
}

#[test]
fn test_basic_rom_is_write_protected() {
    let mut sys = dragon_with(&[0x20, 0xFE], &[]);
    sys.memory().write_byte(0x8000, 0x55);
    assert_eq!(sys.memory().read_byte(0x8000), 0x20);

    sys.memory().write_byte(0x1234, 0x55);
    assert_eq!(sys.memory().read_byte(0x1234), 0x55);
}

#[test]
fn test_wrong_basic_size_rejected() {
    let mut sys = DragonSystem::new(&DragonConfig::default());
    let err = sys.load_basic(&[0u8; 0x2000]).unwrap_err();
    assert!(matches!(
        err,
        RomLoadError::SizeMismatch {
            expected: 0x4000,
            actual: 0x2000,
            ..
        }
    ));
}

#[test]
fn test_cartridge_lands_at_c000() {
    let mut sys = dragon_with(&[0x20, 0xFE], &[]);
    sys.load_cartridge(&[0xAA, 0xBB]).unwrap();
    assert_eq!(sys.memory().peek(0xC000), 0xAA);
    assert_eq!(sys.memory().peek(0xC001), 0xBB);
    assert!(sys.load_cartridge(&vec![0u8; 0x4000]).is_err());
}

// =================================================================
// Text screen
// =================================================================

#[test]
fn test_program_writes_appear_on_text_screen() {
    let program = [
        0x86, 0x48, // LDA #'H'
        0xB7, 0x04, 0x00, // STA $0400
        0x86, 0x49, // LDA #'I'
        0xB7, 0x04, 0x01, // STA $0401
        0x20, 0xFE, // BRA *
    ];
    let mut sys = dragon_with(&program, &[]);
    sys.take_display();
    run_ops(&mut sys, 10);

    let rows = sys.take_display().expect("screen changed");
    assert_eq!(rows.len(), 16);
    assert!(rows[0].starts_with("HI "), "row 0 was {:?}", rows[0]);
    assert_eq!(rows[0].chars().count(), 32);
    assert!(sys.take_display().is_none());
}

#[test]
fn test_display_hook_sees_video_writes() {
    use std::sync::{Arc, Mutex};

    let program = [0x86, 0x41, 0xB7, 0x04, 0x20, 0x20, 0xFE];
    let mut sys = dragon_with(&program, &[]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    sys.add_display_hook(Box::new(move |_, _, addr, value| {
        log.lock().unwrap().push((addr, value));
        value
    }));
    run_ops(&mut sys, 3);

    assert_eq!(*seen.lock().unwrap(), vec![(0x0420, 0x41)]);
    assert_eq!(sys.memory().peek(0x0420), 0x41);
}

// =================================================================
// Keyboard
// =================================================================

#[test]
fn test_typed_key_shows_in_matrix() {
    let program = [
        0x86, 0xFF, // LDA #$FF
        0xB7, 0xFF, 0x02, // STA $FF02   DDRB: all outputs
        0x86, 0x04, // LDA #$04
        0xB7, 0xFF, 0x01, // STA $FF01   CRA: data select
        0xB7, 0xFF, 0x03, // STA $FF03   CRB: data select
        // loop:
        0x86, 0xFD, // LDA #$FD      strobe column 1
        0xB7, 0xFF, 0x02, // STA $FF02
        0xB6, 0xFF, 0x00, // LDA $FF00
        0xB7, 0x06, 0x00, // STA $0600
        0x20, 0xF3, // BRA loop
    ];
    let mut sys = dragon_with(&program, &[]);
    run_ops(&mut sys, 20);
    assert_eq!(sys.memory().peek(0x0600), 0xFF, "nothing pressed");

    assert!(sys.input_sender().send(KeyPress::Ascii(b'A')));
    // The idle keyboard polls the queue every 1000 cycles
    run_ops(&mut sys, 1_000);
    // 'A' is row 2, column 1 on the Dragon layout
    assert_eq!(sys.memory().peek(0x0600), 0xFB);
}

// =================================================================
// Field sync interrupt
// =================================================================

#[test]
fn test_field_sync_raises_irq() {
    let program = [
        0x10, 0xCE, 0x7F, 0x00, // LDS #$7F00
        0x86, 0x05, // LDA #$05
        0xB7, 0xFF, 0x03, // STA $FF03   CRB: data select, CB1 IRQ on
        0x1C, 0xEF, // ANDCC #$EF
        0x20, 0xFE, // BRA *
    ];
    let handler = [
        0xB6, 0xFF, 0x02, // LDA $FF02   acknowledge
        0x7C, 0x06, 0x00, // INC $0600
        0x3B, // RTI
    ];
    let mut sys = dragon_with(&program, &handler);
    run_ops(&mut sys, 40_000);

    let fields = sys.io().fields();
    assert!(fields >= 2, "only {fields} fields");
    let count = sys.memory().peek(0x0600) as u64;
    assert!(count >= 2, "only {count} interrupts");
    assert!(count <= fields);
}

#[test]
fn test_field_sync_can_be_disabled() {
    let program = [0x86, 0x05, 0xB7, 0xFF, 0x03, 0x1C, 0xEF, 0x20, 0xFE];
    let config = DragonConfig {
        field_sync: false,
        ..DragonConfig::default()
    };
    let mut sys = DragonSystem::new(&config);
    sys.load_basic(&basic_image(&program, &[0x7C, 0x06, 0x00, 0x3B]))
        .unwrap();
    sys.reset();
    run_ops(&mut sys, 40_000);

    assert_eq!(sys.io().fields(), 0);
    assert_eq!(sys.memory().peek(0x0600), 0);
}

// =================================================================
// Registry and ROM sets
// =================================================================

#[test]
fn test_registry_lists_machines() {
    let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
    for expected in ["coco", "dragon32", "dragon64", "simple6809"] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);

    let entry = registry::find("Dragon32").expect("case-insensitive lookup");
    assert_eq!(entry.name, "dragon32");
    assert!(registry::find("trs80").is_none());
}

#[test]
fn test_checksum_mismatch_rejected_unless_disabled() {
    let image = basic_image(&[0x20, 0xFE], &[]);
    let rom_set = RomSet::from_slices(&[("d32.rom", image.as_slice())]);
    let entry = registry::find("dragon32").unwrap();

    let result = (entry.create)(&rom_set, &MachineOptions::default());
    assert!(matches!(
        result,
        Err(RomLoadError::ChecksumMismatch { ref file, .. }) if file == "d32.rom"
    ));

    let options = MachineOptions {
        verify_checksums: false,
        ..MachineOptions::default()
    };
    let machine = (entry.create)(&rom_set, &options).unwrap();
    assert_eq!(machine.name(), "dragon32");
    assert_eq!(machine.cpu_state().pc, 0x8000);
}

#[test]
fn test_missing_rom_reported() {
    let entry = registry::find("dragon64").unwrap();
    let result = (entry.create)(&RomSet::new(), &MachineOptions::default());
    assert!(matches!(result, Err(RomLoadError::MissingFile(ref name)) if name == "d64_1.rom"));
}

#[test]
fn test_coco_boots_without_extended_basic() {
    let mut bas = vec![0u8; 0x2000];
    bas[0x1FFE..].copy_from_slice(&[0xA0, 0x27]);
    let rom_set = RomSet::from_slices(&[("bas13.rom", bas.as_slice())]);

    let mut sys = DragonSystem::new(&DragonConfig {
        model: DragonModel::CoCo,
        ..DragonConfig::default()
    });
    sys.load_rom_set(&rom_set, false).unwrap();
    sys.reset();

    assert_eq!(sys.name(), "coco");
    assert_eq!(sys.cpu_state().pc, 0xA027);
    assert_eq!(sys.memory().peek(0x8000), 0x00);
}

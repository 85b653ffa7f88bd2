use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use dragon_core::core::BusMaster;
use dragon_core::cpu::m6809::M6809;
use dragon_core::cpu::m6809::opcodes::{self, Opcode};
use dragon_cpu_validation::{BusOp, CpuState, TestCase, TracingBus, write_test_file};
use rand::Rng;

const DEFAULT_COUNT: usize = 1000;

fn build_ram(memory: &[u8; 0x10000], addresses: &BTreeSet<u16>) -> Vec<(u16, u8)> {
    addresses
        .iter()
        .map(|&addr| (addr, memory[addr as usize]))
        .collect()
}

/// Prefix (if any) and opcode byte.
fn encoding(code: u16) -> Vec<u8> {
    if code > 0xFF {
        code.to_be_bytes().to_vec()
    } else {
        vec![code as u8]
    }
}

/// One random case, or `None` if the core made more accesses than it
/// charged cycles for (the vector format cannot express that).
fn generate_case(rng: &mut impl Rng, op: &Opcode) -> Option<TestCase> {
    let mut cpu = M6809::new();
    let mut bus = TracingBus::new();

    // Random memory everywhere; operands stay random
    rng.fill(&mut bus.memory[..]);

    cpu.a = rng.r#gen();
    cpu.b = rng.r#gen();
    cpu.dp = rng.r#gen();
    cpu.x = rng.r#gen();
    cpu.y = rng.r#gen();
    cpu.u = rng.r#gen();
    cpu.s = rng.r#gen();
    cpu.cc = rng.r#gen();
    cpu.pc = rng.gen_range(0..=0xFFFF - u16::from(op.bytes));

    let pc = cpu.pc;
    bus.load(pc, &encoding(op.code));
    let pre_memory = bus.memory;
    let mut initial = CpuState::capture(&cpu);

    let cycles = cpu.step(&mut bus, BusMaster::Cpu(0)) as usize;
    if bus.cycles.len() > cycles {
        return None;
    }

    let mut final_state = CpuState::capture(&cpu);
    let addresses: BTreeSet<u16> = bus.cycles.iter().map(|c| c.addr).collect();
    initial.ram = build_ram(&pre_memory, &addresses);
    final_state.ram = build_ram(&bus.memory, &addresses);

    let mut trace: Vec<(u16, u8, String)> = bus
        .cycles
        .iter()
        .map(|c| (c.addr, c.data, c.op.as_str().to_string()))
        .collect();
    trace.resize(cycles, (0xFFFF, 0, BusOp::Internal.as_str().to_string()));

    let name = (0..u16::from(op.bytes))
        .map(|i| format!("{:02x}", pre_memory[pc.wrapping_add(i) as usize]))
        .collect::<Vec<_>>()
        .join(" ");

    Some(TestCase {
        name,
        initial,
        final_state,
        cycles: trace,
    })
}

fn generate_opcode(rng: &mut impl Rng, op: &Opcode, count: usize) -> Vec<TestCase> {
    let mut tests = Vec::with_capacity(count);
    let mut skipped = 0;
    while tests.len() < count {
        match generate_case(rng, op) {
            Some(tc) => tests.push(tc),
            None => skipped += 1,
        }
        if skipped > count * 10 {
            eprintln!("{}: too many unrepresentable cases, stopping", op.mnemonic);
            break;
        }
    }
    tests
}

fn file_name(code: u16) -> String {
    if code > 0xFF {
        format!("{code:04x}.json.gz")
    } else {
        format!("{code:02x}.json.gz")
    }
}

fn generate_and_write(
    rng: &mut impl Rng,
    op: &Opcode,
    count: usize,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let tests = generate_opcode(rng, op, count);
    let out_path = out_dir.join(file_name(op.code));
    write_test_file(&out_path, &tests)?;
    println!(
        "Generated {} tests for {:02X} {} -> {}",
        tests.len(),
        op.code,
        op.mnemonic,
        out_path.display()
    );
    Ok(())
}

fn parse_code(arg: &str) -> Result<u16, Box<dyn Error>> {
    let digits = arg.trim_start_matches("0x").trim_start_matches("0X");
    Ok(u16::from_str_radix(digits, 16)?)
}

fn usage() -> ! {
    eprintln!("Usage: gen_m6809_tests <opcode_hex | all> [count] [out_dir]");
    eprintln!("Examples:");
    eprintln!("  gen_m6809_tests 0x86");
    eprintln!("  gen_m6809_tests 0x108e 200");
    eprintln!("  gen_m6809_tests all");
    std::process::exit(1);
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if !(2..=4).contains(&args.len()) {
        usage();
    }
    let count = match args.get(2) {
        Some(n) => n.parse()?,
        None => DEFAULT_COUNT,
    };
    let out_dir = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test_data/m6809"));
    fs::create_dir_all(&out_dir)?;

    let mut rng = rand::thread_rng();

    if args[1] == "all" {
        let mut total = 0;
        for op in opcodes::all() {
            generate_and_write(&mut rng, op, count, &out_dir)?;
            total += 1;
        }
        println!("Generated tests for {total} opcodes");
    } else {
        let code = parse_code(&args[1])?;
        let Some(op) = opcodes::lookup(code) else {
            eprintln!("Opcode {code:02X} is not defined");
            std::process::exit(1);
        };
        generate_and_write(&mut rng, op, count, &out_dir)?;
    }
    Ok(())
}

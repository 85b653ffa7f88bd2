use std::error::Error;
use std::fs;
use std::process::ExitCode;

use dragon_cpu_validation::diff_traces;

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    let [_, expected, actual] = args.as_slice() else {
        eprintln!("Usage: trace_diff <reference_trace> <actual_trace>");
        return Ok(ExitCode::from(2));
    };

    let expected_text = fs::read_to_string(expected)?;
    let actual_text = fs::read_to_string(actual)?;
    match diff_traces(&expected_text, &actual_text) {
        None => {
            println!("traces match");
            Ok(ExitCode::SUCCESS)
        }
        Some(mismatch) => {
            println!("{expected} and {actual} differ at {mismatch}");
            Ok(ExitCode::FAILURE)
        }
    }
}

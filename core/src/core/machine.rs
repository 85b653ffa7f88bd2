use crate::core::host::{HaltSignal, InputSender};
use crate::cpu::m6809::{BurstReport, RunLimits, TraceSink};
use crate::cpu::state::M6809State;

/// Machine-agnostic interface for emulated systems.
///
/// Each machine (Dragon 32, CoCo, a single-board computer) implements this
/// trait so that a host can drive it without knowing its memory map or
/// peripherals. The host owns the thread that calls `run_burst` in a loop and
/// talks to the machine only through the input queue, the halt signal and the
/// display/serial accessors below.
pub trait Machine: Send {
    /// Short name, as used on the command line.
    fn name(&self) -> &'static str;

    /// Nominal CPU clock in cycles per second (used for speed limiting).
    fn cycles_per_second(&self) -> u64;

    /// Hard reset: reload the reset vector and clear CPU state.
    fn reset(&mut self);

    /// Run one burst of instructions (see [`RunLimits`]).
    fn run_burst(&mut self, limits: &RunLimits, halt: &HaltSignal) -> BurstReport;

    /// Current register snapshot.
    fn cpu_state(&self) -> M6809State;

    /// Install or remove the per-instruction trace sink.
    fn set_trace_sink(&mut self, sink: Option<TraceSink>);

    /// A producer handle for the machine's keyboard/serial input queue.
    fn input_sender(&self) -> InputSender;

    /// Text screen rows if the display changed since the last call.
    fn take_display(&mut self) -> Option<Vec<String>> {
        None
    }

    /// Bytes written to a serial port since the last call.
    fn take_serial_output(&mut self) -> Vec<u8> {
        Vec::new()
    }
}

//! Host keyboard: bytes read from stdin become keypresses on the machine's
//! input queue.

use std::io::{self, Read};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dragon_core::core::{HaltSignal, InputSender, KeyPress};
use log::{debug, warn};

/// Queue every byte from `reader` until end of input, the machine goes away
/// or `halt` is raised. Returns the number of keys queued.
pub fn feed<R: Read>(reader: R, sender: &InputSender, halt: &HaltSignal) -> io::Result<u64> {
    let mut sent = 0;
    for byte in reader.bytes() {
        if halt.is_raised() || !sender.send(KeyPress::Ascii(byte?)) {
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

/// Feed stdin on its own thread. At end of input, give the machine `grace`
/// to work through what is queued, then raise `halt`.
pub fn spawn_stdin(
    sender: InputSender,
    halt: HaltSignal,
    grace: Duration,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            match feed(io::stdin().lock(), &sender, &halt) {
                Ok(sent) => debug!("stdin closed after {sent} keys"),
                Err(e) => warn!("stdin: {e}"),
            }
            thread::sleep(grace);
            halt.raise();
        })
}

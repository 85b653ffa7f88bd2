//! Channels between the emulation thread and the host UI thread.
//!
//! The core itself never spawns threads. A host drives the CPU from one
//! thread and talks to it from another through these two primitives: a halt
//! flag checked by the burst loop, and a bounded keypress queue drained by
//! keyboard/serial callbacks on the bus.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;

/// Atomic stop request for the burst loop.
#[derive(Clone, Debug, Default)]
pub struct HaltSignal(Arc<AtomicBool>);

impl HaltSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A single key event from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyPress {
    /// A character, already translated by the host keyboard layout.
    Ascii(u8),
    /// A raw key: modifier bits plus a machine-specific scancode.
    Scan { modifier: u8, code: u8 },
}

/// Creates a bounded keypress queue holding at most `capacity` pending keys.
pub fn input_queue(capacity: usize) -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::sync_channel(capacity);
    (
        InputSender { tx },
        InputReceiver { rx, ahead: None },
    )
}

/// Producer half, owned by the UI thread.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: SyncSender<KeyPress>,
}

impl InputSender {
    /// Queue a key, blocking while the queue is full.
    /// Returns `false` if the emulator side has gone away.
    pub fn send(&self, key: KeyPress) -> bool {
        self.tx.send(key).is_ok()
    }

    /// Queue a key without blocking. Returns `false` if the queue is full or
    /// the emulator side has gone away.
    pub fn try_send(&self, key: KeyPress) -> bool {
        match self.tx.try_send(key) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queue every byte of `text` as ASCII keypresses.
    pub fn send_text(&self, text: &str) -> bool {
        text.bytes().all(|b| self.send(KeyPress::Ascii(b)))
    }
}

/// Consumer half, owned by the bus callbacks on the emulation thread.
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<KeyPress>,
    /// One key taken off the channel by `peek`; the channel keeps the rest.
    ahead: Option<KeyPress>,
}

impl InputReceiver {
    fn recv_now(&mut self) -> Option<KeyPress> {
        match self.rx.try_recv() {
            Ok(key) => Some(key),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Look at the next key without consuming it (status-register reads).
    pub fn peek(&mut self) -> Option<KeyPress> {
        if self.ahead.is_none() {
            self.ahead = self.recv_now();
        }
        self.ahead
    }

    pub fn try_recv(&mut self) -> Option<KeyPress> {
        match self.ahead.take() {
            Some(key) => Some(key),
            None => self.recv_now(),
        }
    }

    pub fn is_empty(&mut self) -> bool {
        self.peek().is_none()
    }
}

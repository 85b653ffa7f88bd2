use std::time::Duration;

use dragon_core::core::{HaltSignal, KeyPress, Throttle, input_queue};

#[test]
fn test_halt_signal_is_shared() {
    let halt = HaltSignal::new();
    let other = halt.clone();
    assert!(!halt.is_raised());

    other.raise();
    assert!(halt.is_raised());

    halt.clear();
    assert!(!other.is_raised());
}

#[test]
fn test_input_queue_order_and_peek() {
    let (tx, mut rx) = input_queue(16);
    assert!(rx.is_empty());

    assert!(tx.send_text("HI"));
    assert!(tx.send(KeyPress::Scan { modifier: 1, code: 0x30 }));

    assert_eq!(rx.peek(), Some(KeyPress::Ascii(b'H')));
    assert_eq!(rx.try_recv(), Some(KeyPress::Ascii(b'H')));
    assert_eq!(rx.try_recv(), Some(KeyPress::Ascii(b'I')));
    assert_eq!(rx.try_recv(), Some(KeyPress::Scan { modifier: 1, code: 0x30 }));
    assert_eq!(rx.try_recv(), None);
}

#[test]
fn test_input_queue_bounded() {
    let (tx, mut rx) = input_queue(1);

    assert!(tx.try_send(KeyPress::Ascii(b'A')));
    assert!(!tx.try_send(KeyPress::Ascii(b'B')));

    assert_eq!(rx.try_recv(), Some(KeyPress::Ascii(b'A')));
    assert!(tx.try_send(KeyPress::Ascii(b'C')));
}

#[test]
fn test_peek_keeps_queue_bounded() {
    let (tx, mut rx) = input_queue(4);
    for b in b"abcd" {
        assert!(tx.try_send(KeyPress::Ascii(*b)));
    }

    assert_eq!(rx.peek(), Some(KeyPress::Ascii(b'a')));
    let accepted = (0..10)
        .filter(|_| tx.try_send(KeyPress::Ascii(b'x')))
        .count();
    assert!(accepted <= 1, "{accepted} extra keys queued");

    let mut held = 0;
    while rx.try_recv().is_some() {
        held += 1;
    }
    assert!(held <= 5);
    assert_eq!(held, 4 + accepted);
}

#[test]
fn test_peek_then_recv_keeps_order() {
    let (tx, mut rx) = input_queue(4);
    tx.send_text("xy");

    assert_eq!(rx.peek(), Some(KeyPress::Ascii(b'x')));
    assert_eq!(rx.peek(), Some(KeyPress::Ascii(b'x')));
    assert_eq!(rx.try_recv(), Some(KeyPress::Ascii(b'x')));
    assert_eq!(rx.try_recv(), Some(KeyPress::Ascii(b'y')));
    assert!(rx.is_empty());
}

#[test]
fn test_input_sender_detects_closed_receiver() {
    let (tx, rx) = input_queue(4);
    drop(rx);

    assert!(!tx.send(KeyPress::Ascii(b'X')));
    assert!(!tx.try_send(KeyPress::Ascii(b'X')));
}

#[test]
fn test_throttle_delay() {
    let throttle = Throttle::new(Some(1_000_000));

    assert_eq!(
        throttle.delay_for(500_000, Duration::from_millis(100)),
        Duration::from_millis(400)
    );
    assert_eq!(
        throttle.delay_for(500_000, Duration::from_secs(1)),
        Duration::ZERO
    );
}

#[test]
fn test_throttle_unlimited() {
    let throttle = Throttle::new(None);

    assert_eq!(throttle.target(), None);
    assert_eq!(throttle.delay_for(u64::MAX, Duration::ZERO), Duration::ZERO);
    assert_eq!(throttle.pace(1_000, Duration::ZERO), Duration::ZERO);
}

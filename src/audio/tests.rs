use std::sync::mpsc;
use std::time::Duration;

use super::types::{EventOutlet, PlayerEvent};

#[test]
fn outlet_without_subscriber_swallows_events() {
    let outlet = EventOutlet::new();
    outlet.emit(PlayerEvent::Ended);
    outlet.emit(PlayerEvent::LoadStarted);
}

#[test]
fn outlet_delivers_to_the_current_subscriber() {
    let mut outlet = EventOutlet::new();
    let (tx, rx) = mpsc::channel();
    outlet.replace(tx);

    outlet.emit(PlayerEvent::LoadStarted);
    outlet.emit(PlayerEvent::CanPlay {
        duration: Some(Duration::from_secs(3)),
    });

    assert_eq!(rx.try_recv(), Ok(PlayerEvent::LoadStarted));
    assert_eq!(
        rx.try_recv(),
        Ok(PlayerEvent::CanPlay {
            duration: Some(Duration::from_secs(3)),
        })
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn replacing_the_subscriber_detaches_the_previous_one() {
    let mut outlet = EventOutlet::new();

    let (tx1, rx1) = mpsc::channel();
    outlet.replace(tx1);
    outlet.emit(PlayerEvent::LoadStarted);
    assert_eq!(rx1.try_recv(), Ok(PlayerEvent::LoadStarted));

    let (tx2, rx2) = mpsc::channel();
    outlet.replace(tx2);
    outlet.emit(PlayerEvent::Ended);

    // The old receiver sees a hang-up, never the new event.
    assert_eq!(rx1.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    assert_eq!(rx2.try_recv(), Ok(PlayerEvent::Ended));
    assert!(rx2.try_recv().is_err());
}

#[test]
fn events_before_the_swap_stay_with_the_old_subscriber() {
    let mut outlet = EventOutlet::new();

    let (tx1, rx1) = mpsc::channel();
    outlet.replace(tx1);
    outlet.emit(PlayerEvent::TimeUpdate {
        position: Duration::from_secs(7),
    });

    let (tx2, rx2) = mpsc::channel();
    outlet.replace(tx2);

    // Already-queued events still drain from the old receiver before it
    // reports the hang-up; nothing leaks into the new one.
    assert_eq!(
        rx1.try_recv(),
        Ok(PlayerEvent::TimeUpdate {
            position: Duration::from_secs(7),
        })
    );
    assert_eq!(rx1.try_recv(), Err(mpsc::TryRecvError::Disconnected));
    assert!(rx2.try_recv().is_err());
}

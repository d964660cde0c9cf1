//! Integration tests for the seat manager using a mock connector.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use narthex::{
    Authority, ConnectError, DisplayNumber, DisplayState, NarthexError,
    RemoteEndpoint, SeatEvent, SeatId, SeatManager, SeatState, Secret,
    ServerConnector, ServerLink, SessionId, SessionRegistry, XdmcpSession,
};
use tokio::sync::Notify;

// =========================================================================
// Mock connector with per-link cut switches.
// =========================================================================

#[derive(Clone, Default)]
struct MockConnector {
    /// One switch per established link, in connection order.
    links: Arc<Mutex<Vec<Arc<Notify>>>>,
    shutdowns: Arc<AtomicUsize>,
}

impl MockConnector {
    /// Simulates endpoint loss on the nth established link.
    fn cut_link(&self, index: usize) {
        self.links.lock().unwrap()[index].notify_one();
    }

    fn shutdown_count(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }
}

struct MockLink {
    cut: Arc<Notify>,
    shutdowns: Arc<AtomicUsize>,
}

impl ServerConnector for MockConnector {
    type Link = MockLink;

    async fn connect(
        &self,
        _endpoint: &RemoteEndpoint,
        _authority: &Authority,
    ) -> Result<MockLink, ConnectError> {
        let cut = Arc::new(Notify::new());
        self.links.lock().unwrap().push(cut.clone());
        Ok(MockLink {
            cut,
            shutdowns: self.shutdowns.clone(),
        })
    }
}

impl ServerLink for MockLink {
    async fn closed(&mut self) -> ConnectError {
        self.cut.notified().await;
        ConnectError::Closed
    }

    async fn shutdown(&mut self) {
        self.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

// -- Helpers ----------------------------------------------------------------

fn negotiated_session(id: u64) -> XdmcpSession {
    let number = DisplayNumber(id as u16);
    let authority = Authority::new(number, "10.0.0.7", Secret::generate());
    XdmcpSession::new(SessionId(id), number, authority)
}

async fn wait_for<C: ServerConnector>(
    manager: &mut SeatManager<C>,
    predicate: impl Fn(&SeatEvent) -> bool,
) -> Vec<SeatEvent> {
    let mut events = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = manager.next_event().await.expect("event stream ended");
            let done = predicate(&event);
            events.push(event);
            if done {
                break;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for event; saw {events:?}"));
    events
}

// =========================================================================
// Bring-up
// =========================================================================

#[tokio::test]
async fn test_bring_up_drives_a_claimed_session_to_running() {
    let mut registry = SessionRegistry::new();
    registry.register(negotiated_session(1)).unwrap();
    let session = registry.claim(SessionId(1)).unwrap();

    let mut manager = SeatManager::new(MockConnector::default());
    let seat_id = manager.add_session(session);

    manager.bring_up(seat_id).await.expect("bring-up should succeed");

    wait_for(&mut manager, |e| {
        matches!(
            e,
            SeatEvent::DisplayStatusChanged {
                to: DisplayState::Running,
                ..
            }
        )
    })
    .await;

    let info = manager.handle(seat_id).unwrap().info().await.unwrap();
    assert_eq!(info.state, SeatState::Running);
    assert_eq!(info.displays, 1);
}

#[tokio::test]
async fn test_bring_up_twice_fails_without_disturbing_the_seat() {
    let mut manager = SeatManager::new(MockConnector::default());
    let seat_id = manager.add_session(negotiated_session(1));
    manager.bring_up(seat_id).await.unwrap();

    let second = manager.bring_up(seat_id).await;
    assert!(matches!(second, Err(NarthexError::Seat(_))));

    let info = manager.handle(seat_id).unwrap().info().await.unwrap();
    assert_eq!(info.state, SeatState::Running);
    assert_eq!(info.displays, 1);
}

#[tokio::test]
async fn test_unknown_seat_is_reported() {
    let manager = SeatManager::new(MockConnector::default());
    let result = manager.bring_up(SeatId(12345)).await;
    assert!(matches!(result, Err(NarthexError::UnknownSeat(SeatId(12345)))));
}

// =========================================================================
// Failure isolation
// =========================================================================

#[tokio::test]
async fn test_one_seat_failing_does_not_disturb_siblings() {
    let connector = MockConnector::default();
    let mut manager = SeatManager::new(connector.clone());

    let seat_a = manager.add_session(negotiated_session(1));
    let seat_b = manager.add_session(negotiated_session(2));
    manager.bring_up(seat_a).await.unwrap();
    manager.bring_up(seat_b).await.unwrap();

    // Link 0 belongs to seat A (bring-ups ran in order).
    connector.cut_link(0);

    let events = wait_for(&mut manager, |e| {
        matches!(
            e,
            SeatEvent::StateChanged {
                to: SeatState::Failed,
                ..
            }
        )
    })
    .await;

    // Only seat A failed.
    for event in &events {
        if let SeatEvent::StateChanged {
            seat,
            to: SeatState::Failed,
            ..
        } = event
        {
            assert_eq!(*seat, seat_a);
        }
    }
    let info_b = manager.handle(seat_b).unwrap().info().await.unwrap();
    assert_eq!(info_b.state, SeatState::Running);
}

// =========================================================================
// Teardown
// =========================================================================

#[tokio::test]
async fn test_remove_seat_stops_and_forgets_it() {
    let connector = MockConnector::default();
    let mut manager = SeatManager::new(connector.clone());
    let seat_id = manager.add_session(negotiated_session(1));
    manager.bring_up(seat_id).await.unwrap();

    manager.remove_seat(seat_id).await.unwrap();

    assert_eq!(manager.seat_count(), 0);
    assert_eq!(connector.shutdown_count(), 1, "link released on removal");
    assert!(matches!(
        manager.bring_up(seat_id).await,
        Err(NarthexError::UnknownSeat(_))
    ));
}

#[tokio::test]
async fn test_remove_unknown_seat_is_an_error() {
    let mut manager = SeatManager::new(MockConnector::default());
    assert!(matches!(
        manager.remove_seat(SeatId(777)).await,
        Err(NarthexError::UnknownSeat(SeatId(777)))
    ));
}

#[tokio::test]
async fn test_shutdown_stops_every_seat() {
    let connector = MockConnector::default();
    let mut manager = SeatManager::new(connector.clone());

    let seat_a = manager.add_session(negotiated_session(1));
    let seat_b = manager.add_session(negotiated_session(2));
    manager.bring_up(seat_a).await.unwrap();
    manager.bring_up(seat_b).await.unwrap();
    let handle_a = manager.handle(seat_a).unwrap().clone();

    manager.shutdown().await;

    assert_eq!(manager.seat_count(), 0);
    assert_eq!(connector.shutdown_count(), 2, "both links released");
    // The actors are gone; old handles report it.
    assert!(handle_a.info().await.is_err());
}

use std::task::{Context, Poll};
use std::time::Duration;

use futures::task::noop_waker_ref;
use tower::Service;

use peer_address_book::testing::{fresh_address, TestChannel, TestClock, TestPlatform};
use peer_address_book::{
    BookConfig, BookRequest, BookResponse, BookService, Protocol, ALL_PROTOCOLS,
};

fn new_service(now: u64) -> BookService<u64, TestChannel, TestClock, TestPlatform> {
    let book = peer_address_book::Book::new(
        BookConfig {
            local_address: fresh_address(Protocol::Ws, 0, now),
        },
        Vec::new(),
        TestClock::new(now),
        TestPlatform::online(),
    );
    BookService::new(book)
}

#[tokio::test]
async fn service_admits_and_queries_through_call() {
    let mut svc = new_service(1_000);

    let admitted = svc
        .call(BookRequest::Add {
            channel: None,
            addresses: vec![fresh_address(Protocol::Ws, 1, 1_000)],
        })
        .await
        .unwrap();
    assert!(matches!(admitted, BookResponse::Admitted(1)));

    let peers = svc
        .call(BookRequest::Query {
            protocol_mask: ALL_PROTOCOLS,
            service_mask: 0xFF,
            max_addresses: 10,
        })
        .await
        .unwrap();
    match peers {
        BookResponse::Peers(p) => assert_eq!(p.len(), 1),
        other => panic!("unexpected response: {other:?}"),
    }
}

#[tokio::test]
async fn service_poll_ready_never_suspends() {
    let mut svc = new_service(1_000);
    let mut cx = Context::from_waker(noop_waker_ref());
    assert!(matches!(svc.poll_ready(&mut cx), Poll::Ready(Ok(()))));
}

#[tokio::test]
async fn full_lifecycle_through_the_service_layer() {
    let mut svc = new_service(0);

    svc.call(BookRequest::Add {
        channel: None,
        addresses: vec![fresh_address(Protocol::Ws, 1, 0)],
    })
    .await
    .unwrap();

    svc.call(BookRequest::Connecting(1)).await.unwrap();
    assert!(matches!(
        svc.call(BookRequest::IsConnected(1)).await.unwrap(),
        BookResponse::Bool(false)
    ));

    svc.call(BookRequest::Connected {
        channel: None,
        address: fresh_address(Protocol::Ws, 1, 0),
    })
    .await
    .unwrap();
    assert!(matches!(
        svc.call(BookRequest::IsConnected(1)).await.unwrap(),
        BookResponse::Bool(true)
    ));

    svc.call(BookRequest::Disconnected {
        channel: TestChannel::new(1),
        key: 1,
    })
    .await
    .unwrap();

    svc.call(BookRequest::Ban {
        address: fresh_address(Protocol::Ws, 1, 0),
        duration: Some(Duration::from_secs(1)),
    })
    .await
    .unwrap();
    assert!(matches!(
        svc.call(BookRequest::IsBanned(1)).await.unwrap(),
        BookResponse::Bool(true)
    ));
}

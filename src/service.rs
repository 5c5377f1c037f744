//! A [`tower::Service`] facade over [`Book`], so a network manager can
//! drive the book through the same `tower::buffer::Buffer` machinery
//! `cuprate-address-book` wraps its own service in (`lib.rs`'s
//! `init_address_book`). `call` never awaits — the inner future is
//! already resolved when it's returned, by construction.

use std::convert::Infallible;
use std::hash::Hash;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{ready, Ready};
use tower::Service;

use crate::address::PeerAddress;
use crate::book::Book;
use crate::channel::{Channel, PlatformUtils};
use crate::clock::Clock;

/// A request to the address book's [`tower::Service`] facade.
#[derive(Debug, Clone)]
pub enum BookRequest<K, C> {
    Add {
        channel: Option<C>,
        addresses: Vec<PeerAddress<K>>,
    },
    Connecting(K),
    Connected {
        channel: Option<C>,
        address: PeerAddress<K>,
    },
    Disconnected {
        channel: C,
        key: K,
    },
    Failure(K),
    Unroutable {
        channel: C,
        key: K,
    },
    Ban {
        address: PeerAddress<K>,
        duration: Option<Duration>,
    },
    Query {
        protocol_mask: u8,
        service_mask: u8,
        max_addresses: usize,
    },
    IsConnected(K),
    IsBanned(K),
}

/// The response to a [`BookRequest`].
#[derive(Debug, Clone)]
pub enum BookResponse<K> {
    Ok,
    Admitted(usize),
    Peers(Vec<PeerAddress<K>>),
    Bool(bool),
}

/// Wraps a [`Book`] as a `tower::Service`.
pub struct BookService<K, C, Clk, P> {
    book: Book<K, C, Clk, P>,
}

impl<K, C, Clk, P> BookService<K, C, Clk, P> {
    pub fn new(book: Book<K, C, Clk, P>) -> Self {
        Self { book }
    }

    pub fn into_inner(self) -> Book<K, C, Clk, P> {
        self.book
    }

    pub fn book_mut(&mut self) -> &mut Book<K, C, Clk, P> {
        &mut self.book
    }
}

impl<K, C, Clk, P> Service<BookRequest<K, C>> for BookService<K, C, Clk, P>
where
    K: Clone + Eq + Hash + std::fmt::Debug,
    C: Channel,
    Clk: Clock,
    P: PlatformUtils,
{
    type Response = BookResponse<K>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // The book never suspends: every call below runs to completion
        // synchronously, so this service is always ready.
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: BookRequest<K, C>) -> Self::Future {
        let response = match req {
            BookRequest::Add { channel, addresses } => {
                BookResponse::Admitted(self.book.add(channel, addresses))
            }
            BookRequest::Connecting(key) => {
                self.book.connecting(&key);
                BookResponse::Ok
            }
            BookRequest::Connected { channel, address } => {
                self.book.connected(channel, address);
                BookResponse::Ok
            }
            BookRequest::Disconnected { channel, key } => {
                self.book.disconnected(channel, &key);
                BookResponse::Ok
            }
            BookRequest::Failure(key) => {
                self.book.failure(&key);
                BookResponse::Ok
            }
            BookRequest::Unroutable { channel, key } => {
                self.book.unroutable(channel, &key);
                BookResponse::Ok
            }
            BookRequest::Ban { address, duration } => {
                self.book.ban(address, duration);
                BookResponse::Ok
            }
            BookRequest::Query {
                protocol_mask,
                service_mask,
                max_addresses,
            } => BookResponse::Peers(self.book.query(protocol_mask, service_mask, max_addresses)),
            BookRequest::IsConnected(key) => BookResponse::Bool(self.book.is_connected(&key)),
            BookRequest::IsBanned(key) => BookResponse::Bool(self.book.is_banned(&key)),
        };

        ready(Ok(response))
    }
}

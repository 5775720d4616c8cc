//! Single-slot, ownership-transferring channel between the two loops.
//!
//! Modeled on the RP2350 inter-core FIFO pair: one mailbox carries buffers to
//! the render loop, the other carries them back to the acquisition loop. Each
//! mailbox holds at most one handle.
//!
//! ```text
//!   acquisition ──send──▶ [ to_render ] ──receive──▶ render
//!   acquisition ◀─receive─ [ to_acquire ] ◀──send─── render
//! ```
//!
//! Handles move by value, so after `send` the sender has nothing left to
//! touch. A handle sitting in a mailbox is owned by neither side. Because
//! each side only receives from its own inbox, it can never see a buffer it
//! sent itself. With a single buffer primed into the system, the protocol
//! alternates strictly and acquisition can never get more than one frame
//! ahead of rendering.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, TrySendError};

/// The pair of single-slot mailboxes shared by both loops.
pub struct Exchange<M: RawMutex, T> {
    to_render: Channel<M, T, 1>,
    to_acquire: Channel<M, T, 1>,
}

impl<M: RawMutex, T> Exchange<M, T> {
    /// Create an empty exchange.
    pub const fn new() -> Self {
        Self {
            to_render: Channel::new(),
            to_acquire: Channel::new(),
        }
    }

    /// Hand the one and only buffer to the acquisition side before the loops start.
    ///
    /// Gives the handle back if a buffer is already waiting there.
    pub fn prime(
        &self,
        handle: T,
    ) -> Result<(), T> {
        self.to_acquire.try_send(handle).map_err(|TrySendError::Full(handle)| handle)
    }

    /// Endpoint used by the acquisition loop.
    pub const fn acquisition(&self) -> AcquisitionPort<'_, M, T> {
        AcquisitionPort {
            outbox: &self.to_render,
            inbox: &self.to_acquire,
        }
    }

    /// Endpoint used by the render loop.
    pub const fn render(&self) -> RenderPort<'_, M, T> {
        RenderPort {
            outbox: &self.to_acquire,
            inbox: &self.to_render,
        }
    }
}

impl<M: RawMutex, T> Default for Exchange<M, T> {
    fn default() -> Self { Self::new() }
}

/// Acquisition side of an [`Exchange`]: sends to render, receives from render.
pub struct AcquisitionPort<'a, M: RawMutex, T> {
    outbox: &'a Channel<M, T, 1>,
    inbox: &'a Channel<M, T, 1>,
}

/// Render side of an [`Exchange`]: sends to acquisition, receives from acquisition.
pub struct RenderPort<'a, M: RawMutex, T> {
    outbox: &'a Channel<M, T, 1>,
    inbox: &'a Channel<M, T, 1>,
}

macro_rules! port_ops {
    ($port:ident) => {
        impl<M: RawMutex, T> $port<'_, M, T> {
            /// Deposit `handle` for the other side.
            ///
            /// Suspends only while the other side's slot still holds an
            /// unconsumed handle.
            pub async fn send(
                &self,
                handle: T,
            ) {
                self.outbox.send(handle).await;
            }

            /// Take the next handle addressed to this side, suspending until one arrives.
            pub async fn receive(&self) -> T { self.inbox.receive().await }

            /// Take a waiting handle without suspending.
            pub fn try_receive(&self) -> Option<T> { self.inbox.try_receive().ok() }
        }
    };
}

port_ops!(AcquisitionPort);
port_ops!(RenderPort);

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use pollster::block_on;

    use super::*;
    use crate::frame::FrameBuffer;

    type BoxExchange = Exchange<CriticalSectionRawMutex, Box<FrameBuffer>>;

    fn address(frame: &FrameBuffer) -> *const FrameBuffer { frame as *const FrameBuffer }

    #[test]
    fn test_prime_once() {
        let exchange = BoxExchange::new();
        assert!(exchange.prime(Box::new(FrameBuffer::new())).is_ok());
        assert!(exchange.prime(Box::new(FrameBuffer::new())).is_err());
    }

    #[test]
    fn test_round_trip_keeps_identity() {
        let exchange = BoxExchange::new();
        let acquisition = exchange.acquisition();
        let render = exchange.render();

        let frame = Box::new(FrameBuffer::new());
        let original = address(&frame);
        assert!(exchange.prime(frame).is_ok());

        for round in 0..10u8 {
            let mut frame = block_on(acquisition.receive());
            assert_eq!(address(&frame), original);
            frame.values[0] = round;
            block_on(acquisition.send(frame));

            let frame = block_on(render.receive());
            assert_eq!(address(&frame), original);
            assert_eq!(frame.values[0], round);
            block_on(render.send(frame));
        }
    }

    #[test]
    fn test_sender_never_sees_own_buffer() {
        let exchange = BoxExchange::new();
        let acquisition = exchange.acquisition();
        let render = exchange.render();

        block_on(acquisition.send(Box::new(FrameBuffer::new())));
        assert!(acquisition.try_receive().is_none());

        let frame = render.try_receive().expect("render side holds the handle");
        block_on(render.send(frame));
        assert!(render.try_receive().is_none());
        assert!(acquisition.try_receive().is_some());
    }

    #[test]
    fn test_receive_blocks_until_send() {
        let exchange = BoxExchange::new();
        let received = AtomicBool::new(false);

        thread::scope(|scope| {
            let render = exchange.render();
            let received = &received;
            let consumer = scope.spawn(move || {
                let frame = block_on(render.receive());
                received.store(true, Ordering::SeqCst);
                frame
            });

            thread::sleep(Duration::from_millis(50));
            assert!(!received.load(Ordering::SeqCst), "receive returned on an empty channel");

            let frame = Box::new(FrameBuffer::new());
            let original = address(&frame);
            block_on(exchange.acquisition().send(frame));

            let frame = consumer.join().expect("consumer thread panicked");
            assert!(received.load(Ordering::SeqCst));
            assert_eq!(address(&frame), original);
        });
    }

    #[test]
    fn test_cross_thread_alternation() {
        const ROUNDS: u32 = 200;
        let exchange = BoxExchange::new();
        let frame = Box::new(FrameBuffer::new());
        let original = address(&frame) as usize;
        assert!(exchange.prime(frame).is_ok());

        thread::scope(|scope| {
            let acquisition = exchange.acquisition();
            scope.spawn(move || {
                for round in 0..ROUNDS {
                    let mut frame = block_on(acquisition.receive());
                    assert_eq!(address(&frame) as usize, original);
                    frame.min = round as f32;
                    block_on(acquisition.send(frame));
                }
            });

            let render = exchange.render();
            for round in 0..ROUNDS {
                let frame = block_on(render.receive());
                // Strict alternation: render sees every frame exactly once, in order
                assert_eq!(frame.min, round as f32);
                block_on(render.send(frame));
            }
        });
    }
}

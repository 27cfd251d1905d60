//! Stream throttling utilities

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, interval};

/// Extension trait to add throttling to any Stream
pub trait ThrottleExt: Stream {
    /// Throttle the stream to emit at most once per interval
    ///
    /// Uses "latest-wins" semantics - if multiple items arrive during an
    /// interval, only the latest is emitted. That makes it a display-side
    /// tool: a packet list refreshing at 30Hz doesn't need every packet of
    /// a dense capture. Analytical consumers must not throttle.
    fn throttle(self, duration: Duration) -> Throttle<Self>
    where
        Self: Sized,
    {
        Throttle::new(self, duration)
    }
}

impl<T: Stream> ThrottleExt for T {}

// Use pin_project_lite macro syntax
pin_project! {
    /// A stream combinator that throttles emission rate
    pub struct Throttle<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        pending: Option<S::Item>,
        done: bool,
    }
}

impl<S: Stream> Throttle<S> {
    /// Create a new throttled stream
    pub fn new(stream: S, duration: Duration) -> Self {
        let mut interval = interval(duration);
        // Set missed tick behavior to delay (don't burst)
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        Self { stream, interval, pending: None, done: false }
    }
}

impl<S: Stream> Stream for Throttle<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        // Never poll the source again once it has ended
        if *this.done {
            return Poll::Ready(this.pending.take());
        }

        // Wait for interval tick
        ready!(this.interval.poll_tick(cx));

        // Drain all available items, keeping only the latest
        loop {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => {
                    *this.pending = Some(item);
                    // Continue draining
                }
                Poll::Ready(None) => {
                    // Stream ended
                    *this.done = true;
                    return Poll::Ready(this.pending.take());
                }
                Poll::Pending => {
                    // Nothing buffered yet: stay pending until the source
                    // produces or the next tick fires
                    return match this.pending.take() {
                        Some(item) => Poll::Ready(Some(item)),
                        None => Poll::Pending,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn coalesces_bursts_to_the_latest_item() {
        let items: Vec<i32> =
            futures::stream::iter(0..100).throttle(Duration::from_millis(5)).collect().await;
        // Everything is ready within one tick, so only the latest survives
        assert_eq!(items, vec![99]);
    }

    #[tokio::test]
    async fn slow_sources_do_not_terminate_the_stream() {
        let source = futures::stream::unfold(0u32, |n| async move {
            match n {
                // Item arrives well after several empty ticks
                0 => {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Some((42, 1))
                }
                _ => None,
            }
        });

        let items: Vec<i32> = source.throttle(Duration::from_millis(1)).collect().await;
        assert_eq!(items, vec![42]);
    }

    #[tokio::test]
    async fn empty_source_yields_empty_stream() {
        let items: Vec<i32> =
            futures::stream::iter(std::iter::empty::<i32>())
                .throttle(Duration::from_millis(1))
                .collect()
                .await;
        assert!(items.is_empty());
    }
}

//! Cancellable streams of live-query snapshots.

use futures::stream::{BoxStream, Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

type Disposer = Box<dyn FnOnce() + Send>;

/// A live subscription delivering full snapshots.
///
/// Each item replaces the previous one; nothing is a diff. Call
/// [`Subscription::unsubscribe`] to release the underlying registration.
/// Dropping the handle releases it as well, and in both cases no further
/// items are delivered.
pub struct Subscription<T> {
    stream: BoxStream<'static, T>,
    disposer: Option<Disposer>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Wrap a stream with the function that tears it down.
    pub fn new<S, F>(stream: S, disposer: F) -> Self
    where
        S: Stream<Item = T> + Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        Self {
            stream: stream.boxed(),
            disposer: Some(Box::new(disposer)),
        }
    }

    /// Transform every snapshot, keeping the same registration.
    pub fn map<U, F>(mut self, f: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        let (stream, disposer) = self.take_parts();
        Subscription {
            stream: stream.map(f).boxed(),
            disposer,
        }
    }

    /// Transform every snapshot asynchronously, one snapshot at a time.
    pub fn then<U, F, Fut>(mut self, f: F) -> Subscription<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let (stream, disposer) = self.take_parts();
        Subscription {
            stream: stream.then(f).boxed(),
            disposer,
        }
    }

    /// Wait for the next snapshot. Returns `None` once the source is gone.
    pub async fn next_snapshot(&mut self) -> Option<T> {
        self.stream.next().await
    }

    fn take_parts(&mut self) -> (BoxStream<'static, T>, Option<Disposer>) {
        let stream = std::mem::replace(&mut self.stream, futures::stream::empty().boxed());
        (stream, self.disposer.take())
    }
}

impl<T> Subscription<T> {
    /// Release the registration. No further items are delivered.
    pub fn unsubscribe(mut self) {
        self.dispose();
    }

    /// Whether the registration is still held.
    pub fn is_active(&self) -> bool {
        self.disposer.is_some()
    }

    fn dispose(&mut self) {
        if let Some(disposer) = self.disposer.take() {
            disposer();
        }
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        self.get_mut().stream.poll_next_unpin(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

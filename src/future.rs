// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Aiding [`Future`]s definitions.

use std::{
    future::Future,
    io,
    pin::pin,
    sync::mpsc::{self, RecvTimeoutError},
    task, thread,
    time::Duration,
};

use derive_more::with_trait::{Display, Error};
use futures::{
    channel::oneshot,
    future::{Either, FusedFuture},
    FutureExt as _,
};
use tracing::warn;

/// [`select`] that always [`poll()`]s the `biased` [`Future`] first, and only
/// if it returns [`task::Poll::Pending`] tries to [`poll()`] the `regular` one.
///
/// Implementation is exactly the same, as [`select`] at the moment, but
/// documentation has no guarantees about this behaviour, so can be changed.
///
/// [`poll()`]: Future::poll
/// [`select`]: futures::future::select
pub(crate) const fn select_with_biased_first<A, B>(
    biased: A,
    regular: B,
) -> SelectWithBiasedFirst<A, B>
where
    A: Future + Unpin,
    B: Future + Unpin,
{
    SelectWithBiasedFirst {
        inner: Some((biased, regular)),
    }
}

/// [`Future`] returned by a [`select_with_biased_first()`] function.
pub(crate) struct SelectWithBiasedFirst<A, B> {
    /// Inner [`Future`]s.
    inner: Option<(A, B)>,
}

impl<A, B> Future for SelectWithBiasedFirst<A, B>
where
    A: Future + Unpin,
    B: Future + Unpin,
{
    type Output = Either<(A::Output, B), (B::Output, A)>;

    fn poll(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> task::Poll<Self::Output> {
        let Some((mut a, mut b)) = self.inner.take() else {
            return task::Poll::Pending;
        };

        if let task::Poll::Ready(val) = a.poll_unpin(cx) {
            return task::Poll::Ready(Either::Left((val, b)));
        }

        if let task::Poll::Ready(val) = b.poll_unpin(cx) {
            return task::Poll::Ready(Either::Right((val, a)));
        }

        self.inner = Some((a, b));
        task::Poll::Pending
    }
}

impl<A, B> FusedFuture for SelectWithBiasedFirst<A, B>
where
    A: Future + Unpin,
    B: Future + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }
}

/// Error of a [`Future`] not resolving within its time bound.
#[derive(Clone, Copy, Debug, Display, Error, Eq, PartialEq)]
#[display("deadline of {} has elapsed", humantime::format_duration(*_0))]
pub(crate) struct Elapsed(#[error(not(source))] pub(crate) Duration);

/// Awaits the given [`Future`], giving up once the `limit` elapses.
///
/// The deadline is tracked by a separate [`Timer`] thread, so it doesn't
/// depend on any async runtime. The `fut` is polled first on every wake-up,
/// and is dropped as soon as the deadline fires.
///
/// If no [`Timer`] thread can be spawned, the `fut` is awaited unbounded.
pub(crate) async fn timeout<F: Future>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, Elapsed> {
    let Some(limit) = limit else {
        return Ok(fut.await);
    };

    let (_timer, fired) = match Timer::spawn(limit) {
        Ok((timer, fired, _)) => (timer, fired),
        Err(e) => {
            warn!("failed to spawn timer thread, ignoring deadline: {e}");
            return Ok(fut.await);
        }
    };

    match select_with_biased_first(pin!(fut), fired).await {
        Either::Left((out, _)) => Ok(out),
        Either::Right(_) => Err(Elapsed(limit)),
    }
}

/// Handle of a thread firing a deadline.
///
/// Dropping it wakes the thread up, so it exits without waiting for the
/// deadline.
#[derive(Debug)]
pub(crate) struct Timer {
    /// Never sent into, only dropped.
    _cancel: mpsc::Sender<()>,
}

impl Timer {
    /// Spawns a [`Timer`] thread resolving the returned [`oneshot::Receiver`]
    /// once the `limit` elapses.
    ///
    /// # Errors
    ///
    /// If the OS refuses to spawn a new thread.
    pub(crate) fn spawn(
        limit: Duration,
    ) -> io::Result<(Self, oneshot::Receiver<()>, thread::JoinHandle<()>)> {
        let (fire, fired) = oneshot::channel();
        let (cancel, cancelled) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("cucumber-engine-timer".into())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) =
                    cancelled.recv_timeout(limit)
                {
                    _ = fire.send(());
                }
            })?;
        Ok((Self { _cancel: cancel }, fired, handle))
    }
}

#[cfg(test)]
mod tests {
    use futures::{executor::block_on, future};

    use super::*;

    #[test]
    fn polls_biased_first() {
        let out = block_on(select_with_biased_first(
            future::ready(1),
            future::ready(2),
        ));

        assert!(matches!(out, Either::Left((1, _))));
    }

    #[test]
    fn resolves_within_limit() {
        let out = block_on(timeout(
            Some(Duration::from_secs(5)),
            future::ready("done"),
        ));

        assert_eq!(out, Ok("done"));
        assert_eq!(block_on(timeout(None, future::ready(3))), Ok(3));
    }

    #[test]
    fn cancelled_timer_exits_early() {
        let started = std::time::Instant::now();
        let (timer, mut fired, thread) =
            Timer::spawn(Duration::from_secs(60)).unwrap();

        drop(timer);
        thread.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(fired.try_recv(), Err(oneshot::Canceled));
    }

    #[test]
    fn timer_fires_after_limit() {
        let (_timer, fired, _) =
            Timer::spawn(Duration::from_millis(5)).unwrap();

        assert_eq!(block_on(fired), Ok(()));
    }

    #[test]
    fn gives_up_after_limit() {
        let out = block_on(timeout(
            Some(Duration::from_millis(10)),
            future::pending::<()>(),
        ));

        assert_eq!(out, Err(Elapsed(Duration::from_millis(10))));
        assert_eq!(
            Elapsed(Duration::from_millis(10)).to_string(),
            "deadline of 10ms has elapsed",
        );
    }
}

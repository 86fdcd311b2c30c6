// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Timing of individual [`Step`] and [`Hook`] invocations.
//!
//! [`Hook`]: crate::glue::Hook
//! [`Step`]: gherkin::Step

use std::time::{Duration, Instant};

use smart_default::SmartDefault;

/// Source of [`StopWatch`]es.
#[derive(Clone, Copy, Debug, Eq, PartialEq, SmartDefault)]
pub enum Clock {
    /// Measures real elapsed time with a monotonic [`Instant`].
    #[default]
    Monotonic,

    /// Reports the same [`Duration`] for every measurement.
    ///
    /// Makes durations in [`Stats`] deterministic in tests.
    ///
    /// [`Stats`]: crate::Stats
    Fixed(Duration),
}

impl Clock {
    /// Starts measuring a new bounded operation.
    #[must_use]
    pub fn start(self) -> StopWatch {
        match self {
            Self::Monotonic => StopWatch::Running(Instant::now()),
            Self::Fixed(d) => StopWatch::Stub(d),
        }
    }
}

/// Measurement of a single bounded operation, started by [`Clock::start()`].
#[derive(Clone, Copy, Debug)]
pub enum StopWatch {
    /// Started at the given [`Instant`].
    Running(Instant),

    /// Always yields the given [`Duration`].
    Stub(Duration),
}

impl StopWatch {
    /// Stops this [`StopWatch`] returning the measured [`Duration`].
    #[must_use]
    pub fn stop(self) -> Duration {
        match self {
            Self::Running(started) => started.elapsed(),
            Self::Stub(d) => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn fixed_clock_is_deterministic() {
        let clock = Clock::Fixed(Duration::from_millis(1234));

        let watch = clock.start();
        thread::sleep(Duration::from_millis(5));

        assert_eq!(watch.stop(), Duration::from_millis(1234));
    }

    #[test]
    fn monotonic_clock_measures_elapsed_time() {
        let watch = Clock::default().start();
        thread::sleep(Duration::from_millis(5));

        assert!(watch.stop() >= Duration::from_millis(5));
    }
}

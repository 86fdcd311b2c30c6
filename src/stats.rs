// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Aggregated statistics of a run.
//!
//! Both [`Stats`] and [`RunResult`] are values forming a monoid under
//! `append()` with `IDENTITY` being the neutral element: results of any
//! executed unit are combined by appending them in execution order.

use std::{iter, time::Duration};

use crate::{error::Failure, outcome::Outcome};

/// Counters of [`Outcome`]s for a single kind of unit.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct SubCounts {
    /// Number of [`Outcome::Passed`] units.
    pub passed: usize,

    /// Number of [`Outcome::Failed`] units.
    pub failed: usize,

    /// Number of [`Outcome::Skipped`] units.
    pub skipped: usize,

    /// Number of [`Outcome::Pending`] units.
    pub pending: usize,

    /// Number of [`Outcome::Undefined`] units.
    pub undefined: usize,
}

impl SubCounts {
    /// Neutral element of [`SubCounts::append()`].
    pub const IDENTITY: Self = Self {
        passed: 0,
        failed: 0,
        skipped: 0,
        pending: 0,
        undefined: 0,
    };

    /// [`SubCounts`] of a single unit with the given [`Outcome`].
    #[must_use]
    pub const fn of(outcome: Outcome) -> Self {
        let mut counts = Self::IDENTITY;
        match outcome {
            Outcome::Passed => counts.passed = 1,
            Outcome::Failed => counts.failed = 1,
            Outcome::Skipped => counts.skipped = 1,
            Outcome::Pending => counts.pending = 1,
            Outcome::Undefined => counts.undefined = 1,
        }
        counts
    }

    /// Returns the element-wise sum of these and the `other` [`SubCounts`].
    #[must_use]
    pub const fn append(self, other: Self) -> Self {
        Self {
            passed: self.passed + other.passed,
            failed: self.failed + other.failed,
            skipped: self.skipped + other.skipped,
            pending: self.pending + other.pending,
            undefined: self.undefined + other.undefined,
        }
    }

    /// Returns the counter of the given [`Outcome`].
    #[must_use]
    pub const fn get(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Passed => self.passed,
            Outcome::Failed => self.failed,
            Outcome::Skipped => self.skipped,
            Outcome::Pending => self.pending,
            Outcome::Undefined => self.undefined,
        }
    }

    /// Returns the total number of counted units.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.pending + self.undefined
    }
}

/// Statistics of executed [`Step`]s and [`Scenario`]s.
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stats {
    /// [`Step`] counters.
    ///
    /// [`Step`]: gherkin::Step
    pub steps: SubCounts,

    /// [`Scenario`] counters.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub scenarios: SubCounts,

    /// Total time spent in [`Step`]s and [`Hook`]s.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    pub duration: Duration,

    /// Designations of [`Outcome::Failed`] [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub failed_scenarios: Vec<String>,

    /// Designations of [`Outcome::Pending`] [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub pending_scenarios: Vec<String>,

    /// Designations of [`Outcome::Undefined`] [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub undefined_scenarios: Vec<String>,
}

impl Stats {
    /// Neutral element of [`Stats::append()`].
    pub const IDENTITY: Self = Self {
        steps: SubCounts::IDENTITY,
        scenarios: SubCounts::IDENTITY,
        duration: Duration::ZERO,
        failed_scenarios: Vec::new(),
        pending_scenarios: Vec::new(),
        undefined_scenarios: Vec::new(),
    };

    /// [`Stats`] of a single [`Step`].
    ///
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn step(outcome: Outcome, duration: Option<Duration>) -> Self {
        Self {
            steps: SubCounts::of(outcome),
            duration: duration.unwrap_or_default(),
            ..Self::IDENTITY
        }
    }

    /// [`Stats`] of a single [`Hook`] invocation, which contributes its time
    /// only.
    ///
    /// [`Hook`]: crate::glue::Hook
    #[must_use]
    pub fn hook(duration: Option<Duration>) -> Self {
        Self {
            duration: duration.unwrap_or_default(),
            ..Self::IDENTITY
        }
    }

    /// [`Stats`] of a single finished [`Scenario`] identified by its
    /// `designation`.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn scenario(outcome: Outcome, designation: impl Into<String>) -> Self {
        let mut stats = Self {
            scenarios: SubCounts::of(outcome),
            ..Self::IDENTITY
        };
        let list = match outcome {
            Outcome::Failed => Some(&mut stats.failed_scenarios),
            Outcome::Pending => Some(&mut stats.pending_scenarios),
            Outcome::Undefined => Some(&mut stats.undefined_scenarios),
            Outcome::Passed | Outcome::Skipped => None,
        };
        if let Some(list) = list {
            list.push(designation.into());
        }
        stats
    }

    /// Returns new [`Stats`] being these ones followed by the `other` ones.
    ///
    /// Neither operand is modified.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        let concat = |a: &[String], b: &[String]| {
            a.iter().chain(b).cloned().collect::<Vec<_>>()
        };
        Self {
            steps: self.steps.append(other.steps),
            scenarios: self.scenarios.append(other.scenarios),
            duration: self.duration + other.duration,
            failed_scenarios: concat(
                &self.failed_scenarios,
                &other.failed_scenarios,
            ),
            pending_scenarios: concat(
                &self.pending_scenarios,
                &other.pending_scenarios,
            ),
            undefined_scenarios: concat(
                &self.undefined_scenarios,
                &other.undefined_scenarios,
            ),
        }
    }

    /// Appends the `other` [`Stats`] to these ones in place.
    ///
    /// Has the same result as [`Stats::append()`], but reuses the owned
    /// designations instead of copying them.
    pub fn merge(&mut self, other: Self) {
        self.steps = self.steps.append(other.steps);
        self.scenarios = self.scenarios.append(other.scenarios);
        self.duration += other.duration;
        self.failed_scenarios.extend(other.failed_scenarios);
        self.pending_scenarios.extend(other.pending_scenarios);
        self.undefined_scenarios.extend(other.undefined_scenarios);
    }
}

impl iter::Sum for Stats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::IDENTITY, |mut acc, s| {
            acc.merge(s);
            acc
        })
    }
}

/// [`Stats`] paired with the [`Failure`]s captured along the way.
#[derive(Clone, Debug, Default)]
pub struct RunResult {
    /// Aggregated [`Stats`].
    pub stats: Stats,

    /// Captured [`Failure`]s in the order they happened.
    pub errors: Vec<Failure>,
}

impl RunResult {
    /// Neutral element of [`RunResult::append()`].
    pub const IDENTITY: Self = Self {
        stats: Stats::IDENTITY,
        errors: Vec::new(),
    };

    /// Creates a new [`RunResult`] out of [`Stats`] and an optional
    /// [`Failure`].
    #[must_use]
    pub fn new(stats: Stats, error: Option<Failure>) -> Self {
        Self {
            stats,
            errors: error.into_iter().collect(),
        }
    }

    /// Returns a new [`RunResult`] being this one followed by the `other`
    /// one.
    ///
    /// Neither operand is modified.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        Self {
            stats: self.stats.append(&other.stats),
            errors: self.errors.iter().chain(&other.errors).cloned().collect(),
        }
    }

    /// Appends the `other` [`RunResult`] to this one in place.
    ///
    /// Has the same result as [`RunResult::append()`], but moves the owned
    /// [`Failure`]s instead of copying them.
    pub fn merge(&mut self, other: Self) {
        self.stats.merge(other.stats);
        self.errors.extend(other.errors);
    }

    /// Indicates whether any non-pending [`Failure`] was captured.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.errors.iter().any(|e| !e.is_pending())
    }
}

impl From<Stats> for RunResult {
    fn from(stats: Stats) -> Self {
        Self::new(stats, None)
    }
}

impl iter::Sum for RunResult {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::IDENTITY, |mut acc, r| {
            acc.merge(r);
            acc
        })
    }
}

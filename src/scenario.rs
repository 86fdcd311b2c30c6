// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Recorder of [`Outcome`]s of a single running [`Scenario`].
//!
//! [`Scenario`]: gherkin::Scenario

use crate::{outcome::Outcome, tree::ScenarioUnit};

/// [`Outcome`]s recorded so far for a running [`Scenario`], along with its
/// identity.
///
/// Handed to [`Hook`]s, so they may inspect the [`Scenario`] they run for.
///
/// [`Hook`]: crate::glue::Hook
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug)]
pub struct ScenarioResult {
    id: String,
    name: String,
    keyword: String,
    line: usize,
    tags: Vec<String>,
    outcomes: Vec<Outcome>,
}

impl ScenarioResult {
    /// Starts recording the given [`ScenarioUnit`].
    #[must_use]
    pub fn new(unit: &ScenarioUnit) -> Self {
        Self {
            id: unit.id.clone(),
            name: unit.scenario.name.clone(),
            keyword: unit.scenario.keyword.clone(),
            line: unit.scenario.position.line,
            tags: unit.tags.clone(),
            outcomes: Vec::new(),
        }
    }

    /// Records the [`Outcome`] of an executed unit.
    pub fn add(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Returns the worst recorded [`Outcome`], being [`Outcome::Passed`] if
    /// nothing was recorded yet.
    #[must_use]
    pub fn status(&self) -> Outcome {
        Outcome::worst(self.outcomes.iter().copied())
    }

    /// Indicates whether any recorded unit failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status() == Outcome::Failed
    }

    /// Returns all the recorded [`Outcome`]s in execution order.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Returns the effective tags of the [`Scenario`], including the
    /// inherited ones.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the name of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the keyword of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Returns the source line of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Returns the unique id of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

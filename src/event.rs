// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Sinks of a run: the [`Formatter`] receiving the structure being executed
//! and the [`Reporter`] receiving what happened to it.
//!
//! Every method has a no-op default, so implementors only override what they
//! care about.

use crate::{
    glue::{Argument, StepDefinition},
    outcome::TestResult,
    step::Location,
};

/// Resolution of a [`Step`] or a [`Hook`] as reported before its result.
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Match {
    /// Resolved to the definition at the given [`Location`].
    Definition {
        /// [`Location`] of the definition.
        location: Location,

        /// [`Argument`]s bound from the [`Step`] text, empty for [`Hook`]s.
        ///
        /// [`Hook`]: crate::glue::Hook
        /// [`Step`]: gherkin::Step
        arguments: Vec<Argument>,
    },

    /// No definition matched.
    Undefined,
}

impl Match {
    /// [`Match`] of a [`Hook`] at the given [`Location`].
    ///
    /// [`Hook`]: crate::glue::Hook
    #[must_use]
    pub const fn hook(location: Location) -> Self {
        Self::Definition {
            location,
            arguments: Vec::new(),
        }
    }

    /// Returns the [`Location`] of the matched definition, if any.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        match self {
            Self::Definition { location, .. } => Some(*location),
            Self::Undefined => None,
        }
    }
}

/// Receiver of the structure being executed, in execution order.
///
/// Per [`gherkin::Feature`] the calls go as: [`uri`], [`feature`], then per
/// [`Scenario`] [`start_of_scenario_lifecycle`], [`background`] followed by its
/// [`step`]s, [`scenario`] followed by its [`step`]s,
/// [`end_of_scenario_lifecycle`], and finally [`eof`]. Outlines announce
/// themselves with [`scenario_outline`] and template [`step`]s, then
/// [`examples`] per block. [`done`] and [`close`] end the whole run.
///
/// [`background`]: Formatter::background
/// [`close`]: Formatter::close
/// [`done`]: Formatter::done
/// [`end_of_scenario_lifecycle`]: Formatter::end_of_scenario_lifecycle
/// [`eof`]: Formatter::eof
/// [`examples`]: Formatter::examples
/// [`feature`]: Formatter::feature
/// [`Scenario`]: gherkin::Scenario
/// [`scenario`]: Formatter::scenario
/// [`scenario_outline`]: Formatter::scenario_outline
/// [`start_of_scenario_lifecycle`]: Formatter::start_of_scenario_lifecycle
/// [`step`]: Formatter::step
/// [`uri`]: Formatter::uri
#[allow(unused_variables)] // no-op defaults
pub trait Formatter {
    /// Path of the `.feature` file about to run.
    fn uri(&mut self, uri: &str) {}

    /// [`gherkin::Feature`] about to run.
    fn feature(&mut self, feature: &gherkin::Feature) {}

    /// [`gherkin::Rule`] about to run.
    fn rule(&mut self, rule: &gherkin::Rule) {}

    /// [`gherkin::Scenario`] is about to be set up.
    fn start_of_scenario_lifecycle(&mut self, scenario: &gherkin::Scenario) {}

    /// [`gherkin::Background`] about to run.
    fn background(&mut self, background: &gherkin::Background) {}

    /// Template [`gherkin::Scenario`] of an outline.
    fn scenario_outline(&mut self, outline: &gherkin::Scenario) {}

    /// [`gherkin::Examples`] block of an outline.
    fn examples(&mut self, examples: &gherkin::Examples) {}

    /// [`gherkin::Scenario`] about to run its own [`gherkin::Step`]s.
    fn scenario(&mut self, scenario: &gherkin::Scenario) {}

    /// [`gherkin::Step`] of the preceding [`gherkin::Background`],
    /// [`gherkin::Scenario`] or outline.
    fn step(&mut self, step: &gherkin::Step) {}

    /// [`gherkin::Scenario`] is torn down.
    fn end_of_scenario_lifecycle(&mut self, scenario: &gherkin::Scenario) {}

    /// [`gherkin::Feature`] finished.
    fn eof(&mut self) {}

    /// All the [`gherkin::Feature`]s finished.
    fn done(&mut self) {}

    /// The run is over and no more calls follow.
    fn close(&mut self) {}
}

/// Receiver of what happened to every executed [`Step`] and [`Hook`].
///
/// A [`step_match`] call always precedes the [`result`] of the same
/// [`Step`].
///
/// [`Hook`]: crate::glue::Hook
/// [`result`]: Reporter::result
/// [`Step`]: gherkin::Step
/// [`step_match`]: Reporter::step_match
#[allow(unused_variables)] // no-op defaults
pub trait Reporter {
    /// [`StepDefinition`] available for the run.
    fn step_definition(&mut self, location: Location, pattern: &str) {}

    /// [`Before`] hook finished.
    ///
    /// [`Before`]: crate::glue::HookType::Before
    fn before(&mut self, hook: &Match, result: &TestResult) {}

    /// [`Step`] resolved.
    ///
    /// [`Step`]: gherkin::Step
    fn step_match(&mut self, step: &Match) {}

    /// [`Step`] finished.
    ///
    /// [`Step`]: gherkin::Step
    fn result(&mut self, result: &TestResult) {}

    /// [`After`] hook finished.
    ///
    /// [`After`]: crate::glue::HookType::After
    fn after(&mut self, hook: &Match, result: &TestResult) {}
}

/// [`Formatter`] and [`Reporter`] ignoring everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl Formatter for Discard {}

impl Reporter for Discard {}

/// Reports all the given [`StepDefinition`]s to the `reporter`.
pub(crate) fn report_definitions<'d, W: 'd>(
    reporter: &mut dyn Reporter,
    definitions: impl IntoIterator<Item = &'d StepDefinition<W>>,
) {
    for def in definitions {
        reporter.step_definition(def.location, def.regex.as_str());
    }
}

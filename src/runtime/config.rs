// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Runtime`] configuration.
//!
//! [`Runtime`]: super::Runtime

use std::time::Duration;

use gherkin::tagexpr::TagOperation;
use regex::Regex;
use smart_default::SmartDefault;

use crate::{
    backend::SnippetType, outcome::Classifier, stopwatch::Clock, tag,
    tree::ScenarioUnit,
};

/// Configuration of a [`Runtime`].
///
/// [`Runtime`]: super::Runtime
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Matches [`Step`]s without executing anything: no [`Hook`] runs and
    /// every defined [`Step`] is reported as skipped.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    pub dry_run: bool,

    /// Makes undefined and pending [`Step`]s fail the run.
    ///
    /// [`Step`]: gherkin::Step
    pub strict: bool,

    /// Path prefixes of definition locations to load, all of them if empty.
    pub glue: Vec<String>,

    /// Tag expression [`Scenario`]s must satisfy to run.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub tags: Option<TagOperation>,

    /// [`Regex`] names of [`Scenario`]s must match to run.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub name: Option<Regex>,

    /// Time bound of every [`Step`] invocation.
    ///
    /// [`Step`]: gherkin::Step
    pub step_timeout: Option<Duration>,

    /// Naming style of the suggested snippets.
    pub snippets: SnippetType,

    /// Source of measured durations.
    pub clock: Clock,

    /// Classifier of captured panics.
    pub classifier: Classifier,
}

impl Config {
    /// Indicates whether the given [`ScenarioUnit`] passes the [`tags`] and
    /// [`name`] filters.
    ///
    /// [`name`]: Config::name
    /// [`tags`]: Config::tags
    #[must_use]
    pub fn accepts(&self, unit: &ScenarioUnit) -> bool {
        tag::matches(self.tags.as_ref(), &unit.tags)
            && self
                .name
                .as_ref()
                .map_or(true, |re| re.is_match(&unit.scenario.name))
    }
}

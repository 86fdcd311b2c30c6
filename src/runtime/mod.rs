// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Coordinator of a whole run.

pub mod config;
pub mod exit;
mod hooks;
pub mod scenario;
mod steps;

use std::fmt;

use futures::{future::LocalBoxFuture, FutureExt as _};
use tracing::{debug, info, warn};

use crate::{
    backend::Backend,
    error::RuntimeError,
    event::{self, Formatter, Reporter},
    feature::Ext as _,
    glue::Glue,
    outcome::Outcome,
    stats::RunResult,
    summary::{Summary, SummaryPrinter},
    tree::{Node, ScenarioUnit},
    undefined::UndefinedStepsTracker,
    World,
};

#[doc(inline)]
pub use self::{
    config::Config,
    exit::ExitStatus,
    scenario::{Listeners, Progress, ScenarioExecutor, Unit},
};

/// Result of executing a single [`Hook`] or [`Step`].
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug)]
pub(crate) struct Executed {
    /// [`Outcome`] of the unit.
    pub(crate) outcome: Outcome,

    /// [`RunResult`] of the unit alone.
    pub(crate) result: RunResult,

    /// Whether the following [`Step`]s must be skipped.
    ///
    /// [`Step`]: gherkin::Step
    pub(crate) skip_next: bool,
}

/// Outcome of a whole run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Aggregated [`RunResult`] of all the [`Scenario`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub result: RunResult,

    /// Process [`ExitStatus`] the run should end with.
    pub exit_status: ExitStatus,
}

/// Engine running [`gherkin::Feature`]s against the definitions of its
/// [`Backend`]s.
///
/// [`Scenario`]s run one at a time, each one on a fresh [`World`].
///
/// [`Scenario`]: gherkin::Scenario
pub struct Runtime<W> {
    backends: Vec<Box<dyn Backend<W>>>,
    glue: Glue<W>,
    config: Config,
}

impl<W> fmt::Debug for Runtime<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("backends", &self.backends.len())
            .field("glue", &self.glue)
            .field("config", &self.config)
            .finish()
    }
}

impl<W: World> Runtime<W> {
    /// Creates a new [`Runtime`] loading the [`Glue`] of all the `backends`.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::NoBackends`] if `backends` are empty;
    /// - [`RuntimeError::DuplicateStepDefinition`] if the same [`Step`]
    ///   pattern is registered twice.
    ///
    /// [`Step`]: gherkin::Step
    pub fn new(
        backends: Vec<Box<dyn Backend<W>>>,
        config: Config,
    ) -> Result<Self, RuntimeError> {
        if backends.is_empty() {
            return Err(RuntimeError::NoBackends);
        }

        let mut glue = Glue::new();
        for backend in &backends {
            backend.load_glue(&mut glue, &config.glue)?;
        }
        debug!(
            backends = backends.len(),
            steps = glue.step_definitions().len(),
            "loaded glue",
        );

        Ok(Self {
            backends,
            glue,
            config,
        })
    }

    /// Returns the loaded [`Glue`].
    #[must_use]
    pub const fn glue(&self) -> &Glue<W> {
        &self.glue
    }

    /// Returns the [`Config`] of this [`Runtime`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the execution tree of the given `features`, keeping only the
    /// [`Scenario`]s passing the configured filters.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn scenarios(
        &self,
        features: impl IntoIterator<Item = gherkin::Feature>,
    ) -> Vec<Node> {
        Node::build(features, |unit| self.config.accepts(unit))
    }

    /// Prepares a [`ScenarioExecutor`] for the given [`ScenarioUnit`].
    ///
    /// Nothing is executed until the returned [`ScenarioExecutor`] is driven.
    #[must_use]
    pub fn scenario<'r>(
        &'r self,
        unit: &ScenarioUnit,
        listeners: Listeners<'r>,
    ) -> ScenarioExecutor<'r, W> {
        ScenarioExecutor::new(self, unit.clone(), listeners)
    }

    /// Runs all the given `features`, reports the summary with the `printer`
    /// and computes the [`ExitStatus`].
    pub async fn run(
        &self,
        features: impl IntoIterator<Item = gherkin::Feature>,
        formatter: &mut dyn Formatter,
        reporter: &mut dyn Reporter,
        printer: &mut dyn SummaryPrinter,
    ) -> RunReport {
        let nodes = self.scenarios(features);
        debug!(features = nodes.len(), "starting run");

        event::report_definitions(reporter, self.glue.step_definitions());

        let mut tracker = UndefinedStepsTracker::new();
        let mut listeners = Listeners::new(formatter, reporter, &mut tracker);
        let mut result = RunResult::IDENTITY;
        for node in &nodes {
            result.merge(self.run_node(node, &mut listeners).await);
        }
        listeners.formatter.done();
        listeners.formatter.close();

        let exit_status = self.finish(&result, &tracker, printer);
        RunReport {
            result,
            exit_status,
        }
    }

    /// Ends a run: prints the [`Summary`] with the `printer` and computes the
    /// [`ExitStatus`].
    ///
    /// Meant for hosts driving [`ScenarioExecutor`]s on their own.
    pub fn finish(
        &self,
        result: &RunResult,
        tracker: &UndefinedStepsTracker,
        printer: &mut dyn SummaryPrinter,
    ) -> ExitStatus {
        let snippets = tracker.snippets(&self.backends, &self.config.snippets);
        let summary = Summary {
            stats: &result.stats,
            errors: &result.errors,
            snippets: &snippets,
            strict: self.config.strict,
        };
        if let Err(e) = printer.print(&summary) {
            warn!("failed to print summary: {e}");
        }

        let status = ExitStatus::of(
            &result.errors,
            tracker.has_undefined_steps(),
            self.config.strict,
        );
        info!(
            scenarios = result.stats.scenarios.total(),
            steps = result.stats.steps.total(),
            exit_status = %status,
            "run finished",
        );
        status
    }

    /// Interprets the given [`Node`], folding [`RunResult`]s of its children.
    fn run_node<'a>(
        &'a self,
        node: &'a Node,
        listeners: &'a mut Listeners<'_>,
    ) -> LocalBoxFuture<'a, RunResult> {
        async move {
            match node {
                Node::Feature { feature, children } => {
                    debug!(feature = %feature.name, "running feature");
                    listeners.formatter.uri(&feature.uri());
                    listeners.formatter.feature(feature);
                    let result = self.run_children(children, listeners).await;
                    listeners.formatter.eof();
                    result
                }
                Node::Rule { rule, children } => {
                    listeners.formatter.rule(rule);
                    self.run_children(children, listeners).await
                }
                Node::Outline { outline, children } => {
                    listeners.formatter.scenario_outline(outline);
                    for s in &outline.steps {
                        listeners.formatter.step(s);
                    }
                    self.run_children(children, listeners).await
                }
                Node::Examples { examples, children } => {
                    listeners.formatter.examples(examples);
                    self.run_children(children, listeners).await
                }
                Node::Scenario(unit) => {
                    debug!(scenario = %unit.id, "running scenario");
                    self.scenario(unit, listeners.reborrow()).run().await
                }
            }
        }
        .boxed_local()
    }

    async fn run_children(
        &self,
        children: &[Node],
        listeners: &mut Listeners<'_>,
    ) -> RunResult {
        let mut result = RunResult::IDENTITY;
        for child in children {
            result.merge(self.run_node(child, listeners).await);
        }
        result
    }
}

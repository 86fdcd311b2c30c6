// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution of a single [`Step`].
//!
//! [`Step`]: gherkin::Step

use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt as _;
use tracing::{trace, warn};

use super::{Config, Executed};
use crate::{
    error::{Failure, Info, Origin},
    event::{Match, Reporter},
    future::{self, Elapsed},
    glue::{Glue, Lookup, StepDefinitionMatch},
    outcome::{Outcome, TestResult},
    scenario::ScenarioResult,
    stats::{RunResult, Stats},
    undefined::UndefinedStepsTracker,
};

/// Keyword and text of the given [`gherkin::Step`].
pub(crate) fn step_text(step: &gherkin::Step) -> String {
    format!("{} {}", step.keyword.trim(), step.value)
}

/// Runner of [`gherkin::Step`]s against a [`Glue`].
pub(crate) struct StepExecutor<'r, W> {
    glue: &'r Glue<W>,
    config: &'r Config,
}

impl<'r, W> StepExecutor<'r, W> {
    pub(crate) const fn new(glue: &'r Glue<W>, config: &'r Config) -> Self {
        Self { glue, config }
    }

    /// Resolves and runs the given [`gherkin::Step`], recording its
    /// [`Outcome`] into the `scenario` and reporting it.
    ///
    /// The [`gherkin::Step`] isn't executed if `skip` is set, in a dry run,
    /// or if there is no `world` to run it on.
    pub(crate) async fn run(
        &self,
        step: &gherkin::Step,
        world: Option<&mut W>,
        skip: bool,
        scenario: &mut ScenarioResult,
        reporter: &mut dyn Reporter,
        tracker: &mut UndefinedStepsTracker,
    ) -> Executed {
        let lookup = self.glue.find(step);
        let ambiguity = lookup.ambiguity();

        let (outcome, duration, error) = match lookup {
            Lookup::Ambiguous(candidates) => {
                if let Some(first) = candidates.first() {
                    reporter.step_match(&matched(first));
                }
                let error = ambiguity.map(|error| Failure::Ambiguous {
                    step: step_text(step),
                    error,
                });
                (Outcome::Failed, None, error)
            }
            Lookup::Undefined => {
                reporter.step_match(&Match::Undefined);
                tracker.add(step);
                (Outcome::Undefined, None, None)
            }
            Lookup::Matched(m) => {
                reporter.step_match(&matched(&m));
                match world {
                    Some(world) if !skip && !self.config.dry_run => {
                        self.invoke(&m, world).await
                    }
                    _ => (Outcome::Skipped, None, None),
                }
            }
        };

        if let Some(e) = &error {
            warn!(step = %step.value, "{e}");
        }
        trace!(step = %step.value, %outcome);

        scenario.add(outcome);
        reporter.result(&TestResult {
            outcome,
            duration,
            error: error.clone(),
        });

        Executed {
            outcome,
            skip_next: skip || outcome != Outcome::Passed,
            result: RunResult::new(Stats::step(outcome, duration), error),
        }
    }

    /// Invokes the matched [`Step`] function, timing it.
    ///
    /// [`Step`]: crate::step::Step
    async fn invoke(
        &self,
        m: &StepDefinitionMatch<'_, W>,
        world: &mut W,
    ) -> (Outcome, Option<Duration>, Option<Failure>) {
        let watch = self.config.clock.start();
        let res = AssertUnwindSafe(future::timeout(
            self.config.step_timeout,
            m.invoke(world),
        ))
        .catch_unwind()
        .await;
        let duration = watch.stop();

        let origin = || Origin::Step {
            text: step_text(m.step()),
            location: m.location(),
        };
        let (outcome, error) = match res {
            Ok(Ok(())) => (Outcome::Passed, None),
            Ok(Err(Elapsed(after))) => (
                Outcome::Failed,
                Some(Failure::Timeout {
                    origin: origin(),
                    after,
                }),
            ),
            Err(payload) => {
                let info: Info = Arc::from(payload);
                match self.config.classifier.classify(Some(&info)) {
                    Outcome::Pending => (
                        Outcome::Pending,
                        Some(Failure::Pending {
                            origin: origin(),
                            info,
                        }),
                    ),
                    _ => (
                        Outcome::Failed,
                        Some(Failure::Step {
                            step: step_text(m.step()),
                            location: m.location(),
                            info,
                        }),
                    ),
                }
            }
        };
        (outcome, Some(duration), error)
    }
}

/// Reported [`Match`] of the given [`StepDefinitionMatch`].
fn matched<W>(m: &StepDefinitionMatch<'_, W>) -> Match {
    Match::Definition {
        location: m.location(),
        arguments: m.arguments().to_vec(),
    }
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Execution of a single [`Hook`].
//!
//! [`Hook`]: crate::glue::Hook

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt as _;
use tracing::{trace, warn};

use super::{Config, Executed};
use crate::{
    error::{Failure, Info, Origin},
    event::{Match, Reporter},
    future::{self, Elapsed},
    glue::{HookDefinition, HookType},
    outcome::{Outcome, TestResult},
    scenario::ScenarioResult,
    stats::{RunResult, Stats},
};

/// Runner of [`HookDefinition`]s.
///
/// A failing [`Hook`] never prevents the following ones from running, it
/// only makes the following [`Step`]s skipped.
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug)]
pub(crate) struct HookExecutor<'r> {
    config: &'r Config,
}

impl<'r> HookExecutor<'r> {
    pub(crate) const fn new(config: &'r Config) -> Self {
        Self { config }
    }

    /// Runs the `hook` of the given [`HookType`], recording its [`Outcome`]
    /// into the `scenario` and reporting it.
    pub(crate) async fn run<W>(
        &self,
        ty: HookType,
        hook: &HookDefinition<W>,
        world: &mut W,
        scenario: &mut ScenarioResult,
        reporter: &mut dyn Reporter,
    ) -> Executed {
        let watch = self.config.clock.start();
        let res = AssertUnwindSafe(future::timeout(
            hook.timeout,
            (hook.body)(world, scenario),
        ))
        .catch_unwind()
        .await;
        let duration = watch.stop();

        let error = match res {
            Ok(Ok(())) => None,
            Ok(Err(Elapsed(after))) => Some(Failure::Timeout {
                origin: Origin::Hook {
                    ty,
                    location: hook.location,
                },
                after,
            }),
            Err(payload) => {
                let info: Info = Arc::from(payload);
                Some(if self.config.classifier.is_pending(Some(&info)) {
                    Failure::Pending {
                        origin: Origin::Hook {
                            ty,
                            location: hook.location,
                        },
                        info,
                    }
                } else {
                    Failure::Hook {
                        ty,
                        location: hook.location,
                        info,
                    }
                })
            }
        };
        let outcome = match &error {
            None => Outcome::Passed,
            Some(e) if e.is_pending() => Outcome::Pending,
            Some(_) => Outcome::Failed,
        };
        if let Some(e) = &error {
            warn!(hook = %ty, location = %hook.location, "{e}");
        }
        trace!(hook = %ty, location = %hook.location, %outcome);

        scenario.add(outcome);
        let result = TestResult {
            outcome,
            duration: Some(duration),
            error: error.clone(),
        };
        let matched = Match::hook(hook.location);
        match ty {
            HookType::Before => reporter.before(&matched, &result),
            HookType::After => reporter.after(&matched, &result),
        }

        Executed {
            outcome,
            skip_next: error.is_some(),
            result: RunResult::new(Stats::hook(Some(duration)), error),
        }
    }
}

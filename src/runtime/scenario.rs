// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! State machine running a single [`Scenario`].
//!
//! [`Scenario`]: gherkin::Scenario

use std::{fmt, mem, panic::AssertUnwindSafe, sync::Arc};

use futures::{stream, FutureExt as _, Stream};
use tracing::{debug, trace, warn};

use super::{hooks::HookExecutor, steps::StepExecutor, Executed, Runtime};
use crate::{
    error::{Failure, Info, PanicPayloadExt as _},
    event::{Formatter, Reporter},
    glue::{HookDefinition, HookType},
    outcome::Outcome,
    scenario::ScenarioResult,
    stats::{RunResult, Stats},
    step::Location,
    tree::ScenarioUnit,
    undefined::UndefinedStepsTracker,
    World,
};

/// Sinks a [`ScenarioExecutor`] reports into.
pub struct Listeners<'l> {
    /// Receiver of the executed structure.
    pub formatter: &'l mut dyn Formatter,

    /// Receiver of the [`Step`] and [`Hook`] results.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    pub reporter: &'l mut dyn Reporter,

    /// Collector of undefined [`Step`]s.
    ///
    /// [`Step`]: gherkin::Step
    pub tracker: &'l mut UndefinedStepsTracker,
}

impl<'l> Listeners<'l> {
    /// Creates new [`Listeners`].
    #[must_use]
    pub fn new(
        formatter: &'l mut dyn Formatter,
        reporter: &'l mut dyn Reporter,
        tracker: &'l mut UndefinedStepsTracker,
    ) -> Self {
        Self {
            formatter,
            reporter,
            tracker,
        }
    }

    /// Reborrows these [`Listeners`] for a shorter lifetime.
    pub fn reborrow(&mut self) -> Listeners<'_> {
        Listeners {
            formatter: &mut *self.formatter,
            reporter: &mut *self.reporter,
            tracker: &mut *self.tracker,
        }
    }
}

impl fmt::Debug for Listeners<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("tracker", &self.tracker)
            .finish_non_exhaustive()
    }
}

/// Unit executed by a single [`ScenarioExecutor::advance()`] call.
#[derive(Clone, Debug)]
pub enum Unit {
    /// [`Hook`] of the given type.
    ///
    /// [`Hook`]: crate::glue::Hook
    Hook(HookType, Location),

    /// Background or own [`gherkin::Step`] of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    Step(gherkin::Step),

    /// Whole [`Scenario`] has finished.
    ///
    /// [`Scenario`]: gherkin::Scenario
    Scenario,
}

/// Progress of a [`ScenarioExecutor`].
#[derive(Clone, Debug)]
pub struct Progress {
    /// Executed [`Unit`].
    pub unit: Unit,

    /// [`Outcome`] of the [`Unit`]. For [`Unit::Scenario`] it's the overall
    /// status of the [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub outcome: Outcome,

    /// [`RunResult`] of the [`Scenario`] accumulated so far.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub result: RunResult,
}

/// Lifecycle phases of a [`ScenarioExecutor`], strictly sequential.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Init,
    Before(usize),
    Background { index: usize, step: usize },
    Steps(usize),
    After(usize),
    Finish,
    Done,
}

/// Runner of a single [`ScenarioUnit`].
///
/// A fresh `World` is created first and dropped last, with [`Before`] hooks,
/// background [`Step`]s, own [`Step`]s and [`After`] hooks executed in
/// between. Once any unit fails, is pending or undefined, all the following
/// [`Step`]s are skipped. [`After`] hooks run regardless.
///
/// The execution may be driven one unit at a time with
/// [`ScenarioExecutor::advance()`]. Dropping an unfinished
/// [`ScenarioExecutor`] still disposes its `World`.
///
/// [`After`]: HookType::After
/// [`Before`]: HookType::Before
/// [`Step`]: gherkin::Step
pub struct ScenarioExecutor<'r, W: World> {
    runtime: &'r Runtime<W>,
    listeners: Listeners<'r>,
    unit: Arc<ScenarioUnit>,
    world: Option<W>,
    recorder: ScenarioResult,
    before: Vec<&'r HookDefinition<W>>,
    after: Vec<&'r HookDefinition<W>>,
    skip_next: bool,
    result: RunResult,
    phase: Phase,
}

impl<W: World> fmt::Debug for ScenarioExecutor<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioExecutor")
            .field("scenario", &self.unit.id)
            .field("phase", &self.phase)
            .field("skip_next", &self.skip_next)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl<'r, W: World> ScenarioExecutor<'r, W> {
    pub(super) fn new(
        runtime: &'r Runtime<W>,
        unit: ScenarioUnit,
        listeners: Listeners<'r>,
    ) -> Self {
        Self {
            recorder: ScenarioResult::new(&unit),
            runtime,
            listeners,
            unit: Arc::new(unit),
            world: None,
            before: Vec::new(),
            after: Vec::new(),
            skip_next: false,
            result: RunResult::IDENTITY,
            phase: Phase::Init,
        }
    }

    /// Returns the [`ScenarioUnit`] being run.
    #[must_use]
    pub fn unit(&self) -> &ScenarioUnit {
        &self.unit
    }

    /// Returns the [`ScenarioResult`] recorded so far.
    #[must_use]
    pub const fn recorder(&self) -> &ScenarioResult {
        &self.recorder
    }

    /// Executes the next [`Hook`] or [`Step`].
    ///
    /// After the last of them the `World` is disposed and [`Unit::Scenario`]
    /// is yielded with the overall status. [`None`] is returned afterwards.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    pub async fn advance(&mut self) -> Option<Progress> {
        loop {
            match self.phase {
                Phase::Init => {
                    self.build_world().await;
                    self.listeners
                        .formatter
                        .start_of_scenario_lifecycle(&self.unit.scenario);
                    self.phase = Phase::Before(0);
                }
                Phase::Before(i) => {
                    if let Some(hook) = self.before.get(i).copied() {
                        self.phase = Phase::Before(i + 1);
                        return self.run_hook(HookType::Before, hook).await;
                    }
                    self.phase = Phase::Background { index: 0, step: 0 };
                }
                Phase::Background { index, step } => {
                    let unit = Arc::clone(&self.unit);
                    let Some(bg) = unit.backgrounds().nth(index) else {
                        let sc = &self.unit.scenario;
                        self.listeners.formatter.scenario(sc);
                        for s in &sc.steps {
                            self.listeners.formatter.step(s);
                        }
                        self.phase = Phase::Steps(0);
                        continue;
                    };
                    if step == 0 {
                        self.listeners.formatter.background(bg);
                        for s in &bg.steps {
                            self.listeners.formatter.step(s);
                        }
                    }
                    if let Some(s) = bg.steps.get(step) {
                        self.phase = Phase::Background {
                            index,
                            step: step + 1,
                        };
                        return self.run_step(s).await;
                    }
                    self.phase = Phase::Background {
                        index: index + 1,
                        step: 0,
                    };
                }
                Phase::Steps(i) => {
                    let unit = Arc::clone(&self.unit);
                    if let Some(s) = unit.steps().get(i) {
                        self.phase = Phase::Steps(i + 1);
                        return self.run_step(s).await;
                    }
                    self.phase = Phase::After(0);
                }
                Phase::After(i) => {
                    if let Some(hook) = self.after.get(i).copied() {
                        self.phase = Phase::After(i + 1);
                        return self.run_hook(HookType::After, hook).await;
                    }
                    self.phase = Phase::Finish;
                }
                Phase::Finish => {
                    self.phase = Phase::Done;
                    return Some(self.finish());
                }
                Phase::Done => return None,
            }
        }
    }

    /// Runs this [`Scenario`] to completion, returning its [`RunResult`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub async fn run(mut self) -> RunResult {
        while self.advance().await.is_some() {}
        mem::take(&mut self.result)
    }

    /// Turns this [`ScenarioExecutor`] into a [`Stream`] of [`Progress`],
    /// executing a unit per item.
    pub fn into_stream(self) -> impl Stream<Item = Progress> + 'r {
        stream::unfold(self, |mut ex| async move {
            let progress = ex.advance().await?;
            Some((progress, ex))
        })
    }

    async fn build_world(&mut self) {
        debug!(scenario = %self.unit.id, "building world");

        let res = AssertUnwindSafe(W::new()).catch_unwind().await;
        let message = match res {
            Ok(Ok(mut world)) => {
                for backend in &self.runtime.backends {
                    backend.build_world(&mut world);
                }
                self.world = Some(world);
                let tags = &self.unit.tags;
                if !self.runtime.config.dry_run {
                    self.before =
                        self.runtime.glue.hooks_for(HookType::Before, tags);
                    self.after =
                        self.runtime.glue.hooks_for(HookType::After, tags);
                }
                return;
            }
            Ok(Err(e)) => e.to_string(),
            Err(payload) => Info::from(payload).to_readable_string(),
        };

        let failure = Failure::World { message };
        warn!(scenario = %self.unit.id, "{failure}");
        self.recorder.add(Outcome::Failed);
        self.skip_next = true;
        self.result
            .merge(RunResult::new(Stats::IDENTITY, Some(failure)));
    }

    async fn run_hook(
        &mut self,
        ty: HookType,
        hook: &HookDefinition<W>,
    ) -> Option<Progress> {
        let world = self.world.as_mut()?;
        let executed = HookExecutor::new(&self.runtime.config)
            .run(
                ty,
                hook,
                world,
                &mut self.recorder,
                &mut *self.listeners.reporter,
            )
            .await;
        Some(self.record(Unit::Hook(ty, hook.location), executed))
    }

    async fn run_step(&mut self, step: &gherkin::Step) -> Option<Progress> {
        let executed =
            StepExecutor::new(&self.runtime.glue, &self.runtime.config)
                .run(
                    step,
                    self.world.as_mut(),
                    self.skip_next,
                    &mut self.recorder,
                    &mut *self.listeners.reporter,
                    &mut *self.listeners.tracker,
                )
                .await;
        Some(self.record(Unit::Step(step.clone()), executed))
    }

    fn record(&mut self, unit: Unit, executed: Executed) -> Progress {
        // Skipping is monotonic within a `Scenario`.
        self.skip_next |= executed.skip_next;
        self.result.merge(executed.result);
        Progress {
            unit,
            outcome: executed.outcome,
            result: self.result.clone(),
        }
    }

    fn finish(&mut self) -> Progress {
        self.listeners
            .formatter
            .end_of_scenario_lifecycle(&self.unit.scenario);
        self.dispose();

        let status = self.recorder.status();
        self.result.merge(RunResult::from(Stats::scenario(
            status,
            self.unit.designation.clone(),
        )));
        trace!(scenario = %self.unit.id, %status, "finished");

        Progress {
            unit: Unit::Scenario,
            outcome: status,
            result: self.result.clone(),
        }
    }

    fn dispose(&mut self) {
        if let Some(mut world) = self.world.take() {
            for backend in &self.runtime.backends {
                backend.dispose_world(&mut world);
            }
            debug!(scenario = %self.unit.id, "disposed world");
        }
    }
}

impl<W: World> Drop for ScenarioExecutor<'_, W> {
    fn drop(&mut self) {
        self.dispose();
    }
}

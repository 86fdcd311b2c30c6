// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Scenario execution engine for [Cucumber].
//!
//! Takes parsed [`gherkin::Feature`]s, matches every [`gherkin::Step`] to a
//! registered definition, runs it on a fresh [`World`] per [`Scenario`] along
//! with the applicable [`Hook`]s, and aggregates [`Stats`] into a
//! [`RunReport`] and an [`ExitStatus`].
//!
//! ```rust
//! # use std::convert::Infallible;
//! #
//! # use cucumber_engine::{
//! #     event::Discard, step::Context, summary::NullSummaryPrinter, Backend,
//! #     Config, Runtime, Steps, World,
//! # };
//! # use futures::{future::LocalBoxFuture, FutureExt as _};
//! # use regex::Regex;
//! #
//! #[derive(Debug, Default)]
//! struct Belly {
//!     cukes: usize,
//! }
//!
//! impl World for Belly {
//!     type Error = Infallible;
//!
//!     async fn new() -> Result<Self, Infallible> {
//!         Ok(Self::default())
//!     }
//! }
//!
//! fn eat(belly: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
//!     async move {
//!         belly.cukes += ctx.get(1).unwrap().parse::<usize>().unwrap();
//!     }
//!     .boxed_local()
//! }
//!
//! # futures::executor::block_on(async {
//! let steps =
//!     Steps::<Belly>::new().when(Regex::new(r"^I eat (\d+) cukes$")?, eat);
//! let runtime = Runtime::new(
//!     vec![Box::new(steps) as Box<dyn Backend<Belly>>],
//!     Config::default(),
//! )?;
//!
//! let feature = gherkin::Feature::parse(
//!     "Feature: Belly\n\
//!      \n  Scenario: lunch\n    When I eat 3 cukes\n",
//!     gherkin::GherkinEnv::default(),
//! )?;
//! let report = runtime
//!     .run(
//!         [feature],
//!         &mut Discard,
//!         &mut Discard,
//!         &mut NullSummaryPrinter,
//!     )
//!     .await;
//!
//! assert!(report.exit_status.is_success());
//! assert_eq!(report.result.stats.steps.passed, 1);
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```
//!
//! [Cucumber]: https://cucumber.io
//! [`Hook`]: glue::Hook
//! [`Scenario`]: gherkin::Scenario

pub mod backend;
pub mod cli;
pub mod error;
pub mod event;
pub mod feature;
mod future;
pub mod glue;
pub mod outcome;
pub mod runtime;
pub mod scenario;
pub mod stats;
pub mod step;
pub mod stopwatch;
pub mod summary;
pub mod tag;
pub mod tree;
pub mod undefined;
pub mod world;

pub use gherkin;

#[doc(inline)]
pub use self::{
    backend::{Backend, SnippetType, Steps},
    error::{Failure, RuntimeError},
    event::{Formatter, Reporter},
    glue::{Glue, HookDefinition, HookType},
    outcome::{Classifier, Outcome, Pending, TestResult},
    runtime::{Config, ExitStatus, RunReport, Runtime, ScenarioExecutor},
    scenario::ScenarioResult,
    stats::{RunResult, Stats},
    tree::{Node, ScenarioUnit},
    undefined::UndefinedStepsTracker,
    world::World,
};

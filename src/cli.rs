// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI options of a [`Runtime`].
//!
//! [`Opts`] are meant to be flattened into the CLI of a host binary, which
//! stays in charge of parsing features and bootstrapping the process.
//!
//! # Example
//!
//! ```rust
//! # use cucumber_engine::cli;
//! #
//! #[derive(clap::Parser)]
//! struct Cli {
//!     /// Paths of `.feature` files to run.
//!     features: Vec<std::path::PathBuf>,
//!
//!     #[command(flatten)]
//!     engine: cli::Opts,
//! }
//!
//! let cli = <Cli as clap::Parser>::parse_from([
//!     "runner",
//!     "--strict",
//!     "--tags",
//!     "@smoke and not @wip",
//!     "features/cart.feature",
//! ]);
//! let config = cli.engine.config();
//!
//! assert!(config.strict);
//! assert!(config.tags.is_some());
//! ```
//!
//! [`Runtime`]: crate::Runtime

use std::{str::FromStr, time::Duration};

use gherkin::tagexpr::TagOperation;
use regex::Regex;
use smart_default::SmartDefault;

use crate::{
    backend::SnippetType, runtime::Config, summary::DefaultSummaryPrinter,
};

pub use clap::{Args, Parser};

/// CLI options building a [`Config`] and a [`DefaultSummaryPrinter`].
#[derive(Args, Clone, Debug, SmartDefault)]
#[group(skip)]
pub struct Opts {
    /// Match steps against the glue without executing anything.
    #[arg(long, short = 'd')]
    pub dry_run: bool,

    /// Fail the run on undefined and pending steps.
    #[arg(long, short = 's')]
    pub strict: bool,

    /// Location prefixes of step definitions and hooks to load.
    #[arg(long, short = 'g', value_name = "path")]
    pub glue: Vec<String>,

    /// Tag expression to filter scenarios by.
    ///
    /// Note: Tags from Feature, Rule and Scenario are merged together on
    /// filtering.
    #[arg(long, short = 't', value_name = "tagexpr")]
    pub tags: Option<TagOperation>,

    /// Regex to filter scenarios by their name.
    #[arg(long, short = 'n', value_name = "regex")]
    pub name: Option<Regex>,

    /// Naming style of suggested step functions.
    #[arg(
        long,
        value_name = "underscore|camelcase",
        default_value = "underscore"
    )]
    pub snippets: SnippetType,

    /// Time limit of a single step.
    #[arg(
        long,
        value_name = "duration",
        value_parser = humantime::parse_duration
    )]
    pub step_timeout: Option<Duration>,

    /// Coloring policy for the summary output.
    #[arg(long, value_name = "auto|always|never", default_value = "auto")]
    #[default(Coloring::Auto)]
    pub color: Coloring,
}

impl Opts {
    /// Builds a [`Config`] out of these [`Opts`].
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            dry_run: self.dry_run,
            strict: self.strict,
            glue: self.glue.clone(),
            tags: self.tags.clone(),
            name: self.name.clone(),
            step_timeout: self.step_timeout,
            snippets: self.snippets,
            ..Config::default()
        }
    }

    /// Builds a [`DefaultSummaryPrinter`] writing to [`io::Stdout`] and
    /// honoring the [`Coloring`] option.
    ///
    /// [`io::Stdout`]: std::io::Stdout
    #[must_use]
    pub fn summary_printer(&self) -> DefaultSummaryPrinter {
        DefaultSummaryPrinter::default().with_coloring(self.color)
    }
}

/// Possible policies of a [`console`] output coloring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coloring {
    /// Letting [`console::colors_enabled()`] to decide, whether output should
    /// be colored.
    Auto,

    /// Forcing of a colored output.
    Always,

    /// Forcing of a non-colored output.
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

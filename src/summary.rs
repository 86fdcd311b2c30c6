// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-of-run summary output.

use std::{borrow::Cow, io, time::Duration};

use console::Style;
use itertools::Itertools as _;

use crate::{
    cli::Coloring,
    error::Failure,
    outcome::Outcome,
    stats::{Stats, SubCounts},
};

/// Everything known at the end of a run.
#[derive(Clone, Copy, Debug)]
pub struct Summary<'a> {
    /// Aggregated [`Stats`].
    pub stats: &'a Stats,

    /// Captured [`Failure`]s.
    pub errors: &'a [Failure],

    /// Suggested snippets for undefined [`Step`]s.
    ///
    /// [`Step`]: gherkin::Step
    pub snippets: &'a [String],

    /// Whether the run was strict.
    pub strict: bool,
}

/// Presentation sink of a [`Summary`].
pub trait SummaryPrinter {
    /// Prints the given [`Summary`].
    ///
    /// # Errors
    ///
    /// If the output fails.
    fn print(&mut self, summary: &Summary<'_>) -> io::Result<()>;
}

/// [`SummaryPrinter`] printing nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSummaryPrinter;

impl SummaryPrinter for NullSummaryPrinter {
    fn print(&mut self, _: &Summary<'_>) -> io::Result<()> {
        Ok(())
    }
}

/// [`Style`]s for terminal output.
#[derive(Clone, Debug)]
pub struct Styles {
    /// [`Style`] for rendering passed counts.
    pub ok: Style,

    /// [`Style`] for rendering skipped counts.
    pub skipped: Style,

    /// [`Style`] for rendering pending and undefined counts.
    pub pending: Style,

    /// [`Style`] for rendering errors and failed counts.
    pub err: Style,

    /// Indicates whether output should be colored.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            ok: Style::new().green(),
            skipped: Style::new().cyan(),
            pending: Style::new().yellow(),
            err: Style::new().red(),
            is_present: console::colors_enabled(),
        }
    }
}

impl Styles {
    /// Creates new [`Styles`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the given [`Coloring`] policy.
    pub fn apply_coloring(&mut self, color: Coloring) {
        match color {
            Coloring::Auto => {}
            Coloring::Always => self.is_present = true,
            Coloring::Never => self.is_present = false,
        }
    }

    /// If output is colored renders `input` with the [`Style`] of the given
    /// [`Outcome`] or leaves "as is" otherwise.
    #[must_use]
    pub fn outcome<'a>(
        &self,
        outcome: Outcome,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        let style = match outcome {
            Outcome::Passed => &self.ok,
            Outcome::Skipped => &self.skipped,
            Outcome::Pending | Outcome::Undefined => &self.pending,
            Outcome::Failed => &self.err,
        };
        if self.is_present {
            style.apply_to(input.into()).to_string().into()
        } else {
            input.into()
        }
    }
}

/// Default [`SummaryPrinter`] writing a human-readable summary.
///
/// ```text
/// Failed scenarios:
/// features/cart.feature:7 # Scenario: adding an item
///
/// 2 Scenarios (1 failed, 1 passed)
/// 5 Steps (1 failed, 1 skipped, 3 passed)
/// 0m0.012s
/// ```
#[derive(Clone, Debug)]
pub struct DefaultSummaryPrinter<Out: io::Write = io::Stdout> {
    output: Out,
    styles: Styles,
}

impl Default for DefaultSummaryPrinter {
    fn default() -> Self {
        Self::new(io::stdout())
    }
}

impl<Out: io::Write> DefaultSummaryPrinter<Out> {
    /// Creates a new [`DefaultSummaryPrinter`] writing into the `output`.
    #[must_use]
    pub fn new(output: Out) -> Self {
        Self {
            output,
            styles: Styles::new(),
        }
    }

    /// Applies the given [`Coloring`] policy.
    #[must_use]
    pub fn with_coloring(mut self, color: Coloring) -> Self {
        self.styles.apply_coloring(color);
        self
    }

    /// Returns the output this [`DefaultSummaryPrinter`] writes into.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
    }

    fn print_scenarios(
        &mut self,
        outcome: Outcome,
        designations: &[String],
    ) -> io::Result<()> {
        if designations.is_empty() {
            return Ok(());
        }
        let header =
            format!("{} scenarios:", capitalize(&outcome.to_string()));
        writeln!(self.output, "{}", self.styles.outcome(outcome, header))?;
        for d in designations {
            let (place, name) = d.split_once(" # ").unwrap_or((d, ""));
            writeln!(
                self.output,
                "{} # {name}",
                self.styles.outcome(outcome, place),
            )?;
        }
        writeln!(self.output)
    }

    fn print_counts(
        &mut self,
        what: &str,
        counts: SubCounts,
    ) -> io::Result<()> {
        if counts.total() == 0 {
            return writeln!(self.output, "0 {what}");
        }
        let parts = Outcome::SUMMARY_ORDER
            .into_iter()
            .filter(|o| counts.get(*o) > 0)
            .map(|o| self.styles.outcome(o, format!("{} {o}", counts.get(o))))
            .join(", ");
        writeln!(self.output, "{} {what} ({parts})", counts.total())
    }
}

impl<Out: io::Write> SummaryPrinter for DefaultSummaryPrinter<Out> {
    fn print(&mut self, summary: &Summary<'_>) -> io::Result<()> {
        let stats = summary.stats;

        writeln!(self.output)?;
        self.print_scenarios(Outcome::Failed, &stats.failed_scenarios)?;
        if summary.strict {
            self.print_scenarios(Outcome::Pending, &stats.pending_scenarios)?;
            self.print_scenarios(
                Outcome::Undefined,
                &stats.undefined_scenarios,
            )?;
        }
        self.print_counts("Scenarios", stats.scenarios)?;
        self.print_counts("Steps", stats.steps)?;
        writeln!(self.output, "{}", format_duration(stats.duration))?;
        writeln!(self.output)?;

        for e in summary.errors {
            let e = self.styles.outcome(Outcome::Failed, e.to_string());
            writeln!(self.output, "{e}")?;
            writeln!(self.output)?;
        }

        if !summary.snippets.is_empty() {
            writeln!(self.output)?;
            writeln!(
                self.output,
                "You can implement missing steps with the snippets below:",
            )?;
            writeln!(self.output)?;
            for s in summary.snippets {
                writeln!(self.output, "{s}")?;
            }
        }
        self.output.flush()
    }
}

/// Formats the `duration` as `XmY.ZZZs`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}m{}.{:03}s",
        secs / 60,
        secs % 60,
        duration.subsec_millis(),
    )
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print(stats: &Stats, strict: bool, snippets: &[String]) -> String {
        let mut printer = DefaultSummaryPrinter::new(Vec::new())
            .with_coloring(Coloring::Never);
        printer
            .print(&Summary {
                stats,
                errors: &[],
                snippets,
                strict,
            })
            .unwrap();
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn prints_nothing_ran() {
        let out = print(&Stats::IDENTITY, false, &[]);

        assert_eq!(out, "\n0 Scenarios\n0 Steps\n0m0.000s\n\n");
    }

    #[test]
    fn prints_counts_and_designations() {
        let stats = [
            Stats::scenario(Outcome::Failed, "a.feature:3 # Scenario: one"),
            Stats::scenario(Outcome::Undefined, "a.feature:9 # Scenario: two"),
            Stats::step(Outcome::Passed, Some(Duration::from_millis(61_250))),
            Stats::step(Outcome::Failed, None),
            Stats::step(Outcome::Skipped, None),
            Stats::step(Outcome::Undefined, None),
        ]
        .into_iter()
        .sum::<Stats>();

        let lenient = print(&stats, false, &[]);
        assert_eq!(
            lenient,
            "\n\
             Failed scenarios:\n\
             a.feature:3 # Scenario: one\n\
             \n\
             2 Scenarios (1 failed, 1 undefined)\n\
             4 Steps (1 failed, 1 skipped, 1 undefined, 1 passed)\n\
             1m1.250s\n\
             \n",
        );

        let strict = print(&stats, true, &["fn step() {}".into()]);
        assert!(strict.contains(
            "Undefined scenarios:\na.feature:9 # Scenario: two\n",
        ));
        assert!(strict.ends_with(
            "You can implement missing steps with the snippets below:\n\
             \n\
             fn step() {}\n",
        ));
    }

    #[test]
    fn null_printer_prints_nothing() {
        let stats = Stats::IDENTITY;

        assert!(NullSummaryPrinter
            .print(&Summary {
                stats: &stats,
                errors: &[],
                snippets: &[],
                strict: true,
            })
            .is_ok());
    }
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of matching and registering [`Step`]s.
//!
//! [`Step`]: super::Step

use std::fmt;

use derive_more::with_trait::{Display, Error};

use super::{location::Location, regex::HashableRegex};

/// Error of a [`gherkin::Step`] matching multiple [`Step`] [`Regex`]es inside
/// a [`Glue`].
///
/// [`Glue`]: crate::Glue
/// [`Regex`]: regex::Regex
/// [`Step`]: super::Step
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub struct AmbiguousMatchError {
    /// Possible [`Regex`]es the [`gherkin::Step`] matches, in registration
    /// order.
    ///
    /// [`Regex`]: regex::Regex
    pub possible_matches: Vec<(HashableRegex, Location)>,
}

impl AmbiguousMatchError {
    /// Iterates over the source patterns of all the candidates.
    pub fn patterns(&self) -> impl Iterator<Item = &str> + '_ {
        self.possible_matches.iter().map(|(re, _)| re.as_str())
    }
}

impl fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Possible matches:")?;
        for (re, loc) in &self.possible_matches {
            write!(f, "\n{re} --> {loc}")?;
        }
        Ok(())
    }
}

/// Error of registering two [`Step`]s with the same [`Regex`] source.
///
/// [`Regex`]: regex::Regex
/// [`Step`]: super::Step
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
#[display(
    "Duplicate step definition `{pattern}`: {existing} conflicts with \
     {duplicate}"
)]
pub struct DuplicateStepDefinitionError {
    /// Conflicting pattern.
    pub pattern: HashableRegex,

    /// [`Location`] of the definition registered first.
    pub existing: Location,

    /// [`Location`] of the rejected definition.
    pub duplicate: Location,
}

/// Error of running a [`gherkin::Step`] outside of a [`Scenario`], as a part
/// of another [`Step`].
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: super::Step
#[derive(Clone, Debug, Display, Error, Eq, PartialEq)]
pub enum UnreportedStepError {
    /// No [`Step`] matches.
    ///
    /// [`Step`]: super::Step
    #[display("Undefined step `{_0}`")]
    Undefined(#[error(not(source))] String),

    /// Several [`Step`]s match.
    ///
    /// [`Step`]: super::Step
    #[display("Ambiguous step `{step}`: {error}")]
    Ambiguous {
        /// Text of the [`gherkin::Step`].
        #[error(not(source))]
        step: String,

        /// Candidates the [`gherkin::Step`] matches.
        error: AmbiguousMatchError,
    },
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;

    fn re(s: &str) -> HashableRegex {
        Regex::new(s).unwrap().into()
    }

    #[test]
    fn ambiguous_lists_every_candidate() {
        let err = AmbiguousMatchError {
            possible_matches: vec![
                (re(r"^I have (\d+) cukes$"), Location::new("a.rs", 1, 1)),
                (re(r"^I have .+ cukes$"), Location::new("b.rs", 2, 3)),
            ],
        };

        assert_eq!(
            err.to_string(),
            "Possible matches:\n\
             ^I have (\\d+) cukes$ --> a.rs:1:1\n\
             ^I have .+ cukes$ --> b.rs:2:3",
        );
        assert_eq!(
            err.patterns().collect::<Vec<_>>(),
            [r"^I have (\d+) cukes$", "^I have .+ cukes$"],
        );
    }

    #[test]
    fn duplicate_names_both_locations() {
        let err = DuplicateStepDefinitionError {
            pattern: re("^foo$"),
            existing: Location::new("a.rs", 1, 1),
            duplicate: Location::new("a.rs", 5, 1),
        };

        assert_eq!(
            err.to_string(),
            "Duplicate step definition `^foo$`: a.rs:1:1 conflicts with \
             a.rs:5:1",
        );
    }
}

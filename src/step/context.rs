// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Arguments handed to a [`Step`] function.
//!
//! [`Step`]: super::Step

/// Name of a capturing group inside a [`regex`].
pub type CaptureName = Option<String>;

/// Context for a [`Step`] function execution.
///
/// [`Step`]: super::Step
#[derive(Clone, Debug)]
pub struct Context {
    /// [`gherkin::Step`] matched to a [`Step`] function.
    ///
    /// [`Step`]: super::Step
    pub step: gherkin::Step,

    /// [`Regex`] matches of a [`gherkin::Step::value`].
    ///
    /// The first element is always the whole match.
    ///
    /// [`Regex`]: regex::Regex
    pub matches: Vec<(CaptureName, String)>,
}

impl Context {
    /// Returns the value of the capture group at `index` (`0` is the whole
    /// match).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.matches.get(index).map(|(_, v)| v.as_str())
    }

    /// Returns the value of the named capture group, if any.
    #[must_use]
    pub fn named(&self, name: &str) -> Option<&str> {
        self.matches
            .iter()
            .find(|(n, _)| n.as_deref() == Some(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the positional arguments, skipping the whole match.
    pub fn args(&self) -> impl Iterator<Item = &str> + '_ {
        self.matches.iter().skip(1).map(|(_, v)| v.as_str())
    }

    /// Returns the doc string argument of the [`gherkin::Step`], if any.
    #[must_use]
    pub fn docstring(&self) -> Option<&str> {
        self.step.docstring.as_deref()
    }

    /// Returns the data table argument of the [`gherkin::Step`], if any.
    #[must_use]
    pub fn table(&self) -> Option<&gherkin::Table> {
        self.step.table.as_ref()
    }
}

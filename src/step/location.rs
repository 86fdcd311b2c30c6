// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Source location of step and hook definitions.

use std::panic;

use derive_more::with_trait::Display;

/// Location of a [`Step`] or [`Hook`] [`fn`] registration.
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: crate::step::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{path}:{line}:{column}")]
pub struct Location {
    /// Path to the file where the definition is located.
    pub path: &'static str,

    /// Line of the file where the definition is located.
    pub line: u32,

    /// Column of the file where the definition is located.
    pub column: u32,
}

impl Location {
    /// Creates a new [`Location`] with the given path, line, and column.
    #[must_use]
    pub const fn new(path: &'static str, line: u32, column: u32) -> Self {
        Self { path, line, column }
    }

    /// Captures the [`Location`] of the caller.
    ///
    /// Propagates through every `#[track_caller]` frame, so registration
    /// helpers report the user's call site rather than their own.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let loc = panic::Location::caller();
        Self::new(loc.file(), loc.line(), loc.column())
    }

    /// Indicates whether this [`Location`] lives under the given path
    /// `prefix`.
    ///
    /// Both `/` and `\` separators are treated the same way.
    #[must_use]
    pub fn is_under(&self, prefix: &str) -> bool {
        let normalize = |s: &str| s.replace('\\', "/");
        normalize(self.path).starts_with(&normalize(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_path_line_column() {
        let loc = Location::new("tests/steps.rs", 42, 10);

        assert_eq!(loc.to_string(), "tests/steps.rs:42:10");
    }

    #[test]
    fn captures_caller() {
        let loc = Location::caller();

        assert!(loc.path.ends_with("location.rs"));
        assert!(loc.line > 0);
    }

    #[test]
    fn prefix_matching_ignores_separator_style() {
        let loc = Location::new("tests\\steps\\cart.rs", 1, 1);

        assert!(loc.is_under("tests/steps"));
        assert!(loc.is_under("tests\\steps\\"));
        assert!(!loc.is_under("src"));
    }
}

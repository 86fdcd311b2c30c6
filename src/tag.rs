// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Evaluation of [`TagOperation`]s used as [`Hook`] predicates and scenario
//! filters.
//!
//! [`Hook`]: crate::glue::Hook

use gherkin::tagexpr::TagOperation;
use sealed::sealed;

/// Extension of a [`TagOperation`] allowing to evaluate it.
#[sealed]
pub trait Ext {
    /// Evaluates this [`TagOperation`] for the given `tags`.
    ///
    /// `tags` are expected without the leading `@`, the same way [`gherkin`]
    /// stores them.
    #[must_use]
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone;
}

#[sealed]
impl Ext for TagOperation {
    fn eval<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        match self {
            Self::And(l, r) => l.eval(tags.clone()) & r.eval(tags),
            Self::Or(l, r) => l.eval(tags.clone()) | r.eval(tags),
            Self::Not(t) => !t.eval(tags),
            Self::Tag(t) => tags
                .into_iter()
                .any(|tag| tag.as_ref().trim_start_matches('@') == t),
        }
    }
}

/// Evaluates an optional predicate, absence of which matches any `tags`.
#[must_use]
pub fn matches<I, S>(predicate: Option<&TagOperation>, tags: I) -> bool
where
    S: AsRef<str>,
    I: IntoIterator<Item = S> + Clone,
{
    predicate.map_or(true, |op| op.eval(tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(s: &str) -> TagOperation {
        s.parse().unwrap()
    }

    #[test]
    fn evaluates_boolean_expressions() {
        let tags = ["wip", "slow"];

        assert!(op("@wip").eval(tags));
        assert!(op("@wip and @slow").eval(tags));
        assert!(!op("@wip and not @slow").eval(tags));
        assert!(op("@fast or @slow").eval(tags));
        assert!(!op("@fast").eval(tags));
    }

    #[test]
    fn absent_predicate_matches_everything() {
        assert!(matches(None, Vec::<String>::new()));
        assert!(!matches(Some(&op("@wip")), Vec::<String>::new()));
    }
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tracking of undefined [`Step`]s for snippet suggestions.
//!
//! [`Step`]: gherkin::Step

use linked_hash_map::LinkedHashMap;

use crate::backend::{Backend, FunctionNameGenerator};

/// Undefined [`gherkin::Step`]s met during a run, deduplicated by their text
/// and kept in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct UndefinedStepsTracker {
    steps: LinkedHashMap<String, gherkin::Step>,
}

impl UndefinedStepsTracker {
    /// Creates an empty [`UndefinedStepsTracker`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers the given undefined [`gherkin::Step`].
    pub fn add(&mut self, step: &gherkin::Step) {
        if !self.steps.contains_key(&step.value) {
            _ = self.steps.insert(step.value.clone(), step.clone());
        }
    }

    /// Indicates whether any undefined [`gherkin::Step`] was met.
    #[must_use]
    pub fn has_undefined_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Returns the remembered [`gherkin::Step`]s in first-seen order.
    pub fn steps(&self) -> impl Iterator<Item = &gherkin::Step> {
        self.steps.values()
    }

    /// Collects snippets for all the remembered [`gherkin::Step`]s, taking
    /// the first one offered by any of the `backends`.
    ///
    /// Identical snippets are returned once.
    #[must_use]
    pub fn snippets<W>(
        &self,
        backends: &[Box<dyn Backend<W>>],
        names: &dyn FunctionNameGenerator,
    ) -> Vec<String> {
        let mut snippets = Vec::<String>::new();
        for step in self.steps() {
            let snippet = backends.iter().find_map(|b| b.snippet(step, names));
            if let Some(s) = snippet {
                if !snippets.contains(&s) {
                    snippets.push(s);
                }
            }
        }
        snippets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::{SnippetType, Steps},
        glue::Glue,
        step::DuplicateStepDefinitionError,
    };

    struct Silent;

    impl Backend<()> for Silent {
        fn load_glue(
            &self,
            _: &mut Glue<()>,
            _: &[String],
        ) -> Result<(), DuplicateStepDefinitionError> {
            Ok(())
        }

        fn snippet(
            &self,
            _: &gherkin::Step,
            _: &dyn FunctionNameGenerator,
        ) -> Option<String> {
            None
        }
    }

    fn step(keyword: &str, value: &str) -> gherkin::Step {
        gherkin::Step {
            keyword: keyword.into(),
            ty: gherkin::StepType::Given,
            value: value.into(),
            docstring: None,
            table: None,
            span: gherkin::Span { start: 0, end: 0 },
            position: gherkin::LineCol { line: 1, col: 1 },
        }
    }

    #[test]
    fn deduplicates_by_text() {
        let mut tracker = UndefinedStepsTracker::new();
        assert!(!tracker.has_undefined_steps());

        tracker.add(&step("Given ", "b"));
        tracker.add(&step("When ", "s"));
        tracker.add(&step("And ", "b"));

        assert!(tracker.has_undefined_steps());
        assert_eq!(
            tracker.steps().map(|s| s.value.as_str()).collect::<Vec<_>>(),
            ["b", "s"],
        );
    }

    #[test]
    fn takes_first_offered_snippet() {
        let mut tracker = UndefinedStepsTracker::new();
        tracker.add(&step("Given ", "I have 1 cuke"));
        tracker.add(&step("Given ", "I have 2 cukes"));
        tracker.add(&step("Given ", "I have 3 cuke"));

        let silent: Vec<Box<dyn Backend<()>>> = vec![Box::new(Silent)];
        assert!(tracker.snippets(&silent, &SnippetType::Underscore).is_empty());

        let backends: Vec<Box<dyn Backend<()>>> =
            vec![Box::new(Silent), Box::new(Steps::<()>::new())];
        let snippets = tracker.snippets(&backends, &SnippetType::Underscore);

        assert_eq!(snippets.len(), 2);
        assert!(snippets[0].contains(r"^I have (\d+) cuke$"));
        assert!(snippets[1].contains(r"^I have (\d+) cukes$"));
    }
}

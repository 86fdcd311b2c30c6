// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Registry of [`Step`] and [`Hook`] definitions loaded by [`Backend`]s.
//!
//! [`Backend`]: crate::Backend
//! [`Step`]: gherkin::Step

pub mod definition;
pub mod hook;

use std::fmt;

use itertools::Itertools as _;

use crate::step::{
    AmbiguousMatchError, DuplicateStepDefinitionError, UnreportedStepError,
};

pub use self::{
    definition::{Argument, StepDefinition, StepDefinitionMatch},
    hook::{Hook, HookDefinition, HookType},
};

/// Result of resolving a [`gherkin::Step`] in a [`Glue`].
pub enum Lookup<'g, World> {
    /// No [`StepDefinition`] matches.
    Undefined,

    /// Exactly one [`StepDefinition`] matches.
    Matched(StepDefinitionMatch<'g, World>),

    /// Several [`StepDefinition`]s match, in registration order.
    Ambiguous(Vec<StepDefinitionMatch<'g, World>>),
}

impl<World> Lookup<'_, World> {
    /// Returns the [`AmbiguousMatchError`] describing this [`Lookup`], if it's
    /// [`Lookup::Ambiguous`].
    #[must_use]
    pub fn ambiguity(&self) -> Option<AmbiguousMatchError> {
        let Self::Ambiguous(candidates) = self else {
            return None;
        };
        Some(AmbiguousMatchError {
            possible_matches: candidates
                .iter()
                .map(|m| (m.pattern().clone(), m.location()))
                .collect(),
        })
    }
}

impl<World> fmt::Debug for Lookup<'_, World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Matched(m) => f.debug_tuple("Matched").field(m).finish(),
            Self::Ambiguous(ms) => f.debug_tuple("Ambiguous").field(ms).finish(),
        }
    }
}

/// Registry of [`StepDefinition`]s and [`HookDefinition`]s.
pub struct Glue<World> {
    steps: Vec<StepDefinition<World>>,
    before: Vec<HookDefinition<World>>,
    after: Vec<HookDefinition<World>>,
}

impl<World> Default for Glue<World> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
        }
    }
}

impl<World> fmt::Debug for Glue<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Glue")
            .field("steps", &self.steps)
            .field("before", &self.before)
            .field("after", &self.after)
            .finish()
    }
}

impl<World> Glue<World> {
    /// Creates an empty [`Glue`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new [`StepDefinition`].
    ///
    /// # Errors
    ///
    /// If a [`StepDefinition`] with the same pattern is registered already.
    pub fn add_step(
        &mut self,
        def: StepDefinition<World>,
    ) -> Result<(), DuplicateStepDefinitionError> {
        if let Some(existing) = self.steps.iter().find(|s| s.regex == def.regex)
        {
            return Err(DuplicateStepDefinitionError {
                pattern: def.regex,
                existing: existing.location,
                duplicate: def.location,
            });
        }
        self.steps.push(def);
        Ok(())
    }

    /// Registers a new [`HookDefinition`] of the given [`HookType`].
    pub fn add_hook(&mut self, ty: HookType, def: HookDefinition<World>) {
        match ty {
            HookType::Before => self.before.push(def),
            HookType::After => self.after.push(def),
        }
    }

    /// Returns all the registered [`StepDefinition`]s in registration order.
    #[must_use]
    pub fn step_definitions(&self) -> &[StepDefinition<World>] {
        &self.steps
    }

    /// Resolves the given [`gherkin::Step`] against every registered
    /// [`StepDefinition`].
    ///
    /// The [`gherkin::Step::ty`] doesn't take part in matching.
    #[must_use]
    pub fn find(&self, step: &gherkin::Step) -> Lookup<'_, World> {
        let mut matches = self
            .steps
            .iter()
            .filter_map(|def| StepDefinitionMatch::try_new(def, step))
            .collect::<Vec<_>>();

        match matches.len() {
            0 => Lookup::Undefined,
            1 => matches
                .pop()
                .map_or(Lookup::Undefined, Lookup::Matched),
            _ => Lookup::Ambiguous(matches),
        }
    }

    /// Runs the given [`gherkin::Step`] on the `world` without reporting or
    /// timing it, so a [`Step`] function may be composed of other ones.
    ///
    /// Panics of the invoked [`Step`] function propagate to the caller, failing
    /// the outer [`Step`].
    ///
    /// # Errors
    ///
    /// If the [`gherkin::Step`] is undefined or ambiguous.
    ///
    /// [`Step`]: crate::step::Step
    pub async fn run_unreported(
        &self,
        world: &mut World,
        step: &gherkin::Step,
    ) -> Result<(), UnreportedStepError> {
        let lookup = self.find(step);
        if let Some(error) = lookup.ambiguity() {
            return Err(UnreportedStepError::Ambiguous {
                step: step.value.clone(),
                error,
            });
        }
        let Lookup::Matched(m) = lookup else {
            return Err(UnreportedStepError::Undefined(step.value.clone()));
        };
        m.invoke(world).await;
        Ok(())
    }

    /// Returns [`HookDefinition`]s of the given [`HookType`] applicable to the
    /// `tags`, ascending by their order with ties kept in registration order.
    pub fn hooks_for<I, S>(
        &self,
        ty: HookType,
        tags: I,
    ) -> Vec<&HookDefinition<World>>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        let hooks = match ty {
            HookType::Before => &self.before,
            HookType::After => &self.after,
        };
        hooks
            .iter()
            .filter(|h| h.applies_to(tags.clone()))
            .sorted_by_key(|h| h.order)
            .collect()
    }
}

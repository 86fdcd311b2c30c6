// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Step`] definitions and their resolved matches.
//!
//! [`Step`]: gherkin::Step

use std::{fmt, iter};

use futures::future::LocalBoxFuture;
use gherkin::StepType;

use crate::step::{self, Context, HashableRegex, Location};

/// Registered [`Step`] function along with its pattern.
///
/// [`Step`]: gherkin::Step
pub struct StepDefinition<World> {
    /// Keyword this definition was registered with.
    ///
    /// It's informational only, matching ignores it.
    pub ty: Option<StepType>,

    /// Pattern to match [`gherkin::Step::value`] against.
    pub regex: HashableRegex,

    /// [`Step`] function.
    ///
    /// [`Step`]: step::Step
    pub func: step::Step<World>,

    /// [`Location`] of the registration.
    pub location: Location,
}

// Manual implementation is required to omit the redundant `World: Clone` trait
// bound imposed by `#[derive(Clone)]`.
impl<World> Clone for StepDefinition<World> {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty,
            regex: self.regex.clone(),
            func: self.func,
            location: self.location,
        }
    }
}

impl<World> fmt::Debug for StepDefinition<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("ty", &self.ty)
            .field("regex", &self.regex)
            .field("func", &format!("{:p}", self.func as *const ()))
            .field("location", &self.location)
            .finish()
    }
}

/// Argument bound from a capture group of a [`StepDefinition`] pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Argument {
    /// Name of the capture group, if any.
    pub name: Option<String>,

    /// Byte offset of the captured value in the [`gherkin::Step::value`], or
    /// [`None`] if the group didn't participate in the match.
    pub offset: Option<usize>,

    /// Captured value, or [`None`] if the group didn't participate in the
    /// match.
    pub value: Option<String>,
}

/// [`gherkin::Step`] resolved to exactly one [`StepDefinition`].
///
/// Can only be produced by [`Glue::find()`].
///
/// [`Glue::find()`]: super::Glue::find
pub struct StepDefinitionMatch<'g, World> {
    definition: &'g StepDefinition<World>,
    step: gherkin::Step,
    whole: String,
    arguments: Vec<Argument>,
}

impl<'g, World> StepDefinitionMatch<'g, World> {
    /// Tries to match the given [`gherkin::Step`] against the `definition`.
    pub(super) fn try_new(
        definition: &'g StepDefinition<World>,
        step: &gherkin::Step,
    ) -> Option<Self> {
        let re = &definition.regex;
        let mut locations = re.capture_locations();
        let whole = re.captures_read(&mut locations, &step.value)?;

        let arguments = re
            .capture_names()
            .enumerate()
            .skip(1)
            .map(|(i, name)| {
                let pos = locations.get(i);
                Argument {
                    name: name.map(str::to_owned),
                    offset: pos.map(|(s, _)| s),
                    value: pos
                        .and_then(|(s, e)| step.value.get(s..e))
                        .map(str::to_owned),
                }
            })
            .collect();

        Some(Self {
            definition,
            step: step.clone(),
            whole: whole.as_str().to_owned(),
            arguments,
        })
    }

    /// Returns the matched [`StepDefinition`].
    #[must_use]
    pub const fn definition(&self) -> &'g StepDefinition<World> {
        self.definition
    }

    /// Returns the [`Location`] of the matched [`StepDefinition`].
    #[must_use]
    pub const fn location(&self) -> Location {
        self.definition.location
    }

    /// Returns the pattern of the matched [`StepDefinition`].
    #[must_use]
    pub const fn pattern(&self) -> &'g HashableRegex {
        &self.definition.regex
    }

    /// Returns the [`gherkin::Step`] being matched.
    #[must_use]
    pub const fn step(&self) -> &gherkin::Step {
        &self.step
    }

    /// Returns the [`Argument`]s bound from the capture groups.
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Builds the [`Context`] the [`Step`] function is invoked with.
    ///
    /// [`Step`]: step::Step
    #[must_use]
    pub fn context(&self) -> Context {
        let matches = iter::once((None, self.whole.clone()))
            .chain(self.arguments.iter().map(|arg| {
                (arg.name.clone(), arg.value.clone().unwrap_or_default())
            }))
            .collect();
        Context {
            step: self.step.clone(),
            matches,
        }
    }

    /// Invokes the matched [`Step`] function on the given `world`.
    ///
    /// [`Step`]: step::Step
    pub fn invoke<'w>(&self, world: &'w mut World) -> LocalBoxFuture<'w, ()> {
        (self.definition.func)(world, self.context())
    }
}

impl<World> fmt::Debug for StepDefinitionMatch<'_, World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinitionMatch")
            .field("definition", self.definition)
            .field("step", &self.step.value)
            .field("arguments", &self.arguments)
            .finish()
    }
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Providers of [`Step`] and [`Hook`] definitions along with per-[`Scenario`]
//! [`World`] management.
//!
//! [`Hook`]: crate::glue::Hook
//! [`Scenario`]: gherkin::Scenario
//! [`Step`]: gherkin::Step
//! [`World`]: crate::World

pub mod snippet;
pub mod steps;

use crate::{glue::Glue, step::DuplicateStepDefinitionError};

#[doc(inline)]
pub use self::{
    snippet::{FunctionNameGenerator, SnippetType},
    steps::Steps,
};

/// Source of definitions for a [`Runtime`].
///
/// [`Runtime`]: crate::Runtime
pub trait Backend<World> {
    /// Registers all the definitions of this [`Backend`] into the [`Glue`].
    ///
    /// Non-empty `filters` restrict loading to definitions located under any
    /// of the given path prefixes.
    ///
    /// # Errors
    ///
    /// If a [`Step`] pattern is registered twice.
    ///
    /// [`Step`]: gherkin::Step
    fn load_glue(
        &self,
        glue: &mut Glue<World>,
        filters: &[String],
    ) -> Result<(), DuplicateStepDefinitionError>;

    /// Prepares a freshly constructed `world` before any [`Hook`] runs.
    ///
    /// [`Hook`]: crate::glue::Hook
    #[allow(unused_variables)] // no-op default
    fn build_world(&self, world: &mut World) {}

    /// Tears the `world` down after all the [`Hook`]s ran.
    ///
    /// [`Hook`]: crate::glue::Hook
    #[allow(unused_variables)] // no-op default
    fn dispose_world(&self, world: &mut World) {}

    /// Suggests skeleton code implementing the undefined `step`, if this
    /// [`Backend`] is able to.
    fn snippet(
        &self,
        step: &gherkin::Step,
        names: &dyn FunctionNameGenerator,
    ) -> Option<String>;
}

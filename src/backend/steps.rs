// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Programmatic [`Backend`] registering plain [`fn`]s.

use std::fmt;

use gherkin::StepType;
use regex::Regex;

use super::{snippet, Backend, FunctionNameGenerator};
use crate::{
    glue::{Glue, HookDefinition, HookType, StepDefinition},
    step::{self, DuplicateStepDefinitionError, Location},
};

/// Collection of [`Step`] functions and [`HookDefinition`]s.
///
/// ```rust
/// # use cucumber_engine::{step::Context, Steps};
/// # use futures::{future::LocalBoxFuture, FutureExt as _};
/// # use regex::Regex;
/// #
/// # #[derive(Default)]
/// # struct Calculator { total: i64 }
/// #
/// fn add(w: &mut Calculator, ctx: Context) -> LocalBoxFuture<'_, ()> {
///     async move {
///         w.total += ctx.get(1).unwrap().parse::<i64>().unwrap();
///     }
///     .boxed_local()
/// }
///
/// let steps = Steps::<Calculator>::new()
///     .when(Regex::new(r"^I add (\d+)$").unwrap(), add);
/// ```
///
/// [`Step`]: step::Step
pub struct Steps<World> {
    steps: Vec<StepDefinition<World>>,
    before: Vec<HookDefinition<World>>,
    after: Vec<HookDefinition<World>>,
    on_build: Option<fn(&mut World)>,
    on_dispose: Option<fn(&mut World)>,
}

impl<World> Default for Steps<World> {
    fn default() -> Self {
        Self {
            steps: Vec::new(),
            before: Vec::new(),
            after: Vec::new(),
            on_build: None,
            on_dispose: None,
        }
    }
}

impl<World> fmt::Debug for Steps<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Steps")
            .field("steps", &self.steps)
            .field("before", &self.before)
            .field("after", &self.after)
            .field("on_build", &self.on_build.is_some())
            .field("on_dispose", &self.on_dispose.is_some())
            .finish()
    }
}

impl<World> Steps<World> {
    /// Creates empty [`Steps`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(
        mut self,
        ty: Option<StepType>,
        regex: Regex,
        func: step::Step<World>,
        location: Location,
    ) -> Self {
        self.steps.push(StepDefinition {
            ty,
            regex: regex.into(),
            func,
            location,
        });
        self
    }

    /// Adds a [`Step`] function for [Given] steps matching the `regex`.
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference/#given
    /// [`Step`]: step::Step
    #[must_use]
    #[track_caller]
    pub fn given(self, regex: Regex, step: step::Step<World>) -> Self {
        self.push(Some(StepType::Given), regex, step, Location::caller())
    }

    /// Adds a [`Step`] function for [When] steps matching the `regex`.
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference/#when
    /// [`Step`]: step::Step
    #[must_use]
    #[track_caller]
    pub fn when(self, regex: Regex, step: step::Step<World>) -> Self {
        self.push(Some(StepType::When), regex, step, Location::caller())
    }

    /// Adds a [`Step`] function for [Then] steps matching the `regex`.
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference/#then
    /// [`Step`]: step::Step
    #[must_use]
    #[track_caller]
    pub fn then(self, regex: Regex, step: step::Step<World>) -> Self {
        self.push(Some(StepType::Then), regex, step, Location::caller())
    }

    /// Adds a [`Step`] function matching the `regex` regardless of keyword.
    ///
    /// [`Step`]: step::Step
    #[must_use]
    #[track_caller]
    pub fn step(self, regex: Regex, step: step::Step<World>) -> Self {
        self.push(None, regex, step, Location::caller())
    }

    /// Adds a [`Before`] hook.
    ///
    /// [`Before`]: HookType::Before
    #[must_use]
    pub fn before(mut self, hook: HookDefinition<World>) -> Self {
        self.before.push(hook);
        self
    }

    /// Adds an [`After`] hook.
    ///
    /// [`After`]: HookType::After
    #[must_use]
    pub fn after(mut self, hook: HookDefinition<World>) -> Self {
        self.after.push(hook);
        self
    }

    /// Sets a function preparing every freshly constructed `World`.
    #[must_use]
    pub fn on_build(mut self, f: fn(&mut World)) -> Self {
        self.on_build = Some(f);
        self
    }

    /// Sets a function tearing down every `World` after its [`Scenario`].
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn on_dispose(mut self, f: fn(&mut World)) -> Self {
        self.on_dispose = Some(f);
        self
    }
}

fn is_selected(location: Location, filters: &[String]) -> bool {
    filters.is_empty() || filters.iter().any(|f| location.is_under(f))
}

impl<World> Backend<World> for Steps<World> {
    fn load_glue(
        &self,
        glue: &mut Glue<World>,
        filters: &[String],
    ) -> Result<(), DuplicateStepDefinitionError> {
        for def in self.steps.iter().filter(|d| is_selected(d.location, filters))
        {
            glue.add_step(def.clone())?;
        }
        for (ty, hooks) in
            [(HookType::Before, &self.before), (HookType::After, &self.after)]
        {
            for hook in hooks.iter().filter(|h| is_selected(h.location, filters))
            {
                glue.add_hook(ty, hook.clone());
            }
        }
        Ok(())
    }

    fn build_world(&self, world: &mut World) {
        if let Some(f) = self.on_build {
            f(world);
        }
    }

    fn dispose_world(&self, world: &mut World) {
        if let Some(f) = self.on_dispose {
            f(world);
        }
    }

    fn snippet(
        &self,
        step: &gherkin::Step,
        names: &dyn FunctionNameGenerator,
    ) -> Option<String> {
        Some(snippet::rust_step(step, names))
    }
}

#[cfg(test)]
mod tests {
    use futures::{future::LocalBoxFuture, FutureExt as _};

    use super::*;
    use crate::{backend::SnippetType, scenario::ScenarioResult, step::Context};

    fn noop(_: &mut (), _: Context) -> LocalBoxFuture<'_, ()> {
        async {}.boxed_local()
    }

    fn hook<'a>(
        _: &'a mut (),
        _: &'a ScenarioResult,
    ) -> LocalBoxFuture<'a, ()> {
        async {}.boxed_local()
    }

    fn re(s: &str) -> Regex {
        Regex::new(s).unwrap()
    }

    #[test]
    fn loads_everything_without_filters() {
        let steps = Steps::new()
            .given(re("^a$"), noop)
            .when(re("^b$"), noop)
            .then(re("^c$"), noop)
            .step(re("^d$"), noop)
            .before(HookDefinition::new(hook))
            .after(HookDefinition::new(hook));

        let mut glue = Glue::new();
        steps.load_glue(&mut glue, &[]).unwrap();

        let defs = glue.step_definitions();
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].ty, Some(StepType::Given));
        assert_eq!(defs[3].ty, None);
        assert!(defs[0].location.path.ends_with("steps.rs"));
        assert_eq!(glue.hooks_for(HookType::Before, [""; 0]).len(), 1);
        assert_eq!(glue.hooks_for(HookType::After, [""; 0]).len(), 1);
    }

    #[test]
    fn filters_by_location() {
        let here = Location::caller();
        let steps = Steps::new()
            .given(re("^a$"), noop)
            .before(
                HookDefinition::new(hook)
                    .at(Location::new("elsewhere/hooks.rs", 1, 1)),
            );

        let mut glue = Glue::new();
        steps.load_glue(&mut glue, &["elsewhere".into()]).unwrap();
        assert!(glue.step_definitions().is_empty());
        assert_eq!(glue.hooks_for(HookType::Before, [""; 0]).len(), 1);

        let mut glue = Glue::new();
        steps.load_glue(&mut glue, &[here.path.into()]).unwrap();
        assert_eq!(glue.step_definitions().len(), 1);
        assert!(glue.hooks_for(HookType::Before, [""; 0]).is_empty());
    }

    #[test]
    fn rejects_duplicates() {
        let steps = Steps::new().given(re("^a$"), noop).then(re("^a$"), noop);

        let err = steps.load_glue(&mut Glue::new(), &[]).unwrap_err();

        assert_eq!(err.pattern.as_str(), "^a$");
    }

    #[test]
    fn offers_snippets() {
        let step = gherkin::Step {
            keyword: "When ".into(),
            ty: StepType::When,
            value: "I eat 3 cukes".into(),
            docstring: None,
            table: None,
            span: gherkin::Span { start: 0, end: 0 },
            position: gherkin::LineCol { line: 1, col: 1 },
        };

        let snippet = Steps::<()>::new()
            .snippet(&step, &SnippetType::Underscore)
            .unwrap();

        assert!(snippet.contains(
            r##"steps.when(Regex::new(r#"^I eat (\d+) cukes$"#)?, i_eat_cukes)"##,
        ));
    }
}

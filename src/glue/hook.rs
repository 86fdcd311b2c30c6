// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Before`] and [`After`] hook definitions.
//!
//! [`After`]: HookType::After
//! [`Before`]: HookType::Before

use std::{fmt, time::Duration};

use derive_more::with_trait::Display;
use futures::future::LocalBoxFuture;
use gherkin::tagexpr::TagOperation;

use crate::{scenario::ScenarioResult, step::Location, tag};

/// Alias for a hook function that returns a [`LocalBoxFuture`].
pub type Hook<World> =
    for<'a> fn(&'a mut World, &'a ScenarioResult) -> LocalBoxFuture<'a, ()>;

/// Type of hook executed before or after all [`Scenario`]'s [`Step`]s.
///
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{self:?}")]
pub enum HookType {
    /// Executing on each [`Scenario`] before running all [`Step`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    Before,

    /// Executing on each [`Scenario`] after running all [`Step`]s.
    ///
    /// [`Scenario`]: gherkin::Scenario
    /// [`Step`]: gherkin::Step
    After,
}

/// Registered [`Hook`] along with its ordering, tag predicate and time bound.
pub struct HookDefinition<World> {
    /// [`Hook`] function.
    pub body: Hook<World>,

    /// Lower values run earlier.
    pub order: i32,

    /// Predicate over the effective [`Scenario`] tags, matching any
    /// [`Scenario`] if absent.
    ///
    /// [`Scenario`]: gherkin::Scenario
    pub tags: Option<TagOperation>,

    /// Time bound of a single invocation.
    pub timeout: Option<Duration>,

    /// [`Location`] of the registration.
    pub location: Location,
}

impl<World> HookDefinition<World> {
    /// Order assigned to [`HookDefinition`]s not specifying one.
    pub const DEFAULT_ORDER: i32 = 10_000;

    /// Creates a new [`HookDefinition`] located at the caller.
    #[must_use]
    #[track_caller]
    pub fn new(body: Hook<World>) -> Self {
        Self {
            body,
            order: Self::DEFAULT_ORDER,
            tags: None,
            timeout: None,
            location: Location::caller(),
        }
    }

    /// Sets the order of this [`HookDefinition`].
    #[must_use]
    pub const fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Restricts this [`HookDefinition`] to [`Scenario`]s matching the tag
    /// expression.
    ///
    /// [`Scenario`]: gherkin::Scenario
    #[must_use]
    pub fn tags(mut self, tags: TagOperation) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Bounds every invocation of this [`HookDefinition`] in time.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the [`Location`] of this [`HookDefinition`].
    #[must_use]
    pub const fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Indicates whether this [`HookDefinition`] applies to the given `tags`.
    #[must_use]
    pub fn applies_to<I, S>(&self, tags: I) -> bool
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S> + Clone,
    {
        tag::matches(self.tags.as_ref(), tags)
    }
}

// Manual implementation is required to omit the redundant `World: Clone` trait
// bound imposed by `#[derive(Clone)]`.
impl<World> Clone for HookDefinition<World> {
    fn clone(&self) -> Self {
        Self {
            body: self.body,
            order: self.order,
            tags: self.tags.clone(),
            timeout: self.timeout,
            location: self.location,
        }
    }
}

impl<World> fmt::Debug for HookDefinition<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookDefinition")
            .field("body", &format!("{:p}", self.body as *const ()))
            .field("order", &self.order)
            .field("tags", &self.tags)
            .field("timeout", &self.timeout)
            .field("location", &self.location)
            .finish()
    }
}

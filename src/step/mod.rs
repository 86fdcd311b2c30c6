// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building blocks of [`Step`] definitions: their [`Context`], [`Location`]
//! and matching errors.
//!
//! [`Step`]: gherkin::Step

pub mod context;
pub mod error;
pub mod location;
pub mod regex;

use futures::future::LocalBoxFuture;

pub use self::{
    context::{CaptureName, Context},
    error::{
        AmbiguousMatchError, DuplicateStepDefinitionError, UnreportedStepError,
    },
    location::Location,
    regex::HashableRegex,
};

/// Alias for a [`gherkin::Step`] function that returns a [`LocalBoxFuture`].
pub type Step<World> =
    for<'a> fn(&'a mut World, Context) -> LocalBoxFuture<'a, ()>;

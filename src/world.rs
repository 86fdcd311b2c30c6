// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-[`Scenario`] state.
//!
//! [`Scenario`]: gherkin::Scenario

use std::{fmt::Display, future::Future};

/// Represents a shared user-defined state for a [`Scenario`] execution.
///
/// A fresh [`World`] is created right before every [`Scenario`] and dropped
/// right after it, so no state leaks between [`Scenario`]s.
///
/// ```rust
/// # use std::convert::Infallible;
/// # use cucumber_engine::World;
/// #[derive(Debug, Default)]
/// struct Cart {
///     items: Vec<String>,
/// }
///
/// impl World for Cart {
///     type Error = Infallible;
///
///     async fn new() -> Result<Self, Infallible> {
///         Ok(Self::default())
///     }
/// }
/// ```
///
/// [`Scenario`]: gherkin::Scenario
pub trait World: Sized + 'static {
    /// Error of creating a new [`World`] instance.
    type Error: Display;

    /// Creates a new [`World`] instance.
    fn new() -> impl Future<Output = Result<Self, Self::Error>>;
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Outcome`]s of executed units and classification of panics into them.

use std::{
    any::{self, Any},
    fmt, panic,
    time::Duration,
};

use derive_more::with_trait::Display;

use crate::error::{Failure, Info, PanicPayloadExt as _};

/// Outcome of a single [`Step`], [`Hook`] or a whole [`Scenario`].
///
/// Variants are ordered by severity, so the status of a [`Scenario`] is the
/// maximum of its recorded [`Outcome`]s.
///
/// [`Hook`]: crate::glue::Hook
/// [`Scenario`]: gherkin::Scenario
/// [`Step`]: gherkin::Step
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
)]
pub enum Outcome {
    /// Executed and succeeded.
    #[display("passed")]
    Passed,

    /// Not executed, because of a previous failure or a dry run.
    #[display("skipped")]
    Skipped,

    /// No definition matched.
    #[display("undefined")]
    Undefined,

    /// Acknowledged, but not implemented yet.
    #[display("pending")]
    Pending,

    /// Executed and failed, or matched ambiguously.
    #[display("failed")]
    Failed,
}

impl Outcome {
    /// All the [`Outcome`]s in the order they're summarized in.
    pub const SUMMARY_ORDER: [Self; 5] = [
        Self::Failed,
        Self::Skipped,
        Self::Pending,
        Self::Undefined,
        Self::Passed,
    ];

    /// Rolls up the given [`Outcome`]s into the worst one, being
    /// [`Outcome::Passed`] if there are none.
    #[must_use]
    pub fn worst(outcomes: impl IntoIterator<Item = Self>) -> Self {
        outcomes.into_iter().max().unwrap_or(Self::Passed)
    }
}

/// Result of a single [`Step`] or [`Hook`] as handed to a [`Reporter`].
///
/// [`Hook`]: crate::glue::Hook
/// [`Reporter`]: crate::Reporter
/// [`Step`]: gherkin::Step
#[derive(Clone, Debug)]
pub struct TestResult {
    /// [`Outcome`] of the unit.
    pub outcome: Outcome,

    /// Time spent executing the unit, if it was executed.
    pub duration: Option<Duration>,

    /// Captured [`Failure`], if any.
    pub error: Option<Failure>,
}

/// Marker payload of a panic signalling a [`Step`] or [`Hook`] isn't
/// implemented yet.
///
/// Raise it with the [`pending!`] macro.
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: gherkin::Step
/// [`pending!`]: crate::pending
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Pending {
    message: Option<String>,
}

impl Pending {
    /// Creates a new [`Pending`] marker with an optional `message`.
    #[must_use]
    pub fn new(message: Option<String>) -> Self {
        Self { message }
    }

    /// Returns the message of this [`Pending`] marker, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Unwinds the current [`Step`] or [`Hook`] with this marker as the
    /// payload.
    ///
    /// Uses [`panic::resume_unwind()`] so the panic hook isn't invoked.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    #[track_caller]
    pub fn raise(self) -> ! {
        panic::resume_unwind(Box::new(self))
    }
}

impl fmt::Display for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or("TODO: implement me"))
    }
}

/// Marks the current [`Step`] or [`Hook`] as pending.
///
/// ```rust,should_panic
/// # use cucumber_engine::pending;
/// pending!("waiting for the payments API");
/// ```
///
/// [`Hook`]: crate::glue::Hook
/// [`Step`]: gherkin::Step
#[macro_export]
macro_rules! pending {
    () => {{
        $crate::Pending::new(None).raise()
    }};
    ($msg:expr $(,)?) => {{
        $crate::Pending::new(Some(Into::<String>::into($msg))).raise()
    }};
    ($fmt:expr, $($arg:tt)*) => {{
        $crate::Pending::new(Some(format!($fmt, $($arg)*))).raise()
    }};
}

/// Predicate recognizing a concrete panic payload type.
type PayloadCheck = fn(&(dyn Any + Send)) -> bool;

fn payload_is<T: Any>(payload: &(dyn Any + Send)) -> bool {
    payload.is::<T>()
}

/// Classifier of captured panics into [`Outcome`]s.
///
/// The [`Pending`] marker is always classified as [`Outcome::Pending`].
/// Additional payload types and panic message prefixes may be registered to
/// be treated the same way.
#[derive(Clone, Debug)]
pub struct Classifier {
    /// Payload types treated as pending, along with their names.
    types: Vec<(&'static str, PayloadCheck)>,

    /// Panic message prefixes treated as pending.
    prefixes: Vec<String>,
}

impl Default for Classifier {
    /// Treats [`todo!`] and [`unimplemented!`] panics as pending.
    fn default() -> Self {
        Self::empty()
            .with_message_prefix("not yet implemented")
            .with_message_prefix("not implemented")
    }
}

impl Classifier {
    /// Creates a [`Classifier`] recognizing the [`Pending`] marker only.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            types: vec![(any::type_name::<Pending>(), payload_is::<Pending>)],
            prefixes: Vec::new(),
        }
    }

    /// Treats panics with a payload of type `T` as pending.
    #[must_use]
    pub fn with_type<T: Any>(mut self) -> Self {
        self.types.push((any::type_name::<T>(), payload_is::<T>));
        self
    }

    /// Treats panics whose message starts with `prefix` as pending.
    #[must_use]
    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Indicates whether the given panic payload denotes a pending unit.
    #[must_use]
    pub fn is_pending(&self, info: Option<&Info>) -> bool {
        let Some(info) = info else {
            return false;
        };
        let payload: &(dyn Any + Send) = &**info;
        if self.types.iter().any(|(_, is)| is(payload)) {
            return true;
        }
        if self.prefixes.is_empty() {
            return false;
        }
        let msg = info.to_readable_string();
        self.prefixes.iter().any(|p| msg.starts_with(p.as_str()))
    }

    /// Classifies the outcome of an executed unit by its panic payload.
    #[must_use]
    pub fn classify(&self, info: Option<&Info>) -> Outcome {
        match info {
            None => Outcome::Passed,
            Some(_) if self.is_pending(info) => Outcome::Pending,
            Some(_) => Outcome::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures::FutureExt as _;

    use super::*;

    fn caught(f: impl FnOnce() + panic::UnwindSafe) -> Info {
        Arc::from(panic::catch_unwind(f).unwrap_err())
    }

    #[derive(Debug)]
    struct AssumptionViolated;

    #[test]
    fn severity_order() {
        assert!(Outcome::Passed < Outcome::Skipped);
        assert!(Outcome::Skipped < Outcome::Undefined);
        assert!(Outcome::Undefined < Outcome::Pending);
        assert!(Outcome::Pending < Outcome::Failed);

        assert_eq!(Outcome::worst([]), Outcome::Passed);
        assert_eq!(
            Outcome::worst([Outcome::Skipped, Outcome::Undefined]),
            Outcome::Undefined,
        );
    }

    #[test]
    fn absence_of_error_is_passed() {
        let classifier = Classifier::default();

        assert_eq!(classifier.classify(None), Outcome::Passed);
        assert!(!classifier.is_pending(None));
    }

    #[test]
    fn pending_marker_is_pending() {
        let classifier = Classifier::empty();

        let info = caught(|| pending!());
        assert_eq!(classifier.classify(Some(&info)), Outcome::Pending);

        let info = caught(|| pending!("later, {}", 42));
        assert_eq!(classifier.classify(Some(&info)), Outcome::Pending);
        assert_eq!(info.to_readable_string(), "later, 42");
    }

    #[test]
    fn regular_panic_is_failed() {
        let info = caught(|| panic!("boom"));

        assert_eq!(Classifier::default().classify(Some(&info)), Outcome::Failed);
    }

    #[test]
    fn todo_and_unimplemented_are_pending_by_default() {
        let classifier = Classifier::default();

        let todo = caught(|| todo!());
        let unimpl = caught(|| unimplemented!("payments"));
        assert!(classifier.is_pending(Some(&todo)));
        assert!(classifier.is_pending(Some(&unimpl)));

        assert!(!Classifier::empty().is_pending(Some(&todo)));
    }

    #[test]
    fn registered_type_is_pending() {
        let info = caught(|| panic::resume_unwind(Box::new(AssumptionViolated)));

        assert!(!Classifier::empty().is_pending(Some(&info)));
        assert!(
            Classifier::empty()
                .with_type::<AssumptionViolated>()
                .is_pending(Some(&info)),
        );
    }

    #[test]
    fn catches_pending_from_futures() {
        let fut = async {
            if true {
                pending!()
            }
        };
        let info: Info = Arc::from(
            futures::executor::block_on(
                panic::AssertUnwindSafe(fut).catch_unwind(),
            )
            .unwrap_err(),
        );

        assert_eq!(Classifier::default().classify(Some(&info)), Outcome::Pending);
    }
}

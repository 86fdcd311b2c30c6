// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors captured while running [`Scenario`]s, and fatal [`Runtime`]
//! errors.
//!
//! [`Runtime`]: crate::Runtime
//! [`Scenario`]: gherkin::Scenario

use std::{any::Any, fmt, sync::Arc, time::Duration};

use derive_more::with_trait::{Display, Error};

use crate::{
    glue::HookType,
    outcome::Pending,
    step::{AmbiguousMatchError, DuplicateStepDefinitionError, Location},
};

/// Alias for a payload of a caught panic.
pub type Info = Arc<dyn Any + Send + 'static>;

/// Unit a [`Failure`] originates from.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum Origin {
    /// [`Step`] with the given text and definition [`Location`].
    ///
    /// [`Step`]: gherkin::Step
    #[display("step `{text}` ({location})")]
    Step {
        /// Keyword and text of the [`Step`].
        ///
        /// [`Step`]: gherkin::Step
        text: String,

        /// [`Location`] of the matched definition.
        location: Location,
    },

    /// [`Hook`] of the given type defined at the [`Location`].
    ///
    /// [`Hook`]: crate::glue::Hook
    #[display("{ty} hook ({location})")]
    Hook {
        /// Type of the [`Hook`].
        ///
        /// [`Hook`]: crate::glue::Hook
        ty: HookType,

        /// [`Location`] of the [`Hook`].
        ///
        /// [`Hook`]: crate::glue::Hook
        location: Location,
    },
}

/// Non-fatal error captured while running a [`Scenario`].
///
/// None of these abort the run, they're recorded into a [`RunResult`] instead.
///
/// [`RunResult`]: crate::RunResult
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug, Error)]
pub enum Failure {
    /// [`Step`] matched more than one definition.
    ///
    /// [`Step`]: gherkin::Step
    Ambiguous {
        /// Keyword and text of the [`Step`].
        ///
        /// [`Step`]: gherkin::Step
        step: String,

        /// Every matching candidate.
        #[error(source)]
        error: AmbiguousMatchError,
    },

    /// Matched [`Step`] function panicked.
    ///
    /// [`Step`]: gherkin::Step
    Step {
        /// Keyword and text of the [`Step`].
        ///
        /// [`Step`]: gherkin::Step
        step: String,

        /// [`Location`] of the matched definition.
        location: Location,

        /// Panic payload.
        info: Info,
    },

    /// [`Hook`] function panicked.
    ///
    /// [`Hook`]: crate::glue::Hook
    Hook {
        /// Type of the [`Hook`].
        ///
        /// [`Hook`]: crate::glue::Hook
        ty: HookType,

        /// [`Location`] of the [`Hook`].
        ///
        /// [`Hook`]: crate::glue::Hook
        location: Location,

        /// Panic payload.
        info: Info,
    },

    /// [`Step`] or [`Hook`] isn't implemented yet.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    Pending {
        /// Unit being pending.
        origin: Origin,

        /// Panic payload.
        info: Info,
    },

    /// [`Step`] or [`Hook`] exceeded its time bound.
    ///
    /// [`Hook`]: crate::glue::Hook
    /// [`Step`]: gherkin::Step
    Timeout {
        /// Unit being timed out.
        origin: Origin,

        /// Exceeded time bound.
        after: Duration,
    },

    /// [`World`] failed to be constructed.
    ///
    /// [`World`]: crate::World
    World {
        /// Rendered construction error.
        message: String,
    },
}

impl Failure {
    /// Indicates whether this [`Failure`] denotes a pending unit rather than
    /// an actual failure.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambiguous { step, error } => {
                write!(f, "Step `{step}` is ambiguous. {error}")
            }
            Self::Step {
                step,
                location,
                info,
            } => write!(
                f,
                "Step `{step}` ({location}) panicked: {}",
                info.to_readable_string(),
            ),
            Self::Hook { ty, location, info } => write!(
                f,
                "{ty} hook ({location}) panicked: {}",
                info.to_readable_string(),
            ),
            Self::Pending { origin, info } => {
                write!(f, "Pending {origin}: {}", info.to_readable_string())
            }
            Self::Timeout { origin, after } => write!(
                f,
                "Timed out {origin} after {}",
                humantime::format_duration(*after),
            ),
            Self::World { message } => {
                write!(f, "Failed to initialize World: {message}")
            }
        }
    }
}

/// Fatal error aborting a [`Runtime`] before any [`Scenario`] runs.
///
/// [`Runtime`]: crate::Runtime
/// [`Scenario`]: gherkin::Scenario
#[derive(Clone, Debug, Display, Error)]
pub enum RuntimeError {
    /// No [`Backend`] was provided.
    ///
    /// [`Backend`]: crate::Backend
    #[display(
        "No backends were registered, at least one is required to run \
         scenarios"
    )]
    NoBackends,

    /// [`Backend`] registered the same [`Step`] pattern twice.
    ///
    /// [`Backend`]: crate::Backend
    /// [`Step`]: gherkin::Step
    #[display("{_0}")]
    DuplicateStepDefinition(DuplicateStepDefinitionError),
}

impl From<DuplicateStepDefinitionError> for RuntimeError {
    fn from(err: DuplicateStepDefinitionError) -> Self {
        Self::DuplicateStepDefinition(err)
    }
}

/// Extension of a panic payload rendering it as a human-readable message.
pub trait PanicPayloadExt {
    /// Converts panic payload to a readable string.
    fn to_readable_string(&self) -> String;
}

impl PanicPayloadExt for Info {
    fn to_readable_string(&self) -> String {
        if let Some(s) = self.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = self.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(p) = self.downcast_ref::<Pending>() {
            p.to_string()
        } else {
            "Unknown panic payload".to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info<T: Any + Send>(v: T) -> Info {
        Arc::new(v)
    }

    #[test]
    fn renders_panic_payloads() {
        assert_eq!(info(String::from("owned")).to_readable_string(), "owned");
        assert_eq!(info("static").to_readable_string(), "static");
        assert_eq!(
            info(Pending::default()).to_readable_string(),
            "TODO: implement me",
        );
        assert_eq!(info(42_u8).to_readable_string(), "Unknown panic payload");
    }

    #[test]
    fn only_pending_is_pending() {
        let location = Location::new("steps.rs", 1, 1);
        let pending = Failure::Pending {
            origin: Origin::Hook {
                ty: HookType::Before,
                location,
            },
            info: info(Pending::default()),
        };
        let failed = Failure::Step {
            step: "Given foo".into(),
            location,
            info: info("boom"),
        };

        assert!(pending.is_pending());
        assert!(!failed.is_pending());
        assert_eq!(
            failed.to_string(),
            "Step `Given foo` (steps.rs:1:1) panicked: boom",
        );
        assert_eq!(
            pending.to_string(),
            "Pending Before hook (steps.rs:1:1): TODO: implement me",
        );
    }

    #[test]
    fn timeout_is_readable() {
        let err = Failure::Timeout {
            origin: Origin::Step {
                text: "When I wait".into(),
                location: Location::new("steps.rs", 3, 5),
            },
            after: Duration::from_millis(1500),
        };

        assert_eq!(
            err.to_string(),
            "Timed out step `When I wait` (steps.rs:3:5) after 1s 500ms",
        );
    }
}

// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Process exit status of a run.

use std::process::ExitCode;

use derive_more::with_trait::Display;

use crate::error::Failure;

/// Bit set of reasons a run should exit with a non-zero code.
#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq)]
#[display("{_0:#x}")]
pub struct ExitStatus(u8);

impl ExitStatus {
    /// Clean run.
    pub const SUCCESS: Self = Self(0x0);

    /// Run has errors, or undefined/pending [`Step`]s in strict mode.
    ///
    /// [`Step`]: gherkin::Step
    pub const ERRORS: Self = Self(0x1);

    /// Computes the [`ExitStatus`] of a run.
    ///
    /// [`ERRORS`] are set if any captured [`Failure`] isn't pending. In
    /// `strict` mode they're also set if there are undefined [`Step`]s, or
    /// if all the captured [`Failure`]s are pending ones.
    ///
    /// [`ERRORS`]: ExitStatus::ERRORS
    /// [`Step`]: gherkin::Step
    #[must_use]
    pub fn of(errors: &[Failure], has_undefined: bool, strict: bool) -> Self {
        let has_failures = errors.iter().any(|e| !e.is_pending());
        let has_pending = !errors.is_empty() && !has_failures;

        if has_failures || (strict && (has_undefined || has_pending)) {
            Self::ERRORS
        } else {
            Self::SUCCESS
        }
    }

    /// Indicates whether no bits are set.
    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Returns the raw bit set.
    #[must_use]
    pub const fn code(self) -> u8 {
        self.0
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        Self::from(status.code())
    }
}

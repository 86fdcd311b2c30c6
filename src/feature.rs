// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`gherkin::Feature`] extension and [`Scenario Outline`][1] expansion.
//!
//! [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline

use std::iter;

use lazy_regex::regex;
use once_cell::sync::Lazy;
use regex::Regex;
use sealed::sealed;

/// Helper methods to operate on [`gherkin::Feature`]s.
#[sealed]
pub trait Ext {
    /// Returns the path of the `.feature` file as a string, being empty for
    /// [`gherkin::Feature`]s parsed from memory.
    #[must_use]
    fn uri(&self) -> String;
}

#[sealed]
impl Ext for gherkin::Feature {
    fn uri(&self) -> String {
        self.path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Converts a `name` into an identifier segment: lower-cased, with whitespace
/// runs replaced by `-`.
#[must_use]
pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Formats a `path:line # Keyword: Name` designation of a [`Scenario`].
///
/// [`Scenario`]: gherkin::Scenario
#[must_use]
pub fn designation(uri: &str, scenario: &gherkin::Scenario) -> String {
    format!(
        "{uri}:{} # {}: {}",
        scenario.position.line, scenario.keyword, scenario.name,
    )
}

/// Instantiates an outline [`gherkin::Scenario`] for the `row` (0-based
/// among the data rows) of the given [`gherkin::Examples`].
///
/// Every `<name>` placeholder in the name, [`Step`] texts, doc strings and
/// tables is substituted by the value of the same-named column. Placeholders
/// without a column are left as is. The instance is positioned at the line of
/// its row and inherits the tags of the [`gherkin::Examples`].
///
/// Returns [`None`] if the [`gherkin::Examples`] have no such row.
///
/// [`Step`]: gherkin::Step
#[must_use]
pub fn expand_row(
    outline: &gherkin::Scenario,
    examples: &gherkin::Examples,
    row: usize,
) -> Option<gherkin::Scenario> {
    /// [`Regex`] matching placeholders [`Examples`] should expand into.
    ///
    /// [`Examples`]: gherkin::Examples
    static TEMPLATE_REGEX: &Lazy<Regex> = regex!(r"<([^>\s]+)>");

    let (header, values) = examples.table.as_ref()?.rows.split_first()?;
    let values = values.get(row)?;

    let replace_templates = |s: &str| {
        TEMPLATE_REGEX
            .replace_all(s, |cap: &regex::Captures<'_>| {
                let name = cap.get(1).map_or("", |m| m.as_str());
                header
                    .iter()
                    .zip(values)
                    .find_map(|(k, v)| (k == name).then(|| v.clone()))
                    .unwrap_or_else(|| cap[0].to_owned())
            })
            .into_owned()
    };

    let mut expanded = outline.clone();
    expanded.examples = Vec::new();
    expanded.position = examples.position;
    expanded.position.line += row + 2;
    expanded.tags.extend(examples.tags.iter().cloned());
    expanded.name = replace_templates(&expanded.name);
    for s in &mut expanded.steps {
        for value in iter::once(&mut s.value)
            .chain(s.docstring.iter_mut())
            .chain(
                s.table
                    .iter_mut()
                    .flat_map(|t| t.rows.iter_mut().flat_map(|r| r.iter_mut())),
            )
        {
            *value = replace_templates(value);
        }
    }
    Some(expanded)
}

/// Returns the number of data rows in the given [`gherkin::Examples`].
#[must_use]
pub fn rows_count(examples: &gherkin::Examples) -> usize {
    examples
        .table
        .as_ref()
        .map_or(0, |t| t.rows.len().saturating_sub(1))
}

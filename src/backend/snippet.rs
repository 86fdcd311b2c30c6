// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Skeleton code suggested for undefined [`Step`]s.
//!
//! [`Step`]: gherkin::Step

use std::{fmt::Write as _, str::FromStr};

use derive_more::with_trait::Display;
use inflector::Inflector as _;
use lazy_regex::regex;
use once_cell::sync::Lazy;
use regex::Regex;
use smart_default::SmartDefault;

/// Generator of function names for snippets out of [`Step`] patterns.
///
/// [`Step`]: gherkin::Step
pub trait FunctionNameGenerator {
    /// Generates a function name for the given [`Step`] `pattern`.
    ///
    /// [`Step`]: gherkin::Step
    fn generate(&self, pattern: &str) -> String;
}

/// Naming style of the generated snippet functions.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, SmartDefault)]
pub enum SnippetType {
    /// `i_have_cukes_in_my_belly`
    #[default]
    #[display("underscore")]
    Underscore,

    /// `iHaveCukesInMyBelly`
    #[display("camelcase")]
    CamelCase,
}

impl FromStr for SnippetType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "underscore" => Ok(Self::Underscore),
            "camelcase" => Ok(Self::CamelCase),
            _ => Err("possible options: underscore, camelcase"),
        }
    }
}

impl FunctionNameGenerator for SnippetType {
    fn generate(&self, pattern: &str) -> String {
        /// [`Regex`] matching capture groups and anchors of a pattern.
        static GROUPS: &Lazy<Regex> = regex!(r"\([^)]*\)|\^|\$");

        let sentence = GROUPS
            .replace_all(pattern, " ")
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let name = match self {
            Self::Underscore => sentence.to_snake_case(),
            Self::CamelCase => sentence.to_camel_case(),
        };
        if name.is_empty() {
            "step".to_owned()
        } else if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("_{name}")
        } else {
            name
        }
    }
}

/// Builds an anchored pattern matching the given [`Step`] text, turning
/// double-quoted strings and integers into capture groups.
///
/// [`Step`]: gherkin::Step
#[must_use]
pub fn pattern(text: &str) -> String {
    /// [`Regex`] matching parts of a [`Step`] text to become arguments.
    ///
    /// [`Step`]: gherkin::Step
    static ARGUMENTS: &Lazy<Regex> = regex!(r#""[^"]*"|\d+"#);

    let mut out = String::from("^");
    let mut last = 0;
    for m in ARGUMENTS.find_iter(text) {
        out.push_str(&regex::escape(&text[last..m.start()]));
        if m.as_str().starts_with('"') {
            out.push_str(r#""([^"]*)""#);
        } else {
            out.push_str(r"(\d+)");
        }
        last = m.end();
    }
    out.push_str(&regex::escape(&text[last..]));
    out.push('$');
    out
}

/// Renders a Rust [`Step`] function skeleton for the given [`gherkin::Step`].
///
/// [`Step`]: crate::step::Step
#[must_use]
pub fn rust_step(
    step: &gherkin::Step,
    names: &dyn FunctionNameGenerator,
) -> String {
    let pattern = pattern(&step.value);
    let name = names.generate(&pattern);
    let register = match step.ty {
        gherkin::StepType::Given => "given",
        gherkin::StepType::When => "when",
        gherkin::StepType::Then => "then",
    };
    let captures = Regex::new(&pattern).map_or(0, |re| re.captures_len() - 1);

    let mut out = String::new();
    _ = writeln!(
        out,
        "// steps.{register}(Regex::new(r#\"{pattern}\"#)?, {name});",
    );
    _ = writeln!(
        out,
        "fn {name}(world: &mut World, ctx: Context) \
         -> LocalBoxFuture<'_, ()> {{",
    );
    _ = writeln!(out, "    async move {{");
    for i in 1..=captures {
        _ = writeln!(out, "        let arg{i} = ctx.get({i});");
    }
    if step.docstring.is_some() {
        _ = writeln!(out, "        let docstring = ctx.docstring();");
    }
    if step.table.is_some() {
        _ = writeln!(out, "        let table = ctx.table();");
    }
    _ = writeln!(
        out,
        "        // Write code here that turns the phrase above into concrete \
         actions",
    );
    _ = writeln!(out, "        cucumber_engine::pending!()");
    _ = writeln!(out, "    }}");
    _ = writeln!(out, "    .boxed_local()");
    _ = write!(out, "}}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(keyword: &str, value: &str) -> gherkin::Step {
        gherkin::Step {
            keyword: keyword.into(),
            ty: gherkin::StepType::Given,
            value: value.into(),
            docstring: None,
            table: None,
            span: gherkin::Span { start: 0, end: 0 },
            position: gherkin::LineCol { line: 3, col: 5 },
        }
    }

    #[test]
    fn turns_literals_into_groups() {
        assert_eq!(
            pattern(r#"I have 42 cukes in "my" belly."#),
            r#"^I have (\d+) cukes in "([^"]*)" belly\.$"#,
        );
        assert_eq!(pattern("a (weird) [text]"), r"^a \(weird\) \[text\]$");

        let re = Regex::new(&pattern(r#"I have 42 cukes in "my" belly."#))
            .unwrap();
        assert!(re.is_match(r#"I have 7 cukes in "your" belly."#));
    }

    #[test]
    fn generates_names() {
        let pattern = r#"^I have (\d+) cukes in "([^"]*)" belly$"#;

        assert_eq!(
            SnippetType::Underscore.generate(pattern),
            "i_have_cukes_in_belly",
        );
        assert_eq!(
            SnippetType::CamelCase.generate(pattern),
            "iHaveCukesInBelly",
        );
        assert_eq!(SnippetType::Underscore.generate(r"^(\d+)$"), "step");
        assert!(SnippetType::Underscore.generate("^3 cukes$").starts_with("_3"));
    }

    #[test]
    fn parses_snippet_type() {
        assert_eq!("CamelCase".parse(), Ok(SnippetType::CamelCase));
        assert_eq!("underscore".parse(), Ok(SnippetType::Underscore));
        assert!("kebab".parse::<SnippetType>().is_err());
        assert_eq!(SnippetType::default().to_string(), "underscore");
    }

    #[test]
    fn renders_rust_skeleton() {
        let mut with_doc = step("Given ", r#"a "red" apple"#);
        with_doc.docstring = Some("text".into());

        let snippet = rust_step(&with_doc, &SnippetType::Underscore);

        assert!(snippet.starts_with(
            r##"// steps.given(Regex::new(r#"^a "([^"]*)" apple$"#)?, a_apple);"##,
        ));
        assert!(snippet.contains("let arg1 = ctx.get(1);"));
        assert!(snippet.contains("let docstring = ctx.docstring();"));
        assert!(!snippet.contains("ctx.table()"));
        assert!(snippet.contains("pending!()"));
    }

    #[test]
    fn skeleton_does_not_depend_on_literal_arguments() {
        let one = step("Given ", r#"I have 1 "red" cuke"#);
        let three = step("And ", r#"I have 3 "green" cuke"#);

        assert_eq!(
            rust_step(&one, &SnippetType::Underscore),
            rust_step(&three, &SnippetType::Underscore),
        );
    }
}

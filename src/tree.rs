// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tree of execution units built out of [`gherkin::Feature`]s.

use std::sync::Arc;

use itertools::Itertools as _;

use crate::feature::{self, Ext as _};

/// Single executable [`gherkin::Scenario`], either a plain one or an outline
/// row instance, along with everything it inherits.
#[derive(Clone, Debug)]
pub struct ScenarioUnit {
    /// [`gherkin::Feature`] this [`ScenarioUnit`] belongs to.
    pub feature: Arc<gherkin::Feature>,

    /// [`gherkin::Rule`] this [`ScenarioUnit`] belongs to, if any.
    pub rule: Option<Arc<gherkin::Rule>>,

    /// [`gherkin::Scenario`] to run, with outline placeholders substituted.
    pub scenario: Arc<gherkin::Scenario>,

    /// Effective tags: the [`gherkin::Feature`], [`gherkin::Rule`] and
    /// [`gherkin::Scenario`] ones, without duplicates.
    pub tags: Vec<String>,

    /// Unique id of this [`ScenarioUnit`].
    pub id: String,

    /// `path:line # Keyword: Name` designation of this [`ScenarioUnit`].
    pub designation: String,
}

impl ScenarioUnit {
    fn new(
        feature: &Arc<gherkin::Feature>,
        rule: Option<&Arc<gherkin::Rule>>,
        scenario: gherkin::Scenario,
        id: String,
    ) -> Self {
        let tags = feature
            .tags
            .iter()
            .chain(rule.iter().flat_map(|r| &r.tags))
            .chain(&scenario.tags)
            .unique()
            .cloned()
            .collect();
        Self {
            designation: feature::designation(&feature.uri(), &scenario),
            feature: Arc::clone(feature),
            rule: rule.cloned(),
            scenario: Arc::new(scenario),
            tags,
            id,
        }
    }

    /// Iterates over the [`gherkin::Background`]s applying to this
    /// [`ScenarioUnit`], the [`gherkin::Feature`] one going first.
    pub fn backgrounds(&self) -> impl Iterator<Item = &gherkin::Background> {
        self.feature
            .background
            .iter()
            .chain(self.rule.iter().filter_map(|r| r.background.as_ref()))
    }

    /// Returns the own [`gherkin::Step`]s of this [`ScenarioUnit`].
    #[must_use]
    pub fn steps(&self) -> &[gherkin::Step] {
        &self.scenario.steps
    }
}

/// Node of the execution tree.
#[derive(Clone, Debug)]
pub enum Node {
    /// [`gherkin::Feature`] with its [`Node`]s.
    Feature {
        /// [`gherkin::Feature`] itself.
        feature: Arc<gherkin::Feature>,

        /// [`Node::Rule`]s, [`Node::Outline`]s and [`Node::Scenario`]s in
        /// source order.
        children: Vec<Node>,
    },

    /// [`gherkin::Rule`] with its [`Node`]s.
    Rule {
        /// [`gherkin::Rule`] itself.
        rule: Arc<gherkin::Rule>,

        /// [`Node::Outline`]s and [`Node::Scenario`]s.
        children: Vec<Node>,
    },

    /// [`Scenario Outline`][1] template with its [`Node::Examples`].
    ///
    /// [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline
    Outline {
        /// Template [`gherkin::Scenario`].
        outline: Arc<gherkin::Scenario>,

        /// [`Node::Examples`] of the template.
        children: Vec<Node>,
    },

    /// [`gherkin::Examples`] block with a [`Node::Scenario`] per row.
    Examples {
        /// [`gherkin::Examples`] itself.
        examples: Arc<gherkin::Examples>,

        /// [`Node::Scenario`] per data row.
        children: Vec<Node>,
    },

    /// Single executable [`ScenarioUnit`].
    Scenario(ScenarioUnit),
}

impl Node {
    /// Builds [`Node::Feature`]s out of the given `features`, keeping only
    /// [`ScenarioUnit`]s satisfying the `filter`.
    ///
    /// Nodes left without [`ScenarioUnit`]s are dropped.
    pub fn build<F>(
        features: impl IntoIterator<Item = gherkin::Feature>,
        filter: F,
    ) -> Vec<Self>
    where
        F: Fn(&ScenarioUnit) -> bool,
    {
        features
            .into_iter()
            .filter_map(|f| {
                let feature = Arc::new(f);
                let fslug = feature::slug(&feature.name);

                let mut children = feature
                    .scenarios
                    .iter()
                    .filter_map(|s| {
                        scenario_node(&feature, None, s, &fslug, &filter)
                    })
                    .collect::<Vec<_>>();
                for r in &feature.rules {
                    let rule = Arc::new(r.clone());
                    let rule_children = rule
                        .scenarios
                        .iter()
                        .filter_map(|s| {
                            scenario_node(
                                &feature,
                                Some(&rule),
                                s,
                                &fslug,
                                &filter,
                            )
                        })
                        .collect::<Vec<_>>();
                    if !rule_children.is_empty() {
                        children.push(Self::Rule {
                            rule,
                            children: rule_children,
                        });
                    }
                }

                (!children.is_empty()).then_some(Self::Feature {
                    feature,
                    children,
                })
            })
            .collect()
    }

    /// Returns the child [`Node`]s of this one.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Feature { children, .. }
            | Self::Rule { children, .. }
            | Self::Outline { children, .. }
            | Self::Examples { children, .. } => children,
            Self::Scenario(_) => &[],
        }
    }

    /// Collects all the [`ScenarioUnit`]s of this [`Node`] in execution
    /// order.
    #[must_use]
    pub fn scenarios(&self) -> Vec<&ScenarioUnit> {
        match self {
            Self::Scenario(unit) => vec![unit],
            _ => self.children().iter().flat_map(Self::scenarios).collect(),
        }
    }
}

/// Builds a [`Node`] out of a [`gherkin::Scenario`], expanding it if it's an
/// outline.
fn scenario_node<F>(
    feature: &Arc<gherkin::Feature>,
    rule: Option<&Arc<gherkin::Rule>>,
    scenario: &gherkin::Scenario,
    fslug: &str,
    filter: &F,
) -> Option<Node>
where
    F: Fn(&ScenarioUnit) -> bool,
{
    let sid = format!("{fslug};{}", feature::slug(&scenario.name));

    if scenario.examples.is_empty() {
        let unit = ScenarioUnit::new(feature, rule, scenario.clone(), sid);
        return filter(&unit).then_some(Node::Scenario(unit));
    }

    let children = scenario
        .examples
        .iter()
        .enumerate()
        .filter_map(|(n, ex)| {
            let rows = (0..feature::rows_count(ex))
                .filter_map(|row| {
                    let expanded = feature::expand_row(scenario, ex, row)?;
                    let id = format!("{sid};examples-{};{}", n + 1, row + 2);
                    let unit = ScenarioUnit::new(feature, rule, expanded, id);
                    filter(&unit).then_some(Node::Scenario(unit))
                })
                .collect::<Vec<_>>();
            (!rows.is_empty()).then(|| Node::Examples {
                examples: Arc::new(ex.clone()),
                children: rows,
            })
        })
        .collect::<Vec<_>>();

    (!children.is_empty()).then(|| Node::Outline {
        outline: Arc::new(scenario.clone()),
        children,
    })
}

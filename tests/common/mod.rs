#![allow(dead_code)] // not every test binary uses every helper

use std::{cell::RefCell, convert::Infallible, time::Duration};

use cucumber_engine::{
    event::Match, gherkin::GherkinEnv, glue::HookDefinition, pending,
    step::Context, stopwatch::Clock, Backend, Config, Formatter, Reporter,
    Runtime, ScenarioResult, Steps, TestResult, World,
};
use futures::{future::LocalBoxFuture, FutureExt as _};
use regex::Regex;

thread_local! {
    static JOURNAL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Appends an entry to the journal of the current thread.
pub fn note(entry: impl Into<String>) {
    JOURNAL.with(|j| j.borrow_mut().push(entry.into()));
}

/// Takes all the journal entries of the current thread.
pub fn journal() -> Vec<String> {
    JOURNAL.with(|j| j.take())
}

#[derive(Debug, Default)]
pub struct Belly {
    pub cukes: usize,
}

impl World for Belly {
    type Error = Infallible;

    async fn new() -> Result<Self, Infallible> {
        Ok(Self::default())
    }
}

pub fn feature(src: &str) -> cucumber_engine::gherkin::Feature {
    cucumber_engine::gherkin::Feature::parse(src, GherkinEnv::default())
        .unwrap()
}

pub fn config() -> Config {
    Config {
        clock: Clock::Fixed(Duration::from_millis(10)),
        ..Config::default()
    }
}

pub fn runtime(steps: Steps<Belly>, config: Config) -> Runtime<Belly> {
    Runtime::new(vec![Box::new(steps) as Box<dyn Backend<Belly>>], config)
        .unwrap()
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn number(ctx: &Context) -> usize {
    ctx.get(1).unwrap().parse().unwrap()
}

fn have(belly: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        belly.cukes = number(&ctx);
        note(format!("have {}", belly.cukes));
    }
    .boxed_local()
}

fn eat(belly: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        belly.cukes += number(&ctx);
        note(format!("eat {}", number(&ctx)));
    }
    .boxed_local()
}

fn should_have(belly: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note("check");
        assert_eq!(belly.cukes, number(&ctx), "wrong number of cukes");
    }
    .boxed_local()
}

fn explode(_: &mut Belly, _: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note("explode");
        panic!("boom");
    }
    .boxed_local()
}

fn not_ready(_: &mut Belly, _: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note("not ready");
        pending!("later");
    }
    .boxed_local()
}

fn not_done(_: &mut Belly, _: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note("not done");
        todo!();
    }
    .boxed_local()
}

fn doze(_: &mut Belly, _: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note("doze");
        tokio::time::sleep(Duration::from_secs(30)).await;
        note("woke up");
    }
    .boxed_local()
}

fn thing(_: &mut Belly, ctx: Context) -> LocalBoxFuture<'_, ()> {
    async move {
        note(format!("thing {}", ctx.get(1).unwrap_or_default()));
    }
    .boxed_local()
}

/// Step definitions shared by the tests.
pub fn steps() -> Steps<Belly> {
    Steps::new()
        .given(re(r"^I have (\d+) cukes in my belly$"), have)
        .when(re(r"^I eat (\d+) cukes$"), eat)
        .then(re(r"^I should have (\d+) cukes$"), should_have)
        .step(re("^it explodes$"), explode)
        .step(re("^it is not ready$"), not_ready)
        .step(re("^it is not done$"), not_done)
        .step(re("^it dozes off$"), doze)
        .step(re(r"^an? (\w+) thing$"), thing)
        .step(re("^an ambiguous thing$"), thing)
}

pub fn before_early<'a>(
    _: &'a mut Belly,
    _: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async { note("before early") }.boxed_local()
}

pub fn before_late<'a>(
    _: &'a mut Belly,
    _: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async { note("before late") }.boxed_local()
}

pub fn before_failing<'a>(
    _: &'a mut Belly,
    _: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async {
        note("before failing");
        panic!("no table free");
    }
    .boxed_local()
}

pub fn before_dozing<'a>(
    _: &'a mut Belly,
    _: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async {
        note("before dozing");
        tokio::time::sleep(Duration::from_secs(30)).await;
        note("before woke up");
    }
    .boxed_local()
}

pub fn before_pending<'a>(
    _: &'a mut Belly,
    _: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async {
        note("before pending");
        pending!("no table booked yet");
    }
    .boxed_local()
}

pub fn after_early<'a>(
    _: &'a mut Belly,
    s: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async move { note(format!("after early {}", s.status())) }.boxed_local()
}

pub fn after_late<'a>(
    _: &'a mut Belly,
    s: &'a ScenarioResult,
) -> LocalBoxFuture<'a, ()> {
    async move { note(format!("after late {}", s.status())) }.boxed_local()
}

/// [`Steps`] with ordered hooks registered in reverse.
pub fn hooked_steps() -> Steps<Belly> {
    steps()
        .before(HookDefinition::new(before_late).order(5))
        .before(HookDefinition::new(before_early).order(1))
        .after(HookDefinition::new(after_late).order(5))
        .after(HookDefinition::new(after_early).order(1))
        .on_build(|_| note("build"))
        .on_dispose(|_| note("dispose"))
}

/// [`Formatter`] recording the structure it's told about.
#[derive(Debug, Default)]
pub struct Structure(pub Vec<String>);

impl Formatter for Structure {
    fn uri(&mut self, uri: &str) {
        self.0.push(format!("uri {uri}"));
    }

    fn feature(&mut self, feature: &cucumber_engine::gherkin::Feature) {
        self.0.push(format!("feature {}", feature.name));
    }

    fn rule(&mut self, rule: &cucumber_engine::gherkin::Rule) {
        self.0.push(format!("rule {}", rule.name));
    }

    fn start_of_scenario_lifecycle(
        &mut self,
        scenario: &cucumber_engine::gherkin::Scenario,
    ) {
        self.0.push(format!("start {}", scenario.name));
    }

    fn background(&mut self, _: &cucumber_engine::gherkin::Background) {
        self.0.push("background".into());
    }

    fn scenario_outline(
        &mut self,
        outline: &cucumber_engine::gherkin::Scenario,
    ) {
        self.0.push(format!("outline {}", outline.name));
    }

    fn examples(&mut self, _: &cucumber_engine::gherkin::Examples) {
        self.0.push("examples".into());
    }

    fn scenario(&mut self, scenario: &cucumber_engine::gherkin::Scenario) {
        self.0.push(format!("scenario {}", scenario.name));
    }

    fn step(&mut self, step: &cucumber_engine::gherkin::Step) {
        self.0.push(format!("step {}", step.value));
    }

    fn end_of_scenario_lifecycle(
        &mut self,
        scenario: &cucumber_engine::gherkin::Scenario,
    ) {
        self.0.push(format!("end {}", scenario.name));
    }

    fn eof(&mut self) {
        self.0.push("eof".into());
    }

    fn done(&mut self) {
        self.0.push("done".into());
    }

    fn close(&mut self) {
        self.0.push("close".into());
    }
}

/// [`Reporter`] recording every result it receives.
#[derive(Debug, Default)]
pub struct Results {
    pub definitions: Vec<String>,
    pub events: Vec<String>,
}

impl Reporter for Results {
    fn step_definition(
        &mut self,
        _: cucumber_engine::step::Location,
        pattern: &str,
    ) {
        self.definitions.push(pattern.into());
    }

    fn before(&mut self, _: &Match, result: &TestResult) {
        self.events.push(format!("before {}", result.outcome));
    }

    fn step_match(&mut self, step: &Match) {
        self.events.push(match step {
            Match::Definition { arguments, .. } => format!(
                "match {}",
                arguments
                    .iter()
                    .filter_map(|a| a.value.as_deref())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            Match::Undefined => "match undefined".into(),
        });
    }

    fn result(&mut self, result: &TestResult) {
        self.events.push(format!("result {}", result.outcome));
    }

    fn after(&mut self, _: &Match, result: &TestResult) {
        self.events.push(format!("after {}", result.outcome));
    }
}

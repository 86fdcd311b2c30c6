mod common;

use cucumber_engine::{
    event::Discard,
    glue::HookType,
    runtime::{Listeners, Progress, Unit},
    summary::NullSummaryPrinter,
    ExitStatus, Outcome, RunResult, ScenarioUnit, UndefinedStepsTracker,
};
use futures::StreamExt as _;

use self::common::{config, feature, hooked_steps, journal, runtime};

const LUNCH: &str = "\
Feature: Belly
  Background:
    Given I have 2 cukes in my belly

  Scenario: lunch
    When I eat 3 cukes
    Then I should have 4 cukes
";

fn describe(progress: &Progress) -> String {
    let unit = match &progress.unit {
        Unit::Hook(HookType::Before, _) => "before".to_owned(),
        Unit::Hook(HookType::After, _) => "after".to_owned(),
        Unit::Step(step) => step.value.clone(),
        Unit::Scenario => "scenario".to_owned(),
    };
    format!("{unit}: {}", progress.outcome)
}

fn lunch() -> ScenarioUnit {
    let runtime = runtime(hooked_steps(), config());
    runtime.scenarios([feature(LUNCH)])[0].scenarios()[0].clone()
}

#[tokio::test]
async fn advances_one_unit_at_a_time() {
    let runtime = runtime(hooked_steps(), config());
    let unit = lunch();
    let (mut formatter, mut reporter) = (Discard, Discard);
    let mut tracker = UndefinedStepsTracker::new();

    let mut executor = runtime.scenario(
        &unit,
        Listeners::new(&mut formatter, &mut reporter, &mut tracker),
    );
    assert_eq!(executor.unit().id, "belly;lunch");

    let mut seen = Vec::new();
    let mut last = None;
    while let Some(progress) = executor.advance().await {
        seen.push(describe(&progress));
        last = Some(progress.result);
    }
    assert!(executor.advance().await.is_none());
    assert!(executor.recorder().is_failed());
    drop(executor);

    assert_eq!(
        seen,
        [
            "before: passed",
            "before: passed",
            "I have 2 cukes in my belly: passed",
            "I eat 3 cukes: passed",
            "I should have 4 cukes: failed",
            "after: passed",
            "after: passed",
            "scenario: failed",
        ],
    );
    assert_eq!(
        journal(),
        [
            "build",
            "before early",
            "before late",
            "have 2",
            "eat 3",
            "check",
            "after early failed",
            "after late failed",
            "dispose",
        ],
    );

    let result = last.unwrap_or(RunResult::IDENTITY);
    assert_eq!(result.stats.scenarios.failed, 1);
    assert_eq!(result.stats.steps.passed, 2);
    assert_eq!(result.errors.len(), 1);

    let status = runtime.finish(&result, &tracker, &mut NullSummaryPrinter);
    assert_eq!(status, ExitStatus::ERRORS);
}

#[tokio::test]
async fn streams_progress() {
    let runtime = runtime(hooked_steps(), config());
    let unit = lunch();
    let (mut formatter, mut reporter) = (Discard, Discard);
    let mut tracker = UndefinedStepsTracker::new();

    let progress = runtime
        .scenario(
            &unit,
            Listeners::new(&mut formatter, &mut reporter, &mut tracker),
        )
        .into_stream()
        .collect::<Vec<_>>()
        .await;

    assert_eq!(progress.len(), 8);
    assert!(matches!(progress[0].unit, Unit::Hook(HookType::Before, _)));
    let last = &progress[7];
    assert!(matches!(last.unit, Unit::Scenario));
    assert_eq!(last.outcome, Outcome::Failed);
    assert_eq!(last.result.stats.duration.as_millis(), 70);
    assert_eq!(journal().last().map(String::as_str), Some("dispose"));
}

#[tokio::test]
async fn dropping_unfinished_executor_disposes_world() {
    let runtime = runtime(hooked_steps(), config());
    let unit = lunch();
    let (mut formatter, mut reporter) = (Discard, Discard);
    let mut tracker = UndefinedStepsTracker::new();

    let mut executor = runtime.scenario(
        &unit,
        Listeners::new(&mut formatter, &mut reporter, &mut tracker),
    );
    let first = executor.advance().await.map(|p| describe(&p));
    drop(executor);

    assert_eq!(first.as_deref(), Some("before: passed"));
    assert_eq!(journal(), ["build", "before early", "dispose"]);
}

#[tokio::test]
async fn never_started_executor_builds_nothing() {
    let runtime = runtime(hooked_steps(), config());
    let unit = lunch();
    let (mut formatter, mut reporter) = (Discard, Discard);
    let mut tracker = UndefinedStepsTracker::new();

    drop(runtime.scenario(
        &unit,
        Listeners::new(&mut formatter, &mut reporter, &mut tracker),
    ));

    assert!(journal().is_empty());
}

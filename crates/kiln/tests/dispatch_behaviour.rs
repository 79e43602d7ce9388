//! Behaviour-driven tests for command selection and argument binding.

use std::str::FromStr;

use kiln::{Arguments, CommandDescriptor, HandlerError, Outcome, Registry, RunError, Value};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// A quoted string value from a Gherkin feature file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QuotedString(String);

impl FromStr for QuotedString {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim_matches('"').to_owned()))
    }
}

impl QuotedString {
    fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Default)]
struct TestWorld {
    registry: Option<Registry<(), String>>,
    outcome: Option<Result<Outcome<String>, RunError>>,
}

impl TestWorld {
    fn outcome(&self) -> &Result<Outcome<String>, RunError> {
        self.outcome.as_ref().expect("command line should have run")
    }
}

#[fixture]
fn world() -> TestWorld {
    TestWorld::default()
}

fn joined(values: &[Value]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn value(args: &Arguments<'_>, name: &str) -> String {
    args.get(name).map(ToString::to_string).unwrap_or_default()
}

fn sample_registry() -> Result<Registry<(), String>, kiln::RegistryError> {
    let mut registry: Registry<(), String> = Registry::new();

    let triple = CommandDescriptor::builder("triple")
        .required("a")
        .required("b")
        .required("c")
        .build()?;
    registry.register(triple, |_, args| -> Result<String, HandlerError> {
        Ok(["a", "b", "c"].map(|name| value(args, name)).join(","))
    })?;

    let options = CommandDescriptor::builder("options")
        .keyword("alfa", "1")
        .keyword("bravo", "2")
        .keyword("charlie", false)
        .short("alfa", 'a')
        .short("bravo", 'b')
        .short("charlie", 'c')
        .build()?;
    registry.register(options, |_, args| -> Result<String, HandlerError> {
        Ok(format!(
            "alfa={} bravo={} charlie={}",
            value(args, "alfa"),
            value(args, "bravo"),
            value(args, "charlie")
        ))
    })?;

    let mixed = CommandDescriptor::builder("mixed")
        .required("a")
        .keyword("b", 0)
        .short("b", 'b')
        .variadic("rest")
        .build()?;
    registry.register(mixed, |_, args| -> Result<String, HandlerError> {
        Ok(format!(
            "a={} b={} rest={}",
            value(args, "a"),
            value(args, "b"),
            joined(args.rest())
        ))
    })?;

    let echo = CommandDescriptor::builder("echo").variadic("words").build()?;
    registry.register_default(echo, |_, args| -> Result<String, HandlerError> {
        Ok(joined(args.rest()))
    })?;

    Ok(registry)
}

#[given("a registry with the sample commands")]
fn given_sample_registry(world: &mut TestWorld) {
    world.registry = Some(sample_registry().expect("sample registry should build"));
}

#[when("the command line {line} is run")]
fn when_command_line_runs(world: &mut TestWorld, line: QuotedString) {
    let registry = world.registry.as_ref().expect("registry should be set");
    let argv: Vec<&str> = line.as_str().split_whitespace().collect();
    world.outcome = Some(registry.run(&mut (), argv));
}

#[then("the command returns {expected}")]
fn then_command_returns(world: &mut TestWorld, expected: QuotedString) {
    match world.outcome() {
        Ok(Outcome::Applied(result)) => assert_eq!(result, expected.as_str()),
        other => panic!("expected a command result, got {other:?}"),
    }
}

#[then("help is shown for {command}")]
fn then_command_help(world: &mut TestWorld, command: QuotedString) {
    match world.outcome() {
        Ok(Outcome::CommandHelp(name)) => assert_eq!(name, command.as_str()),
        other => panic!("expected command help, got {other:?}"),
    }
}

#[then("the overview is shown")]
fn then_top_help(world: &mut TestWorld) {
    assert!(
        matches!(world.outcome(), Ok(Outcome::TopHelp)),
        "expected the overview, got {:?}",
        world.outcome()
    );
}

#[then("the run fails with {kind} for {command}")]
fn then_run_fails(world: &mut TestWorld, kind: QuotedString, command: QuotedString) {
    let Err(RunError::Command(error)) = world.outcome() else {
        panic!("expected a command error, got {:?}", world.outcome());
    };
    assert_eq!(format!("{:?}", error.kind()), kind.as_str());
    assert_eq!(error.command(), Some(command.as_str()));
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Bare tokens bind to required parameters in order"
)]
fn bare_tokens_bind_in_order(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Short option clusters set flags and take values"
)]
fn short_option_clusters(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Keyword slots keep their defaults when a tail is declared"
)]
fn keyword_slots_keep_defaults_with_a_tail(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Named values win over the tail"
)]
fn named_values_win_over_the_tail(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Unmatched first tokens go to the default command"
)]
fn unmatched_tokens_go_to_the_default(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "No arguments run the default command"
)]
fn no_arguments_run_the_default(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "The help word selects command help"
)]
fn help_word_selects_command_help(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "A help flag after the command name selects command help"
)]
fn trailing_help_flag_selects_command_help(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "A leading help flag selects the overview"
)]
fn leading_help_flag_selects_the_overview(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Missing required arguments are reported"
)]
fn missing_required_arguments(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Surplus arguments are reported"
)]
fn surplus_arguments(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Undeclared options are reported"
)]
fn undeclared_options(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Option values must match the default type"
)]
fn option_values_match_the_default_type(world: TestWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/dispatch.feature",
    name = "Only one end-of-options marker is honoured"
)]
fn single_end_of_options_marker(world: TestWorld) {
    let _ = world;
}

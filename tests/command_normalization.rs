mod common;

use crate::common::init_tracing;

use std::error::Error;

use fleetrun::exec::{ExecutionContext, command_from_args, normalize, run};
use proptest::prelude::*;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn argv_form_and_prequoted_string_behave_identically() -> TestResult {
    init_tracing();

    let from_argv = command_from_args(&["echo".to_string(), "a b".to_string()]);
    let prequoted = "echo 'a b'".to_string();

    let r1 = run(&ExecutionContext::Local, &from_argv, None, None).await?;
    let r2 = run(&ExecutionContext::Local, &prequoted, None, None).await?;
    assert_eq!(r1.stdout, "a b\n");
    assert_eq!(r1, r2);
    Ok(())
}

#[tokio::test]
async fn pipe_tokens_compose_in_the_shell() -> TestResult {
    init_tracing();

    let cmd = normalize(&["echo", "hi", "|", "tr", "a-z", "A-Z"]);
    let result = run(&ExecutionContext::Local, &cmd, None, None).await?;
    assert_eq!(result.stdout, "HI\n");
    Ok(())
}

#[tokio::test]
async fn numbered_redirection_tokens_compose_in_the_shell() -> TestResult {
    init_tracing();

    let cmd = normalize(&["echo", "hi", "1>", "/dev/null"]);
    let result = run(&ExecutionContext::Local, &cmd, None, None).await?;
    assert_eq!(result.stdout, "");
    assert_eq!(result.exit_code, 0);
    Ok(())
}

proptest! {
    /// Plain tokens survive a normalize -> shell-split round trip.
    #[test]
    fn normalized_plain_argv_splits_back(
        args in proptest::collection::vec("[A-Za-z0-9_./-]{1,12}", 1..6)
    ) {
        let normalized = normalize(&args);
        let split = shell_words::split(&normalized).expect("normalized command must parse");
        prop_assert_eq!(split, args);
    }

    /// Normalizing is stable: quoting tokens with spaces still yields a
    /// string the shell splits back to the original argv.
    #[test]
    fn normalized_spaced_argv_splits_back(
        args in proptest::collection::vec("[A-Za-z0-9_. -]{1,12}", 1..6)
    ) {
        let normalized = normalize(&args);
        let split = shell_words::split(&normalized).expect("normalized command must parse");
        let expected: Vec<String> = args;
        prop_assert_eq!(split, expected);
    }
}

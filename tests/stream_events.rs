mod common;

use crate::common::init_tracing;

use std::error::Error;

use fleetrun::exec::{
    EventSink, ExecutionContext, FileSink, MemorySink, PrefixSink, StreamEvent, drain, run,
    run_stream,
};

type TestResult = Result<(), Box<dyn Error>>;

async fn collect_events(command: &str, input: Option<&str>) -> Vec<StreamEvent> {
    let mut stream = run_stream(&ExecutionContext::Local, command, input.map(str::to_string))
        .await
        .expect("spawn failed");
    let mut events = Vec::new();
    while let Some(event) = stream.next_event().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn stdout_lines_arrive_in_order_with_exit_last() -> TestResult {
    init_tracing();

    let events = collect_events("printf 'a\\nb\\nc\\n'", None).await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Stdout("a\n".to_string()),
            StreamEvent::Stdout("b\n".to_string()),
            StreamEvent::Stdout("c\n".to_string()),
            StreamEvent::Exit(0),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn stdout_and_stderr_are_demultiplexed() -> TestResult {
    init_tracing();

    // Sleeps force a deterministic interleaving so the full sequence can
    // be asserted; without them only per-stream order would be guaranteed.
    let script = "
    echo to stdout
    sleep 1
    echo to stderr 1>&2
    sleep 1
    echo hello world
    exit 1
    ";
    let events = collect_events("sh", Some(script)).await;
    assert_eq!(
        events,
        vec![
            StreamEvent::Stdout("to stdout\n".to_string()),
            StreamEvent::Stderr("to stderr\n".to_string()),
            StreamEvent::Stdout("hello world\n".to_string()),
            StreamEvent::Exit(1),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn per_stream_order_is_preserved() -> TestResult {
    init_tracing();

    let script = "
    echo out1
    echo err1 1>&2
    echo out2
    echo err2 1>&2
    echo out3
    ";
    let events = collect_events("sh", Some(script)).await;

    let stdout: Vec<&StreamEvent> = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Stdout(_)))
        .collect();
    let stderr: Vec<&StreamEvent> = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Stderr(_)))
        .collect();

    assert_eq!(
        stdout,
        vec![
            &StreamEvent::Stdout("out1\n".to_string()),
            &StreamEvent::Stdout("out2\n".to_string()),
            &StreamEvent::Stdout("out3\n".to_string()),
        ]
    );
    assert_eq!(
        stderr,
        vec![
            &StreamEvent::Stderr("err1\n".to_string()),
            &StreamEvent::Stderr("err2\n".to_string()),
        ]
    );
    // Exactly one exit event, and it is last.
    assert_eq!(events.last(), Some(&StreamEvent::Exit(0)));
    let exits = events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Exit(_)))
        .count();
    assert_eq!(exits, 1);
    Ok(())
}

#[tokio::test]
async fn input_script_reaches_stdin_and_gets_eof() -> TestResult {
    init_tracing();

    // `cat` only terminates when stdin is closed after the script is
    // written.
    let result = run(
        &ExecutionContext::Local,
        "cat",
        Some("hello world\naaa".to_string()),
        None,
    )
    .await?;
    assert_eq!(result.stdout, "hello world\naaa");
    assert_eq!(result.exit_code, 0);
    Ok(())
}

#[tokio::test]
async fn drain_dispatches_to_sinks() -> TestResult {
    init_tracing();

    let script = "
    echo to stdout
    echo to stderr 1>&2
    echo hello world
    exit 1
    ";
    let mut stream = run_stream(&ExecutionContext::Local, "sh", Some(script.to_string())).await?;

    let mut mem = MemorySink::new();
    let exit = {
        let mut sinks: [&mut dyn EventSink; 1] = [&mut mem];
        drain(&mut stream, &mut sinks).await
    };

    assert_eq!(exit, Some(1));
    assert_eq!(mem.stdout(), "to stdout\nhello world\n");
    assert_eq!(mem.stderr(), "to stderr\n");
    assert_eq!(mem.exit_code(), Some(1));
    Ok(())
}

#[tokio::test]
async fn prefix_sink_annotates_every_line() -> TestResult {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    init_tracing();

    #[derive(Clone)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = Buffer(Arc::new(Mutex::new(Vec::new())));
    let writer: fleetrun::exec::sink::SharedWriter =
        Arc::new(Mutex::new(Box::new(buffer.clone())));

    let script = "
    echo to stdout
    echo to stderr 1>&2
    exit 3
    ";
    let mut stream = run_stream(&ExecutionContext::Local, "sh", Some(script.to_string())).await?;
    let mut prefix = PrefixSink::new("node1", writer);
    {
        let mut sinks: [&mut dyn EventSink; 1] = [&mut prefix];
        drain(&mut stream, &mut sinks).await;
    }

    let bytes = buffer.0.lock().unwrap().clone();
    let text = String::from_utf8(bytes)?;
    let mut lines: Vec<&str> = text.lines().collect();
    // Cross-stream interleaving is unspecified; compare sorted.
    assert_eq!(*lines.last().unwrap(), "node1 EXIT CODE | 3");
    lines.sort_unstable();
    assert_eq!(
        lines,
        vec![
            "node1 EXIT CODE | 3",
            "node1 STDERR | to stderr",
            "node1 STDOUT | to stdout",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn file_sink_persists_raw_streams() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let script = "
    echo to stdout
    echo to stderr 1>&2
    echo hello world
    exit 1
    ";
    let mut stream = run_stream(&ExecutionContext::Local, "sh", Some(script.to_string())).await?;
    let mut files = FileSink::create(dir.path(), "node1")?;
    {
        let mut sinks: [&mut dyn EventSink; 1] = [&mut files];
        drain(&mut stream, &mut sinks).await;
    }

    let stdout = std::fs::read_to_string(dir.path().join("node1.stdout"))?;
    let stderr = std::fs::read_to_string(dir.path().join("node1.stderr"))?;
    let exitcode = std::fs::read_to_string(dir.path().join("node1.exitcode"))?;
    assert_eq!(stdout, "to stdout\nhello world\n");
    assert_eq!(stderr, "to stderr\n");
    assert_eq!(exitcode.trim(), "1");
    Ok(())
}

#[tokio::test]
async fn exit_code_of_failing_command_is_captured() -> TestResult {
    init_tracing();

    let result = run(&ExecutionContext::Local, "exit 7", None, None).await?;
    assert_eq!(result.exit_code, 7);
    assert!(!result.success());
    Ok(())
}

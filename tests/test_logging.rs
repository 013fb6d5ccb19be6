use gym_stats::logging;

#[test]
fn log_dir_receives_separator_and_events() -> anyhow::Result<()> {
    let test_dir = tempfile::tempdir()?;
    let log_dir = test_dir.path().join("logs");

    let log_path = logging::init_logging(Some(&log_dir))?;
    let log_path = log_path.expect("log dir was given");
    assert_eq!(log_path, log_dir.join(logging::LOG_FILE_NAME));

    tracing::info!("Test info message");
    tracing::warn!("Test warning message");

    // rolling::never writes through without a background worker
    std::thread::sleep(std::time::Duration::from_millis(100));

    let contents = std::fs::read_to_string(&log_path)?;
    assert!(contents.contains("New gym-stats session"));
    assert!(contents.contains(&"=".repeat(80)));
    assert!(contents.contains("Test warning message"));
    assert!(!contents.contains("\u{1b}["), "no ANSI codes in log files");

    // Second session appends another separator
    logging::init_logging(Some(&log_dir))?;
    let contents = std::fs::read_to_string(&log_path)?;
    assert_eq!(contents.matches("New gym-stats session").count(), 2);

    Ok(())
}

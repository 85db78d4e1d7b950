use std::process::Command;

#[test]
fn short_headless_session_succeeds() {
    let status = Command::new(env!("CARGO_BIN_EXE_last-stand"))
        .args(["--frames", "120", "--fps", "30", "--log-level", "warn"])
        .status()
        .expect("failed to launch the last-stand binary");

    assert!(status.success(), "a short session should exit cleanly");
}

#[test]
fn missing_tuning_file_exits_with_failure() {
    let status = Command::new(env!("CARGO_BIN_EXE_last-stand"))
        .args(["--tuning", "does/not/exist.toml", "--log-level", "off"])
        .status()
        .expect("failed to launch the last-stand binary");

    assert_eq!(status.code(), Some(1));
}

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_board-scraper"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run CLI")
}

fn assert_usage_error(output: &Output, mentions: &str) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(stderr.contains("Usage"), "missing usage in: {}", stderr);
    assert!(stderr.contains(mentions), "{:?} not in: {}", mentions, stderr);
}

#[test]
fn no_arguments_prints_usage() {
    let output = run(&[]);
    assert_usage_error(&output, "--url");
    assert!(output.stdout.is_empty());
}

#[test]
fn scrape_without_output_is_rejected() {
    let output = run(&["--url", "https://jobs.example.vc", "--firm", "Example Ventures"]);
    assert_usage_error(&output, "--output");
}

#[test]
fn non_http_board_url_is_rejected() {
    let output = run(&[
        "--url",
        "ftp://jobs.example.vc",
        "--firm",
        "Example Ventures",
        "--output",
        "out.json",
    ]);
    assert_usage_error(&output, "--url must be http(s)");
}

#[test]
fn help_exits_cleanly() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--scrape-details"));
    assert!(stdout.contains("--resume"));
}

//! Integration tests for the `sshclaude-console` binary.
//!
//! These run the CLI as a subprocess and check exit codes and output. Tests
//! that need an API start the mock server on a random port.

use std::process::Command;

use mock_server::AppState;

fn run(base: &str, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_sshclaude-console"))
        .args(args)
        .env("SSHCLAUDE_API_BASE", base)
        .env_remove("SSHCLAUDE_API_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute sshclaude-console");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

fn spawn_server(state: AppState) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, state).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

// ── Help & version ───────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let (code, stdout, _) = run("", &["--help"]);
    assert_eq!(code, 0);
    for sub in ["history", "rotate-key", "delete-service"] {
        assert!(stdout.contains(sub), "help should mention {sub}: {stdout}");
    }
}

#[test]
fn version_flag() {
    let (code, stdout, _) = run("", &["--version"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sshclaude-console"));
}

// ── Against the mock API ─────────────────────────────────────────────

#[test]
fn history_prints_one_line_per_login() {
    let state = AppState::default();
    block_on(state.record_login("default", "octocat", "10.1.2.3", chrono::Utc::now()));
    let base = spawn_server(state);

    let (code, stdout, stderr) = run(&base, &["history"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.starts_with("octocat from 10.1.2.3 at "), "{stdout}");
}

#[test]
fn empty_history_prints_nothing() {
    let base = spawn_server(AppState::default());

    let (code, stdout, stderr) = run(&base, &["history"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.is_empty(), "{stdout}");
}

#[test]
fn rotate_key_prints_status() {
    let state = AppState::default();
    block_on(state.provision("svc"));
    let base = spawn_server(state);

    let (code, stdout, _) = run(&base, &["rotate-key", "svc"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "rotated");
}

#[test]
fn failure_status_is_reported_verbatim() {
    let state = AppState::default();
    block_on(state.provision("svc"));
    let base = spawn_server(state);

    let (code, stdout, stderr) = run(&base, &["delete-service", "svc", "--tunnel-token", "wrong"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr.lines().last(), Some("request failed: 403"));
}

#[test]
fn unreachable_server_exits_nonzero() {
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let (code, _, stderr) = run(&format!("http://{addr}"), &["history"]);
    assert_eq!(code, 1);
    assert!(!stderr.is_empty());
}

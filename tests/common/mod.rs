use std::path::Path;

use assert_cmd::Command;

/// Seeds the three-expense scenario used across the script tests.
pub const SEED_SCRIPT: &str = "add 2024-01-05 10 Food Groceries\n\
add 2024-02-10 20 Food \"Dinner out\"\n\
add 2024-02-15 5 Bills Phone\n\
exit\n";

/// Builds a script-mode invocation rooted at `home`.
pub fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_tracker_cli").expect("binary built");
    cmd.env("EXPENSE_TRACKER_CLI_SCRIPT", "1")
        .env("EXPENSE_TRACKER_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Runs `script` against `home` and returns its stdout.
pub fn run_script(home: &Path, script: &str) -> String {
    let output = cli(home)
        .write_stdin(script.to_string())
        .output()
        .expect("run cli");
    assert!(output.status.success(), "cli failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).into_owned()
}

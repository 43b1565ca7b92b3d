use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("fintrack_cli").unwrap();
    cmd.env("FINTRACK_CLI_SCRIPT", "1")
        .env("FINTRACK_HOME", home.path());
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "tx add income 3000 Salary may payroll\n\
                 tx add expense 42.50 Food groceries\n\
                 sub add Netflix 15.99 monthly\n\
                 tx list\n\
                 sub list\n\
                 summary month\n\
                 exit\n";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("recorded"))
        .stdout(contains("Netflix"))
        .stdout(contains("Overview"))
        .stdout(contains("Income"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(json.contains("\"Salary\""));
    assert!(json.contains("\"groceries\""));
}

#[test]
fn script_mode_persists_between_runs() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .write_stdin("tx add expense 900 Housing rent\nexit\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("tx list\nexit\n")
        .assert()
        .success()
        .stdout(contains("Housing"))
        .stdout(contains("rent"));
}

#[test]
fn unknown_commands_get_a_suggestion_without_aborting() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .write_stdin("summry\ntx add income 10 Tips\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `summry`"))
        .stdout(contains("Suggestion: `summary`?"))
        .stdout(contains("recorded"));
}

#[test]
fn invalid_arguments_report_usage_and_continue() {
    let home = TempDir::new().unwrap();

    cli(&home)
        .write_stdin("tx add expense 0 Food\nsub add Gym 30 sometimes\nexit\n")
        .assert()
        .success()
        .stdout(contains("greater than zero"))
        .stdout(contains("Unknown billing cycle: sometimes"));
}

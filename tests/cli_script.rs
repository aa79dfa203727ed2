use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn script_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocket_ledger_cli").unwrap();
    cmd.env("POCKET_LEDGER_CLI_SCRIPT", "1")
        .env("POCKET_LEDGER_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "add 2024-03-01 100 income Salary\n\
                 add 2024-02-15 40 expense Food\n\
                 list\n\
                 summary\n\
                 undo\n\
                 exit\n";

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("OK: Transaction added: 2024-02-15 Expense 40.00 Food (row 1)"))
        .stdout(contains("1 | 2024-02-15 | Expense |  40.00 | Food"))
        .stdout(contains(
            "Income = 100.00 | Expense = 40.00 | Balance = 60.00 | Transactions: 2",
        ))
        .stdout(contains("Last action undone (add of 2024-02-15 Expense 40.00 Food)."));

    let csv = std::fs::read_to_string(home.path().join("transactions.csv")).unwrap();
    assert_eq!(csv, "2024-03-01,Income,100,Salary\n");
}

#[test]
fn ledger_survives_between_sessions() {
    let home = TempDir::new().unwrap();
    script_cmd(&home)
        .write_stdin("add 2024-01-05 12.5 expense \"Eating out\"\n")
        .assert()
        .success();

    script_cmd(&home)
        .write_stdin("list\nundo\n")
        .assert()
        .success()
        .stdout(contains("Eating out"))
        .stdout(contains("WARNING: Nothing to undo."));
}

#[test]
fn invalid_input_is_reported_and_the_session_continues() {
    let home = TempDir::new().unwrap();
    let input = "add 2024-13-40 10 income Food\n\
                 add 2024-01-01 -5 expense Food\n\
                 delete 4\n\
                 lst\n\
                 summary\n";

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stderr(contains("ERROR:").count(3))
        .stderr(contains("No transaction #4"))
        .stdout(contains("Unknown command `lst`"))
        .stdout(contains("Did you mean `list`?"))
        .stdout(contains("Transactions: 0"));
}

#[test]
fn json_format_is_selected_from_config() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.json"),
        r#"{ "storage_format": "json", "currency_symbol": "$" }"#,
    )
    .unwrap();

    script_cmd(&home)
        .write_stdin("add 2024-02-01 20 income Gift\nsummary\nversion\n")
        .assert()
        .success()
        .stdout(contains("Income = $20.00"))
        .stdout(contains("transactions.json"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(json.contains("\"schema_version\": 1"));
    assert!(json.contains("\"category\": \"Gift\""));
}

#[test]
fn non_utf8_line_is_skipped_and_the_script_continues() {
    let home = TempDir::new().unwrap();
    let input: Vec<u8> = b"add 2024-03-01 100 income Salary\n\
                           add 2024-02-15 40 expense Caf\xe9\n\
                           summary\n"
        .to_vec();

    script_cmd(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("WARNING: Skipped input line 2: not valid UTF-8."))
        .stdout(contains("Transactions: 1"));
}

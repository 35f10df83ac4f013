use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "fundledger";

/// A data directory with cheap password hashing so tests stay fast
fn setup() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("config.json"),
        r#"{ "password_hashing": { "memory_cost": 1024, "time_cost": 1, "parallelism": 1 } }"#,
    )
    .expect("write config");
    dir
}

fn fundledger(dir: &Path, user: &str, password: &str) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FUNDLEDGER_DATA_DIR", dir)
        .env("FUNDLEDGER_USER", user)
        .env("FUNDLEDGER_PASSWORD", password)
        .env_remove("FUNDLEDGER_LOG");
    cmd
}

fn seeded() -> TempDir {
    let dir = setup();
    fundledger(dir.path(), "", "").arg("init").assert().success();
    fundledger(dir.path(), "", "pw")
        .args(["user", "register", "acct", "--role", "accountant"])
        .assert()
        .success();
    fundledger(dir.path(), "", "pw")
        .args(["user", "register", "val", "--role", "viewer"])
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_ledger_files() {
    let dir = setup();
    fundledger(dir.path(), "", "")
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete"));

    assert!(dir.path().join("data/ledger.json").exists());
    assert!(dir.path().join("data/users.json").exists());
}

#[test]
fn post_income_then_overdraw_is_rejected() {
    let dir = seeded();

    fundledger(dir.path(), "acct", "pw")
        .args([
            "income", "add", "Student", "1000", "--category", "Hostel Fees", "--department",
            "Science", "--date", "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(contains("Balance: Rs.1,000.00"));

    fundledger(dir.path(), "acct", "pw")
        .args([
            "expense", "add", "Vendor", "1500", "--category", "Maintenance", "--department",
            "Science",
        ])
        .assert()
        .failure()
        .stderr(contains("Insufficient funds"));

    fundledger(dir.path(), "val", "pw")
        .arg("balance")
        .assert()
        .success()
        .stdout(contains("Current balance: Rs.1,000.00"));

    fundledger(dir.path(), "val", "pw")
        .arg("verify")
        .assert()
        .success()
        .stdout(contains("Ledger is consistent."));
}

#[test]
fn viewer_cannot_post() {
    let dir = seeded();

    fundledger(dir.path(), "val", "pw")
        .args([
            "income", "add", "Student", "10", "--category", "Admission Fees", "--department",
            "Arts",
        ])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));

    fundledger(dir.path(), "acct", "pw")
        .arg("balance")
        .assert()
        .success()
        .stdout(contains("Rs.0.00"));
}

#[test]
fn wrong_password_is_rejected() {
    let dir = seeded();

    fundledger(dir.path(), "acct", "wrong")
        .arg("balance")
        .assert()
        .failure()
        .stderr(contains("Invalid username or password"));
}

#[test]
fn mismatched_category_is_rejected() {
    let dir = seeded();

    fundledger(dir.path(), "acct", "pw")
        .args([
            "income", "add", "Vendor", "10", "--category", "Maintenance", "--department",
            "Arts",
        ])
        .assert()
        .failure()
        .stderr(contains("Unknown income category"));
}

#[test]
fn exports_csv_and_pdf() {
    let dir = seeded();

    for (name, amount, category, department) in [
        ("Student", "300", "Hostel Fees", "Science"),
        ("Ministry", "700", "Admission Fees", "Arts"),
    ] {
        fundledger(dir.path(), "acct", "pw")
            .args([
                "income", "add", name, amount, "--category", category, "--department", department,
                "--date", "2024-03-02",
            ])
            .assert()
            .success();
    }

    fundledger(dir.path(), "val", "pw")
        .args(["report", "breakdown", "--kind", "income"])
        .assert()
        .success()
        .stdout(contains("Admission Fees").and(contains("70.0%")));

    let csv_path = dir.path().join("science.csv");
    fundledger(dir.path(), "val", "pw")
        .args(["export", "csv"])
        .arg(&csv_path)
        .args(["--department", "Science"])
        .assert()
        .success()
        .stdout(contains("Exported 1 transaction(s)"));

    let csv = fs::read_to_string(&csv_path).expect("csv written");
    let mut lines = csv.lines();
    assert!(lines.next().expect("header").starts_with("transaction_type,id,name"));
    let row = lines.next().expect("one row");
    assert!(row.starts_with("income,"));
    assert!(row.contains("Hostel Fees"));
    assert!(lines.next().is_none());

    let pdf_path = dir.path().join("summary.pdf");
    fundledger(dir.path(), "val", "pw")
        .args(["export", "pdf"])
        .arg(&pdf_path)
        .assert()
        .success();

    let pdf = fs::read(&pdf_path).expect("pdf written");
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(pdf.ends_with(b"%%EOF\n"));
}

#[test]
fn transaction_list_and_show() {
    let dir = seeded();

    fundledger(dir.path(), "acct", "pw")
        .args([
            "income", "add", "Donor", "5000", "--category", "Government Donation",
            "--department", "Medicine", "--description", "Annual grant",
        ])
        .assert()
        .success();

    let output = fundledger(dir.path(), "val", "pw")
        .args(["transaction", "list"])
        .output()
        .expect("list runs");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Donor"));

    let short_id = stdout
        .split_whitespace()
        .find(|w| w.starts_with("txn-"))
        .expect("listing shows an id")
        .to_string();

    fundledger(dir.path(), "val", "pw")
        .args(["transaction", "show", &short_id])
        .assert()
        .success()
        .stdout(contains("Annual grant").and(contains("Posted by:   acct")));
}

#[test]
fn set_role_requires_accountant() {
    let dir = seeded();

    fundledger(dir.path(), "val", "pw")
        .args(["user", "set-role", "acct", "viewer"])
        .assert()
        .failure()
        .stderr(contains("Not authorized"));

    fundledger(dir.path(), "acct", "pw")
        .args(["user", "set-role", "val", "accountant"])
        .assert()
        .success()
        .stdout(contains("now accountant"));

    fundledger(dir.path(), "val", "pw")
        .args(["user", "whoami"])
        .assert()
        .success()
        .stdout(contains("val"));
}

#[test]
fn missing_user_is_reported() {
    let dir = seeded();

    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FUNDLEDGER_DATA_DIR", dir.path())
        .env_remove("FUNDLEDGER_USER")
        .env("FUNDLEDGER_PASSWORD", "pw")
        .arg("balance")
        .assert()
        .failure()
        .stderr(contains("not logged in"));
}

#[test]
fn concurrent_processes_cannot_overdraw() {
    let dir = seeded();

    fundledger(dir.path(), "acct", "pw")
        .args([
            "income", "add", "Student", "1000", "--category", "Hostel Fees", "--department",
            "Science",
        ])
        .assert()
        .success();

    let successes = std::thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let dir = dir.path();
                s.spawn(move || {
                    fundledger(dir, "acct", "pw")
                        .args([
                            "expense", "add", "Vendor", "600", "--category", "Maintenance",
                            "--department", "Science",
                        ])
                        .output()
                        .expect("expense runs")
                        .status
                        .success()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread joins"))
            .filter(|ok| *ok)
            .count()
    });
    assert_eq!(successes, 1);

    fundledger(dir.path(), "val", "pw")
        .arg("balance")
        .assert()
        .success()
        .stdout(contains("Current balance: Rs.400.00"));

    fundledger(dir.path(), "val", "pw")
        .arg("verify")
        .assert()
        .success()
        .stdout(contains("Expenses:      1 entries"));
}

//! End-to-end tests for the ispbill binary.

use assert_cmd::Command;
use predicates::prelude::*;

const SERVICES_CSV: &str = "\
id,provider_id,name,line_number,billing_account_number,status
1,1,Service - Mobily,0501234567,,active
2,1,Service - Mobily,0507654321,,active
";

#[test]
fn detect_classifies_by_extension() {
    Command::cargo_bin("ispbill")
        .unwrap()
        .args(["detect", "statement.pdf", "export.ZIP"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pdf"))
        .stdout(predicate::str::contains("zip"));
}

#[test]
fn detect_fails_on_unsupported_extension() {
    Command::cargo_bin("ispbill")
        .unwrap()
        .args(["detect", "invoice.docx"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("unsupported"));
}

#[test]
fn import_flat_csv_reports_matched_lines() {
    let dir = tempfile::tempdir().unwrap();
    let services = dir.path().join("services.csv");
    let invoice = dir.path().join("aug.csv");
    std::fs::write(&services, SERVICES_CSV).unwrap();
    std::fs::write(&invoice, "line_number,amount\n0501234567,138.00\n").unwrap();

    Command::cargo_bin("ispbill")
        .unwrap()
        .args([
            "import",
            invoice.to_str().unwrap(),
            "--provider",
            "1",
            "--from",
            "2026-08-01",
            "--to",
            "2026-08-31",
            "--services",
            services.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 lines"))
        .stdout(predicate::str::contains("138.00"));
}

#[test]
fn import_rejects_reversed_period() {
    let dir = tempfile::tempdir().unwrap();
    let services = dir.path().join("services.csv");
    let invoice = dir.path().join("aug.csv");
    std::fs::write(&services, SERVICES_CSV).unwrap();
    std::fs::write(&invoice, "line_number,amount\n0501234567,138.00\n").unwrap();

    Command::cargo_bin("ispbill")
        .unwrap()
        .args([
            "import",
            invoice.to_str().unwrap(),
            "--provider",
            "1",
            "--from",
            "2026-08-31",
            "--to",
            "2026-08-01",
            "--services",
            services.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid billing period"));
}

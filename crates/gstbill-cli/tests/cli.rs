use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INTERSTATE_BUNDLE: &str = r#"{
    "transaction": {
        "invoiceNumber": "INV-7",
        "date": "2024-04-01",
        "items": [
            { "type": "product", "name": "Widget", "quantity": 2, "pricePerUnit": 500, "gstRate": 18 },
            { "type": "service", "service": "svc-1", "amount": 250, "gstRate": 18 }
        ]
    },
    "company": { "businessName": "Acme", "gstin": "27AAPFU0939F1ZV" },
    "party": { "name": "Delhi Buyer", "gstin": "07AAACR5055K1Z9" },
    "serviceNames": { "svc-1": "Installation" }
}"#;

/// A `gstbill` command isolated from the user's config directory.
fn gstbill(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gstbill").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

fn write_bundle(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn compute_json_output() {
    let home = TempDir::new().unwrap();
    let input = write_bundle(home.path(), "bundle.json", INTERSTATE_BUNDLE);

    gstbill(&home)
        .args(["compute", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"regime\": \"interstate\""))
        .stdout(predicate::str::contains("Installation"))
        .stdout(predicate::str::contains(
            "ONE THOUSAND FOUR HUNDRED AND SEVENTY FIVE",
        ));
}

#[test]
fn compute_text_output_with_verify() {
    let home = TempDir::new().unwrap();
    let input = write_bundle(home.path(), "bundle.json", INTERSTATE_BUNDLE);

    gstbill(&home)
        .args(["compute", input.to_str().unwrap(), "--format", "text", "--verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice: INV-7"))
        .stdout(predicate::str::contains("IGST"))
        .stdout(predicate::str::contains("Total:   1475.00"))
        .stderr(predicate::str::contains("Document invariants hold"));
}

#[test]
fn compute_csv_paged() {
    let home = TempDir::new().unwrap();
    let input = write_bundle(home.path(), "bundle.json", INTERSTATE_BUNDLE);
    let output = home.path().join("lines.csv");

    gstbill(&home)
        .args([
            "compute",
            input.to_str().unwrap(),
            "--format",
            "csv",
            "--page-size",
            "1",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].starts_with("page,serial,kind,name"));
    assert!(rows[1].starts_with("1,1,product,Widget"));
    assert!(rows[2].starts_with("2,2,service,Installation"));
}

#[test]
fn compute_missing_input_fails() {
    let home = TempDir::new().unwrap();

    gstbill(&home)
        .args(["compute", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn words_command() {
    let home = TempDir::new().unwrap();

    gstbill(&home)
        .args(["words", "123456"])
        .assert()
        .success()
        .stdout("ONE LAKH TWENTY THREE THOUSAND FOUR HUNDRED AND FIFTY SIX\n");

    gstbill(&home)
        .args(["words", "100.99", "--phrase"])
        .assert()
        .success()
        .stdout("RUPEES ONE HUNDRED ONLY\n");

    gstbill(&home)
        .args(["words", "₹ 1,000"])
        .assert()
        .success()
        .stdout("ONE THOUSAND\n");

    gstbill(&home)
        .args(["words", "1e3"])
        .assert()
        .success()
        .stdout("ONE THOUSAND\n");

    gstbill(&home)
        .args(["words", "20000000000000000000"])
        .assert()
        .success()
        .stdout("TWO LAKH CRORE CRORE\n");

    gstbill(&home)
        .args(["words", "--", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be negative"));
}

#[test]
fn gstin_command() {
    let home = TempDir::new().unwrap();

    gstbill(&home)
        .args(["gstin", "27AAPFU0939F1ZV"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Maharashtra (27)"));

    gstbill(&home)
        .args(["gstin", "27AAPFU0939F1ZV", "07AAACR5055K1Z0"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("check character"));
}

#[test]
fn config_init_and_get() {
    let home = TempDir::new().unwrap();

    gstbill(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("config/gstbill/config.json").exists());

    gstbill(&home)
        .args(["config", "set", "pagination.items_per_page", "25"])
        .assert()
        .success();

    gstbill(&home)
        .args(["config", "get", "pagination.items_per_page"])
        .assert()
        .success()
        .stdout("25\n");

    gstbill(&home)
        .args(["config", "set", "pagination.items_per_page", "0"])
        .assert()
        .failure();

    gstbill(&home)
        .args(["config", "set", "colors.theme", "dark"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown configuration key"));

    gstbill(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pagination.items_per_page = 25"))
        .stdout(predicate::str::contains("tax.unknown_buyer_state = intrastate"));
}

#[test]
fn config_flag_selects_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("billing.json");
    let config_arg = config.to_str().unwrap();

    gstbill(&home)
        .args(["--config", config_arg, "config", "set", "words.prefix", "INR"])
        .assert()
        .success();
    assert!(config.exists());
    assert!(!home.path().join("config/gstbill/config.json").exists());

    gstbill(&home)
        .args(["--config", config_arg, "words", "100", "--phrase"])
        .assert()
        .success()
        .stdout("INR ONE HUNDRED ONLY\n");
}

#[test]
fn batch_with_summary() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("in");
    let outputs = home.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write_bundle(&inputs, "good.json", INTERSTATE_BUNDLE);
    write_bundle(&inputs, "broken.json", "{ not json");

    let pattern = format!("{}/*.json", inputs.display());

    gstbill(&home)
        .args([
            "batch",
            &pattern,
            "--output-dir",
            outputs.to_str().unwrap(),
            "--summary",
            "--continue-on-error",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 successful, 1 failed"));

    assert!(outputs.join("good.json").exists());
    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.contains("good.json,success,INV-7,2024-04-01,Interstate"));
    assert!(summary.contains("broken.json,error"));

    gstbill(&home)
        .args(["batch", &pattern])
        .assert()
        .failure();
}

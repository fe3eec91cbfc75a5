use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_quote_prints_rate_table() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("shipquote"));
    cmd.args(["quote", "tests/fixtures/shipment.json"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "category,id,carrier,service,transit_days,estimated_delivery,base_rate,fuel_surcharge,insurance,special_handling,total",
        ))
        .stdout(predicate::str::contains("ground,ground-"))
        .stdout(predicate::str::contains("freight,freight-"))
        // liftgate-delivery fee on every row
        .stdout(predicate::str::contains(",35.00,"));

    Ok(())
}

#[test]
fn test_validate_reports_failed_rules() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("shipquote"));
    cmd.args(["validate", "tests/fixtures/transaction.json"]);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"isValid\": false"))
        .stdout(predicate::str::contains("IDENTICAL_ADDRESSES"))
        .stdout(predicate::str::contains("QUOTE_EXPIRED"));

    Ok(())
}

#[test]
fn test_missing_input_file_fails() {
    let mut cmd = Command::new(cargo_bin!("shipquote"));
    cmd.args(["quote", "tests/fixtures/does-not-exist.json"]);

    cmd.assert().failure();
}

#[test]
fn test_quote_rejects_invalid_shipment() -> Result<(), Box<dyn std::error::Error>> {
    let shipment = std::fs::read_to_string("tests/fixtures/shipment.json")?
        .replace("\"75226\"", "\"7522\"");
    let mut file = tempfile::NamedTempFile::new()?;
    std::io::Write::write_all(&mut file, shipment.as_bytes())?;

    let mut cmd = Command::new(cargo_bin!("shipquote"));
    cmd.arg("quote").arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("validation failed"));

    Ok(())
}

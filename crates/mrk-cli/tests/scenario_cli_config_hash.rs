use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;

#[test]
fn cli_config_hash_prints_hash_and_canonical_json() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let base = tmp.path().join("base.yaml");
    let site = tmp.path().join("site.yaml");
    fs::write(&base, "fees:\n  keyword: \"Promoted Listings\"\npaging:\n  ads_page_size: 500\n")?;
    fs::write(&site, "paging:\n  ads_page_size: 100\n")?;

    Command::cargo_bin("mrk")?
        .arg("config-hash")
        .arg(&base)
        .arg(&site)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^config_hash=[0-9a-f]{64}\n")?)
        .stdout(predicate::str::contains(r#""ads_page_size":100"#));
    Ok(())
}

#[test]
fn cli_config_hash_refuses_secret_literals() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let bad = tmp.path().join("bad.yaml");
    fs::write(&bad, "auth:\n  refresh_token: \"v^1.1#i^1#r^1#f^0#p^3#I^3#t^Ul4xMF8\"\n")?;

    Command::cargo_bin("mrk")?
        .arg("config-hash")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_SECRET_DETECTED"))
        .stderr(predicate::str::contains("Ul4xMF8").not());
    Ok(())
}

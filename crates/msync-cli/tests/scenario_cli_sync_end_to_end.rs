use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::process::Command;

const STORE: &str = r#"{
  "store": {
    "id": "store-9",
    "name": "Test Kitchen",
    "bindings": [
      { "marketplace": "BAEMIN", "shop_id": "B-9", "credential_ref": "baemin_main" },
      { "marketplace": "YOGIYO", "shop_id": "Y-9", "credential_ref": "yogiyo_main" }
    ]
  },
  "items": [
    { "id": "I1", "category_id": "mains", "name": "Bulgogi", "description": "beef", "price": 9000 },
    { "id": "I2", "category_id": "sides", "name": "Kimchi", "description": "spicy", "price": 950 }
  ]
}"#;

const RULES: &str = r#"{
  "platforms": {
    "BAEMIN": {
      "price": { "min": 1000, "step": 100 }, "name": { "maxLen": 30 }, "desc": { "maxLen": 200 },
      "optionGroup": { "minSelect": 0, "maxSelect": 10, "maxGroupsPerItem": 5 },
      "option": { "maxOptionsPerGroup": 20 }
    },
    "YOGIYO": {
      "price": { "min": 500, "step": 10 }, "name": { "maxLen": 40 }, "desc": { "maxLen": 300 },
      "optionGroup": { "minSelect": 0, "maxSelect": 20, "maxGroupsPerItem": 8 },
      "option": { "maxOptionsPerGroup": 30 }
    }
  }
}"#;

fn write_fixture(root: &Path) -> anyhow::Result<std::path::PathBuf> {
    std::fs::write(root.join("store.json"), STORE)?;
    std::fs::write(root.join("rules.json"), RULES)?;
    let cfg = format!(
        "paths:\n  store_file: {root}/store.json\n  rules_file: {root}/rules.json\n  \
         catalog_dir: {root}/catalog\n  audit_log: {root}/audit/audit.jsonl\n  \
         marketplace_state_dir: {root}/state\n\
         console:\n  actor: cli-test\n\
         marketplaces:\n  BAEMIN:\n    selector_version: \"t1\"\n  YOGIYO:\n    selector_version: \"t1\"\n\
         credentials:\n  baemin_main:\n    username_env: MSYNC_T_BAEMIN_USER\n    password_env: MSYNC_T_BAEMIN_PASS\n  \
         yogiyo_main:\n    username_env: MSYNC_T_YOGIYO_USER\n    password_env: MSYNC_T_YOGIYO_PASS\n",
        root = root.display()
    );
    let cfg_path = root.join("base.yaml");
    std::fs::write(&cfg_path, cfg)?;
    Ok(cfg_path)
}

fn msync(root: &Path, cfg: &Path) -> anyhow::Result<Command> {
    let mut cmd = Command::cargo_bin("msync")?;
    cmd.current_dir(root)
        .arg("--config")
        .arg(cfg)
        .env("MSYNC_T_BAEMIN_USER", "owner-b")
        .env("MSYNC_T_BAEMIN_PASS", "pw-b")
        .env("MSYNC_T_YOGIYO_USER", "owner-y")
        .env("MSYNC_T_YOGIYO_PASS", "pw-y");
    Ok(cmd)
}

/// Baemin rejects the 950 price, Yogiyo accepts it; the audit log records the
/// one applied binding and verifies.
#[test]
fn sync_blocks_invalid_marketplace_and_audits_the_other() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_fixture(dir.path())?;

    msync(dir.path(), &cfg)?
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("marketplace=BAEMIN shop_id=B-9 status=BLOCKED"))
        .stdout(predicate::str::contains("issue=I2 [price]"))
        .stdout(predicate::str::contains("code=VALIDATION_FAIL"))
        .stdout(predicate::str::contains("marketplace=YOGIYO shop_id=Y-9 status=APPLIED"))
        .stdout(predicate::str::contains("store_id=store-9 applied=1 total=2"));

    assert!(dir.path().join("catalog").join("store-9.json").exists());

    let audit = dir.path().join("audit").join("audit.jsonl");
    Command::cargo_bin("msync")?
        .args(["audit", "verify"])
        .arg(&audit)
        .assert()
        .success()
        .stdout(predicate::str::contains("audit_chain=valid lines=1"));

    msync(dir.path(), &cfg)?
        .args(["audit", "tail", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("actor=cli-test action=APPLY entity=YOGIYO:Y-9"));
    Ok(())
}

/// Pause fans out to both marketplaces and appends to the same chain.
#[test]
fn pause_then_resume_extends_audit_chain() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_fixture(dir.path())?;

    msync(dir.path(), &cfg)?
        .args(["pause", "pause", "--reason", "inventory", "--until", "2026-05-01T18:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marketplace=BAEMIN shop_id=B-9 status=APPLIED"))
        .stdout(predicate::str::contains("marketplace=YOGIYO shop_id=Y-9 status=APPLIED"))
        .stdout(predicate::str::contains("paused=true"));

    msync(dir.path(), &cfg)?
        .args(["pause", "resume"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paused=false"));

    msync(dir.path(), &cfg)?
        .args(["hours", "10:00", "22:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open=10:00 close=22:00"));

    Command::cargo_bin("msync")?
        .args(["audit", "verify"])
        .arg(dir.path().join("audit").join("audit.jsonl"))
        .assert()
        .success()
        .stdout(predicate::str::contains("audit_chain=valid lines=6"));
    Ok(())
}

/// A missing credential env var is a fatal configuration defect.
#[test]
fn missing_credential_env_fails_before_sync() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let cfg = write_fixture(dir.path())?;

    msync(dir.path(), &cfg)?
        .env_remove("MSYNC_T_YOGIYO_PASS")
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("SECRETS_MISSING"))
        .stderr(predicate::str::contains("MSYNC_T_YOGIYO_PASS"))
        .stderr(predicate::str::contains("pw-b").not());

    assert!(!dir.path().join("catalog").join("store-9.json").exists());
    Ok(())
}

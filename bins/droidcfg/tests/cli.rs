use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const CONFIG_ERROR: i32 = 3;

fn project(local: bool, keys: Option<&str>) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("app")).unwrap();
    if local {
        let sdk = dir.path().join("flutter");
        std::fs::create_dir_all(&sdk).unwrap();
        std::fs::write(
            dir.path().join("local.properties"),
            format!("flutter.sdk={}\nflutter.versionCode=12\nflutter.versionName=1.4.0\n", sdk.display()),
        )
        .unwrap();
    }
    if let Some(keys) = keys {
        std::fs::write(dir.path().join("key.properties"), keys).unwrap();
    }
    dir
}

const COMPLETE_KEYS: &str =
    "storeFile=app/keystore.jks\nkeyAlias=upload\nstorePassword=very-secret\nkeyPassword=also-secret\n";

fn droidcfg(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("droidcfg").unwrap();
    cmd.arg("--no-color").arg("--project-dir").arg(dir).env_remove("RUST_LOG");
    cmd
}

#[test]
fn resolve_debug_without_credentials_succeeds() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["resolve", "--variant", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Build configuration (debug)"))
        .stdout(predicate::str::contains("1.4.0 (12)"))
        .stderr(predicate::str::contains("key.properties"));
}

#[test]
fn resolve_release_without_credentials_fails() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["resolve", "--variant", "release"])
        .assert()
        .code(CONFIG_ERROR)
        .stderr(predicate::str::contains("E3001"))
        .stderr(predicate::str::contains("key.properties"));
}

#[test]
fn missing_toolchain_fails_for_both_variants() {
    let dir = project(false, Some(COMPLETE_KEYS));
    for variant in ["debug", "release"] {
        droidcfg(dir.path())
            .args(["resolve", "--variant", variant])
            .assert()
            .code(CONFIG_ERROR)
            .stderr(predicate::str::contains("local.properties"));
    }
}

#[test]
fn missing_credential_key_is_named() {
    let dir = project(true, Some("storeFile=app/keystore.jks\nkeyAlias=upload\nkeyPassword=x\n"));
    droidcfg(dir.path())
        .args(["resolve", "--variant", "release"])
        .assert()
        .code(CONFIG_ERROR)
        .stderr(predicate::str::contains("E3004"))
        .stderr(predicate::str::contains("storePassword"));
}

#[test]
fn resolve_release_json_masks_passwords() {
    let dir = project(true, Some(COMPLETE_KEYS));
    let output = droidcfg(dir.path())
        .args(["resolve", "--variant", "release", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(!stdout.contains("very-secret"));
    assert!(!stdout.contains("also-secret"));

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["variant"], "release");
    assert_eq!(json["version_code"], 12);
    assert_eq!(json["signing"]["key_alias"], "upload");
    let store_file = json["signing"]["store_file"].as_str().unwrap();
    assert_eq!(Path::new(store_file), dir.path().join("app").join("app/keystore.jks"));
}

#[test]
fn verify_keystore_flag_checks_file() {
    let dir = project(true, Some(COMPLETE_KEYS));
    droidcfg(dir.path())
        .args(["resolve", "--variant", "release", "--verify-keystore"])
        .assert()
        .code(CONFIG_ERROR)
        .stderr(predicate::str::contains("Not a file"));
}

#[test]
fn settings_file_overrides_defaults() {
    let dir = project(true, None);
    std::fs::write(
        dir.path().join("droidcfg.toml"),
        "[android]\napplication_id = \"com.example.scanner\"\nmin_sdk = 23\n",
    )
    .unwrap();

    droidcfg(dir.path())
        .args(["resolve", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("com.example.scanner"))
        .stdout(predicate::str::contains("\"min_sdk_version\": 23"));
}

#[test]
fn explicit_missing_settings_file_fails() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["--config", "does-not-exist.toml", "resolve"])
        .assert()
        .code(CONFIG_ERROR);
}

#[test]
fn build_dry_run_prints_masked_invocation() {
    let dir = project(true, Some(COMPLETE_KEYS));
    droidcfg(dir.path())
        .args(["build", "--variant", "release", "--bundle", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bundleRelease"))
        .stdout(predicate::str::contains("ORG_GRADLE_PROJECT_android.injected.signing.key.alias=upload"))
        .stdout(predicate::str::contains("very-secret").not());
}

#[test]
fn build_dry_run_hands_descriptor_to_gradle() {
    let dir = project(true, None);
    std::fs::write(dir.path().join("droidcfg.toml"), "[android]\nmin_sdk = 23\n").unwrap();

    droidcfg(dir.path())
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("assembleDebug"))
        .stdout(predicate::str::contains("ORG_GRADLE_PROJECT_droidcfg.minSdk=23"))
        .stdout(predicate::str::contains("ORG_GRADLE_PROJECT_flutter.versionCode=12"))
        .stdout(predicate::str::contains("ORG_GRADLE_PROJECT_flutter.versionName=1.4.0"))
        .stdout(predicate::str::contains("android.injected.signing").not());
}

#[test]
fn empty_module_rejected() {
    let dir = project(true, Some(COMPLETE_KEYS));
    droidcfg(dir.path())
        .args(["--module", "", "resolve", "--variant", "release"])
        .assert()
        .code(CONFIG_ERROR)
        .stderr(predicate::str::contains("module"));
}

#[test]
fn build_without_wrapper_fails() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["build", "--variant", "debug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Gradle wrapper not found"));
}

#[test]
fn doctor_reports_debug_only_project() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("debug: ready"))
        .stderr(predicate::str::contains("release:"))
        .stderr(predicate::str::contains("Not every variant can be built yet"));
}

#[test]
fn doctor_reports_complete_project() {
    let dir = project(true, Some(COMPLETE_KEYS));
    droidcfg(dir.path())
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("release: ready"))
        .stdout(predicate::str::contains("Ready for debug and release builds"));
}

#[test]
fn doctor_fails_without_toolchain() {
    let dir = project(false, None);
    droidcfg(dir.path())
        .args(["doctor", "--json"])
        .assert()
        .code(CONFIG_ERROR)
        .stdout(predicate::str::contains("\"status\": \"missing\""));
}

#[test]
fn unknown_variant_rejected() {
    let dir = project(true, None);
    droidcfg(dir.path())
        .args(["resolve", "--variant", "profile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown build variant"));
}

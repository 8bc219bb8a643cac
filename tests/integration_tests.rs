//! Integration tests for the broken-promises binary.
//!
//! Every test runs in its own temp directory so a stray `.env` or
//! `tracker.toml` in the checkout cannot leak in.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tracker(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("broken-promises");
    cmd.current_dir(dir.path())
        .env_remove("PORT")
        .env_remove("HOST")
        .env_remove("DATA_FILE")
        .env_remove("TRACKER_CONFIG");
    cmd
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

mod cli_basics {
    use super::*;

    #[test]
    fn test_help() {
        let dir = TempDir::new().unwrap();
        tracker(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--data-file"));
    }

    #[test]
    fn test_version() {
        let dir = TempDir::new().unwrap();
        tracker(&dir).arg("--version").assert().success();
    }

    #[test]
    fn test_rejects_invalid_port() {
        let dir = TempDir::new().unwrap();
        tracker(&dir).args(["--port", "not-a-port"]).assert().failure();
    }
}

mod init {
    use super::*;

    #[test]
    fn test_init_creates_default_data_file() {
        let dir = TempDir::new().unwrap();
        tracker(&dir)
            .arg("--init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Data file initialized"));

        let doc = read_json(&dir.path().join("data.json"));
        assert_eq!(doc, serde_json::json!({"issues": []}));
    }

    #[test]
    fn test_init_respects_data_file_flag() {
        let dir = TempDir::new().unwrap();
        tracker(&dir)
            .args(["--init", "--data-file", "store/issues.json"])
            .assert()
            .success();
        assert!(dir.path().join("store/issues.json").exists());
    }

    #[test]
    fn test_init_respects_data_file_env() {
        let dir = TempDir::new().unwrap();
        tracker(&dir)
            .arg("--init")
            .env("DATA_FILE", "from-env.json")
            .assert()
            .success();
        assert!(dir.path().join("from-env.json").exists());
    }

    #[test]
    fn test_init_reads_tracker_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tracker.toml"),
            "[store]\ndata_file = \"configured.json\"\n",
        )
        .unwrap();
        tracker(&dir).arg("--init").assert().success();
        assert!(dir.path().join("configured.json").exists());
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn test_init_flag_beats_tracker_toml() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tracker.toml"),
            "[store]\ndata_file = \"configured.json\"\n",
        )
        .unwrap();
        tracker(&dir)
            .args(["--init", "--data-file", "flag.json"])
            .assert()
            .success();
        assert!(dir.path().join("flag.json").exists());
        assert!(!dir.path().join("configured.json").exists());
    }

    #[test]
    fn test_init_keeps_existing_data() {
        let dir = TempDir::new().unwrap();
        let existing = serde_json::json!({"issues": [{
            "id": 4,
            "title": "Fence repair",
            "description": "",
            "datePromised": "2023-09-01",
            "status": "in-progress"
        }]});
        fs::write(dir.path().join("data.json"), existing.to_string()).unwrap();

        tracker(&dir)
            .arg("--init")
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
        assert_eq!(read_json(&dir.path().join("data.json")), existing);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        tracker(&dir)
            .args(["--init", "--config", "missing.toml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to read config file"));
    }
}

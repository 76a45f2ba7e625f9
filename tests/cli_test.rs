use std::process::Command;
use tempfile::TempDir;

fn pdfmind(dir: &std::path::Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_pdfmind"));
    command
        .current_dir(dir)
        .env("PDFMIND_EMBEDDING__SHOW_DOWNLOAD_PROGRESS", "false");
    command
}

#[test]
fn test_init_command() {
    let temp_dir = TempDir::new().unwrap();

    let output = pdfmind(temp_dir.path())
        .arg("init")
        .output()
        .expect("Failed to run init command");

    assert!(output.status.success());

    let config_path = temp_dir.path().join(".pdfmind/settings.toml");
    assert!(config_path.exists());

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("[processing]"));
    assert!(content.contains("chunk_size = 500"));
    assert!(content.contains("collection_name = \"pdf_collection\""));
}

#[test]
fn test_init_twice_requires_force() {
    let temp_dir = TempDir::new().unwrap();

    assert!(pdfmind(temp_dir.path()).arg("init").status().unwrap().success());
    assert!(!pdfmind(temp_dir.path()).arg("init").status().unwrap().success());
    assert!(
        pdfmind(temp_dir.path())
            .args(["init", "--force"])
            .status()
            .unwrap()
            .success()
    );
}

#[test]
fn test_config_command() {
    let temp_dir = TempDir::new().unwrap();

    let config_dir = temp_dir.path().join(".pdfmind");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("settings.toml"),
        "version = 2\n[processing]\nchunk_size = 777\n",
    )
    .unwrap();

    let output = pdfmind(temp_dir.path())
        .arg("config")
        .output()
        .expect("Failed to run config command");

    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("version = 2"));
    assert!(stdout.contains("chunk_size = 777"));
    assert!(stdout.contains("overlap = 50"));
}

#[test]
fn test_config_flag_and_env_override() {
    let temp_dir = TempDir::new().unwrap();
    let custom = temp_dir.path().join("custom.toml");
    std::fs::write(&custom, "[store]\ncollection_name = \"from_file\"\n").unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["--config", "custom.toml", "config"])
        .env("PDFMIND_PROCESSING__OVERLAP", "7")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("collection_name = \"from_file\""));
    assert!(stdout.contains("overlap = 7"));
}

#[test]
fn test_malformed_config_flag_fails() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("bad.toml"),
        "[processing]\nchunk_size = \"eight hundred\"\n\n[store]\ndb_path = \"mydb\"\n",
    )
    .unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["-c", "bad.toml", "config"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to load configuration"), "{stderr}");
    assert!(!stderr.contains("Using default configuration"));
    assert!(output.stdout.is_empty());

    let output = pdfmind(temp_dir.path())
        .args(["-c", "bad.toml", "process", "any.pdf", "--no-progress"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("chroma_db").exists());
    assert!(!temp_dir.path().join("mydb").exists());
}

#[test]
fn test_missing_config_flag_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["--config", "absent.toml", "config"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("absent.toml"), "{stderr}");
}

#[test]
fn test_process_missing_file_fails_without_writing() {
    let temp_dir = TempDir::new().unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["process", "missing.pdf", "--no-progress", "--db-path", "db"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing.pdf"));
    assert!(stderr.contains("failed during extracting"), "{stderr}");
    assert!(!temp_dir.path().join("db").exists());
}

#[test]
fn test_process_rejects_zero_chunk_size() {
    let temp_dir = TempDir::new().unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["process", "any.pdf", "--chunk-size", "0", "--no-progress"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("chunk_size must be greater than zero"));
}

#[test]
fn test_stats_missing_collection() {
    let temp_dir = TempDir::new().unwrap();

    let output = pdfmind(temp_dir.path())
        .args(["stats", "--db-path", "nowhere"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("not found"));
    assert!(!temp_dir.path().join("nowhere").exists());
}

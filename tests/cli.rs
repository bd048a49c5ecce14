use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

const BIN: &str = env!("CARGO_BIN_EXE_playlist-prep");

fn write_file(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// A scratch card with its own settings file, so the user's config is never read.
fn card(categories: &[&str]) -> anyhow::Result<(tempfile::TempDir, tempfile::TempDir)> {
    let card = tempfile::tempdir()?;
    let settings_dir = tempfile::tempdir()?;
    let settings = serde_json::json!({ "categories": categories });
    write_file(
        &settings_dir.path().join("settings.json"),
        &settings.to_string(),
    )?;
    Ok((card, settings_dir))
}

fn run(settings_dir: &Path, args: &[&str]) -> anyhow::Result<Output> {
    Ok(Command::new(BIN)
        .args(args)
        .env("PLAYLIST_PREP_CONFIG", settings_dir.join("settings.json"))
        .env("RUST_LOG", "off")
        .output()?)
}

fn run_json(settings_dir: &Path, args: &[&str]) -> anyhow::Result<Value> {
    let out = run(settings_dir, args)?;
    if !out.status.success() {
        return Err(anyhow::anyhow!(
            "command failed: status={:?}, stderr={}",
            out.status.code(),
            String::from_utf8_lossy(&out.stderr)
        ));
    }
    Ok(serde_json::from_slice(&out.stdout)?)
}

#[test]
fn bare_root_cleans_deduplicates_and_indexes() -> anyhow::Result<()> {
    let (card, settings) = card(&["/A", "/Missing"])?;
    let root = card.path();
    for name in ["song.mp3", "song_1.mp3", "junk.txt", ".hidden"] {
        write_file(&root.join("A").join(name), "x")?;
    }

    let out = run(settings.path(), &[root.to_str().unwrap()])?;
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("indexed 1 tracks"), "stdout: {stdout}");

    assert_eq!(
        std::fs::read_to_string(root.join(".playlist_cache_0.txt"))?,
        "/A/song.mp3\n"
    );
    assert!(!root.join(".playlist_cache_1.txt").exists());
    assert!(!root.join("A/song_1.mp3").exists());
    assert!(!root.join("A/junk.txt").exists());
    assert!(root.join("A/.hidden").exists());
    Ok(())
}

#[test]
fn json_report_lists_statuses_and_removals() -> anyhow::Result<()> {
    let (card, settings) = card(&["/A", "/B", "/C"])?;
    let root = card.path();
    write_file(&root.join("A/x.mp3"), "x")?;
    write_file(&root.join("A/x_2.mp3"), "x")?;
    write_file(&root.join("B/cover.jpg"), "x")?;

    let report = run_json(
        settings.path(),
        &["index", root.to_str().unwrap(), "--format", "json"],
    )?;

    assert_eq!(report["total_tracks"], 1);
    assert_eq!(report["dry_run"], false);
    let categories = report["categories"].as_array().unwrap();
    assert_eq!(categories[0]["status"], "indexed");
    assert_eq!(categories[0]["tracks"][0], "/A/x.mp3");
    assert_eq!(categories[0]["deduplicated"]["removed"].as_array().unwrap().len(), 1);
    assert_eq!(categories[1]["status"], "empty");
    assert_eq!(categories[1]["cleaned"]["removed"].as_array().unwrap().len(), 1);
    assert_eq!(categories[2]["status"], "missing");
    Ok(())
}

#[test]
fn dry_run_leaves_card_untouched() -> anyhow::Result<()> {
    let (card, settings) = card(&["/A"])?;
    let root = card.path();
    write_file(&root.join("A/x.mp3"), "x")?;
    write_file(&root.join("A/notes.txt"), "x")?;

    let report = run_json(
        settings.path(),
        &["--dry-run", "-f", "json", root.to_str().unwrap()],
    )?;

    assert_eq!(report["categories"][0]["status"], "dry_run");
    assert!(root.join("A/notes.txt").exists());
    assert!(!root.join(".playlist_cache_0.txt").exists());
    Ok(())
}

#[test]
fn check_and_clear_work_on_existing_cache_files() -> anyhow::Result<()> {
    let (card, settings) = card(&["/A", "/B"])?;
    let root = card.path();
    write_file(&root.join("A/x.mp3"), "x")?;
    run_json(settings.path(), &["index", root.to_str().unwrap(), "-f", "json"])?;
    std::fs::remove_file(root.join("A/x.mp3"))?;

    let checks = run_json(settings.path(), &["check", root.to_str().unwrap(), "-f", "json"])?;
    assert_eq!(checks[0]["present"], true);
    assert_eq!(checks[0]["missing_tracks"][0], "/A/x.mp3");
    assert_eq!(checks[1]["present"], false);

    let out = run(settings.path(), &["clear", root.to_str().unwrap()])?;
    assert!(out.status.success());
    assert!(!root.join(".playlist_cache_0.txt").exists());
    Ok(())
}

#[test]
fn rejects_missing_or_non_directory_root() -> anyhow::Result<()> {
    let (card, settings) = card(&["/A"])?;
    let file = card.path().join("card.img");
    write_file(&file, "x")?;

    let out = run(settings.path(), &[file.to_str().unwrap()])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("not a directory"));

    let out = run(settings.path(), &[])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
    Ok(())
}

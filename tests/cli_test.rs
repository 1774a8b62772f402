use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_command(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_deck"))
        .args(args)
        .env_remove("DECK_API_BASE")
        .output()
        .expect("Failed to execute command")
}

fn read_deck(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("Failed to read deck file");
    serde_json::from_str(&content).expect("Deck file is not JSON")
}

fn import_sample(temp_path: &Path) -> std::path::PathBuf {
    let markdown_path = temp_path.join("talk.md");
    fs::write(
        &markdown_path,
        "% Rust Intro\n\n# Hello\n\n- Hi\n\n# Ownership\n\n- Moves\n- Borrows\n",
    )
    .expect("Failed to write markdown file");

    let deck_path = temp_path.join("deck.json");
    let output = run_command(&[
        "import-md",
        "-i",
        markdown_path.to_str().unwrap(),
        "-o",
        deck_path.to_str().unwrap(),
        "--theme",
        "dark",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    deck_path
}

#[test]
fn test_import_md_command() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());

    let deck = read_deck(&deck_path);
    assert_eq!(deck["title"], "Rust Intro");
    assert_eq!(deck["theme"], "dark");
    assert_eq!(deck["current_index"], 0);
    let slides = deck["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 2);
    assert_eq!(slides[1]["bullets"], serde_json::json!(["Moves", "Borrows"]));
    assert_eq!(slides[0]["design"]["theme"], "dark");
}

#[test]
fn test_edit_command_applies_field_edits() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());

    let output = run_command(&[
        "edit",
        "-i",
        deck_path.to_str().unwrap(),
        "--select",
        "1",
        "--title",
        "Ownership Rules",
        "--add-bullet",
        "--set-bullet",
        "2=Lifetimes",
        "--remove-bullet",
        "0",
        "--design",
        "layout=two_column",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let deck = read_deck(&deck_path);
    assert_eq!(deck["current_index"], 1);
    let slide = &deck["slides"][1];
    assert_eq!(slide["title"], "Ownership Rules");
    assert_eq!(slide["bullets"], serde_json::json!(["Borrows", "Lifetimes"]));
    assert_eq!(slide["design"]["layout"], "two_column");
    assert_eq!(slide["design"]["theme"], "dark");
    assert_eq!(deck["slides"][0]["title"], "Hello");
}

#[test]
fn test_edit_command_structural_changes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());
    let out_path = temp_dir.path().join("edited.json");

    let output = run_command(&[
        "edit",
        "-i",
        deck_path.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "--duplicate",
        "0",
        "--add-slide",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let deck = read_deck(&out_path);
    let slides = deck["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 4);
    assert_eq!(slides[1]["title"], "Hello");
    assert_ne!(slides[1]["id"], slides[0]["id"]);
    assert_eq!(slides[3]["title"], "New Slide");
    assert_eq!(slides[3]["design"]["theme"], "dark");
    assert_eq!(deck["current_index"], 3);

    // The input deck is left alone when -o is given
    assert_eq!(read_deck(&deck_path)["slides"].as_array().unwrap().len(), 2);
}

#[test]
fn test_edit_command_rejects_bad_index() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());
    let before = fs::read_to_string(&deck_path).unwrap();

    let output = run_command(&["edit", "-i", deck_path.to_str().unwrap(), "--select", "9"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("out of range"), "stderr: {}", stderr);
    assert_eq!(fs::read_to_string(&deck_path).unwrap(), before);
}

#[test]
fn test_offline_markdown_export() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());
    let export_dir = temp_dir.path().join("exports");

    let output = run_command(&[
        "export",
        "-i",
        deck_path.to_str().unwrap(),
        "-f",
        "md",
        "--offline",
        "--dir",
        export_dir.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let files: Vec<_> = fs::read_dir(&export_dir)
        .expect("Export dir was not created")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Rust_Intro_") && name.ends_with(".md"), "got {}", name);

    let md = fs::read_to_string(&files[0]).unwrap();
    assert!(md.contains("## Slide 2: Ownership"));
    assert!(md.contains("- Borrows"));
}

#[test]
fn test_offline_pptx_export_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let deck_path = import_sample(temp_dir.path());

    let output = run_command(&[
        "export",
        "-i",
        deck_path.to_str().unwrap(),
        "-f",
        "pptx",
        "--offline",
        "--dir",
        temp_dir.path().join("exports").to_str().unwrap(),
    ]);
    assert!(!output.status.success());
}

#[test]
fn test_show_missing_deck() {
    let output = run_command(&["show", "-i", "/definitely/not/here.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Path not found"), "stderr: {}", stderr);
}

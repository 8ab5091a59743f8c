use assert_cmd::{cargo::cargo_bin_cmd, Command};
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Get a Command for kotoba
pub fn kotoba() -> Command {
    cargo_bin_cmd!("kotoba")
}

/// Get a Command for kotoba bound to the store under `dir`
#[allow(dead_code)]
pub fn kotoba_in(dir: &TempDir) -> Command {
    let mut cmd = kotoba();
    cmd.env_remove("KOTOBA_STORE")
        .arg("--store")
        .arg(dir.path().join("store"));
    cmd
}

/// Write a zipped dictionary package made of `files` and return its path
pub fn write_package(dir: &Path, name: &str, files: &[(&str, Value)]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (file, content) in files {
        writer
            .start_file(*file, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.to_string().as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// A small format 3 dictionary with terms, kanji, meta and tags
#[allow(dead_code)]
pub fn sample_package(dir: &TempDir, title: &str) -> PathBuf {
    write_package(
        dir.path(),
        &format!("{title}.zip"),
        &[
            (
                "index.json",
                json!({"title": title, "revision": "r1", "sequenced": true, "version": 3}),
            ),
            (
                "term_bank_1.json",
                json!([
                    ["打つ", "うつ", "v5", "v5", 10, ["to hit"], 7, "P"],
                    ["打ち込む", "うちこむ", "v5", "v5", 5, ["to drive in"], 8, ""],
                    ["撃つ", "うつ", "v5", "v5", 3, ["to shoot"], 7, ""]
                ]),
            ),
            ("term_meta_bank_1.json", json!([["打つ", "freq", 120]])),
            (
                "kanji_bank_1.json",
                json!([["打", "ダ", "う.つ", "jouyou", ["strike"], {"strokes": "5"}]]),
            ),
            ("kanji_meta_bank_1.json", json!([["打", "freq", 300]])),
            (
                "tag_bank_1.json",
                json!([["v5", "partOfSpeech", 0, "Godan verb", 0]]),
            ),
        ],
    )
}

/// Run kotoba and parse stdout as JSON
#[allow(dead_code)]
pub fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

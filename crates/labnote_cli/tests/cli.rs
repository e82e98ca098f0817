use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        std::fs::write(
            &config,
            format!(
                "data_path = '{}'\nlog_dir = '{}'\nlog_level = 'info'\n\n[summary]\nendpoint = 'http://127.0.0.1:9/v1/chat/completions'\ntimeout_secs = 2\n",
                dir.path().join("labnote.sqlite3").display(),
                dir.path().join("logs").display()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("labnote").unwrap();
        cmd.env_remove("LABNOTE_DATA").arg("--config").arg(&self.config);
        cmd
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn list_seeds_samples_newest_first() {
    let ws = Workspace::new();
    let output = ws.cmd().arg("list").assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    let newest = stdout.find("exp-005").unwrap();
    let oldest = stdout.find("exp-001").unwrap();
    assert!(newest < oldest);
    assert!(stdout.contains("5 of 5 entries"));
}

#[test]
fn list_filters_by_tag_and_status() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["list", "--tag", "GATK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("exp-002"))
        .stdout(predicate::str::contains("exp-001").not())
        .stdout(predicate::str::contains("1 of 5 entries"));

    ws.cmd()
        .args(["list", "--status", "in-progress", "--grid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[in-progress] Single-Cell ATAC-Seq Clustering"))
        .stdout(predicate::str::contains("2 of 5 entries"));
}

#[test]
fn unknown_status_is_a_usage_error() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["list", "--status", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn add_then_show_renders_body() {
    let ws = Workspace::new();
    let image = ws.write("plot.png", "not really a png");
    ws.cmd()
        .args([
            "add",
            "Hi-C loop calling",
            "--tags",
            "Hi-C, chromatin",
            "--status",
            "in-progress",
            "--body",
            "## Objective\n**Call loops**\n![plot](img-0)",
        ])
        .arg("--image")
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("created exp-006"));

    ws.cmd()
        .args(["show", "exp-006"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tags: Hi-C, chromatin"))
        .stdout(predicate::str::contains("<h3 class=\"md-h3\">Objective</h3>"))
        .stdout(predicate::str::contains("<strong>Call loops</strong>"))
        .stdout(predicate::str::contains("src=\"data:image/png;base64,"));

    ws.cmd()
        .args(["show", "exp-006", "--raw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Call loops**"));
}

#[test]
fn add_rejects_non_html_attachment() {
    let ws = Workspace::new();
    let csv = ws.write("counts.csv", "gene,count\n");
    ws.cmd()
        .args(["add", "Counts"])
        .arg("--attach")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("counts.csv"));
}

#[test]
fn delete_requires_confirmation() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["delete", "exp-003"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    ws.cmd()
        .args(["delete", "exp-003", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deleted exp-003"));

    ws.cmd()
        .args(["show", "exp-003"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry not found: exp-003"));
}

#[test]
fn tags_and_stats_cover_whole_collection() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("tags")
        .assert()
        .success()
        .stdout(predicate::str::contains("AlphaFold2\n"))
        .stdout(predicate::str::contains("variant-calling\n"));

    ws.cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("total: 5"))
        .stdout(predicate::str::contains("complete: 3"))
        .stdout(predicate::str::contains("in-progress: 2"));
}

#[test]
fn api_key_lifecycle_never_prints_the_key() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not configured"));

    ws.cmd()
        .args(["key", "set", "sk-secret-9876"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api key saved"));

    ws.cmd()
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("...9876"))
        .stdout(predicate::str::contains("sk-secret").not());

    ws.cmd()
        .args(["key", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api key cleared"));
}

#[test]
fn summarize_reports_missing_credential() {
    let ws = Workspace::new();
    let report = ws.write(
        "qc.html",
        &format!("<html><body><h1>QC</h1><p>{}</p></body></html>", "aligned reads ".repeat(10)),
    );
    ws.cmd()
        .args(["add", "QC run"])
        .arg("--attach")
        .arg(&report)
        .assert()
        .success();

    ws.cmd()
        .args(["summarize", "exp-006"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn summarize_without_attachments_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["summarize", "exp-001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no attachments"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

// Nothing listens on port 1, so the fetch fails fast and the run still completes.
const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:1/graphql";

fn sync_command(output_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("discussion-archive").expect("Binary exists");
    cmd.current_dir(output_dir)
        .env_remove("G_T")
        .env_remove("GITHUB_TOKEN")
        .env("RUST_LOG", "off")
        .arg("sync")
        .arg("--owner")
        .arg("swiftdd")
        .arg("--name")
        .arg("Synapse")
        .arg("--endpoint")
        .arg(UNREACHABLE_ENDPOINT)
        .arg("--output-dir")
        .arg(output_dir);
    cmd
}

#[test]
fn sync_exits_zero_with_summary_when_fetch_fails() {
    let out = tempdir().unwrap();

    sync_command(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Done. Processed 0 nodes."));

    let readme = fs::read_to_string(out.path().join("README.md")).expect("README.md written");
    assert!(readme.contains("NO_DATA_STREAM"));
    assert!(out.path().join("index.md").is_file());
    assert!(out.path().join("index.html").is_file());
    assert!(out.path().join(".nojekyll").is_file());
    assert!(out.path().join("BACKUP").is_dir());
    assert!(out.path().join("wiki_temp").is_dir());
}

#[test]
fn sync_reads_config_file() {
    let out = tempdir().unwrap();
    let config_path = out.path().join("archive.yaml");
    fs::write(
        &config_path,
        format!(
            "repository:\n  owner: swiftdd\n  name: Synapse\nendpoint: {UNREACHABLE_ENDPOINT}\noutput:\n  dir: {}\nsite:\n  tagline: Field Notes\n  front_matter: false\n",
            out.path().display()
        ),
    )
    .unwrap();

    Command::cargo_bin("discussion-archive")
        .expect("Binary exists")
        .env_remove("G_T")
        .env_remove("GITHUB_TOKEN")
        .env("RUST_LOG", "off")
        .arg("sync")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 0 nodes"));

    let index_md = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index_md.starts_with("# 🌐 Synapse / Field Notes"));
}

#[test]
fn sync_without_repository_uses_default_repository() {
    let out = tempdir().unwrap();

    Command::cargo_bin("discussion-archive")
        .expect("Binary exists")
        .current_dir(out.path())
        .env_remove("G_T")
        .env_remove("GITHUB_TOKEN")
        .env("RUST_LOG", "off")
        .arg("sync")
        .arg("--endpoint")
        .arg(UNREACHABLE_ENDPOINT)
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 0 nodes"));

    let readme = fs::read_to_string(out.path().join("README.md")).unwrap();
    assert!(readme.starts_with("# 🌐 Synapse / Thought Protocol"), "got: {readme}");
}

#[test]
fn sync_rejects_unknown_config_key() {
    let out = tempdir().unwrap();
    let config_path = out.path().join("archive.yaml");
    fs::write(&config_path, "output:\n  backup_directory: archive\n").unwrap();

    Command::cargo_bin("discussion-archive")
        .expect("Binary exists")
        .current_dir(out.path())
        .env("RUST_LOG", "off")
        .arg("sync")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config YAML"));

    assert!(!out.path().join("README.md").exists());
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*; // needed for .with()
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        use std::fmt::Write as FmtWrite;
        let mut msg = String::new();
        let _ = write!(&mut msg, "{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use discussion_archive::cli::{run, Cli, Commands};

    let out = tempdir().unwrap();
    let cli = Cli {
        command: Commands::Sync {
            config: None,
            owner: Some("swiftdd".into()),
            name: Some("Synapse".into()),
            endpoint: Some(UNREACHABLE_ENDPOINT.into()),
            output_dir: Some(out.path().to_path_buf()),
        },
    };

    let result = run(cli).await;
    assert!(result.is_ok(), "fetch failure must not fail the run: {result:?}");

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const SYSTEM_KEY: &str = "integration-system-key";
const PASSPHRASE: &str = "correct-horse-battery";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_laterlock"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::create_dir_all(dir.path().join("c")).expect("config home");
        std::fs::create_dir_all(dir.path().join("d")).expect("data home");
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn config_path(&self) -> PathBuf {
        self.root().join("c").join("laterlock").join("config.toml")
    }

    fn db_path(&self) -> PathBuf {
        self.root().join("d").join("locks.db")
    }

    fn keyfile_path(&self) -> PathBuf {
        self.root().join("c").join("laterlock").join("system.key")
    }

    /// Base command with XDG dirs isolated and no ambient LaterLock env.
    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", self.root().join("c"))
            .env("XDG_DATA_HOME", self.root().join("d"))
            .env("HOME", self.root())
            .env("LATERLOCK_CONFIG", self.config_path())
            .env("LATERLOCK_DB", self.db_path())
            .env_remove("LATERLOCK_SYSTEM_KEY")
            .env_remove("LATERLOCK_PASSPHRASE")
            .env_remove("LATERLOCK_BIND")
            .env("LATERLOCK_LOG", "off")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command()
            .env("LATERLOCK_SYSTEM_KEY", SYSTEM_KEY)
            .args(args)
            .output()
            .expect("run laterlock")
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert_success(&output);
        serde_json::from_slice(&output.stdout).expect("json output")
    }

    fn create(&self, delay: &str, content: &str) -> String {
        let output = self.run(&["--quiet", "create", "--delay", delay, "--content", content]);
        assert_success(&output);
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed: status={:?}\nstdout={}\nstderr={}",
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected status\nstdout={}\nstderr={}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_init_writes_config_keyfile_and_database() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["--plain", "init"])
        .output()
        .expect("run init");
    assert_success(&output);

    let config = std::fs::read_to_string(sandbox.config_path()).expect("config written");
    assert!(config.contains("[storage]"));
    assert!(config.contains("locks.db"));
    assert!(sandbox.keyfile_path().exists());
    assert!(sandbox.db_path().exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(sandbox.keyfile_path())
            .expect("keyfile metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("status=ok"));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.command().args(["init"]).output().expect("init"));
    let key_before = std::fs::read_to_string(sandbox.keyfile_path()).expect("key");

    let again = sandbox.command().args(["init"]).output().expect("init again");
    assert_exit(&again, 4);

    let forced = sandbox
        .command()
        .args(["init", "--force"])
        .output()
        .expect("init --force");
    assert_success(&forced);
    let key_after = std::fs::read_to_string(sandbox.keyfile_path()).expect("key");
    assert_eq!(key_before, key_after);
}

#[test]
fn test_system_key_lock_lifecycle() {
    let sandbox = Sandbox::new();
    let id = sandbox.create("1h", "the wifi password");
    assert!(!id.is_empty());

    let status = sandbox.run_json(&["show", &id]);
    assert_eq!(status["id"], id.as_str());
    assert_eq!(status["state"], "locked");
    assert_eq!(status["delayMinutes"], 60);
    assert_eq!(status["isEncrypted"], false);
    assert_eq!(status["sealMode"], "systemKey");
    assert!(status["accessRequestedAt"].is_null());

    // not requested yet
    assert_exit(&sandbox.run(&["--plain", "view", &id]), 6);

    let receipt = sandbox.run_json(&["request", &id]);
    assert_eq!(receipt["id"], id.as_str());
    assert_eq!(receipt["action"], "request_access");
    assert_eq!(receipt["state"], "pending");
    assert!(receipt["remainingMilliseconds"].as_u64().unwrap_or_default() > 0);

    let refused = sandbox.run(&["--plain", "view", &id]);
    assert_exit(&refused, 6);
    let stderr = String::from_utf8_lossy(&refused.stderr);
    assert!(stderr.contains("error="), "stderr={}", stderr);

    let cancelled = sandbox.run_json(&["cancel", &id]);
    assert_eq!(cancelled["state"], "locked");
    let status = sandbox.run_json(&["show", &id]);
    assert!(status["accessRequestedAt"].is_null());

    let deleted = sandbox.run(&["--plain", "delete", &id, "--yes"]);
    assert_success(&deleted);
    assert_exit(&sandbox.run(&["show", &id]), 3);
}

#[test]
fn test_delete_requires_yes_without_tty() {
    let sandbox = Sandbox::new();
    let id = sandbox.create("5", "keep me");

    assert_exit(&sandbox.run(&["delete", &id]), 4);
    assert_success(&sandbox.run(&["show", &id]));
}

#[test]
fn test_keyfile_from_config_seals_without_env() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.command().args(["init"]).output().expect("init"));

    let output = sandbox
        .command()
        .args(["--quiet", "create", "-d", "10", "--content", "from keyfile"])
        .output()
        .expect("create");
    assert_success(&output);
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let status = sandbox
        .command()
        .args(["--json", "show", &id])
        .output()
        .expect("show");
    assert_success(&status);
    let status: Value = serde_json::from_slice(&status.stdout).expect("json");
    assert_eq!(status["sealMode"], "systemKey");
}

#[test]
fn test_create_without_key_or_passphrase_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["create", "-d", "10", "--content", "nowhere to go"])
        .output()
        .expect("create");
    assert_exit(&output, 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("System key is not configured"), "stderr={}", stderr);
}

#[test]
fn test_invalid_delay_and_id_are_rejected() {
    let sandbox = Sandbox::new();
    assert_exit(
        &sandbox.run(&["create", "--delay", "0", "--content", "x"]),
        4,
    );
    assert_exit(
        &sandbox.run(&["create", "--delay", "soon", "--content", "x"]),
        4,
    );
    assert_exit(&sandbox.run(&["show", "not a valid id!"]), 4);
}

#[test]
fn test_unknown_lock_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.create("5", "seed");
    assert_exit(&sandbox.run(&["show", "doesNotExist123"]), 3);
    assert_exit(&sandbox.run(&["request", "doesNotExist123"]), 3);
}

#[test]
fn test_passphrase_lock_is_sealed_locally() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .env("LATERLOCK_PASSPHRASE", PASSPHRASE)
        .args([
            "--quiet",
            "create",
            "--passphrase",
            "-d",
            "1",
            "--title",
            "diary",
            "--content",
            "dear diary",
        ])
        .output()
        .expect("create");
    assert_success(&output);
    let id = String::from_utf8_lossy(&output.stdout).trim().to_string();

    let status = sandbox.run_json(&["show", &id]);
    assert_eq!(status["isEncrypted"], true);
    assert_eq!(status["sealMode"], "passphrase");
    assert_eq!(status["title"], "diary");

    let receipt = sandbox.run_json(&["request", &id]);
    assert_eq!(receipt["state"], "pending");

    // one-minute wait still running
    let view = sandbox
        .command()
        .env("LATERLOCK_PASSPHRASE", PASSPHRASE)
        .args(["view", &id])
        .output()
        .expect("view");
    assert_exit(&view, 6);
}

#[test]
fn test_short_passphrase_is_rejected() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .env("LATERLOCK_PASSPHRASE", "short")
        .args(["create", "--passphrase", "-d", "5", "--content", "x"])
        .output()
        .expect("create");
    assert_exit(&output, 4);
}

#[test]
fn test_completions_generate_script() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .command()
        .args(["completions", "bash"])
        .output()
        .expect("completions");
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("laterlock"));
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const PACKAGES: &str = "\
Package: A
Version: 1.0
Depends: B, C

Package: B
Version: 1.0
Depends: C (>= 1.0)

Package: C
Version: 1.0

Package: app
Version: 2.0-1
Depends: libfoo1 (>= 1.0), libfoo-common | libfoo-data, ghost

Package: libfoo1
Source: foo (1.0-1)
Version: 1.0-1+b1
Depends: libfoo-common, app

Package: libfoo-common
Source: foo
Version: 1.0-1

Package: broken
Source: broken-src
Depends: broken-dep
";

/// Records each requested source spec in `<dest>/fetched.log`; `broken-src`
/// fails with status 7.
const FAKE_FETCH: &str =
    "if [ \"$0\" = broken-src ]; then exit 7; fi; echo \"$0\" >> ../fetched.log";

struct TestRepo {
    root: PathBuf,
}

impl TestRepo {
    fn new() -> Self {
        Self::with_fetch_script(FAKE_FETCH)
    }

    fn with_fetch_script(script: &str) -> Self {
        let root = unique_temp_dir("source");
        fs::create_dir_all(&root).expect("create temp root");
        fs::write(root.join("Packages"), PACKAGES).expect("write Packages index");
        fs::write(
            root.join(".aptdeps.toml"),
            format!(
                "[metadata]\npackages_file = {packages:?}\n\n[fetch]\ncommand = [\"sh\", \"-c\", {script:?}]\ndest = {dest:?}\n",
                packages = path_str(&root.join("Packages")),
                script = script,
                dest = path_str(&root.join("out")),
            ),
        )
        .expect("write .aptdeps.toml");
        Self { root }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(aptdeps_bin());
        command
            .current_dir(&self.root)
            .env_remove("APTDEPS_CONFIG")
            .env_remove("APTDEPS_PACKAGES_FILE")
            .env_remove("APTDEPS_FETCH_DEST")
            .env_remove("RUST_LOG")
            .arg("--no-color")
            .args(args);
        command
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("run aptdeps")
    }

    fn fetched(&self) -> Vec<String> {
        fs::read_to_string(self.root.join("out").join("fetched.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Drop for TestRepo {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn path_str(path: &Path) -> String {
    path.to_str().expect("utf-8 temp path").to_string()
}

fn aptdeps_bin() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_aptdeps") {
        return PathBuf::from(path);
    }

    let current_exe = std::env::current_exe().expect("resolve current test binary path");
    let target_dir = current_exe
        .parent()
        .and_then(|path| path.parent())
        .expect("derive cargo target dir from test binary path");
    let bin_name = if cfg!(windows) {
        "aptdeps.exe"
    } else {
        "aptdeps"
    };
    let fallback = target_dir.join(bin_name);

    if fallback.is_file() {
        fallback
    } else {
        panic!(
            "CARGO_BIN_EXE_aptdeps is not set and fallback binary not found at {}",
            fallback.display()
        );
    }
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("aptdeps-{prefix}-{pid}-{nanos}"))
}

fn assert_success(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "aptdeps failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
    );
}

#[cfg(unix)]
#[test]
fn fetches_each_source_group_once_per_package() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--yes", "app"]);
    assert_success(&output);

    assert_eq!(repo.fetched(), vec!["app", "foo"]);
    assert!(repo.root.join("out").join("foo").is_dir());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Package: app\n  app\n  foo\n");
}

#[cfg(unix)]
#[test]
fn groups_fetched_earlier_in_the_batch_are_skipped() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--yes", "app", "libfoo1", "A"]);
    assert_success(&output);

    assert_eq!(repo.fetched(), vec!["app", "foo", "A", "B", "C"]);
}

#[cfg(unix)]
#[test]
fn fetch_failure_stops_the_batch_with_its_exit_code() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--yes", "broken", "A"]);

    assert_eq!(output.status.code(), Some(7));
    assert!(repo.fetched().is_empty());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Package: A"), "stdout:\n{stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to fetch source package 'broken-src'"),
        "stderr:\n{stderr}"
    );
}

#[cfg(unix)]
#[test]
fn no_deps_fetches_only_the_packages_own_group() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--yes", "--no-deps", "libfoo1"]);
    assert_success(&output);

    assert_eq!(repo.fetched(), vec!["foo"]);
}

#[test]
fn dry_run_reports_pinned_specs_without_fetching() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--dry-run", "--pin-versions", "app"]);
    assert_success(&output);

    assert!(repo.fetched().is_empty());
    assert!(!repo.root.join("out").exists());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("would download app=2.0-1"), "stderr:\n{stderr}");
    assert!(stderr.contains("would download foo=1.0-1"), "stderr:\n{stderr}");
}

#[test]
fn unknown_package_yields_nothing_to_fetch() {
    let repo = TestRepo::new();
    let output = repo.run(&["source", "--dry-run", "nothing-here"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Package: nothing-here\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid package name 'nothing-here'"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn quiet_suppresses_fetch_status_lines() {
    let repo = TestRepo::new();
    let output = repo.run(&["-q", "source", "--dry-run", "app"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Package: app\n  app\n  foo\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("would download"), "stderr:\n{stderr}");
}

#[cfg(unix)]
#[test]
fn ctrl_c_finishes_the_running_unit_and_stops_the_batch() {
    let repo = TestRepo::with_fetch_script("sleep 2; echo \"$0\" >> ../fetched.log");
    let child = repo
        .command(&["source", "--yes", "C", "B"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn aptdeps");

    thread::sleep(Duration::from_millis(700));
    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(status.success());

    let output = child.wait_with_output().expect("wait for aptdeps");
    assert_eq!(output.status.code(), Some(130));
    assert_eq!(repo.fetched(), vec!["C"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Package: C\n  C\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("interrupted"), "stderr:\n{stderr}");
}

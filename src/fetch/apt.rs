use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::fetch::{source_spec, FetchError, Fetcher};

/// Downloads source packages with `apt-get source`, each into its own
/// `<dest>/<group>/` directory.
pub struct AptSourceFetcher {
    command: Vec<String>,
    dest: PathBuf,
}

impl AptSourceFetcher {
    pub fn new(command: Vec<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            command,
            dest: dest.into(),
        }
    }
}

impl Fetcher for AptSourceFetcher {
    fn materialize(&self, group: &str, version: Option<&str>) -> Result<(), FetchError> {
        let spec = source_spec(group, version);
        let command_line = format!("{} {}", self.command.join(" "), spec);
        let (program, args) = self.command.split_first().ok_or_else(|| FetchError::Failed {
            command: command_line.clone(),
            code: None,
        })?;

        let dir = self.dest.join(group);
        std::fs::create_dir_all(&dir).map_err(|source| FetchError::Destination {
            path: dir.clone(),
            source,
        })?;

        debug!(command = %command_line, dir = %dir.display(), "fetching source package");
        let status = Command::new(program)
            .args(args)
            .arg(&spec)
            .current_dir(&dir)
            .status()
            .map_err(|source| FetchError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(FetchError::Failed {
                command: command_line,
                code: status.code(),
            })
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::fetch::apt::AptSourceFetcher;
    use crate::fetch::{FetchError, Fetcher};

    fn unique_temp_dir(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock before epoch")
            .as_nanos();
        let pid = std::process::id();
        std::env::temp_dir().join(format!("aptdeps-{prefix}-{pid}-{nanos}"))
    }

    #[test]
    fn runs_command_inside_group_directory() {
        let root = unique_temp_dir("fetch-ok");
        let fetcher = AptSourceFetcher::new(
            vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo \"$0\" > fetched.txt".to_string(),
            ],
            &root,
        );

        fetcher
            .materialize("coreutils", Some("9.4-3"))
            .expect("fetch coreutils");
        let written =
            fs::read_to_string(root.join("coreutils").join("fetched.txt")).expect("marker file");
        assert_eq!(written.trim(), "coreutils=9.4-3");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn non_zero_exit_is_reported_with_code() {
        let root = unique_temp_dir("fetch-fail");
        let fetcher = AptSourceFetcher::new(
            vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()],
            &root,
        );

        let err = fetcher.materialize("broken", None).expect_err("fetch fails");
        assert!(matches!(err, FetchError::Failed { code: Some(3), .. }));

        let _ = fs::remove_dir_all(root);
    }
}

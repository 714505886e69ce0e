//! Appends each notification to a local log file as `"<timestamp>: <message>"`.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::traits::{Notification, Notifier, NotifyError};

#[derive(Debug, Clone)]
pub struct LogFileNotifier {
    path: PathBuf,
}

impl LogFileNotifier {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl Notifier for LogFileNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        let line = format!("{}: {}\n", Utc::now().to_rfc3339(), notification.message);
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "logfile"
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn appends_lines_and_creates_dirs() {
        let dir = TempDir::new().expect("create tempdir");
        let path = dir.path().join("logs").join("notifications.log");
        let notifier = LogFileNotifier::new(&path);

        for message in ["first", "second"] {
            notifier
                .send(&Notification {
                    title: "Court Slot Available!".into(),
                    message: message.into(),
                })
                .await
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(": first"));
        assert!(lines[1].ends_with(": second"));
    }

    #[tokio::test]
    async fn unwritable_path_is_io_error() {
        let dir = TempDir::new().expect("create tempdir");
        // A directory cannot be opened for append.
        let notifier = LogFileNotifier::new(dir.path());
        let result = notifier
            .send(&Notification {
                title: "t".into(),
                message: "m".into(),
            })
            .await;
        assert!(matches!(result, Err(NotifyError::Io(_))));
    }
}

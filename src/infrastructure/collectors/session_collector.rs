use std::process::Command;

use chrono::NaiveDateTime;

use crate::domain::entities::UserSession;
use crate::domain::ports::metric_source::CollectionError;

const WHO_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Lists logged-in user sessions by running `who`.
pub struct SessionCollector;

impl SessionCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// Returns `CollectionError::MetricsUnavailable` if `who` fails to execute
    /// or exits with a non-zero status.
    /// Returns `Ok(Vec::new())` if `who` is not found on the system.
    pub fn collect(&self) -> Result<Vec<UserSession>, CollectionError> {
        let output = match Command::new("who").output() {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(CollectionError::PermissionDenied(format!(
                    "failed to run who: {e}"
                )))
            }
            Err(e) => {
                return Err(CollectionError::MetricsUnavailable(format!(
                    "failed to run who: {e}"
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollectionError::MetricsUnavailable(format!(
                "who exited with {}: {stderr}",
                output.status
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_who_output(&stdout))
    }
}

impl Default for SessionCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_who_line(line: &str) -> Option<UserSession> {
    let mut tokens = line.split_whitespace();
    let name = tokens.next()?.to_string();
    let terminal = tokens.next()?.to_string();
    let rest: Vec<&str> = tokens.collect();

    let started = match rest.as_slice() {
        [date, time, ..] => {
            NaiveDateTime::parse_from_str(&format!("{date} {time}"), WHO_TIME_FORMAT).ok()
        }
        _ => None,
    };

    let host = rest
        .last()
        .and_then(|t| t.strip_prefix('('))
        .and_then(|t| t.strip_suffix(')'))
        .filter(|h| !h.is_empty())
        .map(str::to_string);

    Some(UserSession {
        name,
        terminal,
        host,
        started,
    })
}

fn parse_who_output(stdout: &str) -> Vec<UserSession> {
    stdout.lines().filter_map(parse_who_line).collect()
}

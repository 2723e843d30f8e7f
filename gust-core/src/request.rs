//! Request correlation
//!
//! Every background operation started by a page is stamped with a
//! [`RequestId`] minted from that page's own [`RequestSeq`]. Completions are
//! delivered to every page; a page applies one only when its
//! [`RequestTracker`] is waiting for exactly that id, so late results from
//! superseded runs fall through as no-ops.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures::FutureExt;

use crate::executor::CommandOutput;

/// Opaque token such as `build-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Strictly increasing id source scoped to one owner.
#[derive(Debug, Clone)]
pub struct RequestSeq {
    prefix: &'static str,
    last: u64,
}

impl RequestSeq {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, last: 0 }
    }

    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(format!("{}-{}", self.prefix, self.last))
    }
}

/// Completion of one correlated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub request_id: RequestId,
    pub output: String,
    pub exit_code: i32,
    pub duration: Duration,
}

impl CommandResult {
    pub fn new(request_id: RequestId, output: CommandOutput) -> Self {
        Self {
            request_id,
            output: output.output,
            exit_code: output.exit_code,
            duration: output.duration,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Stamp the eventual output of `fut` with `id`.
pub fn with_request_id<F>(id: RequestId, fut: F) -> impl Future<Output = CommandResult>
where
    F: Future<Output = CommandOutput>,
{
    fut.map(move |output| CommandResult::new(id, output))
}

/// Bookkeeping for one operation kind on one page.
///
/// Holds the id sequence and the id currently awaited, if any.
#[derive(Debug, Clone)]
pub struct RequestTracker {
    seq: RequestSeq,
    awaiting: Option<RequestId>,
}

impl RequestTracker {
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            seq: RequestSeq::new(prefix),
            awaiting: None,
        }
    }

    /// Mint a fresh id and wait for it, orphaning any previous one.
    pub fn begin(&mut self) -> RequestId {
        let id = self.seq.next_id();
        if let Some(previous) = self.awaiting.replace(id.clone()) {
            log::debug!("{previous} superseded by {id}");
        }
        id
    }

    pub fn is_waiting(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn awaiting(&self) -> Option<&RequestId> {
        self.awaiting.as_ref()
    }

    /// Accept `result` if it is the awaited one, clearing the wait.
    ///
    /// Returns `false` and changes nothing for any other result.
    pub fn complete(&mut self, result: &CommandResult) -> bool {
        match &self.awaiting {
            Some(id) if *id == result.request_id => {
                self.awaiting = None;
                true
            }
            _ => {
                log::trace!("ignoring result {}", result.request_id);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, exit_code: i32) -> CommandResult {
        CommandResult {
            request_id: RequestId::from(id),
            output: String::new(),
            exit_code,
            duration: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_seq_is_prefixed_and_monotonic() {
        let mut seq = RequestSeq::new("build");
        let first = seq.next_id();
        let second = seq.next_id();

        assert_eq!(first.as_str(), "build-1");
        assert_eq!(second.as_str(), "build-2");
        assert_ne!(first, second);
        for _ in 0..50 {
            let id = seq.next_id();
            assert_ne!(id, first);
            assert_ne!(id, second);
        }
    }

    #[test]
    fn test_idle_tracker_ignores_everything() {
        let mut tracker = RequestTracker::new("flash");
        assert!(!tracker.is_waiting());
        assert!(!tracker.complete(&result("flash-1", 0)));
    }

    #[test]
    fn test_supersession_only_latest_completes() {
        let mut tracker = RequestTracker::new("build");
        let a = tracker.begin();
        let b = tracker.begin();
        assert_eq!(a.as_str(), "build-1");
        assert_eq!(b.as_str(), "build-2");

        assert!(!tracker.complete(&result("build-1", 0)));
        assert_eq!(tracker.awaiting(), Some(&b));

        assert!(tracker.complete(&result("build-2", 0)));
        assert!(!tracker.is_waiting());

        // A duplicate delivery after completion is dropped.
        assert!(!tracker.complete(&result("build-2", 0)));
    }

    #[test]
    fn test_foreign_prefix_is_ignored() {
        let mut tracker = RequestTracker::new("test");
        tracker.begin();
        assert!(!tracker.complete(&result("build-1", 0)));
        assert!(tracker.is_waiting());
    }

    #[test]
    fn test_with_request_id_stamps_output() {
        let output = CommandOutput {
            output: "ok\n".to_string(),
            exit_code: 0,
            duration: Duration::from_secs(1),
        };
        let stamped = futures::executor::block_on(with_request_id(
            RequestId::from("west-7"),
            futures::future::ready(output),
        ));

        assert_eq!(stamped.request_id.as_str(), "west-7");
        assert_eq!(stamped.output, "ok\n");
        assert!(stamped.success());
    }
}

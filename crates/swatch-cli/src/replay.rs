//! Replaying recorded picker input through the debouncer.
//!
//! An events file is a JSON array. Each entry happens `at_ms` after the
//! start and is either an input or a store action:
//!
//! ```json
//! [
//!   { "at_ms": 0,  "category": "primary", "color": "#aa0000" },
//!   { "at_ms": 10, "category": "primary", "color": "#cc3366" },
//!   { "at_ms": 200, "action": { "type": "RESET" } }
//! ]
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swatch_core::{Action, CategoryId, Clock, ManualClock, Session};
use swatch_env::StyleHost;
use tracing::{debug, info};

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayEvent {
    /// Milliseconds since the start of the recording.
    #[serde(default)]
    pub at_ms: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventKind {
    /// Intermediate picker value.
    Input { category: CategoryId, color: String },
    /// Store action. `RESET` also restores the environment.
    Dispatch { action: Action },
}

/// A commit that happened during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayCommit {
    pub at_ms: u64,
    pub category: CategoryId,
}

/// Read an events file.
pub fn load_events(path: &Path) -> Result<Vec<ReplayEvent>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read events {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parse events {}", path.display()))
}

/// Feed `events` to `session` on a manual clock and flush pending commits
/// at the end. Events are applied in time order, and each commit is recorded
/// at the moment it became due.
pub fn replay<H: StyleHost>(
    session: &mut Session<H>,
    events: &[ReplayEvent],
) -> Result<Vec<ReplayCommit>> {
    let mut ordered: Vec<&ReplayEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.at_ms);

    let clock = ManualClock::new();
    let mut commits = Vec::new();
    for event in ordered {
        let at = Duration::from_millis(event.at_ms);
        flush_until(session, &clock, at, &mut commits)?;
        clock.set_elapsed(at);
        match &event.kind {
            EventKind::Input { category, color } => {
                debug!(at_ms = event.at_ms, %category, %color, "input");
                session
                    .input(category.as_str(), color, clock.now())
                    .with_context(|| format!("input at {} ms", event.at_ms))?;
            }
            EventKind::Dispatch {
                action: Action::Reset,
            } => {
                session.reset().context("reset")?;
            }
            EventKind::Dispatch { action } => {
                session.dispatch(action);
            }
        }
    }

    flush_until(session, &clock, Duration::MAX, &mut commits)?;
    Ok(commits)
}

/// Step the clock through every commit that falls due by `until`.
fn flush_until<H: StyleHost>(
    session: &mut Session<H>,
    clock: &ManualClock,
    until: Duration,
    commits: &mut Vec<ReplayCommit>,
) -> Result<()> {
    while let Some(due) = session.next_due() {
        let due_at = clock.elapsed() + due.saturating_duration_since(clock.now());
        if due_at > until {
            break;
        }
        clock.set_elapsed(due_at);
        flush(session, clock, commits)?;
    }
    Ok(())
}

fn flush<H: StyleHost>(
    session: &mut Session<H>,
    clock: &ManualClock,
    commits: &mut Vec<ReplayCommit>,
) -> Result<()> {
    let at_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
    for category in session.tick(clock.now())? {
        info!(at_ms, %category, "committed");
        commits.push(ReplayCommit { at_ms, category });
    }
    Ok(())
}

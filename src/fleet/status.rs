// src/fleet/status.rs

//! Live per-target status rendering.
//!
//! Multiple targets execute concurrently but share one terminal, so all
//! terminal writes are serialized behind a single lock and each target's
//! status line is re-rendered in place, addressed by the target's position
//! in the original ordered target set.
//!
//! When stderr is not a terminal, in-place rendering degrades to
//! structured per-target log lines. This is a UX concern only; no
//! correctness depends on it.

use std::io::{IsTerminal, Stderr, Write};
use std::sync::Mutex;

use tracing::info;

const MAX_STATUS_WIDTH: usize = 100;

pub struct StatusBoard {
    names: Vec<String>,
    interactive: bool,
    inner: Mutex<BoardInner>,
}

struct BoardInner {
    states: Vec<String>,
    out: Stderr,
}

impl StatusBoard {
    pub fn new(names: Vec<String>) -> Self {
        let interactive = std::io::stderr().is_terminal();
        Self::with_interactive(names, interactive)
    }

    /// Explicit mode selection, used by tests and non-interactive callers.
    pub fn with_interactive(names: Vec<String>, interactive: bool) -> Self {
        let states = vec!["waiting".to_string(); names.len()];
        let board = Self {
            names,
            interactive,
            inner: Mutex::new(BoardInner {
                states,
                out: std::io::stderr(),
            }),
        };
        if board.interactive {
            board.draw_initial();
        }
        board
    }

    pub fn interactive(&self) -> bool {
        self.interactive
    }

    pub fn state(&self, index: usize) -> Option<String> {
        let inner = self.inner.lock().ok()?;
        inner.states.get(index).cloned()
    }

    /// Update one target's status line.
    pub fn set(&self, index: usize, state: &str) {
        if index >= self.names.len() {
            return;
        }

        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.states[index] = state.to_string();

        if self.interactive {
            // Cursor is parked below the block of status lines; move up to
            // this target's line, rewrite it, move back.
            let up = self.names.len() - index;
            let line = format!("{}: {}", self.names[index], truncate(state, MAX_STATUS_WIDTH));
            let _ = write!(inner.out, "\x1b[{up}A\r\x1b[2K{line}\x1b[{up}B\r");
            let _ = inner.out.flush();
        } else {
            info!(name = %self.names[index], state = %state, "target status");
        }
    }

    fn draw_initial(&self) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        for (name, state) in self.names.iter().zip(inner.states.clone()) {
            let _ = writeln!(inner.out, "{name}: {state}");
        }
        let _ = inner.out.flush();
    }
}

/// Truncate to at most `max` characters, on a char boundary.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_state() {
        let board = StatusBoard::with_interactive(
            vec!["a".to_string(), "b".to_string()],
            false,
        );
        board.set(1, "running");
        assert_eq!(board.state(0).as_deref(), Some("waiting"));
        assert_eq!(board.state(1).as_deref(), Some("running"));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let board = StatusBoard::with_interactive(vec!["a".to_string()], false);
        board.set(5, "running");
        assert_eq!(board.state(0).as_deref(), Some("waiting"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }
}

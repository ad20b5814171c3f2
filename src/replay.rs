//! Offline replay of recorded push-channel traffic through the panel core.
//!
//! Input is one frame per line, as captured off the socket. Blank lines and
//! `#` comments are skipped. Two directives stand in for host events:
//! `@unload` and `@attach [subscription-id]`.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use std::io::BufRead;

use tracing::{debug, warn};

use crate::net::panel_client::Panel;
use crate::state::properties::PanelState;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: frames::CodecError,
    },
    #[error("line {line}: unknown directive `{directive}`")]
    UnknownDirective { line: usize, directive: String },
}

/// Replay options.
#[derive(Clone, Debug, Default)]
pub struct ReplayOptions {
    /// Subscription id the panel starts attached to; `None` accepts any id.
    pub subscription_id: Option<String>,
    /// Fail on the first undecodable line instead of skipping it.
    pub strict: bool,
}

/// One panel state committed during a replay.
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// 1-based input line that produced the state.
    pub line: usize,
    pub state: PanelState,
}

/// Replay every line of `reader`, returning each committed state in order.
///
/// # Errors
///
/// Returns [`ReplayError::Io`] on read failure, [`ReplayError::UnknownDirective`]
/// for an unrecognized `@` line, and [`ReplayError::Decode`] for a malformed
/// frame when `strict` is set.
pub fn replay<R: BufRead>(reader: R, options: &ReplayOptions) -> Result<Vec<Step>, ReplayError> {
    let mut panel = Panel::new();
    panel.attach(options.subscription_id.clone());

    let mut steps = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let applied = if let Some(directive) = trimmed.strip_prefix('@') {
            apply_directive(&mut panel, directive, line_no)?;
            true
        } else {
            match frames::decode_frame(trimmed) {
                Ok(frame) => panel.apply(&frame),
                Err(source) if options.strict => return Err(ReplayError::Decode { line: line_no, source }),
                Err(e) => {
                    warn!(line = line_no, error = %e, "skipping undecodable line");
                    false
                }
            }
        };

        if applied {
            steps.push(Step { line: line_no, state: panel.state().clone() });
        }
    }
    debug!(steps = steps.len(), "replay finished");
    Ok(steps)
}

fn apply_directive(panel: &mut Panel, directive: &str, line: usize) -> Result<(), ReplayError> {
    let mut parts = directive.split_whitespace();
    match parts.next() {
        Some("unload") => panel.unload(),
        Some("attach") => panel.attach(parts.next().map(str::to_owned)),
        other => {
            return Err(ReplayError::UnknownDirective { line, directive: other.unwrap_or_default().to_owned() });
        }
    }
    Ok(())
}

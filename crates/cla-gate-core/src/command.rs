//! Slash commands recognised in PR comments.
//!
//! A comment is a command only when its whole body is the command, ignoring
//! ASCII case and surrounding whitespace. `/check-cla please` is not a
//! command.

use std::sync::LazyLock;

use regex::Regex;

static CHECK_CLA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*/check-cla\s*$").expect("valid regex"));

static CANCEL_CLA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*/cla cancel\s*$").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaCommand {
    /// `/check-cla`: re-run the evaluation.
    CheckCla,
    /// `/cla cancel`: withdraw the signed label.
    CancelCla,
}

impl ClaCommand {
    pub fn parse(comment: &str) -> Option<Self> {
        if CHECK_CLA.is_match(comment) {
            Some(ClaCommand::CheckCla)
        } else if CANCEL_CLA.is_match(comment) {
            Some(ClaCommand::CancelCla)
        } else {
            None
        }
    }
}

/*============================================================
  Synavera Project: Apti
  Module: apti::prompt
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Ask the operator to confirm a rendered plan before aptitude
    is re-invoked for real.

  Security / Safety Notes:
    Reads keys from the controlling terminal only; without a
    terminal the plan is refused, never assumed.

  Dependencies:
    dialoguer for the interactive yes/no prompt.

  Operational Scope:
    Called after a plan renders; the answer gates execution.

  Revision History:
    2025-11-12 COD  Authored confirmation prompt.
    2025-11-19 COD  Moved onto dialoguer's Confirm.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults (empty answer confirms)
    - EOF and missing terminals are treated as refusal
============================================================*/

use std::io;

use dialoguer::Confirm;

use crate::error::{AptiError, Result};

/// Ask `question` until the answer is `y` or `n`; Enter alone means yes.
///
/// `question` already carries its `(Y/n)` hint, so dialoguer's own
/// default marker is hidden.
pub fn confirm(question: &str) -> Result<bool> {
    let outcome = Confirm::new()
        .with_prompt(question)
        .default(true)
        .show_default(false)
        .wait_for_newline(true)
        .interact_opt();
    decide(outcome)
}

/// Turn a prompt outcome into a decision.
///
/// An escaped prompt, closed input, or missing terminal all refuse.
fn decide(outcome: std::result::Result<Option<bool>, dialoguer::Error>) -> Result<bool> {
    match outcome {
        Ok(answer) => Ok(answer.unwrap_or(false)),
        Err(dialoguer::Error::IO(err)) => match err.kind() {
            io::ErrorKind::NotConnected | io::ErrorKind::UnexpectedEof => Ok(false),
            _ => Err(AptiError::Io(err)),
        },
    }
}

//! Submission gate: decides whether the inputs allow a request at all.
//! Pure; consulted before every submit, including retries after a failure.

use thiserror::Error;

use crate::session::inputs::{Document, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Please upload a resume first")]
    MissingDocument,

    #[error("Please select a target role")]
    MissingRole,
}

/// Checks the inputs, document first, and hands back the validated pair.
pub fn check<'a>(
    document: Option<&'a Document>,
    role: Option<&'a Role>,
) -> Result<(&'a Document, &'a Role), GateError> {
    let document = document.ok_or(GateError::MissingDocument)?;
    match role {
        Some(role) if !role.is_blank() => Ok((document, role)),
        _ => Err(GateError::MissingRole),
    }
}

pub fn can_submit(document: Option<&Document>, role: Option<&Role>) -> bool {
    check(document, role).is_ok()
}

//! Script standard negotiation
//!
//! Decides whether a script's declared standard (`"<version> <usage>"` at
//! `$.pppm` in its meta comment) can be run by an engine compatible with a
//! given standard version.
//!
//! [`negotiate`] returns the failure reason as a value; callers wanting
//! strict behavior propagate it with `?`, permissive callers use
//! [`is_script_compatible`].

use crate::COMPATIBLE_SCRIPT_STANDARD;
use crate::error::{IncompatibilityReason, IncompatibleScriptError};
use crate::meta::MetaDocument;
use pppm_schema::{ScriptRequirement, ScriptUsage, Version};

/// Metadata path of the standard declaration.
pub const STANDARD_PATH: &str = "$.pppm";

/// Negotiate against [`COMPATIBLE_SCRIPT_STANDARD`].
///
/// # Errors
///
/// Returns [`IncompatibleScriptError`] with the first failing check.
pub fn negotiate(
    meta: &MetaDocument,
    target_usage: ScriptUsage,
) -> Result<ScriptRequirement, IncompatibleScriptError> {
    negotiate_with(meta, target_usage, COMPATIBLE_SCRIPT_STANDARD)
}

/// Negotiate a script's declared standard against `compatible`.
///
/// Checks run in order and stop at the first failure:
/// 1. the standard string exists
/// 2. it has a version token and a usage token
/// 3. the usage token is a known usage
/// 4. the usage matches `target_usage`
/// 5. the version token parses
/// 6. `compatible` is strictly greater than the required version and has the same major
///
/// Step 6 rejects a script requiring exactly the compatible standard.
///
/// # Errors
///
/// Returns [`IncompatibleScriptError`] with the first failing check.
pub fn negotiate_with(
    meta: &MetaDocument,
    target_usage: ScriptUsage,
    compatible: Version,
) -> Result<ScriptRequirement, IncompatibleScriptError> {
    let Some(declared) = meta.get_str(STANDARD_PATH) else {
        return Err(IncompatibleScriptError::new(
            IncompatibilityReason::StandardUndeterminable,
            "Couldn't determine the required pppm script standard of the script",
        ));
    };

    let invalid_syntax = || {
        IncompatibleScriptError::new(
            IncompatibilityReason::InvalidSyntax,
            format!(
                "Invalid syntax while determining the required pppm standard of a script\n({declared})"
            ),
        )
    };

    let mut tokens = declared.split_whitespace();
    let (Some(version_token), Some(usage_token)) = (tokens.next(), tokens.next()) else {
        return Err(invalid_syntax());
    };

    let usage: ScriptUsage = usage_token.parse().map_err(|_| {
        IncompatibleScriptError::new(
            IncompatibilityReason::InvalidUsage,
            format!("Specified usage of pppm script is invalid\n({declared})"),
        )
    })?;

    if usage != target_usage {
        return Err(IncompatibleScriptError::new(
            IncompatibilityReason::UsageMismatch {
                specified: usage,
                expected: target_usage,
            },
            format!(
                "Wrong usage is specified for a pppm script\n(specified: {usage}, expected: {target_usage})"
            ),
        ));
    }

    let required = Version::parse(version_token).map_err(|_| invalid_syntax())?;

    if compatible <= required || compatible.major != required.major {
        return Err(IncompatibleScriptError::new(
            IncompatibilityReason::UnsupportedStandard {
                compatible,
                required,
            },
            format!(
                "Trying to use a script incompatible with the current script standard of pppm.\n(pppm {} is compatible with {compatible}, but script requires {required})",
                crate::ENGINE_VERSION
            ),
        ));
    }

    Ok(ScriptRequirement::new(required, usage))
}

/// Permissive check against [`COMPATIBLE_SCRIPT_STANDARD`].
pub fn is_script_compatible(meta: &MetaDocument, target_usage: ScriptUsage) -> bool {
    negotiate(meta, target_usage).is_ok()
}

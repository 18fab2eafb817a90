//! Response validation against a scenario's expectations
//!
//! Checks run in a fixed order (status, then headers, then JSON paths) and
//! stop at the first mismatch.

use super::store::{LastResponse, RunContext};
use crate::errors::StageError;
use crate::jsonpath;
use crate::scenario::Expectations;

/// Validate the last response of `ctx` against `expect`
pub fn validate_response(expect: &Expectations, ctx: &RunContext) -> Result<(), StageError> {
    let response = ctx.last_response.as_ref().ok_or(StageError::NoResponseToValidate)?;

    if let Some(expected) = expect.status {
        check_status(response, expected)?;
    }

    for (name, expected) in &expect.headers {
        check_header(response, name, expected)?;
    }

    for (path, expected) in &expect.json {
        check_json(response, path, &jsonpath::value_text(expected))?;
    }

    Ok(())
}

fn check_status(response: &LastResponse, expected: u16) -> Result<(), StageError> {
    if response.status != expected {
        return Err(StageError::UnexpectedStatusCode {
            expected,
            actual: response.status,
        });
    }
    Ok(())
}

fn check_header(response: &LastResponse, name: &str, expected: &str) -> Result<(), StageError> {
    let actual = response.header(name).ok_or_else(|| StageError::HeaderNotFound {
        header: name.to_string(),
    })?;

    if actual != expected {
        return Err(StageError::HeaderNotEqual {
            header: name.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Compares by string form, so `"1"` and `1` are equal
///
/// Fractional numbers also match by value: `1.50` in a response equals an
/// expected `1.5`. Integers compare as written.
fn check_json(response: &LastResponse, path: &str, expected: &str) -> Result<(), StageError> {
    let found = jsonpath::get(&response.body, path).ok_or_else(|| StageError::JsonPathNotFound {
        path: path.to_string(),
    })?;

    let actual = found.text();
    if actual != expected && !(found.is_fractional_number() && same_number(&actual, expected)) {
        return Err(StageError::JsonPathNotEqual {
            path: path.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

fn same_number(actual: &str, expected: &str) -> bool {
    match (actual.parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(e)) => a == e,
        _ => false,
    }
}

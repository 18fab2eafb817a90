//! `${name}` placeholder substitution against the run store

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use super::store::Store;
use crate::jsonpath::value_text;
use crate::scenario::Scenario;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// Replace every `${key}` with the stored value for `key`
///
/// Unknown keys leave the placeholder untouched. Substitution is a single
/// left-to-right pass, so values containing `${...}` are not expanded again.
pub fn interpolate(text: &str, store: &Store) -> String {
    interpolate_cow(text, store).into_owned()
}

fn interpolate_cow<'t>(text: &'t str, store: &Store) -> Cow<'t, str> {
    PLACEHOLDER_RE.replace_all(text, |caps: &Captures| match store.get(&caps[1]) {
        Some(value) => value.to_string(),
        None => caps[0].to_string(),
    })
}

/// Rewrite every substitutable field of `scenario` in place
///
/// Covers the request URL, body and header values, the command and its
/// working directory, expected header values and expected JSON values. JSON
/// expectations become strings since they are compared by string form.
pub fn substitute_scenario(scenario: &mut Scenario, store: &Store) {
    if let Some(request) = scenario.request.as_mut() {
        request.url = interpolate(&request.url, store);
        if let Some(body) = request.body.as_mut() {
            *body = interpolate(body, store);
        }
        for value in request.headers.values_mut() {
            *value = interpolate(value, store);
        }
    }

    if let Some(command) = scenario.command.as_mut() {
        command.command = interpolate(&command.command, store);
        if let Some(directory) = command.directory.as_mut() {
            *directory = interpolate(directory, store);
        }
    }

    for value in scenario.expect.headers.values_mut() {
        *value = interpolate(value, store);
    }

    for value in scenario.expect.json.values_mut() {
        *value = JsonValue::String(interpolate(&value_text(value), store));
    }
}

//! Extraction stage: copy response values into the store

use tracing::debug;

use super::store::{RunContext, StoreValue};
use crate::errors::StageError;
use crate::jsonpath;
use crate::scenario::Extraction;

/// Store every `{path, as}` pair from the last response body, in order
///
/// Values keep their JSON kind. A failing item leaves the values stored by
/// earlier items in place.
pub fn extract_data(extractions: &[Extraction], ctx: &mut RunContext) -> Result<(), StageError> {
    let response = ctx.last_response.as_ref().ok_or(StageError::NoResponseToExtract)?;
    if extractions.is_empty() {
        return Ok(());
    }

    for extraction in extractions {
        if extraction.path.is_empty() {
            return Err(StageError::ExtractionPathEmpty);
        }
        if extraction.var.is_empty() {
            return Err(StageError::ExtractionVariableNameEmpty);
        }

        let found = jsonpath::get(&response.body, &extraction.path).ok_or_else(|| {
            StageError::ExtractionPathNotFound {
                path: extraction.path.clone(),
            }
        })?;

        let stored = StoreValue::from_match(&found);
        debug!(path = %extraction.path, key = %extraction.var, value = %stored, "Extracted value");
        ctx.store.insert(extraction.var.clone(), stored);
    }

    Ok(())
}

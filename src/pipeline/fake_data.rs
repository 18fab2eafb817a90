//! Fake data stage

use indexmap::IndexMap;
use tracing::debug;

use super::store::RunContext;
use crate::errors::StageError;
use crate::fake::FakeGenerator;

/// Generate a value for every `key: tag` pair and store it under `key`
pub fn generate_fake_data(
    fields: &IndexMap<String, String>,
    generator: &dyn FakeGenerator,
    ctx: &mut RunContext,
) -> Result<(), StageError> {
    for (key, tag) in fields {
        let value = generator
            .generate(tag)
            .map_err(|source| StageError::FakeDataGenerationFailed {
                key: key.clone(),
                source,
            })?;
        debug!(key = %key, tag = %tag, value = %value, "Generated fake value");
        ctx.store.insert(key.clone(), value);
    }
    Ok(())
}

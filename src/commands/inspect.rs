use crate::artifact::{ArtifactMetadata, ArtifactStore};
use crate::formatting::FormattingConfig;
use crate::output::{create_writer, OutputFormat};
use anyhow::{Context, Result};
use std::path::Path;

/// Load (which also probes) the artifact and print its metadata
pub fn inspect_model(
    model_path: &Path,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<ArtifactMetadata> {
    let artifact = ArtifactStore::new(model_path)
        .load()
        .with_context(|| format!("Failed to inspect {}", model_path.display()))?;

    let stdout = std::io::stdout();
    let mut writer = create_writer(format, stdout.lock(), formatting);
    writer.write_artifact_summary(model_path, &artifact.metadata)?;
    Ok(artifact.metadata)
}

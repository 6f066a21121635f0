use crate::artifact::ArtifactStore;
use crate::assessment::{assess, AssessmentPolicy, FatigueAssessment};
use crate::cli::ProfileArgs;
use crate::formatting::FormattingConfig;
use crate::output::{create_writer, OutputFormat};
use crate::profile::UsageProfile;
use anyhow::{Context, Result};
use std::path::Path;

/// Profile from a JSON file, or from flags over the default profile
pub fn build_profile(inputs: &ProfileArgs, profile_path: Option<&Path>) -> Result<UsageProfile> {
    if let Some(path) = profile_path {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        return serde_json::from_str(&contents)
            .with_context(|| format!("Invalid profile JSON in {}", path.display()));
    }

    let mut profile = UsageProfile::default();
    for (feature, value) in inputs.values() {
        if let Some(value) = value {
            profile.set(feature, value);
        }
    }
    Ok(profile)
}

pub fn assess_profile(
    profile: &UsageProfile,
    model_path: &Path,
    policy: &AssessmentPolicy,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<FatigueAssessment> {
    let artifact = ArtifactStore::new(model_path)
        .load()
        .context("Cannot assess without a trained model; run `fatiguemap train` first")?;

    let assessment = assess(profile, &artifact.model, policy)?;

    let stdout = std::io::stdout();
    let mut writer = create_writer(format, stdout.lock(), formatting);
    writer.write_assessment(&assessment)?;
    Ok(assessment)
}

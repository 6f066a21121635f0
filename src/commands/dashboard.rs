use crate::artifact::ArtifactStore;
use crate::assessment::AssessmentPolicy;
use crate::tui::{Dashboard, ModelStatus};
use anyhow::Result;
use std::path::Path;

/// Try to load the model; failure becomes a displayable status
pub fn load_model_status(model_path: &Path) -> ModelStatus {
    match ArtifactStore::new(model_path).load() {
        Ok(artifact) => ModelStatus::Ready(Box::new(artifact.model)),
        Err(e) => {
            tracing::warn!(error = %e, "Dashboard starting without a model");
            ModelStatus::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

pub fn run_dashboard(model_path: &Path, policy: AssessmentPolicy) -> Result<()> {
    let status = load_model_status(model_path);
    let mut dashboard = Dashboard::new(status, policy)?;
    dashboard.run()
}

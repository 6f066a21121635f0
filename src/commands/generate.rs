use crate::dataset::{generate_synthetic, write_csv};
use anyhow::{Context, Result};
use std::path::Path;

pub struct GenerateConfig<'a> {
    pub rows: usize,
    pub seed: u64,
    pub output: &'a Path,
    pub force: bool,
}

pub fn generate_dataset(config: GenerateConfig<'_>) -> Result<()> {
    if config.rows == 0 {
        anyhow::bail!("--rows must be at least 1");
    }
    if config.output.exists() && !config.force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config.output.display()
        );
    }

    let records = generate_synthetic(config.rows, config.seed);
    write_csv(config.output, &records)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    tracing::info!(
        rows = records.len(),
        seed = config.seed,
        path = %config.output.display(),
        "Wrote synthetic dataset"
    );
    println!(
        "Wrote {} synthetic rows to {}",
        records.len(),
        config.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use tempfile::TempDir;

    #[test]
    fn test_generated_file_loads_as_dataset() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("data/synthetic.csv");
        generate_dataset(GenerateConfig {
            rows: 50,
            seed: 1,
            output: &output,
            force: false,
        })
        .unwrap();

        let dataset = Dataset::from_csv_path(&output).unwrap();
        assert_eq!(dataset.len(), 50);
        assert_eq!(dataset.dropped_rows, 0);
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("data.csv");
        std::fs::write(&output, "keep me").unwrap();

        let result = generate_dataset(GenerateConfig {
            rows: 5,
            seed: 1,
            output: &output,
            force: false,
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");
    }
}

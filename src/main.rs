use anyhow::Result;
use clap::Parser;
use fatiguemap::cli::{Cli, Commands};
use fatiguemap::commands::{
    assess, dashboard, generate, init, inspect, resolve_config, resolve_formatting, train,
};
use fatiguemap::observability::{init_logging, install_panic_hook};

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Init { force } = cli.command {
        return init::init_config(force);
    }

    let config = resolve_config(cli.config.as_deref())?;
    let formatting = resolve_formatting(cli.plain, &config);
    let training = config.training_config();

    match cli.command {
        Commands::Train {
            data,
            model,
            seed,
            trees,
            max_depth,
            min_samples_leaf,
            test_fraction,
            format,
        } => {
            let overrides = train::TrainOverrides {
                data,
                model,
                seed,
                trees,
                max_depth,
                min_samples_leaf,
                test_fraction,
            };
            let training = overrides.apply(training);
            let format = format.unwrap_or_else(|| config.output_format());
            train::run_training(&training, format, formatting)?;
        }
        Commands::Generate {
            rows,
            seed,
            output,
            force,
        } => {
            let output = output.unwrap_or(training.data_path);
            generate::generate_dataset(generate::GenerateConfig {
                rows,
                seed,
                output: &output,
                force,
            })?;
        }
        Commands::Assess {
            inputs,
            profile,
            model,
            format,
        } => {
            let usage = assess::build_profile(&inputs, profile.as_deref())?;
            let model = model.unwrap_or(training.model_path);
            let format = format.unwrap_or_else(|| config.output_format());
            assess::assess_profile(
                &usage,
                &model,
                &config.assessment_policy(),
                format,
                formatting,
            )?;
        }
        Commands::Dashboard { model } => {
            let model = model.unwrap_or(training.model_path);
            dashboard::run_dashboard(&model, config.assessment_policy())?;
        }
        Commands::Inspect { model, format } => {
            let model = model.unwrap_or(training.model_path);
            let format = format.unwrap_or_else(|| config.output_format());
            inspect::inspect_model(&model, format, formatting)?;
        }
        Commands::Init { .. } => {}
    }

    Ok(())
}

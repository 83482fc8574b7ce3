use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use nuclei_predictor::config::Overrides;
use nuclei_predictor::dashboard::{self, parse_assignment, SliderEdits};
use nuclei_predictor::{engine, logging, PipelineConfig};

#[derive(Parser)]
#[command(name = "nuclei-predictor")]
#[command(version)]
#[command(about = "Train and serve a malignant/benign classifier for cell nuclei measurements", long_about = None)]
struct Cli {
    /// Optional TOML config file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the scaler and classifier and write the model bundle
    Train {
        /// Path to the dataset CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Where to write the model bundle
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Seed for the train/test shuffle
        #[arg(long)]
        seed: Option<u64>,

        /// Fraction of rows held out for evaluation
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Print the evaluation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Predict one cell cluster from slider-style inputs
    Predict {
        /// Path to the model bundle
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Path to the dataset CSV (slider ranges and defaults)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// All thirty values in feature order, comma separated
        #[arg(long, value_delimiter = ',', num_args = 1.., conflicts_with = "input")]
        values: Option<Vec<f64>>,

        /// JSON object file mapping feature names to values
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override one feature, e.g. --set radius_mean=17.5 (repeatable)
        #[arg(long = "set", value_parser = parse_assignment)]
        assignments: Vec<(String, f64)>,

        /// Print the full dashboard payload as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show slider bounds (min, max, default mean) for every feature
    Describe {
        /// Path to the dataset CSV
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Train {
            data,
            out,
            seed,
            test_ratio,
            json,
        } => {
            let config = config.with_overrides(Overrides {
                data,
                artifact: out,
                seed,
                test_ratio,
            })?;
            let outcome = engine::train_and_save(&config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                println!("Accuracy of the model: {:.4}", outcome.report.accuracy);
                println!("Classification report:\n{}", outcome.report);
                println!("Model bundle written to {}", config.artifact.path.display());
            }
        }

        Commands::Predict {
            model,
            data,
            values,
            input,
            assignments,
            json,
        } => {
            let config = config.with_overrides(Overrides {
                data,
                artifact: model,
                ..Overrides::default()
            })?;

            let named: BTreeMap<String, f64> = match input {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .with_context(|| format!("failed to read input {}", path.display()))?;
                    serde_json::from_str(&text)
                        .with_context(|| format!("failed to parse input {}", path.display()))?
                }
                None => BTreeMap::new(),
            };
            let edits = SliderEdits {
                values,
                named,
                assignments,
            };
            let view = dashboard::predict_with_config(&config, &edits)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", view.prediction);
            }
        }

        Commands::Describe { data, json } => {
            let config = config.with_overrides(Overrides {
                data,
                ..Overrides::default()
            })?;
            let sliders = dashboard::load_sliders(&config.data.path)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sliders)?);
            } else {
                println!("{:<28} {:>12} {:>12} {:>12}", "feature", "min", "max", "default");
                for slider in &sliders {
                    println!(
                        "{:<28} {:>12.4} {:>12.4} {:>12.4}",
                        slider.label, slider.min, slider.max, slider.default
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "nuclei-predictor",
            "predict",
            "--set",
            "radius_mean=12",
            "--set",
            "area_mean=500",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Predict {
                assignments, json, ..
            } => {
                assert_eq!(assignments.len(), 2);
                assert!(json);
            }
            _ => panic!("expected predict"),
        }
    }
}

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use booking_classifiers::config::{load_serve_config, ModelType, OneHotDrop, ScalingMode, ServeConfig};
use booking_classifiers::Pipeline;
use booking_cli::commands::features::write_features;
use booking_cli::commands::input::read_records;
use booking_cli::commands::predict::{count_failures, predict_records, write_json};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BOOKING_LOG", "error,booking=info"))
        .init();

    let matches = Command::new("booking")
        .version(clap::crate_version!())
        .about("Hotel booking cancellation predictions from trained artifacts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_pipeline_args(
                Command::new("predict")
                    .about("Predict whether bookings are likely to be canceled"),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output")
                    .help("Path to write the JSON predictions. Defaults to stdout.")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .subcommand(
            with_pipeline_args(
                Command::new("features")
                    .about("Write the feature vectors the classifier would receive"),
            )
            .arg(
                Arg::new("output_file")
                    .short('o')
                    .long("output")
                    .help("Path to write the feature vectors (CSV). Defaults to stdout.")
                    .value_parser(clap::value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            ),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("features", sub_m)) => handle_features(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn with_pipeline_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("config")
                .help("Path to the serving JSON configuration file")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("JSON file holding one booking object or an array of bookings")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model_type")
                .long("model-type")
                .help("Override the model type from the JSON config.")
                .value_parser(["mlp", "gbdt"])
                .value_hint(ValueHint::Other),
        )
        .arg(
            Arg::new("skip_scaling")
                .long("skip-scaling")
                .help("Do not apply the fitted scaler (replays the legacy service).")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep_all_levels")
                .long("keep-all-levels")
                .help("Emit a one-hot indicator for every observed level instead of dropping the first.")
                .action(ArgAction::SetTrue),
        )
}

fn build_pipeline(matches: &ArgMatches) -> Result<Pipeline> {
    let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
        log::info!("[Booking] Using config: {:?}", config_path);
        load_serve_config(config_path)?
    } else {
        log::info!("[Booking] No config provided; using default artifact locations.");
        ServeConfig::default()
    };

    if let Some(model_type) = matches.get_one::<String>("model_type") {
        config.model_type = ModelType::from_str(model_type).map_err(anyhow::Error::msg)?;
    }
    if matches.get_flag("skip_scaling") {
        config.scaling = ScalingMode::Skip;
    }
    if matches.get_flag("keep_all_levels") {
        config.one_hot_drop = OneHotDrop::KeepAll;
    }

    Pipeline::from_config(&config)
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let input_path: &PathBuf = matches.get_one("input").unwrap();
    let output_path: Option<&PathBuf> = matches.get_one("output_file");

    let pipeline = build_pipeline(matches)?;
    let input = read_records(input_path)?;
    log::info!("[Booking] Scoring {} record(s) from {:?}", input.records.len(), input_path);

    let rendered = predict_records(&pipeline, &input)?;
    write_json(&rendered, output_path.map(|p| p.as_path()))?;

    let failures = count_failures(&rendered);
    if failures > 0 {
        log::error!("{} of {} record(s) could not be scored", failures, input.records.len());
        std::process::exit(1)
    }
    Ok(())
}

fn handle_features(matches: &ArgMatches) -> Result<()> {
    let input_path: &PathBuf = matches.get_one("input").unwrap();
    let output_path: Option<&PathBuf> = matches.get_one("output_file");

    let pipeline = build_pipeline(matches)?;
    let input = read_records(input_path)?;
    log::info!("[Booking] Transforming {} record(s) from {:?}", input.records.len(), input_path);

    write_features(&pipeline, &input, output_path)
}

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::GenerationPolicy;

/// What the process should do once arguments and configuration are resolved.
#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Exit,
    Interactive,
    Headless,
}

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Select the typed menu photo path, read the selected menu, finish once the gallery is ready, or start over.
- f - Finish once the gallery is ready.
- r - Start over once the gallery is ready, after finishing, or after an error.
- Up/Down - Scroll the gallery.
- CTRL+R - Start over at any point, discarding work in flight.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

pub fn log_dir() -> Result<path::PathBuf> {
    if let Ok(dir) = std::env::var("MENUVIZ_LOG_DIR") {
        return Ok(path::PathBuf::from(dir));
    }

    match dirs::cache_dir() {
        Some(dir) => return Ok(dir.join("menuviz")),
        None => bail!("Could not resolve a cache directory for this user"),
    }
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for menuviz")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running menuviz with environment variable RUST_LOG=menuviz")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn arg_image(required: bool) -> Arg {
    return Arg::new(ConfigKey::ImagePath.to_string())
        .short('i')
        .long("image")
        .num_args(1)
        .required(required)
        .help("Path to a photo of a restaurant menu.");
}

fn subcommand_run() -> Command {
    return Command::new("run")
        .about("Visualize a menu photo without the interactive UI, printing progress as dishes finish.")
        .arg(arg_image(true));
}

fn arg_gemini_token() -> Arg {
    return Arg::new(ConfigKey::GeminiToken.to_string())
        .long(ConfigKey::GeminiToken.to_string())
        .env("MENUVIZ_GEMINI_TOKEN")
        .num_args(1)
        .hide_env_values(true)
        .help("Gemini API token used for both reading menus and generating dish images.")
        .global(true);
}

fn arg_gemini_url() -> Arg {
    return Arg::new(ConfigKey::GeminiURL.to_string())
        .long(ConfigKey::GeminiURL.to_string())
        .env("MENUVIZ_GEMINI_URL")
        .num_args(1)
        .help(format!(
            "Gemini API URL. Can be swapped to a compatible proxy. [default: {}]",
            Config::default(ConfigKey::GeminiURL)
        ))
        .global(true);
}

fn arg_extraction_model() -> Arg {
    return Arg::new(ConfigKey::ExtractionModel.to_string())
        .long(ConfigKey::ExtractionModel.to_string())
        .env("MENUVIZ_EXTRACTION_MODEL")
        .num_args(1)
        .help(format!(
            "Vision model that reads the menu photo. [default: {}]",
            Config::default(ConfigKey::ExtractionModel)
        ))
        .global(true);
}

fn arg_image_model() -> Arg {
    return Arg::new(ConfigKey::ImageModel.to_string())
        .long(ConfigKey::ImageModel.to_string())
        .env("MENUVIZ_IMAGE_MODEL")
        .num_args(1)
        .help(format!(
            "Model that generates an image for every dish. [default: {}]",
            Config::default(ConfigKey::ImageModel)
        ))
        .global(true);
}

fn arg_generation_policy() -> Arg {
    return Arg::new(ConfigKey::GenerationPolicy.to_string())
        .long(ConfigKey::GenerationPolicy.to_string())
        .env("MENUVIZ_GENERATION_POLICY")
        .num_args(1)
        .help(format!(
            "Generate dish images all at once, or one at a time in menu order. [default: {}]",
            Config::default(ConfigKey::GenerationPolicy)
        ))
        .value_parser(PossibleValuesParser::new(GenerationPolicy::VARIANTS))
        .global(true);
}

fn arg_request_timeout() -> Arg {
    return Arg::new(ConfigKey::RequestTimeout.to_string())
        .long(ConfigKey::RequestTimeout.to_string())
        .env("MENUVIZ_REQUEST_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds for a single menu read or dish image before giving up. [default: {}]",
            Config::default(ConfigKey::RequestTimeout)
        ))
        .global(true);
}

fn arg_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::HealthCheckTimeout.to_string())
        .long(ConfigKey::HealthCheckTimeout.to_string())
        .env("MENUVIZ_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(format!(
            "Time to wait in milliseconds before timing out when doing a healthcheck for a model. [default: {}]",
            Config::default(ConfigKey::HealthCheckTimeout)
        ))
        .global(true);
}

fn arg_output_dir() -> Arg {
    return Arg::new(ConfigKey::OutputDir.to_string())
        .short('o')
        .long(ConfigKey::OutputDir.to_string())
        .env("MENUVIZ_OUTPUT_DIR")
        .num_args(1)
        .help("Directory to save generated dish images to once a menu is finished.")
        .global(true);
}

fn arg_config_file() -> Arg {
    return Arg::new(ConfigKey::ConfigFile.to_string())
        .short('c')
        .long(ConfigKey::ConfigFile.to_string())
        .env("MENUVIZ_CONFIG_FILE")
        .num_args(1)
        .help(format!(
            "Path to configuration file [default: {}]",
            Config::default(ConfigKey::ConfigFile)
        ))
        .global(true);
}

pub fn build() -> Command {
    let hotkeys_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            return line.underline().bold().to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("menuviz")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_run())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .arg(arg_image(false))
        .arg(arg_config_file())
        .arg(arg_gemini_token())
        .arg(arg_gemini_url())
        .arg(arg_extraction_model())
        .arg(arg_image_model())
        .arg(arg_generation_policy())
        .arg(arg_request_timeout())
        .arg(arg_health_check_timeout())
        .arg(arg_output_dir());
}

pub async fn parse() -> Result<Mode> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_dir()?.join("debug.log").to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(Mode::Exit);
        }
        Some(("run", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Mode::Headless);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }

            return Ok(Mode::Exit);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(Mode::Exit);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(Mode::Exit);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(Mode::Exit);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(Mode::Exit);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Mode::Interactive);
}

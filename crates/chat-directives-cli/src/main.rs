use anyhow::{Context, Result, bail};
use chat_directives_config::Config;
use chat_directives_engine::{
    Catalog, PropertySpec, PropertyValue, TaskConfig, TaskId, extract,
};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Pulls `/command action name=value` directives out of chat replies.
#[derive(Parser)]
#[command(name = "chat-directives", version, about)]
struct Cli {
    /// Config file to use instead of ~/.config/chat-directives/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract directives from a file (or stdin) and print them as JSON.
    Extract {
        /// Reply text to read; stdin when omitted.
        file: Option<PathBuf>,

        /// Language whose task catalog to use.
        #[arg(long)]
        language: Option<String>,

        /// Validate every directive against this task.
        #[arg(long)]
        mode: Option<String>,

        /// Property the caller already knows, as `name=value`.
        #[arg(long = "existing", value_parser = parse_existing)]
        existing: Vec<(String, PropertyValue)>,

        /// Print the JSON on one line.
        #[arg(long)]
        compact: bool,
    },
    /// Write a starter config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => Config::expand_path(&path).unwrap_or(path),
        None => Config::config_path(),
    };
    log::debug!("Config path: {}", config_path.display());

    match cli.command {
        Command::Extract {
            file,
            language,
            mode,
            existing,
            compact,
        } => {
            let config = load_config(&config_path)?;
            let text = read_input(file.as_deref())?;

            let catalog = select_catalog(&config, language.as_deref());

            let mut options = config.extract_options();
            if let Some(mode) = mode {
                options = options.with_mode(TaskId::new(mode));
            }
            for (name, value) in existing {
                options = options.with_existing(name, value);
            }

            let extraction = extract(&text, &catalog, &options);
            log::info!(
                "{} to run, {} suggested",
                extraction.run.len(),
                extraction.suggested.len()
            );

            let json = if compact {
                serde_json::to_string(&extraction)?
            } else {
                serde_json::to_string_pretty(&extraction)?
            };
            println!("{json}");
            Ok(())
        }
        Command::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "config file {} already exists, use --force to overwrite",
                    config_path.display()
                );
            }
            starter_config()
                .save_to_path(&config_path)
                .with_context(|| format!("failed to write {}", config_path.display()))?;
            log::info!("Wrote config to {}", config_path.display());
            Ok(())
        }
    }
}

/// Loads the config, falling back to built-in defaults when the file is
/// missing.
fn load_config(config_path: &Path) -> Result<Config> {
    match Config::load_from_path(config_path)? {
        Some(config) => Ok(config),
        None => {
            log::info!(
                "No config file at {}, using defaults (run `chat-directives init` to create one)",
                config_path.display()
            );
            Ok(Config::default())
        }
    }
}

/// The catalog for `language`, warning when it has no tasks to accept.
fn select_catalog(config: &Config, language: Option<&str>) -> Catalog {
    let catalog = config.catalog(language).cloned().unwrap_or_default();
    if catalog.is_empty() {
        log::warn!(
            "no tasks configured for language {:?}, nothing will be accepted",
            language.unwrap_or(&config.default_language)
        );
    }
    catalog
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Parses `--existing name=value`, typing the value like a directive literal.
fn parse_existing(arg: &str) -> Result<(String, PropertyValue)> {
    let Some((name, value)) = arg.split_once('=') else {
        bail!("expected name=value, got {arg:?}");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing property name in {arg:?}");
    }
    let value = value
        .parse::<PropertyValue>()
        .with_context(|| format!("invalid value for {name}"))?;
    Ok((name.to_string(), value))
}

/// An English catalog with a couple of example tasks to edit from.
fn starter_config() -> Config {
    let catalog = Catalog::default()
        .with_task(
            "RoutineAdd",
            TaskConfig::default()
                .with_command("add", "Add a routine")
                .with_property(PropertySpec::required("title"))
                .with_property(PropertySpec::optional("time")),
        )
        .with_task(
            "Reminder",
            TaskConfig::default()
                .with_command("reminder", "Manage reminders")
                .with_actions(["set", "clear"])
                .with_property(PropertySpec::optional("at")),
        );

    let mut config = Config::default();
    config
        .languages
        .insert(config.default_language.clone(), catalog);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn existing_values_are_typed() {
        assert_eq!(
            parse_existing("time=7").unwrap(),
            ("time".to_string(), PropertyValue::Number(7.0))
        );
        assert_eq!(
            parse_existing("title='Morning run'").unwrap(),
            ("title".to_string(), PropertyValue::from("Morning run"))
        );
        assert_eq!(
            parse_existing("title=Gym").unwrap(),
            ("title".to_string(), PropertyValue::from("Gym"))
        );
    }

    #[test]
    fn malformed_existing_values_are_rejected() {
        assert!(parse_existing("time").is_err());
        assert!(parse_existing("=7").is_err());
        assert!(parse_existing("title=").is_err());
        assert!(parse_existing("title='open").is_err());
    }

    #[test]
    fn starter_config_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        starter_config().save_to_path(&path).unwrap();
        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, starter_config());
        assert!(loaded.catalog(None).is_some());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = load_config(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn unknown_language_selects_an_empty_catalog() {
        let config = starter_config();
        assert!(!select_catalog(&config, None).is_empty());
        assert!(select_catalog(&config, Some("fr")).is_empty());
        assert!(select_catalog(&Config::default(), None).is_empty());
    }

    #[test]
    fn starter_catalog_extracts() {
        let config = starter_config();
        let catalog = config.catalog(None).unwrap();
        let out = extract(
            "Done /add title='Gym' time=7",
            catalog,
            &config.extract_options(),
        );
        assert_eq!(out.run.len(), 1);
        assert_eq!(out.text, "Done");
    }

    #[test]
    fn cli_parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "chat-directives",
            "--config",
            "/tmp/c.toml",
            "extract",
            "reply.txt",
            "--mode",
            "RoutineAdd",
            "--existing",
            "title=Gym",
            "--existing",
            "time=7",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        let Command::Extract {
            file,
            mode,
            existing,
            compact,
            ..
        } = cli.command
        else {
            panic!("expected extract");
        };
        assert_eq!(file, Some(PathBuf::from("reply.txt")));
        assert_eq!(mode.as_deref(), Some("RoutineAdd"));
        assert_eq!(existing.len(), 2);
        assert!(!compact);
    }
}

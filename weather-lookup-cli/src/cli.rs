use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Text};
use weather_lookup_core::{
    Config, LookupController, Phase, Presenter, record_source_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-lookup", version, about = "Look up stored weather records")]
pub struct Cli {
    /// Base URL of the weather storage service; overrides the config file.
    #[arg(long, global = true, env = "WEATHER_LOOKUP_BASE_URL")]
    pub base_url: Option<String>,

    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the storage service base URL.
    Configure {
        /// Base URL, e.g. "http://localhost:8000". Prompted for when omitted.
        url: Option<String>,
    },

    /// Show the weather record stored under an identifier.
    Show {
        /// Weather request ID.
        id: String,
    },

    /// Look up records one after another until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { url } => configure(url.or(self.base_url)),
            Command::Show { id } => {
                let mut controller = controller(self.base_url.as_deref())?;

                match controller.submit(&id).await {
                    Phase::Failed(message) => bail!("{message}"),
                    phase => print!("{}", Presenter::local().screen(phase)),
                }
                Ok(())
            }
            Command::Interactive => interactive(controller(self.base_url.as_deref())?).await,
        }
    }
}

/// Apply a base URL override on top of the stored config.
///
/// An unreadable config file only matters when nothing overrides it.
fn effective_config(
    loaded: anyhow::Result<Config>,
    base_url: Option<&str>,
) -> anyhow::Result<Config> {
    let config = match (loaded, base_url) {
        (Ok(config), _) => config,
        (Err(err), Some(_)) => {
            tracing::warn!(error = %format!("{err:#}"), "ignoring config file, base URL overridden");
            Config::default()
        }
        (Err(err), None) => return Err(err),
    };

    let config = config.with_override(base_url)?;
    tracing::debug!(
        base_url = config.service_base_url(),
        overridden = base_url.is_some(),
        "resolved storage service"
    );
    Ok(config)
}

fn controller(base_url: Option<&str>) -> anyhow::Result<LookupController> {
    let config = effective_config(Config::load(), base_url)?;
    let source = record_source_from_config(&config)?;
    Ok(LookupController::new(source))
}

fn configure(url: Option<String>) -> anyhow::Result<()> {
    let mut config = effective_config(Config::load(), url.as_deref())?;

    let url = match url {
        Some(url) => url,
        None => Text::new("Storage service base URL:")
            .with_default(config.service_base_url())
            .prompt()
            .context("Failed to read base URL")?,
    };

    config.set_base_url(&url)?;
    let path = config.save()?;
    tracing::info!(path = %path.display(), "saved configuration");
    println!("Saved base URL {} to {}", config.service_base_url(), path.display());

    Ok(())
}

async fn interactive(mut controller: LookupController) -> anyhow::Result<()> {
    let presenter = Presenter::local();
    let source = controller.source();

    loop {
        let input = match Text::new("Weather Request ID:")
            .with_placeholder("Enter weather request ID...")
            .with_initial_value(controller.query())
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read weather request ID"),
        };

        if let Some(ticket) = controller.begin(&input) {
            print!("{}", presenter.screen(controller.phase()));
            let outcome = source.fetch_record(ticket.id()).await;
            controller.settle(&ticket, outcome);
        }

        println!("{}", presenter.screen(controller.phase()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_global_base_url() {
        let cli =
            Cli::try_parse_from(["weather-lookup", "show", "abc123", "--base-url", "http://h:1"])
                .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://h:1"));
        assert!(matches!(cli.command, Command::Show { ref id } if id == "abc123"));
    }

    #[test]
    fn configure_url_is_optional() {
        let cli = Cli::try_parse_from(["weather-lookup", "configure"]).unwrap();
        assert!(matches!(cli.command, Command::Configure { url: None }));
    }

    #[test]
    fn base_url_reads_environment_variable() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == "base_url")
            .expect("base_url argument exists");

        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("WEATHER_LOOKUP_BASE_URL")));
        assert!(arg.is_global_set());
    }

    #[test]
    fn override_wins_over_unreadable_config() {
        let loaded = Err(anyhow::anyhow!("Failed to parse config file: config.toml"));

        let config = effective_config(loaded, Some("http://override:9000")).unwrap();

        assert_eq!(config.service_base_url(), "http://override:9000");
    }

    #[test]
    fn unreadable_config_without_override_is_an_error() {
        let loaded = Err(anyhow::anyhow!("Failed to parse config file: config.toml"));

        let err = effective_config(loaded, None).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn stored_config_used_without_override() {
        let loaded = Ok(Config { base_url: Some("http://stored:8000".into()) });

        let config = effective_config(loaded, None).unwrap();

        assert_eq!(config.service_base_url(), "http://stored:8000");
    }

    #[test]
    fn show_requires_identifier() {
        assert!(Cli::try_parse_from(["weather-lookup", "show"]).is_err());
    }
}

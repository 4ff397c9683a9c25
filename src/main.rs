// SPDX-License-Identifier: PMPL-1.0-or-later

//! dashbind: render bilingual dashboards and replay interaction sessions
//!
//! Dashboards are bundled YAML schemas (or schema files on disk) bound to a JSON
//! data document found through an ordered list of candidate locations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashbind::config::Configuration;
use dashbind::i18n::Lang;
use dashbind::render::DashboardSchema;
use dashbind::report::{self, OutputFormat, SummaryFormatter};
use dashbind::session::{parse_script, DashboardSession, ScriptCommand};
use dashbind::source::AutoFetcher;
use dashbind::storage::{persist_render, FileStore, PreferenceStore, LANGUAGE_KEY};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dashbind")]
#[command(version = "0.3.0")]
#[command(about = "Bilingual, cross-highlightable dashboards from JSON data")]
#[command(long_about = None)]
struct Cli {
    /// Preference file (default: $DASHBIND_PREFS or .dashbind/preferences.json)
    #[arg(long, global = true)]
    prefs: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch data and render a dashboard page
    Render {
        /// Bundled dashboard name or schema file
        #[arg(value_name = "DASHBOARD")]
        dashboard: String,

        /// Directory or http(s) URL the data candidates resolve against
        #[arg(short, long, default_value = ".")]
        base: String,

        /// Configuration/localization YAML document
        #[arg(short, long)]
        config: Option<String>,

        /// Language to render in (default: stored preference)
        #[arg(short, long, value_enum)]
        lang: Option<LangArg>,

        /// Entity id to select after rendering
        #[arg(short, long)]
        select: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (default: from the output extension, else html)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Also keep a timestamped copy in this directory
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Replay an interaction script against a loaded dashboard
    Session {
        /// Bundled dashboard name or schema file
        #[arg(value_name = "DASHBOARD")]
        dashboard: String,

        /// Directory or http(s) URL the data candidates resolve against
        #[arg(short, long, default_value = ".")]
        base: String,

        /// Configuration/localization YAML document
        #[arg(short, long)]
        config: Option<String>,

        /// Script file (default: stdin)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Format used by `show`
        #[arg(short, long, value_enum, default_value = "html")]
        format: OutputFormat,
    },

    /// Show or persist the preferred language
    Lang {
        #[arg(value_enum)]
        lang: Option<LangArg>,
    },

    /// List bundled dashboards
    Dashboards,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LangArg {
    Ja,
    En,
}

impl From<LangArg> for Lang {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::Ja => Lang::Ja,
            LangArg::En => Lang::En,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Configuration load failure is reported once and falls back to raw keys;
/// no configuration at all is the built-in degraded mode.
async fn load_configuration(location: Option<&str>) -> Configuration {
    let Some(location) = location else {
        return Configuration::builtin();
    };
    let fetcher = AutoFetcher::new(".");
    match Configuration::load(&fetcher, location).await {
        Ok(config) => config,
        Err(err) => {
            let message = format!("{:#}", err);
            warn!(error = %message, "configuration unavailable; rendering raw keys");
            Configuration::unlocalized()
        }
    }
}

/// Build a session and load its data. A load failure still yields the
/// session (showing the error fragment) together with the error.
async fn open_session(
    dashboard: &str,
    base: &str,
    config: Option<&str>,
    store: FileStore,
) -> Result<(DashboardSession<FileStore>, Option<anyhow::Error>)> {
    let schema = DashboardSchema::resolve(dashboard)?;
    let config = load_configuration(config).await;
    let mut session = DashboardSession::new(schema, config, store);

    let fetcher = AutoFetcher::new(base);
    let failure = session
        .load(&fetcher)
        .await
        .err()
        .map(|err| anyhow::Error::new(err).context(format!("loading data for '{}'", dashboard)));
    session.load_preference();
    Ok((session, failure))
}

fn write_output(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            println!("Page saved to: {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn read_script(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading script {}", path.display())),
        None => {
            let mut source = String::new();
            tokio::io::stdin()
                .read_to_string(&mut source)
                .await
                .context("reading script from stdin")?;
            Ok(source)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = FileStore::new(cli.prefs.unwrap_or_else(FileStore::default_location));

    match cli.command {
        Commands::Render {
            dashboard,
            base,
            config,
            lang,
            select,
            output,
            format,
            export_dir,
        } => {
            let (mut session, failure) =
                open_session(&dashboard, &base, config.as_deref(), store).await?;

            if let Some(lang) = lang {
                session.set_language(lang.into(), None);
            }
            if let Some(id) = &select {
                let highlighted = session.select(id);
                info!(id = %id, highlighted, "selection applied");
            }

            let format = format
                .or_else(|| {
                    output
                        .as_ref()
                        .and_then(|path| path.extension())
                        .and_then(|ext| OutputFormat::parse(&ext.to_string_lossy()))
                })
                .unwrap_or(OutputFormat::Html);
            let content = format.serialize(session.page())?;
            write_output(&content, output.as_deref())?;

            if let Some(directory) = export_dir {
                let path = persist_render(&content, &directory, &session.schema().name, format)?;
                println!("Export saved to: {}", path.display());
            }
            if output.is_some() {
                report::print_summary(&session.summary());
            }

            if let Some(err) = failure {
                return Err(err);
            }
        }

        Commands::Session {
            dashboard,
            base,
            config,
            script,
            format,
        } => {
            let source = read_script(script.as_deref()).await?;
            let commands = parse_script(&source)?;
            let (mut session, failure) =
                open_session(&dashboard, &base, config.as_deref(), store).await?;
            if let Some(err) = &failure {
                let message = format!("{:#}", err);
                warn!(error = %message, "replaying against the error page");
            }

            for command in commands {
                match command {
                    ScriptCommand::Select(id) => {
                        let highlighted = session.select(&id);
                        println!("select {} -> {} highlighted", id, highlighted);
                    }
                    ScriptCommand::Clear => {
                        session.clear();
                        println!("clear");
                    }
                    ScriptCommand::Lang(lang) => {
                        session.set_language(lang, None);
                        println!("lang {}", lang);
                    }
                    ScriptCommand::Toggle(id) => match session.toggle_layer(&id) {
                        Some(expanded) => println!(
                            "toggle {} -> {}",
                            id,
                            if expanded { "expanded" } else { "collapsed" }
                        ),
                        None => warn!(layer = %id, "no such layer"),
                    },
                    ScriptCommand::Show => println!("{}", format.serialize(session.page())?),
                    ScriptCommand::Summary => report::print_summary(&session.summary()),
                }
            }

            if let Some(err) = failure {
                return Err(err);
            }
        }

        Commands::Lang { lang } => {
            let mut store = store;
            match lang {
                Some(lang) => {
                    let lang: Lang = lang.into();
                    store.set(LANGUAGE_KEY, lang.code())?;
                    println!("Preferred language set to {} ({})", lang, store.path().display());
                }
                None => {
                    let stored = store.get(LANGUAGE_KEY);
                    match stored.as_deref().and_then(Lang::from_code) {
                        Some(lang) => println!("{}", lang),
                        None => println!("{} (default)", Lang::default()),
                    }
                }
            }
        }

        Commands::Dashboards => {
            let schemas = DashboardSchema::bundled_names()
                .map(DashboardSchema::bundled)
                .collect::<Result<Vec<_>>>()?;
            SummaryFormatter::new().print_dashboards(&schemas);
        }
    }

    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{arg, command, crate_name, value_parser, ArgMatches, Command};
use cli::client::{self as commands, ConsoleNotifier};
use cli::config::Settings;
use client::{Dashboard, HttpStorage};
use kernel::FileId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

const DEFAULT_LOG_FILTER: &str = "mediadash=warn,client=warn";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let matches = build_cli().get_matches();
    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn id_arg() -> clap::Arg {
    arg!(<ID>).help("File id")
}

fn build_cli() -> Command {
    command!(crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .arg(
            arg!(-u --uri <URI>)
                .global(true)
                .env(cli::URI_ENV)
                .default_value(cli::DEFAULT_URI)
                .help("Storage service URI"),
        )
        .arg(
            arg!(--token <TOKEN>)
                .global(true)
                .env(cli::TOKEN_ENV)
                .hide_env_values(true)
                .help("Bearer token, overrides the session file"),
        )
        .arg(
            arg!(--session <FILE>)
                .global(true)
                .env(cli::SESSION_ENV)
                .help("Session file holding the bearer token"),
        )
        .subcommand(Command::new(cli::VERSION_SUBCOMMAND).about(cli::VERSION_DESCRIPTION))
        .subcommand(Command::new(cli::BUGREPORT_SUBCOMMAND).about(cli::BUGREPORT_DESCRIPTION))
        .subcommand(
            Command::new(cli::LIST_SUBCOMMAND)
                .about(cli::LIST_DESCRIPTION)
                .arg(
                    arg!(-c --category <CATEGORY>)
                        .default_value("all")
                        .help("all, images, videos, audios or documents"),
                )
                .arg(arg!(-s --search <TEXT>).help("Show only names or categories containing TEXT")),
        )
        .subcommand(Command::new(cli::STATS_SUBCOMMAND).about(cli::STATS_DESCRIPTION))
        .subcommand(Command::new(cli::PATH_SUBCOMMAND).about(cli::PATH_DESCRIPTION))
        .subcommand(
            Command::new(cli::UPLOAD_SUBCOMMAND)
                .about(cli::UPLOAD_DESCRIPTION)
                .arg(
                    arg!(<FILE> ...)
                        .value_parser(value_parser!(PathBuf))
                        .help("Files to upload as one batch"),
                ),
        )
        .subcommand(Command::new(cli::DROP_SUBCOMMAND).about(cli::DROP_DESCRIPTION))
        .subcommand(
            Command::new(cli::KEEP_SUBCOMMAND)
                .about(cli::KEEP_DESCRIPTION)
                .arg(id_arg()),
        )
        .subcommand(
            Command::new(cli::EXPIRE_SUBCOMMAND)
                .about(cli::EXPIRE_DESCRIPTION)
                .arg(id_arg()),
        )
        .subcommand(
            Command::new(cli::DELETE_SUBCOMMAND)
                .about(cli::DELETE_DESCRIPTION)
                .arg(id_arg())
                .arg(arg!(-y --yes).help("Do not ask for confirmation")),
        )
        .subcommand(
            Command::new(cli::PROCESS_SUBCOMMAND)
                .about(cli::PROCESS_DESCRIPTION)
                .arg(id_arg()),
        )
        .subcommand(
            Command::new(cli::CONTENT_SUBCOMMAND)
                .about(cli::CONTENT_DESCRIPTION)
                .arg(id_arg())
                .arg(
                    arg!(-o --output <FILE>)
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Where to write the content"),
                ),
        )
        .arg_required_else_help(true)
        .disable_version_flag(true)
}

fn file_id(matches: &ArgMatches) -> FileId {
    matches
        .get_one::<String>("ID")
        .map(|id| FileId::new(id.as_str()))
        .unwrap_or_else(|| FileId::new(""))
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some((cli::VERSION_SUBCOMMAND, _)) => {
            cli::version::run();
            return Ok(());
        }
        Some((cli::BUGREPORT_SUBCOMMAND, _)) => {
            cli::bugreport::run();
            return Ok(());
        }
        _ => {}
    }

    let settings = Settings::resolve(matches).await?;
    tracing::debug!("using storage service at {}", settings.uri);
    let storage = HttpStorage::new(&settings.uri, settings.session)?;
    let dashboard = Dashboard::new(storage).with_notifier(std::sync::Arc::new(ConsoleNotifier));

    match matches.subcommand() {
        Some((cli::LIST_SUBCOMMAND, m)) => {
            let category = m.get_one::<String>("category").map_or("all", String::as_str);
            let search = m.get_one::<String>("search").map(String::as_str);
            commands::list(&dashboard, category, search).await
        }
        Some((cli::STATS_SUBCOMMAND, _)) => commands::stats(&dashboard).await,
        Some((cli::PATH_SUBCOMMAND, _)) => commands::storage_path(&dashboard).await,
        Some((cli::UPLOAD_SUBCOMMAND, m)) => {
            let files: Vec<PathBuf> = m
                .get_many::<PathBuf>("FILE")
                .map(|files| files.cloned().collect())
                .unwrap_or_default();
            commands::upload(&dashboard, files).await
        }
        Some((cli::DROP_SUBCOMMAND, _)) => commands::drop_files(&dashboard).await,
        Some((cli::KEEP_SUBCOMMAND, m)) => {
            commands::set_permanent(&dashboard, &file_id(m), true).await
        }
        Some((cli::EXPIRE_SUBCOMMAND, m)) => {
            commands::set_permanent(&dashboard, &file_id(m), false).await
        }
        Some((cli::DELETE_SUBCOMMAND, m)) => {
            commands::delete(&dashboard, &file_id(m), m.get_flag("yes")).await
        }
        Some((cli::PROCESS_SUBCOMMAND, m)) => commands::process(&dashboard, &file_id(m)).await,
        Some((cli::CONTENT_SUBCOMMAND, m)) => {
            let output = m
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_default();
            commands::content(&dashboard, &file_id(m), &output).await
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[rstest]
    #[case(&["mediadash", "list", "-c", "images", "-s", "cat"], "list")]
    #[case(&["mediadash", "upload", "a.png", "b.mp4"], "upload")]
    #[case(&["mediadash", "delete", "42", "--yes"], "delete")]
    #[case(&["mediadash", "-u", "http://media:8080", "keep", "7"], "keep")]
    #[case(&["mediadash", "content", "7", "-o", "out.bin"], "content")]
    fn parses_subcommands(#[case] args: &[&str], #[case] expected: &str) {
        // Arrange
        let cli = build_cli();

        // Act
        let matches = cli.try_get_matches_from(args).unwrap();

        // Assert
        assert_eq!(matches.subcommand_name(), Some(expected));
    }

    #[test]
    fn upload_requires_files() {
        let result = build_cli().try_get_matches_from(["mediadash", "upload"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_uri_reaches_subcommand() {
        // Arrange
        let matches = build_cli()
            .try_get_matches_from(["mediadash", "stats", "--uri", "http://other:9000"])
            .unwrap();

        // Act
        let uri = matches.get_one::<String>("uri");

        // Assert
        assert_eq!(uri.map(String::as_str), Some("http://other:9000"));
    }
}

use std::path::PathBuf;

use clap::ArgMatches;
use client::Session;

use super::DEFAULT_URI;

/// Connection settings resolved from flags, environment and defaults.
pub struct Settings {
    pub uri: String,
    pub session: Option<Session>,
}

impl Settings {
    pub async fn resolve(matches: &ArgMatches) -> anyhow::Result<Settings> {
        let uri = matches
            .get_one::<String>("uri")
            .cloned()
            .unwrap_or_else(|| DEFAULT_URI.to_owned());

        if let Some(token) = matches.get_one::<String>("token") {
            return Ok(Settings {
                uri,
                session: Some(Session::new(token.as_str())?),
            });
        }

        let path = matches
            .get_one::<String>("session")
            .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
            .or_else(Session::default_path);

        let session = match path {
            Some(path) if path.exists() => Some(Session::load(&path).await?),
            Some(path) => {
                tracing::debug!("no session file at {}", path.display());
                None
            }
            None => None,
        };
        Ok(Settings { uri, session })
    }
}

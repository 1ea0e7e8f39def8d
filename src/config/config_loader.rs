use anyhow::{Context, Result, anyhow};

use super::config_model::{Database, DotEnvyConfig, Media, Server};

const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_URL: &str = "/media/";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<DotEnvyConfig> {
    let required = |key: &str| lookup(key).ok_or_else(|| anyhow!("{} is invalid", key));

    let server = Server {
        port: required("SERVER_PORT")?
            .parse::<u16>()
            .context("SERVER_PORT is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse::<u64>()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse::<u64>()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let media = Media {
        root: lookup("MEDIA_ROOT").unwrap_or_else(|| DEFAULT_MEDIA_ROOT.to_string()),
        url: lookup("MEDIA_URL").unwrap_or_else(|| DEFAULT_MEDIA_URL.to_string()),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        media,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn media_falls_back_to_defaults() {
        let vars = env(&[
            ("SERVER_PORT", "8000"),
            ("SERVER_BODY_LIMIT", "10"),
            ("SERVER_TIMEOUT", "30"),
            ("DATABASE_URL", "postgres://localhost/tours"),
        ]);

        let config = load_from(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.body_limit, 10);
        assert_eq!(config.media.root, "media");
        assert_eq!(config.media.url, "/media/");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let vars = env(&[
            ("SERVER_PORT", "8000"),
            ("SERVER_BODY_LIMIT", "10"),
            ("SERVER_TIMEOUT", "30"),
        ]);

        let err = load_from(|key| vars.get(key).cloned()).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn unparsable_port_is_an_error() {
        let vars = env(&[
            ("SERVER_PORT", "eighty"),
            ("SERVER_BODY_LIMIT", "10"),
            ("SERVER_TIMEOUT", "30"),
            ("DATABASE_URL", "postgres://localhost/tours"),
        ]);

        assert!(load_from(|key| vars.get(key).cloned()).is_err());
    }
}

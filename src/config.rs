use std::env;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const DATABASE: &str = "Marketplace";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Without a URI the service runs on in-memory stores.
    pub mongodb_uri: Option<String>,
    pub database_name: String,
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: HOST.to_string(),
            port: PORT,
            mongodb_uri: None,
            database_name: DATABASE.to_string(),
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset and an
    /// unparsable `PORT` falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT value {:?}, using {}", raw, PORT);
                PORT
            }),
            None => defaults.port,
        };

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            mongodb_uri: get("MONGODB_URI"),
            database_name: get("MONGODB_DATABASE").unwrap_or(defaults.database_name),
            environment: get("RUST_ENV").unwrap_or(defaults.environment),
        }
    }
}

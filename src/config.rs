use anyhow::{Context, Result};
use clap_serde_derive::ClapSerde;

#[derive(ClapSerde, Debug)]
pub struct Config {
    /// The address the listener binds to
    #[default("0.0.0.0".to_string())]
    #[arg(short, long, env)]
    pub(crate) address: String,

    /// The port the listener binds to
    #[default(8888)]
    #[arg(short, long, env)]
    pub(crate) port: u16,

    /// API key used to authenticate against the Gemini API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub(crate) api_key: String,

    /// Gemini model that grades the essays
    #[default("gemini-1.5-flash-latest".to_string())]
    #[arg(short, long, env = "GEMINI_MODEL")]
    pub(crate) model: String,

    /// Base URL of the Gemini API
    #[default("https://generativelanguage.googleapis.com".to_string())]
    #[arg(long, env = "GEMINI_API_BASE_URL")]
    pub(crate) api_base_url: String,

    /// Reject upstream gradings that do not match the grading schema
    #[arg(long, env)]
    pub(crate) validate_response: bool,
}

impl Config {
    /// Values missing from the file keep their defaults.
    pub fn from_toml(path: &str) -> Result<Self> {
        let str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path}"))?;
        let opt: <Config as ClapSerde>::Opt =
            toml::from_str(&str).with_context(|| format!("Invalid configuration file {path}"))?;
        Ok(Config::from(opt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> Config {
        Config::from(toml::from_str::<<Config as ClapSerde>::Opt>(toml).unwrap())
    }

    #[test]
    fn defaults_apply_without_configuration() {
        let config = Config::default();

        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 8888);
        assert_eq!(config.api_key, "");
        assert_eq!(config.model, "gemini-1.5-flash-latest");
        assert_eq!(config.api_base_url, "https://generativelanguage.googleapis.com");
        assert!(!config.validate_response);
    }

    #[test]
    fn parses_complete_toml() {
        let config = parse(
            r#"
            address = "127.0.0.1"
            port = 9000
            api_key = "secret"
            model = "gemini-1.5-pro"
            api_base_url = "http://localhost:1234"
            validate_response = true
            "#,
        );

        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.api_base_url, "http://localhost:1234");
        assert!(config.validate_response);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = parse("port = 9000");

        assert_eq!(config.port, 9000);
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.model, "gemini-1.5-flash-latest");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::from_toml("does-not-exist.toml").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.toml"));
    }
}

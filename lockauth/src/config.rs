use std::{fs::read_to_string, path::Path, path::PathBuf};

use enquote::unquote;
use ini::{Ini, ParseOption};

use crate::error::Error;

pub const CONFIG_FILE: &str = "/etc/lockauth/lockauth.conf";
const HELPER: &str = "/usr/libexec/lockauth-helper";
const SERVICE: &str = "lockauth";

/// Where to find the helper, and which PAM service it should use.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct AuthConfig {
    pub helper: PathBuf,
    pub service: String,
    /// Log the progress of each authentication at info rather than debug
    /// level.
    pub verbose: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            helper: PathBuf::from(HELPER),
            service: SERVICE.to_string(),
            verbose: false,
        }
    }
}

fn maybe_unquote(s: &str) -> Result<String, Error> {
    Ok(match s.chars().next() {
        Some('"') | Some('\'') => unquote(s).map_err(|e| Error::Config(format!("{}", e)))?,
        _ => s.to_string(),
    })
}

impl AuthConfig {
    /// Parse a configuration file. Every key of the `[auth]` section is
    /// optional.
    pub fn parse(config_str: &str) -> Result<AuthConfig, Error> {
        // Quotes are handled by maybe_unquote.
        let opt = ParseOption {
            enabled_quote: false,
            ..ParseOption::default()
        };
        let config = Ini::load_from_str_opt(config_str, opt)?;
        let section = match config.section(Some("auth")) {
            Some(section) => section,
            None => return Ok(Default::default()),
        };

        let helper = match section.get("helper") {
            Some(s) => PathBuf::from(
                maybe_unquote(s).map_err(|e| format!("unable to read auth.helper: {}", e))?,
            ),
            None => PathBuf::from(HELPER),
        };
        if !helper.is_absolute() {
            return Err(Error::Config(format!(
                "auth.helper must be an absolute path, got {}",
                helper.display()
            )));
        }

        let service = match section.get("service") {
            Some(s) => maybe_unquote(s).map_err(|e| format!("unable to read auth.service: {}", e))?,
            None => SERVICE.to_string(),
        };
        if service.is_empty() {
            return Err(Error::Config("auth.service is empty".to_string()));
        }

        let verbose = section
            .get("verbose")
            .unwrap_or("false")
            .parse()
            .map_err(|e| Error::Config(format!("could not parse auth.verbose: {}", e)))?;

        Ok(AuthConfig {
            helper,
            service,
            verbose,
        })
    }

    /// Read the configuration from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<AuthConfig, Error> {
        let path = path.as_ref();
        let config_str = read_to_string(path)
            .map_err(|e| Error::Config(format!("unable to read {}: {}", path.display(), e)))?;
        AuthConfig::parse(&config_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config() {
        assert_eq!(
            AuthConfig::parse("").expect("config didn't parse"),
            AuthConfig::default()
        );
    }

    #[test]
    fn full_config() {
        let config = AuthConfig::parse(
            "
[auth]
helper = \"/usr/lib/mate-screensaver/lockauth-helper\"
service = 'mate-screensaver'
verbose = true
",
        )
        .expect("config didn't parse");
        assert_eq!(
            config,
            AuthConfig {
                helper: PathBuf::from("/usr/lib/mate-screensaver/lockauth-helper"),
                service: "mate-screensaver".to_string(),
                verbose: true,
            }
        );
    }

    #[test]
    fn partial_config() {
        let config = AuthConfig::parse("[auth]\nservice = screensaver\n")
            .expect("config didn't parse");
        assert_eq!(
            config,
            AuthConfig {
                service: "screensaver".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn other_sections_are_ignored() {
        let config = AuthConfig::parse("[saver]\ntheme = starfield\n").expect("config didn't parse");
        assert_eq!(config, AuthConfig::default());
    }

    #[test]
    fn invalid_config() {
        assert!(AuthConfig::parse("[auth]\nverbose = yes please\n").is_err());
        assert!(AuthConfig::parse("[auth]\nhelper = lockauth-helper\n").is_err());
        assert!(AuthConfig::parse("[auth]\nservice = \"\"\n").is_err());
        assert!(AuthConfig::parse("[auth]\nservice = \"unterminated\n").is_err());
    }

    #[test]
    fn missing_file() {
        assert!(AuthConfig::load("/nonexistent/lockauth.conf").is_err());
    }
}

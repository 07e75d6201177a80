use crate::config::types::{Config, CrawlerConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // Any max_depth is fine: depth <= 0 is a valid crawl that fetches nothing

    let start = Url::parse(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", config.start_url, e))
    })?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "start-url '{}' must use http or https",
            config.start_url
        )));
    }

    if let Some(limit) = config.max_concurrent_fetches {
        if !(1..=1000).contains(&limit) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_fetches must be between 1 and 1000, got {}",
                limit
            )));
        }
    }

    if config.fetch_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be >= 100ms, got {}ms",
            config.fetch_timeout_ms
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawler_config(start_url: &str) -> CrawlerConfig {
        CrawlerConfig {
            start_url: start_url.to_string(),
            max_depth: 3,
            max_concurrent_fetches: None,
            fetch_timeout_ms: 1000,
        }
    }

    #[test]
    fn test_validate_start_url() {
        assert!(validate_crawler_config(&crawler_config("https://example.com/")).is_ok());
        assert!(validate_crawler_config(&crawler_config("http://127.0.0.1:8080/")).is_ok());

        assert!(matches!(
            validate_crawler_config(&crawler_config("not a url")),
            Err(ConfigError::InvalidUrl(_))
        ));
        assert!(matches!(
            validate_crawler_config(&crawler_config("ftp://example.com/")),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_limits() {
        let mut config = crawler_config("https://example.com/");
        config.max_concurrent_fetches = Some(1001);
        assert!(validate_crawler_config(&config).is_err());

        config.max_concurrent_fetches = Some(16);
        config.fetch_timeout_ms = 50;
        assert!(validate_crawler_config(&config).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
        assert!(validate_email("a@b@example.com").is_err());
    }

    #[test]
    fn test_validate_crawler_name() {
        let mut config = UserAgentConfig {
            crawler_name: "Depth-Crawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        };
        assert!(validate_user_agent_config(&config).is_ok());

        config.crawler_name = "bad name!".to_string();
        assert!(validate_user_agent_config(&config).is_err());
    }
}

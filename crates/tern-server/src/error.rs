use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: set the {env_var} environment variable")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings path ("server.port") to the environment variable
/// that provides it ("TERN_SERVER__PORT")
pub fn to_env_var(field: &str) -> String {
    format!("TERN_{}", field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("server.port"), "TERN_SERVER__PORT");
        assert_eq!(to_env_var("search.endpoint"), "TERN_SEARCH__ENDPOINT");
    }
}

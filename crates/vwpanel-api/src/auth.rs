use secrecy::{ExposeSecret, SecretString};

/// Credentials attached to every plugin API request.
///
/// The router fronts all plugins with its own auth; either an API token
/// or the admin account works.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// API token, sent as `Authorization: Bearer <token>`.
    Token(SecretString),
    /// Router admin account, sent as HTTP basic auth.
    Basic {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    /// Attach these credentials to a request.
    pub(crate) fn apply(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            Self::Token(token) => builder.bearer_auth(token.expose_secret()),
            Self::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Invalid base URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// Text suitable for a toast. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Transport(_) | ClientError::Url(_) => {
                "Network error, please try again".to_string()
            }
        }
    }
}

use clap::Parser;
use std::{
    net::{IpAddr, SocketAddr},
    time::Duration,
};

/// Runtime configuration, read from flags or the environment.
///
/// `main` loads a `.env` file first, so every value may live there too.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Credential for the chat completion provider
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: String,

    /// Credential for the voice synthesis provider
    #[arg(long, env = "ELEVENLABS_API_KEY", hide_env_values = true)]
    pub elevenlabs_api_key: String,

    /// The only origin allowed to call the API from a browser
    #[arg(long, env = "CLIENT_URL", default_value = "http://localhost:5173")]
    pub client_url: String,

    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = llm::client::DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = llm::DEFAULT_MODEL)]
    pub openai_model: String,

    #[arg(long, env = "ELEVENLABS_BASE_URL", default_value = tts::elevenlabs::DEFAULT_BASE_URL)]
    pub elevenlabs_base_url: String,

    /// Requests allowed per address within one window
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 10)]
    pub rate_limit_max: u32,

    /// Length of the rate limit window in seconds
    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 900)]
    pub rate_limit_window_secs: u64,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

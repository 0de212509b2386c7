use std::time::Duration;

static API1_HOST: &str = "api.yubico.com";
static API2_HOST: &str = "api2.yubico.com";
static API3_HOST: &str = "api3.yubico.com";
static API4_HOST: &str = "api4.yubico.com";
static API5_HOST: &str = "api5.yubico.com";

static DEFAULT_USER_AGENT: &str = concat!("yubikey-otp/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub client_id: String,
    pub api_hosts: Vec<String>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Upper bound on a whole validation race. `None` waits until every server has dropped out.
    ///
    /// `AsyncVerifier` enforces it with `tokio::time::timeout`, so it must run inside a Tokio
    /// runtime with the timer enabled.
    pub deadline: Option<Duration>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            client_id: String::new(),
            api_hosts: build_hosts(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(30),
            deadline: None,
        }
    }
}

impl Config {
    /// Client identifier plus an optional host list; `None` selects the Yubico cloud hosts.
    pub fn new<C>(client_id: C, api_hosts: Option<Vec<String>>) -> Config
    where
        C: Into<String>,
    {
        let config = Config::default().set_client_id(client_id);
        match api_hosts {
            Some(hosts) => config.set_api_hosts(hosts),
            None => config,
        }
    }

    pub fn set_client_id<C>(mut self, client_id: C) -> Self
    where
        C: Into<String>,
    {
        self.client_id = client_id.into();
        self
    }

    pub fn set_api_hosts(mut self, hosts: Vec<String>) -> Self {
        self.api_hosts = hosts;
        self
    }

    pub fn set_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn set_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn set_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

fn build_hosts() -> Vec<String> {
    vec![
        API1_HOST.to_string(),
        API2_HOST.to_string(),
        API3_HOST.to_string(),
        API4_HOST.to_string(),
        API5_HOST.to_string(),
    ]
}

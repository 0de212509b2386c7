#[cfg(feature = "online-tokio")]
pub mod async_verifier;
pub mod config;
pub mod nonce;
pub mod otp;
pub mod sync_verifier;
pub mod transport;
pub mod yubicoerror;

use std::collections::BTreeMap;

use config::Config;
use log::{debug, info};
use yubicoerror::YubicoError;

#[cfg(feature = "online-tokio")]
pub use async_verifier::{verify_async, AsyncVerifier};
pub use otp::{identity_of, normalize_and_validate};
pub use sync_verifier::{verify, Verifier};

pub type Result<T> = ::std::result::Result<T, YubicoError>;

static VERIFY_PATH: &str = "/wsapi/2.0/verify";

/// Status a server answers when another server is already validating the same OTP.
static REPLAYED_REQUEST: &str = "REPLAYED_REQUEST";

/// One verification attempt: the query shared by every server and what the answer must echo back.
pub(crate) struct Request {
    query: String,
    response_verifier: ResponseVerifier,
}

impl Request {
    fn new(config: &Config, otp: &str, nonce: String) -> Request {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("id", &config.client_id);
        query.append_pair("otp", otp);
        query.append_pair("nonce", &nonce);
        query.append_pair("sl", "secure");

        Request {
            query: query.finish(),
            response_verifier: ResponseVerifier {
                otp: otp.to_string(),
                nonce,
            },
        }
    }

    fn build_url(&self, for_api_host: &str) -> String {
        format!("https://{}{}?{}", for_api_host, VERIFY_PATH, self.query)
    }
}

pub(crate) struct ResponseVerifier {
    otp: String,
    nonce: String,
}

impl ResponseVerifier {
    /// Reconciles the race winner with what was sent.
    fn verify_response(&self, response: &ServerResponse) -> Result<()> {
        // Check if "otp" in the response is the same as the "otp" supplied in the request.
        if response.field("otp") != Some(self.otp.as_str()) {
            return Err(YubicoError::MismatchedOtp);
        }

        // Check if "nonce" in the response is the same as the "nonce" supplied in the request.
        if response.field("nonce") != Some(self.nonce.as_str()) {
            return Err(YubicoError::MismatchedNonce);
        }

        match response.status() {
            "OK" => Ok(()),
            status => Err(YubicoError::RejectedStatus(status.to_string())),
        }
    }
}

/// A decoded reply, tagged with the host that sent it.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerResponse {
    pub server: String,
    pub fields: BTreeMap<String, String>,
}

impl ServerResponse {
    pub fn new<S>(server: S, body: &str) -> ServerResponse
    where
        S: Into<String>,
    {
        ServerResponse {
            server: server.into(),
            fields: parse_response(body),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn status(&self) -> &str {
        self.field("status").unwrap_or("")
    }
}

/// Decodes the `key=value` lines of a verification reply. Later keys overwrite earlier ones.
pub fn parse_response(body: &str) -> BTreeMap<String, String> {
    let mut parameters = BTreeMap::new();
    for line in body.split('\n') {
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim_end_matches(&['\r', '\n'][..]);
            parameters.insert(key.to_string(), value.to_string());
        }
    }
    parameters
}

/// Turns one server's answer into a race candidate, or `None` when it must not win.
fn into_candidate<E>(api_host: &str, answer: ::std::result::Result<String, E>) -> Option<ServerResponse>
where
    E: ::std::fmt::Display,
{
    let body = match answer {
        Ok(body) => body,
        Err(err) => {
            debug!("{} dropped out of the race: {}", api_host, err);
            return None;
        }
    };

    let response = ServerResponse::new(api_host, &body);
    if response.status() == REPLAYED_REQUEST {
        debug!("{} answered {}, waiting for another server", api_host, REPLAYED_REQUEST);
        return None;
    }

    Some(response)
}

fn log_winner(response: &ServerResponse) {
    info!("{}: {}", response.server, response.status());
}

fn check_hosts(config: &Config) -> Result<()> {
    if config.api_hosts.is_empty() {
        return Err(YubicoError::NoApiHosts);
    }
    Ok(())
}

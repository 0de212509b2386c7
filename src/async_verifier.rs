use futures::stream::FuturesUnordered;
use futures::StreamExt;
use reqwest::Client;

use crate::config::Config;
use crate::nonce::NonceGenerator;
use crate::otp::normalize_and_validate;
use crate::transport::AsyncTransport;
use crate::yubicoerror::YubicoError;
use crate::{check_hosts, into_candidate, log_winner, Request, Result, ServerResponse};

pub async fn verify_async<S>(otp: S, config: Config) -> Result<()>
where
    S: AsRef<str>,
{
    let otp = normalize_and_validate(otp.as_ref())?;
    AsyncVerifier::new(config)?.validate(&otp).await
}

pub struct AsyncVerifier<T = Client> {
    transport: T,
    config: Config,
    nonces: NonceGenerator,
}

impl AsyncVerifier<Client> {
    pub fn new(config: Config) -> Result<AsyncVerifier<Client>> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        AsyncVerifier::with_transport(config, client)
    }
}

impl<T> AsyncVerifier<T>
where
    T: AsyncTransport,
{
    pub fn with_transport(config: Config, transport: T) -> Result<AsyncVerifier<T>> {
        check_hosts(&config)?;

        Ok(AsyncVerifier {
            transport,
            config,
            nonces: NonceGenerator::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Races every configured server and reconciles the first usable answer.
    ///
    /// Servers still in flight when a winner arrives are dropped.
    pub async fn validate(&self, otp: &str) -> Result<()> {
        let request = Request::new(&self.config, otp, self.nonces.generate());

        let mut responses = self
            .config
            .api_hosts
            .iter()
            .map(|api_host| self.request(&request, api_host))
            .collect::<FuturesUnordered<_>>();

        let race = async move {
            while let Some(candidate) = responses.next().await {
                if candidate.is_some() {
                    return candidate;
                }
            }
            None
        };

        let winner = match self.config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, race)
                .await
                .map_err(|_| YubicoError::Timeout)?,
            None => race.await,
        }
        .ok_or(YubicoError::NoResponse)?;

        log_winner(&winner);
        request.response_verifier.verify_response(&winner)
    }

    async fn request(&self, request: &Request, api_host: &str) -> Option<ServerResponse> {
        let url = request.build_url(api_host);
        let answer = self.transport.get(&url, &self.config.user_agent).await;
        into_candidate(api_host, answer)
    }
}

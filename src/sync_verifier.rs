use std::sync::mpsc::{sync_channel, RecvTimeoutError, TrySendError};
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;
use reqwest::blocking::Client;
use threadpool::ThreadPool;

use crate::config::Config;
use crate::nonce::NonceGenerator;
use crate::otp::normalize_and_validate;
use crate::transport::Transport;
use crate::yubicoerror::YubicoError;
use crate::{check_hosts, into_candidate, log_winner, Request, Result, ServerResponse};

/// Normalizes `otp` and validates it once against every configured server.
pub fn verify<S>(otp: S, config: Config) -> Result<()>
where
    S: AsRef<str>,
{
    let otp = normalize_and_validate(otp.as_ref())?;
    Verifier::new(config)?.validate(&otp)
}

pub struct Verifier<T = Client> {
    config: Config,
    thread_pool: Mutex<ThreadPool>,
    transport: Arc<T>,
    nonces: NonceGenerator,
}

impl Verifier<Client> {
    pub fn new(config: Config) -> Result<Verifier<Client>> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Verifier::with_transport(config, client)
    }
}

impl<T> Verifier<T>
where
    T: Transport + 'static,
{
    pub fn with_transport(config: Config, transport: T) -> Result<Verifier<T>> {
        check_hosts(&config)?;
        let number_of_hosts = config.api_hosts.len();

        Ok(Verifier {
            config,
            thread_pool: Mutex::new(ThreadPool::new(number_of_hosts)),
            transport: Arc::new(transport),
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
    /// `otp` must already be normalized. Without a configured deadline this waits
    /// until a server wins or every server has dropped out.
    pub fn validate(&self, otp: &str) -> Result<()> {
        let request = Request::new(&self.config, otp, self.nonces.generate());

        // Room for exactly one winner; later senders fail without blocking.
        let (tx, rx) = sync_channel::<ServerResponse>(1);

        let mut thread_pool = self.thread_pool.lock();

        // Losers of earlier races may still hold workers; every host of this race gets its own.
        let number_of_hosts = self.config.api_hosts.len();
        let busy = thread_pool.active_count() + thread_pool.queued_count();
        thread_pool.set_num_threads(busy + number_of_hosts);

        for api_host in &self.config.api_hosts {
            let tx = tx.clone();
            let url = request.build_url(api_host);
            let api_host = api_host.clone();
            let user_agent = self.config.user_agent.clone();
            let transport = Arc::clone(&self.transport);

            thread_pool.execute(move || {
                let answer = transport.get(&url, &user_agent);
                if let Some(response) = into_candidate(&api_host, answer) {
                    match tx.try_send(response) {
                        Ok(()) => {}
                        Err(TrySendError::Full(late)) | Err(TrySendError::Disconnected(late)) => {
                            debug!("discarding late answer from {}", late.server)
                        }
                    }
                }
            });
        }
        drop(thread_pool);
        drop(tx);

        let winner = match self.config.deadline {
            Some(deadline) => rx.recv_timeout(deadline).map_err(|err| match err {
                RecvTimeoutError::Timeout => YubicoError::Timeout,
                RecvTimeoutError::Disconnected => YubicoError::NoResponse,
            })?,
            None => rx.recv().map_err(|_| YubicoError::NoResponse)?,
        };

        log_winner(&winner);
        request.response_verifier.verify_response(&winner)
    }
}

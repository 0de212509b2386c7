use std::error::Error;
use std::io::Read;

#[cfg(feature = "online-tokio")]
use async_trait::async_trait;
use reqwest::header::USER_AGENT;

pub type TransportError = Box<dyn Error + Send + Sync>;

/// Blocking HTTP GET returning the response body.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError>;
}

#[cfg(feature = "online-tokio")]
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError>;
}

impl Transport for reqwest::blocking::Client {
    fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError> {
        let mut response = reqwest::blocking::Client::get(self, url)
            .header(USER_AGENT, user_agent)
            .send()?
            .error_for_status()?;

        let mut data = String::new();
        response.read_to_string(&mut data)?;

        Ok(data)
    }
}

#[cfg(feature = "online-tokio")]
#[async_trait]
impl AsyncTransport for reqwest::Client {
    async fn get(&self, url: &str, user_agent: &str) -> Result<String, TransportError> {
        let response = reqwest::Client::get(self, url)
            .header(USER_AGENT, user_agent)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

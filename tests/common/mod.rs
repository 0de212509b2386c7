#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

pub const OTP: &str = "ccccccidlfvvvuefkdgcilrjcfffijigdhrbvngfgelb";

/// How a scripted verification server answers.
#[derive(Clone)]
pub enum Script {
    /// Echo the request's otp and nonce with the given status.
    Status(&'static str),
    /// Echo the nonce, but claim a different otp.
    WrongOtp,
    /// Echo the otp, but claim a different nonce.
    WrongNonce,
    /// Fail at the transport level.
    Unreachable,
}

#[derive(Clone)]
pub struct Server {
    pub script: Script,
    pub delay: Duration,
}

pub fn server(script: Script, delay_ms: u64) -> Server {
    Server {
        script,
        delay: Duration::from_millis(delay_ms),
    }
}

pub fn hosts(servers: &[(&str, Server)]) -> Vec<String> {
    servers.iter().map(|(host, _)| host.to_string()).collect()
}

pub fn script_map(servers: &[(&str, Server)]) -> HashMap<String, Server> {
    servers
        .iter()
        .map(|(host, server)| (host.to_string(), server.clone()))
        .collect()
}

pub fn query_param<'a>(url: &'a str, name: &str) -> &'a str {
    let query = url.split_once('?').map(|(_, query)| query).unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .unwrap_or("")
}

pub fn host_of(url: &str) -> &str {
    url.trim_start_matches("https://")
        .split('/')
        .next()
        .unwrap_or("")
}

/// Body the scripted server sends back, or `None` for a transport failure.
pub fn answer(script: &Script, url: &str) -> Option<String> {
    let otp = query_param(url, "otp");
    let nonce = query_param(url, "nonce");
    match script {
        Script::Status(status) => Some(format!(
            "h=c2lnbmF0dXJl\r\nt=2019-06-06T05:14:11Z0369\r\notp={}\r\nnonce={}\r\nsl=100\r\nstatus={}\r\n\r\n",
            otp, nonce, status
        )),
        Script::WrongOtp => Some(format!(
            "otp=cccccccccccccccccccccccccccccccccccccccccccc\r\nnonce={}\r\nstatus=OK\r\n",
            nonce
        )),
        Script::WrongNonce => Some(format!("otp={}\r\nnonce=0000\r\nstatus=OK\r\n", otp)),
        Script::Unreachable => None,
    }
}

//! Websocket client for the rippled public API
//!
//! Requests are sent one at a time over a single connection. Every frame
//! carries an increasing `id`; frames with another id (stream messages,
//! late answers to a timed-out request) are skipped while waiting.

pub mod requests;
pub mod types;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::config::NetworkConfig;
use crate::error::LedgerError;

pub use requests::{
    AccountInfoRequest, AccountLinesRequest, FeeRequest, LedgerCurrentRequest, LedgerIndex,
    Request, ServerInfoRequest, SubmitRequest, TxRequest,
};
pub use types::*;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct WebSocketClient {
    url: String,
    stream: WsStream,
    timeout: Duration,
    next_id: u64,
}

impl WebSocketClient {
    /// Open a connection to `url` (`ws://` or `wss://`)
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, LedgerError> {
        log::debug!("Connecting to {}", url);

        let (stream, _response) = tokio::time::timeout(timeout, connect_async(url))
            .await
            .map_err(|_| LedgerError::connection(url, "connection timed out"))?
            .map_err(|e| LedgerError::connection(url, e))?;

        log::info!("🔗 Connected to {}", url);

        Ok(Self {
            url: url.to_string(),
            stream,
            timeout,
            next_id: 1,
        })
    }

    pub async fn from_config(config: &NetworkConfig) -> Result<Self, LedgerError> {
        Self::connect(&config.server_url, config.request_timeout).await
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a request and return the `result` object of the response
    pub async fn send_request<R: Request>(&mut self, request: &R) -> Result<Value, LedgerError> {
        request.validate()?;

        let id = self.next_id;
        self.next_id += 1;

        let mut frame = serde_json::to_value(request)?;
        let fields = frame.as_object_mut().ok_or_else(|| {
            LedgerError::InvalidResponse(format!(
                "Request '{}' did not serialize to an object",
                request.method()
            ))
        })?;
        fields.insert("id".to_string(), Value::from(id));
        fields.insert(
            "command".to_string(),
            Value::String(request.method().to_string()),
        );

        log::debug!("➡️  {} (id {})", request.method(), id);
        let timeout = self.timeout;
        let timed_out = |what: &str| {
            LedgerError::Timeout(format!(
                "{} '{}' took longer than {:?}",
                what,
                request.method(),
                timeout
            ))
        };

        let message = Message::Text(frame.to_string().into());
        tokio::time::timeout(timeout, self.stream.send(message))
            .await
            .map_err(|_| timed_out("Sending"))??;

        let response = tokio::time::timeout(timeout, self.read_response(id))
            .await
            .map_err(|_| timed_out("Waiting for a response to"))??;

        parse_response(response)
    }

    /// Send a request and deserialize its `result`
    pub async fn request<R, T>(&mut self, request: &R) -> Result<T, LedgerError>
    where
        R: Request,
        T: DeserializeOwned,
    {
        let result = self.send_request(request).await?;
        serde_json::from_value(result).map_err(|e| {
            LedgerError::InvalidResponse(format!(
                "Unexpected '{}' result: {}",
                request.method(),
                e
            ))
        })
    }

    pub async fn account_info(
        &mut self,
        account: &str,
    ) -> Result<AccountInfoResponse, LedgerError> {
        self.request(&AccountInfoRequest::new(account, LedgerIndex::CURRENT))
            .await
    }

    pub async fn account_lines(
        &mut self,
        account: &str,
        peer: Option<&str>,
    ) -> Result<AccountLinesResponse, LedgerError> {
        let mut request = AccountLinesRequest::new(account);
        if let Some(peer) = peer {
            request = request.with_peer(peer);
        }
        self.request(&request).await
    }

    pub async fn ledger_current_index(&mut self) -> Result<u32, LedgerError> {
        let response: LedgerCurrentResponse = self.request(&LedgerCurrentRequest {}).await?;
        Ok(response.ledger_current_index)
    }

    pub async fn fee(&mut self) -> Result<FeeResponse, LedgerError> {
        self.request(&FeeRequest {}).await
    }

    pub async fn server_info(&mut self) -> Result<ServerInfo, LedgerError> {
        let response: ServerInfoResponse = self.request(&ServerInfoRequest {}).await?;
        Ok(response.info)
    }

    pub async fn tx(&mut self, hash: &str) -> Result<TxResponse, LedgerError> {
        self.request(&TxRequest::new(hash)).await
    }

    pub async fn close(mut self) -> Result<(), LedgerError> {
        self.stream.close(None).await?;
        log::debug!("Closed connection to {}", self.url);
        Ok(())
    }

    async fn read_response(&mut self, id: u64) -> Result<Value, LedgerError> {
        while let Some(message) = self.stream.next().await {
            let text = match message? {
                Message::Text(text) => text,
                Message::Close(frame) => {
                    return Err(LedgerError::connection(
                        self.url.clone(),
                        format!("server closed the connection: {:?}", frame),
                    ))
                }
                _ => continue,
            };

            let frame: Value = serde_json::from_str(text.as_str())?;
            if frame.get("id").and_then(Value::as_u64) == Some(id) {
                return Ok(frame);
            }
            log::trace!("Skipping frame: {}", frame);
        }

        Err(LedgerError::connection(
            self.url.clone(),
            "connection ended before a response arrived",
        ))
    }
}

/// Turn a response frame into its `result`, or an `Rpc` error
fn parse_response(frame: Value) -> Result<Value, LedgerError> {
    let status = frame.get("status").and_then(Value::as_str).unwrap_or("");
    let result = frame.get("result");

    let error = frame
        .get("error")
        .or_else(|| result.and_then(|r| r.get("error")))
        .and_then(Value::as_str);

    if status == "error" || error.is_some() {
        let message = frame
            .get("error_message")
            .or_else(|| result.and_then(|r| r.get("error_message")))
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(LedgerError::Rpc {
            error: error.unwrap_or("unknown").to_string(),
            message,
        });
    }

    result
        .cloned()
        .ok_or_else(|| LedgerError::InvalidResponse(format!("Response without result: {}", frame)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success() {
        let result = parse_response(json!({
            "id": 1,
            "status": "success",
            "type": "response",
            "result": {"ledger_current_index": 42}
        }))
        .unwrap();
        assert_eq!(result, json!({"ledger_current_index": 42}));
    }

    #[test]
    fn test_parse_top_level_error() {
        let err = parse_response(json!({
            "id": 2,
            "status": "error",
            "type": "response",
            "error": "actNotFound",
            "error_message": "Account not found.",
            "request": {"command": "account_info"}
        }))
        .unwrap_err();
        assert!(err.is_rpc_error("actNotFound"));
    }

    #[test]
    fn test_parse_error_inside_result() {
        let err = parse_response(json!({
            "id": 3,
            "status": "error",
            "result": {"error": "txnNotFound", "status": "error"}
        }))
        .unwrap_err();
        assert!(err.is_rpc_error("txnNotFound"));
    }

    #[test]
    fn test_parse_missing_result() {
        assert!(matches!(
            parse_response(json!({"id": 4, "status": "success"})),
            Err(LedgerError::InvalidResponse(_))
        ));
    }
}

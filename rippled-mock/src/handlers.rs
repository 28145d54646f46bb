/// Websocket command handling and the faucet endpoint

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::state::{MockLedger, SharedLedger, FAUCET_DROPS};

/// Shared application state
pub type AppState = SharedLedger;

/// Custom error type for the faucet handler
pub enum ApiError {
    BadRequest(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, message).into_response()
    }
}

fn lock(state: &AppState) -> std::sync::MutexGuard<'_, MockLedger> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// GET / (websocket upgrade)
pub async fn websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

async fn serve_socket(mut socket: WebSocket, state: AppState) {
    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => continue,
        };

        let reply = reply_to(&state, &text);
        if socket.send(Message::Text(reply.to_string())).await.is_err() {
            break;
        }
    }
    log::debug!("Websocket session closed");
}

fn reply_to(state: &AppState, text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(frame) => handle_command(&mut lock(state), frame),
        Err(e) => error_frame(&Value::Null, "invalidParams", &format!("Bad JSON: {}", e)),
    }
}

/// Answer one command frame the way rippled does
pub fn handle_command(ledger: &mut MockLedger, frame: Value) -> Value {
    ledger.requests.push(frame.clone());

    let command = frame.get("command").and_then(Value::as_str).unwrap_or("");
    log::debug!("Mock command {}", command);

    let result = match command {
        "account_info" => account_info(ledger, &frame),
        "account_lines" => account_lines(ledger, &frame),
        "ledger_current" => Ok(json!({ "ledger_current_index": ledger.ledger_index })),
        "fee" => Ok(fee(ledger)),
        "server_info" => Ok(server_info(ledger)),
        "submit" => submit(ledger, &frame),
        "tx" => tx(ledger, &frame),
        _ => Err(("unknownCmd", "Unknown method.".to_string())),
    };

    match result {
        Ok(result) => json!({
            "id": frame.get("id").cloned().unwrap_or(Value::Null),
            "status": "success",
            "type": "response",
            "result": result,
        }),
        Err((error, message)) => error_frame(&frame, error, &message),
    }
}

type CommandResult = Result<Value, (&'static str, String)>;

fn error_frame(request: &Value, error: &str, message: &str) -> Value {
    json!({
        "id": request.get("id").cloned().unwrap_or(Value::Null),
        "status": "error",
        "type": "response",
        "error": error,
        "error_message": message,
        "request": request,
    })
}

fn string_param<'a>(frame: &'a Value, name: &str) -> Result<&'a str, (&'static str, String)> {
    frame
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ("invalidParams", format!("Missing field '{}'.", name)))
}

fn account_info(ledger: &MockLedger, frame: &Value) -> CommandResult {
    let address = string_param(frame, "account")?;
    let account = ledger
        .accounts
        .get(address)
        .ok_or_else(|| ("actNotFound", "Account not found.".to_string()))?;

    Ok(json!({
        "account_data": {
            "Account": address,
            "Balance": account.balance.to_string(),
            "Sequence": account.sequence,
            "Flags": 0,
            "OwnerCount": 0,
            "LedgerEntryType": "AccountRoot",
        },
        "ledger_current_index": ledger.ledger_index,
        "validated": false,
    }))
}

fn account_lines(ledger: &mut MockLedger, frame: &Value) -> CommandResult {
    let address = string_param(frame, "account")?.to_string();
    if !ledger.accounts.contains_key(&address) {
        return Err(("actNotFound", "Account not found.".to_string()));
    }
    let peer = frame.get("peer").and_then(Value::as_str);
    let lines = ledger.lines_for(&address, peer);

    Ok(json!({
        "account": address,
        "lines": lines,
        "ledger_index": ledger.ledger_index - 1,
        "validated": true,
    }))
}

fn fee(ledger: &MockLedger) -> Value {
    json!({
        "current_ledger_size": "0",
        "current_queue_size": "0",
        "drops": {
            "base_fee": ledger.base_fee.to_string(),
            "median_fee": "5000",
            "minimum_fee": ledger.base_fee.to_string(),
            "open_ledger_fee": ledger.open_ledger_fee.to_string(),
        },
        "ledger_current_index": ledger.ledger_index,
    })
}

fn server_info(ledger: &MockLedger) -> Value {
    json!({
        "info": {
            "build_version": "rippled-mock",
            "server_state": "full",
            "network_id": 1,
            "complete_ledgers": format!("1-{}", ledger.ledger_index - 1),
        }
    })
}

fn submit(ledger: &mut MockLedger, frame: &Value) -> CommandResult {
    let tx_blob = string_param(frame, "tx_blob")?.to_string();
    let (hash, engine_result) = ledger
        .submit(&tx_blob)
        .map_err(|e| ("invalidTransaction", e))?;

    let code = engine_result_code(&engine_result);
    Ok(json!({
        "accepted": code >= 0,
        "applied": code == 0 || (100..200).contains(&code),
        "engine_result": engine_result,
        "engine_result_code": code,
        "engine_result_message": format!("Mock result {}", engine_result),
        "tx_blob": tx_blob,
        "tx_json": { "hash": hash },
    }))
}

fn tx(ledger: &mut MockLedger, frame: &Value) -> CommandResult {
    let hash = string_param(frame, "transaction")?.to_uppercase();
    let tx = ledger
        .lookup(&hash)
        .ok_or_else(|| ("txnNotFound", "Transaction not found.".to_string()))?;

    Ok(match tx.ledger_index {
        Some(ledger_index) => json!({
            "hash": hash,
            "validated": true,
            "ledger_index": ledger_index,
            // close time in seconds since 2000-01-01
            "date": 780_000_000 + ledger_index,
            "meta": {
                "TransactionIndex": 0,
                "TransactionResult": tx.engine_result,
            },
        }),
        None => json!({ "hash": hash, "validated": false }),
    })
}

/// Numeric codes by result class
fn engine_result_code(engine_result: &str) -> i32 {
    match engine_result.get(..3) {
        Some("tes") => 0,
        Some("tec") if engine_result == "tecPATH_DRY" => 128,
        Some("tec") => 100,
        Some("ter") => -99,
        Some("tef") => -199,
        Some("tem") => -299,
        Some("tel") => -399,
        _ => -1,
    }
}

/// POST /accounts
/// Funds `destination` when given, otherwise hands out the next prepared wallet
pub async fn faucet(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let mut ledger = lock(&state);
    let xrp = FAUCET_DROPS / 1_000_000;

    if let Some(destination) = body.get("destination") {
        let destination = destination
            .as_str()
            .ok_or_else(|| ApiError::BadRequest("destination must be a string".to_string()))?;
        ledger.fund(destination, FAUCET_DROPS);
        log::info!("🚰 Funded {}", destination);
        return Ok(Json(json!({
            "account": { "address": destination, "classicAddress": destination },
            "amount": xrp,
        })));
    }

    let wallet = ledger
        .faucet_wallets
        .pop_front()
        .ok_or_else(|| ApiError::Unavailable("No faucet wallets left".to_string()))?;
    ledger.fund(&wallet.address, FAUCET_DROPS);
    log::info!("🚰 Created {}", wallet.address);

    Ok(Json(json!({
        "account": {
            "address": wallet.address,
            "classicAddress": wallet.address,
            "secret": wallet.seed,
        },
        "amount": xrp,
        "seed": wallet.seed,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_command() {
        let mut ledger = MockLedger::new();
        let reply = handle_command(&mut ledger, json!({"id": 7, "command": "ping_pong"}));
        assert_eq!(reply["id"], json!(7));
        assert_eq!(reply["status"], json!("error"));
        assert_eq!(reply["error"], json!("unknownCmd"));
    }

    #[test]
    fn test_account_info_not_found() {
        let mut ledger = MockLedger::new();
        let reply = handle_command(
            &mut ledger,
            json!({"id": 1, "command": "account_info", "account": "rMissing"}),
        );
        assert_eq!(reply["error"], json!("actNotFound"));
    }

    #[test]
    fn test_submit_then_tx() {
        let mut ledger = MockLedger::new().with_results(&["tecPATH_DRY"]);
        let reply = handle_command(
            &mut ledger,
            json!({"id": 1, "command": "submit", "tx_blob": "120000"}),
        );
        assert_eq!(reply["result"]["engine_result"], json!("tecPATH_DRY"));
        assert_eq!(reply["result"]["engine_result_code"], json!(128));
        let hash = reply["result"]["tx_json"]["hash"].as_str().unwrap().to_string();

        let pending = handle_command(
            &mut ledger,
            json!({"id": 2, "command": "tx", "transaction": hash}),
        );
        assert_eq!(pending["result"]["validated"], json!(false));

        let validated = handle_command(
            &mut ledger,
            json!({"id": 3, "command": "tx", "transaction": hash}),
        );
        assert_eq!(validated["result"]["validated"], json!(true));
        assert_eq!(
            validated["result"]["meta"]["TransactionResult"],
            json!("tecPATH_DRY")
        );
    }

    #[test]
    fn test_engine_result_codes() {
        assert_eq!(engine_result_code("tesSUCCESS"), 0);
        assert_eq!(engine_result_code("temBAD_FEE"), -299);
        assert_eq!(engine_result_code("tefPAST_SEQ"), -199);
    }
}

use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::Arc;
use tracing::{info, warn};

use crate::use_cases::{DrawUseCase, HistoryUseCase};

const JSONRPC_VERSION: &str = "2.0";
const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

#[derive(Debug, serde::Deserialize)]
struct JsonRpcRequest {
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

impl JsonRpcRequest {
    fn is_notification(&self) -> bool {
        self.id.is_none() || self.method.starts_with("notifications/")
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
    id: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: Some(result),
            error: None,
            id: Some(id.unwrap_or(json!(1))),
        }
    }

    fn failure(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
            id,
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

#[derive(Debug, serde::Serialize)]
struct Tool {
    name: String,
    description: String,
    #[serde(rename = "inputSchema")]
    input_schema: Value,
}

pub struct MCPHandler {
    draw_use_case: Arc<DrawUseCase>,
    history_use_case: Arc<HistoryUseCase>,
}

impl MCPHandler {
    pub fn new(draw_use_case: Arc<DrawUseCase>, history_use_case: Arc<HistoryUseCase>) -> Self {
        Self {
            draw_use_case,
            history_use_case,
        }
    }

    /// Reads one JSON-RPC message per line and answers every request on `writer`.
    pub async fn serve<R, W>(self, reader: R, mut writer: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
                Ok(request) if request.is_notification() => {
                    if request.method == "notifications/initialized" {
                        info!("🎲 Client initialized");
                    }
                    continue;
                }
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {} - Line: {}", e, line);
                    JsonRpcResponse::failure(
                        None,
                        PARSE_ERROR,
                        "Parse error".to_string(),
                        Some(json!(e.to_string())),
                    )
                }
            };

            writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            writer.flush()?;
        }

        Ok(())
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => {
                info!("🎲 Initializing Mega-Sena MCP server");
                JsonRpcResponse::success(
                    request.id,
                    json!({
                        "protocolVersion": PROTOCOL_VERSION,
                        "capabilities": {
                            "tools": {}
                        },
                        "serverInfo": {
                            "name": env!("CARGO_PKG_NAME"),
                            "version": env!("CARGO_PKG_VERSION")
                        }
                    }),
                )
            }
            "tools/list" => JsonRpcResponse::success(request.id, json!({ "tools": self.get_tools() })),
            "tools/call" => self.handle_call_tool(request.params, request.id).await,
            method => JsonRpcResponse::failure(
                Some(request.id.unwrap_or(json!(1))),
                METHOD_NOT_FOUND,
                format!("Method not found: {}", method),
                None,
            ),
        }
    }

    async fn handle_call_tool(&self, params: Option<Value>, id: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing params".to_string(), None);
        };
        let Some(tool_name) = params.get("name").and_then(|n| n.as_str()) else {
            return JsonRpcResponse::failure(id, INVALID_PARAMS, "Missing tool name".to_string(), None);
        };

        let arguments: HashMap<String, Value> = params
            .get("arguments")
            .cloned()
            .and_then(|arguments| serde_json::from_value(arguments).ok())
            .unwrap_or_default();

        match self.execute_tool(tool_name, &arguments).await {
            Ok(content) => JsonRpcResponse::success(
                id,
                json!({
                    "content": [
                        {
                            "type": "text",
                            "text": content
                        }
                    ]
                }),
            ),
            Err(e) => {
                warn!("Tool {} failed: {:#}", tool_name, e);
                JsonRpcResponse::failure(
                    id,
                    INTERNAL_ERROR,
                    format!("Tool execution error: {:#}", e),
                    None,
                )
            }
        }
    }

    async fn execute_tool(&self, tool_name: &str, arguments: &HashMap<String, Value>) -> Result<String> {
        match tool_name {
            "get_latest_draw" => self.draw_use_case.get_latest_draw(arguments).await,
            "add_ticket" => self.draw_use_case.add_ticket(arguments).await,
            "list_tickets" => self.draw_use_case.list_tickets(arguments).await,
            "get_prize_summary" => self.history_use_case.get_prize_summary(arguments).await,
            "get_prize_timeline" => self.history_use_case.get_prize_timeline(arguments).await,
            "get_recent_draws" => self.history_use_case.get_recent_draws(arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", tool_name)),
        }
    }

    fn get_tools(&self) -> Vec<Tool> {
        let contest_range = json!({
            "type": "object",
            "properties": {
                "min_contest": {
                    "type": "integer",
                    "description": "First contest of the range (default: oldest available)"
                },
                "max_contest": {
                    "type": "integer",
                    "description": "Last contest of the range (default: newest available)"
                }
            }
        });

        vec![
            Tool {
                name: "get_latest_draw".to_string(),
                description: "Get the latest official Mega-Sena draw".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            Tool {
                name: "add_ticket".to_string(),
                description: "Validate a 6-number ticket and add it to this session".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "numbers": {
                            "type": "array",
                            "description": "Six numbers between 1 and 60, as strings or integers",
                            "items": {"type": ["string", "integer"]},
                            "minItems": 6,
                            "maxItems": 6
                        }
                    },
                    "required": ["numbers"]
                }),
            },
            Tool {
                name: "list_tickets".to_string(),
                description: "List this session's tickets with their matches against the latest draw".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {}
                }),
            },
            Tool {
                name: "get_prize_summary".to_string(),
                description: "Highest and mean estimated prize and accumulated contest count over a contest range".to_string(),
                input_schema: contest_range.clone(),
            },
            Tool {
                name: "get_prize_timeline".to_string(),
                description: "Estimated prize per contest over a contest range".to_string(),
                input_schema: contest_range,
            },
            Tool {
                name: "get_recent_draws".to_string(),
                description: "Most recent historical draws, flagging any equal to the latest draw".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "limit": {
                            "type": "integer",
                            "description": "Number of draws to return (default: 20)"
                        }
                    }
                }),
            },
        ]
    }
}

pub fn stdio() -> (BufReader<io::Stdin>, io::Stdout) {
    (BufReader::new(io::stdin()), io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use std::io::Cursor;

    fn handler() -> MCPHandler {
        let config = megasena::config::from_lookup(|_| None).unwrap();
        let session = Arc::new(Session::new(config));
        MCPHandler::new(
            Arc::new(DrawUseCase::new(Arc::clone(&session))),
            Arc::new(HistoryUseCase::new(session)),
        )
    }

    async fn exchange(lines: &[&str]) -> Vec<Value> {
        let input = lines.join("\n");
        let mut output = Vec::new();
        handler()
            .serve(Cursor::new(input), &mut output)
            .await
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn tool_text(response: &Value) -> Value {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn initialize_and_list_tools() {
        let responses = exchange(&[
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        ])
        .await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["result"]["serverInfo"]["name"], "megasena-mcp-server");
        assert_eq!(responses[0]["result"]["protocolVersion"], PROTOCOL_VERSION);

        let tools = responses[1]["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "get_latest_draw",
                "add_ticket",
                "list_tickets",
                "get_prize_summary",
                "get_prize_timeline",
                "get_recent_draws"
            ]
        );
    }

    #[tokio::test]
    async fn protocol_errors() {
        let responses = exchange(&[
            "{not json",
            r#"{"jsonrpc":"2.0","id":3,"method":"resources/list"}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call"}"#,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"nope"}}"#,
        ])
        .await;

        assert_eq!(responses[0]["error"]["code"], PARSE_ERROR);
        assert_eq!(responses[1]["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(responses[1]["id"], 3);
        assert_eq!(responses[2]["error"]["code"], INVALID_PARAMS);
        assert_eq!(responses[3]["error"]["code"], INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn tickets_are_validated_and_kept_for_the_session() {
        let responses = exchange(&[
            r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"list_tickets"}}"#,
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"add_ticket","arguments":{"numbers":["6","5","4","3","2","1"]}}}"#,
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"add_ticket","arguments":{"numbers":[1,2,3,4,5,0]}}}"#,
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"add_ticket","arguments":{"numbers":[1,2,3,4,5,61]}}}"#,
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"add_ticket","arguments":{"numbers":["1","1","2","3","4","5"]}}}"#,
        ])
        .await;

        let empty = tool_text(&responses[0]);
        assert_eq!(empty["tickets"].as_array().unwrap().len(), 0);

        let added = tool_text(&responses[1]);
        assert_eq!(added["success"], true);
        assert_eq!(added["ticket"], "01-02-03-04-05-06");

        let codes: Vec<Value> = responses[2..]
            .iter()
            .map(|r| tool_text(r)["error"].clone())
            .collect();
        assert_eq!(
            codes,
            vec![
                json!("missing_digits"),
                json!("out_of_range"),
                json!("duplicate_numbers")
            ]
        );
    }
}

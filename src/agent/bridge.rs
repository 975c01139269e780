//! Local end of the stdio bridge.
//!
//! The hosting runtime normally owns this process. Starting it here lets an
//! operator confirm the registered tool is actually reachable with the
//! configured credentials before handing the agent over.

use crate::agent::toolset::{McpToolset, StdioServerParameters};
use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";

/// Tool advertised by the remote MCP server
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ToolsPage {
    #[serde(default)]
    tools: Vec<ToolInfo>,
    #[serde(default, rename = "nextCursor")]
    next_cursor: Option<String>,
}

/// Newline-delimited JSON-RPC 2.0 client over any byte stream pair
pub struct McpSession<R, W> {
    reader: R,
    writer: W,
    next_id: u64,
}

impl<R, W> McpSession<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            next_id: 1,
        }
    }

    async fn send(&mut self, message: &Value) -> Result<()> {
        let mut line = serde_json::to_string(message)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send a request and wait for the response with the same id
    pub async fn request(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        debug!("MCP request #{}: {}", id, method);
        self.send(&json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        }))
        .await?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                return Err(Error::Bridge(format!(
                    "bridge closed before answering {method}"
                )));
            }

            let message: Value = match serde_json::from_str(line.trim()) {
                Ok(v) => v,
                Err(_) => {
                    // mcp-remote occasionally prints progress text on stdout
                    debug!("Ignoring non-JSON bridge output: {}", line.trim());
                    continue;
                }
            };

            if message.get("id").and_then(Value::as_u64) != Some(id) {
                debug!("Ignoring unrelated bridge message: {}", message);
                continue;
            }

            if let Some(err) = message.get("error") {
                return Err(Error::Bridge(format!("{method} failed: {err}")));
            }

            return Ok(message.get("result").cloned().unwrap_or(Value::Null));
        }
    }

    pub async fn notify(&mut self, method: &str) -> Result<()> {
        self.send(&json!({ "jsonrpc": "2.0", "method": method })).await
    }

    /// Run the initialize handshake
    pub async fn initialize(&mut self) -> Result<Value> {
        let result = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;

        self.notify("notifications/initialized").await?;
        Ok(result)
    }

    /// List every tool, following pagination cursors
    pub async fn list_tools(&mut self) -> Result<Vec<ToolInfo>> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let params = match &cursor {
                Some(c) => json!({ "cursor": c }),
                None => json!({}),
            };
            let page: ToolsPage = serde_json::from_value(self.request("tools/list", params).await?)?;
            tools.extend(page.tools);

            match page.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(tools)
    }
}

/// Spawned bridge subprocess with an open MCP session
pub struct BridgeProcess {
    child: Child,
    session: McpSession<BufReader<ChildStdout>, ChildStdin>,
    timeout: Duration,
}

impl BridgeProcess {
    /// Spawn the bridge command with piped stdio; the child dies with this value
    pub fn spawn(params: &StdioServerParameters, timeout: Duration) -> Result<Self> {
        info!(
            "Starting MCP bridge: {} {}",
            params.command,
            params.redacted().args.join(" ")
        );

        let mut child = Command::new(&params.command)
            .args(&params.args)
            .envs(&params.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Bridge(format!("Failed to spawn {}: {e}", params.command)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Bridge("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Bridge("bridge stdout unavailable".to_string()))?;

        Ok(Self {
            child,
            session: McpSession::new(BufReader::new(stdout), stdin),
            timeout,
        })
    }

    /// Handshake, then list the tools the toolset filter lets through
    pub async fn filtered_tools(&mut self, toolset: &McpToolset) -> Result<Vec<ToolInfo>> {
        let timeout = self.timeout;
        let session = &mut self.session;

        let tools = tokio::time::timeout(timeout, async {
            session.initialize().await?;
            session.list_tools().await
        })
        .await
        .map_err(|_| Error::Bridge(format!("no answer from bridge within {timeout:?}")))??;

        Ok(tools.into_iter().filter(|t| toolset.allows(&t.name)).collect())
    }

    /// Stop the subprocess and wait for it to exit
    pub async fn shutdown(mut self) -> Result<()> {
        if let Err(e) = self.child.start_kill() {
            warn!("Failed to send kill signal to bridge: {}", e);
        }

        match tokio::time::timeout(Duration::from_secs(5), self.child.wait()).await {
            Ok(Ok(status)) => debug!("MCP bridge exited: {}", status),
            Ok(Err(e)) => warn!("Error waiting for bridge to exit: {}", e),
            Err(_) => warn!("MCP bridge did not exit in time; it is killed on drop"),
        }

        Ok(())
    }
}

//! RPC client implementing the guard's host interface
//!
//! Handles all communication with blockchain nodes for the pair oracle.
//! Calls are driven on a tokio runtime handle, so the reader must be used
//! from a blocking context (e.g. inside `spawn_blocking`), never directly
//! from an async task.

use anyhow::{anyhow, Result};
use guard::{CallError, ChainReader};
use guard_config::RpcSettings;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use types::Address;
use web3::transports::Http;
use web3::types::{Bytes, CallRequest, U256};
use web3::Web3;

/// JSON-RPC error code geth uses for `execution reverted`
const EXECUTION_REVERTED_CODE: i64 = 3;

pub struct RpcChainReader {
    web3_clients: Vec<Web3<Http>>,
    handle: Handle,
    timeout: Duration,
}

impl RpcChainReader {
    /// Create new reader with configured endpoints
    pub fn new(settings: &RpcSettings, handle: Handle) -> Result<Self> {
        let mut web3_clients = Vec::new();

        // Add primary RPC
        let transport = Http::new(&settings.primary_rpc)?;
        web3_clients.push(Web3::new(transport));

        // Add fallback RPCs
        for rpc_url in &settings.fallback_rpcs {
            match Http::new(rpc_url) {
                Ok(transport) => web3_clients.push(Web3::new(transport)),
                Err(e) => warn!("Skipping fallback RPC {}: {}", rpc_url, e),
            }
        }

        if web3_clients.is_empty() {
            return Err(anyhow!("No valid RPC endpoints configured"));
        }

        Ok(Self {
            web3_clients,
            handle,
            timeout: Duration::from_millis(settings.rpc_timeout_ms),
        })
    }

    pub fn endpoint_count(&self) -> usize {
        self.web3_clients.len()
    }

    /// Try each endpoint until one answers. Execution failures are final;
    /// transport failures and timeouts move on to the next endpoint.
    fn run<T, F, Fut>(&self, method: &'static str, gas_limit: u64, mut op: F) -> Result<T, CallError>
    where
        F: FnMut(Web3<Http>) -> Fut,
        Fut: Future<Output = web3::Result<T>>,
    {
        let mut last_error = CallError::Transport("no RPC endpoints".to_string());

        for (idx, web3) in self.web3_clients.iter().enumerate() {
            let attempt = self
                .handle
                .block_on(tokio::time::timeout(self.timeout, op(web3.clone())));

            match attempt {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    let error = classify_rpc_error(&e, gas_limit);
                    if !matches!(error, CallError::Transport(_)) {
                        return Err(error);
                    }
                    warn!("RPC endpoint {} failed {}: {}", idx, method, e);
                    last_error = error;
                }
                Err(_) => {
                    warn!("RPC endpoint {} timed out on {}", idx, method);
                    last_error = CallError::Transport(format!("{} timed out", method));
                }
            }
        }

        Err(last_error)
    }
}

impl ChainReader for RpcChainReader {
    fn has_code(&self, account: Address) -> Result<bool, CallError> {
        let code = self.run("eth_getCode", 0, |web3| async move {
            web3.eth().code(account, None).await
        })?;
        debug!(account = ?account, code_len = code.0.len(), "eth_getCode");
        Ok(!code.0.is_empty())
    }

    fn static_call(
        &self,
        target: Address,
        calldata: &[u8],
        gas_limit: u64,
    ) -> Result<Vec<u8>, CallError> {
        let request = CallRequest {
            to: Some(target),
            data: Some(Bytes(calldata.to_vec())),
            gas: Some(U256::from(gas_limit)),
            ..Default::default()
        };

        let output = self.run("eth_call", gas_limit, move |web3| {
            let request = request.clone();
            async move { web3.eth().call(request, None).await }
        })?;
        Ok(output.0)
    }
}

/// Map a web3 error onto the guard's call error taxonomy.
pub fn classify_rpc_error(error: &web3::Error, gas_limit: u64) -> CallError {
    match error {
        web3::Error::Rpc(rpc) => classify_execution_error(rpc.code.code(), &rpc.message, gas_limit),
        other => CallError::Transport(other.to_string()),
    }
}

/// Classify a JSON-RPC error object returned by `eth_call`.
///
/// Reverts and gas exhaustion are properties of the call and would repeat on
/// any node; everything else (rate limits, internal errors) is treated as a
/// transport problem.
pub fn classify_execution_error(code: i64, message: &str, gas_limit: u64) -> CallError {
    let message = message.to_ascii_lowercase();
    if message.contains("out of gas") || message.contains("gas required exceeds") {
        CallError::OutOfGas { limit: gas_limit }
    } else if code == EXECUTION_REVERTED_CODE || message.contains("revert") {
        CallError::Reverted
    } else {
        CallError::Transport(message)
    }
}

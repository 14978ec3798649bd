//! Chain Reader Adapter
//!
//! [`ChainReader`](guard::ChainReader) backed by JSON-RPC nodes, so the pair
//! oracle can be pointed at a live chain (e.g. to check a pool before its
//! factory is whitelisted). This adapter is the only place in the workspace
//! that talks to external nodes.
//!
//! Features:
//! - `eth_getCode` / `eth_call` with an explicit gas cap per call
//! - Primary + fallback endpoints; transport failures move on to the next
//!   endpoint, execution failures (revert, out of gas) do not
//! - Per-request timeout

pub mod rpc_client;

pub use rpc_client::{classify_rpc_error, RpcChainReader};

use async_trait::async_trait;
use tether_core::types::RequestKind;

use super::{RpcResponse, RpcTransport, TransportError};

/// Placeholder for builds without a gRPC client; every call fails.
pub struct UnsupportedRpcTransport;

#[async_trait]
impl RpcTransport for UnsupportedRpcTransport {
    async fn invoke(
        &self,
        _request_id: &str,
        _environment_id: &str,
    ) -> Result<RpcResponse, TransportError> {
        Err(TransportError::Unsupported(RequestKind::Rpc))
    }
}

use tether_core::types::RequestKind;

use crate::extract::ResponseView;
use crate::script::ResponseData;
use crate::transport::{HttpResponse, RpcResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Http(HttpResponse),
    Rpc(RpcResponse),
}

impl Response {
    pub fn kind(&self) -> RequestKind {
        match self {
            Response::Http(_) => RequestKind::Http,
            Response::Rpc(_) => RequestKind::Rpc,
        }
    }

    pub fn status_code(&self) -> i32 {
        match self {
            Response::Http(r) => i32::from(r.status_code),
            Response::Rpc(r) => r.status_code,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Response::Http(r) => &r.body,
            Response::Rpc(r) => &r.body,
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        match self {
            Response::Http(r) => r.elapsed,
            Response::Rpc(r) => r.elapsed,
        }
    }

    pub fn as_http(&self) -> Option<&HttpResponse> {
        match self {
            Response::Http(r) => Some(r),
            Response::Rpc(_) => None,
        }
    }

    pub fn as_rpc(&self) -> Option<&RpcResponse> {
        match self {
            Response::Rpc(r) => Some(r),
            Response::Http(_) => None,
        }
    }

    pub fn view(&self) -> ResponseView {
        match self {
            Response::Http(r) => ResponseView::from_http(r),
            Response::Rpc(r) => ResponseView::from_rpc(r),
        }
    }

    pub(crate) fn script_data(&self) -> ResponseData {
        match self {
            Response::Http(r) => ResponseData::from_http(r),
            Response::Rpc(r) => ResponseData::from_rpc(r),
        }
    }
}

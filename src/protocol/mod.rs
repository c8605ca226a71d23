//! Protocol message definitions

pub mod jsonrpc;
pub mod request;
pub mod response;

pub use {
    jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId},
    request::{
        ActiveParams, ConfigParams, ConnectParams, IfaceParams, MacParams, PhyModeParams, Request,
        WifiModeParams,
    },
    response::{
        AckResponse, ActiveResponse, ConfigResponse, IfconfigResponse, IsConnectedResponse,
        MacResponse, NetworkEntry, PhyModeResponse, Response, ScanResultsResponse, StatusResponse,
        WifiModeResponse,
    },
};

//! JSON-RPC request handler for Unix socket transport

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    core::{
        error::{WlanError, WlanResult},
        service::WlanService,
        types::RadioMode,
    },
    driver::RadioDriver,
    protocol::{
        AckResponse, ActiveParams, ActiveResponse, ConfigParams, ConfigResponse, ConnectParams,
        IfaceParams, IfconfigResponse, IsConnectedResponse, JsonRpcError, JsonRpcRequest,
        JsonRpcResponse, MacParams, MacResponse, PhyModeParams, PhyModeResponse, Request,
        Response, ScanResultsResponse, StatusResponse, WifiModeParams, WifiModeResponse,
    },
};

/// JSON-RPC request handler
pub struct RequestHandler<D: RadioDriver> {
    service: Arc<WlanService<D>>,
}

impl<D: RadioDriver> RequestHandler<D> {
    /// Create a new request handler
    pub fn new(service: Arc<WlanService<D>>) -> Self {
        Self { service }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = match request.request {
            Request::Active(params) => self.handle_active(params).await,
            Request::Connect(params) => self.handle_connect(params).await,
            Request::Disconnect(params) => self.handle_disconnect(params).await,
            Request::Status(params) => self.handle_status(params).await,
            Request::Scan(params) => self.handle_scan(params).await,
            Request::IsConnected(params) => self.handle_is_connected(params).await,
            Request::Mac(params) => self.handle_mac(params).await,
            Request::Config(params) => self.handle_config(params).await,
            Request::Ifconfig(params) => self.handle_ifconfig(params).await,
            Request::WifiMode(params) => self.handle_wifi_mode(params).await,
            Request::PhyMode(params) => self.handle_phy_mode(params).await,
        };

        match result {
            Ok(response) => JsonRpcResponse::success(response, request.id),
            Err(e) => {
                warn!("Request {:?} failed: {}", request.id, e);
                JsonRpcResponse::error(JsonRpcError::from(&e), request.id)
            }
        }
    }

    async fn handle_active(&self, params: ActiveParams) -> WlanResult<Response> {
        let iface = self.service.interface(params.iface)?;
        match params.enabled {
            Some(enabled) => {
                iface.set_active(enabled).await?;
                Ok(Response::Ack(AckResponse::ok()))
            }
            None => Ok(Response::Active(ActiveResponse::ok(iface.is_active().await?))),
        }
    }

    async fn handle_connect(&self, params: ConnectParams) -> WlanResult<Response> {
        let iface = self.service.interface(params.iface)?;
        iface
            .connect(params.ssid.as_bytes(), params.password.as_bytes())
            .await?;
        Ok(Response::Ack(AckResponse::ok()))
    }

    async fn handle_disconnect(&self, params: IfaceParams) -> WlanResult<Response> {
        self.service.interface(params.iface)?.disconnect().await?;
        Ok(Response::Ack(AckResponse::ok()))
    }

    async fn handle_status(&self, params: IfaceParams) -> WlanResult<Response> {
        let state = self.service.interface(params.iface)?.status().await?;
        Ok(Response::Status(StatusResponse::ok(state)))
    }

    async fn handle_scan(&self, params: IfaceParams) -> WlanResult<Response> {
        let records = self.service.interface(params.iface)?.scan().await?;
        debug!("Scan returned {} networks", records.len());
        Ok(Response::ScanResults(ScanResultsResponse::ok(&records)))
    }

    async fn handle_is_connected(&self, params: IfaceParams) -> WlanResult<Response> {
        let connected = self.service.interface(params.iface)?.is_connected().await?;
        Ok(Response::IsConnected(IsConnectedResponse::ok(connected)))
    }

    async fn handle_mac(&self, params: MacParams) -> WlanResult<Response> {
        let iface = self.service.interface(params.iface)?;
        match params.decode_mac().map_err(WlanError::InvalidArguments)? {
            Some(bytes) => {
                iface.set_mac(&bytes).await?;
                Ok(Response::Ack(AckResponse::ok()))
            }
            None => Ok(Response::Mac(MacResponse::ok(iface.mac().await?))),
        }
    }

    async fn handle_config(&self, params: ConfigParams) -> WlanResult<Response> {
        let iface = self.service.interface(params.iface)?;
        let call = params.to_call()?;
        match iface.config(call).await? {
            Some(value) => Ok(Response::Config(ConfigResponse::ok(value))),
            None => Ok(Response::Ack(AckResponse::ok())),
        }
    }

    async fn handle_ifconfig(&self, params: IfaceParams) -> WlanResult<Response> {
        let config = self.service.interface(params.iface)?.ifconfig().await?;
        Ok(Response::Ifconfig(IfconfigResponse::ok(config)))
    }

    async fn handle_wifi_mode(&self, params: WifiModeParams) -> WlanResult<Response> {
        match params.mode {
            Some(bits) => {
                let mode = RadioMode::try_from(bits)
                    .map_err(|_| WlanError::InvalidArguments(format!("invalid mode {bits}")))?;
                self.service.set_wifi_mode(mode).await?;
                Ok(Response::Ack(AckResponse::ok()))
            }
            None => {
                let mode = self.service.wifi_mode().await?;
                Ok(Response::WifiMode(WifiModeResponse::ok(mode.bits())))
            }
        }
    }

    async fn handle_phy_mode(&self, params: PhyModeParams) -> WlanResult<Response> {
        match params.mode {
            Some(mode) => {
                self.service.set_phy_mode(mode).await?;
                Ok(Response::Ack(AckResponse::ok()))
            }
            None => Ok(Response::PhyMode(PhyModeResponse::ok(
                self.service.phy_mode().await?,
            ))),
        }
    }
}

//! Router for the IP lookup API

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, State};
use axum::{Extension, Router, routing::get};
use http::{HeaderMap, header};

use super::public;
use crate::api::public::{ApiError, ApiJson};
use crate::api::state::AppState;
use crate::ip::{client_ip, is_private, normalize_user_agent};

type SharedState = Arc<AppState>;

/// Describe the caller. The peer address is only present when the
/// server was started with connect info, so it's optional here and
/// the forwarding headers take precedence anyway.
async fn whoami(
    State(state): State<SharedState>,
    headers: HeaderMap,
    connect_info: Option<Extension<ConnectInfo<SocketAddr>>>,
) -> Result<ApiJson<public::IpResponse>, ApiError> {
    let peer = connect_info.map(|Extension(ConnectInfo(addr))| addr);
    let ip = client_ip(&headers, peer);
    let user_agent = normalize_user_agent(
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
    );

    let Some(ip) = ip.filter(|ip| !is_private(ip)) else {
        return Ok(ApiJson(public::IpResponse {
            ip,
            is_private: true,
            geo: None,
            asn: None,
            user_agent,
        }));
    };

    let (geo, asn) = state
        .geo
        .lookup(ip)
        .await
        .map_err(|e| ApiError::at("ip", e))?;

    Ok(ApiJson(public::IpResponse {
        ip: Some(ip),
        is_private: false,
        geo: Some(geo),
        asn,
        user_agent,
    }))
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(whoami))
}

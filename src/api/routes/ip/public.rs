//! Public types for the IP lookup API
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::ip::{AsnInfo, GeoInfo};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpResponse {
    pub ip: Option<IpAddr>,
    pub is_private: bool,
    pub geo: Option<GeoInfo>,
    pub asn: Option<AsnInfo>,
    pub user_agent: Option<String>,
}

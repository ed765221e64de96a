use huddle_core::IceServerConfig;
use huddle_core::utils::DATA_CHANNEL_LABEL;

/// Upper bound of ICE candidates held for a member that has no link yet.
pub const DEFAULT_EARLY_CANDIDATE_LIMIT: usize = 32;

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Label of the data channel the initiator creates.
    pub channel_label: String,
    pub early_candidate_limit: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            channel_label: DATA_CHANNEL_LABEL.to_string(),
            early_candidate_limit: DEFAULT_EARLY_CANDIDATE_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RtcConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl RtcConfig {
    /// Host candidates only. Enough for peers on the same machine or LAN.
    pub fn loopback() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            ice_servers: IceServerConfig::default_stun(),
        }
    }
}

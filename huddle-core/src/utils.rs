pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";

pub const DEFAULT_STUN_SERVERS: [&str; 2] = [DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2];

/// Label of the application data channel opened by the initiator.
pub const DATA_CHANNEL_LABEL: &str = "messages";

/// Default period of the display-name sweep (milliseconds)
pub const DEFAULT_RECONCILE_INTERVAL_MS: u64 = 1000;

/// Rewrite foreign display names in outbound packets by default
pub const DEFAULT_ANTI_OVERRIDE: bool = true;

/// Ping spoofing is opt-in
pub const DEFAULT_PING_SPOOF_ENABLED: bool = false;

/// Latency shown while ping spoofing is enabled
pub const DEFAULT_PING_SPOOF_VALUE: i32 = 0;

/// Rewrite profile names of nicked players by default
pub const DEFAULT_NICK_COMPAT: bool = true;

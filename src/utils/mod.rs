/// Highest VLAN id usable on EOS
pub const MAX_VLAN_ID: i64 = 4094;

/// Highest 24-bit VXLAN network identifier
pub const MAX_VNI: i64 = 16_777_215;

/// Validate an IPv4 address (e.g., "192.168.1.1").
/// Returns true if the string is a valid dotted-decimal IPv4 address.
pub fn is_valid_ipv4(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }
    parts.iter().all(|p| p.parse::<u8>().is_ok())
}

/// Validate a hostname.
/// Allows alphanumeric, hyphens, dots, and underscores. No path separators or shell metacharacters.
pub fn is_valid_hostname(hostname: &str) -> bool {
    if hostname.is_empty() || hostname.len() > 253 {
        return false;
    }
    hostname.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

/// Validate a management address: IPv4, or a hostname with an optional `:port`
pub fn is_valid_mgmt_address(addr: &str) -> bool {
    let host = match addr.rsplit_once(':') {
        Some((host, port)) => {
            if port.parse::<u16>().is_err() {
                return false;
            }
            host
        }
        None => addr,
    };
    is_valid_ipv4(host) || is_valid_hostname(host)
}

/// Check a VLAN id against 1-4094
pub fn validate_vlan_id(vlan_id: i64) -> Option<u16> {
    if (1..=MAX_VLAN_ID).contains(&vlan_id) {
        Some(vlan_id as u16)
    } else {
        None
    }
}

/// Check a VNI against 1-16777215
pub fn validate_vni(vni: i64) -> Option<u32> {
    if (1..=MAX_VNI).contains(&vni) {
        Some(vni as u32)
    } else {
        None
    }
}

/// Validate an EOS interface name such as `Loopback1` or `Ethernet1/1`.
/// Rejects whitespace so a name can never smuggle a second CLI command.
pub fn is_valid_interface_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 64 {
        return false;
    }
    let starts_alpha = name.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_alpha
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '/' || c == '.' || c == '-')
}

/// Validate a VLAN name (EOS limits names to 32 characters)
pub fn is_valid_vlan_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 32
        && name.chars().all(|c| c.is_ascii_graphic())
}

/// Render an uptime in seconds as "3d 4h 5m"
pub fn format_uptime(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return String::new();
    }
    let total = seconds as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

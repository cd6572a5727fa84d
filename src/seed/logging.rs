//! Logging utilities for seeder handlers.

use payload_sink::HandshakeHeader;

/// Render a handshake header with its value masked for safe logging.
pub fn mask_header(header: &HandshakeHeader) -> String {
    let visible: String = header.value.chars().take(4).collect();
    if header.value.chars().count() <= 8 {
        format!("{}: ***", header.name)
    } else {
        format!("{}: {}***", header.name, visible)
    }
}

/// Mask the userinfo part of a URL (`ws://user:pass@host`).
///
/// Only an `@` inside the authority counts; one in the path or query is left
/// alone.
pub fn mask_target_credentials(target: &str) -> String {
    let scheme_end = target.find("://").map(|p| p + 3).unwrap_or(0);
    let rest = &target[scheme_end..];
    let authority = rest.find(['/', '?', '#']).map_or(rest, |end| &rest[..end]);
    match authority.rfind('@') {
        Some(at_pos) => format!("{}***{}", &target[..scheme_end], &rest[at_pos..]),
        None => target.to_string(),
    }
}

//! Distributed trace/span identifier generation
//!
//! Stateless and safe to call from any thread. The only process-global
//! state is the local IPv4 address, read once on first use so every id
//! from one process shares the same host component.

use rand::Rng;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Constant 2-character suffix identifying the producing implementation.
pub const ORIGIN_TAG: &str = "rs";

/// Correlation identifiers for one inbound unit of work.
///
/// The caller carries these through its own transport (headers, context);
/// the core only generates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
}

impl TraceContext {
    pub fn new() -> Self {
        Self {
            trace_id: new_trace_id(),
            span_id: new_span_id(),
        }
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Local non-loopback IPv4 address, detected once per process.
fn local_ipv4() -> Option<Ipv4Addr> {
    static IP: OnceLock<Option<Ipv4Addr>> = OnceLock::new();
    *IP.get_or_init(detect_local_ipv4)
}

/// Connected-UDP idiom: binding and connecting selects the outbound
/// interface without sending a packet.
fn detect_local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) if !addr.ip().is_loopback() => Some(*addr.ip()),
        _ => None,
    }
}

fn unix_now() -> (u64, u128) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs(), now.as_nanos())
}

/// 32-character trace id: ip(8) + unix-seconds(8) + nanos low 16 bits(4) +
/// pid low 16 bits(4) + 24-bit random(6) + [`ORIGIN_TAG`].
pub fn new_trace_id() -> String {
    let (secs, nanos) = unix_now();
    let host = match local_ipv4() {
        Some(ip) => format!("{:08x}", u32::from(ip)),
        None => "00000000".to_string(),
    };
    let random: u32 = rand::thread_rng().gen_range(0..(1 << 24));
    format!(
        "{}{:08x}{:04x}{:04x}{:06x}{}",
        host,
        secs & 0xffff_ffff,
        nanos & 0xffff,
        std::process::id() & 0xffff,
        random,
        ORIGIN_TAG
    )
}

/// 16-character span id: (ip XOR unix-seconds)(8) + 32-bit random(8).
pub fn new_span_id() -> String {
    let (secs, _) = unix_now();
    let ip = local_ipv4().map(u32::from).unwrap_or(0);
    format!(
        "{:08x}{:08x}",
        ip ^ (secs as u32),
        rand::thread_rng().gen::<u32>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn trace_id_has_documented_shape() {
        let id = new_trace_id();
        assert_eq!(id.len(), 32);
        assert!(id.ends_with(ORIGIN_TAG));
        assert!(is_lower_hex(&id[..30]), "non-hex in: {}", id);
    }

    #[test]
    fn span_id_has_documented_shape() {
        let id = new_span_id();
        assert_eq!(id.len(), 16);
        assert!(is_lower_hex(&id), "non-hex in: {}", id);
    }

    #[test]
    fn context_bundles_both_ids() {
        let ctx = TraceContext::new();
        assert_eq!(ctx.trace_id.len(), 32);
        assert_eq!(ctx.span_id.len(), 16);
    }

    #[test]
    fn concurrent_generation_does_not_collide() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                thread::spawn(|| {
                    (0..250)
                        .map(|_| (new_trace_id(), new_span_id()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut trace_ids = HashSet::new();
        let mut span_ids = HashSet::new();
        for handle in handles {
            for (trace_id, span_id) in handle.join().expect("generator thread panicked") {
                assert!(trace_ids.insert(trace_id), "trace id collision");
                assert!(span_ids.insert(span_id), "span id collision");
            }
        }
        assert_eq!(trace_ids.len(), 8 * 250);
    }
}

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::domain::entities::{NetConnection, Protocol};
use crate::domain::ports::metric_source::CollectionError;

/// Socket tables read on Linux, with the protocol each one holds.
#[cfg(target_os = "linux")]
const SOCKET_TABLES: &[(&str, Protocol)] = &[
    ("/proc/net/tcp", Protocol::Tcp),
    ("/proc/net/tcp6", Protocol::Tcp),
    ("/proc/net/udp", Protocol::Udp),
    ("/proc/net/udp6", Protocol::Udp),
];

/// Status reported for connectionless sockets.
const UDP_STATUS: &str = "NONE";

/// Lists inet sockets from the kernel socket tables.
pub struct ConnectionCollector;

impl ConnectionCollector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// # Errors
    ///
    /// Returns `CollectionError::PermissionDenied` if a socket table is not
    /// readable, `CollectionError::MetricsUnavailable` on other I/O errors.
    /// A missing IPv6 table (IPv6 disabled) is skipped.
    #[cfg(target_os = "linux")]
    pub fn collect(&self) -> Result<Vec<NetConnection>, CollectionError> {
        let mut connections = Vec::new();

        for &(path, protocol) in SOCKET_TABLES {
            let content = match std::fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                    return Err(CollectionError::PermissionDenied(format!("{path}: {e}")))
                }
                Err(e) => {
                    return Err(CollectionError::MetricsUnavailable(format!(
                        "failed to read {path}: {e}"
                    )))
                }
            };
            connections.extend(parse_socket_table(&content, protocol));
        }

        Ok(connections)
    }

    /// # Errors
    ///
    /// Always returns `CollectionError::Unsupported` outside Linux.
    #[cfg(not(target_os = "linux"))]
    pub fn collect(&self) -> Result<Vec<NetConnection>, CollectionError> {
        Err(CollectionError::Unsupported(
            "socket table enumeration".to_string(),
        ))
    }
}

impl Default for ConnectionCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn tcp_state(code: &str) -> &'static str {
    match code {
        "01" => "ESTABLISHED",
        "02" => "SYN_SENT",
        "03" => "SYN_RECV",
        "04" => "FIN_WAIT1",
        "05" => "FIN_WAIT2",
        "06" => "TIME_WAIT",
        "07" => "CLOSE",
        "08" => "CLOSE_WAIT",
        "09" => "LAST_ACK",
        "0A" => "LISTEN",
        "0B" => "CLOSING",
        _ => "UNKNOWN",
    }
}

/// Decodes one 32-bit word as the kernel prints it: host byte order, in hex.
fn le_word(hex: &str) -> Option<[u8; 4]> {
    u32::from_str_radix(hex, 16).ok().map(u32::to_le_bytes)
}

fn parse_ip(hex: &str) -> Option<IpAddr> {
    match hex.len() {
        8 => le_word(hex).map(|b| IpAddr::V4(Ipv4Addr::from(b))),
        32 => {
            let mut octets = [0u8; 16];
            for (i, chunk) in octets.chunks_exact_mut(4).enumerate() {
                let word = hex.get(i * 8..(i + 1) * 8)?;
                chunk.copy_from_slice(&le_word(word)?);
            }
            Some(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        _ => None,
    }
}

/// Parses `ADDR:PORT` with a hex address and hex port.
fn parse_endpoint(field: &str) -> Option<SocketAddr> {
    let (addr, port) = field.split_once(':')?;
    let ip = parse_ip(addr)?;
    let port = u16::from_str_radix(port, 16).ok()?;
    Some(SocketAddr::new(ip, port))
}

fn parse_socket_line(line: &str, protocol: Protocol) -> Option<NetConnection> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    // sl local_address rem_address st ...
    if fields.len() < 4 || !fields[0].ends_with(':') {
        return None;
    }

    let local = parse_endpoint(fields[1])?;
    let remote = parse_endpoint(fields[2])?;
    let remote = (!(remote.ip().is_unspecified() && remote.port() == 0)).then_some(remote);

    let status = match protocol {
        Protocol::Tcp => tcp_state(fields[3]),
        Protocol::Udp => UDP_STATUS,
    };

    Some(NetConnection {
        protocol,
        local,
        remote,
        status: status.to_string(),
    })
}

/// Parses a `/proc/net/{tcp,tcp6,udp,udp6}` table, skipping the header
/// and any malformed row.
///
/// Format:
///   sl  local_address rem_address   st tx_queue rx_queue ...
///    0: 0100007F:0CEA 00000000:0000 0A 00000000:00000000 ...
fn parse_socket_table(content: &str, protocol: Protocol) -> Vec<NetConnection> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| parse_socket_line(line, protocol))
        .collect()
}

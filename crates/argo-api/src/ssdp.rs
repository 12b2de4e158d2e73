// SSDP wire format
//
// The probe is an HTTP-request-like datagram; replies are HTTP-response-like
// text with colon-delimited header lines. Nothing here touches a socket.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// SSDP multicast group and port.
pub const MULTICAST_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(239, 255, 255, 250), 1900));

/// Only media renderers are asked to answer.
pub const MEDIA_RENDERER_TARGET: &str = "urn:schemas-upnp-org:device:MediaRenderer:1";

/// Header carrying the description document URL.
pub const LOCATION_HEADER: &str = "LOCATION";

/// Header carrying the unique service name.
pub const USN_HEADER: &str = "USN";

/// Build an `M-SEARCH` probe for `search_target`.
///
/// `mx_secs` is the maximum delay a device may wait before answering and
/// should match the caller's receive window.
pub fn search_message(host: SocketAddr, search_target: &str, mx_secs: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {host}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         ST: {search_target}\r\n\
         MX: {mx_secs}\r\n\
         \r\n"
    )
}

/// Split a reply into header fields.
///
/// Every line containing a `:` contributes `name -> trimmed value`, where
/// `name` is everything before the first colon, kept verbatim. Other lines
/// (including the status line) are ignored. A repeated name keeps its last
/// value.
pub fn parse_headers(reply: &str) -> BTreeMap<String, String> {
    reply
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.to_owned(), value.trim().to_owned()))
        .collect()
}

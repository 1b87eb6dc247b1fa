// Host reachability probing
// A negative answer is advisory only: plenty of networks drop these probes
// while the file protocol itself still works.

use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::process::{Command, Stdio};
use std::time::Duration;

/// Windows file sharing port, probed because the locations we care about
/// are SMB shares.
const FILE_SHARING_PORT: u16 = 445;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Check whether a host answers at the file-sharing port, falling back to a
/// single ICMP echo if the TCP probe is inconclusive.
pub fn host_reachable(host: &str) -> bool {
    match tcp_probe(host, FILE_SHARING_PORT) {
        Some(true) => true,
        _ => ping_probe(host),
    }
}

/// TCP connect probe. A refused connection still proves the host is up,
/// just not serving SMB on that port.
fn tcp_probe(host: &str, port: u16) -> Option<bool> {
    let addrs: Vec<_> = (host, port).to_socket_addrs().ok()?.collect();
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(_) => return Some(true),
            Err(err) if err.kind() == io::ErrorKind::ConnectionRefused => return Some(true),
            Err(_) => {}
        }
    }
    Some(false)
}

/// One ICMP echo with a 1 second deadline, via the platform ping binary.
fn ping_probe(host: &str) -> bool {
    let mut cmd = Command::new("ping");
    if cfg!(windows) {
        cmd.args(["-n", "1", "-w", "1000"]);
    } else {
        cmd.args(["-c", "1", "-W", "1"]);
    }
    cmd.arg(host)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

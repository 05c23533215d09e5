//! Interactive provisioning tool for DAWONDNS smart plugs.
//!
//! Usage:
//!   dawon-provision
//!
//! Connect the host to the plug's setup access point first. Set `RUST_LOG=debug`
//! to trace the session and the TCP connection on stderr.

use dawon_provision::{Console, Outcome, Session, TcpConnector, Transmitter};
use std::io;
use std::process::exit;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    let transmitter = Transmitter::new(TcpConnector::default());

    let mut session = Session::new(console, transmitter);
    match session.run() {
        Ok(Outcome::Provisioned) => {}
        Ok(Outcome::TransmitFailed(_)) => exit(1),
        Ok(Outcome::Aborted) => exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

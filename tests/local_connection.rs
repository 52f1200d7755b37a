use log::LevelFilter;
use std::time::{Duration, Instant};

use remote_connect::connections::local::LocalConnection;
use remote_connect::{Connection, Connector, Target, TransportConnector};

fn init_test_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn shell_available() -> bool {
    which::which("sh").is_ok()
}

fn read_for(conn: &mut dyn Connection, needle: &str) -> anyhow::Result<String> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut received = String::new();
    let mut buf = [0u8; 64];
    while !received.contains(needle) && Instant::now() < deadline {
        let n = conn.read(&mut buf)?;
        received.push_str(&String::from_utf8_lossy(&buf[..n]));
    }
    Ok(received)
}

#[test]
fn command_output_comes_back() -> anyhow::Result<()> {
    if !shell_available() {
        eprintln!("sh not on PATH, skipping");
        return Ok(());
    }
    init_test_logging();

    let mut conn = LocalConnection::new();
    conn.connect()?;
    conn.write(b"echo remote-connect-marker\n")?;
    let output = read_for(&mut conn, "remote-connect-marker")?;
    assert!(output.contains("remote-connect-marker"), "got: {:?}", output);

    conn.disconnect()?;
    Ok(())
}

#[test]
fn stderr_is_merged_into_reads() -> anyhow::Result<()> {
    if !shell_available() {
        return Ok(());
    }
    init_test_logging();

    let mut conn = LocalConnection::new();
    conn.connect()?;
    conn.write(b"echo on-stderr 1>&2\n")?;
    let output = read_for(&mut conn, "on-stderr")?;
    assert!(output.contains("on-stderr"), "got: {:?}", output);

    conn.disconnect()?;
    Ok(())
}

#[test]
fn local_target_goes_through_the_transport_connector() -> anyhow::Result<()> {
    if !shell_available() {
        return Ok(());
    }
    init_test_logging();

    assert_eq!(Target::parse("local:")?, Target::Local);
    let mut conn = TransportConnector::new().connect("local:", Some("ignored"), None)?;
    conn.write(b"echo via-connector\n")?;
    let output = read_for(&mut *conn, "via-connector")?;
    assert!(output.contains("via-connector"), "got: {:?}", output);

    conn.disconnect()?;
    Ok(())
}

#[test]
fn missing_shell_binary_fails_to_connect() {
    let mut conn = LocalConnection::with_shell("definitely-not-a-shell-binary");
    assert!(conn.connect().is_err());
}

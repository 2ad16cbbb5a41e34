//! Connection Tests
//!
//! Socket-level behavior against throwaway listeners on 127.0.0.1.

use std::io::Write;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tapstream::{Config, Connection, Endpoint, TapError};

fn test_config(read_timeout_ms: u64) -> Config {
    Config::builder()
        .connect_timeout_ms(2_000)
        .read_timeout_ms(read_timeout_ms)
        .build()
}

fn epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

/// Bind a listener on an ephemeral port and return its address string
fn local_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    (listener, addr)
}

// =============================================================================
// Connect Tests
// =============================================================================

#[test]
fn test_connect_and_is_alive() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let _sock = listener.accept().unwrap();
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let conn = Connection::connect(endpoint, &test_config(1_000)).unwrap();
    assert!(conn.is_alive());
    assert_eq!(conn.endpoint().down_at, None);

    handle.join().unwrap();
}

#[test]
fn test_connect_refused_is_network_error() {
    let (listener, addr) = local_listener();
    drop(listener);

    let endpoint = Endpoint::parse(&addr).unwrap();
    let err = Connection::connect(endpoint, &test_config(1_000))
        .err()
        .expect("connect to a closed port should fail");
    assert!(matches!(err, TapError::Network(_)), "got: {}", err);
}

#[test]
fn test_connect_fast_fails_on_recently_down_endpoint() {
    // The backoff window is one wall-clock second; retry in case the
    // second rolls over between stamping and connecting.
    for _ in 0..3 {
        let mut endpoint = Endpoint::parse("127.0.0.1:1").unwrap();
        endpoint.down_at = Some(epoch_seconds());
        match Connection::connect(endpoint, &test_config(1_000)) {
            Err(TapError::Down(_)) => return,
            Err(_) => continue,
            Ok(_) => panic!("connect to port 1 should not succeed"),
        }
    }
    panic!("never observed the down fast-fail");
}

// =============================================================================
// Read Tests
// =============================================================================

#[test]
fn test_read_stall_times_out_and_marks_down() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let (_sock, _) = listener.accept().unwrap();
        // hold the connection open without writing anything
        thread::sleep(Duration::from_millis(500));
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let mut conn = Connection::connect(endpoint, &test_config(100)).unwrap();

    let err = conn.read_exact(24).err().expect("read should time out");
    assert!(matches!(err, TapError::Timeout(_)), "got: {}", err);
    assert!(!conn.is_alive());
    assert!(conn.endpoint().down_at.is_some());

    handle.join().unwrap();
}

#[test]
fn test_clean_eof_before_any_byte_returns_no_data() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let (sock, _) = listener.accept().unwrap();
        drop(sock);
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let mut conn = Connection::connect(endpoint, &test_config(1_000)).unwrap();

    assert!(conn.read_exact(24).unwrap().is_none());
    assert!(!conn.is_alive());

    handle.join().unwrap();
}

#[test]
fn test_eof_mid_accumulation_is_network_error() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        sock.write_all(&[0u8; 10]).unwrap();
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let mut conn = Connection::connect(endpoint, &test_config(1_000)).unwrap();

    let err = conn
        .read_exact(24)
        .err()
        .expect("truncated read should fail");
    assert!(matches!(err, TapError::Network(_)), "got: {}", err);
    assert!(!conn.is_alive());

    handle.join().unwrap();
}

#[test]
fn test_read_accumulates_across_partial_writes() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        sock.write_all(b"hello ").unwrap();
        sock.flush().unwrap();
        thread::sleep(Duration::from_millis(50));
        sock.write_all(b"world").unwrap();
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let mut conn = Connection::connect(endpoint, &test_config(2_000)).unwrap();

    let bytes = conn.read_exact(11).unwrap().expect("data expected");
    assert_eq!(&bytes[..], b"hello world");
    assert!(conn.is_alive());

    handle.join().unwrap();
}

// =============================================================================
// Down-State Tests
// =============================================================================

#[test]
fn test_mark_down_is_idempotent_and_terminal() {
    let (listener, addr) = local_listener();
    let handle = thread::spawn(move || {
        let _sock = listener.accept().unwrap();
    });

    let endpoint = Endpoint::parse(&addr).unwrap();
    let mut conn = Connection::connect(endpoint, &test_config(1_000)).unwrap();

    conn.mark_down();
    let stamped = conn.endpoint().down_at;
    assert!(stamped.is_some());
    assert!(!conn.is_alive());

    conn.mark_down();
    assert_eq!(conn.endpoint().down_at, stamped);

    let err = conn.write(b"x").err().expect("write on a down connection");
    assert!(matches!(err, TapError::Network(_)));

    let reclaimed = conn.into_endpoint();
    assert_eq!(reclaimed.down_at, stamped);

    handle.join().unwrap();
}

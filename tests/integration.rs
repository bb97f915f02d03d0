//! End-to-end tests: real TCP server, real clients, the full broadcast
//! path from framed send to sink delivery.

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::timeout;

use chatwire::{Client, Server};

async fn start_server() -> SocketAddr {
    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

/// Connect a client whose sink forwards every received body to a channel.
async fn connect(addr: SocketAddr) -> (Client, mpsc::UnboundedReceiver<Bytes>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let client = Client::connect(addr, move |body| {
        let _ = tx.send(body);
    })
    .await
    .unwrap();
    (client, rx)
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<Bytes>) -> Bytes {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a broadcast")
        .expect("connection ended before the expected broadcast")
}

#[tokio::test]
async fn test_sender_receives_own_echo() {
    let addr = start_server().await;
    let (client, mut rx) = connect(addr).await;

    client.send(b"hello").unwrap();
    assert_eq!(recv(&mut rx).await, &b"hello"[..]);
}

#[tokio::test]
async fn test_broadcast_scenario_two_clients() {
    let addr = start_server().await;

    // A connects and sends "hello"; its own echo confirms the room
    // delivered it.
    let (a, mut a_rx) = connect(addr).await;
    a.send(b"hello").unwrap();
    assert_eq!(recv(&mut a_rx).await, &b"hello"[..]);

    // B joins after the delivery and gets "hello" as history replay.
    let (_b, mut b_rx) = connect(addr).await;
    assert_eq!(recv(&mut b_rx).await, &b"hello"[..]);

    // A sends "world"; both receive it, ordered after "hello".
    a.send(b"world").unwrap();
    assert_eq!(recv(&mut a_rx).await, &b"world"[..]);
    assert_eq!(recv(&mut b_rx).await, &b"world"[..]);
}

#[tokio::test]
async fn test_fan_out_reaches_every_client() {
    let addr = start_server().await;

    let (sender, mut sender_rx) = connect(addr).await;
    let (_c1, mut rx1) = connect(addr).await;
    let (_c2, mut rx2) = connect(addr).await;

    sender.send(b"to everyone").unwrap();

    assert_eq!(recv(&mut sender_rx).await, &b"to everyone"[..]);
    assert_eq!(recv(&mut rx1).await, &b"to everyone"[..]);
    assert_eq!(recv(&mut rx2).await, &b"to everyone"[..]);
}

#[tokio::test]
async fn test_single_sender_ordering_preserved() {
    let addr = start_server().await;

    let (sender, _sender_rx) = connect(addr).await;
    let (_receiver, mut rx) = connect(addr).await;

    for n in 0..20u32 {
        sender.send(format!("msg-{}", n).as_bytes()).unwrap();
    }

    for n in 0..20u32 {
        assert_eq!(recv(&mut rx).await, format!("msg-{}", n).as_bytes());
    }
}

#[tokio::test]
async fn test_oversized_body_clamped_on_the_wire() {
    let addr = start_server().await;
    let (client, mut rx) = connect(addr).await;

    let body = vec![b'x'; 600];
    client.send(&body).unwrap();

    let received = recv(&mut rx).await;
    assert_eq!(received.len(), 512);
    assert!(received.iter().all(|&b| b == b'x'));
}

#[tokio::test]
async fn test_disconnect_does_not_disturb_others() {
    let addr = start_server().await;

    let (doomed, _doomed_rx) = connect(addr).await;
    let (survivor, mut survivor_rx) = connect(addr).await;

    // Abrupt departure: the dropped client's connection closes.
    drop(doomed);
    tokio::time::sleep(Duration::from_millis(50)).await;

    survivor.send(b"still here").unwrap();
    assert_eq!(recv(&mut survivor_rx).await, &b"still here"[..]);
}

#[tokio::test]
async fn test_orderly_close_ends_the_session() {
    let addr = start_server().await;
    let (client, _rx) = connect(addr).await;

    client.close();

    // The server observes EOF, drops the session, and closes its side;
    // the client's read pipeline then ends.
    timeout(Duration::from_secs(2), client.wait_for_shutdown())
        .await
        .expect("shutdown signal never fired");
}

#[tokio::test]
async fn test_history_replay_capped_at_100() {
    let addr = start_server().await;

    let (sender, mut sender_rx) = connect(addr).await;
    for n in 0..120u32 {
        sender.send(format!("{:03}", n).as_bytes()).unwrap();
    }
    // Drain the sender's own echoes to know all 120 were delivered.
    for _ in 0..120 {
        recv(&mut sender_rx).await;
    }

    let (_late, mut late_rx) = connect(addr).await;
    for n in 20..120u32 {
        assert_eq!(recv(&mut late_rx).await, format!("{:03}", n).as_bytes());
    }

    // Nothing beyond the replay until a new delivery happens.
    sender.send(b"fresh").unwrap();
    assert_eq!(recv(&mut late_rx).await, &b"fresh"[..]);
}

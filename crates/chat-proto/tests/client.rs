//! Client library against a scripted in-process server.

use std::time::Duration;

use chat_proto::{ChatClient, ClientEvent};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn next_event(events: &mut mpsc::Receiver<ClientEvent>) -> ClientEvent {
    timeout(WAIT, events.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_login_and_server_events() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        let login = lines.next_line().await.unwrap().unwrap();
        write
            .write_all(
                b"SUCCESS:login ok\r\n\
                  USER_LIST:alice,bob\n\
                  BROADCAST:1760700000000:bob:hi: alice\n\
                  PRIVATE:bob:psst\n\
                  NOT_A_THING:ignored\n\
                  ERROR:user ghost offline\n",
            )
            .await
            .unwrap();
        login
    });

    let (mut client, mut events) = ChatClient::connect(addr).await.unwrap();
    client.login("  alice ").await.unwrap();
    assert_eq!(client.username(), Some("alice"));

    assert_eq!(server.await.unwrap(), "LOGIN:alice");
    assert_eq!(
        next_event(&mut events).await,
        ClientEvent::MessageReceived("login ok".into())
    );
    assert_eq!(
        next_event(&mut events).await,
        ClientEvent::UserListUpdated(vec!["alice".into(), "bob".into()])
    );
    assert_eq!(
        next_event(&mut events).await,
        ClientEvent::MessageReceived("bob: hi: alice".into())
    );
    assert_eq!(
        next_event(&mut events).await,
        ClientEvent::PrivateMessageReceived {
            sender: "bob".into(),
            text: "psst".into()
        }
    );
    assert_eq!(
        next_event(&mut events).await,
        ClientEvent::ErrorOccurred("user ghost offline".into())
    );
    // Server task dropped its socket.
    assert_eq!(next_event(&mut events).await, ClientEvent::Disconnected);
}

#[tokio::test]
async fn test_blank_input_is_rejected_locally() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut seen = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            seen.push(line);
        }
        seen
    });

    let (mut client, mut events) = ChatClient::connect(addr).await.unwrap();
    client.login("   ").await.unwrap();
    assert!(matches!(next_event(&mut events).await, ClientEvent::ErrorOccurred(_)));
    client.send_broadcast("").await.unwrap();
    assert!(matches!(next_event(&mut events).await, ClientEvent::ErrorOccurred(_)));
    client.send_private("", "hi").await.unwrap();
    assert!(matches!(next_event(&mut events).await, ClientEvent::ErrorOccurred(_)));

    client.send_broadcast("still here").await.unwrap();
    // Not logged in, so nothing but the close.
    client.logout().await.unwrap();

    let seen = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(seen, vec!["BROADCAST:still here".to_string()]);
    assert_eq!(next_event(&mut events).await, ClientEvent::Disconnected);
}

#[tokio::test]
async fn test_logout_sends_name() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut seen = Vec::new();
        while let Ok(Some(line)) = lines.next_line().await {
            seen.push(line);
        }
        seen
    });

    let (mut client, _events) = ChatClient::connect(addr).await.unwrap();
    client.login("carol").await.unwrap();
    client.send_private("dave", "a:b").await.unwrap();
    client.logout().await.unwrap();

    let seen = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(seen, vec!["LOGIN:carol", "PRIVATE:dave:a:b", "LOGOUT:carol"]);
}

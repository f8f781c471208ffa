//! Raw line client.
//!
//! Writes lines exactly as given and decodes what the server sends, so tests
//! can exercise malformed input the library client would refuse to produce.

use chat_proto::{Direction, Message};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test chat client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
        })
    }

    /// Send a raw line; a `\n` is appended if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with('\n') {
            self.writer.write_all(b"\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Send raw bytes with no terminator added.
    #[allow(dead_code)]
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        Message::decode(&line, Direction::Outbound)
            .map_err(|e| anyhow::anyhow!("Parse error on {line:?}: {e}"))
    }

    /// Receive messages until the predicate matches, returning all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                break;
            }
        }
        Ok(messages)
    }

    /// Whether the server has closed the connection.
    #[allow(dead_code)]
    pub async fn is_closed(&mut self) -> bool {
        let mut line = String::new();
        loop {
            line.clear();
            match timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await {
                Ok(Ok(0)) | Ok(Err(_)) => return true,
                Ok(Ok(_)) => continue,
                Err(_) => return false,
            }
        }
    }

    /// Log in and consume replies up to this session's first user list.
    pub async fn login(&mut self, username: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("LOGIN:{username}")).await?;
        let messages = self
            .recv_until(|msg| matches!(msg, Message::UserList(_) | Message::Error(_)))
            .await?;

        match messages.first() {
            Some(Message::Success(_)) => Ok(()),
            other => anyhow::bail!("Login failed: {other:?}"),
        }
    }
}

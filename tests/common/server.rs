//! Test server management.
//!
//! Spawns and manages chatd instances for integration testing.

use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    // Held so the config file outlives the process.
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with default limits on a free port.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with_limits("").await
    }

    /// Spawn a server with extra `[limits]` entries.
    pub async fn spawn_with_limits(limits: &str) -> anyhow::Result<Self> {
        let port = free_port()?;
        let data_dir = tempfile::tempdir()?;

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.chat"

[listen]
address = "127.0.0.1:{port}"

[limits]
send_timeout_ms = 1000
{limits}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_chatd"))
            .arg(&config_path)
            .env("RUST_LOG", "warn")
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Create a new raw client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address()).await
    }

    /// Connect and log in as `username`, consuming the login replies.
    pub async fn login(&self, username: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = self.connect().await?;
        client.login(username).await?;
        Ok(client)
    }

    /// Send SIGINT, as Ctrl-C would.
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn interrupt(&self) -> anyhow::Result<()> {
        let status = Command::new("kill")
            .args(["-INT", &self.child.id().to_string()])
            .status()?;
        anyhow::ensure!(status.success(), "kill -INT failed: {status}");
        Ok(())
    }

    /// Wait for the process to exit on its own.
    #[allow(dead_code)]
    pub async fn wait_for_exit(
        &mut self,
        limit: Duration,
    ) -> anyhow::Result<std::process::ExitStatus> {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("server still running after {limit:?}");
            }
            sleep(Duration::from_millis(50)).await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Ask the OS for an unused port.
fn free_port() -> anyhow::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

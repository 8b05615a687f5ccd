//! Connection options for joining a game server.

use tankwire_model::TankType;

/// Where and how to join a match.
///
/// The query parameter names here belong to the server's join handshake,
/// not to the packet protocol; they are isolated in [`ConnectOptions::url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Server host. Default: `localhost`.
    pub host: String,
    /// Server port. Default: `5000`.
    pub port: u16,
    /// Optional join code for entering a specific lobby.
    pub code: Option<String>,
    /// Team name to register under. Inserted into the URL verbatim, so
    /// it must be URL-safe.
    pub team_name: String,
    /// Tank type to play.
    pub tank_type: TankType,
}

impl ConnectOptions {
    /// Options for the default local server with the given identity.
    pub fn new(team_name: impl Into<String>, tank_type: TankType) -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5000,
            code: None,
            team_name: team_name.into(),
            tank_type,
        }
    }

    /// The WebSocket URL this configuration joins.
    pub fn url(&self) -> String {
        let mut url = format!(
            "ws://{}:{}/?teamName={}&tankType={}",
            self.host, self.port, self.team_name, self.tank_type as u8,
        );
        if let Some(code) = &self.code {
            url.push_str("&joinCode=");
            url.push_str(code);
        }
        url
    }
}

use serde::Deserialize;

/// Top-level configuration settings for a node.
///
/// Includes the node identity, the peer listener, and the storage backend.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub node: NodeSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
}

/// Identity settings for this node.
#[derive(Debug, Deserialize, Clone)]
pub struct NodeSettings {
    /// Display name, also used as the sender on locally originated messages.
    pub name: String,
}

/// Listener settings for the peer mesh.
///
/// Defines the host and port the node accepts peer links on.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Storage backend settings.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// Directory for the sled database.
    pub path: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values can be filled using defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub node: Option<PartialNodeSettings>,
    pub server: Option<PartialServerSettings>,
    pub storage: Option<PartialStorageSettings>,
}

/// Partial node identity settings.
#[derive(Debug, Deserialize)]
pub struct PartialNodeSettings {
    pub name: Option<String>,
}

/// Partial listener settings.
#[derive(Debug, Deserialize)]
pub struct PartialServerSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Partial storage settings.
#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub path: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures a node can start with sensible defaults if no configuration is provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            node: NodeSettings {
                name: "anonymous".to_string(),
            },
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 9000,
            },
            storage: StorageSettings {
                path: "meshchat_db".to_string(),
            },
        }
    }
}

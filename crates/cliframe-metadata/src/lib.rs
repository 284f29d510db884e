//! Serializable metadata model for cliframe apps.
//!
//! A snapshot of the command registry, used for:
//! - exporting the command/option surface to tooling (docs, shell completion)
//! - rendering help without holding the live `App`
//!
//! Snapshots never feed back into dispatch.

use cliframe_argparse::help::{AppDefLike, CommandDefLike, OptionDefLike};
use serde::{Deserialize, Serialize};

/// Current `format-version` of [`AppMetadataV1`].
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OptionMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CommandMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionMeta>,
    #[serde(default)]
    pub has_handler: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct AppMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<CommandMeta>,
}

impl AppMeta {
    /// Look up a command snapshot by name.
    pub fn command(&self, name: &str) -> Option<&CommandMeta> {
        self.commands.iter().find(|c| c.name == name)
    }
}

/// Versioned JSON envelope around an [`AppMeta`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppMetadataV1 {
    pub format_version: u32,
    pub app: AppMeta,
}

impl AppMetadataV1 {
    pub fn new(app: AppMeta) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            app,
        }
    }

    /// Encode as JSON bytes.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode from JSON bytes.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

impl OptionDefLike for OptionMeta {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl CommandDefLike for CommandMeta {
    type OptionDef = OptionMeta;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn options(&self) -> &[OptionMeta] {
        self.options.as_slice()
    }
}

impl AppDefLike for AppMeta {
    type CommandDef = CommandMeta;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn commands(&self) -> impl Iterator<Item = &CommandMeta> {
        self.commands.iter()
    }
}

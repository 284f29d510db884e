use cliframe_argparse::help::OptionDefLike;
use cliframe_metadata::OptionMeta;

/// Declared option of a command. Used for help text only; binding accepts
/// undeclared names as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    name: String,
    description: String,
}

impl OptionSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn meta(&self) -> OptionMeta {
        OptionMeta {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

impl OptionDefLike for OptionSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }
}

use std::fmt;
use std::io::{self, Write};

use cliframe_argparse::help::{self, CommandDefLike, HELP_OPTION};
use cliframe_metadata::CommandMeta;

use crate::context::Context;
use crate::error::{Error, Result};
use crate::option::OptionSpec;

/// Function invoked when a command is executed.
pub type Handler = Box<dyn Fn(&Context) -> anyhow::Result<()>>;

/// Whether a command can be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    /// No handler has been attached.
    Unconfigured,
    Ready,
}

/// A named command: its declared options and the handler that runs it.
pub struct Command {
    name: String,
    description: String,
    options: Vec<OptionSpec>,
    handler: Option<Handler>,
}

impl Command {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
            handler: None,
        }
    }

    /// Declare an option with no description.
    pub fn option(&mut self, name: impl Into<String>) -> &mut Self {
        self.option_with(name, "")
    }

    /// Declare an option. Redeclaring a name replaces its description in place.
    pub fn option_with(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        let spec = OptionSpec::new(name, description);
        match self.options.iter_mut().find(|o| o.name() == spec.name()) {
            Some(existing) => *existing = spec,
            None => self.options.push(spec),
        }
        self
    }

    /// Replace the description.
    pub fn about(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    /// Attach the handler, replacing any previous one.
    pub fn run<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Context) -> anyhow::Result<()> + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared options in declaration order.
    pub fn options(&self) -> &[OptionSpec] {
        self.options.as_slice()
    }

    /// Look up a declared option.
    pub fn option_spec(&self, name: &str) -> Result<&OptionSpec> {
        self.options
            .iter()
            .find(|o| o.name() == name)
            .ok_or_else(|| Error::OptionNotFound(name.to_string()))
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    pub fn state(&self) -> CommandState {
        if self.has_handler() {
            CommandState::Ready
        } else {
            CommandState::Unconfigured
        }
    }

    pub fn help(&self) -> String {
        help::command_help(self)
    }

    pub fn meta(&self) -> CommandMeta {
        CommandMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            options: self.options.iter().map(OptionSpec::meta).collect(),
            has_handler: self.has_handler(),
        }
    }

    /// Execute with help text going to stdout.
    pub fn execute(&self, ctx: &Context) -> Result<()> {
        let stdout = io::stdout();
        self.execute_to(ctx, &mut stdout.lock())
    }

    /// Execute with help text going to `out`.
    ///
    /// `--help` prints help and skips the handler. Without a handler this is
    /// [`Error::CommandHasNotHandler`]. A handler failing with an [`Error`]
    /// returns it unchanged; other failures become [`Error::Handler`].
    pub fn execute_to(&self, ctx: &Context, out: &mut dyn Write) -> Result<()> {
        if ctx.has_option(HELP_OPTION) {
            out.write_all(self.help().as_bytes())?;
            out.flush()?;
            return Ok(());
        }

        let Some(handler) = &self.handler else {
            return Err(Error::CommandHasNotHandler(self.name.clone()));
        };

        tracing::debug!(command = %self.name, "running command handler");
        handler(ctx).map_err(Error::from_handler)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("state", &self.state())
            .finish()
    }
}

impl CommandDefLike for Command {
    type OptionDef = OptionSpec;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn options(&self) -> &[OptionSpec] {
        self.options.as_slice()
    }
}

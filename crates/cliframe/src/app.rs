use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use cliframe_argparse::help::{self, AppDefLike};
use cliframe_metadata::AppMeta;

use crate::command::Command;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::logger::{Logger, default_logger};

/// Version reported when none is configured.
pub const DEFAULT_VERSION: &str = "1.0";

/// Top-level word that prints the app help.
pub const HELP_COMMAND: &str = "help";

/// Top-level word that prints the app version.
pub const VERSION_COMMAND: &str = "version";

/// Command registry and dispatcher.
pub struct App {
    name: String,
    description: String,
    version: String,
    commands: BTreeMap<String, Command>,
    logger: Arc<dyn Logger>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: DEFAULT_VERSION.to_string(),
            commands: BTreeMap::new(),
            logger: default_logger(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Use `logger` for every context this app builds.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Get the command called `name`, registering it on first use.
    pub fn command(&mut self, name: impl Into<String>) -> &mut Command {
        self.command_with(name, "")
    }

    /// Like [`App::command`]; `description` only applies when the command is created.
    pub fn command_with(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Command {
        self.commands
            .entry(name.into())
            .or_insert_with_key(|name| Command::new(name.clone(), description))
    }

    pub fn find(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Registered commands sorted by name.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn help(&self) -> String {
        help::app_help(self)
    }

    pub fn version_text(&self) -> String {
        help::version(self)
    }

    pub fn meta(&self) -> AppMeta {
        AppMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            commands: self.commands.values().map(Command::meta).collect(),
        }
    }

    /// Dispatch a full argv (program name first) with output going to stdout.
    ///
    /// ```
    /// let mut app = cliframe::App::new("demo");
    /// app.command("noop").run(|_| Ok(()));
    /// app.run(["demo", "noop"]).unwrap();
    /// ```
    pub fn run<I>(&self, argv: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let stdout = io::stdout();
        self.run_to(argv, &mut stdout.lock())
    }

    /// Dispatch a full argv (program name first) with output going to `out`.
    pub fn run_to<I>(&self, argv: I, out: &mut dyn Write) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = argv
            .into_iter()
            .skip(1)
            .map(|a| a.as_ref().to_string())
            .collect();
        self.dispatch(&args, out)
    }

    /// Dispatch arguments that no longer include the program name.
    ///
    /// Resolution order:
    /// 1. nothing, or `help` => app help
    /// 2. `version` => version line
    /// 3. a registered command => [`Command::execute_to`] with the remaining args
    ///
    /// `help` and `version` win over commands registered under the same name.
    pub fn dispatch<S: AsRef<str>>(&self, args: &[S], out: &mut dyn Write) -> Result<()> {
        let selector = args.first().map(|s| s.as_ref());

        match selector {
            None | Some(HELP_COMMAND) => {
                tracing::debug!(app = %self.name, "printing app help");
                out.write_all(self.help().as_bytes())?;
                out.flush()?;
                Ok(())
            }
            Some(VERSION_COMMAND) => {
                out.write_all(self.version_text().as_bytes())?;
                out.flush()?;
                Ok(())
            }
            Some(name) => {
                let command = self
                    .commands
                    .get(name)
                    .ok_or_else(|| Error::CommandNotFound(name.to_string()))?;
                tracing::debug!(command = %name, args = args.len() - 1, "dispatching");
                let ctx = Context::with_logger(&args[1..], self.logger.clone());
                command.execute_to(&ctx, out)
            }
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("version", &self.version)
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

impl AppDefLike for App {
    type CommandDef = Command;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logger::MemoryLogger;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn run(app: &App, argv: &[&str]) -> (Result<()>, String) {
        let mut out: Vec<u8> = Vec::new();
        let result = app.run_to(argv.iter().copied(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn empty_args_print_help_even_without_commands() {
        let app = App::new("demo").with_description("Demo app");
        let (result, out) = run(&app, &["demo"]);
        result.unwrap();
        assert!(out.contains("demo - Demo app"));

        let (result, out) = run(&app, &[]);
        result.unwrap();
        assert!(out.contains("Usage: demo"));
    }

    #[test]
    fn help_word_lists_commands() {
        let mut app = App::new("demo");
        app.command_with("sum", "Add two integers");
        let (result, out) = run(&app, &["demo", "help"]);
        result.unwrap();
        assert!(out.contains("sum"));
        assert!(out.contains("Add two integers"));
    }

    #[test]
    fn version_word_prints_version() {
        let app = App::new("demo").with_version("2.0.1");
        let (result, out) = run(&app, &["demo", "version"]);
        result.unwrap();
        assert_eq!(out, "demo 2.0.1\n");

        let (_, out) = run(&App::new("plain"), &["plain", "version"]);
        assert_eq!(out, format!("plain {DEFAULT_VERSION}\n"));
    }

    #[test]
    fn reserved_words_shadow_commands() {
        let hits = Rc::new(Cell::new(0));
        let mut app = App::new("demo").with_version("1.2");
        for name in ["version", "help"] {
            let hits = hits.clone();
            app.command(name).run(move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            });
        }

        let (result, out) = run(&app, &["demo", "version"]);
        result.unwrap();
        assert_eq!(out, "demo 1.2\n");

        let (result, out) = run(&app, &["demo", "help"]);
        result.unwrap();
        assert!(out.contains("Commands:"));

        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unknown_command_is_command_not_found() {
        let app = App::new("demo");
        let (result, _) = run(&app, &["demo", "nope", "--x"]);
        match result.unwrap_err() {
            Error::CommandNotFound(name) => assert_eq!(name, "nope"),
            other => panic!("expected CommandNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn command_without_handler_is_fatal() {
        let mut app = App::new("demo");
        app.command("todo").option("x");
        let (result, _) = run(&app, &["demo", "todo"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::CommandHasNotHandler);
    }

    #[test]
    fn registration_is_idempotent() {
        let mut app = App::new("demo");
        app.command_with("sum", "Add").option("a");
        app.command_with("sum", "ignored").option("b");

        assert_eq!(app.commands().count(), 1);
        let sum = app.find("sum").unwrap();
        assert_eq!(sum.description(), "Add");
        let names: Vec<_> = sum.options().iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn sum_end_to_end() {
        let seen = Rc::new(RefCell::new(None));
        let mut app = App::new("demo");
        {
            let seen = seen.clone();
            app.command("sum")
                .option("a")
                .option("b")
                .run(move |ctx| {
                    let a = ctx.get::<i32>("a")?;
                    let b = ctx.get::<i32>("b")?;
                    *seen.borrow_mut() = Some((a, b, a + b));
                    Ok(())
                });
        }

        let (result, _) = run(&app, &["demo", "sum", "--a", "2", "--b", "3"]);
        result.unwrap();
        assert_eq!(*seen.borrow(), Some((2, 3, 5)));
    }

    #[test]
    fn handler_accessor_errors_reach_the_caller() {
        let mut app = App::new("demo");
        app.command("sum").run(|ctx| {
            ctx.get::<i32>("a")?;
            Ok(())
        });

        let (result, _) = run(&app, &["demo", "sum"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MissingRequiredOption);

        let (result, _) = run(&app, &["demo", "sum", "--a", "two"]);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::BadOptionType);
    }

    #[test]
    fn per_command_help_skips_handler() {
        let called = Rc::new(Cell::new(false));
        let mut app = App::new("demo");
        {
            let called = called.clone();
            app.command_with("sum", "Add two integers")
                .option_with("a", "First addend")
                .run(move |_| {
                    called.set(true);
                    Ok(())
                });
        }

        let (result, out) = run(&app, &["demo", "sum", "--help"]);
        result.unwrap();
        assert!(!called.get());
        assert!(out.contains("First addend"));
    }

    #[test]
    fn injected_logger_sees_recoveries() {
        let logger = Arc::new(MemoryLogger::new());
        let mut app = App::new("demo").with_logger(logger.clone());
        app.command("scale").run(|ctx| {
            let factor = ctx.get_or("factor", 1.0f32);
            anyhow::ensure!(factor == 1.0, "unexpected factor {factor}");
            Ok(())
        });

        let (result, _) = run(&app, &["demo", "scale"]);
        result.unwrap();
        assert!(logger.is_empty());

        let (result, _) = run(&app, &["demo", "scale", "--factor", "huge"]);
        result.unwrap();
        assert_eq!(
            logger.warnings(),
            vec!["Option 'factor' cannot be converted to float"]
        );
    }

    #[test]
    fn meta_snapshot_is_sorted() {
        let mut app = App::new("demo").with_version("0.3");
        app.command("zeta").run(|_| Ok(()));
        app.command("alpha").option_with("x", "An x");

        let meta = app.meta();
        let names: Vec<_> = meta.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert!(meta.command("zeta").unwrap().has_handler);
        assert_eq!(meta.version, "0.3");
        assert_eq!(help::app_help(&meta), app.help());
    }
}

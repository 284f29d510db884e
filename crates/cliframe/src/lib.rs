//! Minimal framework for declaring CLI commands and dispatching argv to them.
//!
//! # Example
//!
//! ```rust
//! use cliframe::App;
//!
//! let mut app = App::new("demo")
//!     .with_description("Example app")
//!     .with_version("1.0");
//!
//! app.command_with("sum", "Add two integers")
//!     .option_with("a", "First addend")
//!     .option_with("b", "Second addend")
//!     .run(|ctx| {
//!         println!("{}", ctx.get::<i32>("a")? + ctx.get::<i32>("b")?);
//!         Ok(())
//!     });
//!
//! app.run(["demo", "sum", "--a", "2", "--b", "3"]).unwrap();
//! ```
//!
//! Options are written `--name value` or `--name` (which binds `"true"`).
//! Declared options only feed the help text; any `--name` is readable.

mod app;
mod command;
mod context;
mod error;
pub mod logger;
mod option;
mod value;

pub use app::{App, DEFAULT_VERSION, HELP_COMMAND, VERSION_COMMAND};
pub use command::{Command, CommandState, Handler};
pub use context::Context;
pub use error::{Error, ErrorKind, Result};
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use option::OptionSpec;
pub use value::{FromOption, OptionKind, OptionValue, coerce};

pub use cliframe_argparse::args::OptionStore;
pub use cliframe_metadata::{AppMeta, AppMetadataV1, CommandMeta, OptionMeta};

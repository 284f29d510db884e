use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{Context as _, Result, anyhow};
use cliframe::{App, Context, ErrorKind};
use tracing_subscriber::{EnvFilter, fmt};

const APP_NAME: &str = "demo";

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let not_found = err
                .downcast_ref::<cliframe::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::CommandNotFound);
            if not_found {
                eprintln!("Run '{APP_NAME} help' to see available commands.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let argv = std::env::args_os()
        .map(|arg| {
            arg.into_string().map_err(|raw| {
                anyhow!("argument is not valid UTF-8: {}", raw.to_string_lossy())
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let app = build_app();
    app.run(argv)?;
    Ok(())
}

fn build_app() -> App {
    let mut app = App::new(APP_NAME)
        .with_description("Example host for the cliframe framework")
        .with_version(env!("CARGO_PKG_VERSION"));

    app.command_with("hello", "Greet someone")
        .option_with("name", "Who to greet (default: World)")
        .option_with("loud", "Shout the greeting")
        .run(hello);

    app.command_with("sum", "Add two integers")
        .option_with("a", "First addend")
        .option_with("b", "Second addend")
        .run(sum);

    app.command_with("scale", "Multiply a number by a factor")
        .option_with("value", "Number to scale")
        .option_with("factor", "Multiplier (default: 1.0)")
        .run(scale);

    // Registered without a handler on purpose.
    app.command_with("todo", "Not implemented yet");

    app
}

fn hello(ctx: &Context) -> Result<()> {
    let name = ctx.get_or("name", "World".to_string());
    let greeting = format!("Hello, {name}!");
    if ctx.get::<bool>("loud")? {
        println!("{}", greeting.to_uppercase());
    } else {
        println!("{greeting}");
    }
    Ok(())
}

fn sum(ctx: &Context) -> Result<()> {
    let a = ctx.get::<i32>("a")?;
    let b = ctx.get::<i32>("b")?;
    let total = a
        .checked_add(b)
        .with_context(|| format!("{a} + {b} does not fit in a 32-bit integer"))?;
    println!("{total}");
    Ok(())
}

fn scale(ctx: &Context) -> Result<()> {
    let value = ctx.get::<f32>("value")?;
    let factor = ctx.get_or("factor", 1.0f32);
    tracing::debug!(value, factor, "scaling");
    println!("{}", value * factor);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .init();
}

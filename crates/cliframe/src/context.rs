use std::fmt;
use std::sync::Arc;

use cliframe_argparse::args::{self, OptionStore};

use crate::error::{Error, Result};
use crate::logger::{Logger, default_logger};
use crate::value::{FromOption, OptionKind, OptionValue, coerce};

/// Options bound for one command invocation.
///
/// Built from the arguments that follow the command name. Values stay raw
/// strings and are coerced on every read.
#[derive(Clone)]
pub struct Context {
    store: OptionStore,
    logger: Arc<dyn Logger>,
}

impl Context {
    /// Bind `args` and report recoveries through `tracing`.
    pub fn new<S: AsRef<str>>(args: &[S]) -> Self {
        Self::with_logger(args, default_logger())
    }

    pub fn with_logger<S: AsRef<str>>(args: &[S], logger: Arc<dyn Logger>) -> Self {
        Self::from_store(args::bind(args), logger)
    }

    pub fn from_store(store: OptionStore, logger: Arc<dyn Logger>) -> Self {
        Self { store, logger }
    }

    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    /// Raw string bound to `name`, without coercion.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.store.get(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Read `name` as `kind`.
    ///
    /// An absent bool reads as `false`. Any other absent option is
    /// [`Error::MissingRequiredOption`]; a value that does not parse is
    /// [`Error::BadOptionType`].
    pub fn value(&self, name: &str, kind: OptionKind) -> Result<OptionValue> {
        let Some(raw) = self.store.get(name) else {
            return match kind {
                OptionKind::Bool => Ok(OptionValue::Bool(false)),
                _ => Err(Error::MissingRequiredOption(name.to_string())),
            };
        };
        coerce(name, raw, kind)
    }

    /// Read `name` as `kind`, falling back to `default`.
    ///
    /// A missing option falls back silently; a malformed one logs a warning first.
    pub fn value_or(&self, name: &str, kind: OptionKind, default: OptionValue) -> OptionValue {
        self.recover(self.value(name, kind), default)
    }

    /// Typed form of [`Context::value`].
    ///
    /// ```
    /// let ctx = cliframe::Context::new(&["--a", "2", "--fast"]);
    /// assert_eq!(ctx.get::<i32>("a").unwrap(), 2);
    /// assert!(ctx.get::<bool>("fast").unwrap());
    /// assert!(!ctx.get::<bool>("slow").unwrap());
    /// ```
    pub fn get<T: FromOption>(&self, name: &str) -> Result<T> {
        let value = self.value(name, T::KIND)?;
        // `value` yields the `T::KIND` arm; `None` means the impl narrows it further.
        T::from_value(value).ok_or_else(|| Error::bad_type(name, T::KIND.as_str()))
    }

    /// Typed form of [`Context::value_or`].
    pub fn get_or<T: FromOption>(&self, name: &str, default: T) -> T {
        self.recover(self.get(name), default)
    }

    fn recover<T>(&self, result: Result<T>, default: T) -> T {
        match result {
            Ok(v) => v,
            Err(Error::MissingRequiredOption(_)) => default,
            Err(err) => {
                self.logger.warn(&err.to_string());
                default
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::logger::MemoryLogger;

    fn ctx(args: &[&str]) -> (Context, Arc<MemoryLogger>) {
        let logger = Arc::new(MemoryLogger::new());
        (Context::with_logger(args, logger.clone()), logger)
    }

    #[test]
    fn flag_reads_true_and_absent_bool_reads_false() {
        let (ctx, _) = ctx(&["--verbose"]);
        assert!(ctx.get::<bool>("verbose").unwrap());
        assert!(!ctx.get::<bool>("quiet").unwrap());
    }

    #[test]
    fn value_is_captured_verbatim() {
        let (ctx, _) = ctx(&["--name", "Alice"]);
        assert_eq!(ctx.get::<String>("name").unwrap(), "Alice");
        assert_eq!(ctx.raw("name"), Some("Alice"));
    }

    #[test]
    fn marker_boundary() {
        let (ctx, _) = ctx(&["--a", "--b", "1"]);
        assert_eq!(ctx.raw("a"), Some("true"));
        assert_eq!(ctx.get::<i32>("b").unwrap(), 1);
    }

    #[derive(Debug, PartialEq)]
    struct Percent(i32);

    impl FromOption for Percent {
        const KIND: OptionKind = OptionKind::Int;

        fn from_value(value: OptionValue) -> Option<Self> {
            value.as_int().filter(|v| (0..=100).contains(v)).map(Percent)
        }
    }

    #[test]
    fn custom_from_option_rejections_are_bad_type() {
        let (ctx, logger) = ctx(&["--p", "40", "--q", "140"]);
        assert_eq!(ctx.get::<Percent>("p").unwrap(), Percent(40));
        assert_eq!(ctx.get::<Percent>("q").unwrap_err().kind(), ErrorKind::BadOptionType);
        assert_eq!(ctx.get_or("q", Percent(0)), Percent(0));
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn strict_int_coercion() {
        let (ctx, _) = ctx(&["--x", "12abc", "--y", "12"]);
        let err = ctx.get::<i32>("x").unwrap_err();
        match err {
            Error::BadOptionType { name, expected } => {
                assert_eq!(name, "x");
                assert_eq!(expected, "int");
            }
            other => panic!("expected BadOptionType, got: {other:?}"),
        }
        assert_eq!(ctx.get::<i32>("y").unwrap(), 12);
    }

    #[test]
    fn missing_non_bool_is_an_error() {
        let (ctx, _) = ctx(&[]);
        for kind in [OptionKind::Int, OptionKind::Float, OptionKind::Str] {
            let err = ctx.value("absent", kind).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingRequiredOption);
        }
    }

    #[test]
    fn default_for_absent_option_is_silent() {
        let (ctx, logger) = ctx(&[]);
        assert_eq!(ctx.get_or("n", 5), 5);
        assert_eq!(ctx.get_or("who", "World".to_string()), "World");
        assert!(logger.is_empty());
    }

    #[test]
    fn default_for_malformed_option_warns_once() {
        let (ctx, logger) = ctx(&["--n", "five"]);
        assert_eq!(ctx.get_or("n", 5), 5);
        assert_eq!(
            logger.warnings(),
            vec!["Option 'n' cannot be converted to int"]
        );
    }

    #[test]
    fn default_does_not_apply_to_absent_bool() {
        let (ctx, logger) = ctx(&[]);
        assert!(!ctx.get_or("opt", true));
        assert!(logger.is_empty());
    }

    #[test]
    fn malformed_bool_falls_back_with_warning() {
        let (ctx, logger) = ctx(&["--opt", "maybe"]);
        assert!(ctx.get_or("opt", true));
        assert_eq!(logger.len(), 1);
        assert!(ctx.get::<bool>("opt").is_err());
    }

    #[test]
    fn value_or_uses_the_same_policy() {
        let (ctx, logger) = ctx(&["--ratio", "1.5", "--bad", "x"]);
        assert_eq!(
            ctx.value_or("ratio", OptionKind::Float, OptionValue::Float(0.0)),
            OptionValue::Float(1.5)
        );
        assert_eq!(
            ctx.value_or("missing", OptionKind::Float, OptionValue::Float(2.0)),
            OptionValue::Float(2.0)
        );
        assert!(logger.is_empty());
        assert_eq!(
            ctx.value_or("bad", OptionKind::Float, OptionValue::Float(3.0)),
            OptionValue::Float(3.0)
        );
        assert_eq!(logger.len(), 1);
    }

    #[test]
    fn every_read_reparses() {
        let (ctx, logger) = ctx(&["--n", "x"]);
        assert_eq!(ctx.get_or("n", 1), 1);
        assert_eq!(ctx.get_or("n", 2), 2);
        assert_eq!(logger.len(), 2);
        assert_eq!(ctx.get::<String>("n").unwrap(), "x");
    }

    #[test]
    fn undeclared_names_are_readable() {
        let (ctx, _) = ctx(&["stray", "--anything", "goes"]);
        assert!(ctx.has_option("anything"));
        assert!(!ctx.has_option("stray"));
        assert_eq!(ctx.store().len(), 1);
    }
}

//! Argument binding and help rendering for cliframe.
//!
//! This crate is intentionally small so it can be reused by:
//! - `cliframe` (to bind `--name [value]` tokens and render command/app help)
//! - tooling that only needs the raw option store or the help layout

pub mod args {
    use indexmap::IndexMap;

    /// Prefix that marks a token as an option name.
    pub const OPTION_MARKER: &str = "--";

    /// Value bound to an option that is not followed by a value token.
    pub const FLAG_VALUE: &str = "true";

    /// Whether `token` names an option (`--name`).
    pub fn is_option_marker(token: &str) -> bool {
        token.starts_with(OPTION_MARKER)
    }

    /// Raw option values for one invocation, keyed by option name.
    ///
    /// Every value is kept as the string that appeared in argv; typing happens
    /// at access time. Iteration follows first-appearance order.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct OptionStore {
        values: IndexMap<String, String>,
    }

    impl OptionStore {
        /// Create an empty store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Bind `tokens` into a new store. Same as [`bind`].
        pub fn from_args<S: AsRef<str>>(tokens: &[S]) -> Self {
            bind(tokens)
        }

        /// Raw value bound to `name`.
        pub fn get(&self, name: &str) -> Option<&str> {
            self.values.get(name).map(String::as_str)
        }

        /// Whether `name` was bound.
        pub fn contains(&self, name: &str) -> bool {
            self.values.contains_key(name)
        }

        pub fn len(&self) -> usize {
            self.values.len()
        }

        pub fn is_empty(&self) -> bool {
            self.values.is_empty()
        }

        /// `(name, value)` pairs in first-appearance order.
        pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
            self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
        }

        /// Bound option names in first-appearance order.
        pub fn names(&self) -> impl Iterator<Item = &str> {
            self.values.keys().map(String::as_str)
        }

        // A repeated name keeps its original position; the later value wins.
        fn insert(&mut self, name: String, value: String) {
            if let Some(previous) = self.values.insert(name, value) {
                tracing::debug!(%previous, "option given more than once; keeping the last value");
            }
        }
    }

    impl<K, V> FromIterator<(K, V)> for OptionStore
    where
        K: Into<String>,
        V: Into<String>,
    {
        fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
            let mut store = Self::new();
            for (k, v) in iter {
                store.insert(k.into(), v.into());
            }
            store
        }
    }

    /// Bind `--name [value]` tokens into an [`OptionStore`].
    ///
    /// - Tokens that do not start with `--` are skipped (there are no positionals).
    /// - `--name value` binds `value` unless the next token is itself a marker.
    /// - `--name` alone binds [`FLAG_VALUE`].
    ///
    /// Names are not checked against any declaration; binding never fails.
    pub fn bind<S: AsRef<str>>(tokens: &[S]) -> OptionStore {
        let mut store = OptionStore::new();
        let mut i = 0usize;

        while i < tokens.len() {
            let Some(name) = tokens[i].as_ref().strip_prefix(OPTION_MARKER) else {
                i += 1;
                continue;
            };

            match tokens.get(i + 1).map(|t| t.as_ref()) {
                Some(next) if !is_option_marker(next) => {
                    store.insert(name.to_string(), next.to_string());
                    i += 2;
                }
                _ => {
                    store.insert(name.to_string(), FLAG_VALUE.to_string());
                    i += 1;
                }
            }
        }

        store
    }
}

pub mod help {
    /// Name of the option that requests per-command help.
    pub const HELP_OPTION: &str = "help";

    const HELP_OPTION_TEXT: &str = "Show help information";
    const OPTION_USAGE: &str = "[--option [value]]...";

    pub trait OptionDefLike {
        fn name(&self) -> &str;
        fn description(&self) -> &str;
    }

    pub trait CommandDefLike {
        type OptionDef: OptionDefLike;

        fn name(&self) -> &str;
        fn description(&self) -> &str;
        fn options(&self) -> &[Self::OptionDef];
    }

    pub trait AppDefLike {
        type CommandDef: CommandDefLike;

        fn name(&self) -> &str;
        fn description(&self) -> &str;
        fn version(&self) -> &str;
        /// Registered commands in the order they should be listed.
        fn commands(&self) -> impl Iterator<Item = &Self::CommandDef>;
    }

    fn push_header(out: &mut String, name: &str, description: &str) {
        if description.trim().is_empty() {
            out.push_str(name);
            out.push('\n');
        } else {
            out.push_str(&format!("{} - {}\n", name, description.trim()));
        }
    }

    fn push_rows(out: &mut String, rows: &[(String, String)]) {
        let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (left, help) in rows {
            if help.is_empty() {
                out.push_str(&format!("  {}\n", left));
            } else {
                out.push_str(&format!("  {:width$}  {}\n", left, help, width = width));
            }
        }
    }

    /// Render the `--help` text for a single command.
    pub fn command_help<C: CommandDefLike>(cmd: &C) -> String {
        let mut out = String::new();
        push_header(&mut out, cmd.name(), cmd.description());
        out.push_str(&format!("\nUsage: {} {}\n", cmd.name(), OPTION_USAGE));

        let mut rows: Vec<(String, String)> = cmd
            .options()
            .iter()
            .map(|o| (format!("--{}", o.name()), o.description().trim().to_string()))
            .collect();
        if !cmd.options().iter().any(|o| o.name() == HELP_OPTION) {
            rows.push((format!("--{HELP_OPTION}"), HELP_OPTION_TEXT.to_string()));
        }

        out.push_str("\nOptions:\n");
        push_rows(&mut out, &rows);
        out
    }

    /// Render the top-level help: usage plus one row per command.
    ///
    /// The reserved words `help` and `version` are always listed first.
    pub fn app_help<A: AppDefLike>(app: &A) -> String {
        let mut out = String::new();
        push_header(&mut out, app.name(), app.description());
        out.push_str(&format!("\nUsage: {} <COMMAND> {}\n", app.name(), OPTION_USAGE));

        let mut rows = vec![
            ("help".to_string(), "Print this message".to_string()),
            ("version".to_string(), "Print version information".to_string()),
        ];
        rows.extend(
            app.commands()
                .map(|c| (c.name().to_string(), c.description().trim().to_string())),
        );

        out.push_str("\nCommands:\n");
        push_rows(&mut out, &rows);
        out
    }

    /// Render the `version` line.
    pub fn version<A: AppDefLike>(app: &A) -> String {
        if app.version().trim().is_empty() {
            format!("{}\n", app.name())
        } else {
            format!("{} {}\n", app.name(), app.version().trim())
        }
    }
}

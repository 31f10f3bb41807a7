//! Read access to a command's resolved arguments.

use tracing::error;

use super::args::{ArgValue, ResolvedArgs, normalize_arg_name};
use super::error::CommandError;

/// Resolved arguments of one command invocation.
///
/// Asking for a name the command never declared is a programming error and
/// comes back as [`CommandError::UnknownArgument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArguments {
    values: ResolvedArgs,
}

impl CommandArguments {
    pub fn new(values: ResolvedArgs) -> Self {
        Self { values }
    }

    /// Looks up `name`; dashes are accepted and normalized.
    pub fn get(&self, name: &str) -> Result<&ArgValue, CommandError> {
        let key = normalize_arg_name(name);
        self.values.get(&key).ok_or_else(|| {
            error!(argument = %key, "no argument/option defined");
            CommandError::UnknownArgument(key)
        })
    }

    pub fn set(&mut self, name: &str, value: ArgValue) {
        self.values.insert(normalize_arg_name(name), value);
    }

    /// `true` only when the value is `Bool(true)`.
    pub fn flag(&self, name: &str) -> Result<bool, CommandError> {
        Ok(self.get(name)?.as_bool().unwrap_or(false))
    }

    pub fn text(&self, name: &str) -> Result<Option<&str>, CommandError> {
        Ok(self.get(name)?.as_str())
    }

    /// Integer value; positional options hold text, so that is parsed too.
    pub fn int(&self, name: &str) -> Result<Option<i64>, CommandError> {
        match self.get(name)? {
            ArgValue::Int(i) => Ok(Some(*i)),
            ArgValue::Text(s) => s.parse().map(Some).map_err(|_| CommandError::InvalidValue {
                argument: normalize_arg_name(name),
                value: s.to_string(),
                reason: "expected a number".to_string(),
            }),
            _ => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments() -> CommandArguments {
        let mut values = ResolvedArgs::new();
        values.insert("follow".to_string(), ArgValue::Bool(true));
        values.insert("index".to_string(), ArgValue::text("3"));
        values.insert("initial_text".to_string(), ArgValue::None);
        CommandArguments::new(values)
    }

    #[test]
    fn unknown_name_is_a_checked_error() {
        assert_eq!(
            arguments().get("nope"),
            Err(CommandError::UnknownArgument("nope".to_string()))
        );
    }

    #[test]
    fn dashed_lookup_finds_normalized_name() {
        assert_eq!(arguments().get("initial-text"), Ok(&ArgValue::None));
    }

    #[test]
    fn typed_getters() {
        let args = arguments();
        assert_eq!(args.flag("follow"), Ok(true));
        assert_eq!(args.int("index"), Ok(Some(3)));
        assert_eq!(args.text("initial-text"), Ok(None));
    }

    #[test]
    fn positional_text_that_is_not_a_number() {
        let mut args = arguments();
        args.set("index", ArgValue::text("three"));
        assert!(matches!(args.int("index"), Err(CommandError::InvalidValue { .. })));
    }
}

//! Argument and option declarations, and the processor that binds user
//! tokens to them.
//!
//! A command line such as `logs -f` or `rm force=true abc123` is split into
//! tokens. Each token is either a named argument (`name` or `name=value`,
//! matched by name or alias) or a positional option, consumed in declaration
//! order.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use tracing::{debug, error, info};

use super::error::CommandError;

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Not given and no default.
    None,
    Bool(bool),
    Int(i64),
    Text(Cow<'static, str>),
}

impl ArgValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(Cow::Owned(value.into()))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "-"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Transform applied to the raw text of a named argument.
///
/// `None` means the argument was written bare (`-f` rather than `-f=yes`).
/// The `Err` string is the reason shown to the user.
pub type Action = fn(Option<&str>) -> Result<ArgValue, String>;

/// Any presence means `true`, whatever the value.
pub fn true_action(_value: Option<&str>) -> Result<ArgValue, String> {
    Ok(ArgValue::Bool(true))
}

/// Boolean flag; bare means `true`.
pub fn bool_action(value: Option<&str>) -> Result<ArgValue, String> {
    let Some(value) = value else {
        return Ok(ArgValue::Bool(true));
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(ArgValue::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(ArgValue::Bool(false)),
        _ => Err("expected true or false".to_string()),
    }
}

pub fn int_action(value: Option<&str>) -> Result<ArgValue, String> {
    let value = value.ok_or_else(|| "a number is required".to_string())?;
    value
        .parse::<i64>()
        .map(ArgValue::Int)
        .map_err(|e| e.to_string())
}

pub fn text_action(value: Option<&str>) -> Result<ArgValue, String> {
    value
        .map(ArgValue::text)
        .ok_or_else(|| "a value is required".to_string())
}

/// Named argument, matched by name or alias.
#[derive(Debug)]
pub struct ArgumentDef {
    /// Unique within the command; dashes become underscores on lookup.
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
    pub default: ArgValue,
    pub action: Action,
}

/// Positional option, matched by position.
#[derive(Debug)]
pub struct OptionDef {
    pub name: &'static str,
    pub description: &'static str,
    pub default: ArgValue,
}

/// `names-with-dashes` -> `names_with_dashes`
pub fn normalize_arg_name(name: &str) -> String {
    name.replace('-', "_")
}

/// Normalized argument name -> value.
pub type ResolvedArgs = BTreeMap<String, ArgValue>;

/// Parses token lists against a command's declarations.
#[derive(Debug)]
pub struct ArgumentProcessor<'a> {
    /// Names and aliases.
    by_name: HashMap<&'a str, &'a ArgumentDef>,
    arguments: &'a [ArgumentDef],
    options: &'a [OptionDef],
}

impl<'a> ArgumentProcessor<'a> {
    pub fn new(arguments: &'a [ArgumentDef], options: &'a [OptionDef]) -> Self {
        let mut by_name = HashMap::new();
        for argument in arguments {
            for key in std::iter::once(&argument.name).chain(argument.aliases) {
                let previous = by_name.insert(*key, argument);
                debug_assert!(previous.is_none(), "argument name {key:?} declared twice");
            }
        }
        Self {
            by_name,
            arguments,
            options,
        }
    }

    /// Values used when no token is given.
    pub fn defaults(&self) -> ResolvedArgs {
        let mut resolved = ResolvedArgs::new();
        for argument in self.arguments {
            resolved.insert(normalize_arg_name(argument.name), argument.default.clone());
        }
        for option in self.options {
            resolved.insert(normalize_arg_name(option.name), option.default.clone());
        }
        resolved
    }

    /// Binds `tokens` to the declarations.
    ///
    /// Every call starts from the defaults with no option consumed, so the
    /// same tokens always give the same result. Later tokens overwrite
    /// earlier ones.
    pub fn process<S: AsRef<str>>(&self, tokens: &[S]) -> Result<ResolvedArgs, CommandError> {
        let mut resolved = self.defaults();
        let mut option_index = 0;

        for token in tokens {
            let token = token.as_ref();
            let (key, value) = match token.split_once('=') {
                Some((key, value)) => (key, Some(value)),
                None => (token, None),
            };

            if let Some(argument) = self.by_name.get(key) {
                let parsed = (argument.action)(value).map_err(|reason| {
                    CommandError::InvalidValue {
                        argument: argument.name.to_string(),
                        value: value.unwrap_or_default().to_string(),
                        reason,
                    }
                })?;
                debug!(argument = argument.name, token, "matched argument");
                resolved.insert(normalize_arg_name(argument.name), parsed);
            } else if let Some(option) = self.options.get(option_index) {
                option_index += 1;
                debug!(option = option.name, token, "matched positional option");
                resolved.insert(normalize_arg_name(option.name), ArgValue::text(token));
            } else {
                error!(token, "option/argument not specified");
                return Err(CommandError::NoSuchOptionOrArgument(token.to_string()));
            }
        }

        info!(?resolved, "given arguments");
        Ok(resolved)
    }
}

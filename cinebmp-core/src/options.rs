//! Options support.
//!
//! Options are used to set custom parameters in decoders, writers or the command-line tools built on top of them.
//!
//! As a rule target for options should provide a list of supported options and ignore unknown options.

use std::fmt;

/// Common name for the strict decoding option.
pub const STRICT_OPTION: &str = "strict";
/// Common description for the strict decoding option.
pub const STRICT_OPTION_DESC: &str = "Treat recovered stream damage as an error";

/// Common name for the quiet mode option.
pub const QUIET_OPTION: &str = "quiet";
/// Common description for the quiet mode option.
pub const QUIET_OPTION_DESC: &str = "Do not print banner and progress messages";

/// A list specifying option parsing errors.
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum OptionError {
    /// Input is not intended for the current option definition.
    WrongName,
    /// Option value is not in the expected format.
    InvalidFormat,
}

/// A specialised `Result` type for option parsing.
pub type OptionResult<T> = Result<T, OptionError>;

/// Option definition type.
#[derive(Debug)]
pub enum NAOptionDefinitionType {
    /// Option may just be present.
    None,
    /// Option is a boolean value.
    Bool,
}

/// Option definition.
#[derive(Debug)]
pub struct NAOptionDefinition {
    /// Option name.
    pub name:           &'static str,
    /// Option meaning.
    pub description:    &'static str,
    /// Option type.
    pub opt_type:       NAOptionDefinitionType,
}

impl NAOptionDefinition {
    /// Tries to parse input string as an option.
    ///
    /// Both `name` and `--name` forms are accepted, boolean options may be negated with `noname` or `--noname`.
    pub fn parse(&self, name: &str) -> OptionResult<NAOption> {
        let bare = name.strip_prefix("--").unwrap_or(name);
        if let Some(negated) = bare.strip_prefix("no") {
            if negated == self.name {
                return match self.opt_type {
                        NAOptionDefinitionType::Bool => Ok(NAOption { name: self.name, value: NAValue::Bool(false) }),
                        NAOptionDefinitionType::None => Err(OptionError::InvalidFormat),
                    };
            }
        }
        if bare != self.name {
            return Err(OptionError::WrongName);
        }
        let value = match self.opt_type {
                NAOptionDefinitionType::None => NAValue::None,
                NAOptionDefinitionType::Bool => NAValue::Bool(true),
            };
        Ok(NAOption { name: self.name, value })
    }
}

impl fmt::Display for NAOptionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.opt_type {
            NAOptionDefinitionType::None => write!(f, "{}: {}", self.name, self.description),
            NAOptionDefinitionType::Bool => write!(f, "[no]{}: {}", self.name, self.description),
        }
    }
}

/// Option.
#[derive(Clone,Debug,PartialEq)]
pub struct NAOption {
    /// Option name.
    pub name:   &'static str,
    /// Option value.
    pub value:  NAValue,
}

/// A list of accepted option values.
#[derive(Debug,Clone,PartialEq)]
pub enum NAValue {
    /// Empty value.
    None,
    /// Boolean value.
    Bool(bool),
}

/// Trait for all objects that handle `NAOption`.
pub trait NAOptionHandler {
    /// Returns the options recognised by current object.
    fn get_supported_options(&self) -> &[NAOptionDefinition];
    /// Passes options for the object to set (or ignore).
    fn set_options(&mut self, options: &[NAOption]);
    /// Queries the current option value in the object (if present).
    fn query_option_value(&self, name: &str) -> Option<NAValue>;
}

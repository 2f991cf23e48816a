//! Parameter-store slots

use std::fmt;
use std::str::FromStr;

use secrecy::SecretString;

/// Storage type of a parameter-store slot.
///
/// The type is fixed when the slot is created out of band and is carried
/// over unchanged on every rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Plain text
    String,
    /// Comma-separated list
    StringList,
    /// KMS-encrypted text
    SecureString,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::StringList => "StringList",
            Self::SecureString => "SecureString",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "StringList" => Ok(Self::StringList),
            "SecureString" => Ok(Self::SecureString),
            other => Err(format!("unknown parameter type '{other}'")),
        }
    }
}

/// Current state of a named slot as reported by the parameter store
pub struct Parameter {
    /// Slot name (e.g. `/ci/aws_access_key_id`)
    pub name: String,
    /// Current value, decrypted when requested
    pub value: SecretString,
    /// Storage type, preserved across writes
    pub parameter_type: ParameterType,
    /// Monotonic version, bumped by the store on every write
    pub version: i64,
    /// Stable identity of the slot
    pub arn: String,
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("parameter_type", &self.parameter_type)
            .field("version", &self.version)
            .field("arn", &self.arn)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("String", ParameterType::String)]
    #[case("StringList", ParameterType::StringList)]
    #[case("SecureString", ParameterType::SecureString)]
    fn parses_store_type_names(#[case] raw: &str, #[case] expected: ParameterType) {
        assert_eq!(raw.parse::<ParameterType>(), Ok(expected));
        assert_eq!(expected.to_string(), raw);
    }

    #[test]
    fn rejects_unknown_type() {
        assert!("Blob".parse::<ParameterType>().is_err());
    }
}

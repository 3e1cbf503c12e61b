//! Error codes reported by a walk, and the error value returned to callers.
//!
//! Every code carries its class in its bits: `FATAL_BITS` marks codes an error
//! handler can never suppress, `SCHEMA_BITS`/`PARSER_BITS` only group codes for
//! display and filtering.

use std::fmt;

// ————————————————————————————————————————————————————————————————————————————
// CODES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Input file could not be opened/read.
    FileOpen,
    /// Underlying JSON text could not be tokenized.
    JsonParse,
    /// Fixed-key map received a key it doesn't declare.
    UnexpectedKey,
    SchemaMandatesString,
    SchemaMandatesInt,
    SchemaMandatesDouble,
    SchemaMandatesBool,
    SchemaMandatesNull,
    SchemaMandatesMap,
    SchemaMandatesList,
    /// Schema node carries a type tag nobody recognizes.
    SchemaInvalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Io,
    Parser,
    Schema,
}

impl ErrorCode {
    pub const FATAL_BITS: u32 = 0x0000_1000;
    pub const SCHEMA_BITS: u32 = 0x0000_2000;
    pub const PARSER_BITS: u32 = 0x0000_4000;

    pub const ALL: [ErrorCode; 11] = [
        ErrorCode::FileOpen,
        ErrorCode::JsonParse,
        ErrorCode::UnexpectedKey,
        ErrorCode::SchemaMandatesString,
        ErrorCode::SchemaMandatesInt,
        ErrorCode::SchemaMandatesDouble,
        ErrorCode::SchemaMandatesBool,
        ErrorCode::SchemaMandatesNull,
        ErrorCode::SchemaMandatesMap,
        ErrorCode::SchemaMandatesList,
        ErrorCode::SchemaInvalid,
    ];

    /// Stable numeric value; the high bits carry the class.
    pub const fn value(self) -> u32 {
        match self {
            ErrorCode::FileOpen => 0x0000_1001,
            ErrorCode::JsonParse => 0x0000_5002,
            ErrorCode::UnexpectedKey => 0x0000_2006,
            ErrorCode::SchemaMandatesString => 0x0000_2007,
            ErrorCode::SchemaMandatesInt => 0x0000_2008,
            ErrorCode::SchemaMandatesMap => 0x0000_2009,
            ErrorCode::SchemaMandatesList => 0x0000_200a,
            ErrorCode::SchemaInvalid => 0x0000_200b,
            ErrorCode::SchemaMandatesDouble => 0x0000_2010,
            ErrorCode::SchemaMandatesBool => 0x0000_2011,
            ErrorCode::SchemaMandatesNull => 0x0000_2012,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.value() == value)
    }

    pub const fn is_fatal(self) -> bool {
        self.value() & Self::FATAL_BITS != 0
    }

    pub const fn category(self) -> Category {
        let v = self.value();
        if v & Self::PARSER_BITS != 0 {
            Category::Parser
        } else if v & Self::SCHEMA_BITS != 0 {
            Category::Schema
        } else {
            Category::Io
        }
    }

    /// Short, fixed explanation handed to error handlers next to the full message.
    pub const fn reason(self) -> &'static str {
        match self {
            ErrorCode::FileOpen => "error opening input file",
            ErrorCode::JsonParse => "could not parse JSON",
            ErrorCode::UnexpectedKey => "unexpected key",
            ErrorCode::SchemaMandatesString => "string mandated by schema",
            ErrorCode::SchemaMandatesInt => "integer mandated by schema",
            ErrorCode::SchemaMandatesDouble => "double mandated by schema",
            ErrorCode::SchemaMandatesBool => "boolean mandated by schema",
            ErrorCode::SchemaMandatesNull => "null mandated by schema",
            ErrorCode::SchemaMandatesMap => "map/object mandated by schema",
            ErrorCode::SchemaMandatesList => "list/array mandated by schema",
            ErrorCode::SchemaInvalid => "schema invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.reason(), self.value())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// ERROR VALUE
// ————————————————————————————————————————————————————————————————————————————

/// What a walk (or the ingestion around it) returns when it aborts.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), source: None }
    }

    pub(crate) fn with_source(
        mut self,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_fatal(&self) -> bool {
        self.code.is_fatal()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_and_parser_codes_are_fatal() {
        assert!(ErrorCode::FileOpen.is_fatal());
        assert!(ErrorCode::JsonParse.is_fatal());
        assert_eq!(ErrorCode::FileOpen.category(), Category::Io);
        assert_eq!(ErrorCode::JsonParse.category(), Category::Parser);
    }

    #[test]
    fn schema_codes_are_suppressible() {
        for code in ErrorCode::ALL {
            if code.category() == Category::Schema {
                assert!(!code.is_fatal(), "{code:?} should be non-fatal");
            }
        }
        assert_eq!(ErrorCode::SchemaInvalid.category(), Category::Schema);
    }

    #[test]
    fn values_are_unique_and_reversible() {
        for code in ErrorCode::ALL {
            assert_eq!(ErrorCode::from_value(code.value()), Some(code));
        }
        assert_eq!(ErrorCode::from_value(0), None);
    }

    #[test]
    fn error_displays_its_message() {
        let err = Error::new(ErrorCode::UnexpectedKey, "key x unexpected while parsing map at /");
        assert_eq!(err.to_string(), "key x unexpected while parsing map at /");
        assert_eq!(err.code(), ErrorCode::UnexpectedKey);
        assert!(!err.is_fatal());
    }
}

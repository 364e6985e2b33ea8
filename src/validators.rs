/// Input validators for account payloads and path parameters
/// Features:
/// 1. DoS Protection: Input length limits
/// 2. Injection Protection: control characters and SQL patterns rejected

use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::MAX_PASSWORD_BYTES;
use crate::error::ValidationError;

const MAX_NAME_LENGTH: usize = 50; // matches the account table's VARCHAR(50)
const MIN_NAME_LENGTH: usize = 1;

lazy_static! {
    // Regex to detect potentially malicious SQL patterns
    static ref SQL_INJECTION_PATTERNS: [Regex; 5] = [
        // Union-based SQL injection
        Regex::new(r"(?i)\s+UNION\s+").unwrap(),
        // Comment-based injection
        Regex::new(r"(--|;|/\*|\*/)").unwrap(),
        // Stacked queries
        Regex::new(r"(?i);\s*(INSERT|UPDATE|DELETE|DROP|CREATE|ALTER)").unwrap(),
        // Time-based blind injection
        Regex::new(r"(?i)\b(SLEEP|WAITFOR|BENCHMARK|DBMS_LOCK)\b").unwrap(),
        // Boolean-based injection
        Regex::new(r#"(?i)(\bOR\b|\bAND\b)\s*(['"][0-9]*['"]|[0-9]+)\s*=\s*(['"][0-9]*['"]|[0-9]+|True|False)"#).unwrap(),
    ];
}

/// Validates a first or last name
/// - Trims surrounding whitespace
/// - Checks length constraints
/// - Rejects control characters and SQL injection patterns
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    let length = trimmed.chars().count();

    if length < MIN_NAME_LENGTH {
        return Err(ValidationError::TooShort(field.to_string(), MIN_NAME_LENGTH));
    }

    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong(field.to_string(), MAX_NAME_LENGTH));
    }

    if has_suspicious_name_patterns(trimmed) {
        return Err(ValidationError::SuspiciousContent(field.to_string()));
    }

    if contains_sql_injection_patterns(trimmed) {
        return Err(ValidationError::PossibleSQLInjection);
    }

    Ok(trimmed.to_string())
}

/// Passwords must be present and fit bcrypt's input limit (bytes, not chars)
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::TooLong(
            "password".to_string(),
            MAX_PASSWORD_BYTES,
        ));
    }
    Ok(())
}

/// Parses the numeric `{id}` path segment
pub fn parse_account_id(raw: &str) -> Result<i32, ValidationError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidFormat("account id".to_string()))
}

/// Detects suspicious patterns in names
fn has_suspicious_name_patterns(name: &str) -> bool {
    // Null bytes and other control characters
    if name.chars().any(|c| c.is_control()) {
        return true;
    }

    // Excessive special characters (potential injection)
    let special_char_count = name
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace() && *c != '-' && *c != '.' && *c != '\'')
        .count();

    special_char_count > 5
}

/// Checks if input contains SQL injection patterns
fn contains_sql_injection_patterns(input: &str) -> bool {
    SQL_INJECTION_PATTERNS.iter().any(|pattern| pattern.is_match(input))
}

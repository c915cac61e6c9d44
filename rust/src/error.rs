//! Error handling and result types for tree operations.
//!
//! Every failure here is reported before the tree is touched, so a returned
//! error always means the tree is exactly as it was before the call.

/// Error type for B-Tree and B+ tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Supplied key could not be parsed.
    InvalidKey(String),
    /// Insert of a key that is already present.
    DuplicateKey(String),
    /// Delete of a key that is absent.
    KeyNotFound(String),
    /// Engine constructed with a minimum degree below the allowed bound.
    InvalidDegree(String),
    /// Internal data structure integrity violation (reported by validators only).
    DataIntegrityError(String),
}

impl TreeError {
    /// Create an InvalidKey error for unparseable input
    pub fn invalid_key(input: &str) -> Self {
        Self::InvalidKey(format!("'{}' is not an integer key", input))
    }

    /// Create a DuplicateKey error with the offending key
    pub fn duplicate_key(key: impl std::fmt::Display) -> Self {
        Self::DuplicateKey(format!("key {} already exists in the tree", key))
    }

    /// Create a KeyNotFound error with the missing key
    pub fn key_not_found(key: impl std::fmt::Display) -> Self {
        Self::KeyNotFound(format!("key {} was not found in the tree", key))
    }

    /// Create an InvalidDegree error with context
    pub fn invalid_degree(degree: usize, min_required: usize) -> Self {
        Self::InvalidDegree(format!(
            "Minimum degree {} is invalid (minimum required: {})",
            degree, min_required
        ))
    }

    /// Create a DataIntegrityError with context
    pub fn data_integrity(context: &str, details: &str) -> Self {
        Self::DataIntegrityError(format!("{}: {}", context, details))
    }

    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey(_))
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    pub fn is_degree_error(&self) -> bool {
        matches!(self, Self::InvalidDegree(_))
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            TreeError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            TreeError::KeyNotFound(msg) => write!(f, "Key not found: {}", msg),
            TreeError::InvalidDegree(msg) => write!(f, "Invalid degree: {}", msg),
            TreeError::DataIntegrityError(msg) => write!(f, "Data integrity error: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Public result type for tree operations that may fail
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for insert and delete
pub type ModifyResult<T> = Result<T, TreeError>;

/// Result type for tree construction
pub type InitResult<T> = Result<T, TreeError>;

/// Parse raw user input into a key.
///
/// Surrounding whitespace is ignored; anything else that `K::from_str`
/// rejects becomes [`TreeError::InvalidKey`].
pub fn parse_key<K: std::str::FromStr>(input: &str) -> TreeResult<K> {
    input
        .trim()
        .parse::<K>()
        .map_err(|_| TreeError::invalid_key(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_accepts_signed_integers() {
        assert_eq!(parse_key::<i64>("42"), Ok(42));
        assert_eq!(parse_key::<i64>("  -7 "), Ok(-7));
    }

    #[test]
    fn test_parse_key_rejects_non_integers() {
        for input in ["", "abc", "1.5", "12x"] {
            let err = parse_key::<i64>(input).unwrap_err();
            assert!(err.is_invalid_key(), "{:?} should be rejected", input);
        }
    }

    #[test]
    fn test_error_messages_carry_context() {
        assert_eq!(
            TreeError::duplicate_key(5).to_string(),
            "Duplicate key: key 5 already exists in the tree"
        );
        assert_eq!(
            TreeError::invalid_degree(1, 2).to_string(),
            "Invalid degree: Minimum degree 1 is invalid (minimum required: 2)"
        );
        assert!(TreeError::key_not_found(9).is_not_found());
    }
}

//! Error types for ipzone.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for ipzone operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The backing database could not be opened or created
    #[error("failed to open zone store {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: redb::DatabaseError,
    },

    /// A store transaction failed
    #[error("store transaction failed: {0}")]
    Transaction(#[source] redb::Error),

    /// Write attempted on a store opened read-only
    #[error("zone store is opened read-only")]
    ReadOnly,

    /// Malformed range or CIDR expression
    #[error("invalid IP range: {0}")]
    InvalidRange(String),

    /// Zone file name does not yield a country code
    #[error("empty country code for zone file {0:?}")]
    InvalidZoneName(PathBuf),

    /// Invalid IPv4 address
    #[error("invalid IPv4 address: {0}")]
    InvalidIpAddress(String),

    /// No stored range contains the address
    #[error("no matching country found for IP: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for ipzone operations.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! transaction_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Error {
                fn from(err: $ty) -> Self {
                    Error::Transaction(err.into())
                }
            }
        )*
    };
}

transaction_error!(
    redb::Error,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_maps_to_transaction() {
        let err: Error = redb::StorageError::Corrupted("bad page".to_string()).into();
        assert!(matches!(err, Error::Transaction(_)));
    }

    #[test]
    fn test_display_messages() {
        let err = Error::NotFound("8.8.8.8".to_string());
        assert_eq!(err.to_string(), "no matching country found for IP: 8.8.8.8");

        let err = Error::InvalidZoneName(PathBuf::from(".zone"));
        assert!(err.to_string().contains(".zone"));
    }
}

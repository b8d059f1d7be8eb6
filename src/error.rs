//! Typed errors for each stage of a run.

use aws_credential_types::provider::error::CredentialsError;
use thiserror::Error;

use crate::types::AddressFamily;

/// Invalid or missing command-line input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No AWS region specified (use -r or set AWS_REGION)")]
    MissingRegion,

    #[error("invalid AWS region \"{region}\"")]
    InvalidRegion { region: String },

    #[error("No Lightsail instance specified (use -i)")]
    MissingInstance,

    #[error("No IPv4 or IPv6 CIDR specified (use -4 and/or -6)")]
    MissingCidr,

    #[error("could not parse \"{cidr}\" as a CIDR")]
    InvalidCidr { cidr: String },

    #[error("\"{cidr}\" is not an {expected} CIDR")]
    WrongFamily {
        cidr: String,
        expected: AddressFamily,
    },

    #[error("invalid endpoint URL \"{url}\"")]
    InvalidEndpoint { url: String },
}

/// Failure talking to the control plane.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to start the async runtime")]
    Runtime(#[source] std::io::Error),

    #[error("could not load AWS credentials")]
    Credentials(#[source] CredentialsError),

    #[error("request to {operation} failed")]
    Request {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{operation} returned {kind} (HTTP {status}): {message}")]
    Service {
        operation: &'static str,
        status: u16,
        kind: String,
        message: String,
    },

    #[error("{operation} rejected locally: {reason}")]
    Validation {
        operation: &'static str,
        reason: String,
    },
}

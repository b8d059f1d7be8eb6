//! Lightsail control-plane client on top of the AWS SDK.
//!
//! The SDK is async; each call runs to completion on a private
//! current-thread runtime so the rest of the crate stays synchronous.

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::Credentials;
use aws_sdk_lightsail::config::http::HttpResponse;
use aws_sdk_lightsail::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_lightsail::types::{
    InstancePortState, NetworkProtocol, Operation, OperationStatus, PortInfo,
    PortState as LightsailPortState,
};
use aws_sdk_lightsail::Client;
use tokio::runtime::{Builder, Runtime};

use super::{FetchPortStates, ReplacePortStates};
use crate::config::DesiredConfig;
use crate::error::ApiError;
use crate::types::{PortRule, PortState, PortStatus, Protocol};

const GET_INSTANCE_PORT_STATES: &str = "GetInstancePortStates";
const PUT_INSTANCE_PUBLIC_PORTS: &str = "PutInstancePublicPorts";

/// Lowest port value Lightsail accepts; `-1` means "any" for ICMP codes.
const MIN_PORT: i32 = -1;
const MAX_PORT: i32 = 65535;

pub struct LightsailClient {
    runtime: Runtime,
    client: Client,
}

impl LightsailClient {
    /// Build a client for the configured region, profile and endpoint.
    ///
    /// Credentials come from the SDK's default chain (environment, shared
    /// config and credentials files, SSO, `credential_process`, container
    /// and instance roles). They are resolved here so a missing or broken
    /// source fails before any request is made.
    pub fn new(config: &DesiredConfig) -> Result<Self, ApiError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ApiError::Runtime)?;

        let sdk_config = runtime.block_on(load_sdk_config(config));
        let credentials = runtime.block_on(resolve_credentials(&sdk_config))?;
        log::debug!("signing with {}", describe_credentials(&credentials));

        Ok(LightsailClient {
            runtime,
            client: Client::new(&sdk_config),
        })
    }
}

async fn load_sdk_config(config: &DesiredConfig) -> SdkConfig {
    // One attempt per call; a failed read or write ends the run.
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::disabled());
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &config.endpoint {
        log::info!("using endpoint override {endpoint}");
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}

async fn resolve_credentials(sdk_config: &SdkConfig) -> Result<Credentials, ApiError> {
    let Some(provider) = sdk_config.credentials_provider() else {
        return Err(ApiError::Credentials(
            aws_credential_types::provider::error::CredentialsError::not_loaded(
                "no credentials provider is configured",
            ),
        ));
    };
    provider
        .provide_credentials()
        .await
        .map_err(ApiError::Credentials)
}

/// Safe to log: the access key id and whether a session token is present.
fn describe_credentials(credentials: &Credentials) -> String {
    let session = if credentials.session_token().is_some() {
        " with session token"
    } else {
        ""
    };
    format!("access key {}{session}", credentials.access_key_id())
}

impl FetchPortStates for LightsailClient {
    fn fetch_port_states(&self, instance: &str) -> Result<Vec<PortState>, ApiError> {
        log::debug!("{GET_INSTANCE_PORT_STATES} {instance}");
        let output = self
            .runtime
            .block_on(
                self.client
                    .get_instance_port_states()
                    .instance_name(instance)
                    .send(),
            )
            .map_err(|err| sdk_error(GET_INSTANCE_PORT_STATES, err))?;

        output
            .port_states()
            .iter()
            .map(port_state_from_sdk)
            .collect()
    }
}

impl ReplacePortStates for LightsailClient {
    fn replace_port_states(&self, instance: &str, rules: &[PortRule]) -> Result<(), ApiError> {
        let port_infos = port_infos(instance, rules)?;
        log::debug!(
            "{PUT_INSTANCE_PUBLIC_PORTS} {instance} ({} port ranges)",
            port_infos.len()
        );

        let output = self
            .runtime
            .block_on(
                self.client
                    .put_instance_public_ports()
                    .instance_name(instance)
                    .set_port_infos(Some(port_infos))
                    .send(),
            )
            .map_err(|err| sdk_error(PUT_INSTANCE_PUBLIC_PORTS, err))?;

        check_operation(output.operation())
    }
}

fn port_state_from_sdk(entry: &InstancePortState) -> Result<PortState, ApiError> {
    let invalid = |reason: String| ApiError::Validation {
        operation: GET_INSTANCE_PORT_STATES,
        reason,
    };

    let protocol = entry
        .protocol()
        .ok_or_else(|| invalid("port state without a protocol".to_string()))?;
    let protocol = protocol_from_sdk(protocol)
        .ok_or_else(|| invalid(format!("unsupported protocol \"{}\"", protocol.as_str())))?;
    check_port(entry.from_port()).map_err(invalid)?;
    check_port(entry.to_port()).map_err(invalid)?;

    let state = entry.state().and_then(|state| match state {
        LightsailPortState::Open => Some(PortStatus::Open),
        LightsailPortState::Closed => Some(PortStatus::Closed),
        _ => None,
    });

    Ok(PortState {
        from_port: entry.from_port(),
        to_port: entry.to_port(),
        protocol,
        state,
        cidrs4: entry.cidrs().to_vec(),
        cidrs6: entry.ipv6_cidrs().to_vec(),
        cidr_list_aliases: entry.cidr_list_aliases().to_vec(),
    })
}

fn protocol_from_sdk(protocol: &NetworkProtocol) -> Option<Protocol> {
    match protocol {
        NetworkProtocol::Tcp => Some(Protocol::Tcp),
        NetworkProtocol::Udp => Some(Protocol::Udp),
        NetworkProtocol::All => Some(Protocol::All),
        NetworkProtocol::Icmp => Some(Protocol::Icmp),
        NetworkProtocol::Icmpv6 => Some(Protocol::Icmpv6),
        _ => None,
    }
}

fn protocol_to_sdk(protocol: Protocol) -> NetworkProtocol {
    match protocol {
        Protocol::Tcp => NetworkProtocol::Tcp,
        Protocol::Udp => NetworkProtocol::Udp,
        Protocol::All => NetworkProtocol::All,
        Protocol::Icmp => NetworkProtocol::Icmp,
        Protocol::Icmpv6 => NetworkProtocol::Icmpv6,
    }
}

/// Build the replacement rule set. Both CIDR lists are always sent, even
/// when empty, because an omitted list would not clear that family.
fn port_infos(instance: &str, rules: &[PortRule]) -> Result<Vec<PortInfo>, ApiError> {
    let invalid = |reason: String| ApiError::Validation {
        operation: PUT_INSTANCE_PUBLIC_PORTS,
        reason,
    };

    if instance.is_empty() {
        return Err(invalid("instance name must not be empty".to_string()));
    }

    rules
        .iter()
        .map(|rule| {
            check_port(rule.from_port).map_err(invalid)?;
            check_port(rule.to_port).map_err(invalid)?;

            let aliases = if rule.cidr_list_aliases.is_empty() {
                None
            } else {
                Some(rule.cidr_list_aliases.clone())
            };
            Ok(PortInfo::builder()
                .from_port(rule.from_port)
                .to_port(rule.to_port)
                .protocol(protocol_to_sdk(rule.protocol))
                .set_cidrs(Some(rule.cidrs4.clone()))
                .set_ipv6_cidrs(Some(rule.cidrs6.clone()))
                .set_cidr_list_aliases(aliases)
                .build())
        })
        .collect()
}

fn check_port(port: i32) -> Result<(), String> {
    if (MIN_PORT..=MAX_PORT).contains(&port) {
        Ok(())
    } else {
        Err(format!("port {port} is out of range"))
    }
}

fn check_operation(operation: Option<&Operation>) -> Result<(), ApiError> {
    let Some(operation) = operation else {
        log::info!("{PUT_INSTANCE_PUBLIC_PORTS} returned no operation record");
        return Ok(());
    };

    let id = operation.id().unwrap_or("-");
    let status = operation.status().map_or("unknown", OperationStatus::as_str);
    log::info!("operation {id} status {status}");

    if matches!(operation.status(), Some(OperationStatus::Failed)) {
        return Err(ApiError::Service {
            operation: PUT_INSTANCE_PUBLIC_PORTS,
            status: 200,
            kind: operation.error_code().unwrap_or("OperationFailed").to_string(),
            message: operation.error_details().unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

/// Service errors keep their code and message; anything else (no
/// credentials, DNS, TLS, an unreadable body) is a failed request.
fn sdk_error<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(context) => {
            let status = context.raw().status().as_u16();
            let err = context.err();
            ApiError::Service {
                operation,
                status,
                kind: err.code().unwrap_or("UnknownError").to_string(),
                message: err.message().unwrap_or_default().to_string(),
            }
        }
        other => ApiError::Request {
            operation,
            source: Box::new(other),
        },
    }
}

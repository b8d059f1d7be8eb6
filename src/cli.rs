use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(name = "lockdown")]
#[command(
    version,
    about = "Reconcile a Lightsail instance's public firewall against a desired CIDR"
)]
pub struct Cli {
    /// AWS region the instance lives in
    #[arg(short, long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Lightsail instance name
    #[arg(short, long)]
    pub instance: Option<String>,

    /// IPv4 CIDR to allow, or "none" to close IPv4 access
    #[arg(short = '4', long = "ipv4", value_name = "CIDR")]
    pub ipv4: Option<String>,

    /// IPv6 CIDR to allow, or "none" to close IPv6 access
    #[arg(short = '6', long = "ipv6", value_name = "CIDR")]
    pub ipv6: Option<String>,

    /// Submit the rule set even if it already matches
    #[arg(short, long)]
    pub force: bool,

    /// Do everything but send the firewall update
    #[arg(short, long)]
    pub dry_run: bool,

    /// Named AWS profile to take credentials from (AWS_PROFILE also works)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Override the Lightsail API endpoint
    #[arg(long, env = "AWS_ENDPOINT_URL_LIGHTSAIL", value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

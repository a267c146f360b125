//! Command-line argument structures for the snmp-walker CLI tools.

use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::Version;
use crate::session::{DEFAULT_PORT, SessionBuilder};

/// SNMP version for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    /// SNMPv1
    #[value(name = "1")]
    V1,
    /// SNMPv2c (default)
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Output format for CLI tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `OID = TYPE: value` lines.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
    /// Tab-separated OID, type and value.
    Raw,
}

/// Common arguments shared across all CLI tools.
#[derive(Debug, Parser)]
pub struct CommonArgs {
    /// Target host or host:port (default port 161).
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// SNMP version: 1 or 2c.
    #[arg(short = 'v', long = "snmp-version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// Community string.
    #[arg(short = 'c', long = "community", default_value = "public")]
    pub community: String,

    /// Request timeout in seconds; 0 or less selects the 5 second default.
    #[arg(short = 't', long = "timeout", default_value = "5", allow_negative_numbers = true)]
    pub timeout: i64,
}

impl CommonArgs {
    /// Session builder for these arguments.
    pub fn session_builder(&self, output: &OutputArgs) -> SessionBuilder {
        crate::Session::builder(self.target.clone())
            .community(self.community.as_bytes())
            .version(self.snmp_version.into())
            .timeout_secs(self.timeout)
            .verbose(output.verbose)
            .debug(output.debug)
    }

    /// Target with the default port applied, for display.
    pub fn display_target(&self) -> String {
        crate::util::with_default_port(&self.target, DEFAULT_PORT)
    }

    /// Effective timeout.
    pub fn timeout_duration(&self) -> Duration {
        crate::session::timeout_from_secs(self.timeout)
    }
}

/// Output control arguments.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Output format: human, json, or raw.
    #[arg(short = 'O', long = "output", default_value = "human")]
    pub format: OutputFormat,

    /// Always display OctetString as hex.
    #[arg(long = "hex")]
    pub hex: bool,

    /// Show request timing.
    #[arg(long = "timing")]
    pub timing: bool,

    /// Log every request and response (snmp_walker=info).
    #[arg(long = "verbose")]
    pub verbose: bool,

    /// Log every walk step (snmp_walker=debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Enable trace logging (snmp_walker=trace).
    #[arg(short = 'D', long = "trace")]
    pub trace: bool,
}

impl OutputArgs {
    /// Tracing filter directive for these flags.
    pub fn log_filter(&self) -> &'static str {
        if self.trace {
            "snmp_walker=trace"
        } else if self.debug {
            "snmp_walker=debug"
        } else if self.verbose {
            "snmp_walker=info"
        } else {
            "snmp_walker=warn"
        }
    }

    /// Initialize tracing based on the logging flags.
    ///
    /// `RUST_LOG`, when set, takes precedence.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_filter()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Walk-specific arguments.
#[derive(Debug, Parser)]
pub struct WalkArgs {
    /// Use GETNEXT instead of GETBULK (always the case for SNMPv1).
    #[arg(long = "getnext")]
    pub getnext: bool,

    /// GETBULK max-repetitions.
    #[arg(short = 'B', long = "max-repetitions", default_value = "10")]
    pub max_repetitions: u8,

    /// Print results as they arrive instead of after the walk.
    #[arg(long = "stream")]
    pub stream: bool,
}

impl WalkArgs {
    /// Whether the walk must use GETNEXT.
    pub fn use_getnext(&self, version: SnmpVersion) -> bool {
        self.getnext || version == SnmpVersion::V1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        common: CommonArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[command(flatten)]
        walk: WalkArgs,
    }

    #[test]
    fn test_defaults() {
        let args = TestArgs::parse_from(["snmp-walk", "10.0.0.1"]);
        assert_eq!(args.common.snmp_version, SnmpVersion::V2c);
        assert_eq!(args.common.community, "public");
        assert_eq!(args.common.display_target(), "10.0.0.1:161");
        assert_eq!(args.common.timeout_duration(), Duration::from_secs(5));
        assert_eq!(args.walk.max_repetitions, 10);
        assert_eq!(args.output.format, OutputFormat::Human);
        assert_eq!(args.output.log_filter(), "snmp_walker=warn");
    }

    #[test]
    fn test_v1_forces_getnext() {
        let args = TestArgs::parse_from(["snmp-walk", "-v", "1", "-c", "private", "router:1161"]);
        assert!(args.walk.use_getnext(args.common.snmp_version));
        assert_eq!(Version::from(args.common.snmp_version), Version::V1);
    }

    #[test]
    fn test_non_positive_timeout_defaults() {
        let args = TestArgs::parse_from(["snmp-walk", "-t", "-2", "10.0.0.1"]);
        assert_eq!(args.common.timeout_duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_log_filter_precedence() {
        let args = TestArgs::parse_from(["snmp-walk", "--verbose", "-d", "10.0.0.1"]);
        assert_eq!(args.output.log_filter(), "snmp_walker=debug");
        let args = TestArgs::parse_from(["snmp-walk", "--verbose", "10.0.0.1"]);
        assert_eq!(args.output.log_filter(), "snmp_walker=info");
    }
}

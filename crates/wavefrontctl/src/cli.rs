//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use wavefront_api::{MatchingMethod, SearchCondition};

#[derive(Debug, Parser)]
#[command(name = "wavefrontctl", version, about = "Manage Wavefront users")]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct CommonOpts {
    /// Override the config file path
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wavefront host or base URL
    #[arg(long, global = true, env = "WAVEFRONT_ADDRESS")]
    pub address: Option<String>,

    /// API token
    #[arg(long, global = true, env = "WAVEFRONT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Increase logging verbosity (stackable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    #[command(subcommand)]
    Users(UsersCommand),
    /// List known permission tokens
    Permissions,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users, optionally filtered
    List {
        /// Search condition, repeatable; all must match
        #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// How filter values are matched
        #[arg(long = "match", value_enum, default_value_t = MatchArg::Contains)]
        matching: MatchArg,
    },
    /// Show a single user
    Get { id: String },
    /// Create a user
    Create {
        email: String,

        /// Permission to grant, repeatable
        #[arg(long = "permission")]
        permissions: Vec<String>,

        /// Group ID to join, repeatable
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Email the new user an invitation
        #[arg(long)]
        send_email: bool,
    },
    /// Update a user; unspecified fields are left as they are
    Update {
        id: String,

        /// Replace permissions with these, repeatable
        #[arg(long = "permission")]
        permissions: Vec<String>,

        /// Replace group memberships with these IDs, repeatable
        #[arg(long = "group")]
        groups: Vec<String>,

        /// Set a new password
        #[arg(long)]
        credential: Option<String>,
    },
    /// Delete a user
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    Contains,
    StartsWith,
    Exact,
    TagPath,
}

impl From<MatchArg> for MatchingMethod {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Contains => MatchingMethod::Contains,
            MatchArg::StartsWith => MatchingMethod::StartsWith,
            MatchArg::Exact => MatchingMethod::Exact,
            MatchArg::TagPath => MatchingMethod::TagPath,
        }
    }
}

/// Search conditions for `users list`.
pub fn search_conditions(filters: &[(String, String)], matching: MatchArg) -> Vec<SearchCondition> {
    filters
        .iter()
        .map(|(key, value)| SearchCondition::new(key, value).matching(matching.into()))
        .collect()
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filters() {
        assert_eq!(
            parse_filter("customer=acme").unwrap(),
            ("customer".to_string(), "acme".to_string())
        );
        assert_eq!(
            parse_filter("identifier=a=b").unwrap(),
            ("identifier".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("no-separator").is_err());
        assert!(parse_filter("=value").is_err());
    }

    #[test]
    fn list_command_builds_conditions() {
        let cli = Cli::try_parse_from([
            "wavefrontctl",
            "users",
            "list",
            "--filter",
            "identifier=ops@",
            "--match",
            "starts-with",
        ])
        .unwrap();

        let Command::Users(UsersCommand::List { filters, matching }) = cli.command else {
            panic!("expected users list");
        };
        let conditions = search_conditions(&filters, matching);
        assert_eq!(
            conditions,
            vec![SearchCondition::new("identifier", "ops@").matching(MatchingMethod::StartsWith)]
        );
    }

    #[test]
    fn create_command_collects_repeated_flags() {
        let cli = Cli::try_parse_from([
            "wavefrontctl",
            "--json",
            "users",
            "create",
            "new@example.com",
            "--permission",
            "ingestion",
            "--permission",
            "alerts_management",
            "--group",
            "g1",
            "--send-email",
        ])
        .unwrap();

        assert!(cli.common.json);
        match cli.command {
            Command::Users(UsersCommand::Create {
                email,
                permissions,
                groups,
                send_email,
            }) => {
                assert_eq!(email, "new@example.com");
                assert_eq!(permissions, vec!["ingestion", "alerts_management"]);
                assert_eq!(groups, vec!["g1"]);
                assert!(send_email);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["wavefrontctl", "-q", "-v", "permissions"]);
        assert!(result.is_err());
    }
}

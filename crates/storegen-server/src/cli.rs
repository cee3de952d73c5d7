//! Command line definition

use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::net::SocketAddr;
use std::path::PathBuf;

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Start the HTTP surface
    Serve { bind: Option<SocketAddr> },
    /// Drive one session from a profile file
    Generate {
        profile: PathBuf,
        refinements: Vec<String>,
        deploy: Option<String>,
    },
    /// List skeleton paths
    Skeleton,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub config: Option<PathBuf>,
    pub log_json: bool,
    pub invocation: Invocation,
}

/// `storegen` command definition
#[must_use]
pub fn command() -> Command {
    Command::new("storegen")
        .version(crate::VERSION)
        .about("Storefront generation, preview and deployment")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .env("STOREGEN_CONFIG")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP API")
                .arg(
                    Arg::new("bind")
                        .long("bind")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address, overrides configuration"),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a store from questionnaire answers and print the session")
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file with the store profile"),
                )
                .arg(
                    Arg::new("refine")
                        .long("refine")
                        .action(ArgAction::Append)
                        .help("Refinement feedback, applied in order"),
                )
                .arg(
                    Arg::new("deploy")
                        .long("deploy")
                        .value_name("PROJECT")
                        .help("Deploy under this project name"),
                ),
        )
        .subcommand(Command::new("skeleton").about("List the effective skeleton files"))
}

impl Cli {
    /// Interpret parsed arguments
    ///
    /// # Errors
    /// Unknown subcommand or missing required argument
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let invocation = match matches.subcommand() {
            Some(("serve", args)) => Invocation::Serve {
                bind: args.get_one::<SocketAddr>("bind").copied(),
            },
            Some(("generate", args)) => Invocation::Generate {
                profile: args
                    .get_one::<PathBuf>("profile")
                    .cloned()
                    .ok_or_else(|| anyhow!("--profile is required"))?,
                refinements: args
                    .get_many::<String>("refine")
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
                deploy: args.get_one::<String>("deploy").cloned(),
            },
            Some(("skeleton", _)) => Invocation::Skeleton,
            other => return Err(anyhow!("unknown command: {:?}", other.map(|(name, _)| name))),
        };

        Ok(Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            log_json: matches.get_flag("log-json"),
            invocation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        let matches = command().try_get_matches_from(args).unwrap();
        Cli::from_matches(&matches).unwrap()
    }

    #[test]
    fn generate_collects_refinements_in_order() {
        let cli = parse(&[
            "storegen",
            "generate",
            "--profile",
            "store.json",
            "--refine",
            "bigger logo",
            "--refine",
            "darker footer",
            "--deploy",
            "Acme Co",
            "--log-json",
        ]);
        assert!(cli.log_json);
        assert_eq!(
            cli.invocation,
            Invocation::Generate {
                profile: PathBuf::from("store.json"),
                refinements: vec!["bigger logo".into(), "darker footer".into()],
                deploy: Some("Acme Co".into()),
            }
        );
    }

    #[test]
    fn serve_bind_override() {
        let cli = parse(&["storegen", "--config", "storegen.toml", "serve", "--bind", "0.0.0.0:8080"]);
        assert_eq!(cli.config, Some(PathBuf::from("storegen.toml")));
        assert_eq!(
            cli.invocation,
            Invocation::Serve {
                bind: Some("0.0.0.0:8080".parse().unwrap())
            }
        );
    }

    #[test]
    fn generate_requires_profile() {
        assert!(command().try_get_matches_from(["storegen", "generate"]).is_err());
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }
}

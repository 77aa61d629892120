//! flatmatch CLI — driving adapter for the flatmatch element checks.
//!
//! Subcommands:
//! - `scalar <state> <resource> <pattern> <value>` — some element equals a value
//! - `nested <state> <resource> <pattern> --attr key=value...` — some element
//!   satisfies every non-empty criterion
//! - `explain <state> <resource> <pattern> (--value v | --attr key=value...)` —
//!   show how every key of the resource was classified
//! - `check <state> <checks>` — run a file of checks and report each one
//!
//! Resources are written `name` (root module) or `module.path:name`.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use flatmatch::{
    explain_nested, explain_scalar, load_file, match_nested_element, match_scalar_element,
    run_checks, ChecksConfig, KeyTrace, ResourceRef, State, StateProvider, ValueCriteria,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "flatmatch",
    version,
    about = "Assert set and list membership in flattened infrastructure state."
)]
struct Cli {
    /// Log matcher decisions to stderr (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that some element of a collection equals a value.
    Scalar {
        /// State file (JSON or YAML).
        state: PathBuf,
        /// Resource reference, e.g. `aws_instance.web` or `root.net:aws_vpc.main`.
        resource: ResourceRef,
        /// Attribute pattern ending in `*`.
        pattern: String,
        /// The element value to find.
        value: String,
    },
    /// Check that some element of a collection has the given nested attributes.
    Nested {
        /// State file (JSON or YAML).
        state: PathBuf,
        /// Resource reference.
        resource: ResourceRef,
        /// Attribute pattern ending in `*`.
        pattern: String,
        /// Nested attribute criterion, repeatable.
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Show how every attribute key is classified by a query.
    Explain {
        /// State file (JSON or YAML).
        state: PathBuf,
        /// Resource reference.
        resource: ResourceRef,
        /// Attribute pattern ending in `*`.
        pattern: String,
        /// Explain a scalar query for this value.
        #[arg(long, conflicts_with = "attrs", required_unless_present = "attrs")]
        value: Option<String>,
        /// Explain a nested query with this criterion, repeatable.
        #[arg(long = "attr", value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,
    },
    /// Run every check in a checks file against a state file.
    Check {
        /// State file (JSON or YAML).
        state: PathBuf,
        /// Checks file (JSON or YAML).
        checks: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Scalar {
            state,
            resource,
            pattern,
            value,
        } => cmd_scalar(&state, &resource, &pattern, &value),
        Command::Nested {
            state,
            resource,
            pattern,
            attrs,
        } => cmd_nested(&state, &resource, &pattern, attrs),
        Command::Explain {
            state,
            resource,
            pattern,
            value,
            attrs,
        } => cmd_explain(&state, &resource, &pattern, value.as_deref(), attrs),
        Command::Check { state, checks } => cmd_check(&state, &checks),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_scalar(
    state_path: &Path,
    resource: &ResourceRef,
    pattern: &str,
    value: &str,
) -> Result<(), String> {
    let state = load_state(state_path)?;
    match_scalar_element(&state, resource, pattern, value).map_err(|e| e.to_string())?;
    println!("ok: {resource} {pattern} contains {value:?}");
    Ok(())
}

fn cmd_nested(
    state_path: &Path,
    resource: &ResourceRef,
    pattern: &str,
    attrs: Vec<(String, String)>,
) -> Result<(), String> {
    let state = load_state(state_path)?;
    let criteria: ValueCriteria = attrs.into_iter().collect();
    match_nested_element(&state, resource, pattern, &criteria).map_err(|e| e.to_string())?;
    println!("ok: {resource} {pattern} has element {criteria}");
    Ok(())
}

fn cmd_explain(
    state_path: &Path,
    resource: &ResourceRef,
    pattern: &str,
    value: Option<&str>,
    attrs: Vec<(String, String)>,
) -> Result<(), String> {
    let state = load_state(state_path)?;
    let attributes = state.attributes(resource).map_err(|e| e.to_string())?;

    if let Some(value) = value {
        let trace = explain_scalar(attributes, pattern, value).map_err(|e| e.to_string())?;
        println!("{resource} {pattern} contains {value:?}");
        print_keys(&trace.keys);
        print_result(&trace.matching_ids());
    } else {
        let criteria: ValueCriteria = attrs.into_iter().collect();
        let trace = explain_nested(attributes, pattern, &criteria).map_err(|e| e.to_string())?;
        println!("{resource} {pattern} has element {criteria}");
        print_keys(&trace.keys);
        println!("confirmations (need {}):", trace.required);
        for (id, count) in &trace.confirmations {
            println!("  {id}: {count}");
        }
        print_result(&trace.matching_ids());
    }
    Ok(())
}

fn cmd_check(state_path: &Path, checks_path: &Path) -> Result<(), String> {
    let state = load_state(state_path)?;
    let config: ChecksConfig = load_file(checks_path).map_err(|e| e.to_string())?;
    let checks = config
        .into_checks()
        .map_err(|e| format!("invalid check in \"{}\": {e}", checks_path.display()))?;

    let outcomes = run_checks(&checks, &state);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("PASS {}", outcome.description),
            Err(e) => {
                failed += 1;
                println!("FAIL {}\n  {e}", outcome.description);
            }
        }
    }

    println!("\n{} passed, {failed} failed", outcomes.len() - failed);
    if failed > 0 {
        return Err(format!("{failed} of {} checks failed", outcomes.len()));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Output
// ═══════════════════════════════════════════════════════════════════════════════

fn print_keys(keys: &[KeyTrace]) {
    for key in keys {
        println!("  {:<32} {:<20} {}", key.key, format!("{:?}", key.value), key.verdict);
    }
}

fn print_result(ids: &[&str]) {
    if ids.is_empty() {
        println!("result: no match");
    } else {
        println!("result: matched element(s) {}", ids.join(", "));
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Loading and argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn load_state(path: &Path) -> Result<State, String> {
    let state: State = load_file(path).map_err(|e| e.to_string())?;
    debug!(path = %path.display(), modules = state.modules.len(), "state loaded");
    Ok(state)
}

fn parse_attr(pair: &str) -> Result<(String, String), String> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| format!("invalid attribute \"{pair}\", expected key=value"))?;
    if key.is_empty() {
        return Err(format!("invalid attribute \"{pair}\", empty key"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_attr_pairs() {
        assert_eq!(
            parse_attr("from_port=80").unwrap(),
            ("from_port".into(), "80".into())
        );
        assert_eq!(parse_attr("description=").unwrap(), ("description".into(), String::new()));
        assert_eq!(parse_attr("a=b=c").unwrap(), ("a".into(), "b=c".into()));
    }

    #[test]
    fn parse_attr_rejects_malformed() {
        assert!(parse_attr("badformat").is_err());
        assert!(parse_attr("=value").is_err());
    }

    #[test]
    fn parse_nested_command() {
        let cli = Cli::try_parse_from([
            "flatmatch",
            "nested",
            "state.json",
            "root.net:aws_security_group.db",
            "ingress.*",
            "--attr",
            "from_port=5432",
            "--attr",
            "protocol=tcp",
        ])
        .unwrap();

        match cli.command {
            Command::Nested {
                resource, attrs, ..
            } => {
                assert_eq!(resource.module_path(), "root.net");
                assert_eq!(resource.name(), "aws_security_group.db");
                assert_eq!(attrs.len(), 2);
            }
            other => panic!("expected nested, got {other:?}"),
        }
    }

    #[test]
    fn explain_needs_value_or_attrs() {
        let base = ["flatmatch", "explain", "s.json", "r", "set.*"];
        assert!(Cli::try_parse_from(base).is_err());
        assert!(Cli::try_parse_from(base.iter().copied().chain(["--value", "x"])).is_ok());
        assert!(Cli::try_parse_from(base.iter().copied().chain(["--attr", "a=b"])).is_ok());
        assert!(Cli::try_parse_from(
            base.iter().copied().chain(["--value", "x", "--attr", "a=b"])
        )
        .is_err());
    }

    #[test]
    fn rejects_bad_resource_reference() {
        assert!(Cli::try_parse_from(["flatmatch", "scalar", "s.json", "net:", "a.*", "x"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli =
            Cli::try_parse_from(["flatmatch", "check", "s.json", "c.yaml", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }
}

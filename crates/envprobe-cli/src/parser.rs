//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Inspect conda environments and measure their GPU acceleration.
#[derive(Parser)]
#[command(name = "envprobe")]
#[command(about = "Locate conda, list its environments and probe them for GPU support")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Manager executable name to look for
    #[arg(long, global = true, env = "ENVPROBE_MANAGER")]
    pub manager: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use envprobe_core::Framework;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["envprobe", "--verbose", "--json", "envs"]);
        assert!(cli.verbose);
        assert!(cli.json);
        assert!(matches!(cli.command, Some(Commands::Envs)));
    }

    #[test]
    fn test_probe_defaults_to_torch() {
        let cli = Cli::parse_from(["envprobe", "probe", "ml"]);
        let Some(Commands::Probe { env, framework }) = cli.command else {
            panic!("expected probe command");
        };
        assert_eq!(env, "ml");
        assert_eq!(framework, Framework::Torch);
    }

    #[test]
    fn test_probe_framework_aliases() {
        let cli = Cli::parse_from(["envprobe", "probe", "ml", "--framework", "tf"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Probe {
                framework: Framework::TensorFlow,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["envprobe", "probe", "ml", "-f", "jax"]).is_err());
    }

    #[test]
    fn test_environment_names_are_not_validated_by_clap() {
        // Validation happens in the service so rejected names are reported uniformly.
        let cli = Cli::parse_from(["envprobe", "packages", "bad;name"]);
        assert!(matches!(cli.command, Some(Commands::Packages { env }) if env == "bad;name"));
    }
}

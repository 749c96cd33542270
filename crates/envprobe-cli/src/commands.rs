//! Available subcommands.

use clap::Subcommand;
use envprobe_core::Framework;

#[derive(Subcommand)]
pub enum Commands {
    /// Show where the manager executable was found and how
    Locate,

    /// Show `<manager> info`
    Info,

    /// List managed environments
    Envs,

    /// List packages in an environment
    Packages {
        /// Environment name or absolute prefix path
        env: String,
    },

    /// Check GPU availability and benchmark a framework inside an environment
    Probe {
        /// Environment name or absolute prefix path
        env: String,
        /// Framework to probe (torch or tensorflow)
        #[arg(short, long, default_value = "torch")]
        framework: Framework,
    },

    /// Manager info, environment list and optionally one package list
    Summary {
        /// Also list packages in this environment
        #[arg(short, long)]
        env: Option<String>,
    },

    /// Show a native system inventory category (macOS `system_profiler`)
    Inventory {
        /// Data type such as SPHardwareDataType
        #[arg(required_unless_present = "list")]
        category: Option<String>,
        /// List the accepted data types
        #[arg(long)]
        list: bool,
    },
}

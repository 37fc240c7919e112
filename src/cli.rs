use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "sheet-agent")]
#[command(
    about = "Chat with a hosted AI agent about a spreadsheet and download the charts it draws",
    long_about = None
)]
pub struct Args {
    #[arg(long = "config", help = "Path to a YAML or JSON settings file")]
    pub config: Option<PathBuf>,

    #[arg(long = "endpoint", help = "Agent service project endpoint URL")]
    pub endpoint: Option<String>,

    #[arg(long = "agent-name", help = "Name of the agent to use or create")]
    pub agent_name: Option<String>,

    #[arg(
        long = "stream",
        conflicts_with = "poll",
        help = "Stream the agent's reply as it is generated"
    )]
    pub stream: bool,

    #[arg(long = "poll", help = "Poll the run until it finishes (default)")]
    pub poll: bool,

    #[arg(
        long = "require-file",
        help = "Keep asking until a spreadsheet is selected"
    )]
    pub require_file: bool,

    #[arg(short = 'v', long = "verbose", help = "Print diagnostic output")]
    pub verbose: bool,

    #[arg(
        long = "init-config",
        help = "Write an example .sheet-agent.yaml in the current directory"
    )]
    pub init_config: bool,
}

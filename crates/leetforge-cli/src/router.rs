// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use leetforge_config::LeetcodeSite;

use crate::{commands::*, error::CliResult};

/// leetforge - generate and locally test LeetCode solutions
#[derive(Parser, Debug)]
#[command(name = "leetforge")]
#[command(bin_name = "leetforge")]
#[command(about = "Generate, regenerate and locally test LeetCode solutions")]
#[command(
    long_about = "leetforge renders solution skeletons with test drivers for Go, Python and Rust,\nkeeps your code between the @lc code markers across regenerations,\nand runs the examples locally.\n\nQuick start:\n  • leetforge init               Create leetforge.yaml\n  • leetforge setup              Bootstrap the language project\n  • leetforge gen q.json         Generate a question\n  • leetforge test q.json        Run its examples"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Question site
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    /// leetcode.com
    Us,
    /// leetcode.cn
    Cn,
}

impl From<Site> for LeetcodeSite {
    fn from(site: Site) -> Self {
        match site {
            Site::Us => LeetcodeSite::Us,
            Site::Cn => LeetcodeSite::Cn,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the global config and a project leetforge.yaml
    #[command(about = "Initialize a leetforge project")]
    Init {
        /// Project directory (default: current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Question site
        #[arg(short = 't', long = "site", value_enum, default_value = "cn")]
        site: Site,

        /// Rewrite an existing leetforge.yaml
        #[arg(long)]
        force: bool,
    },

    /// Generate solution files from question metadata
    #[command(about = "Generate or regenerate questions")]
    Gen {
        /// Question metadata files
        #[arg(value_name = "QUESTION_JSON", required = true)]
        questions: Vec<PathBuf>,

        /// Target language (default: code.lang)
        #[arg(short, long)]
        lang: Option<String>,

        /// Show what would be written without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a generated question against its test cases
    #[command(about = "Run the examples of a question locally")]
    Test {
        #[arg(value_name = "QUESTION_JSON")]
        question: PathBuf,

        /// Target language (default: code.lang)
        #[arg(short, long)]
        lang: Option<String>,
    },

    /// Create the language project and add the test support library
    #[command(about = "Bootstrap the output project of a language")]
    Setup {
        /// Target language (default: code.lang)
        #[arg(short, long)]
        lang: Option<String>,
    },
}

/// Route and execute commands
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Init { dir, site, force } => {
                let cmd = InitCommand::new(dir.clone())
                    .with_site((*site).into())
                    .with_force(*force);
                cmd.execute().await
            }
            Commands::Gen {
                questions,
                lang,
                dry_run,
            } => {
                let cmd = GenCommand::new(questions.clone())
                    .with_lang(lang.clone())
                    .with_dry_run(*dry_run);
                cmd.execute().await
            }
            Commands::Test { question, lang } => {
                let cmd = TestCommand::new(question.clone()).with_lang(lang.clone());
                cmd.execute().await
            }
            Commands::Setup { lang } => {
                let cmd = SetupCommand::new(lang.clone());
                cmd.execute().await
            }
        }
    }
}

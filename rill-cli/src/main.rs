//! Rill CLI - The Rill language command line interface.
//! Rill CLI - Rill 语言的命令行界面。

mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::Session;
use std::path::PathBuf;
use std::sync::Once;

/// Main CLI structure.
/// 主 CLI 结构体。
#[derive(Parser)]
#[command(name = "rill")]
#[command(author, version, about = "Rill - An asynchronous, expression-oriented scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output. / 启用详细输出。
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output. / 抑制输出。
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory imports and file reads resolve against. / 导入与读文件的基准目录。
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Forbid network access. / 禁止网络访问。
    #[arg(long, global = true)]
    offline: bool,
}

/// Available CLI commands.
/// 可用的 CLI 命令。
#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression. / 求值表达式。
    Eval {
        /// The expression to evaluate. / 要求值的表达式。
        expr: String,
    },

    /// Run a Rill file. / 运行 Rill 文件。
    Run {
        /// The file to run. / 要运行的文件。
        file: PathBuf,
    },

    /// Parse a file and report syntax errors. / 解析文件并报告语法错误。
    Check {
        /// The file to check. / 要检查的文件。
        file: PathBuf,
    },

    /// Start an interactive REPL. / 启动交互式 REPL。
    Repl,
}

static TRACING_INIT: Once = Once::new();

/// Initialize logging. `RUST_LOG` wins; otherwise `--verbose` shows debug
/// events and the default shows warnings only.
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let fallback = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}

/// Main entry point.
/// 主入口点。
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = Session {
        base_path: cli.base_path,
        offline: cli.offline,
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Eval { expr } => commands::eval::run(&expr, &session),
        Commands::Run { file } => commands::run::run(&file, &session),
        Commands::Check { file } => commands::check::run(&file, &session),
        Commands::Repl => commands::repl::run(&session),
    };

    if let Err(e) = result {
        if !cli.quiet {
            output::error(&e);
        }
        std::process::exit(1);
    }
}

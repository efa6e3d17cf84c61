//! StudHelper CLI - command-line client for the StudHelper API.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

/// StudHelper - study with your class documents
#[derive(Parser, Debug)]
#[command(name = "studhelper")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// API root, overriding settings and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in with email and password
    Login {
        /// Account email
        email: String,
        /// Account password
        #[arg(short, long)]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: Option<String>,
    },

    /// Log out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Manage classes
    Classes {
        #[command(subcommand)]
        command: ClassCommands,
    },

    /// Manage class documents
    Docs {
        #[command(subcommand)]
        command: DocCommands,
    },

    /// Chat with a class
    Chat {
        #[command(subcommand)]
        command: ChatCommands,
    },

    /// Show token usage
    Usage,

    /// Check a value against the client-side rules
    Validate {
        kind: ValidateKind,
        value: String,
    },
}

#[derive(Subcommand, Debug)]
enum ClassCommands {
    /// List classes (the selected one is starred)
    List,

    /// Show a class with its documents
    Show { id: u64 },

    /// Create a class with optional files and videos
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// File to upload (repeatable)
        #[arg(short, long = "file")]
        files: Vec<String>,
        /// YouTube link to attach (repeatable)
        #[arg(long = "video")]
        videos: Vec<String>,
    },

    /// Delete a class
    Delete { id: u64 },

    /// Join a class by code
    Join { code: String },

    /// Select the class used by chat commands
    Select { id: u64 },

    /// List class members
    Members { id: u64 },
}

#[derive(Subcommand, Debug)]
enum DocCommands {
    /// Upload a file to a class
    Upload {
        class_id: u64,
        path: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Attach a YouTube video to a class
    Youtube {
        class_id: u64,
        url: String,
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Replace a document's description (omit to clear it)
    Describe {
        class_id: u64,
        document_id: u64,
        description: Option<String>,
    },

    /// Delete a document
    Delete { class_id: u64, document_id: u64 },

    /// Stage several changes to a class and apply them together
    Edit {
        class_id: u64,
        /// File to upload (repeatable)
        #[arg(long = "add")]
        add: Vec<String>,
        /// Document to delete (repeatable)
        #[arg(long = "remove")]
        remove: Vec<u64>,
        /// New description as `ID=TEXT` (repeatable)
        #[arg(long = "describe")]
        describe: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ChatCommands {
    /// List chat sessions of a class
    Sessions {
        /// Class ID (default: selected class)
        #[arg(short, long)]
        class: Option<u64>,
    },

    /// Open a new chat session
    New {
        title: String,
        #[arg(short, long)]
        class: Option<u64>,
    },

    /// Send a message and print the reply
    Send { session_id: u64, message: String },

    /// Print a session's messages
    History { session_id: u64 },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ValidateKind {
    Email,
    Password,
    Username,
    ClassName,
    Youtube,
    /// A file path; checks size and type
    File,
}

fn init_logging(verbose: u8, json: bool) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| format!("studhelper={log_level}").into()),
    );

    if json {
        registry
            .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    let result = commands::run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

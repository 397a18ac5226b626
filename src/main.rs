use clap::{Parser as ClapParser, Subcommand};
use mexpr::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "mexpr")]
#[command(about = "mexpr - query, compare and filter JSON with small expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run an expression
    Check {
        /// The expression to run
        expression: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// JSON example to type check the expression against
        #[arg(short, long)]
        example: Option<String>,

        /// Treat missing properties as errors
        #[arg(long)]
        strict: bool,

        /// Read unresolved identifiers as strings
        #[arg(short, long)]
        unquoted: bool,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,
    },

    /// Print the tokens of an expression
    Tokens {
        expression: String,
    },
}

fn main() {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level, warnings only by default
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            input,
            example,
            strict,
            unquoted,
            pretty,
            syntax_only,
        } => run_check(CheckOptions {
            expression,
            input,
            example,
            strict,
            unquoted,
            pretty,
            syntax_only,
        }),
        Commands::Tokens { expression } => cli::list_tokens(&expression).map(|lines| {
            for line in lines {
                println!("{}", line);
            }
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(mut options: CheckOptions) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }
            .map_err(|error| CliError::Json {
                what: "output",
                error,
            })?;
            println!("{}", json);
        }
    }
    Ok(())
}

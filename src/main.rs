use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::{Parser, Subcommand};
use konoha_ast::{
    ast::{ast::NodeRef, dump::dump, statements::CodeBlock},
    display_error,
    errors::errors::Error,
    lexer::{lexer::tokenize, tokens::Token},
    parser::parser::parse,
    unparser::unparser::unparse,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Common AST for visual scripting: inspect Python scripts through the AST.
#[derive(Parser)]
#[command(name = "konoha_ast", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token stream of a script
    Tokens { file: PathBuf },
    /// Parse a script and print its AST as JSON
    Parse {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a script and unparse it back to Python
    Unparse {
        file: PathBuf,
        /// Normalise the layout of the output
        #[arg(long)]
        format: bool,
        /// Indentation level of every statement
        #[arg(long, default_value_t = 0)]
        indent: usize,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file = match &cli.command {
        Command::Tokens { file } | Command::Parse { file, .. } | Command::Unparse { file, .. } => {
            file.clone()
        }
    };

    let source = match read_to_string(&file) {
        Ok(source) => source,
        Err(err) => {
            error!("Failed to read {}: {}", file.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let file_name = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("shell"));

    match run(&cli.command, &source, file_name) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            display_error(&err, &source);
            ExitCode::FAILURE
        }
    }
}

fn run(command: &Command, source: &str, file_name: String) -> Result<String, Error> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(file_name.clone()))?;
    info!("Tokenized in {:?}", start.elapsed());

    match command {
        Command::Tokens { .. } => Ok(tokens
            .iter()
            .map(|token| format!("{:?}", token))
            .collect::<Vec<String>>()
            .join("\n")),
        Command::Parse { pretty, .. } => {
            let block = parse_block(tokens, file_name)?;
            let value = dump(NodeRef::Stmt(&block));
            let json = if *pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };
            Ok(json.unwrap_or_else(|_| value.to_string()))
        }
        Command::Unparse { format, indent, .. } => {
            let block = parse_block(tokens, file_name)?;
            let unparse_start = Instant::now();
            let code = unparse(NodeRef::Stmt(&block), *indent, *format)?;
            info!("Unparsed in {:?}", unparse_start.elapsed());
            Ok(code.trim_end_matches('\n').to_string())
        }
    }
}

fn parse_block(tokens: Vec<Token>, file_name: String) -> Result<CodeBlock, Error> {
    let parse_start = Instant::now();
    let (_, block) = parse(tokens, Rc::new(file_name));
    info!("Parsed in {:?}", parse_start.elapsed());
    block
}

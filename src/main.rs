use clap::Parser;
use clap::Subcommand;
use scream::lex::SingleTokenError;
use scream::repl::{Config, Repl};
use scream::{Lexer, evaluate, render};

#[derive(Parser, Debug)]
#[command(about = "Evaluates prefix arithmetic like `+ 1 (* 2 3)`")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    repl: Config,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the tokens of a line
    Tokenize {
        #[arg(allow_hyphen_values = true)]
        line: String,
    },
    /// Print the syntax tree of a line and its shape
    Parse {
        #[arg(allow_hyphen_values = true)]
        line: String,
    },
    /// Evaluate a single line and print the result
    Eval {
        #[arg(allow_hyphen_values = true)]
        line: String,
    },
}

fn main() -> miette::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        None => Repl::new(args.repl)?.run()?,
        Some(Commands::Tokenize { line }) => {
            for token in Lexer::new(None, &line) {
                let token = match token {
                    Ok(token) => token,
                    Err(e) => {
                        if let Some(single_token_error) = e.downcast_ref::<SingleTokenError>() {
                            eprintln!(
                                "[byte {}] Error: Unexpected character: {}",
                                single_token_error.offset(),
                                single_token_error.token
                            );
                        }
                        eprintln!("{e:?}");
                        std::process::exit(65);
                    }
                };
                println!("{token}");
            }
            println!("EOF  null");
        }
        Some(Commands::Parse { line }) => {
            let tree = match scream::parse(&line) {
                Ok(tree) => tree,
                Err(e) => {
                    eprintln!("{e:?}");
                    std::process::exit(65);
                }
            };
            println!("{tree}");
            println!(
                "nodes: {}, branches: {}, widest: {}",
                tree.nodes(),
                tree.branches(),
                tree.widest()
            );
        }
        Some(Commands::Eval { line }) => {
            let tree = match scream::parse(&line) {
                Ok(tree) => tree,
                Err(e) => {
                    eprintln!("{e:?}");
                    std::process::exit(65);
                }
            };
            let result = evaluate(&tree);
            println!("{}", render(&result));
            if result.is_err() {
                std::process::exit(70);
            }
        }
    }
    Ok(())
}

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, WrapErr};
use rpn_calc::*;
use std::io::{self, BufRead, Write};
use tracing::Level;

const GREETING: &str = "
\tReverse Polish Notation Calculator
\t----------------------------------

\t[operand] [operand] <operator> ...

\tuse [mem] to recall previous result
\tuse [pi] for pi
\toperators are [+ - * / % ^]
";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read expressions from stdin until end of input.
    Repl {
        #[arg(long, default_value = ">>> ")]
        prompt: String,
        /// Skip the greeting banner.
        #[arg(short, long)]
        quiet: bool,
    },
    /// Evaluate each expression in order; [mem] carries over between them.
    Eval {
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Print the classified tokens of an expression.
    Tokenize { line: String },
}

fn report(err: CalcError) {
    eprintln!("{:?}", miette::Report::new(err));
}

fn repl(prompt: &str, quiet: bool) -> miette::Result<()> {
    if !quiet {
        println!("{GREETING}");
    }

    let mut calc = Evaluator::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{prompt}");
        stdout.flush().into_diagnostic()?;

        let mut input = String::new();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .into_diagnostic()
            .wrap_err("reading from stdin failed")?;
        if read == 0 {
            println!("\n'till next time");
            break;
        }

        match calc.evaluate(input.trim()) {
            Ok(res) => println!("{res}"),
            Err(err) => report(err),
        }
    }

    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let command = cli.command.unwrap_or(Commands::Repl {
        prompt: ">>> ".to_string(),
        quiet: false,
    });

    match command {
        Commands::Repl { prompt, quiet } => repl(&prompt, quiet)?,
        Commands::Eval { lines } => {
            let mut calc = Evaluator::new();
            for line in &lines {
                match calc.evaluate(line.trim()) {
                    Ok(res) => println!("{res}"),
                    Err(err) => report(err),
                }
            }
            tracing::info!(memory = calc.memory(), "done");
        }
        Commands::Tokenize { line } => match tokenize(line.trim()) {
            Ok(tokens) => {
                for token in tokens {
                    println!("{:?} {:?}", token.kind, token.text);
                }
            }
            Err(err) => report(err),
        },
    }

    Ok(())
}

use std::io::IsTerminal;

use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use exprwriter::evaluation::{EvaluationError, Interpreter};
use exprwriter::formatting::{literal, render, Identity};
use exprwriter::language::{Lambda, Type, Value};
use exprwriter::output::typst_document;
use exprwriter::reduction::lower_lambda;
use exprwriter::rendering::{Terminal, Typst};
use exprwriter::samples::{self, Sample};

mod problem;

use problem::{concise_problem, Problem};

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("exprfmt")
        .version(VERSION)
        .propagate_version(true)
        .about("Render expression trees as readable C# source.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log what the writer, the reductions and the interpreter are doing. RUST_LOG overrides this."),
        )
        .subcommand(Command::new("list").about("List the built-in sample trees"))
        .subcommand(
            Command::new("show")
                .about("Write out one of the sample trees as source")
                .arg(
                    Arg::new("reduce")
                        .long("reduce")
                        .action(ArgAction::SetTrue)
                        .help("Lower loops and using blocks to primitive nodes before writing."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_parser(["native", "typst", "plain"])
                        .default_value("native")
                        .help("Which kind of output to emit: highlighted source, a Typst document, or plain text."),
                )
                .arg(
                    Arg::new("sample")
                        .required(true)
                        .help("The name of the sample, as shown by 'exprfmt list'."),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Evaluate one of the sample trees")
                .arg(
                    Arg::new("sample")
                        .required(true)
                        .help("The name of the sample, as shown by 'exprfmt list'."),
                )
                .arg(
                    Arg::new("arguments")
                        .num_args(0..)
                        .help("Arguments for the lambda: integers, true or false, or strings."),
                ),
        )
        .get_matches();

    setup_logging(matches.get_flag("debug"));

    match matches.subcommand() {
        Some(("list", _)) => {
            for sample in samples::all() {
                println!("{:<12}{}", sample.name, sample.summary);
            }
        }
        Some(("show", submatches)) => {
            let name = sample_name(submatches);
            if let Err(problem) = show(name, submatches) {
                fail(name, &problem);
            }
        }
        Some(("run", submatches)) => {
            let name = sample_name(submatches);
            if let Err(problem) = run(name, submatches) {
                fail(name, &problem);
            }
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: exprfmt [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn sample_name(submatches: &ArgMatches) -> &str {
    submatches
        .get_one::<String>("sample")
        .map(String::as_str)
        .unwrap_or_default()
}

fn fail(name: &str, problem: &Problem) -> ! {
    eprintln!("{}", concise_problem(name, problem));
    std::process::exit(1);
}

fn build(name: &str) -> Result<(&'static Sample, Lambda), Problem> {
    let sample = samples::find(name).ok_or_else(|| Problem::UnknownSample(name.to_string()))?;
    let lambda = (sample.build)()?;
    Ok((sample, lambda))
}

fn show(name: &str, submatches: &ArgMatches) -> Result<(), Problem> {
    let (sample, mut lambda) = build(name)?;

    if submatches.get_flag("reduce") {
        debug!(sample = sample.name, "Reducing before writing");
        lambda = lower_lambda(&lambda)?;
    }

    let output = submatches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("native");

    let result = match output {
        "typst" => {
            let markup = render(&Typst, &lambda)?;
            typst_document(sample.summary, &markup)?
        }
        "plain" => render(&Identity, &lambda)?,
        _ => {
            let raw = submatches.get_flag("raw-control-chars");
            if raw || std::io::stdout().is_terminal() {
                render(&Terminal, &lambda)?
            } else {
                render(&Identity, &lambda)?
            }
        }
    };

    println!("{}", result);
    Ok(())
}

fn run(name: &str, submatches: &ArgMatches) -> Result<(), Problem> {
    let (_, lambda) = build(name)?;

    let texts: Vec<&String> = submatches
        .get_many::<String>("arguments")
        .unwrap_or_default()
        .collect();

    if texts.len()
        != lambda
            .parameters
            .len()
    {
        return Err(EvaluationError::ArgumentCount {
            expected: lambda
                .parameters
                .len(),
            found: texts.len(),
        }
        .into());
    }

    let arguments = texts
        .into_iter()
        .zip(&lambda.parameters)
        .map(|(text, parameter)| parse_argument(text, parameter.ty()))
        .collect::<Result<Vec<Value>, Problem>>()?;

    let mut interpreter = Interpreter::new();
    interpreter.define("Console.WriteLine", |arguments| {
        for argument in arguments {
            match argument {
                Value::String(text) => println!("{}", text),
                value => println!("{}", literal(value)),
            }
        }
        Ok(Value::Void)
    });

    let result = interpreter.invoke(&lambda, arguments)?;
    if !matches!(result, Value::Void) {
        println!("{} {}", "=>".bold(), literal(&result));
    }
    Ok(())
}

/// Read a command line argument as a value of the parameter's type.
fn parse_argument(text: &str, ty: &Type) -> Result<Value, Problem> {
    let invalid = || Problem::Argument(format!("{} for a parameter of type {}", text, ty));
    match ty {
        Type::Int32 => text
            .parse::<i32>()
            .map(Value::Int32)
            .map_err(|_| invalid()),
        Type::Int64 => text
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|_| invalid()),
        Type::Double => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| invalid()),
        Type::Boolean => text
            .parse::<bool>()
            .map(Value::Boolean)
            .map_err(|_| invalid()),
        Type::String | Type::Object => Ok(Value::string(text)),
        _ => Err(invalid()),
    }
}

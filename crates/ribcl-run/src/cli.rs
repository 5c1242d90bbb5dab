use clap::{Parser, Subcommand};
use colored::Colorize;
use itertools::Itertools;
use miette::{IntoDiagnostic, WrapErr, miette};
use ribcl_parser::{
    Backplane, DEFAULT_MAX_DEPTH, Node, ParserOptions, StorageSummary, TraceEvent,
    response_statuses,
};
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::sync::Arc;
use std::{fs, path::PathBuf};
use tracing_subscriber::EnvFilter;

const SUCCESS_STATUS: &str = "0x0000";

#[derive(Parser, Debug)]
#[command(name = "ribcl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(after_help = "# Examples:\n\n\
    ## To print every document of a captured response:\n\
    ribcl parse response.xml\n\n\
    ## To look up a node anywhere below each root:\n\
    ribcl find './/GET_HOST_POWER' response.xml\n\n\
    ## To check the RESPONSE codes of a response read from stdin:\n\
    cat response.xml | ribcl status")]
#[command(
    about = "ribcl parses multi-document RIBCL responses from management controllers and queries the resulting trees.",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum element nesting depth before a document is dropped
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, global = true)]
    max_depth: usize,

    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Debug, clap::Args)]
struct InputArgs {
    /// Captured response to read. Reads stdin when omitted
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Xml,
    Json,
    Tree,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every document that could be parsed
    Parse {
        #[arg(short = 'F', long, value_enum, default_value_t)]
        format: OutputFormat,

        #[clap(flatten)]
        input: InputArgs,
    },
    /// Print the first node matching PATH in each document
    Find {
        /// `TAG`, `A/B/C` or `.//TAG`
        path: String,

        #[arg(short = 'F', long, value_enum, default_value_t)]
        format: OutputFormat,

        #[clap(flatten)]
        input: InputArgs,
    },
    /// Print every node matching PATH in each document
    FindAll {
        /// `TAG`, `A/B/C` or `.//TAG`
        path: String,

        #[arg(short = 'F', long, value_enum, default_value_t)]
        format: OutputFormat,

        #[clap(flatten)]
        input: InputArgs,
    },
    /// Print the STATUS and MESSAGE of every RESPONSE node
    Status {
        #[clap(flatten)]
        input: InputArgs,
    },
    /// Print the storage and backplane summary as JSON
    Storage {
        #[clap(flatten)]
        input: InputArgs,
    },
    /// Show how the response splits into documents and which of them parse
    Split {
        #[clap(flatten)]
        input: InputArgs,
    },
}

impl Commands {
    fn input(&self) -> &InputArgs {
        match self {
            Commands::Parse { input, .. }
            | Commands::Find { input, .. }
            | Commands::FindAll { input, .. }
            | Commands::Status { input }
            | Commands::Storage { input }
            | Commands::Split { input } => input,
        }
    }
}

impl Cli {
    pub fn run(&self) -> miette::Result<()> {
        init_tracing(self.verbose);

        if !io::stdout().is_terminal() {
            colored::control::set_override(false);
        }

        let text = read_input(self.commands.input())?;
        let parser = self.parser();
        let stdout = io::stdout();
        let mut handle = BufWriter::new(stdout.lock());

        let result = match &self.commands {
            Commands::Parse { format, .. } => {
                let roots = parser.parse_response(&text);
                print_nodes(&mut handle, roots.iter(), *format)
            }
            Commands::Find { path, format, .. } => {
                let roots = parser.parse_response(&text);
                let matches = roots
                    .iter()
                    .filter_map(|root| root.find(path.as_str()))
                    .collect::<Vec<_>>();
                if matches.is_empty() {
                    Err(miette!("No node matches `{}`", path))
                } else {
                    print_nodes(&mut handle, matches.into_iter(), *format)
                }
            }
            Commands::FindAll { path, format, .. } => {
                let roots = parser.parse_response(&text);
                let matches = roots
                    .iter()
                    .flat_map(|root| root.find_all(path.as_str()))
                    .collect::<Vec<_>>();
                if matches.is_empty() {
                    Err(miette!("No node matches `{}`", path))
                } else {
                    print_nodes(&mut handle, matches.into_iter(), *format)
                }
            }
            Commands::Status { .. } => {
                let roots = parser.parse_response(&text);
                print_statuses(&mut handle, &roots)
            }
            Commands::Storage { .. } => {
                let roots = parser.parse_response(&text);
                print_storage(&mut handle, &roots)
            }
            Commands::Split { .. } => print_split(&mut handle, &parser, &text),
        };

        handle.flush().into_diagnostic()?;
        result
    }

    fn parser(&self) -> ribcl_parser::Parser {
        ribcl_parser::Parser::new(ParserOptions {
            max_depth: self.max_depth,
            ..Default::default()
        })
        .with_trace_sink(Arc::new(log_trace_event))
    }
}

fn log_trace_event(event: &TraceEvent<'_>) {
    match event {
        TraceEvent::DocumentDropped { .. } => tracing::warn!("{}", event),
        TraceEvent::DocumentStart { .. }
        | TraceEvent::DocumentParsed { .. }
        | TraceEvent::ImplicitClose { .. } => tracing::debug!("{}", event),
        _ => tracing::trace!("{}", event),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_input(input: &InputArgs) -> miette::Result<String> {
    if let Some(file) = &input.file {
        return fs::read_to_string(file)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", file.display()));
    }

    if io::stdin().is_terminal() {
        return Ok(String::new());
    }

    let mut text = String::new();
    io::stdin().read_to_string(&mut text).into_diagnostic()?;
    Ok(text)
}

fn print_nodes<'a>(
    handle: &mut impl Write,
    nodes: impl Iterator<Item = &'a Node>,
    format: OutputFormat,
) -> miette::Result<()> {
    match format {
        OutputFormat::Xml => {
            for node in nodes {
                writeln!(handle, "{}", node).into_diagnostic()?;
            }
        }
        OutputFormat::Json => {
            let nodes = nodes.collect::<Vec<_>>();
            let json = serde_json::to_string_pretty(&nodes).into_diagnostic()?;
            writeln!(handle, "{}", json).into_diagnostic()?;
        }
        OutputFormat::Tree => {
            for node in nodes {
                print_tree(handle, node, 0)?;
            }
        }
    }

    Ok(())
}

fn print_tree(handle: &mut impl Write, node: &Node, depth: usize) -> miette::Result<()> {
    let attributes = node
        .attributes()
        .iter()
        .map(|(name, value)| format!(" {}={}", name.yellow(), format!("\"{}\"", value).green()))
        .join("");
    let text = node
        .text()
        .map(|text| format!(": {}", text))
        .unwrap_or_default();

    writeln!(
        handle,
        "{}{}{}{}",
        "  ".repeat(depth),
        node.tag().cyan().bold(),
        attributes,
        text
    )
    .into_diagnostic()?;

    for child in node.children() {
        print_tree(handle, child, depth + 1)?;
    }

    Ok(())
}

fn print_statuses(handle: &mut impl Write, roots: &[Node]) -> miette::Result<()> {
    let statuses = response_statuses(roots);
    if statuses.is_empty() {
        return Err(miette!("No RESPONSE node found"));
    }

    for status in &statuses {
        let code = if status.status == SUCCESS_STATUS {
            status.status.green()
        } else {
            status.status.red().bold()
        };
        writeln!(handle, "{} {}", code, status.message).into_diagnostic()?;
    }

    let failures = statuses
        .iter()
        .filter(|status| status.status != SUCCESS_STATUS)
        .map(|status| status.status)
        .collect::<Vec<_>>();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(miette!(
            "{} of {} responses reported an error: {}",
            failures.len(),
            statuses.len(),
            failures.iter().join(", ")
        ))
    }
}

fn print_storage(handle: &mut impl Write, roots: &[Node]) -> miette::Result<()> {
    let storage = StorageSummary::from_roots(roots);
    let backplane = Backplane::from_roots(roots);

    if storage.is_empty() && backplane.is_none() {
        return Err(miette!("No storage or backplane information found"));
    }

    let json = serde_json::to_string_pretty(&serde_json::json!({
        "storage": storage,
        "backplane": backplane,
    }))
    .into_diagnostic()?;
    writeln!(handle, "{}", json).into_diagnostic()
}

fn print_split(
    handle: &mut impl Write,
    parser: &ribcl_parser::Parser,
    text: &str,
) -> miette::Result<()> {
    let documents = parser.split_documents(text);
    writeln!(handle, "{} documents", documents.len()).into_diagnostic()?;

    for (index, document) in documents.iter().enumerate() {
        match parser.parse_document(document) {
            Ok(root) => writeln!(handle, "#{} {}", index, root.tag().green()),
            Err(error) => writeln!(
                handle,
                "#{} {}\n{:?}",
                index,
                "dropped".red(),
                miette::Report::new(error)
            ),
        }
        .into_diagnostic()?;
    }

    Ok(())
}

//! `scriptorium` command line

mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use commands::{CommentaryArgs, TimelineArgs};
use scriptorium_canon::Canon;
use scriptorium_completion::ProviderKind;
use scriptorium_timeline::{CrossReference, Point};
use serde::Serialize;
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("scriptorium")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scripture references, cross-reference timelines and verse commentary")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log at debug level unless RUST_LOG is set"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve a reference to book, chapter, verse, testament and position")
                .arg(Arg::new("reference").required(true).help("e.g. \"John 3:16\""))
                .arg(
                    Arg::new("psalm-singular")
                        .long("psalm-singular")
                        .action(ArgAction::SetTrue)
                        .help("Spell Psalms as \"Psalm\" (passage lookup spelling)"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("timeline")
                .about("Cluster cross-references of a source verse on the canon circle")
                .arg(Arg::new("source").required(true).help("Source reference"))
                .arg(
                    Arg::new("cross-references")
                        .num_args(0..)
                        .help("Cross-references to place"),
                )
                .arg(
                    Arg::new("from-json")
                        .long("from-json")
                        .value_parser(value_parser!(PathBuf))
                        .help("Read cross-references from a JSON list"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Configuration file supplying circle geometry"),
                )
                .arg(
                    Arg::new("radius")
                        .long("radius")
                        .value_parser(value_parser!(f64))
                        .help("Circle radius"),
                )
                .arg(
                    Arg::new("cx")
                        .long("cx")
                        .value_parser(value_parser!(f64))
                        .help("Circle center x"),
                )
                .arg(
                    Arg::new("cy")
                        .long("cy")
                        .value_parser(value_parser!(f64))
                        .help("Circle center y"),
                )
                .arg(
                    Arg::new("markers")
                        .long("markers")
                        .action(ArgAction::SetTrue)
                        .help("Include the 66 book markers"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("commentary")
                .about("Generate commentary for one verse of a passage")
                .arg(
                    Arg::new("passage")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Passage JSON: { \"verses\": [{ \"reference\", \"text\" }] }"),
                )
                .arg(Arg::new("verse").required(true).help("Verse reference within the passage"))
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Configuration file (TOML)"),
                )
                .arg(
                    Arg::new("store")
                        .long("store")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON file holding the commentary book"),
                )
                .arg(
                    Arg::new("provider")
                        .long("provider")
                        .value_parser(["openai", "gemini"])
                        .help("Override the configured default provider"),
                )
                .arg(
                    Arg::new("regenerate")
                        .long("regenerate")
                        .action(ArgAction::SetTrue)
                        .help("Replace an existing commentary"),
                )
                .arg(json_flag()),
        )
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a String> {
    args.get_one::<String>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn timeline_args(args: &ArgMatches) -> Result<TimelineArgs> {
    let mut cross_references: Vec<CrossReference> = args
        .get_many::<String>("cross-references")
        .unwrap_or_default()
        .map(CrossReference::new)
        .collect();
    if let Some(path) = args.get_one::<PathBuf>("from-json") {
        cross_references.extend(commands::read_cross_references(path)?);
    }

    let config = commands::load_config(args.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let mut circle = config.timeline.circle();
    if let Some(radius) = args.get_one::<f64>("radius") {
        circle.radius = *radius;
    }
    circle.center = Point::new(
        args.get_one::<f64>("cx").copied().unwrap_or(circle.center.x),
        args.get_one::<f64>("cy").copied().unwrap_or(circle.center.y),
    );

    Ok(TimelineArgs {
        source: required(args, "source")?.clone(),
        cross_references,
        circle,
        markers: args.get_flag("markers"),
    })
}

fn commentary_args(args: &ArgMatches) -> Result<CommentaryArgs> {
    let provider = args
        .get_one::<String>("provider")
        .map(|name| name.parse::<ProviderKind>())
        .transpose()?;

    Ok(CommentaryArgs {
        passage: args
            .get_one::<PathBuf>("passage")
            .cloned()
            .context("missing argument <passage>")?,
        verse: required(args, "verse")?.clone(),
        config: args.get_one::<PathBuf>("config").cloned(),
        store: args.get_one::<PathBuf>("store").cloned(),
        provider,
        regenerate: args.get_flag("regenerate"),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    let level = if matches.get_flag("verbose") { "debug" } else { "info" };
    logging::init(level, matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("resolve", args)) => {
            let canon = if args.get_flag("psalm-singular") {
                Canon::passage_lookup()
            } else {
                Canon::timeline()
            };
            let report = commands::resolve(required(args, "reference")?, &canon)?;
            if args.get_flag("json") {
                print_json(&report)?;
            } else {
                println!("{}", report.to_text());
            }
        }
        Some(("timeline", args)) => {
            let report = commands::timeline(&timeline_args(args)?)?;
            if args.get_flag("json") {
                print_json(&report)?;
            } else {
                print!("{}", report.to_text());
            }
        }
        Some(("commentary", args)) => {
            let commentary = commands::commentary(&commentary_args(args)?).await?;
            if args.get_flag("json") {
                print_json(&commentary)?;
            } else {
                println!("# {}\n", commentary.verse_ref);
                println!("{}", commentary.commentary.to_markdown());
            }
        }
        _ => unreachable!("subcommand_required is set"),
    }

    Ok(())
}

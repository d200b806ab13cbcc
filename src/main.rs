use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use osmap::map::{read_map, Map};

/// Query OpenStreetMap PBF extracts.
#[derive(Parser, Debug)]
#[command(name = "osmap", arg_required_else_help = true)]
struct Args {
    /// Input file; standard input when omitted. May only be given once.
    #[arg(short = 'f', value_name = "PATH")]
    file: Vec<PathBuf>,

    /// Print a summary of node and way counts
    #[arg(short = 's')]
    summary: bool,

    /// Print the bounding box in degrees
    #[arg(short = 'b')]
    bbox: bool,

    /// Look up a node by id
    #[arg(short = 'n', value_name = "ID")]
    node: Option<i64>,

    /// Look up a way by id, optionally restricted to tag keys
    #[arg(short = 'w', value_name = "ID [KEY...]", num_args = 1..)]
    way: Option<Vec<String>>,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprint!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("osmap: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.file.len() > 1 {
        return Err("the -f option may only be given once".into());
    }

    // Validate the way query before spending time on the decode.
    let way_query = match &args.way {
        Some(parts) => {
            let id = parts[0]
                .parse::<i64>()
                .map_err(|_| format!("invalid way id {:?}", parts[0]))?;
            Some((id, &parts[1..]))
        }
        None => None,
    };

    let map = match args.file.first() {
        Some(path) => read_map(BufReader::new(File::open(path)?))?,
        None => read_map(io::stdin().lock())?,
    };

    if args.summary {
        println!("nodes: {}, ways: {}", map.num_nodes(), map.num_ways());
    }
    if args.bbox {
        print_bbox(&map);
    }
    if let Some(id) = args.node {
        print_node(&map, id);
    }
    if let Some((id, keys)) = way_query {
        print_way(&map, id, keys);
    }
    Ok(())
}

fn print_bbox(map: &Map) {
    if let Some(bbox) = map.bbox() {
        println!(
            "min_lon: {:.9}, max_lon: {:.9}, max_lat: {:.9}, min_lat: {:.9}",
            as_degrees(bbox.min_lon()),
            as_degrees(bbox.max_lon()),
            as_degrees(bbox.max_lat()),
            as_degrees(bbox.min_lat()),
        );
    }
}

fn print_node(map: &Map, id: i64) {
    match map.node_by_id(id) {
        Some(node) => println!(
            "{}\t{:.7} {:.7}",
            node.id(),
            as_degrees(node.lat()),
            as_degrees(node.lon()),
        ),
        None => eprintln!("node {id} not found"),
    }
}

fn print_way(map: &Map, id: i64, keys: &[String]) {
    let way = match map.way_by_id(id) {
        Some(way) => way,
        None => return,
    };

    if keys.is_empty() {
        // Every reference is followed by a space, the last one included.
        print!("{}\t", way.id());
        for i in 0..way.num_refs() {
            if let Some(r) = way.reference(i) {
                print!("{r} ");
            }
        }
        println!();
        return;
    }

    // Values for the requested keys, in argument order; a way key may match
    // more than once.
    let mut values = Vec::new();
    for key in keys {
        for i in 0..way.num_tags() {
            if way.key(i) == Some(key.as_str()) {
                if let Some(value) = way.value(i) {
                    values.push(value);
                }
            }
        }
    }

    if values.is_empty() {
        println!("{}\t\t", way.id());
    } else {
        println!("{}\t{}", way.id(), values.join(" "));
    }
}

/// Nanodegrees to degrees.
fn as_degrees(nano: i64) -> f64 {
    nano as f64 / 1e9
}

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use condroute::{
    nearest_edge, nearest_edge_within, Algorithm, Condition, GeoPoint, NetworkStore, RoutingEngine,
    SearchOptions, SqliteStore, DEFAULT_STEP_LIMIT,
};

#[derive(Debug, thiserror::Error)]
#[error("no edge near ({0}, {1})")]
struct NoEdgeError(f64, f64);

#[derive(Parser)]
struct Cli {
    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the nodes and edges tables in a database
    Init {
        /// The path to the SQLite database
        db: PathBuf,
    },

    /// Print the mean position of all nodes
    Center {
        /// The path to the SQLite database
        db: PathBuf,
    },

    /// Find a route between two positions and print it as GeoJSON
    #[command(allow_negative_numbers = true)]
    Route {
        /// The path to the SQLite database
        db: PathBuf,

        /// Latitude of the start point
        start_lat: f64,

        /// Longitude of the start point
        start_lon: f64,

        /// Latitude of the end point
        end_lat: f64,

        /// Longitude of the end point
        end_lon: f64,

        /// Routing algorithm: "astar" or "dijkstra"
        #[arg(short, long, default_value_t = Algorithm::AStar)]
        algorithm: Algorithm,

        /// Maximum number of node expansions
        #[arg(long, default_value_t = DEFAULT_STEP_LIMIT)]
        step_limit: usize,
    },

    /// Set the condition of road segments
    #[command(allow_negative_numbers = true)]
    SetCondition {
        /// The path to the SQLite database
        db: PathBuf,

        /// New condition: normal, traffic, flood or block
        condition: Condition,

        /// Edit the segment closest to this position
        #[arg(long, num_args = 2, value_names = ["LAT", "LON"], required_unless_present = "edge")]
        at: Option<Vec<f64>>,

        /// Ignore segments further than this many degrees from --at
        #[arg(long, requires = "at")]
        max_distance: Option<f64>,

        /// Edit the segment with this id (may be repeated)
        #[arg(long, conflicts_with = "at")]
        edge: Vec<i64>,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    colog::default_builder()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    match cli.command {
        Command::Init { db } => SqliteStore::new(db).initialize()?,

        Command::Center { db } => {
            let network = SqliteStore::new(db).load_network()?;
            match network.center() {
                Some(c) => println!("{} {}", c.lat, c.lon),
                None => log::warn!("the network has no nodes"),
            }
        }

        Command::Route {
            db,
            start_lat,
            start_lon,
            end_lat,
            end_lon,
            algorithm,
            step_limit,
        } => {
            let engine = RoutingEngine::load(&SqliteStore::new(db))?;
            let options = SearchOptions {
                algorithm,
                step_limit,
            };
            let route = engine.route(
                GeoPoint::new(start_lat, start_lon),
                GeoPoint::new(end_lat, end_lon),
                &options,
            )?;
            print_route(&route.points, route.cost, algorithm);
        }

        Command::SetCondition {
            db,
            condition,
            at,
            max_distance,
            edge,
        } => {
            let store = SqliteStore::new(db);
            let engine = RoutingEngine::load(&store)?;

            let edge_ids = match at.as_deref() {
                Some(&[lat, lon]) => {
                    let point = GeoPoint::new(lat, lon);
                    let found = match max_distance {
                        Some(max) => nearest_edge_within(point, engine.network(), max),
                        None => nearest_edge(point, engine.network()),
                    };
                    vec![found.ok_or(NoEdgeError(lat, lon))?.id]
                }
                _ => edge,
            };

            engine.apply_conditions(&store, &edge_ids, condition)?;
            for id in edge_ids {
                println!("{} {}", id, condition);
            }
        }
    }

    Ok(())
}

fn print_route(points: &[GeoPoint], cost: f64, algorithm: Algorithm) {
    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!(
        "      \"properties\": {{\"cost\": {}, \"algorithm\": \"{}\"}},",
        cost, algorithm
    );

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut points = points.iter().peekable();
    while let Some(p) = points.next() {
        let suffix = if points.peek().is_some() { "," } else { "" };
        println!("          [{}, {}]{}", p.lon, p.lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");
}

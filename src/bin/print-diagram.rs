extern crate sweepline_voronoi;

use std::env;
use std::process;

use sweepline_voronoi::{Config, Point, Voronoi};

/// Create a Point. Panics if given NaN.
fn point(x: f64, y: f64) -> Point {
    Point::new_unwrap(x, y)
}

fn generate_sites() -> Vec<Point> {
    vec![
        point(10.0, 10.0),
        point(90.0, 10.0),
        point(50.0, 90.0),
        point(30.0, 55.0),
        point(70.0, 45.0)
    ]
}

/// Parse an `x,y` argument.
fn parse_site(argument: &str) -> Option<Point> {
    let mut parts = argument.splitn(2, ',');
    let x = parts.next()?.trim().parse().ok()?;
    let y = parts.next()?.trim().parse().ok()?;
    Point::new(x, y).ok()
}

fn main () {
    let arguments: Vec<String> = env::args().skip(1).collect();

    let sites = if arguments.is_empty() {
        generate_sites()
    } else {
        let mut sites = vec![];
        for argument in &arguments {
            match parse_site(argument) {
                Some(site) => sites.push(site),
                None => {
                    eprintln!("Expected a site as x,y but got {:?}.", argument);
                    process::exit(2);
                }
            }
        }
        sites
    };

    let mut voronoi = match Voronoi::new(sites, Config::default()) {
        Ok(voronoi) => voronoi,
        Err(error) => {
            eprintln!("{}", error);
            process::exit(1);
        }
    };

    while !voronoi.is_finished() {
        println!("{} events left.", voronoi.pending_events());
        if let Err(error) = voronoi.step() {
            eprintln!("Step failed: {}", error);
        }
    }

    println!("{}", voronoi);
    println!("End of program.");
}

//! Radius queries over the payment index.

use std::io::{BufRead, Write};

use kdbtree::{KdbTree, Point, Region};

use crate::errors::{RunnerError, RunnerResult};
use crate::payments::parse_coordinate;

/// Kilometres per degree, applied to both latitude and longitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Radius used when a query line gives none.
pub const DEFAULT_RADIUS_KM: f64 = 1.0;

/// A query line: `lat, lng[, category[, radius_km]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusQuery {
    pub lat: f64,
    pub lng: f64,
    /// `None` matches every category
    pub category: Option<String>,
    pub radius_km: f64,
}

impl RadiusQuery {
    pub fn parse(line: &str) -> Result<RadiusQuery, String> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if !(2..=4).contains(&fields.len()) {
            return Err(format!(
                "expected `lat, lng[, category[, radius_km]]`, got {} fields",
                fields.len()
            ));
        }

        let category = fields
            .get(2)
            .filter(|category| !category.is_empty())
            .map(|category| category.to_string());

        let radius_km = match fields.get(3) {
            Some(radius) => match radius.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() && parsed >= 0.0 => parsed,
                _ => return Err(format!("invalid radius `{}`", radius)),
            },
            None => DEFAULT_RADIUS_KM,
        };

        Ok(RadiusQuery {
            lat: parse_coordinate("latitude", fields[0])?,
            lng: parse_coordinate("longitude", fields[1])?,
            category,
            radius_km,
        })
    }

    pub fn radius_degrees(&self) -> f64 {
        self.radius_km / KM_PER_DEGREE
    }

    /// The closed box `[c - r, c + r]` around the query centre, so points
    /// on the circle itself are found.
    pub fn bounding_region(&self) -> RunnerResult<Region> {
        Ok(Region::around(&[self.lat, self.lng], self.radius_degrees())?)
    }

    /// Finds the payments within the query radius.
    pub fn run<'a>(&self, tree: &'a KdbTree<String>) -> RunnerResult<Vec<&'a Point<String>>> {
        let radius = self.radius_degrees();
        let centre = [self.lat, self.lng];
        let found = tree.query(&self.bounding_region()?, self.category.as_ref())?;
        Ok(found
            .into_iter()
            .filter(|point| point.distance_to(&centre) <= radius)
            .collect())
    }
}

/// Reads query lines, skipping blank lines.
pub fn read_queries<R: BufRead>(reader: R, source_name: &str) -> RunnerResult<Vec<RadiusQuery>> {
    let mut queries = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let query = RadiusQuery::parse(&line)
            .map_err(|message| RunnerError::parse(source_name, index + 1, message))?;
        queries.push(query);
    }
    Ok(queries)
}

/// Formats a match as `name, category, lat, lng`.
pub fn format_match(point: &Point<String>) -> String {
    format!(
        "{}, {}, {}, {}",
        point.data(),
        point.category().map(String::as_str).unwrap_or(""),
        point.coord(0).unwrap_or_default(),
        point.coord(1).unwrap_or_default()
    )
}

/// Runs every query and writes its matches followed by a summary line.
///
/// Returns the total number of matches.
pub fn run_queries<W: Write>(
    tree: &KdbTree<String>,
    queries: &[RadiusQuery],
    out: &mut W,
) -> RunnerResult<usize> {
    let mut total = 0;
    for (index, query) in queries.iter().enumerate() {
        let matches = query.run(tree)?;
        for point in &matches {
            writeln!(out, "{}", format_match(point))?;
        }
        writeln!(out, "Found {} merchants for query {}.", matches.len(), index + 1)?;
        log::debug!("Query {} {:?} matched {}", index + 1, query, matches.len());
        total += matches.len();
    }
    Ok(total)
}

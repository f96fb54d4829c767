//! Payment records and the index built from them.

use std::io::BufRead;

use kdbtree::{KdbTree, Region, TreeConfig};

use crate::errors::{RunnerError, RunnerResult};

/// A merchant payment: `name, category, lat, lng`.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub name: String,
    pub category: Option<String>,
    pub lat: f64,
    pub lng: f64,
}

impl Payment {
    /// Parses one payment line.
    ///
    /// Fields are split from the right so merchant names may contain
    /// commas. An empty category leaves the payment untagged.
    pub fn parse(line: &str) -> Result<Payment, String> {
        let mut fields = line.rsplitn(4, ',').map(str::trim);
        let lng = fields.next();
        let lat = fields.next();
        let category = fields.next();
        let name = fields.next();

        let (Some(name), Some(category), Some(lat), Some(lng)) = (name, category, lat, lng) else {
            return Err(format!(
                "expected `name, category, lat, lng`, got `{}`",
                line.trim()
            ));
        };

        if name.is_empty() {
            return Err("merchant name is empty".to_string());
        }

        Ok(Payment {
            name: name.to_string(),
            category: (!category.is_empty()).then(|| category.to_string()),
            lat: parse_coordinate("latitude", lat)?,
            lng: parse_coordinate("longitude", lng)?,
        })
    }

    pub fn coords(&self) -> Vec<f64> {
        vec![self.lat, self.lng]
    }
}

pub(crate) fn parse_coordinate(label: &str, value: &str) -> Result<f64, String> {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(parsed),
        _ => Err(format!("invalid {} `{}`", label, value)),
    }
}

/// The `[-90, 90) x [-180, 180)` latitude/longitude domain.
pub fn geo_domain() -> RunnerResult<Region> {
    Ok(Region::new(vec![(-90.0..90.0).into(), (-180.0..180.0).into()])?)
}

/// Reads payments line by line, skipping blank lines.
///
/// # Errors
///
/// Returns [`RunnerError::Parse`] with the 1-based line number of the first
/// malformed line.
pub fn read_payments<R: BufRead>(reader: R, source_name: &str) -> RunnerResult<Vec<Payment>> {
    let mut payments = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let payment = Payment::parse(&line)
            .map_err(|message| RunnerError::parse(source_name, index + 1, message))?;
        payments.push(payment);
    }
    Ok(payments)
}

/// Builds a tree over the geographic domain holding every payment, keyed by
/// merchant name.
pub fn build_index(payments: Vec<Payment>, config: TreeConfig) -> RunnerResult<KdbTree<String>> {
    let mut tree = KdbTree::with_config(geo_domain()?, config)?;
    for payment in payments {
        let coords = payment.coords();
        tree.insert(coords, payment.name, payment.category)?;
    }

    let stats = tree.stats();
    log::info!(
        "Indexed {} payments in {} leaves (height {})",
        stats.total_points,
        stats.point_nodes,
        stats.height
    );
    Ok(tree)
}

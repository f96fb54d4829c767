//! Structural integrity checks.
//!
//! Walks the whole tree and verifies the invariants every completed insert
//! must leave behind:
//! - region nodes are non-empty and their children partition their region
//! - all leaves sit at the same depth
//! - aggregated category sets equal the categories stored beneath
//! - leaves hold their points and respect capacity (duplicate clusters excepted)

use std::collections::HashSet;
use std::hash::Hash;

use crate::node::{Node, PointNode, RegionNode};
use crate::region::Region;

const VOLUME_TOLERANCE: f64 = 1e-9;

/// Findings of [`KdbTree::check_integrity`](crate::KdbTree::check_integrity).
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes visited
    pub nodes_checked: usize,
    /// Points found in leaves
    pub points_found: usize,
    /// Depth of the leaves if they all agree
    pub leaf_depth: Option<usize>,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            points_found: 0,
            leaf_depth: None,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_tree<D, C: Clone + Eq + Hash>(
    domain: &Region,
    root: Option<&Node<D, C>>,
    expected_points: usize,
) -> IntegrityReport {
    let mut report = IntegrityReport::new();
    let Some(root) = root else {
        if expected_points != 0 {
            report.fail(format!(
                "tree reports {} points but has no root",
                expected_points
            ));
        }
        return report;
    };

    if root.region() != domain {
        report.fail(format!(
            "root region {} differs from domain {}",
            root.region(),
            domain
        ));
    }

    let mut leaf_depths = HashSet::new();
    check_node(root, 0, &mut leaf_depths, &mut report);

    if leaf_depths.len() > 1 {
        let mut depths: Vec<_> = leaf_depths.into_iter().collect();
        depths.sort_unstable();
        report.fail(format!("leaves found at different depths {:?}", depths));
    } else {
        report.leaf_depth = leaf_depths.into_iter().next();
    }

    if report.points_found != expected_points {
        report.fail(format!(
            "tree reports {} points but leaves hold {}",
            expected_points, report.points_found
        ));
    }

    report
}

fn check_node<D, C: Clone + Eq + Hash>(
    node: &Node<D, C>,
    depth: usize,
    leaf_depths: &mut HashSet<usize>,
    report: &mut IntegrityReport,
) {
    report.nodes_checked += 1;
    match node {
        Node::Point(leaf) => {
            leaf_depths.insert(depth);
            check_leaf(leaf, report);
        }
        Node::Region(internal) => {
            check_internal(internal, report);
            for child in internal.children() {
                check_node(child, depth + 1, leaf_depths, report);
            }
        }
    }
}

fn check_leaf<D, C: Clone + Eq + Hash>(leaf: &PointNode<D, C>, report: &mut IntegrityReport) {
    report.points_found += leaf.len();

    if leaf.len() > leaf.capacity() && !leaf.is_duplicate_cluster() {
        report.fail(format!(
            "leaf {} holds {} points, capacity {}",
            leaf.region(),
            leaf.len(),
            leaf.capacity()
        ));
    }

    for point in leaf.points() {
        if !leaf.region().contains_point(point.coords()) {
            report.fail(format!(
                "point {:?} lies outside its leaf {}",
                point.coords(),
                leaf.region()
            ));
        }
    }

    let stored: HashSet<C> = leaf.points().iter().filter_map(|p| p.category().cloned()).collect();
    if &stored != leaf.categories() {
        report.fail(format!(
            "leaf {} category set does not match its points",
            leaf.region()
        ));
    }
}

fn check_internal<D, C: Clone + Eq + Hash>(
    internal: &RegionNode<D, C>,
    report: &mut IntegrityReport,
) {
    let region = internal.region();
    let children = internal.children();

    if children.is_empty() {
        report.fail(format!("region node {} has no children", region));
        return;
    }

    for (i, child) in children.iter().enumerate() {
        if !region.contains_region(child.region()) {
            report.fail(format!(
                "child {} escapes parent region {}",
                child.region(),
                region
            ));
        }
        for sibling in &children[i + 1..] {
            if child.region().intersects(sibling.region()) {
                report.fail(format!(
                    "sibling regions {} and {} overlap",
                    child.region(),
                    sibling.region()
                ));
            }
        }
    }

    // disjoint nested children cover the parent iff their volumes add up
    let volume = region.volume();
    if volume.is_finite() {
        let covered: f64 = children.iter().map(|c| c.region().volume()).sum();
        if (covered - volume).abs() > volume.abs() * VOLUME_TOLERANCE {
            report.fail(format!(
                "children of {} cover volume {} of {}",
                region, covered, volume
            ));
        }
    }

    let aggregated: HashSet<C> = children
        .iter()
        .flat_map(|c| c.categories().iter().cloned())
        .collect();
    if &aggregated != internal.categories() {
        report.fail(format!(
            "region node {} category set does not match its children",
            region
        ));
    }
}

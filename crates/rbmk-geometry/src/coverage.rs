//! Lattice sampling of cell coverage.
//!
//! Every point of a modelled volume must lie in exactly one cell of the
//! universe placed there. This module samples a rectilinear lattice of
//! points inside an axis-aligned box, optionally restricted to a domain
//! region, and records points claimed by no cell (gaps) or by several
//! cells (overlaps). Sampling cannot prove coverage, but with a spacing
//! finer than the thinnest layer it catches misplaced subtractions.

use crate::geometry::Geometry;
use crate::region::Region;
use crate::universe::UniverseId;

/// A sampled point together with the cells that claim it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageSample {
    pub position: [f64; 3],
    /// Cell indices within the checked universe.
    pub cells: Vec<usize>,
}

/// Outcome of a coverage check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    /// Number of lattice points inside the domain.
    pub sampled: usize,
    pub gaps: Vec<CoverageSample>,
    pub overlaps: Vec<CoverageSample>,
}

impl CoverageReport {
    pub fn is_clean(&self) -> bool {
        self.gaps.is_empty() && self.overlaps.is_empty()
    }
}

/// Generate lattice points in `[min, max]` with per-axis `spacing`.
///
/// Points start at `min` on each axis and never exceed `max`.
pub fn sample_box(min: [f64; 3], max: [f64; 3], spacing: [f64; 3]) -> Vec<[f64; 3]> {
    assert!(
        spacing.iter().all(|s| *s > 0.0),
        "Sampling spacing must be positive"
    );

    let steps = |axis: usize| -> usize {
        if max[axis] < min[axis] {
            0
        } else {
            ((max[axis] - min[axis]) / spacing[axis]).floor() as usize + 1
        }
    };
    let (nx, ny, nz) = (steps(0), steps(1), steps(2));

    let mut points = Vec::with_capacity(nx * ny * nz);
    for i in 0..nx {
        let x = min[0] + i as f64 * spacing[0];
        for j in 0..ny {
            let y = min[1] + j as f64 * spacing[1];
            for k in 0..nz {
                let z = min[2] + k as f64 * spacing[2];
                points.push([x, y, z]);
            }
        }
    }
    points
}

/// Sample a universe for gaps and overlaps.
///
/// Only points inside `domain` (when given) are tested; the domain uses the
/// geometry's own surfaces and the universe's local frame.
pub fn check_universe(
    geometry: &Geometry,
    universe: UniverseId,
    domain: Option<&Region>,
    min: [f64; 3],
    max: [f64; 3],
    spacing: [f64; 3],
) -> CoverageReport {
    let mut report = CoverageReport::default();
    for position in sample_box(min, max, spacing) {
        if let Some(d) = domain {
            if !d.contains(geometry.surfaces(), &position) {
                continue;
            }
        }
        report.sampled += 1;
        let cells = geometry.cells_at(universe, &position);
        match cells.len() {
            1 => {}
            0 => report.gaps.push(CoverageSample { position, cells }),
            _ => report.overlaps.push(CoverageSample { position, cells }),
        }
    }

    if !report.is_clean() {
        let name = geometry
            .universe(universe)
            .map(|u| u.name.as_str())
            .unwrap_or("?");
        log::warn!(
            "Universe '{}': {} gap and {} overlap points out of {} sampled",
            name,
            report.gaps.len(),
            report.overlaps.len(),
            report.sampled
        );
    }
    report
}

//! Pin placement on concentric rings.
//!
//! The RBMK fuel bundle carries 18 elements on two rings around the central
//! carrier rod: 6 on the inner ring and 12 on the outer ring. The outer ring
//! is tangent to the channel wall and the inner ring radius follows from a
//! closed-form packing relation:
//!
//! $$r_{out} = r_{ch} - r_{el}, \qquad p = \tfrac{\pi}{12} r_{out} - r_{el}$$
//! $$r_{in} = r_{out}\cos\tfrac{\pi}{12} - \sqrt{(2r_{el} + p)^2 - (r_{el} + p)^2}$$
//!
//! Ring $i$ with $N_i$ pins and phase $\theta_i$ places pin $k$ at
//! $(R_i\cos(2\pi k/N_i + \theta_i),\ R_i\sin(2\pi k/N_i + \theta_i))$.
//! The relation is specific to the 6/12 design.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pins per ring of the RBMK bundle, inner ring first.
pub const RBMK_RING_COUNTS: [usize; 2] = [6, 12];

/// Angular phase of each RBMK ring (rad).
pub const RBMK_RING_PHASES: [f64; 2] = [0.0, PI / 12.0];

/// Errors from ring layout construction.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("Ring description lists differ in length: {counts} counts, {radii} radii, {phases} phases")]
    MismatchedRings {
        counts: usize,
        radii: usize,
        phases: usize,
    },

    #[error("Ring {ring} has no pins")]
    EmptyRing { ring: usize },

    #[error("{what} must be positive and finite, got {value}")]
    NonPositive { what: &'static str, value: f64 },

    #[error("Ring {ring} holds {count} pins but at most 100 fit the id scheme")]
    TooManyPins { ring: usize, count: usize },

    #[error("Pins {a} and {b} overlap: centre distance {distance:.4} < {minimum:.4}")]
    Overlap {
        a: usize,
        b: usize,
        distance: f64,
        minimum: f64,
    },

    #[error("Pin {id} breaches the channel wall: reaches r = {reach:.4} > {channel:.4}")]
    OutsideChannel { id: usize, reach: f64, channel: f64 },

    #[error("Packing relation has no real inner radius for r_channel = {channel}, r_element = {element}")]
    NoInnerRadius { channel: f64, element: f64 },
}

/// One ring of pins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    pub count: usize,
    /// Radius of the pin centres (cm).
    pub radius: f64,
    /// Angle of the first pin (rad).
    pub phase: f64,
}

/// A placed pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinPosition {
    /// Exported cell id: `(ring + 1) * 100 + index`.
    pub id: usize,
    pub ring: usize,
    pub index: usize,
    /// Polar angle (rad).
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

/// Radii `(r_inner, r_outer)` of the RBMK two-ring packing.
pub fn rbmk_ring_radii(channel_radius: f64, element_radius: f64) -> Result<(f64, f64), LayoutError> {
    positive("channel radius", channel_radius)?;
    positive("element radius", element_radius)?;

    let r_outer = channel_radius - element_radius;
    positive("outer ring radius", r_outer)?;

    let padding = (PI / 12.0) * r_outer - element_radius;
    let discriminant =
        (element_radius * 2.0 + padding).powi(2) - (element_radius + padding).powi(2);
    if discriminant < 0.0 {
        return Err(LayoutError::NoInnerRadius {
            channel: channel_radius,
            element: element_radius,
        });
    }
    let r_inner = r_outer * (PI / 12.0).cos() - discriminant.sqrt();
    positive("inner ring radius", r_inner)?;

    Ok((r_inner, r_outer))
}

fn positive(what: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::NonPositive { what, value })
    }
}

/// Pins arranged on concentric rings inside a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    pub rings: Vec<Ring>,
    /// Radius of each pin's footprint (cm).
    pub element_radius: f64,
    pub channel_radius: f64,
}

impl RingLayout {
    /// The reference 6 + 12 layout for a channel and element radius.
    pub fn rbmk(channel_radius: f64, element_radius: f64) -> Result<Self, LayoutError> {
        let (r_inner, r_outer) = rbmk_ring_radii(channel_radius, element_radius)?;
        Self::from_lists(
            &RBMK_RING_COUNTS,
            &[r_inner, r_outer],
            &RBMK_RING_PHASES,
            element_radius,
            channel_radius,
        )
    }

    /// Build from parallel lists of counts, radii and phases.
    pub fn from_lists(
        counts: &[usize],
        radii: &[f64],
        phases: &[f64],
        element_radius: f64,
        channel_radius: f64,
    ) -> Result<Self, LayoutError> {
        if counts.len() != radii.len() || counts.len() != phases.len() {
            return Err(LayoutError::MismatchedRings {
                counts: counts.len(),
                radii: radii.len(),
                phases: phases.len(),
            });
        }
        let rings = counts
            .iter()
            .zip(radii)
            .zip(phases)
            .map(|((&count, &radius), &phase)| Ring {
                count,
                radius,
                phase,
            })
            .collect();
        let layout = Self {
            rings,
            element_radius,
            channel_radius,
        };
        layout.validate()?;
        Ok(layout)
    }

    /// Pin centres, ring by ring.
    pub fn positions(&self) -> Vec<PinPosition> {
        let mut out = Vec::with_capacity(self.pin_count());
        for (ring_index, ring) in self.rings.iter().enumerate() {
            let step = 2.0 * PI / ring.count as f64;
            for k in 0..ring.count {
                let angle = k as f64 * step + ring.phase;
                out.push(PinPosition {
                    id: (ring_index + 1) * 100 + k,
                    ring: ring_index,
                    index: k,
                    angle,
                    x: ring.radius * angle.cos(),
                    y: ring.radius * angle.sin(),
                });
            }
        }
        out
    }

    pub fn pin_count(&self) -> usize {
        self.rings.iter().map(|r| r.count).sum()
    }

    /// Smallest centre-to-centre distance between any two pins.
    pub fn min_separation(&self) -> Option<f64> {
        let pins = self.positions();
        let mut best: Option<f64> = None;
        for (i, a) in pins.iter().enumerate() {
            for b in &pins[i + 1..] {
                let d = (a.x - b.x).hypot(a.y - b.y);
                best = Some(best.map_or(d, |m| m.min(d)));
            }
        }
        best
    }

    /// Reject empty rings, non-positive radii, overlapping pins and pins
    /// crossing the channel wall.
    pub fn validate(&self) -> Result<(), LayoutError> {
        positive("element radius", self.element_radius)?;
        positive("channel radius", self.channel_radius)?;
        for (i, ring) in self.rings.iter().enumerate() {
            if ring.count == 0 {
                return Err(LayoutError::EmptyRing { ring: i });
            }
            if ring.count > 100 {
                return Err(LayoutError::TooManyPins {
                    ring: i,
                    count: ring.count,
                });
            }
            positive("ring radius", ring.radius)?;
            if !ring.phase.is_finite() {
                return Err(LayoutError::NonPositive {
                    what: "ring phase (finite)",
                    value: ring.phase,
                });
            }
        }

        // Tangency at the wall is allowed, so compare with a small slack.
        let slack = 1e-9 * self.channel_radius;
        let pins = self.positions();
        for pin in &pins {
            let reach = pin.x.hypot(pin.y) + self.element_radius;
            if reach > self.channel_radius + slack {
                return Err(LayoutError::OutsideChannel {
                    id: pin.id,
                    reach,
                    channel: self.channel_radius,
                });
            }
        }

        let minimum = 2.0 * self.element_radius;
        for (i, a) in pins.iter().enumerate() {
            for b in &pins[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if distance < minimum - slack {
                    return Err(LayoutError::Overlap {
                        a: a.id,
                        b: b.id,
                        distance,
                        minimum,
                    });
                }
            }
        }

        log::debug!(
            "Ring layout: {} pins on {} rings, min separation {:?}",
            pins.len(),
            self.rings.len(),
            self.min_separation()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_radii() {
        let (r_inner, r_outer) = rbmk_ring_radii(4.0, 0.796).unwrap();
        assert_relative_eq!(r_outer, 3.204, epsilon = 1e-12);

        let r_out: f64 = 4.0 - 0.796;
        let padding = (PI / 12.0) * r_out - 0.796;
        let expected = r_out * (PI / 12.0).cos()
            - ((0.796 * 2.0 + padding).powi(2) - (0.796 + padding).powi(2)).sqrt();
        assert_eq!(r_inner, expected);
        assert!(r_inner > 1.6 && r_inner < 1.8, "r_inner = {}", r_inner);
    }

    #[test]
    fn test_pin_ids() {
        let layout = RingLayout::rbmk(4.0, 0.796).unwrap();
        let ids: Vec<usize> = layout.positions().iter().map(|p| p.id).collect();
        let mut expected: Vec<usize> = (100..106).collect();
        expected.extend(200..212);
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_mismatched_lists() {
        let err = RingLayout::from_lists(&[6, 12], &[1.0], &[0.0, 0.0], 0.5, 4.0).unwrap_err();
        assert_eq!(
            err,
            LayoutError::MismatchedRings {
                counts: 2,
                radii: 1,
                phases: 2
            }
        );
    }

    #[test]
    fn test_overlap_rejected() {
        let err = RingLayout::from_lists(&[12], &[1.0], &[0.0], 0.5, 4.0).unwrap_err();
        assert!(matches!(err, LayoutError::Overlap { .. }));
    }

    #[test]
    fn test_wall_breach_rejected() {
        let err = RingLayout::from_lists(&[6], &[3.5], &[0.0], 0.796, 4.0).unwrap_err();
        assert!(matches!(err, LayoutError::OutsideChannel { id: 100, .. }));
    }

    #[test]
    fn test_channel_too_small() {
        assert!(rbmk_ring_radii(0.5, 0.796).is_err());
    }
}

//! Ring layout properties for the reference 6 + 12 bundle.

use std::f64::consts::PI;

use approx::assert_relative_eq;

use rbmk_geometry::layout::{rbmk_ring_radii, RingLayout};

const CHANNEL: f64 = 4.0;
const ELEMENT: f64 = 0.796;

#[test]
fn test_inner_ring_angles() {
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    let inner: Vec<f64> = layout
        .positions()
        .iter()
        .filter(|p| p.ring == 0)
        .map(|p| p.angle)
        .collect();
    assert_eq!(inner.len(), 6);
    for (k, angle) in inner.iter().enumerate() {
        assert_relative_eq!(*angle, k as f64 * PI / 3.0, epsilon = 1e-12);
    }
}

#[test]
fn test_outer_ring_angles_offset_by_fifteen_degrees() {
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    let outer: Vec<f64> = layout
        .positions()
        .iter()
        .filter(|p| p.ring == 1)
        .map(|p| p.angle)
        .collect();
    assert_eq!(outer.len(), 12);
    for (k, angle) in outer.iter().enumerate() {
        assert_relative_eq!(*angle, PI / 12.0 + k as f64 * PI / 6.0, epsilon = 1e-12);
    }
}

#[test]
fn test_coordinates_follow_polar_placement() {
    let (r_inner, r_outer) = rbmk_ring_radii(CHANNEL, ELEMENT).unwrap();
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    for pin in layout.positions() {
        let radius = if pin.ring == 0 { r_inner } else { r_outer };
        assert_relative_eq!(pin.x, radius * pin.angle.cos(), epsilon = 1e-12);
        assert_relative_eq!(pin.y, radius * pin.angle.sin(), epsilon = 1e-12);
        assert_relative_eq!(pin.x.hypot(pin.y), radius, epsilon = 1e-12);
    }
}

#[test]
fn test_consecutive_pins_do_not_overlap() {
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    let pins = layout.positions();
    for ring in 0..2 {
        let on_ring: Vec<_> = pins.iter().filter(|p| p.ring == ring).collect();
        for (i, a) in on_ring.iter().enumerate() {
            let b = on_ring[(i + 1) % on_ring.len()];
            let d = (a.x - b.x).hypot(a.y - b.y);
            assert!(d >= 2.0 * ELEMENT, "ring {} pins {} and {}: {}", ring, a.id, b.id, d);
        }
    }
}

#[test]
fn test_all_pins_separated() {
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    let min = layout.min_separation().unwrap();
    assert!(min >= 2.0 * ELEMENT, "minimum separation {}", min);
}

#[test]
fn test_outer_ring_tangent_to_channel_wall() {
    let layout = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap();
    for pin in layout.positions().iter().filter(|p| p.ring == 1) {
        assert_relative_eq!(pin.x.hypot(pin.y) + ELEMENT, CHANNEL, epsilon = 1e-12);
    }
}

#[test]
fn test_inner_ring_clears_carrier_rod() {
    let (r_inner, _) = rbmk_ring_radii(CHANNEL, ELEMENT).unwrap();
    assert!(r_inner - ELEMENT > 0.7625);
}

#[test]
fn test_layout_is_bit_identical_across_runs() {
    let a = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap().positions();
    let b = RingLayout::rbmk(CHANNEL, ELEMENT).unwrap().positions();
    assert_eq!(a.len(), b.len());
    for (p, q) in a.iter().zip(&b) {
        assert_eq!(p.x.to_bits(), q.x.to_bits());
        assert_eq!(p.y.to_bits(), q.y.to_bits());
        assert_eq!(p.id, q.id);
    }
}

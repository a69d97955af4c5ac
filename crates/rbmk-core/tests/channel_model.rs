//! End-to-end checks on the reference channel model.

use approx::assert_relative_eq;

use rbmk_core::export::{render, write_geometry, write_materials, write_settings};
use rbmk_core::{CaseParams, ChannelModel};

fn reference() -> ChannelModel {
    ChannelModel::build(&CaseParams::default()).unwrap()
}

#[test]
fn test_channel_water_excludes_every_pin() {
    let model = reference();
    let g = model.geometry();
    let channel = g.cell(model.assembly.channel_cell).unwrap();
    let channel_region = channel.region.as_ref().unwrap();
    let e = model.assembly.layout.element_radius;

    for (pin, cell_ref) in model
        .assembly
        .layout
        .positions()
        .iter()
        .zip(&model.assembly.pin_cells)
    {
        let pin_region = g.cell(*cell_ref).unwrap().region.as_ref().unwrap();
        for &(dx, dy) in &[(0.0, 0.0), (0.9 * e, 0.0), (0.0, -0.9 * e), (-0.6 * e, 0.6 * e)] {
            for &z in &[-300.0, 0.0, 250.0] {
                let p = [pin.x + dx, pin.y + dy, z];
                assert!(pin_region.contains(g.surfaces(), &p), "pin {} at {:?}", pin.id, p);
                assert!(
                    !channel_region.contains(g.surfaces(), &p),
                    "channel overlaps pin {} at {:?}",
                    pin.id,
                    p
                );
            }
        }
    }
}

#[test]
fn test_material_lookup_through_universes() {
    let model = reference();
    let g = model.geometry();
    let ids = model.material_ids;
    let inner = model
        .assembly
        .layout
        .positions()
        .into_iter()
        .find(|p| p.id == 100)
        .unwrap();
    assert_relative_eq!(inner.y, 0.0);

    // Fuel above the sleeve, helium inside it.
    assert_eq!(g.material_at(&[inner.x, inner.y, 100.0]), Some(ids.fuel));
    assert_eq!(g.material_at(&[inner.x, inner.y, 0.0]), Some(ids.helium));
    // Clad, then moderator inside the pin footprint.
    assert_eq!(g.material_at(&[inner.x + 0.64, inner.y, 100.0]), Some(ids.zircaloy));
    assert_eq!(g.material_at(&[inner.x + 0.75, inner.y, 100.0]), Some(ids.water));
    // Channel water between the outer pins and the wall.
    assert_eq!(g.material_at(&[3.9, 0.0, 100.0]), Some(ids.water));
    // Carrier rod bore and tube, inside and beyond the fuel span.
    assert_eq!(g.material_at(&[0.0, 0.0, 100.0]), Some(ids.helium));
    assert_eq!(g.material_at(&[0.755, 0.0, 100.0]), Some(ids.carrier_rod));
    assert_eq!(g.material_at(&[0.755, 0.0, 1000.0]), Some(ids.carrier_rod));
    assert_eq!(g.material_at(&[0.0, 0.0, -500.0]), Some(ids.helium));
    // Outside the rod above the fuel span nothing is modelled.
    assert_eq!(g.material_at(&[2.0, 0.0, 1000.0]), None);
}

#[test]
fn test_export_is_byte_identical() {
    let a = reference();
    let b = reference();
    assert_eq!(
        render(|w| write_materials(&a.materials, w)).unwrap(),
        render(|w| write_materials(&b.materials, w)).unwrap()
    );
    assert_eq!(
        render(|w| write_geometry(a.geometry(), w)).unwrap(),
        render(|w| write_geometry(b.geometry(), w)).unwrap()
    );
    assert_eq!(
        render(|w| write_settings(a.settings(), w)).unwrap(),
        render(|w| write_settings(b.settings(), w)).unwrap()
    );
}

#[test]
fn test_geometry_xml_contents() {
    let model = reference();
    let xml = render(|w| write_geometry(model.geometry(), w)).unwrap();

    // 6 pin cells, 2 rod cells, 18 pins + 3 rod placements + channel water.
    assert_eq!(xml.matches("<cell ").count(), 6 + 2 + 22);
    for id in (100..106).chain(200..212) {
        assert!(xml.contains(&format!("<cell id=\"{}\" fill=\"1\"", id)), "pin {}", id);
    }
    assert_eq!(xml.matches("fill=\"1\"").count(), 18);
    assert_eq!(xml.matches("fill=\"2\"").count(), 3);
    assert_eq!(xml.matches("translation=").count(), 18);
    assert!(xml.contains("name=\"2.0% Fuel\""));
    assert!(xml.contains("name=\"2.0% Clad\""));
    assert!(xml.contains("name=\"Channel\""));
    assert!(xml.contains("boundary=\"reflective\""));
    assert!(!xml.contains("boundary=\"transmission\""));
    // The water cell subtracts every pin footprint.
    let channel_line = xml.lines().find(|l| l.contains("name=\"Channel\"")).unwrap();
    assert_eq!(channel_line.matches("~(").count(), 18 + 3);
}

#[test]
fn test_materials_and_settings_xml() {
    let model = reference();
    let materials = render(|w| write_materials(&model.materials, w)).unwrap();
    for nuclide in ["U234", "U235", "U236", "U238", "O16", "H1", "He4", "Zr90", "Nb93"] {
        assert!(materials.contains(&format!("name=\"{}\"", nuclide)), "{}", nuclide);
    }
    assert_eq!(materials.matches("depletable=\"true\"").count(), 1);

    let settings = render(|w| write_settings(model.settings(), w)).unwrap();
    assert!(settings.contains("<space type=\"fission\">"));
}

#[test]
fn test_export_writes_three_files() {
    let model = reference();
    let dir = std::env::temp_dir().join(format!("rbmk-export-{}", std::process::id()));
    let files = model.export(&dir).unwrap();
    for path in files.all() {
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.starts_with("<?xml version='1.0' encoding='utf-8'?>"));
    }
    assert_eq!(
        std::fs::read_to_string(&files.geometry).unwrap(),
        render(|w| write_geometry(model.geometry(), w)).unwrap()
    );
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_enrichment_changes_fuel_name() {
    let params = CaseParams {
        enrichment: 2.4,
        ..Default::default()
    };
    let model = ChannelModel::build(&params).unwrap();
    let materials = render(|w| write_materials(&model.materials, w)).unwrap();
    assert!(materials.contains("name=\"2.4% Fuel\""));
    let geometry = render(|w| write_geometry(model.geometry(), w)).unwrap();
    assert!(geometry.contains("name=\"2.4% Clad\""));
}

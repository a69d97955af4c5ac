//! OpenMC XML input writers.
//!
//! Three documents are produced:
//!
//! | File | Writer |
//! |------|--------|
//! | `materials.xml` | [`write_materials`] |
//! | `geometry.xml` | [`write_geometry`] |
//! | `settings.xml` | [`write_settings`] |
//!
//! Floats are written with Rust's shortest round-trip formatting, ids come
//! from arena order, and nothing depends on hash iteration, so exporting the
//! same model twice gives byte-identical files.

use std::io::Write;
use std::path::{Path, PathBuf};

use rbmk_geometry::{Fill, Geometry, GeometryError};
use rbmk_materials::{MaterialError, Materials};
use thiserror::Error;

use crate::settings::{Settings, SourceSpace};

pub const MATERIALS_FILE: &str = "materials.xml";
pub const GEOMETRY_FILE: &str = "geometry.xml";
pub const SETTINGS_FILE: &str = "settings.xml";

const XML_HEADER: &str = "<?xml version='1.0' encoding='utf-8'?>";

/// Errors while writing engine input files.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] std::io::Error),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Paths of the three exported documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub materials: PathBuf,
    pub geometry: PathBuf,
    pub settings: PathBuf,
}

impl ExportedFiles {
    /// Expected file locations inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            materials: dir.join(MATERIALS_FILE),
            geometry: dir.join(GEOMETRY_FILE),
            settings: dir.join(SETTINGS_FILE),
        }
    }

    pub fn all(&self) -> [&Path; 3] {
        [&self.materials, &self.geometry, &self.settings]
    }
}

/// Escape a string for use inside a double-quoted XML attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Write `materials.xml`, expanding elements into nuclides.
pub fn write_materials<W: Write>(materials: &Materials, out: &mut W) -> Result<(), ExportError> {
    writeln!(out, "{}", XML_HEADER)?;
    writeln!(out, "<materials>")?;
    for (id, material) in materials.iter() {
        let depletable = if material.is_fissionable() {
            " depletable=\"true\""
        } else {
            ""
        };
        writeln!(
            out,
            "  <material{} id=\"{}\" name=\"{}\">",
            depletable,
            id.export_id(),
            escape_attr(material.name())
        )?;
        let density = material.density();
        writeln!(
            out,
            "    <density units=\"{}\" value=\"{}\" />",
            density.unit.as_str(),
            density.value
        )?;
        for nuclide in material.expanded_nuclides()? {
            writeln!(
                out,
                "    <nuclide {}=\"{}\" name=\"{}\" />",
                nuclide.percent.attribute(),
                nuclide.fraction,
                escape_attr(&nuclide.name)
            )?;
        }
        for table in material.sab() {
            writeln!(out, "    <sab name=\"{}\" />", escape_attr(table))?;
        }
        writeln!(out, "  </material>")?;
    }
    writeln!(out, "</materials>")?;
    Ok(())
}

/// Write `geometry.xml`: every cell of every universe, then every surface.
pub fn write_geometry<W: Write>(geometry: &Geometry, out: &mut W) -> Result<(), ExportError> {
    let cell_ids = geometry.cell_ids()?;

    writeln!(out, "{}", XML_HEADER)?;
    writeln!(out, "<geometry>")?;
    for (uid, universe) in geometry.universes() {
        for (index, cell) in universe.cells.iter().enumerate() {
            let mut line = format!("  <cell id=\"{}\"", cell_ids[uid.0][index]);
            match cell.fill {
                Fill::Material(m) => line.push_str(&format!(" material=\"{}\"", m.export_id())),
                Fill::Universe(u) => line.push_str(&format!(" fill=\"{}\"", u.export_id())),
                Fill::Void => line.push_str(" material=\"void\""),
            }
            if let Some(name) = &cell.name {
                line.push_str(&format!(" name=\"{}\"", escape_attr(name)));
            }
            if let Some(region) = &cell.region {
                line.push_str(&format!(" region=\"{}\"", region));
            }
            if let Some(t) = &cell.translation {
                line.push_str(&format!(" translation=\"{}\"", join_floats(&t.as_array())));
            }
            line.push_str(&format!(" universe=\"{}\" />", uid.export_id()));
            writeln!(out, "{}", line)?;
        }
    }
    for (index, surface) in geometry.surfaces().iter().enumerate() {
        let mut line = String::from("  <surface");
        if surface.boundary != rbmk_geometry::BoundaryCondition::Transmission {
            line.push_str(&format!(" boundary=\"{}\"", surface.boundary.as_str()));
        }
        line.push_str(&format!(
            " coeffs=\"{}\" id=\"{}\"",
            join_floats(&surface.coefficients()),
            index + 1
        ));
        if let Some(name) = &surface.name {
            line.push_str(&format!(" name=\"{}\"", escape_attr(name)));
        }
        line.push_str(&format!(" type=\"{}\" />", surface.type_name()));
        writeln!(out, "{}", line)?;
    }
    writeln!(out, "</geometry>")?;
    Ok(())
}

/// Write `settings.xml` for an eigenvalue run.
pub fn write_settings<W: Write>(settings: &Settings, out: &mut W) -> Result<(), ExportError> {
    writeln!(out, "{}", XML_HEADER)?;
    writeln!(out, "<settings>")?;
    writeln!(out, "  <run_mode>eigenvalue</run_mode>")?;
    writeln!(out, "  <particles>{}</particles>", settings.particles)?;
    writeln!(out, "  <batches>{}</batches>", settings.batches)?;
    writeln!(out, "  <inactive>{}</inactive>", settings.inactive)?;
    if let Some(seed) = settings.seed {
        writeln!(out, "  <seed>{}</seed>", seed)?;
    }
    writeln!(out, "  <source strength=\"{}\">", settings.source.strength)?;
    match &settings.source.space {
        SourceSpace::Box {
            lower,
            upper,
            only_fissionable,
        } => {
            let kind = if *only_fissionable { "fission" } else { "box" };
            let mut corners = lower.to_vec();
            corners.extend_from_slice(upper);
            writeln!(out, "    <space type=\"{}\">", kind)?;
            writeln!(out, "      <parameters>{}</parameters>", join_floats(&corners))?;
            writeln!(out, "    </space>")?;
        }
        SourceSpace::Point { xyz } => {
            writeln!(out, "    <space type=\"point\">")?;
            writeln!(out, "      <parameters>{}</parameters>", join_floats(xyz))?;
            writeln!(out, "    </space>")?;
        }
    }
    writeln!(out, "  </source>")?;
    writeln!(out, "</settings>")?;
    Ok(())
}

/// Render one of the writers into a string.
pub fn render<F>(write: F) -> Result<String, ExportError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), ExportError>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_file<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), ExportError>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    std::fs::write(path, buf).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Write all three documents into `dir`, creating it if needed.
pub fn export_all(
    materials: &Materials,
    geometry: &Geometry,
    settings: &Settings,
    dir: &Path,
) -> Result<ExportedFiles, ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let files = ExportedFiles::in_dir(dir);
    write_file(&files.materials, |w| write_materials(materials, w))?;
    write_file(&files.geometry, |w| write_geometry(geometry, w))?;
    write_file(&files.settings, |w| write_settings(settings, w))?;
    Ok(files)
}

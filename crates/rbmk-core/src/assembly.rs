//! Channel assembly: pin cell, carrier rod and circular lattice.
//!
//! ## Layout (cm)
//!
//! ```text
//!   z = +4000 ┬─ carrier top (reflective)
//!             │   rod only
//!   z = +364  ┼─ fuel span top (reflective)
//!             │   channel water, 18 pins, rod
//!   z = -364  ┼─ fuel span bottom (reflective)
//!             │   rod only
//!   z = -600  ┴─ carrier bottom (reflective)
//! ```
//!
//! Each pin is a translated instance of the pin universe bounded by a
//! footprint cylinder of the element radius. The channel water cell is the
//! channel cylinder with every pin and rod region subtracted, so the root
//! universe has no overlaps by construction.

use rbmk_geometry::layout::{LayoutError, RingLayout};
use rbmk_geometry::{
    BoundaryCondition, Cell, CellRef, Geometry, GeometryError, Region, Surface, SurfaceId,
    Translation, UniverseId,
};
use rbmk_materials::catalog::StandardIds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors in assembly parameters or construction.
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("Pin radii must increase strictly: fuel {fuel} < void {void} < clad inner {clad_inner} < clad outer {clad_outer}")]
    PinRadiiOrder {
        fuel: f64,
        void: f64,
        clad_inner: f64,
        clad_outer: f64,
    },

    #[error("Clad outer radius {clad_outer} exceeds the element footprint radius {element}")]
    CladOutsideFootprint { clad_outer: f64, element: f64 },

    #[error("Carrier rod radii must satisfy 0 < inner {inner} < outer {outer}")]
    RodRadiiOrder { inner: f64, outer: f64 },

    #[error("Carrier rod (r = {rod}) collides with the inner pin ring (closest reach {reach})")]
    RodCollision { rod: f64, reach: f64 },

    #[error("Axial planes out of order: carrier [{carrier_min}, {carrier_max}], fuel span ±{half_height}, sleeve ±{sleeve}")]
    AxialOrder {
        carrier_min: f64,
        carrier_max: f64,
        half_height: f64,
        sleeve: f64,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Radial and axial dimensions of one fuel pin (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinParams {
    pub fuel_radius: f64,
    pub void_radius: f64,
    pub clad_inner_radius: f64,
    pub clad_outer_radius: f64,
    /// Half-height of the helium sleeve between the two fuel sub-assemblies.
    pub sleeve_half_height: f64,
}

impl Default for PinParams {
    fn default() -> Self {
        Self {
            fuel_radius: 0.55,
            void_radius: 0.566,
            clad_inner_radius: 0.596,
            clad_outer_radius: 0.68,
            sleeve_half_height: 12.0,
        }
    }
}

/// Carrier rod tube radii (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RodParams {
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Default for RodParams {
    fn default() -> Self {
        Self {
            inner_radius: 0.75,
            outer_radius: 0.7625,
        }
    }
}

/// Channel and axial extents (cm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelParams {
    pub radius: f64,
    /// Footprint radius reserved for each pin.
    pub element_radius: f64,
    /// Half-height of the fuel span.
    pub element_half_height: f64,
    pub carrier_min_z: f64,
    pub carrier_max_z: f64,
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self {
            radius: 4.0,
            element_radius: 0.796,
            element_half_height: 364.0,
            carrier_min_z: -600.0,
            carrier_max_z: 4000.0,
        }
    }
}

/// All geometric parameters of the channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyParams {
    pub pin: PinParams,
    pub rod: RodParams,
    pub channel: ChannelParams,
}

impl AssemblyParams {
    /// Check radial and axial ordering; the ring layout is checked when
    /// it is built.
    pub fn validate(&self) -> Result<(), AssemblyError> {
        let p = &self.pin;
        let increasing = 0.0 < p.fuel_radius
            && p.fuel_radius < p.void_radius
            && p.void_radius < p.clad_inner_radius
            && p.clad_inner_radius < p.clad_outer_radius;
        if !increasing {
            return Err(AssemblyError::PinRadiiOrder {
                fuel: p.fuel_radius,
                void: p.void_radius,
                clad_inner: p.clad_inner_radius,
                clad_outer: p.clad_outer_radius,
            });
        }
        if p.clad_outer_radius > self.channel.element_radius {
            return Err(AssemblyError::CladOutsideFootprint {
                clad_outer: p.clad_outer_radius,
                element: self.channel.element_radius,
            });
        }

        let r = &self.rod;
        if !(0.0 < r.inner_radius && r.inner_radius < r.outer_radius) {
            return Err(AssemblyError::RodRadiiOrder {
                inner: r.inner_radius,
                outer: r.outer_radius,
            });
        }

        let c = &self.channel;
        let axial_ok = c.carrier_min_z < -c.element_half_height
            && 0.0 < p.sleeve_half_height
            && p.sleeve_half_height < c.element_half_height
            && c.element_half_height < c.carrier_max_z;
        if !axial_ok {
            return Err(AssemblyError::AxialOrder {
                carrier_min: c.carrier_min_z,
                carrier_max: c.carrier_max_z,
                half_height: c.element_half_height,
                sleeve: p.sleeve_half_height,
            });
        }
        Ok(())
    }
}

/// The assembled channel geometry and handles to its parts.
#[derive(Debug, Clone)]
pub struct ChannelAssembly {
    pub geometry: Geometry,
    pub layout: RingLayout,
    pub pin_universe: UniverseId,
    pub rod_universe: UniverseId,
    pub lattice: UniverseId,
    pub pin_cells: Vec<CellRef>,
    /// Rod placements above, within and below the fuel span.
    pub rod_cells: [CellRef; 3],
    pub channel_cell: CellRef,
    /// The modelled fuel-span volume: inside the channel, between the
    /// fuel span planes.
    pub fuel_span: Region,
}

/// Build the pin universe: fuel, void, gap, clad, sleeve and moderator.
///
/// The sleeve replaces the fuel, void, gap and clad layers over its axial
/// extent; those layers exclude the sleeve region so the universe stays a
/// partition of space.
pub fn build_pin_universe(
    geometry: &mut Geometry,
    pin: &PinParams,
    ids: &StandardIds,
    fuel_name: &str,
) -> Result<UniverseId, GeometryError> {
    let cylinder = |r: f64, name: &str| Surface::z_cylinder(0.0, 0.0, r).with_name(name);
    let fuel = geometry.add_surface(cylinder(pin.fuel_radius, "fuel pellet"));
    let void = geometry.add_surface(cylinder(pin.void_radius, "void outer"));
    let clad_in = geometry.add_surface(cylinder(pin.clad_inner_radius, "clad inner"));
    let clad_out = geometry.add_surface(cylinder(pin.clad_outer_radius, "clad outer"));
    let sleeve_min =
        geometry.add_surface(Surface::z_plane(-pin.sleeve_half_height).with_name("sleeve bottom"));
    let sleeve_max =
        geometry.add_surface(Surface::z_plane(pin.sleeve_half_height).with_name("sleeve top"));

    let universe = geometry.add_universe(format!("{} Pin", fuel_name));
    let sleeve = -clad_out & sleeve_min.positive() & -sleeve_max;
    let clad_label = fuel_name.replace("Fuel", "Clad");

    let cells = [
        Cell::material(ids.fuel)
            .named(fuel_name)
            .with_region(-fuel & !sleeve.clone()),
        Cell::material(ids.helium)
            .named("Void")
            .with_region(fuel.positive() & -void & !sleeve.clone()),
        Cell::material(ids.helium)
            .named("Gap")
            .with_region(void.positive() & -clad_in & !sleeve.clone()),
        Cell::material(ids.zircaloy)
            .named(clad_label)
            .with_region(clad_in.positive() & -clad_out & !sleeve.clone()),
        Cell::material(ids.helium).named("Sleeve").with_region(sleeve),
        Cell::material(ids.water)
            .named("Moderator")
            .with_region(clad_out.positive()),
    ];
    for cell in cells {
        geometry.add_cell(universe, cell)?;
    }

    log::debug!("Pin universe {:?} built", universe);
    Ok(universe)
}

/// Build the carrier rod universe: helium bore inside a Zr-Nb tube.
///
/// Returns the universe and the rod outer surface, which the lattice reuses
/// to bound the channel water.
pub fn build_rod_universe(
    geometry: &mut Geometry,
    rod: &RodParams,
    ids: &StandardIds,
) -> Result<(UniverseId, SurfaceId), GeometryError> {
    let inner =
        geometry.add_surface(Surface::z_cylinder(0.0, 0.0, rod.inner_radius).with_name("rod inner"));
    let outer =
        geometry.add_surface(Surface::z_cylinder(0.0, 0.0, rod.outer_radius).with_name("rod outer"));

    let universe = geometry.add_universe("Carrier Rod");
    geometry.add_cell(
        universe,
        Cell::material(ids.helium)
            .named("Inner Rod")
            .with_region(-inner),
    )?;
    geometry.add_cell(
        universe,
        Cell::material(ids.carrier_rod)
            .named("Outer Rod")
            .with_region(inner.positive() & -outer),
    )?;
    Ok((universe, outer))
}

/// Assemble the full channel and set the lattice as root universe.
pub fn build_channel(
    params: &AssemblyParams,
    ids: &StandardIds,
    fuel_name: &str,
) -> Result<ChannelAssembly, AssemblyError> {
    params.validate()?;
    let c = &params.channel;

    let layout = RingLayout::rbmk(c.radius, c.element_radius)?;
    let innermost_reach = layout
        .rings
        .iter()
        .map(|r| r.radius - c.element_radius)
        .fold(f64::INFINITY, f64::min);
    if innermost_reach <= params.rod.outer_radius {
        return Err(AssemblyError::RodCollision {
            rod: params.rod.outer_radius,
            reach: innermost_reach,
        });
    }

    let mut geometry = Geometry::new();
    let pin_universe = build_pin_universe(&mut geometry, &params.pin, ids, fuel_name)?;
    let (rod_universe, rod_outer) = build_rod_universe(&mut geometry, &params.rod, ids)?;

    let reflective = BoundaryCondition::Reflective;
    let element_min = geometry.add_surface(
        Surface::z_plane(-c.element_half_height)
            .with_boundary(reflective)
            .with_name("fuel span bottom"),
    );
    let element_max = geometry.add_surface(
        Surface::z_plane(c.element_half_height)
            .with_boundary(reflective)
            .with_name("fuel span top"),
    );
    let carrier_min = geometry.add_surface(
        Surface::z_plane(c.carrier_min_z)
            .with_boundary(reflective)
            .with_name("carrier bottom"),
    );
    let carrier_max = geometry.add_surface(
        Surface::z_plane(c.carrier_max_z)
            .with_boundary(reflective)
            .with_name("carrier top"),
    );
    let channel = geometry.add_surface(
        Surface::z_cylinder(0.0, 0.0, c.radius)
            .with_boundary(reflective)
            .with_name("channel"),
    );

    let lattice = geometry.add_universe("Circular Lattice");
    let span = element_min.positive() & -element_max;
    let mut channel_region = -channel & rod_outer.positive() & span.clone();

    let mut pin_cells = Vec::with_capacity(layout.pin_count());
    for pin in layout.positions() {
        let boundary = geometry.add_surface(Surface::z_cylinder(pin.x, pin.y, c.element_radius));
        let region = -boundary & span.clone();
        channel_region &= !region.clone();
        let cell = Cell::universe(pin_universe)
            .with_id(pin.id)
            .with_region(region)
            .translated(Translation::new(pin.x, pin.y, 0.0));
        pin_cells.push(geometry.add_cell(lattice, cell)?);
    }

    let rod_bound = geometry.add_surface(
        Surface::z_cylinder(0.0, 0.0, params.rod.outer_radius)
            .with_boundary(reflective)
            .with_name("rod bound"),
    );
    let rod_regions = [
        ("Rod Above", -rod_bound & -carrier_max & element_max.positive()),
        ("Rod Middle", -rod_outer & span.clone()),
        ("Rod Below", -rod_bound & -element_min & carrier_min.positive()),
    ];
    let mut rod_refs = Vec::with_capacity(3);
    for (name, region) in rod_regions {
        channel_region &= !region.clone();
        rod_refs.push(geometry.add_cell(
            lattice,
            Cell::universe(rod_universe).named(name).with_region(region),
        )?);
    }
    let rod_cells = [rod_refs[0], rod_refs[1], rod_refs[2]];

    let channel_cell = geometry.add_cell(
        lattice,
        Cell::material(ids.water)
            .named("Channel")
            .with_region(channel_region),
    )?;
    geometry.set_root(lattice)?;

    log::info!(
        "Channel assembled: {} pins, {} surfaces",
        pin_cells.len(),
        geometry.surfaces().len()
    );

    Ok(ChannelAssembly {
        fuel_span: -channel & span,
        geometry,
        layout,
        pin_universe,
        rod_universe,
        lattice,
        pin_cells,
        rod_cells,
        channel_cell,
    })
}

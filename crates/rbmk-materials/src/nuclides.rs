//! Natural isotopic abundances and uranium enrichment.
//!
//! Abundances are IUPAC representative isotopic compositions (atom fraction);
//! masses are atomic masses in unified atomic mass units from the AME2016
//! evaluation. Only the elements used by channel models are tabulated.
//!
//! | Element | Isotopes |
//! |---------|----------|
//! | H  | H1, H2 |
//! | He | He3, He4 |
//! | B  | B10, B11 |
//! | O  | O16, O17, O18 |
//! | Zr | Zr90, Zr91, Zr92, Zr94, Zr96 |
//! | Nb | Nb93 |
//! | Er | Er162, Er164, Er166, Er167, Er168, Er170 |
//! | U  | U234, U235, U238 (U236 only via enrichment) |

use crate::material::MaterialError;

/// One naturally occurring isotope of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Isotope {
    /// Nuclide name as used by the nuclear data library (e.g. `"Zr90"`).
    pub name: &'static str,
    /// Natural abundance (atom fraction).
    pub abundance: f64,
    /// Atomic mass (u).
    pub mass: f64,
}

const fn iso(name: &'static str, abundance: f64, mass: f64) -> Isotope {
    Isotope {
        name,
        abundance,
        mass,
    }
}

const HYDROGEN: &[Isotope] = &[
    iso("H1", 0.999885, 1.00782503223),
    iso("H2", 0.000115, 2.01410177812),
];

const HELIUM: &[Isotope] = &[
    iso("He3", 1.34e-6, 3.0160293201),
    iso("He4", 0.99999866, 4.00260325413),
];

const BORON: &[Isotope] = &[
    iso("B10", 0.199, 10.01293695),
    iso("B11", 0.801, 11.00930536),
];

const OXYGEN: &[Isotope] = &[
    iso("O16", 0.99757, 15.99491461957),
    iso("O17", 0.00038, 16.9991317565),
    iso("O18", 0.00205, 17.99915961286),
];

const ZIRCONIUM: &[Isotope] = &[
    iso("Zr90", 0.5145, 89.9046977),
    iso("Zr91", 0.1122, 90.9056396),
    iso("Zr92", 0.1715, 91.9050347),
    iso("Zr94", 0.1738, 93.9063108),
    iso("Zr96", 0.0280, 95.9082714),
];

const NIOBIUM: &[Isotope] = &[iso("Nb93", 1.0, 92.906373)];

const ERBIUM: &[Isotope] = &[
    iso("Er162", 0.00139, 161.9287884),
    iso("Er164", 0.01601, 163.9292088),
    iso("Er166", 0.33503, 165.9302995),
    iso("Er167", 0.22869, 166.9320546),
    iso("Er168", 0.26978, 167.9323767),
    iso("Er170", 0.14910, 169.9354702),
];

const URANIUM: &[Isotope] = &[
    iso("U234", 0.000054, 234.0409523),
    iso("U235", 0.007204, 235.0439301),
    iso("U238", 0.992742, 238.0507884),
];

const U236_MASS: f64 = 236.0455682;

/// Upper enrichment bound (wt%) at which the U238 share of the
/// enrichment correlation reaches zero.
pub const MAX_URANIUM_ENRICHMENT: f64 = 100.0 / 1.0135;

/// Natural isotopes of an element, or `None` if the symbol is not tabulated.
pub fn natural_isotopes(symbol: &str) -> Option<&'static [Isotope]> {
    match symbol {
        "H" => Some(HYDROGEN),
        "He" => Some(HELIUM),
        "B" => Some(BORON),
        "O" => Some(OXYGEN),
        "Zr" => Some(ZIRCONIUM),
        "Nb" => Some(NIOBIUM),
        "Er" => Some(ERBIUM),
        "U" => Some(URANIUM),
        _ => None,
    }
}

/// Symbols of every tabulated element, in table order.
pub fn known_elements() -> &'static [&'static str] {
    &["H", "He", "B", "O", "Zr", "Nb", "Er", "U"]
}

/// Atomic mass of a tabulated nuclide (u).
pub fn atomic_mass(nuclide: &str) -> Option<f64> {
    if nuclide == "U236" {
        return Some(U236_MASS);
    }
    known_elements()
        .iter()
        .filter_map(|symbol| natural_isotopes(symbol))
        .flat_map(|isotopes| isotopes.iter())
        .find(|isotope| isotope.name == nuclide)
        .map(|isotope| isotope.mass)
}

/// Isotopic atom fractions of uranium enriched to `enrichment` wt% U235.
///
/// Minor isotopes follow the usual correlation with U235 content
/// (mass fractions U234 = 0.0089·e, U236 = 0.0046·e, U238 = 100 − 1.0135·e),
/// converted to atom fractions and normalised to unity.
pub fn enriched_uranium(enrichment: f64) -> Result<Vec<(&'static str, f64)>, MaterialError> {
    if !(enrichment > 0.0 && enrichment <= MAX_URANIUM_ENRICHMENT) {
        return Err(MaterialError::InvalidEnrichment {
            element: "U".into(),
            enrichment,
        });
    }

    let mass_fractions = [
        ("U234", 0.0089 * enrichment, URANIUM[0].mass),
        ("U235", enrichment, URANIUM[1].mass),
        ("U236", 0.0046 * enrichment, U236_MASS),
        ("U238", 100.0 - 1.0135 * enrichment, URANIUM[2].mass),
    ];

    let moles: Vec<(&'static str, f64)> = mass_fractions
        .iter()
        .map(|&(name, wt, mass)| (name, wt / mass))
        .collect();
    let total: f64 = moles.iter().map(|(_, n)| n).sum();

    Ok(moles
        .into_iter()
        .filter(|(_, n)| *n > 0.0)
        .map(|(name, n)| (name, n / total))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_natural_abundances_sum_to_one() {
        for symbol in known_elements() {
            let isotopes = natural_isotopes(symbol).unwrap();
            let total: f64 = isotopes.iter().map(|i| i.abundance).sum();
            assert_relative_eq!(total, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_unknown_element() {
        assert!(natural_isotopes("Xx").is_none());
        assert!(atomic_mass("Xx1").is_none());
    }

    #[test]
    fn test_enriched_uranium_weight_fraction() {
        let fractions = enriched_uranium(2.0).unwrap();
        assert_eq!(fractions.len(), 4);

        let total: f64 = fractions.iter().map(|(_, f)| f).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);

        // Convert back to weight fractions and recover the enrichment.
        let mass_total: f64 = fractions
            .iter()
            .map(|(n, f)| f * atomic_mass(n).unwrap())
            .sum();
        let (_, u235) = fractions.iter().find(|(n, _)| *n == "U235").unwrap();
        let wt = u235 * atomic_mass("U235").unwrap() / mass_total;
        assert_relative_eq!(wt, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_enrichment_out_of_range() {
        assert!(enriched_uranium(0.0).is_err());
        assert!(enriched_uranium(-1.0).is_err());
        assert!(enriched_uranium(99.0).is_err());
        assert!(enriched_uranium(f64::NAN).is_err());
    }
}

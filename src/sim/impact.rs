//! Impact physics calculator
//!
//! Illustrative formulas only: a homogeneous sphere, kinetic energy in
//! megatons of TNT and a quarter-power crater scaling law. The constants are
//! game balance values and are kept as-is.

use serde::{Deserialize, Serialize};

/// Joules per megaton of TNT (as used by the explorer; 4.184e15 in reality)
pub const TNT_EQUIVALENT: f64 = 4.184e9;

/// Crater scaling exponent applied to effective energy
pub const CRATER_EXPONENT: f64 = 0.25;
/// Crater scaling factor (km)
pub const CRATER_FACTOR: f64 = 1.2;

/// Input widget ranges
pub const DIAMETER_RANGE: (f64, f64) = (50.0, 10_000.0);
pub const VELOCITY_RANGE: (f64, f64) = (5.0, 70.0);
pub const ANGLE_RANGE: (f64, f64) = (0.0, 90.0);

/// Asteroid composition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Material {
    Iron,
    #[default]
    Rock,
    Ice,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Rock, Material::Iron, Material::Ice];

    /// Bulk density in kg/m³
    pub fn density(&self) -> f64 {
        match self {
            Material::Iron => 7800.0,
            Material::Rock => 3000.0,
            Material::Ice => 900.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Iron => "Iron",
            Material::Rock => "Rock",
            Material::Ice => "Ice",
        }
    }

    /// Parse a material name; anything unrecognized is treated as Rock
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "iron" => Material::Iron,
            "rock" => Material::Rock,
            "ice" => Material::Ice,
            other => {
                log::debug!("Unknown material {:?}, using Rock", other);
                Material::Rock
            }
        }
    }
}

/// Where the asteroid strikes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Land,
    Ocean,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Land => "Land",
            Location::Ocean => "Ocean",
        }
    }

    /// Parse a location name; anything unrecognized is treated as Land
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "ocean" => Location::Ocean,
            "land" => Location::Land,
            other => {
                log::debug!("Unknown location {:?}, using Land", other);
                Location::Land
            }
        }
    }
}

/// Parameters for one explorer run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactParameters {
    /// Diameter in meters
    pub diameter: f64,
    /// Entry velocity in km/s
    pub velocity: f64,
    /// Impact angle in degrees from the horizontal
    pub angle: f64,
    pub material: Material,
    pub location: Location,
}

impl Default for ImpactParameters {
    fn default() -> Self {
        Self {
            diameter: 500.0,
            velocity: 25.0,
            angle: 45.0,
            material: Material::Rock,
            location: Location::Land,
        }
    }
}

impl ImpactParameters {
    /// Clamp to the ranges the input panel allows
    pub fn clamped(self) -> Self {
        Self {
            diameter: self.diameter.clamp(DIAMETER_RANGE.0, DIAMETER_RANGE.1),
            velocity: self.velocity.clamp(VELOCITY_RANGE.0, VELOCITY_RANGE.1),
            angle: self.angle.clamp(ANGLE_RANGE.0, ANGLE_RANGE.1),
            ..self
        }
    }
}

/// Mass of a homogeneous sphere (kg)
pub fn mass(diameter: f64, material: Material) -> f64 {
    let radius = diameter / 2.0;
    let volume = 4.0 / 3.0 * std::f64::consts::PI * radius.powi(3);
    volume * material.density()
}

/// Kinetic energy in megatons of TNT
pub fn energy_megatons(diameter: f64, velocity_km_s: f64, material: Material) -> f64 {
    let velocity_m_s = velocity_km_s * 1000.0;
    0.5 * mass(diameter, material) * velocity_m_s * velocity_m_s / TNT_EQUIVALENT
}

/// Crater diameter (km) and effective energy (Mt)
///
/// Effective energy scales with the sine of the impact angle. Ocean impacts
/// leave no crater.
pub fn crater(
    diameter: f64,
    velocity_km_s: f64,
    angle: f64,
    material: Material,
    location: Location,
) -> (f64, f64) {
    let energy = energy_megatons(diameter, velocity_km_s, material);
    let effective_energy = energy * angle.to_radians().sin();
    let crater_km = match location {
        Location::Land => effective_energy.max(0.0).powf(CRATER_EXPONENT) * CRATER_FACTOR,
        Location::Ocean => 0.0,
    };
    (crater_km, effective_energy)
}

/// Qualitative consequence of an impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Risk {
    GlobalClimate,
    FiresAndShockwaves,
    Tsunami,
    ShallowImpact,
    HighAngle,
    Localized,
}

impl Risk {
    pub fn title(&self) -> &'static str {
        match self {
            Risk::GlobalClimate => "Potential global climate impact",
            Risk::FiresAndShockwaves => "Massive fires & regional shockwaves",
            Risk::Tsunami => "Tsunami risk",
            Risk::ShallowImpact => "Shallow impact",
            Risk::HighAngle => "High-angle",
            Risk::Localized => "Localized impact",
        }
    }

    /// Full text shown in the risks panel
    pub fn description(&self) -> &'static str {
        match self {
            Risk::GlobalClimate => {
                "Potential global climate impact - The impact could throw dust and smoke into the sky, blocking sunlight for months. This might cause food shortages and big changes to the world’s climate."
            }
            Risk::FiresAndShockwaves => {
                "Massive fires & regional shockwaves - The heat and force from the strike could set huge areas on fire. Strong shockwaves could knock down buildings and flatten forests."
            }
            Risk::Tsunami => {
                "Tsunami risk - If it lands in the sea, giant waves could form and travel far. These tsunamis could flood coastal cities and cause massive destruction."
            }
            Risk::ShallowImpact => {
                "Shallow impact - A low-angle hit would scatter rock and debris across the land. This could damage towns nearby and fill the air with dust."
            }
            Risk::HighAngle => {
                "High-angle - A steep impact would shake the ground like a huge earthquake. Buildings and roads could be destroyed even far from the strike."
            }
            Risk::Localized => {
                "Localized impact - The asteroid would cause only small, local effects. Most of the world would not be affected."
            }
        }
    }
}

/// Assess risks in display order. Never empty.
pub fn risks(
    diameter: f64,
    velocity_km_s: f64,
    angle: f64,
    material: Material,
    location: Location,
) -> Vec<Risk> {
    let energy = energy_megatons(diameter, velocity_km_s, material);
    let mut found = Vec::new();

    if energy > 5000.0 {
        found.push(Risk::GlobalClimate);
    }
    if energy > 1000.0 {
        found.push(Risk::FiresAndShockwaves);
    }
    if location == Location::Ocean && diameter > 100.0 {
        found.push(Risk::Tsunami);
    }
    if location == Location::Land {
        if angle < 20.0 {
            found.push(Risk::ShallowImpact);
        }
        if angle > 70.0 && energy > 50.0 {
            found.push(Risk::HighAngle);
        }
    }

    if found.is_empty() {
        found.push(Risk::Localized);
    }
    found
}

/// Everything the results panel shows for one Apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    /// kg
    pub mass: f64,
    /// Mt TNT
    pub energy: f64,
    /// Mt TNT, scaled by impact angle
    pub effective_energy: f64,
    /// km, zero for ocean impacts
    pub crater_diameter: f64,
    pub location: Location,
    pub risks: Vec<Risk>,
}

impl ImpactResult {
    pub fn compute(params: &ImpactParameters) -> Self {
        let ImpactParameters {
            diameter,
            velocity,
            angle,
            material,
            location,
        } = *params;

        let (crater_diameter, effective_energy) =
            crater(diameter, velocity, angle, material, location);

        Self {
            mass: mass(diameter, material),
            energy: energy_megatons(diameter, velocity, material),
            effective_energy,
            crater_diameter,
            location,
            risks: risks(diameter, velocity, angle, material, location),
        }
    }

    /// Label and value for the impact result box
    pub fn headline(&self) -> (&'static str, String) {
        match self.location {
            Location::Land => (
                "Crater Diameter",
                format!("{:.2} km", self.crater_diameter),
            ),
            Location::Ocean => ("Tsunami Risk", "HIGH".to_string()),
        }
    }

    /// Energy as shown in the energy box, e.g. "1,234.56 Mt"
    pub fn energy_label(&self) -> String {
        format!("{} Mt", format_thousands(self.effective_energy, 2))
    }
}

/// Format with comma thousands separators and fixed decimals
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

//! Spread Factor Model
//!
//! Maps terrain classification codes and weather to dimensionless spread
//! multipliers. The engine combines them multiplicatively into a rate of
//! spread (ROS) score and converts distance to travel time with it.
//!
//! # Code Tables
//!
//! Forest-type (fuel class) codes from the national forest type map:
//! - Code 1: Coniferous forest
//! - Code 2: Broadleaf forest
//! - Code 3: Mixed forest
//! - Code 4: Bamboo
//!
//! Soil topographic groups and soil drainage codes follow the national soil
//! survey. Water bodies, urban land and similar covers are non-combustible.
//!
//! Every function here is pure: identical inputs give bit-identical outputs.

use crate::core_types::units::{Degrees, Kilometers, MetersPerSecond, Percent, Seconds};

/// Nominal spacing of the survey grid; jumps are measured in these units
pub const ONE_GRID_UNIT_KM: f64 = 1.2;

/// Burn duration per point of fuel score
pub const BURNOUT_SECONDS_PER_FUEL: f64 = 1200.0;

/// Forest type derived from the fuel class code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForestType {
    /// Coniferous forest (pine, larch): resinous, highest fuel load
    Conifer,
    /// Mixed conifer and broadleaf
    Mixed,
    /// Broadleaf forest
    Broadleaf,
    /// Bamboo stands
    Bamboo,
}

impl ForestType {
    /// Parse a fuel class code; unknown codes map to `None`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::Conifer),
            "2" => Some(Self::Broadleaf),
            "3" => Some(Self::Mixed),
            "4" => Some(Self::Bamboo),
            _ => None,
        }
    }

    /// Fuel score of this forest type (higher burns faster and longer)
    pub const fn fuel_score(self) -> f64 {
        match self {
            Self::Conifer => 5.0,
            Self::Mixed => 4.0,
            Self::Broadleaf => 3.0,
            Self::Bamboo => 2.0,
        }
    }
}

/// Terrain class derived from the soil topographic group code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainClass {
    /// Mountain and hill slopes where fire runs upslope
    Uphill,
    /// Foot slopes and fans where spread is penalized
    Downhill,
    /// Flat alluvial plain
    Flat,
    /// Unmapped group
    Neutral,
}

impl TerrainClass {
    /// Classify a slope group code (absent codes are neutral)
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("01" | "02" | "03" | "08" | "12") => Self::Uphill,
            Some("04" | "05" | "06" | "07" | "11") => Self::Downhill,
            Some("10") => Self::Flat,
            _ => Self::Neutral,
        }
    }

    /// Spread multiplier for this class
    pub const fn factor(self) -> f64 {
        match self {
            Self::Uphill => 1.5,
            Self::Downhill => 0.8,
            Self::Flat => 0.5,
            Self::Neutral => 1.0,
        }
    }
}

/// Soil drainage class derived from the soil drainage code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoilDrainage {
    /// Dry, well-drained soils
    WellDrained,
    /// Wet, poorly-drained soils
    PoorlyDrained,
    /// Water, urban and other land covers that cannot burn
    NonCombustible,
    /// Absent or unmapped code
    Unclassified,
}

impl SoilDrainage {
    /// Classify a soil drainage code
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some(
                "01" | "02" | "05" | "06" | "07" | "08" | "09" | "10" | "11" | "13" | "14" | "15"
                | "16" | "17" | "18" | "19" | "23" | "24",
            ) => Self::WellDrained,
            Some("03" | "12" | "20") => Self::PoorlyDrained,
            Some("82" | "91" | "92" | "93" | "94" | "95" | "97" | "99" | "27" | "28" | "29") => {
                Self::NonCombustible
            }
            _ => Self::Unclassified,
        }
    }
}

/// Fuel score for a fuel class code
///
/// Zero means non-flammable: fire never spreads into such a point.
pub fn fuel_score(fuel_class: Option<&str>) -> f64 {
    fuel_class
        .and_then(ForestType::from_code)
        .map_or(0.0, ForestType::fuel_score)
}

/// Slope multiplier for a soil topographic group code
pub fn slope_factor(slope_code: Option<&str>) -> f64 {
    TerrainClass::from_code(slope_code).factor()
}

/// Base dryness multiplier from relative humidity alone
fn humidity_band_factor(humidity: Percent) -> f64 {
    let h = *humidity;
    if h < 35.0 {
        1.5
    } else if h < 50.0 {
        1.2
    } else if h > 80.0 {
        0.4
    } else if h > 70.0 {
        0.6
    } else {
        1.0
    }
}

/// Dryness multiplier from soil drainage and humidity
///
/// Non-combustible land cover yields exactly zero regardless of humidity.
pub fn moisture_factor(soil_code: Option<&str>, humidity: Percent) -> f64 {
    let base = humidity_band_factor(humidity);
    match SoilDrainage::from_code(soil_code) {
        SoilDrainage::WellDrained => base * 1.2,
        SoilDrainage::PoorlyDrained => base * 0.8,
        SoilDrainage::NonCombustible => 0.0,
        SoilDrainage::Unclassified => base,
    }
}

/// Wind multiplier for spread along `bearing`
///
/// The wind direction is compared with the spread bearing as given; a
/// difference under 45° counts as wind-aligned spread.
pub fn wind_factor(wind_speed: MetersPerSecond, wind_direction: Degrees, bearing: Degrees) -> f64 {
    let angle_diff = *wind_direction.angular_difference(bearing);
    let factor = if angle_diff < 45.0 {
        1.0 + *wind_speed / 4.0
    } else if angle_diff < 90.0 {
        1.0 + *wind_speed / 8.0
    } else {
        1.0
    };
    factor.max(0.5)
}

/// How long a point burns once ignited
///
/// # Arguments
/// * `fuel_score` - Fuel score of the burning point
/// * `humidity` - Relative humidity of the run
/// * `jump` - Distance from the igniting predecessor (zero for the origin)
///
/// Embers that crossed two or more grid units burn out faster, by a factor
/// of `jump_units - 1`.
pub fn burnout_duration(fuel_score: f64, humidity: Percent, jump: Kilometers) -> Seconds {
    let mut duration = fuel_score * BURNOUT_SECONDS_PER_FUEL;

    if *humidity > 80.0 {
        duration *= 0.5;
    } else if *humidity > 70.0 {
        duration *= 0.7;
    }

    let jump_units = *jump / ONE_GRID_UNIT_KM;
    if jump_units >= 2.0 {
        duration /= (jump_units - 1.0).max(1.0);
    }

    Seconds::new(duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fuel_score_table() {
        assert_eq!(fuel_score(Some("1")), 5.0);
        assert_eq!(fuel_score(Some("3")), 4.0);
        assert_eq!(fuel_score(Some("2")), 3.0);
        assert_eq!(fuel_score(Some("4")), 2.0);
        assert_eq!(fuel_score(Some("9")), 0.0);
        assert_eq!(fuel_score(None), 0.0);
    }

    #[test]
    fn test_slope_groups() {
        for code in ["01", "02", "03", "08", "12"] {
            assert_eq!(slope_factor(Some(code)), 1.5, "uphill code {code}");
        }
        for code in ["04", "05", "06", "07", "11"] {
            assert_eq!(slope_factor(Some(code)), 0.8, "downhill code {code}");
        }
        assert_eq!(slope_factor(Some("10")), 0.5);
        assert_eq!(slope_factor(Some("09")), 1.0);
        assert_eq!(slope_factor(None), 1.0);
    }

    #[test]
    fn test_humidity_bands() {
        let cases = [
            (20.0, 1.5),
            (35.0, 1.2),
            (49.9, 1.2),
            (50.0, 1.0),
            (70.0, 1.0),
            (75.0, 0.6),
            (80.0, 0.6),
            (85.0, 0.4),
        ];
        for (humidity, expected) in cases {
            assert_eq!(
                moisture_factor(None, Percent::new(humidity)),
                expected,
                "humidity {humidity}"
            );
        }
    }

    #[test]
    fn test_soil_drainage_scaling() {
        let humidity = Percent::new(30.0);
        assert_relative_eq!(moisture_factor(Some("01"), humidity), 1.8);
        assert_relative_eq!(moisture_factor(Some("20"), humidity), 1.2);
        assert_eq!(moisture_factor(Some("42"), humidity), 1.5);
    }

    #[test]
    fn test_non_combustible_soil_is_exactly_zero() {
        for code in ["82", "91", "92", "93", "94", "95", "97", "99", "27", "28", "29"] {
            for humidity in [10.0, 50.0, 95.0] {
                assert_eq!(moisture_factor(Some(code), Percent::new(humidity)), 0.0);
            }
        }
    }

    #[test]
    fn test_wind_alignment_bands() {
        let speed = MetersPerSecond::new(8.0);
        let direction = Degrees::new(90.0);

        assert_eq!(wind_factor(speed, direction, Degrees::new(100.0)), 3.0);
        assert_eq!(wind_factor(speed, direction, Degrees::new(150.0)), 2.0);
        assert_eq!(wind_factor(speed, direction, Degrees::new(-90.0)), 1.0);
        // Alignment wraps across north
        assert_eq!(
            wind_factor(speed, Degrees::new(350.0), Degrees::new(10.0)),
            3.0
        );
    }

    #[test]
    fn test_wind_factor_calm_and_floor() {
        assert_eq!(
            wind_factor(MetersPerSecond::new(0.0), Degrees::new(0.0), Degrees::new(0.0)),
            1.0
        );
        // A negative reading from a faulty sensor cannot drop below the floor
        assert_eq!(
            wind_factor(MetersPerSecond::new(-10.0), Degrees::new(0.0), Degrees::new(0.0)),
            0.5
        );
    }

    #[test]
    fn test_burnout_base_and_humidity_penalty() {
        let none = Kilometers::new(0.0);
        assert_eq!(*burnout_duration(5.0, Percent::new(50.0), none), 6000.0);
        assert_relative_eq!(*burnout_duration(5.0, Percent::new(75.0), none), 4200.0);
        assert_eq!(*burnout_duration(5.0, Percent::new(90.0), none), 3000.0);
        assert_eq!(*burnout_duration(0.0, Percent::new(50.0), none), 0.0);
    }

    #[test]
    fn test_burnout_jump_penalty() {
        let humidity = Percent::new(50.0);
        // Under two grid units: no penalty
        assert_eq!(*burnout_duration(5.0, humidity, Kilometers::new(2.0)), 6000.0);
        // Exactly two units: divisor max(1, 1) = 1
        assert_eq!(*burnout_duration(5.0, humidity, Kilometers::new(2.4)), 6000.0);
        // Four units: divisor 3
        assert_relative_eq!(
            *burnout_duration(5.0, humidity, Kilometers::new(4.8)),
            2000.0,
            max_relative = 1e-12
        );
    }
}

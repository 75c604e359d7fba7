const POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Map a wind bearing in degrees to a 16-point compass abbreviation.
///
/// Bearings outside `[0, 360]`, NaN included, are read as 0.
pub fn compass_direction(degrees: f64) -> &'static str {
    let degrees = if (0.0..=360.0).contains(&degrees) { degrees } else { 0.0 };
    let index = (degrees / 22.5).round() as usize;
    POINTS[index % POINTS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_points() {
        assert_eq!(compass_direction(0.0), "N");
        assert_eq!(compass_direction(90.0), "E");
        assert_eq!(compass_direction(180.0), "S");
        assert_eq!(compass_direction(270.0), "W");
        assert_eq!(compass_direction(360.0), "N");
    }

    #[test]
    fn intermediate_points_round_half_up() {
        assert_eq!(compass_direction(11.24), "N");
        assert_eq!(compass_direction(11.25), "NNE");
        assert_eq!(compass_direction(45.0), "NE");
        assert_eq!(compass_direction(348.75), "N");
        assert_eq!(compass_direction(337.5), "NNW");
    }

    #[test]
    fn out_of_range_reads_as_north() {
        assert_eq!(compass_direction(-0.5), "N");
        assert_eq!(compass_direction(-90.0), "N");
        assert_eq!(compass_direction(370.0), "N");
        assert_eq!(compass_direction(f64::NAN), "N");
        assert_eq!(compass_direction(f64::INFINITY), "N");
    }
}

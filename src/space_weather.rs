/// NOAA S-scale (solar radiation storm) from >=10 MeV proton flux.
/// Thresholds are lower-inclusive decades: S1 at 10 pfu up to S5 at 100,000.
pub fn solar_radiation_scale(proton_flux: f64) -> i32 {
    if proton_flux >= 100_000.0 {
        5
    } else if proton_flux >= 10_000.0 {
        4
    } else if proton_flux >= 1_000.0 {
        3
    } else if proton_flux >= 100.0 {
        2
    } else if proton_flux >= 10.0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_thresholds_map_each_decade() {
        let cases = [
            (5.0, 0),
            (10.0, 1),
            (100.0, 2),
            (1_000.0, 3),
            (10_000.0, 4),
            (100_000.0, 5),
        ];
        for (flux, expected) in cases {
            assert_eq!(solar_radiation_scale(flux), expected, "flux {flux}");
        }
    }

    #[test]
    fn scale_boundaries_are_lower_inclusive() {
        assert_eq!(solar_radiation_scale(9.99), 0);
        assert_eq!(solar_radiation_scale(10.01), 1);
        assert_eq!(solar_radiation_scale(99.99), 1);
        assert_eq!(solar_radiation_scale(100.01), 2);
    }
}

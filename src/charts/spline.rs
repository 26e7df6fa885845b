//! Catmull-Rom smoothing for line charts

/// Interpolate a smooth curve through `points`
///
/// Each segment between two consecutive points is sampled `samples` times.
/// The curve passes through every input point. Fewer than three points are
/// returned unchanged.
pub fn catmull_rom(points: &[(f64, f64)], samples: usize) -> Vec<(f64, f64)> {
    if points.len() < 3 || samples == 0 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut curve = Vec::with_capacity(last * samples + 1);

    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];

        for step in 0..samples {
            let t = step as f64 / samples as f64;
            curve.push((
                interpolate(p0.0, p1.0, p2.0, p3.0, t),
                interpolate(p0.1, p1.1, p2.1, p3.1, t),
            ));
        }
    }

    curve.push(points[last]);
    curve
}

fn interpolate(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_short_input_unchanged() {
        let points = vec![(0.0, 1.0), (1.0, 2.0)];
        assert_eq!(catmull_rom(&points, 8), points);
        assert!(catmull_rom(&[], 8).is_empty());
    }

    #[test]
    fn test_passes_through_points() {
        let points = vec![(0.0, 15.0), (1.0, 3.5), (2.0, 8.0), (3.0, 1.0)];
        let curve = catmull_rom(&points, 10);

        assert_eq!(curve.len(), 3 * 10 + 1);
        for (i, p) in points.iter().enumerate() {
            let c = curve[i * 10];
            assert!(close(c.0, p.0) && close(c.1, p.1), "point {} was {:?}", i, c);
        }
    }

    #[test]
    fn test_collinear_points_stay_on_line() {
        let points = vec![(0.0, 0.0), (1.0, 2.0), (2.0, 4.0), (3.0, 6.0)];
        for (x, y) in catmull_rom(&points, 4) {
            assert!(close(y, 2.0 * x));
        }
    }
}

/// Squared Euclidean distance. Lower is closer; the square root is never
/// taken because ranking only needs the ordering.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        let d = x - y;
        sum += d * d;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::squared_l2;

    #[test]
    fn identical_vectors_have_zero_distance() {
        assert_eq!(squared_l2(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn distance_grows_with_separation() {
        let origin = [0.0, 0.0];
        assert!(squared_l2(&origin, &[1.0, 0.0]) < squared_l2(&origin, &[3.0, 4.0]));
        assert_eq!(squared_l2(&origin, &[3.0, 4.0]), 25.0);
    }
}

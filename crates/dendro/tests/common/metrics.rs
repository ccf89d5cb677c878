//! Distance metrics for testing.

pub fn euclidean<I: AsRef<[f64]>>(a: &I, b: &I) -> f64 {
    a.as_ref()
        .iter()
        .zip(b.as_ref())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

pub fn manhattan<I: AsRef<[f64]>>(a: &I, b: &I) -> f64 {
    a.as_ref().iter().zip(b.as_ref()).map(|(x, y)| (x - y).abs()).sum()
}

use fastrand::Rng;

/// Runs `count` tournaments of `size` contestants drawn with replacement and
/// returns the index of each winner (highest score; first drawn wins ties).
pub fn select_tournament(scores: &[f32], count: usize, size: usize, rng: &mut Rng) -> Vec<usize> {
    if scores.is_empty() {
        return Vec::new();
    }
    let size = size.max(1);
    (0..count)
        .map(|_| {
            let mut winner = rng.usize(0..scores.len());
            for _ in 1..size {
                let challenger = rng.usize(0..scores.len());
                if scores[challenger] > scores[winner] {
                    winner = challenger;
                }
            }
            winner
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favours_high_scores() {
        let scores: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let mut rng = Rng::with_seed(1);
        let picks = select_tournament(&scores, 1000, 3, &mut rng);
        let mean = picks.iter().sum::<usize>() as f32 / picks.len() as f32;
        // expected maximum of three uniform draws is ~75
        assert!(mean > 65.0, "mean winner index {mean}");
    }

    #[test]
    fn test_empty_population() {
        let mut rng = Rng::with_seed(1);
        assert!(select_tournament(&[], 5, 3, &mut rng).is_empty());
    }
}

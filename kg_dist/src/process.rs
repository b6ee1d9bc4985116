use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{config::Config, io, plot};

/// Estimated sample counts for the diseases that were counted but not listed
/// in the log (those below the listing threshold).  Each is drawn uniformly
/// from 1..=min(5, largest listed count); returned in decreasing order
pub fn hidden_counts<R: Rng>(total: usize, counts: &[u64], rng: &mut R) -> Vec<u64> {
    let top = counts.iter().copied().max().unwrap_or(5).clamp(1, 5);
    let n = total.saturating_sub(counts.len());
    let mut v: Vec<u64> = (0..n).map(|_| rng.random_range(1..=top)).collect();
    v.sort_unstable_by(|a, b| b.cmp(a));
    v
}

pub fn process_log(cfg: &Config) -> anyhow::Result<()> {
    debug!("Starting processing");
    let d = io::read_disease_log(cfg.input())?;
    if d.total < d.counts.len() {
        warn!(
            "Log lists {} diseases but reports a total of {}",
            d.counts.len(),
            d.total
        )
    }
    let mut rng = match cfg.seed() {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let hidden = hidden_counts(d.total, &d.counts, &mut rng);
    debug!("Estimated counts for {} unlisted diseases", hidden.len());
    plot::plot_distribution(cfg.output(), &d.counts, &hidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_counts_are_bounded_and_sorted() {
        let mut rng = StdRng::seed_from_u64(17);
        let v = hidden_counts(50, &[40, 12, 7], &mut rng);
        assert_eq!(v.len(), 47);
        assert!(v.iter().all(|x| (1..=5).contains(x)));
        assert!(v.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn small_listed_counts_limit_estimates() {
        let mut rng = StdRng::seed_from_u64(3);
        let v = hidden_counts(10, &[2, 2], &mut rng);
        assert_eq!(v.len(), 8);
        assert!(v.iter().all(|x| (1..=2).contains(x)));
    }

    #[test]
    fn nothing_hidden() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(hidden_counts(2, &[9, 4], &mut rng).is_empty());
        assert!(hidden_counts(1, &[9, 4], &mut rng).is_empty());
        let v = hidden_counts(3, &[], &mut rng);
        assert!(v.iter().all(|x| (1..=5).contains(x)));
    }

    #[test]
    fn seeded_estimates_are_reproducible() {
        let a = hidden_counts(30, &[10], &mut StdRng::seed_from_u64(5));
        let b = hidden_counts(30, &[10], &mut StdRng::seed_from_u64(5));
        assert_eq!(a, b);
    }
}

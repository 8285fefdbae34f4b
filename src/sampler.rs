//! Sampler
//!
//! Strategies for resampling the data before fitting each ensemble member.
use crate::data::DataSet;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

// A sampler can be used to resample the data prior to fitting a member.
pub trait Sampler {
    /// Sample the data, returning a tuple, where the first item is the samples
    /// chosen for training, and the second are the samples never chosen.
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>);
}

/// Draws `index.len()` positions uniformly with replacement.
#[derive(Debug, Default, Clone, Copy)]
pub struct BootstrapSampler;

impl Sampler for BootstrapSampler {
    fn sample(&mut self, rng: &mut StdRng, index: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let n = index.len();
        if n == 0 {
            return (Vec::new(), Vec::new());
        }
        let mut drawn = vec![false; n];
        let mut chosen = Vec::with_capacity(n);
        for _ in 0..n {
            let pos = rng.gen_range(0..n);
            drawn[pos] = true;
            chosen.push(index[pos]);
        }
        let excluded = index
            .iter()
            .zip(drawn)
            .filter(|(_, d)| !d)
            .map(|(i, _)| *i)
            .collect();
        (chosen, excluded)
    }
}

/// A data set of the same size as `data`, drawn with replacement, sharing
/// the examples and feature map of `data`. Also returns the positions in
/// `data` of the examples that were never drawn.
pub fn bootstrap_resample(data: &DataSet, rng: &mut StdRng) -> (DataSet, Vec<usize>) {
    let index: Vec<usize> = (0..data.len()).collect();
    let (chosen, out_of_bag) = BootstrapSampler.sample(rng, &index);
    let mut sample = data.empty_like();
    sample.extend(chosen.into_iter().map(|i| Arc::clone(&data.examples()[i])));
    (sample, out_of_bag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Example;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    #[test]
    fn test_bootstrap_sampler() {
        let mut rng = StdRng::seed_from_u64(42);
        let index = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut sampler = BootstrapSampler;
        let (chosen, excluded) = sampler.sample(&mut rng, &index);

        assert_eq!(chosen.len(), index.len());
        assert!(chosen.iter().all(|i| index.contains(i)));
        // Out of bag samples are exactly the ones never drawn.
        for i in &index {
            assert_ne!(chosen.contains(i), excluded.contains(i));
        }

        let (chosen, excluded) = sampler.sample(&mut rng, &[]);
        assert!(chosen.is_empty() && excluded.is_empty());
    }

    #[test]
    fn test_bootstrap_resample_size_and_seed() {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string())]));
        for i in 0..25 {
            data.add_example(Example::new(if i < 10 { -1.0 } else { 1.0 }).with_feature(0, i as f64));
        }
        for n in [1, 2, 25] {
            let mut small = data.empty_like();
            small.extend(data.examples()[..n].iter().cloned());
            let (sample, _) = bootstrap_resample(&small, &mut StdRng::seed_from_u64(n as u64));
            assert_eq!(sample.len(), n);
            assert_eq!(sample.feature_map(), data.feature_map());
        }

        let (a, _) = bootstrap_resample(&data, &mut StdRng::seed_from_u64(7));
        let (b, _) = bootstrap_resample(&data, &mut StdRng::seed_from_u64(7));
        let values = |d: &DataSet| d.examples().iter().map(|e| e.feature(0)).collect::<Vec<_>>();
        assert_eq!(values(&a), values(&b));
        assert!(a.examples().iter().all(|e| data.examples().iter().any(|o| Arc::ptr_eq(o, e))));
    }

    #[test]
    fn test_bootstrap_draws_with_replacement() {
        let mut data = DataSet::new(BTreeMap::from([(0, "x".to_string())]));
        for i in 0..100 {
            data.add_example(Example::new(1.0).with_feature(0, i as f64));
        }
        let (sample, out_of_bag) = bootstrap_resample(&data, &mut StdRng::seed_from_u64(42));
        assert_eq!(sample.len(), 100);

        let repeated = sample
            .examples()
            .iter()
            .enumerate()
            .any(|(i, e)| sample.examples()[i + 1..].iter().any(|o| Arc::ptr_eq(o, e)));
        assert!(repeated);

        // Roughly 1/e of the examples are never drawn.
        assert!((20..=50).contains(&out_of_bag.len()), "{} out of bag", out_of_bag.len());
        for (i, e) in data.examples().iter().enumerate() {
            let drawn = sample.examples().iter().any(|o| Arc::ptr_eq(o, e));
            assert_eq!(drawn, !out_of_bag.contains(&i));
        }
    }
}

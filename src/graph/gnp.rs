use crate::graph::*;
use rand::Rng;
use rand_distr::Geometric;

pub trait GnpGenerator: Sized {
    /// Generates a Gilbert (also, wrongly, known as Erdos-Reyni) graph
    /// The `G(n,p)` contains n nodes and each of the `n(n-1)/2` edges exists
    /// independently with probability `p`.
    fn random_gnp<R: Rng>(rng: &mut R, n: Node, p: f64) -> Self;
}

impl<G> GnpGenerator for G
where
    G: GraphNew + GraphEdgeEditing,
{
    fn random_gnp<R: Rng>(rng: &mut R, n: Node, p: f64) -> Self {
        let mut result = Self::new(n);
        let number_of_pairs = (n as u64) * (n as u64).saturating_sub(1) / 2;

        for idx in SkipSampler::new(rng, number_of_pairs, p) {
            let Edge(u, v) = pair_from_index(idx);
            result.add_edge(u, v);
        }

        result
    }
}

/// Maps the index of a pair in the enumeration (0,1), (0,2), (1,2), (0,3), ... to the pair,
/// i.e. pairs are ordered by their larger node first.
fn pair_from_index(idx: u64) -> Edge {
    // largest v with v(v-1)/2 <= idx
    let mut v = ((((8 * idx + 1) as f64).sqrt() + 1.0) / 2.0) as u64;
    while v * (v - 1) / 2 > idx {
        v -= 1;
    }
    while (v + 1) * v / 2 <= idx {
        v += 1;
    }

    let u = idx - v * (v - 1) / 2;
    Edge(u as Node, v as Node)
}

/// Yields each element of `0..end` independently with probability `prob`
/// by drawing geometrically distributed gaps.
pub struct SkipSampler<'a, R: Rng> {
    next: u64,
    end: u64,
    distr: Option<Geometric>,
    rng: &'a mut R,
}

impl<'a, R: Rng> SkipSampler<'a, R> {
    pub fn new(rng: &'a mut R, end: u64, prob: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&prob));
        Self {
            rng,
            next: 0,
            end,
            distr: (prob > 0.0).then(|| Geometric::new(prob).ok()).flatten(),
        }
    }
}

impl<R: Rng> Iterator for SkipSampler<'_, R> {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let distr = self.distr.as_ref()?;
        let skip = self.rng.sample(distr);
        let current = self.next.checked_add(skip).filter(|&x| x < self.end)?;
        self.next = current + 1;
        Some(current)
    }
}

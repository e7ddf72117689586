use super::lattice::{offset_bucket, offset_distance, Lattice, STENCIL};
use crate::models::pore::params::{NetworkParams, ParamError};
use glam::IVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Offset buckets per site, including the unused centre bucket.
pub const BUCKETS: usize = 27;

/// Shortest clamped throat length as a fraction of `L_avg`.
pub const MIN_LENGTH_FRACTION: f64 = 1e-3;

/// Sampled geometry of one throat. `length` is the base length, before the
/// diagonal distance scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throat {
    pub radius: f64,
    pub length: f64,
    pub weight: f64,
}

/// Per-site, per-offset throat properties together with the connectivity
/// cutoff. Sampled once and read-only for the rest of the run.
pub struct ThroatField {
    pub lattice: Lattice,
    pub cutoff: f64,
    radius: Vec<f64>,
    length: Vec<f64>,
    weight: Vec<f64>,
}

impl ThroatField {
    /// Draw radius, length and weight for every site and all 27 buckets.
    pub fn sample(params: &NetworkParams) -> Result<Self, ParamError> {
        let lattice = Lattice::new(params.n, params.m, params.w);
        let size = lattice.num_sites() * BUCKETS;

        let radius_dist = Normal::new(params.r_avg, params.r_stdv).map_err(|_| {
            ParamError::Negative {
                name: "R_stdv",
                value: params.r_stdv,
            }
        })?;
        let length_dist = Normal::new(params.l_avg, params.l_stdv).map_err(|_| {
            ParamError::Negative {
                name: "L_stdv",
                value: params.l_stdv,
            }
        })?;

        // Separate streams so the radii do not shift if the length model changes.
        let mut rng_r = ChaCha8Rng::seed_from_u64(params.seed);
        let mut rng_l = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(1));
        let mut rng_z = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(2));

        let mut radius: Vec<f64> = (0..size).map(|_| radius_dist.sample(&mut rng_r)).collect();
        let mut length: Vec<f64> = (0..size).map(|_| length_dist.sample(&mut rng_l)).collect();
        let weight: Vec<f64> = (0..size).map(|_| rng_z.gen::<f64>()).collect();

        if params.clamp_negative_geometry {
            let min_length = MIN_LENGTH_FRACTION * params.l_avg;
            radius.iter_mut().for_each(|r| *r = r.max(0.0));
            length.iter_mut().for_each(|l| *l = l.max(min_length));
        }

        Ok(Self {
            lattice,
            cutoff: params.cutoff(),
            radius,
            length,
            weight,
        })
    }

    /// Build a field where every bucket holds the same throat. Used for
    /// deterministic scenarios.
    pub fn uniform(lattice: Lattice, cutoff: f64, throat: Throat) -> Self {
        let size = lattice.num_sites() * BUCKETS;
        Self {
            lattice,
            cutoff,
            radius: vec![throat.radius; size],
            length: vec![throat.length; size],
            weight: vec![throat.weight; size],
        }
    }

    #[inline]
    fn slot(&self, site: usize, bucket: usize) -> usize {
        site * BUCKETS + bucket
    }

    /// Raw triple stored for `site` in the bucket of `offset`.
    pub fn stored(&self, site: usize, offset: IVec3) -> Throat {
        let s = self.slot(site, offset_bucket(offset));
        Throat {
            radius: self.radius[s],
            length: self.length[s],
            weight: self.weight[s],
        }
    }

    /// Throat between two in-bounds sites that are stencil neighbours.
    ///
    /// The triple lives at the endpoint with the larger flat index, in the
    /// bucket pointing towards the other endpoint, so `between(a, b)` and
    /// `between(b, a)` agree.
    pub fn between(&self, a: usize, b: usize) -> Throat {
        let (owner, other) = if a >= b { (a, b) } else { (b, a) };
        let offset = self.lattice.point(other) - self.lattice.point(owner);
        self.stored(owner, offset)
    }

    /// Overwrite the triple of the throat between two neighbours.
    pub fn set_between(&mut self, a: usize, b: usize, throat: Throat) {
        let (owner, other) = if a >= b { (a, b) } else { (b, a) };
        let offset = self.lattice.point(other) - self.lattice.point(owner);
        let s = self.slot(owner, offset_bucket(offset));
        self.radius[s] = throat.radius;
        self.length[s] = throat.length;
        self.weight[s] = throat.weight;
    }

    /// Throat between two neighbours with its length scaled by the offset
    /// distance.
    pub fn scaled_between(&self, a: usize, b: usize) -> Throat {
        let offset = self.lattice.point(b) - self.lattice.point(a);
        let mut throat = self.between(a, b);
        throat.length *= offset_distance(offset);
        throat
    }

    #[inline]
    pub fn is_open(&self, throat: &Throat) -> bool {
        throat.weight > self.cutoff
    }

    /// The adjacency graph as seen by plotting code.
    pub fn network(&self) -> PoreNetwork {
        let lattice = self.lattice;
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut degree = vec![0usize; lattice.num_sites()];

        for site in 0..lattice.num_sites() {
            let p = lattice.point(site);
            for offset in STENCIL {
                let Some(nb) = lattice.index_of(p + offset) else {
                    continue;
                };
                if !self.is_open(&self.between(site, nb)) {
                    continue;
                }
                degree[site] += 1;
                // Each undirected throat is recorded once, from its lower end.
                if site < nb {
                    edges.push((p, lattice.point(nb)));
                }
            }
        }

        for (site, &d) in degree.iter().enumerate() {
            if d > 0 {
                nodes.push(lattice.point(site));
            }
        }

        PoreNetwork {
            lattice,
            nodes,
            edges,
            degree,
        }
    }
}

/// Undirected adjacency of the generated network over lattice coordinates.
/// Carries no pressure data.
pub struct PoreNetwork {
    pub lattice: Lattice,
    /// Sites with at least one throat, in flat index order.
    pub nodes: Vec<IVec3>,
    pub edges: Vec<(IVec3, IVec3)>,
    /// Coordination number per site.
    pub degree: Vec<usize>,
}

impl PoreNetwork {
    pub fn num_throats(&self) -> usize {
        self.edges.len()
    }

    pub fn mean_coordination(&self) -> f64 {
        if self.degree.is_empty() {
            return 0.0;
        }
        self.degree.iter().sum::<usize>() as f64 / self.degree.len() as f64
    }

    pub fn isolated_sites(&self) -> usize {
        self.degree.iter().filter(|&&d| d == 0).count()
    }
}

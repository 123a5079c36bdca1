use crate::core::histogram::EscapeHistogram;
use crate::core::packet::PhotonPacket;
use crate::core::transport::{transport_packet, Fate};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

/// Packets per parallel work item. Fixed (rather than derived from the
/// worker count) so a parallel run's output depends only on the
/// configuration and seed, not on the machine it ran on.
const CHUNK_SIZE: usize = 65_536;

/// SplitMix64 increment, used to derive independent per-chunk RNG streams
/// from the base seed.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Snapshot handed to progress reporters during a run.
#[derive(Debug, Clone, Copy)]
pub struct RunProgress {
    /// Packets transported so far.
    pub transported: usize,
    /// Total packet budget of the run.
    pub total: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Bin-centre escape angles in radians (length n_bins).
    pub theta: Vec<f64>,
    /// Emergent intensity per bin (length n_bins).
    pub intensity: Vec<f64>,
    /// Packets that reached the escaped terminal state (<= n_photons).
    pub escaped: u64,
    /// Wall-clock duration of the transport sweep.
    pub elapsed: Duration,
}

/// Monte Carlo radiative transfer through a 1D homogeneous plane-parallel
/// slab of unit thickness.
///
/// The simulation transports `n_photons` independent packets: each is
/// emitted at the slab base, random-walks with exponential free flights
/// scaled by `tau_max`, scatters isotropically with probability `albedo`
/// per interaction, and either escapes through the top or is absorbed.
/// Escape angles are binned into an [`EscapeHistogram`] and normalized to
/// emergent intensity.
///
/// The seed is resolved at construction (`None` draws one from entropy),
/// so every run of the same `Simulation` value produces identical output.
#[derive(Debug, Clone)]
pub struct Simulation {
    n_photons: usize,
    n_bins: usize,
    tau_max: f64,
    albedo: f64,
    seed: u64,
}

impl Simulation {
    /// Create a new simulation configuration.
    ///
    /// Parameters
    /// - `n_photons`: photon packet budget (> 0)
    /// - `n_bins`: angular bins over cos(theta) in [0, 1] (> 0)
    /// - `tau_max`: vertical optical thickness of the slab (finite, > 0)
    /// - `albedo`: single-scattering albedo (finite, in [0, 1])
    /// - `seed`: RNG seed for reproducibility; `None` for nondeterministic
    ///
    /// Errors: `Error::InvalidParam` on any out-of-range parameter.
    pub fn new(
        n_photons: usize,
        n_bins: usize,
        tau_max: f64,
        albedo: f64,
        seed: Option<u64>,
    ) -> Result<Self> {
        if n_photons == 0 {
            return Err(Error::InvalidParam("n_photons must be > 0".into()));
        }
        if n_bins == 0 {
            return Err(Error::InvalidParam("n_bins must be > 0".into()));
        }
        if !tau_max.is_finite() || tau_max <= 0.0 {
            return Err(Error::InvalidParam(
                "tau_max must be finite and > 0".into(),
            ));
        }
        if !albedo.is_finite() || !(0.0..=1.0).contains(&albedo) {
            return Err(Error::InvalidParam(
                "albedo must be finite and within [0, 1]".into(),
            ));
        }
        let seed = match seed {
            Some(s) => s,
            None => rng().random(),
        };
        Ok(Self {
            n_photons,
            n_bins,
            tau_max,
            albedo,
            seed,
        })
    }

    /// Photon packet budget.
    pub fn n_photons(&self) -> usize {
        self.n_photons
    }

    /// Number of angular bins.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Vertical optical thickness of the slab.
    pub fn tau_max(&self) -> f64 {
        self.tau_max
    }

    /// Single-scattering albedo.
    pub fn albedo(&self) -> f64 {
        self.albedo
    }

    /// The resolved RNG seed for this configuration.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Transport the full packet budget sequentially.
    pub fn run(&self) -> Result<RunResult> {
        self.run_with_progress(0, |_| {})
    }

    /// Transport the full packet budget sequentially, reporting progress.
    ///
    /// The reporter is invoked after every `every` packets (`every == 0`
    /// disables reporting) and once more at completion if the budget is not
    /// a multiple of `every`. Reporting never touches the random stream, so
    /// the result is identical to [`Simulation::run`].
    pub fn run_with_progress<F>(&self, every: usize, mut report: F) -> Result<RunResult>
    where
        F: FnMut(&RunProgress),
    {
        let started = Instant::now();
        let mut rng: StdRng = SeedableRng::seed_from_u64(self.seed);
        let mut hist = EscapeHistogram::new(self.n_bins)?;
        let mut escaped = 0u64;

        for i in 0..self.n_photons {
            let mut packet = PhotonPacket::emit(&mut rng);
            if transport_packet(&mut packet, self.tau_max, self.albedo, &mut rng)
                == Fate::Escaped
            {
                hist.bin_packet(packet.costheta)?;
                escaped += 1;
            }
            if every != 0 && (i + 1) % every == 0 {
                report(&RunProgress {
                    transported: i + 1,
                    total: self.n_photons,
                });
            }
        }
        if every != 0 && self.n_photons % every != 0 {
            report(&RunProgress {
                transported: self.n_photons,
                total: self.n_photons,
            });
        }

        Ok(self.finish(hist, escaped, started))
    }

    /// Transport the packet budget on the rayon thread pool.
    ///
    /// The budget is split into fixed-size chunks, each transported on an
    /// independent RNG stream derived from the base seed and chunk index;
    /// per-chunk histograms are merged afterwards. The output is a pure
    /// function of the configuration and seed (worker count does not
    /// matter), and agrees with the sequential run statistically rather
    /// than draw-for-draw.
    pub fn run_parallel(&self) -> Result<RunResult> {
        let started = Instant::now();
        let n_chunks = self.n_photons.div_ceil(CHUNK_SIZE);

        let partials = (0..n_chunks)
            .into_par_iter()
            .map(|chunk| {
                let count = CHUNK_SIZE.min(self.n_photons - chunk * CHUNK_SIZE);
                self.transport_chunk(chunk as u64, count)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut hist = EscapeHistogram::new(self.n_bins)?;
        let mut escaped = 0u64;
        for (partial, n) in &partials {
            hist.merge(partial)?;
            escaped += n;
        }

        Ok(self.finish(hist, escaped, started))
    }

    // ============ Internal helpers ============

    /// Transport `count` packets on the independent stream for `chunk`.
    fn transport_chunk(&self, chunk: u64, count: usize) -> Result<(EscapeHistogram, u64)> {
        let mut rng: StdRng =
            SeedableRng::seed_from_u64(self.seed ^ (chunk + 1).wrapping_mul(SEED_MIX));
        let mut hist = EscapeHistogram::new(self.n_bins)?;
        let mut escaped = 0u64;
        for _ in 0..count {
            let mut packet = PhotonPacket::emit(&mut rng);
            if transport_packet(&mut packet, self.tau_max, self.albedo, &mut rng)
                == Fate::Escaped
            {
                hist.bin_packet(packet.costheta)?;
                escaped += 1;
            }
        }
        Ok((hist, escaped))
    }

    fn finish(&self, hist: EscapeHistogram, escaped: u64, started: Instant) -> RunResult {
        RunResult {
            theta: hist.theta().to_vec(),
            intensity: hist.intensity(self.n_photons),
            escaped,
            elapsed: started.elapsed(),
        }
    }
}

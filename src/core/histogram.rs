use crate::error::{Error, Result};

/// Histogram of escaped-packet angles over cos(theta) in [0, 1].
///
/// Only the upward, escaping hemisphere is tracked. The bins partition
/// cos(theta) into `n_bins` equal-width intervals; `theta[i]` is the
/// representative angle at the centre of bin i, `arccos((i + 0.5) / n_bins)`,
/// fixed at construction. Counts accumulate additively and are read out
/// non-destructively.
#[derive(Debug, Clone)]
pub struct EscapeHistogram {
    n_bins: usize,
    weight: Vec<f64>,
    theta: Vec<f64>,
}

impl EscapeHistogram {
    /// Create a histogram with `n_bins` angular bins and zeroed counts.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `n_bins` is zero.
    pub fn new(n_bins: usize) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidParam("n_bins must be > 0".into()));
        }
        let d_mu = 1.0 / n_bins as f64;
        let theta = (0..n_bins)
            .map(|i| ((i as f64 + 0.5) * d_mu).acos())
            .collect();
        Ok(Self {
            n_bins,
            weight: vec![0.0; n_bins],
            theta,
        })
    }

    /// Number of angular bins.
    #[inline]
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// Bin-centre angles in radians, strictly decreasing with bin index.
    pub fn theta(&self) -> &[f64] {
        &self.theta
    }

    /// Per-bin escape counts.
    pub fn weights(&self) -> &[f64] {
        &self.weight
    }

    /// Total escape count across all bins.
    pub fn total_weight(&self) -> f64 {
        self.weight.iter().sum()
    }

    /// Record one escaped packet by its escape cosine.
    ///
    /// The index is `|trunc(costheta * n_bins)|`: the absolute value folds a
    /// negative escape cosine onto the positive hemisphere rather than
    /// rejecting it. An index at or beyond `n_bins` means the cosine was
    /// outside (-1, 1) and is a fatal bookkeeping error.
    pub fn bin_packet(&mut self, costheta: f64) -> Result<()> {
        let index = ((costheta * self.n_bins as f64) as i64).unsigned_abs() as usize;
        if index >= self.n_bins {
            return Err(Error::OutOfBounds(format!(
                "escape cosine {costheta} maps to bin {index} of {}",
                self.n_bins
            )));
        }
        self.weight[index] += 1.0;
        Ok(())
    }

    /// Emergent specific intensity per bin, normalizing the counts by solid
    /// angle and the photon budget: `weight[i] * n_bins / (2 * n_photons *
    /// cos(theta[i]))`.
    ///
    /// Pure: does not mutate the histogram and may be called any number of
    /// times. Bins with zero weight yield exactly zero. `n_photons` is the
    /// TOTAL packet budget of the run, not the escaped count.
    pub fn intensity(&self, n_photons: usize) -> Vec<f64> {
        let norm = self.n_bins as f64 / (2.0 * n_photons as f64);
        self.weight
            .iter()
            .zip(&self.theta)
            .map(|(w, t)| w * norm / t.cos())
            .collect()
    }

    /// Fold another histogram's counts into this one.
    ///
    /// Used to combine per-worker histograms after a parallel run; the
    /// merged counts are identical to sequential accumulation of the same
    /// escape events.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the bin counts differ.
    pub fn merge(&mut self, other: &EscapeHistogram) -> Result<()> {
        if other.n_bins != self.n_bins {
            return Err(Error::InvalidParam(format!(
                "cannot merge histograms with {} and {} bins",
                self.n_bins, other.n_bins
            )));
        }
        for (w, o) in self.weight.iter_mut().zip(&other.weight) {
            *w += o;
        }
        Ok(())
    }
}

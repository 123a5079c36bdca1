use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pub mod core;
pub mod error;

use crate::core::{RunResult, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

type AnglesAndIntensity = (Py<PyArray1<f64>>, Py<PyArray1<f64>>);

fn angles_and_intensity(py: Python<'_>, result: RunResult) -> AnglesAndIntensity {
    (
        result.theta.into_pyarray(py).unbind(),
        result.intensity.into_pyarray(py).unbind(),
    )
}

/// SlabSim Python-facing wrapper around the Rust transport core.
///
/// API:
/// - __new__(n_photons, n_bins=20, tau_max=7.0, albedo=1.0, seed=None)
/// - run(progress=False) -> (theta, intensity), two np.ndarray of shape (n_bins,)
/// - run_parallel() -> same, computed on the rayon thread pool
#[pyclass]
pub struct SlabSim {
    sim: Simulation,
}

#[pymethods]
impl SlabSim {
    /// Configure a Monte Carlo radiative transfer run through a homogeneous
    /// plane-parallel slab.
    ///
    /// Parameters
    /// - n_photons: photon packet budget (int, > 0)
    /// - n_bins: angular bins over cos(theta) in [0, 1] (int, > 0)
    /// - tau_max: vertical optical thickness of the slab (float, > 0)
    /// - albedo: single-scattering albedo (float in [0, 1])
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (n_photons, n_bins=20, tau_max=7.0, albedo=1.0, seed=None))]
    fn new(
        n_photons: usize,
        n_bins: usize,
        tau_max: f64,
        albedo: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let sim = Simulation::new(n_photons, n_bins, tau_max, albedo, seed).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Transport all packets and return the bin-centre angles (radians) and
    /// the emergent intensity per bin (releases the GIL during computation).
    ///
    /// With progress=True, prints a start banner, a progress line after
    /// every tenth of the budget, and a completion line with the elapsed
    /// wall-clock time. Progress output never affects the result.
    #[pyo3(signature = (progress=false))]
    fn run(&self, py: Python<'_>, progress: bool) -> PyResult<AnglesAndIntensity> {
        let result = py
            .allow_threads(|| {
                if progress {
                    println!("Beginning simulation...\n");
                    let every = (self.sim.n_photons() / 10).max(1);
                    let result = self.sim.run_with_progress(every, |p| {
                        println!(
                            "{} photons ({:.1}%) transported.",
                            p.transported,
                            100.0 * p.transported as f64 / p.total as f64
                        );
                    })?;
                    println!(
                        "\nTransport of {} packets completed in {:.2} seconds.",
                        self.sim.n_photons(),
                        result.elapsed.as_secs_f64()
                    );
                    Ok(result)
                } else {
                    self.sim.run()
                }
            })
            .map_err(py_err)?;
        Ok(angles_and_intensity(py, result))
    }

    /// Same as run(), transported on the rayon thread pool with independent
    /// per-chunk random streams (releases the GIL during computation).
    fn run_parallel(&self, py: Python<'_>) -> PyResult<AnglesAndIntensity> {
        let result = py.allow_threads(|| self.sim.run_parallel()).map_err(py_err)?;
        Ok(angles_and_intensity(py, result))
    }
}

/// The slabsim Python module entry point.
#[pymodule]
fn slabsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<SlabSim>()?;
    Ok(())
}

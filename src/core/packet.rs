use rand::Rng;

/// A photon packet random-walking through the slab.
///
/// The direction is stored via its spherical components rather than a raw
/// 3-vector: `costheta`/`sintheta` for the polar angle measured from the
/// slab normal (z), `cosphi`/`sinphi` for the azimuth. Both sines are
/// derived from their cosines and therefore always non-negative; the sign
/// ambiguity in phi is tolerated because the slab is azimuthally symmetric
/// and only the z-displacement decides a packet's fate.
#[derive(Debug, Clone)]
pub struct PhotonPacket {
    /// Position (x, y, z); z is the slab depth, the interior is 0 <= z <= 1.
    pub position: [f64; 3],
    /// Cosine of the polar angle.
    pub costheta: f64,
    /// Sine of the polar angle (derived, >= 0).
    pub sintheta: f64,
    /// Cosine of the azimuthal angle.
    pub cosphi: f64,
    /// Sine of the azimuthal angle (derived, >= 0).
    pub sinphi: f64,
    /// Set once the packet exits the slab through z > 1.
    pub escaped: bool,
}

impl PhotonPacket {
    /// Emit a fresh packet at the origin of the slab.
    ///
    /// The emission direction follows the source law `costheta = sqrt(u)`,
    /// pointing into the upward hemisphere. Consumes exactly two uniform
    /// draws, costheta first and then phi; the draw order is part of the
    /// reproducibility contract.
    pub fn emit<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let costheta = rng.random::<f64>().sqrt();
        let cosphi = (2.0 * std::f64::consts::PI * rng.random::<f64>()).cos();
        Self {
            position: [0.0; 3],
            costheta,
            sintheta: (1.0 - costheta * costheta).sqrt(),
            cosphi,
            sinphi: (1.0 - cosphi * cosphi).sqrt(),
            escaped: false,
        }
    }

    /// Move the packet a length `ds` along its current direction.
    ///
    /// The caller guarantees `ds >= 0`; step lengths are sampled from
    /// `-ln(u) / tau_max` and cannot be negative.
    #[inline]
    pub fn advance(&mut self, ds: f64) {
        self.position[0] += ds * self.sintheta * self.cosphi;
        self.position[1] += ds * self.sintheta * self.sinphi;
        self.position[2] += ds * self.costheta;
    }

    /// Redraw the direction uniformly over the full sphere; the position is
    /// unchanged. Consumes exactly two uniform draws, costheta first and
    /// then phi.
    pub fn isotropic_scatter<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.costheta = 2.0 * rng.random::<f64>() - 1.0;
        self.sintheta = (1.0 - self.costheta * self.costheta).sqrt();
        self.cosphi = (2.0 * std::f64::consts::PI * rng.random::<f64>()).cos();
        self.sinphi = (1.0 - self.cosphi * self.cosphi).sqrt();
    }

    /// Depth of the packet within the slab.
    #[inline]
    pub fn z(&self) -> f64 {
        self.position[2]
    }
}

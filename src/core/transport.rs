use crate::core::packet::PhotonPacket;
use rand::Rng;

/// Terminal outcome of a single packet's random walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// The packet crossed z > 1 and left the slab through the top.
    Escaped,
    /// The packet interacted inside the slab and was absorbed.
    Absorbed,
}

/// Random-walk a packet through the slab until it escapes or is absorbed.
///
/// Each iteration samples an exponential free-flight length `-ln(u) /
/// tau_max` and advances the packet, then branches on the new depth:
/// - z < 0: the packet is lost through the bottom and is replaced wholesale
///   by a freshly emitted one (a full value replacement, never a partial
///   field reset), and the walk continues;
/// - z > 1: the packet has escaped;
/// - otherwise an albedo draw decides between an isotropic scatter (walk
///   continues) and absorption (walk ends).
///
/// Termination is almost sure; no iteration cap is applied.
pub fn transport_packet<R: Rng + ?Sized>(
    packet: &mut PhotonPacket,
    tau_max: f64,
    albedo: f64,
    rng: &mut R,
) -> Fate {
    while (0.0..=1.0).contains(&packet.z()) {
        let ds = -rng.random::<f64>().ln() / tau_max;
        packet.advance(ds);

        if packet.z() < 0.0 {
            *packet = PhotonPacket::emit(rng);
        } else if packet.z() > 1.0 {
            packet.escaped = true;
        } else {
            let xi = rng.random::<f64>();
            if xi < albedo {
                packet.isotropic_scatter(rng);
            } else {
                break;
            }
        }
    }

    if packet.escaped {
        Fate::Escaped
    } else {
        Fate::Absorbed
    }
}

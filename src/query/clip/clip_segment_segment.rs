use crate::dynamics::ParticleId;
use crate::math::{Point, Real};
use crate::query::Contact;
use crate::utils::{perpendicular, safe_normalize};

/// Clips the endpoints of the `incident` segment against the `reference` segment.
///
/// An endpoint yields a contact when it lies behind the reference segment (on
/// the side opposite to its normal) and projects inside it. Returns the number
/// of contacts pushed to `out`.
pub fn clip_segment_segment(
    reference: [(ParticleId, Point<Real>); 2],
    incident: [(ParticleId, Point<Real>); 2],
    out: &mut Vec<Contact>,
) -> usize {
    let [(ref_a, pos_a), (ref_b, pos_b)] = reference;
    let segment = pos_b - pos_a;
    let len = segment.norm();
    let unit = safe_normalize(&segment);
    let normal = perpendicular(&unit);
    let mut count = 0;

    for (particle, pos) in incident {
        let bridge = pos - pos_a;
        let dist = bridge.dot(&normal);
        if dist > 0.0 {
            continue;
        }

        let proj = bridge.dot(&unit);
        if proj >= 0.0 && proj <= len {
            out.push(Contact::with_segment(
                particle,
                pos,
                normal,
                dist.abs(),
                ref_a,
                ref_b,
            ));
            count += 1;
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyHandle;
    use crate::math::Vector;

    fn id(body: usize, index: usize) -> ParticleId {
        ParticleId::new(BodyHandle(body), 0, index)
    }

    #[test]
    fn only_penetrating_endpoints_are_kept() {
        // Top edge of a box, from left to right: its normal points up (-y).
        let reference = [(id(0, 0), Point::new(0.0, 0.0)), (id(0, 1), Point::new(4.0, 0.0))];
        let incident = [(id(1, 0), Point::new(1.0, 0.5)), (id(1, 1), Point::new(3.0, -0.5))];
        let mut out = Vec::new();

        assert_eq!(clip_segment_segment(reference, incident, &mut out), 1);
        assert_eq!(out[0].particle, id(1, 0));
        assert_relative_eq!(out[0].penetration, 0.5);
        assert_relative_eq!(out[0].normal, Vector::new(0.0, -1.0));
        assert_eq!(out[0].reference.as_slice(), &[id(0, 0), id(0, 1)]);
    }

    #[test]
    fn endpoints_beyond_the_segment_are_dropped() {
        let reference = [(id(0, 0), Point::new(0.0, 0.0)), (id(0, 1), Point::new(4.0, 0.0))];
        let incident = [(id(1, 0), Point::new(-1.0, 0.5)), (id(1, 1), Point::new(5.0, 0.5))];
        let mut out = Vec::new();
        assert_eq!(clip_segment_segment(reference, incident, &mut out), 0);
        assert!(out.is_empty());
    }
}

//! Linear domain/range remapping.
//!
//! The same map drives both custom-property value mapping and the
//! retargeting time transform (`base window -> target window`).

use serde::{Deserialize, Serialize};

/// A linear map sending `domain[0] -> range[0]` and `domain[1] -> range[1]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DomainRangeMap {
    pub domain: [f32; 2],
    pub range: [f32; 2],
}

impl DomainRangeMap {
    pub fn new(d0: f32, d1: f32, r0: f32, r1: f32) -> Self {
        Self {
            domain: [d0, d1],
            range: [r0, r1],
        }
    }

    pub fn apply(&self, x: f32) -> f32 {
        remap(x, self.domain[0], self.domain[1], self.range[0], self.range[1])
    }
}

/// Map `x` linearly from `[d0, d1]` onto `[r0, r1]`. Not clamped; callers
/// guard against a degenerate domain where that matters.
#[inline]
pub fn remap(x: f32, d0: f32, d1: f32, r0: f32, r1: f32) -> f32 {
    r0 + (x - d0) * (r1 - r0) / (d1 - d0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn remap_endpoints_and_midpoint() {
        assert_relative_eq!(remap(0.0, 0.0, 30.0, 100.0, 160.0), 100.0);
        assert_relative_eq!(remap(30.0, 0.0, 30.0, 100.0, 160.0), 160.0);
        assert_relative_eq!(remap(15.0, 0.0, 30.0, 100.0, 160.0), 130.0);
    }

    #[test]
    fn remap_extrapolates_outside_domain() {
        assert_relative_eq!(remap(2.0, 0.0, 1.0, 0.0, 10.0), 20.0);
    }

    #[test]
    fn domain_range_map_applies() {
        let m = DomainRangeMap::new(0.0, 1.0, -1.0, 1.0);
        assert_relative_eq!(m.apply(0.25), -0.5);
    }
}

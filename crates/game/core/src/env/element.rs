/// Elemental affinity tag.
///
/// Affinities form two strength relations: the cycle `G > B > R > G` and the
/// mutual pair `W <-> K`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// Red.
    R,
    /// Green.
    G,
    /// Blue.
    B,
    /// White.
    W,
    /// Black.
    K,
}

impl Element {
    /// The element this one is strong against.
    pub const fn strong_against(self) -> Element {
        match self {
            Element::G => Element::B,
            Element::B => Element::R,
            Element::R => Element::G,
            Element::W => Element::K,
            Element::K => Element::W,
        }
    }

    /// Multiplier for an action of element `self` hitting a target of `target`.
    ///
    /// Same element and "target strong against action" both resist; "action
    /// strong against target" is weak.
    pub fn rate_against(self, target: Element, resist: f64, weak: f64) -> f64 {
        if self == target {
            resist
        } else if self.strong_against() == target {
            weak
        } else if target.strong_against() == self {
            resist
        } else {
            1.0
        }
    }

    /// Product of [`Element::rate_against`] across every target element.
    pub fn rate_against_all(self, targets: &[Element], resist: f64, weak: f64) -> f64 {
        targets
            .iter()
            .map(|target| self.rate_against(*target, resist, weak))
            .product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_and_pair_rates() {
        assert_eq!(Element::G.rate_against(Element::B, 0.75, 1.25), 1.25);
        assert_eq!(Element::B.rate_against(Element::G, 0.75, 1.25), 0.75);
        assert_eq!(Element::R.rate_against(Element::R, 0.75, 1.25), 0.75);
        assert_eq!(Element::W.rate_against(Element::K, 0.75, 1.25), 1.25);
        // W and K are strong against each other; the action side wins.
        assert_eq!(Element::K.rate_against(Element::W, 0.75, 1.25), 1.25);
        assert_eq!(Element::R.rate_against(Element::W, 0.75, 1.25), 1.0);
    }

    #[test]
    fn rates_multiply_across_target_elements() {
        let rate = Element::G.rate_against_all(&[Element::B, Element::G], 0.75, 1.25);
        assert!((rate - 0.9375).abs() < 1e-9);
        assert_eq!(Element::G.rate_against_all(&[], 0.75, 1.25), 1.0);
    }
}

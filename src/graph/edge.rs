//! Defines the `Causality` edge payload, a directed "influences" relation.

/// The sign of a causal link, as drawn on a causal loop diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Both ends move in the same direction.
    Positive,
    /// The ends move in opposite directions.
    Negative,
}

/// Metadata carried by a causal edge.
///
/// The engine only uses edge direction; the polarity is for rendering and
/// loop analysis done by external collaborators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Causality {
    pub polarity: Option<Polarity>,
}

impl Causality {
    pub fn with_polarity(polarity: Polarity) -> Self {
        Self { polarity: Some(polarity) }
    }
}

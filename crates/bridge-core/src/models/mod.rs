//! Behavioral Rust models standing in for generated RTL.

/// Scratch register SoC with a one-shot memory fetch unit.
pub mod soc;
pub use soc::{
    ScratchpadSoc, FETCH_ADDR, FETCH_DATA, FETCH_STATUS, FETCH_STATUS_PENDING,
    FETCH_STATUS_VALID, SCRATCH_WORDS,
};

/// Union-find root walking accelerator.
pub mod union_find;
pub use union_find::UnionFindAccel;

/// Selects which reference model a server session instantiates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ModelKind {
    /// [`ScratchpadSoc`].
    #[default]
    Soc,
    /// [`UnionFindAccel`].
    UnionFind,
}

impl ModelKind {
    /// Every selectable model, in presentation order.
    pub const ALL: [Self; 2] = [Self::Soc, Self::UnionFind];

    /// Parses a command-line model name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns the command-line name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soc => "soc",
            Self::UnionFind => "union-find",
        }
    }
}

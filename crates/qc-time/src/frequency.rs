//! `Frequency` — how often payments or compounding events recur.

/// Event / payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Once (at maturity only).
    Once,
    /// Once per year.
    Annual,
    /// Twice per year.
    Semiannual,
    /// Four times per year.
    Quarterly,
    /// Twelve times per year.
    Monthly,
}

impl Frequency {
    /// Number of periods per year; zero for `Once`.
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Once => 0,
            Frequency::Annual => 1,
            Frequency::Semiannual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Frequency::Once => "Once",
            Frequency::Annual => "Annual",
            Frequency::Semiannual => "Semiannual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{s}")
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Cell text used for ranks the registry marks as unassigned.
pub const UNCLASSIFIED: &str = "Unclassified";

/// LPSN writes unassigned ranks as `<parent>-no-<rank>` style names.
pub const NO_RANK_MARKER: &str = "-no-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Domain,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
}

impl Rank {
    pub const ALL: [Rank; 6] = [
        Rank::Domain,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Domain => "Domain",
            Rank::Phylum => "Phylum",
            Rank::Class => "Class",
            Rank::Order => "Order",
            Rank::Family => "Family",
            Rank::Genus => "Genus",
        }
    }

    /// Column of the user taxon table that mirrors this rank, e.g. `Order(O)`.
    pub fn taxon_column(&self) -> String {
        let label = self.as_str();
        format!("{label}({})", &label[..1])
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRank(pub String);

impl FromStr for Rank {
    type Err = UnknownRank;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = capitalize(value.trim());
        Rank::ALL
            .into_iter()
            .find(|rank| rank.as_str() == normalized)
            .ok_or_else(|| UnknownRank(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaxonName {
    Named(String),
    Unclassified,
}

impl TaxonName {
    /// Reads a persisted cell. Empty cells carry no value.
    pub fn from_cell(value: &str) -> Option<Self> {
        match value {
            "" => None,
            UNCLASSIFIED => Some(TaxonName::Unclassified),
            other => Some(TaxonName::Named(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaxonName::Named(name) => name,
            TaxonName::Unclassified => UNCLASSIFIED,
        }
    }

    /// Folds the registry's `-no-` placeholders into [`TaxonName::Unclassified`].
    pub fn normalized(self) -> Self {
        match self {
            TaxonName::Named(name) if name.contains(NO_RANK_MARKER) => TaxonName::Unclassified,
            other => other,
        }
    }
}

impl fmt::Display for TaxonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tax-tree lineage. Entries keep the order their links appeared in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenusRecord {
    entries: Vec<(Rank, TaxonName)>,
}

impl GenusRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a rank, replacing any earlier value in place.
    pub fn insert(&mut self, rank: Rank, name: TaxonName) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == rank) {
            Some(entry) => entry.1 = name,
            None => self.entries.push((rank, name)),
        }
    }

    pub fn get(&self, rank: Rank) -> Option<&TaxonName> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == rank)
            .map(|(_, name)| name)
    }

    pub fn genus(&self) -> Option<&TaxonName> {
        self.get(Rank::Genus)
    }

    pub fn ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        self.entries.iter().map(|(rank, _)| *rank)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn normalized(self) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(rank, name)| (rank, name.normalized()))
                .collect(),
        }
    }
}

impl FromIterator<(Rank, TaxonName)> for GenusRecord {
    fn from_iter<I: IntoIterator<Item = (Rank, TaxonName)>>(iter: I) -> Self {
        let mut record = GenusRecord::new();
        for (rank, name) in iter {
            record.insert(rank, name);
        }
        record
    }
}

/// First character uppercased, the rest lowercased.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

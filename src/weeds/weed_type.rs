use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The species the classifier can tell apart, plus a sentinel for anything else.
///
/// The variant order of the named species is the output order of the classification network,
/// see [`WeedType::CLASS_NAMES`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeedType {
    YuyoColorado,
    RamaNegra,
    Roseta,
    Cardo,
    Ortiga,
    DienteLeon,
    PastoGuinea,
    TrebolBlanco,
    Unknown,
}

impl WeedType {
    /// Model output index to class. Index 0 is the species the simulated path favours.
    pub const CLASS_NAMES: [WeedType; 8] = [
        WeedType::YuyoColorado,
        WeedType::RamaNegra,
        WeedType::Roseta,
        WeedType::Cardo,
        WeedType::Ortiga,
        WeedType::DienteLeon,
        WeedType::PastoGuinea,
        WeedType::TrebolBlanco,
    ];

    /// Number of classes the networks predict.
    pub const NUM_CLASSES: usize = Self::CLASS_NAMES.len();

    /// Every variant, sentinel included.
    pub const ALL: [WeedType; 9] = [
        WeedType::YuyoColorado,
        WeedType::RamaNegra,
        WeedType::Roseta,
        WeedType::Cardo,
        WeedType::Ortiga,
        WeedType::DienteLeon,
        WeedType::PastoGuinea,
        WeedType::TrebolBlanco,
        WeedType::Unknown,
    ];

    /// Maps a network output index to its class, [`WeedType::Unknown`] when out of range.
    pub fn from_class_index(index: usize) -> WeedType {
        Self::CLASS_NAMES
            .get(index)
            .copied()
            .unwrap_or(WeedType::Unknown)
    }

    pub fn class_index(&self) -> Option<usize> {
        Self::CLASS_NAMES.iter().position(|t| t == self)
    }

    pub fn scientific_name(&self) -> &'static str {
        match self {
            WeedType::YuyoColorado => "Amaranthus quitensis",
            WeedType::RamaNegra => "Conyza bonariensis",
            WeedType::Roseta => "Cenchrus insertus",
            WeedType::Cardo => "Carduus acanthoides",
            WeedType::Ortiga => "Urtica urens",
            WeedType::DienteLeon => "Taraxacum officinale",
            WeedType::PastoGuinea => "Megathyrsus maximus",
            WeedType::TrebolBlanco => "Trifolium repens",
            WeedType::Unknown => "Unknown",
        }
    }

    pub fn common_name(&self) -> &'static str {
        match self {
            WeedType::YuyoColorado => "Yuyo Colorado",
            WeedType::RamaNegra => "Rama Negra",
            WeedType::Roseta => "Roseta",
            WeedType::Cardo => "Cardo",
            WeedType::Ortiga => "Ortiga",
            WeedType::DienteLeon => "Diente de León",
            WeedType::PastoGuinea => "Pasto Guinea",
            WeedType::TrebolBlanco => "Trébol Blanco",
            WeedType::Unknown => "Unknown",
        }
    }

    /// Display label, e.g. "Amaranthus quitensis (Yuyo Colorado)".
    pub fn label(&self) -> String {
        match self {
            WeedType::Unknown => "Unknown".to_string(),
            other => format!("{} ({})", other.scientific_name(), other.common_name()),
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            WeedType::YuyoColorado => "yuyo_colorado",
            WeedType::RamaNegra => "rama_negra",
            WeedType::Roseta => "roseta",
            WeedType::Cardo => "cardo",
            WeedType::Ortiga => "ortiga",
            WeedType::DienteLeon => "diente_leon",
            WeedType::PastoGuinea => "pasto_guinea",
            WeedType::TrebolBlanco => "trebol_blanco",
            WeedType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for WeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for WeedType {
    type Err = String;

    /// Accepts the slug, the common name, the scientific name or the full label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        WeedType::ALL
            .into_iter()
            .find(|t| {
                [
                    t.slug().to_string(),
                    t.common_name().to_lowercase().replace(' ', "_"),
                    t.scientific_name().to_lowercase().replace(' ', "_"),
                    t.label().to_lowercase().replace(' ', "_"),
                ]
                .contains(&wanted)
            })
            .ok_or_else(|| format!("Unrecognized weed type: {}", s))
    }
}

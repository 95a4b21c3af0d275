use crate::weeds::weed_type::WeedType;
use serde::Serialize;

/// Descriptive record for a species, as shown on the detection and article pages.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeedInfo {
    pub scientific_name: &'static str,
    pub common_name: &'static str,
    pub description: &'static str,
    pub characteristics: &'static [&'static str],
    pub control_methods: &'static [&'static str],
    pub distribution: &'static str,
    pub images: &'static [&'static str],
}

impl WeedInfo {
    pub fn is_placeholder(&self) -> bool {
        *self == UNKNOWN_INFO
    }
}

static UNKNOWN_INFO: WeedInfo = WeedInfo {
    scientific_name: "Unknown",
    common_name: "Unknown",
    description: "Information not available for this species.",
    characteristics: &[],
    control_methods: &[],
    distribution: "Unknown",
    images: &[],
};

static YUYO_COLORADO: WeedInfo = WeedInfo {
    scientific_name: "Amaranthus quitensis",
    common_name: "Yuyo Colorado",
    description: "Fast-growing annual plant that competes aggressively with summer crops such \
        as soybean and maize. Populations resistant to several herbicide families are common.",
    characteristics: &[
        "Fast-growing annual plant",
        "Oval leaves with smooth margins",
        "Sturdy reddish stems",
        "Dense terminal inflorescences",
    ],
    control_methods: &[
        "Mechanical control at early growth stages",
        "Directed glyphosate applications where populations are still susceptible",
        "Pre-emergent herbicides combined with crop rotation",
    ],
    distribution: "Native to South America, widespread across the crop belts of Argentina, \
        Bolivia and southern Brazil.",
    images: &[
        "/images/weeds/yuyo-colorado-1.jpg",
        "/images/weeds/yuyo-colorado-2.jpg",
    ],
};

static RAMA_NEGRA: WeedInfo = WeedInfo {
    scientific_name: "Conyza bonariensis",
    common_name: "Rama Negra",
    description: "Annual or biennial composite that germinates from autumn to spring and \
        tolerates no-till systems. Many populations are resistant to glyphosate.",
    characteristics: &[
        "Annual or biennial plant",
        "Alternate, lanceolate and pubescent leaves",
        "Panicle-shaped inflorescences",
    ],
    control_methods: &[
        "Herbicide application at early rosette stage",
        "Mixtures of active ingredients with different modes of action",
        "Winter cover crops to suppress emergence",
    ],
    distribution: "Native to South America, now present in temperate regions of America, \
        Europe and Oceania.",
    images: &["/images/weeds/rama-negra-1.jpg", "/images/weeds/rama-negra-2.jpg"],
};

static ROSETA: WeedInfo = WeedInfo {
    scientific_name: "Cenchrus insertus",
    common_name: "Roseta",
    description: "Annual grass with creeping growth whose spiny burs cling to fur, clothing \
        and machinery, lowering the value of wool and forage.",
    characteristics: &[
        "Annual plant with creeping growth",
        "Burs covered in small spines",
        "Seeds that adhere to animals and equipment",
    ],
    control_methods: &[
        "Mechanical control before flowering",
        "Pre-emergent herbicides",
        "Cleaning of machinery to stop seed dispersal",
    ],
    distribution: "Sandy soils of central and southern America, frequent in the semi-arid \
        pampas.",
    images: &["/images/weeds/roseta-1.jpg", "/images/weeds/roseta-2.jpg"],
};

static CARDO: WeedInfo = WeedInfo {
    scientific_name: "Carduus acanthoides",
    common_name: "Cardo",
    description: "Spiny biennial thistle forming rosettes in the first year and tall \
        flowering stems in the second. Invades pastures and field margins.",
    characteristics: &[
        "Biennial plant with a basal rosette",
        "Deeply lobed leaves ending in spines",
        "Purple flower heads",
    ],
    control_methods: &[
        "Mowing before seed set",
        "Hormonal herbicides applied to rosettes",
        "Grazing management to keep a dense pasture cover",
    ],
    distribution: "Native to Europe, naturalized in America, particularly in the Argentine \
        pampas.",
    images: &["/images/weeds/cardo-1.jpg", "/images/weeds/cardo-2.jpg"],
};

static ORTIGA: WeedInfo = WeedInfo {
    scientific_name: "Urtica urens",
    common_name: "Ortiga",
    description: "Small annual nettle with stinging hairs, common in nitrogen-rich soils of \
        gardens, orchards and winter crops.",
    characteristics: &[
        "Annual plant up to 60 cm tall",
        "Opposite serrated leaves",
        "Stinging hairs on stems and leaves",
    ],
    control_methods: &[
        "Hand weeding with protective gloves",
        "Mulching to prevent germination",
        "Post-emergent broadleaf herbicides",
    ],
    distribution: "Cosmopolitan, present across Europe, Asia and America.",
    images: &["/images/weeds/ortiga-1.jpg", "/images/weeds/ortiga-2.jpg"],
};

static DIENTE_LEON: WeedInfo = WeedInfo {
    scientific_name: "Taraxacum officinale",
    common_name: "Diente de León",
    description: "Perennial with a deep taproot and a basal rosette, spreading by wind-borne \
        seeds. Common in lawns, pastures and no-till fields.",
    characteristics: &[
        "Perennial plant with a deep taproot",
        "Toothed leaves in a basal rosette",
        "Yellow flower heads followed by spherical seed heads",
    ],
    control_methods: &[
        "Removal of the whole taproot",
        "Selective broadleaf herbicides in autumn",
        "Dense turf or pasture to limit establishment",
    ],
    distribution: "Native to Eurasia, naturalized throughout temperate America.",
    images: &[
        "/images/weeds/diente-leon-1.jpg",
        "/images/weeds/diente-leon-2.jpg",
    ],
};

static PASTO_GUINEA: WeedInfo = WeedInfo {
    scientific_name: "Megathyrsus maximus",
    common_name: "Pasto Guinea",
    description: "Tall perennial bunch grass used as forage that escapes into sugarcane, \
        citrus and field margins where it is hard to eradicate.",
    characteristics: &[
        "Perennial grass forming large tussocks",
        "Long, wide leaf blades",
        "Open panicle inflorescences",
    ],
    control_methods: &[
        "Repeated tillage to exhaust rhizome reserves",
        "Graminicide herbicides on actively growing plants",
        "Shading with competitive crops",
    ],
    distribution: "Native to Africa, widely naturalized in tropical and subtropical America.",
    images: &[
        "/images/weeds/pasto-guinea-1.jpg",
        "/images/weeds/pasto-guinea-2.jpg",
    ],
};

static TREBOL_BLANCO: WeedInfo = WeedInfo {
    scientific_name: "Trifolium repens",
    common_name: "Trébol Blanco",
    description: "Creeping perennial legume rooting at the nodes. Valued in pastures but a \
        weed in lawns and horticultural beds.",
    characteristics: &[
        "Creeping stolons rooting at the nodes",
        "Trifoliate leaves, often with a pale chevron",
        "White globular flower heads",
    ],
    control_methods: &[
        "Nitrogen fertilization to favour grasses",
        "Selective broadleaf herbicides",
        "Manual removal of stolons in small areas",
    ],
    distribution: "Native to Europe and western Asia, naturalized across America.",
    images: &[
        "/images/weeds/trebol-blanco-1.jpg",
        "/images/weeds/trebol-blanco-2.jpg",
    ],
};

/// Looks up the static record for a species.
///
/// The sentinel [`WeedType::Unknown`] maps to a placeholder with empty lists.
pub fn get_weed_info(weed_type: WeedType) -> &'static WeedInfo {
    match weed_type {
        WeedType::YuyoColorado => &YUYO_COLORADO,
        WeedType::RamaNegra => &RAMA_NEGRA,
        WeedType::Roseta => &ROSETA,
        WeedType::Cardo => &CARDO,
        WeedType::Ortiga => &ORTIGA,
        WeedType::DienteLeon => &DIENTE_LEON,
        WeedType::PastoGuinea => &PASTO_GUINEA,
        WeedType::TrebolBlanco => &TREBOL_BLANCO,
        WeedType::Unknown => &UNKNOWN_INFO,
    }
}

/// The short control recommendation printed under a detection result.
pub fn control_recommendation(weed_type: WeedType) -> &'static str {
    match weed_type {
        WeedType::YuyoColorado => {
            "This species is resistant to several herbicides. Mechanical control at early \
            stages or targeted herbicides such as directed glyphosate applications are \
            recommended."
        }
        WeedType::RamaNegra => {
            "This species has developed resistance to glyphosate. Apply herbicides at early \
            development stages and use mixtures of active ingredients for better control."
        }
        WeedType::Roseta => {
            "Mechanical control and pre-emergent herbicides are recommended. Control it \
            before flowering to prevent seed dispersal."
        }
        WeedType::Unknown => {
            "Consult a specialist for recommendations specific to this species."
        }
        other => get_weed_info(other)
            .control_methods
            .first()
            .copied()
            .unwrap_or("Consult a specialist for recommendations specific to this species."),
    }
}

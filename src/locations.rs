//! Static province → district hierarchy and name resolution

use tracing::debug;

use crate::error::WeatherError;

/// A province and its districts, in declaration order
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub name: &'static str,
    pub districts: &'static [&'static str],
}

impl Region {
    pub fn contains_district(&self, district: &str) -> bool {
        self.districts.contains(&district)
    }
}

/// Read-only location hierarchy: one primary region plus the declared region list
#[derive(Debug, Clone, Copy)]
pub struct LocationIndex {
    primary: Region,
    regions: &'static [Region],
}

impl LocationIndex {
    pub const fn new(primary: Region, regions: &'static [Region]) -> Self {
        Self { primary, regions }
    }

    pub fn primary(&self) -> &Region {
        &self.primary
    }

    pub fn regions(&self) -> &'static [Region] {
        self.regions
    }

    /// Exact, case-sensitive region lookup
    pub fn region(&self, name: &str) -> Option<&'static Region> {
        self.regions.iter().find(|region| region.name == name)
    }
}

/// Canonical location produced by [`LocationIndex::resolve`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKey {
    District { name: String, region: String },
    RegionOnly { region: String },
}

impl LocationKey {
    /// Display label: `"District, Region"` or the bare region name
    pub fn label(&self) -> String {
        match self {
            Self::District { name, region } => format!("{name}, {region}"),
            Self::RegionOnly { region } => region.clone(),
        }
    }

    pub fn region(&self) -> &str {
        match self {
            Self::District { region, .. } | Self::RegionOnly { region } => region,
        }
    }
}

impl LocationIndex {
    /// Canonicalize free text to a known district or region.
    ///
    /// Checks, in order: primary-region district, region name, then the
    /// segment before the first comma against each region's districts in
    /// declaration order. First match wins. Only surrounding whitespace is
    /// ignored.
    pub fn resolve(&self, text: &str) -> Result<LocationKey, WeatherError> {
        let text = text.trim();

        if self.primary.contains_district(text) {
            return Ok(LocationKey::District {
                name: text.to_string(),
                region: self.primary.name.to_string(),
            });
        }

        if let Some(region) = self.region(text) {
            return Ok(LocationKey::RegionOnly {
                region: region.name.to_string(),
            });
        }

        let segment = text.split(',').next().unwrap_or(text).trim();
        for region in self.regions {
            if region.contains_district(segment) {
                debug!("Resolved '{}' to district of {}", text, region.name);
                return Ok(LocationKey::District {
                    name: segment.to_string(),
                    region: region.name.to_string(),
                });
            }
        }

        Err(WeatherError::location_not_found(format!(
            "no region or district named '{text}'"
        )))
    }
}

pub const BANGKOK: Region = Region {
    name: "Bangkok",
    districts: &[
        "Bang Rak",
        "Pathum Wan",
        "Sathon",
        "Bangkok Noi",
        "Bangkok Yai",
        "Din Daeng",
        "Huai Khwang",
        "Phra Nakhon",
        "Pom Prap Sattru Phai",
        "Samphanthawong",
        "Phaya Thai",
        "Ratchathewi",
        "Bang Sue",
        "Dusit",
        "Chatuchak",
        "Lat Phrao",
        "Lak Si",
        "Don Mueang",
        "Sai Mai",
        "Bang Khen",
        "Min Buri",
        "Khlong Sam Wa",
        "Nong Chok",
        "Lat Krabang",
        "Prawet",
        "Suan Luang",
        "Khan Na Yao",
        "Bang Kapi",
        "Wang Thonglang",
        "Bueng Kum",
        "Saphan Sung",
        "Bang Na",
        "Phra Khanong",
        "Watthana",
        "Khlong Toei",
        "Yan Nawa",
        "Bang Kho Laem",
        "Thon Buri",
        "Khlong San",
        "Chom Thong",
        "Rat Burana",
        "Thung Khru",
        "Bang Khun Thian",
        "Bang Bon",
        "Bang Khae",
        "Phasi Charoen",
        "Nong Khaem",
        "Taling Chan",
        "Thawi Watthana",
    ],
};

const REGIONS: &[Region] = &[
    Region {
        name: "Samut Prakan",
        districts: &[
            "Mueang Samut Prakan",
            "Phra Pradaeng",
            "Phra Samut Chedi",
            "Bang Bo",
            "Bang Phli",
            "Bang Sao Thong",
        ],
    },
    Region {
        name: "Nonthaburi",
        districts: &[
            "Mueang Nonthaburi",
            "Bang Kruai",
            "Bang Yai",
            "Bang Bua Thong",
            "Sai Noi",
            "Pak Kret",
        ],
    },
    Region {
        name: "Pathum Thani",
        districts: &[
            "Mueang Pathum Thani",
            "Khlong Luang",
            "Thanyaburi",
            "Lam Luk Ka",
            "Lat Lum Kaeo",
            "Sam Khok",
            "Nong Suea",
        ],
    },
    Region {
        name: "Samut Sakhon",
        districts: &["Mueang Samut Sakhon", "Krathum Baen", "Ban Phaeo"],
    },
    Region {
        name: "Nakhon Pathom",
        districts: &[
            "Mueang Nakhon Pathom",
            "Kamphaeng Saen",
            "Nakhon Chai Si",
            "Don Tum",
            "Bang Len",
            "Sam Phran",
            "Phutthamonthon",
        ],
    },
    BANGKOK,
];

/// Bangkok and its five neighbouring provinces
pub static BANGKOK_METRO: LocationIndex = LocationIndex::new(BANGKOK, REGIONS);

//! Static vehicle category catalog.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::i18n::{Language, Localized};

/// Shortest tenure offered for any category, in months.
pub const MIN_TENURE_MONTHS: u32 = 12;
/// Tenure values move in half-year steps.
pub const TENURE_STEP_MONTHS: u32 = 6;
pub const DEFAULT_TENURE_MONTHS: u32 = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryId {
    ThreeWheeler,
    CarPrivate,
    Van,
    Commercial,
    MotorLorry,
    PassengerBus,
}

impl CategoryId {
    pub fn slug(self) -> &'static str {
        match self {
            CategoryId::ThreeWheeler => "three-wheeler",
            CategoryId::CarPrivate => "car-private",
            CategoryId::Van => "van",
            CategoryId::Commercial => "commercial",
            CategoryId::MotorLorry => "motor-lorry",
            CategoryId::PassengerBus => "passenger-bus",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        CATALOG
            .iter()
            .map(|category| category.id)
            .find(|id| id.slug().eq_ignore_ascii_case(slug.trim()))
    }

    pub fn category(self) -> &'static VehicleCategory {
        get(self)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.category().name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Registered,
    Unregistered,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 2] =
        [RegistrationStatus::Registered, RegistrationStatus::Unregistered];

    pub fn as_str(self) -> &'static str {
        self.label(Language::English)
    }

    pub fn label(self, language: Language) -> &'static str {
        let label = match self {
            RegistrationStatus::Registered => Localized::new("Registered", "ලියාපදිංචි"),
            RegistrationStatus::Unregistered => {
                Localized::new("Unregistered", "ලියාපදිංචි නොකළ")
            }
        };
        label.get(language)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle type offered after the registration status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trim {
    Normal,
    Luxury,
}

impl Trim {
    pub const ALL: [Trim; 2] = [Trim::Normal, Trim::Luxury];

    pub fn as_str(self) -> &'static str {
        self.label(Language::English)
    }

    pub fn label(self, language: Language) -> &'static str {
        let label = match self {
            Trim::Normal => Localized::new("Normal", "සාමාන්‍ය"),
            Trim::Luxury => Localized::new("Luxury", "සුඛෝපභෝගී"),
        };
        label.get(language)
    }
}

impl fmt::Display for Trim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleCategory {
    pub id: CategoryId,
    /// English name, used in the email and the logs.
    pub name: &'static str,
    pub display: Localized,
    pub icon: &'static str,
    pub max_tenure_months: u32,
    pub has_subcategory: bool,
    /// Make and model (and the photo upload) are only asked for when set.
    pub requires_make_model: bool,
    pub image: &'static str,
}

impl VehicleCategory {
    pub fn label(&self, language: Language) -> &'static str {
        self.display.get(language)
    }

    pub fn tenure_options(&self) -> Vec<u32> {
        (MIN_TENURE_MONTHS..=self.max_tenure_months)
            .step_by(TENURE_STEP_MONTHS as usize)
            .collect()
    }

    pub fn default_tenure(&self) -> u32 {
        DEFAULT_TENURE_MONTHS.min(self.max_tenure_months)
    }

    pub fn accepts_tenure(&self, months: u32) -> bool {
        (MIN_TENURE_MONTHS..=self.max_tenure_months).contains(&months)
            && (months - MIN_TENURE_MONTHS) % TENURE_STEP_MONTHS == 0
    }
}

static CATALOG: [VehicleCategory; 6] = [
    VehicleCategory {
        id: CategoryId::ThreeWheeler,
        name: "Three Wheeler",
        display: Localized::new("Three Wheeler", "ත්‍රී වීලර්"),
        icon: "🛺",
        max_tenure_months: 60,
        has_subcategory: false,
        requires_make_model: false,
        image: "threewheeler.png",
    },
    VehicleCategory {
        id: CategoryId::CarPrivate,
        name: "Car and Private Vehicles",
        display: Localized::new("Car and Private Vehicles", "කාර් සහ පුද්ගලික වාහන"),
        icon: "🚗",
        max_tenure_months: 84,
        has_subcategory: true,
        requires_make_model: true,
        image: "personal1.png",
    },
    VehicleCategory {
        id: CategoryId::Van,
        name: "Van",
        display: Localized::new("Van", "වෑන්"),
        icon: "🚐",
        max_tenure_months: 72,
        has_subcategory: true,
        requires_make_model: true,
        image: "van.png",
    },
    VehicleCategory {
        id: CategoryId::Commercial,
        name: "Commercial Vehicles",
        display: Localized::new("Commercial Vehicles", "වාණිජ වාහන"),
        icon: "🚙",
        max_tenure_months: 72,
        has_subcategory: true,
        requires_make_model: true,
        image: "commercial1.png",
    },
    VehicleCategory {
        id: CategoryId::MotorLorry,
        name: "Motor Lorry",
        display: Localized::new("Motor Lorry", "ලොරි රථ"),
        icon: "🚚",
        max_tenure_months: 60,
        has_subcategory: true,
        requires_make_model: true,
        image: "lorry.png",
    },
    VehicleCategory {
        id: CategoryId::PassengerBus,
        name: "Passenger Bus",
        display: Localized::new("Passenger Bus", "මගී බස්"),
        icon: "🚌",
        max_tenure_months: 60,
        has_subcategory: true,
        requires_make_model: true,
        image: "bus.png",
    },
];

/// All categories in display order.
pub fn categories() -> &'static [VehicleCategory] {
    &CATALOG
}

pub fn get(id: CategoryId) -> &'static VehicleCategory {
    CATALOG
        .iter()
        .find(|category| category.id == id)
        .unwrap_or_else(|| unreachable!("every CategoryId has a catalog entry"))
}

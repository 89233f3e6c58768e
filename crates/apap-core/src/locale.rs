use std::{fmt, str::FromStr};

/// PA-API storefronts, one per supported region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marketplace {
    Australia,
    Brazil,
    Canada,
    France,
    Germany,
    India,
    Italy,
    Japan,
    Mexico,
    Spain,
    Turkey,
    UnitedArabEmirates,
    UnitedKingdom,
    UnitedStates,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown locale {0:?}")]
pub struct UnknownLocale(pub String);

impl Marketplace {
    pub const ALL: [Marketplace; 14] = [
        Marketplace::Australia,
        Marketplace::Brazil,
        Marketplace::Canada,
        Marketplace::France,
        Marketplace::Germany,
        Marketplace::India,
        Marketplace::Italy,
        Marketplace::Japan,
        Marketplace::Mexico,
        Marketplace::Spain,
        Marketplace::Turkey,
        Marketplace::UnitedArabEmirates,
        Marketplace::UnitedKingdom,
        Marketplace::UnitedStates,
    ];

    /// Exact, case-sensitive lookup by configuration name.
    pub fn resolve(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Configuration name, e.g. `UnitedKingdom`.
    pub fn name(self) -> &'static str {
        match self {
            Marketplace::Australia => "Australia",
            Marketplace::Brazil => "Brazil",
            Marketplace::Canada => "Canada",
            Marketplace::France => "France",
            Marketplace::Germany => "Germany",
            Marketplace::India => "India",
            Marketplace::Italy => "Italy",
            Marketplace::Japan => "Japan",
            Marketplace::Mexico => "Mexico",
            Marketplace::Spain => "Spain",
            Marketplace::Turkey => "Turkey",
            Marketplace::UnitedArabEmirates => "UnitedArabEmirates",
            Marketplace::UnitedKingdom => "UnitedKingdom",
            Marketplace::UnitedStates => "UnitedStates",
        }
    }

    /// Storefront domain sent as the `Marketplace` request field.
    pub fn domain(self) -> &'static str {
        match self {
            Marketplace::Australia => "www.amazon.com.au",
            Marketplace::Brazil => "www.amazon.com.br",
            Marketplace::Canada => "www.amazon.ca",
            Marketplace::France => "www.amazon.fr",
            Marketplace::Germany => "www.amazon.de",
            Marketplace::India => "www.amazon.in",
            Marketplace::Italy => "www.amazon.it",
            Marketplace::Japan => "www.amazon.co.jp",
            Marketplace::Mexico => "www.amazon.com.mx",
            Marketplace::Spain => "www.amazon.es",
            Marketplace::Turkey => "www.amazon.com.tr",
            Marketplace::UnitedArabEmirates => "www.amazon.ae",
            Marketplace::UnitedKingdom => "www.amazon.co.uk",
            Marketplace::UnitedStates => "www.amazon.com",
        }
    }

    /// PA-API endpoint host.
    pub fn host(self) -> &'static str {
        match self {
            Marketplace::Australia => "webservices.amazon.com.au",
            Marketplace::Brazil => "webservices.amazon.com.br",
            Marketplace::Canada => "webservices.amazon.ca",
            Marketplace::France => "webservices.amazon.fr",
            Marketplace::Germany => "webservices.amazon.de",
            Marketplace::India => "webservices.amazon.in",
            Marketplace::Italy => "webservices.amazon.it",
            Marketplace::Japan => "webservices.amazon.co.jp",
            Marketplace::Mexico => "webservices.amazon.com.mx",
            Marketplace::Spain => "webservices.amazon.es",
            Marketplace::Turkey => "webservices.amazon.com.tr",
            Marketplace::UnitedArabEmirates => "webservices.amazon.ae",
            Marketplace::UnitedKingdom => "webservices.amazon.co.uk",
            Marketplace::UnitedStates => "webservices.amazon.com",
        }
    }

    /// AWS region used in the signing scope.
    pub fn region(self) -> &'static str {
        match self {
            Marketplace::Australia | Marketplace::Japan => "us-west-2",
            Marketplace::Brazil
            | Marketplace::Canada
            | Marketplace::Mexico
            | Marketplace::UnitedStates => "us-east-1",
            Marketplace::France
            | Marketplace::Germany
            | Marketplace::India
            | Marketplace::Italy
            | Marketplace::Spain
            | Marketplace::Turkey
            | Marketplace::UnitedArabEmirates
            | Marketplace::UnitedKingdom => "eu-west-1",
        }
    }
}

impl FromStr for Marketplace {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! Embedded ticker universes and sector maps.
//!
//! Lists are bare exchange codes; the resolver appends the market suffix.

/// SET50 constituents (Stock Exchange of Thailand).
pub const SET50: &[&str] = &[
    "ADVANC", "AOT", "AWC", "BANPU", "BBL", "BDMS", "BEM", "BGRIM", "BH", "BTS", "CBG", "CENTEL",
    "COM7", "CPALL", "CPF", "CPN", "DELTA", "EA", "EGCO", "GLOBAL", "GPSC", "GULF", "HMPRO",
    "INTUCH", "IVL", "KBANK", "KCE", "KTB", "KTC", "LH", "MINT", "MTC", "OR", "OSP", "PTT",
    "PTTEP", "PTTGC", "RATCH", "SAWAD", "SCB", "SCC", "SCGP", "TISCO", "TOP", "TRUE", "TTB", "TU",
    "WHA",
];

/// Constituents of SET100 that are not in SET50.
pub const SET100_EXTRA: &[&str] = &[
    "AMATA", "AP", "BAM", "BCH", "BCP", "BCPG", "BYD", "CK", "CKP", "DOHOME", "EPG", "ERW", "ESSO",
    "FORTH", "GUNKUL", "HANA", "JMART", "JMT", "KEX", "KKP", "MAJOR", "MEGA", "ONEE", "ORI",
    "PLANB", "PRM", "PTG", "QH", "RBF", "RCL", "S", "SABUY", "SINGER", "SIRI", "SPALI", "SPRC",
    "STA", "STARK", "STEC", "STGT", "TASCO", "THANI", "TIPH", "TQM", "VGI", "WHAUP",
];

/// Listed software-as-a-service companies, the usual Rule of 40 peer group.
pub const SAAS: &[&str] = &[
    "CRM", "NOW", "ADBE", "INTU", "WDAY", "SNOW", "DDOG", "CRWD", "ZS", "NET", "MDB", "TEAM",
    "HUBS", "OKTA", "DOCU", "ZM", "SHOP", "TWLO", "PANW", "FTNT",
];

/// US large caps grouped by sector.
pub const US_SECTORS: &[(&str, &[&str])] = &[
    (
        "Technology",
        &["AAPL", "MSFT", "NVDA", "GOOGL", "META", "AVGO", "ORCL", "ADBE", "CRM", "AMD"],
    ),
    (
        "Healthcare",
        &["JNJ", "UNH", "LLY", "PFE", "MRK", "ABBV", "TMO", "ABT"],
    ),
    (
        "Financials",
        &["JPM", "BAC", "WFC", "GS", "MS", "V", "MA", "AXP"],
    ),
    (
        "Consumer",
        &["AMZN", "TSLA", "HD", "MCD", "NKE", "SBUX", "COST", "WMT"],
    ),
    ("Energy", &["XOM", "CVX", "COP", "SLB", "EOG"]),
    ("Industrials", &["CAT", "HON", "GE", "UNP", "DE", "LMT"]),
];

/// SaaS names grouped by segment, for the Rule of 40 profile.
pub const SAAS_SECTORS: &[(&str, &[&str])] = &[
    ("Applications", &["CRM", "NOW", "ADBE", "INTU", "WDAY", "HUBS", "DOCU", "ZM"]),
    ("Data", &["SNOW", "DDOG", "MDB", "TEAM"]),
    ("Security", &["CRWD", "ZS", "NET", "OKTA", "PANW", "FTNT"]),
    ("Commerce", &["SHOP", "TWLO"]),
];

/// SET100 constituents: SET50 followed by the rest of the index.
#[must_use]
pub fn set100() -> Vec<&'static str> {
    SET50.iter().chain(SET100_EXTRA).copied().collect()
}

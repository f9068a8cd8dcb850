/// Column names
pub const STATE_COLUMN: &str = "State";
pub const DATE_COLUMN: &str = "Date Local";

/// File names
pub const DEFAULT_DATASET_FILE: &str = "pollution_us_2000_2016.csv";
pub const DEFAULT_CONFIG_FILE: &str = "us-aqi-processor.toml";

/// Environment prefix for settings overrides (e.g. US_AQI_TREND_POLLUTANT)
pub const ENV_PREFIX: &str = "US_AQI";

/// Rows from outside the US present in the EPA dataset
pub const DEFAULT_EXCLUDED_STATES: &[&str] = &["Country Of Mexico"];

/// Accepted `Date Local` formats, tried in order
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// AQI scale bounds
pub const MIN_VALID_AQI: f64 = 0.0;
pub const MAX_VALID_AQI: f64 = 500.0;

/// Processing defaults
pub const DEFAULT_RANKING_LIMIT: usize = 5;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
pub const PROGRESS_UPDATE_INTERVAL: u64 = 50_000;
pub const MAX_REPORTED_VIOLATIONS: usize = 100;

/// Full state name to postal abbreviation: the 50 states plus DC
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("District Of Columbia", "DC"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

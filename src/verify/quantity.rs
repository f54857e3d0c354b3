//! Quantity vocabulary: aggregate words and unit families
//!
//! A family groups unit strings that measure the same quantity. Family
//! membership only decides which Units are considered; comparability is
//! still an exact unit-string match, and no conversion is ever done.

use std::sync::OnceLock;

use regex::Regex;

use super::question::normalize;

/// Requested aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Max,
    Min,
}

const MAX_WORDS: &[&str] = &["max", "maximum", "highest", "largest", "peak", "greatest", "upper"];
const MIN_WORDS: &[&str] = &["min", "minimum", "lowest", "smallest", "least", "lower"];

impl Aggregate {
    pub fn from_token(token: &str) -> Option<Self> {
        if MAX_WORDS.contains(&token) {
            Some(Aggregate::Max)
        } else if MIN_WORDS.contains(&token) {
            Some(Aggregate::Min)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregate::Max => "max",
            Aggregate::Min => "min",
        }
    }
}

/// First aggregate word in the question
pub fn detect_aggregate(tokens: &[String]) -> Option<Aggregate> {
    tokens.iter().find_map(|t| Aggregate::from_token(t))
}

/// Physical quantity families recognized in questions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityFamily {
    Voltage,
    Current,
    Capacity,
    Resistance,
    Power,
    Frequency,
    Temperature,
    Time,
}

impl QuantityFamily {
    pub const ALL: [QuantityFamily; 8] = [
        QuantityFamily::Voltage,
        QuantityFamily::Current,
        QuantityFamily::Capacity,
        QuantityFamily::Resistance,
        QuantityFamily::Power,
        QuantityFamily::Frequency,
        QuantityFamily::Temperature,
        QuantityFamily::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuantityFamily::Voltage => "voltage",
            QuantityFamily::Current => "current",
            QuantityFamily::Capacity => "capacity",
            QuantityFamily::Resistance => "resistance",
            QuantityFamily::Power => "power",
            QuantityFamily::Frequency => "frequency",
            QuantityFamily::Temperature => "temperature",
            QuantityFamily::Time => "time",
        }
    }

    /// Question tokens naming this family.
    ///
    /// Single-letter symbols that double as English words ("a", "s") are left out.
    fn question_tokens(&self) -> &'static [&'static str] {
        match self {
            QuantityFamily::Voltage => &["voltage", "voltages", "volt", "volts", "v", "mv", "kv"],
            QuantityFamily::Current => &[
                "current", "currents", "amp", "amps", "ampere", "amperes", "amperage", "ma", "µa",
                "μa", "ua",
            ],
            QuantityFamily::Capacity => &["capacity", "mah", "ah", "wh", "mwh"],
            QuantityFamily::Resistance => &["resistance", "impedance", "ohm", "ohms", "ω", "kω"],
            QuantityFamily::Power => &["power", "watt", "watts", "wattage", "mw", "kw"],
            QuantityFamily::Frequency => &["frequency", "freq", "hz", "khz", "mhz", "ghz"],
            QuantityFamily::Temperature => &["temperature", "temp", "celsius"],
            QuantityFamily::Time => &["time", "duration", "delay", "ms", "µs", "μs", "us", "ns"],
        }
    }

    /// Normalized unit strings belonging to this family
    fn unit_aliases(&self) -> &'static [&'static str] {
        match self {
            QuantityFamily::Voltage => &["v", "mv", "kv", "µv", "μv", "uv", "volt", "volts"],
            QuantityFamily::Current => &["a", "ma", "µa", "μa", "ua", "na", "amp", "amps", "ampere"],
            QuantityFamily::Capacity => &["mah", "ah", "wh", "mwh", "kwh"],
            QuantityFamily::Resistance => &["ω", "kω", "mω", "ohm", "ohms", "kohm", "mohm"],
            QuantityFamily::Power => &["w", "mw", "kw", "watt", "watts"],
            QuantityFamily::Frequency => &["hz", "khz", "mhz", "ghz"],
            QuantityFamily::Temperature => &["c", "f", "k", "celsius"],
            QuantityFamily::Time => &["s", "ms", "µs", "μs", "us", "ns", "sec", "min", "h"],
        }
    }

    /// True if this token names any family
    pub fn is_family_token(token: &str) -> bool {
        Self::ALL.iter().any(|f| f.question_tokens().contains(&token))
    }

    /// True if the unit string belongs to this family
    pub fn matches_unit(&self, unit_of_measure: &str) -> bool {
        let normalized = normalize(unit_of_measure);
        self.unit_aliases().contains(&normalized.as_str())
    }

    /// Family a unit string belongs to, if any
    pub fn of_unit(unit_of_measure: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.matches_unit(unit_of_measure))
    }
}

fn embedded_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[^0-9A-Za-z.])([-+]?[0-9]+(?:\.[0-9]+)?)\s*(°?[A-Za-zµμΩω]+)\b")
            .expect("embedded quantity pattern is a valid regex")
    })
}

/// First "<number> <unit>" in free text whose unit belongs to a known family.
///
/// "4.2V" gives (4.2, "V"), "2000 mAh max" gives (2000.0, "mAh"). The unit
/// string is kept as written.
pub fn parse_embedded(text: &str) -> Option<(f64, String)> {
    embedded_pattern().captures_iter(text).find_map(|caps| {
        let unit = caps.get(2)?.as_str();
        QuantityFamily::of_unit(unit)?;
        let value = caps.get(1)?.as_str().parse::<f64>().ok().filter(|v| v.is_finite())?;
        Some((value, unit.to_string()))
    })
}

/// Family named earliest in the question
pub fn detect_family(tokens: &[String]) -> Option<QuantityFamily> {
    tokens.iter().find_map(|t| {
        QuantityFamily::ALL
            .iter()
            .copied()
            .find(|f| f.question_tokens().contains(&t.as_str()))
    })
}

use crate::record::{EventSubtype, EventType};

// Intent keywords are checked before cause keywords: a bombing also
// mentions an explosion, and must not classify as an industrial accident.
const DELIBERATE_KEYWORDS: &[&str] = &[
    "terrorist", "terrorism", "bombing", "massacre", "mass shooting", "arson", "sabotage",
    "attack", "assassination", "genocide", "war crime", "ethnic cleansing", "deliberate",
    "intentional", "planned", "premeditated", "murder",
];

// Substring matching rules out short weather words here: "rain" would
// hit inside "train" and "snow" inside "snowplow crash". "frost" has no
// such collisions and stays.
const NATURE_KEYWORDS: &[&str] = &[
    "earthquake", "tsunami", "flood", "hurricane", "tornado", "storm", "volcano", "avalanche",
    "landslide", "drought", "famine", "pandemic", "epidemic", "wildfire", "cyclone", "typhoon",
    "blizzard", "heat wave", "cold wave", "frost", "natural",
];

const NATURE_SUBTYPES: &[(EventSubtype, &[&str])] = &[
    (EventSubtype::Earthquake, &["earthquake", "quake"]),
    (EventSubtype::Tsunami, &["tsunami", "tidal wave"]),
    (EventSubtype::Flood, &["flood", "flooding", "inundation"]),
    (EventSubtype::TropicalCyclone, &["hurricane", "cyclone", "typhoon"]),
    (EventSubtype::Tornado, &["tornado", "twister"]),
    (EventSubtype::VolcanicEruption, &["volcano", "eruption", "volcanic"]),
    (EventSubtype::Avalanche, &["avalanche", "snowslide"]),
    (EventSubtype::Landslide, &["landslide", "mudslide", "rockslide"]),
    (EventSubtype::Drought, &["drought", "famine"]),
    (EventSubtype::Pandemic, &["pandemic", "epidemic", "plague"]),
    (EventSubtype::Wildfire, &["wildfire", "forest fire", "bushfire"]),
    (EventSubtype::Blizzard, &["blizzard", "snowstorm"]),
    (EventSubtype::HeatWave, &["heat wave", "heatwave"]),
    (EventSubtype::ColdWave, &["cold wave", "coldwave", "frost"]),
];

const DELIBERATE_SUBTYPES: &[(EventSubtype, &[&str])] = &[
    (EventSubtype::Terrorism, &["terrorist", "terrorism", "bombing", "bomb"]),
    (EventSubtype::MassShooting, &["shooting", "massacre", "mass killing"]),
    (EventSubtype::Arson, &["arson", "deliberate fire"]),
    (EventSubtype::Sabotage, &["sabotage", "vandalism"]),
    (EventSubtype::Genocide, &["genocide", "ethnic cleansing"]),
];

const ACCIDENT_SUBTYPES: &[(EventSubtype, &[&str])] = &[
    (EventSubtype::Explosion, &["explosion", "blast"]),
    (EventSubtype::Fire, &["fire", "blaze", "conflagration"]),
    (EventSubtype::TransportAccident, &["crash", "collision", "accident"]),
    (EventSubtype::TrainAccident, &["derailment", "train"]),
    (EventSubtype::MaritimeAccident, &["sinking", "shipwreck", "ship"]),
    (EventSubtype::CrowdCrush, &["crush", "stampede", "crowd"]),
    (EventSubtype::IndustrialAccident, &["industrial", "factory"]),
    (EventSubtype::MiningAccident, &["mining", "mine"]),
    (EventSubtype::ChemicalAccident, &["chemical", "toxic", "poison"]),
    (EventSubtype::NuclearAccident, &["nuclear", "radiation", "radioactive"]),
    (EventSubtype::EnvironmentalDisaster, &["leak", "spill", "contamination"]),
];

/// Extended disaster vocabulary used by the list and paragraph assemblers
/// to accept a candidate, and by [`short_event_name`] to find a cut point.
pub const DISASTER_KEYWORDS: &[&str] = &[
    "disaster", "accident", "incident", "tragedy", "catastrophe", "crisis", "emergency",
    "outbreak", "epidemic", "pandemic", "plague",
    // natural
    "earthquake", "tsunami", "flood", "hurricane", "tornado", "storm", "volcano", "avalanche",
    "landslide", "drought", "famine", "wildfire", "blizzard", "heat wave", "cold wave",
    "cyclone", "typhoon",
    // man-made
    "explosion", "fire", "crash", "collision", "derailment", "sinking", "shipwreck",
    "crush", "stampede", "industrial", "mining", "chemical", "nuclear", "radiation",
    "leak", "spill", "contamination", "pollution", "collapse",
    // deliberate
    "massacre", "shooting", "terrorist", "terrorism", "bombing", "bomb", "attack",
    "assassination", "genocide", "mass murder",
];

/// True iff the lower-cased text contains any extended-vocabulary keyword.
pub fn has_disaster_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    DISASTER_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Map event name + details to a primary category and subcategory.
/// Deliberate intent keywords take precedence over nature keywords;
/// anything else is a human accident. Subtype groups are checked in a
/// fixed order within the chosen type, first group wins.
pub fn classify_event(event_name: &str, details: &str) -> (EventType, EventSubtype) {
    let text = format!("{} {}", event_name, details).to_lowercase();

    let event_type = if DELIBERATE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        EventType::HumanDeliberate
    } else if NATURE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        EventType::Nature
    } else {
        EventType::HumanAccident
    };

    let groups = match event_type {
        EventType::Nature => NATURE_SUBTYPES,
        EventType::HumanDeliberate => DELIBERATE_SUBTYPES,
        EventType::HumanAccident => ACCIDENT_SUBTYPES,
    };
    let subtype = groups
        .iter()
        .find(|(_, kws)| kws.iter().any(|kw| text.contains(kw)))
        .map(|(s, _)| *s)
        .unwrap_or(EventSubtype::Other);

    (event_type, subtype)
}

/// Keep display names short: names under 50 chars pass through; longer
/// names are cut before the first disaster keyword, else truncated.
pub fn short_event_name(event_name: &str) -> String {
    if event_name.chars().count() < 50 {
        return event_name.to_string();
    }

    let lower = event_name.to_lowercase();
    for kw in DISASTER_KEYWORDS {
        if let Some(pos) = lower.find(kw) {
            // Lowercasing can shift byte offsets for non-ASCII text;
            // an off-boundary position just skips this keyword.
            let Some(prefix) = event_name.get(..pos).map(str::trim) else { continue };
            if !prefix.is_empty() {
                return title_case(prefix);
            }
        }
    }

    event_name.chars().take(50).collect::<String>().trim().to_string()
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_beats_cause() {
        // "bombing" and "explosion" together must classify as deliberate,
        // not as an industrial explosion.
        let (t, s) = classify_event("Market bombing", "an explosion tore through the market");
        assert_eq!(t, EventType::HumanDeliberate);
        assert_eq!(s, EventSubtype::Terrorism);
    }

    #[test]
    fn nature_over_default() {
        let (t, s) = classify_event("1906 earthquake", "");
        assert_eq!(t, EventType::Nature);
        assert_eq!(s, EventSubtype::Earthquake);
    }

    #[test]
    fn frost_reaches_cold_wave() {
        let (t, s) = classify_event("Great frost of 1709", "");
        assert_eq!(t, EventType::Nature);
        assert_eq!(s, EventSubtype::ColdWave);
    }

    #[test]
    fn maritime_accident() {
        let (t, s) = classify_event("RMS Titanic sinking", "");
        assert_eq!(t, EventType::HumanAccident);
        assert_eq!(s, EventSubtype::MaritimeAccident);
    }

    #[test]
    fn unmatched_subtype_is_other() {
        let (t, s) = classify_event("Bridge failure", "sudden structural failure");
        assert_eq!(t, EventType::HumanAccident);
        assert_eq!(s, EventSubtype::Other);
    }

    #[test]
    fn short_names_pass_through() {
        assert_eq!(short_event_name("Titanic"), "Titanic");
    }

    #[test]
    fn long_names_cut_before_keyword() {
        let long = "the great northern railway derailment of nineteen twelve near the city";
        let short = short_event_name(long);
        assert_eq!(short, "The Great Northern Railway");
    }

    #[test]
    fn keyword_acceptance() {
        assert!(has_disaster_keyword("a deadly stampede at the festival"));
        assert!(!has_disaster_keyword("a quiet afternoon"));
    }
}

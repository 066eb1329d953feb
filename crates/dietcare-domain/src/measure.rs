//! Bounded clinical measurements: body weight and self-reported mood scales.

/// Accepted body weight range in kilograms, inclusive.
pub const MIN_WEIGHT_KG: f64 = 20.0;
pub const MAX_WEIGHT_KG: f64 = 400.0;

/// Self-reported scales (mood, energy, motivation) run from 1 to 5.
pub const MIN_SCALE: i16 = 1;
pub const MAX_SCALE: i16 = 5;

/// Maximum number of tags on a mood entry, and maximum tag length.
pub const MAX_MOOD_TAGS: usize = 10;
pub const MAX_TAG_LEN: usize = 32;

pub fn is_valid_weight(kg: f64) -> bool {
    kg.is_finite() && (MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&kg)
}

pub fn is_valid_scale(value: i16) -> bool {
    (MIN_SCALE..=MAX_SCALE).contains(&value)
}

/// Trim, lowercase and dedupe tags, dropping empty ones. Returns `None` if any tag is too
/// long or there are too many.
pub fn normalize_tags(tags: &[String]) -> Option<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return None;
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    (out.len() <= MAX_MOOD_TAGS).then_some(out)
}

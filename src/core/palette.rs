//! Deterministic assignment of clip colors to (source, profile) groups.
//!
//! Known sources keep a stable two-color family; unknown sources draw
//! pairs from a shared dynamic pool in first-seen order. The engine is
//! total: every group receives a color, degrading to duplicates only
//! when the entire palette is exhausted.

use crate::models::media::split_group_key;
use std::collections::{HashMap, HashSet};

/// Full fallback palette, ordered colorblind-safe (red last).
pub const VALID_COLORS: &[&str] = &[
    "Blue", "Green", "Purple", "Cyan", "Yellow", "Orange", "Pink", "Fuchsia", "Violet", "Teal",
    "Lavender", "Rose", "Magenta", "Brown", "Olive", "Tan", "Sand", "Red",
];

/// Preferred two-color families for known sources.
pub const SOURCE_COLOR_FAMILIES: &[(&str, [&str; 2])] = &[
    ("DRONE", ["Green", "Olive"]),
    ("CELL-BLAIN", ["Orange", "Tan"]),
    ("CANON", ["Blue", "Cyan"]),
];

/// Dynamic pool for unknown sources, grouped into similar-color pairs.
pub const DYNAMIC_COLORS: &[&str] = &[
    "Purple", "Violet", "Pink", "Rose", "Fuchsia", "Yellow", "Sand", "Brown", "Lavender", "Teal",
    "Magenta", "Red",
];

/// Reserve pair handed out when the dynamic pool runs dry.
const RESERVE_PAIR: [&str; 2] = ["Purple", "Violet"];

/// Duplicate-allowed color of last resort.
const LAST_RESORT: &str = "Sand";

fn family_colors(source: &str) -> Option<&'static [&'static str; 2]> {
    SOURCE_COLOR_FAMILIES
        .iter()
        .find(|(tag, _)| *tag == source)
        .map(|(_, colors)| colors)
}

/// Assign a color to every group key.
///
/// `groups` is the complete set observed in one run, in first-seen
/// order (the order drives dynamic-pool allocation for unknown
/// sources). Postcondition: every group is present in the returned map;
/// colors collide only in the logged degraded mode.
pub fn assign_colors(groups: &[String]) -> HashMap<String, String> {
    let mut assignment: HashMap<String, String> = HashMap::new();
    let mut used: HashSet<&str> = HashSet::new();
    let mut dynamic_pool: Vec<&str> = DYNAMIC_COLORS.to_vec();

    // Partition by source tag, preserving first-seen source order.
    let mut source_order: Vec<&str> = Vec::new();
    let mut by_source: HashMap<&str, Vec<&String>> = HashMap::new();
    for group in groups {
        let (source, _) = split_group_key(group);
        by_source
            .entry(source)
            .or_insert_with(|| {
                source_order.push(source);
                Vec::new()
            })
            .push(group);
    }
    for members in by_source.values_mut() {
        members.sort();
        members.dedup();
    }

    let mut claim = |assignment: &mut HashMap<String, String>,
                     used: &mut HashSet<&str>,
                     dynamic_pool: &mut Vec<&str>,
                     group: &str,
                     color: &'static str| {
        assignment.insert(group.to_string(), color.to_string());
        used.insert(color);
        dynamic_pool.retain(|c| *c != color);
    };

    // Known families first, in sorted group order within each source.
    for source in &source_order {
        if let Some(colors) = family_colors(source) {
            let members = &by_source[source];
            for (group, color) in members.iter().zip(colors.iter()) {
                if !used.contains(color) {
                    claim(&mut assignment, &mut used, &mut dynamic_pool, group, *color);
                }
            }
        }
    }

    // Unknown sources draw a pair from the shared pool, first seen first.
    for source in &source_order {
        if family_colors(source).is_some() {
            continue;
        }
        let pair: Vec<&'static str> = if dynamic_pool.is_empty() {
            RESERVE_PAIR.to_vec()
        } else {
            let take = dynamic_pool.len().min(2);
            dynamic_pool.drain(..take).collect()
        };

        let members = by_source[source].clone();
        for (group, color) in members.iter().zip(pair.iter()) {
            if !used.contains(color) {
                claim(&mut assignment, &mut used, &mut dynamic_pool, group, *color);
            }
        }
    }

    // Totality sweep: anything still uncolored takes the next unused
    // palette entry, or the last-resort color once nothing is left.
    for group in groups {
        if assignment.contains_key(group) {
            continue;
        }
        match VALID_COLORS.iter().find(|c| !used.contains(**c)) {
            Some(color) => {
                claim(&mut assignment, &mut used, &mut dynamic_pool, group, *color);
            }
            None => {
                tracing::warn!(
                    "Color palette exhausted: assigning duplicate '{}' to group '{}'",
                    LAST_RESORT,
                    group
                );
                assignment.insert(group.clone(), LAST_RESORT.to_string());
            }
        }
    }

    assignment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_known_families_get_their_colors() {
        let groups = keys(&["DRONE_LOG", "DRONE_709", "CELL-BLAIN_709", "CANON_LOG"]);
        let colors = assign_colors(&groups);
        // Sorted member order within a source: 709 before LOG.
        assert_eq!(colors["DRONE_709"], "Green");
        assert_eq!(colors["DRONE_LOG"], "Olive");
        assert_eq!(colors["CELL-BLAIN_709"], "Orange");
        assert_eq!(colors["CANON_LOG"], "Blue");
    }

    #[test]
    fn test_unknown_source_draws_from_dynamic_pool() {
        let groups = keys(&["CANON_709", "CANON_LOG", "GOPRO_709"]);
        let colors = assign_colors(&groups);
        assert_eq!(colors["CANON_709"], "Blue");
        assert_eq!(colors["CANON_LOG"], "Cyan");
        // First dynamic color, never a family color already claimed.
        assert_eq!(colors["GOPRO_709"], "Purple");
    }

    #[test]
    fn test_two_unknown_sources_get_distinct_pairs() {
        let groups = keys(&["GOPRO_709", "GOPRO_LOG", "INSTA_709", "INSTA_LOG"]);
        let colors = assign_colors(&groups);
        assert_eq!(colors["GOPRO_709"], "Purple");
        assert_eq!(colors["GOPRO_LOG"], "Violet");
        assert_eq!(colors["INSTA_709"], "Pink");
        assert_eq!(colors["INSTA_LOG"], "Rose");
    }

    #[test]
    fn test_totality_and_uniqueness_within_palette() {
        // 9 sources x 2 buckets = 18 groups, exactly the palette size.
        let mut groups = Vec::new();
        for source in ["A", "B", "C", "D", "E", "F", "G", "H", "I"] {
            groups.push(format!("{}_709", source));
            groups.push(format!("{}_LOG", source));
        }
        let colors = assign_colors(&groups);
        assert_eq!(colors.len(), groups.len());
        let distinct: HashSet<&String> = colors.values().collect();
        assert_eq!(distinct.len(), groups.len(), "colors must not collide");
    }

    #[test]
    fn test_degraded_mode_still_total() {
        let mut groups = Vec::new();
        for i in 0..15 {
            groups.push(format!("SRC{}_709", i));
            groups.push(format!("SRC{}_LOG", i));
        }
        let colors = assign_colors(&groups);
        assert_eq!(colors.len(), groups.len());
        assert!(colors.values().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_deterministic_for_same_input() {
        let groups = keys(&["DRONE_LOG", "GOPRO_709", "CANON_709", "MISC_LOG"]);
        assert_eq!(assign_colors(&groups), assign_colors(&groups));
    }
}

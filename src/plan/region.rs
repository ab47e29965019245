use std::ops::Range;

use super::document::{DayName, SlotKind, SLOT_RULES};

/// Heading shape check shared by the parser and the mutator, which must use
/// identical region boundaries.
pub fn is_heading_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("**") || trimmed.starts_with('#')
}

pub fn is_day_heading(line: &str, day: DayName) -> bool {
    is_heading_line(line) && line.to_lowercase().contains(day.lowercase())
}

fn names_other_day(line: &str, current: DayName) -> bool {
    let lowered = line.to_lowercase();
    DayName::WEEK
        .iter()
        .any(|day| *day != current && lowered.contains(day.lowercase()))
}

/// Line range of one day's region: from its heading line up to (exclusive)
/// the next heading-shaped line naming a different day, or end of input.
/// A prose line mentioning another day does not terminate the region.
pub fn day_region(lines: &[&str], day: DayName) -> Option<Range<usize>> {
    let start = lines.iter().position(|line| is_day_heading(line, day))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| is_heading_line(line) && names_other_day(line, day))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());
    Some(start..end)
}

/// First matching rule in `SLOT_RULES` precedence order, or `None` for lines
/// that belong to no slot.
pub fn classify_slot_line(line: &str) -> Option<SlotKind> {
    let lowered = line.to_lowercase();
    SLOT_RULES
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_detection() {
        assert!(is_day_heading("**Monday**", DayName::Monday));
        assert!(is_day_heading("  ## Monday Plan", DayName::Monday));
        assert!(is_day_heading("**MONDAY**", DayName::Monday));
        assert!(!is_day_heading("Monday", DayName::Monday));
        assert!(!is_day_heading("**Tuesday**", DayName::Monday));
    }

    #[test]
    fn test_day_region_spans_to_next_day_heading() {
        let lines = vec![
            "Intro text",
            "**Monday**",
            "- Breakfast: Oats",
            "- Lunch: Soup",
            "**Tuesday**",
            "- Breakfast: Eggs",
        ];
        assert_eq!(day_region(&lines, DayName::Monday), Some(1..4));
        assert_eq!(day_region(&lines, DayName::Tuesday), Some(4..6));
        assert_eq!(day_region(&lines, DayName::Friday), None);
    }

    #[test]
    fn test_prose_mention_of_another_day_does_not_end_region() {
        let lines = vec![
            "**Monday**",
            "- Breakfast: Oats",
            "Leftovers reheat well on Tuesday too",
            "- Dinner: Chili",
            "**Wednesday**",
        ];
        assert_eq!(day_region(&lines, DayName::Monday), Some(0..4));
    }

    #[test]
    fn test_region_runs_to_end_of_input_without_following_heading() {
        let lines = vec!["**Sunday**", "- Dinner: Roast"];
        assert_eq!(day_region(&lines, DayName::Sunday), Some(0..2));
    }

    #[test]
    fn test_classify_precedence_first_rule_wins() {
        assert_eq!(
            classify_slot_line("- Breakfast: eggs and a snack"),
            Some(SlotKind::Breakfast)
        );
        assert_eq!(classify_slot_line("- Snack ideas: nuts"), Some(SlotKind::Snacks));
        assert_eq!(
            classify_slot_line("- Baby's portions: mashed peas"),
            Some(SlotKind::BabyMeal)
        );
        assert_eq!(classify_slot_line("Just a note"), None);
    }
}

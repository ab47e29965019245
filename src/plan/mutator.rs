use super::document::{DayName, SlotKind};
use super::region::{classify_slot_line, day_region};

/// Replace one meal slot's value inside the raw plan text, leaving every
/// other byte untouched.
///
/// The target line is the first line inside the day's region that classifies
/// as `slot` under the same rules the parser uses, so anything the parser
/// surfaced is locatable here. Everything after that line's first colon is
/// replaced with a single space plus `new_value`; lines are rejoined with
/// `\n`. When the day, the slot line, or the colon cannot be found the input
/// is returned unchanged, byte for byte, and the caller can detect the no-op
/// by comparing against the original.
pub fn replace_meal_slot(
    raw_text: &str,
    day: DayName,
    slot: SlotKind,
    new_value: &str,
) -> String {
    let lines: Vec<&str> = raw_text.split('\n').collect();

    let Some(region) = day_region(&lines, day) else {
        return raw_text.to_string();
    };
    let Some(offset) = lines[region.clone()]
        .iter()
        .position(|line| classify_slot_line(line) == Some(slot))
    else {
        return raw_text.to_string();
    };

    let index = region.start + offset;
    // A keyword line without a colon has no value span to replace.
    let Some(colon) = lines[index].find(':') else {
        return raw_text.to_string();
    };

    let replaced = format!("{} {}", &lines[index][..=colon], new_value);
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| if i == index { replaced.as_str() } else { *line })
        .collect::<Vec<&str>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::parser::parse_plan;

    const TWO_DAY_PLAN: &str =
        "**Monday**\n- Breakfast: Oats\n- Lunch: Soup\n**Tuesday**\n- Breakfast: Eggs";

    #[test]
    fn test_swap_scenario_changes_exactly_one_line() {
        let after = replace_meal_slot(TWO_DAY_PLAN, DayName::Monday, SlotKind::Breakfast, "Smoothie");
        assert_eq!(
            after,
            "**Monday**\n- Breakfast: Smoothie\n- Lunch: Soup\n**Tuesday**\n- Breakfast: Eggs"
        );
        assert_eq!(
            TWO_DAY_PLAN.split('\n').count(),
            after.split('\n').count()
        );
    }

    #[test]
    fn test_swap_targets_the_requested_day_only() {
        let after = replace_meal_slot(TWO_DAY_PLAN, DayName::Tuesday, SlotKind::Breakfast, "Waffles");
        assert_eq!(
            after,
            "**Monday**\n- Breakfast: Oats\n- Lunch: Soup\n**Tuesday**\n- Breakfast: Waffles"
        );
    }

    #[test]
    fn test_missing_slot_is_a_byte_identical_no_op() {
        let after = replace_meal_slot(TWO_DAY_PLAN, DayName::Monday, SlotKind::Dinner, "Tacos");
        assert_eq!(after, TWO_DAY_PLAN);

        let after = replace_meal_slot(TWO_DAY_PLAN, DayName::Friday, SlotKind::Lunch, "Salad");
        assert_eq!(after, TWO_DAY_PLAN);
    }

    #[test]
    fn test_no_op_preserves_crlf_input_exactly() {
        let crlf = "**Monday**\r\n- Breakfast: Oats\r\n";
        let after = replace_meal_slot(crlf, DayName::Monday, SlotKind::Dinner, "Tacos");
        assert_eq!(after, crlf);
    }

    #[test]
    fn test_round_trip_through_parser() {
        let after = replace_meal_slot(TWO_DAY_PLAN, DayName::Monday, SlotKind::Lunch, "Tacos");
        let document = parse_plan(&after);
        assert_eq!(
            document.day(DayName::Monday).unwrap().lunch.as_deref(),
            Some("Tacos")
        );
        // The untouched slots still parse to their old values.
        assert_eq!(
            document.day(DayName::Monday).unwrap().breakfast.as_deref(),
            Some("Oats")
        );
        assert_eq!(
            document.day(DayName::Tuesday).unwrap().breakfast.as_deref(),
            Some("Eggs")
        );
    }

    #[test]
    fn test_prefix_before_colon_is_preserved_verbatim() {
        let text = "**Monday**\n  -  Breakfast: Oats and berries";
        let after = replace_meal_slot(text, DayName::Monday, SlotKind::Breakfast, "Granola");
        assert_eq!(after, "**Monday**\n  -  Breakfast: Granola");
    }

    #[test]
    fn test_only_first_matching_line_is_replaced() {
        let text = "**Monday**\n- Breakfast: Oats\n- Breakfast: Pancakes";
        let after = replace_meal_slot(text, DayName::Monday, SlotKind::Breakfast, "Toast");
        assert_eq!(after, "**Monday**\n- Breakfast: Toast\n- Breakfast: Pancakes");
    }

    #[test]
    fn test_keyword_line_without_colon_is_a_no_op() {
        let text = "**Monday**\n- Breakfast: Oats\nsnack as needed";
        let after = replace_meal_slot(text, DayName::Monday, SlotKind::Snacks, "Fruit");
        assert_eq!(after, text);
    }

    #[test]
    fn test_trailing_newline_survives_replacement() {
        let text = "**Monday**\n- Breakfast: Oats\n";
        let after = replace_meal_slot(text, DayName::Monday, SlotKind::Breakfast, "Toast");
        assert_eq!(after, "**Monday**\n- Breakfast: Toast\n");
    }
}

use tracing::trace;

use super::document::{DayName, DaySection, WeeklyPlanDocument};
use super::region::{classify_slot_line, day_region};

/// Parse raw model-generated plan text into a fresh read model, visiting days
/// in the canonical Monday-first order.
///
/// Never fails: text with no recognizable structure yields an empty document,
/// and a day with no parseable main meal simply produces no section.
pub fn parse_plan(raw_text: &str) -> WeeklyPlanDocument {
    parse_plan_ordered(raw_text, &DayName::WEEK)
}

/// Same as [`parse_plan`] but with an explicit day ordering, which is also the
/// output order of the sections.
pub fn parse_plan_ordered(raw_text: &str, day_order: &[DayName]) -> WeeklyPlanDocument {
    let lines: Vec<&str> = raw_text.split('\n').collect();
    let mut document = WeeklyPlanDocument::default();

    for &day in day_order {
        let Some(region) = day_region(&lines, day) else {
            continue;
        };

        let mut section = DaySection::new(day);
        for line in &lines[region] {
            let Some(kind) = classify_slot_line(line) else {
                continue;
            };
            // First matching line per slot per day wins; later repeats of the
            // same keyword are ignored.
            if section.slot(kind).is_some() {
                continue;
            }
            section.set_slot(kind, slot_value(line));
        }

        if section.has_main_meal() {
            document.days.push(section);
        } else {
            trace!(day = day.as_str(), "no main meals found for day");
        }
    }

    document
}

/// A slot's stored value: everything after the first colon, bold markers
/// stripped, trimmed. A keyword line without a colon yields an empty value.
fn slot_value(line: &str) -> String {
    let after_colon = line.splitn(2, ':').nth(1).unwrap_or("");
    after_colon.replace("**", "").trim().to_string()
}

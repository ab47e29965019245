use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Canonical day names. `WEEK` is the single source of truth for ordering;
/// "today" lookups go through `from_weekday` instead of a second list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayName {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayName {
    pub const WEEK: [DayName; 7] = [
        DayName::Monday,
        DayName::Tuesday,
        DayName::Wednesday,
        DayName::Thursday,
        DayName::Friday,
        DayName::Saturday,
        DayName::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayName::Monday => "Monday",
            DayName::Tuesday => "Tuesday",
            DayName::Wednesday => "Wednesday",
            DayName::Thursday => "Thursday",
            DayName::Friday => "Friday",
            DayName::Saturday => "Saturday",
            DayName::Sunday => "Sunday",
        }
    }

    /// Lowercase form used for case-insensitive matching against plan text.
    pub fn lowercase(&self) -> &'static str {
        match self {
            DayName::Monday => "monday",
            DayName::Tuesday => "tuesday",
            DayName::Wednesday => "wednesday",
            DayName::Thursday => "thursday",
            DayName::Friday => "friday",
            DayName::Saturday => "saturday",
            DayName::Sunday => "sunday",
        }
    }

    pub fn parse(input: &str) -> Option<DayName> {
        let lowered = input.trim().to_lowercase();
        DayName::WEEK
            .iter()
            .copied()
            .find(|day| day.lowercase() == lowered)
    }

    pub fn from_weekday(weekday: Weekday) -> DayName {
        match weekday {
            Weekday::Mon => DayName::Monday,
            Weekday::Tue => DayName::Tuesday,
            Weekday::Wed => DayName::Wednesday,
            Weekday::Thu => DayName::Thursday,
            Weekday::Fri => DayName::Friday,
            Weekday::Sat => DayName::Saturday,
            Weekday::Sun => DayName::Sunday,
        }
    }
}

impl fmt::Display for DayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
    BabyMeal,
}

/// Keyword table deciding which slot a plan line belongs to, checked in this
/// exact order. The first rule whose keyword the lowercased line contains
/// wins, so "breakfast:" beats a stray "snack" later in the same line.
/// The snack and baby keywords deliberately have no colon so "Snack ideas:"
/// and "Baby's portions:" both match.
pub const SLOT_RULES: &[(&str, SlotKind)] = &[
    ("breakfast:", SlotKind::Breakfast),
    ("lunch:", SlotKind::Lunch),
    ("dinner:", SlotKind::Dinner),
    ("snack", SlotKind::Snacks),
    ("baby", SlotKind::BabyMeal),
];

impl SlotKind {
    pub const ALL: [SlotKind; 5] = [
        SlotKind::Breakfast,
        SlotKind::Lunch,
        SlotKind::Dinner,
        SlotKind::Snacks,
        SlotKind::BabyMeal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SlotKind::Breakfast => "Breakfast",
            SlotKind::Lunch => "Lunch",
            SlotKind::Dinner => "Dinner",
            SlotKind::Snacks => "Snacks",
            SlotKind::BabyMeal => "Baby's portions",
        }
    }

    pub fn parse(input: &str) -> Option<SlotKind> {
        match input.trim().to_lowercase().as_str() {
            "breakfast" => Some(SlotKind::Breakfast),
            "lunch" => Some(SlotKind::Lunch),
            "dinner" => Some(SlotKind::Dinner),
            "snack" | "snacks" => Some(SlotKind::Snacks),
            "baby" | "baby-meal" | "babymeal" => Some(SlotKind::BabyMeal),
            _ => None,
        }
    }
}

/// One day's parsed slots. Reconstructed fresh on every parse; the raw plan
/// text remains the source of truth and is what the mutator rewrites.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySection {
    pub day: DayName,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub dinner: Option<String>,
    pub snacks: Option<String>,
    pub baby_meal: Option<String>,
}

impl DaySection {
    pub fn new(day: DayName) -> Self {
        DaySection {
            day,
            breakfast: None,
            lunch: None,
            dinner: None,
            snacks: None,
            baby_meal: None,
        }
    }

    pub fn slot(&self, kind: SlotKind) -> Option<&str> {
        match kind {
            SlotKind::Breakfast => self.breakfast.as_deref(),
            SlotKind::Lunch => self.lunch.as_deref(),
            SlotKind::Dinner => self.dinner.as_deref(),
            SlotKind::Snacks => self.snacks.as_deref(),
            SlotKind::BabyMeal => self.baby_meal.as_deref(),
        }
    }

    pub fn set_slot(&mut self, kind: SlotKind, value: String) {
        let target = match kind {
            SlotKind::Breakfast => &mut self.breakfast,
            SlotKind::Lunch => &mut self.lunch,
            SlotKind::Dinner => &mut self.dinner,
            SlotKind::Snacks => &mut self.snacks,
            SlotKind::BabyMeal => &mut self.baby_meal,
        };
        *target = Some(value);
    }

    /// A section only counts as a planned day when at least one of the main
    /// meals carries text; snack-only or baby-only days are dropped.
    pub fn has_main_meal(&self) -> bool {
        [&self.breakfast, &self.lunch, &self.dinner]
            .iter()
            .any(|slot| slot.as_deref().is_some_and(|value| !value.is_empty()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeeklyPlanDocument {
    pub days: Vec<DaySection>,
}

impl WeeklyPlanDocument {
    pub fn day(&self, day: DayName) -> Option<&DaySection> {
        self.days.iter().find(|section| section.day == day)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_name_parse_is_case_insensitive() {
        assert_eq!(DayName::parse("monday"), Some(DayName::Monday));
        assert_eq!(DayName::parse("  SATURDAY "), Some(DayName::Saturday));
        assert_eq!(DayName::parse("someday"), None);
    }

    #[test]
    fn test_week_is_monday_first() {
        assert_eq!(DayName::WEEK[0], DayName::Monday);
        assert_eq!(DayName::WEEK[6], DayName::Sunday);
    }

    #[test]
    fn test_from_weekday_covers_sunday_lookup() {
        assert_eq!(DayName::from_weekday(Weekday::Sun), DayName::Sunday);
        assert_eq!(DayName::from_weekday(Weekday::Mon), DayName::Monday);
    }

    #[test]
    fn test_slot_kind_parse_accepts_variants() {
        assert_eq!(SlotKind::parse("Snacks"), Some(SlotKind::Snacks));
        assert_eq!(SlotKind::parse("snack"), Some(SlotKind::Snacks));
        assert_eq!(SlotKind::parse("baby"), Some(SlotKind::BabyMeal));
        assert_eq!(SlotKind::parse("brunch"), None);
    }

    #[test]
    fn test_has_main_meal_ignores_snacks_and_baby() {
        let mut section = DaySection::new(DayName::Monday);
        section.set_slot(SlotKind::Snacks, "Apple slices".to_string());
        section.set_slot(SlotKind::BabyMeal, "Mashed banana".to_string());
        assert!(!section.has_main_meal());

        section.set_slot(SlotKind::Dinner, "Tacos".to_string());
        assert!(section.has_main_meal());
    }

    #[test]
    fn test_empty_main_meal_value_does_not_count() {
        let mut section = DaySection::new(DayName::Tuesday);
        section.set_slot(SlotKind::Breakfast, String::new());
        assert!(!section.has_main_meal());
    }
}

pub mod document;
pub mod mutator;
pub mod parser;
pub mod region;

pub use document::{DayName, DaySection, SlotKind, WeeklyPlanDocument, SLOT_RULES};
pub use mutator::replace_meal_slot;
pub use parser::{parse_plan, parse_plan_ordered};

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Mom,
    Dad,
    Baby,
    Adult,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mom => "mom",
            Role::Dad => "dad",
            Role::Baby => "baby",
            Role::Adult => "adult",
        }
    }

    pub fn parse(input: &str) -> Option<Role> {
        match input.trim().to_lowercase().as_str() {
            "mom" => Some(Role::Mom),
            "dad" => Some(Role::Dad),
            "baby" => Some(Role::Baby),
            "adult" => Some(Role::Adult),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One household member's nutrition profile. Free-text fields are kept as the
/// user typed them; the model reads them verbatim from the prompt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FamilyMember {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub activity_level: Option<String>,
    pub goals: Option<String>,
    pub supplements: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FamilyMember {
    pub fn new(name: &str, role: Role) -> Self {
        FamilyMember {
            id: Uuid::new_v4(),
            name: name.to_string(),
            role,
            date_of_birth: None,
            height: None,
            weight: None,
            activity_level: None,
            goals: None,
            supplements: None,
            notes: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BabyStage {
    pub stage: String,
    pub preparation: String,
}

/// Whole months between two dates using the 30.44-day average month.
pub fn whole_months(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - date_of_birth).num_days();
    (days as f64 / 30.44).floor() as i64
}

/// Feeding stage for a baby of a given age, with how to prepare family food.
pub fn baby_stage(date_of_birth: NaiveDate, today: NaiveDate) -> BabyStage {
    let months = whole_months(date_of_birth, today);
    if months < 5 {
        BabyStage {
            stage: "Not ready for solids yet".to_string(),
            preparation: "Breast milk or formula only".to_string(),
        }
    } else if months < 8 {
        BabyStage {
            stage: format!("{} months — Starting solids", months),
            preparation: "Smooth purees, single ingredients".to_string(),
        }
    } else if months < 10 {
        BabyStage {
            stage: format!("{} months — Exploring textures", months),
            preparation: "Soft mashed foods, soft finger foods".to_string(),
        }
    } else if months < 12 {
        BabyStage {
            stage: format!("{} months — Table foods", months),
            preparation: "Soft chopped table food, variety of textures".to_string(),
        }
    } else {
        BabyStage {
            stage: format!("{} months — Toddler eating", months),
            preparation: "Most family foods, small soft pieces".to_string(),
        }
    }
}

/// Render the family profile block that heads the meal-plan prompt.
pub fn render_profiles(members: &[FamilyMember], today: NaiveDate) -> String {
    let mut block = String::from("Family Nutrition Profiles:\n");

    for member in members {
        block.push('\n');
        block.push_str(&format!(
            "{} ({}):\n",
            member.name.to_uppercase(),
            member.role
        ));
        if let Some(height) = &member.height {
            block.push_str(&format!("- Height: {}\n", height));
        }
        if let Some(weight) = &member.weight {
            block.push_str(&format!("- Weight: {}\n", weight));
        }
        if let Some(activity) = &member.activity_level {
            block.push_str(&format!("- Activity: {}\n", activity));
        }
        if let Some(goals) = &member.goals {
            block.push_str(&format!("- Goals: {}\n", goals));
        }
        if let Some(supplements) = &member.supplements {
            block.push_str(&format!("- Supplements: {}\n", supplements));
        }
        if member.role == Role::Baby {
            if let Some(date_of_birth) = member.date_of_birth {
                let stage = baby_stage(date_of_birth, today);
                block.push_str(&format!("- Feeding stage: {}\n", stage.stage));
                block.push_str(&format!("- Preparation: {}\n", stage.preparation));
            }
            block.push_str("- Portions: ~2 tablespoons per serving\n");
            block.push_str("- Priority: Iron-rich foods\n");
        }
        if let Some(notes) = &member.notes {
            block.push_str(&format!("- Notes: {}\n", notes));
        }
    }

    block.push_str(
        "\nCOOKING PHILOSOPHY:\n\
         - Simple, low-effort meals\n\
         - Batch cooking friendly\n\
         - Same ingredients for whole family, just prepared differently for baby\n",
    );
    block
}

/// Short household description for the grocery prompt, e.g.
/// "2 adults and a 6-month-old baby".
pub fn household_summary(members: &[FamilyMember], today: NaiveDate) -> String {
    let adults = members
        .iter()
        .filter(|member| member.role != Role::Baby)
        .count();
    let babies: Vec<&FamilyMember> = members
        .iter()
        .filter(|member| member.role == Role::Baby)
        .collect();

    let mut parts = Vec::new();
    if adults > 0 {
        parts.push(format!(
            "{} adult{}",
            adults,
            if adults == 1 { "" } else { "s" }
        ));
    }
    match babies.as_slice() {
        [] => {}
        [baby] => match baby.date_of_birth {
            Some(date_of_birth) => parts.push(format!(
                "a {}-month-old baby",
                whole_months(date_of_birth, today)
            )),
            None => parts.push("a baby".to_string()),
        },
        many => parts.push(format!("{} babies", many.len())),
    }

    if parts.is_empty() {
        "the household".to_string()
    } else {
        parts.join(" and ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_whole_months_uses_average_month_length() {
        // 183 days / 30.44 = 6.01...
        assert_eq!(whole_months(date(2026, 1, 1), date(2026, 7, 3)), 6);
        assert_eq!(whole_months(date(2026, 1, 1), date(2026, 1, 31)), 0);
    }

    #[test]
    fn test_baby_stage_thresholds() {
        let dob = date(2026, 1, 1);
        assert_eq!(
            baby_stage(dob, date(2026, 2, 1)).stage,
            "Not ready for solids yet"
        );
        assert_eq!(
            baby_stage(dob, date(2026, 7, 3)).stage,
            "6 months — Starting solids"
        );
        assert_eq!(
            baby_stage(dob, date(2026, 10, 1)).preparation,
            "Soft mashed foods, soft finger foods"
        );
        assert_eq!(
            baby_stage(dob, date(2026, 12, 1)).stage,
            "10 months — Table foods"
        );
        assert_eq!(
            baby_stage(dob, date(2027, 2, 1)).preparation,
            "Most family foods, small soft pieces"
        );
    }

    #[test]
    fn test_render_profiles_includes_member_fields() {
        let mut mom = FamilyMember::new("Jess", Role::Mom);
        mom.height = Some("5ft 9in".to_string());
        mom.goals = Some("140-165g protein/day".to_string());

        let mut baby = FamilyMember::new("Bean", Role::Baby);
        baby.date_of_birth = Some(date(2026, 1, 1));

        let block = render_profiles(&[mom, baby], date(2026, 7, 3));
        assert!(block.starts_with("Family Nutrition Profiles:"));
        assert!(block.contains("JESS (mom):"));
        assert!(block.contains("- Height: 5ft 9in"));
        assert!(block.contains("- Goals: 140-165g protein/day"));
        assert!(block.contains("- Feeding stage: 6 months — Starting solids"));
        assert!(block.contains("- Priority: Iron-rich foods"));
        assert!(block.contains("COOKING PHILOSOPHY:"));
    }

    #[test]
    fn test_household_summary_variants() {
        let today = date(2026, 7, 3);
        assert_eq!(household_summary(&[], today), "the household");

        let mom = FamilyMember::new("Jess", Role::Mom);
        let dad = FamilyMember::new("Sam", Role::Dad);
        let mut baby = FamilyMember::new("Bean", Role::Baby);
        baby.date_of_birth = Some(date(2026, 1, 1));

        assert_eq!(
            household_summary(&[mom.clone(), dad.clone()], today),
            "2 adults"
        );
        assert_eq!(
            household_summary(&[mom, dad, baby], today),
            "2 adults and a 6-month-old baby"
        );
    }
}

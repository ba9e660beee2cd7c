//! Default catalog of foods and exercises.
//!
//! This module provides the built-in reference data: named food servings with
//! their macros, and exercises grouped by category with MET ranges.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// (name, calories, protein g, carbs g, fat g)
type FoodRow = (&'static str, u32, f64, f64, f64);

/// (name, body parts, MET low, MET high)
type ExerciseRow = (&'static str, &'static [&'static str], f64, f64);

const FOODS: &[FoodRow] = &[
    ("Apple", 95, 0.5, 25.0, 0.3),
    ("Banana", 105, 1.3, 27.0, 0.4),
    ("Orange", 62, 1.2, 15.4, 0.2),
    ("Strawberries (1 cup)", 49, 1.0, 11.7, 0.5),
    ("Blueberries (1 cup)", 84, 1.1, 21.4, 0.5),
    ("Avocado (1/2)", 161, 2.0, 8.5, 14.7),
    ("Broccoli (1 cup)", 55, 3.7, 11.2, 0.6),
    ("Spinach (1 cup)", 7, 0.9, 1.1, 0.1),
    ("Carrots (1 cup)", 52, 1.2, 12.3, 0.3),
    ("Sweet Potato (medium)", 103, 2.3, 24.0, 0.2),
    ("Kale (1 cup)", 33, 2.9, 6.7, 0.5),
    ("Chicken Breast (4 oz)", 165, 31.0, 0.0, 3.6),
    ("Salmon (4 oz)", 233, 25.0, 0.0, 15.0),
    ("Egg (large)", 72, 6.3, 0.4, 5.0),
    ("Tofu (1/2 cup)", 94, 10.0, 2.0, 6.0),
    ("Ground Beef, 90% lean (4 oz)", 199, 23.0, 0.0, 11.0),
    ("Tuna (1 can, in water)", 121, 27.0, 0.0, 1.0),
    ("Turkey Breast (4 oz)", 130, 30.0, 0.0, 1.0),
    ("Greek Yogurt (1 cup)", 146, 23.0, 9.0, 0.5),
    ("Milk, 2% (1 cup)", 122, 8.0, 11.7, 4.8),
    ("Cheddar Cheese (1 oz)", 113, 7.0, 0.4, 9.0),
    ("Almond Milk (1 cup)", 39, 1.5, 3.4, 2.8),
    ("Cottage Cheese (1/2 cup)", 111, 12.5, 4.5, 5.0),
    ("Brown Rice (1 cup, cooked)", 216, 5.0, 45.0, 1.8),
    ("Quinoa (1 cup, cooked)", 222, 8.0, 39.0, 3.6),
    ("Whole Wheat Bread (1 slice)", 81, 4.0, 13.8, 1.1),
    ("Oatmeal (1 cup, cooked)", 158, 6.0, 27.0, 3.2),
    ("Pasta (1 cup, cooked)", 221, 8.0, 43.0, 1.3),
    ("Black Beans (1/2 cup)", 114, 7.6, 20.4, 0.5),
    ("Lentils (1/2 cup, cooked)", 115, 9.0, 20.0, 0.4),
    ("Chickpeas (1/2 cup)", 143, 7.3, 24.5, 2.1),
    ("Peanut Butter (2 tbsp)", 188, 8.0, 6.0, 16.0),
    ("Almonds (1 oz)", 164, 6.0, 6.0, 14.0),
    ("Walnuts (1 oz)", 185, 4.3, 3.9, 18.5),
    ("Chia Seeds (1 tbsp)", 58, 2.0, 5.1, 3.7),
    ("Flax Seeds (1 tbsp)", 55, 1.9, 3.0, 4.3),
    ("Dark Chocolate (1 oz)", 155, 2.2, 13.0, 12.0),
    ("Protein Bar", 200, 20.0, 20.0, 5.0),
    ("Hummus (2 tbsp)", 70, 2.0, 4.0, 5.0),
    ("Trail Mix (1/4 cup)", 173, 5.0, 15.0, 11.0),
    ("Popcorn (3 cups, air-popped)", 93, 3.0, 19.0, 1.0),
    ("Coffee (black)", 2, 0.3, 0.0, 0.0),
    ("Orange Juice (1 cup)", 110, 2.0, 26.0, 0.5),
    ("Green Tea", 0, 0.0, 0.0, 0.0),
    ("Smoothie (fruit)", 150, 2.5, 34.0, 0.8),
    ("Protein Shake", 170, 25.0, 9.0, 2.5),
    ("Grilled Chicken Salad", 350, 35.0, 20.0, 14.0),
    ("Tuna Sandwich", 330, 28.0, 33.0, 9.0),
    ("Vegetable Stir Fry", 275, 15.0, 30.0, 12.0),
    ("Omelette (2 eggs)", 220, 14.0, 2.0, 16.0),
    ("Beef Burrito", 580, 26.0, 68.0, 22.0),
    ("Spaghetti with Tomato Sauce", 390, 12.0, 78.0, 4.0),
    ("Caesar Salad", 290, 8.0, 10.0, 24.0),
    ("Turkey Sandwich", 320, 25.0, 40.0, 7.0),
    ("Vegetable Soup (1 cup)", 120, 4.0, 18.0, 3.5),
    ("Baked Salmon with Vegetables", 400, 35.0, 15.0, 20.0),
];

const CARDIO: &[ExerciseRow] = &[
    ("Running", &["legs", "core", "cardio"], 8.0, 14.0),
    ("Cycling", &["legs", "cardio"], 6.0, 12.0),
    ("Swimming", &["fullbody", "cardio"], 6.0, 10.0),
    ("Elliptical", &["legs", "arms", "cardio"], 5.0, 9.0),
    ("Jump Rope", &["legs", "cardio"], 8.0, 12.0),
    ("Stair Climber", &["legs", "cardio"], 6.0, 9.0),
    ("Rowing", &["back", "arms", "core", "cardio"], 6.0, 10.0),
    ("Walking", &["legs", "cardio"], 3.0, 5.0),
    ("Hiking", &["legs", "core", "cardio"], 5.0, 7.0),
    ("Dancing", &["fullbody", "cardio"], 4.5, 8.0),
    ("HIIT", &["fullbody", "cardio"], 8.0, 15.0),
];

const STRENGTH: &[ExerciseRow] = &[
    ("Weightlifting", &["arms", "chest", "back", "legs"], 3.5, 6.0),
    ("Bench Press", &["chest", "arms"], 3.5, 6.0),
    ("Deadlift", &["back", "legs", "core"], 4.0, 7.0),
    ("Squat", &["legs", "core"], 4.0, 7.0),
    ("Lunges", &["legs"], 3.5, 6.0),
    ("Pull-ups", &["back", "arms"], 4.0, 6.5),
    ("Push-ups", &["chest", "arms", "core"], 3.5, 6.0),
    ("Shoulder Press", &["shoulders", "arms"], 3.5, 6.0),
    ("Bicep Curls", &["arms"], 3.0, 5.0),
    ("Tricep Extensions", &["arms"], 3.0, 5.0),
    ("Leg Press", &["legs"], 3.5, 6.0),
    ("Plank", &["core"], 3.0, 4.5),
    ("Crunches", &["core"], 3.0, 4.5),
    ("Circuit Training", &["fullbody"], 5.0, 8.0),
    ("Kettlebell Swings", &["fullbody", "core"], 5.0, 8.0),
    ("Dumbbell Rows", &["back", "arms"], 3.5, 6.0),
];

const FLEXIBILITY: &[ExerciseRow] = &[
    ("Yoga", &["fullbody", "flexibility"], 2.5, 5.0),
    ("Pilates", &["core", "flexibility"], 3.0, 5.5),
    ("Stretching", &["fullbody", "flexibility"], 2.0, 3.0),
    ("Tai Chi", &["fullbody", "flexibility"], 2.5, 4.0),
    ("Barre", &["legs", "core", "flexibility"], 3.0, 5.0),
    ("Balance Training", &["core", "flexibility"], 2.5, 4.0),
    ("Foam Rolling", &["fullbody", "flexibility"], 1.5, 2.5),
];

const SPORTS: &[ExerciseRow] = &[
    ("Basketball", &["fullbody", "cardio"], 6.0, 10.0),
    ("Soccer", &["legs", "cardio"], 7.0, 11.0),
    ("Tennis", &["fullbody", "cardio"], 6.0, 9.0),
    ("Volleyball", &["fullbody"], 5.0, 8.0),
    ("Golf", &["core", "arms"], 3.5, 5.0),
    ("Rock Climbing", &["fullbody", "arms", "back"], 6.0, 9.0),
    ("Martial Arts", &["fullbody"], 6.0, 10.0),
    ("Boxing", &["arms", "core", "cardio"], 7.0, 12.0),
];

const OTHER: &[ExerciseRow] = &[
    ("Gardening", &["fullbody"], 2.5, 4.5),
    ("House Cleaning", &["fullbody"], 2.5, 4.0),
    ("Lawn Mowing", &["fullbody"], 4.0, 6.0),
    ("Snow Shoveling", &["fullbody"], 5.0, 8.0),
    ("Moving Furniture", &["fullbody"], 4.0, 7.0),
    ("Playing with Kids", &["fullbody"], 3.0, 5.5),
];

/// Builds the default catalog from the compiled-in tables
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalogs.
pub fn build_default_catalog() -> Catalog {
    let foods = FOODS
        .iter()
        .map(|&(name, calories, protein, carbs, fat)| FoodItem {
            name: name.into(),
            calories,
            protein,
            carbs,
            fat,
        })
        .collect();

    let exercises = [
        (ExerciseCategory::Cardio, CARDIO),
        (ExerciseCategory::Strength, STRENGTH),
        (ExerciseCategory::Flexibility, FLEXIBILITY),
        (ExerciseCategory::Sports, SPORTS),
        (ExerciseCategory::Other, OTHER),
    ]
    .into_iter()
    .map(|(category, rows)| ExerciseGroup {
        category,
        exercises: rows
            .iter()
            .map(|&(name, body_parts, mets_low, mets_high)| Exercise {
                name: name.into(),
                body_parts: body_parts.iter().map(|b| b.to_string()).collect(),
                mets_low,
                mets_high,
            })
            .collect(),
    })
    .collect();

    Catalog { foods, exercises }
}

impl Catalog {
    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for food in &self.foods {
            if food.name.trim().is_empty() {
                errors.push("Food has empty name".to_string());
            }
            if [food.protein, food.carbs, food.fat]
                .iter()
                .any(|v| *v < 0.0 || !v.is_finite())
            {
                errors.push(format!("Food '{}' has an invalid macro value", food.name));
            }
        }

        for group in &self.exercises {
            if group.exercises.is_empty() {
                errors.push(format!("Exercise category '{}' is empty", group.category));
            }
            for exercise in &group.exercises {
                if exercise.name.trim().is_empty() {
                    errors.push(format!("Exercise in '{}' has empty name", group.category));
                }
                if exercise.mets_low <= 0.0 {
                    errors.push(format!(
                        "Exercise '{}': metsLow {} must be positive",
                        exercise.name, exercise.mets_low
                    ));
                }
                if exercise.mets_low > exercise.mets_high {
                    errors.push(format!(
                        "Exercise '{}': metsLow {} > metsHigh {}",
                        exercise.name, exercise.mets_low, exercise.mets_high
                    ));
                }
                if exercise.body_parts.is_empty() {
                    errors.push(format!("Exercise '{}' has no body parts", exercise.name));
                }
            }
        }

        errors
    }

    /// Case-insensitive exercise lookup, returning its category too
    pub fn find_exercise(&self, name: &str) -> Option<(ExerciseCategory, &Exercise)> {
        let name = name.trim();
        self.exercises.iter().find_map(|group| {
            group
                .exercises
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(name))
                .map(|e| (group.category, e))
        })
    }

    /// All exercises of one category, in catalog order
    pub fn exercises_in(&self, category: ExerciseCategory) -> Vec<&Exercise> {
        self.exercises
            .iter()
            .filter(|g| g.category == category)
            .flat_map(|g| g.exercises.iter())
            .collect()
    }

    /// Food search across custom foods and the catalog
    ///
    /// Queries shorter than two characters match nothing. Up to four custom
    /// foods come first, then up to six catalog foods, eight at most overall.
    pub fn search_foods(&self, query: &str, custom: &[CustomFood]) -> Vec<FoodItem> {
        let needle = query.trim().to_lowercase();
        if needle.chars().count() < 2 {
            return Vec::new();
        }

        let custom_hits = custom
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(4)
            .map(FoodItem::from);
        let catalog_hits = self
            .foods
            .iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .take(6)
            .cloned();

        custom_hits.chain(catalog_hits).take(8).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn custom(name: &str) -> CustomFood {
        CustomFood {
            id: Uuid::new_v4(),
            name: name.into(),
            calories: 300,
            protein: 20.0,
            carbs: 30.0,
            fat: 10.0,
            serving_size: 1.0,
            serving_unit: "bowl".into(),
        }
    }

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.foods.len(), 56);
        assert_eq!(catalog.exercises.len(), 5);
        let exercise_count: usize = catalog.exercises.iter().map(|g| g.exercises.len()).sum();
        assert_eq!(exercise_count, 48);
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = get_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_validate_reports_inverted_mets() {
        let mut catalog = build_default_catalog();
        catalog.exercises[0].exercises[0].mets_low = 20.0;
        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Running"));
    }

    #[test]
    fn test_find_exercise_is_case_insensitive() {
        let catalog = get_default_catalog();
        let (category, exercise) = catalog.find_exercise("jump rope").unwrap();
        assert_eq!(category, ExerciseCategory::Cardio);
        assert_eq!(exercise.mets_high, 12.0);
        assert!(catalog.find_exercise("Underwater Basket Weaving").is_none());
    }

    #[test]
    fn test_search_requires_two_characters() {
        let catalog = get_default_catalog();
        assert!(catalog.search_foods("a", &[]).is_empty());
        assert!(catalog.search_foods("  ", &[]).is_empty());
    }

    #[test]
    fn test_search_puts_custom_foods_first_and_caps_results() {
        let catalog = get_default_catalog();
        let customs: Vec<_> = (0..6).map(|i| custom(&format!("Chicken bowl {}", i))).collect();

        let results = catalog.search_foods("chicken", &customs);
        // 4 custom + 2 catalog chicken dishes
        assert_eq!(results.len(), 6);
        assert!(results[..4].iter().all(|f| f.name.starts_with("Chicken bowl")));
        assert_eq!(results[4].name, "Chicken Breast (4 oz)");

        let results = catalog.search_foods("an", &customs);
        assert!(results.len() <= 8);
    }
}

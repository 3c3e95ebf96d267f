//! Cannabis-infused recipes.
//!
//! A [`Recipe`] holds an ordered list of cannabis ingredients with their gram
//! quantities and a serving count. Dosage is always derived on demand by
//! [`Recipe::calculate_total_dosage`]; it is never stored on the recipe.

pub mod dietary;
pub mod dosage;
pub mod step;

pub use dietary::{AllergenType, DietaryRestriction, NutritionInfo};
pub use dosage::{DosageCalculator, DosageInfo, ExperienceLevel, DEFAULT_HIGH_DOSE_THRESHOLD_MG};
pub use step::{RecipeStep, MAX_CANNABINOID_COOKING_TEMP_F};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{CdesError, Result};
use crate::ingredient::CannabisIngredient;

/// Recipe categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Appetizer,
    MainCourse,
    Dessert,
    Beverage,
    Snack,
    Sauce,
    BakedGood,
    Confection,
    Savory,
}

impl RecipeCategory {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Appetizer => "appetizer",
            RecipeCategory::MainCourse => "main_course",
            RecipeCategory::Dessert => "dessert",
            RecipeCategory::Beverage => "beverage",
            RecipeCategory::Snack => "snack",
            RecipeCategory::Sauce => "sauce",
            RecipeCategory::BakedGood => "baked_good",
            RecipeCategory::Confection => "confection",
            RecipeCategory::Savory => "savory",
        }
    }
}

impl fmt::Display for RecipeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipeCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "appetizer" => Ok(RecipeCategory::Appetizer),
            "main_course" => Ok(RecipeCategory::MainCourse),
            "dessert" => Ok(RecipeCategory::Dessert),
            "beverage" => Ok(RecipeCategory::Beverage),
            "snack" => Ok(RecipeCategory::Snack),
            "sauce" => Ok(RecipeCategory::Sauce),
            "baked_good" => Ok(RecipeCategory::BakedGood),
            "confection" => Ok(RecipeCategory::Confection),
            "savory" => Ok(RecipeCategory::Savory),
            other => Err(format!("unknown recipe category: {other}")),
        }
    }
}

/// How demanding a recipe is to prepare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// One cannabis ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub ingredient: Arc<CannabisIngredient>,
    pub grams: Decimal,
}

impl RecipeIngredient {
    #[must_use]
    pub fn new(ingredient: Arc<CannabisIngredient>, grams: Decimal) -> Self {
        Self { ingredient, grams }
    }
}

impl From<(Arc<CannabisIngredient>, Decimal)> for RecipeIngredient {
    fn from((ingredient, grams): (Arc<CannabisIngredient>, Decimal)) -> Self {
        Self::new(ingredient, grams)
    }
}

/// Cannabis-infused recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: RecipeCategory,
    pub servings: u32,
    pub cannabis_ingredients: Vec<RecipeIngredient>,

    // Instructions, ordered by step number
    pub steps: Vec<RecipeStep>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,

    pub dietary_labels: Vec<DietaryRestriction>,
    pub allergens: Vec<AllergenType>,
    pub nutrition: Option<NutritionInfo>,

    pub difficulty: Difficulty,
    pub chef_notes: Option<String>,
    pub terpene_pairing_notes: Option<String>,

    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Create a recipe from its ingredient lines.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidRecipe` when `servings` is zero and
    /// `CdesError::InvalidIngredient` when a quantity is negative.
    pub fn new<I>(
        name: impl Into<String>,
        category: RecipeCategory,
        servings: u32,
        cannabis_ingredients: I,
    ) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<RecipeIngredient>,
    {
        let now = Utc::now();
        let recipe = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: None,
            category,
            servings,
            cannabis_ingredients: cannabis_ingredients.into_iter().map(Into::into).collect(),
            steps: Vec::new(),
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            dietary_labels: Vec::new(),
            allergens: Vec::new(),
            nutrition: None,
            difficulty: Difficulty::default(),
            chef_notes: None,
            terpene_pairing_notes: None,
            author: None,
            created_at: now,
            updated_at: now,
        };

        recipe.check_servings()?;
        for line in &recipe.cannabis_ingredients {
            check_quantity(line)?;
        }
        Ok(recipe)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_times(mut self, prep_time_minutes: u32, cook_time_minutes: u32) -> Self {
        self.prep_time_minutes = prep_time_minutes;
        self.cook_time_minutes = cook_time_minutes;
        self
    }

    #[must_use]
    pub fn with_chef_notes(mut self, notes: impl Into<String>) -> Self {
        self.chef_notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Free-text notes on which strains or terpenes suit the dish.
    #[must_use]
    pub fn with_terpene_pairing_notes(mut self, notes: impl Into<String>) -> Self {
        self.terpene_pairing_notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn with_nutrition(mut self, nutrition: NutritionInfo) -> Self {
        self.nutrition = Some(nutrition);
        self
    }

    /// Set dietary labels and declared allergens; repeated entries are dropped.
    #[must_use]
    pub fn with_labels<D, A>(mut self, dietary_labels: D, allergens: A) -> Self
    where
        D: IntoIterator<Item = DietaryRestriction>,
        A: IntoIterator<Item = AllergenType>,
    {
        self.dietary_labels = dedup(dietary_labels);
        self.allergens = dedup(allergens);
        self
    }

    /// Replace the steps, ordered by step number.
    #[must_use]
    pub fn with_steps(mut self, steps: impl IntoIterator<Item = RecipeStep>) -> Self {
        self.steps = steps.into_iter().collect();
        self.steps.sort_by_key(|step| step.step_number);
        self
    }

    /// Insert a step at its numbered position.
    pub fn add_step(&mut self, step: RecipeStep) {
        let index = self
            .steps
            .partition_point(|existing| existing.step_number <= step.step_number);
        self.steps.insert(index, step);
        self.updated_at = Utc::now();
    }

    /// Steps hot enough to degrade cannabinoids
    pub fn high_temperature_steps(&self) -> impl Iterator<Item = &RecipeStep> {
        self.steps.iter().filter(|step| step.max_temp_warning)
    }

    pub fn has_decarb_step(&self) -> bool {
        self.steps.iter().any(|step| step.decarb_step)
    }

    pub fn contains_allergen(&self, allergen: AllergenType) -> bool {
        self.allergens.contains(&allergen)
    }

    /// Dietary labels contradicted by a declared allergen
    /// (e.g. `DairyFree` alongside `Milk`).
    pub fn conflicting_labels(&self) -> impl Iterator<Item = DietaryRestriction> + '_ {
        self.dietary_labels.iter().copied().filter(|label| {
            label
                .excluded_allergen()
                .is_some_and(|allergen| self.contains_allergen(allergen))
        })
    }

    pub fn total_time_minutes(&self) -> u32 {
        self.prep_time_minutes.saturating_add(self.cook_time_minutes)
    }

    /// Append an ingredient line.
    ///
    /// # Errors
    ///
    /// Returns `CdesError::InvalidIngredient` when `grams` is negative; the
    /// recipe is left unchanged.
    pub fn add_cannabis_ingredient(
        &mut self,
        ingredient: Arc<CannabisIngredient>,
        grams: Decimal,
    ) -> Result<()> {
        let line = RecipeIngredient::new(ingredient, grams);
        check_quantity(&line)?;
        self.cannabis_ingredients.push(line);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Remove the first line using the ingredient with `ingredient_id`.
    pub fn remove_cannabis_ingredient(&mut self, ingredient_id: Uuid) -> Option<RecipeIngredient> {
        let index = self
            .cannabis_ingredients
            .iter()
            .position(|line| line.ingredient.id == ingredient_id)?;
        self.updated_at = Utc::now();
        Some(self.cannabis_ingredients.remove(index))
    }

    /// Total cannabis ingredient mass in grams
    ///
    /// Returns `None` on decimal overflow.
    #[must_use]
    pub fn total_cannabis_grams(&self) -> Option<Decimal> {
        self.cannabis_ingredients
            .iter()
            .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.grams))
    }

    /// Calculate total and per-serving dosage with the default threshold.
    ///
    /// # Errors
    ///
    /// See [`DosageCalculator::calculate`].
    pub fn calculate_total_dosage(&self) -> Result<DosageInfo> {
        DosageCalculator::default().calculate(self)
    }

    /// Calculate dosage with a caller-supplied calculator.
    ///
    /// # Errors
    ///
    /// See [`DosageCalculator::calculate`].
    pub fn calculate_total_dosage_with(&self, calculator: &DosageCalculator) -> Result<DosageInfo> {
        calculator.calculate(self)
    }

    pub(crate) fn check_servings(&self) -> Result<()> {
        if self.servings == 0 {
            return Err(CdesError::InvalidRecipe {
                recipe: self.name.clone(),
                reason: "servings must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn dedup<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

pub(crate) fn check_quantity(line: &RecipeIngredient) -> Result<()> {
    if line.grams < Decimal::ZERO {
        return Err(line.ingredient.invalid(format!(
            "quantity must be non-negative, got {} g",
            line.grams
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::CoaReference;
    use crate::ingredient::IngredientType;

    fn butter() -> Arc<CannabisIngredient> {
        let coa = Arc::new(CoaReference::new("COA-1", "B-1", "GSC").unwrap());
        Arc::new(
            CannabisIngredient::new(
                "Cannabis-Infused Butter",
                IngredientType::Butter,
                Decimal::TEN,
                None,
                coa,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new_recipe() {
        let recipe = Recipe::new(
            "Brownies",
            RecipeCategory::Dessert,
            12,
            [(butter(), Decimal::from(50))],
        )
        .unwrap()
        .with_times(20, 25);

        assert_eq!(recipe.servings, 12);
        assert_eq!(recipe.cannabis_ingredients.len(), 1);
        assert_eq!(recipe.total_cannabis_grams(), Some(Decimal::from(50)));
        assert_eq!(recipe.total_time_minutes(), 45);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert!(recipe.steps.is_empty());
        assert!(recipe.nutrition.is_none());
    }

    #[test]
    fn test_total_time_saturates() {
        let recipe = Recipe::new(
            "Slow Infusion",
            RecipeCategory::Sauce,
            1,
            Vec::<RecipeIngredient>::new(),
        )
        .unwrap()
        .with_times(u32::MAX, 30);
        assert_eq!(recipe.total_time_minutes(), u32::MAX);
    }

    #[test]
    fn test_total_grams_overflow_is_none() {
        let butter = butter();
        let recipe = Recipe::new(
            "Bulk Batch",
            RecipeCategory::BakedGood,
            1,
            [(Arc::clone(&butter), Decimal::MAX), (butter, Decimal::MAX)],
        )
        .unwrap();
        assert_eq!(recipe.total_cannabis_grams(), None);
    }

    #[test]
    fn test_zero_gram_line_accepted() {
        let butter = butter();
        let mut recipe = Recipe::new(
            "Garnish Test",
            RecipeCategory::Appetizer,
            2,
            [(Arc::clone(&butter), Decimal::ZERO)],
        )
        .unwrap();
        recipe.add_cannabis_ingredient(butter, Decimal::ZERO).unwrap();

        assert_eq!(recipe.cannabis_ingredients.len(), 2);
        assert_eq!(recipe.total_cannabis_grams(), Some(Decimal::ZERO));
        let dosage = recipe.calculate_total_dosage().unwrap();
        assert!(dosage.total_thc_mg.is_zero());
        assert!(dosage.per_serving_thc_mg.is_zero());
    }

    #[test]
    fn test_zero_servings_rejected() {
        let err = Recipe::new(
            "Brownies",
            RecipeCategory::Dessert,
            0,
            Vec::<RecipeIngredient>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CdesError::InvalidRecipe { .. }));
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let err = Recipe::new(
            "Brownies",
            RecipeCategory::Dessert,
            4,
            [(butter(), Decimal::from(-3))],
        )
        .unwrap_err();
        assert!(matches!(err, CdesError::InvalidIngredient { .. }));
    }

    #[test]
    fn test_add_and_remove_ingredient() {
        let mut recipe = Recipe::new(
            "Infused Lemonade",
            RecipeCategory::Beverage,
            8,
            Vec::<RecipeIngredient>::new(),
        )
        .unwrap();

        let butter = butter();
        recipe.add_cannabis_ingredient(Arc::clone(&butter), Decimal::from(5)).unwrap();
        assert_eq!(recipe.cannabis_ingredients.len(), 1);

        let err = recipe
            .add_cannabis_ingredient(Arc::clone(&butter), Decimal::new(-1, 1))
            .unwrap_err();
        assert!(matches!(err, CdesError::InvalidIngredient { .. }));
        assert_eq!(recipe.cannabis_ingredients.len(), 1);

        let removed = recipe.remove_cannabis_ingredient(butter.id).unwrap();
        assert_eq!(removed.grams, Decimal::from(5));
        assert!(recipe.cannabis_ingredients.is_empty());
        assert!(recipe.remove_cannabis_ingredient(butter.id).is_none());
    }

    #[test]
    fn test_shared_ingredient_across_recipes() {
        let butter = butter();
        let cookies = Recipe::new(
            "Cookies",
            RecipeCategory::BakedGood,
            24,
            [(Arc::clone(&butter), Decimal::from(60))],
        )
        .unwrap();
        let sauce = Recipe::new(
            "Garlic Butter Sauce",
            RecipeCategory::Sauce,
            6,
            [(Arc::clone(&butter), Decimal::from(12))],
        )
        .unwrap();

        assert_eq!(Arc::strong_count(&butter), 3);
        assert_eq!(
            cookies.cannabis_ingredients[0].ingredient.id,
            sauce.cannabis_ingredients[0].ingredient.id
        );
    }

    #[test]
    fn test_steps_ordered_and_flagged() {
        let mut recipe = Recipe::new(
            "Cannabutter Cookies",
            RecipeCategory::BakedGood,
            24,
            [(butter(), Decimal::from(60))],
        )
        .unwrap()
        .with_steps([
            RecipeStep::new(3, "Bake").with_temperature(350).with_duration(12),
            RecipeStep::new(1, "Cream butter and sugar"),
        ]);
        assert!(!recipe.has_decarb_step());

        recipe.add_step(RecipeStep::new(2, "Decarboxylate flower").with_temperature(240).decarb());

        let numbers: Vec<u32> = recipe.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(recipe.has_decarb_step());

        let hot: Vec<&str> = recipe
            .high_temperature_steps()
            .map(|s| s.instruction.as_str())
            .collect();
        assert_eq!(hot, vec!["Bake"]);
    }

    #[test]
    fn test_labels_and_metadata() {
        let recipe = Recipe::new(
            "Lemon Bars",
            RecipeCategory::Dessert,
            16,
            [(butter(), Decimal::from(40))],
        )
        .unwrap()
        .with_labels(
            [
                DietaryRestriction::Vegetarian,
                DietaryRestriction::DairyFree,
                DietaryRestriction::Vegetarian,
            ],
            [AllergenType::Milk, AllergenType::Eggs, AllergenType::Wheat],
        )
        .with_nutrition(NutritionInfo {
            calories: 210,
            sugar_grams: Decimal::from(18),
            ..NutritionInfo::default()
        })
        .with_difficulty(Difficulty::Easy)
        .with_author("Chef Rivera")
        .with_terpene_pairing_notes("Limonene-dominant strains brighten the curd");

        assert_eq!(
            recipe.dietary_labels,
            vec![DietaryRestriction::Vegetarian, DietaryRestriction::DairyFree]
        );
        assert!(recipe.contains_allergen(AllergenType::Eggs));
        assert!(!recipe.contains_allergen(AllergenType::Peanuts));
        assert_eq!(
            recipe.conflicting_labels().collect::<Vec<_>>(),
            vec![DietaryRestriction::DairyFree]
        );
        assert_eq!(recipe.nutrition.as_ref().map(|n| n.calories), Some(210));
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.author.as_deref(), Some("Chef Rivera"));
        assert!(recipe.terpene_pairing_notes.is_some());

        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["difficulty"], "easy");
        assert_eq!(json["allergens"][0], "milk");
        let back: Recipe = serde_json::from_value(json).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::default().to_string(), "medium");
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("MAIN_COURSE".parse::<RecipeCategory>().unwrap(), RecipeCategory::MainCourse);
        assert_eq!(RecipeCategory::BakedGood.to_string(), "baked_good");
        assert!("brunch".parse::<RecipeCategory>().is_err());
    }
}

//! Property tests for dosage exactness and pairing determinism

use cdes_fs::{
    CannabisIngredient, CdesError, CoaReference, IngredientType, Recipe, RecipeCategory,
    RecipeIngredient, TerpeneProfile,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;

const TERPENE_NAMES: [&str; 9] = [
    "myrcene",
    "limonene",
    "caryophyllene",
    "pinene",
    "linalool",
    "humulene",
    "terpinolene",
    "ocimene",
    "bisabolol",
];

fn coa() -> Arc<CoaReference> {
    Arc::new(CoaReference::new("COA-P", "B-P", "Property Kush").unwrap())
}

/// Decimal in [0, max_units / 10^scale]
fn decimal(max_units: i64, scale: u32) -> impl Strategy<Value = Decimal> {
    (0..=max_units).prop_map(move |units| Decimal::new(units, scale))
}

fn ingredient_line() -> impl Strategy<Value = (Decimal, Option<Decimal>, Decimal)> {
    (
        decimal(10_000, 1),
        prop::option::of(decimal(5_000, 1)),
        decimal(100_000, 2),
    )
}

fn build_recipe(servings: u32, lines: &[(Decimal, Option<Decimal>, Decimal)]) -> Recipe {
    let coa = coa();
    let lines: Vec<RecipeIngredient> = lines
        .iter()
        .enumerate()
        .map(|(i, (thc, cbd, grams))| {
            let ingredient = CannabisIngredient::new(
                format!("Ingredient {i}"),
                IngredientType::Extract,
                *thc,
                *cbd,
                Arc::clone(&coa),
            )
            .unwrap();
            RecipeIngredient::new(Arc::new(ingredient), *grams)
        })
        .collect();
    Recipe::new("Generated", RecipeCategory::Snack, servings, lines).unwrap()
}

proptest! {
    #[test]
    fn test_per_serving_is_exact_quotient(
        servings in 1u32..500,
        lines in prop::collection::vec(ingredient_line(), 0..6),
    ) {
        let recipe = build_recipe(servings, &lines);
        let dosage = recipe.calculate_total_dosage().unwrap();

        let expected_thc: Decimal = lines.iter().map(|(thc, _, grams)| *thc * *grams).sum();
        let expected_cbd: Decimal = lines
            .iter()
            .map(|(_, cbd, grams)| cbd.unwrap_or(Decimal::ZERO) * *grams)
            .sum();

        prop_assert_eq!(dosage.total_thc_mg, expected_thc);
        prop_assert_eq!(dosage.total_cbd_mg, expected_cbd);
        prop_assert_eq!(dosage.per_serving_thc_mg, dosage.total_thc_mg / Decimal::from(servings));
        prop_assert_eq!(dosage.per_serving_cbd_mg, dosage.total_cbd_mg / Decimal::from(servings));
        prop_assert_eq!(dosage.high_dose_warning, dosage.per_serving_thc_mg > Decimal::TEN);
    }

    #[test]
    fn test_empty_recipe_is_zero_for_any_servings(servings in 1u32..10_000) {
        let dosage = build_recipe(servings, &[]).calculate_total_dosage().unwrap();
        prop_assert!(dosage.total_thc_mg.is_zero());
        prop_assert!(dosage.per_serving_thc_mg.is_zero());
        prop_assert!(dosage.per_serving_cbd_mg.is_zero());
        prop_assert!(!dosage.high_dose_warning);
    }

    #[test]
    fn test_zero_servings_always_rejected(lines in prop::collection::vec(ingredient_line(), 0..4)) {
        let mut recipe = build_recipe(1, &lines);
        recipe.servings = 0;
        let is_invalid_recipe = matches!(
            recipe.calculate_total_dosage(),
            Err(CdesError::InvalidRecipe { .. })
        );
        prop_assert!(is_invalid_recipe);
    }

    #[test]
    fn test_pairings_deterministic_and_zero_excluded(
        entries in prop::collection::btree_map(
            prop::sample::select(TERPENE_NAMES.to_vec()),
            decimal(300, 2),
            0..9,
        ),
    ) {
        let profile = TerpeneProfile::new(coa(), entries.clone()).unwrap();
        let first = profile.suggest_pairings().unwrap();
        let second = profile.suggest_pairings().unwrap();
        prop_assert_eq!(&first, &second);

        let mut seen = std::collections::HashSet::new();
        prop_assert!(first.iter().all(|s| seen.insert(s.clone())));

        for (name, value) in &entries {
            if value.is_zero() {
                let solo = TerpeneProfile::new(coa(), [(*name, *value)]).unwrap();
                prop_assert!(solo.suggest_pairings().unwrap().is_empty());
            }
        }
    }
}

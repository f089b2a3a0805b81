use serde::Serialize;

/// One entry of the built-in food catalogue. Values are per typical serving.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoodItem {
    pub name: &'static str,
    pub calories: f64,
    pub carbs: f64,
    pub protein: f64,
    pub fat: f64,
}

const fn food(name: &'static str, calories: f64, carbs: f64, protein: f64, fat: f64) -> FoodItem {
    FoodItem {
        name,
        calories,
        carbs,
        protein,
        fat,
    }
}

pub static FOODS: &[FoodItem] = &[
    // breakfast
    food("Oatmeal", 150.0, 27.0, 5.0, 3.0),
    food("Greek Yogurt", 100.0, 6.0, 17.0, 0.0),
    food("Eggs (2)", 140.0, 0.0, 12.0, 10.0),
    food("Whole Grain Toast", 80.0, 15.0, 4.0, 1.0),
    food("Almond Milk", 30.0, 1.0, 1.0, 3.0),
    // proteins
    food("Chicken Breast", 165.0, 0.0, 31.0, 3.6),
    food("Salmon", 206.0, 0.0, 22.0, 13.0),
    food("Tuna", 154.0, 0.0, 30.0, 1.0),
    food("Turkey Breast", 135.0, 0.0, 30.0, 1.0),
    food("Tofu", 144.0, 3.0, 12.0, 8.0),
    // grains
    food("Brown Rice", 216.0, 45.0, 5.0, 1.8),
    food("Quinoa", 222.0, 39.0, 8.0, 3.6),
    food("Whole Wheat Pasta", 200.0, 40.0, 8.0, 1.0),
    food("Sweet Potato", 112.0, 26.0, 2.0, 0.0),
    // vegetables
    food("Broccoli", 55.0, 11.0, 4.0, 0.5),
    food("Spinach", 23.0, 3.6, 2.9, 0.4),
    food("Carrots", 41.0, 9.6, 0.9, 0.2),
    food("Bell Pepper", 30.0, 7.0, 1.0, 0.3),
    food("Asparagus", 20.0, 3.9, 2.2, 0.2),
    // fruits
    food("Apple", 95.0, 25.0, 0.5, 0.3),
    food("Banana", 105.0, 27.0, 1.0, 0.0),
    food("Blueberries", 84.0, 21.0, 1.0, 0.5),
    food("Orange", 62.0, 15.4, 1.2, 0.2),
    food("Strawberries", 49.0, 11.7, 1.0, 0.5),
    // snacks
    food("Almonds", 162.0, 6.0, 6.0, 14.0),
    food("Greek Yogurt with Honey", 180.0, 20.0, 15.0, 5.0),
    food("Hummus", 166.0, 14.0, 7.9, 9.6),
    food("Dark Chocolate", 170.0, 13.0, 2.0, 12.0),
    // beverages
    food("Green Tea", 0.0, 0.0, 0.0, 0.0),
    food("Coffee (Black)", 2.0, 0.0, 0.3, 0.0),
    food("Protein Shake", 120.0, 3.0, 24.0, 1.0),
    // dishes
    food("Caesar Salad", 180.0, 8.0, 6.0, 14.0),
    food("Chicken Stir Fry", 250.0, 15.0, 25.0, 12.0),
    food("Pizza Slice", 285.0, 36.0, 12.0, 10.0),
    food("Burger", 354.0, 29.0, 20.0, 17.0),
    food("Pasta with Tomato Sauce", 200.0, 40.0, 8.0, 1.0),
    // lighter swaps
    food("Zucchini Noodles", 33.0, 6.0, 2.0, 0.0),
    food("Cauliflower Rice", 25.0, 5.0, 2.0, 0.0),
    food("Kale Chips", 50.0, 8.0, 2.0, 2.0),
    food("Avocado Toast", 195.0, 15.0, 5.0, 14.0),
    // international
    food("Sushi Roll", 93.0, 18.0, 2.9, 0.7),
    food("Pad Thai", 237.0, 32.0, 12.0, 8.0),
    food("Taco", 210.0, 20.0, 9.0, 10.0),
    food("Curry with Rice", 350.0, 45.0, 15.0, 12.0),
];

/// Case-insensitive substring search over the catalogue. A blank term
/// returns everything.
pub fn search(term: &str) -> Vec<FoodItem> {
    let term = term.trim().to_lowercase();
    FOODS
        .iter()
        .filter(|f| term.is_empty() || f.name.to_lowercase().contains(&term))
        .copied()
        .collect()
}

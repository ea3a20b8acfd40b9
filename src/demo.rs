use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::table::{Cell, Table};

/// Rows in the generated demo dataset.
pub const DEMO_ROWS: usize = 100;

/// Missing customer-satisfaction scores in the demo dataset.
pub const DEMO_MISSING: usize = 10;

const DEMO_SEED: u64 = 42;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCT_CATEGORIES: [&str; 3] = ["A", "B", "C"];

/// Build the canned demo dataset: three numeric columns, two categorical
/// ones, and ten missing customer-satisfaction scores. Seeded, so every
/// run produces the same table.
pub fn demo_table() -> Table {
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);

    let sales: Vec<Cell> = (0..DEMO_ROWS)
        .map(|_| Cell::Number(rng.gen_range(400.0..1600.0)))
        .collect();
    let marketing: Vec<Cell> = (0..DEMO_ROWS)
        .map(|_| Cell::Number(rng.gen_range(200.0..800.0)))
        .collect();
    let mut satisfaction: Vec<Cell> = (0..DEMO_ROWS)
        .map(|_| Cell::Number(rng.gen_range(1.0..5.0)))
        .collect();
    for index in rand::seq::index::sample(&mut rng, DEMO_ROWS, DEMO_MISSING) {
        satisfaction[index] = Cell::Missing;
    }
    let regions: Vec<Cell> = (0..DEMO_ROWS)
        .map(|_| Cell::Text(REGIONS[rng.gen_range(0..REGIONS.len())].to_string()))
        .collect();
    let categories: Vec<Cell> = (0..DEMO_ROWS)
        .map(|_| Cell::Text(PRODUCT_CATEGORIES[rng.gen_range(0..PRODUCT_CATEGORIES.len())].to_string()))
        .collect();

    Table::from_cells(
        vec![
            "Sales".to_string(),
            "Marketing_Spend".to_string(),
            "Customer_Satisfaction".to_string(),
            "Region".to_string(),
            "Product_Category".to_string(),
        ],
        vec![sales, marketing, satisfaction, regions, categories],
    )
}

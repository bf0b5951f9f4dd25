//! Seed command - derive a wallet seed from eight numbers

use anyhow::Result;
use hookpay_lib::seed::{derive_seed, NumericSeedInput, SEED_INPUT_LEN};

use crate::ui;

pub fn run(numbers: &[String], verbose: bool) -> Result<()> {
    ui::header("Derive Seed");

    let text = if numbers.is_empty() {
        ui::input(&format!("Enter {} numbers separated by spaces", SEED_INPUT_LEN))?
    } else {
        numbers.join(" ")
    };

    let input = NumericSeedInput::parse(&text)?;
    if verbose {
        ui::info(&format!("Using {} values", input.values().len()));
    }

    let seed = derive_seed(&input)?;
    ui::success("Seed derived");
    ui::separator();
    ui::secret("Seed", seed.expose());

    Ok(())
}

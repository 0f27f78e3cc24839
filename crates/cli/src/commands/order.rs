//! `printforge order` - full checkout flow ending in a payment link.

use std::path::PathBuf;

use printforge_checkout::ShippingDestination;
use printforge_checkout::workflow::LineItemPatch;
use printforge_core::Material;

use super::{CommandError, parse_material, read_file, workflow};

/// Estimate the files, fetch shipping rates, create the payment session,
/// and print the redirect link.
#[allow(clippy::print_stdout)]
pub async fn run(
    files: &[PathBuf],
    quantity: u32,
    material: &str,
    destination: ShippingDestination,
    rate_index: Option<usize>,
) -> Result<(), CommandError> {
    let material = parse_material(material)?;
    let mut flow = workflow()?;

    for path in files {
        let file = read_file(path)?;
        let id = flow.add_line_item(file).await;

        if quantity != 1 || material != Material::default() {
            let patch = LineItemPatch {
                quantity: Some(quantity),
                material: Some(material),
                ..LineItemPatch::default()
            };
            flow.update_line_item(id, Some(patch)).await?;
        }
    }

    super::quote::print_quotes(&flow);

    flow.proceed_to_shipping()?;
    flow.request_shipping_rates(destination).await?;

    let rate_id = match rate_index {
        Some(index) => flow
            .rates()
            .get(index)
            .ok_or(CommandError::RateOutOfRange {
                index,
                available: flow.rates().len(),
            })?
            .object_id
            .clone(),
        // Default to the cheapest option.
        None => flow
            .rates()
            .iter()
            .min_by_key(|r| r.amount)
            .ok_or(CommandError::NoRatesOffered)?
            .object_id
            .clone(),
    };
    flow.select_rate(rate_id)?;

    if let Some(rate) = flow.selected_rate() {
        println!(
            "Shipping: {} {} - {} ({} business days)",
            rate.provider, rate.service_level, rate.amount, rate.delivery_estimate_min,
        );
    }
    println!("Total: {}", flow.total());

    let link = flow.checkout().await?;
    println!("Pay here: {link}");

    Ok(())
}

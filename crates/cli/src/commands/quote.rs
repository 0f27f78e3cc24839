//! `printforge quote` - upload files and print their estimates.

use std::path::PathBuf;

use printforge_checkout::workflow::{CheckoutWorkflow, LineItemPatch};
use printforge_core::Material;

use super::{CommandError, parse_material, read_file, workflow};

/// Estimate each file and print a price table.
pub async fn run(files: &[PathBuf], quantity: u32, material: &str) -> Result<(), CommandError> {
    let material = parse_material(material)?;
    let mut flow = workflow()?;

    for path in files {
        let file = read_file(path)?;
        let id = flow.add_line_item(file).await;

        // New items are estimated at quantity 1 with the default material;
        // re-estimate when the command asked for something else.
        if quantity != 1 || material != Material::default() {
            let patch = LineItemPatch {
                quantity: Some(quantity),
                material: Some(material),
                ..LineItemPatch::default()
            };
            flow.update_line_item(id, Some(patch)).await?;
        }
    }

    print_quotes(&flow);
    Ok(())
}

#[allow(clippy::print_stdout)]
pub(super) fn print_quotes(flow: &CheckoutWorkflow) {
    for item in flow.line_items() {
        match item.price_total() {
            Some(total) => {
                let size = item
                    .dimensions()
                    .map_or_else(String::new, |d| format!("  [{d}]"));
                println!(
                    "{}  x{}  {}  {}{size}",
                    item.file().name(),
                    item.quantity(),
                    item.material(),
                    total,
                );
            }
            None => {
                let reason = item
                    .error()
                    .map_or("estimate pending", |e| e.message());
                println!("{}  -- {reason}", item.file().name());
            }
        }
    }

    println!("Subtotal: {}", flow.subtotal());
}

//! Example of inserting UTXO packs into a bus tree
//!
//! This example demonstrates:
//! - Loading the bus tree shape from JSON
//! - Threading pack and branch roots through a ledger
//! - Proving a leaf of the last inserted pack
//! - Combining roots into the forest root

use merkle_forest::{
    config::BusTreeConfig, field::field_to_hex, BusLedger, BusTree, FieldElement, ForestTree,
    Poseidon, TaxiHalf, TaxiTree,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let config: BusTreeConfig =
        serde_json::from_str(r#"{ "utxoPackDepth": 2, "branchDepth": 3, "depth": 10 }"#)?;
    config.validate()?;
    let packs_per_branch = 1usize << config.branch_depth;

    let mut ledger = BusLedger::new();
    let mut last = None;
    for pack in 0..10usize {
        if pack % packs_per_branch == 0 {
            ledger.start_branch();
        }
        let leaves = (0..4u64)
            .map(|i| FieldElement::from(pack as u64 * 4 + i))
            .collect();
        let bus = BusTree::<Poseidon>::new(pack * 4, leaves, &mut ledger, &config)?;
        println!(
            "pack {} -> branch {} slot {}, root {}",
            pack,
            bus.branch_index(),
            bus.utxo_pack_index(),
            field_to_hex(&bus.root())
        );
        last = Some(bus);
    }
    let bus = last.expect("ten packs were inserted");

    let proof = bus.merkle_proof(38)?;
    println!(
        "leaf 38 verifies: {}",
        bus.verify_merkle_proof(FieldElement::from(38u64), 38, &proof)?
    );
    // leaf 3 lives in another pack
    if let Err(e) = bus.merkle_proof(3) {
        println!("leaf 3: {}", e);
    }

    let taxi = TaxiTree::<Poseidon>::new(TaxiHalf::Leaves(vec![]), TaxiHalf::Leaves(vec![]))?;
    let forest = ForestTree::<Poseidon>::new(
        &taxi,
        &bus,
        &FieldElement::from(0u64),
        &FieldElement::from(0u64),
    )?;
    println!("forest root {}", field_to_hex(&forest.root()));
    Ok(())
}

use anyhow::Result;
use std::collections::BTreeMap;

use canon_engine::load_cards;

pub fn run(canon: String) -> Result<()> {
    let cards = load_cards(&canon)?;
    let mut packs: BTreeMap<&str, usize> = BTreeMap::new();
    let mut weight_min = f32::INFINITY;
    let mut weight_max = f32::NEG_INFINITY;
    for card in &cards {
        *packs.entry(card.pack.as_str()).or_default() += 1;
        weight_min = weight_min.min(card.weight);
        weight_max = weight_max.max(card.weight);
    }
    println!("{}: {} cards, {} packs", canon, cards.len(), packs.len());
    if !cards.is_empty() {
        println!("weights {weight_min:.2}..{weight_max:.2}");
    }
    for (pack, count) in packs {
        println!("  {pack}: {count}");
    }
    Ok(())
}

use super::{ItemId, Material};
use crate::systems::errors::ConfigError;

/// Parses `QTY_ID+QTY_ID+...` (e.g. `10_713+10_509+1_7134`). Spaces are ignored and
/// empty chunks between `+` are skipped; anything else that does not parse fails.
pub fn parse_recipe(item: ItemId, raw: &str) -> Result<Vec<Material>, ConfigError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut materials = Vec::new();
    for chunk in compact.split('+').filter(|chunk| !chunk.is_empty()) {
        let invalid = || ConfigError::InvalidRecipe {
            item,
            chunk: chunk.to_string(),
        };
        let (qty, id) = chunk.split_once('_').ok_or_else(invalid)?;
        let quantity: u32 = qty.parse().map_err(|_| invalid())?;
        let ingredient: u32 = id.parse().map_err(|_| invalid())?;
        if quantity == 0 {
            return Err(invalid());
        }
        materials.push(Material {
            item: ItemId(ingredient),
            quantity,
        });
    }
    Ok(materials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quantity_id_pairs_in_order() {
        let parsed = parse_recipe(ItemId(12428), "10_713+10_509 + 1_7134+5_528").expect("recipe");
        let pairs: Vec<(u32, u32)> = parsed.iter().map(|m| (m.item.0, m.quantity)).collect();
        assert_eq!(pairs, vec![(713, 10), (509, 10), (7134, 1), (528, 5)]);
    }

    #[test]
    fn tolerates_trailing_plus() {
        let parsed = parse_recipe(ItemId(1), "2_510+").expect("recipe");
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn rejects_malformed_chunks() {
        for raw in ["10x713", "ten_713", "10_", "0_713", "1_-3"] {
            let err = parse_recipe(ItemId(1), raw).expect_err(raw);
            assert!(
                matches!(err, ConfigError::InvalidRecipe { .. }),
                "unexpected error for {raw}: {err}"
            );
        }
    }
}

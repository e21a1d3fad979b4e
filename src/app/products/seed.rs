//! 示例产品数据
//!
//! 启动时存储为空才生成，编号形如 `Books-Chair-001`，序号按生成顺序递增。

use rand::Rng;
use tracing::info;

use super::model::Product;
use super::store::{ChangeSet, ProductStore, StoreResult};

pub const SEED_COUNT: usize = 700;

const ADJECTIVES: [&str; 5] = ["Small", "Ergonomic", "Rustic", "Smart", "Sleek"];
const MATERIALS: [&str; 6] = ["Steel", "Wooden", "Concrete", "Plastic", "Granite", "Rubber"];
const NAMES: [&str; 5] = ["Chair", "Car", "Computer", "Pants", "Shoes"];
const DEPARTMENTS: [&str; 5] = ["Books", "Movies", "Music", "Games", "Electronics"];

/// 随机生成 `count` 个产品
pub fn generate_products<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Product> {
    (1..=count)
        .map(|sequence| {
            let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
            let material = MATERIALS[rng.gen_range(0..MATERIALS.len())];
            let name = NAMES[rng.gen_range(0..NAMES.len())];
            let department = DEPARTMENTS[rng.gen_range(0..DEPARTMENTS.len())];
            // 分为单位，价格落在 [10.00, 90.00)
            let price = rng.gen_range(1000..9000) as f64 / 100.0;

            Product::new(
                format!("{department}-{name}-{sequence:03}"),
                format!("{adjective} {material} {name}"),
                price,
                department,
            )
        })
        .collect()
}

/// 存储为空时写入 [`SEED_COUNT`] 个产品，一次提交；返回写入的数量
pub async fn init_data<R: Rng + ?Sized>(store: &dyn ProductStore, rng: &mut R) -> StoreResult<usize> {
    if !store.is_empty().await? {
        info!("Store already contains products, skipping seed");
        return Ok(0);
    }

    let products = generate_products(SEED_COUNT, rng);
    let count = products.len();

    let mut changes = ChangeSet::new();
    changes.add_range(products);
    store.commit(changes).await?;

    info!("Seeded {} products into {} store", count, store.backend());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::products::memory::InMemoryProductStore;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_generated_products_follow_convention() {
        let mut rng = StdRng::seed_from_u64(7);
        let products = generate_products(SEED_COUNT, &mut rng);

        assert_eq!(products.len(), SEED_COUNT);
        assert_eq!(products[0].product_number.rsplit('-').next(), Some("001"));
        assert_eq!(products[699].product_number.rsplit('-').next(), Some("700"));

        for product in &products {
            assert!(DEPARTMENTS.contains(&product.department.as_str()));
            assert!(product.product_number.starts_with(&product.department));
            assert!((10.0..90.0).contains(&product.price));
            assert_eq!(product.name.split(' ').count(), 3);
        }

        // 序号全局递增，因此编号不会重复
        let keys: HashSet<String> = products.iter().map(Product::key).collect();
        assert_eq!(keys.len(), SEED_COUNT);
    }

    #[tokio::test]
    async fn test_seed_only_runs_on_empty_store() {
        let store = InMemoryProductStore::new();
        let mut rng = StdRng::seed_from_u64(42);

        let seeded = init_data(&store, &mut rng).await.unwrap();
        assert_eq!(seeded, SEED_COUNT);
        assert_eq!(store.find_all().await.unwrap().len(), SEED_COUNT);

        let seeded = init_data(&store, &mut rng).await.unwrap();
        assert_eq!(seeded, 0);
        assert_eq!(store.find_all().await.unwrap().len(), SEED_COUNT);
    }
}

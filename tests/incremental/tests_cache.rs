use rtgl_check::incremental::LruCache;
use rtgl_check::model::ComponentModel;

use crate::helpers::model_fixtures::workspace;

#[test]
fn test_bounds_hold_for_component_models() {
    let models = workspace();
    let sizes: Vec<usize> = models
        .iter()
        .map(|m| serde_json::to_vec(m).map(|b| b.len()).unwrap_or(0))
        .collect();
    let max_bytes = sizes.iter().copied().max().unwrap_or(0) * 2;

    let mut cache: LruCache<String, ComponentModel> = LruCache::new(3, max_bytes);
    for round in 0..3 {
        for model in &models {
            cache.set(format!("{}#{round}", model.component_key), model.clone());
            assert!(cache.len() <= 3);
            assert!(cache.byte_size() <= max_bytes);
        }
    }
    assert!(cache.stats().evictions > 0);
}

#[test]
fn test_recently_read_model_survives() {
    let models = workspace();
    let mut cache: LruCache<String, ComponentModel> = LruCache::new(2, usize::MAX);
    cache.set(models[0].component_key.clone(), models[0].clone());
    cache.set(models[1].component_key.clone(), models[1].clone());
    assert!(cache.get(&models[0].component_key).is_some());

    cache.set(models[2].component_key.clone(), models[2].clone());
    assert!(cache.contains(&models[0].component_key));
    assert!(!cache.contains(&models[1].component_key));
}

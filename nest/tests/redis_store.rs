//! Runs against a live Redis Stack (RedisJSON + RediSearch). Skipped when `REDIS_URL` is unset.

use chrono::{Duration, Utc};
use nest::{
    Category, FilterCondition, NewProperty, PropertyPatch, Purpose, RedisStore, RepoError, SearchQuery,
    compile_filters,
};
use serial_test::serial;

fn redis_url() -> Option<String> {
    std::env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty())
}

async fn create_test_store() -> Option<RedisStore> {
    let url = redis_url()?;
    let prefix = format!("test_nest_{}", uuid::Uuid::new_v4());
    let store = RedisStore::connect(&url, prefix).await.expect("Failed to connect to Redis");
    store.ensure_index().await.expect("Failed to create index");
    Some(store)
}

async fn cleanup(store: &RedisStore) {
    let url = redis_url().expect("REDIS_URL checked by create_test_store");
    let client = redis::Client::open(url).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    let _: redis::RedisResult<()> = redis::cmd("FT.DROPINDEX")
        .arg(store.index_definition().name)
        .arg("DD")
        .query_async(&mut conn)
        .await;
}

fn listing(title: &str, description: &str, category: Category, purpose: Purpose, location: &str, price: f64) -> NewProperty {
    NewProperty {
        title: title.to_string(),
        description: Some(description.to_string()),
        category,
        purpose,
        location: location.to_string(),
        price,
        images: Vec::new(),
        dealer_id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
    }
}

#[tokio::test]
#[serial]
async fn crud_round_trip() {
    let Some(store) = create_test_store().await else {
        return;
    };

    let created = store
        .insert(
            listing("Flat", "Near market", Category::Flat, Purpose::Rent, "Roorkee", 9000.0),
            Utc::now(),
        )
        .await
        .unwrap();
    assert_eq!(store.get(&created.id).await.unwrap().as_ref(), Some(&created));

    let updated = store
        .update(
            &created.id,
            &PropertyPatch {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(updated.price, 9000.0);

    store.delete(&created.id).await.unwrap();
    assert_eq!(store.get(&created.id).await.unwrap(), None);
    assert!(matches!(store.delete(&created.id).await, Err(RepoError::NotFound { .. })));

    cleanup(&store).await;
}

#[tokio::test]
#[serial]
async fn compiled_filters_run_as_redisearch_queries() {
    let Some(store) = create_test_store().await else {
        return;
    };

    let now = Utc::now();
    let rows = [
        listing("Furnished flat", "Near the canal", Category::Flat, Purpose::Rent, "Roorkee", 12000.0),
        listing("Family house", "Lawn and parking", Category::House, Purpose::Sale, "Dehradun", 8_500_000.0),
        listing("Corner plot", "Lake view", Category::Plot, Purpose::Sale, "Roorkee", 1_800_000.0),
    ];
    for (offset, row) in rows.into_iter().enumerate() {
        store.insert(row, now + Duration::seconds(offset as i64)).await.unwrap();
    }

    let all = store.search(&FilterCondition::match_all()).await.unwrap();
    let titles: Vec<&str> = all.items.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Corner plot", "Family house", "Furnished flat"]);

    let search = |query: SearchQuery| {
        let store = store.clone();
        async move {
            let filters = query.into_filters().unwrap();
            let result = store.search(&compile_filters(&filters)).await.unwrap();
            result.items.into_iter().map(|p| p.title).collect::<Vec<_>>()
        }
    };

    let by_location = search(SearchQuery {
        location: Some("Roorkee".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(by_location, ["Corner plot", "Furnished flat"]);

    let for_sale_in_budget = search(SearchQuery {
        purpose: Some("buy".to_string()),
        budget: Some("2000000".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(for_sale_in_budget, ["Corner plot"]);

    let by_keyword = search(SearchQuery {
        keywords: Some("lawn canal".to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(by_keyword, ["Family house", "Furnished flat"]);

    cleanup(&store).await;
}

#[tokio::test]
#[serial]
async fn location_with_a_comma_matches_only_as_a_whole() {
    let Some(store) = create_test_store().await else {
        return;
    };

    let now = Utc::now();
    store
        .insert(
            listing("Bungalow", "Old cantonment", Category::House, Purpose::Sale, "Civil Lines, Roorkee", 7_000_000.0),
            now,
        )
        .await
        .unwrap();
    store
        .insert(
            listing("Studio", "Near station", Category::Flat, Purpose::Rent, "Roorkee", 8000.0),
            now + Duration::seconds(1),
        )
        .await
        .unwrap();

    let titles_at = |location: &'static str| {
        let store = store.clone();
        async move {
            let filters = SearchQuery {
                location: Some(location.to_string()),
                ..Default::default()
            }
            .into_filters()
            .unwrap();
            let result = store.search(&compile_filters(&filters)).await.unwrap();
            result.items.into_iter().map(|p| p.title).collect::<Vec<_>>()
        }
    };

    assert_eq!(titles_at("Civil Lines, Roorkee").await, ["Bungalow"]);
    assert_eq!(titles_at("Roorkee").await, ["Studio"]);
    assert!(titles_at("Civil Lines").await.is_empty());
    assert!(titles_at("roorkee").await.is_empty());

    cleanup(&store).await;
}

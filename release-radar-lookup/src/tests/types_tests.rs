use super::*;

fn parse(json: &str) -> IgdbGame {
    serde_json::from_str(json).unwrap()
}

#[test]
fn cover_url_is_upgraded_and_absolute() {
    let game = parse(
        r#"{"id": 1, "cover": {"url": "//images.igdb.com/igdb/image/upload/t_thumb/co4jni.jpg"}}"#,
    );
    assert_eq!(
        game.cover_url().as_deref(),
        Some("https://images.igdb.com/igdb/image/upload/t_cover_big/co4jni.jpg")
    );
}

#[test]
fn missing_cover_has_no_url() {
    let game = parse(r#"{"id": 1, "cover": {}}"#);
    assert!(game.cover_url().is_none());
    let game = parse(r#"{"id": 1}"#);
    assert!(game.cover_url().is_none());
}

#[test]
fn epoch_release_date_converts_to_calendar_date() {
    // 2022-02-25T00:00:00Z
    let game = parse(r#"{"id": 1, "first_release_date": 1645747200}"#);
    assert_eq!(
        game.first_release_date(),
        NaiveDate::from_ymd_opt(2022, 2, 25)
    );
}

#[test]
fn platforms_are_mapped_and_deduplicated() {
    let game = parse(r#"{"id": 1, "platforms": [{"id": 6}, {"id": 14}, {"id": 48}, {"id": 130}]}"#);
    let platforms: Vec<_> = game.tracked_platforms().into_iter().collect();
    assert_eq!(platforms, vec![Platform::Pc, Platform::Switch]);
}

#[test]
fn developer_and_publisher_come_from_first_credited_company() {
    let game = parse(
        r#"{
            "id": 1,
            "involved_companies": [
                {"company": {"name": "Bandai Namco"}, "developer": false, "publisher": true},
                {"company": null, "developer": true, "publisher": false},
                {"company": {"name": "FromSoftware"}, "developer": true, "publisher": false},
                {"company": {"name": "Other Studio"}, "developer": true, "publisher": false}
            ]
        }"#,
    );
    assert_eq!(game.developer().as_deref(), Some("FromSoftware"));
    assert_eq!(game.publisher().as_deref(), Some("Bandai Namco"));
}

#[test]
fn detail_drops_blank_text_fields() {
    let game = parse(r#"{"id": 7, "name": "  ", "summary": ""}"#);
    let detail = game.to_detail();
    assert!(detail.title.is_none());
    assert!(detail.description.is_none());
}

#[test]
fn search_result_keeps_catalog_id() {
    let game = parse(r#"{"id": 119133, "name": "Elden Ring"}"#);
    let result = game.to_search_result();
    assert_eq!(result.catalog_id, CatalogId(119133));
    assert_eq!(result.title, "Elden Ring");
    assert!(result.release_date.is_none());
}

#[test]
fn critic_score_is_rounded_and_clamped() {
    assert_eq!(parse(r#"{"id": 1, "aggregated_rating": 87.6}"#).score(), Some(88));
    assert_eq!(parse(r#"{"id": 1, "aggregated_rating": 100.4}"#).score(), Some(100));
    assert_eq!(parse(r#"{"id": 1}"#).score(), None);

    let result = parse(r#"{"id": 7, "name": "Hades", "aggregated_rating": 92.2}"#).to_search_result();
    assert_eq!(result.igdb_score, Some(92));
}

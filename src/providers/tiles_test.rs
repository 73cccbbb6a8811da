use super::*;

// =============================================================================
// Entity decoding
// =============================================================================

#[test]
fn decodes_named_and_numeric_entities() {
    assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
    assert_eq!(decode_entities("O&#8217;Brien"), "O\u{2019}Brien");
    assert_eq!(decode_entities("caf&#xE9;"), "café");
    assert_eq!(decode_entities("&lt;b&gt;"), "<b>");
}

#[test]
fn leaves_unknown_or_bare_ampersands() {
    assert_eq!(decode_entities("A & B"), "A & B");
    assert_eq!(decode_entities("&bogus; x"), "&bogus; x");
    assert_eq!(decode_entities("trailing &"), "trailing &");
    assert_eq!(decode_entities("&#xZZ;"), "&#xZZ;");
}

// =============================================================================
// CMS pages
// =============================================================================

#[test]
fn parses_cms_page() {
    let json = r#"[
        {"id": 7, "title": {"rendered": "Ana &amp; Bo"}, "acf": {"lock_date": "2021-06-01", "show_lock_story": true}},
        {"id": 8, "title": {"rendered": "Cy"}, "acf": {"lock_date": "2022-01-02", "show_lock_story": ""}},
        {"id": 9, "title": {"rendered": "Di"}, "acf": []}
    ]"#;
    let records = parse_page(json).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0], TileRecord::new(7, "Ana & Bo", "2021-06-01", true));
    assert!(!records[1].has_story);
    assert_eq!(records[2].date, None);
    assert!(!records[2].has_story);
}

#[test]
fn story_flag_accepts_cms_truthy_values() {
    for (flag, expected) in [("1", true), ("\"yes\"", true), ("\"0\"", false), ("0", false), ("null", false)] {
        let json = format!(r#"[{{"id": 1, "title": {{"rendered": "A"}}, "acf": {{"show_lock_story": {flag}}}}}]"#);
        assert_eq!(parse_page(&json).unwrap()[0].has_story, expected, "{flag}");
    }
}

#[test]
fn page_without_ids_is_error() {
    assert!(parse_page(r#"[{"title": {"rendered": "A"}}]"#).is_err());
    assert!(parse_page("{}").is_err());
}

#[test]
fn total_pages_header() {
    assert_eq!(total_pages(Some("3"), 1), 3);
    assert_eq!(total_pages(Some(" 2 "), 1), 2);
    assert_eq!(total_pages(None, 4), 4);
    assert_eq!(total_pages(Some("many"), 2), 2);
}

#[test]
fn page_url_requests_only_needed_fields() {
    let provider = HttpTileData::new(reqwest::Client::new(), "https://cms.test/wp-json/wp/v2");
    assert_eq!(
        provider.page_url(2),
        "https://cms.test/wp-json/wp/v2/lock?per_page=2000&page=2&_fields[]=title&_fields[]=acf&_fields[]=id"
    );
}

// =============================================================================
// File provider
// =============================================================================

#[test]
fn parses_record_file_with_story_alias() {
    let json = r#"[{"id": 1, "name": "Ana &amp; Bo", "date": "2021", "story": true}, {"id": 2, "name": "Cy"}]"#;
    let records = parse_records(json).unwrap();
    assert_eq!(records[0].name, "Ana & Bo");
    assert!(records[0].has_story);
    assert!(!records[1].has_story);
}

#[tokio::test]
async fn file_provider_caches_until_cleared() {
    let path = std::env::temp_dir().join(format!("lockwall-tiles-{}.json", std::process::id()));
    std::fs::write(&path, r#"[{"id": 1, "name": "Ana"}]"#).unwrap();
    let provider = FileTileData::new(&path);

    assert_eq!(provider.fetch_all().await.unwrap().len(), 1);
    std::fs::write(&path, r#"[{"id": 1, "name": "Ana"}, {"id": 2, "name": "Bo"}]"#).unwrap();
    assert_eq!(provider.fetch_all().await.unwrap().len(), 1);

    provider.clear_cache();
    assert_eq!(provider.fetch_all().await.unwrap().len(), 2);
    std::fs::remove_file(path).unwrap();
}

#[tokio::test]
async fn missing_file_is_tile_data_error() {
    let provider = FileTileData::new("/no/such/tiles.json");
    assert!(matches!(provider.fetch_all().await, Err(CollabError::TileData(_))));
}

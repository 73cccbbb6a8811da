use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lockwall-assets-{name}-{}", std::process::id()));
    std::fs::create_dir_all(dir.join("models")).unwrap();
    dir
}

#[test]
fn resolve_strips_leading_slash() {
    let loader = FsAssetLoader::new("/srv/public");
    assert_eq!(loader.resolve("/models/lockOne.glb"), PathBuf::from("/srv/public/models/lockOne.glb"));
    assert_eq!(loader.resolve("models/lockOne.glb"), PathBuf::from("/srv/public/models/lockOne.glb"));
}

#[tokio::test]
async fn load_existing_model_assigns_fresh_ids() {
    let root = scratch_dir("ok");
    std::fs::write(root.join("models/a.glb"), b"glTF").unwrap();
    let loader = FsAssetLoader::new(&root);

    let first = loader.load("/models/a.glb").await.unwrap();
    let second = loader.load("/models/a.glb").await.unwrap();
    assert_eq!(first.path, "/models/a.glb");
    assert_ne!(first.id, second.id);

    std::fs::remove_dir_all(root).unwrap();
}

#[tokio::test]
async fn missing_model_is_asset_error() {
    let root = scratch_dir("missing");
    let loader = FsAssetLoader::new(&root);
    let err = loader.load("/models/nope.glb").await.unwrap_err();
    assert!(matches!(err, CollabError::Asset { ref path, .. } if path == "/models/nope.glb"));
    std::fs::remove_dir_all(root).unwrap();
}

#[tokio::test]
async fn directory_is_not_a_model() {
    let root = scratch_dir("dir");
    let loader = FsAssetLoader::new(&root);
    assert!(loader.load("/models").await.is_err());
    std::fs::remove_dir_all(root).unwrap();
}

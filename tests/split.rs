use qrsmith::{helper, split, RecoveryLevel, RenderOptions};

#[test]
fn test_split_symbols_written_to_files() {
    let content = "0123456789abcdef".repeat(200);
    assert!(qrsmith::encode_text(&content, RecoveryLevel::Highest).is_err());

    let symbols = split::encode_multi(&content, RecoveryLevel::Highest).unwrap();
    assert_eq!(symbols.len(), 3);
    assert!(symbols.iter().all(|s| s.recovery_level() == RecoveryLevel::Highest));

    let dir = tempfile::tempdir().unwrap();
    let options = RenderOptions::default();
    for (i, symbol) in symbols.iter().enumerate() {
        let path = dir.path().join(format!("out-{}.png", i));
        helper::save_png(symbol, &path, 256, &options).unwrap();
        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (256, 256));
    }

    let grid = split::grid_png(&symbols, 256, 0, &options).unwrap();
    let path = dir.path().join("out-grid.png");
    std::fs::write(&path, &grid).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (512, 512));
}

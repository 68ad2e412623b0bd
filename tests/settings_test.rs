mod helpers;

use helpers::test_shell_with_store;
use kindred::settings::{Settings, VoiceTone};
use kindred::storage::Store;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn settings_round_trip_across_rebuilds() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let expected = {
        let shell = test_shell_with_store(Arc::clone(&store));
        shell.settings.update("pixelColor", &json!("#9b59b6"));
        shell.settings.update("pixelSize", &json!(60));
        shell.settings.update("voiceTone", &json!("gentle"));
        shell.settings.update("hapticIntensity", &json!(8));
        shell.settings.update("hapticEnabled", &json!(false));
        shell.settings.snapshot()
    };

    let shell = test_shell_with_store(store);
    assert_eq!(shell.settings.snapshot(), expected);
    assert_eq!(shell.settings.snapshot().voice_tone, VoiceTone::Gentle);
}

#[tokio::test]
async fn invalid_updates_leave_settings_untouched() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let shell = test_shell_with_store(store);
    let before = shell.settings.snapshot();

    shell.settings.update("wallpaper", &json!("ocean"));
    shell.settings.update("pixelSize", &json!([1, 2, 3]));
    shell.settings.update("hapticEnabled", &json!("yes please"));

    assert_eq!(shell.settings.snapshot(), before);
}

#[tokio::test]
async fn reset_returns_to_defaults_and_persists() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    {
        let shell = test_shell_with_store(Arc::clone(&store));
        shell.settings.update("pixelColor", &json!("#000000"));
        shell.settings.reset();
    }

    let shell = test_shell_with_store(store);
    assert_eq!(shell.settings.snapshot(), Settings::default());
}

#[tokio::test]
async fn corrupt_settings_document_degrades_to_defaults() {
    let store = Arc::new(Store::open_in_memory().unwrap());
    store
        .put_json(kindred::storage::SETTINGS_KEY, &json!([1, 2, 3]))
        .unwrap();

    let shell = test_shell_with_store(store);
    assert_eq!(shell.settings.snapshot(), Settings::default());
}

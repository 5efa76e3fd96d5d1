//! Launcher and ui-config artifact behavior through the public API.

use sdfix::launcher::{LaunchFlag, LaunchProfile, LauncherTemplate, Shell};
use sdfix::uiconfig::UiConfig;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn launcher_render_is_a_pure_function_of_the_flag_list() {
    let build = || {
        LauncherTemplate::new(Shell::Batch)
            .title("repro")
            .env("SAFETENSORS_FAST_GPU", "1")
            .flag(LaunchFlag::value("precision", "full"))
            .flag(LaunchFlag::switch("no-half"))
    };

    // Byte-identical output for identical input, across repeated calls.
    let first = build().render();
    for _ in 0..3 {
        assert_eq!(build().render(), first);
    }
}

#[test]
fn flag_present_iff_in_mapping() {
    let with_precision =
        LauncherTemplate::new(Shell::Batch).flag(LaunchFlag::value("precision", "full"));
    let without = LauncherTemplate::new(Shell::Batch).flag(LaunchFlag::switch("medvram-sdxl"));

    assert!(with_precision.render().contains("--precision full"));
    assert!(!with_precision.render().contains("--medvram-sdxl"));
    assert!(without.render().contains("--medvram-sdxl"));
    assert!(!without.render().contains("--precision"));
}

#[test]
fn launcher_write_overwrites_previous_artifact() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("webui_custom.bat");

    LaunchProfile::Compatible
        .template(Shell::Batch)
        .write(&path)
        .unwrap();
    let first = std::fs::read_to_string(&path).unwrap();
    assert!(first.contains("--precision full"));

    LaunchProfile::Optimized
        .template(Shell::Batch)
        .write(&path)
        .unwrap();
    let second = std::fs::read_to_string(&path).unwrap();
    assert!(second.contains("--xformers"));
    assert!(!second.contains("--precision full"));
}

#[test]
fn ui_config_round_trip_preserves_exact_pairs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ui-config.json");

    let mut config = UiConfig::new();
    config.set("txt2img/Sampling steps/value", json!(20));
    config.set("txt2img/Seed/value", json!(-1));
    config.set("txt2img/Hires. fix/value", json!(false));
    config.set("img2img/Denoising strength/value", json!(0.75));
    config.set("txt2img/Prompt/value", json!(""));
    config.save(&path).unwrap();

    let loaded = UiConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    // Second round trip is byte-stable too.
    loaded.save(&path).unwrap();
    let reloaded = UiConfig::load(&path).unwrap();
    assert_eq!(reloaded, loaded);
}

#[test]
fn preferred_vae_survives_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ui-config.json");

    let mut config = UiConfig::new();
    config.set_preferred_vae("vae-ft-ema-560000-ema-pruned.safetensors");
    config.save(&path).unwrap();

    let loaded = UiConfig::load(&path).unwrap();
    assert_eq!(
        loaded.preferred_vae(),
        Some("vae-ft-ema-560000-ema-pruned.safetensors")
    );
}
